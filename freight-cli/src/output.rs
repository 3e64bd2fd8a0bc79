//! Plain-text rendering of grids for the terminal

use freight_desk::grid::CellKey;
use freight_desk::grid::CellView;
use freight_desk::grid::DataGrid;
use freight_desk::grid::EMPTY_MESSAGE;
use freight_desk::grid::GridBody;
use freight_desk::pages::Pagination;

const MAX_CELL_WIDTH: usize = 40;

fn truncate(text: &str, width: usize) -> String {
    let text = text.replace('\n', " ");
    if text.chars().count() <= width {
        return text;
    }
    let mut cut: String = text.chars().take(width.saturating_sub(1)).collect();
    cut.push('…');
    cut
}

fn pad(text: &str, width: usize) -> String {
    let len = text.chars().count();
    format!("{}{}", text, " ".repeat(width.saturating_sub(len)))
}

/// Prints the grid as aligned columns.
///
/// Highlighted cells get a trailing `*`; the action column is left out.
pub fn print_grid(grid: &DataGrid) {
    if let Some(error) = grid.error() {
        eprintln!("{}", error);
    }

    let rows = match grid.body() {
        GridBody::Loading => {
            println!("Загрузка...");
            return;
        }
        GridBody::Empty => {
            println!("{}", EMPTY_MESSAGE);
            return;
        }
        GridBody::Rows(rows) => rows,
    };

    let columns: Vec<_> = grid.columns().iter().filter(|c| !c.is_actions()).collect();
    let mut table: Vec<Vec<String>> = Vec::with_capacity(rows.len() + 1);
    let mut header = vec!["ID".to_string()];
    header.extend(columns.iter().map(|c| c.header.clone()));
    table.push(header);

    for row in rows {
        let id = row.id().unwrap_or_default();
        let mut line = vec![id.to_string()];
        for column in &columns {
            let mut text = match grid.render_cell(row, column) {
                CellView::StatusChip { label, .. } => format!("[{}]", label),
                view => view.text().to_string(),
            };
            if grid.highlight(&CellKey::new(id, column.field.clone())).is_some() {
                text.push('*');
            }
            line.push(truncate(&text, MAX_CELL_WIDTH));
        }
        table.push(line);
    }

    let widths: Vec<usize> = (0..table[0].len())
        .map(|i| table.iter().map(|r| r[i].chars().count()).max().unwrap_or(0))
        .collect();
    for line in &table {
        let cells: Vec<String> = line.iter().zip(&widths).map(|(c, w)| pad(c, *w)).collect();
        println!("{}", cells.join("  ").trim_end());
    }
}

pub fn print_pagination(pagination: &Pagination) {
    println!(
        "Страница {} из {}, всего записей: {}",
        pagination.page() + 1,
        pagination.page_count(),
        pagination.total()
    );
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_counts_chars() {
        assert_eq!(truncate("Ромашка", 10), "Ромашка");
        assert_eq!(truncate("Ромашка", 4), "Ром…");
        assert_eq!(pad("УНП", 5), "УНП  ");
    }
}
