use std::sync::Arc;

use anyhow::bail;
use freight_desk::grid::CellKey;
use freight_desk::grid::ColorOutcome;
use freight_desk::grid::Column;
use freight_desk::grid::ColumnSet;
use freight_desk::grid::DataGrid;
use freight_desk::grid::Palette;
use freight_lib::model::Record;
use freight_lib::model::Resource;

use crate::app::App;
use crate::app::StderrAlerts;

/// Colors `cells` of `table`, or clears them when `color` is `None`.
///
/// The grid is built around the addressed cells only, so rows on any page
/// can be targeted.
pub async fn highlight(
    app: &App,
    table: Resource,
    cells: &[String],
    color: Option<usize>,
) -> anyhow::Result<()> {
    app.require_user()?;

    let mut keys: Vec<CellKey> = Vec::new();
    for raw in cells {
        match CellKey::parse(raw) {
            Ok(key) if key.is_excluded() => eprintln!("Ячейку {} нельзя выделить", key),
            Ok(key) => keys.push(key),
            Err(e) => {
                log::error!("[cli] {}", e);
                eprintln!("Пропущено: {}", e);
            }
        }
    }
    if keys.is_empty() {
        bail!("Не выбрано ни одной ячейки");
    }

    let mut fields: Vec<&str> = keys.iter().map(|k| k.field.as_str()).collect();
    fields.sort_unstable();
    fields.dedup();
    let columns = ColumnSet::new(fields.iter().map(|f| Column::new(*f, *f)).collect());

    let mut row_ids: Vec<i64> = keys.iter().map(|k| k.row_id).collect();
    row_ids.sort_unstable();
    row_ids.dedup();
    let rows = row_ids.iter().map(|id| Record::new().set("id", *id)).collect();

    let mut grid = DataGrid::new(
        app.client.clone(),
        Arc::new(StderrAlerts),
        Some(table.table_name()),
        columns,
    );
    grid.set_data(rows);
    grid.load_highlights().await;
    for key in &keys {
        grid.click_cell(key.row_id, &key.field);
    }

    let outcome = match color {
        Some(index) => {
            if grid.palette().get(index).is_none() {
                bail!("Нет цвета с номером {}, см. `freight palette`", index);
            }
            grid.set_current_color_index(index);
            grid.apply_color().await
        }
        None => grid.clear_color().await,
    };

    match outcome {
        ColorOutcome::Saved(count) => {
            println!("Обновлено ячеек: {}", count);
            Ok(())
        }
        ColorOutcome::NothingSelected => bail!("Не выбрано ни одной ячейки"),
        ColorOutcome::NoTableContext => bail!("Таблица {} не поддерживает выделение", table),
        ColorOutcome::RolledBack => bail!("Изменения не сохранены"),
    }
}

pub fn palette() {
    for (index, color) in Palette::default().iter().enumerate() {
        println!("{:>2}  {:<12} {}", index, color.name, color.value.unwrap_or("-"));
    }
}
