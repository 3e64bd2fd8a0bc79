use anyhow::anyhow;
use freight_lib::model::ThemeSettings;

use crate::app::App;

pub struct ThemeChanges {
    pub primary: Option<String>,
    pub sidebar: Option<String>,
    pub font_family: Option<String>,
    pub font_size: Option<u16>,
    pub reset: bool,
}

impl ThemeChanges {
    fn is_empty(&self) -> bool {
        !self.reset
            && self.primary.is_none()
            && self.sidebar.is_none()
            && self.font_family.is_none()
            && self.font_size.is_none()
    }

    fn apply(self, current: &ThemeSettings) -> ThemeSettings {
        let mut theme = if self.reset {
            ThemeSettings::default()
        } else {
            current.clone()
        };
        if let Some(color) = self.primary {
            theme.main.primary_color = color;
        }
        if let Some(color) = self.sidebar {
            theme.sidebar.background_color = color;
        }
        if let Some(family) = self.font_family {
            theme.font.family = family;
        }
        if let Some(size) = self.font_size {
            theme.font.size = format!("{}px", size);
        }
        theme
    }
}

fn print_theme(theme: &ThemeSettings) {
    println!("Боковая панель: фон {}, текст {}", theme.sidebar.background_color, theme.sidebar.text_color);
    println!("Верхняя панель: фон {}, текст {}", theme.topbar.background_color, theme.topbar.text_color);
    println!(
        "Основная область: фон {}, основной цвет {}",
        theme.main.background_color, theme.main.primary_color
    );
    println!("Шрифт: {} {}", theme.font.family, theme.font.size);
}

pub async fn run(app: &mut App, changes: ThemeChanges) -> anyhow::Result<()> {
    if changes.is_empty() {
        print_theme(app.session.theme());
        return Ok(());
    }

    let theme = changes.apply(app.session.theme());
    let client = app.client.clone();
    app.session
        .update_theme(&client, theme)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    print_theme(app.session.theme());
    Ok(())
}
