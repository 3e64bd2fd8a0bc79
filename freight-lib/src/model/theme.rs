//! Theme settings synced through `/user-settings/`

use serde::Deserialize;
use serde::Serialize;

/// Colors of the navigation sidebar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SidebarTheme {
    pub background_color: String,
    pub text_color: String,
    pub icon_color: String,
    pub selected_color: String,
    pub logo_color: String,
}

impl Default for SidebarTheme {
    fn default() -> Self {
        Self {
            background_color: "#2A3042".into(),
            text_color: "#FFFFFF".into(),
            icon_color: "#FFFFFF".into(),
            selected_color: "rgba(255, 255, 255, 0.1)".into(),
            logo_color: "#FFFFFF".into(),
        }
    }
}

/// Colors of the top bar.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct TopbarTheme {
    pub background_color: String,
    pub text_color: String,
    pub icon_color: String,
}

impl Default for TopbarTheme {
    fn default() -> Self {
        Self {
            background_color: "#FFFFFF".into(),
            text_color: "#000000".into(),
            icon_color: "#666666".into(),
        }
    }
}

/// Colors of the content area.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct MainTheme {
    pub background_color: String,
    pub card_background: String,
    pub text_color: String,
    pub primary_color: String,
    pub border_color: String,
}

impl Default for MainTheme {
    fn default() -> Self {
        Self {
            background_color: "#f5f5f5".into(),
            card_background: "#ffffff".into(),
            text_color: "#333333".into(),
            primary_color: "#1976d2".into(),
            border_color: "#e0e0e0".into(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FontTheme {
    pub family: String,
    pub size: String,
}

impl Default for FontTheme {
    fn default() -> Self {
        Self {
            family: "Inter".into(),
            size: "16px".into(),
        }
    }
}

impl FontTheme {
    /// Font size in pixels; unparsable sizes fall back to 16.
    pub fn size_px(&self) -> u16 {
        self.size
            .trim()
            .trim_end_matches("px")
            .parse()
            .unwrap_or(16)
    }
}

/// Per-user appearance settings.
///
/// Every section defaults independently, so a partial document from the
/// server still yields a complete theme.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThemeSettings {
    pub sidebar: SidebarTheme,
    pub topbar: TopbarTheme,
    pub main: MainTheme,
    pub font: FontTheme,
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_partial_theme_fills_defaults() {
        let theme: ThemeSettings = serde_json::from_value(json!({
            "main": {"primaryColor": "#ff0000"},
            "font": {"size": "14px"}
        }))
        .unwrap();

        assert_eq!(theme.main.primary_color, "#ff0000");
        assert_eq!(theme.main.background_color, "#f5f5f5");
        assert_eq!(theme.sidebar, SidebarTheme::default());
        assert_eq!(theme.font.size_px(), 14);
        assert_eq!(theme.font.family, "Inter");
    }
}
