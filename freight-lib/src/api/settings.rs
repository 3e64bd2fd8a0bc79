//! Per-user settings

use serde::Deserialize;
use serde::Serialize;

use crate::CrmClient;
use crate::error::Error;
use crate::model::ThemeSettings;

const GET_SETTINGS_PATH: &str = "/user-settings/get_settings/";
const UPDATE_SETTINGS_PATH: &str = "/user-settings/update_settings/";

#[derive(Deserialize)]
struct SettingsDocument {
    #[serde(default)]
    theme_settings: Option<serde_json::Value>,
}

#[derive(Serialize)]
struct SettingsUpdate<'a> {
    theme_settings: &'a ThemeSettings,
}

impl CrmClient {
    /// Fetches the stored theme, or `None` if the user never saved one.
    ///
    /// An empty object or a document that does not parse as a theme also
    /// yields `None`.
    pub async fn get_settings(&self) -> Result<Option<ThemeSettings>, Error> {
        let document: SettingsDocument = self.get_json(GET_SETTINGS_PATH, &[]).await?;
        let theme = match document.theme_settings {
            Some(value) if value.as_object().is_some_and(|m| !m.is_empty()) => {
                match serde_json::from_value(value) {
                    Ok(theme) => Some(theme),
                    Err(e) => {
                        log::warn!("[api] ignoring unreadable theme settings: {}", e);
                        None
                    }
                }
            }
            _ => None,
        };
        Ok(theme)
    }

    /// Stores the theme on the server.
    pub async fn update_settings(&self, theme: &ThemeSettings) -> Result<(), Error> {
        let _: serde_json::Value = self
            .put_json(UPDATE_SETTINGS_PATH, &SettingsUpdate { theme_settings: theme })
            .await?;
        Ok(())
    }
}
