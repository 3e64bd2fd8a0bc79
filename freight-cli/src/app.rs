//! Everything a command needs: the restored session and an API client.

use std::io::BufRead;
use std::io::Write;
use std::sync::Arc;

use anyhow::Context;
use anyhow::bail;
use freight_desk::LocalStore;
use freight_desk::Session;
use freight_desk::grid::AlertSink;
use freight_desk::storage::keys;
use freight_lib::CrmClient;
use freight_lib::model::User;

pub const DEFAULT_API_URL: &str = "http://localhost:8000/api";

pub struct App {
    pub session: Session,
    pub client: Arc<CrmClient>,
}

impl App {
    /// Opens local storage, restores the session and resolves the API root.
    ///
    /// The root comes from `--api-url` or `FREIGHT_API_URL`, then the one
    /// stored by an earlier run, then [`DEFAULT_API_URL`]. An explicit one
    /// is remembered.
    pub async fn bootstrap(api_url: Option<String>) -> anyhow::Result<Self> {
        let store = LocalStore::open_default()
            .await
            .context("failed to open local storage")?;

        let base_url = match api_url {
            Some(url) => {
                store.set(keys::API_URL, &url).await?;
                url
            }
            None => store
                .get::<String>(keys::API_URL)
                .await?
                .unwrap_or_else(|| DEFAULT_API_URL.to_string()),
        };
        log::info!("[cli] using API at {}", base_url);

        let mut session = Session::new(store);
        session.hydrate().await?;
        let client = Arc::new(session.client(&base_url, None));
        Ok(Self { session, client })
    }

    pub fn require_user(&self) -> anyhow::Result<&User> {
        match self.session.user() {
            Some(user) if self.session.is_authenticated() => Ok(user),
            _ => bail!("Вы не вошли в систему. Выполните `freight login`."),
        }
    }

    /// Ends the session if the server rejected the token during a command.
    pub async fn finish(&mut self) -> anyhow::Result<()> {
        if self.session.handle_unauthorized().await? {
            eprintln!("Сессия истекла. Войдите снова: `freight login`.");
        }
        Ok(())
    }
}

/// Alerts printed to stderr.
pub struct StderrAlerts;

impl AlertSink for StderrAlerts {
    fn alert(&self, message: &str) {
        eprintln!("{}", message);
    }
}

/// Asks a yes/no question on the terminal. Anything but `y`/`д` is no.
pub fn confirm(question: &str) -> anyhow::Result<bool> {
    let answer = prompt(&format!("{} [y/N] ", question))?;
    Ok(matches!(answer.trim().to_lowercase().as_str(), "y" | "yes" | "д" | "да"))
}

/// Reads one line from stdin after printing `label`.
pub fn prompt(label: &str) -> anyhow::Result<String> {
    let mut stdout = std::io::stdout();
    write!(stdout, "{}", label)?;
    stdout.flush()?;
    let mut line = String::new();
    std::io::stdin().lock().read_line(&mut line)?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
