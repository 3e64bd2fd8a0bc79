use anyhow::anyhow;
use anyhow::bail;
use freight_desk::pages::SiteRequestsPage;
use freight_desk::pages::Transition;

use crate::app::App;
use crate::cli::RequestAction;

pub async fn run(app: &App, action: RequestAction, id: i64) -> anyhow::Result<()> {
    app.require_user()?;
    let mut page = SiteRequestsPage::new(app.client.clone(), app.client.clone());

    let transition = match action {
        RequestAction::Process => Transition::Process,
        RequestAction::Complete => Transition::Complete,
        RequestAction::Reject => Transition::Reject,
        RequestAction::Convert => return convert(&mut page, id).await,
    };
    page.transition(id, transition)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    match page.request(id) {
        Some(request) => println!("Заявка {}: {}", id, request.status.label()),
        None => println!("Заявка {}: {}", id, transition.label()),
    }
    Ok(())
}

async fn convert(page: &mut SiteRequestsPage, id: i64) -> anyhow::Result<()> {
    page.load().await;
    if let Some(error) = page.error() {
        bail!("{}", error);
    }
    match page.request(id) {
        None => bail!("Заявка {} не найдена", id),
        Some(request) if !request.status.can_process() => {
            bail!("Заявка {} уже {}", id, request.status.label().to_lowercase())
        }
        Some(_) => {}
    }

    page.start_convert(id);
    let client = page.convert().await.map_err(|e| anyhow!(e.user_message()))?;
    match client {
        Some(client) => {
            println!(
                "Создан клиент {} из заявки {}",
                client.id().map(|i| i.to_string()).unwrap_or_default(),
                id
            );
            Ok(())
        }
        None => {
            let message = page
                .draft_errors()
                .errors()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join("; ");
            bail!("Клиент не создан: {}", message)
        }
    }
}
