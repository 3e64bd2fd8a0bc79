use std::path::Path;
use std::sync::Arc;

use anyhow::Context;
use anyhow::anyhow;
use freight_desk::pages::ListPage;
use freight_lib::model::Resource;

use crate::app::App;
use crate::app::StderrAlerts;
use crate::app::confirm;
use crate::output;

fn list_page(app: &App, resource: Resource) -> anyhow::Result<ListPage> {
    let role = app.require_user()?.role.clone();
    Ok(ListPage::new(
        app.client.clone(),
        app.client.clone(),
        Arc::new(StderrAlerts),
        app.session.store().clone(),
        resource,
        &role,
    ))
}

pub async fn list(
    app: &App,
    resource: Resource,
    search: Option<String>,
    page: u32,
    page_size: u32,
) -> anyhow::Result<()> {
    let mut list = list_page(app, resource)?;
    list.open().await;
    if let Some(text) = search {
        list.search(&text).await;
    }
    if page_size != list.pagination().page_size() {
        list.set_page_size(page_size).await;
    }
    if page > 1 {
        list.go_to_page(page - 1).await;
    }

    output::print_grid(list.grid());
    if list.grid().error().is_none() {
        output::print_pagination(list.pagination());
    }
    Ok(())
}

pub async fn delete(app: &App, resource: Resource, id: i64, yes: bool) -> anyhow::Result<()> {
    let mut list = list_page(app, resource)?;
    list.request_delete(id);
    let question = list.confirm_state().prompt().unwrap_or_default();
    if !yes && !confirm(&question)? {
        list.cancel_confirm();
        println!("Отменено");
        return Ok(());
    }
    list.confirm().await.map_err(|e| anyhow!(e.user_message()))?;
    println!("Удалено: {} {}", resource, id);
    Ok(())
}

pub async fn reassign(app: &App, resource: Resource, id: i64, user_id: i64) -> anyhow::Result<()> {
    let mut list = list_page(app, resource)?;
    list.reassign_owner(id, user_id)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    println!("{} {} передан пользователю {}", resource, id, user_id);
    Ok(())
}

pub async fn export(app: &App, resource: Resource, out: &Path) -> anyhow::Result<()> {
    app.require_user()?;
    let bytes = if resource == Resource::Orders {
        app.client
            .orders()
            .export_csv()
            .await
            .map_err(|e| anyhow!(e.user_message()))?
    } else {
        list_page(app, resource)?
            .export_excel()
            .await
            .map_err(|e| anyhow!(e.user_message()))?
    };
    tokio::fs::write(out, &bytes)
        .await
        .with_context(|| format!("failed to write {}", out.display()))?;
    println!("Сохранено {} байт в {}", bytes.len(), out.display());
    Ok(())
}

pub async fn import(app: &App, resource: Resource, file: &Path) -> anyhow::Result<()> {
    let mut list = list_page(app, resource)?;
    let bytes = tokio::fs::read(file)
        .await
        .with_context(|| format!("failed to read {}", file.display()))?;
    let name = file
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| "import.xlsx".to_string());
    list.import_excel(&name, bytes)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    println!("Импорт в {} выполнен", resource);
    Ok(())
}
