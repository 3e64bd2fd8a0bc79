mod auth;
mod calendar;
mod email;
mod highlights;
mod records;
mod requests;
mod theme;

use crate::app::App;
use crate::cli::Commands;

pub async fn run(app: &mut App, command: Commands) -> anyhow::Result<()> {
    match command {
        Commands::Login {
            email,
            password,
            remember,
        } => auth::login(app, &email, password, remember).await,
        Commands::Logout => auth::logout(app).await,
        Commands::Whoami => auth::whoami(app).await,
        Commands::ResetPassword { email } => auth::reset_password(app, &email).await,
        Commands::List {
            resource,
            search,
            page,
            page_size,
        } => records::list(app, resource, search, page, page_size).await,
        Commands::Delete { resource, id, yes } => records::delete(app, resource, id, yes).await,
        Commands::Reassign {
            resource,
            id,
            user_id,
        } => records::reassign(app, resource, id, user_id).await,
        Commands::Export { resource, out } => records::export(app, resource, &out).await,
        Commands::Import { resource, file } => records::import(app, resource, &file).await,
        Commands::Highlight {
            table,
            cells,
            color,
        } => highlights::highlight(app, table, &cells, Some(color)).await,
        Commands::Unhighlight { table, cells } => {
            highlights::highlight(app, table, &cells, None).await
        }
        Commands::Palette => {
            highlights::palette();
            Ok(())
        }
        Commands::Calendar { month, day } => {
            calendar::show(app, month.as_deref(), day.as_deref()).await
        }
        Commands::Requests { action, id } => requests::run(app, action, id).await,
        Commands::Email { command } => email::run(app, command).await,
        Commands::Theme {
            primary,
            sidebar,
            font_family,
            font_size,
            reset,
        } => {
            let changes = theme::ThemeChanges {
                primary,
                sidebar,
                font_family,
                font_size,
                reset,
            };
            theme::run(app, changes).await
        }
    }
}
