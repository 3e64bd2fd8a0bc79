use anyhow::anyhow;

use crate::app::App;
use crate::app::prompt;

pub async fn login(
    app: &mut App,
    email: &str,
    password: Option<String>,
    remember: bool,
) -> anyhow::Result<()> {
    let password = match password {
        Some(p) => p,
        None => prompt("Пароль: ")?,
    };
    let client = app.client.clone();
    let user = app
        .session
        .login(&client, email, &password, remember)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    println!("Вход выполнен: {} ({})", user.display_name(), user.role.label());
    Ok(())
}

pub async fn logout(app: &mut App) -> anyhow::Result<()> {
    app.session.logout().await?;
    println!("Вы вышли из системы");
    Ok(())
}

pub async fn whoami(app: &mut App) -> anyhow::Result<()> {
    app.require_user()?;
    let client = app.client.clone();
    let valid = app
        .session
        .validate(&client)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    if !valid {
        println!("Сессия недействительна. Войдите снова: `freight login`.");
        return Ok(());
    }

    let user = app.require_user()?;
    println!("{} <{}>", user.display_name(), user.email);
    println!("Роль: {}", user.role.label());
    println!("API: {}", app.client.base_url());
    Ok(())
}

pub async fn reset_password(app: &App, email: &str) -> anyhow::Result<()> {
    app.client
        .reset_password(email)
        .await
        .map_err(|e| anyhow!(e.user_message()))?;
    println!("Ссылка для сброса пароля отправлена на {}", email);
    Ok(())
}
