//! `bugdesk users ...` command implementations.

use crate::app::App;
use anyhow::{Result, bail};
use bugdesk_client::{DEFAULT_RESET_PASSWORD, UserDirectory};
use bugdesk_core::{NewUser, Role};
use bugdesk_policy::Screen;

async fn directory(app: &App) -> Result<Option<UserDirectory>> {
    Ok(app
        .enter(Screen::UserManagement)
        .await?
        .map(|principal| UserDirectory::new(app.gateway.clone(), principal)))
}

pub async fn list(app: &App) -> Result<()> {
    let Some(directory) = directory(app).await? else {
        return Ok(());
    };
    let users = directory.list().await?;
    for user in &users {
        println!(
            "  {:<16} {:<10} {:<24} {}",
            user.username,
            user.role.as_str(),
            user.name.as_deref().unwrap_or("-"),
            user.id
        );
    }
    println!();
    println!("{} user(s)", users.len());
    Ok(())
}

pub async fn create(
    app: &App,
    username: String,
    password: String,
    name: Option<String>,
    role: Role,
) -> Result<()> {
    let Some(directory) = directory(app).await? else {
        return Ok(());
    };
    let created = directory
        .create(NewUser {
            name,
            username,
            password,
            role,
        })
        .await?;
    println!("✔ Created {} ({}) with id {}", created.username, created.role, created.id);
    Ok(())
}

pub async fn reset_password(app: &App, user: &str) -> Result<()> {
    let Some(directory) = directory(app).await? else {
        return Ok(());
    };
    let Some(target) = directory.find(user).await? else {
        bail!("No user named '{}'", user);
    };
    directory.reset_password(&target.id).await?;
    println!(
        "✔ Password for {} reset to the default ('{}')",
        target.username, DEFAULT_RESET_PASSWORD
    );
    Ok(())
}
