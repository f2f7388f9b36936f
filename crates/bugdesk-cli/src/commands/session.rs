//! Session commands: `bugdesk login`, `logout`, `whoami`.

use crate::app::App;
use anyhow::{Context, Result, bail};
use bugdesk_client::{GatewayError, SessionError};
use bugdesk_policy::navigation;
use std::io::{BufRead, IsTerminal};

/// Log in and persist the session.
///
/// The password comes from `--password`/`BUGDESK_PASSWORD`, else a prompt.
pub async fn login(app: &mut App, username: &str, password: Option<String>) -> Result<()> {
    app.require_notifications().await?;

    let password = match password {
        Some(password) => password,
        None => read_password()?,
    };

    match app.session.login(username, &password).await {
        Ok(principal) => {
            println!(
                "✔ Logged in as {} ({})",
                principal.display_name(),
                principal.role
            );
            Ok(())
        }
        Err(SessionError::Gateway(GatewayError::Auth(message))) => {
            bail!("Login failed: {}", message)
        }
        Err(e) => Err(e.into()),
    }
}

pub fn logout(app: &mut App) -> Result<()> {
    let was = app.session.current().map(|p| p.username.clone());
    app.session.logout()?;
    match was {
        Some(username) => println!("✔ Logged out {}", username),
        None => println!("Not logged in."),
    }
    Ok(())
}

pub fn whoami(app: &App) -> Result<()> {
    let Some(principal) = app.session.current() else {
        println!("Not logged in.");
        return Ok(());
    };

    println!("{}", principal.display_name());
    println!("  Username: {}", principal.username);
    println!("  Role:     {}", principal.role);
    println!("  Id:       {}", principal.id);
    let screens: Vec<_> = navigation(principal.role)
        .into_iter()
        .map(|(_, label)| label)
        .collect();
    println!("  Screens:  {}", screens.join(", "));
    Ok(())
}

/// Prompt without echo on a terminal; read one line from piped stdin.
fn read_password() -> Result<String> {
    let stdin = std::io::stdin();
    let password = if stdin.is_terminal() {
        rpassword::prompt_password("Password: ").context("Failed to read password")?
    } else {
        read_password_line(stdin.lock())?
    };
    if password.is_empty() {
        bail!("Password is required");
    }
    Ok(password)
}

fn read_password_line(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("Failed to read password")?;
    Ok(line.trim_end_matches(['\r', '\n']).to_string())
}
