//! `bugdesk dashboard` command implementation.

use crate::app::App;
use crate::commands::reports::print_row;
use bugdesk_core::Principal;
use bugdesk_policy::{Screen, navigation};

/// Reports shown under "Recent".
const RECENT_LIMIT: usize = 5;

pub async fn run(app: &App) -> anyhow::Result<()> {
    let Some(principal) = app.enter(Screen::Dashboard).await? else {
        return Ok(());
    };
    show(app, principal).await
}

/// Render the dashboard for an already-admitted principal.
pub async fn show(app: &App, principal: Principal) -> anyhow::Result<()> {
    let mut desk = app.desk(principal);
    desk.load().await?;
    let stats = desk.stats();

    println!("Welcome, {}", desk.principal().display_name());
    println!();
    println!("  Total:        {}", stats.total);
    println!("  Open:         {}", stats.open);
    println!("  In progress:  {}", stats.in_progress);
    println!("  Resolved:     {}", stats.resolved);
    println!();

    let recent = desk.recent(RECENT_LIMIT);
    if recent.is_empty() {
        println!("No reports yet.");
    } else {
        println!("Recent:");
        for report in recent {
            print_row(report);
        }
    }

    println!();
    let screens: Vec<_> = navigation(desk.principal().role)
        .into_iter()
        .map(|(_, label)| label)
        .collect();
    println!("Available: {}", screens.join(" · "));
    Ok(())
}
