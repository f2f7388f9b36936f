//! `bugdesk notifications ...` command implementations.
//!
//! These commands manage the permission itself, so they are not gated by it.

use crate::app::App;
use crate::permission::FilePermissionProvider;
use anyhow::Result;
use bugdesk_policy::{GateOutcome, NotificationGate, NotificationPermission, PermissionProvider};

fn print_outcome(outcome: &GateOutcome) {
    match outcome {
        GateOutcome::Unblocked => println!("✔ Notifications are enabled."),
        GateOutcome::Prompt => {
            println!("Notifications have not been enabled yet.");
            println!("Run `bugdesk notifications allow` to enable them.");
        }
        GateOutcome::Blocked { remediation } => println!("⚠️  {}", remediation),
    }
}

pub async fn status(app: &App) -> Result<()> {
    let permission = app.permission().current().await;
    println!("Permission: {}", permission);
    println!("Stored in:  {}", app.permission().path().display());
    print_outcome(&NotificationGate::<FilePermissionProvider>::outcome_for(permission));
    Ok(())
}

/// Answer the permission request. An earlier denial is not overridden.
pub async fn decide(app: &App, answer: NotificationPermission) -> Result<()> {
    let provider = FilePermissionProvider::new(&app.config.session.directory).answering(answer);
    let outcome = NotificationGate::new(provider).request().await;
    print_outcome(&outcome);
    Ok(())
}

pub fn reset(app: &App) -> Result<()> {
    if app.permission().reset()? {
        println!("✔ Notification permission reset. You will be asked again.");
    } else {
        println!("Notification permission was not set.");
    }
    Ok(())
}
