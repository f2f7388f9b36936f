//! File-backed notification permission.
//!
//! The decision lives in `<session dir>/notification_permission.json`.
//! Deleting that file (`bugdesk notifications reset`) returns the client to
//! the undetermined state.

use async_trait::async_trait;
use bugdesk_policy::{NotificationPermission, PermissionProvider};
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::{BufRead, IsTerminal, Write};
use std::path::{Path, PathBuf};

pub const PERMISSION_FILE: &str = "notification_permission.json";

#[derive(Serialize, Deserialize)]
struct Stored {
    permission: NotificationPermission,
}

pub struct FilePermissionProvider {
    path: PathBuf,
    /// Answer used instead of an interactive prompt.
    answer: Option<NotificationPermission>,
}

impl FilePermissionProvider {
    pub fn new(session_dir: &Path) -> Self {
        Self {
            path: session_dir.join(PERMISSION_FILE),
            answer: None,
        }
    }

    /// Answer the next prompt with `permission` instead of asking.
    pub fn answering(mut self, permission: NotificationPermission) -> Self {
        self.answer = Some(permission);
        self
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> NotificationPermission {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(_) => return NotificationPermission::Undetermined,
        };
        match serde_json::from_str::<Stored>(&raw) {
            Ok(stored) => stored.permission,
            Err(e) => {
                tracing::warn!(path = %self.path.display(), error = %e, "Ignoring unreadable permission file");
                NotificationPermission::Undetermined
            }
        }
    }

    fn write(&self, permission: NotificationPermission) {
        let result = self
            .path
            .parent()
            .map_or(Ok(()), fs::create_dir_all)
            .and_then(|()| {
                let json = serde_json::to_string(&Stored { permission })?;
                fs::write(&self.path, json)
            });
        if let Err(e) = result {
            tracing::warn!(path = %self.path.display(), error = %e, "Failed to persist notification permission");
        }
    }

    /// Forget the stored decision.
    pub fn reset(&self) -> std::io::Result<bool> {
        match fs::remove_file(&self.path) {
            Ok(()) => Ok(true),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(false),
            Err(e) => Err(e),
        }
    }
}

/// Ask on the terminal. Non-interactive sessions stay undetermined.
fn prompt() -> NotificationPermission {
    let stdin = std::io::stdin();
    if !stdin.is_terminal() {
        return NotificationPermission::Undetermined;
    }

    print!("Bugdesk needs notification permission to continue. Allow notifications? [y/N] ");
    if std::io::stdout().flush().is_err() {
        return NotificationPermission::Undetermined;
    }

    let mut line = String::new();
    match stdin.lock().read_line(&mut line) {
        Ok(_) if matches!(line.trim().to_ascii_lowercase().as_str(), "y" | "yes") => {
            NotificationPermission::Granted
        }
        Ok(_) => NotificationPermission::Denied,
        Err(_) => NotificationPermission::Undetermined,
    }
}

#[async_trait]
impl PermissionProvider for FilePermissionProvider {
    async fn current(&self) -> NotificationPermission {
        self.read()
    }

    async fn request(&self) -> NotificationPermission {
        let permission = match self.answer {
            Some(answer) => answer,
            None => tokio::task::spawn_blocking(prompt)
                .await
                .unwrap_or(NotificationPermission::Undetermined),
        };
        if permission != NotificationPermission::Undetermined {
            self.write(permission);
        }
        permission
    }
}
