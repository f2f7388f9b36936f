use bugdesk_core::{BugdeskConfig, ReportStatus, Role, Severity};
use bugdesk_policy::NotificationPermission;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod permission;

use app::App;
use commands::{dashboard, notifications, reports, session, users};

#[derive(Parser, Debug)]
#[command(name = "bugdesk", version, about = "Bugdesk bug tracker client")]
struct Cli {
    /// Path to a bugdesk.yaml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Log in and remember the session on this machine.
    Login {
        username: String,
        /// Password (prompted for when omitted)
        #[arg(long, env = "BUGDESK_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },

    /// Forget the current session.
    Logout,

    /// Show the logged-in user.
    Whoami,

    /// Summary counts and the most recent reports.
    Dashboard,

    /// Browse, file and triage bug reports.
    Reports {
        #[command(subcommand)]
        cmd: ReportsCommand,
    },

    /// Manage user accounts (operators only).
    Users {
        #[command(subcommand)]
        cmd: UsersCommand,
    },

    /// Notification permission.
    Notifications {
        #[command(subcommand)]
        cmd: NotificationsCommand,
    },
}

#[derive(Subcommand, Debug)]
enum ReportsCommand {
    /// List reports visible to you.
    List {
        /// Match against app, page, description, reporter or id
        #[arg(long)]
        search: Option<String>,

        /// Only reports in this status (open, in_progress, resolved, closed)
        #[arg(long)]
        status: Option<ReportStatus>,
    },

    /// Show one report with its comments.
    Show {
        id: String,

        /// Write the report's screenshots into this directory
        #[arg(long)]
        save_screenshots: Option<PathBuf>,
    },

    /// File a new report.
    Submit {
        #[arg(long)]
        app: String,

        #[arg(long)]
        page: String,

        #[arg(long)]
        url: Option<String>,

        #[arg(long)]
        description: String,

        /// low, medium or high
        #[arg(long, default_value = "medium")]
        severity: Severity,

        /// Screenshot files to attach
        #[arg(long = "attach")]
        attachments: Vec<PathBuf>,
    },

    /// Move a report to any status.
    Status { id: String, status: ReportStatus },

    /// Assign a report to an operator, or clear the assignment.
    Assign {
        id: String,

        /// Username or id of the operator
        #[arg(long, conflicts_with = "clear", required_unless_present = "clear")]
        to: Option<String>,

        #[arg(long, default_value_t = false)]
        clear: bool,
    },

    /// Add a comment to a report.
    Comment { id: String, message: String },
}

#[derive(Subcommand, Debug)]
enum UsersCommand {
    /// List all users.
    List,

    /// Create a user.
    Create {
        username: String,

        #[arg(long, env = "BUGDESK_NEW_PASSWORD", hide_env_values = true)]
        password: String,

        /// Display name
        #[arg(long)]
        name: Option<String>,

        /// operator (developer) or reporter (user)
        #[arg(long, default_value = "reporter")]
        role: Role,
    },

    /// Reset a user's password to the default.
    ResetPassword {
        /// Username or id
        user: String,
    },
}

#[derive(Subcommand, Debug)]
enum NotificationsCommand {
    /// Show the current permission.
    Status,
    /// Grant notification permission.
    Allow,
    /// Deny notification permission.
    Deny,
    /// Forget the recorded decision so it is asked again.
    Reset,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let config = BugdeskConfig::load(cli.config.as_deref())?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.logging.level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let mut app = App::new(config)?;

    match cli.cmd {
        Command::Login { username, password } => {
            session::login(&mut app, &username, password).await?
        }
        Command::Logout => session::logout(&mut app)?,
        Command::Whoami => session::whoami(&app)?,
        Command::Dashboard => dashboard::run(&app).await?,

        Command::Reports { cmd } => match cmd {
            ReportsCommand::List { search, status } => reports::list(&app, search, status).await?,
            ReportsCommand::Show {
                id,
                save_screenshots,
            } => reports::show(&app, &id, save_screenshots).await?,
            ReportsCommand::Submit {
                app: app_name,
                page,
                url,
                description,
                severity,
                attachments,
            } => {
                let args = reports::SubmitArgs {
                    app: app_name,
                    page,
                    url,
                    description,
                    severity,
                    attachments,
                };
                reports::submit(&app, args).await?
            }
            ReportsCommand::Status { id, status } => reports::set_status(&app, &id, status).await?,
            ReportsCommand::Assign { id, to, clear } => {
                let to = if clear { None } else { to };
                reports::assign(&app, &id, to).await?
            }
            ReportsCommand::Comment { id, message } => {
                reports::comment(&app, &id, &message).await?
            }
        },

        Command::Users { cmd } => match cmd {
            UsersCommand::List => users::list(&app).await?,
            UsersCommand::Create {
                username,
                password,
                name,
                role,
            } => users::create(&app, username, password, name, role).await?,
            UsersCommand::ResetPassword { user } => users::reset_password(&app, &user).await?,
        },

        Command::Notifications { cmd } => match cmd {
            NotificationsCommand::Status => notifications::status(&app).await?,
            NotificationsCommand::Allow => {
                notifications::decide(&app, NotificationPermission::Granted).await?
            }
            NotificationsCommand::Deny => {
                notifications::decide(&app, NotificationPermission::Denied).await?
            }
            NotificationsCommand::Reset => notifications::reset(&app)?,
        },
    }

    Ok(())
}
