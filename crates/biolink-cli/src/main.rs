//! Biolink CLI
//!
//! Command-line interface for Biolink - link-in-bio profile management.

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tokio::sync::mpsc::UnboundedReceiver;
use tracing_subscriber::EnvFilter;
use uuid::Uuid;

use biolink_core::{ChannelNotifier, Config, Notice, RecordBackend, Session, SqliteBackend};

mod commands;
mod output;

use output::{Output, OutputFormat};

#[derive(Parser)]
#[command(name = "biolink")]
#[command(about = "Biolink - link-in-bio profile management")]
#[command(version)]
#[command(propagate_version = true)]
struct Cli {
    /// Output as JSON
    #[arg(long, global = true)]
    json: bool,

    /// Quiet mode - minimal output
    #[arg(short, long, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create your profile (first-time setup)
    Init {
        /// Public handle for the profile
        #[arg(long)]
        username: String,
        /// Display name shown on the public page
        #[arg(long)]
        name: Option<String>,
    },
    /// Manage links
    Link {
        #[command(subcommand)]
        command: LinkCommands,
    },
    /// Show or edit the profile
    Profile {
        #[command(subcommand)]
        command: Option<ProfileCommands>,
    },
    /// Manage the public handle
    Username {
        #[command(subcommand)]
        command: UsernameCommands,
    },
    /// List or select themes
    Theme {
        #[command(subcommand)]
        command: Option<ThemeCommands>,
    },
    /// Render a public profile page
    View {
        /// Username of the profile to view
        username: String,
    },
    /// Show traffic analytics
    Analytics,
    /// Show or set configuration
    Config {
        #[command(subcommand)]
        command: Option<ConfigCommands>,
    },
    /// Show status (profile, storage, public URL)
    Status,
}

#[derive(Subcommand)]
enum LinkCommands {
    /// Add a new link with default content
    #[command(alias = "create")]
    Add,
    /// List links in display order
    #[command(alias = "ls")]
    List,
    /// Show link details
    Show {
        /// Link ID (full UUID or prefix)
        id: String,
    },
    /// Edit link fields
    Edit {
        /// Link ID (full UUID or prefix)
        id: String,
        /// New title
        #[arg(short, long)]
        title: Option<String>,
        /// New URL
        #[arg(short, long)]
        url: Option<String>,
        /// New icon (instagram, github, mail, ... or globe)
        #[arg(short, long)]
        icon: Option<String>,
        /// Show or hide on the public page
        #[arg(short, long)]
        active: Option<bool>,
    },
    /// Delete a link
    #[command(alias = "rm")]
    Delete {
        /// Link ID (full UUID or prefix)
        id: String,
    },
    /// Move a link up or down one slot
    Move {
        /// Link ID (full UUID or prefix)
        id: String,
        /// Direction to move
        #[arg(value_parser = ["up", "down"])]
        direction: String,
    },
}

#[derive(Subcommand, Clone)]
enum ProfileCommands {
    /// Show the profile
    Show,
    /// Set a profile field
    Set {
        /// Field (display_name, bio, avatar_url, theme)
        key: String,
        /// New value
        value: String,
    },
}

#[derive(Subcommand, Clone)]
enum UsernameCommands {
    /// Change the public handle
    Set {
        /// New username
        username: String,
    },
    /// Check whether a username is available
    Check {
        /// Candidate username
        username: String,
    },
}

#[derive(Subcommand, Clone)]
enum ThemeCommands {
    /// List all themes
    List,
    /// Select a theme
    Set {
        /// Theme tag (deep-space, nebula, midnight, aurora)
        theme: String,
    },
}

#[derive(Subcommand, Clone)]
enum ConfigCommands {
    /// Show current configuration
    Show,
    /// Set a configuration value
    Set {
        /// Configuration key (data_dir, base_url)
        key: String,
        /// Configuration value
        value: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let output = Output::new(OutputFormat::from_flags(cli.json, cli.quiet));

    // Commands that don't need a profile session
    match &cli.command {
        Commands::Config { command } => {
            return handle_config_command(command.clone(), &output);
        }
        Commands::Analytics => {
            return commands::analytics::show(&output);
        }
        _ => {}
    }

    let config = Config::load()?;
    tracing::debug!(data_dir = %config.data_dir.display(), "configuration loaded");
    let backend = Arc::new(SqliteBackend::open(&config.sqlite_path())?);

    match cli.command {
        Commands::Init { username, name } => {
            return commands::init::run(&config, backend, username, name, &output).await;
        }
        Commands::View { username } => {
            return commands::view::show(&config, backend, &username, &output).await;
        }
        Commands::Username {
            command: UsernameCommands::Check { username },
        } => {
            return commands::username::check(backend, &username, &output).await;
        }
        Commands::Theme {
            command: Some(ThemeCommands::List) | None,
        } => {
            // Mark the current theme when a profile exists; listing still
            // works before init
            let selected = match current_user(&config) {
                Ok(user_id) => backend
                    .load_profile(user_id)
                    .await
                    .ok()
                    .map(|p| p.theme_id.as_tag()),
                Err(_) => None,
            };
            return commands::theme::list(selected, &output);
        }
        command => {
            let user_id = current_user(&config)?;
            let (notifier, rx) = ChannelNotifier::pair();
            let mut session = Session::load(backend, Arc::new(notifier), user_id)
                .await
                .context("Failed to load profile. Run 'biolink init' first.")?;
            let mut notices = NoticeDrain::new(rx);

            let result = match command {
                Commands::Link { command } => {
                    handle_link_command(command, &mut session, &output).await
                }
                Commands::Profile { command } => {
                    handle_profile_command(command, &mut session, &output).await
                }
                Commands::Username {
                    command: UsernameCommands::Set { username },
                } => commands::username::set(&mut session, &username, &output).await,
                Commands::Theme {
                    command: Some(ThemeCommands::Set { theme }),
                } => commands::theme::set(&mut session, &theme, &output).await,
                Commands::Status => commands::status::show(&config, &session, &output),
                // Remaining variants are handled before the session is opened
                _ => unreachable!(),
            };

            notices.drain(&output);
            result
        }
    }
}

async fn handle_link_command(
    command: LinkCommands,
    session: &mut Session,
    output: &Output,
) -> Result<()> {
    match command {
        LinkCommands::Add => commands::link::add(session, output).await,
        LinkCommands::List => commands::link::list(session, output),
        LinkCommands::Show { id } => commands::link::show(session, &id, output),
        LinkCommands::Edit {
            id,
            title,
            url,
            icon,
            active,
        } => commands::link::edit(session, &id, title, url, icon, active, output).await,
        LinkCommands::Delete { id } => commands::link::delete(session, &id, output).await,
        LinkCommands::Move { id, direction } => {
            commands::link::mv(session, &id, &direction, output).await
        }
    }
}

async fn handle_profile_command(
    command: Option<ProfileCommands>,
    session: &mut Session,
    output: &Output,
) -> Result<()> {
    match command {
        Some(ProfileCommands::Show) | None => commands::profile::show(session, output),
        Some(ProfileCommands::Set { key, value }) => {
            commands::profile::set(session, &key, value, output).await
        }
    }
}

fn handle_config_command(command: Option<ConfigCommands>, output: &Output) -> Result<()> {
    match command {
        Some(ConfigCommands::Show) | None => commands::config::show(output),
        Some(ConfigCommands::Set { key, value }) => commands::config::set(key, value, output),
    }
}

/// Read the current user id written by `biolink init`
fn current_user(config: &Config) -> Result<Uuid> {
    let path = config.current_user_path();
    let raw = read_current_user(&path)
        .with_context(|| "No profile found. Run 'biolink init' first.".to_string())?;
    Uuid::parse_str(raw.trim())
        .with_context(|| format!("Corrupt profile marker: {}", path.display()))
}

fn read_current_user(path: &PathBuf) -> std::io::Result<String> {
    std::fs::read_to_string(path)
}

/// Collects notices emitted during a mutation and prints them at the end
struct NoticeDrain {
    rx: UnboundedReceiver<Notice>,
}

impl NoticeDrain {
    fn new(rx: UnboundedReceiver<Notice>) -> Self {
        Self { rx }
    }

    fn drain(&mut self, output: &Output) {
        while let Ok(notice) = self.rx.try_recv() {
            output.print_notice(&notice);
        }
    }
}

fn init_logging() {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new("biolink_core=warn,biolink_cli=warn"));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .try_init();
}
