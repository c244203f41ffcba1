//! Output formatting for CLI
//!
//! Provides consistent output formatting across all commands:
//! - Human-readable default output
//! - JSON output (--json flag)
//! - Quiet mode for scripting (--quiet flag)

use biolink_core::{LinkItem, Notice, PublicProfile, Severity, Theme, UserProfile};

/// Output format options
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    /// Human-readable output (default)
    Human,
    /// JSON output
    Json,
    /// Quiet mode - minimal output
    Quiet,
}

impl OutputFormat {
    /// Create format from CLI flags
    pub fn from_flags(json: bool, quiet: bool) -> Self {
        if quiet {
            OutputFormat::Quiet
        } else if json {
            OutputFormat::Json
        } else {
            OutputFormat::Human
        }
    }
}

/// Output helper for consistent formatting
pub struct Output {
    /// The output format
    pub format: OutputFormat,
}

impl Output {
    pub fn new(format: OutputFormat) -> Self {
        Self { format }
    }

    /// Check if output is in quiet mode
    pub fn is_quiet(&self) -> bool {
        matches!(self.format, OutputFormat::Quiet)
    }

    /// Check if output is JSON
    pub fn is_json(&self) -> bool {
        matches!(self.format, OutputFormat::Json)
    }

    /// Print a single link
    pub fn print_link(&self, link: &LinkItem) {
        match self.format {
            OutputFormat::Human => {
                println!("ID:       {}", link.id);
                println!("Title:    {}", link.title);
                println!("URL:      {}", link.url);
                println!("Icon:     {}", link.icon);
                println!("Active:   {}", if link.active { "yes" } else { "no" });
                println!("Position: {}", link.position);
                println!("Clicks:   {}", link.clicks);
                println!("Created:  {}", link.created_at.format("%Y-%m-%d %H:%M"));
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(link).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", link.id);
            }
        }
    }

    /// Print the link list in display order
    pub fn print_links(&self, links: &[LinkItem]) {
        match self.format {
            OutputFormat::Human => {
                if links.is_empty() {
                    println!("No links yet.");
                    return;
                }
                for link in links {
                    let state = if link.active { " " } else { "×" };
                    println!(
                        "{} {} [{}] {} | {}",
                        link.position,
                        state,
                        &link.id.to_string()[..8],
                        truncate(&link.title, 30),
                        truncate(&link.url, 45)
                    );
                }
                println!("\n{} link(s)", links.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(links).unwrap());
            }
            OutputFormat::Quiet => {
                for link in links {
                    println!("{}", link.id);
                }
            }
        }
    }

    /// Print the profile (dashboard view, includes inactive links)
    pub fn print_profile(&self, profile: &UserProfile) {
        match self.format {
            OutputFormat::Human => {
                println!("Username:     {}", profile.username);
                println!("Display name: {}", profile.display_name);
                println!("Bio:          {}", profile.bio);
                println!(
                    "Avatar:       {}",
                    if profile.avatar_url.is_empty() {
                        "(none)"
                    } else {
                        &profile.avatar_url
                    }
                );
                println!("Theme:        {}", profile.theme_id);
                println!("Views:        {}", profile.views);
                println!("Links:        {}", profile.links.len());
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(profile).unwrap());
            }
            OutputFormat::Quiet => {
                println!("{}", profile.username);
            }
        }
    }

    /// Print a public profile page the way visitors see it
    pub fn print_public_profile(&self, view: &PublicProfile, url: &str) {
        match self.format {
            OutputFormat::Human => {
                println!("{}", url);
                println!();
                let name = if view.display_name.is_empty() {
                    &view.username
                } else {
                    &view.display_name
                };
                println!("  {}", name);
                println!("  @{}", view.username);
                if !view.bio.is_empty() {
                    println!("  {}", view.bio);
                }
                println!("  theme: {}", view.theme.name);
                println!();
                if view.links.is_empty() {
                    println!("  (no links)");
                } else {
                    for link in &view.links {
                        println!("  [{}] {} -> {}", link.icon, link.title, link.url);
                    }
                }
                println!();
                println!("{} view(s)", view.views);
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(view).unwrap());
            }
            OutputFormat::Quiet => {
                for link in &view.links {
                    println!("{}", link.url);
                }
            }
        }
    }

    /// Print the theme catalog
    pub fn print_themes(&self, themes: &[Theme], selected: Option<&str>) {
        match self.format {
            OutputFormat::Human => {
                for theme in themes {
                    println!("{}", theme_row(theme, selected));
                }
            }
            OutputFormat::Json => {
                println!("{}", serde_json::to_string_pretty(themes).unwrap());
            }
            OutputFormat::Quiet => {
                for theme in themes {
                    println!("{}", theme.id.as_tag());
                }
            }
        }
    }

    /// Print a notice emitted during a mutation
    pub fn print_notice(&self, notice: &Notice) {
        match self.format {
            OutputFormat::Human => match notice.severity {
                Severity::Success => println!("✓ {}", notice.message),
                Severity::Error => eprintln!("✗ {}", notice.message),
            },
            OutputFormat::Json => {
                let status = match notice.severity {
                    Severity::Success => "success",
                    Severity::Error => "error",
                };
                println!(
                    "{}",
                    serde_json::json!({"status": status, "message": notice.message})
                );
            }
            OutputFormat::Quiet => {
                if notice.severity == Severity::Error {
                    eprintln!("{}", notice.message);
                }
            }
        }
    }

    /// Print a success message
    pub fn success(&self, message: &str) {
        match self.format {
            OutputFormat::Human => println!("✓ {}", message),
            OutputFormat::Json => {
                println!(
                    "{}",
                    serde_json::json!({"status": "success", "message": message})
                );
            }
            OutputFormat::Quiet => {}
        }
    }

    /// Check if we should prompt for confirmation
    pub fn should_prompt(&self) -> bool {
        self.format == OutputFormat::Human
    }

    /// Print an informational message
    pub fn message(&self, msg: &str) {
        match self.format {
            OutputFormat::Human => println!("{}", msg),
            OutputFormat::Json => {
                println!("{}", serde_json::json!({"message": msg}));
            }
            OutputFormat::Quiet => {}
        }
    }
}

/// One theme catalog row, with the current theme marked
fn theme_row(theme: &Theme, selected: Option<&str>) -> String {
    let marker = if Some(theme.id.as_tag()) == selected {
        "*"
    } else {
        " "
    };
    format!(
        "{} {:<12} {} | background {}",
        marker,
        theme.id.as_tag(),
        theme.name,
        theme.background
    )
}

/// Truncate a string to max characters, adding "..." if truncated
///
/// Counts chars, not bytes; titles are free-form and often accented.
fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}
