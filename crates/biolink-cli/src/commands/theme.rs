//! Theme command handlers

use anyhow::Result;

use biolink_core::models::ProfileField;
use biolink_core::session::Session;
use biolink_core::theme::THEMES;

use crate::output::Output;

/// List all themes, marking the selected one when known
pub fn list(selected: Option<&str>, output: &Output) -> Result<()> {
    output.print_themes(THEMES, selected);
    Ok(())
}

/// Select a theme
pub async fn set(session: &mut Session, tag: &str, output: &Output) -> Result<()> {
    let theme = THEMES.iter().find(|t| t.id.as_tag() == tag).ok_or_else(|| {
        let tags: Vec<_> = THEMES.iter().map(|t| t.id.as_tag()).collect();
        anyhow::anyhow!("Unknown theme: '{}'. Valid themes: {}", tag, tags.join(", "))
    })?;

    session.update_profile(ProfileField::Theme(theme.id)).await;

    output.success(&format!("Theme set to {}", theme.name));
    Ok(())
}
