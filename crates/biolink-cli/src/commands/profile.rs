//! Profile command handlers

use anyhow::{bail, Result};

use biolink_core::models::ProfileField;
use biolink_core::session::Session;
use biolink_core::theme::THEMES;

use crate::output::Output;

/// Show the profile
pub fn show(session: &Session, output: &Output) -> Result<()> {
    output.print_profile(session.profile());
    Ok(())
}

/// Set a profile field
pub async fn set(session: &mut Session, key: &str, value: String, output: &Output) -> Result<()> {
    let field = match key {
        "display_name" | "name" => ProfileField::DisplayName(value.clone()),
        "bio" => ProfileField::Bio(value.clone()),
        "avatar_url" | "avatar" => ProfileField::AvatarUrl(value.clone()),
        "theme" => {
            let theme = THEMES
                .iter()
                .find(|t| t.id.as_tag() == value)
                .ok_or_else(|| {
                    let tags: Vec<_> = THEMES.iter().map(|t| t.id.as_tag()).collect();
                    anyhow::anyhow!("Unknown theme: '{}'. Valid themes: {}", value, tags.join(", "))
                })?;
            ProfileField::Theme(theme.id)
        }
        "username" => {
            bail!("Use 'biolink username set <username>' to change the handle.");
        }
        _ => {
            bail!(
                "Unknown profile field: '{}'\n\
                 Valid fields: display_name, bio, avatar_url, theme",
                key
            );
        }
    };

    let column = field.column();
    session.update_profile(field).await;

    output.success(&format!("Set {} = {}", column, value));
    Ok(())
}
