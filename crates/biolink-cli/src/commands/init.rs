//! First-time setup command handler

use std::sync::Arc;

use anyhow::{bail, Context, Result};

use biolink_core::models::NewProfile;
use biolink_core::render::profile_url;
use biolink_core::theme::ThemeId;
use biolink_core::validate::{sanitize_username, validate_username};
use biolink_core::{Config, RecordBackend};

use crate::output::Output;

/// Create the local profile and mark it as current
pub async fn run(
    config: &Config,
    backend: Arc<dyn RecordBackend>,
    username: String,
    name: Option<String>,
    output: &Output,
) -> Result<()> {
    let marker = config.current_user_path();
    if marker.exists() {
        let existing = std::fs::read_to_string(&marker)
            .with_context(|| format!("Failed to read {}", marker.display()))?;
        println!();
        println!("Already initialized.");
        println!("Profile id: {}", existing.trim());
        println!();
        println!("To start fresh, remove:");
        println!("  {}", config.data_dir.display());
        return Ok(());
    }

    let username = sanitize_username(&username);
    validate_username(&username)?;

    if backend.username_exists(&username).await? {
        bail!("Username '{}' is already taken", username);
    }

    let display_name = name.unwrap_or_else(|| username.clone());
    let profile = backend
        .create_profile(&NewProfile {
            username: username.clone(),
            display_name,
            bio: String::new(),
            avatar_url: String::new(),
            theme_id: ThemeId::DeepSpace,
        })
        .await?;

    std::fs::write(&marker, profile.id.to_string())
        .with_context(|| format!("Failed to write {}", marker.display()))?;

    if output.is_json() {
        println!(
            "{}",
            serde_json::json!({
                "id": profile.id,
                "username": profile.username,
                "public_url": profile_url(&config.base_url, &profile.username),
            })
        );
    } else if output.is_quiet() {
        println!("{}", profile.id);
    } else {
        output.success(&format!("Created profile @{}", profile.username));
        println!(
            "Public page: {}",
            profile_url(&config.base_url, &profile.username)
        );
        println!();
        println!("Next steps:");
        println!("  biolink link add");
        println!("  biolink profile set bio \"Hello!\"");
        println!("  biolink theme list");
    }

    Ok(())
}
