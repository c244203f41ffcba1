//! Public page command handler

use std::sync::Arc;

use anyhow::Result;

use biolink_core::render::{profile_url, PublicProfile};
use biolink_core::{Config, RecordBackend};

use crate::output::Output;

/// Render a profile the way a visitor at /u/:username sees it
pub async fn show(
    config: &Config,
    backend: Arc<dyn RecordBackend>,
    username: &str,
    output: &Output,
) -> Result<()> {
    let mut profile = backend
        .find_profile_by_username(username)
        .await?
        .ok_or_else(|| anyhow::anyhow!("No profile found for @{}", username))?;
    profile.links = backend.load_links(profile.id).await?;

    let view = PublicProfile::project(&profile);
    let url = profile_url(&config.base_url, &view.username);

    output.print_public_profile(&view, &url);
    Ok(())
}
