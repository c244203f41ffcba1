//! Username command handlers

use std::sync::Arc;

use anyhow::Result;

use biolink_core::session::{Session, UsernameError};
use biolink_core::validate::{sanitize_username, validate_username};
use biolink_core::RecordBackend;

use crate::output::Output;

/// Change the public handle
pub async fn set(session: &mut Session, candidate: &str, output: &Output) -> Result<()> {
    match session.save_username(candidate).await {
        Ok(()) => {
            output.success(&format!("Username is now @{}", session.profile().username));
            Ok(())
        }
        Err(UsernameError::Taken) => {
            anyhow::bail!("Username '{}' is already taken", sanitize_username(candidate))
        }
        Err(e) => Err(e.into()),
    }
}

/// Check whether a username is available
pub async fn check(
    backend: Arc<dyn RecordBackend>,
    candidate: &str,
    output: &Output,
) -> Result<()> {
    let username = sanitize_username(candidate);
    validate_username(&username)?;

    if backend.username_exists(&username).await? {
        output.message(&format!("@{} is taken", username));
    } else {
        output.message(&format!("@{} is available", username));
    }
    Ok(())
}
