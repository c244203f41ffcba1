//! Status command handler

use anyhow::Result;

use biolink_core::render::profile_url;
use biolink_core::session::Session;
use biolink_core::Config;

use crate::output::{Output, OutputFormat};

/// Show status information
pub fn show(config: &Config, session: &Session, output: &Output) -> Result<()> {
    let profile = session.profile();
    let db_path = config.sqlite_path();
    let db_size = std::fs::metadata(&db_path).map(|m| m.len()).unwrap_or(0);
    let url = profile_url(&config.base_url, &profile.username);
    let active = profile.links.iter().filter(|l| l.active).count();

    match output.format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::json!({
                    "username": profile.username,
                    "public_url": url,
                    "theme": profile.theme_id.as_tag(),
                    "views": profile.views,
                    "counts": {
                        "links": profile.links.len(),
                        "active": active
                    },
                    "storage": {
                        "database": db_path,
                        "size": db_size
                    }
                })
            );
        }
        OutputFormat::Quiet => {
            println!("{}", url);
        }
        OutputFormat::Human => {
            println!("Biolink Status");
            println!("==============");
            println!();
            println!("Profile:");
            println!("  Handle: @{}", profile.username);
            println!("  Public: {}", url);
            println!("  Theme:  {}", profile.theme_id.as_tag());
            println!("  Views:  {}", profile.views);
            println!();
            println!("Links:");
            println!("  Total:  {}", profile.links.len());
            println!("  Active: {}", active);
            println!();
            println!("Storage:");
            println!("  Database: {}", db_path.display());
            println!("  Size:     {} bytes", db_size);
        }
    }

    Ok(())
}
