//! Link command handlers

use anyhow::{bail, Result};
use uuid::Uuid;

use biolink_core::models::{Icon, LinkField, LinkItem};
use biolink_core::session::{Direction, Session};

use crate::output::Output;

/// Add a new link with default content
pub async fn add(session: &mut Session, output: &Output) -> Result<()> {
    let id = session.add_link().await;

    output.success(&format!("Added link: {}", id));
    if let Some(index) = session.profile().link_index(id) {
        output.print_link(&session.links()[index]);
    }
    Ok(())
}

/// List links in display order
pub fn list(session: &Session, output: &Output) -> Result<()> {
    output.print_links(session.links());
    Ok(())
}

/// Show a single link
pub fn show(session: &Session, id: &str, output: &Output) -> Result<()> {
    let uuid = parse_link_id(id, session.links())?;
    let index = session
        .profile()
        .link_index(uuid)
        .ok_or_else(|| anyhow::anyhow!("Link not found: {}", id))?;

    output.print_link(&session.links()[index]);
    Ok(())
}

/// Edit link fields; each provided flag is persisted on its own
pub async fn edit(
    session: &mut Session,
    id: &str,
    title: Option<String>,
    url: Option<String>,
    icon: Option<String>,
    active: Option<bool>,
    output: &Output,
) -> Result<()> {
    let uuid = parse_link_id(id, session.links())?;

    if title.is_none() && url.is_none() && icon.is_none() && active.is_none() {
        bail!("Nothing to change. Pass --title, --url, --icon or --active.");
    }

    if let Some(title) = title {
        session.update_link(uuid, LinkField::Title(title)).await;
    }
    if let Some(url) = url {
        session.update_link(uuid, LinkField::Url(url)).await;
    }
    if let Some(icon) = icon {
        // Unknown tags fall back to the generic globe
        session
            .update_link(uuid, LinkField::Icon(Icon::from_tag(&icon)))
            .await;
    }
    if let Some(active) = active {
        session.update_link(uuid, LinkField::Active(active)).await;
    }

    if let Some(index) = session.profile().link_index(uuid) {
        output.print_link(&session.links()[index]);
    }
    Ok(())
}

/// Delete a link
pub async fn delete(session: &mut Session, id: &str, output: &Output) -> Result<()> {
    let uuid = parse_link_id(id, session.links())?;
    let index = session
        .profile()
        .link_index(uuid)
        .ok_or_else(|| anyhow::anyhow!("Link not found: {}", id))?;

    if output.should_prompt() {
        let link = &session.links()[index];
        println!("Delete link: {} - {}", &uuid.to_string()[..8], link.title);
        if !confirm("Are you sure?")? {
            println!("Cancelled.");
            return Ok(());
        }
    }

    session.remove_link(uuid).await;
    output.success(&format!("Deleted link: {}", uuid));
    Ok(())
}

/// Move a link up or down one slot
pub async fn mv(session: &mut Session, id: &str, direction: &str, output: &Output) -> Result<()> {
    let uuid = parse_link_id(id, session.links())?;
    let index = session
        .profile()
        .link_index(uuid)
        .ok_or_else(|| anyhow::anyhow!("Link not found: {}", id))?;

    let direction = match direction {
        "up" => Direction::Up,
        "down" => Direction::Down,
        other => bail!("Invalid direction: {}. Use 'up' or 'down'.", other),
    };

    session.move_link(index, direction).await;
    output.print_links(session.links());
    Ok(())
}

/// Parse a link ID (supports full UUID or prefix)
fn parse_link_id(id: &str, links: &[LinkItem]) -> Result<Uuid> {
    // Try full UUID first
    if let Ok(uuid) = Uuid::parse_str(id) {
        return Ok(uuid);
    }

    // Try prefix match
    let matches: Vec<_> = links
        .iter()
        .filter(|l| l.id.to_string().starts_with(id))
        .collect();

    match matches.len() {
        0 => bail!("No link found matching: {}", id),
        1 => Ok(matches[0].id),
        _ => {
            eprintln!("Multiple links match '{}':", id);
            for link in &matches {
                eprintln!("  {} - {}", link.id, link.title);
            }
            bail!("Ambiguous ID. Please provide more characters.");
        }
    }
}

/// Ask a yes/no question on stdin
fn confirm(prompt: &str) -> Result<bool> {
    use std::io::{self, Write};

    print!("{} [y/N]: ", prompt);
    io::stdout().flush()?;

    let mut input = String::new();
    io::stdin().read_line(&mut input)?;

    Ok(matches!(input.trim().to_lowercase().as_str(), "y" | "yes"))
}
