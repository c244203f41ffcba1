//! Public profile rendering
//!
//! Read-only projection of a profile for the `/u/:username` route:
//! identity fields, resolved theme tokens, and the active links in
//! display order. Inactive links are retained in the data model but
//! never rendered.

use serde::Serialize;

use crate::models::{Icon, UserProfile};
use crate::theme::Theme;

/// One rendered link on the public page
#[derive(Debug, Clone, Serialize, PartialEq)]
pub struct PublicLink {
    pub title: String,
    pub url: String,
    pub icon: Icon,
    pub clicks: u64,
}

/// Read-only view of a published profile
#[derive(Debug, Clone, Serialize)]
pub struct PublicProfile {
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub views: u64,
    pub theme: &'static Theme,
    pub links: Vec<PublicLink>,
}

impl PublicProfile {
    /// Project a profile into its public rendering
    pub fn project(profile: &UserProfile) -> Self {
        let mut links: Vec<_> = profile.links.iter().filter(|l| l.active).collect();
        links.sort_by_key(|l| l.position);

        Self {
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            bio: profile.bio.clone(),
            avatar_url: profile.avatar_url.clone(),
            views: profile.views,
            theme: profile.theme_id.tokens(),
            links: links
                .into_iter()
                .map(|l| PublicLink {
                    title: l.title.clone(),
                    url: l.url.clone(),
                    icon: l.icon,
                    clicks: l.clicks,
                })
                .collect(),
        }
    }
}

/// Canonical public URL for a profile (also fed to the QR collaborator)
pub fn profile_url(base: &str, username: &str) -> String {
    format!("{}/u/{}", base.trim_end_matches('/'), username)
}
