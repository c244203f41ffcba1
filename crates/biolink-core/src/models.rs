//! Data models for biolink
//!
//! Defines the core data structures: LinkItem, UserProfile, and the
//! typed single-field updates the persistence layer understands.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::theme::ThemeId;

/// Glyph tag for a link
///
/// Closed set of known platforms; anything unrecognized resolves to
/// [`Icon::Globe`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase", from = "String")]
pub enum Icon {
    Instagram,
    Facebook,
    Twitter,
    Linkedin,
    Github,
    Youtube,
    Tiktok,
    Whatsapp,
    Mail,
    Globe,
}

impl From<String> for Icon {
    fn from(tag: String) -> Self {
        Icon::from_tag(&tag)
    }
}

impl Icon {
    /// Resolve a stored tag to an icon, falling back to `Globe`
    pub fn from_tag(tag: &str) -> Self {
        match tag {
            "instagram" => Icon::Instagram,
            "facebook" => Icon::Facebook,
            "twitter" => Icon::Twitter,
            "linkedin" => Icon::Linkedin,
            "github" => Icon::Github,
            "youtube" => Icon::Youtube,
            "tiktok" => Icon::Tiktok,
            "whatsapp" => Icon::Whatsapp,
            "mail" => Icon::Mail,
            _ => Icon::Globe,
        }
    }

    /// The tag stored in the backend for this icon
    pub fn as_tag(&self) -> &'static str {
        match self {
            Icon::Instagram => "instagram",
            Icon::Facebook => "facebook",
            Icon::Twitter => "twitter",
            Icon::Linkedin => "linkedin",
            Icon::Github => "github",
            Icon::Youtube => "youtube",
            Icon::Tiktok => "tiktok",
            Icon::Whatsapp => "whatsapp",
            Icon::Mail => "mail",
            Icon::Globe => "globe",
        }
    }
}

impl std::fmt::Display for Icon {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_tag())
    }
}

/// One outbound link on a profile
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LinkItem {
    /// Unique identifier, assigned by the backend on insert
    pub id: Uuid,
    /// Display text, user-editable
    pub title: String,
    /// Target address (free-form, not validated here)
    pub url: String,
    /// Glyph tag
    pub icon: Icon,
    /// Inactive links are kept but excluded from public rendering
    pub active: bool,
    /// Zero-based display order within the profile
    pub position: u32,
    /// Click counter, owned by the analytics collaborator
    pub clicks: u64,
    /// When this link was created
    pub created_at: DateTime<Utc>,
}

impl LinkItem {
    /// Create a draft link with default content at the given position
    ///
    /// The id is a client-side provisional one; the backend replaces it
    /// with the server-assigned id when the insert succeeds.
    pub fn draft(position: u32) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: "New link".to_string(),
            url: "https://".to_string(),
            icon: Icon::Globe,
            active: true,
            position,
            clicks: 0,
            created_at: Utc::now(),
        }
    }
}

/// Payload for inserting a link
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NewLink {
    pub title: String,
    pub url: String,
    pub icon: Icon,
    pub active: bool,
    pub position: u32,
}

impl From<&LinkItem> for NewLink {
    fn from(link: &LinkItem) -> Self {
        Self {
            title: link.title.clone(),
            url: link.url.clone(),
            icon: link.icon,
            active: link.active,
            position: link.position,
        }
    }
}

/// A single-field update to a link
///
/// Mutations are field-scoped: the dispatcher applies one of these
/// locally, then persists exactly that field.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkField {
    Title(String),
    Url(String),
    Icon(Icon),
    Active(bool),
    Position(u32),
}

impl LinkField {
    /// Backend column this field maps to
    pub fn column(&self) -> &'static str {
        match self {
            LinkField::Title(_) => "title",
            LinkField::Url(_) => "url",
            LinkField::Icon(_) => "icon",
            LinkField::Active(_) => "active",
            LinkField::Position(_) => "position",
        }
    }

    /// Apply this field to an in-memory link
    pub fn apply(&self, link: &mut LinkItem) {
        match self {
            LinkField::Title(v) => link.title = v.clone(),
            LinkField::Url(v) => link.url = v.clone(),
            LinkField::Icon(v) => link.icon = *v,
            LinkField::Active(v) => link.active = *v,
            LinkField::Position(v) => link.position = *v,
        }
    }
}

/// A single-field update to a profile
///
/// Username is deliberately absent: it carries a uniqueness constraint
/// and goes through `Session::save_username` instead.
#[derive(Debug, Clone, PartialEq)]
pub enum ProfileField {
    DisplayName(String),
    Bio(String),
    AvatarUrl(String),
    Theme(ThemeId),
}

impl ProfileField {
    /// Backend column this field maps to
    pub fn column(&self) -> &'static str {
        match self {
            ProfileField::DisplayName(_) => "display_name",
            ProfileField::Bio(_) => "bio",
            ProfileField::AvatarUrl(_) => "avatar_url",
            ProfileField::Theme(_) => "theme_id",
        }
    }

    /// Apply this field to an in-memory profile
    pub fn apply(&self, profile: &mut UserProfile) {
        match self {
            ProfileField::DisplayName(v) => profile.display_name = v.clone(),
            ProfileField::Bio(v) => profile.bio = v.clone(),
            ProfileField::AvatarUrl(v) => profile.avatar_url = v.clone(),
            ProfileField::Theme(v) => profile.theme_id = *v,
        }
    }
}

/// A user's published page: identity, theme, and ordered links
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UserProfile {
    /// Unique identifier, assigned by the backend at registration
    pub id: Uuid,
    /// Public handle (lowercase alnum/`_`/`-`, length >= 3)
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    /// Selected visual theme
    pub theme_id: ThemeId,
    /// View counter, owned by the analytics collaborator
    pub views: u64,
    /// Ordered link sequence; the profile exclusively owns its links
    pub links: Vec<LinkItem>,
    /// When this profile was created
    pub created_at: DateTime<Utc>,
}

impl UserProfile {
    /// Index of a link by id, if present
    pub fn link_index(&self, id: Uuid) -> Option<usize> {
        self.links.iter().position(|l| l.id == id)
    }
}

/// Payload for creating a profile
#[derive(Debug, Clone)]
pub struct NewProfile {
    pub username: String,
    pub display_name: String,
    pub bio: String,
    pub avatar_url: String,
    pub theme_id: ThemeId,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_icon_tag_round_trip() {
        for icon in [
            Icon::Instagram,
            Icon::Facebook,
            Icon::Twitter,
            Icon::Linkedin,
            Icon::Github,
            Icon::Youtube,
            Icon::Tiktok,
            Icon::Whatsapp,
            Icon::Mail,
            Icon::Globe,
        ] {
            assert_eq!(Icon::from_tag(icon.as_tag()), icon);
        }
    }

    #[test]
    fn test_icon_unknown_tag_falls_back_to_globe() {
        assert_eq!(Icon::from_tag("myspace"), Icon::Globe);
        assert_eq!(Icon::from_tag(""), Icon::Globe);
    }

    #[test]
    fn test_icon_unknown_json_falls_back_to_globe() {
        let icon: Icon = serde_json::from_str("\"friendster\"").unwrap();
        assert_eq!(icon, Icon::Globe);
    }

    #[test]
    fn test_draft_defaults() {
        let draft = LinkItem::draft(3);
        assert_eq!(draft.title, "New link");
        assert_eq!(draft.url, "https://");
        assert_eq!(draft.icon, Icon::Globe);
        assert!(draft.active);
        assert_eq!(draft.position, 3);
        assert_eq!(draft.clicks, 0);
    }

    #[test]
    fn test_link_field_apply() {
        let mut link = LinkItem::draft(0);

        LinkField::Title("Portfolio".to_string()).apply(&mut link);
        LinkField::Url("https://portfolio.example".to_string()).apply(&mut link);
        LinkField::Icon(Icon::Github).apply(&mut link);
        LinkField::Active(false).apply(&mut link);
        LinkField::Position(5).apply(&mut link);

        assert_eq!(link.title, "Portfolio");
        assert_eq!(link.url, "https://portfolio.example");
        assert_eq!(link.icon, Icon::Github);
        assert!(!link.active);
        assert_eq!(link.position, 5);
    }

    #[test]
    fn test_link_field_columns() {
        assert_eq!(LinkField::Title(String::new()).column(), "title");
        assert_eq!(LinkField::Position(0).column(), "position");
        assert_eq!(ProfileField::Theme(ThemeId::Midnight).column(), "theme_id");
        assert_eq!(
            ProfileField::DisplayName(String::new()).column(),
            "display_name"
        );
    }

    #[test]
    fn test_link_serialization() {
        let link = LinkItem::draft(1);
        let json = serde_json::to_string(&link).unwrap();
        let deserialized: LinkItem = serde_json::from_str(&json).unwrap();
        assert_eq!(link, deserialized);
    }
}
