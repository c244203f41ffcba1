//! In-memory record backend
//!
//! Implements the persistence contract over plain collections, records
//! every call it receives, and can be told to fail reads or writes.
//! This is what the session tests run against: they assert on the call
//! log (how many position updates were issued) and on stored rows
//! (whether local optimistic state diverged).

use std::collections::HashMap;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::Utc;
use uuid::Uuid;

use super::{BackendError, BackendResult, RecordBackend};
use crate::models::{LinkField, LinkItem, NewLink, NewProfile, ProfileField, UserProfile};

/// One recorded backend call
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum BackendCall {
    CreateProfile { username: String },
    LoadProfile(Uuid),
    FindProfile(String),
    LoadLinks(Uuid),
    InsertLink { user_id: Uuid, position: u32 },
    UpdateLinkField { id: Uuid, column: &'static str },
    DeleteLink(Uuid),
    UpdateProfileField { column: &'static str },
    UpdateUsername(String),
    UsernameExists(String),
}

#[derive(Default)]
struct Inner {
    profiles: HashMap<Uuid, UserProfile>,
    links: HashMap<Uuid, Vec<LinkItem>>,
    calls: Vec<BackendCall>,
    fail_writes: bool,
    fail_reads: bool,
}

/// In-memory backend with call recording and failure injection
#[derive(Default)]
pub struct MemoryBackend {
    inner: Mutex<Inner>,
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a profile (and its links) directly, bypassing recording
    pub fn seed_profile(&self, profile: UserProfile) {
        let mut inner = self.inner.lock().unwrap();
        let mut profile = profile;
        let links = std::mem::take(&mut profile.links);
        inner.links.insert(profile.id, links);
        inner.profiles.insert(profile.id, profile);
    }

    /// Make all subsequent write operations fail
    pub fn fail_writes(&self, fail: bool) {
        self.inner.lock().unwrap().fail_writes = fail;
    }

    /// Make all subsequent read operations fail
    pub fn fail_reads(&self, fail: bool) {
        self.inner.lock().unwrap().fail_reads = fail;
    }

    /// All calls received so far, in order
    pub fn calls(&self) -> Vec<BackendCall> {
        self.inner.lock().unwrap().calls.clone()
    }

    /// Forget recorded calls (keeps data)
    pub fn clear_calls(&self) {
        self.inner.lock().unwrap().calls.clear();
    }

    /// Number of position-column updates issued so far
    pub fn position_update_count(&self) -> usize {
        self.inner
            .lock()
            .unwrap()
            .calls
            .iter()
            .filter(|c| matches!(c, BackendCall::UpdateLinkField { column: "position", .. }))
            .count()
    }

    /// Stored link rows for a user, in position order
    pub fn stored_links(&self, user_id: Uuid) -> Vec<LinkItem> {
        let inner = self.inner.lock().unwrap();
        let mut links = inner.links.get(&user_id).cloned().unwrap_or_default();
        links.sort_by_key(|l| l.position);
        links
    }

    /// Stored profile row for a user
    pub fn stored_profile(&self, user_id: Uuid) -> Option<UserProfile> {
        self.inner.lock().unwrap().profiles.get(&user_id).cloned()
    }

    fn record(inner: &mut Inner, call: BackendCall) {
        inner.calls.push(call);
    }

    fn check_write(inner: &Inner) -> BackendResult<()> {
        if inner.fail_writes {
            return Err(BackendError::Unavailable {
                reason: "injected write failure".to_string(),
            });
        }
        Ok(())
    }

    fn check_read(inner: &Inner) -> BackendResult<()> {
        if inner.fail_reads {
            return Err(BackendError::Unavailable {
                reason: "injected read failure".to_string(),
            });
        }
        Ok(())
    }
}

#[async_trait]
impl RecordBackend for MemoryBackend {
    async fn create_profile(&self, profile: &NewProfile) -> BackendResult<UserProfile> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(
            &mut inner,
            BackendCall::CreateProfile {
                username: profile.username.clone(),
            },
        );
        Self::check_write(&inner)?;

        if inner
            .profiles
            .values()
            .any(|p| p.username == profile.username)
        {
            return Err(BackendError::Conflict { field: "username" });
        }

        let created = UserProfile {
            id: Uuid::new_v4(),
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            bio: profile.bio.clone(),
            avatar_url: profile.avatar_url.clone(),
            theme_id: profile.theme_id,
            views: 0,
            links: Vec::new(),
            created_at: Utc::now(),
        };
        inner.links.insert(created.id, Vec::new());
        inner.profiles.insert(created.id, created.clone());
        Ok(created)
    }

    async fn load_profile(&self, user_id: Uuid) -> BackendResult<UserProfile> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(&mut inner, BackendCall::LoadProfile(user_id));
        Self::check_read(&inner)?;

        inner
            .profiles
            .get(&user_id)
            .cloned()
            .ok_or(BackendError::NotFound {
                entity: "user",
                id: user_id.to_string(),
            })
    }

    async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> BackendResult<Option<UserProfile>> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(&mut inner, BackendCall::FindProfile(username.to_string()));
        Self::check_read(&inner)?;

        Ok(inner
            .profiles
            .values()
            .find(|p| p.username == username)
            .cloned())
    }

    async fn load_links(&self, user_id: Uuid) -> BackendResult<Vec<LinkItem>> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(&mut inner, BackendCall::LoadLinks(user_id));
        Self::check_read(&inner)?;

        let mut links = inner.links.get(&user_id).cloned().unwrap_or_default();
        links.sort_by_key(|l| l.position);
        Ok(links)
    }

    async fn insert_link(&self, user_id: Uuid, link: &NewLink) -> BackendResult<LinkItem> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(
            &mut inner,
            BackendCall::InsertLink {
                user_id,
                position: link.position,
            },
        );
        Self::check_write(&inner)?;

        let created = LinkItem {
            id: Uuid::new_v4(),
            title: link.title.clone(),
            url: link.url.clone(),
            icon: link.icon,
            active: link.active,
            position: link.position,
            clicks: 0,
            created_at: Utc::now(),
        };
        inner.links.entry(user_id).or_default().push(created.clone());
        Ok(created)
    }

    async fn update_link_field(&self, id: Uuid, field: &LinkField) -> BackendResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(
            &mut inner,
            BackendCall::UpdateLinkField {
                id,
                column: field.column(),
            },
        );
        Self::check_write(&inner)?;

        for links in inner.links.values_mut() {
            if let Some(link) = links.iter_mut().find(|l| l.id == id) {
                field.apply(link);
                return Ok(());
            }
        }
        // Matching the remote contract: updating a missing row is not an error
        Ok(())
    }

    async fn delete_link(&self, id: Uuid) -> BackendResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(&mut inner, BackendCall::DeleteLink(id));
        Self::check_write(&inner)?;

        for links in inner.links.values_mut() {
            links.retain(|l| l.id != id);
        }
        Ok(())
    }

    async fn update_profile_field(
        &self,
        user_id: Uuid,
        field: &ProfileField,
    ) -> BackendResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(
            &mut inner,
            BackendCall::UpdateProfileField {
                column: field.column(),
            },
        );
        Self::check_write(&inner)?;

        if let Some(profile) = inner.profiles.get_mut(&user_id) {
            field.apply(profile);
        }
        Ok(())
    }

    async fn update_username(&self, user_id: Uuid, username: &str) -> BackendResult<()> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(&mut inner, BackendCall::UpdateUsername(username.to_string()));
        Self::check_write(&inner)?;

        let taken = inner
            .profiles
            .iter()
            .any(|(id, p)| *id != user_id && p.username == username);
        if taken {
            return Err(BackendError::Conflict { field: "username" });
        }

        if let Some(profile) = inner.profiles.get_mut(&user_id) {
            profile.username = username.to_string();
        }
        Ok(())
    }

    async fn username_exists(&self, username: &str) -> BackendResult<bool> {
        let mut inner = self.inner.lock().unwrap();
        Self::record(&mut inner, BackendCall::UsernameExists(username.to_string()));
        Self::check_read(&inner)?;

        Ok(inner.profiles.values().any(|p| p.username == username))
    }
}
