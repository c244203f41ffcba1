//! Dashboard session
//!
//! [`Session`] is the single entry point for link and profile edits.
//! It owns the loaded [`UserProfile`] (and with it the ordered link
//! sequence), a backend handle, and a notice sink, and enforces the
//! optimistic-update-then-persist contract:
//!
//! - local state mutates synchronously, in dispatch order
//! - the matching persistence call is awaited before the method returns,
//!   so writes for one session issue strictly in dispatch order and a
//!   later edit cannot be overtaken by an earlier one's slower write
//! - a failed write never rolls local state back; it surfaces as a
//!   transient error notice and the in-memory view stays authoritative
//!   until the next full load

use std::sync::Arc;

use thiserror::Error;
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::backend::{BackendError, RecordBackend};
use crate::models::{LinkField, LinkItem, NewLink, ProfileField, UserProfile};
use crate::notify::{Notice, Notify};
use crate::reconcile::reconcile;
use crate::validate::{sanitize_username, validate_username, ValidationError};

/// Initial fetch failed; the caller shows an empty state instead
#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Failed to load profile: {0}")]
    Profile(#[source] BackendError),
    #[error("Failed to load links: {0}")]
    Links(#[source] BackendError),
}

/// Field-level outcome of a username save
#[derive(Error, Debug)]
pub enum UsernameError {
    #[error(transparent)]
    Invalid(#[from] ValidationError),
    #[error("This username is unavailable")]
    Taken,
    #[error(transparent)]
    Backend(#[from] BackendError),
}

/// Which neighbor a link swaps with
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Direction {
    Up,
    Down,
}

/// An authenticated dashboard session over one profile
pub struct Session {
    profile: UserProfile,
    backend: Arc<dyn RecordBackend>,
    notifier: Arc<dyn Notify>,
}

impl Session {
    /// Load the profile and its links for a dashboard session
    ///
    /// Links come back sorted by position ascending.
    pub async fn load(
        backend: Arc<dyn RecordBackend>,
        notifier: Arc<dyn Notify>,
        user_id: Uuid,
    ) -> Result<Self, LoadError> {
        let mut profile = backend
            .load_profile(user_id)
            .await
            .map_err(LoadError::Profile)?;
        profile.links = backend.load_links(user_id).await.map_err(LoadError::Links)?;

        info!(
            user_id = %user_id,
            links = profile.links.len(),
            "session loaded"
        );

        Ok(Self {
            profile,
            backend,
            notifier,
        })
    }

    /// Build a session around an already-loaded profile
    pub fn from_parts(
        profile: UserProfile,
        backend: Arc<dyn RecordBackend>,
        notifier: Arc<dyn Notify>,
    ) -> Self {
        Self {
            profile,
            backend,
            notifier,
        }
    }

    /// The current profile
    pub fn profile(&self) -> &UserProfile {
        &self.profile
    }

    /// The current in-memory link order
    pub fn links(&self) -> &[LinkItem] {
        &self.profile.links
    }

    /// Append a new link with default content
    ///
    /// The link is added optimistically under a provisional id and
    /// persisted; on success the server-assigned record replaces it.
    /// Returns the id of the link now present locally.
    pub async fn add_link(&mut self) -> Uuid {
        let position = self.profile.links.len() as u32;
        let draft = LinkItem::draft(position);
        let draft_id = draft.id;
        self.profile.links.push(draft.clone());

        match self
            .backend
            .insert_link(self.profile.id, &NewLink::from(&draft))
            .await
        {
            Ok(created) => {
                let id = created.id;
                if let Some(index) = self.profile.link_index(draft_id) {
                    self.profile.links[index] = created;
                }
                debug!(link_id = %id, position, "link added");
                self.notifier.push(Notice::success("Link added"));
                id
            }
            Err(e) => {
                warn!(error = %e, "link insert failed; keeping optimistic entry");
                self.notifier.push(Notice::error("Could not save the new link"));
                draft_id
            }
        }
    }

    /// Update one field of a link
    ///
    /// The local change is synchronous; the remote write may fail
    /// independently, in which case a notice is emitted and the local
    /// value stands.
    pub async fn update_link(&mut self, id: Uuid, field: LinkField) {
        let Some(index) = self.profile.link_index(id) else {
            debug!(link_id = %id, "update for unknown link ignored");
            return;
        };
        field.apply(&mut self.profile.links[index]);

        if let Err(e) = self.backend.update_link_field(id, &field).await {
            warn!(link_id = %id, column = field.column(), error = %e, "link update failed");
            self.notifier.push(Notice::error("Could not update the link"));
        }
    }

    /// Remove a link and close the gap it leaves
    pub async fn remove_link(&mut self, id: Uuid) {
        let Some(index) = self.profile.link_index(id) else {
            debug!(link_id = %id, "remove for unknown link ignored");
            return;
        };
        self.profile.links.remove(index);

        match self.backend.delete_link(id).await {
            Ok(()) => self.notifier.push(Notice::success("Link removed")),
            Err(e) => {
                warn!(link_id = %id, error = %e, "link delete failed");
                self.notifier.push(Notice::error("Could not delete the link"));
            }
        }

        self.reconcile_positions().await;
    }

    /// Swap the link at `index` with its neighbor
    ///
    /// No-op at either boundary (`index == 0` for `Up`, the last index
    /// for `Down`) and for an out-of-range index.
    pub async fn move_link(&mut self, index: usize, direction: Direction) {
        let len = self.profile.links.len();
        let neighbor = match direction {
            Direction::Up if index > 0 && index < len => index - 1,
            Direction::Down if index + 1 < len => index + 1,
            _ => return,
        };
        self.profile.links.swap(index, neighbor);

        self.reconcile_positions().await;
    }

    /// Update one profile field (display name, bio, avatar, theme)
    pub async fn update_profile(&mut self, field: ProfileField) {
        field.apply(&mut self.profile);

        match self
            .backend
            .update_profile_field(self.profile.id, &field)
            .await
        {
            Ok(()) => self.notifier.push(Notice::success("Profile updated")),
            Err(e) => {
                warn!(column = field.column(), error = %e, "profile update failed");
                self.notifier.push(Notice::error("Could not update the profile"));
            }
        }
    }

    /// Validate, check availability, and persist a new username
    ///
    /// Validation failures and conflicts come back as field-level errors
    /// and never emit a notice; backend failures emit a notice as well.
    /// Saving the current username is a no-op.
    pub async fn save_username(&mut self, candidate: &str) -> Result<(), UsernameError> {
        let candidate = sanitize_username(candidate);
        validate_username(&candidate)?;

        if candidate == self.profile.username {
            return Ok(());
        }

        let exists = self.backend.username_exists(&candidate).await.map_err(|e| {
            self.notifier.push(Notice::error("Could not reach the server"));
            UsernameError::Backend(e)
        })?;
        if exists {
            return Err(UsernameError::Taken);
        }

        match self
            .backend
            .update_username(self.profile.id, &candidate)
            .await
        {
            Ok(()) => {
                self.profile.username = candidate;
                self.notifier.push(Notice::success("Username updated"));
                Ok(())
            }
            Err(e) if e.is_conflict() => Err(UsernameError::Taken),
            Err(e) => {
                warn!(error = %e, "username update failed");
                self.notifier
                    .push(Notice::error("Could not update the username"));
                Err(UsernameError::Backend(e))
            }
        }
    }

    /// Restore the contiguous-position invariant and persist the deltas
    ///
    /// Issues one field update per link whose stored position is stale;
    /// running it again immediately issues none. Per-element failures
    /// are independent and reported once, and the in-memory order stays
    /// authoritative for the session.
    pub async fn reconcile_positions(&mut self) {
        let updates = reconcile(&mut self.profile.links);
        if updates.is_empty() {
            return;
        }

        let mut failed = false;
        for update in &updates {
            if let Err(e) = self
                .backend
                .update_link_field(update.id, &LinkField::Position(update.position))
                .await
            {
                warn!(link_id = %update.id, position = update.position, error = %e, "position update failed");
                failed = true;
            }
        }

        debug!(updates = updates.len(), "positions reconciled");
        if failed {
            self.notifier
                .push(Notice::error("Some link positions could not be saved"));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::backend::{BackendCall, MemoryBackend};
    use crate::models::Icon;
    use crate::notify::{MemoryNotifier, Severity};
    use crate::theme::ThemeId;
    use crate::models::NewProfile;

    async fn session_with_links(
        count: usize,
    ) -> (Session, Arc<MemoryBackend>, Arc<MemoryNotifier>) {
        let backend = Arc::new(MemoryBackend::new());
        let notifier = Arc::new(MemoryNotifier::new());

        let user = backend
            .create_profile(&NewProfile {
                username: "alice".to_string(),
                display_name: "Alice".to_string(),
                bio: String::new(),
                avatar_url: String::new(),
                theme_id: ThemeId::DeepSpace,
            })
            .await
            .unwrap();

        for i in 0..count {
            let mut draft = LinkItem::draft(i as u32);
            draft.title = format!("link-{i}");
            backend
                .insert_link(user.id, &NewLink::from(&draft))
                .await
                .unwrap();
        }

        let session = Session::load(backend.clone(), notifier.clone(), user.id)
            .await
            .unwrap();
        backend.clear_calls();
        (session, backend, notifier)
    }

    fn titles(session: &Session) -> Vec<&str> {
        session.links().iter().map(|l| l.title.as_str()).collect()
    }

    fn positions(session: &Session) -> Vec<u32> {
        session.links().iter().map(|l| l.position).collect()
    }

    #[tokio::test]
    async fn test_load_sorts_by_position() {
        let (session, ..) = session_with_links(3).await;
        assert_eq!(titles(&session), vec!["link-0", "link-1", "link-2"]);
        assert_eq!(positions(&session), vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn test_load_failure_is_load_error() {
        let backend = Arc::new(MemoryBackend::new());
        let notifier = Arc::new(MemoryNotifier::new());
        backend.fail_reads(true);

        let result = Session::load(backend, notifier, Uuid::new_v4()).await;
        assert!(matches!(result, Err(LoadError::Profile(_))));
    }

    #[tokio::test]
    async fn test_add_link_appends_at_previous_length() {
        let (mut session, backend, _) = session_with_links(2).await;
        let user_id = session.profile().id;

        let id = session.add_link().await;

        // New element appears last with position == previous length
        let last = session.links().last().unwrap();
        assert_eq!(last.id, id);
        assert_eq!(last.position, 2);
        assert_eq!(last.title, "New link");
        assert_eq!(last.url, "https://");
        assert_eq!(last.icon, Icon::Globe);
        assert!(last.active);

        // Server-assigned id was merged into local state
        let stored = backend.stored_links(user_id);
        assert_eq!(stored.len(), 3);
        assert!(stored.iter().any(|l| l.id == id));
    }

    #[tokio::test]
    async fn test_add_link_failure_keeps_optimistic_entry() {
        let (mut session, backend, notifier) = session_with_links(1).await;
        let user_id = session.profile().id;

        backend.fail_writes(true);
        session.add_link().await;

        // Local state has the optimistic entry; storage does not
        assert_eq!(session.links().len(), 2);
        assert_eq!(backend.stored_links(user_id).len(), 1);
        assert_eq!(notifier.count(Severity::Error), 1);
    }

    #[tokio::test]
    async fn test_update_link_persists_single_field() {
        let (mut session, backend, _) = session_with_links(2).await;
        let id = session.links()[0].id;
        let user_id = session.profile().id;

        session
            .update_link(id, LinkField::Title("Portfolio".to_string()))
            .await;

        assert_eq!(session.links()[0].title, "Portfolio");
        assert_eq!(backend.stored_links(user_id)[0].title, "Portfolio");
        assert_eq!(
            backend.calls(),
            vec![BackendCall::UpdateLinkField {
                id,
                column: "title"
            }]
        );
    }

    #[tokio::test]
    async fn test_update_link_failure_keeps_optimistic_value() {
        let (mut session, backend, notifier) = session_with_links(1).await;
        let id = session.links()[0].id;
        let user_id = session.profile().id;

        backend.fail_writes(true);
        session
            .update_link(id, LinkField::Title("X".to_string()))
            .await;

        // Snapshot still shows the optimistic value
        assert_eq!(session.links()[0].title, "X");
        // Storage kept the old value
        assert_eq!(backend.stored_links(user_id)[0].title, "link-0");
        // Exactly one failure notice
        assert_eq!(notifier.count(Severity::Error), 1);
    }

    #[tokio::test]
    async fn test_update_unknown_link_is_ignored() {
        let (mut session, backend, notifier) = session_with_links(1).await;

        session
            .update_link(Uuid::new_v4(), LinkField::Active(false))
            .await;

        assert!(backend.calls().is_empty());
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_remove_middle_issues_one_position_update() {
        // [0:A, 1:B, 2:C], remove B
        let (mut session, backend, _) = session_with_links(3).await;
        let b = session.links()[1].id;
        let c = session.links()[2].id;
        let user_id = session.profile().id;

        session.remove_link(b).await;

        // Local: [0:A, 1:C]
        assert_eq!(titles(&session), vec!["link-0", "link-2"]);
        assert_eq!(positions(&session), vec![0, 1]);

        // Exactly one position update was issued, for C (2 -> 1)
        assert_eq!(backend.position_update_count(), 1);
        assert!(backend.calls().contains(&BackendCall::UpdateLinkField {
            id: c,
            column: "position"
        }));

        // Storage matches
        let stored = backend.stored_links(user_id);
        assert_eq!(stored.len(), 2);
        assert_eq!(stored[1].id, c);
        assert_eq!(stored[1].position, 1);
    }

    #[tokio::test]
    async fn test_move_up_issues_two_position_updates() {
        // [0:A, 1:B, 2:C], move C up
        let (mut session, backend, _) = session_with_links(3).await;

        session.move_link(2, Direction::Up).await;

        assert_eq!(titles(&session), vec!["link-0", "link-2", "link-1"]);
        assert_eq!(positions(&session), vec![0, 1, 2]);
        assert_eq!(backend.position_update_count(), 2);
    }

    #[tokio::test]
    async fn test_move_boundaries_are_noops() {
        let (mut session, backend, _) = session_with_links(3).await;
        let before = titles(&session)
            .iter()
            .map(|s| s.to_string())
            .collect::<Vec<_>>();

        session.move_link(0, Direction::Up).await;
        session.move_link(2, Direction::Down).await;
        session.move_link(7, Direction::Up).await;

        assert_eq!(titles(&session), before);
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_reconciliation_is_idempotent() {
        let (mut session, backend, _) = session_with_links(3).await;
        session.remove_link(session.links()[1].id).await;
        let after_remove = backend.position_update_count();

        // Second pass over an already-contiguous sequence issues nothing
        session.reconcile_positions().await;
        assert_eq!(backend.position_update_count(), after_remove);
    }

    #[tokio::test]
    async fn test_position_failure_reported_once_keeps_local_order() {
        let (mut session, backend, notifier) = session_with_links(4).await;
        let b = session.links()[1].id;

        backend.fail_writes(true);
        session.remove_link(b).await;

        // Delete failed and both position updates failed, but the local
        // order is already reconciled
        assert_eq!(positions(&session), vec![0, 1, 2]);
        // One notice for the delete, one for all position failures together
        assert_eq!(notifier.count(Severity::Error), 2);
        // Both stale positions were still attempted independently
        assert_eq!(backend.position_update_count(), 2);
    }

    #[tokio::test]
    async fn test_update_profile_failure_keeps_optimistic_value() {
        let (mut session, backend, notifier) = session_with_links(0).await;

        backend.fail_writes(true);
        session
            .update_profile(ProfileField::Theme(ThemeId::Midnight))
            .await;

        assert_eq!(session.profile().theme_id, ThemeId::Midnight);
        let stored = backend.stored_profile(session.profile().id).unwrap();
        assert_eq!(stored.theme_id, ThemeId::DeepSpace);
        assert_eq!(notifier.count(Severity::Error), 1);
    }

    #[tokio::test]
    async fn test_update_profile_persists() {
        let (mut session, backend, notifier) = session_with_links(0).await;

        session
            .update_profile(ProfileField::Bio("Building things".to_string()))
            .await;

        assert_eq!(session.profile().bio, "Building things");
        let stored = backend.stored_profile(session.profile().id).unwrap();
        assert_eq!(stored.bio, "Building things");
        assert_eq!(notifier.count(Severity::Success), 1);
    }

    #[tokio::test]
    async fn test_save_username_taken() {
        let (mut session, backend, _) = session_with_links(0).await;
        backend
            .create_profile(&NewProfile {
                username: "taken".to_string(),
                display_name: String::new(),
                bio: String::new(),
                avatar_url: String::new(),
                theme_id: ThemeId::DeepSpace,
            })
            .await
            .unwrap();
        backend.clear_calls();

        let result = session.save_username("taken").await;
        assert!(matches!(result, Err(UsernameError::Taken)));

        // The availability check ran, but no update was attempted
        assert!(backend
            .calls()
            .iter()
            .all(|c| !matches!(c, BackendCall::UpdateUsername(_))));
        assert_eq!(session.profile().username, "alice");
    }

    #[tokio::test]
    async fn test_save_username_available() {
        let (mut session, backend, notifier) = session_with_links(0).await;

        session.save_username("Alice2").await.unwrap();

        // Input was sanitized to lowercase before saving
        assert_eq!(session.profile().username, "alice2");
        let stored = backend.stored_profile(session.profile().id).unwrap();
        assert_eq!(stored.username, "alice2");
        assert_eq!(notifier.count(Severity::Success), 1);
    }

    #[tokio::test]
    async fn test_save_username_invalid_never_reaches_backend() {
        let (mut session, backend, notifier) = session_with_links(0).await;

        let result = session.save_username("ab").await;
        assert!(matches!(result, Err(UsernameError::Invalid(_))));
        assert!(backend.calls().is_empty());
        assert!(notifier.notices().is_empty());
    }

    #[tokio::test]
    async fn test_save_current_username_is_noop() {
        let (mut session, backend, _) = session_with_links(0).await;

        session.save_username("alice").await.unwrap();
        assert!(backend.calls().is_empty());
    }

    #[tokio::test]
    async fn test_contiguity_after_mixed_operations() {
        let (mut session, backend, _) = session_with_links(5).await;
        let user_id = session.profile().id;

        session.add_link().await;
        session.remove_link(session.links()[2].id).await;
        session.move_link(3, Direction::Up).await;
        session.move_link(0, Direction::Down).await;
        session.remove_link(session.links()[0].id).await;

        // Local positions are exactly 0..N-1
        let n = session.links().len() as u32;
        assert_eq!(positions(&session), (0..n).collect::<Vec<_>>());

        // Stored positions match the local order exactly
        let stored = backend.stored_links(user_id);
        let stored_ids: Vec<_> = stored.iter().map(|l| l.id).collect();
        let local_ids: Vec<_> = session.links().iter().map(|l| l.id).collect();
        assert_eq!(stored_ids, local_ids);
        assert_eq!(
            stored.iter().map(|l| l.position).collect::<Vec<_>>(),
            (0..n).collect::<Vec<_>>()
        );
    }

    #[tokio::test]
    async fn test_from_parts_resumes_without_refetch() {
        let backend = Arc::new(MemoryBackend::new());
        let notifier = Arc::new(MemoryNotifier::new());

        let profile = UserProfile {
            id: Uuid::new_v4(),
            username: "carol".to_string(),
            display_name: "Carol".to_string(),
            bio: String::new(),
            avatar_url: String::new(),
            theme_id: ThemeId::DeepSpace,
            views: 0,
            links: vec![LinkItem::draft(0)],
            created_at: chrono::Utc::now(),
        };
        backend.seed_profile(profile.clone());

        let mut session = Session::from_parts(profile, backend.clone(), notifier.clone());
        let id = session.links()[0].id;

        // No load round-trip happened, yet mutations persist normally
        assert!(backend.calls().is_empty());
        session
            .update_link(id, LinkField::Title("Chaîne".to_string()))
            .await;

        let user_id = session.profile().id;
        assert_eq!(backend.stored_links(user_id)[0].title, "Chaîne");
        assert_eq!(
            backend.calls(),
            vec![BackendCall::UpdateLinkField {
                id,
                column: "title"
            }]
        );
    }
}
