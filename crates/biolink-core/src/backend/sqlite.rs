//! SQLite record backend
//!
//! Local implementation of the persistence contract. One connection,
//! guarded by a mutex; every operation is a single statement.

use std::path::Path;
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rusqlite::{params, Connection, Row};
use tracing::debug;
use uuid::Uuid;

use super::schema;
use super::{BackendError, BackendResult, RecordBackend};
use crate::models::{LinkField, LinkItem, NewLink, NewProfile, ProfileField, UserProfile};
use crate::models::Icon;
use crate::theme::ThemeId;

/// Record backend over a local SQLite database
pub struct SqliteBackend {
    conn: Mutex<Connection>,
}

impl SqliteBackend {
    /// Open (or create) the database at the given path
    pub fn open(path: &Path) -> BackendResult<Self> {
        let conn = Connection::open(path)?;
        Self::with_connection(conn)
    }

    /// Open an in-memory database (used in tests)
    pub fn open_in_memory() -> BackendResult<Self> {
        Self::with_connection(Connection::open_in_memory()?)
    }

    fn with_connection(conn: Connection) -> BackendResult<Self> {
        conn.execute_batch("PRAGMA foreign_keys = ON;")?;
        if schema::needs_init(&conn) {
            schema::init_schema(&conn)?;
        }
        Ok(Self {
            conn: Mutex::new(conn),
        })
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Connection> {
        // Poisoning only happens if another caller panicked mid-statement
        self.conn.lock().unwrap_or_else(|e| e.into_inner())
    }
}

/// Map a constraint violation to a field-level conflict
fn write_error(e: rusqlite::Error, field: &'static str) -> BackendError {
    match &e {
        rusqlite::Error::SqliteFailure(err, _)
            if err.code == rusqlite::ErrorCode::ConstraintViolation =>
        {
            BackendError::Conflict { field }
        }
        _ => BackendError::Database(e),
    }
}

fn uuid_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<Uuid> {
    let s: String = row.get(idx)?;
    Uuid::parse_str(&s).map_err(|e| {
        rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
    })
}

fn timestamp_column(row: &Row<'_>, idx: usize) -> rusqlite::Result<DateTime<Utc>> {
    let s: String = row.get(idx)?;
    DateTime::parse_from_rfc3339(&s)
        .map(|d| d.with_timezone(&Utc))
        .map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(idx, rusqlite::types::Type::Text, Box::new(e))
        })
}

fn link_from_row(row: &Row<'_>) -> rusqlite::Result<LinkItem> {
    let icon: String = row.get(2)?;
    Ok(LinkItem {
        id: uuid_column(row, 0)?,
        title: row.get(1)?,
        icon: Icon::from_tag(&icon),
        url: row.get(3)?,
        active: row.get(4)?,
        position: row.get(5)?,
        clicks: row.get(6)?,
        created_at: timestamp_column(row, 7)?,
    })
}

fn profile_from_row(row: &Row<'_>) -> rusqlite::Result<UserProfile> {
    let theme: String = row.get(5)?;
    Ok(UserProfile {
        id: uuid_column(row, 0)?,
        username: row.get(1)?,
        display_name: row.get(2)?,
        bio: row.get(3)?,
        avatar_url: row.get(4)?,
        theme_id: ThemeId::from_tag(&theme),
        views: row.get(6)?,
        links: Vec::new(),
        created_at: timestamp_column(row, 7)?,
    })
}

const LINK_COLUMNS: &str = "id, title, icon, url, active, position, clicks, created_at";
const PROFILE_COLUMNS: &str =
    "id, username, display_name, bio, avatar_url, theme_id, views, created_at";

#[async_trait]
impl RecordBackend for SqliteBackend {
    async fn create_profile(&self, profile: &NewProfile) -> BackendResult<UserProfile> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        self.lock()
            .execute(
                "INSERT INTO users (id, username, display_name, bio, avatar_url, theme_id, views, created_at)
                 VALUES (?1, ?2, ?3, ?4, ?5, ?6, 0, ?7)",
                params![
                    id.to_string(),
                    profile.username,
                    profile.display_name,
                    profile.bio,
                    profile.avatar_url,
                    profile.theme_id.as_tag(),
                    created_at.to_rfc3339(),
                ],
            )
            .map_err(|e| write_error(e, "username"))?;

        debug!(user_id = %id, username = %profile.username, "created profile");

        Ok(UserProfile {
            id,
            username: profile.username.clone(),
            display_name: profile.display_name.clone(),
            bio: profile.bio.clone(),
            avatar_url: profile.avatar_url.clone(),
            theme_id: profile.theme_id,
            views: 0,
            links: Vec::new(),
            created_at,
        })
    }

    async fn load_profile(&self, user_id: Uuid) -> BackendResult<UserProfile> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE id = ?1"
        ))?;

        stmt.query_row(params![user_id.to_string()], profile_from_row)
            .map_err(|e| match e {
                rusqlite::Error::QueryReturnedNoRows => BackendError::NotFound {
                    entity: "user",
                    id: user_id.to_string(),
                },
                other => BackendError::Database(other),
            })
    }

    async fn find_profile_by_username(
        &self,
        username: &str,
    ) -> BackendResult<Option<UserProfile>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {PROFILE_COLUMNS} FROM users WHERE username = ?1"
        ))?;

        match stmt.query_row(params![username], profile_from_row) {
            Ok(profile) => Ok(Some(profile)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => Err(BackendError::Database(e)),
        }
    }

    async fn load_links(&self, user_id: Uuid) -> BackendResult<Vec<LinkItem>> {
        let conn = self.lock();
        let mut stmt = conn.prepare(&format!(
            "SELECT {LINK_COLUMNS} FROM links WHERE user_id = ?1 ORDER BY position ASC"
        ))?;

        let links = stmt
            .query_map(params![user_id.to_string()], link_from_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?;

        Ok(links)
    }

    async fn insert_link(&self, user_id: Uuid, link: &NewLink) -> BackendResult<LinkItem> {
        let id = Uuid::new_v4();
        let created_at = Utc::now();

        self.lock().execute(
            "INSERT INTO links (id, user_id, title, url, icon, active, position, clicks, created_at)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, 0, ?8)",
            params![
                id.to_string(),
                user_id.to_string(),
                link.title,
                link.url,
                link.icon.as_tag(),
                link.active,
                link.position,
                created_at.to_rfc3339(),
            ],
        )?;

        debug!(link_id = %id, position = link.position, "inserted link");

        Ok(LinkItem {
            id,
            title: link.title.clone(),
            url: link.url.clone(),
            icon: link.icon,
            active: link.active,
            position: link.position,
            clicks: 0,
            created_at,
        })
    }

    async fn update_link_field(&self, id: Uuid, field: &LinkField) -> BackendResult<()> {
        let conn = self.lock();
        let id = id.to_string();

        match field {
            LinkField::Title(v) => {
                conn.execute("UPDATE links SET title = ?1 WHERE id = ?2", params![v, id])?
            }
            LinkField::Url(v) => {
                conn.execute("UPDATE links SET url = ?1 WHERE id = ?2", params![v, id])?
            }
            LinkField::Icon(v) => conn.execute(
                "UPDATE links SET icon = ?1 WHERE id = ?2",
                params![v.as_tag(), id],
            )?,
            LinkField::Active(v) => conn.execute(
                "UPDATE links SET active = ?1 WHERE id = ?2",
                params![v, id],
            )?,
            LinkField::Position(v) => conn.execute(
                "UPDATE links SET position = ?1 WHERE id = ?2",
                params![v, id],
            )?,
        };

        Ok(())
    }

    async fn delete_link(&self, id: Uuid) -> BackendResult<()> {
        self.lock().execute(
            "DELETE FROM links WHERE id = ?1",
            params![id.to_string()],
        )?;
        Ok(())
    }

    async fn update_profile_field(
        &self,
        user_id: Uuid,
        field: &ProfileField,
    ) -> BackendResult<()> {
        let conn = self.lock();
        let id = user_id.to_string();

        match field {
            ProfileField::DisplayName(v) => conn.execute(
                "UPDATE users SET display_name = ?1 WHERE id = ?2",
                params![v, id],
            )?,
            ProfileField::Bio(v) => {
                conn.execute("UPDATE users SET bio = ?1 WHERE id = ?2", params![v, id])?
            }
            ProfileField::AvatarUrl(v) => conn.execute(
                "UPDATE users SET avatar_url = ?1 WHERE id = ?2",
                params![v, id],
            )?,
            ProfileField::Theme(v) => conn.execute(
                "UPDATE users SET theme_id = ?1 WHERE id = ?2",
                params![v.as_tag(), id],
            )?,
        };

        Ok(())
    }

    async fn update_username(&self, user_id: Uuid, username: &str) -> BackendResult<()> {
        self.lock()
            .execute(
                "UPDATE users SET username = ?1 WHERE id = ?2",
                params![username, user_id.to_string()],
            )
            .map_err(|e| write_error(e, "username"))?;
        Ok(())
    }

    async fn username_exists(&self, username: &str) -> BackendResult<bool> {
        let conn = self.lock();
        let mut stmt = conn.prepare("SELECT 1 FROM users WHERE username = ?1")?;
        Ok(stmt.exists(params![username])?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_profile(username: &str) -> NewProfile {
        NewProfile {
            username: username.to_string(),
            display_name: "Test User".to_string(),
            bio: String::new(),
            avatar_url: String::new(),
            theme_id: ThemeId::DeepSpace,
        }
    }

    #[tokio::test]
    async fn test_create_and_load_profile() {
        let backend = SqliteBackend::open_in_memory().unwrap();

        let created = backend.create_profile(&new_profile("alice")).await.unwrap();
        let loaded = backend.load_profile(created.id).await.unwrap();

        assert_eq!(loaded.username, "alice");
        assert_eq!(loaded.display_name, "Test User");
        assert_eq!(loaded.theme_id, ThemeId::DeepSpace);
        assert_eq!(loaded.views, 0);
        assert!(loaded.links.is_empty());
    }

    #[tokio::test]
    async fn test_load_missing_profile_is_not_found() {
        let backend = SqliteBackend::open_in_memory().unwrap();

        let err = backend.load_profile(Uuid::new_v4()).await.unwrap_err();
        assert!(matches!(err, BackendError::NotFound { .. }));
    }

    #[tokio::test]
    async fn test_duplicate_username_is_conflict() {
        let backend = SqliteBackend::open_in_memory().unwrap();

        backend.create_profile(&new_profile("alice")).await.unwrap();
        let err = backend
            .create_profile(&new_profile("alice"))
            .await
            .unwrap_err();

        assert!(err.is_conflict());
    }

    #[tokio::test]
    async fn test_update_username_conflict() {
        let backend = SqliteBackend::open_in_memory().unwrap();

        backend.create_profile(&new_profile("alice")).await.unwrap();
        let bob = backend.create_profile(&new_profile("bob")).await.unwrap();

        let err = backend.update_username(bob.id, "alice").await.unwrap_err();
        assert!(err.is_conflict());

        backend.update_username(bob.id, "bob2").await.unwrap();
        let reloaded = backend.load_profile(bob.id).await.unwrap();
        assert_eq!(reloaded.username, "bob2");
    }

    #[tokio::test]
    async fn test_username_exists() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.create_profile(&new_profile("alice")).await.unwrap();

        assert!(backend.username_exists("alice").await.unwrap());
        assert!(!backend.username_exists("alice2").await.unwrap());
    }

    #[tokio::test]
    async fn test_links_load_in_position_order() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let user = backend.create_profile(&new_profile("alice")).await.unwrap();

        // Insert out of order on purpose
        for position in [2u32, 0, 1] {
            let mut link = NewLink::from(&LinkItem::draft(position));
            link.title = format!("link-{position}");
            backend.insert_link(user.id, &link).await.unwrap();
        }

        let links = backend.load_links(user.id).await.unwrap();
        let titles: Vec<_> = links.iter().map(|l| l.title.as_str()).collect();
        assert_eq!(titles, vec!["link-0", "link-1", "link-2"]);
    }

    #[tokio::test]
    async fn test_update_link_fields() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let user = backend.create_profile(&new_profile("alice")).await.unwrap();
        let link = backend
            .insert_link(user.id, &NewLink::from(&LinkItem::draft(0)))
            .await
            .unwrap();

        backend
            .update_link_field(link.id, &LinkField::Title("Portfolio".to_string()))
            .await
            .unwrap();
        backend
            .update_link_field(link.id, &LinkField::Icon(Icon::Github))
            .await
            .unwrap();
        backend
            .update_link_field(link.id, &LinkField::Active(false))
            .await
            .unwrap();
        backend
            .update_link_field(link.id, &LinkField::Position(4))
            .await
            .unwrap();

        let links = backend.load_links(user.id).await.unwrap();
        assert_eq!(links[0].title, "Portfolio");
        assert_eq!(links[0].icon, Icon::Github);
        assert!(!links[0].active);
        assert_eq!(links[0].position, 4);
    }

    #[tokio::test]
    async fn test_delete_link() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let user = backend.create_profile(&new_profile("alice")).await.unwrap();
        let link = backend
            .insert_link(user.id, &NewLink::from(&LinkItem::draft(0)))
            .await
            .unwrap();

        backend.delete_link(link.id).await.unwrap();
        assert!(backend.load_links(user.id).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_profile_field() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        let user = backend.create_profile(&new_profile("alice")).await.unwrap();

        backend
            .update_profile_field(user.id, &ProfileField::Bio("Fullstack dev".to_string()))
            .await
            .unwrap();
        backend
            .update_profile_field(user.id, &ProfileField::Theme(ThemeId::Nebula))
            .await
            .unwrap();

        let reloaded = backend.load_profile(user.id).await.unwrap();
        assert_eq!(reloaded.bio, "Fullstack dev");
        assert_eq!(reloaded.theme_id, ThemeId::Nebula);
    }

    #[tokio::test]
    async fn test_find_profile_by_username() {
        let backend = SqliteBackend::open_in_memory().unwrap();
        backend.create_profile(&new_profile("alice")).await.unwrap();

        let found = backend.find_profile_by_username("alice").await.unwrap();
        assert_eq!(found.unwrap().username, "alice");

        let missing = backend.find_profile_by_username("nobody").await.unwrap();
        assert!(missing.is_none());
    }

    #[tokio::test]
    async fn test_data_persists_across_reopens() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("biolink.db");

        let user_id = {
            let backend = SqliteBackend::open(&path).unwrap();
            let user = backend.create_profile(&new_profile("alice")).await.unwrap();
            backend
                .insert_link(user.id, &NewLink::from(&LinkItem::draft(0)))
                .await
                .unwrap();
            user.id
        };

        let backend = SqliteBackend::open(&path).unwrap();
        let profile = backend.load_profile(user_id).await.unwrap();
        assert_eq!(profile.username, "alice");
        assert_eq!(backend.load_links(user_id).await.unwrap().len(), 1);
    }
}
