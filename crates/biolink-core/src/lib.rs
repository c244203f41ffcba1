//! Biolink Core Library
//!
//! This crate provides the core functionality for Biolink, a link-in-bio
//! profile manager: one ordered list of links per profile, edited
//! optimistically and persisted field by field.
//!
//! # Architecture
//!
//! - **Session**: In-memory working copy of a profile; every mutation is
//!   applied locally first, then persisted through the backend
//! - **RecordBackend**: Storage seam with SQLite and in-memory impls
//! - **Notify**: Failed persistence surfaces as notices, never rollback
//!
//! # Quick Start
//!
//! ```text
//! let backend = Arc::new(SqliteBackend::open(&config.sqlite_path())?);
//! let mut session = Session::load(backend, notifier, user_id).await?;
//!
//! // Add a link and retitle it
//! let id = session.add_link().await;
//! session.update_link(id, LinkField::Title("My blog".into())).await;
//! ```
//!
//! # Modules
//!
//! - `session`: Working copy and mutation dispatch (main entry point)
//! - `models`: Profiles, links, icons, and field selectors
//! - `backend`: Storage trait plus SQLite and in-memory backends
//! - `reconcile`: Position reconciliation after reorders and removals
//! - `notify`: Notice types and sinks
//! - `render`: Public profile projection
//! - `theme`: Theme catalog
//! - `validate`: Username and registration validation
//! - `auth`: Hosted auth provider contract
//! - `config`: Application configuration

pub mod analytics;
pub mod auth;
pub mod backend;
pub mod config;
pub mod models;
pub mod notify;
pub mod reconcile;
pub mod render;
pub mod session;
pub mod theme;
pub mod validate;

pub use backend::{BackendError, BackendResult, MemoryBackend, RecordBackend, SqliteBackend};
pub use config::Config;
pub use models::{Icon, LinkField, LinkItem, NewLink, NewProfile, ProfileField, UserProfile};
pub use notify::{ChannelNotifier, MemoryNotifier, Notice, Notify, Severity};
pub use render::{profile_url, PublicLink, PublicProfile};
pub use session::{Direction, Session, UsernameError};
pub use theme::{Theme, ThemeId, THEMES};
