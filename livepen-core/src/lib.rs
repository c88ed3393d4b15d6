//! # Livepen core
//!
//! Editor-side plumbing around the live preview engine: the project-data service
//! contracts, per-project editor sessions, and a registry of open editors.

pub mod editors;
pub mod error;
pub mod project;
pub mod service;
pub mod session;

pub use editors::{close_editor, edit_editor, insert_editor, new_editor_store, EditorStore};
pub use error::{AuthError, LoadError, SaveError, SessionError, SessionResult};
pub use project::{Project, ProjectFields, ProjectId};
pub use service::{AuthService, Credentials, Identity, ProjectService, Token};
pub use session::EditorSession;
