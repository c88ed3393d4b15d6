//! Registry of open editors, keyed by editor id.

use crate::session::EditorSession;
use dashmap::DashMap;
use livepen_preview::{SandboxHost, SourceKind};
use uuid::Uuid;

pub type EditorStore<H> = DashMap<Uuid, EditorSession<H>>;

pub fn new_editor_store<H: SandboxHost>() -> EditorStore<H> {
    DashMap::new()
}

/// Registers an opened session and returns its editor id.
pub fn insert_editor<H: SandboxHost>(store: &EditorStore<H>, session: EditorSession<H>) -> Uuid {
    let id = Uuid::new_v4();
    store.insert(id, session);
    id
}

/// Routes an edit to an open editor. Returns false if the editor is gone.
pub fn edit_editor<H: SandboxHost>(
    store: &EditorStore<H>,
    id: &Uuid,
    kind: SourceKind,
    text: impl Into<String>,
) -> bool {
    match store.get(id) {
        Some(session) => {
            session.edit(kind, text);
            true
        }
        None => false,
    }
}

/// Closes and removes an editor (call when the editor view unmounts).
pub fn close_editor<H: SandboxHost>(store: &EditorStore<H>, id: &Uuid) -> bool {
    match store.remove(id) {
        Some((_, mut session)) => {
            session.close();
            true
        }
        None => false,
    }
}
