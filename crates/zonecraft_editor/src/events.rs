//! Change notifications
//! Every mutation of the editor model records an [`EditorChange`]; once per frame they
//! are published as [`EditorChanged`] messages so views can re-derive.

use bevy::prelude::*;

use crate::editor_state::EditorState;

/// What part of the model changed
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EditorChange {
    Palette,
    PaletteSelection,
    ZoneList,
    /// Tiles or placement layers of one zone
    Zone(String),
    Transports,
    EnemyTemplates,
    Npcs,
    /// The whole world was replaced (import)
    World,
    Catalog,
}

impl EditorChange {
    /// Changes that count as unsaved edits to the world document
    pub fn is_document_edit(&self) -> bool {
        !matches!(self, EditorChange::PaletteSelection | EditorChange::Catalog)
    }
}

#[derive(Message, Debug, Clone, PartialEq, Eq)]
pub struct EditorChanged {
    pub change: EditorChange,
}

/// Drain recorded changes into messages
pub fn publish_editor_changes(
    mut editor_state: ResMut<EditorState>,
    mut changed: MessageWriter<EditorChanged>,
) {
    if !editor_state.has_pending_changes() {
        return;
    }
    for change in editor_state.take_changes() {
        changed.write(EditorChanged { change });
    }
}
