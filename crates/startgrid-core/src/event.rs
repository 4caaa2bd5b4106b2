//! Notifications for the rendering collaborator.

use crate::item::{Item, ItemId};

/// Something the renderer has to react to. Drained from the engine after
/// each command.
#[derive(Debug, Clone, PartialEq)]
pub enum GridEvent {
    /// The root sequence changed; carries the new sequence.
    ItemsChanged(Vec<Item>),
    /// The visible page changed.
    PageChanged(usize),
    /// The item to highlight as a merge target, or none.
    MergeCandidateChanged(Option<ItemId>),
    /// The folder shown in the folder view, or none when it closed.
    FolderViewChanged(Option<ItemId>),
}
