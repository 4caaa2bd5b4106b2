//! Folder container rules: creation, absorption, ejection and dissolution.
//!
//! Every operation either applies completely or leaves the layout untouched
//! and reports the no-op through its return value.

use crate::item::{Folder, Item, ItemId, ItemKind, Leaf};
use crate::layout::{Container, Layout, array_move};

/// What a merge produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergeOutcome {
    /// The dragged leaf was appended to an existing folder.
    AddedToFolder(ItemId),
    /// A new folder replaced the target leaf.
    CreatedFolder(ItemId),
}

impl MergeOutcome {
    pub fn folder_id(&self) -> &ItemId {
        match self {
            MergeOutcome::AddedToFolder(id) | MergeOutcome::CreatedFolder(id) => id,
        }
    }
}

impl Layout {
    /// Detach a leaf from whichever container holds it. Emptied folders are
    /// left in place for the caller to clean up.
    fn take_leaf(&mut self, id: &ItemId) -> Option<(Leaf, Container)> {
        let location = self.locate(id)?;
        match location.container {
            Container::Root => {
                if self.items[location.index].is_folder() {
                    return None;
                }
                match self.items.remove(location.index) {
                    Item::Leaf(leaf) => Some((leaf, Container::Root)),
                    Item::Folder(_) => None,
                }
            }
            Container::Folder(folder_id) => {
                let folder = self.folder_mut(&folder_id)?;
                let leaf = folder.children.remove(location.index);
                Some((leaf, Container::Folder(folder_id)))
            }
        }
    }

    /// Remove a folder's slot if it has no children left.
    fn drop_if_empty(&mut self, container: &Container) {
        if let Container::Folder(folder_id) = container {
            let empty = self.folder(folder_id).is_some_and(|f| f.children.is_empty());
            if empty {
                self.items.retain(|item| item.id() != folder_id);
                log::debug!("Dropped emptied folder {}", folder_id);
            }
        }
    }

    /// Append a leaf to a folder, removing it from its previous container.
    pub fn move_into_folder(&mut self, leaf_id: &ItemId, folder_id: &ItemId) -> bool {
        if leaf_id == folder_id {
            return false;
        }
        match self.folder(folder_id) {
            Some(folder) if !folder.contains(leaf_id) => {}
            _ => return false,
        }
        if self.kind_of(leaf_id) != Some(ItemKind::Leaf) {
            return false;
        }
        let Some((leaf, previous)) = self.take_leaf(leaf_id) else {
            return false;
        };
        match self.folder_mut(folder_id) {
            Some(folder) => folder.children.push(leaf),
            None => return false,
        }
        self.drop_if_empty(&previous);
        log::info!("Moved {} into folder {}", leaf_id, folder_id);
        true
    }

    /// Replace `target` with a new folder holding `[target, source]`.
    /// Both must be distinct root leaves. Returns the new folder's id.
    pub fn create_folder(&mut self, target_id: &ItemId, source_id: &ItemId) -> Option<ItemId> {
        if target_id == source_id {
            return None;
        }
        let target_index = self.root_index(target_id)?;
        let source_index = self.root_index(source_id)?;
        if self.items[target_index].is_folder() || self.items[source_index].is_folder() {
            return None;
        }
        let Item::Leaf(source) = self.items.remove(source_index) else {
            return None;
        };
        let target_index = if source_index < target_index {
            target_index - 1
        } else {
            target_index
        };
        let Item::Leaf(target) = self.items[target_index].clone() else {
            return None;
        };
        let folder = Folder::new(vec![target, source]);
        let folder_id = folder.id.clone();
        self.items[target_index] = Item::Folder(folder);
        log::info!("Created folder {} from {} and {}", folder_id, target_id, source_id);
        Some(folder_id)
    }

    /// Eject a leaf from a folder back into the root sequence.
    ///
    /// When this empties the folder, the leaf takes the folder's slot.
    /// Otherwise it is inserted relative to `insertion_hint` (the root item
    /// under the pointer), or right after the folder without one.
    pub fn remove_from_folder(
        &mut self,
        leaf_id: &ItemId,
        folder_id: &ItemId,
        insertion_hint: Option<&ItemId>,
    ) -> bool {
        let Some(folder_index) = self.root_index(folder_id) else {
            return false;
        };
        let Some(folder) = self.items[folder_index].as_folder_mut() else {
            return false;
        };
        let Some(child_index) = folder.position(leaf_id) else {
            return false;
        };
        let leaf = folder.children.remove(child_index);

        if folder.children.is_empty() {
            self.items[folder_index] = Item::Leaf(leaf);
            log::info!("Folder {} dissolved into {}", folder_id, leaf_id);
            return true;
        }

        let hinted = insertion_hint
            .filter(|hint| *hint != folder_id)
            .and_then(|hint| self.root_index(hint));
        let insert_at = match hinted {
            Some(target) if target >= folder_index => target + 1,
            Some(target) => target,
            None => folder_index + 1,
        };
        self.items.insert(insert_at.min(self.items.len()), Item::Leaf(leaf));
        log::info!("Moved {} out of folder {} to {}", leaf_id, folder_id, insert_at);
        true
    }

    /// Move one element within a container.
    pub fn reorder_within(&mut self, container: &Container, from: usize, to: usize) -> bool {
        match container {
            Container::Root => array_move(&mut self.items, from, to),
            Container::Folder(id) => self
                .folder_mut(id)
                .is_some_and(|folder| array_move(&mut folder.children, from, to)),
        }
    }

    /// Delete a folder together with all of its children.
    pub fn delete_folder(&mut self, folder_id: &ItemId) -> Option<Folder> {
        let index = self.root_index(folder_id)?;
        if !self.items[index].is_folder() {
            return None;
        }
        match self.items.remove(index) {
            Item::Folder(folder) => {
                log::info!("Deleted folder {} with {} items", folder.id, folder.children.len());
                Some(folder)
            }
            Item::Leaf(_) => None,
        }
    }

    /// Delete any item. A folder left empty by deleting its last child is
    /// removed as well.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        let Some(location) = self.locate(id) else {
            return false;
        };
        match &location.container {
            Container::Root => {
                self.items.remove(location.index);
            }
            Container::Folder(folder_id) => {
                if let Some(folder) = self.folder_mut(folder_id) {
                    folder.children.remove(location.index);
                }
                self.drop_if_empty(&location.container);
            }
        }
        log::info!("Removed item {}", id);
        true
    }

    /// Rename a folder. Blank titles fall back to the default.
    pub fn rename_folder(&mut self, folder_id: &ItemId, title: &str) -> bool {
        match self.folder_mut(folder_id) {
            Some(folder) => {
                folder.rename(title);
                true
            }
            None => false,
        }
    }

    /// Ungroup a folder, placing its children in order at its slot.
    /// Returns the ids of the released children.
    pub fn dissolve_folder(&mut self, folder_id: &ItemId) -> Option<Vec<ItemId>> {
        let index = self.root_index(folder_id)?;
        if !self.items[index].is_folder() {
            return None;
        }
        let Item::Folder(folder) = self.items.remove(index) else {
            return None;
        };
        let ids: Vec<ItemId> = folder.children.iter().map(|c| c.id.clone()).collect();
        for (offset, child) in folder.children.into_iter().enumerate() {
            self.items.insert(index + offset, Item::Leaf(child));
        }
        Some(ids)
    }

    /// Merge a dragged leaf onto a root target.
    ///
    /// A folder target absorbs the leaf; a leaf target becomes a new folder
    /// holding the target followed by the dragged leaf. Folders are never
    /// merge sources.
    pub fn merge(&mut self, active_id: &ItemId, target_id: &ItemId) -> Option<MergeOutcome> {
        if active_id == target_id || self.kind_of(active_id) != Some(ItemKind::Leaf) {
            return None;
        }
        if self.get(target_id)?.is_folder() {
            self.move_into_folder(active_id, target_id)
                .then(|| MergeOutcome::AddedToFolder(target_id.clone()))
        } else {
            self.create_folder(target_id, active_id)
                .map(MergeOutcome::CreatedFolder)
        }
    }
}
