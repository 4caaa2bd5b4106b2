//! The root sequence of items and lookups across one level of nesting.

use crate::error::{LayoutError, LayoutResult};
use crate::item::{Folder, Item, ItemId, ItemKind, Leaf};
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

/// The container an item lives in.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Container {
    Root,
    Folder(ItemId),
}

/// Position of an item: its container and index within it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Location {
    pub container: Container,
    pub index: usize,
}

impl Location {
    pub fn is_root(&self) -> bool {
        self.container == Container::Root
    }
}

/// Borrowed view of a located item.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum ItemRef<'a> {
    /// An item of the root sequence.
    Root(&'a Item),
    /// A leaf inside a folder.
    Child(&'a Leaf),
}

impl ItemRef<'_> {
    pub fn id(&self) -> &ItemId {
        match self {
            ItemRef::Root(item) => item.id(),
            ItemRef::Child(leaf) => &leaf.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            ItemRef::Root(item) => item.kind(),
            ItemRef::Child(_) => ItemKind::Leaf,
        }
    }
}

/// Result of a successful lookup.
#[derive(Debug, Clone, PartialEq)]
pub struct Found<'a> {
    pub item: ItemRef<'a>,
    pub location: Location,
}

/// Move one element from `from` to `to`, shifting the elements in between
/// by one. Returns false when nothing moved.
pub fn array_move<T>(items: &mut Vec<T>, from: usize, to: usize) -> bool {
    if from == to || from >= items.len() || to >= items.len() {
        return false;
    }
    let item = items.remove(from);
    items.insert(to, item);
    true
}

/// Ordered root sequence of shortcuts and folders.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Layout {
    pub(crate) items: Vec<Item>,
}

impl Layout {
    /// Create an empty layout.
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a layout, checking id uniqueness and that no folder is empty.
    pub fn from_items(items: Vec<Item>) -> LayoutResult<Self> {
        let layout = Self { items };
        layout.validate()?;
        Ok(layout)
    }

    /// Deserialize and validate a layout from JSON.
    pub fn from_json(json: &str) -> LayoutResult<Self> {
        let items: Vec<Item> = serde_json::from_str(json)?;
        Self::from_items(items)
    }

    /// Serialize the layout to JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Check the ownership and non-empty folder invariants.
    pub fn validate(&self) -> LayoutResult<()> {
        let mut seen = HashSet::new();
        for item in &self.items {
            if !seen.insert(item.id()) {
                return Err(LayoutError::DuplicateId(item.id().clone()));
            }
            if let Item::Folder(folder) = item {
                if folder.children.is_empty() {
                    return Err(LayoutError::EmptyFolder(folder.id.clone()));
                }
                for child in &folder.children {
                    if !seen.insert(&child.id) {
                        return Err(LayoutError::DuplicateId(child.id.clone()));
                    }
                }
            }
        }
        Ok(())
    }

    pub fn items(&self) -> &[Item] {
        &self.items
    }

    pub fn into_items(self) -> Vec<Item> {
        self.items
    }

    /// Number of root items.
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Item> {
        self.items.iter()
    }

    /// Number of leaves, counting those inside folders.
    pub fn leaf_count(&self) -> usize {
        self.items
            .iter()
            .map(|item| match item {
                Item::Leaf(_) => 1,
                Item::Folder(folder) => folder.children.len(),
            })
            .sum()
    }

    /// Every id in the layout, root items first, each followed by its
    /// children.
    pub fn all_ids(&self) -> Vec<ItemId> {
        let mut ids = Vec::new();
        for item in &self.items {
            ids.push(item.id().clone());
            if let Item::Folder(folder) = item {
                ids.extend(folder.children.iter().map(|c| c.id.clone()));
            }
        }
        ids
    }

    /// Find an item in the root sequence or inside any folder.
    pub fn find(&self, id: &ItemId) -> Option<Found<'_>> {
        for (index, item) in self.items.iter().enumerate() {
            if item.id() == id {
                return Some(Found {
                    item: ItemRef::Root(item),
                    location: Location { container: Container::Root, index },
                });
            }
        }
        for item in &self.items {
            if let Item::Folder(folder) = item {
                if let Some(index) = folder.position(id) {
                    return Some(Found {
                        item: ItemRef::Child(&folder.children[index]),
                        location: Location {
                            container: Container::Folder(folder.id.clone()),
                            index,
                        },
                    });
                }
            }
        }
        None
    }

    /// Location of an item, if present.
    pub fn locate(&self, id: &ItemId) -> Option<Location> {
        self.find(id).map(|found| found.location)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.find(id).is_some()
    }

    /// Kind of an item, if present.
    pub fn kind_of(&self, id: &ItemId) -> Option<ItemKind> {
        self.find(id).map(|found| found.item.kind())
    }

    /// Index of a root item.
    pub fn root_index(&self, id: &ItemId) -> Option<usize> {
        self.items.iter().position(|item| item.id() == id)
    }

    /// A root item by id.
    pub fn get(&self, id: &ItemId) -> Option<&Item> {
        self.items.iter().find(|item| item.id() == id)
    }

    /// A root folder by id.
    pub fn folder(&self, id: &ItemId) -> Option<&Folder> {
        self.get(id).and_then(Item::as_folder)
    }

    pub(crate) fn folder_mut(&mut self, id: &ItemId) -> Option<&mut Folder> {
        self.items
            .iter_mut()
            .find(|item| item.id() == id)
            .and_then(Item::as_folder_mut)
    }

    /// Number of items in a container, or `None` for an unknown folder.
    pub fn container_len(&self, container: &Container) -> Option<usize> {
        match container {
            Container::Root => Some(self.items.len()),
            Container::Folder(id) => self.folder(id).map(|f| f.children.len()),
        }
    }

    /// Append an item to the end of the root sequence. Rejected when any of
    /// its ids is already present or it is an empty folder.
    pub fn push(&mut self, item: Item) -> bool {
        let ids: Vec<&ItemId> = match &item {
            Item::Leaf(leaf) => vec![&leaf.id],
            Item::Folder(folder) => {
                if folder.children.is_empty() {
                    return false;
                }
                std::iter::once(&folder.id)
                    .chain(folder.children.iter().map(|c| &c.id))
                    .collect()
            }
        };
        let mut seen = HashSet::new();
        if ids.iter().any(|id| self.contains(id) || !seen.insert(*id)) {
            return false;
        }
        self.items.push(item);
        true
    }
}
