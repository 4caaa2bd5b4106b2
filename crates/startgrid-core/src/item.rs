//! Shortcut and folder items.
//!
//! Items are pure data. A folder holds leaves only, so the one-level depth
//! cap is carried by the types rather than checked at runtime.

use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Title given to folders created by a merge.
pub const DEFAULT_FOLDER_TITLE: &str = "Folder";

/// Number of children shown in a folder's icon preview.
pub const FOLDER_PREVIEW_LEN: usize = 9;

/// Opaque, stable identifier of an item.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ItemId(String);

impl ItemId {
    /// Wrap an existing identifier.
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Generate a fresh, process-unique folder identifier.
    pub fn new_folder() -> Self {
        Self(format!("folder-{}", Uuid::new_v4().simple()))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for ItemId {
    fn from(id: &str) -> Self {
        Self(id.to_string())
    }
}

impl From<String> for ItemId {
    fn from(id: String) -> Self {
        Self(id)
    }
}

/// Where an item's icon comes from.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum IconSource {
    /// Derived from the target URL by the icon collaborator.
    #[default]
    Auto,
    /// Picked by the user from one of the known icon providers.
    Source { source: String, url: String },
    /// Uploaded image data.
    Custom { data: String },
    /// A single glyph drawn in place of an image.
    Letter {
        #[serde(default)]
        letter: Option<char>,
    },
}

/// Kind of an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ItemKind {
    Leaf,
    Folder,
}

/// A shortcut pointing at a destination.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Leaf {
    pub id: ItemId,
    pub title: String,
    pub target_url: String,
    #[serde(default)]
    pub icon: IconSource,
}

impl Leaf {
    pub fn new(id: impl Into<ItemId>, title: impl Into<String>, target_url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            title: title.into(),
            target_url: target_url.into(),
            icon: IconSource::Auto,
        }
    }

    /// Set the icon source.
    pub fn with_icon(mut self, icon: IconSource) -> Self {
        self.icon = icon;
        self
    }

    /// Glyph shown for letter icons and as the fallback when an image fails.
    pub fn display_letter(&self) -> char {
        let letter = match self.icon {
            IconSource::Letter { letter: Some(c) } => Some(c),
            _ => None,
        };
        letter
            .or_else(|| self.title.chars().next())
            .unwrap_or('A')
            .to_uppercase()
            .next()
            .unwrap_or('A')
    }
}

/// An ordered group of leaves occupying one root slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Folder {
    pub id: ItemId,
    pub title: String,
    pub children: Vec<Leaf>,
}

impl Folder {
    /// Create a folder with a freshly generated id and the default title.
    pub fn new(children: Vec<Leaf>) -> Self {
        Self::with_id(ItemId::new_folder(), children)
    }

    pub fn with_id(id: ItemId, children: Vec<Leaf>) -> Self {
        Self {
            id,
            title: DEFAULT_FOLDER_TITLE.to_string(),
            children,
        }
    }

    /// Index of a child by id.
    pub fn position(&self, id: &ItemId) -> Option<usize> {
        self.children.iter().position(|c| &c.id == id)
    }

    pub fn contains(&self, id: &ItemId) -> bool {
        self.position(id).is_some()
    }

    /// Set the title, falling back to the default when blank.
    pub fn rename(&mut self, title: &str) {
        let trimmed = title.trim();
        self.title = if trimmed.is_empty() {
            DEFAULT_FOLDER_TITLE.to_string()
        } else {
            trimmed.to_string()
        };
    }

    /// Children shown on the folder icon and the side of the square grid
    /// they are laid out in.
    pub fn preview(&self) -> (&[Leaf], usize) {
        let shown = &self.children[..self.children.len().min(FOLDER_PREVIEW_LEN)];
        let side = if shown.len() <= 4 { 2 } else { 3 };
        (shown, side)
    }
}

/// A node of the root sequence.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Item {
    Leaf(Leaf),
    Folder(Folder),
}

impl Item {
    pub fn id(&self) -> &ItemId {
        match self {
            Item::Leaf(leaf) => &leaf.id,
            Item::Folder(folder) => &folder.id,
        }
    }

    pub fn kind(&self) -> ItemKind {
        match self {
            Item::Leaf(_) => ItemKind::Leaf,
            Item::Folder(_) => ItemKind::Folder,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Item::Leaf(leaf) => &leaf.title,
            Item::Folder(folder) => &folder.title,
        }
    }

    pub fn is_folder(&self) -> bool {
        matches!(self, Item::Folder(_))
    }

    pub fn as_leaf(&self) -> Option<&Leaf> {
        match self {
            Item::Leaf(leaf) => Some(leaf),
            Item::Folder(_) => None,
        }
    }

    pub fn as_folder(&self) -> Option<&Folder> {
        match self {
            Item::Folder(folder) => Some(folder),
            Item::Leaf(_) => None,
        }
    }

    pub fn as_folder_mut(&mut self) -> Option<&mut Folder> {
        match self {
            Item::Folder(folder) => Some(folder),
            Item::Leaf(_) => None,
        }
    }
}

impl From<Leaf> for Item {
    fn from(leaf: Leaf) -> Self {
        Item::Leaf(leaf)
    }
}

impl From<Folder> for Item {
    fn from(folder: Folder) -> Self {
        Item::Folder(folder)
    }
}
