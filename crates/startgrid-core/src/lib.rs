//! StartGrid Core Library
//!
//! Platform-agnostic arrangement engine for the StartGrid start page:
//! collision classification, drag-to-merge folders, drag-out of folders and
//! paginated grid layout. Rendering and persistence live elsewhere.

pub mod collision;
pub mod config;
pub mod drag;
pub mod engine;
pub mod error;
pub mod event;
pub mod folder;
pub mod item;
pub mod layout;
pub mod pagination;
pub mod timer;

pub use collision::{Candidate, Collision, CollisionKind, DropRegion, DropTarget, classify};
pub use config::{EngineConfig, GridConfig, Timings};
pub use drag::{DragMachine, DragState, DropOutcome};
pub use engine::GridEngine;
pub use error::{ConfigError, EngineError, LayoutError};
pub use event::GridEvent;
pub use folder::MergeOutcome;
pub use item::{DEFAULT_FOLDER_TITLE, Folder, IconSource, Item, ItemId, ItemKind, Leaf};
pub use layout::{Container, Layout, Location};
pub use pagination::{GridMetrics, PageKey, PageRequest, Pager};
pub use timer::{Debounce, Duration, Instant};
