//! The grid engine: the command and query surface the host drives.

use crate::collision::{DropRegion, classify};
use crate::config::EngineConfig;
use crate::drag::{DragEffect, DragMachine, DragState, DropOutcome};
use crate::error::{ConfigResult, EngineResult, LayoutResult};
use crate::event::GridEvent;
use crate::item::{Item, ItemId};
use crate::layout::Layout;
use crate::pagination::{GridMetrics, PageKey, PageRequest, Pager, page_count, page_range};
use crate::timer::Instant;
use kurbo::Rect;

/// Viewport width assumed until the host reports one.
pub const DEFAULT_VIEWPORT_WIDTH: f64 = 1280.0;

/// Owns the layout and every piece of interaction state around it.
///
/// Commands mutate and queue [`GridEvent`]s; the host drains them with
/// [`GridEngine::drain_events`] and re-reads what it renders.
#[derive(Debug)]
pub struct GridEngine {
    /// The root sequence and folder contents.
    layout: Layout,
    config: EngineConfig,
    drag: DragMachine,
    pager: Pager,
    viewport_width: f64,
    metrics: GridMetrics,
    /// Folder whose contents are shown, if any.
    open_folder: Option<ItemId>,
    /// Item the context menu is open on, if any.
    context_menu: Option<ItemId>,
    events: Vec<GridEvent>,
}

impl Default for GridEngine {
    fn default() -> Self {
        Self::new(Layout::new(), EngineConfig::default())
    }
}

impl GridEngine {
    /// Create an engine over an already validated layout. The grid is
    /// clamped to supported bounds; use [`GridEngine::with_items`] to have
    /// the configuration checked instead.
    pub fn new(layout: Layout, config: EngineConfig) -> Self {
        let metrics = GridMetrics::compute(&config.grid, DEFAULT_VIEWPORT_WIDTH);
        let mut pager = Pager::new(config.timings.clone());
        pager.set_total(page_count(layout.len(), metrics.capacity()));
        Self {
            layout,
            drag: DragMachine::new(config.timings.clone()),
            pager,
            viewport_width: DEFAULT_VIEWPORT_WIDTH,
            metrics,
            config,
            open_folder: None,
            context_menu: None,
            events: Vec::new(),
        }
    }

    /// Create an engine from raw items, validating them and the
    /// configuration first.
    pub fn with_items(items: Vec<Item>, config: EngineConfig) -> EngineResult<Self> {
        config.validate()?;
        Ok(Self::new(Layout::from_items(items)?, config))
    }

    // --- Drag commands ---

    /// Begin dragging an item. Ignored for unknown items and for the item
    /// the context menu is open on.
    pub fn start_drag(&mut self, id: &ItemId) -> bool {
        if self.is_drag_suppressed(id) {
            log::debug!("Drag of {} suppressed by context menu", id);
            return false;
        }
        let mut effects = Vec::new();
        let started = self.drag.start(&self.layout, id, &mut effects);
        self.apply(effects);
        started
    }

    /// Feed the dragged box and the drop regions currently on screen.
    pub fn update_drag_position(&mut self, drag_rect: Rect, regions: &[DropRegion], now: Instant) {
        if !self.drag.is_dragging() {
            return;
        }
        let collision = classify(drag_rect, regions);
        let mut effects = Vec::new();
        self.drag.update(&mut self.layout, &collision, now, &mut effects);
        self.apply(effects);
    }

    /// Release the drag, committing a merge or reorder if one applies.
    pub fn end_drag(&mut self, now: Instant) -> Option<DropOutcome> {
        let mut effects = Vec::new();
        let outcome = self.drag.end(&mut self.layout, now, &mut effects);
        self.apply(effects);
        outcome
    }

    /// Abandon the drag without committing.
    pub fn cancel_drag(&mut self) {
        let mut effects = Vec::new();
        self.drag.cancel(&mut effects);
        self.apply(effects);
    }

    /// Drop all transient interaction state when the grid unmounts: the
    /// drag and its timers, the page cooldown and wheel accumulator, the
    /// folder view and the context menu. The layout and page are kept.
    pub fn reset(&mut self) {
        self.cancel_drag();
        self.pager.reset();
        self.close_folder();
        self.dismiss_context_menu();
        log::debug!("Engine interaction state reset");
    }

    /// Fire due timers. Call from the host's event loop.
    pub fn poll(&mut self, now: Instant) {
        let mut effects = Vec::new();
        self.drag.poll(&mut self.layout, now, &mut effects);
        self.apply(effects);
        self.pager.poll(now);
    }

    // --- Paging ---

    /// Jump or step to a page. Returns the new page if it changed.
    pub fn request_page(&mut self, request: PageRequest, now: Instant) -> Option<usize> {
        let page = self.pager.request(request, now)?;
        self.events.push(GridEvent::PageChanged(page));
        Some(page)
    }

    /// Feed a wheel event. Returns the new page if it changed.
    pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64, now: Instant) -> Option<usize> {
        let page = self.pager.on_wheel(delta_x, delta_y, now)?;
        self.events.push(GridEvent::PageChanged(page));
        Some(page)
    }

    /// Feed a paging key press.
    pub fn on_key(&mut self, key: PageKey, now: Instant) -> Option<usize> {
        let page = self.pager.on_key(key, now)?;
        self.events.push(GridEvent::PageChanged(page));
        Some(page)
    }

    /// Feed a key by its DOM-style name. Keys other than the arrows are
    /// ignored.
    pub fn on_key_name(&mut self, key: &str, now: Instant) -> Option<usize> {
        self.on_key(PageKey::from_key(key)?, now)
    }

    /// Resize the viewport and recompute the grid.
    pub fn set_viewport_width(&mut self, width: f64) {
        if !width.is_finite() || width < 0.0 {
            log::warn!("Ignoring invalid viewport width {}", width);
            return;
        }
        self.viewport_width = width;
        self.metrics = GridMetrics::compute(&self.config.grid, width);
        self.refresh_pages();
    }

    /// Swap in a new configuration. Timings apply to the next drag.
    pub fn set_config(&mut self, config: EngineConfig) -> ConfigResult<()> {
        config.validate()?;
        self.pager.set_timings(config.timings.clone());
        self.drag.set_timings(config.timings.clone());
        self.config = config;
        self.metrics = GridMetrics::compute(&self.config.grid, self.viewport_width);
        self.refresh_pages();
        Ok(())
    }

    // --- Folder view and context menu ---

    /// Show a folder's contents. Only existing folders can be opened.
    pub fn open_folder(&mut self, id: &ItemId) -> bool {
        if self.layout.folder(id).is_none() {
            return false;
        }
        if self.open_folder.as_ref() != Some(id) {
            self.open_folder = Some(id.clone());
            self.events.push(GridEvent::FolderViewChanged(Some(id.clone())));
        }
        true
    }

    pub fn close_folder(&mut self) {
        if self.open_folder.take().is_some() {
            self.events.push(GridEvent::FolderViewChanged(None));
        }
    }

    /// Open the context menu on an item. While open, that item cannot be
    /// dragged.
    pub fn open_context_menu(&mut self, id: &ItemId) -> bool {
        if !self.layout.contains(id) {
            return false;
        }
        self.context_menu = Some(id.clone());
        true
    }

    pub fn dismiss_context_menu(&mut self) {
        self.context_menu = None;
    }

    // --- Layout edits ---

    /// Append an item created elsewhere. Rejected if any of its ids exist.
    pub fn add_item(&mut self, item: impl Into<Item>) -> bool {
        if !self.layout.push(item.into()) {
            return false;
        }
        self.after_mutation();
        true
    }

    /// Delete an item wherever it is.
    pub fn remove_item(&mut self, id: &ItemId) -> bool {
        if !self.layout.remove_item(id) {
            return false;
        }
        self.after_mutation();
        true
    }

    pub fn rename_folder(&mut self, id: &ItemId, title: &str) -> bool {
        if !self.layout.rename_folder(id, title) {
            return false;
        }
        self.after_mutation();
        true
    }

    /// Delete a folder together with its children.
    pub fn delete_folder(&mut self, id: &ItemId) -> bool {
        if self.layout.delete_folder(id).is_none() {
            return false;
        }
        self.after_mutation();
        true
    }

    /// Ungroup a folder into the root at its slot.
    pub fn dissolve_folder(&mut self, id: &ItemId) -> bool {
        if self.layout.dissolve_folder(id).is_none() {
            return false;
        }
        self.after_mutation();
        true
    }

    /// Take a folder child out to the root sequence, placed relative to
    /// `insertion_hint`.
    pub fn remove_from_folder(&mut self, id: &ItemId, folder: &ItemId, insertion_hint: Option<&ItemId>) -> bool {
        if !self.layout.remove_from_folder(id, folder, insertion_hint) {
            return false;
        }
        self.after_mutation();
        true
    }

    /// Replace the whole layout, e.g. after an import. A live drag is
    /// cancelled since its ids may no longer exist.
    pub fn replace_items(&mut self, items: Vec<Item>) -> LayoutResult<()> {
        let layout = Layout::from_items(items)?;
        self.cancel_drag();
        self.layout = layout;
        self.after_mutation();
        Ok(())
    }

    // --- Queries ---

    pub fn layout(&self) -> &Layout {
        &self.layout
    }

    /// The root sequence.
    pub fn items(&self) -> &[Item] {
        self.layout.items()
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn current_page(&self) -> usize {
        self.pager.current()
    }

    pub fn total_pages(&self) -> usize {
        self.pager.total()
    }

    /// Items on the given page; empty past the last page.
    pub fn page_items(&self, page: usize) -> &[Item] {
        let items = self.layout.items();
        &items[page_range(items.len(), self.metrics.capacity(), page)]
    }

    /// Items on the current page.
    pub fn visible_items(&self) -> &[Item] {
        self.page_items(self.pager.current())
    }

    pub fn metrics(&self) -> &GridMetrics {
        &self.metrics
    }

    pub fn viewport_width(&self) -> f64 {
        self.viewport_width
    }

    pub fn merge_candidate(&self) -> Option<&ItemId> {
        self.drag.merge_candidate()
    }

    /// Whether dragging `id` is currently blocked by the context menu.
    pub fn is_drag_suppressed(&self, id: &ItemId) -> bool {
        self.context_menu.as_ref() == Some(id)
    }

    pub fn active_drag(&self) -> Option<&ItemId> {
        self.drag.active()
    }

    pub fn drag_state(&self) -> &DragState {
        self.drag.state()
    }

    /// The folder shown in the folder view.
    pub fn opened_folder(&self) -> Option<&ItemId> {
        self.open_folder.as_ref()
    }

    pub fn context_menu(&self) -> Option<&ItemId> {
        self.context_menu.as_ref()
    }

    /// Take every event queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<GridEvent> {
        std::mem::take(&mut self.events)
    }

    // --- Internals ---

    fn apply(&mut self, effects: Vec<DragEffect>) {
        for effect in effects {
            match effect {
                DragEffect::MergeCandidateChanged(candidate) => {
                    self.events.push(GridEvent::MergeCandidateChanged(candidate));
                }
                DragEffect::DraggedOut { .. } => {
                    self.close_folder();
                    self.after_mutation();
                }
                DragEffect::Dropped(_) => self.after_mutation(),
            }
        }
    }

    fn after_mutation(&mut self) {
        self.events.push(GridEvent::ItemsChanged(self.layout.items().to_vec()));
        self.refresh_pages();

        if self.context_menu.as_ref().is_some_and(|id| !self.layout.contains(id)) {
            self.context_menu = None;
        }
        if self.open_folder.as_ref().is_some_and(|id| self.layout.folder(id).is_none()) {
            self.close_folder();
        }
    }

    fn refresh_pages(&mut self) {
        let total = page_count(self.layout.len(), self.metrics.capacity());
        if let Some(page) = self.pager.set_total(total) {
            self.events.push(GridEvent::PageChanged(page));
        }
    }
}
