//! Drag lifecycle: deciding between reorder, merge and drag-out.
//!
//! The machine is advanced by discrete calls (`start`, `update`, `poll`,
//! `end`) and never runs anything on its own. Each drag owns a
//! [`DragSession`] holding its two debounce timers; ending or cancelling
//! the drag drops the session and with it every pending deadline.

use crate::collision::{Collision, CollisionKind, DropTarget};
use crate::config::Timings;
use crate::folder::MergeOutcome;
use crate::item::{ItemId, ItemKind};
use crate::layout::{Container, Layout};
use crate::timer::{Debounce, Instant};

/// Where a drag currently stands.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DragState {
    #[default]
    Idle,
    /// Dragging with no merge or drag-out under way.
    Dragging { active: ItemId },
    /// Overlapping `target`; the merge timer is running.
    Armed { active: ItemId, target: ItemId },
    /// Overlap held long enough: releasing now merges into `target`.
    MergePending { active: ItemId, target: ItemId },
    /// A folder child is over the outside region; the drag-out timer runs.
    DragOutArmed { active: ItemId, folder: ItemId },
    /// The drag-out move is being applied.
    DragOutPending { active: ItemId, folder: ItemId },
}

impl DragState {
    pub fn active(&self) -> Option<&ItemId> {
        match self {
            DragState::Idle => None,
            DragState::Dragging { active }
            | DragState::Armed { active, .. }
            | DragState::MergePending { active, .. }
            | DragState::DragOutArmed { active, .. }
            | DragState::DragOutPending { active, .. } => Some(active),
        }
    }

    /// The item a release would merge into.
    pub fn merge_candidate(&self) -> Option<&ItemId> {
        match self {
            DragState::MergePending { target, .. } => Some(target),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self, DragState::Idle)
    }
}

/// What a drop committed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DropOutcome {
    Reordered { container: Container, from: usize, to: usize },
    Merged(MergeOutcome),
}

/// Side effects of a transition, for the engine to turn into events.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DragEffect {
    MergeCandidateChanged(Option<ItemId>),
    /// `item` left `folder` for the root sequence mid-drag.
    DraggedOut { item: ItemId, folder: ItemId },
    Dropped(DropOutcome),
}

/// Per-drag bookkeeping. Dropped as a whole when the drag ends.
#[derive(Debug)]
pub struct DragSession {
    active: ItemId,
    /// Item the previous tick was over, and its index at the time.
    last_over: Option<ItemId>,
    last_index: Option<usize>,
    /// Classification of the previous tick on `last_over`.
    last_kind: Option<CollisionKind>,
    /// Target of the latest tick.
    over: Option<DropTarget>,
    merge_timer: Debounce<ItemId>,
    drag_out_timer: Debounce<ItemId>,
}

impl DragSession {
    fn new(active: ItemId, timings: &Timings) -> Self {
        Self {
            active,
            last_over: None,
            last_index: None,
            last_kind: None,
            over: None,
            merge_timer: Debounce::new(timings.merge_delay()),
            drag_out_timer: Debounce::new(timings.drag_out_delay()),
        }
    }

    fn forget_over(&mut self) {
        self.last_over = None;
        self.last_index = None;
        self.last_kind = None;
    }

    pub fn active(&self) -> &ItemId {
        &self.active
    }

    pub fn over(&self) -> Option<&DropTarget> {
        self.over.as_ref()
    }

    pub fn has_pending_timers(&self) -> bool {
        self.merge_timer.is_pending() || self.drag_out_timer.is_pending()
    }
}

/// The merge/reorder state machine.
#[derive(Debug)]
pub struct DragMachine {
    state: DragState,
    session: Option<DragSession>,
    timings: Timings,
}

impl DragMachine {
    pub fn new(timings: Timings) -> Self {
        Self {
            state: DragState::Idle,
            session: None,
            timings,
        }
    }

    pub fn state(&self) -> &DragState {
        &self.state
    }

    pub fn session(&self) -> Option<&DragSession> {
        self.session.as_ref()
    }

    pub fn is_dragging(&self) -> bool {
        self.session.is_some()
    }

    pub fn active(&self) -> Option<&ItemId> {
        self.session.as_ref().map(|s| &s.active)
    }

    pub fn merge_candidate(&self) -> Option<&ItemId> {
        self.state.merge_candidate()
    }

    /// Applies to sessions started after the call.
    pub fn set_timings(&mut self, timings: Timings) {
        self.timings = timings;
    }

    fn set_state(&mut self, state: DragState, effects: &mut Vec<DragEffect>) {
        let before = self.state.merge_candidate().cloned();
        self.state = state;
        let after = self.state.merge_candidate().cloned();
        if before != after {
            effects.push(DragEffect::MergeCandidateChanged(after));
        }
    }

    fn back_to_dragging(&mut self, effects: &mut Vec<DragEffect>) {
        if let Some(active) = self.active().cloned() {
            self.set_state(DragState::Dragging { active }, effects);
        }
    }

    /// Begin dragging `id`. An unknown id is ignored. A drag already in
    /// progress is cancelled first.
    pub fn start(&mut self, layout: &Layout, id: &ItemId, effects: &mut Vec<DragEffect>) -> bool {
        if self.session.is_some() {
            self.cancel(effects);
        }
        if !layout.contains(id) {
            log::warn!("Drag start for unknown item {}", id);
            return false;
        }
        self.session = Some(DragSession::new(id.clone(), &self.timings));
        self.set_state(DragState::Dragging { active: id.clone() }, effects);
        log::debug!("Drag started: {}", id);
        true
    }

    /// Abandon the drag without committing anything.
    pub fn cancel(&mut self, effects: &mut Vec<DragEffect>) {
        if self.session.take().is_some() {
            log::debug!("Drag cancelled");
        }
        self.set_state(DragState::Idle, effects);
    }

    /// Fire any timers that are due.
    pub fn poll(&mut self, layout: &mut Layout, now: Instant, effects: &mut Vec<DragEffect>) {
        let (merge, drag_out) = match self.session.as_mut() {
            Some(session) => (session.merge_timer.poll(now), session.drag_out_timer.poll(now)),
            None => return,
        };
        if let Some(target) = merge {
            self.fire_merge(&target, effects);
        }
        if let Some(active) = drag_out {
            self.fire_drag_out(layout, &active, effects);
        }
    }

    /// Merge timer callback. Only promotes if the drag is still armed on
    /// the same target it was armed for.
    pub(crate) fn fire_merge(&mut self, target: &ItemId, effects: &mut Vec<DragEffect>) {
        let active = match &self.state {
            DragState::Armed { active, target: armed } if armed == target => active.clone(),
            _ => {
                log::debug!("Ignoring stale merge timer for {}", target);
                return;
            }
        };
        log::debug!("Merge pending: {} onto {}", active, target);
        self.set_state(
            DragState::MergePending {
                active,
                target: target.clone(),
            },
            effects,
        );
    }

    /// Drag-out timer callback: move the active item out of its folder
    /// while the drag continues.
    pub(crate) fn fire_drag_out(&mut self, layout: &mut Layout, active: &ItemId, effects: &mut Vec<DragEffect>) {
        let folder = match &self.state {
            DragState::DragOutArmed { active: armed, folder } if armed == active => folder.clone(),
            _ => {
                log::debug!("Ignoring stale drag-out timer for {}", active);
                return;
            }
        };
        self.set_state(
            DragState::DragOutPending {
                active: active.clone(),
                folder: folder.clone(),
            },
            effects,
        );
        if layout.remove_from_folder(active, &folder, None) {
            effects.push(DragEffect::DraggedOut {
                item: active.clone(),
                folder,
            });
        }
        if let Some(session) = self.session.as_mut() {
            session.forget_over();
            session.over = None;
        }
        self.set_state(DragState::Dragging { active: active.clone() }, effects);
    }

    /// Feed one drag-move tick.
    pub fn update(&mut self, layout: &mut Layout, collision: &Collision, now: Instant, effects: &mut Vec<DragEffect>) {
        self.poll(layout, now, effects);

        let Some(active) = self.active().cloned() else {
            return;
        };
        let Some(location) = layout.locate(&active) else {
            log::warn!("Dragged item {} vanished; cancelling drag", active);
            self.cancel(effects);
            return;
        };

        let over = collision.over();
        let over_target = over.map(|c| c.target.clone());
        let over_index = over.and_then(|c| c.index);
        let Some(session) = self.session.as_mut() else {
            return;
        };
        session.over = over_target.clone();

        if let Container::Folder(folder) = &location.container {
            if over_target == Some(DropTarget::Outside) {
                if session.drag_out_timer.start_if_idle(now, active.clone()) {
                    log::debug!("Drag-out armed: {} from {}", active, folder);
                    let folder = folder.clone();
                    self.set_state(DragState::DragOutArmed { active, folder }, effects);
                }
                return;
            }
            if session.drag_out_timer.cancel() {
                self.back_to_dragging(effects);
            }
        }

        let Some(session) = self.session.as_mut() else {
            return;
        };
        let over_id = over_target
            .as_ref()
            .and_then(DropTarget::item_id)
            .filter(|id| **id != active)
            .cloned();

        let Some(over_id) = over_id else {
            session.merge_timer.cancel();
            session.forget_over();
            self.back_to_dragging(effects);
            return;
        };

        let was_overlap = session.last_kind == Some(CollisionKind::Overlap);
        session.last_kind = Some(collision.kind);

        if session.last_over.as_ref() == Some(&over_id) {
            let index_moved = session.last_index.is_some() && over_index != session.last_index;
            if !collision.is_overlap() || index_moved {
                session.merge_timer.cancel();
                if collision.is_overlap() {
                    session.last_index = over_index;
                }
                self.back_to_dragging(effects);
                return;
            }
            if was_overlap {
                return;
            }
            // Overlap regained on the same target: arm as if newly over it.
        } else {
            session.last_over = Some(over_id.clone());
            session.last_index = over_index;
            session.merge_timer.cancel();
        }

        // A folder child may only merge into another root folder; creating
        // a folder needs both leaves in the root.
        let own_folder = match &location.container {
            Container::Root => None,
            Container::Folder(folder) => Some(folder),
        };
        let target_kind = layout.root_index(&over_id).and_then(|_| layout.kind_of(&over_id));
        let can_merge = collision.is_overlap()
            && layout.kind_of(&active) == Some(ItemKind::Leaf)
            && own_folder != Some(&over_id)
            && match target_kind {
                Some(ItemKind::Folder) => true,
                Some(ItemKind::Leaf) => own_folder.is_none(),
                None => false,
            };
        if can_merge {
            session.merge_timer.start(now, over_id.clone());
            log::debug!("Merge armed: {} over {}", active, over_id);
            self.set_state(DragState::Armed { active, target: over_id }, effects);
        } else {
            self.back_to_dragging(effects);
        }
    }

    /// Release the drag. Timers already due fire first, then the drop is
    /// resolved: a merge if one is pending on the final target, otherwise
    /// a reorder within the shared container.
    pub fn end(&mut self, layout: &mut Layout, now: Instant, effects: &mut Vec<DragEffect>) -> Option<DropOutcome> {
        self.poll(layout, now, effects);

        let session = self.session.take()?;
        let state = std::mem::take(&mut self.state);
        if state.merge_candidate().is_some() {
            effects.push(DragEffect::MergeCandidateChanged(None));
        }

        let active = session.active;
        let Some(DropTarget::Item(over_id)) = session.over else {
            log::debug!("Drag of {} ended over nothing", active);
            return None;
        };
        if over_id == active {
            return None;
        }

        if let DragState::MergePending { target, .. } = &state {
            if *target == over_id {
                if let Some(outcome) = layout.merge(&active, target) {
                    log::info!("Merged {} into {}", active, outcome.folder_id());
                    let outcome = DropOutcome::Merged(outcome);
                    effects.push(DragEffect::Dropped(outcome.clone()));
                    return Some(outcome);
                }
            }
        }

        let from = layout.locate(&active)?;
        let to = layout.locate(&over_id)?;
        if from.container != to.container || from.index == to.index {
            return None;
        }
        if !layout.reorder_within(&from.container, from.index, to.index) {
            return None;
        }
        log::info!("Reordered {} from {} to {}", active, from.index, to.index);
        let outcome = DropOutcome::Reordered {
            container: from.container,
            from: from.index,
            to: to.index,
        };
        effects.push(DragEffect::Dropped(outcome.clone()));
        Some(outcome)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collision::{Candidate, CollisionKind};
    use crate::item::{Folder, Item, Leaf};
    use crate::timer::Duration;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    fn id(s: &str) -> ItemId {
        ItemId::from(s)
    }

    fn leaf(s: &str) -> Leaf {
        Leaf::new(s, s.to_uppercase(), format!("https://{s}.test"))
    }

    fn abc() -> Layout {
        Layout::from_items(vec![
            leaf("a").into(),
            leaf("b").into(),
            Folder::with_id(id("c"), vec![leaf("d")]).into(),
        ])
        .unwrap()
    }

    fn hit(kind: CollisionKind, target: DropTarget, index: Option<usize>) -> Collision {
        Collision {
            kind,
            candidates: vec![Candidate { target, index, score: 1.0 }],
        }
    }

    fn overlap(s: &str, index: usize) -> Collision {
        hit(CollisionKind::Overlap, DropTarget::Item(id(s)), Some(index))
    }

    fn near(s: &str, index: usize) -> Collision {
        hit(CollisionKind::Proximity, DropTarget::Item(id(s)), Some(index))
    }

    fn outside() -> Collision {
        hit(CollisionKind::Overlap, DropTarget::Outside, None)
    }

    fn root_ids(layout: &Layout) -> Vec<String> {
        layout.iter().map(|i| i.id().to_string()).collect()
    }

    fn machine() -> DragMachine {
        DragMachine::new(Timings::default())
    }

    #[test]
    fn test_sustained_overlap_merges_into_new_folder() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        assert!(m.start(&layout, &id("a"), &mut fx));
        m.update(&mut layout, &overlap("b", 1), t0, &mut fx);
        assert_eq!(m.state(), &DragState::Armed { active: id("a"), target: id("b") });

        m.update(&mut layout, &overlap("b", 1), t0 + ms(300), &mut fx);
        m.poll(&mut layout, t0 + ms(600), &mut fx);
        assert_eq!(m.merge_candidate(), Some(&id("b")));
        assert!(fx.contains(&DragEffect::MergeCandidateChanged(Some(id("b")))));

        let folder_id = match m.end(&mut layout, t0 + ms(650), &mut fx) {
            Some(DropOutcome::Merged(MergeOutcome::CreatedFolder(folder_id))) => folder_id,
            other => panic!("expected a new folder, got {other:?}"),
        };
        assert_eq!(layout.len(), 2);
        assert_eq!(layout.items()[0].id(), &folder_id);
        let children: Vec<&str> = layout.folder(&folder_id).unwrap().children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(children, vec!["b", "a"]);
        assert_eq!(layout.items()[1].id(), &id("c"));
        assert_eq!(layout.folder(&id("c")).unwrap().children.len(), 1);
        assert!(m.state().is_idle());
        assert_eq!(fx.last(), Some(&DragEffect::Dropped(DropOutcome::Merged(MergeOutcome::CreatedFolder(folder_id)))));
    }

    #[test]
    fn test_short_overlap_reorders() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("a"), &mut fx);
        m.update(&mut layout, &overlap("b", 1), t0, &mut fx);
        let outcome = m.end(&mut layout, t0 + ms(300), &mut fx);
        assert_eq!(
            outcome,
            Some(DropOutcome::Reordered { container: Container::Root, from: 0, to: 1 })
        );
        assert_eq!(root_ids(&layout), vec!["b", "a", "c"]);
    }

    #[test]
    fn test_merge_into_existing_folder() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("b"), &mut fx);
        m.update(&mut layout, &overlap("c", 2), t0, &mut fx);
        m.update(&mut layout, &overlap("c", 2), t0 + ms(700), &mut fx);
        assert_eq!(m.merge_candidate(), Some(&id("c")));
        let outcome = m.end(&mut layout, t0 + ms(710), &mut fx);
        assert_eq!(outcome, Some(DropOutcome::Merged(MergeOutcome::AddedToFolder(id("c")))));
        assert_eq!(root_ids(&layout), vec!["a", "c"]);
        let children: Vec<&str> = layout.folder(&id("c")).unwrap().children.iter().map(|c| c.id.as_str()).collect();
        assert_eq!(children, vec!["d", "b"]);
    }

    #[test]
    fn test_folder_source_never_merges() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("c"), &mut fx);
        for step in 0..20 {
            m.update(&mut layout, &overlap("a", 0), t0 + ms(step * 100), &mut fx);
            assert!(m.merge_candidate().is_none());
        }
        let outcome = m.end(&mut layout, t0 + ms(5000), &mut fx);
        assert_eq!(
            outcome,
            Some(DropOutcome::Reordered { container: Container::Root, from: 2, to: 0 })
        );
        assert_eq!(root_ids(&layout), vec!["c", "a", "b"]);
        assert!(layout.iter().all(|item| match item {
            Item::Folder(f) => !f.children.is_empty(),
            Item::Leaf(_) => true,
        }));
    }

    #[test]
    fn test_target_change_cancels_merge() {
        let t0 = Instant::now();
        let mut layout = Layout::from_items(vec![leaf("a").into(), leaf("b").into(), leaf("e").into()]).unwrap();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("a"), &mut fx);
        m.update(&mut layout, &overlap("b", 1), t0, &mut fx);
        m.update(&mut layout, &overlap("e", 2), t0 + ms(500), &mut fx);
        m.poll(&mut layout, t0 + ms(650), &mut fx);
        assert!(m.merge_candidate().is_none());

        let outcome = m.end(&mut layout, t0 + ms(700), &mut fx);
        assert!(matches!(outcome, Some(DropOutcome::Reordered { .. })));
        assert_eq!(layout.leaf_count(), 3);
        assert_eq!(root_ids(&layout), vec!["b", "e", "a"]);
    }

    #[test]
    fn test_stale_merge_timer_is_ignored() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("a"), &mut fx);
        m.update(&mut layout, &overlap("b", 1), t0, &mut fx);
        m.update(&mut layout, &near("b", 1), t0 + ms(100), &mut fx);
        // The timer for "b" fires late, as if it had never been cancelled.
        m.fire_merge(&id("b"), &mut fx);
        assert_eq!(m.state(), &DragState::Dragging { active: id("a") });
        assert!(m.end(&mut layout, t0 + ms(900), &mut fx).is_some());
        assert_eq!(layout.len(), 3);
    }

    #[test]
    fn test_proximity_on_same_target_cancels_pending_merge() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("a"), &mut fx);
        m.update(&mut layout, &overlap("b", 1), t0, &mut fx);
        m.poll(&mut layout, t0 + ms(600), &mut fx);
        assert_eq!(m.merge_candidate(), Some(&id("b")));

        m.update(&mut layout, &near("b", 1), t0 + ms(650), &mut fx);
        assert!(m.merge_candidate().is_none());
        assert!(fx.contains(&DragEffect::MergeCandidateChanged(None)));
    }

    #[test]
    fn test_index_shift_cancels_merge() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("a"), &mut fx);
        m.update(&mut layout, &overlap("b", 1), t0, &mut fx);
        m.update(&mut layout, &overlap("b", 0), t0 + ms(200), &mut fx);
        m.poll(&mut layout, t0 + ms(1000), &mut fx);
        assert!(m.merge_candidate().is_none());
        assert_eq!(m.session().unwrap().last_index, Some(0));
    }

    #[test]
    fn test_overlap_after_approaching_by_proximity_arms() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("a"), &mut fx);
        m.update(&mut layout, &near("b", 1), t0, &mut fx);
        assert_eq!(m.state(), &DragState::Dragging { active: id("a") });
        for step in 1..=20 {
            m.update(&mut layout, &overlap("b", 1), t0 + ms(step * 100), &mut fx);
        }
        assert_eq!(m.merge_candidate(), Some(&id("b")));

        let outcome = m.end(&mut layout, t0 + ms(2050), &mut fx);
        assert!(matches!(outcome, Some(DropOutcome::Merged(MergeOutcome::CreatedFolder(_)))));
        assert_eq!(layout.len(), 2);
    }

    #[test]
    fn test_regained_overlap_rearms_with_fresh_delay() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("a"), &mut fx);
        m.update(&mut layout, &overlap("b", 1), t0, &mut fx);
        m.update(&mut layout, &near("b", 1), t0 + ms(100), &mut fx);
        m.update(&mut layout, &overlap("b", 1), t0 + ms(200), &mut fx);
        assert_eq!(m.state(), &DragState::Armed { active: id("a"), target: id("b") });

        // The delay restarts from the regained overlap, not the first one.
        m.update(&mut layout, &overlap("b", 1), t0 + ms(700), &mut fx);
        assert!(m.merge_candidate().is_none());
        m.update(&mut layout, &overlap("b", 1), t0 + ms(800), &mut fx);
        assert_eq!(m.merge_candidate(), Some(&id("b")));
    }

    #[test]
    fn test_dragging_onto_self_is_noop() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("a"), &mut fx);
        m.update(&mut layout, &overlap("a", 0), t0, &mut fx);
        m.poll(&mut layout, t0 + ms(1000), &mut fx);
        assert!(m.merge_candidate().is_none());
        assert_eq!(m.end(&mut layout, t0 + ms(1000), &mut fx), None);
        assert_eq!(layout, abc());
    }

    #[test]
    fn test_drag_out_dissolves_single_child_folder_mid_drag() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("d"), &mut fx);
        m.update(&mut layout, &outside(), t0, &mut fx);
        assert_eq!(m.state(), &DragState::DragOutArmed { active: id("d"), folder: id("c") });
        m.update(&mut layout, &outside(), t0 + ms(200), &mut fx);
        m.poll(&mut layout, t0 + ms(400), &mut fx);

        assert_eq!(root_ids(&layout), vec!["a", "b", "d"]);
        assert!(fx.contains(&DragEffect::DraggedOut { item: id("d"), folder: id("c") }));
        assert_eq!(m.state(), &DragState::Dragging { active: id("d") });
        assert!(!m.session().unwrap().has_pending_timers());

        // The drag is still live and now reorders in the root.
        m.update(&mut layout, &near("a", 0), t0 + ms(450), &mut fx);
        let outcome = m.end(&mut layout, t0 + ms(500), &mut fx);
        assert_eq!(
            outcome,
            Some(DropOutcome::Reordered { container: Container::Root, from: 2, to: 0 })
        );
        assert_eq!(root_ids(&layout), vec!["d", "a", "b"]);
    }

    #[test]
    fn test_leaving_outside_cancels_drag_out() {
        let t0 = Instant::now();
        let mut layout = Layout::from_items(vec![Folder::with_id(id("c"), vec![leaf("d"), leaf("e")]).into()]).unwrap();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("d"), &mut fx);
        m.update(&mut layout, &outside(), t0, &mut fx);
        m.update(&mut layout, &near("e", 1), t0 + ms(300), &mut fx);
        m.poll(&mut layout, t0 + ms(500), &mut fx);
        assert_eq!(layout.len(), 1);

        let outcome = m.end(&mut layout, t0 + ms(600), &mut fx);
        assert_eq!(
            outcome,
            Some(DropOutcome::Reordered { container: Container::Folder(id("c")), from: 0, to: 1 })
        );
    }

    #[test]
    fn test_release_on_drag_out_deadline_applies_drag_out_first() {
        let t0 = Instant::now();
        let mut layout = Layout::from_items(vec![
            leaf("a").into(),
            Folder::with_id(id("c"), vec![leaf("d"), leaf("e")]).into(),
        ])
        .unwrap();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("d"), &mut fx);
        m.update(&mut layout, &outside(), t0, &mut fx);
        assert_eq!(m.end(&mut layout, t0 + ms(400), &mut fx), None);
        assert_eq!(root_ids(&layout), vec!["a", "c", "d"]);
        assert!(m.session().is_none());
    }

    #[test]
    fn test_release_before_drag_out_deadline_keeps_item() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("d"), &mut fx);
        m.update(&mut layout, &outside(), t0, &mut fx);
        assert_eq!(m.end(&mut layout, t0 + ms(399), &mut fx), None);
        assert_eq!(layout, abc());
        // Nothing can fire after the session is gone.
        m.poll(&mut layout, t0 + ms(5000), &mut fx);
        assert_eq!(layout, abc());
    }

    #[test]
    fn test_child_over_root_item_does_not_arm() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("d"), &mut fx);
        m.update(&mut layout, &overlap("a", 0), t0, &mut fx);
        assert_eq!(m.state(), &DragState::Dragging { active: id("d") });
        assert_eq!(m.end(&mut layout, t0 + ms(1000), &mut fx), None);
        assert_eq!(layout, abc());
    }

    #[test]
    fn test_start_unknown_item_is_ignored() {
        let layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();
        assert!(!m.start(&layout, &id("zzz"), &mut fx));
        assert!(!m.is_dragging());
    }

    #[test]
    fn test_restart_drops_previous_session() {
        let t0 = Instant::now();
        let mut layout = abc();
        let mut m = machine();
        let mut fx = Vec::new();

        m.start(&layout, &id("a"), &mut fx);
        m.update(&mut layout, &overlap("b", 1), t0, &mut fx);
        m.start(&layout, &id("b"), &mut fx);
        assert!(!m.session().unwrap().has_pending_timers());
        m.poll(&mut layout, t0 + ms(1000), &mut fx);
        assert_eq!(m.state(), &DragState::Dragging { active: id("b") });
    }
}
