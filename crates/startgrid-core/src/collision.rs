//! Collision classification for a drag tick.
//!
//! Strict rectangle overlap always wins over nearest-centre proximity, so an
//! icon dragged past its neighbours toward a reorder gap does not register
//! as being "on" any of them.

use crate::item::ItemId;
use kurbo::Rect;

/// Something a dragged item can be over.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum DropTarget {
    /// A grid item, in the root sequence or inside the open folder.
    Item(ItemId),
    /// The area around an open folder view.
    Outside,
}

impl DropTarget {
    pub fn item_id(&self) -> Option<&ItemId> {
        match self {
            DropTarget::Item(id) => Some(id),
            DropTarget::Outside => None,
        }
    }
}

/// A droppable region reported by the renderer for this tick.
#[derive(Debug, Clone, PartialEq)]
pub struct DropRegion {
    pub target: DropTarget,
    pub rect: Rect,
    /// Sortable index of the region within its container, if it has one.
    pub index: Option<usize>,
}

impl DropRegion {
    pub fn item(id: impl Into<ItemId>, rect: Rect, index: usize) -> Self {
        Self {
            target: DropTarget::Item(id.into()),
            rect,
            index: Some(index),
        }
    }

    pub fn outside(rect: Rect) -> Self {
        Self {
            target: DropTarget::Outside,
            rect,
            index: None,
        }
    }
}

/// How the candidates of a tick were found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollisionKind {
    /// The dragged box intersects the candidate.
    Overlap,
    /// Nothing intersects; the candidate has the nearest centre.
    Proximity,
}

/// A region selected by the classifier.
#[derive(Debug, Clone, PartialEq)]
pub struct Candidate {
    pub target: DropTarget,
    pub index: Option<usize>,
    /// Intersection-over-union for overlaps, centre distance for proximity.
    pub score: f64,
}

/// Classification of one drag tick.
#[derive(Debug, Clone, PartialEq)]
pub struct Collision {
    pub kind: CollisionKind,
    pub candidates: Vec<Candidate>,
}

impl Collision {
    /// The primary candidate: what the drag is "over".
    pub fn over(&self) -> Option<&Candidate> {
        self.candidates.first()
    }

    pub fn is_overlap(&self) -> bool {
        self.kind == CollisionKind::Overlap
    }

    pub fn is_empty(&self) -> bool {
        self.candidates.is_empty()
    }
}

/// Intersection area over union area, zero when the boxes only touch.
pub fn intersection_ratio(a: Rect, b: Rect) -> f64 {
    let intersection = a.intersect(b).area();
    if intersection <= 0.0 {
        return 0.0;
    }
    intersection / (a.area() + b.area() - intersection)
}

/// Every region the dragged box strictly intersects, best overlap first.
pub fn overlapping(drag: Rect, regions: &[DropRegion]) -> Vec<Candidate> {
    let mut hits: Vec<Candidate> = regions
        .iter()
        .filter_map(|region| {
            let ratio = intersection_ratio(drag, region.rect);
            (ratio > 0.0).then(|| Candidate {
                target: region.target.clone(),
                index: region.index,
                score: ratio,
            })
        })
        .collect();
    // Stable, so equal ratios keep the renderer's order.
    hits.sort_by(|a, b| b.score.total_cmp(&a.score));
    hits
}

/// The region whose centre is nearest the dragged box's centre.
pub fn closest_center(drag: Rect, regions: &[DropRegion]) -> Option<Candidate> {
    let center = drag.center();
    let mut best: Option<Candidate> = None;
    for region in regions {
        let distance = center.distance(region.rect.center());
        if best.as_ref().is_none_or(|b| distance < b.score) {
            best = Some(Candidate {
                target: region.target.clone(),
                index: region.index,
                score: distance,
            });
        }
    }
    best
}

/// Classify a drag tick: overlap candidates if there are any, otherwise the
/// single nearest region.
pub fn classify(drag: Rect, regions: &[DropRegion]) -> Collision {
    let hits = overlapping(drag, regions);
    if !hits.is_empty() {
        return Collision {
            kind: CollisionKind::Overlap,
            candidates: hits,
        };
    }
    Collision {
        kind: CollisionKind::Proximity,
        candidates: closest_center(drag, regions).into_iter().collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tile(x: f64, y: f64) -> Rect {
        Rect::new(x, y, x + 100.0, y + 100.0)
    }

    #[test]
    fn test_overlap_preferred_over_closer_proximity() {
        // "far" overlaps a sliver; "near" is closer by centre but disjoint.
        let drag = tile(0.0, 0.0);
        let regions = vec![
            DropRegion::item("near", Rect::new(101.0, 0.0, 201.0, 100.0), 0),
            DropRegion::item("far", Rect::new(95.0, 90.0, 195.0, 190.0), 1),
        ];
        let collision = classify(drag, &regions);
        assert_eq!(collision.kind, CollisionKind::Overlap);
        assert_eq!(collision.candidates.len(), 1);
        assert_eq!(collision.over().unwrap().target, DropTarget::Item(ItemId::from("far")));
    }

    #[test]
    fn test_overlaps_sorted_by_ratio() {
        let drag = tile(0.0, 0.0);
        let regions = vec![
            DropRegion::item("small", tile(80.0, 0.0), 0),
            DropRegion::item("big", tile(20.0, 0.0), 1),
            DropRegion::outside(Rect::new(-1000.0, -1000.0, 1000.0, 1000.0)),
        ];
        let collision = classify(drag, &regions);
        let ids: Vec<_> = collision.candidates.iter().map(|c| c.target.clone()).collect();
        assert_eq!(
            ids,
            vec![
                DropTarget::Item(ItemId::from("big")),
                DropTarget::Item(ItemId::from("small")),
                DropTarget::Outside,
            ]
        );
    }

    #[test]
    fn test_outside_wins_when_nothing_else_overlaps() {
        let drag = tile(500.0, 500.0);
        let regions = vec![
            DropRegion::item("a", tile(0.0, 0.0), 0),
            DropRegion::outside(Rect::new(-1000.0, -1000.0, 1000.0, 1000.0)),
        ];
        let collision = classify(drag, &regions);
        assert!(collision.is_overlap());
        assert_eq!(collision.over().unwrap().target, DropTarget::Outside);
    }

    #[test]
    fn test_proximity_returns_single_nearest() {
        let drag = tile(0.0, 0.0);
        let regions = vec![
            DropRegion::item("a", tile(300.0, 0.0), 0),
            DropRegion::item("b", tile(150.0, 0.0), 1),
            DropRegion::item("c", tile(0.0, 400.0), 2),
        ];
        let collision = classify(drag, &regions);
        assert_eq!(collision.kind, CollisionKind::Proximity);
        assert_eq!(collision.candidates.len(), 1);
        let over = collision.over().unwrap();
        assert_eq!(over.target, DropTarget::Item(ItemId::from("b")));
        assert_eq!(over.index, Some(1));
        assert!((over.score - 150.0).abs() < 1e-9);
    }

    #[test]
    fn test_touching_edges_are_not_overlap() {
        let drag = tile(0.0, 0.0);
        let regions = vec![DropRegion::item("a", tile(100.0, 0.0), 0)];
        assert_eq!(classify(drag, &regions).kind, CollisionKind::Proximity);
    }

    #[test]
    fn test_no_regions() {
        let collision = classify(tile(0.0, 0.0), &[]);
        assert!(collision.is_empty());
        assert!(collision.over().is_none());
    }
}
