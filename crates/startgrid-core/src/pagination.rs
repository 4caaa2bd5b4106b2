//! Responsive grid metrics, page slicing and gesture-driven paging.

use crate::config::{GridConfig, MAX_GRID_DIMENSION, Timings};
use crate::timer::{Debounce, Instant};
use std::ops::Range;

/// Horizontal padding around the grid.
pub const VIEWPORT_PADDING: f64 = 48.0;
/// Narrowest width the grid lays itself out for.
pub const MIN_AVAILABLE_WIDTH: f64 = 320.0;

/// Column and row gaps for a grid shape. Denser grids get tighter gaps.
pub fn grid_gaps(columns: usize, rows: usize) -> (f64, f64) {
    let col_gap = (40 - (columns as i64 - 3) * 6).max(8);
    let row_gap = (32 - (rows as i64 - 2) * 5).max(12);
    (col_gap as f64, row_gap as f64)
}

/// Width a row of `columns` icons needs.
pub fn required_width(columns: usize, rows: usize, icon_size: f64) -> f64 {
    let (col_gap, _) = grid_gaps(columns, rows);
    columns as f64 * icon_size + columns.saturating_sub(1) as f64 * col_gap
}

/// Resolved layout of the grid for one viewport width.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GridMetrics {
    /// Columns actually shown, never more than configured.
    pub columns: usize,
    pub rows: usize,
    pub col_gap: f64,
    pub row_gap: f64,
    /// Uniform scale below 1.0 when even the chosen columns do not fit.
    pub scale: f64,
    pub available_width: f64,
}

impl GridMetrics {
    /// Fit the configured grid into `viewport_width`.
    pub fn compute(config: &GridConfig, viewport_width: f64) -> Self {
        let available = (viewport_width - VIEWPORT_PADDING - config.left_offset).max(MIN_AVAILABLE_WIDTH);
        let rows = config.rows.clamp(1, MAX_GRID_DIMENSION);
        let max_columns = config.columns.clamp(1, MAX_GRID_DIMENSION);

        let columns = (1..=max_columns)
            .rev()
            .find(|&c| required_width(c, rows, config.icon_size) <= available)
            .unwrap_or(1);

        let required = required_width(columns, rows, config.icon_size);
        let scale = if required > available {
            (available / required).min(1.0)
        } else {
            1.0
        };
        let (col_gap, row_gap) = grid_gaps(columns, rows);

        Self {
            columns,
            rows,
            col_gap,
            row_gap,
            scale,
            available_width: available,
        }
    }

    /// Items per page.
    pub fn capacity(&self) -> usize {
        self.columns.saturating_mul(self.rows)
    }
}

/// Number of pages needed for `len` items.
pub fn page_count(len: usize, capacity: usize) -> usize {
    if capacity == 0 {
        return 0;
    }
    len.div_ceil(capacity)
}

/// Index range of the items on `page`; empty past the last page.
pub fn page_range(len: usize, capacity: usize, page: usize) -> Range<usize> {
    let start = page.saturating_mul(capacity).min(len);
    let end = start.saturating_add(capacity).min(len);
    start..end
}

/// Split items into contiguous pages; the last may be partial.
pub fn paginate<T>(items: &[T], capacity: usize) -> Vec<&[T]> {
    if capacity == 0 {
        return Vec::new();
    }
    items.chunks(capacity).collect()
}

/// A page navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageRequest {
    /// Move by a signed number of pages.
    Delta(isize),
    /// Jump to an absolute page.
    Index(usize),
}

/// Keys that turn pages.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageKey {
    Previous,
    Next,
}

impl PageKey {
    /// Map a key name to a paging key.
    pub fn from_key(key: &str) -> Option<Self> {
        match key {
            "ArrowLeft" => Some(PageKey::Previous),
            "ArrowRight" => Some(PageKey::Next),
            _ => None,
        }
    }
}

/// Current page plus the wheel accumulator and change cooldown.
#[derive(Debug, Clone)]
pub struct Pager {
    current: usize,
    total: usize,
    accumulated: f64,
    last_wheel: Option<Instant>,
    cooldown: Debounce<()>,
    timings: Timings,
}

impl Pager {
    pub fn new(timings: Timings) -> Self {
        Self {
            current: 0,
            total: 0,
            accumulated: 0.0,
            last_wheel: None,
            cooldown: Debounce::new(timings.page_cooldown()),
            timings,
        }
    }

    pub fn current(&self) -> usize {
        self.current
    }

    pub fn total(&self) -> usize {
        self.total
    }

    pub fn accumulated(&self) -> f64 {
        self.accumulated
    }

    /// Whether a page change is still settling.
    pub fn is_changing(&self) -> bool {
        self.cooldown.is_pending()
    }

    pub fn set_timings(&mut self, timings: Timings) {
        self.cooldown.set_delay(timings.page_cooldown());
        self.timings = timings;
    }

    /// Update the page count, pulling the current page back if it no longer
    /// exists. Returns the new current page when it moved.
    pub fn set_total(&mut self, total: usize) -> Option<usize> {
        self.total = total;
        let clamped = self.current.min(total.saturating_sub(1));
        if clamped != self.current {
            self.current = clamped;
            return Some(clamped);
        }
        None
    }

    /// End an elapsed cooldown. Returns true if one ended.
    pub fn poll(&mut self, now: Instant) -> bool {
        if self.cooldown.poll(now).is_some() {
            self.accumulated = 0.0;
            return true;
        }
        false
    }

    /// Drop the cooldown and accumulator.
    pub fn reset(&mut self) {
        self.cooldown.cancel();
        self.accumulated = 0.0;
        self.last_wheel = None;
    }

    /// Go to a page, clamped to the valid range. Returns the new page if it
    /// changed; a change starts the cooldown.
    pub fn go_to(&mut self, page: usize, now: Instant) -> Option<usize> {
        if self.total == 0 {
            return None;
        }
        let page = page.min(self.total - 1);
        if page == self.current {
            return None;
        }
        self.current = page;
        self.cooldown.start(now, ());
        log::debug!("Page changed to {} of {}", page + 1, self.total);
        Some(page)
    }

    pub fn request(&mut self, request: PageRequest, now: Instant) -> Option<usize> {
        let target = match request {
            PageRequest::Index(index) => index,
            PageRequest::Delta(delta) => self.current.saturating_add_signed(delta),
        };
        self.go_to(target, now)
    }

    /// Feed one wheel event. Horizontal-dominant deltas and pure vertical
    /// deltas count; diagonal ones are ignored.
    pub fn on_wheel(&mut self, delta_x: f64, delta_y: f64, now: Instant) -> Option<usize> {
        self.poll(now);
        if self.total <= 1 || self.is_changing() {
            return None;
        }

        let new_gesture = self
            .last_wheel
            .is_none_or(|last| now.duration_since(last) > self.timings.wheel_gesture_gap());
        if new_gesture {
            self.accumulated = 0.0;
        }
        self.last_wheel = Some(now);

        let delta = if delta_x.abs() > delta_y.abs() {
            delta_x
        } else if delta_x == 0.0 && delta_y != 0.0 {
            delta_y
        } else {
            return None;
        };

        self.accumulated += delta;
        let threshold = self.timings.wheel_threshold;
        if self.accumulated > threshold {
            self.accumulated = 0.0;
            self.go_to(self.current + 1, now)
        } else if self.accumulated < -threshold {
            self.accumulated = 0.0;
            let previous = self.current.checked_sub(1)?;
            self.go_to(previous, now)
        } else {
            None
        }
    }

    /// Feed a key press. Each press is a whole step.
    pub fn on_key(&mut self, key: PageKey, now: Instant) -> Option<usize> {
        self.poll(now);
        if self.is_changing() {
            return None;
        }
        match key {
            PageKey::Next => self.go_to(self.current + 1, now),
            PageKey::Previous => {
                let previous = self.current.checked_sub(1)?;
                self.go_to(previous, now)
            }
        }
    }
}
