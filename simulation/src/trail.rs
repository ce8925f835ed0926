use std::collections::VecDeque;

use cgmath::Point3;

/// Bounded, oldest-first history of photon world positions.
///
/// The buffer is only ever filled while enabled; turning it off drops every
/// point at once so re-enabling starts from nothing.
#[derive(Debug, Clone, PartialEq)]
pub struct TrailBuffer {
    points: VecDeque<Point3<f32>>,
    capacity: usize,
    enabled: bool,
}

impl TrailBuffer {
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            points: VecDeque::with_capacity(capacity),
            capacity,
            enabled: true,
        }
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        if !enabled {
            self.points.clear();
        }
        self.enabled = enabled;
    }

    /// Appends a point, evicting from the front once over capacity.
    /// Ignored while disabled.
    pub fn push(&mut self, point: Point3<f32>) {
        if !self.enabled {
            return;
        }
        self.points.push_back(point);
        while self.points.len() > self.capacity {
            self.points.pop_front();
        }
    }

    /// Drops points whose x coordinate lies more than `window` behind `head_x`.
    ///
    /// Points are chronological and x only grows in straight-line travel, so
    /// eviction stops at the first point still inside the window.
    pub fn evict_behind(&mut self, head_x: f32, window: f32) {
        let cutoff = head_x - window;
        while self.points.front().is_some_and(|p| p.x < cutoff) {
            self.points.pop_front();
        }
    }

    pub fn clear(&mut self) {
        self.points.clear();
    }

    pub fn iter(&self) -> impl ExactSizeIterator<Item = &Point3<f32>> + '_ {
        self.points.iter()
    }

    pub fn latest(&self) -> Option<&Point3<f32>> {
        self.points.back()
    }
}
