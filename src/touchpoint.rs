//! Touchpoints as parsed from attribution inputs, and their ordering.

use std::cmp::Ordering;

/// An ad interaction: a click or a view at some time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Touchpoint {
    pub id: i64,
    pub is_click: bool,
    pub ts: u64,
}

impl Touchpoint {
    pub fn new(id: i64, is_click: bool, ts: u64) -> Self {
        Self { id, is_click, ts }
    }

    /// Attribution order.
    ///
    /// If both are clicks, or both are views, the earliest one comes first.
    /// If one is a click and the other a view, the view comes first.
    pub fn attribution_cmp(&self, other: &Self) -> Ordering {
        self.is_click
            .cmp(&other.is_click)
            .then_with(|| self.ts.cmp(&other.ts))
    }
}

/// Sorts touchpoints in attribution order. Ties keep their input order.
pub fn sort_touchpoints(touchpoints: &mut [Touchpoint]) {
    touchpoints.sort_by(Touchpoint::attribution_cmp);
}
