//! Lane assignment: packs date ranges into horizontal lanes so that no two
//! overlapping ranges share a lane.
//!
//! The assignor is greedy first-fit over items sorted by start date, with
//! an advisory layer of caller-supplied forced positions. It is a pure
//! function: every call recomputes the full assignment from its inputs.

use std::collections::BTreeMap;

use serde::Serialize;
use tracing::{debug, trace};

use crate::model::{Interval, TrackId};

/// Caller-owned pins from track id to the lane it should occupy.
///
/// A pin is honored when the item fits in that lane at the moment it is
/// processed; otherwise the item is placed by ordinary first-fit.
pub type ForcedPositions = BTreeMap<TrackId, usize>;

/// Result of [`assign_lanes`].
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LaneAssignment<'a, T> {
    /// Lanes in index order; each lane lists its items in placement order.
    /// A lane may be empty only when a forced position reached past it.
    pub lanes: Vec<Vec<&'a T>>,
    /// Lane index of every input item.
    pub item_lane_map: BTreeMap<TrackId, usize>,
}

impl<T> LaneAssignment<'_, T> {
    pub fn lane_of(&self, id: TrackId) -> Option<usize> {
        self.item_lane_map.get(&id).copied()
    }

    pub fn lane_count(&self) -> usize {
        self.lanes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.item_lane_map.is_empty()
    }

    /// Number of lane rows to display: one past the highest lane in use,
    /// but never fewer than `min`.
    pub fn visible_lane_count(&self, min: usize) -> usize {
        self.item_lane_map
            .values()
            .max()
            .map_or(0, |&lane| lane + 1)
            .max(min)
    }
}

impl<T> Default for LaneAssignment<'_, T> {
    fn default() -> Self {
        Self {
            lanes: Vec::new(),
            item_lane_map: BTreeMap::new(),
        }
    }
}

/// Whether two ranges collide.
///
/// Ranges that merely touch (one ends on the day the other starts) do not
/// overlap.
pub fn overlaps<A, B>(a: &A, b: &B) -> bool
where
    A: Interval + ?Sized,
    B: Interval + ?Sized,
{
    a.start() < b.end() && a.end() > b.start()
}

/// Whether `item` can join `lane` without overlapping any of its members.
pub fn can_fit<A, B>(item: &A, lane: &[B]) -> bool
where
    A: Interval + ?Sized,
    B: Interval,
{
    lane.iter().all(|member| !overlaps(item, member))
}

/// Assign every item to a lane.
///
/// Items are processed in ascending start order; the sort is stable, so
/// items sharing a start date keep their input order. Each item goes to its
/// forced lane if it has one and fits there, otherwise to the lowest lane
/// that admits it, otherwise to a new lane. Placed items are never moved.
///
/// Forced positions naming ids absent from `items` are ignored.
pub fn assign_lanes<'a, T: Interval>(
    items: &'a [T],
    forced: &ForcedPositions,
) -> LaneAssignment<'a, T> {
    let mut sorted: Vec<&'a T> = items.iter().collect();
    sorted.sort_by_key(|item| item.start());

    let mut assignment = LaneAssignment::default();
    for item in sorted {
        let lane = find_lane(item, &mut assignment.lanes, forced);
        if lane == assignment.lanes.len() {
            assignment.lanes.push(Vec::new());
        }
        assignment.lanes[lane].push(item);
        assignment.item_lane_map.insert(item.id(), lane);
        trace!(id = item.id(), lane, "placed item");
    }

    debug!(
        items = items.len(),
        lanes = assignment.lanes.len(),
        forced = forced.len(),
        "assigned lanes"
    );
    assignment
}

/// Pick the lane for `item` given the lanes built so far. Returns
/// `lanes.len()` when a new lane is needed.
fn find_lane<'a, T: Interval>(
    item: &T,
    lanes: &mut Vec<Vec<&'a T>>,
    forced: &ForcedPositions,
) -> usize {
    if let Some(&target) = forced.get(&item.id()) {
        // An index with no representable successor cannot be a lane.
        if let Some(needed) = target.checked_add(1) {
            if lanes.len() < needed {
                lanes.resize_with(needed, Vec::new);
            }
            if can_fit(item, &lanes[target]) {
                return target;
            }
        }
        trace!(
            id = item.id(),
            target,
            "forced lane unusable, falling back to first fit"
        );
    }

    lanes
        .iter()
        .position(|lane| can_fit(item, lane))
        .unwrap_or(lanes.len())
}
