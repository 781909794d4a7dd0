//! Pending poison events and the per-entity queue.

use serde::{Deserialize, Serialize};

use crate::host::OverTime;
use crate::ids::ItemCode;

/// One deferred poison hit.
///
/// `item_code` is `None` for poison with no identified cause; those events
/// form their own coalescing group. Lifecycle: queued, then either merged
/// into another event of the same group, resolved (damage applied), or
/// cleared without damage when the entity dies.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PendingPoison {
    /// Deferred damage, > 0 while queued.
    pub damage: f64,
    /// Causal item, if known.
    pub item_code: Option<ItemCode>,
    /// Absolute in-game clock time (hours) at which the event resolves.
    pub trigger_hours: f64,
    /// Damage-over-time shape applied on resolution.
    pub over_time: Option<OverTime>,
}

impl PendingPoison {
    pub fn is_due(&self, now_hours: f64) -> bool {
        self.trigger_hours <= now_hours
    }
}

/// Per-entity queue of pending poison events.
///
/// Event order carries no meaning; any due event may resolve. Coalescing
/// keeps at most one event per distinct item code.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PoisonQueue {
    events: Vec<PendingPoison>,
}

impl PoisonQueue {
    pub fn new() -> Self {
        Self::default()
    }

    /// Admit an event. Zero or negative damage is never scheduled.
    pub fn push(&mut self, event: PendingPoison) -> bool {
        if event.damage <= 0.0 {
            return false;
        }
        self.events.push(event);
        true
    }

    /// Merge events that share an item code.
    ///
    /// Per group: damage sums, the earliest trigger wins (a second exposure
    /// never delays an already-pending effect), and the over-time shape takes
    /// the max of each present part.
    pub fn coalesce(&mut self) {
        let mut merged: Vec<PendingPoison> = Vec::with_capacity(self.events.len());
        for event in self.events.drain(..) {
            match merged.iter_mut().find(|m| m.item_code == event.item_code) {
                Some(existing) => {
                    existing.damage += event.damage;
                    existing.trigger_hours = existing.trigger_hours.min(event.trigger_hours);
                    existing.over_time = match (existing.over_time, event.over_time) {
                        (Some(a), Some(b)) => Some(a.merged(b)),
                        (a, b) => a.or(b),
                    };
                }
                None => merged.push(event),
            }
        }
        self.events = merged;
    }

    /// Sum of all pending damage.
    pub fn total_damage(&self) -> f64 {
        self.events.iter().map(|event| event.damage).sum()
    }

    /// Index of a due event, scanning in reverse insertion order. Which due
    /// event resolves first is not part of the contract.
    pub fn find_due(&self, now_hours: f64) -> Option<usize> {
        (0..self.events.len())
            .rev()
            .find(|&i| self.events[i].is_due(now_hours))
    }

    pub fn remove(&mut self, index: usize) -> PendingPoison {
        self.events.remove(index)
    }

    /// Distinct item codes currently queued.
    pub fn item_codes(&self) -> Vec<ItemCode> {
        let mut codes: Vec<ItemCode> = Vec::new();
        for event in &self.events {
            if let Some(code) = &event.item_code {
                if !codes.contains(code) {
                    codes.push(code.clone());
                }
            }
        }
        codes
    }

    pub fn events(&self) -> &[PendingPoison] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}
