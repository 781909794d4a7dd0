//! Host boundary.
//!
//! The engine side of the contract. The host's integration layer implements
//! these traits and calls the core's hooks directly from its entity
//! callbacks; nothing here touches engine internals.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter};

use crate::attr::AttrTree;
use crate::ids::{EntityId, PlayerId};

/// Damage categories seen by the interception hook.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum DamageKind {
    Poison,
    Injury,
    Hunger,
    Fire,
    Suffocation,
}

/// Where a damage event originated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Display, EnumIter)]
#[serde(rename_all = "lowercase")]
pub enum DamageSource {
    /// Self-inflicted by ingestion.
    Internal,
    /// Resolved from a deferred, unidentified cause.
    Unknown,
    /// External attack or environment.
    External,
}

/// Damage-over-time shape. Both parts are required; a record carrying only
/// one of them is treated as having neither.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct OverTime {
    pub duration_sec: f64,
    pub ticks: i32,
}

impl OverTime {
    /// Pair up the optional duration/ticks fields, yielding `None` unless
    /// both are present and positive.
    pub fn from_parts(duration_sec: Option<f64>, ticks: Option<i32>) -> Option<Self> {
        match (duration_sec, ticks) {
            (Some(duration_sec), Some(ticks)) if duration_sec > 0.0 && ticks > 0 => Some(Self {
                duration_sec,
                ticks,
            }),
            _ => None,
        }
    }

    /// Merge two shapes by taking the max of each part.
    pub fn merged(self, other: Self) -> Self {
        Self {
            duration_sec: self.duration_sec.max(other.duration_sec),
            ticks: self.ticks.max(other.ticks),
        }
    }
}

/// One damage application handed to the host.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DamageEvent {
    pub kind: DamageKind,
    pub source: DamageSource,
    pub amount: f64,
    pub over_time: Option<OverTime>,
}

impl DamageEvent {
    pub fn poison(source: DamageSource, amount: f64, over_time: Option<OverTime>) -> Self {
        Self {
            kind: DamageKind::Poison,
            source,
            amount,
            over_time,
        }
    }
}

/// Monotonically increasing in-game clock, read in hours.
pub trait WorldClock {
    fn hours(&self) -> f64;
}

/// Sink for damage the core decides to apply.
///
/// In the host, applying damage and intercepting damage share a call path, so
/// a call here may synchronously feed back into the interception hook. The
/// scheduler's guard flags fence that reentrancy.
pub trait DamageSink {
    fn apply_damage(&mut self, entity: EntityId, event: DamageEvent);
}

/// Host-provided per-entity attribute storage. Writes are fire-and-forget.
pub trait AttrStore {
    fn save_tree(&mut self, entity: EntityId, key: &str, tree: AttrTree);
    fn load_tree(&self, entity: EntityId, key: &str) -> Option<AttrTree>;
}

/// Fire-and-forget player notification channel. The message is a stable key
/// the host localizes before display.
pub trait Messenger {
    fn send_warning(&mut self, player: &PlayerId, message: &str);
}

/// Host collaborators bundled for one core operation.
pub struct HostCtx<'a> {
    pub clock: &'a dyn WorldClock,
    pub damage: &'a mut dyn DamageSink,
    pub store: &'a mut dyn AttrStore,
    pub messenger: &'a mut dyn Messenger,
}

/// Snapshot of the gating facts about an entity at the time of a call.
///
/// Operations consult this and silently no-op when it fails; that is routine
/// gating, not an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct EntityGate {
    /// Entity is alive.
    pub alive: bool,
    /// Call is running on the authoritative server side.
    pub server_side: bool,
    /// Entity is a player in survival mode.
    pub survival_player: bool,
}

impl EntityGate {
    /// Gate for a living server-side survival player.
    pub const fn eligible() -> Self {
        Self {
            alive: true,
            server_side: true,
            survival_player: true,
        }
    }

    /// True when scheduling, tick evaluation, and escalation may run.
    pub const fn allows_poison(&self) -> bool {
        self.alive && self.server_side && self.survival_player
    }
}
