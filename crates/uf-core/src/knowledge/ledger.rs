//! Per-player food knowledge.
//!
//! Tracks how "known" each food code is as a fraction in [0, 1], plus a
//! parallel health-known set for foods whose safety the player has personally
//! experienced. Learning propagates across a food's discovery family.

use std::collections::{BTreeMap, BTreeSet, HashMap};

use log::{debug, warn};
use serde::{Deserialize, Serialize};

use crate::attr::AttrTree;
use crate::ids::{ItemCode, PlayerId};
use crate::knowledge::family::expand_family;

/// Attribute-store key under which a player's knowledge is persisted.
pub const KNOWLEDGE_ATTR_KEY: &str = "ufFoodKnowledge";

/// Progress deltas below this are dropped as noise.
pub const PROGRESS_EPSILON: f32 = 1e-4;

/// One player's food knowledge.
///
/// `known` is the legacy known-set kept for backward compatibility: any code
/// present there reads as progress 1.0 regardless of the numeric ledger.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PlayerKnowledge {
    known: BTreeSet<ItemCode>,
    progress: BTreeMap<ItemCode, f32>,
    health_known: BTreeSet<ItemCode>,
}

impl PlayerKnowledge {
    pub fn new() -> Self {
        Self::default()
    }

    /// Learned fraction for a code: legacy-known reads as 1.0, otherwise the
    /// ledger value, otherwise 0.0.
    pub fn progress(&self, code: &ItemCode) -> f32 {
        if self.known.contains(code) {
            return 1.0;
        }
        self.progress.get(code).copied().unwrap_or(0.0)
    }

    /// Add learning progress. Returns true when this call completed the code
    /// (crossed 1.0), after propagating to the whole family.
    pub fn add_progress(&mut self, code: &ItemCode, amount: f32) -> bool {
        if amount <= 0.0 {
            return false;
        }
        let current = self.progress(code);
        let new = (current + amount).min(1.0);
        if new - current < PROGRESS_EPSILON {
            return false;
        }
        self.progress.insert(code.clone(), new);
        if new >= 1.0 {
            self.mark_known(code);
            true
        } else {
            false
        }
    }

    /// Mark a code fully known, along with its whole discovery family.
    pub fn mark_known(&mut self, code: &ItemCode) {
        self.mark_one_known(code);
        for member in expand_family(code) {
            self.mark_one_known(&member);
        }
    }

    fn mark_one_known(&mut self, code: &ItemCode) {
        self.known.insert(code.clone());
        self.progress.insert(code.clone(), 1.0);
    }

    pub fn is_known(&self, code: &ItemCode) -> bool {
        self.progress(code) >= 1.0
    }

    /// Mark a code's health effects as personally experienced, along with its
    /// whole discovery family.
    pub fn mark_health_known(&mut self, code: &ItemCode) {
        self.health_known.insert(code.clone());
        for member in expand_family(code) {
            self.health_known.insert(member);
        }
    }

    pub fn is_health_known(&self, code: &ItemCode) -> bool {
        self.health_known.contains(code)
    }

    /// Reset everything this player has learned.
    pub fn forget_all(&mut self) {
        debug!(
            "forgetting food knowledge: {} known, {} in progress, {} health-known",
            self.known.len(),
            self.progress.len(),
            self.health_known.len()
        );
        self.known.clear();
        self.progress.clear();
        self.health_known.clear();
    }

    pub fn is_empty(&self) -> bool {
        self.known.is_empty() && self.progress.is_empty() && self.health_known.is_empty()
    }

    /// Encode into the host attribute-tree record shape: one subtree per
    /// component, each a count plus indexed child records of scalar fields.
    pub fn save(&self) -> AttrTree {
        let mut root = AttrTree::new();

        let mut progress = AttrTree::new();
        progress.set_int("count", self.progress.len() as i32);
        for (i, (code, value)) in self.progress.iter().enumerate() {
            let mut record = AttrTree::new();
            record.set_str("code", code.as_str());
            record.set_float("progress", *value);
            progress.set_tree(i.to_string(), record);
        }
        root.set_tree("progress", progress);

        root.set_tree("known", save_code_set(&self.known));
        root.set_tree("healthknown", save_code_set(&self.health_known));
        root
    }

    /// Decode from the attribute-tree record shape. Malformed child records
    /// are dropped; missing subtrees read as empty.
    pub fn load(tree: &AttrTree) -> Self {
        let mut knowledge = Self::default();

        if let Some(progress) = tree.get_tree("progress") {
            let count = progress.get_int("count").unwrap_or(0).max(0);
            for i in 0..count {
                let Some(record) = progress.get_tree(&i.to_string()) else {
                    continue;
                };
                let (Some(code), Some(value)) = (record.get_str("code"), record.get_float("progress"))
                else {
                    warn!("dropping malformed progress record {i}");
                    continue;
                };
                if code.is_empty() || !value.is_finite() {
                    warn!("dropping malformed progress record {i}");
                    continue;
                }
                knowledge
                    .progress
                    .insert(ItemCode::parse(code), value.clamp(0.0, 1.0));
            }
        }

        knowledge.known = load_code_set(tree.get_tree("known"));
        knowledge.health_known = load_code_set(tree.get_tree("healthknown"));
        knowledge
    }
}

fn save_code_set(codes: &BTreeSet<ItemCode>) -> AttrTree {
    let mut tree = AttrTree::new();
    tree.set_int("count", codes.len() as i32);
    for (i, code) in codes.iter().enumerate() {
        let mut record = AttrTree::new();
        record.set_str("code", code.as_str());
        tree.set_tree(i.to_string(), record);
    }
    tree
}

fn load_code_set(tree: Option<&AttrTree>) -> BTreeSet<ItemCode> {
    let mut codes = BTreeSet::new();
    let Some(tree) = tree else {
        return codes;
    };
    let count = tree.get_int("count").unwrap_or(0).max(0);
    for i in 0..count {
        let code = tree
            .get_tree(&i.to_string())
            .and_then(|record| record.get_str("code"));
        match code {
            Some(code) if !code.is_empty() => {
                codes.insert(ItemCode::parse(code));
            }
            _ => warn!("dropping malformed known-code record {i}"),
        }
    }
    codes
}

/// Knowledge for every player on the server, keyed by player UID.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct KnowledgeBook {
    players: HashMap<PlayerId, PlayerKnowledge>,
}

impl KnowledgeBook {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn player(&self, player: &PlayerId) -> Option<&PlayerKnowledge> {
        self.players.get(player)
    }

    pub fn player_mut(&mut self, player: &PlayerId) -> &mut PlayerKnowledge {
        self.players.entry(player.clone()).or_default()
    }

    pub fn get_progress(&self, player: &PlayerId, code: &ItemCode) -> f32 {
        self.players
            .get(player)
            .map_or(0.0, |knowledge| knowledge.progress(code))
    }

    pub fn add_progress(&mut self, player: &PlayerId, code: &ItemCode, amount: f32) -> bool {
        self.player_mut(player).add_progress(code, amount)
    }

    pub fn mark_known(&mut self, player: &PlayerId, code: &ItemCode) {
        self.player_mut(player).mark_known(code);
    }

    pub fn is_known(&self, player: &PlayerId, code: &ItemCode) -> bool {
        self.players
            .get(player)
            .is_some_and(|knowledge| knowledge.is_known(code))
    }

    pub fn mark_health_known(&mut self, player: &PlayerId, code: &ItemCode) {
        self.player_mut(player).mark_health_known(code);
    }

    pub fn is_health_known(&self, player: &PlayerId, code: &ItemCode) -> bool {
        self.players
            .get(player)
            .is_some_and(|knowledge| knowledge.is_health_known(code))
    }

    pub fn forget_all(&mut self, player: &PlayerId) {
        if let Some(knowledge) = self.players.get_mut(player) {
            knowledge.forget_all();
        }
    }
}
