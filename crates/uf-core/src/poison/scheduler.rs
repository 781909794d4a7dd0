//! Delayed poison scheduler.
//!
//! Eating a harmful unknown food does not hurt immediately: the damage is
//! converted into a pending event that resolves after a randomized,
//! class-scaled delay. Repeated exposures to the same item coalesce, and a
//! queue whose total crosses the configured threshold escalates to one
//! immediate lethal application. The queue is written through to host
//! attribute storage on every mutation.

use log::debug;

use crate::config::{CoreConfig, PoisonClass};
use crate::host::{DamageEvent, DamageKind, DamageSource, EntityGate, HostCtx, OverTime};
use crate::ids::{EntityId, ItemCode, PlayerId};
use crate::knowledge::KnowledgeBook;
use crate::poison::codec::{load_queue, save_queue, QUEUE_ATTR_KEY};
use crate::poison::queue::{PendingPoison, PoisonQueue};
use crate::rng::GameRng;

/// Wall-clock seconds between due-event checks.
pub const CHECK_INTERVAL_SEC: f64 = 20.0;

/// Message key sent when pending poison escalates to an instant application.
pub const OVERLOAD_WARNING: &str = "unknownfood:poison-overload";

/// The most recent unknown food this entity ate, consulted by damage
/// interception to turn the food's instant poison into a delayed one.
#[derive(Debug, Clone, PartialEq)]
pub struct RecentMeal {
    pub code: ItemCode,
    /// Explicit class from the item's classification table, if any; absent
    /// classes fall back to the config's damage bands.
    pub class: Option<PoisonClass>,
}

/// Outcome of the damage interception hook.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Intercept {
    /// Damage was converted into a pending event; apply none of it now.
    Consumed,
    /// Damage passes through the pipeline unmodified.
    Pass(f64),
}

/// Per-entity scheduler. One instance per living entity, owned by the
/// entity's behavior; all operations run to completion on the host's tick
/// thread.
#[derive(Debug)]
pub struct PoisonScheduler {
    entity: EntityId,
    player: PlayerId,
    queue: PoisonQueue,
    tick_accum_sec: f64,
    recent_meal: Option<RecentMeal>,
    // Reentrancy fences: applying damage feeds back into the interception
    // hook through the host's shared damage path. While one of these is set
    // the hook bypasses all scheduling.
    applying_instant: bool,
    applying_delayed: bool,
}

impl PoisonScheduler {
    pub fn new(entity: EntityId, player: PlayerId) -> Self {
        Self {
            entity,
            player,
            queue: PoisonQueue::new(),
            tick_accum_sec: 0.0,
            recent_meal: None,
            applying_instant: false,
            applying_delayed: false,
        }
    }

    /// Rebuild a scheduler from host attribute storage on entity load.
    pub fn restore(entity: EntityId, player: PlayerId, host: &HostCtx<'_>) -> Self {
        let mut scheduler = Self::new(entity, player);
        if let Some(tree) = host.store.load_tree(entity, QUEUE_ATTR_KEY) {
            scheduler.queue = load_queue(&tree, host.clock.hours());
        }
        scheduler
    }

    pub fn queue(&self) -> &PoisonQueue {
        &self.queue
    }

    pub fn player(&self) -> &PlayerId {
        &self.player
    }

    /// Record the unknown food the entity just ate. Consumed by the next
    /// intercepted internal poison event.
    pub fn note_ingested(&mut self, code: ItemCode, class: Option<PoisonClass>) {
        self.recent_meal = Some(RecentMeal { code, class });
    }

    pub fn recent_meal(&self) -> Option<&RecentMeal> {
        self.recent_meal.as_ref()
    }

    /// Defer poison damage from a food. Draws a uniform delay in
    /// `[min_hours, max_hours]` (bounds swapped if inverted), queues the
    /// event, coalesces, persists, and checks the escalation threshold.
    #[allow(clippy::too_many_arguments)]
    pub fn schedule_from_food(
        &mut self,
        damage: f64,
        item_code: Option<ItemCode>,
        min_hours: f64,
        max_hours: f64,
        over_time: Option<OverTime>,
        gate: EntityGate,
        config: &CoreConfig,
        knowledge: &mut KnowledgeBook,
        rng: &mut GameRng,
        host: &mut HostCtx<'_>,
    ) {
        if damage <= 0.0 {
            return;
        }
        let delay = rng.uniform_hours(min_hours, max_hours);
        let event = PendingPoison {
            damage,
            item_code,
            trigger_hours: host.clock.hours() + delay,
            over_time,
        };
        if !self.queue.push(event) {
            return;
        }
        self.queue.coalesce();
        self.persist(host);
        self.try_apply_instant(gate, config, knowledge, rng, host);
    }

    /// Periodic update from the host. Checks run on a fixed cadence; each
    /// check resolves at most one due event, so simultaneous onsets are
    /// staggered across checks rather than bursting at once.
    #[allow(clippy::too_many_arguments)]
    pub fn on_tick(
        &mut self,
        delta_sec: f64,
        gate: EntityGate,
        config: &CoreConfig,
        knowledge: &mut KnowledgeBook,
        rng: &mut GameRng,
        host: &mut HostCtx<'_>,
    ) {
        self.tick_accum_sec += delta_sec;
        if self.tick_accum_sec < CHECK_INTERVAL_SEC {
            return;
        }
        self.tick_accum_sec = 0.0;

        if !config.poison_enabled || !gate.allows_poison() || self.queue.is_empty() {
            return;
        }

        self.queue.coalesce();
        self.persist(host);
        self.try_apply_instant(gate, config, knowledge, rng, host);

        let now = host.clock.hours();
        if let Some(index) = self.queue.find_due(now) {
            let event = self.queue.remove(index);
            self.applying_delayed = true;
            self.deliver(
                DamageEvent::poison(DamageSource::Unknown, event.damage, event.over_time),
                gate,
                config,
                knowledge,
                rng,
                host,
            );
            self.applying_delayed = false;
            if let Some(code) = &event.item_code {
                knowledge.mark_health_known(&self.player, code);
            }
            self.persist(host);
        }
    }

    /// Damage-pipeline hook. Internal poison on a freshly-eaten unknown food
    /// becomes a delayed event (reported as fully consumed); everything else
    /// passes through unmodified, as does everything while a guard is set.
    #[allow(clippy::too_many_arguments)]
    pub fn intercept_damage(
        &mut self,
        kind: DamageKind,
        source: DamageSource,
        amount: f64,
        gate: EntityGate,
        config: &CoreConfig,
        knowledge: &mut KnowledgeBook,
        rng: &mut GameRng,
        host: &mut HostCtx<'_>,
    ) -> Intercept {
        if self.applying_instant || self.applying_delayed {
            return Intercept::Pass(amount);
        }
        if kind != DamageKind::Poison || source != DamageSource::Internal {
            return Intercept::Pass(amount);
        }
        if !config.poison_enabled || !gate.server_side || amount <= 0.0 {
            return Intercept::Pass(amount);
        }
        let Some(meal) = self.recent_meal.take() else {
            return Intercept::Pass(amount);
        };

        let class = meal.class.unwrap_or_else(|| config.classify_damage(amount));
        let (min_hours, max_hours) = config.onset_range(class);
        self.schedule_from_food(
            amount,
            Some(meal.code),
            min_hours,
            max_hours,
            None,
            gate,
            config,
            knowledge,
            rng,
            host,
        );
        Intercept::Consumed
    }

    /// Drop the whole queue without applying damage (entity died or an
    /// explicit reset) and persist the empty state.
    pub fn clear(&mut self, host: &mut HostCtx<'_>) {
        self.queue.clear();
        self.recent_meal = None;
        self.persist(host);
    }

    /// Escalation path, run after every queue mutation: when total pending
    /// damage reaches the configured threshold, reveal every queued item,
    /// apply the total as one undelayed hit, warn the player, and empty the
    /// queue.
    fn try_apply_instant(
        &mut self,
        gate: EntityGate,
        config: &CoreConfig,
        knowledge: &mut KnowledgeBook,
        rng: &mut GameRng,
        host: &mut HostCtx<'_>,
    ) {
        if config.instant_death_threshold <= 0.0 {
            return;
        }
        let total = self.queue.total_damage();
        if total < config.instant_death_threshold {
            return;
        }
        if !gate.allows_poison() {
            return;
        }

        for code in self.queue.item_codes() {
            knowledge.mark_health_known(&self.player, &code);
        }
        debug!(
            "entity {}: pending poison {total} reached threshold {}, applying instantly",
            self.entity, config.instant_death_threshold
        );

        self.applying_instant = true;
        self.deliver(
            DamageEvent::poison(DamageSource::Internal, total, None),
            gate,
            config,
            knowledge,
            rng,
            host,
        );
        host.messenger.send_warning(&self.player, OVERLOAD_WARNING);
        self.queue.clear();
        self.persist(host);
        self.applying_instant = false;
    }

    /// Hand damage to the host through its shared pipeline, which routes it
    /// back through interception first. The guard flags make that feedback a
    /// pass-through instead of a reschedule loop.
    fn deliver(
        &mut self,
        event: DamageEvent,
        gate: EntityGate,
        config: &CoreConfig,
        knowledge: &mut KnowledgeBook,
        rng: &mut GameRng,
        host: &mut HostCtx<'_>,
    ) {
        match self.intercept_damage(
            event.kind,
            event.source,
            event.amount,
            gate,
            config,
            knowledge,
            rng,
            host,
        ) {
            Intercept::Consumed => {}
            Intercept::Pass(amount) => {
                host.damage.apply_damage(self.entity, DamageEvent { amount, ..event });
            }
        }
    }

    fn persist(&self, host: &mut HostCtx<'_>) {
        host.store
            .save_tree(self.entity, QUEUE_ATTR_KEY, save_queue(&self.queue));
    }
}
