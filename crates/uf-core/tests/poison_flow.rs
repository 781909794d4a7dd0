//! End-to-end poison scheduling scenarios against a mock host.

use std::collections::HashMap;

use uf_core::attr::AttrTree;
use uf_core::config::CoreConfig;
use uf_core::host::{
    AttrStore, DamageEvent, DamageKind, DamageSink, DamageSource, EntityGate, HostCtx, Messenger,
    WorldClock,
};
use uf_core::knowledge::KnowledgeBook;
use uf_core::poison::{load_queue, Intercept, PoisonScheduler, QUEUE_ATTR_KEY};
use uf_core::{EntityId, GameRng, ItemCode, PlayerId};

struct Clock {
    hours: f64,
}

impl WorldClock for Clock {
    fn hours(&self) -> f64 {
        self.hours
    }
}

#[derive(Default)]
struct Sink {
    applied: Vec<DamageEvent>,
}

impl DamageSink for Sink {
    fn apply_damage(&mut self, _entity: EntityId, event: DamageEvent) {
        self.applied.push(event);
    }
}

#[derive(Default)]
struct Store {
    trees: HashMap<(EntityId, String), AttrTree>,
}

impl AttrStore for Store {
    fn save_tree(&mut self, entity: EntityId, key: &str, tree: AttrTree) {
        self.trees.insert((entity, key.to_string()), tree);
    }

    fn load_tree(&self, entity: EntityId, key: &str) -> Option<AttrTree> {
        self.trees.get(&(entity, key.to_string())).cloned()
    }
}

#[derive(Default)]
struct Chat {
    warnings: Vec<String>,
}

impl Messenger for Chat {
    fn send_warning(&mut self, _player: &PlayerId, message: &str) {
        self.warnings.push(message.to_string());
    }
}

struct Host {
    clock: Clock,
    sink: Sink,
    store: Store,
    chat: Chat,
}

impl Host {
    fn at(hours: f64) -> Self {
        Self {
            clock: Clock { hours },
            sink: Sink::default(),
            store: Store::default(),
            chat: Chat::default(),
        }
    }

    fn ctx(&mut self) -> HostCtx<'_> {
        HostCtx {
            clock: &self.clock,
            damage: &mut self.sink,
            store: &mut self.store,
            messenger: &mut self.chat,
        }
    }
}

struct World {
    host: Host,
    config: CoreConfig,
    knowledge: KnowledgeBook,
    rng: GameRng,
    scheduler: PoisonScheduler,
}

impl World {
    fn at(hours: f64) -> Self {
        Self {
            host: Host::at(hours),
            config: CoreConfig::default(),
            knowledge: KnowledgeBook::new(),
            rng: GameRng::new(42),
            scheduler: PoisonScheduler::new(EntityId(7), PlayerId::new("alice")),
        }
    }

    fn schedule(&mut self, damage: f64, code: &str, hours: f64) {
        self.scheduler.schedule_from_food(
            damage,
            Some(ItemCode::parse(code)),
            hours,
            hours,
            None,
            EntityGate::eligible(),
            &self.config,
            &mut self.knowledge,
            &mut self.rng,
            &mut self.host.ctx(),
        );
    }

    fn tick(&mut self, delta_sec: f64) {
        self.scheduler.on_tick(
            delta_sec,
            EntityGate::eligible(),
            &self.config,
            &mut self.knowledge,
            &mut self.rng,
            &mut self.host.ctx(),
        );
    }
}

#[test]
fn test_two_exposures_coalesce_to_earliest_trigger() {
    // First exposure at hour 100 with a fixed 10 h delay.
    let mut world = World::at(100.0);
    world.schedule(4.0, "game:fruit-lychee", 10.0);
    assert_eq!(world.scheduler.queue().len(), 1);
    assert_eq!(world.scheduler.queue().events()[0].trigger_hours, 110.0);

    // Second exposure at hour 105 with a 2 h delay computes trigger 107,
    // and the merged event keeps the earlier of the two.
    world.host.clock.hours = 105.0;
    world.schedule(6.0, "game:fruit-lychee", 2.0);

    assert_eq!(world.scheduler.queue().len(), 1);
    let merged = &world.scheduler.queue().events()[0];
    assert_eq!(merged.damage, 10.0);
    assert_eq!(merged.trigger_hours, 107.0);

    // At hour 107 the merged hit lands in one piece.
    world.host.clock.hours = 107.0;
    world.tick(20.0);
    assert!(world.scheduler.queue().is_empty());
    assert_eq!(world.host.sink.applied.len(), 1);
    assert_eq!(world.host.sink.applied[0].amount, 10.0);
}

#[test]
fn test_one_event_resolves_per_tick() {
    let mut world = World::at(100.0);
    world.schedule(1.0, "game:fruit-lychee", 0.0);
    world.schedule(2.0, "game:mushroom-bolete-normal", 0.0);
    world.schedule(3.0, "game:vegetable-cassava", 0.0);
    assert_eq!(world.scheduler.queue().len(), 3);

    // All three are due, but each check resolves exactly one.
    world.tick(20.0);
    assert_eq!(world.scheduler.queue().len(), 2);
    assert_eq!(world.host.sink.applied.len(), 1);

    world.tick(20.0);
    assert_eq!(world.scheduler.queue().len(), 1);

    world.tick(20.0);
    assert!(world.scheduler.queue().is_empty());
    assert_eq!(world.host.sink.applied.len(), 3);

    let total: f64 = world.host.sink.applied.iter().map(|e| e.amount).sum();
    assert_eq!(total, 6.0);
}

#[test]
fn test_resolution_reveals_health_knowledge() {
    let mut world = World::at(100.0);
    world.schedule(2.0, "game:mushroom-bolete-normal", 0.0);
    world.tick(20.0);

    let alice = PlayerId::new("alice");
    assert!(world
        .knowledge
        .is_health_known(&alice, &ItemCode::parse("game:mushroom-bolete-normal")));
    // Propagated across the discovery family.
    assert!(world
        .knowledge
        .is_health_known(&alice, &ItemCode::parse("game:cookedmushroom-bolete-perfect")));
}

#[test]
fn test_threshold_escalation_is_deterministic() {
    let mut world = World::at(100.0);
    world.config.instant_death_threshold = 12.0;

    world.schedule(5.0, "game:fruit-lychee", 10.0);
    world.schedule(6.0, "game:mushroom-bolete-normal", 10.0);
    assert!(world.host.sink.applied.is_empty());

    // The mutation that carries the total past the threshold empties the
    // queue and applies the prior total as one undelayed hit.
    world.schedule(1.5, "game:vegetable-cassava", 10.0);
    assert!(world.scheduler.queue().is_empty());
    assert_eq!(world.host.sink.applied.len(), 1);
    assert_eq!(world.host.sink.applied[0].amount, 12.5);
    assert_eq!(world.host.sink.applied[0].over_time, None);
    assert_eq!(world.host.chat.warnings.len(), 1);
}

#[test]
fn test_intercept_flow_then_save_load_then_resolve() {
    let mut world = World::at(100.0);

    // Eating an unknown poisonous food: the host's damage pipeline hands us
    // the instant poison and we consume it into the queue.
    world
        .scheduler
        .note_ingested(ItemCode::parse("game:mushroom-deathcap-normal"), None);
    let outcome = world.scheduler.intercept_damage(
        DamageKind::Poison,
        DamageSource::Internal,
        8.0,
        EntityGate::eligible(),
        &world.config,
        &mut world.knowledge,
        &mut world.rng,
        &mut world.host.ctx(),
    );
    assert_eq!(outcome, Intercept::Consumed);
    assert!(world.host.sink.applied.is_empty());
    assert_eq!(world.scheduler.queue().len(), 1);
    let trigger = world.scheduler.queue().events()[0].trigger_hours;
    assert!(trigger > 100.0);

    // Entity unloads and reloads: the queue survives through the attribute
    // store.
    let restored = PoisonScheduler::restore(
        EntityId(7),
        PlayerId::new("alice"),
        &world.host.ctx(),
    );
    assert_eq!(restored.queue(), world.scheduler.queue());
    world.scheduler = restored;

    // Once due, the hit lands with the unknown source.
    world.host.clock.hours = trigger + 1.0;
    world.tick(20.0);
    assert!(world.scheduler.queue().is_empty());
    assert_eq!(world.host.sink.applied.len(), 1);
    assert_eq!(world.host.sink.applied[0].amount, 8.0);
    assert_eq!(world.host.sink.applied[0].source, DamageSource::Unknown);
}

#[test]
fn test_stronger_class_shortens_onset() {
    let config = CoreConfig::default();
    let mut world = World::at(100.0);

    // Lethal damage band: onset range shrinks by the lethal multiplier.
    world
        .scheduler
        .note_ingested(ItemCode::parse("game:mushroom-deathcap-normal"), None);
    world.scheduler.intercept_damage(
        DamageKind::Poison,
        DamageSource::Internal,
        15.0,
        EntityGate::eligible(),
        &config,
        &mut world.knowledge,
        &mut world.rng,
        &mut world.host.ctx(),
    );
    let (min_hours, max_hours) = config.onset_range(uf_core::config::PoisonClass::Lethal);
    let trigger = world.scheduler.queue().events()[0].trigger_hours;
    assert!(trigger >= 100.0 + min_hours);
    assert!(trigger <= 100.0 + max_hours);
}

#[test]
fn test_disabled_feature_passes_damage_through() {
    let mut world = World::at(100.0);
    world.config.poison_enabled = false;

    world
        .scheduler
        .note_ingested(ItemCode::parse("game:fruit-lychee"), None);
    let outcome = world.scheduler.intercept_damage(
        DamageKind::Poison,
        DamageSource::Internal,
        3.0,
        EntityGate::eligible(),
        &world.config,
        &mut world.knowledge,
        &mut world.rng,
        &mut world.host.ctx(),
    );
    assert_eq!(outcome, Intercept::Pass(3.0));

    // Ticks are a no-op too.
    world.config.poison_enabled = true;
    world.schedule(2.0, "game:fruit-lychee", 0.0);
    world.config.poison_enabled = false;
    world.tick(20.0);
    assert_eq!(world.scheduler.queue().len(), 1);
    assert!(world.host.sink.applied.is_empty());
}

#[test]
fn test_persisted_tree_matches_codec_shape() {
    let mut world = World::at(100.0);
    world.schedule(4.0, "game:fruit-lychee", 10.0);

    let tree = world
        .host
        .store
        .trees
        .get(&(EntityId(7), QUEUE_ATTR_KEY.to_string()))
        .expect("queue persisted on mutation");
    assert_eq!(tree.get_int("count"), Some(1));

    let reloaded = load_queue(tree, 100.0);
    assert_eq!(&reloaded, world.scheduler.queue());
}

#[test]
fn test_death_clears_queue_without_damage() {
    let mut world = World::at(100.0);
    world.schedule(4.0, "game:fruit-lychee", 0.0);
    world.scheduler.clear(&mut world.host.ctx());

    world.tick(20.0);
    assert!(world.scheduler.queue().is_empty());
    assert!(world.host.sink.applied.is_empty());
}
