//! uf-core: gameplay logic for unknown-food mechanics.
//!
//! Players must learn foods before names and nutrition are revealed, and
//! poison from unknown food is deferred and accumulated instead of applied
//! on the spot. This crate contains the pure logic: the host engine's
//! integration layer implements the traits in [`host`] and drives the
//! [`poison::PoisonScheduler`] and [`knowledge::KnowledgeBook`] from its
//! entity callbacks. No I/O happens here; persistence and damage application
//! go through the host boundary.

pub mod attr;
pub mod config;
pub mod host;
pub mod knowledge;
pub mod poison;

mod ids;
mod rng;

pub use ids::{EntityId, ItemCode, PlayerId};
pub use rng::GameRng;
