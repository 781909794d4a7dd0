//! Delayed poison: pending-event queue, persistence, and the scheduler.

pub mod codec;
pub mod queue;
pub mod scheduler;

pub use codec::{load_queue, save_queue, QUEUE_ATTR_KEY};
pub use queue::{PendingPoison, PoisonQueue};
pub use scheduler::{Intercept, PoisonScheduler, RecentMeal, CHECK_INTERVAL_SEC, OVERLOAD_WARNING};
