//! Knowledge progress model: who has learned which foods.

pub mod family;
pub mod ledger;

pub use family::expand_family;
pub use ledger::{KnowledgeBook, PlayerKnowledge, KNOWLEDGE_ATTR_KEY, PROGRESS_EPSILON};
