//! Poison queue persistence.
//!
//! The queue is written into host attribute storage on every mutation as a
//! count plus indexed child records of flat scalar fields, and read back on
//! entity load. A legacy record format stored seconds-remaining instead of an
//! absolute trigger time; `migrate_legacy_trigger` converts it on load.

use log::warn;

use crate::attr::{AttrError, AttrTree};
use crate::host::OverTime;
use crate::ids::ItemCode;
use crate::poison::queue::{PendingPoison, PoisonQueue};

/// Attribute-store key under which an entity's queue is persisted.
pub const QUEUE_ATTR_KEY: &str = "ufPoisonQueue";

/// Encode a queue into the attribute-tree record shape.
pub fn save_queue(queue: &PoisonQueue) -> AttrTree {
    let mut root = AttrTree::new();
    root.set_int("count", queue.len() as i32);
    for (i, event) in queue.events().iter().enumerate() {
        let mut record = AttrTree::new();
        record.set_double("damage", event.damage);
        record.set_str(
            "itemcode",
            event.item_code.as_ref().map_or("", |code| code.as_str()),
        );
        record.set_double("triggerhours", event.trigger_hours);
        if let Some(shape) = event.over_time {
            record.set_int("ticks", shape.ticks);
            record.set_double("durationsec", shape.duration_sec);
        }
        root.set_tree(i.to_string(), record);
    }
    root
}

/// Decode a queue, dropping records that fail to decode or carry
/// non-positive damage. `now_hours` anchors legacy seconds-remaining records.
pub fn load_queue(tree: &AttrTree, now_hours: f64) -> PoisonQueue {
    let mut queue = PoisonQueue::new();
    let count = tree.get_int("count").unwrap_or(0).max(0);
    for i in 0..count {
        let Some(record) = tree.get_tree(&i.to_string()) else {
            warn!("poison queue record {i} missing, dropping");
            continue;
        };
        match load_event(record, now_hours) {
            Ok(event) => {
                queue.push(event);
            }
            Err(err) => warn!("dropping poison queue record {i}: {err}"),
        }
    }
    queue
}

fn load_event(record: &AttrTree, now_hours: f64) -> Result<PendingPoison, AttrError> {
    let damage = record
        .get_f64("damage")
        .ok_or(AttrError::MissingField("damage"))?;
    if damage <= 0.0 {
        return Err(AttrError::RejectedValue("damage"));
    }

    let item_code = match record.get_str("itemcode") {
        Some("") | None => None,
        Some(code) => Some(ItemCode::parse(code)),
    };

    let trigger_hours = match record.get_f64("triggerhours") {
        Some(trigger_hours) => trigger_hours,
        None => {
            let seconds_left = record
                .get_f64("secondsleft")
                .ok_or(AttrError::MissingField("triggerhours"))?;
            migrate_legacy_trigger(seconds_left, now_hours)
        }
    };

    Ok(PendingPoison {
        damage,
        item_code,
        trigger_hours,
        over_time: OverTime::from_parts(record.get_f64("durationsec"), record.get_int("ticks")),
    })
}

/// Convert a legacy seconds-remaining record to an absolute trigger time.
fn migrate_legacy_trigger(seconds_left: f64, now_hours: f64) -> f64 {
    now_hours + seconds_left.max(0.0) / 3600.0
}
