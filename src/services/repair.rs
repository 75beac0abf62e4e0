//! Pre-validation normalization of tool call arguments.
//!
//! Models regularly return itineraries that are almost right: the disclaimer
//! pushed into `days` as a pseudo-day, null or empty placeholder days, or a
//! flat activity list instead of the time-of-day object. Each fix below is a
//! small pure function over `serde_json::Value`; [`repair`] chains them.

use crate::error::{GenerationError, Result};
use serde_json::{Map, Value};
use tracing::debug;

const DAYS: &str = "days";
const DAY: &str = "day";
const DISCLAIMER: &str = "disclaimer";
const ACTIVITIES: &str = "activities";

/// Period assigned to activities the model did not classify.
const UNCLASSIFIED_PERIOD: &str = "afternoon";

/// Parse the raw arguments text and normalize it.
pub fn repair(raw_arguments: &str) -> Result<Value> {
    let document: Value =
        serde_json::from_str(raw_arguments).map_err(|err| GenerationError::InvalidJsonResponse {
            reason: err.to_string(),
            raw: raw_arguments.to_string(),
        })?;

    Ok(repair_document(document))
}

/// Apply every normalization to an already parsed document.
///
/// Documents without a `days` array are returned untouched.
pub fn repair_document(mut document: Value) -> Value {
    let Some(root) = document.as_object_mut() else {
        return document;
    };
    if !root.get(DAYS).is_some_and(Value::is_array) {
        return document;
    }

    hoist_disclaimer(root);

    if let Some(Value::Array(days)) = root.get_mut(DAYS) {
        let before = days.len();
        prune_days(days);
        let mut wrapped = 0;
        for day in days.iter_mut() {
            if wrap_flat_activities(day) {
                wrapped += 1;
            }
        }

        if before != days.len() || wrapped > 0 {
            debug!(
                target: "tripgen::repair",
                dropped = before - days.len(),
                wrapped,
                "normalized itinerary days"
            );
        }
    }

    document
}

/// An object carrying `disclaimer` but no `day`: a disclaimer misplaced into `days`.
pub fn is_disclaimer_entry(entry: &Value) -> bool {
    entry
        .as_object()
        .is_some_and(|object| object.contains_key(DISCLAIMER) && !object.contains_key(DAY))
}

/// Null, non-object or `{}` entries carry no day at all.
pub fn is_empty_entry(entry: &Value) -> bool {
    entry.as_object().map_or(true, Map::is_empty)
}

fn has_disclaimer(root: &Map<String, Value>) -> bool {
    match root.get(DISCLAIMER) {
        Some(Value::String(text)) => !text.trim().is_empty(),
        Some(Value::Null) | None => false,
        Some(_) => true,
    }
}

/// Move the first disclaimer entry of `days` to the top-level `disclaimer`.
///
/// A non-blank top-level disclaimer is kept. The entry is removed from `days`
/// either way. Returns whether an entry was found.
pub fn hoist_disclaimer(root: &mut Map<String, Value>) -> bool {
    let keep_existing = has_disclaimer(root);

    let Some(Value::Array(days)) = root.get_mut(DAYS) else {
        return false;
    };
    let Some(index) = days.iter().position(is_disclaimer_entry) else {
        return false;
    };

    let mut entry = days.remove(index);
    if !keep_existing {
        if let Some(text) = entry.as_object_mut().and_then(|object| object.remove(DISCLAIMER)) {
            root.insert(DISCLAIMER.to_string(), text);
        }
    }
    true
}

/// Drop empty entries and any disclaimer entries still left in `days`.
pub fn prune_days(days: &mut Vec<Value>) {
    days.retain(|entry| !is_empty_entry(entry) && !is_disclaimer_entry(entry));
}

/// Turn `activities: [...]` into `activities: { "afternoon": [...] }`.
///
/// Missing periods are left missing; no empty lists are added. Returns
/// whether the day was changed.
pub fn wrap_flat_activities(day: &mut Value) -> bool {
    let Some(activities) = day.get_mut(ACTIVITIES) else {
        return false;
    };
    if !activities.is_array() {
        return false;
    }

    let flat = activities.take();
    let mut keyed = Map::new();
    keyed.insert(UNCLASSIFIED_PERIOD.to_string(), flat);
    *activities = Value::Object(keyed);
    true
}
