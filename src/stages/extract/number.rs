//! Number detector
//!
//! Locates signed decimal and scientific-notation substrings and confirms
//! each with numeric parseability before recording it.

use crate::context::{Entity, PayloadData};
use crate::error::StageError;
use once_cell::sync::Lazy;
use regex::Regex;

static CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[+-]?[0-9]+(?:\.[0-9]+)?(?:[eE][+-]?[0-9]+)?").unwrap());

pub(crate) fn detect(data: &mut PayloadData) -> Result<(), StageError> {
    let mut found: Vec<Entity> = Vec::new();

    for m in CANDIDATE.find_iter(&data.text) {
        let value = m.as_str();
        if let Ok(parsed) = value.parse::<f64>() {
            if parsed.is_finite() {
                found.push(Entity::new("number", value, m.start(), m.end()));
            }
        }
    }

    data.entities.extend(found);
    Ok(())
}
