//! Email detector
//!
//! Candidate spans come from a local-part/domain character-class scan;
//! each candidate is confirmed with a strict syntax check before being
//! recorded. Matches are deduplicated by value, so the same address
//! appearing twice yields one entity (at its first span).

use crate::context::{Entity, PayloadData};
use crate::error::StageError;
use once_cell::sync::Lazy;
use regex::Regex;
use std::collections::HashSet;

static CANDIDATE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"[A-Za-z0-9._%+-]+@[A-Za-z0-9.-]+").unwrap());

static LOCAL_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9._%+-]+$").unwrap());
static DOMAIN_PART: Lazy<Regex> = Lazy::new(|| Regex::new(r"^[A-Za-z0-9.-]+$").unwrap());

pub(crate) fn detect(data: &mut PayloadData) -> Result<(), StageError> {
    let mut found: Vec<Entity> = Vec::new();
    let mut seen: HashSet<String> = HashSet::new();

    for m in CANDIDATE.find_iter(&data.text) {
        // The domain class admits '.' and '-', so a match can swallow
        // trailing sentence punctuation; trim it off the span.
        let mut candidate = m.as_str();
        let mut end = m.end();
        while candidate.ends_with(['.', '-']) {
            candidate = &candidate[..candidate.len() - 1];
            end -= 1;
        }
        if is_valid_email(candidate) && seen.insert(candidate.to_string()) {
            found.push(Entity::new("email", candidate, m.start(), end));
        }
    }

    data.entities.extend(found);
    Ok(())
}

/// Strict shape check: exactly one `@`, a non-empty valid local part, a
/// domain containing a dot with only domain characters, and an alphabetic
/// top-level label of at least two characters.
fn is_valid_email(candidate: &str) -> bool {
    let mut parts = candidate.splitn(3, '@');
    let local = match parts.next() {
        Some(p) if !p.is_empty() => p,
        _ => return false,
    };
    let domain = match parts.next() {
        Some(p) if !p.is_empty() => p,
        _ => return false,
    };
    if parts.next().is_some() {
        return false;
    }
    let tld_ok = domain
        .rsplit('.')
        .next()
        .map(|label| label.len() >= 2 && label.chars().all(|c| c.is_ascii_alphabetic()))
        .unwrap_or(false);
    domain.contains('.') && tld_ok && LOCAL_PART.is_match(local) && DOMAIN_PART.is_match(domain)
}
