//! Phone-number detector
//!
//! The hardest detector. Works in three steps:
//!
//! 1. **Find** candidate spans. Maximal runs of phone characters (digits,
//!    `+ ( ) - . space`) are located, trimmed, and expanded into
//!    sub-spans starting at each interior digit group, because a valid
//!    fragment (say, the 8-digit tail of an international number) can sit
//!    inside a longer valid span.
//! 2. **Validate** each span twice: once assuming no region (requires a
//!    leading `+` and a known country code), then against a fixed
//!    fallback list of regions using national digit-length rules.
//! 3. **Resolve** overlaps: dedup by span (keeping the longer raw value),
//!    sort by span length descending with earliest-start tie-break, and
//!    greedily accept spans that do not overlap an already-accepted one.
//!    The longest, least-fragmented numbers therefore win over substrings
//!    of themselves. A policy guard drops spans with fewer than 10 digits
//!    and no leading `+`, so order references and PINs never pass as
//!    phones even when a region would nominally accept their length.
//!
//! Accepted candidates grow over a trailing extension suffix (`ext. 42`,
//! `x89`) and are emitted left-to-right, skipping exact duplicates of
//! entities already present.

use crate::context::{Entity, PayloadData};
use crate::error::StageError;
use once_cell::sync::Lazy;
use regex::Regex;

/// Extension suffix directly after an accepted number: `ext` (optionally
/// dotted) or `x`, then one to six digits.
static EXTENSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^ ?(?i:ext\.?|x) ?[0-9]{1,6}").unwrap());

/// Digits required before a span without a leading `+` is believable.
const MIN_DIGITS_WITHOUT_PLUS: usize = 10;

/// Digit-count bounds for international (`+`-prefixed) numbers.
const INTL_MIN_DIGITS: usize = 8;
const INTL_MAX_DIGITS: usize = 15;

/// What the first digit of a national number may be.
#[derive(Debug, Clone, Copy, PartialEq)]
enum LeadingDigit {
    /// Trunk prefix: the number must start with 0 (GB/DE/FR/NG/AU style).
    Zero,
    /// Area codes never start with 0 or 1 (US/IN style).
    NotZeroOne,
}

/// National digit-length rules for the fallback regions tried after the
/// no-region pass.
struct Region {
    code: &'static str,
    min_digits: usize,
    max_digits: usize,
    leading: LeadingDigit,
}

const FALLBACK_REGIONS: &[Region] = &[
    Region { code: "US", min_digits: 10, max_digits: 10, leading: LeadingDigit::NotZeroOne },
    Region { code: "GB", min_digits: 10, max_digits: 11, leading: LeadingDigit::Zero },
    Region { code: "DE", min_digits: 10, max_digits: 12, leading: LeadingDigit::Zero },
    Region { code: "FR", min_digits: 9, max_digits: 10, leading: LeadingDigit::Zero },
    Region { code: "NG", min_digits: 10, max_digits: 11, leading: LeadingDigit::Zero },
    Region { code: "IN", min_digits: 10, max_digits: 10, leading: LeadingDigit::NotZeroOne },
    Region { code: "AU", min_digits: 8, max_digits: 10, leading: LeadingDigit::Zero },
];

impl Region {
    fn accepts(&self, digit_count: usize, first_digit: char) -> bool {
        if !(self.min_digits..=self.max_digits).contains(&digit_count) {
            return false;
        }
        match self.leading {
            LeadingDigit::Zero => first_digit == '0',
            LeadingDigit::NotZeroOne => first_digit != '0' && first_digit != '1',
        }
    }
}

/// Calling-code prefixes recognized by the no-region pass.
const COUNTRY_CODES: &[&str] = &[
    "1", "7", "20", "27", "30", "31", "32", "33", "34", "36", "39", "40", "41", "43", "44", "45",
    "46", "47", "48", "49", "51", "52", "53", "54", "55", "56", "57", "58", "60", "61", "62", "63",
    "64", "65", "66", "81", "82", "84", "86", "90", "91", "92", "93", "94", "95", "98", "211",
    "212", "213", "216", "218", "220", "221", "234", "249", "250", "251", "254", "255", "256",
    "260", "263", "351", "352", "353", "354", "355", "356", "357", "358", "359", "370", "371",
    "372", "373", "374", "375", "376", "377", "380", "381", "385", "386", "387", "389", "420",
    "421", "852", "853", "855", "856", "880", "886", "960", "961", "962", "963", "964", "965",
    "966", "967", "968", "971", "972", "973", "974", "975", "976", "977", "992", "993", "994",
    "995", "996", "998",
];

#[derive(Debug, Clone, PartialEq)]
struct Candidate {
    value: String,
    start: usize,
    end: usize,
    digit_count: usize,
    has_plus: bool,
}

impl Candidate {
    fn span_len(&self) -> usize {
        self.end - self.start
    }

    fn overlaps(&self, other: &Candidate) -> bool {
        self.start < other.end && other.start < self.end
    }
}

pub(crate) fn detect(data: &mut PayloadData) -> Result<(), StageError> {
    let accepted = resolve(find_candidates(&data.text));

    for candidate in accepted {
        let candidate = with_extension(&data.text, candidate);
        let entity = Entity::new("phone", candidate.value, candidate.start, candidate.end);
        if !data.entities.iter().any(|e| e.is_duplicate_of(&entity)) {
            data.entities.push(entity);
        }
    }

    Ok(())
}

fn is_phone_char(c: char) -> bool {
    c.is_ascii_digit() || matches!(c, '-' | '.' | ' ' | '(' | ')' | '+')
}

fn is_group_separator(c: char) -> bool {
    matches!(c, ' ' | '-' | '.' | '(' | ')' | '+')
}

/// Locate maximal phone-character runs and derive validated candidates
/// from each run and its interior digit groups.
fn find_candidates(text: &str) -> Vec<Candidate> {
    let chars: Vec<(usize, char)> = text.char_indices().collect();
    let n = chars.len();
    let mut candidates: Vec<Candidate> = Vec::new();
    let mut i = 0usize;

    while i < n {
        if !is_phone_char(chars[i].1) {
            i += 1;
            continue;
        }
        let run_start = i;
        while i < n && is_phone_char(chars[i].1) {
            i += 1;
        }
        collect_run_candidates(text, &chars[run_start..i], &mut candidates);
    }

    dedup_by_span(candidates)
}

/// Candidates from one run: the trimmed run itself, plus a sub-span for
/// every digit group that follows a separator.
fn collect_run_candidates(text: &str, run: &[(usize, char)], out: &mut Vec<Candidate>) {
    let trimmed = trim_run(run);
    if trimmed.is_empty() {
        return;
    }

    let mut starts: Vec<usize> = vec![0];
    for j in 1..trimmed.len() {
        if trimmed[j].1.is_ascii_digit() && is_group_separator(trimmed[j - 1].1) {
            starts.push(j);
        }
    }

    for &s in &starts {
        let sub = trim_run(&trimmed[s..]);
        if sub.is_empty() {
            continue;
        }
        if let Some(candidate) = validate(text, sub) {
            out.push(candidate);
        }
    }
}

/// Drop leading characters that cannot begin a number (anything but a
/// digit, `+`, or `(`) and trailing characters that cannot end one
/// (anything but a digit).
fn trim_run<'a>(run: &'a [(usize, char)]) -> &'a [(usize, char)] {
    let mut lo = 0;
    let mut hi = run.len();
    while lo < hi && !(run[lo].1.is_ascii_digit() || matches!(run[lo].1, '+' | '(')) {
        lo += 1;
    }
    while hi > lo && !run[hi - 1].1.is_ascii_digit() {
        hi -= 1;
    }
    // A leading '(' or '+' must still be followed by something digit-like.
    while lo < hi && matches!(run[lo].1, '(') && !run[lo + 1..hi]
        .first()
        .map(|(_, c)| c.is_ascii_digit() || *c == '+')
        .unwrap_or(false)
    {
        lo += 1;
    }
    &run[lo..hi]
}

/// Validate one span under the no-region pass, then the fallback regions.
/// Returns a candidate when either pass accepts it.
fn validate(text: &str, span: &[(usize, char)]) -> Option<Candidate> {
    let start = span[0].0;
    let last = span[span.len() - 1];
    let end = last.0 + last.1.len_utf8();
    let value = &text[start..end];

    let digit_count = span.iter().filter(|(_, c)| c.is_ascii_digit()).count();
    let first_digit = match span.iter().map(|(_, c)| *c).find(char::is_ascii_digit) {
        Some(d) => d,
        None => return None,
    };
    let has_plus = leading_plus(span);

    let international_ok = has_plus
        && (INTL_MIN_DIGITS..=INTL_MAX_DIGITS).contains(&digit_count)
        && has_known_country_code(span);
    let regional_ok = !has_plus
        && FALLBACK_REGIONS.iter().any(|region| {
            let hit = region.accepts(digit_count, first_digit);
            if hit {
                log::debug!("phone span {:?} plausible for region {}", value, region.code);
            }
            hit
        });

    if international_ok || regional_ok {
        Some(Candidate {
            value: value.to_string(),
            start,
            end,
            digit_count,
            has_plus,
        })
    } else {
        None
    }
}

/// Grow an accepted candidate over a trailing extension suffix, keeping
/// the suffix inside the emitted value and span. The extension scan runs
/// only after validation and overlap resolution, so it never influences
/// which spans win.
fn with_extension(text: &str, mut candidate: Candidate) -> Candidate {
    if let Some(m) = EXTENSION.find(&text[candidate.end..]) {
        candidate.end += m.end();
        candidate.value = text[candidate.start..candidate.end].to_string();
    }
    candidate
}

/// True when the first character, ignoring opening parens, is `+`.
fn leading_plus(span: &[(usize, char)]) -> bool {
    span.iter()
        .map(|(_, c)| *c)
        .find(|c| *c != '(' && *c != ' ')
        .map(|c| c == '+')
        .unwrap_or(false)
}

/// Longest-prefix match of the digit sequence against the calling-code
/// table.
fn has_known_country_code(span: &[(usize, char)]) -> bool {
    let digits: String = span
        .iter()
        .map(|(_, c)| *c)
        .filter(char::is_ascii_digit)
        .collect();
    (1..=3).rev().any(|len| {
        digits
            .get(..len)
            .map(|prefix| COUNTRY_CODES.contains(&prefix))
            .unwrap_or(false)
    })
}

/// Same-span candidates collapse to one, keeping the longer raw value.
fn dedup_by_span(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut out: Vec<Candidate> = Vec::with_capacity(candidates.len());
    for candidate in candidates {
        match out
            .iter_mut()
            .find(|c| c.start == candidate.start && c.end == candidate.end)
        {
            Some(existing) => {
                if candidate.value.len() > existing.value.len() {
                    *existing = candidate;
                }
            }
            None => out.push(candidate),
        }
    }
    out
}

/// Apply the policy guard, then greedy longest-span-first selection of a
/// maximal non-overlapping subset, returned in left-to-right order.
fn resolve(candidates: Vec<Candidate>) -> Vec<Candidate> {
    let mut plausible: Vec<Candidate> = candidates
        .into_iter()
        .filter(|c| c.has_plus || c.digit_count >= MIN_DIGITS_WITHOUT_PLUS)
        .collect();

    plausible.sort_by(|a, b| {
        b.span_len()
            .cmp(&a.span_len())
            .then(a.start.cmp(&b.start))
    });

    let mut accepted: Vec<Candidate> = Vec::new();
    for candidate in plausible {
        if !accepted.iter().any(|a| a.overlaps(&candidate)) {
            accepted.push(candidate);
        }
    }

    accepted.sort_by_key(|c| c.start);
    accepted
}
