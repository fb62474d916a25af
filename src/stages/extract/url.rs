//! URL detector
//!
//! Locates substrings beginning with an accepted scheme prefix, extends to
//! the next structural delimiter (whitespace or bracket/quote), strips
//! trailing sentence punctuation, then confirms with a strict parse
//! requiring the accepted scheme and a dotted host.

use crate::context::{Entity, PayloadData};
use crate::error::StageError;
use url::Url;

const SCHEMES: &[&str] = &["http://", "https://"];

const DELIMITERS: &[char] = &[
    ' ', '\n', '\r', '\t', '<', '>', '(', ')', '[', ']', '{', '}',
];

const TRAILING_PUNCT: &[char] = &['.', ',', '!', '?', ';', ':'];

pub(crate) fn detect(data: &mut PayloadData) -> Result<(), StageError> {
    let mut found: Vec<Entity> = Vec::new();

    for scheme in SCHEMES {
        for (start, _) in data.text.match_indices(scheme) {
            let tail = &data.text[start..];
            let raw_len = tail.find(DELIMITERS).unwrap_or(tail.len());
            let raw = &tail[..raw_len];
            let trimmed = raw.trim_end_matches(TRAILING_PUNCT);
            if trimmed.len() <= scheme.len() {
                continue;
            }
            if is_valid_url(trimmed) {
                found.push(Entity::new("url", trimmed, start, start + trimmed.len()));
            }
        }
    }

    // Scheme-by-scheme scanning finds https matches after http ones;
    // re-establish text order.
    found.sort_by_key(|e| e.start);
    data.entities.extend(found);
    Ok(())
}

fn is_valid_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => {
            matches!(url.scheme(), "http" | "https")
                && url.host_str().map(|host| host.contains('.')).unwrap_or(false)
        }
        Err(_) => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn urls(text: &str) -> Vec<(String, usize, usize)> {
        let mut data = PayloadData {
            text: text.to_string(),
            tokens: Vec::new(),
            entities: Vec::new(),
        };
        detect(&mut data).unwrap();
        data.entities
            .into_iter()
            .filter(|e| e.kind == "url")
            .map(|e| (e.value, e.start, e.end))
            .collect()
    }

    #[test]
    fn finds_http_and_https() {
        let found = urls("see http://example.com and https://example.org/path?q=1");
        assert_eq!(found.len(), 2);
        assert_eq!(found[0].0, "http://example.com");
        assert_eq!(found[1].0, "https://example.org/path?q=1");
    }

    #[test]
    fn stops_at_structural_delimiters() {
        let found = urls("(https://example.com/a)");
        assert_eq!(found[0].0, "https://example.com/a");
    }

    #[test]
    fn strips_trailing_sentence_punctuation() {
        let found = urls("Visit https://example.com.");
        assert_eq!(found[0].0, "https://example.com");
        assert_eq!(found[0].2, "Visit https://example.com".len());
    }

    #[test]
    fn requires_a_dotted_host() {
        assert!(urls("http://localhost/admin").is_empty());
    }

    #[test]
    fn bare_scheme_is_not_a_url() {
        assert!(urls("the http:// prefix alone").is_empty());
    }

    #[test]
    fn ftp_scheme_is_not_accepted() {
        assert!(urls("ftp://example.com/file").is_empty());
    }

    #[test]
    fn mixed_schemes_come_out_in_text_order() {
        let found = urls("first https://a.example.com then http://b.example.com");
        assert_eq!(found[0].0, "https://a.example.com");
        assert_eq!(found[1].0, "http://b.example.com");
    }
}
