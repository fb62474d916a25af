//! End-to-end extraction scenarios over realistic prose.

use annot::{Entity, ExtractStage, ProcessingContext, Stage};

async fn extract(text: &str) -> Vec<Entity> {
    ExtractStage::default()
        .run(ProcessingContext::from_text(text))
        .await
        .unwrap()
        .data
        .entities
}

fn values_of<'a>(entities: &'a [Entity], kind: &str) -> Vec<&'a str> {
    entities
        .iter()
        .filter(|e| e.kind == kind)
        .map(|e| e.value.as_str())
        .collect()
}

#[tokio::test]
async fn email_addresses_in_prose() {
    let entities = extract("Reach ops at ops@example.com or jane.doe+test@sub.example.co.uk.").await;
    assert_eq!(
        values_of(&entities, "email"),
        vec!["ops@example.com", "jane.doe+test@sub.example.co.uk"]
    );
}

#[tokio::test]
async fn email_without_dotted_domain_is_rejected() {
    let entities = extract("not-an-address: user@localhost today").await;
    assert!(values_of(&entities, "email").is_empty());
}

#[tokio::test]
async fn repeated_email_is_recorded_once() {
    let entities = extract("a@b.cc wrote to a@b.cc again").await;
    assert_eq!(values_of(&entities, "email").len(), 1);
}

#[tokio::test]
async fn urls_with_trailing_sentence_punctuation() {
    let entities = extract("See https://example.com/docs. Then http://example.org/a?b=1, ok?").await;
    assert_eq!(
        values_of(&entities, "url"),
        vec!["https://example.com/docs", "http://example.org/a?b=1"]
    );
}

#[tokio::test]
async fn non_http_schemes_are_ignored() {
    let entities = extract("use ftp://example.com or mailto:x@y.zz instead").await;
    assert!(values_of(&entities, "url").is_empty());
}

#[tokio::test]
async fn numbers_plain_decimal_and_scientific() {
    let entities = extract("2 items at 19.99 each, mass 6.02e23").await;
    assert_eq!(values_of(&entities, "number"), vec!["2", "19.99", "6.02e23"]);
}

#[tokio::test]
async fn entity_spans_index_the_source_text() {
    let text = "Write to a@b.cc now";
    let entities = extract(text).await;
    let email = entities.iter().find(|e| e.kind == "email").unwrap();
    assert_eq!(&text[email.start..email.end], "a@b.cc");
}

#[tokio::test]
async fn detectors_compose_on_one_text() {
    let text = "Invoice 42: pay 19.99 to billing@example.com via https://pay.example.com";
    let entities = extract(text).await;
    assert!(!values_of(&entities, "number").is_empty());
    assert!(!values_of(&entities, "email").is_empty());
    assert!(!values_of(&entities, "url").is_empty());
}

#[tokio::test]
async fn phone_extension_suffix_stays_attached() {
    let text = "Call +1 (212) 555-0199 ext. 42 for billing.";
    let entities = extract(text).await;
    assert_eq!(
        values_of(&entities, "phone"),
        vec!["+1 (212) 555-0199 ext. 42"]
    );
    let phone = entities.iter().find(|e| e.kind == "phone").unwrap();
    assert_eq!(&text[phone.start..phone.end], phone.value);
}

#[tokio::test]
async fn rerunning_extraction_duplicates_all_but_phones() {
    // Email/url/number detectors append per run; only the phone detector
    // checks the existing entity list for exact duplicates.
    let text = "a@b.cc, https://example.com, 42, +1 415 555 2671";
    let stage = ExtractStage::default();
    let once = stage.run(ProcessingContext::from_text(text)).await.unwrap();
    let twice = stage.run(once.clone()).await.unwrap();

    let count = |entities: &[Entity], kind: &str| values_of(entities, kind).len();
    assert_eq!(
        count(&twice.data.entities, "email"),
        2 * count(&once.data.entities, "email")
    );
    assert_eq!(
        count(&twice.data.entities, "url"),
        2 * count(&once.data.entities, "url")
    );
    assert_eq!(
        count(&twice.data.entities, "number"),
        2 * count(&once.data.entities, "number")
    );
    assert_eq!(count(&twice.data.entities, "phone"), 1);
}

#[tokio::test]
async fn plain_prose_yields_nothing() {
    let entities = extract("nothing interesting in here at all").await;
    assert!(entities.is_empty());
}
