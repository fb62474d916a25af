//! Entity extraction stages
//!
//! Four detectors (email, phone, url, number), each independently
//! invocable and appending to the shared entity list. A detector never
//! assumes exclusive access to that list: another detector may have run
//! before it or may run after. A failure in one detector is logged and
//! treated as "no additional entities"; it never prevents the others from
//! running.

mod email;
mod number;
mod phone;
mod url;

use crate::config::ExtractionToggles;
use crate::context::{PayloadData, ProcessingContext};
use crate::error::StageError;
use crate::stages::Stage;
use async_trait::async_trait;

/// Combined extraction stage running the enabled detectors in a fixed
/// order: email, phone, url, number.
#[derive(Debug, Clone, Copy)]
pub struct ExtractStage {
    toggles: ExtractionToggles,
}

impl ExtractStage {
    pub fn new(toggles: ExtractionToggles) -> Self {
        Self { toggles }
    }
}

impl Default for ExtractStage {
    fn default() -> Self {
        Self::new(ExtractionToggles::default())
    }
}

/// Run one detector, containing its failure at the stage boundary.
fn run_detector(
    name: &str,
    data: &mut PayloadData,
    detector: fn(&mut PayloadData) -> Result<(), StageError>,
) {
    if let Err(err) = detector(data) {
        log::warn!("{} extraction failed: {}", name, err);
    }
}

#[async_trait]
impl Stage for ExtractStage {
    fn name(&self) -> &str {
        "extract"
    }

    fn cacheable(&self) -> bool {
        true
    }

    async fn run(&self, mut ctx: ProcessingContext) -> Result<ProcessingContext, StageError> {
        if self.toggles.extract_emails {
            run_detector("email", &mut ctx.data, email::detect);
        }
        if self.toggles.extract_phones {
            run_detector("phone", &mut ctx.data, phone::detect);
        }
        if self.toggles.extract_urls {
            run_detector("url", &mut ctx.data, url::detect);
        }
        if self.toggles.extract_numbers {
            run_detector("number", &mut ctx.data, number::detect);
        }
        Ok(ctx)
    }
}

macro_rules! single_detector_stage {
    ($(#[$doc:meta])* $stage:ident, $stage_name:literal, $module:ident) => {
        $(#[$doc])*
        #[derive(Debug, Clone, Copy, Default)]
        pub struct $stage;

        impl $stage {
            pub fn new() -> Self {
                Self
            }
        }

        #[async_trait]
        impl Stage for $stage {
            fn name(&self) -> &str {
                $stage_name
            }

            fn cacheable(&self) -> bool {
                true
            }

            async fn run(
                &self,
                mut ctx: ProcessingContext,
            ) -> Result<ProcessingContext, StageError> {
                run_detector($stage_name, &mut ctx.data, $module::detect);
                Ok(ctx)
            }
        }
    };
}

single_detector_stage!(
    /// Email detection on its own, for pipelines that only need it.
    ExtractEmailsStage,
    "extract-emails",
    email
);
single_detector_stage!(
    /// Phone detection on its own.
    ExtractPhonesStage,
    "extract-phones",
    phone
);
single_detector_stage!(
    /// URL detection on its own.
    ExtractUrlsStage,
    "extract-urls",
    url
);
single_detector_stage!(
    /// Number detection on its own.
    ExtractNumbersStage,
    "extract-numbers",
    number
);

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn combined_stage_runs_all_detectors() {
        let text = "Mail a@b.cc, call +1 415 555 2671, see https://example.com or pay 9.99";
        let out = ExtractStage::default()
            .run(ProcessingContext::from_text(text))
            .await
            .unwrap();
        let kinds: Vec<&str> = out.data.entities.iter().map(|e| e.kind.as_str()).collect();
        assert!(kinds.contains(&"email"));
        assert!(kinds.contains(&"phone"));
        assert!(kinds.contains(&"url"));
        assert!(kinds.contains(&"number"));
    }

    #[tokio::test]
    async fn disabled_detectors_are_skipped() {
        let toggles = ExtractionToggles {
            extract_emails: false,
            extract_phones: false,
            extract_urls: false,
            extract_numbers: true,
        };
        let out = ExtractStage::new(toggles)
            .run(ProcessingContext::from_text("a@b.cc and 42"))
            .await
            .unwrap();
        let kinds: Vec<&str> = out.data.entities.iter().map(|e| e.kind.as_str()).collect();
        assert_eq!(kinds, vec!["number"]);
    }

    #[tokio::test]
    async fn single_detector_stage_only_adds_its_own_kind() {
        let out = ExtractPhonesStage::new()
            .run(ProcessingContext::from_text("a@b.cc or +1 415 555 2671"))
            .await
            .unwrap();
        assert!(out.data.entities.iter().all(|e| e.kind == "phone"));
        assert_eq!(out.data.entities.len(), 1);
    }

    #[tokio::test]
    async fn number_inside_phone_is_a_legitimate_overlap() {
        let out = ExtractStage::default()
            .run(ProcessingContext::from_text("call 415.555.2671"))
            .await
            .unwrap();
        let phone = out.data.entities.iter().any(|e| e.kind == "phone");
        let number = out.data.entities.iter().any(|e| e.kind == "number");
        assert!(phone && number);
    }
}
