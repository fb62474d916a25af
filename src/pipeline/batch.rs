//! Batch runner
//!
//! Processes a slice of texts with a fixed pool of workers pulling from a
//! shared cursor. Results land in per-index slots, so output order always
//! matches input order regardless of which worker finished first. The
//! first failing text fails the whole batch.

use crate::context::ProcessingContext;
use crate::error::PipelineError;
use crate::pipeline::Pipeline;
use futures::future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

/// Worker count used when the caller does not specify one, bounded by the
/// batch size.
pub const DEFAULT_CONCURRENCY: usize = 4;

#[derive(Debug, Clone, Copy, Default)]
pub struct BatchOptions {
    /// Number of concurrent workers. `None` uses [`DEFAULT_CONCURRENCY`];
    /// zero is rejected before any text is processed.
    pub concurrency: Option<usize>,
}

impl Pipeline {
    /// Process every text in `texts`, preserving input order in the output.
    pub async fn process_batch(
        &self,
        texts: &[String],
        options: BatchOptions,
    ) -> Result<Vec<ProcessingContext>, PipelineError> {
        if options.concurrency == Some(0) {
            return Err(PipelineError::InvalidConcurrency(0));
        }
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let concurrency = options
            .concurrency
            .unwrap_or(DEFAULT_CONCURRENCY)
            .min(texts.len());

        let cursor = AtomicUsize::new(0);
        let slots: Mutex<Vec<Option<ProcessingContext>>> = Mutex::new(vec![None; texts.len()]);

        let workers = (0..concurrency).map(|_| async {
            loop {
                let index = cursor.fetch_add(1, Ordering::SeqCst);
                if index >= texts.len() {
                    return Ok::<(), PipelineError>(());
                }
                let ctx = self.process(&texts[index]).await?;
                slots.lock().unwrap()[index] = Some(ctx);
            }
        });

        for outcome in future::join_all(workers).await {
            outcome?;
        }

        let slots = slots.into_inner().unwrap();
        let mut results = Vec::with_capacity(slots.len());
        for slot in slots {
            results.push(slot.expect("every index below the batch length was claimed"));
        }
        Ok(results)
    }
}
