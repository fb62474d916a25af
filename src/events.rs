//! Lifecycle event hub
//!
//! The pipeline emits run and processor lifecycle events to registered
//! handlers. Handlers are registered per event kind and identified by the
//! id returned from `on`; delivery order among handlers for one event is
//! unspecified but exhaustive: a handler returning an error is logged
//! and never suppresses delivery to the remaining handlers or aborts the
//! run.

use crate::context::ProcessingContext;
use crate::error::PipelineError;
use std::collections::HashMap;
use std::time::Duration;

/// Event kinds emitted during a pipeline run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PipelineEvent {
    RunStart,
    RunEnd,
    ProcessorStart,
    ProcessorEnd,
    Error,
}

/// Which phase produced an error event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorStage {
    Run,
    Processor,
    Enrichment,
}

/// Payload delivered to handlers. Borrows the in-flight context; handlers
/// that need to keep data clone what they need.
#[derive(Debug)]
pub enum EventData<'a> {
    RunStart {
        context: &'a ProcessingContext,
    },
    RunEnd {
        context: &'a ProcessingContext,
        duration: Duration,
    },
    ProcessorStart {
        name: &'a str,
        context: &'a ProcessingContext,
    },
    ProcessorEnd {
        name: &'a str,
        context: &'a ProcessingContext,
        duration: Duration,
    },
    Error {
        error: &'a PipelineError,
        context: Option<&'a ProcessingContext>,
        stage: ErrorStage,
    },
}

impl EventData<'_> {
    pub fn kind(&self) -> PipelineEvent {
        match self {
            EventData::RunStart { .. } => PipelineEvent::RunStart,
            EventData::RunEnd { .. } => PipelineEvent::RunEnd,
            EventData::ProcessorStart { .. } => PipelineEvent::ProcessorStart,
            EventData::ProcessorEnd { .. } => PipelineEvent::ProcessorEnd,
            EventData::Error { .. } => PipelineEvent::Error,
        }
    }
}

pub type HandlerError = Box<dyn std::error::Error + Send + Sync>;

type Handler = Box<dyn Fn(&EventData<'_>) -> Result<(), HandlerError> + Send + Sync>;

/// Identity of a registered handler; used to unregister.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct HandlerId(u64);

/// Registry mapping event kind to its independent subscribers.
#[derive(Default)]
pub struct EventHub {
    handlers: HashMap<PipelineEvent, Vec<(HandlerId, Handler)>>,
    next_id: u64,
}

impl EventHub {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register `handler` for `event`; returns the id used to remove it.
    pub fn on<F>(&mut self, event: PipelineEvent, handler: F) -> HandlerId
    where
        F: Fn(&EventData<'_>) -> Result<(), HandlerError> + Send + Sync + 'static,
    {
        self.next_id += 1;
        let id = HandlerId(self.next_id);
        self.handlers
            .entry(event)
            .or_default()
            .push((id, Box::new(handler)));
        id
    }

    /// Unregister a handler; returns false when the id was not registered
    /// for that event.
    pub fn off(&mut self, event: PipelineEvent, id: HandlerId) -> bool {
        match self.handlers.get_mut(&event) {
            Some(list) => {
                let before = list.len();
                list.retain(|(handler_id, _)| *handler_id != id);
                list.len() != before
            }
            None => false,
        }
    }

    /// Deliver `data` to every handler registered for its kind.
    pub fn emit(&self, data: &EventData<'_>) {
        if let Some(list) = self.handlers.get(&data.kind()) {
            for (id, handler) in list {
                if let Err(err) = handler(data) {
                    log::warn!("event handler {:?} failed for {:?}: {}", id, data.kind(), err);
                }
            }
        }
    }
}

impl std::fmt::Debug for EventHub {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let counts: HashMap<&PipelineEvent, usize> = self
            .handlers
            .iter()
            .map(|(event, list)| (event, list.len()))
            .collect();
        f.debug_struct("EventHub").field("handlers", &counts).finish()
    }
}
