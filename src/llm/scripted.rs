//! In-memory generator that replays canned results, for tests.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use crate::llm::backend::TextGenerator;
use crate::llm::error::LlmError;
use crate::llm::types::{Candidate, FinishReason, GenerationRequest, GenerationResult};

/// Replays a fixed script and records every request. An exhausted script answers 503.
pub struct ScriptedGenerator {
    script: Mutex<VecDeque<Result<GenerationResult, LlmError>>>,
    requests: Mutex<Vec<GenerationRequest>>,
}

impl ScriptedGenerator {
    /// Generator answering with `script` in order.
    pub fn new(script: Vec<Result<GenerationResult, LlmError>>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(script.into()),
            requests: Mutex::new(Vec::new()),
        })
    }

    /// Number of calls made so far.
    pub fn calls(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    /// Copy of the `idx`-th request.
    pub fn request(&self, idx: usize) -> GenerationRequest {
        self.requests.lock().unwrap()[idx].clone()
    }
}

impl TextGenerator for ScriptedGenerator {
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, LlmError> {
        self.requests.lock().unwrap().push(request.clone());
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(unavailable()))
    }

    fn name(&self) -> &str {
        "scripted"
    }
}

/// A retryable 503.
pub fn unavailable() -> LlmError {
    LlmError::HttpStatus {
        status: 503,
        body: "unavailable".to_string(),
    }
}

/// A normal stop with `text`.
pub fn ok(text: &str) -> Result<GenerationResult, LlmError> {
    Ok(GenerationResult::single(Candidate::stopped(text)))
}

/// A candidate stopped for `reason` with no text.
pub fn blocked(reason: FinishReason) -> Result<GenerationResult, LlmError> {
    Ok(GenerationResult::single(Candidate::blocked(reason)))
}
