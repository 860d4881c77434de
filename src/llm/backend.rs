//! Seam between the orchestrator and a concrete generation service.

use crate::llm::error::LlmError;
use crate::llm::types::{GenerationRequest, GenerationResult};

/// A blocking remote text generator.
///
/// Each call is one attempt; retries are the caller's concern.
pub trait TextGenerator: Send + Sync {
    /// Run one generation request.
    ///
    /// # Errors
    /// Returns an error when the call itself fails (network, auth, malformed response).
    /// Blocked or empty generations are reported inside the `GenerationResult`.
    fn generate(&self, request: &GenerationRequest) -> Result<GenerationResult, LlmError>;

    /// Short name used in logs.
    fn name(&self) -> &str;
}
