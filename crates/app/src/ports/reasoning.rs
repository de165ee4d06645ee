//! Reasoning port — optional text-generation collaborator.
//!
//! Used by the conflict analyzer to enhance summaries and resolution ranking.
//! The capability is strictly additive: absence or failure must never change
//! the deterministic conflict/severity classification.

use std::future::Future;

use lumen_domain::error::{LumenError, ReasoningError};

/// An opaque text-generation capability: prompt in, JSON text out.
pub trait ReasoningService {
    /// Whether a credential is configured. When `false`, callers skip the
    /// enhancement entirely.
    fn is_configured(&self) -> bool;

    /// Generate a response for the given prompt. The returned string is
    /// expected (but not guaranteed) to be a JSON object.
    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, LumenError>> + Send;
}

/// No-op reasoning service for deployments without a credential.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoReasoning;

impl ReasoningService for NoReasoning {
    fn is_configured(&self) -> bool {
        false
    }

    fn generate(&self, _prompt: &str) -> impl Future<Output = Result<String, LumenError>> + Send {
        async { Err(ReasoningError::NotConfigured.into()) }
    }
}

impl<T: ReasoningService + Send + Sync> ReasoningService for std::sync::Arc<T> {
    fn is_configured(&self) -> bool {
        (**self).is_configured()
    }

    fn generate(&self, prompt: &str) -> impl Future<Output = Result<String, LumenError>> + Send {
        (**self).generate(prompt)
    }
}
