//! Response resolution pipeline.
//!
//! Evaluated in order, short-circuiting on the first hit:
//! 1. topic lexicon, 2. meta rules, 3. one remote completion attempt,
//! 4. the generic fallback answer. Resolution always produces a non-empty
//! answer and never raises an error to its caller.

use crate::lexicon::Lexicon;
use crate::remote::CompletionBackend;

/// Generic answer used when no rule matches and remote completion fails.
const FALLBACK_ANSWER: &str = "That is an interesting question! As a candidate for the AI Agent Team, I am eager to bring my technical expertise, collaborative spirit, and passion for innovation to your organization. I believe in continuous learning and would love to discuss how my skills can contribute to your team success. Is there anything specific about my background or experience you would like to know more about?";

/// Where a resolved answer came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnswerSource {
    /// One of the canned tables matched.
    Canned,
    /// The remote completion endpoint produced the text.
    Remote,
    /// The generic fallback answer was used.
    Fallback,
}

/// Composes the canned tables and the remote backend into one decision
/// pipeline.
pub struct ResponseResolver {
    lexicon: Lexicon,
    backend: Box<dyn CompletionBackend>,
}

impl ResponseResolver {
    /// Create a resolver over the built-in tables and the given backend.
    pub fn new(backend: Box<dyn CompletionBackend>) -> Self {
        Self {
            lexicon: Lexicon::builtin(),
            backend,
        }
    }

    /// Resolve an input to an answer.
    ///
    /// Never fails: every remote error degrades to the fallback answer.
    pub async fn resolve(&self, input: &str) -> String {
        self.resolve_with_source(input).await.0
    }

    /// Resolve an input and report which pipeline stage produced the answer.
    pub async fn resolve_with_source(&self, input: &str) -> (String, AnswerSource) {
        if let Some(answer) = self.lexicon.lookup(input) {
            return (answer.to_string(), AnswerSource::Canned);
        }

        match self.backend.complete(input).await {
            Ok(text) if !text.trim().is_empty() => (text, AnswerSource::Remote),
            Ok(_) => {
                tracing::debug!("Remote completion returned blank text, using fallback");
                (FALLBACK_ANSWER.to_string(), AnswerSource::Fallback)
            }
            Err(e) => {
                tracing::debug!(error = %e, "Remote completion failed, using fallback");
                (FALLBACK_ANSWER.to_string(), AnswerSource::Fallback)
            }
        }
    }

    /// The generic fallback answer text.
    pub fn fallback_answer() -> &'static str {
        FALLBACK_ANSWER
    }
}

// =============================================================================
// Tests
// =============================================================================
