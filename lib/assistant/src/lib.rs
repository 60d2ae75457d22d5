//! Floating assistant for the greenline console.
//!
//! The assistant answers free-text staff messages in one of two ways:
//!
//! - **Rule-based**: messages carrying a help/navigation trigger keyword are
//!   resolved against the injected page directory, falling through an
//!   ordered list of category rules when no page is named.
//! - **Generative**: everything else goes to the configured LLM backend with
//!   a fixed system prompt describing the company's service catalog.
//!
//! Every path returns a structured [`ToolReply`]; generative failures
//! degrade to canned warning strings rather than surfacing as errors, so the
//! chat experience never hard-fails.
//!
//! The assistant is stateless per call: conversation history lives only in
//! the caller's transient display buffer.

pub mod assistant;
pub mod dispatch;
pub mod error;
pub mod llm;
pub mod prompt;
pub mod reply;

pub use assistant::Assistant;
pub use dispatch::{CategoryRule, Dispatcher, TRIGGER_KEYWORDS};
pub use error::LlmError;
pub use llm::{HttpLlmBackend, LlmBackend, LlmConfig, LlmRequest, LlmResponse};
pub use reply::{ReplyRole, ToolReply};
