//! Fixed prompt for the generative fallback.

use crate::llm::LlmRequest;

/// System prompt describing the company's service catalog.
///
/// The prompt is fixed: the assistant carries no conversation state, so
/// every generative call is a single-shot request built from the message
/// and this description.
pub const SYSTEM_PROMPT: &str = "\
You are the assistant for the Greenline operations console, an internal tool \
for a sustainability-services company. Staff use the console to look up \
business, site, and utility records, validate supplier invoices, generate \
client documents such as letters of authority and contracts, lodge signed \
documents, review client sustainability strategies, and profile site energy \
usage. Answer questions about these services concisely and practically. When \
you mention a console page by name, wrap the name in double asterisks, for \
example **Business Info**. If a question is outside the console's scope, say \
so briefly.";

/// Builds the single-shot fallback request for a staff message.
#[must_use]
pub fn fallback_request(message: &str) -> LlmRequest {
    LlmRequest::new(message)
        .with_system(SYSTEM_PROMPT)
        .with_temperature(0.3)
        .with_max_tokens(512)
}
