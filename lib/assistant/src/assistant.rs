//! The assistant service: dispatch first, generative fallback second.

use crate::dispatch::Dispatcher;
use crate::error::LlmError;
use crate::llm::LlmBackend;
use crate::prompt;
use crate::reply::ToolReply;

/// Warning shown when the generative endpoint answers with an error status.
const WARN_SERVICE_ERROR: &str =
    "The assistant service returned an error. Please try again in a moment.";

/// Warning shown when the generative endpoint produces no usable completion.
const WARN_NO_COMPLETION: &str =
    "The assistant didn't return an answer. Try rephrasing your question.";

/// Warning shown when the generative endpoint cannot be reached.
const WARN_UNREACHABLE: &str =
    "The assistant service couldn't be reached. Please try again shortly.";

/// Answers staff messages, preferring rule-based navigation help.
pub struct Assistant {
    dispatcher: Dispatcher,
    backend: Box<dyn LlmBackend>,
}

impl Assistant {
    /// Creates an assistant from a dispatcher and a generative backend.
    #[must_use]
    pub fn new(dispatcher: Dispatcher, backend: Box<dyn LlmBackend>) -> Self {
        Self {
            dispatcher,
            backend,
        }
    }

    /// Produces a reply for a staff message.
    ///
    /// Rule-based dispatch answers when it can; otherwise the message goes
    /// to the generative backend, whose reply text is linkified against the
    /// page directory. Generative failures degrade to canned warnings — the
    /// chat never hard-fails.
    pub async fn reply(&self, message: &str) -> ToolReply {
        if let Some(reply) = self.dispatcher.dispatch(message) {
            return reply;
        }

        match self.backend.generate(&prompt::fallback_request(message)).await {
            Ok(response) => {
                let text = self.dispatcher.directory().linkify(&response.content);
                ToolReply::text(text)
            }
            Err(error) => {
                tracing::warn!(error = %error, "generative fallback failed");
                ToolReply::text(degraded_reply(&error))
            }
        }
    }
}

/// Maps each generative failure mode to its canned user-facing warning.
fn degraded_reply(error: &LlmError) -> &'static str {
    match error {
        LlmError::RequestFailed { .. } => WARN_SERVICE_ERROR,
        LlmError::EmptyCompletion | LlmError::ResponseParseFailed { .. } => WARN_NO_COMPLETION,
        LlmError::Unreachable { .. } | LlmError::Timeout | LlmError::InvalidConfig { .. } => {
            WARN_UNREACHABLE
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::llm::{LlmRequest, LlmResponse};
    use async_trait::async_trait;
    use greenline_directory::PageDirectory;

    struct StubBackend {
        result: Result<LlmResponse, LlmError>,
    }

    #[async_trait]
    impl LlmBackend for StubBackend {
        async fn generate(&self, _request: &LlmRequest) -> Result<LlmResponse, LlmError> {
            self.result.clone()
        }

        fn model(&self) -> &str {
            "stub"
        }
    }

    fn assistant(result: Result<LlmResponse, LlmError>) -> Assistant {
        let directory = PageDirectory::builder()
            .page(
                "Business Info",
                "/business-info",
                "Look up business records.",
            )
            .build()
            .expect("valid directory");
        Assistant::new(
            Dispatcher::new(directory),
            Box::new(StubBackend { result }),
        )
    }

    fn ok_response(content: &str) -> Result<LlmResponse, LlmError> {
        Ok(LlmResponse {
            content: content.to_string(),
            model: "stub".to_string(),
        })
    }

    #[tokio::test]
    async fn dispatched_message_never_reaches_the_backend() {
        let assistant = assistant(Err(LlmError::Timeout));

        let reply = assistant.reply("where is business info").await;
        assert_eq!(reply.suggested_page.as_deref(), Some("/business-info"));
    }

    #[tokio::test]
    async fn untriggered_message_uses_the_backend() {
        let assistant = assistant(ok_response("We handle energy procurement."));

        let reply = assistant.reply("thanks!").await;
        assert_eq!(reply.text, "We handle energy procurement.");
        assert_eq!(reply.suggested_page, None);
    }

    #[tokio::test]
    async fn generative_reply_is_linkified() {
        let assistant = assistant(ok_response("Start from **Business Info**."));

        let reply = assistant.reply("where do lookups start, roughly").await;
        assert_eq!(
            reply.text,
            "Start from <a href=\"/business-info\">Business Info</a>."
        );
    }

    #[tokio::test]
    async fn error_status_degrades_to_service_warning() {
        let assistant = assistant(Err(LlmError::RequestFailed { status: 500 }));

        let reply = assistant.reply("thanks!").await;
        assert_eq!(reply.text, WARN_SERVICE_ERROR);
        assert_eq!(reply.suggested_page, None);
    }

    #[tokio::test]
    async fn empty_completion_degrades_to_its_own_warning() {
        let assistant = assistant(Err(LlmError::EmptyCompletion));

        let reply = assistant.reply("thanks!").await;
        assert_eq!(reply.text, WARN_NO_COMPLETION);
    }

    #[tokio::test]
    async fn network_failure_degrades_to_unreachable_warning() {
        let assistant = assistant(Err(LlmError::Unreachable {
            reason: "connection refused".to_string(),
        }));

        let reply = assistant.reply("thanks!").await;
        assert_eq!(reply.text, WARN_UNREACHABLE);
    }

    #[tokio::test]
    async fn timeout_counts_as_a_network_failure() {
        let assistant = assistant(Err(LlmError::Timeout));

        let reply = assistant.reply("thanks!").await;
        assert_eq!(reply.text, WARN_UNREACHABLE);
    }
}
