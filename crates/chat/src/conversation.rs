use crate::message::{Attachment, Message};
use crate::service::{CompletionError, CompletionRequest, CompletionService, InlineFile};

pub const GREETING: &str =
    "Hello! I am your AI legal assistant. Ask me a legal question or attach a document to review.";

pub const EMPTY_REQUEST_REPLY: &str = "Please provide a question or a document to analyze.";

/// Ordered transcript of one chat session, starting with the model's greeting.
#[derive(Debug, Clone)]
pub struct Conversation {
    messages: Vec<Message>,
}

impl Conversation {
    pub fn new() -> Self {
        Self {
            messages: vec![Message::model(GREETING)],
        }
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    pub fn last(&self) -> Option<&Message> {
        self.messages.last()
    }

    /// Record the user's turn and the model's reply. Returns the reply.
    pub fn submit(
        &mut self,
        service: &impl CompletionService,
        prompt: &str,
        attachment: Option<Attachment>,
    ) -> &Message {
        self.messages
            .push(Message::user(prompt, attachment.as_ref().map(Attachment::info)));

        let request = CompletionRequest {
            prompt: prompt.to_string(),
            file: attachment.map(|a| InlineFile {
                mime_type: a.mime_type,
                data: a.bytes,
            }),
        };

        let reply = if request.is_empty() {
            Message::model(EMPTY_REQUEST_REPLY)
        } else {
            match service.complete(&request) {
                Ok(text) if text.trim().is_empty() => Self::failure(CompletionError::EmptyResponse),
                Ok(text) => Message::model(text),
                Err(e) => Self::failure(e),
            }
        };
        self.messages.push(reply);
        &self.messages[self.messages.len() - 1]
    }

    fn failure(error: CompletionError) -> Message {
        tracing::error!("completion failed: {error}");
        Message::model_error(format!("Failed to get a response from AI service: {error}"))
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(&self.messages)
    }
}

impl Default for Conversation {
    fn default() -> Self {
        Self::new()
    }
}
