/// A file sent inline with a prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InlineFile {
    pub mime_type: String,
    pub data: Vec<u8>,
}

/// One stateless completion call: a prompt, an optional file, or both.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompletionRequest {
    pub prompt: String,
    pub file: Option<InlineFile>,
}

impl CompletionRequest {
    pub fn is_empty(&self) -> bool {
        self.prompt.trim().is_empty() && self.file.is_none()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum CompletionError {
    #[error("transport error: {0}")]
    Transport(String),
    #[error("request rejected ({status}): {message}")]
    Rejected { status: u16, message: String },
    #[error("service returned no text")]
    EmptyResponse,
}

/// The remote LLM the assistant delegates to.
pub trait CompletionService {
    fn complete(&self, request: &CompletionRequest) -> Result<String, CompletionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn emptiness_ignores_whitespace() {
        let mut req = CompletionRequest {
            prompt: "  \n".into(),
            file: None,
        };
        assert!(req.is_empty());
        req.file = Some(InlineFile {
            mime_type: "text/plain".into(),
            data: b"x".to_vec(),
        });
        assert!(!req.is_empty());
    }

    #[test]
    fn error_messages() {
        let e = CompletionError::Rejected {
            status: 429,
            message: "quota".into(),
        };
        assert_eq!(e.to_string(), "request rejected (429): quota");
    }
}
