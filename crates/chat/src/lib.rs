//! Conversation model for the legal assistant.
//!
//! # Invariants
//! - Completion failures never propagate out of a conversation; they become
//!   model messages flagged `is_error`.
//! - Each request is stateless: earlier turns are not resent.

mod conversation;
mod message;
mod service;

pub use conversation::{Conversation, EMPTY_REQUEST_REPLY, GREETING};
pub use message::{Attachment, AttachmentInfo, Message, Role};
pub use service::{CompletionError, CompletionRequest, CompletionService, InlineFile};

pub fn crate_info() -> &'static str {
    "counsel-chat v0.1.0"
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn crate_loads() {
        assert!(crate_info().contains("chat"));
    }
}
