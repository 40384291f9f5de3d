//! Prompt composition.
//!
//! The generation service takes a single prompt string. Prior turns are
//! flattened into a `Q:`/`A:` transcript and the new message is appended as
//! the final question.

use crate::models::conversation::{ConversationHistory, Role};

/// Compose the prompt sent upstream for `message` given prior `history`.
///
/// With no history the message is sent verbatim. Otherwise each user turn
/// becomes `Q: ...`, each assistant turn `A: ...`, one per line, and the
/// message closes the transcript as `Q: {message}` with no trailing newline.
/// Turns with any other role are skipped.
pub fn compose_prompt(message: &str, history: &ConversationHistory) -> String {
    if history.is_empty() {
        return message.to_string();
    }

    let mut prompt = String::new();
    for turn in history {
        let prefix = match turn.role {
            Role::User => "Q",
            Role::Assistant => "A",
            Role::Other(_) => continue,
        };
        prompt.push_str(prefix);
        prompt.push_str(": ");
        prompt.push_str(&turn.content);
        prompt.push('\n');
    }

    prompt.push_str("Q: ");
    prompt.push_str(message);
    prompt
}
