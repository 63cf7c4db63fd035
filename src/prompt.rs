//! Prompt assembly: grounding context, bounded history, generation cue.
//!
//! The ordering is a hard contract: system instruction, then retrieved
//! context (or the general-knowledge fallback), then conversation history,
//! then the current query — grounding facts prime the model before
//! conversational tone does.

use crate::message::ChatMessage;

/// Fixed system instruction opening every prompt.
pub const SYSTEM_INSTRUCTION: &str = "You are a knowledgeable chatbot assistant. ";

/// Instruction used when no retrieved context is available.
pub const NO_CONTEXT_FALLBACK: &str = "Answer to the best of your knowledge.\n";

/// Maximum number of trailing history messages rendered into a prompt.
pub const HISTORY_WINDOW: usize = 10;

/// Builds the final prompt from the query, retrieved passages, and
/// conversation history.
///
/// Passages are labeled by their zero-based rank (`Document 0:` …). Only
/// the last [`HISTORY_WINDOW`] history messages are rendered, in original
/// chronological order. The output always ends with the generation cue
/// `"User: {query}\nAssistant:"`.
///
/// # Examples
///
/// ```
/// use ragchat::prompt::build_prompt;
///
/// let prompt = build_prompt("What is X?", &[], &[]);
/// assert!(prompt.contains("Answer to the best of your knowledge."));
/// assert!(prompt.ends_with("User: What is X?\nAssistant:"));
/// ```
#[must_use]
pub fn build_prompt(query: &str, passages: &[String], history: &[ChatMessage]) -> String {
    let mut prompt = String::from(SYSTEM_INSTRUCTION);

    if passages.is_empty() {
        prompt.push_str(NO_CONTEXT_FALLBACK);
    } else {
        prompt.push_str("Use the following context to respond:\nContext:\n");
        for (idx, passage) in passages.iter().enumerate() {
            prompt.push_str(&format!("Document {idx}:\n{passage}\n\n"));
        }
        prompt.push('\n');
    }

    let recent = recent_history(history);
    if !recent.is_empty() {
        prompt.push_str("Conversation History:\n");
        for message in recent {
            prompt.push_str(&format!("{}: {}\n", message.speaker(), message.content));
        }
        prompt.push('\n');
    }

    prompt.push_str(&format!("User: {query}\nAssistant:"));
    prompt
}

/// The trailing [`HISTORY_WINDOW`] messages of `history`, in insertion order.
#[must_use]
pub fn recent_history(history: &[ChatMessage]) -> &[ChatMessage] {
    let skip = history.len().saturating_sub(HISTORY_WINDOW);
    &history[skip..]
}
