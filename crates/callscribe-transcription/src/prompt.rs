//! Shared transcription prompt

use callscribe_core::ParticipantContext;

/// Build the contextual prompt shared by every transcription task.
///
/// Concatenates participant names, industries, descriptions and the call
/// topic, omitting any empty field. Returns an empty string when no
/// context is available.
pub fn build_context_prompt(context: &ParticipantContext) -> String {
    let mut parts = Vec::new();

    if !context.names.is_empty() {
        parts.push(format!("Participants: {}.", context.names.join(", ")));
    }
    if !context.industries.is_empty() {
        parts.push(format!("Industries: {}.", context.industries.join(", ")));
    }
    if !context.descriptions.is_empty() {
        parts.push(context.descriptions.join(" "));
    }
    if let Some(topic) = context.topic.as_deref().filter(|t| !t.is_empty()) {
        parts.push(format!("Topic: {}.", topic));
    }

    parts.join(" ")
}
