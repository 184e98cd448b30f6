use crate::models::CommandKind;

/// Trigger phrases, checked in order. A query containing a phrase anywhere
/// (case-insensitive) is treated as the command.
const TRIGGERS: [(&str, CommandKind); 2] = [
    ("clear chat", CommandKind::ClearHistory),
    ("help", CommandKind::Help),
];

/// Detect a control command in an already lowercased query.
pub(crate) fn detect_command(lowered_query: &str) -> Option<CommandKind> {
    TRIGGERS
        .iter()
        .find(|(phrase, _)| lowered_query.contains(phrase))
        .map(|(_, kind)| *kind)
}
