//! History export rendering.
//!
//! The whole history serializes either to a pretty JSON document (which
//! round-trips back to the in-memory sessions) or to a Markdown transcript:
//! one top-level heading per session, one subsection per message, sessions
//! separated by a horizontal rule. File names carry the current UTC date.

use crate::error::Result;
use crate::session::ChatSession;
use chrono::{Local, Utc};

/// Prefix of generated export file names.
pub const EXPORT_PREFIX: &str = "relay";

/// A rendered export: file name plus full contents.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportDocument {
    pub file_name: String,
    pub contents: String,
}

/// Renders the history as pretty-printed JSON.
pub fn history_to_json(history: &[ChatSession]) -> Result<ExportDocument> {
    let contents = serde_json::to_string_pretty(history)?;
    Ok(ExportDocument {
        file_name: export_file_name("json"),
        contents,
    })
}

/// Renders the history as a Markdown transcript.
pub fn history_to_markdown(history: &[ChatSession]) -> ExportDocument {
    let sections: Vec<String> = history.iter().map(render_session).collect();
    ExportDocument {
        file_name: export_file_name("md"),
        contents: sections.join("\n\n---\n\n"),
    }
}

fn render_session(session: &ChatSession) -> String {
    let created = session
        .created_at
        .with_timezone(&Local)
        .format("%Y-%m-%d");
    let messages: Vec<String> = session
        .messages
        .iter()
        .map(|message| {
            let timestamp = message
                .timestamp
                .with_timezone(&Local)
                .format("%Y-%m-%d %H:%M:%S");
            format!(
                "### {} ({})\n\n{}\n",
                message.role.label(),
                timestamp,
                message.content
            )
        })
        .collect();
    format!(
        "# {}\n*Created: {}*\n\n{}",
        session.title,
        created,
        messages.join("\n")
    )
}

fn export_file_name(extension: &str) -> String {
    format!(
        "{}-export-{}.{}",
        EXPORT_PREFIX,
        Utc::now().format("%Y-%m-%d"),
        extension
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::session::MessageDraft;

    fn sample_history() -> Vec<ChatSession> {
        let mut first = ChatSession::new();
        first.push(MessageDraft::user("how do I export?"));
        first.push(MessageDraft::assistant("use the export commands"));

        let mut second = ChatSession::new();
        second.push(MessageDraft::user("another topic"));

        vec![second, first]
    }

    #[test]
    fn test_json_export_round_trips() {
        let history = sample_history();
        let document = history_to_json(&history).unwrap();

        assert!(document.file_name.starts_with("relay-export-"));
        assert!(document.file_name.ends_with(".json"));

        let parsed: Vec<ChatSession> = serde_json::from_str(&document.contents).unwrap();
        assert_eq!(parsed, history);
    }

    #[test]
    fn test_markdown_export_structure() {
        let history = sample_history();
        let document = history_to_markdown(&history);

        assert!(document.file_name.ends_with(".md"));
        assert!(document.contents.contains("# another topic"));
        assert!(document.contents.contains("# how do I export?"));
        assert!(document.contents.contains("### User ("));
        assert!(document.contents.contains("### Assistant ("));
        assert!(document.contents.contains("*Created: "));
        // Sessions are separated by a horizontal rule.
        assert_eq!(document.contents.matches("\n\n---\n\n").count(), 1);
    }

    #[test]
    fn test_markdown_export_of_empty_history() {
        let document = history_to_markdown(&[]);
        assert!(document.contents.is_empty());
    }
}
