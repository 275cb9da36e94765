//! Recognizer event input - parses event lines and routes them into the session

use crate::matcher::HypothesisKind;
use crate::render::Ui;
use crate::session::{PracticeSession, SessionUpdate};

/// Events from the speech recognizer (or a user at the keyboard)
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TranscriptEvent {
    Partial(String),
    Final(String),
    /// Start the current phrase over
    Reset,
    /// Move on to the next phrase
    Skip,
}

impl TranscriptEvent {
    /// Parse `partial: text`, `final: text`, `reset` or `skip`
    ///
    /// Any other non-empty line is treated as a final result.
    pub fn parse(line: &str) -> Option<Self> {
        let line = line.trim();
        if line.is_empty() {
            return None;
        }
        if let Some((tag, text)) = line.split_once(':') {
            match tag.trim().to_ascii_lowercase().as_str() {
                "partial" | "p" => return Some(Self::Partial(text.trim().to_string())),
                "final" | "f" => return Some(Self::Final(text.trim().to_string())),
                _ => {}
            }
        }
        match line.to_ascii_lowercase().as_str() {
            "reset" | "/reset" => Some(Self::Reset),
            "skip" | "/skip" => Some(Self::Skip),
            _ => Some(Self::Final(line.to_string())),
        }
    }
}

/// Apply one transcript event to the session and report what changed to the UI
pub fn handle_transcript(event: TranscriptEvent, session: &mut PracticeSession, ui: &Ui) {
    let (kind, text) = match event {
        TranscriptEvent::Partial(text) => (HypothesisKind::Partial, text),
        TranscriptEvent::Final(text) => (HypothesisKind::Final, text),
        TranscriptEvent::Reset => {
            session.restart();
            ui.show_progress(session.progress());
            return;
        }
        TranscriptEvent::Skip => {
            session.skip();
            announce_current(session, ui);
            return;
        }
    };

    ui.show_heard(&text);
    match session.hear(kind, &text) {
        SessionUpdate::Unchanged => {}
        SessionUpdate::Progress(progress) => ui.show_progress(progress),
        SessionUpdate::Completed { phrase, elapsed } => {
            ui.completed(&phrase, elapsed);
            announce_current(session, ui);
        }
    }
}

pub fn announce_current(session: &PracticeSession, ui: &Ui) {
    if session.is_finished() {
        ui.finished(session.summary());
        return;
    }
    let (index, total) = session.position();
    ui.start_phrase(index, total, session.progress());
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::MatcherConfig;
    use crate::render::UiEvent;

    #[test]
    fn test_parse_tagged_lines() {
        assert_eq!(
            TranscriptEvent::parse("partial: I am"),
            Some(TranscriptEvent::Partial("I am".into()))
        );
        assert_eq!(
            TranscriptEvent::parse("FINAL:I am enough"),
            Some(TranscriptEvent::Final("I am enough".into()))
        );
        assert_eq!(
            TranscriptEvent::parse("p: I"),
            Some(TranscriptEvent::Partial("I".into()))
        );
    }

    #[test]
    fn test_parse_commands_and_bare_lines() {
        assert_eq!(TranscriptEvent::parse(" reset "), Some(TranscriptEvent::Reset));
        assert_eq!(TranscriptEvent::parse("/skip"), Some(TranscriptEvent::Skip));
        assert_eq!(
            TranscriptEvent::parse("note: I am here"),
            Some(TranscriptEvent::Final("note: I am here".into()))
        );
        assert_eq!(TranscriptEvent::parse("   "), None);
    }

    #[test]
    fn test_handle_transcript_reports_completion() {
        let (ui, rx) = Ui::new();
        let mut session = PracticeSession::new(
            vec!["I am enough".into(), "I am calm".into()],
            &MatcherConfig::default(),
        );
        handle_transcript(TranscriptEvent::Final("I am enough".into()), &mut session, &ui);

        let events: Vec<UiEvent> = rx.try_iter().collect();
        assert!(matches!(events[0], UiEvent::Heard(_)));
        assert!(matches!(events[1], UiEvent::Completed { .. }));
        assert!(matches!(events[2], UiEvent::Phrase { index: 2, total: 2, .. }));
    }

    #[test]
    fn test_handle_transcript_skip_to_end() {
        let (ui, rx) = Ui::new();
        let mut session = PracticeSession::new(vec!["I am enough".into()], &MatcherConfig::default());
        handle_transcript(TranscriptEvent::Skip, &mut session, &ui);
        let events: Vec<UiEvent> = rx.try_iter().collect();
        assert!(matches!(events.last(), Some(UiEvent::Finished(_))));
    }
}
