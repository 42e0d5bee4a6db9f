//! Status bar component for showing messages and progress

use ratatui::{
    layout::Rect,
    widgets::{Block, Borders, Paragraph},
    Frame,
};

use crate::console_tui::ui::Styles;

/// Types of status messages
#[derive(Debug, Clone, PartialEq)]
pub enum StatusType {
    Info,
    Success,
    Error,
    Loading,
}

/// Status message with type and content
#[derive(Debug, Clone)]
pub struct StatusMessage {
    pub message: String,
    pub status_type: StatusType,
    pub timestamp: chrono::DateTime<chrono::Local>,
}

impl StatusMessage {
    pub fn new(message: String, status_type: StatusType) -> Self {
        Self {
            message,
            status_type,
            timestamp: chrono::Local::now(),
        }
    }
}

/// Status bar shown under every screen
pub struct StatusDisplay {
    pub current_message: Option<StatusMessage>,
    pub message_history: Vec<StatusMessage>,
    pub max_history: usize,
    pub show_timestamp: bool,
}

impl Default for StatusDisplay {
    fn default() -> Self {
        Self {
            current_message: None,
            message_history: Vec::new(),
            max_history: 100,
            show_timestamp: false,
        }
    }
}

impl StatusDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_timestamps(mut self) -> Self {
        self.show_timestamp = true;
        self
    }

    /// Set current status message
    pub fn set_message(&mut self, message: StatusMessage) {
        self.archive_current();
        self.current_message = Some(message);
    }

    pub fn set_info(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Info));
    }

    pub fn set_success(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Success));
    }

    pub fn set_error(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Error));
    }

    pub fn set_loading(&mut self, message: String) {
        self.set_message(StatusMessage::new(message, StatusType::Loading));
    }

    /// Clear current message
    pub fn clear(&mut self) {
        self.archive_current();
    }

    /// Clear the current message if it is a loading indicator
    pub fn clear_loading(&mut self) {
        if self
            .current_message
            .as_ref()
            .is_some_and(|message| message.status_type == StatusType::Loading)
        {
            self.archive_current();
        }
    }

    fn archive_current(&mut self) {
        if let Some(current) = self.current_message.take() {
            self.message_history.push(current);
            if self.message_history.len() > self.max_history {
                self.message_history.remove(0);
            }
        }
    }

    pub fn get_current(&self) -> Option<&StatusMessage> {
        self.current_message.as_ref()
    }

    pub fn get_history(&self) -> &[StatusMessage] {
        &self.message_history
    }

    /// Render with the given idle text when no message is set
    pub fn render(&self, f: &mut Frame, area: Rect, idle_text: &str) {
        let (content, style) = match &self.current_message {
            Some(message) => (
                self.format_message(message),
                match message.status_type {
                    StatusType::Info => Styles::info(),
                    StatusType::Success => Styles::success(),
                    StatusType::Error => Styles::error(),
                    StatusType::Loading => Styles::warning(),
                },
            ),
            None => (idle_text.to_string(), Styles::inactive()),
        };

        let paragraph = Paragraph::new(content).style(style).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::inactive_border()),
        );

        f.render_widget(paragraph, area);
    }

    fn format_message(&self, message: &StatusMessage) -> String {
        let prefix = match message.status_type {
            StatusType::Info => "ℹ",
            StatusType::Success => "✓",
            StatusType::Error => "✗",
            StatusType::Loading => "⟳",
        };

        if self.show_timestamp {
            format!(
                "{} [{}] {}",
                prefix,
                message.timestamp.format("%H:%M:%S"),
                message.message
            )
        } else {
            format!("{} {}", prefix, message.message)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_history_is_bounded() {
        let mut display = StatusDisplay::new();
        display.max_history = 2;
        display.set_info("one".to_string());
        display.set_error("two".to_string());
        display.set_success("three".to_string());
        display.set_loading("four".to_string());

        let history: Vec<_> = display.get_history().iter().map(|m| m.message.as_str()).collect();
        assert_eq!(history, vec!["two", "three"]);
        assert_eq!(display.get_current().unwrap().status_type, StatusType::Loading);

        display.clear_loading();
        assert!(display.get_current().is_none());

        display.set_success("saved".to_string());
        display.clear_loading();
        assert_eq!(display.get_current().unwrap().message, "saved");
        display.clear();
        assert!(display.get_current().is_none());
    }
}
