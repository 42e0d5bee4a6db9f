//! Form field component for user input

use ratatui::{
    layout::Rect,
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Wrap},
    Frame,
};

use crate::console_tui::ui::Styles;

/// Type of form field
#[derive(Debug, Clone, PartialEq)]
pub enum FormFieldType {
    Text,
    TextArea,
}

/// Single editable field; the cursor counts characters, not bytes
#[derive(Debug, Clone)]
pub struct FormField {
    pub label: String,
    pub value: String,
    pub placeholder: String,
    pub field_type: FormFieldType,
    pub required: bool,
    pub is_focused: bool,
    pub cursor_position: usize,
    pub validation_error: Option<String>,
}

impl FormField {
    pub fn new(label: &str, field_type: FormFieldType) -> Self {
        Self {
            label: label.to_string(),
            value: String::new(),
            placeholder: String::new(),
            field_type,
            required: false,
            is_focused: false,
            cursor_position: 0,
            validation_error: None,
        }
    }

    pub fn with_placeholder(mut self, placeholder: &str) -> Self {
        self.placeholder = placeholder.to_string();
        self
    }

    pub fn with_value(mut self, value: &str) -> Self {
        self.value = value.to_string();
        self.cursor_position = value.chars().count();
        self
    }

    pub fn required(mut self) -> Self {
        self.required = true;
        self
    }

    pub fn set_focus(&mut self, focused: bool) {
        self.is_focused = focused;
    }

    fn byte_index(&self, char_index: usize) -> usize {
        self.value
            .char_indices()
            .nth(char_index)
            .map(|(i, _)| i)
            .unwrap_or(self.value.len())
    }

    pub fn insert_char(&mut self, c: char) {
        let at = self.byte_index(self.cursor_position);
        self.value.insert(at, c);
        self.cursor_position += 1;
        self.validation_error = None;
    }

    pub fn delete_char(&mut self) {
        if self.cursor_position > 0 {
            self.cursor_position -= 1;
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn delete_char_forward(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            let at = self.byte_index(self.cursor_position);
            self.value.remove(at);
            self.validation_error = None;
        }
    }

    pub fn move_cursor_left(&mut self) {
        self.cursor_position = self.cursor_position.saturating_sub(1);
    }

    pub fn move_cursor_right(&mut self) {
        if self.cursor_position < self.value.chars().count() {
            self.cursor_position += 1;
        }
    }

    pub fn move_cursor_to_start(&mut self) {
        self.cursor_position = 0;
    }

    pub fn move_cursor_to_end(&mut self) {
        self.cursor_position = self.value.chars().count();
    }

    pub fn clear(&mut self) {
        self.value.clear();
        self.cursor_position = 0;
        self.validation_error = None;
    }

    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }

    /// Render the form field
    pub fn render(&self, f: &mut Frame, area: Rect) {
        let border_style = if self.validation_error.is_some() {
            Styles::error()
        } else if self.is_focused {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let mut title = vec![Span::raw(self.label.clone())];
        if self.required {
            title.push(Span::styled(" * ", Styles::error()));
        }
        if let Some(ref error) = self.validation_error {
            title.push(Span::styled(format!(" - {}", error), Styles::error()));
        }

        let block = Block::default()
            .title(Line::from(title))
            .borders(Borders::ALL)
            .border_style(border_style);

        let (text, text_style) = if self.is_empty() && !self.placeholder.is_empty() {
            (self.placeholder.as_str(), Styles::inactive())
        } else {
            (self.value.as_str(), Styles::default())
        };

        let mut paragraph = Paragraph::new(text.to_string()).style(text_style).block(block);
        if self.field_type == FormFieldType::TextArea {
            paragraph = paragraph.wrap(Wrap { trim: false });
        }

        f.render_widget(paragraph, area);

        if self.is_focused {
            let inner_width = area.width.saturating_sub(2).max(1) as usize;
            let (row, col) = match self.field_type {
                FormFieldType::TextArea => (self.cursor_position / inner_width, self.cursor_position % inner_width),
                FormFieldType::Text => (0, self.cursor_position.min(inner_width - 1)),
            };
            let cursor_x = area.x + 1 + col as u16;
            let cursor_y = area.y + 1 + row as u16;
            if cursor_y < area.y + area.height.saturating_sub(1) {
                f.set_cursor(cursor_x, cursor_y);
            }
        }
    }
}
