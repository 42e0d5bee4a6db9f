//! Common UI styles and layout helpers for the console TUI

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::i18n::Translate;
use crate::presentation::{StatusBadge, Tone};

/// Common UI styles
pub struct Styles;

impl Styles {
    pub fn default() -> Style {
        Style::default()
    }

    pub fn selected() -> Style {
        Style::default()
            .bg(Color::Blue)
            .fg(Color::White)
            .add_modifier(Modifier::BOLD)
    }

    pub fn title() -> Style {
        Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD)
    }

    pub fn error() -> Style {
        Style::default().fg(Color::Red)
    }

    pub fn success() -> Style {
        Style::default().fg(Color::Green)
    }

    pub fn warning() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn info() -> Style {
        Style::default().fg(Color::Cyan)
    }

    pub fn inactive() -> Style {
        Style::default().fg(Color::Gray)
    }

    pub fn active_border() -> Style {
        Style::default().fg(Color::Yellow)
    }

    pub fn inactive_border() -> Style {
        Style::default().fg(Color::Gray)
    }

    /// Colour of a status badge
    pub fn tone(tone: Tone) -> Style {
        match tone {
            Tone::Active => Self::success(),
            Tone::Danger => Self::error(),
            Tone::Muted => Self::inactive(),
            Tone::Warning => Self::warning(),
        }
    }
}

/// Terminal glyph standing in for a badge icon
pub fn icon_glyph(icon: &str) -> &'static str {
    match icon {
        "FiCheck" => "✓",
        "FiX" | "FiXOctagon" => "✗",
        "FiMinus" => "-",
        "FiLoader" => "⟳",
        "FiAlertCircle" => "!",
        "FiAward" => "★",
        "FiShoppingBag" => "$",
        _ => "•",
    }
}

/// Icon and label of a status badge as styled spans
pub fn badge_spans(badge: &StatusBadge, t: &dyn Translate) -> Vec<Span<'static>> {
    let style = Styles::tone(badge.tone);
    vec![
        Span::styled(format!("({}) ", icon_glyph(badge.icon)), style.add_modifier(Modifier::BOLD)),
        Span::styled(t.phrase(badge.label), style),
    ]
}

/// Checkbox rendering of a boolean column
pub fn checkbox(checked: bool) -> &'static str {
    if checked {
        "[x]"
    } else {
        "[ ]"
    }
}

/// Center a rectangle within another rectangle
pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(popup_layout[1])[1]
}

/// Truncate to a display width (Unicode-aware), padding short strings
pub fn truncate_string(s: &str, max_width: usize) -> String {
    let display_width = s.width();
    if display_width <= max_width {
        return format!("{}{}", s, " ".repeat(max_width - display_width));
    }

    let target_width = max_width.saturating_sub(1);
    let mut truncated = String::new();
    let mut current_width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(0);
        if current_width + ch_width > target_width {
            break;
        }
        truncated.push(ch);
        current_width += ch_width;
    }

    let padding = max_width.saturating_sub(current_width + 1);
    format!("{}…{}", truncated, " ".repeat(padding))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_pads_and_cuts() {
        assert_eq!(truncate_string("abc", 5), "abc  ");
        assert_eq!(truncate_string("abcdefgh", 5), "abcd…");
        // Wide characters count double
        assert_eq!(truncate_string("日本語テキスト", 6), "日本… ");
    }

    #[test]
    fn test_icon_glyph_fallback() {
        assert_eq!(icon_glyph("FiCheck"), "✓");
        assert_eq!(icon_glyph("FiUnknown"), "•");
    }
}
