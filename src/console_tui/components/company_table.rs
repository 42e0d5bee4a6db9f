//! Company table component for the listing screen

use ratatui::{
    layout::{Constraint, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Row, Table, TableState},
    Frame,
};

use crate::console_tui::ui::{badge_spans, checkbox, truncate_string, Styles};
use crate::i18n::{keys, Translate};
use crate::models::Company;
use crate::presentation;

/// Column widths of the company table
#[derive(Debug, Clone)]
pub struct CompanyTableConfig {
    pub max_name_len: usize,
    pub status_width: u16,
    pub flag_width: u16,
    pub detail_width: u16,
}

impl Default for CompanyTableConfig {
    fn default() -> Self {
        Self {
            max_name_len: 32,
            status_width: 18,
            flag_width: 10,
            detail_width: 9,
        }
    }
}

/// Selectable table of companies
#[derive(Debug, Default)]
pub struct CompanyTable {
    pub state: TableState,
    pub config: CompanyTableConfig,
}

impl CompanyTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Select the first row, or nothing for an empty page
    pub fn reset_selection(&mut self, len: usize) {
        self.state = TableState::default();
        if len > 0 {
            self.state.select(Some(0));
        }
    }

    pub fn select_previous(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let selected = self.state.selected().unwrap_or(0);
        self.state
            .select(Some(if selected == 0 { len - 1 } else { selected - 1 }));
    }

    pub fn select_next(&mut self, len: usize) {
        if len == 0 {
            return;
        }
        let selected = self.state.selected().map_or(0, |i| (i + 1) % len);
        self.state.select(Some(selected));
    }

    pub fn selected<'a>(&self, rows: &'a [Company]) -> Option<&'a Company> {
        self.state.selected().and_then(|i| rows.get(i))
    }

    pub fn render(
        &mut self,
        f: &mut Frame,
        area: Rect,
        title: &str,
        rows: &[Company],
        t: &dyn Translate,
    ) {
        let header = Row::new(vec![
            Cell::from(t.text(keys::COMPANY)),
            Cell::from(t.phrase(&[keys::BLUE, keys::TICK, keys::STATUS])),
            Cell::from(t.text(keys::IS_LEADER)),
            Cell::from(t.text(keys::IS_STORE)),
            Cell::from(""),
        ])
        .style(Styles::title());

        let body: Vec<Row> = rows
            .iter()
            .map(|company| {
                let logo = if company.logo_url.is_some() { "◉ " } else { "○ " };
                let badge = presentation::badge(company.blue_tick_status());
                Row::new(vec![
                    Cell::from(format!(
                        "{}{}",
                        logo,
                        truncate_string(&company.company_name, self.config.max_name_len)
                    )),
                    Cell::from(Line::from(badge_spans(badge, t))),
                    Cell::from(checkbox(company.verified_for_leader)),
                    Cell::from(checkbox(company.verified_for_store)),
                    Cell::from(Span::styled(format!("{} ›", t.text(keys::DETAIL)), Styles::info())),
                ])
            })
            .collect();

        let widths = [
            Constraint::Length(self.config.max_name_len as u16 + 2),
            Constraint::Length(self.config.status_width),
            Constraint::Length(self.config.flag_width),
            Constraint::Length(self.config.flag_width),
            Constraint::Length(self.config.detail_width),
        ];

        let table = Table::new(body, widths)
            .header(header)
            .block(
                Block::default()
                    .title(title.to_string())
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected())
            .highlight_symbol("> ");

        f.render_stateful_widget(table, area, &mut self.state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_selection_wraps() {
        let mut table = CompanyTable::new();
        table.reset_selection(3);
        assert_eq!(table.state.selected(), Some(0));

        table.select_previous(3);
        assert_eq!(table.state.selected(), Some(2));
        table.select_next(3);
        assert_eq!(table.state.selected(), Some(0));

        table.reset_selection(0);
        assert_eq!(table.state.selected(), None);
        table.select_next(0);
        assert_eq!(table.state.selected(), None);
    }
}
