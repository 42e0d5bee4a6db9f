//! Company listing screen

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use super::ScreenAction;
use crate::api::ApiError;
use crate::console_tui::components::{CompanyTable, FormField, FormFieldType};
use crate::console_tui::ui::{centered_rect, icon_glyph, Styles};
use crate::i18n::{keys, Translate};
use crate::listing::{filter_options, CompanyListing, FetchKind, FetchTicket, ListingView};
use crate::models::{CompanyPage, ROWS_PER_PAGE_OPTIONS};
use crate::workflow::WorkflowTarget;

/// Input mode of the listing screen
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompaniesMode {
    Browse,
    Search,
    Filter,
    PageSize,
}

pub struct CompaniesScreen {
    pub listing: CompanyListing,
    pub table: CompanyTable,
    pub search_field: FormField,
    pub filter_state: ListState,
    pub size_state: ListState,
    pub mode: CompaniesMode,
    translator: Arc<dyn Translate>,
}

impl CompaniesScreen {
    pub fn new(default_page_size: u32, translator: Arc<dyn Translate>) -> Self {
        Self {
            listing: CompanyListing::new(default_page_size),
            table: CompanyTable::new(),
            search_field: FormField::new("Search", FormFieldType::Text)
                .with_placeholder("Press / to search companies"),
            filter_state: ListState::default(),
            size_state: ListState::default(),
            mode: CompaniesMode::Browse,
            translator,
        }
    }

    /// Initial fetch, also used for retry and when coming back
    pub fn start(&mut self) -> ScreenAction {
        let (ticket, query) = self.listing.begin_load();
        ScreenAction::FetchCompanies(ticket, query)
    }

    pub fn on_leave(&mut self) {
        self.listing.invalidate();
        self.mode = CompaniesMode::Browse;
        self.search_field.set_focus(false);
    }

    /// The search field and popups own the keyboard instead of global shortcuts
    pub fn captures_input(&self) -> bool {
        self.mode != CompaniesMode::Browse
    }

    pub fn on_companies_loaded(
        &mut self,
        ticket: FetchTicket,
        result: Result<CompanyPage, ApiError>,
    ) -> ScreenAction {
        if !self.listing.apply(ticket, result) {
            return ScreenAction::None;
        }
        if let Some(error) = self.listing.inline_error() {
            return ScreenAction::SetError(error.to_string());
        }
        if let ListingView::Failed(error) = self.listing.view() {
            return ScreenAction::SetError(error.to_string());
        }
        self.table.reset_selection(self.listing.rows().len());
        match ticket.kind {
            FetchKind::Initial => ScreenAction::None,
            _ => ScreenAction::SetStatus(format!(
                "Page {} of {}",
                self.listing.query().page,
                self.listing.total_pages()
            )),
        }
    }

    fn can_fetch(&self) -> bool {
        !self.listing.is_busy() && !matches!(self.listing.view(), ListingView::Loading)
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match self.mode {
            CompaniesMode::Browse => self.handle_browse_key(key),
            CompaniesMode::Search => self.handle_search_key(key),
            CompaniesMode::Filter => self.handle_filter_key(key),
            CompaniesMode::PageSize => self.handle_page_size_key(key),
        }
    }

    fn handle_browse_key(&mut self, key: KeyEvent) -> ScreenAction {
        let rows = self.listing.rows().len();
        match key.code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.table.select_previous(rows);
                ScreenAction::None
            }
            KeyCode::Down | KeyCode::Char('j') => {
                self.table.select_next(rows);
                ScreenAction::None
            }
            KeyCode::Enter => match self.table.selected(self.listing.rows()) {
                Some(company) => ScreenAction::OpenBlueTick(WorkflowTarget::Existing(company.id)),
                None => ScreenAction::None,
            },
            KeyCode::Char('n') => ScreenAction::OpenBlueTick(WorkflowTarget::New),
            KeyCode::Char('r') => {
                if self.listing.is_busy() {
                    return ScreenAction::None;
                }
                self.start()
            }
            _ if !self.can_fetch() => ScreenAction::None,
            KeyCode::Left | KeyCode::PageUp => {
                let page = self.listing.query().page;
                if page <= 1 {
                    return ScreenAction::None;
                }
                self.fetch_page(page - 1)
            }
            KeyCode::Right | KeyCode::PageDown => {
                let page = self.listing.query().page;
                if page >= self.listing.total_pages() {
                    return ScreenAction::None;
                }
                self.fetch_page(page + 1)
            }
            KeyCode::Char('/') => {
                self.mode = CompaniesMode::Search;
                let current = self.listing.query().search.clone().unwrap_or_default();
                self.search_field = self.search_field.clone().with_value(&current);
                self.search_field.set_focus(true);
                ScreenAction::None
            }
            KeyCode::Char('f') => {
                let selected = self
                    .listing
                    .query()
                    .filter
                    .and_then(|active| filter_options().iter().position(|o| o.filter == active))
                    .unwrap_or(0);
                self.filter_state.select(Some(selected));
                self.mode = CompaniesMode::Filter;
                ScreenAction::None
            }
            KeyCode::Char('s') => {
                let selected = ROWS_PER_PAGE_OPTIONS
                    .iter()
                    .position(|size| *size == self.listing.query().size)
                    .unwrap_or(0);
                self.size_state.select(Some(selected));
                self.mode = CompaniesMode::PageSize;
                ScreenAction::None
            }
            KeyCode::Char('c') => {
                if self.listing.query().filter.is_none() {
                    return ScreenAction::None;
                }
                let (ticket, query) = self.listing.begin_filter(None);
                ScreenAction::FetchCompanies(ticket, query)
            }
            _ => ScreenAction::None,
        }
    }

    fn fetch_page(&mut self, page: u32) -> ScreenAction {
        match self.listing.begin_change_page(page) {
            Ok((ticket, query)) => ScreenAction::FetchCompanies(ticket, query),
            Err(e) => ScreenAction::SetError(e.to_string()),
        }
    }

    fn handle_search_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Esc => {
                self.mode = CompaniesMode::Browse;
                self.search_field.set_focus(false);
                ScreenAction::None
            }
            KeyCode::Enter => {
                self.mode = CompaniesMode::Browse;
                self.search_field.set_focus(false);
                if !self.can_fetch() {
                    return ScreenAction::None;
                }
                let (ticket, query) = self.listing.begin_search(&self.search_field.value);
                ScreenAction::FetchCompanies(ticket, query)
            }
            KeyCode::Char(c) => {
                self.search_field.insert_char(c);
                ScreenAction::None
            }
            KeyCode::Backspace => {
                self.search_field.delete_char();
                ScreenAction::None
            }
            KeyCode::Delete => {
                self.search_field.delete_char_forward();
                ScreenAction::None
            }
            KeyCode::Left => {
                self.search_field.move_cursor_left();
                ScreenAction::None
            }
            KeyCode::Right => {
                self.search_field.move_cursor_right();
                ScreenAction::None
            }
            KeyCode::Home => {
                self.search_field.move_cursor_to_start();
                ScreenAction::None
            }
            KeyCode::End => {
                self.search_field.move_cursor_to_end();
                ScreenAction::None
            }
            _ => ScreenAction::None,
        }
    }

    fn handle_filter_key(&mut self, key: KeyEvent) -> ScreenAction {
        let options = filter_options();
        match key.code {
            KeyCode::Esc => {
                self.mode = CompaniesMode::Browse;
                ScreenAction::None
            }
            KeyCode::Up => {
                let selected = self.filter_state.selected().unwrap_or(0);
                let previous = if selected == 0 { options.len() - 1 } else { selected - 1 };
                self.filter_state.select(Some(previous));
                ScreenAction::None
            }
            KeyCode::Down => {
                let selected = self.filter_state.selected().map_or(0, |i| (i + 1) % options.len());
                self.filter_state.select(Some(selected));
                ScreenAction::None
            }
            KeyCode::Enter => {
                self.mode = CompaniesMode::Browse;
                match self.filter_state.selected().and_then(|i| options.get(i)) {
                    Some(option) => {
                        let (ticket, query) = self.listing.begin_filter(Some(option.filter));
                        ScreenAction::FetchCompanies(ticket, query)
                    }
                    None => ScreenAction::None,
                }
            }
            _ => ScreenAction::None,
        }
    }

    fn handle_page_size_key(&mut self, key: KeyEvent) -> ScreenAction {
        let count = ROWS_PER_PAGE_OPTIONS.len();
        match key.code {
            KeyCode::Esc => {
                self.mode = CompaniesMode::Browse;
                ScreenAction::None
            }
            KeyCode::Up => {
                let selected = self.size_state.selected().unwrap_or(0);
                self.size_state
                    .select(Some(if selected == 0 { count - 1 } else { selected - 1 }));
                ScreenAction::None
            }
            KeyCode::Down => {
                let selected = self.size_state.selected().map_or(0, |i| (i + 1) % count);
                self.size_state.select(Some(selected));
                ScreenAction::None
            }
            KeyCode::Enter => {
                self.mode = CompaniesMode::Browse;
                let Some(size) = self
                    .size_state
                    .selected()
                    .and_then(|i| ROWS_PER_PAGE_OPTIONS.get(i).copied())
                else {
                    return ScreenAction::None;
                };
                let pages = self.listing.count().div_ceil(u64::from(size.max(1))).max(1) as u32;
                let page = self.listing.query().page.min(pages);
                match self.listing.begin_change_rows_per_page(size, page) {
                    Ok((ticket, query)) => ScreenAction::FetchCompanies(ticket, query),
                    Err(e) => ScreenAction::SetError(e.to_string()),
                }
            }
            _ => ScreenAction::None,
        }
    }

    pub fn draw(&mut self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(0),
                Constraint::Length(1),
            ])
            .split(area);

        self.search_field.render(f, chunks[0]);
        self.draw_body(f, chunks[1]);
        self.draw_footer(f, chunks[2]);

        match self.mode {
            CompaniesMode::Filter => self.draw_filter_popup(f, area),
            CompaniesMode::PageSize => self.draw_page_size_popup(f, area),
            _ => {}
        }
    }

    fn draw_body(&mut self, f: &mut Frame, area: Rect) {
        let t = self.translator.clone();
        let title = t.phrase(&[keys::BLUE, keys::TICK, keys::REQUEST]);
        let block = Block::default()
            .title(title.clone())
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        match self.listing.view() {
            ListingView::Loading => {
                let loading = Paragraph::new("Loading companies...")
                    .style(Styles::warning())
                    .block(block);
                f.render_widget(loading, area);
            }
            ListingView::Failed(error) => {
                let text = vec![
                    Line::from(Span::styled(error.to_string(), Styles::error())),
                    Line::from(""),
                    Line::from(Span::styled("Press r to retry", Styles::info())),
                ];
                let failed = Paragraph::new(text).wrap(Wrap { trim: true }).block(block);
                f.render_widget(failed, area);
            }
            ListingView::Empty => {
                let empty = Paragraph::new(t.text(keys::EMPTY_LIST))
                    .style(Styles::inactive())
                    .block(block);
                f.render_widget(empty, area);
            }
            ListingView::Table(rows) => {
                self.table.render(f, area, &title, rows, t.as_ref());
            }
        }
    }

    fn draw_footer(&self, f: &mut Frame, area: Rect) {
        let t = self.translator.as_ref();
        let query = self.listing.query();
        let mut spans = vec![
            Span::raw(format!(
                "Page {}/{} | Rows per page: {} | Total: {}",
                query.page,
                self.listing.total_pages(),
                query.size,
                self.listing.count()
            )),
        ];
        if let Some(filter) = query.filter {
            let label = filter_options()
                .iter()
                .find(|option| option.filter == filter)
                .map(|option| t.phrase(option.label))
                .unwrap_or_else(|| filter.as_str().to_string());
            spans.push(Span::styled(format!(" | Filter: {}", label), Styles::info()));
        }
        if self.listing.is_busy() {
            spans.push(Span::styled(" | Loading...", Styles::warning()));
        }
        if let Some(error) = self.listing.inline_error() {
            spans.push(Span::styled(format!(" | {}", error), Styles::error()));
        }
        f.render_widget(Paragraph::new(Line::from(spans)), area);
    }

    fn draw_filter_popup(&mut self, f: &mut Frame, area: Rect) {
        let t = self.translator.as_ref();
        let popup = centered_rect(50, 60, area);
        f.render_widget(Clear, popup);

        let active = self.listing.query().filter;
        let items: Vec<ListItem> = filter_options()
            .iter()
            .map(|option| {
                let mut lines = Vec::new();
                if let Some(group) = option.group_title {
                    lines.push(Line::from(Span::styled(t.phrase(group), Styles::title())));
                }
                let marker = if active == Some(option.filter) { "●" } else { " " };
                lines.push(Line::from(format!(
                    " {} {} {}",
                    marker,
                    icon_glyph(option.icon),
                    t.phrase(option.label)
                )));
                ListItem::new(lines)
            })
            .collect();

        let list = List::new(items)
            .block(
                Block::default()
                    .title("Filter (Enter: apply, Esc: close)")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());
        f.render_stateful_widget(list, popup, &mut self.filter_state);
    }

    fn draw_page_size_popup(&mut self, f: &mut Frame, area: Rect) {
        let popup = centered_rect(30, 40, area);
        f.render_widget(Clear, popup);

        let items: Vec<ListItem> = ROWS_PER_PAGE_OPTIONS
            .iter()
            .map(|size| ListItem::new(size.to_string()))
            .collect();
        let list = List::new(items)
            .block(
                Block::default()
                    .title("Rows per page")
                    .borders(Borders::ALL)
                    .border_style(Styles::active_border()),
            )
            .highlight_style(Styles::selected());
        f.render_stateful_widget(list, popup, &mut self.size_state);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::page_of;
    use crate::i18n::Catalog;
    use crate::models::{BlueTickStatus, CompanyFilter, CompanyId};
    use crossterm::event::KeyModifiers;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn loaded_screen(rows: usize, total: u64) -> CompaniesScreen {
        let mut screen = CompaniesScreen::new(50, Arc::new(Catalog::english()));
        let ScreenAction::FetchCompanies(ticket, _) = screen.start() else {
            panic!("initial load should fetch");
        };
        screen.on_companies_loaded(ticket, Ok(page_of(rows, total)));
        screen
    }

    #[test]
    fn test_enter_opens_selected_company() {
        let mut screen = loaded_screen(3, 3);
        screen.handle_key_event(key(KeyCode::Down));
        assert_eq!(
            screen.handle_key_event(key(KeyCode::Enter)),
            ScreenAction::OpenBlueTick(WorkflowTarget::Existing(CompanyId(2)))
        );
        assert_eq!(
            screen.handle_key_event(key(KeyCode::Char('n'))),
            ScreenAction::OpenBlueTick(WorkflowTarget::New)
        );
    }

    #[test]
    fn test_search_mode_captures_text() {
        let mut screen = loaded_screen(3, 3);
        screen.handle_key_event(key(KeyCode::Char('/')));
        assert!(screen.captures_input());

        for c in "acme".chars() {
            screen.handle_key_event(key(KeyCode::Char(c)));
        }
        let action = screen.handle_key_event(key(KeyCode::Enter));
        match action {
            ScreenAction::FetchCompanies(ticket, query) => {
                assert_eq!(ticket.kind, FetchKind::Search);
                assert_eq!(query.search.as_deref(), Some("acme"));
                assert_eq!(query.page, 1);
            }
            other => panic!("unexpected action: {other:?}"),
        }
        assert!(!screen.captures_input());
    }

    #[test]
    fn test_fetch_keys_ignored_while_busy() {
        let mut screen = loaded_screen(50, 400);
        let first = screen.handle_key_event(key(KeyCode::Right));
        assert!(matches!(first, ScreenAction::FetchCompanies(_, ref q) if q.page == 2));
        assert!(screen.listing.is_busy());

        assert_eq!(screen.handle_key_event(key(KeyCode::Right)), ScreenAction::None);
        assert_eq!(screen.handle_key_event(key(KeyCode::Char('f'))), ScreenAction::None);
    }

    #[test]
    fn test_filter_popup_applies_selection() {
        let mut screen = loaded_screen(5, 5);
        screen.handle_key_event(key(KeyCode::Char('f')));
        assert_eq!(screen.mode, CompaniesMode::Filter);
        screen.handle_key_event(key(KeyCode::Down));
        screen.handle_key_event(key(KeyCode::Down));

        match screen.handle_key_event(key(KeyCode::Enter)) {
            ScreenAction::FetchCompanies(_, query) => assert_eq!(
                query.filter,
                Some(CompanyFilter::Status(BlueTickStatus::InProgress))
            ),
            other => panic!("unexpected action: {other:?}"),
        }
        assert_eq!(screen.mode, CompaniesMode::Browse);
    }

    #[test]
    fn test_page_size_popup() {
        let mut screen = loaded_screen(50, 400);
        screen.handle_key_event(key(KeyCode::Char('s')));
        assert!(screen.captures_input());
        screen.handle_key_event(key(KeyCode::Down));
        match screen.handle_key_event(key(KeyCode::Enter)) {
            ScreenAction::FetchCompanies(ticket, query) => {
                assert_eq!(ticket.kind, FetchKind::RowsPerPage);
                assert_eq!((query.size, query.page), (60, 1));
            }
            other => panic!("unexpected action: {other:?}"),
        }
    }

    #[test]
    fn test_page_size_keeps_current_page() {
        let mut screen = loaded_screen(50, 400);
        for _ in 0..2 {
            let ScreenAction::FetchCompanies(ticket, _) = screen.handle_key_event(key(KeyCode::Right)) else {
                panic!("next page should fetch");
            };
            screen.on_companies_loaded(ticket, Ok(page_of(50, 400)));
        }
        assert_eq!(screen.listing.query().page, 3);

        screen.handle_key_event(key(KeyCode::Char('s')));
        screen.handle_key_event(key(KeyCode::Down));
        let ScreenAction::FetchCompanies(ticket, query) = screen.handle_key_event(key(KeyCode::Enter)) else {
            panic!("rows per page should fetch");
        };
        assert_eq!(ticket.kind, FetchKind::RowsPerPage);
        assert_eq!((query.size, query.page), (60, 3));
    }

    #[test]
    fn test_page_size_clamps_page_to_range() {
        let mut screen = loaded_screen(50, 120);
        for _ in 0..2 {
            let ScreenAction::FetchCompanies(ticket, _) = screen.handle_key_event(key(KeyCode::Right)) else {
                panic!("next page should fetch");
            };
            screen.on_companies_loaded(ticket, Ok(page_of(20, 120)));
        }
        assert_eq!(screen.listing.query().page, 3);

        // 120 rows at 80 per page leaves two pages
        screen.handle_key_event(key(KeyCode::Char('s')));
        screen.handle_key_event(key(KeyCode::Up));
        let ScreenAction::FetchCompanies(_, query) = screen.handle_key_event(key(KeyCode::Enter)) else {
            panic!("rows per page should fetch");
        };
        assert_eq!((query.size, query.page), (80, 2));
    }

    #[test]
    fn test_inline_error_is_reported() {
        let mut screen = loaded_screen(5, 5);
        screen.handle_key_event(key(KeyCode::Char('/')));
        screen.handle_key_event(key(KeyCode::Char('x')));
        let ScreenAction::FetchCompanies(ticket, _) = screen.handle_key_event(key(KeyCode::Enter)) else {
            panic!("search should fetch");
        };

        let action = screen.on_companies_loaded(ticket, Err(ApiError::MissingData("getCompanyList")));
        assert_eq!(
            action,
            ScreenAction::SetError("getCompanyList response contained no data".to_string())
        );
        assert_eq!(screen.listing.rows().len(), 5);
    }
}
