//! Blue tick workflow screen
//!
//! Shows the status card of one company with the actions its status allows,
//! the request history below it, and the confirmation modal on top.

use std::sync::Arc;

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, Wrap},
    Frame,
};

use super::ScreenAction;
use crate::api::ApiError;
use crate::console_tui::components::{FormField, FormFieldType};
use crate::console_tui::ui::{badge_spans, centered_rect, Styles};
use crate::i18n::{keys, Translate};
use crate::listing::LoadState;
use crate::models::{BlueTickDetails, BlueTickStatus, EMPTY_DESCRIPTION};
use crate::presentation;
use crate::workflow::{
    ActionModal, BlueTickWorkflow, RefreshTicket, SubmitOutcome, SubmitTicket, WorkflowError,
    WorkflowTarget,
};

pub struct BlueTickScreen {
    pub workflow: BlueTickWorkflow,
    pub reason_field: FormField,
    translator: Arc<dyn Translate>,
}

impl BlueTickScreen {
    pub fn new(target: WorkflowTarget, translator: Arc<dyn Translate>) -> Self {
        Self {
            workflow: BlueTickWorkflow::new(target),
            reason_field: FormField::new("", FormFieldType::TextArea),
            translator,
        }
    }

    /// Fetch the record; nothing to do for a new request
    pub fn start(&mut self) -> ScreenAction {
        match self.workflow.begin_refresh() {
            Some(ticket) => ScreenAction::FetchBlueTick(ticket),
            None => ScreenAction::None,
        }
    }

    pub fn on_leave(&mut self) {
        self.workflow.invalidate();
    }

    /// Any open modal owns the keyboard, global shortcuts included
    pub fn captures_input(&self) -> bool {
        self.workflow.modal().is_some()
    }

    pub fn on_refreshed(
        &mut self,
        ticket: RefreshTicket,
        result: Result<BlueTickDetails, ApiError>,
    ) -> ScreenAction {
        if !self.workflow.apply_refresh(ticket, result) {
            return ScreenAction::None;
        }
        match self.workflow.load_state() {
            LoadState::Failed(error) => ScreenAction::SetError(error.clone()),
            _ => ScreenAction::None,
        }
    }

    pub fn on_submitted(&mut self, ticket: SubmitTicket, result: Result<(), ApiError>) -> ScreenAction {
        match self.workflow.finish_submit(ticket, result) {
            Ok(SubmitOutcome::Applied(status)) => {
                self.reason_field.clear();
                ScreenAction::Batch(vec![
                    self.start(),
                    ScreenAction::SetSuccess(format!("Blue tick is now {}", status.label())),
                ])
            }
            Ok(SubmitOutcome::Stale) => ScreenAction::None,
            Err(e) => ScreenAction::SetError(e.to_string()),
        }
    }

    pub fn handle_key_event(&mut self, key: KeyEvent) -> ScreenAction {
        match self.workflow.modal().map(ActionModal::requires_reason) {
            Some(true) => self.handle_reason_key(key),
            Some(false) => self.handle_preview_key(key),
            None => self.handle_card_key(key),
        }
    }

    fn handle_card_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Esc | KeyCode::Backspace => ScreenAction::NavigateBack,
            KeyCode::Char('r') => self.start(),
            KeyCode::Char('c') => match self.workflow.open_confirm() {
                Ok(()) => ScreenAction::None,
                Err(e) => ScreenAction::SetError(e.to_string()),
            },
            KeyCode::Char('x') => match self.workflow.open_reject() {
                Ok(()) => {
                    self.reset_reason_field();
                    ScreenAction::None
                }
                Err(e) => ScreenAction::SetError(e.to_string()),
            },
            _ => ScreenAction::None,
        }
    }

    fn reset_reason_field(&mut self) {
        let label = self
            .workflow
            .modal()
            .and_then(ActionModal::reason_copy)
            .map(|copy| self.translator.phrase(copy.input_label))
            .unwrap_or_default();
        self.reason_field = FormField::new(&label, FormFieldType::TextArea).required();
        self.reason_field.set_focus(true);
    }

    fn handle_preview_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Enter | KeyCode::Char('y') => self.submit(),
            KeyCode::Esc | KeyCode::Char('n') => self.close(),
            _ => ScreenAction::None,
        }
    }

    fn handle_reason_key(&mut self, key: KeyEvent) -> ScreenAction {
        match key.code {
            KeyCode::Enter => return self.submit(),
            KeyCode::Esc => return self.close(),
            _ if self.workflow.is_submitting() => return ScreenAction::None,
            KeyCode::Char(c) => self.reason_field.insert_char(c),
            KeyCode::Backspace => self.reason_field.delete_char(),
            KeyCode::Delete => self.reason_field.delete_char_forward(),
            KeyCode::Left => self.reason_field.move_cursor_left(),
            KeyCode::Right => self.reason_field.move_cursor_right(),
            KeyCode::Home => self.reason_field.move_cursor_to_start(),
            KeyCode::End => self.reason_field.move_cursor_to_end(),
            _ => return ScreenAction::None,
        }
        self.workflow.set_reason(&self.reason_field.value);
        ScreenAction::None
    }

    fn submit(&mut self) -> ScreenAction {
        match self.workflow.begin_submit(self.translator.as_ref()) {
            Ok(ticket) => ScreenAction::SubmitBlueTick(ticket),
            Err(WorkflowError::Validation { message, .. }) => {
                self.reason_field.validation_error = Some(message);
                ScreenAction::None
            }
            Err(e) => ScreenAction::SetError(e.to_string()),
        }
    }

    fn close(&mut self) -> ScreenAction {
        if self.workflow.close_modal() {
            self.reason_field.clear();
            ScreenAction::None
        } else {
            ScreenAction::SetStatus("Waiting for the submission to finish".to_string())
        }
    }

    pub fn draw(&self, f: &mut Frame, area: Rect) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Length(9), Constraint::Min(0)])
            .split(area);

        self.draw_status_card(f, chunks[0]);
        self.draw_history(f, chunks[1]);

        if let Some(modal) = self.workflow.modal() {
            self.draw_modal(f, area, modal);
        }
    }

    fn draw_status_card(&self, f: &mut Frame, area: Rect) {
        let t = self.translator.as_ref();
        let block = Block::default()
            .title(t.phrase(&[keys::BLUE, keys::TICK, keys::STATUS]))
            .borders(Borders::ALL)
            .border_style(Styles::active_border());

        let mut lines = Vec::new();
        match self.workflow.load_state() {
            LoadState::Loading => {
                lines.push(Line::from(Span::styled("Loading blue tick...", Styles::warning())));
            }
            LoadState::Failed(error) => {
                lines.push(Line::from(Span::styled(error.clone(), Styles::error())));
                lines.push(Line::from(""));
                lines.push(Line::from(Span::styled("Press r to retry", Styles::info())));
            }
            LoadState::Ready => {
                let details = self.workflow.details();
                let name = match self.workflow.target() {
                    WorkflowTarget::New => t.phrase(&[keys::REQUEST]),
                    WorkflowTarget::Existing(id) => details
                        .company_name
                        .clone()
                        .unwrap_or_else(|| format!("#{}", id)),
                };
                lines.push(Line::from(Span::styled(name, Styles::title())));

                let shown = self.workflow.presentation();
                lines.push(Line::from(badge_spans(&shown.indicator, t)));
                lines.push(Line::from(""));

                for title in shown.title_lines(t) {
                    lines.push(Line::from(title));
                }

                let mut buttons = Vec::new();
                if let Some(confirm) = shown.confirm.filter(|_| shown.confirm_visible()) {
                    buttons.push(Span::styled(
                        format!("[c] {}  ", t.phrase(confirm.label)),
                        Styles::success(),
                    ));
                }
                if let Some(reject) = shown.reject.filter(|_| shown.reject_visible()) {
                    buttons.push(Span::styled(
                        format!("[x] {}", t.phrase(reject.label)),
                        Styles::error(),
                    ));
                }
                if !buttons.is_empty() {
                    lines.push(Line::from(buttons));
                }
            }
        }

        let card = Paragraph::new(lines).wrap(Wrap { trim: true }).block(block);
        f.render_widget(card, area);
    }

    fn draw_history(&self, f: &mut Frame, area: Rect) {
        let t = self.translator.as_ref();
        let block = Block::default()
            .title(t.text(keys::HISTORY))
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        let history = self.workflow.history();
        if history.is_empty() {
            let empty = Paragraph::new(t.phrase(&[keys::EMPTY, keys::REQUEST, keys::LIST]))
                .style(Styles::inactive())
                .block(block);
            f.render_widget(empty, area);
            return;
        }

        let header = Row::new(vec![
            Cell::from(t.text(keys::DATE)),
            Cell::from(t.text(keys::STATUS)),
            Cell::from(t.text(keys::DESCRIPTION)),
        ])
        .style(Styles::title());

        let rows: Vec<Row> = history
            .iter()
            .map(|entry| {
                Row::new(vec![
                    Cell::from(entry.display_date()),
                    Cell::from(Line::from(badge_spans(presentation::badge(entry.status), t))),
                    Cell::from(entry.display_description().to_string()),
                ])
            })
            .collect();

        let table = Table::new(
            rows,
            [
                Constraint::Length(18),
                Constraint::Length(18),
                Constraint::Min(10),
            ],
        )
        .header(header)
        .block(block);
        f.render_widget(table, area);
    }

    fn draw_modal(&self, f: &mut Frame, area: Rect, modal: &ActionModal) {
        let popup = centered_rect(70, 60, area);
        f.render_widget(Clear, popup);

        match modal.reason_copy() {
            Some(copy) => self.draw_reason_form(f, popup, modal, copy),
            None => self.draw_accept_preview(f, popup, modal),
        }
    }

    fn draw_accept_preview(&self, f: &mut Frame, area: Rect, modal: &ActionModal) {
        let t = self.translator.as_ref();
        let details = self.workflow.details();
        let logo = if details.logo_url.is_some() { "◉" } else { "○" };
        let name = details
            .company_name
            .clone()
            .unwrap_or_else(|| EMPTY_DESCRIPTION.to_string());

        let mut lines = vec![
            Line::from(format!("{} {}", logo, name)),
            Line::from(""),
            Line::from(badge_spans(presentation::badge(BlueTickStatus::Accepted), t)),
            Line::from(Span::styled(
                t.phrase(&[keys::ACCEPTED, keys::BLUE, keys::TICK]),
                Styles::title(),
            )),
            Line::from(t.text(keys::BLUE_TICK_ACCEPT_DESCRIPTION)),
            Line::from(""),
        ];
        lines.extend(self.modal_footer(modal, &t.text(keys::CONFIRM)));

        let preview = Paragraph::new(lines).wrap(Wrap { trim: true }).block(
            Block::default()
                .title(t.phrase(&[keys::CONFIRM, keys::BLUE, keys::TICK]))
                .borders(Borders::ALL)
                .border_style(Styles::active_border()),
        );
        f.render_widget(preview, area);
    }

    fn draw_reason_form(
        &self,
        f: &mut Frame,
        area: Rect,
        modal: &ActionModal,
        copy: &presentation::ModalCopy,
    ) {
        let t = self.translator.as_ref();
        let block = Block::default()
            .title(t.phrase(copy.header))
            .borders(Borders::ALL)
            .border_style(Styles::active_border());
        let inner = block.inner(area);
        f.render_widget(block, area);

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(3),
                Constraint::Min(4),
                Constraint::Length(3),
            ])
            .split(inner);

        let body = Paragraph::new(t.phrase(copy.body)).wrap(Wrap { trim: true });
        f.render_widget(body, chunks[0]);

        self.reason_field.render(f, chunks[1]);

        let footer = Paragraph::new(self.modal_footer(modal, &t.phrase(copy.submit_label)))
            .wrap(Wrap { trim: true });
        f.render_widget(footer, chunks[2]);
    }

    fn modal_footer(&self, modal: &ActionModal, submit_label: &str) -> Vec<Line<'static>> {
        let mut lines = Vec::new();
        if let Some(error) = &modal.submit_error {
            lines.push(Line::from(Span::styled(error.clone(), Styles::error())));
        }
        if modal.loading {
            lines.push(Line::from(Span::styled("Submitting...", Styles::warning())));
        } else {
            lines.push(Line::from(vec![
                Span::styled(format!("[Enter] {}", submit_label), Styles::success()),
                Span::raw("  "),
                Span::styled(
                    format!("[Esc] {}", self.translator.text(keys::CANCEL)),
                    Styles::inactive(),
                ),
            ]));
        }
        lines
    }
}
