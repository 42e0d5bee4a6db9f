//! Main TUI application state and logic

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout, Rect},
    widgets::{Block, Borders, Clear, Paragraph},
    Frame, Terminal,
};
use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};
use tracing::{debug, info};

use super::components::StatusDisplay;
use super::events::AppEvent;
use super::screens::{BlueTickScreen, CompaniesScreen, ScreenAction};
use super::ui::{centered_rect, Styles};
use crate::api::CompanyApi;
use crate::config::Config;
use crate::i18n::Translate;
use crate::workflow::WorkflowTarget;

/// Application screens
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Companies,
    BlueTick,
}

/// Main TUI application state
pub struct App {
    /// Current active screen
    pub current_screen: Screen,
    pub companies: CompaniesScreen,
    /// Present while the workflow screen is open
    pub blue_tick: Option<BlueTickScreen>,
    pub status: StatusDisplay,
    pub should_quit: bool,
    pub show_help_popup: bool,
    api: Arc<dyn CompanyApi>,
    translator: Arc<dyn Translate>,
    events_tx: UnboundedSender<AppEvent>,
    events_rx: UnboundedReceiver<AppEvent>,
}

impl App {
    /// Create a new TUI application
    pub fn new(config: &Config, api: Arc<dyn CompanyApi>, translator: Arc<dyn Translate>) -> Self {
        let (events_tx, events_rx) = unbounded_channel();
        Self {
            current_screen: Screen::Companies,
            companies: CompaniesScreen::new(config.listing.default_page_size, translator.clone()),
            blue_tick: None,
            status: StatusDisplay::new(),
            should_quit: false,
            show_help_popup: false,
            api,
            translator,
            events_tx,
            events_rx,
        }
    }

    /// Kick off the first fetch; `route` opens the workflow screen directly
    pub fn start(&mut self, route: Option<WorkflowTarget>) {
        let action = self.companies.start();
        self.perform(action);
        if let Some(target) = route {
            self.perform(ScreenAction::OpenBlueTick(target));
        }
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        loop {
            terminal.draw(|f| self.draw(f))?;

            while let Ok(event) = self.events_rx.try_recv() {
                self.handle_app_event(event);
            }

            if crossterm::event::poll(Duration::from_millis(100))? {
                if let Event::Key(key) = crossterm::event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key);
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!("Console closed");
        Ok(())
    }

    /// Wait for the next background result
    pub async fn next_event(&mut self) -> Option<AppEvent> {
        self.events_rx.recv().await
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        if self.show_help_popup {
            if matches!(key.code, KeyCode::Esc | KeyCode::F(1) | KeyCode::Char('?')) {
                self.show_help_popup = false;
            }
            return;
        }

        if !self.captures_input() {
            match key.code {
                KeyCode::F(1) | KeyCode::Char('?') => {
                    self.show_help_popup = true;
                    return;
                }
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return;
                }
                _ => {}
            }
        }

        let action = match self.current_screen {
            Screen::Companies => self.companies.handle_key_event(key),
            Screen::BlueTick => match self.blue_tick.as_mut() {
                Some(screen) => screen.handle_key_event(key),
                None => ScreenAction::NavigateBack,
            },
        };
        self.perform(action);
    }

    fn captures_input(&self) -> bool {
        match self.current_screen {
            Screen::Companies => self.companies.captures_input(),
            Screen::BlueTick => self.blue_tick.as_ref().is_some_and(BlueTickScreen::captures_input),
        }
    }

    /// Route a background result to the screen that asked for it
    pub fn handle_app_event(&mut self, event: AppEvent) {
        let action = match event {
            AppEvent::CompaniesLoaded { ticket, result } => {
                self.status.clear_loading();
                self.companies.on_companies_loaded(ticket, result)
            }
            AppEvent::BlueTickLoaded { ticket, result } => match self.blue_tick.as_mut() {
                Some(screen) => {
                    self.status.clear_loading();
                    screen.on_refreshed(ticket, result)
                }
                None => {
                    debug!("Blue tick fetch finished after the screen was closed");
                    ScreenAction::None
                }
            },
            AppEvent::BlueTickSubmitted { ticket, result } => match self.blue_tick.as_mut() {
                Some(screen) => {
                    self.status.clear_loading();
                    screen.on_submitted(ticket, result)
                }
                None => {
                    debug!("Blue tick submission finished after the screen was closed");
                    ScreenAction::None
                }
            },
        };
        self.perform(action);
    }

    /// Apply a screen action
    pub fn perform(&mut self, action: ScreenAction) {
        match action {
            ScreenAction::None => {}
            ScreenAction::FetchCompanies(ticket, query) => {
                self.status.set_loading("Loading companies...".to_string());
                let api = self.api.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = api.list_companies(&query).await;
                    let _ = tx.send(AppEvent::CompaniesLoaded { ticket, result });
                });
            }
            ScreenAction::FetchBlueTick(ticket) => {
                self.status.set_loading("Loading blue tick...".to_string());
                let api = self.api.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = api.get_blue_tick(ticket.company_id).await;
                    let _ = tx.send(AppEvent::BlueTickLoaded { ticket, result });
                });
            }
            ScreenAction::SubmitBlueTick(ticket) => {
                self.status.set_loading("Submitting...".to_string());
                let api = self.api.clone();
                let tx = self.events_tx.clone();
                tokio::spawn(async move {
                    let result = api.submit_blue_tick_action(&ticket.action).await;
                    let _ = tx.send(AppEvent::BlueTickSubmitted { ticket, result });
                });
            }
            ScreenAction::OpenBlueTick(target) => {
                info!("Opening blue tick workflow for {:?}", target);
                self.companies.on_leave();
                let mut screen = BlueTickScreen::new(target, self.translator.clone());
                let action = screen.start();
                self.blue_tick = Some(screen);
                self.current_screen = Screen::BlueTick;
                self.status.clear();
                self.perform(action);
            }
            ScreenAction::NavigateBack => {
                if let Some(mut screen) = self.blue_tick.take() {
                    screen.on_leave();
                }
                if self.current_screen == Screen::BlueTick {
                    info!("Back to the company list");
                    self.current_screen = Screen::Companies;
                    self.status.clear();
                    let action = self.companies.start();
                    self.perform(action);
                }
            }
            ScreenAction::SetStatus(message) => self.status.set_info(message),
            ScreenAction::SetSuccess(message) => self.status.set_success(message),
            ScreenAction::SetError(message) => self.status.set_error(message),
            ScreenAction::Batch(actions) => {
                for action in actions {
                    self.perform(action);
                }
            }
        }
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        // Main layout: status bar at bottom, content area above
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        match (self.current_screen, self.blue_tick.as_ref()) {
            (Screen::BlueTick, Some(screen)) => screen.draw(f, chunks[0]),
            _ => self.companies.draw(f, chunks[0]),
        }

        let idle = format!(
            "Blue Tick Console - {} | ESC: Back | Q: Quit | F1/?: Help",
            match self.current_screen {
                Screen::Companies => "Companies",
                Screen::BlueTick => "Blue Tick",
            }
        );
        self.status.render(f, chunks[1], &idle);

        if self.show_help_popup {
            self.draw_help_popup(f, size);
        }
    }

    /// Draw help popup with context-sensitive shortcuts
    fn draw_help_popup(&self, f: &mut Frame, area: Rect) {
        let popup_area = centered_rect(70, 70, area);
        f.render_widget(Clear, popup_area);

        let help_popup = Paragraph::new(self.get_context_help()).block(
            Block::default()
                .title("Help - Context Shortcuts")
                .borders(Borders::ALL)
                .border_style(Styles::active_border()),
        );
        f.render_widget(help_popup, popup_area);
    }

    fn get_context_help(&self) -> String {
        let global_help = "Global Shortcuts:\n\
            Q - Quit application\n\
            F1 / ? - Toggle this help\n\n";

        let screen_help = match self.current_screen {
            Screen::Companies => {
                "Companies:\n\
                ↑/↓ - Select company\n\
                ←/→ - Previous / next page\n\
                Enter - Open blue tick detail\n\
                n - New request\n\
                / - Search by name\n\
                f - Filter\n\
                c - Clear filter\n\
                s - Rows per page\n\
                r - Reload"
            }
            Screen::BlueTick => {
                "Blue Tick:\n\
                c - Confirm blue tick\n\
                x - Reject / cancel blue tick\n\
                r - Reload record\n\
                Enter - Submit open dialog\n\
                ESC - Close dialog / back to companies"
            }
        };

        format!("{}{}", global_help, screen_help)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::fake::{page_of, FakeApi};
    use crate::console_tui::components::status_display::StatusType;
    use crate::i18n::Catalog;
    use crate::models::{BlueTickStatus, CompanyId};
    use crossterm::event::KeyModifiers;
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn app_with(api: FakeApi) -> (App, Arc<FakeApi>) {
        let api = Arc::new(api);
        let app = App::new(&Config::default(), api.clone(), Arc::new(Catalog::english()));
        (app, api)
    }

    async fn settle(app: &mut App) {
        let event = app.next_event().await.expect("channel open");
        app.handle_app_event(event);
    }

    fn render(app: &mut App) -> String {
        let mut terminal = Terminal::new(TestBackend::new(110, 30)).unwrap();
        terminal.draw(|f| app.draw(f)).unwrap();
        buffer_text(terminal.backend().buffer())
    }

    fn buffer_text(buffer: &Buffer) -> String {
        let width = buffer.area.width as usize;
        buffer
            .content
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    #[tokio::test]
    async fn test_listing_renders_rows() {
        let fake = FakeApi::new();
        fake.push_page(page_of(2, 2));
        let (mut app, _api) = app_with(fake);

        app.start(None);
        assert!(render(&mut app).contains("Loading companies"));

        settle(&mut app).await;
        let screen = render(&mut app);
        assert!(screen.contains("Company 1"));
        assert!(screen.contains("Not Requested"));
        assert!(screen.contains("[x]"));
        assert!(screen.contains("Detail"));
    }

    #[tokio::test]
    async fn test_empty_listing() {
        let fake = FakeApi::new();
        fake.push_page(page_of(0, 0));
        let (mut app, _api) = app_with(fake);

        app.start(None);
        settle(&mut app).await;
        assert!(render(&mut app).contains("Empty List"));
    }

    #[tokio::test]
    async fn test_open_workflow_and_back() {
        let fake = FakeApi::with_details(BlueTickStatus::InProgress);
        fake.push_page(page_of(3, 3));
        let (mut app, api) = app_with(fake);

        app.start(None);
        settle(&mut app).await;

        app.handle_key_event(key(KeyCode::Enter));
        assert_eq!(app.current_screen, Screen::BlueTick);
        settle(&mut app).await;
        assert_eq!(api.detail_calls.lock().unwrap().as_slice(), &[CompanyId(1)]);

        let screen = render(&mut app);
        assert!(screen.contains("Acme"));
        assert!(screen.contains("Company applied ."));
        assert!(screen.contains("Confirm all conditions ?"));
        assert!(screen.contains("[c] Confirm"));
        assert!(screen.contains("Empty Request List"));

        app.handle_key_event(key(KeyCode::Esc));
        assert_eq!(app.current_screen, Screen::Companies);
        assert!(app.blue_tick.is_none());
        settle(&mut app).await;
        assert_eq!(api.list_call_count(), 2);
    }

    #[tokio::test]
    async fn test_reject_flow_refetches_record() {
        let fake = FakeApi::with_details(BlueTickStatus::InProgress);
        let (mut app, api) = app_with(fake);

        app.start(Some(WorkflowTarget::Existing(CompanyId(9))));
        // Listing fetch and record fetch
        settle(&mut app).await;
        settle(&mut app).await;

        app.handle_key_event(key(KeyCode::Char('x')));
        let screen = render(&mut app);
        assert!(screen.contains("Reject Blue Tick"));
        assert!(screen.contains("Reasons for Reject Blue Tick"));

        // q is typed into the reason instead of quitting
        for c in "quality".chars() {
            app.handle_key_event(key(KeyCode::Char(c)));
        }
        assert!(!app.should_quit);
        app.handle_key_event(key(KeyCode::Enter));
        settle(&mut app).await;
        settle(&mut app).await;

        assert_eq!(api.action_count(), 1);
        assert_eq!(api.actions.lock().unwrap()[0].description, "quality");
        assert_eq!(api.detail_call_count(), 2);

        let current = app.status.get_current().expect("status message");
        assert_eq!(current.status_type, StatusType::Success);
        assert_eq!(current.message, "Blue tick is now Rejected");

        let screen = render(&mut app);
        assert!(screen.contains("Rejected"));
        assert!(screen.contains("quality"));
        assert!(!screen.contains("[x]"));
    }

    #[tokio::test]
    async fn test_new_route_renders_without_fetch() {
        let (mut app, api) = app_with(FakeApi::new());
        app.start(Some(WorkflowTarget::New));
        settle(&mut app).await;

        assert_eq!(api.detail_call_count(), 0);
        let screen = render(&mut app);
        assert!(screen.contains("Not Requested"));
        assert!(screen.contains("Empty Request List"));
    }

    #[tokio::test]
    async fn test_help_popup_toggles() {
        let (mut app, _api) = app_with(FakeApi::new());
        app.handle_key_event(key(KeyCode::Char('?')));
        assert!(app.show_help_popup);
        assert!(render(&mut app).contains("Help - Context Shortcuts"));

        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        app.handle_key_event(key(KeyCode::Esc));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }

    #[tokio::test]
    async fn test_accept_preview_blocks_global_keys() {
        let fake = FakeApi::with_details(BlueTickStatus::InProgress);
        let (mut app, api) = app_with(fake);

        app.start(Some(WorkflowTarget::Existing(CompanyId(9))));
        settle(&mut app).await;
        settle(&mut app).await;

        app.handle_key_event(key(KeyCode::Char('c')));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(!app.should_quit);
        app.handle_key_event(key(KeyCode::Char('?')));
        assert!(!app.show_help_popup);
        assert!(render(&mut app).contains("Confirm Blue Tick"));
        assert_eq!(api.action_count(), 0);

        app.handle_key_event(key(KeyCode::Esc));
        app.handle_key_event(key(KeyCode::Char('q')));
        assert!(app.should_quit);
    }
}
