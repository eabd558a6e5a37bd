//! Main TUI application state and logic

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Constraint, Direction, Layout},
    widgets::Paragraph,
    Frame, Terminal,
};
use tokio::sync::{oneshot, watch};
use tracing::{debug, info, warn};

use super::components::{Modal, Notifications};
use super::screens::{EntityListScreen, Sidebar};
use super::traits::ScreenAction;
use crate::api::{ApiError, RemoteApi};
use crate::config::Config;
use crate::models::{EntityDraft, EntityKind};
use crate::query::{QueryClient, QueryState};

pub const CREATE_FAILED: &str = "Something went wrong.";

const HELP_TEXT: &str = "Global:\n\
    1-4 / Tab - Switch section\n\
    ? - Toggle this help\n\
    q / Ctrl+C - Quit\n\n\
    List:\n\
    ↑/↓ - Select row\n\
    a - Add\n\
    e / Enter - Edit selected\n\
    d - Delete selected\n\
    ←/→ - Focus column, s - Sort it\n\
    / - Filter by name\n\
    r - Refresh\n\n\
    Form:\n\
    Tab / Shift+Tab - Next / previous field\n\
    Enter - Submit, Esc - Close\n\n\
    Delete confirmation:\n\
    y / Enter - Confirm, n / Esc - Cancel";

/// A create request running in the background
struct PendingCreate {
    kind: EntityKind,
    result: oneshot::Receiver<Result<(), ApiError>>,
}

/// Main TUI application state
pub struct App {
    pub client: QueryClient,
    pub screen: EntityListScreen,
    pub sidebar: Sidebar,
    pub notifications: Notifications,
    pub help: Modal,
    pub current_route: String,
    pub should_quit: bool,
    business_id: i64,
    tick: Duration,
    /// Subscription for the mounted screen; replacing it drops interest in the old key
    receiver: watch::Receiver<QueryState>,
    pending_create: Option<PendingCreate>,
}

impl App {
    /// Create the app and mount the first section
    pub fn new(config: &Config, api: Arc<dyn RemoteApi>) -> Result<Self> {
        let business_id = config.business_id()?;
        let client = QueryClient::new(api);
        let kind = EntityKind::Category;
        let screen = EntityListScreen::new(kind, business_id);
        let receiver = client.observe(&screen.query_key());

        let mut app = Self {
            client,
            screen,
            sidebar: Sidebar::new(),
            notifications: Notifications::new()
                .with_history(50)
                .with_auto_clear(config.toast_duration()),
            help: Modal::new("Help - Shortcuts").with_size(60, 80),
            current_route: kind.route().to_string(),
            should_quit: false,
            business_id,
            tick: config.tick_interval(),
            receiver,
            pending_create: None,
        };
        app.pull_query_state(true);
        Ok(app)
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        info!("Dashboard started for business {}", self.business_id);

        loop {
            self.poll_pending_create();
            self.sync_query_state();
            self.notifications.expire();

            terminal.draw(|f| self.draw(f))?;

            if event::poll(self.tick)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key)?;
                    }
                }
            }

            if self.should_quit {
                break;
            }
        }

        info!("Dashboard closed");
        Ok(())
    }

    pub fn current_kind(&self) -> EntityKind {
        self.screen.kind
    }

    /// Apply the latest query snapshot if it changed since the last tick
    pub fn sync_query_state(&mut self) {
        self.pull_query_state(false);
    }

    fn pull_query_state(&mut self, force: bool) {
        let changed = self.receiver.has_changed().unwrap_or(false);
        if !(changed || force) {
            return;
        }

        let state = self.receiver.borrow_and_update().clone();
        if let Some(error) = self.screen.apply_query_state(&state) {
            self.notifications
                .error(format!("Failed to load {}: {}", self.screen.kind.plural().to_lowercase(), error));
        }
    }

    /// Switch sections. The previous screen's local state is discarded.
    pub fn navigate_to(&mut self, kind: EntityKind) {
        if kind == self.screen.kind {
            return;
        }
        debug!("Navigating to {}", kind.route());

        self.screen = EntityListScreen::new(kind, self.business_id);
        self.current_route = kind.route().to_string();
        self.receiver = self.client.observe(&self.screen.query_key());
        self.pull_query_state(true);
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        if self.help.is_open() {
            if matches!(key.code, KeyCode::Esc | KeyCode::Char('?') | KeyCode::F(1)) {
                self.help.toggle();
            }
            return Ok(());
        }

        if !self.screen.captures_input() && !self.screen.modal.is_open() {
            match key.code {
                KeyCode::Char('?') | KeyCode::F(1) => {
                    self.help.toggle();
                    return Ok(());
                }
                KeyCode::Char('q') => {
                    self.should_quit = true;
                    return Ok(());
                }
                KeyCode::Tab => {
                    let next = self.sidebar.next_kind(self.screen.kind);
                    return self.dispatch(ScreenAction::NavigateTo(next));
                }
                KeyCode::Char(c) if c.is_ascii_digit() => {
                    if let Some(kind) = self.sidebar.kind_for_shortcut(c) {
                        return self.dispatch(ScreenAction::NavigateTo(kind));
                    }
                    return Ok(());
                }
                _ => {}
            }
        }

        let action = self.screen.handle_key(key);
        self.dispatch(action)
    }

    /// Carry out what a screen asked for
    pub fn dispatch(&mut self, action: ScreenAction) -> Result<()> {
        match action {
            ScreenAction::SetStatus(message) => self.notifications.info(message),
            ScreenAction::SetError(message) => self.notifications.error(message),
            ScreenAction::SubmitCreate(draft) => self.submit_create(draft),
            ScreenAction::Refresh => self.refresh(),
            ScreenAction::NavigateTo(kind) => self.navigate_to(kind),
            ScreenAction::None => {}
        }
        Ok(())
    }

    pub fn is_saving(&self) -> bool {
        self.pending_create.is_some()
    }

    /// Start the create in the background. The form shows "Saving…" and
    /// ignores input until [`App::poll_pending_create`] settles it.
    fn submit_create(&mut self, draft: EntityDraft) {
        if self.pending_create.is_some() {
            debug!("Create already in flight, ignoring submit");
            return;
        }

        let kind = self.screen.kind;
        info!("Creating {} via {}", kind.as_str(), draft.create_path());

        let (tx, rx) = oneshot::channel();
        let client = self.client.clone();
        tokio::spawn(async move {
            let _ = tx.send(client.create(&draft).await);
        });

        self.screen.set_saving(true);
        self.pending_create = Some(PendingCreate { kind, result: rx });
    }

    /// One request, one notification. The list refreshes through tag
    /// invalidation inside the query client.
    pub fn poll_pending_create(&mut self) {
        let Some(pending) = self.pending_create.as_mut() else {
            return;
        };
        let result = match pending.result.try_recv() {
            Ok(result) => result,
            Err(oneshot::error::TryRecvError::Empty) => return,
            Err(oneshot::error::TryRecvError::Closed) => {
                Err(ApiError::Aborted("create task dropped".to_string()))
            }
        };
        let kind = pending.kind;
        self.pending_create = None;

        let on_screen = self.screen.kind == kind;
        match result {
            Ok(()) => {
                self.notifications
                    .success(format!("{} added successfully.", kind.singular()));
                if on_screen {
                    self.screen.on_create_succeeded();
                }
            }
            Err(e) => {
                warn!("Create {} failed: {}", kind.as_str(), e);
                self.notifications.error(CREATE_FAILED);
                if on_screen {
                    self.screen.on_create_failed();
                }
            }
        }
    }

    /// Refetch in the background; the new state arrives through the receiver
    fn refresh(&self) {
        let client = self.client.clone();
        let key = self.screen.query_key();
        tokio::spawn(async move {
            if let Err(e) = client.refetch(&key).await {
                debug!("Manual refresh of {:?} failed: {}", key, e);
            }
        });
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(3)])
            .split(size);

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Length(22), Constraint::Min(0)])
            .split(rows[0]);

        self.sidebar.render(f, columns[0], &self.current_route);
        self.screen.render(f, columns[1]);
        self.notifications
            .render(f, rows[1], "bizdash | 1-4: Sections | ?: Help | q: Quit");

        self.help
            .render(f, size, |f, area| f.render_widget(Paragraph::new(HELP_TEXT), area));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::admin_tui::components::NotificationKind;
    use crate::admin_tui::screens::entity_list::{DELETE_NOT_IMPLEMENTED, UPDATE_NOT_IMPLEMENTED};
    use crate::models::{EntityRecord, QueryKey, Supplier};
    use async_trait::async_trait;
    use crossterm::event::KeyEventState;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    #[derive(Default)]
    struct FakeApi {
        fetches: AtomicUsize,
        creates: AtomicUsize,
        fail_create: bool,
        suppliers: Mutex<Vec<EntityRecord>>,
    }

    #[async_trait]
    impl RemoteApi for FakeApi {
        async fn fetch_list(&self, key: &QueryKey) -> Result<Vec<EntityRecord>, ApiError> {
            self.fetches.fetch_add(1, Ordering::SeqCst);
            match key.kind {
                EntityKind::Supplier => Ok(self.suppliers.lock().unwrap().clone()),
                _ => Ok(Vec::new()),
            }
        }

        async fn create(&self, draft: &EntityDraft) -> Result<(), ApiError> {
            self.creates.fetch_add(1, Ordering::SeqCst);
            if self.fail_create {
                return Err(ApiError::Http {
                    status: 422,
                    body: "invalid".to_string(),
                });
            }
            if let EntityDraft::Supplier(new) = draft {
                let mut suppliers = self.suppliers.lock().unwrap();
                let id = suppliers.len() as i64 + 1;
                suppliers.push(EntityRecord::Supplier(Supplier {
                    id,
                    name: new.name.clone(),
                    mobile_no: new.mobile_no.to_string(),
                    business_id: new.business_id,
                }));
            }
            Ok(())
        }
    }

    fn config() -> Config {
        let mut config = Config::default();
        config.session.business_id = Some(7);
        config
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    async fn press(app: &mut App, code: KeyCode) {
        app.handle_key_event(key(code)).unwrap();
    }

    /// Wait for a background create to report back
    async fn finish_create(app: &mut App) {
        for _ in 0..100 {
            app.poll_pending_create();
            if !app.is_saving() {
                return;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        panic!("create never settled");
    }

    async fn type_text(app: &mut App, text: &str) {
        for c in text.chars() {
            press(app, KeyCode::Char(c)).await;
        }
    }

    /// Wait until the mounted query settles and mirror it into the screen
    async fn settle(app: &mut App) {
        for _ in 0..100 {
            let state = app.client.snapshot(&app.screen.query_key());
            if state.map(|s| !s.is_fetching).unwrap_or(false) {
                break;
            }
            tokio::time::sleep(Duration::from_millis(5)).await;
        }
        app.sync_query_state();
    }

    async fn supplier_app(api: Arc<FakeApi>) -> App {
        let mut app = App::new(&config(), api).unwrap();
        press(&mut app, KeyCode::Char('3')).await;
        settle(&mut app).await;
        app
    }

    fn count(app: &App, kind: NotificationKind) -> usize {
        app.notifications.all().filter(|n| n.kind == kind).count()
    }

    #[tokio::test]
    async fn test_requires_business_id() {
        let api = Arc::new(FakeApi::default());
        assert!(App::new(&Config::default(), api).is_err());
    }

    #[tokio::test]
    async fn test_navigation_updates_route_and_screen() {
        let api = Arc::new(FakeApi::default());
        let app = supplier_app(api).await;
        assert_eq!(app.current_kind(), EntityKind::Supplier);
        assert_eq!(app.current_route, "/dashboard/suppliers");
        assert!(app.screen.table.visible_rows().is_empty());
    }

    #[tokio::test]
    async fn test_create_sends_once_toasts_once_and_refetches() {
        let api = Arc::new(FakeApi::default());
        let mut app = supplier_app(Arc::clone(&api)).await;
        let fetches_before = api.fetches.load(Ordering::SeqCst);

        press(&mut app, KeyCode::Char('a')).await;
        type_text(&mut app, "Ali").await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "923411415567").await;
        press(&mut app, KeyCode::Enter).await;
        finish_create(&mut app).await;

        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
        assert_eq!(count(&app, NotificationKind::Success), 1);
        assert_eq!(
            app.notifications.current().map(|n| n.message.as_str()),
            Some("Supplier added successfully.")
        );
        assert!(!app.screen.modal.is_open());
        assert!(app.screen.selected().is_none());

        settle(&mut app).await;
        assert_eq!(api.fetches.load(Ordering::SeqCst), fetches_before + 1);
        let names: Vec<_> = app
            .screen
            .table
            .visible_rows()
            .into_iter()
            .flatten()
            .map(|r| r.name().to_string())
            .collect();
        assert_eq!(names, vec!["Ali"]);
    }

    #[tokio::test]
    async fn test_failed_create_keeps_modal_and_input() {
        let api = Arc::new(FakeApi {
            fail_create: true,
            ..FakeApi::default()
        });
        let mut app = supplier_app(Arc::clone(&api)).await;

        press(&mut app, KeyCode::Char('a')).await;
        type_text(&mut app, "Ali").await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "923411415567").await;
        press(&mut app, KeyCode::Enter).await;
        finish_create(&mut app).await;

        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
        assert_eq!(count(&app, NotificationKind::Error), 1);
        assert_eq!(
            app.notifications.current().map(|n| n.message.as_str()),
            Some(CREATE_FAILED)
        );
        assert!(app.screen.modal.is_open());
        assert!(app.screen.captures_input());
        assert!(!app.screen.is_saving());
    }

    #[tokio::test]
    async fn test_enter_while_saving_does_not_resubmit() {
        let api = Arc::new(FakeApi::default());
        let mut app = supplier_app(Arc::clone(&api)).await;

        press(&mut app, KeyCode::Char('a')).await;
        type_text(&mut app, "Ali").await;
        press(&mut app, KeyCode::Tab).await;
        type_text(&mut app, "923411415567").await;
        press(&mut app, KeyCode::Enter).await;

        // the request has not run yet; the form is locked and still open
        assert!(app.is_saving());
        assert!(app.screen.is_saving());
        assert!(app.screen.modal.is_open());
        press(&mut app, KeyCode::Enter).await;
        press(&mut app, KeyCode::Esc).await;
        assert!(app.screen.modal.is_open());

        finish_create(&mut app).await;
        assert_eq!(api.creates.load(Ordering::SeqCst), 1);
        assert_eq!(count(&app, NotificationKind::Success), 1);
        assert!(!app.screen.modal.is_open());
    }

    #[tokio::test]
    async fn test_edit_and_delete_never_touch_network() {
        let api = Arc::new(FakeApi::default());
        api.suppliers.lock().unwrap().push(EntityRecord::Supplier(Supplier {
            id: 1,
            name: "Sara".to_string(),
            mobile_no: "923000000000".to_string(),
            business_id: 7,
        }));
        let mut app = supplier_app(Arc::clone(&api)).await;
        let fetches = api.fetches.load(Ordering::SeqCst);

        press(&mut app, KeyCode::Char('e')).await;
        press(&mut app, KeyCode::Enter).await;
        assert_eq!(
            app.notifications.current().map(|n| n.message.as_str()),
            Some(UPDATE_NOT_IMPLEMENTED)
        );
        press(&mut app, KeyCode::Esc).await;

        press(&mut app, KeyCode::Char('d')).await;
        press(&mut app, KeyCode::Char('y')).await;
        assert_eq!(
            app.notifications.current().map(|n| n.message.as_str()),
            Some(DELETE_NOT_IMPLEMENTED)
        );

        assert_eq!(api.creates.load(Ordering::SeqCst), 0);
        assert_eq!(api.fetches.load(Ordering::SeqCst), fetches);
        assert!(!app.screen.modal.is_open());
    }

    #[tokio::test]
    async fn test_help_toggle_and_quit() {
        let api = Arc::new(FakeApi::default());
        let mut app = App::new(&config(), api).unwrap();

        press(&mut app, KeyCode::Char('?')).await;
        assert!(app.help.is_open());
        press(&mut app, KeyCode::Char('q')).await;
        assert!(!app.should_quit);
        press(&mut app, KeyCode::Esc).await;
        assert!(!app.help.is_open());

        press(&mut app, KeyCode::Char('q')).await;
        assert!(app.should_quit);
    }
}
