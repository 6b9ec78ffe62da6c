//! Main TUI application state machine.
//!
//! Handles:
//! - Screen navigation (Login ⇄ Signup, Login → Dashboard → Login)
//! - Input event handling
//! - Service integration
//!
//! Each screen owns its state. The dashboard is built from the [`Session`]
//! returned by a successful login and is dropped on logout.

use std::io;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{backend::CrosstermBackend, Terminal};

use crate::adapters::sqlite::SqliteStorage;
use crate::application::{AccountService, AddMedicine, LogIn, ScheduleService, SignUp};
use crate::config::AppConfig;
use crate::domain::Session;
use crate::MedischedulerError;

use super::ui::{
    dashboard::{self, render_dashboard, DashboardState, Focus},
    login::{self, render_login, LoginState},
    signup::{self, render_signup, SignupState},
    Notice,
};

/// Current screen and its state.
#[derive(Debug)]
pub enum View {
    Login(LoginState),
    Signup(SignupState),
    Dashboard(DashboardState),
}

impl View {
    #[must_use]
    pub fn name(&self) -> &'static str {
        match self {
            Self::Login(_) => "login",
            Self::Signup(_) => "signup",
            Self::Dashboard(_) => "dashboard",
        }
    }
}

/// What a key press does to the application.
enum Transition {
    Stay,
    To(View),
    Quit,
}

/// Main application state
pub struct App {
    view: View,
    should_quit: bool,
    accounts: AccountService<SqliteStorage>,
    schedule: ScheduleService<SqliteStorage>,
}

impl App {
    /// Open the configured database and build the application.
    ///
    /// # Errors
    /// Returns error if the database cannot be opened or initialized.
    pub fn new(config: &AppConfig) -> Result<Self> {
        let storage = SqliteStorage::new(&config.db_path)?;
        tracing::info!("Using database {}", config.db_path.display());
        Ok(Self::with_storage(Arc::new(storage)))
    }

    /// Create application with injected storage (Composition Root pattern).
    #[must_use]
    pub fn with_storage(storage: Arc<SqliteStorage>) -> Self {
        Self {
            view: View::Login(LoginState::default()),
            should_quit: false,
            accounts: AccountService::new(storage.clone()),
            schedule: ScheduleService::new(storage),
        }
    }

    #[must_use]
    pub fn view(&self) -> &View {
        &self.view
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.should_quit
    }

    /// Run the main application loop.
    ///
    /// # Errors
    /// Returns error if terminal operations fail.
    pub fn run(&mut self) -> Result<()> {
        enable_raw_mode()?;
        let mut stdout = io::stdout();
        execute!(stdout, EnterAlternateScreen)?;
        let backend = CrosstermBackend::new(stdout);
        let mut terminal = Terminal::new(backend)?;

        let result = self.main_loop(&mut terminal);

        // Restore the terminal even when the loop failed.
        disable_raw_mode()?;
        execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
        terminal.show_cursor()?;

        result
    }

    fn main_loop(&mut self, terminal: &mut Terminal<CrosstermBackend<io::Stdout>>) -> Result<()> {
        while !self.should_quit {
            terminal.draw(|f| {
                let area = f.area();
                match &mut self.view {
                    View::Login(state) => render_login(f, area, state),
                    View::Signup(state) => render_signup(f, area, state),
                    View::Dashboard(state) => render_dashboard(f, area, state),
                }
            })?;

            // Short poll so the dashboard clock stays current.
            if event::poll(Duration::from_millis(250))? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key(key.code, key.modifiers);
                    }
                }
            }
        }

        Ok(())
    }

    /// Apply one key press.
    pub fn handle_key(&mut self, key: KeyCode, modifiers: KeyModifiers) {
        // Global quit handling
        if key == KeyCode::Char('q') && modifiers.contains(KeyModifiers::CONTROL) {
            self.should_quit = true;
            return;
        }

        let transition = match &mut self.view {
            View::Login(state) => Self::handle_login_key(&self.accounts, &self.schedule, state, key),
            View::Signup(state) => Self::handle_signup_key(&self.accounts, state, key),
            View::Dashboard(state) => Self::handle_dashboard_key(&self.schedule, state, key),
        };

        match transition {
            Transition::Stay => {}
            Transition::Quit => self.should_quit = true,
            Transition::To(view) => {
                tracing::debug!("Screen {} -> {}", self.view.name(), view.name());
                self.view = view;
            }
        }
    }

    fn handle_login_key(
        accounts: &AccountService<SqliteStorage>,
        schedule: &ScheduleService<SqliteStorage>,
        state: &mut LoginState,
        key: KeyCode,
    ) -> Transition {
        match key {
            KeyCode::Esc => return Transition::Quit,
            KeyCode::F(2) => return Transition::To(View::Signup(SignupState::default())),
            KeyCode::Down | KeyCode::Tab => state.form.next_field(),
            KeyCode::Up | KeyCode::BackTab => state.form.prev_field(),
            KeyCode::Backspace => state.form.delete_char(),
            KeyCode::Delete => state.form.clear_field(),
            KeyCode::Char(c) => state.form.input_char(c),
            KeyCode::Enter => {
                let outcome = accounts.log_in(
                    state.form.value(login::USERNAME),
                    state.form.value(login::PASSWORD),
                );
                match outcome {
                    Ok(logged_in) => {
                        let message = logged_in.message();
                        match logged_in {
                            LogIn::Authenticated(session) => {
                                return Transition::To(View::Dashboard(Self::open_dashboard(
                                    schedule, session, message,
                                )));
                            }
                            _ => state.form.notice = Some(Notice::error(message)),
                        }
                    }
                    Err(e) => state.form.notice = Some(storage_failure(&e)),
                }
            }
            _ => {}
        }
        Transition::Stay
    }

    fn handle_signup_key(
        accounts: &AccountService<SqliteStorage>,
        state: &mut SignupState,
        key: KeyCode,
    ) -> Transition {
        match key {
            KeyCode::Esc => return Transition::To(View::Login(LoginState::default())),
            KeyCode::Down | KeyCode::Tab => state.form.next_field(),
            KeyCode::Up | KeyCode::BackTab => state.form.prev_field(),
            KeyCode::Backspace => state.form.delete_char(),
            KeyCode::Delete => state.form.clear_field(),
            KeyCode::Char(c) => state.form.input_char(c),
            KeyCode::Enter => {
                let outcome = accounts.sign_up(
                    state.form.value(signup::USERNAME),
                    state.form.value(signup::EMAIL),
                    state.form.value(signup::PASSWORD),
                );
                match outcome {
                    Ok(SignUp::Created) => {
                        let login = LoginState::with_notice(Notice::success(SignUp::Created.message()))
                            .with_username(state.form.value(signup::USERNAME).trim());
                        return Transition::To(View::Login(login));
                    }
                    Ok(rejected) => state.form.notice = Some(Notice::error(rejected.message())),
                    Err(e) => state.form.notice = Some(storage_failure(&e)),
                }
            }
            _ => {}
        }
        Transition::Stay
    }

    fn handle_dashboard_key(
        schedule: &ScheduleService<SqliteStorage>,
        state: &mut DashboardState,
        key: KeyCode,
    ) -> Transition {
        match (key, state.focus) {
            (KeyCode::Esc, _) => {
                tracing::info!(user_id = state.session.user_id.0, "User logged out");
                return Transition::To(View::Login(LoginState::default()));
            }
            (KeyCode::Tab, _) => state.focus_next(),
            (KeyCode::BackTab, _) => state.focus_prev(),
            (KeyCode::Down, _) => state.select_next(),
            (KeyCode::Up, _) => state.select_prev(),
            (KeyCode::F(5), _) => Self::refresh(schedule, state),
            (KeyCode::Delete, Focus::Table) | (KeyCode::Char('d'), Focus::Table) => {
                Self::delete_selected(schedule, state);
            }
            (KeyCode::Delete, Focus::Form) => state.form.clear_field(),
            (KeyCode::Backspace, Focus::Form) => state.form.delete_char(),
            (KeyCode::Char(c), Focus::Form) => state.form.input_char(c),
            (KeyCode::Enter, Focus::Form) => Self::add_medicine(schedule, state),
            _ => {}
        }
        Transition::Stay
    }

    /// Build the dashboard for a fresh session, greeting with `welcome` unless
    /// loading the list already left an error notice.
    fn open_dashboard(
        schedule: &ScheduleService<SqliteStorage>,
        session: Session,
        welcome: &'static str,
    ) -> DashboardState {
        let mut state = DashboardState::new(session);
        Self::refresh(schedule, &mut state);
        if state.form.notice.is_none() {
            state.form.notice = Some(Notice::success(welcome));
        }
        state
    }

    /// Reload the table from storage.
    fn refresh(schedule: &ScheduleService<SqliteStorage>, state: &mut DashboardState) {
        match schedule.list(&state.session) {
            Ok(medicines) => state.set_medicines(medicines),
            Err(e) => state.form.notice = Some(storage_failure(&e)),
        }
    }

    fn add_medicine(schedule: &ScheduleService<SqliteStorage>, state: &mut DashboardState) {
        let outcome = schedule.add(
            &state.session,
            state.form.value(dashboard::NAME),
            state.form.value(dashboard::DOSAGE),
            state.form.value(dashboard::TIME),
        );

        match outcome {
            Ok(added @ AddMedicine::Added(_)) => {
                state.form.clear();
                Self::refresh(schedule, state);
                state.form.notice = Some(Notice::success(added.message()));
            }
            Ok(rejected) => state.form.notice = Some(Notice::error(rejected.message())),
            Err(e) => state.form.notice = Some(storage_failure(&e)),
        }
    }

    fn delete_selected(schedule: &ScheduleService<SqliteStorage>, state: &mut DashboardState) {
        let selection = state.selected_medicine().map(|m| m.id);

        match schedule.delete(selection) {
            Ok(outcome) if selection.is_some() => {
                Self::refresh(schedule, state);
                state.form.notice = Some(Notice::success(outcome.message()));
            }
            Ok(outcome) => state.form.notice = Some(Notice::error(outcome.message())),
            Err(e) => state.form.notice = Some(storage_failure(&e)),
        }
    }
}

/// Log a storage failure and turn it into a footer notice.
fn storage_failure(error: &MedischedulerError) -> Notice {
    tracing::error!("Storage operation failed: {}", error);
    Notice::error(format!("Something went wrong: {error}"))
}
