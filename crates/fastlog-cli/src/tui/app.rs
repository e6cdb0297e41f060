use fastlog_core::{decorate_log, recent, DecoratedEvent, Progress, Timestamp, ENTRIES_TO_SHOW};
use fastlog_store::{LogOutcome, LogStorage, Session};

/// Application state for the watch screen.
pub struct App<S: LogStorage> {
    pub session: Session<S>,
    pub now: Timestamp,
    pub should_quit: bool,
    /// A log request was declined pending an explicit `y`.
    pub confirming: bool,

    // Data
    pub history: Vec<DecoratedEvent>,
    pub message: Option<String>,
    pub error: Option<String>,
}

impl<S: LogStorage> App<S> {
    pub fn new(session: Session<S>, now: Timestamp) -> Self {
        let mut app = Self {
            session,
            now,
            should_quit: false,
            confirming: false,
            history: Vec::new(),
            message: None,
            error: None,
        };
        app.reload();
        app
    }

    /// Progress from the cached snapshot; cheap enough for every tick.
    pub fn progress(&self) -> Option<Progress> {
        self.session.tick(self.now)
    }

    pub fn on_tick(&mut self, now: Timestamp) {
        self.now = now;
    }

    /// Re-read storage and rebuild history.
    /// Errors are stored in `self.error` instead of propagating.
    pub fn reload(&mut self) {
        match self.session.refresh(self.now) {
            Ok(log) => {
                self.rebuild_history(&log);
                self.error = None;
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    fn rebuild_history(&mut self, log: &[fastlog_core::Event]) {
        let decorated = decorate_log(log, self.session.config());
        self.history = recent(&decorated, ENTRIES_TO_SHOW);
    }

    fn log_now(&mut self, confirmed: bool) {
        self.confirming = false;
        match self.session.log_event(self.now, None, self.now, |_| confirmed) {
            Ok(LogOutcome::Logged(event)) => {
                self.message = Some(format!("Started {}", event.start));
                self.error = None;
                self.reload();
            }
            Ok(LogOutcome::Declined) => {
                self.confirming = true;
            }
            Ok(LogOutcome::Changed) => {
                self.message = Some("Log changed elsewhere, nothing logged".to_string());
                self.reload();
            }
            Err(e) => self.error = Some(e.to_string()),
        }
    }

    /// Handle a key press.
    pub fn handle_key(&mut self, key: crossterm::event::KeyEvent) {
        use crossterm::event::KeyCode;

        if self.confirming {
            match key.code {
                KeyCode::Char('y') | KeyCode::Char('Y') => self.log_now(true),
                _ => {
                    self.confirming = false;
                    self.message = Some("Cancelled".to_string());
                }
            }
            return;
        }

        match key.code {
            KeyCode::Char('q') | KeyCode::Esc => self.should_quit = true,
            KeyCode::Char('l') | KeyCode::Enter => self.log_now(false),
            KeyCode::Char('r') => {
                self.message = None;
                self.reload();
            }
            _ => {}
        }
    }
}
