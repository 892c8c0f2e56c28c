use std::cell::{Cell, RefCell};
use std::rc::Rc;

use tracing::{debug, warn};

use crate::config::{ConfigError, HistoryConfig};
use crate::history::History;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SessionCommand {
    Push(String),
    Undo,
    Redo,
    Show,
    Status,
    Quit,
    Unknown(String),
}

impl SessionCommand {
    /// Parse one input line, `None` for blank lines
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() {
            return None;
        }

        // everything after the first space is the pushed text, kept verbatim
        let (head, rest) = match trimmed.split_once(' ') {
            Some((head, rest)) => (head, Some(rest)),
            None => (trimmed, None),
        };

        match (head, rest) {
            ("push" | "p", Some(text)) => Some(SessionCommand::Push(text.to_string())),
            ("push" | "p", None) => Some(SessionCommand::Push(String::new())),
            ("undo" | "u", None) => Some(SessionCommand::Undo),
            ("redo" | "r", None) => Some(SessionCommand::Redo),
            ("show" | "s", None) => Some(SessionCommand::Show),
            ("status", None) => Some(SessionCommand::Status),
            ("quit" | "q", None) => Some(SessionCommand::Quit),
            _ => Some(SessionCommand::Unknown(trimmed.to_string())),
        }
    }
}

/// One editing session over a line of text.
///
/// The session never reads the history to refresh its view: the view is
/// only ever written by the history's change handler.
pub struct Session {
    history: History<String>,
    view: Rc<RefCell<String>>,
    renders: Rc<Cell<usize>>,
    should_quit: bool,
}

impl Session {
    pub fn new(config: &HistoryConfig) -> Result<Self, ConfigError> {
        let view = Rc::new(RefCell::new(config.initial.clone()));
        let renders = Rc::new(Cell::new(0));

        let history = {
            let view = Rc::clone(&view);
            let renders = Rc::clone(&renders);
            config.build_history(config.initial.clone(), move |current: &String| {
                *view.borrow_mut() = current.clone();
                renders.set(renders.get() + 1);
            })?
        };

        Ok(Self {
            history,
            view,
            renders,
            should_quit: false,
        })
    }

    /// Parse and run one input line, returning the message to show
    pub fn handle_line(&mut self, line: &str) -> Option<String> {
        SessionCommand::parse(line).map(|cmd| self.execute(cmd))
    }

    pub fn execute(&mut self, cmd: SessionCommand) -> String {
        debug!(?cmd, "session command");
        match cmd {
            SessionCommand::Push(text) => {
                self.history.push(text);
                self.view()
            }
            SessionCommand::Undo => {
                if !self.history.can_undo() {
                    return "nothing to undo".to_string();
                }
                self.history.undo();
                self.view()
            }
            SessionCommand::Redo => {
                if !self.history.can_redo() {
                    return "nothing to redo".to_string();
                }
                self.history.redo();
                self.view()
            }
            SessionCommand::Show => self.view(),
            SessionCommand::Status => format!(
                "undo: {}, redo: {}, limit: {}",
                self.history.undo_depth(),
                self.history.redo_depth(),
                self.history.history_length()
            ),
            SessionCommand::Quit => {
                self.should_quit = true;
                "bye".to_string()
            }
            SessionCommand::Unknown(input) => {
                warn!(input = %input, "unknown command");
                format!("unknown command: {}", input)
            }
        }
    }

    /// The text as last delivered by the change handler
    pub fn view(&self) -> String {
        self.view.borrow().clone()
    }

    /// How many times the change handler has fired
    pub fn renders(&self) -> usize {
        self.renders.get()
    }

    pub fn history(&self) -> &History<String> {
        &self.history
    }

    pub fn should_quit(&self) -> bool {
        self.should_quit
    }
}
