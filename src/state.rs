use crate::panels::{GoalList, Ledger, Notebook, Screen, TodoList};
use crate::timer::CountdownTimer;
use std::sync::Arc;
use tokio::sync::Mutex;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeKind {
    Ok,
    Error,
}

/// One-line status banner shown on the next page render, standing in for
/// the success/error flashes of the interactive shell.
#[derive(Debug, Clone)]
pub struct Notice {
    pub kind: NoticeKind,
    pub text: String,
}

impl Notice {
    pub fn ok(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Ok,
            text: text.into(),
        }
    }

    pub fn error(text: impl Into<String>) -> Self {
        Self {
            kind: NoticeKind::Error,
            text: text.into(),
        }
    }
}

/// Everything one dashboard session owns. Each panel's data is its own
/// store; nothing here outlives the process.
#[derive(Debug)]
pub struct Session {
    pub screen: Screen,
    pub goals: GoalList,
    pub todos: TodoList,
    pub timer: CountdownTimer,
    pub ledger: Ledger,
    pub notebook: Notebook,
    pub notice: Option<Notice>,
}

impl Default for Session {
    fn default() -> Self {
        Self {
            screen: Screen::Lobby,
            goals: GoalList::default(),
            todos: TodoList::default(),
            timer: CountdownTimer::new(),
            ledger: Ledger::default(),
            notebook: Notebook::default(),
            notice: None,
        }
    }
}

#[derive(Clone)]
pub struct AppState {
    pub session: Arc<Mutex<Session>>,
    /// Restores the legacy behavior of wiping the countdown when the user
    /// leaves the timer panel. Off by default so navigation keeps a
    /// running timer alive.
    pub reset_timer_on_nav: bool,
}

impl AppState {
    pub fn new(reset_timer_on_nav: bool) -> Self {
        Self {
            session: Arc::new(Mutex::new(Session::default())),
            reset_timer_on_nav,
        }
    }
}
