use chrono::{NaiveDateTime, NaiveTime};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Lobby,
    Goals,
    Todos,
    Timer,
    Money,
    Notes,
}

impl Screen {
    pub fn as_str(&self) -> &'static str {
        match self {
            Screen::Lobby => "lobby",
            Screen::Goals => "goals",
            Screen::Todos => "todos",
            Screen::Timer => "timer",
            Screen::Money => "money",
            Screen::Notes => "notes",
        }
    }

    pub fn parse(value: &str) -> Option<Screen> {
        match value {
            "lobby" => Some(Screen::Lobby),
            "goals" => Some(Screen::Goals),
            "todos" => Some(Screen::Todos),
            "timer" => Some(Screen::Timer),
            "money" => Some(Screen::Money),
            "notes" => Some(Screen::Notes),
            _ => None,
        }
    }
}

/// Input rejected at the boundary; no state change happens.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputError {
    EmptyText,
    NonPositiveAmount,
    BadTime(String),
}

impl std::fmt::Display for InputError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            InputError::EmptyText => write!(f, "text must not be empty"),
            InputError::NonPositiveAmount => write!(f, "amount must be positive"),
            InputError::BadTime(raw) => write!(f, "not a valid time of day: {raw}"),
        }
    }
}

impl std::error::Error for InputError {}

#[derive(Debug, Clone)]
pub struct GoalItem {
    pub text: String,
    pub done: bool,
}

#[derive(Debug, Default)]
pub struct GoalList {
    items: Vec<GoalItem>,
}

impl GoalList {
    pub fn add(&mut self, text: &str) -> Result<(), InputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InputError::EmptyText);
        }
        self.items.push(GoalItem {
            text: text.to_string(),
            done: false,
        });
        Ok(())
    }

    /// Returns false when the index points past the list; the caller
    /// treats that as a stale form and ignores it.
    pub fn toggle(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.done = !item.done;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.items.remove(index);
            true
        } else {
            false
        }
    }

    pub fn items(&self) -> &[GoalItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone)]
pub struct TodoItem {
    pub text: String,
    pub done: bool,
    /// Time of day the task is due, applied to the current date.
    pub deadline: NaiveTime,
}

/// How a pending to-do relates to its deadline at a given instant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeadlineStatus {
    Overdue,
    Remaining { hours: i64, minutes: i64 },
}

/// Whole-duration arithmetic: hours and minutes come from the full span,
/// not from a seconds-within-day remainder.
pub fn deadline_status(deadline: NaiveTime, now: NaiveDateTime) -> DeadlineStatus {
    let due = now.date().and_time(deadline);
    if now > due {
        DeadlineStatus::Overdue
    } else {
        let secs = (due - now).num_seconds();
        DeadlineStatus::Remaining {
            hours: secs / 3600,
            minutes: (secs / 60) % 60,
        }
    }
}

pub fn parse_deadline(raw: &str) -> Result<NaiveTime, InputError> {
    // Browsers submit <input type="time"> as HH:MM, or HH:MM:SS when a
    // step attribute asks for seconds.
    NaiveTime::parse_from_str(raw, "%H:%M")
        .or_else(|_| NaiveTime::parse_from_str(raw, "%H:%M:%S"))
        .map_err(|_| InputError::BadTime(raw.to_string()))
}

#[derive(Debug, Default)]
pub struct TodoList {
    items: Vec<TodoItem>,
}

impl TodoList {
    pub fn add(&mut self, text: &str, deadline: NaiveTime) -> Result<(), InputError> {
        let text = text.trim();
        if text.is_empty() {
            return Err(InputError::EmptyText);
        }
        self.items.push(TodoItem {
            text: text.to_string(),
            done: false,
            deadline,
        });
        Ok(())
    }

    pub fn toggle(&mut self, index: usize) -> bool {
        match self.items.get_mut(index) {
            Some(item) => {
                item.done = !item.done;
                true
            }
            None => false,
        }
    }

    pub fn remove(&mut self, index: usize) -> bool {
        if index < self.items.len() {
            self.items.remove(index);
            true
        } else {
            false
        }
    }

    pub fn items(&self) -> &[TodoItem] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TxnKind {
    Expense,
    Income,
}

impl TxnKind {
    pub fn parse(value: &str) -> Option<TxnKind> {
        match value {
            "expense" => Some(TxnKind::Expense),
            "income" => Some(TxnKind::Income),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Transaction {
    pub item: String,
    pub amount: i64,
    pub kind: TxnKind,
    /// Local wall-clock time, pre-formatted as `%Y-%m-%d %H:%M`.
    pub timestamp: String,
}

#[derive(Debug, Default)]
pub struct Ledger {
    balance: i64,
    transactions: Vec<Transaction>,
}

impl Ledger {
    pub fn record(
        &mut self,
        item: &str,
        amount: i64,
        kind: TxnKind,
        timestamp: String,
    ) -> Result<(), InputError> {
        let item = item.trim();
        if item.is_empty() {
            return Err(InputError::EmptyText);
        }
        if amount <= 0 {
            return Err(InputError::NonPositiveAmount);
        }
        self.balance += match kind {
            TxnKind::Income => amount,
            TxnKind::Expense => -amount,
        };
        self.transactions.push(Transaction {
            item: item.to_string(),
            amount,
            kind,
            timestamp,
        });
        Ok(())
    }

    pub fn balance(&self) -> i64 {
        self.balance
    }

    pub fn recent_first(&self) -> impl Iterator<Item = &Transaction> {
        self.transactions.iter().rev()
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

/// Single free-text blob, replaced wholesale on every edit.
#[derive(Debug, Default)]
pub struct Notebook {
    text: String,
}

impl Notebook {
    /// Returns true when the text actually changed, so the caller can
    /// show a "saved" notice only for real edits.
    pub fn replace(&mut self, text: String) -> bool {
        if text == self.text {
            false
        } else {
            self.text = text;
            true
        }
    }

    pub fn text(&self) -> &str {
        &self.text
    }
}
