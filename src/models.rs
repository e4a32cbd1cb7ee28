use crate::timer::Phase;
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct NavForm {
    pub screen: String,
}

#[derive(Debug, Deserialize)]
pub struct TextForm {
    pub text: String,
}

#[derive(Debug, Deserialize)]
pub struct IndexForm {
    pub index: usize,
}

#[derive(Debug, Deserialize)]
pub struct TodoForm {
    pub text: String,
    pub deadline: String,
}

#[derive(Debug, Deserialize)]
pub struct MoneyForm {
    pub item: String,
    pub amount: i64,
    pub kind: String,
}

#[derive(Debug, Deserialize)]
pub struct MinutesForm {
    pub minutes: i64,
}

/// Payload of `GET /api/timer`, consumed by the once-per-second page
/// refresh while the countdown runs.
#[derive(Debug, Serialize)]
pub struct TimerResponse {
    pub phase: Phase,
    pub remaining: String,
    pub just_expired: bool,
    pub alert_flash: bool,
    pub configured_minutes: i64,
}

/// Session snapshot for `GET /api/session`.
#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub screen: String,
    pub goal_count: usize,
    pub todo_count: usize,
    pub transaction_count: usize,
    pub balance: i64,
    pub note_len: usize,
}
