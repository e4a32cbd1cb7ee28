use crate::errors::AppError;
use crate::models::{
    IndexForm, MinutesForm, MoneyForm, NavForm, SessionResponse, TextForm, TimerResponse, TodoForm,
};
use crate::panels::{parse_deadline, Screen, TxnKind};
use crate::state::{AppState, Notice};
use crate::timer::{CountdownTimer, TimerError};
use crate::ui::render_page;
use axum::{
    extract::State,
    response::{Html, Redirect},
    Form, Json,
};
use chrono::{DateTime, Local, Utc};
use tracing::debug;

pub async fn index(State(state): State<AppState>) -> Html<String> {
    let mut session = state.session.lock().await;
    // The render itself is one poll; crossing the end instant here is
    // what flips the timer to expired.
    let outcome = session.timer.poll(Utc::now());
    Html(render_page(&session, &outcome, Local::now().naive_local()))
}

pub async fn navigate(
    State(state): State<AppState>,
    Form(form): Form<NavForm>,
) -> Result<Redirect, AppError> {
    let Some(screen) = Screen::parse(&form.screen) else {
        return Err(AppError::bad_request(format!(
            "unknown screen '{}'",
            form.screen
        )));
    };

    let mut session = state.session.lock().await;
    if state.reset_timer_on_nav && session.screen == Screen::Timer && screen != Screen::Timer {
        session.timer.reset();
    }
    session.screen = screen;
    session.notice = None;
    Ok(Redirect::to("/"))
}

pub async fn goals_add(
    State(state): State<AppState>,
    Form(form): Form<TextForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    session.notice = match session.goals.add(&form.text) {
        Ok(()) => None,
        Err(err) => Some(Notice::error(err.to_string())),
    };
    Redirect::to("/")
}

pub async fn goals_toggle(
    State(state): State<AppState>,
    Form(form): Form<IndexForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    if !session.goals.toggle(form.index) {
        debug!(index = form.index, "stale goal toggle ignored");
    }
    Redirect::to("/")
}

pub async fn goals_delete(
    State(state): State<AppState>,
    Form(form): Form<IndexForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    if !session.goals.remove(form.index) {
        debug!(index = form.index, "stale goal delete ignored");
    }
    Redirect::to("/")
}

pub async fn todos_add(
    State(state): State<AppState>,
    Form(form): Form<TodoForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    session.notice = match parse_deadline(&form.deadline)
        .and_then(|deadline| session.todos.add(&form.text, deadline))
    {
        Ok(()) => None,
        Err(err) => Some(Notice::error(err.to_string())),
    };
    Redirect::to("/")
}

pub async fn todos_toggle(
    State(state): State<AppState>,
    Form(form): Form<IndexForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    if !session.todos.toggle(form.index) {
        debug!(index = form.index, "stale todo toggle ignored");
    }
    Redirect::to("/")
}

pub async fn todos_delete(
    State(state): State<AppState>,
    Form(form): Form<IndexForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    if !session.todos.remove(form.index) {
        debug!(index = form.index, "stale todo delete ignored");
    }
    Redirect::to("/")
}

pub async fn timer_configure(
    State(state): State<AppState>,
    Form(form): Form<MinutesForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    session.notice = match session.timer.configure(form.minutes) {
        Ok(()) => Some(Notice::ok(format!("Timer set to {} min", form.minutes))),
        Err(err) => Some(Notice::error(err.to_string())),
    };
    Redirect::to("/")
}

pub async fn timer_start(State(state): State<AppState>) -> Redirect {
    apply_transition(&state, "start", |timer, now| timer.start(now)).await
}

pub async fn timer_stop(State(state): State<AppState>) -> Redirect {
    apply_transition(&state, "stop", |timer, now| timer.stop(now)).await
}

pub async fn timer_resume(State(state): State<AppState>) -> Redirect {
    apply_transition(&state, "resume", |timer, now| timer.resume(now)).await
}

pub async fn timer_reset(State(state): State<AppState>) -> Redirect {
    let mut session = state.session.lock().await;
    session.timer.reset();
    session.notice = None;
    Redirect::to("/")
}

/// Invalid transitions are recoverable by design: log and leave the
/// timer exactly as it was.
async fn apply_transition<F>(state: &AppState, op: &'static str, apply: F) -> Redirect
where
    F: FnOnce(&mut CountdownTimer, DateTime<Utc>) -> Result<(), TimerError>,
{
    let mut session = state.session.lock().await;
    if let Err(err) = apply(&mut session.timer, Utc::now()) {
        debug!(op, %err, "timer transition ignored");
    }
    Redirect::to("/")
}

pub async fn money_add(
    State(state): State<AppState>,
    Form(form): Form<MoneyForm>,
) -> Result<Redirect, AppError> {
    let Some(kind) = TxnKind::parse(&form.kind) else {
        return Err(AppError::bad_request(format!(
            "unknown transaction kind '{}'",
            form.kind
        )));
    };

    let timestamp = Local::now().format("%Y-%m-%d %H:%M").to_string();
    let mut session = state.session.lock().await;
    session.notice = match session.ledger.record(&form.item, form.amount, kind, timestamp) {
        Ok(()) => Some(Notice::ok("Recorded!")),
        Err(err) => Some(Notice::error(err.to_string())),
    };
    Ok(Redirect::to("/"))
}

pub async fn notes_save(
    State(state): State<AppState>,
    Form(form): Form<TextForm>,
) -> Redirect {
    let mut session = state.session.lock().await;
    session.notice = if session.notebook.replace(form.text) {
        Some(Notice::ok("Saved"))
    } else {
        None
    };
    Redirect::to("/")
}

pub async fn timer_status(State(state): State<AppState>) -> Json<TimerResponse> {
    let mut session = state.session.lock().await;
    let outcome = session.timer.poll(Utc::now());
    Json(TimerResponse {
        phase: outcome.phase,
        remaining: outcome.remaining_hms(),
        just_expired: outcome.just_expired,
        alert_flash: outcome.alert_flash,
        configured_minutes: session.timer.configured_minutes(),
    })
}

pub async fn session_snapshot(State(state): State<AppState>) -> Json<SessionResponse> {
    let session = state.session.lock().await;
    Json(SessionResponse {
        screen: session.screen.as_str().to_string(),
        goal_count: session.goals.len(),
        todo_count: session.todos.len(),
        transaction_count: session.ledger.len(),
        balance: session.ledger.balance(),
        note_len: session.notebook.text().len(),
    })
}
