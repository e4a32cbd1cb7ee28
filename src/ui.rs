use crate::panels::{deadline_status, DeadlineStatus, Ledger, Screen, TxnKind};
use crate::state::{NoticeKind, Session};
use crate::timer::{CountdownTimer, Phase, PollOutcome, MAX_MINUTES, MIN_MINUTES};
use chrono::NaiveDateTime;

pub fn render_page(session: &Session, timer: &PollOutcome, now: NaiveDateTime) -> String {
    let (heading, body) = match session.screen {
        Screen::Lobby => ("Life Control Panel".to_string(), lobby_body()),
        Screen::Goals => ("🎯 Goals".to_string(), goals_body(session)),
        Screen::Todos => ("📋 To-dos".to_string(), todos_body(session, now)),
        Screen::Timer => ("⏱ Timer".to_string(), timer_body(&session.timer, timer)),
        Screen::Money => ("💸 Money".to_string(), money_body(&session.ledger)),
        Screen::Notes => ("📝 Notes".to_string(), notes_body(session)),
    };

    let notice = match &session.notice {
        Some(notice) => {
            let kind = match notice.kind {
                NoticeKind::Ok => "ok",
                NoticeKind::Error => "error",
            };
            format!(
                r#"<div class="status" data-type="{kind}">{}</div>"#,
                escape_html(&notice.text)
            )
        }
        None => String::new(),
    };

    let script = if session.screen == Screen::Timer {
        TIMER_SCRIPT
    } else {
        ""
    };

    PAGE_HTML
        .replace("{{HEADING}}", &heading)
        .replace("{{NOTICE}}", &notice)
        .replace("{{BODY}}", &body)
        .replace("{{SCRIPT}}", script)
}

fn lobby_body() -> String {
    let buttons = [
        (Screen::Goals, "🎯 Goals"),
        (Screen::Todos, "📋 To-dos"),
        (Screen::Timer, "⏱ Timer"),
        (Screen::Money, "💸 Money"),
        (Screen::Notes, "📝 Notes"),
    ]
    .iter()
    .map(|(screen, label)| nav_button(*screen, label))
    .collect::<String>();

    format!(
        r#"<p class="motto">Effort will not betray you.</p>
<section class="lobby">{buttons}</section>"#
    )
}

fn nav_button(screen: Screen, label: &str) -> String {
    format!(
        r#"<form method="post" action="/nav"><input type="hidden" name="screen" value="{}" /><button type="submit">{label}</button></form>"#,
        screen.as_str()
    )
}

fn back_to_lobby() -> String {
    format!(r#"<footer>{}</footer>"#, nav_button(Screen::Lobby, "⬅ Lobby"))
}

fn goals_body(session: &Session) -> String {
    let mut rows = String::new();
    for (index, goal) in session.goals.items().iter().enumerate() {
        let class = if goal.done { "item done" } else { "item" };
        let mark = if goal.done { "✔" } else { "○" };
        rows.push_str(&format!(
            r#"<li class="{class}">
  <form method="post" action="/goals/toggle"><input type="hidden" name="index" value="{index}" /><button class="mark" type="submit">{mark}</button></form>
  <span class="text">{}</span>
  <form method="post" action="/goals/delete"><input type="hidden" name="index" value="{index}" /><button class="delete" type="submit">Delete</button></form>
</li>
"#,
            escape_html(&goal.text)
        ));
    }
    let list = if rows.is_empty() {
        r#"<p class="hint">No goals yet.</p>"#.to_string()
    } else {
        format!("<ul class=\"items\">\n{rows}</ul>")
    };

    format!(
        r#"<form class="row" method="post" action="/goals/add">
  <input type="text" name="text" placeholder="New goal" />
  <button type="submit">Add</button>
</form>
{list}
{footer}"#,
        footer = back_to_lobby()
    )
}

fn todos_body(session: &Session, now: NaiveDateTime) -> String {
    let mut rows = String::new();
    for (index, todo) in session.todos.items().iter().enumerate() {
        let class = if todo.done { "item done" } else { "item" };
        let mark = if todo.done { "✔" } else { "○" };
        let due = if todo.done {
            String::new()
        } else {
            match deadline_status(todo.deadline, now) {
                DeadlineStatus::Overdue => {
                    r#"<span class="due overdue">⛔ Past due!</span>"#.to_string()
                }
                DeadlineStatus::Remaining { hours, minutes } => {
                    format!(r#"<span class="due">{hours}h {minutes}m left</span>"#)
                }
            }
        };
        rows.push_str(&format!(
            r#"<li class="{class}">
  <form method="post" action="/todos/toggle"><input type="hidden" name="index" value="{index}" /><button class="mark" type="submit">{mark}</button></form>
  <span class="text">{text} <small>due {deadline}</small></span>
  {due}
  <form method="post" action="/todos/delete"><input type="hidden" name="index" value="{index}" /><button class="delete" type="submit">Delete</button></form>
</li>
"#,
            text = escape_html(&todo.text),
            deadline = todo.deadline.format("%H:%M"),
        ));
    }
    let list = if rows.is_empty() {
        r#"<p class="hint">Nothing to do. Suspicious.</p>"#.to_string()
    } else {
        format!("<ul class=\"items\">\n{rows}</ul>")
    };

    format!(
        r#"<form class="row" method="post" action="/todos/add">
  <input type="text" name="text" placeholder="New task" />
  <input type="time" name="deadline" required />
  <button type="submit">Add</button>
</form>
{list}
{footer}"#,
        footer = back_to_lobby()
    )
}

fn timer_body(timer: &CountdownTimer, outcome: &PollOutcome) -> String {
    let readout_class = if outcome.alert_flash {
        "readout flash"
    } else {
        "readout"
    };
    let banner = if outcome.phase == Phase::Expired {
        r#"<div class="status" data-type="error">⏰ Time is up!</div>"#
    } else {
        ""
    };
    let controls = match outcome.phase {
        Phase::Idle => action_button("/timer/start", "Start"),
        Phase::Running => format!(
            "{}{}",
            action_button("/timer/stop", "Pause"),
            action_button("/timer/reset", "Reset")
        ),
        Phase::Paused => format!(
            "{}{}",
            action_button("/timer/resume", "Resume"),
            action_button("/timer/reset", "Reset")
        ),
        Phase::Expired => format!(
            "{}{}",
            action_button("/timer/start", "Start again"),
            action_button("/timer/reset", "Reset")
        ),
    };

    format!(
        r#"<section id="timer-panel" data-phase="{phase}" data-just-expired="{just_expired}">
{banner}
<div id="timer-readout" class="{readout_class}">{remaining}</div>
<p class="hint">phase: {phase}</p>
<div class="controls">{controls}</div>
<form class="row" method="post" action="/timer/configure">
  <label for="minutes">Minutes</label>
  <input id="minutes" type="number" name="minutes" min="{min}" max="{max}" value="{configured}" />
  <button type="submit">Set</button>
</form>
</section>
{footer}"#,
        phase = outcome.phase.as_str(),
        just_expired = outcome.just_expired,
        remaining = outcome.remaining_hms(),
        configured = timer.configured_minutes(),
        min = MIN_MINUTES,
        max = MAX_MINUTES,
        footer = back_to_lobby()
    )
}

fn action_button(action: &str, label: &str) -> String {
    format!(r#"<form method="post" action="{action}"><button type="submit">{label}</button></form>"#)
}

fn money_body(ledger: &Ledger) -> String {
    let mut rows = String::new();
    for txn in ledger.recent_first() {
        let sign = match txn.kind {
            TxnKind::Expense => "-",
            TxnKind::Income => "+",
        };
        rows.push_str(&format!(
            r#"<li class="item"><small>{timestamp}</small> <span class="text">{item}</span> <span class="amount {kind}">{sign}{amount}</span></li>
"#,
            timestamp = txn.timestamp,
            item = escape_html(&txn.item),
            kind = match txn.kind {
                TxnKind::Expense => "expense",
                TxnKind::Income => "income",
            },
            amount = group_thousands(txn.amount),
        ));
    }
    let list = if rows.is_empty() {
        r#"<p class="hint">No transactions yet.</p>"#.to_string()
    } else {
        format!("<ul class=\"items\">\n{rows}</ul>")
    };

    format!(
        r#"<div class="stat">
  <span class="label">Balance</span>
  <span class="value">{balance}</span>
</div>
<form class="row" method="post" action="/money/add">
  <input type="text" name="item" placeholder="What was it" />
  <input type="number" name="amount" placeholder="Amount" />
  <label><input type="radio" name="kind" value="expense" checked /> expense</label>
  <label><input type="radio" name="kind" value="income" /> income</label>
  <button type="submit">Record</button>
</form>
<h2>History</h2>
{list}
{footer}"#,
        balance = group_thousands(ledger.balance()),
        footer = back_to_lobby()
    )
}

fn notes_body(session: &Session) -> String {
    format!(
        r#"<form method="post" action="/notes/save">
  <textarea name="text" rows="12" placeholder="Write anything">{}</textarea>
  <button type="submit">Save</button>
</form>
{footer}"#,
        escape_html(session.notebook.text()),
        footer = back_to_lobby()
    )
}

fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for ch in input.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

fn group_thousands(value: i64) -> String {
    let digits = value.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    if value < 0 {
        format!("-{out}")
    } else {
        out
    }
}

const PAGE_HTML: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="UTF-8" />
  <meta name="viewport" content="width=device-width, initial-scale=1.0" />
  <title>Life Control Panel</title>
  <style>
    :root {
      --bg-1: #eef2f7;
      --bg-2: #cdd9ea;
      --ink: #22303c;
      --accent: #3f7cac;
      --accent-2: #d1495b;
      --card: rgba(255, 255, 255, 0.92);
      --shadow: 0 18px 48px rgba(34, 48, 60, 0.16);
    }

    * {
      box-sizing: border-box;
    }

    body {
      margin: 0;
      min-height: 100vh;
      background: radial-gradient(circle at top, var(--bg-2), transparent 55%),
        linear-gradient(150deg, var(--bg-1), #e3ecf5 60%, #f2f6fa 100%);
      color: var(--ink);
      font-family: "Trebuchet MS", "Segoe UI", sans-serif;
      display: grid;
      place-items: start center;
      padding: 36px 18px 48px;
    }

    .app {
      width: min(720px, 100%);
      background: var(--card);
      border-radius: 22px;
      box-shadow: var(--shadow);
      padding: 32px;
      display: grid;
      gap: 20px;
    }

    h1 {
      margin: 0;
      font-size: clamp(1.6rem, 4vw, 2.2rem);
    }

    h2 {
      margin: 0;
      font-size: 1.1rem;
    }

    .motto {
      margin: 0;
      color: #5b6b79;
    }

    .lobby {
      display: grid;
      grid-template-columns: repeat(auto-fit, minmax(120px, 1fr));
      gap: 12px;
    }

    button {
      appearance: none;
      border: none;
      border-radius: 12px;
      padding: 10px 16px;
      font-size: 0.95rem;
      font-weight: 600;
      cursor: pointer;
      background: var(--accent);
      color: white;
    }

    button:active {
      transform: scale(0.98);
    }

    button.delete {
      background: var(--accent-2);
    }

    button.mark {
      background: transparent;
      color: var(--ink);
      font-size: 1.1rem;
      padding: 4px 8px;
    }

    .row {
      display: flex;
      flex-wrap: wrap;
      gap: 10px;
      align-items: center;
    }

    input[type="text"],
    input[type="number"],
    input[type="time"],
    textarea {
      border: 1px solid rgba(34, 48, 60, 0.2);
      border-radius: 10px;
      padding: 10px 12px;
      font-size: 0.95rem;
      font-family: inherit;
      flex: 1;
    }

    textarea {
      width: 100%;
      resize: vertical;
    }

    .items {
      list-style: none;
      margin: 0;
      padding: 0;
      display: grid;
      gap: 8px;
    }

    .item {
      display: flex;
      align-items: center;
      gap: 10px;
      background: white;
      border: 1px solid rgba(34, 48, 60, 0.08);
      border-radius: 12px;
      padding: 8px 12px;
    }

    .item .text {
      flex: 1;
    }

    .item.done .text {
      text-decoration: line-through;
      color: #93a1ad;
    }

    .due {
      color: #5b6b79;
      font-size: 0.85rem;
    }

    .due.overdue {
      color: var(--accent-2);
      font-weight: 700;
    }

    .amount.expense {
      color: var(--accent-2);
    }

    .amount.income {
      color: #2d7a4b;
    }

    .stat {
      background: white;
      border-radius: 14px;
      padding: 14px 18px;
      border: 1px solid rgba(34, 48, 60, 0.08);
      display: grid;
      gap: 4px;
      justify-items: start;
    }

    .stat .label {
      font-size: 0.8rem;
      text-transform: uppercase;
      letter-spacing: 0.1em;
      color: #8a96a1;
    }

    .stat .value {
      font-size: 1.5rem;
      font-weight: 700;
    }

    .readout {
      font-size: 3.4rem;
      font-weight: 700;
      font-variant-numeric: tabular-nums;
      text-align: center;
      padding: 18px 0;
    }

    .readout.flash {
      color: var(--accent-2);
    }

    .controls {
      display: flex;
      justify-content: center;
      gap: 12px;
    }

    .status {
      font-size: 0.95rem;
      border-radius: 10px;
      padding: 8px 12px;
    }

    .status[data-type="error"] {
      background: rgba(209, 73, 91, 0.12);
      color: var(--accent-2);
    }

    .status[data-type="ok"] {
      background: rgba(45, 122, 75, 0.12);
      color: #2d7a4b;
    }

    .hint {
      margin: 0;
      color: #7d8893;
      font-size: 0.9rem;
    }

    footer {
      display: flex;
    }

    footer button {
      background: #5b6b79;
    }
  </style>
</head>
<body>
  <main class="app">
    <h1>{{HEADING}}</h1>
    {{NOTICE}}
    {{BODY}}
  </main>
  {{SCRIPT}}
</body>
</html>
"#;

// Runs only on the timer screen: a scheduled 1 Hz callback pulls
// /api/timer while the countdown is live, never a blocking wait.
const TIMER_SCRIPT: &str = r#"<script>
    const panel = document.getElementById('timer-panel');
    const readout = document.getElementById('timer-readout');

    const beep = () => {
      try {
        const ctx = new (window.AudioContext || window.webkitAudioContext)();
        const osc = ctx.createOscillator();
        osc.frequency.value = 880;
        osc.connect(ctx.destination);
        osc.start();
        setTimeout(() => { osc.stop(); ctx.close(); }, 600);
      } catch (err) {
        console.warn('audio alert unavailable', err);
      }
    };

    if (panel.dataset.justExpired === 'true') {
      beep();
    }

    if (panel.dataset.phase === 'running') {
      const handle = setInterval(async () => {
        const res = await fetch('/api/timer');
        if (!res.ok) {
          return;
        }
        const data = await res.json();
        readout.textContent = data.remaining;
        readout.classList.toggle('flash', data.alert_flash);
        if (data.just_expired) {
          beep();
        }
        if (data.phase !== 'running') {
          clearInterval(handle);
          location.reload();
        }
      }, 1000);
    }
  </script>"#;
