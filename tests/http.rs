use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct TimerResponse {
    phase: String,
    remaining: String,
    just_expired: bool,
    configured_minutes: i64,
}

#[derive(Debug, Deserialize)]
struct SessionResponse {
    screen: String,
    goal_count: usize,
    todo_count: usize,
    transaction_count: usize,
    balance: i64,
}

struct TestServer {
    base_url: String,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));
static SERVER: Lazy<Mutex<Option<Arc<TestServer>>>> = Lazy::new(|| Mutex::new(None));

#[cfg(unix)]
mod cleanup {
    use std::sync::atomic::{AtomicI32, Ordering};
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PID: AtomicI32 = AtomicI32::new(0);

    pub fn register(pid: u32) {
        REGISTER.call_once(|| {
            PID.store(pid as i32, Ordering::SeqCst);
            unsafe {
                libc::atexit(on_exit);
            }
        });
    }

    extern "C" fn on_exit() {
        let pid = PID.load(Ordering::SeqCst);
        if pid > 0 {
            unsafe {
                libc::kill(pid, libc::SIGTERM);
            }
        }
    }
}

fn pick_free_port() -> u16 {
    let listener = TcpListener::bind("127.0.0.1:0").expect("bind random port");
    let port = listener.local_addr().unwrap().port();
    drop(listener);
    port
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/session")).send().await {
            if resp.status().is_success() {
                return;
            }
        }
        if Instant::now() > deadline {
            panic!("server did not become ready");
        }
        sleep(Duration::from_millis(100)).await;
    }
}

async fn spawn_server(reset_timer_on_nav: bool) -> TestServer {
    let port = pick_free_port();
    let child = Command::new(env!("CARGO_BIN_EXE_life_dashboard"))
        .env("PORT", port.to_string())
        .env(
            "RESET_TIMER_ON_NAV",
            if reset_timer_on_nav { "1" } else { "0" },
        )
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer { base_url, child }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server(false).await);
    *guard = Some(Arc::clone(&server));
    server
}

async fn timer_state(client: &Client, base_url: &str) -> TimerResponse {
    client
        .get(format!("{base_url}/api/timer"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn session_state(client: &Client, base_url: &str) -> SessionResponse {
    client
        .get(format!("{base_url}/api/session"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

async fn post_form(client: &Client, base_url: &str, path: &str, form: &[(&str, String)]) {
    let response = client
        .post(format!("{base_url}{path}"))
        .form(form)
        .send()
        .await
        .unwrap();
    assert!(
        response.status().is_success(),
        "POST {path} failed: {}",
        response.status()
    );
}

#[tokio::test]
async fn http_lobby_page_renders() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let page = client
        .get(format!("{}/", server.base_url))
        .send()
        .await
        .unwrap()
        .text()
        .await
        .unwrap();

    assert!(page.contains("Life Control Panel"));
}

#[tokio::test]
async fn http_timer_lifecycle() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    post_form(
        &client,
        &server.base_url,
        "/timer/configure",
        &[("minutes", "120".to_string())],
    )
    .await;
    let idle = timer_state(&client, &server.base_url).await;
    assert_eq!(idle.phase, "idle");
    assert_eq!(idle.configured_minutes, 120);

    post_form(&client, &server.base_url, "/timer/start", &[]).await;
    let running = timer_state(&client, &server.base_url).await;
    assert_eq!(running.phase, "running");
    assert!(!running.just_expired);
    assert!(
        running.remaining == "02:00:00" || running.remaining.starts_with("01:59"),
        "unexpected remaining {}",
        running.remaining
    );

    post_form(&client, &server.base_url, "/timer/stop", &[]).await;
    let paused = timer_state(&client, &server.base_url).await;
    assert_eq!(paused.phase, "paused");

    // Pausing freezes the countdown: the frozen remaining survives a wait.
    sleep(Duration::from_millis(1100)).await;
    let still_paused = timer_state(&client, &server.base_url).await;
    assert_eq!(still_paused.remaining, paused.remaining);

    post_form(&client, &server.base_url, "/timer/resume", &[]).await;
    assert_eq!(timer_state(&client, &server.base_url).await.phase, "running");

    post_form(&client, &server.base_url, "/timer/reset", &[]).await;
    let reset = timer_state(&client, &server.base_url).await;
    assert_eq!(reset.phase, "idle");
    assert_eq!(reset.configured_minutes, 120);
}

#[tokio::test]
async fn http_invalid_timer_requests_leave_state_alone() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = timer_state(&client, &server.base_url).await;

    // Out-of-range duration is refused.
    post_form(
        &client,
        &server.base_url,
        "/timer/configure",
        &[("minutes", "0".to_string())],
    )
    .await;
    post_form(
        &client,
        &server.base_url,
        "/timer/configure",
        &[("minutes", "181".to_string())],
    )
    .await;

    // Resume without a paused countdown is an ignored transition.
    post_form(&client, &server.base_url, "/timer/resume", &[]).await;

    let after = timer_state(&client, &server.base_url).await;
    assert_eq!(after.phase, before.phase);
    assert_eq!(after.configured_minutes, before.configured_minutes);
}

#[tokio::test]
async fn http_navigation_and_ledger() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = session_state(&client, &server.base_url).await;

    post_form(
        &client,
        &server.base_url,
        "/nav",
        &[("screen", "money".to_string())],
    )
    .await;
    let on_money = session_state(&client, &server.base_url).await;
    assert_eq!(on_money.screen, "money");

    post_form(
        &client,
        &server.base_url,
        "/money/add",
        &[
            ("item", "salary".to_string()),
            ("amount", "50000".to_string()),
            ("kind", "income".to_string()),
        ],
    )
    .await;
    post_form(
        &client,
        &server.base_url,
        "/money/add",
        &[
            ("item", "lunch".to_string()),
            ("amount", "9000".to_string()),
            ("kind", "expense".to_string()),
        ],
    )
    .await;

    let after = session_state(&client, &server.base_url).await;
    assert_eq!(after.transaction_count, before.transaction_count + 2);
    assert_eq!(after.balance, before.balance + 50_000 - 9_000);

    post_form(
        &client,
        &server.base_url,
        "/nav",
        &[("screen", "lobby".to_string())],
    )
    .await;
    assert_eq!(session_state(&client, &server.base_url).await.screen, "lobby");
}

#[tokio::test]
async fn http_goals_and_todos_round_trip() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = session_state(&client, &server.base_url).await;

    post_form(
        &client,
        &server.base_url,
        "/goals/add",
        &[("text", "ship the release".to_string())],
    )
    .await;
    post_form(
        &client,
        &server.base_url,
        "/todos/add",
        &[
            ("text", "water the plants".to_string()),
            ("deadline", "23:59".to_string()),
        ],
    )
    .await;

    let after = session_state(&client, &server.base_url).await;
    assert_eq!(after.goal_count, before.goal_count + 1);
    assert_eq!(after.todo_count, before.todo_count + 1);

    // Blank text is rejected at the boundary.
    post_form(
        &client,
        &server.base_url,
        "/goals/add",
        &[("text", "   ".to_string())],
    )
    .await;
    assert_eq!(
        session_state(&client, &server.base_url).await.goal_count,
        after.goal_count
    );
}

#[tokio::test]
async fn http_nav_reset_wipes_running_timer_when_enabled() {
    // Dedicated server with the legacy reset-on-navigation behavior on.
    let server = spawn_server(true).await;
    let client = Client::new();

    post_form(
        &client,
        &server.base_url,
        "/nav",
        &[("screen", "timer".to_string())],
    )
    .await;
    post_form(&client, &server.base_url, "/timer/start", &[]).await;
    assert_eq!(timer_state(&client, &server.base_url).await.phase, "running");

    post_form(
        &client,
        &server.base_url,
        "/nav",
        &[("screen", "lobby".to_string())],
    )
    .await;
    assert_eq!(timer_state(&client, &server.base_url).await.phase, "idle");
}

#[tokio::test]
async fn http_unknown_screen_is_a_bad_request() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/nav", server.base_url))
        .form(&[("screen", "settings")])
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), reqwest::StatusCode::BAD_REQUEST);
}
