use once_cell::sync::Lazy;
use reqwest::Client;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::net::TcpListener;
use std::path::PathBuf;
use std::process::{Child, Command, Stdio};
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct GridBody {
    days: BTreeMap<String, Vec<String>>,
}

#[derive(Debug, Deserialize)]
struct GridResponse {
    brush: String,
    grid: GridBody,
}

#[derive(Debug, Deserialize)]
struct RosterResponse {
    members: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct SubmitResponse {
    ok: bool,
    errors: Vec<String>,
    redirect: Option<String>,
}

struct TestServer {
    base_url: String,
    submissions_path: PathBuf,
    child: Child,
}

impl Drop for TestServer {
    fn drop(&mut self) {
        let _ = self.child.kill();
        let _ = self.child.wait();
    }
}

static TEST_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

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

fn unique_submissions_path() -> PathBuf {
    let nanos = std::time::SystemTime::now()
        .duration_since(std::time::UNIX_EPOCH)
        .unwrap()
        .as_nanos();
    let mut path = std::env::temp_dir();
    path.push(format!(
        "band_registration_http_{}_{}.json",
        std::process::id(),
        nanos
    ));
    path
}

async fn wait_until_ready(base_url: &str) {
    let client = Client::new();
    let deadline = Instant::now() + Duration::from_secs(3);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/api/grid")).send().await {
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

async fn spawn_server() -> TestServer {
    let port = pick_free_port();
    let submissions_path = unique_submissions_path();
    let child = Command::new(env!("CARGO_BIN_EXE_band_registration"))
        .env("PORT", port.to_string())
        .env("BAND_SUBMISSIONS_PATH", &submissions_path)
        .env("RUST_LOG", "info")
        .stdout(Stdio::inherit())
        .stderr(Stdio::inherit())
        .spawn()
        .expect("failed to spawn server");

    #[cfg(unix)]
    cleanup::register(child.id());

    let base_url = format!("http://127.0.0.1:{port}");
    wait_until_ready(&base_url).await;

    TestServer {
        base_url,
        submissions_path,
        child,
    }
}

async fn pointer(client: &Client, base_url: &str, action: &str, cell: Option<(u8, usize)>) {
    let body = match cell {
        Some((day, index)) => serde_json::json!({ "action": action, "day": day, "index": index }),
        None => serde_json::json!({ "action": action }),
    };
    let response = client
        .post(format!("{base_url}/api/pointer"))
        .json(&body)
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success(), "pointer {action} failed");
}

async fn select_brush(client: &Client, base_url: &str, brush: &str) {
    let response = client
        .post(format!("{base_url}/api/brush"))
        .json(&serde_json::json!({ "brush": brush }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
}

async fn fetch_grid(client: &Client, base_url: &str) -> GridResponse {
    client
        .get(format!("{base_url}/api/grid"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap()
}

fn marked_cells(grid: &GridBody, day: &str) -> Vec<(usize, String)> {
    grid.days[day]
        .iter()
        .enumerate()
        .filter(|(_, state)| state.as_str() != "unmarked")
        .map(|(index, state)| (index, state.clone()))
        .collect()
}

#[tokio::test]
async fn http_drag_paints_exactly_the_entered_cells() {
    let _guard = TEST_LOCK.lock().await;
    let server = spawn_server().await;
    let client = Client::new();

    pointer(&client, &server.base_url, "down", Some((1, 10))).await;
    pointer(&client, &server.base_url, "enter", Some((1, 11))).await;
    pointer(&client, &server.base_url, "enter", Some((1, 12))).await;
    pointer(&client, &server.base_url, "up", None).await;

    let snapshot = fetch_grid(&client, &server.base_url).await;
    assert_eq!(snapshot.brush, "majority_available");
    assert_eq!(
        marked_cells(&snapshot.grid, "1"),
        vec![
            (10, "majority_available".to_string()),
            (11, "majority_available".to_string()),
            (12, "majority_available".to_string()),
        ]
    );
    assert!(marked_cells(&snapshot.grid, "2").is_empty());
    assert!(marked_cells(&snapshot.grid, "3").is_empty());

    let page = client.get(&server.base_url).send().await.unwrap();
    assert!(page.status().is_success());
    let body = page.text().await.unwrap();
    assert!(body.contains(r#"class="cell majority_available" data-day="1" data-index="10""#));
}

#[tokio::test]
async fn http_enter_without_drag_paints_nothing() {
    let _guard = TEST_LOCK.lock().await;
    let server = spawn_server().await;
    let client = Client::new();

    pointer(&client, &server.base_url, "enter", Some((1, 5))).await;
    pointer(&client, &server.base_url, "enter", Some((2, 6))).await;

    let snapshot = fetch_grid(&client, &server.base_url).await;
    for day in ["1", "2", "3"] {
        assert!(marked_cells(&snapshot.grid, day).is_empty());
    }
}

#[tokio::test]
async fn http_eraser_brush_clears_a_painted_cell() {
    let _guard = TEST_LOCK.lock().await;
    let server = spawn_server().await;
    let client = Client::new();

    select_brush(&client, &server.base_url, "all_available").await;
    pointer(&client, &server.base_url, "down", Some((2, 7))).await;
    pointer(&client, &server.base_url, "up", None).await;

    let snapshot = fetch_grid(&client, &server.base_url).await;
    assert_eq!(
        marked_cells(&snapshot.grid, "2"),
        vec![(7, "all_available".to_string())]
    );

    select_brush(&client, &server.base_url, "unmarked").await;
    pointer(&client, &server.base_url, "down", Some((2, 7))).await;
    pointer(&client, &server.base_url, "up", None).await;

    let snapshot = fetch_grid(&client, &server.base_url).await;
    assert!(marked_cells(&snapshot.grid, "2").is_empty());
}

#[tokio::test]
async fn http_pointer_rejects_bad_requests() {
    let _guard = TEST_LOCK.lock().await;
    let server = spawn_server().await;
    let client = Client::new();

    let response = client
        .post(format!("{}/api/pointer", server.base_url))
        .json(&serde_json::json!({ "action": "wiggle" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/api/pointer", server.base_url))
        .json(&serde_json::json!({ "action": "down", "day": 4, "index": 0 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let response = client
        .post(format!("{}/api/pointer", server.base_url))
        .json(&serde_json::json!({ "action": "down", "day": 1, "index": 108 }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let snapshot = fetch_grid(&client, &server.base_url).await;
    for day in ["1", "2", "3"] {
        assert!(marked_cells(&snapshot.grid, day).is_empty());
    }
}

#[tokio::test]
async fn http_submit_empty_form_reports_every_rule() {
    let _guard = TEST_LOCK.lock().await;
    let server = spawn_server().await;
    let client = Client::new();

    let outcome: SubmitResponse = client
        .post(format!("{}/api/submit", server.base_url))
        .json(&serde_json::json!({}))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(!outcome.ok);
    assert_eq!(outcome.redirect, None);
    assert_eq!(
        outcome.errors,
        vec![
            "Please enter a band name.",
            "Please select a performance time.",
            "Please enter the band leader's name.",
            "Please enter at least two band members.",
            "Please mark at least one available time slot.",
        ]
    );
    assert!(!server.submissions_path.exists());
}

#[tokio::test]
async fn http_submit_success_records_and_redirects() {
    let _guard = TEST_LOCK.lock().await;
    let server = spawn_server().await;
    let client = Client::new();

    for (index, name) in [(0, "Mika"), (1, "Ren")] {
        let response = client
            .put(format!("{}/api/members/{index}", server.base_url))
            .json(&serde_json::json!({ "name": name }))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    select_brush(&client, &server.base_url, "all_available").await;
    pointer(&client, &server.base_url, "down", Some((1, 42))).await;
    pointer(&client, &server.base_url, "up", None).await;

    let outcome: SubmitResponse = client
        .post(format!("{}/api/submit", server.base_url))
        .json(&serde_json::json!({
            "band_name": "The Borrow Checkers",
            "performance_time": "5",
            "bandmaster": "Mika"
        }))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();

    assert!(outcome.ok, "unexpected errors: {:?}", outcome.errors);
    assert!(outcome.errors.is_empty());
    assert_eq!(outcome.redirect.as_deref(), Some("/success"));

    let success = client
        .get(format!("{}/success", server.base_url))
        .send()
        .await
        .unwrap();
    assert!(success.status().is_success());
    assert!(success.text().await.unwrap().contains("Registration complete"));

    let recorded: serde_json::Value =
        serde_json::from_slice(&std::fs::read(&server.submissions_path).unwrap()).unwrap();
    let records = recorded.as_array().unwrap();
    assert_eq!(records.len(), 1);
    let registration = &records[0]["registration"];
    assert_eq!(registration["band_name"], "The Borrow Checkers");
    assert_eq!(registration["members"], serde_json::json!(["Mika", "Ren"]));
    assert_eq!(
        registration["time_selections"]["days"]["1"][42],
        "all_available"
    );
    assert!(!records[0]["submitted_at"].as_str().unwrap().is_empty());
}

#[tokio::test]
async fn http_first_two_members_are_permanent() {
    let _guard = TEST_LOCK.lock().await;
    let server = spawn_server().await;
    let client = Client::new();

    let response = client
        .delete(format!("{}/api/members/0", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 400);

    let roster: RosterResponse = client
        .post(format!("{}/api/members", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(roster.members.len(), 3);

    let roster: RosterResponse = client
        .delete(format!("{}/api/members/2", server.base_url))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(roster.members.len(), 2);

    let response = client
        .delete(format!("{}/api/members/5", server.base_url))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), 404);
}
