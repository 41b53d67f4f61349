use once_cell::sync::Lazy;
use reqwest::{Client, StatusCode};
use serde::Deserialize;
use serde_json::{Value, json};
use std::net::TcpListener;
use std::process::{Child, Command, Stdio};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::sync::Mutex;
use tokio::time::sleep;

#[derive(Debug, Deserialize)]
struct Expense {
    id: String,
    amount: f64,
}

#[derive(Debug, Deserialize)]
struct Link {
    id: String,
    pinned: bool,
}

struct TestServer {
    base_url: String,
    child: Child,
    _data_dir: tempfile::TempDir,
}

impl TestServer {
    fn url(&self, path: &str) -> String {
        format!("{}{path}", self.base_url)
    }
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
    use std::sync::Mutex;
    use std::sync::Once;

    static REGISTER: Once = Once::new();
    static PIDS: Mutex<Vec<i32>> = Mutex::new(Vec::new());

    pub fn register(pid: u32) {
        if let Ok(mut pids) = PIDS.lock() {
            pids.push(pid as i32);
        }
        REGISTER.call_once(|| unsafe {
            libc::atexit(on_exit);
        });
    }

    extern "C" fn on_exit() {
        if let Ok(pids) = PIDS.lock() {
            for &pid in pids.iter() {
                unsafe {
                    libc::kill(pid, libc::SIGTERM);
                }
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
    let deadline = Instant::now() + Duration::from_secs(5);
    loop {
        if let Ok(resp) = client.get(format!("{base_url}/login")).send().await {
            if resp.status().is_success() || resp.status().is_redirection() {
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
    let data_dir = tempfile::tempdir().expect("temp data dir");
    let child = Command::new(env!("CARGO_BIN_EXE_home_dashboard"))
        .env("PORT", port.to_string())
        .env("APP_DATA_DIR", data_dir.path())
        .env("WEATHER_API_URL", "http://127.0.0.1:9")
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
        child,
        _data_dir: data_dir,
    }
}

async fn shared_server() -> Arc<TestServer> {
    let mut guard = SERVER.lock().await;
    if let Some(server) = guard.as_ref() {
        return Arc::clone(server);
    }
    let server = Arc::new(spawn_server().await);
    sign_in(&Client::new(), &server).await;
    *guard = Some(Arc::clone(&server));
    server
}

async fn sign_in(client: &Client, server: &TestServer) {
    let response = client
        .post(server.url("/api/auth/signup"))
        .json(&json!({
            "name": "Tester",
            "email": "tester@example.com",
            "password": "hunter2",
            "confirmPassword": "hunter2"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
}

async fn get_json(client: &Client, url: String) -> Value {
    client.get(url).send().await.unwrap().json().await.unwrap()
}

fn food_total(stats: &Value) -> f64 {
    stats["expenseCategories"]
        .as_array()
        .unwrap()
        .iter()
        .find(|total| total["category"] == "Food")
        .map(|total| total["amount"].as_f64().unwrap())
        .unwrap_or(0.0)
}

#[tokio::test]
async fn http_api_requires_login() {
    let server = spawn_server().await;
    let client = Client::builder()
        .redirect(reqwest::redirect::Policy::none())
        .build()
        .unwrap();

    let response = client.get(server.url("/api/stats")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);

    let response = client.get(server.url("/")).send().await.unwrap();
    assert!(response.status().is_redirection());

    sign_in(&client, &server).await;
    let response = client.get(server.url("/api/stats")).send().await.unwrap();
    assert!(response.status().is_success());

    let response = client.post(server.url("/api/auth/logout")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let response = client.get(server.url("/api/links")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn http_duplicate_signup_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(server.url("/api/auth/signup"))
        .json(&json!({
            "name": "Again",
            "email": "tester@example.com",
            "password": "pw",
            "confirmPassword": "pw"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    let me = get_json(&client, server.url("/api/auth/me")).await;
    assert_eq!(me["name"], "Tester");
}

#[tokio::test]
async fn http_expense_lifecycle_updates_stats() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_json(&client, server.url("/api/stats")).await;

    let response = client
        .post(server.url("/api/expenses"))
        .json(&json!({
            "title": "Coffee",
            "amount": 4.5,
            "category": "Food",
            "paymentMode": "Cash",
            "date": "2024-03-01"
        }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let coffee: Expense = response.json().await.unwrap();
    assert_eq!(coffee.amount, 4.5);

    let after = get_json(&client, server.url("/api/stats")).await;
    assert!((food_total(&after) - food_total(&before) - 4.5).abs() < 1e-9);

    let response = client
        .put(server.url(&format!("/api/expenses/{}", coffee.id)))
        .json(&json!({
            "title": "Large coffee",
            "amount": 6.0,
            "category": "Food",
            "paymentMode": "Card",
            "date": "2024-03-01"
        }))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());
    let edited: Expense = response.json().await.unwrap();
    assert_eq!(edited.id, coffee.id);

    let response = client
        .delete(server.url(&format!("/api/expenses/{}", coffee.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let response = client
        .delete(server.url(&format!("/api/expenses/{}?confirm=true", coffee.id)))
        .send()
        .await
        .unwrap();
    assert!(response.status().is_success());

    let restored = get_json(&client, server.url("/api/stats")).await;
    assert!((food_total(&restored) - food_total(&before)).abs() < 1e-9);

    let response = client
        .delete(server.url(&format!("/api/expenses/{}?confirm=true", coffee.id)))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn http_invalid_expense_is_rejected() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let response = client
        .post(server.url("/api/expenses"))
        .json(&json!({ "title": "Nothing", "category": "Food" }))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn http_export_requires_expenses() {
    let server = spawn_server().await;
    let client = Client::new();
    sign_in(&client, &server).await;

    let response = client.get(server.url("/api/expenses/export")).send().await.unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    client
        .post(server.url("/api/expenses"))
        .json(&json!({
            "title": "Coffee",
            "amount": 4.5,
            "category": "Food",
            "paymentMode": "Cash",
            "date": "2024-03-01"
        }))
        .send()
        .await
        .unwrap();

    let response = client.get(server.url("/api/expenses/export")).send().await.unwrap();
    assert!(response.status().is_success());
    let content_type = response.headers()["content-type"].to_str().unwrap().to_string();
    assert!(content_type.starts_with("text/csv"));
    let body = response.text().await.unwrap();
    assert_eq!(
        body,
        "Date,Title,Amount,Category,Payment Mode\n3/1/2024,Coffee,4.5,Food,Cash\n,Total,4.5,,"
    );
}

#[tokio::test]
async fn http_reset_needs_confirmation() {
    let server = spawn_server().await;
    let client = Client::new();
    sign_in(&client, &server).await;

    client
        .post(server.url("/api/links"))
        .json(&json!({ "title": "Docs", "url": "docs.rs" }))
        .send()
        .await
        .unwrap();
    client
        .post(server.url("/api/expenses"))
        .json(&json!({
            "title": "Coffee",
            "amount": 4.5,
            "category": "Food",
            "paymentMode": "Cash",
            "date": "2024-03-01"
        }))
        .send()
        .await
        .unwrap();
    client
        .post(server.url("/api/incomes"))
        .json(&json!({
            "title": "Salary",
            "amount": 1000.0,
            "category": "Salary",
            "date": "2024-03-01"
        }))
        .send()
        .await
        .unwrap();

    for path in ["/api/links", "/api/expenses", "/api/incomes"] {
        let response = client.delete(server.url(path)).send().await.unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");

        let response = client
            .delete(server.url(&format!("{path}?confirm=false")))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST, "{path}");

        let items = get_json(&client, server.url(path)).await;
        assert_eq!(items.as_array().unwrap().len(), 1, "{path}");
    }

    let response = client
        .delete(server.url("/api/incomes?confirm=true"))
        .send()
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);
    let incomes = get_json(&client, server.url("/api/incomes")).await;
    assert!(incomes.as_array().unwrap().is_empty());
    let expenses = get_json(&client, server.url("/api/expenses")).await;
    assert_eq!(expenses.as_array().unwrap().len(), 1);
}

#[tokio::test]
async fn http_pin_toggles_and_sorts_first() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let mut ids = Vec::new();
    for title in ["first", "second"] {
        let link: Link = client
            .post(server.url("/api/links"))
            .json(&json!({ "title": title, "url": format!("{title}.example") }))
            .send()
            .await
            .unwrap()
            .json()
            .await
            .unwrap();
        ids.push(link.id);
    }

    let pinned: Link = client
        .post(server.url(&format!("/api/links/{}/pin", ids[0])))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(pinned.pinned);

    let links: Vec<Link> = client
        .get(server.url("/api/links"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_eq!(links[0].id, ids[0]);

    let unpinned: Link = client
        .post(server.url(&format!("/api/links/{}/pin", ids[0])))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert!(!unpinned.pinned);
}

#[tokio::test]
async fn http_theme_toggle_persists() {
    let _guard = TEST_LOCK.lock().await;
    let server = shared_server().await;
    let client = Client::new();

    let before = get_json(&client, server.url("/api/theme")).await;
    let toggled: Value = client
        .post(server.url("/api/theme/toggle"))
        .send()
        .await
        .unwrap()
        .json()
        .await
        .unwrap();
    assert_ne!(toggled["theme"], before["theme"]);

    let after = get_json(&client, server.url("/api/theme")).await;
    assert_eq!(after["theme"], toggled["theme"]);
}
