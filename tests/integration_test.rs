use std::io::Write;
use std::path::{Path, PathBuf};
use std::process::{Command, Output, Stdio};
use std::time::{Duration, Instant};

use serde_json::json;
use tempfile::TempDir;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn promptdesk_cmd(tmp: &TempDir, server: &MockServer) -> Command {
    let mut cmd = Command::new(env!("CARGO_BIN_EXE_promptdesk"));
    cmd.current_dir(tmp.path())
        .env("PROMPTDESK_API_URL", server.uri())
        .env("PROMPTDESK_STORAGE", storage_path(tmp))
        .env_remove("RUST_LOG");
    cmd
}

fn storage_path(tmp: &TempDir) -> PathBuf {
    tmp.path().join("storage.json")
}

fn stored_token(path: &Path) -> Option<String> {
    let content = std::fs::read_to_string(path).ok()?;
    let value: serde_json::Value = serde_json::from_str(&content).ok()?;
    value["token"].as_str().map(str::to_string)
}

fn seed_token(tmp: &TempDir, token: &str) {
    std::fs::write(storage_path(tmp), json!({ "token": token }).to_string()).unwrap();
}

fn stdout(output: &Output) -> String {
    String::from_utf8_lossy(&output.stdout).to_string()
}

fn stderr(output: &Output) -> String {
    String::from_utf8_lossy(&output.stderr).to_string()
}

async fn mock_list(server: &MockServer, token: &str, data: serde_json::Value) {
    Mock::given(method("GET"))
        .and(path("/prompts"))
        .and(header("authorization", format!("Bearer {}", token).as_str()))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": data })))
        .mount(server)
        .await;
}

#[tokio::test(flavor = "multi_thread")]
async fn test_list_without_session_fails_without_fetching() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    let output = promptdesk_cmd(&tmp, &server).args(["list"]).output().unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Not logged in"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_with_wrong_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/local"))
        .and(body_json(json!({"identifier": "alice", "password": "wrong"})))
        .respond_with(ResponseTemplate::new(400).set_body_json(json!({
            "error": {"status": 400, "message": "Invalid identifier or password"}
        })))
        .mount(&server)
        .await;
    let tmp = TempDir::new().unwrap();

    let output = promptdesk_cmd(&tmp, &server)
        .args(["login", "alice", "--password", "wrong"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    let err = stderr(&output);
    assert!(err.contains("[error] Login Failed: Invalid username or password"));
    assert!(!stdout(&output).contains("Login Successful"));
    assert_eq!(stored_token(&storage_path(&tmp)), None);
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_persists_session_for_later_commands() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "jwt": "jwt-alice",
            "user": {"id": 1, "username": "alice"}
        })))
        .mount(&server)
        .await;
    mock_list(
        &server,
        "jwt-alice",
        json!([
            {"id": 1, "attributes": {"name": "Greeting", "prompt": "Say hello"}},
            {"id": 2, "attributes": {"name": "Summary", "prompt": "Summarize this"}}
        ]),
    )
    .await;
    let tmp = TempDir::new().unwrap();

    let output = promptdesk_cmd(&tmp, &server)
        .args(["login", "alice", "-p", "s3cret"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("[ok] Login Successful"));
    assert!(stdout(&output).contains("2 prompt(s) available."));
    assert_eq!(
        stored_token(&storage_path(&tmp)).as_deref(),
        Some("jwt-alice")
    );

    let output = promptdesk_cmd(&tmp, &server).args(["list"]).output().unwrap();
    assert!(output.status.success());
    let out = stdout(&output);
    assert!(out.contains("[1] Greeting"));
    assert!(out.contains("[2] Summary"));
    assert!(out.find("Greeting").unwrap() < out.find("Summary").unwrap());

    let output = promptdesk_cmd(&tmp, &server)
        .args(["list", "--json"])
        .output()
        .unwrap();
    let listed: serde_json::Value = serde_json::from_str(&stdout(&output)).unwrap();
    assert_eq!(listed[0]["id"], "1");
    assert_eq!(listed[1]["text"], "Summarize this");
}

#[tokio::test(flavor = "multi_thread")]
async fn test_register_logs_in() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/local/register"))
        .and(body_json(json!({
            "username": "bob",
            "email": "bob@example.com",
            "password": "pw"
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": "jwt-bob"})))
        .mount(&server)
        .await;
    mock_list(&server, "jwt-bob", json!([])).await;
    let tmp = TempDir::new().unwrap();

    let output = promptdesk_cmd(&tmp, &server)
        .args(["register", "bob", "bob@example.com", "--password", "pw"])
        .output()
        .unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("[ok] Registration Successful"));
    assert_eq!(stored_token(&storage_path(&tmp)).as_deref(), Some("jwt-bob"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_update_delete() {
    let server = MockServer::start().await;
    mock_list(
        &server,
        "tok",
        json!([{"id": 1, "attributes": {"name": "A", "prompt": "hello"}}]),
    )
    .await;
    Mock::given(method("POST"))
        .and(path("/prompts"))
        .and(header("authorization", "Bearer tok"))
        .and(body_json(json!({"data": {"name": "B", "prompt": "second"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 2, "attributes": {"name": "B", "prompt": "second"}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("PUT"))
        .and(path("/prompts/1"))
        .and(body_json(json!({"data": {"name": "A2", "prompt": "hello"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 1, "attributes": {"name": "A2", "prompt": "hello"}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    Mock::given(method("DELETE"))
        .and(path("/prompts/1"))
        .respond_with(ResponseTemplate::new(200))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = TempDir::new().unwrap();
    seed_token(&tmp, "tok");

    let output = promptdesk_cmd(&tmp, &server)
        .args(["create", "B", "second"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("[ok] Prompt Created"));
    assert!(stdout(&output).contains("Created prompt [2] - B"));

    // Only the name changes; the text is carried over from the cached prompt.
    let output = promptdesk_cmd(&tmp, &server)
        .args(["update", "1", "--name", "A2", "--json"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    let json_start = out.find('{').unwrap();
    let updated: serde_json::Value = serde_json::from_str(&out[json_start..]).unwrap();
    assert_eq!(updated["name"], "A2");

    let output = promptdesk_cmd(&tmp, &server)
        .args(["delete", "1"])
        .output()
        .unwrap();
    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("[ok] Prompt Deleted"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_failed_mutation_reports_generic_title() {
    let server = MockServer::start().await;
    mock_list(&server, "tok", json!([])).await;
    Mock::given(method("DELETE"))
        .and(path("/prompts/9"))
        .respond_with(ResponseTemplate::new(404))
        .mount(&server)
        .await;
    let tmp = TempDir::new().unwrap();
    seed_token(&tmp, "tok");

    let output = promptdesk_cmd(&tmp, &server)
        .args(["delete", "9"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("[error] Failed to Delete Prompt"));
    assert!(!stderr(&output).contains("Error: Failed"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_update_unknown_prompt() {
    let server = MockServer::start().await;
    mock_list(&server, "tok", json!([])).await;
    let tmp = TempDir::new().unwrap();
    seed_token(&tmp, "tok");

    let output = promptdesk_cmd(&tmp, &server)
        .args(["update", "42", "--name", "x"])
        .output()
        .unwrap();

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Prompt not found: 42"));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_clears_storage_without_backend() {
    let server = MockServer::start().await;
    // A slow backend must not hold up a purely local logout.
    Mock::given(method("GET"))
        .and(path("/prompts"))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(json!({ "data": [] }))
                .set_delay(Duration::from_secs(5)),
        )
        .mount(&server)
        .await;
    let tmp = TempDir::new().unwrap();
    seed_token(&tmp, "tok");

    let started = Instant::now();
    let output = promptdesk_cmd(&tmp, &server).args(["logout"]).output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    assert!(stdout(&output).contains("Logged out."));
    assert!(started.elapsed() < Duration::from_secs(4));
    assert_eq!(stored_token(&storage_path(&tmp)), None);
    assert!(server.received_requests().await.unwrap().is_empty());

    let output = promptdesk_cmd(&tmp, &server).args(["list"]).output().unwrap();
    assert!(!output.status.success());
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_logout_without_session() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    let output = promptdesk_cmd(&tmp, &server).args(["logout"]).output().unwrap();

    assert!(output.status.success());
    assert!(stdout(&output).contains("Not logged in."));
}

#[tokio::test(flavor = "multi_thread")]
async fn test_login_reads_piped_password() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/local"))
        .and(body_json(json!({"identifier": "alice", "password": "from stdin"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": "jwt-alice"})))
        .expect(1)
        .mount(&server)
        .await;
    mock_list(&server, "jwt-alice", json!([])).await;
    let tmp = TempDir::new().unwrap();

    let mut child = promptdesk_cmd(&tmp, &server)
        .args(["login", "alice"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child.stdin.take().unwrap().write_all(b"from stdin\n").unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    // Piped input gets no interactive prompt.
    assert!(!stderr(&output).contains("Password"));
    assert_eq!(
        stored_token(&storage_path(&tmp)).as_deref(),
        Some("jwt-alice")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn test_create_from_stdin_without_session() {
    let server = MockServer::start().await;
    let tmp = TempDir::new().unwrap();

    // stdin is left open: the session check has to fail before it is read.
    let mut child = promptdesk_cmd(&tmp, &server)
        .args(["create", "Draft", "--stdin"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    let stdin = child.stdin.take().unwrap();
    let output = child.wait_with_output().unwrap();
    drop(stdin);

    assert!(!output.status.success());
    assert!(stderr(&output).contains("Not logged in"));
    assert!(server.received_requests().await.unwrap().is_empty());
}

#[tokio::test(flavor = "multi_thread")]
async fn test_shell_session() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/auth/local"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"jwt": "tok"})))
        .mount(&server)
        .await;
    mock_list(&server, "tok", json!([])).await;
    Mock::given(method("POST"))
        .and(path("/prompts"))
        .and(body_json(json!({"data": {"name": "My Prompt", "prompt": "Say hello politely"}})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {"id": 3, "attributes": {"name": "My Prompt", "prompt": "Say hello politely"}}
        })))
        .expect(1)
        .mount(&server)
        .await;
    let tmp = TempDir::new().unwrap();

    let mut child = promptdesk_cmd(&tmp, &server)
        .args(["shell"])
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .unwrap();
    child
        .stdin
        .take()
        .unwrap()
        .write_all(
            b"mode\nmode\nlogin alice pw\nname My Prompt\ntext Say hello politely\nsave\nlogout\nquit\n",
        )
        .unwrap();
    let output = child.wait_with_output().unwrap();

    assert!(output.status.success(), "stderr: {}", stderr(&output));
    let out = stdout(&output);
    assert!(out.starts_with("Login"));
    assert!(out.contains("Register"));
    assert!(out.contains("[ok] Login Successful"));
    assert!(out.contains("Prompt Name: My Prompt"));
    assert!(out.contains("[3] My Prompt"));
    assert!(out.contains("[ok] Prompt Created"));
    // After logout the last screen is the login form again.
    assert!(out.trim_end().ends_with("Don't have an account? Register (type `mode`)"));
    assert_eq!(stored_token(&storage_path(&tmp)), None);
}
