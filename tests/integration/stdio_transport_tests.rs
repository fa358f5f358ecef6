//! Drives the real binary over stdin/stdout with raw JSON-RPC lines.

use std::collections::HashMap;
use std::process::Stdio;
use std::time::Duration;

use serde_json::{json, Value};
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

use super::test_helpers::{models_body, MockLmStudio, Route};

const TIMEOUT: Duration = Duration::from_secs(15);

fn spawn_bridge(extra_args: &[&str]) -> Child {
    Command::new(env!("CARGO_BIN_EXE_lmstudio-mcp-bridge"))
        .args(extra_args)
        .env("RUST_LOG", "debug")
        .stdin(Stdio::piped())
        .stdout(Stdio::piped())
        .stderr(Stdio::null())
        .kill_on_drop(true)
        .spawn()
        .expect("spawn bridge binary")
}

async fn send(stdin: &mut ChildStdin, message: &Value) {
    let mut line = message.to_string();
    line.push('\n');
    stdin.write_all(line.as_bytes()).await.expect("write");
    stdin.flush().await.expect("flush");
}

/// Read stdout until responses for every id in `ids` have arrived.
async fn collect(
    reader: &mut BufReader<ChildStdout>,
    ids: &[u64],
) -> HashMap<u64, Value> {
    let mut responses = HashMap::new();
    let mut line = String::new();
    while responses.len() < ids.len() {
        line.clear();
        let read = tokio::time::timeout(TIMEOUT, reader.read_line(&mut line))
            .await
            .expect("response before timeout")
            .expect("read stdout");
        assert!(read > 0, "bridge closed stdout early");

        let message: Value = serde_json::from_str(line.trim())
            .unwrap_or_else(|err| panic!("stdout must carry only JSON-RPC ({err}): {line}"));
        if let Some(id) = message.get("id").and_then(Value::as_u64) {
            if ids.contains(&id) {
                responses.insert(id, message);
            }
        }
    }
    responses
}

async fn initialize(stdin: &mut ChildStdin, reader: &mut BufReader<ChildStdout>) -> Value {
    send(
        stdin,
        &json!({
            "jsonrpc": "2.0",
            "id": 1,
            "method": "initialize",
            "params": {
                "protocolVersion": "2024-11-05",
                "capabilities": {},
                "clientInfo": { "name": "stdio-test", "version": "0.0.0" }
            }
        }),
    )
    .await;
    let mut responses = collect(reader, &[1]).await;
    send(
        stdin,
        &json!({ "jsonrpc": "2.0", "method": "notifications/initialized" }),
    )
    .await;
    responses.remove(&1).expect("initialize response")
}

#[tokio::test]
async fn stdio_session_lists_and_calls_tools() {
    let mock =
        MockLmStudio::start(vec![Route::json("/v1/models", &models_body(&["qwen"]))]).await;
    let mut child = spawn_bridge(&["--base-url", &mock.base_url]);
    let mut stdin = child.stdin.take().expect("stdin");
    let mut reader = BufReader::new(child.stdout.take().expect("stdout"));

    let init = initialize(&mut stdin, &mut reader).await;
    assert_eq!(init["result"]["serverInfo"]["name"], "lmstudio-mcp-bridge");
    assert!(init["result"]["capabilities"]["tools"].is_object());

    send(
        &mut stdin,
        &json!({ "jsonrpc": "2.0", "id": 2, "method": "tools/list", "params": {} }),
    )
    .await;
    send(
        &mut stdin,
        &json!({
            "jsonrpc": "2.0", "id": 3, "method": "tools/call",
            "params": { "name": "echo", "arguments": { "text": "over stdio" } }
        }),
    )
    .await;
    send(
        &mut stdin,
        &json!({
            "jsonrpc": "2.0", "id": 4, "method": "tools/call",
            "params": { "name": "lmstudio_list_models", "arguments": {} }
        }),
    )
    .await;
    send(
        &mut stdin,
        &json!({
            "jsonrpc": "2.0", "id": 5, "method": "tools/call",
            "params": { "name": "get_system_info", "arguments": {} }
        }),
    )
    .await;

    let responses = collect(&mut reader, &[2, 3, 4, 5]).await;

    let names: Vec<&str> = responses[&2]["result"]["tools"]
        .as_array()
        .expect("tools array")
        .iter()
        .filter_map(|t| t["name"].as_str())
        .collect();
    assert_eq!(
        names,
        vec![
            "echo",
            "lmstudio_list_models",
            "lmstudio_get_current_model",
            "lmstudio_chat_completion"
        ]
    );

    assert_eq!(
        responses[&3]["result"]["content"][0]["text"],
        "Echo: over stdio"
    );
    assert_eq!(
        responses[&4]["result"]["content"][0]["text"],
        "Available models in LM Studio:\n\n1. qwen"
    );
    assert_eq!(responses[&5]["error"]["code"], -32602);

    drop(stdin);
    let status = tokio::time::timeout(TIMEOUT, child.wait())
        .await
        .expect("exit after stdin closes")
        .expect("wait");
    assert!(status.success(), "clean shutdown must exit 0: {status:?}");
}

#[tokio::test]
async fn invalid_base_url_exits_non_zero() {
    let mut child = spawn_bridge(&["--base-url", "not a url"]);
    let status = tokio::time::timeout(TIMEOUT, child.wait())
        .await
        .expect("exit before timeout")
        .expect("wait");
    assert_eq!(status.code(), Some(1));
}
