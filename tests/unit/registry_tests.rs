//! Unit tests for tool registration, listing order, and schemas.

use std::sync::Arc;

use serde_json::json;

use lmstudio_mcp_bridge::config::BridgeConfig;
use lmstudio_mcp_bridge::lmstudio::LmStudioClient;
use lmstudio_mcp_bridge::mcp::handler::LmStudioBridgeServer;
use lmstudio_mcp_bridge::mcp::registry::{
    ParamKind, ParamSpec, ToolDefinition, ToolOutput, ToolRegistry,
};
use lmstudio_mcp_bridge::mcp::tools::{build_registry, echo};
use lmstudio_mcp_bridge::AppError;

fn registry() -> ToolRegistry {
    let client = Arc::new(LmStudioClient::new(BridgeConfig::default()));
    build_registry(&client).expect("registry builds")
}

#[test]
fn tools_listed_in_registration_order() {
    let names: Vec<String> = registry().list_tools().map(|t| t.name.clone()).collect();
    assert_eq!(
        names,
        vec![
            "echo",
            "lmstudio_list_models",
            "lmstudio_get_current_model",
            "lmstudio_chat_completion"
        ]
    );
}

#[test]
fn duplicate_registration_is_config_error() {
    let mut registry = ToolRegistry::new();
    registry
        .register(echo::definition(), echo::handle)
        .expect("first registration");

    let err = registry
        .register(echo::definition(), echo::handle)
        .expect_err("duplicate");
    assert!(matches!(err, AppError::Config(ref msg) if msg.contains("echo")));
    assert_eq!(registry.len(), 1);
}

#[test]
fn chat_completion_schema_requires_prompt_only() {
    let registry = registry();
    let schema = registry
        .get("lmstudio_chat_completion")
        .expect("registered")
        .input_schema();

    assert_eq!(schema["required"], json!(["prompt"]));
    assert_eq!(schema["properties"]["prompt"]["type"], "string");
    assert_eq!(schema["properties"]["system_prompt"]["type"], "string");
}

#[test]
fn parameterless_tools_have_empty_object_schema() {
    let registry = registry();
    for name in ["lmstudio_list_models", "lmstudio_get_current_model"] {
        let schema = registry.get(name).expect("registered").input_schema();
        assert_eq!(schema["type"], "object");
        assert_eq!(schema["properties"], json!({}));
    }
}

#[test]
fn rmcp_tools_carry_title_and_schema() {
    let server = LmStudioBridgeServer::new(Arc::new(registry()));
    let tools = server.all_tools();
    assert_eq!(tools.len(), 4);

    let echo = serde_json::to_value(&tools[0]).expect("serialize tool");
    assert_eq!(echo["name"], "echo");
    assert_eq!(echo["title"], "Echo");
    assert_eq!(echo["inputSchema"]["required"], json!(["text"]));
}

#[tokio::test]
async fn defaults_reach_the_handler() {
    let mut registry = ToolRegistry::new();
    let definition = ToolDefinition::new("repeat", "Repeat", "repeat text").param(
        ParamSpec::optional("times", ParamKind::Integer)
            .with_default(json!(2))
            .with_range(Some(1.0), Some(5.0)),
    );
    registry
        .register(definition, |args| async move {
            let times = args["times"].as_u64().unwrap_or_default();
            Ok::<_, AppError>(ToolOutput::text("x".repeat(usize::try_from(times).unwrap_or(0))))
        })
        .expect("register");

    let out = registry.invoke("repeat", None).await.expect("invoke");
    assert_eq!(out.first_text(), Some("xx"));

    let err = registry
        .invoke("repeat", Some(json!({ "times": 9 }).as_object().cloned().unwrap_or_default()))
        .await
        .expect_err("out of range");
    assert!(matches!(err, AppError::InvalidInput { ref field, .. } if field == "times"));
}
