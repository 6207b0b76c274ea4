//! Given steps for tool session BDD scenarios.

use super::world::{ToolSessionWorld, run_async};
use portico::invocation::domain::HttpResponse;
use portico::protocol::domain::SessionId;
use rstest_bdd_macros::given;
use serde_json::{Map, Value, json};

#[given("a description with {count:u64} operations")]
fn description_with_operations(
    world: &mut ToolSessionWorld,
    count: u64,
) -> Result<(), eyre::Report> {
    let paths: Map<String, Value> = (0..count)
        .map(|index| {
            (
                format!("/items{index:03}"),
                json!({"get": {"operationId": format!("item{index:03}")}}),
            )
        })
        .collect();
    world.compile(&json!({"openapi": "3.0.3", "paths": paths}))
}

#[given("the upstream answers with a JSON document")]
fn upstream_answers_with_json(world: &mut ToolSessionWorld) -> Result<(), eyre::Report> {
    world
        .transport
        .push_response(HttpResponse::json(&json!({"ok": true})))?;
    Ok(())
}

#[given(r#"the session "{session}" has completed the handshake"#)]
fn session_completed_handshake(
    world: &mut ToolSessionWorld,
    session: String,
) -> Result<(), eyre::Report> {
    let id = world.take_id();
    let router = world.router()?;
    let session_id = SessionId::new(session);

    let negotiated = run_async(router.handle(
        &session_id,
        json!({
            "jsonrpc": "2.0",
            "id": id,
            "method": "initialize",
            "params": {"protocolVersion": "2025-06-18"}
        }),
    ))
    .ok_or_else(|| eyre::eyre!("initialize must be answered"))?;
    if negotiated.error().is_some() {
        return Err(eyre::eyre!("initialize failed: {negotiated:?}"));
    }

    let acknowledged = run_async(router.handle(
        &session_id,
        json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
    ));
    if acknowledged.is_some() {
        return Err(eyre::eyre!("initialized notification must not be answered"));
    }
    Ok(())
}
