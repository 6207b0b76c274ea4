//! End-to-end flows from negotiation to upstream calls.

use super::helpers::{activate, bridge, call_err, call_ok, request};
use eyre::{OptionExt, ensure};
use portico::invocation::domain::HttpResponse;
use portico::protocol::domain::{
    INTERNAL_ERROR, INVALID_PARAMS, METHOD_NOT_FOUND, SESSION_NOT_INITIALIZED, SessionId,
};
use portico::tool::domain::HttpMethod;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

#[fixture]
fn petstore() -> Value {
    json!({
        "openapi": "3.0.3",
        "servers": [{"url": "https://petstore.example.com/v1"}],
        "components": {
            "schemas": {
                "Pet": {"type": "object", "properties": {"name": {"type": "string"}}}
            }
        },
        "paths": {
            "/pets": {
                "get": {
                    "operationId": "listPets",
                    "summary": "List all pets",
                    "parameters": [
                        {"name": "limit", "in": "query", "schema": {"type": "integer"}}
                    ]
                },
                "post": {
                    "operationId": "createPet",
                    "requestBody": {
                        "required": true,
                        "content": {"application/json": {"schema": {"$ref": "#/components/schemas/Pet"}}}
                    }
                }
            },
            "/pets/{petId}": {
                "get": {
                    "operationId": "showPetById",
                    "parameters": [
                        {"name": "petId", "in": "path", "required": true, "schema": {"type": "integer"}}
                    ]
                }
            }
        }
    })
}

#[rstest]
#[tokio::test]
async fn unknown_session_must_initialize_first(petstore: Value) -> eyre::Result<()> {
    let bridge = bridge(&petstore)?;
    let (code, _) = call_err(
        &bridge.router,
        &SessionId::new("stranger"),
        request(1, "tools/list", json!({})),
    )
    .await?;
    ensure!(code == SESSION_NOT_INITIALIZED);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn activated_session_lists_compiled_tools(petstore: Value) -> eyre::Result<()> {
    let bridge = bridge(&petstore)?;
    let session = SessionId::new("lister");
    activate(&bridge.router, &session).await?;

    let listed = call_ok(&bridge.router, &session, request(1, "tools/list", json!({}))).await?;
    let names: Vec<&str> = listed
        .get("tools")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|tool| tool.get("name").and_then(Value::as_str))
        .collect();
    ensure!(names == ["list_pets", "create_pet", "show_pet_by_id"], "got {names:?}");

    let show = listed
        .pointer("/tools/2/inputSchema")
        .ok_or_eyre("show_pet_by_id should have a schema")?;
    ensure!(show.pointer("/required") == Some(&json!(["petId"])));
    ensure!(show.pointer("/properties/petId/type") == Some(&json!("integer")));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn call_translates_to_one_http_request(petstore: Value) -> eyre::Result<()> {
    let bridge = bridge(&petstore)?;
    bridge
        .transport
        .push_response(HttpResponse::json(&json!([{"id": 1, "name": "Rex"}])))?;
    let session = SessionId::new("caller");
    activate(&bridge.router, &session).await?;

    let result = call_ok(
        &bridge.router,
        &session,
        request(
            1,
            "tools/call",
            json!({"name": "list_pets", "arguments": {"limit": 10}}),
        ),
    )
    .await?;

    ensure!(result.pointer("/content/0/type") == Some(&json!("text")));
    ensure!(result.pointer("/content/0/text") == Some(&json!("[{\"id\":1,\"name\":\"Rex\"}]")));
    let requests = bridge.transport.requests()?;
    let sent = requests.first().ok_or_eyre("one request should be sent")?;
    ensure!(requests.len() == 1);
    ensure!(sent.method() == HttpMethod::Get);
    ensure!(sent.url() == "https://api.example.com/pets?limit=10");
    Ok(())
}

#[rstest]
#[tokio::test]
async fn body_argument_is_posted_as_json(petstore: Value) -> eyre::Result<()> {
    let bridge = bridge(&petstore)?;
    bridge.transport.push_response(HttpResponse::new(
        201,
        Some("application/json".to_owned()),
        "{\"id\":2}",
    ))?;
    let session = SessionId::new("creator");
    activate(&bridge.router, &session).await?;

    call_ok(
        &bridge.router,
        &session,
        request(
            1,
            "tools/call",
            json!({"name": "create_pet", "arguments": {"body": {"name": "Tom"}}}),
        ),
    )
    .await?;

    let requests = bridge.transport.requests()?;
    let sent = requests.first().ok_or_eyre("one request should be sent")?;
    ensure!(sent.method() == HttpMethod::Post);
    ensure!(sent.body() == Some(&json!({"name": "Tom"})));
    ensure!(sent.header("content-type") == Some("application/json"));
    Ok(())
}

#[rstest]
#[case(json!({}), "missing required argument: petId")]
#[case(json!({"petId": 1, "extra": true}), "unknown argument: extra")]
#[case(json!({"petId": "one"}), "")]
#[tokio::test]
async fn invalid_arguments_never_reach_upstream(
    petstore: Value,
    #[case] arguments: Value,
    #[case] message: &str,
) -> eyre::Result<()> {
    let bridge = bridge(&petstore)?;
    let session = SessionId::new("validator");
    activate(&bridge.router, &session).await?;

    let (code, response) = call_err(
        &bridge.router,
        &session,
        request(
            1,
            "tools/call",
            json!({"name": "show_pet_by_id", "arguments": arguments}),
        ),
    )
    .await?;

    ensure!(code == INVALID_PARAMS);
    if !message.is_empty() {
        ensure!(response.error().map(|error| error.message()) == Some(message));
    }
    ensure!(bridge.transport.requests()?.is_empty());
    Ok(())
}

#[rstest]
#[tokio::test]
async fn upstream_failure_is_internal_error_with_status(petstore: Value) -> eyre::Result<()> {
    let bridge = bridge(&petstore)?;
    bridge.transport.push_response(HttpResponse::new(
        500,
        Some("text/plain".to_owned()),
        "boom",
    ))?;
    let session = SessionId::new("unlucky");
    activate(&bridge.router, &session).await?;

    let (code, response) = call_err(
        &bridge.router,
        &session,
        request(
            1,
            "tools/call",
            json!({"name": "show_pet_by_id", "arguments": {"petId": 9}}),
        ),
    )
    .await?;

    ensure!(code == INTERNAL_ERROR);
    let data = response
        .error()
        .and_then(|error| error.data())
        .ok_or_eyre("error should carry data")?;
    ensure!(data.get("status") == Some(&json!(500)));
    ensure!(data.get("body") == Some(&json!("boom")));
    Ok(())
}

#[rstest]
#[tokio::test]
async fn reinitializing_returns_session_to_negotiation(petstore: Value) -> eyre::Result<()> {
    let bridge = bridge(&petstore)?;
    let session = SessionId::new("again");
    activate(&bridge.router, &session).await?;

    call_ok(
        &bridge.router,
        &session,
        request(5, "initialize", json!({"protocolVersion": "2024-11-05"})),
    )
    .await?;
    let (code, _) = call_err(&bridge.router, &session, request(6, "tools/list", json!({}))).await?;
    ensure!(code == SESSION_NOT_INITIALIZED);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn unknown_method_on_active_session(petstore: Value) -> eyre::Result<()> {
    let bridge = bridge(&petstore)?;
    let session = SessionId::new("curious");
    activate(&bridge.router, &session).await?;

    let (code, _) = call_err(&bridge.router, &session, request(1, "resources/list", json!({}))).await?;
    ensure!(code == METHOD_NOT_FOUND);
    Ok(())
}
