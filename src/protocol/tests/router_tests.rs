//! Unit tests for the protocol router state machine.

use crate::protocol::{
    adapters::memory::InMemorySessionStore,
    domain::{
        INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, JsonRpcResponse, METHOD_NOT_FOUND,
        RequestId, SESSION_NOT_INITIALIZED, SessionId,
    },
    ports::{MockToolExecutor, ToolExecutionError},
    services::{PAGE_SIZE, ProtocolRouter, ServerInfo},
};
use crate::tool::domain::{ToolOutput, ToolRegistry};
use crate::tool::services::generate_tools;
use mockable::DefaultClock;
use rstest::{fixture, rstest};
use serde_json::{Map, Value, json};
use std::sync::Arc;

type TestRouter = ProtocolRouter<InMemorySessionStore, MockToolExecutor, DefaultClock>;

#[fixture]
fn registry() -> ToolRegistry {
    generate_tools(&json!({
        "paths": {
            "/users/{id}": {
                "get": {
                    "operationId": "getUserById",
                    "parameters": [
                        {"name": "id", "in": "path", "required": true, "schema": {"type": "integer"}},
                        {"name": "verbose", "in": "query", "schema": {"type": "boolean"}}
                    ]
                }
            }
        }
    }))
}

fn router_with(executor: MockToolExecutor, registry: ToolRegistry) -> TestRouter {
    ProtocolRouter::new(
        Arc::new(InMemorySessionStore::new()),
        Arc::new(executor),
        Arc::new(DefaultClock),
        registry,
    )
    .with_server_info(ServerInfo::new("portico-test", "0.0.1"))
}

fn idle_executor() -> MockToolExecutor {
    let mut executor = MockToolExecutor::new();
    executor.expect_execute().never();
    executor
}

fn request(id: i64, method: &str, params: Value) -> Value {
    json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params})
}

fn error_code(response: Option<&JsonRpcResponse>) -> Option<i32> {
    response
        .and_then(JsonRpcResponse::error)
        .map(crate::protocol::domain::JsonRpcError::code)
}

async fn activate(router: &TestRouter, session: &SessionId) {
    let negotiated = router
        .handle(
            session,
            request(1, "initialize", json!({"protocolVersion": "2025-06-18"})),
        )
        .await;
    assert!(negotiated.and_then(|response| response.result().cloned()).is_some());

    let acknowledged = router
        .handle(
            session,
            json!({"jsonrpc": "2.0", "method": "notifications/initialized"}),
        )
        .await;
    assert_eq!(acknowledged, None);
}

#[rstest]
#[tokio::test]
async fn unknown_session_cannot_list_tools(registry: ToolRegistry) {
    let router = router_with(idle_executor(), registry);

    let response = router
        .handle(&SessionId::default(), request(1, "tools/list", json!({})))
        .await;

    assert_eq!(error_code(response.as_ref()), Some(SESSION_NOT_INITIALIZED));
}

#[rstest]
#[tokio::test]
async fn ping_is_served_without_a_session(registry: ToolRegistry) {
    let router = router_with(idle_executor(), registry);

    let response = router
        .handle(&SessionId::default(), request(4, "ping", Value::Null))
        .await;

    assert_eq!(
        response,
        Some(JsonRpcResponse::success(RequestId::Number(4), json!({})))
    );
}

#[rstest]
#[tokio::test]
async fn initialize_reports_negotiated_version_and_server(registry: ToolRegistry) {
    let router = router_with(idle_executor(), registry);

    let response = router
        .handle(
            &SessionId::default(),
            request(
                1,
                "initialize",
                json!({"protocolVersion": "2024-11-05", "capabilities": {"roots": {}}}),
            ),
        )
        .await;

    assert_eq!(
        response.and_then(|envelope| envelope.result().cloned()),
        Some(json!({
            "protocolVersion": "2024-11-05",
            "capabilities": {"tools": {"listChanged": false}},
            "serverInfo": {"name": "portico-test", "version": "0.0.1"}
        }))
    );
}

#[rstest]
#[case(json!({}), None)]
#[case(json!({"protocolVersion": null}), None)]
#[case(json!({"protocolVersion": "1999-01-01"}), Some(json!("1999-01-01")))]
#[case(json!({"protocolVersion": 3}), Some(json!(3)))]
#[tokio::test]
async fn initialize_rejects_missing_or_unsupported_versions(
    registry: ToolRegistry,
    #[case] params: Value,
    #[case] requested: Option<Value>,
) {
    let router = router_with(idle_executor(), registry);

    let response = router
        .handle(&SessionId::default(), request(1, "initialize", params))
        .await;

    let error = response
        .as_ref()
        .and_then(JsonRpcResponse::error)
        .expect("initialize should fail");
    assert_eq!(error.code(), INVALID_PARAMS);
    let expected_data = requested.map(|value| {
        json!({"supported": ["2025-06-18", "2025-03-26", "2024-11-05"], "requested": value})
    });
    assert_eq!(error.data().cloned(), expected_data);
}

#[rstest]
#[tokio::test]
async fn negotiating_session_cannot_list_tools(registry: ToolRegistry) {
    let router = router_with(idle_executor(), registry);
    let session = SessionId::new("negotiating");
    router
        .handle(
            &session,
            request(1, "initialize", json!({"protocolVersion": "2025-03-26"})),
        )
        .await;

    let response = router
        .handle(&session, request(2, "tools/list", json!({})))
        .await;

    assert_eq!(error_code(response.as_ref()), Some(SESSION_NOT_INITIALIZED));
}

#[rstest]
#[tokio::test]
async fn active_session_lists_tools(registry: ToolRegistry) {
    let router = router_with(idle_executor(), registry);
    let session = SessionId::default();
    activate(&router, &session).await;

    let response = router
        .handle(&session, request(2, "tools/list", Value::Null))
        .await;

    let result = response
        .and_then(|envelope| envelope.result().cloned())
        .expect("tools/list should succeed");
    assert_eq!(result.pointer("/tools/0/name"), Some(&json!("get_user_by_id")));
    assert_eq!(
        result.pointer("/tools/0/inputSchema/required"),
        Some(&json!(["id"]))
    );
    assert_eq!(result.get("nextCursor"), None);
}

#[rstest]
#[tokio::test]
async fn initialized_without_session_reports_error_with_null_id(registry: ToolRegistry) {
    let router = router_with(idle_executor(), registry);

    let response = router
        .handle(
            &SessionId::default(),
            json!({"jsonrpc": "2.0", "method": "initialized"}),
        )
        .await
        .expect("failed notifications are reported");

    assert_eq!(response.id(), None);
    assert_eq!(
        response.error().map(|error| error.code()),
        Some(SESSION_NOT_INITIALIZED)
    );
}

#[rstest]
#[case(json!({"jsonrpc": "1.0", "id": 5, "method": "ping"}), Some(RequestId::Number(5)))]
#[case(json!({"jsonrpc": "2.0", "id": "x"}), Some(RequestId::String("x".to_owned())))]
#[case(json!("ping"), None)]
#[tokio::test]
async fn malformed_envelopes_are_invalid_requests(
    registry: ToolRegistry,
    #[case] envelope: Value,
    #[case] id: Option<RequestId>,
) {
    let router = router_with(idle_executor(), registry);

    let response = router
        .handle(&SessionId::default(), envelope)
        .await
        .expect("invalid envelopes are answered");

    assert_eq!(response.id(), id.as_ref());
    assert_eq!(response.error().map(|error| error.code()), Some(INVALID_REQUEST));
}

#[rstest]
#[tokio::test]
async fn unknown_method_on_active_session_is_not_found(registry: ToolRegistry) {
    let router = router_with(idle_executor(), registry);
    let session = SessionId::default();
    activate(&router, &session).await;

    let response = router
        .handle(&session, request(3, "resources/list", json!({})))
        .await;

    assert_eq!(error_code(response.as_ref()), Some(METHOD_NOT_FOUND));
}

#[rstest]
#[case(json!({}))]
#[case(json!({"name": ""}))]
#[case(json!({"name": "missing_tool"}))]
#[case(json!({"name": "get_user_by_id"}))]
#[case(json!({"name": "get_user_by_id", "arguments": {"id": 7, "page": 2}}))]
#[case(json!({"name": "get_user_by_id", "arguments": {"id": "seven"}}))]
#[case(json!({"name": "get_user_by_id", "arguments": [7]}))]
#[tokio::test]
async fn invalid_calls_never_reach_the_executor(registry: ToolRegistry, #[case] params: Value) {
    let router = router_with(idle_executor(), registry);
    let session = SessionId::default();
    activate(&router, &session).await;

    let response = router
        .handle(&session, request(5, "tools/call", params))
        .await;

    assert_eq!(error_code(response.as_ref()), Some(INVALID_PARAMS));
}

#[rstest]
#[tokio::test]
async fn missing_required_argument_names_the_argument(registry: ToolRegistry) {
    let router = router_with(idle_executor(), registry);
    let session = SessionId::default();
    activate(&router, &session).await;

    let response = router
        .handle(
            &session,
            request(5, "tools/call", json!({"name": "get_user_by_id", "arguments": {}})),
        )
        .await
        .expect("tools/call is answered");

    let error = response.error().expect("call should fail");
    assert_eq!(error.message(), "missing required argument: id");
    assert_eq!(error.data(), Some(&json!({"argument": "id"})));
}

#[rstest]
#[tokio::test]
async fn valid_call_delegates_to_executor(registry: ToolRegistry) {
    let mut executor = MockToolExecutor::new();
    executor
        .expect_execute()
        .withf(|tool, arguments| {
            tool.name().as_str() == "get_user_by_id" && arguments.get("id") == Some(&json!(7))
        })
        .times(1)
        .returning(|_, _| Ok(ToolOutput::Json(json!({"id": 7, "name": "Ada"}))));
    let router = router_with(executor, registry);
    let session = SessionId::default();
    activate(&router, &session).await;

    let response = router
        .handle(
            &session,
            request(6, "tools/call", json!({"name": "get_user_by_id", "arguments": {"id": 7}})),
        )
        .await;

    assert_eq!(
        response,
        Some(JsonRpcResponse::success(
            RequestId::Number(6),
            json!({
                "content": [{"type": "text", "text": "{\"id\":7,\"name\":\"Ada\"}"}],
                "isError": false
            })
        ))
    );
}

#[rstest]
#[tokio::test]
async fn execution_failure_is_internal_error_with_cause(registry: ToolRegistry) {
    let mut executor = MockToolExecutor::new();
    executor.expect_execute().times(1).returning(|_, _| {
        Err(
            ToolExecutionError::new(std::io::Error::other("upstream returned 503"))
                .with_details(json!({"status": 503})),
        )
    });
    let router = router_with(executor, registry);
    let session = SessionId::default();
    activate(&router, &session).await;

    let response = router
        .handle(
            &session,
            request(7, "tools/call", json!({"name": "get_user_by_id", "arguments": {"id": 1}})),
        )
        .await
        .expect("tools/call is answered");

    let error = response.error().expect("call should fail");
    assert_eq!(error.code(), INTERNAL_ERROR);
    assert_eq!(
        error.data(),
        Some(&json!({"status": 503, "cause": "upstream returned 503"}))
    );
}

#[rstest]
#[tokio::test]
async fn pages_follow_decimal_offset_cursor() -> eyre::Result<()> {
    let paths: Map<String, Value> = (0..120)
        .map(|index| {
            (
                format!("/items/{index:03}"),
                json!({"get": {"operationId": format!("item{index:03}")}}),
            )
        })
        .collect();
    let router = router_with(idle_executor(), generate_tools(&json!({"paths": paths})));
    let session = SessionId::default();
    activate(&router, &session).await;

    let mut cursor: Option<String> = None;
    let mut page_sizes = Vec::new();
    let mut cursors = Vec::new();
    for id in 2..6 {
        let params = cursor
            .as_ref()
            .map_or_else(|| json!({}), |next| json!({"cursor": next}));
        let result = router
            .handle(&session, request(id, "tools/list", params))
            .await
            .and_then(|envelope| envelope.result().cloned())
            .ok_or_else(|| eyre::eyre!("tools/list should succeed"))?;
        let tools = result
            .get("tools")
            .and_then(Value::as_array)
            .map_or(0, Vec::len);
        page_sizes.push(tools);
        cursor = result
            .get("nextCursor")
            .and_then(Value::as_str)
            .map(str::to_owned);
        cursors.push(cursor.clone());
        if cursor.is_none() {
            break;
        }
    }

    eyre::ensure!(page_sizes == [PAGE_SIZE, PAGE_SIZE, 20]);
    eyre::ensure!(cursors == [Some("50".to_owned()), Some("100".to_owned()), None]);
    Ok(())
}

#[rstest]
#[case(json!({"cursor": "abc"}))]
#[case(json!({"cursor": "-1"}))]
#[case(json!({"cursor": "+5"}))]
#[case(json!({"cursor": ""}))]
#[case(json!({"cursor": 50}))]
#[tokio::test]
async fn malformed_cursor_is_invalid_params(registry: ToolRegistry, #[case] params: Value) {
    let router = router_with(idle_executor(), registry);
    let session = SessionId::default();
    activate(&router, &session).await;

    let response = router
        .handle(&session, request(2, "tools/list", params))
        .await;

    assert_eq!(error_code(response.as_ref()), Some(INVALID_PARAMS));
}

#[rstest]
#[tokio::test]
async fn replaced_registry_applies_to_new_sessions_only(registry: ToolRegistry) -> eyre::Result<()> {
    let router = router_with(idle_executor(), registry);
    let established = SessionId::new("established");
    activate(&router, &established).await;

    router.replace_registry(generate_tools(&json!({
        "paths": {"/health": {"get": {"operationId": "healthCheck"}}}
    })));
    let fresh = SessionId::new("fresh");
    activate(&router, &fresh).await;

    let first_tool = |response: Option<JsonRpcResponse>| {
        response
            .and_then(|envelope| envelope.result().cloned())
            .and_then(|result| result.pointer("/tools/0/name").cloned())
    };
    let old = router
        .handle(&established, request(2, "tools/list", json!({})))
        .await;
    let new = router
        .handle(&fresh, request(2, "tools/list", json!({})))
        .await;

    eyre::ensure!(first_tool(old) == Some(json!("get_user_by_id")));
    eyre::ensure!(first_tool(new) == Some(json!("health_check")));
    Ok(())
}
