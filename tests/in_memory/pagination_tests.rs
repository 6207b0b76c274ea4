//! Pagination of `tools/list` across page boundaries.

use super::helpers::{activate, bridge, call_err, call_ok, request, synthetic_description};
use eyre::ensure;
use portico::protocol::{
    domain::{INVALID_PARAMS, SessionId},
    services::PAGE_SIZE,
};
use rstest::rstest;
use serde_json::{Value, json};

fn tool_count(page: &Value) -> usize {
    page.get("tools")
        .and_then(Value::as_array)
        .map_or(0, Vec::len)
}

#[rstest]
#[tokio::test]
async fn exactly_one_full_page_yields_an_empty_follow_up() -> eyre::Result<()> {
    let bridge = bridge(&synthetic_description(PAGE_SIZE))?;
    let session = SessionId::new("pager");
    activate(&bridge.router, &session).await?;

    let first = call_ok(&bridge.router, &session, request(1, "tools/list", json!({}))).await?;
    ensure!(tool_count(&first) == PAGE_SIZE);
    let cursor = first
        .get("nextCursor")
        .cloned()
        .ok_or_else(|| eyre::eyre!("a full page must carry a cursor"))?;
    ensure!(cursor == json!("50"));

    let second = call_ok(
        &bridge.router,
        &session,
        request(2, "tools/list", json!({"cursor": cursor})),
    )
    .await?;
    ensure!(tool_count(&second) == 0);
    ensure!(second.get("nextCursor").is_none());
    Ok(())
}

#[rstest]
#[case(0, 0, false)]
#[case(1, 1, false)]
#[case(49, 49, false)]
#[case(51, 50, true)]
#[tokio::test]
async fn first_page_size_and_cursor(
    #[case] tools: usize,
    #[case] expected: usize,
    #[case] has_cursor: bool,
) -> eyre::Result<()> {
    let bridge = bridge(&synthetic_description(tools))?;
    let session = SessionId::new("pager");
    activate(&bridge.router, &session).await?;

    let page = call_ok(&bridge.router, &session, request(1, "tools/list", Value::Null)).await?;
    ensure!(tool_count(&page) == expected);
    ensure!(page.get("nextCursor").is_some() == has_cursor);
    Ok(())
}

#[rstest]
#[tokio::test]
async fn pages_preserve_compilation_order() -> eyre::Result<()> {
    let bridge = bridge(&synthetic_description(PAGE_SIZE + 3))?;
    let session = SessionId::new("pager");
    activate(&bridge.router, &session).await?;

    let second = call_ok(
        &bridge.router,
        &session,
        request(1, "tools/list", json!({"cursor": "50"})),
    )
    .await?;
    let names: Vec<&str> = second
        .get("tools")
        .and_then(Value::as_array)
        .into_iter()
        .flatten()
        .filter_map(|tool| tool.get("name").and_then(Value::as_str))
        .collect();
    ensure!(names == ["item050", "item051", "item052"], "got {names:?}");
    Ok(())
}

#[rstest]
#[case(json!("abc"))]
#[case(json!("-1"))]
#[case(json!(50))]
#[tokio::test]
async fn malformed_cursor_is_invalid_params(#[case] cursor: Value) -> eyre::Result<()> {
    let bridge = bridge(&synthetic_description(3))?;
    let session = SessionId::new("pager");
    activate(&bridge.router, &session).await?;

    let (code, _) = call_err(
        &bridge.router,
        &session,
        request(1, "tools/list", json!({"cursor": cursor})),
    )
    .await?;
    ensure!(code == INVALID_PARAMS);
    Ok(())
}
