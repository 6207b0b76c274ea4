//! Then steps for tool session BDD scenarios.

use super::world::ToolSessionWorld;
use portico::protocol::domain::{JsonRpcError, SESSION_NOT_INITIALIZED};
use rstest_bdd_macros::then;
use serde_json::Value;

#[then("the listing contains {count:u64} tools")]
fn listing_contains(world: &ToolSessionWorld, count: u64) -> Result<(), eyre::Report> {
    let listed = world
        .last_result()?
        .get("tools")
        .and_then(Value::as_array)
        .map_or(0, Vec::len);
    if u64::try_from(listed)? != count {
        return Err(eyre::eyre!("expected {count} tools, found {listed}"));
    }
    Ok(())
}

#[then("the listing has no next cursor")]
fn listing_has_no_cursor(world: &ToolSessionWorld) -> Result<(), eyre::Report> {
    if let Some(cursor) = world.last_result()?.get("nextCursor") {
        return Err(eyre::eyre!("unexpected cursor {cursor}"));
    }
    Ok(())
}

#[then(r#"the next cursor is "{cursor}""#)]
fn next_cursor_is(world: &ToolSessionWorld, cursor: String) -> Result<(), eyre::Report> {
    let actual = world.last_result()?.get("nextCursor").and_then(Value::as_str);
    if actual != Some(cursor.as_str()) {
        return Err(eyre::eyre!("expected cursor {cursor}, found {actual:?}"));
    }
    Ok(())
}

#[then("the session is refused as not initialized")]
fn session_refused(world: &ToolSessionWorld) -> Result<(), eyre::Report> {
    let code = world
        .last_response
        .as_ref()
        .and_then(|response| response.error())
        .map(JsonRpcError::code);
    if code != Some(SESSION_NOT_INITIALIZED) {
        return Err(eyre::eyre!("expected session-not-initialized, found {code:?}"));
    }
    Ok(())
}

#[then("the call succeeded")]
fn call_succeeded(world: &ToolSessionWorld) -> Result<(), eyre::Report> {
    let result = world.last_result()?;
    if result.get("isError") != Some(&Value::Bool(false)) {
        return Err(eyre::eyre!("unexpected call result {result}"));
    }
    Ok(())
}

#[then(r#"the upstream received a request for "{url}""#)]
fn upstream_received(world: &ToolSessionWorld, url: String) -> Result<(), eyre::Report> {
    let requests = world.transport.requests()?;
    let urls: Vec<&str> = requests.iter().map(|request| request.url()).collect();
    if urls != [url.as_str()] {
        return Err(eyre::eyre!("expected one request to {url}, found {urls:?}"));
    }
    Ok(())
}
