//! When steps for tool session BDD scenarios.

use super::world::{ToolSessionWorld, run_async};
use portico::protocol::domain::SessionId;
use rstest_bdd_macros::when;
use serde_json::{Value, json};

fn send(
    world: &mut ToolSessionWorld,
    session: String,
    method: &str,
    params: Value,
) -> Result<(), eyre::Report> {
    let id = world.take_id();
    let response = run_async(world.router()?.handle(
        &SessionId::new(session),
        json!({"jsonrpc": "2.0", "id": id, "method": method, "params": params}),
    ));
    world.last_response = response;
    Ok(())
}

#[when(r#"the session "{session}" lists tools"#)]
fn session_lists_tools(world: &mut ToolSessionWorld, session: String) -> Result<(), eyre::Report> {
    send(world, session, "tools/list", json!({}))
}

#[when(r#"the session "{session}" lists tools from cursor "{cursor}""#)]
fn session_lists_tools_from_cursor(
    world: &mut ToolSessionWorld,
    session: String,
    cursor: String,
) -> Result<(), eyre::Report> {
    send(world, session, "tools/list", json!({"cursor": cursor}))
}

#[when(r#"the session "{session}" calls "{tool}""#)]
fn session_calls_tool(
    world: &mut ToolSessionWorld,
    session: String,
    tool: String,
) -> Result<(), eyre::Report> {
    send(
        world,
        session,
        "tools/call",
        json!({"name": tool, "arguments": {}}),
    )
}
