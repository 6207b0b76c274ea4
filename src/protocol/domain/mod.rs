//! Domain model for protocol envelopes and client sessions.

mod envelope;
mod error;
mod ids;
mod session;

pub use envelope::{
    InvalidEnvelope, JSONRPC_VERSION, JsonRpcError, JsonRpcResponse, ProtocolMessage,
    ResponseOutcome,
};
pub use error::{
    ArgumentError, INTERNAL_ERROR, INVALID_PARAMS, INVALID_REQUEST, METHOD_NOT_FOUND,
    PARSE_ERROR, SESSION_NOT_INITIALIZED,
};
pub use ids::{DEFAULT_SESSION_ID, RequestId, SessionId};
pub use session::{SUPPORTED_PROTOCOL_VERSIONS, Session, SessionState, is_supported_version};
