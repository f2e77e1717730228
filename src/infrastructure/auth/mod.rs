pub mod middleware;
pub mod request_id;

pub use middleware::{authorization_gate, config_middleware, GateState};
pub use request_id::{request_id_middleware, RequestId, X_REQUEST_ID};
