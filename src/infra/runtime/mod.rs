pub mod limits;
pub mod mcp_transport;
pub mod runner;
pub mod session_order;
