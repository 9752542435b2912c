//! Per-context reconstruction of nested timed calls.

pub mod alert;
pub mod node;
pub mod tree;

pub use alert::{CallTreeAlert, DEFAULT_ALERT_THRESHOLD};
pub use node::CallTreeNode;
pub use tree::{CallTree, CallTreeListener};
