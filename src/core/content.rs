//! Transport-neutral invocation output.

use rmcp::model::{CallToolResult, Content};
use serde_json::Value as JsonValue;

use crate::core::error::DispatchError;

/// Ordered text blocks produced by one tool invocation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvocationResult {
    blocks: Vec<String>,
}

impl InvocationResult {
    pub fn text(text: impl Into<String>) -> Self {
        Self {
            blocks: vec![text.into()],
        }
    }

    /// Compact JSON form of a client payload.
    pub fn json(payload: &JsonValue) -> Self {
        Self::text(payload.to_string())
    }

    pub fn error(err: &DispatchError) -> Self {
        Self::text(format!("Error: {err}"))
    }

    pub fn blocks(&self) -> &[String] {
        &self.blocks
    }
}

// Failures are not flagged with `is_error`: they are framed exactly like
// success and only the text tells them apart.
impl From<InvocationResult> for CallToolResult {
    fn from(result: InvocationResult) -> Self {
        CallToolResult::success(result.blocks.into_iter().map(Content::text).collect())
    }
}
