use async_trait::async_trait;

use crate::traits::ToolSpec;

#[derive(thiserror::Error, Debug)]
pub enum ToolError {
    #[error("invalid tool arguments: {0}")]
    InvalidArguments(String),

    #[error("tool failed: {0}")]
    Failed(String),
}

/// A callable capability the agent may hand to the model.
///
/// Implementations receive the provider's JSON-encoded argument string
/// verbatim and return plain text for the model to read. Failures are fed
/// back to the model as tool output rather than aborting the run, so
/// implementations should produce actionable messages.
#[async_trait]
pub trait Tool: Send + Sync {
    fn name(&self) -> &str;

    fn description(&self) -> &str;

    /// JSON schema describing the arguments object.
    fn parameters(&self) -> serde_json::Value;

    async fn invoke(&self, arguments: &str) -> Result<String, ToolError>;

    fn spec(&self) -> ToolSpec {
        ToolSpec {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}
