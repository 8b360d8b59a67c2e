//! The agent loop: model + instructions + tools, driven to a text answer.

use std::sync::Arc;

use crate::tool::Tool;
use crate::traits::{ChatMessage, ChatModel, ChatRequest, LlmError};

const DEFAULT_MAX_TOOL_ROUNDS: usize = 8;

#[derive(thiserror::Error, Debug)]
pub enum AgentError {
    #[error(transparent)]
    Model(#[from] LlmError),

    #[error("model requested unknown tool: {0}")]
    UnknownTool(String),

    #[error("tool budget exhausted after {0} rounds")]
    ToolBudgetExhausted(usize),
}

/// The agent's final textual output.
#[derive(Debug, Clone)]
pub struct AgentReply {
    pub text: String,
    pub model: Option<String>,
}

/// An agent pairs a chat model with a fixed instruction set and zero or
/// more tools. [`Agent::run`] sends the request, executes any tool calls
/// the model asks for, and returns the first plain text answer.
pub struct Agent {
    model: Arc<dyn ChatModel>,
    instructions: String,
    tools: Vec<Arc<dyn Tool>>,
    max_tool_rounds: usize,
    temperature: Option<f32>,
    max_tokens: Option<u32>,
}

impl Agent {
    pub fn new(model: Arc<dyn ChatModel>, instructions: String) -> Self {
        Self {
            model,
            instructions,
            tools: Vec::new(),
            max_tool_rounds: DEFAULT_MAX_TOOL_ROUNDS,
            temperature: None,
            max_tokens: None,
        }
    }

    pub fn with_tool(mut self, tool: Arc<dyn Tool>) -> Self {
        self.tools.push(tool);
        self
    }

    pub fn with_temperature(mut self, temperature: f32) -> Self {
        self.temperature = Some(temperature);
        self
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }

    pub fn with_max_tool_rounds(mut self, rounds: usize) -> Self {
        self.max_tool_rounds = rounds;
        self
    }

    /// Drive the conversation until the model produces a text answer.
    ///
    /// Tool failures are reported back to the model in-band so it can
    /// recover or answer without the tool; only model/provider failures and
    /// unknown tool names abort the run.
    pub async fn run(&self, request: &str) -> Result<AgentReply, AgentError> {
        let mut messages = vec![
            ChatMessage::system(self.instructions.clone()),
            ChatMessage::user(request),
        ];
        let specs: Vec<_> = self.tools.iter().map(|t| t.spec()).collect();

        for round in 0..=self.max_tool_rounds {
            let turn = self
                .model
                .complete(&ChatRequest {
                    messages: messages.clone(),
                    tools: specs.clone(),
                    temperature: self.temperature,
                    max_tokens: self.max_tokens,
                })
                .await?;

            if turn.tool_calls.is_empty() {
                let text = turn.text.unwrap_or_default();
                tracing::debug!(
                    rounds = round,
                    chars = text.len(),
                    "agent.run.finished"
                );
                return Ok(AgentReply {
                    text,
                    model: turn.model,
                });
            }

            tracing::debug!(
                round,
                calls = turn.tool_calls.len(),
                "agent.run.tool_round"
            );

            messages.push(ChatMessage::assistant_with_tools(
                turn.text.clone(),
                turn.tool_calls.clone(),
            ));

            for call in &turn.tool_calls {
                let tool = self
                    .tools
                    .iter()
                    .find(|t| t.name() == call.name)
                    .ok_or_else(|| AgentError::UnknownTool(call.name.clone()))?;

                let output = match tool.invoke(&call.arguments).await {
                    Ok(text) => text,
                    Err(e) => {
                        tracing::warn!(tool = %call.name, error = %e, "agent.tool_failed");
                        format!("tool error: {e}")
                    }
                };
                messages.push(ChatMessage::tool_result(call.id.clone(), output));
            }
        }

        Err(AgentError::ToolBudgetExhausted(self.max_tool_rounds))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tool::ToolError;
    use crate::traits::{ModelTurn, ToolCall};
    use async_trait::async_trait;
    use std::collections::VecDeque;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedModel {
        turns: Mutex<VecDeque<ModelTurn>>,
    }

    impl ScriptedModel {
        fn new(turns: Vec<ModelTurn>) -> Self {
            Self {
                turns: Mutex::new(turns.into()),
            }
        }
    }

    #[async_trait]
    impl ChatModel for ScriptedModel {
        async fn complete(&self, _request: &ChatRequest) -> Result<ModelTurn, LlmError> {
            self.turns
                .lock()
                .unwrap()
                .pop_front()
                .ok_or_else(|| LlmError::Api("script exhausted".into()))
        }

        fn model_name(&self) -> &str {
            "scripted"
        }
    }

    struct RecordingTool {
        calls: AtomicUsize,
        fail: bool,
    }

    #[async_trait]
    impl Tool for RecordingTool {
        fn name(&self) -> &str {
            "fetch_video_data"
        }

        fn description(&self) -> &str {
            "test tool"
        }

        fn parameters(&self) -> serde_json::Value {
            serde_json::json!({ "type": "object" })
        }

        async fn invoke(&self, arguments: &str) -> Result<String, ToolError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            if self.fail {
                return Err(ToolError::Failed("boom".into()));
            }
            Ok(format!("data for {arguments}"))
        }
    }

    fn text_turn(text: &str) -> ModelTurn {
        ModelTurn {
            text: Some(text.to_string()),
            tool_calls: Vec::new(),
            model: Some("scripted".into()),
        }
    }

    fn tool_turn(name: &str) -> ModelTurn {
        ModelTurn {
            text: None,
            tool_calls: vec![ToolCall {
                id: "call-1".into(),
                name: name.into(),
                arguments: r#"{"video_url":"https://youtu.be/abc"}"#.into(),
            }],
            model: None,
        }
    }

    #[tokio::test]
    async fn returns_direct_text_answer() {
        let model = Arc::new(ScriptedModel::new(vec![text_turn("## Report")]));
        let agent = Agent::new(model, "instructions".into());

        let reply = agent.run("Analyze this video: x").await.unwrap();
        assert_eq!(reply.text, "## Report");
    }

    #[tokio::test]
    async fn executes_tool_round_then_answers() {
        let model = Arc::new(ScriptedModel::new(vec![
            tool_turn("fetch_video_data"),
            text_turn("## Report with data"),
        ]));
        let tool = Arc::new(RecordingTool {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let agent = Agent::new(model, "instructions".into()).with_tool(tool.clone());

        let reply = agent.run("Analyze this video: x").await.unwrap();
        assert_eq!(reply.text, "## Report with data");
        assert_eq!(tool.calls.load(Ordering::SeqCst), 1);
    }

    #[tokio::test]
    async fn tool_failure_is_fed_back_not_fatal() {
        let model = Arc::new(ScriptedModel::new(vec![
            tool_turn("fetch_video_data"),
            text_turn("## Report without transcript"),
        ]));
        let tool = Arc::new(RecordingTool {
            calls: AtomicUsize::new(0),
            fail: true,
        });
        let agent = Agent::new(model, "instructions".into()).with_tool(tool);

        let reply = agent.run("Analyze this video: x").await.unwrap();
        assert_eq!(reply.text, "## Report without transcript");
    }

    #[tokio::test]
    async fn unknown_tool_aborts_the_run() {
        let model = Arc::new(ScriptedModel::new(vec![tool_turn("rm_rf")]));
        let agent = Agent::new(model, "instructions".into());

        let err = agent.run("x").await.unwrap_err();
        assert!(matches!(err, AgentError::UnknownTool(name) if name == "rm_rf"));
    }

    #[tokio::test]
    async fn tool_budget_is_bounded() {
        let turns = (0..4).map(|_| tool_turn("fetch_video_data")).collect();
        let model = Arc::new(ScriptedModel::new(turns));
        let tool = Arc::new(RecordingTool {
            calls: AtomicUsize::new(0),
            fail: false,
        });
        let agent = Agent::new(model, "instructions".into())
            .with_tool(tool)
            .with_max_tool_rounds(3);

        let err = agent.run("x").await.unwrap_err();
        assert!(matches!(err, AgentError::ToolBudgetExhausted(3)));
    }
}
