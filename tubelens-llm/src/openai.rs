//! OpenAI-compatible chat-completions client.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tubelens_http::{Auth, HttpClient, HttpError, RequestOpts};

use crate::traits::{ChatMessage, ChatModel, ChatRequest, LlmError, ModelTurn, Role, ToolCall};

pub const OPENAI_API_BASE: &str = "https://api.openai.com/v1/";

/// Chat-completions client for OpenAI and API-compatible gateways.
///
/// Transport retries default to zero: a triggered analysis runs the model
/// call exactly once and surfaces any failure to the caller.
pub struct OpenAiChatModel {
    client: HttpClient,
    api_key: String,
    model: String,
    transport_retries: usize,
}

impl OpenAiChatModel {
    /// Create a client for the given API key and model against the default
    /// OpenAI endpoint.
    pub fn new(api_key: String, model: String) -> Result<Self, LlmError> {
        Self::with_base(OPENAI_API_BASE, api_key, model)
    }

    /// Create a client against a compatible endpoint. `base` must end with
    /// a trailing slash for relative paths to resolve under it.
    pub fn with_base(base: &str, api_key: String, model: String) -> Result<Self, LlmError> {
        let client = HttpClient::new(base)
            .map_err(|e| LlmError::Config(format!("HttpClient init failed: {e}")))?;
        Ok(Self {
            client,
            api_key,
            model,
            transport_retries: 0,
        })
    }
}

#[derive(Serialize)]
struct WireRequest<'a> {
    model: &'a str,
    messages: Vec<WireMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<Vec<WireTool<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Serialize)]
struct WireMessage<'a> {
    role: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    content: Option<&'a str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_calls: Option<Vec<WireToolCall<'a>>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_call_id: Option<&'a str>,
}

#[derive(Serialize)]
struct WireToolCall<'a> {
    id: &'a str,
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionCall<'a>,
}

#[derive(Serialize)]
struct WireFunctionCall<'a> {
    name: &'a str,
    arguments: &'a str,
}

#[derive(Serialize)]
struct WireTool<'a> {
    #[serde(rename = "type")]
    kind: &'static str,
    function: WireFunctionDecl<'a>,
}

#[derive(Serialize)]
struct WireFunctionDecl<'a> {
    name: &'a str,
    description: &'a str,
    parameters: &'a serde_json::Value,
}

#[derive(Debug, Deserialize)]
struct WireResponse {
    #[serde(default)]
    model: Option<String>,
    #[serde(default)]
    choices: Vec<WireChoice>,
}

#[derive(Debug, Deserialize)]
struct WireChoice {
    message: WireReplyMessage,
}

#[derive(Debug, Deserialize)]
struct WireReplyMessage {
    #[serde(default)]
    content: Option<String>,
    #[serde(default)]
    tool_calls: Option<Vec<WireReplyToolCall>>,
}

#[derive(Debug, Deserialize)]
struct WireReplyToolCall {
    id: String,
    function: WireReplyFunction,
}

#[derive(Debug, Deserialize)]
struct WireReplyFunction {
    name: String,
    /// JSON string, passed through verbatim.
    arguments: String,
}

fn encode_message(msg: &ChatMessage) -> WireMessage<'_> {
    let role = match msg.role {
        Role::System => "system",
        Role::User => "user",
        Role::Assistant => "assistant",
        Role::Tool => "tool",
    };
    let tool_calls = if msg.tool_calls.is_empty() {
        None
    } else {
        Some(
            msg.tool_calls
                .iter()
                .map(|tc| WireToolCall {
                    id: &tc.id,
                    kind: "function",
                    function: WireFunctionCall {
                        name: &tc.name,
                        arguments: &tc.arguments,
                    },
                })
                .collect(),
        )
    };
    WireMessage {
        role,
        content: msg.content.as_deref(),
        tool_calls,
        tool_call_id: msg.tool_call_id.as_deref(),
    }
}

#[async_trait]
impl ChatModel for OpenAiChatModel {
    async fn complete(&self, request: &ChatRequest) -> Result<ModelTurn, LlmError> {
        let tools = if request.tools.is_empty() {
            None
        } else {
            Some(
                request
                    .tools
                    .iter()
                    .map(|t| WireTool {
                        kind: "function",
                        function: WireFunctionDecl {
                            name: &t.name,
                            description: &t.description,
                            parameters: &t.parameters,
                        },
                    })
                    .collect(),
            )
        };

        let wire = WireRequest {
            model: &self.model,
            messages: request.messages.iter().map(encode_message).collect(),
            tools,
            temperature: request.temperature,
            max_tokens: request.max_tokens,
        };

        let resp: WireResponse = self
            .client
            .post_json(
                "chat/completions",
                &wire,
                RequestOpts {
                    auth: Some(Auth::Bearer(&self.api_key)),
                    retries: Some(self.transport_retries),
                    ..Default::default()
                },
            )
            .await
            .map_err(http_to_llm)?;

        let choice = resp
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| LlmError::Malformed("no choices in response".into()))?;

        let tool_calls = choice
            .message
            .tool_calls
            .unwrap_or_default()
            .into_iter()
            .map(|tc| ToolCall {
                id: tc.id,
                name: tc.function.name,
                arguments: tc.function.arguments,
            })
            .collect();

        Ok(ModelTurn {
            text: choice.message.content,
            tool_calls,
            model: resp.model,
        })
    }

    fn model_name(&self) -> &str {
        &self.model
    }
}

fn http_to_llm(e: HttpError) -> LlmError {
    match e {
        HttpError::Network(m) => LlmError::Network(m),
        HttpError::Api { status, message } => LlmError::Api(format!("{status}: {message}")),
        HttpError::Decode(m, snippet) => LlmError::Malformed(format!("{m} ({snippet})")),
        HttpError::Url(m) | HttpError::Build(m) => LlmError::Config(m),
    }
}
