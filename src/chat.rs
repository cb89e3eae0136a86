//! Chat-completion wire types and client.
//!
//! Message and tool-call shapes follow the OpenAI chat-completions format so
//! the assistant's tool-call message can be appended back into the
//! conversation verbatim, with each tool-result message echoing the
//! originating call's correlation id. The provider is a black box behind
//! [`ChatCompleter`].

use std::time::Duration;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::config::LibrisConfig;
use crate::error::CompletionError;

const CHAT_TIMEOUT: Duration = Duration::from_secs(60);

/// Name of the single tool declared to the model.
pub const SUMMARY_TOOL_NAME: &str = "get_summary_by_title";

// ---------------------------------------------------------------------------
// Messages
// ---------------------------------------------------------------------------

/// One role-tagged message in the per-request conversation.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    /// Present only on an assistant message that requested tool calls.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_calls: Option<Vec<ToolCall>>,
    /// Present only on a tool-result message; echoes the originating call id.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tool_call_id: Option<String>,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".into(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".into(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: None,
        }
    }

    /// The assistant's reply carried back into the conversation verbatim,
    /// tool-call requests included.
    pub fn assistant_reply(reply: &ChatReply) -> Self {
        Self {
            role: "assistant".into(),
            content: reply.content.clone(),
            tool_calls: if reply.tool_calls.is_empty() {
                None
            } else {
                Some(reply.tool_calls.clone())
            },
            tool_call_id: None,
        }
    }

    /// A tool-result message correlated to the call that requested it.
    pub fn tool_result(call_id: impl Into<String>, content: impl Into<String>) -> Self {
        Self {
            role: "tool".into(),
            content: Some(content.into()),
            tool_calls: None,
            tool_call_id: Some(call_id.into()),
        }
    }
}

/// A structured tool invocation requested by the model.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Opaque correlation token issued by the provider.
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    pub function: FunctionCall,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FunctionCall {
    pub name: String,
    /// JSON-encoded argument payload, expected to contain `title`.
    pub arguments: String,
}

impl ToolCall {
    /// Extract the `title` argument, if the payload is well-formed JSON with
    /// a string `title` field. Anything else is a protocol violation handled
    /// softly by the caller.
    pub fn title_argument(&self) -> Option<String> {
        let parsed: Value = serde_json::from_str(&self.function.arguments).ok()?;
        parsed.get("title")?.as_str().map(str::to_string)
    }
}

// ---------------------------------------------------------------------------
// Tool declaration
// ---------------------------------------------------------------------------

/// A tool offered to the model on the first completion call.
#[derive(Debug, Clone, Serialize)]
pub struct ToolSpec {
    #[serde(rename = "type")]
    kind: &'static str,
    function: FunctionSpec,
}

#[derive(Debug, Clone, Serialize)]
struct FunctionSpec {
    name: &'static str,
    description: &'static str,
    parameters: Value,
}

impl ToolSpec {
    /// The exact-title summary lookup, the only tool this system declares.
    pub fn summary_lookup() -> Self {
        Self {
            kind: "function",
            function: FunctionSpec {
                name: SUMMARY_TOOL_NAME,
                description: "Return the full summary for an exact book title.",
                parameters: serde_json::json!({
                    "type": "object",
                    "properties": {
                        "title": {
                            "type": "string",
                            "description": "Exact book title"
                        }
                    },
                    "required": ["title"]
                }),
            },
        }
    }
}

/// What came back from one completion call.
#[derive(Debug, Clone, Default)]
pub struct ChatReply {
    pub content: Option<String>,
    pub tool_calls: Vec<ToolCall>,
}

/// Black-box completion function: `complete(messages, tools?) -> reply`.
///
/// When `tools` is `Some`, tool choice is left to the model's discretion;
/// it may reply with plain text, tool calls, or both.
pub trait ChatCompleter: Send + Sync {
    fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolSpec]>,
    ) -> Result<ChatReply, CompletionError>;
}

// ---------------------------------------------------------------------------
// OpenAI-compatible client
// ---------------------------------------------------------------------------

#[derive(Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    #[serde(skip_serializing_if = "Option::is_none")]
    tools: Option<&'a [ToolSpec]>,
    #[serde(skip_serializing_if = "Option::is_none")]
    tool_choice: Option<&'static str>,
}

#[derive(Deserialize)]
struct CompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
    #[serde(default)]
    tool_calls: Vec<ToolCall>,
}

/// Live chat client for an OpenAI-compatible endpoint.
pub struct OpenAiChat {
    base: String,
    api_key: String,
    model: String,
}

impl OpenAiChat {
    pub fn new(config: &LibrisConfig) -> Self {
        Self {
            base: config.openai_base.trim_end_matches('/').to_string(),
            api_key: config.api_key.clone(),
            model: config.chat_model.clone(),
        }
    }
}

impl ChatCompleter for OpenAiChat {
    fn complete(
        &self,
        messages: &[ChatMessage],
        tools: Option<&[ToolSpec]>,
    ) -> Result<ChatReply, CompletionError> {
        let url = format!("{}/chat/completions", self.base);
        let body = CompletionRequest {
            model: &self.model,
            messages,
            tools,
            tool_choice: tools.map(|_| "auto"),
        };

        let response = ureq::post(&url)
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .timeout(CHAT_TIMEOUT)
            .send_json(&body)
            .map_err(|e| CompletionError::RequestFailed {
                message: e.to_string(),
            })?;

        let parsed: CompletionResponse =
            response
                .into_json()
                .map_err(|e| CompletionError::MalformedReply {
                    message: e.to_string(),
                })?;

        let choice = parsed
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| CompletionError::MalformedReply {
                message: "response had no choices".into(),
            })?;

        Ok(ChatReply {
            content: choice.message.content,
            tool_calls: choice.message.tool_calls,
        })
    }
}
