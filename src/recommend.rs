//! The end-to-end recommendation protocol.
//!
//! One request walks a short linear state machine:
//!
//! ```text
//! Gated → Retrieved → Grounded → (ToolInvoked → Resolved |) → Done
//! ```
//!
//! - **Gated**: profanity pre-check; flagged queries get a fixed decline and
//!   never touch retrieval or the model.
//! - **Retrieved**: vector search for candidate books; zero hits still
//!   proceed with empty context.
//! - **Grounded**: first completion call with the retrieved context and the
//!   summary-lookup tool declared.
//! - **ToolInvoked → Resolved**: if the model requested tool calls, the
//!   first one is resolved against the summary store and a second completion
//!   call (no tools) produces the final text. Exactly one grounded tool
//!   round-trip per request; further calls in the same reply are ignored.
//! - **Done**: assemble the three-field response. The recommended title is
//!   always the top retrieval hit, never parsed from the model's prose.
//!
//! All collaborators are injected, so tests drive the protocol with
//! deterministic fakes.

use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::chat::{ChatCompleter, ChatMessage, ChatReply, ToolSpec, SUMMARY_TOOL_NAME};
use crate::error::LibrisResult;
use crate::index::{CandidateHit, VectorIndex};
use crate::moderation::ModerationGate;
use crate::summaries::SummaryStore;

/// Fixed response text for queries rejected by the moderation gate.
pub const DECLINE_TEXT: &str =
    "Please phrase the question politely. I can still recommend books on any topic.";

const SYSTEM_PROMPT: &str = "You are a helpful librarian. From the context, recommend ONE \
     best-matching book by exact Title, explain briefly why, then call the tool \
     get_summary_by_title with that exact title.";

/// Final response of one request: always this three-field shape, on the
/// soft-failure paths too.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Recommendation {
    /// The model's final text (or the fixed decline text).
    pub assistant: String,
    /// Title of the top retrieval hit; `None` when retrieval found nothing
    /// or the gate declined the query.
    pub recommendation: Option<String>,
    /// Tool-resolved summary text; `None` unless a tool round-trip happened.
    pub summary: Option<String>,
}

/// Orchestrates moderation, retrieval, grounding, and tool resolution.
pub struct Recommender {
    gate: ModerationGate,
    index: VectorIndex,
    store: SummaryStore,
    chat: Arc<dyn ChatCompleter>,
}

impl Recommender {
    pub fn new(
        gate: ModerationGate,
        index: VectorIndex,
        store: SummaryStore,
        chat: Arc<dyn ChatCompleter>,
    ) -> Self {
        Self {
            gate,
            index,
            store,
            chat,
        }
    }

    /// Run one request through the full protocol.
    ///
    /// Upstream failures (embedding, search, completion) propagate; the gate
    /// decline and tool-level NotFound are absorbed into the response shape.
    pub fn recommend(&self, message: &str, top_k: usize) -> LibrisResult<Recommendation> {
        let query = message.trim();

        // Gated.
        if self.gate.contains_profanity(query) {
            info!("query declined by moderation gate");
            return Ok(Recommendation {
                assistant: DECLINE_TEXT.to_string(),
                recommendation: None,
                summary: None,
            });
        }

        // Retrieved.
        let hits = self.index.search(query, top_k)?;
        let top_title = hits.first().map(|h| h.title.clone());

        // Grounded.
        let mut conversation = vec![
            ChatMessage::system(SYSTEM_PROMPT),
            ChatMessage::user(grounding_prompt(query, &hits)),
        ];
        let tools = [ToolSpec::summary_lookup()];
        let first = self.chat.complete(&conversation, Some(&tools))?;

        let mut assistant = reply_text(&first);
        let mut summary = None;

        // ToolInvoked → Resolved. Only the first tool call is authoritative.
        if let Some(call) = first.tool_calls.first() {
            debug!(tool = %call.function.name, id = %call.id, "resolving tool call");
            let result = if call.function.name == SUMMARY_TOOL_NAME {
                self.store.tool_result(call.title_argument().as_deref())
            } else {
                // Undeclared tool name: fail soft so synthesis can proceed.
                self.store.tool_result(None)
            };

            conversation.push(ChatMessage::assistant_reply(&first));
            conversation.push(ChatMessage::tool_result(call.id.clone(), result.clone()));

            let second = self.chat.complete(&conversation, None)?;
            assistant = reply_text(&second);
            summary = Some(result);
        }

        // Done.
        Ok(Recommendation {
            assistant,
            recommendation: top_title,
            summary,
        })
    }
}

fn reply_text(reply: &ChatReply) -> String {
    reply.content.as_deref().unwrap_or("").trim().to_string()
}

/// User-role message embedding the query and the serialized context block,
/// hits in retrieval order. No hits → an explicit empty-context marker so
/// the model can still answer generically.
fn grounding_prompt(query: &str, hits: &[CandidateHit]) -> String {
    let context = if hits.is_empty() {
        "(no matching books found)".to_string()
    } else {
        hits.iter()
            .map(|h| format!("Title: {}\nSummary: {}", h.title, h.summary))
            .collect::<Vec<_>>()
            .join("\n\n")
    };
    format!("User query: {query}\n\nContext:\n{context}")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn hit(title: &str) -> CandidateHit {
        CandidateHit {
            title: title.into(),
            summary: format!("summary of {title}"),
            distance: 0.2,
        }
    }

    #[test]
    fn grounding_prompt_lists_hits_in_order() {
        let prompt = grounding_prompt("desert epic", &[hit("Dune"), hit("The Road")]);
        assert!(prompt.starts_with("User query: desert epic"));
        let dune = prompt.find("Title: Dune").unwrap();
        let road = prompt.find("Title: The Road").unwrap();
        assert!(dune < road);
        assert!(prompt.contains("Summary: summary of Dune"));
    }

    #[test]
    fn grounding_prompt_marks_empty_context() {
        let prompt = grounding_prompt("anything", &[]);
        assert!(prompt.contains("(no matching books found)"));
    }

    #[test]
    fn reply_text_trims_and_defaults_empty() {
        assert_eq!(
            reply_text(&ChatReply {
                content: Some("  Read Dune.  ".into()),
                tool_calls: vec![],
            }),
            "Read Dune."
        );
        assert_eq!(reply_text(&ChatReply::default()), "");
    }
}
