use anyhow::Result;
use serde_json::Value;
use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::content::Content;
use crate::models::message::{Message, ToolRequest};
use crate::models::tool::Tool;
use crate::prompt_template::load_prompt_file;
use crate::providers::base::Provider;
use crate::store::query::{self, QUERY_TOOL};
use crate::store::schema;
use crate::store::Store;

/// How a turn failed, which decides what happens to the session state.
///
/// `Protocol` aborts the turn and keeps history as appended so far;
/// `Provider` discards history back to the seed system message, since a
/// half-recorded tool exchange cannot be safely continued from.
#[derive(Debug, Error)]
pub enum TurnError {
    #[error("the model sent an unusable tool call: {0}")]
    Protocol(String),

    #[error("model request failed: {0}")]
    Provider(anyhow::Error),
}

/// One user session: the conversation loop plus everything it owns.
///
/// The session holds its own message history, store handle, and model
/// client; nothing is shared process-wide, so a multi-user deployment
/// constructs one `Session` per user. History is append-only within a
/// session and lives only in memory.
pub struct Session {
    provider: Box<dyn Provider>,
    store: Box<dyn Store>,
    schema_text: String,
    tool: Tool,
    messages: Vec<Message>,
}

impl Session {
    /// Introspect the store schema and seed the conversation.
    ///
    /// The schema is captured once here and never refreshed; an unreachable
    /// store is a fatal error since the assistant has no fallback schema.
    pub async fn new(provider: Box<dyn Provider>, store: Box<dyn Store>) -> Result<Self> {
        let entries = schema::describe_schema(store.as_ref()).await?;
        let schema_text = schema::render_schema(&entries);
        let tool = query::query_tool(&schema_text);

        let mut context = HashMap::new();
        context.insert("schema", schema_text.clone());
        let instructions = load_prompt_file("system.md", &context)?;

        Ok(Session {
            provider,
            store,
            schema_text,
            tool,
            messages: vec![Message::system().with_text(instructions)],
        })
    }

    /// The schema text shown to the model, for front ends to display
    pub fn schema_text(&self) -> &str {
        &self.schema_text
    }

    pub fn messages(&self) -> &[Message] {
        &self.messages
    }

    /// Re-seed history to the single system message
    pub fn reset(&mut self) {
        self.messages.truncate(1);
    }

    /// Run one full turn: user text in, final assistant text out.
    ///
    /// Returns the messages appended beyond the user message (a single
    /// direct reply, or the tool request, its result, and the final reply)
    /// so the front end can render the exchange as it happened.
    pub async fn reply(&mut self, user_text: &str) -> Result<Vec<Message>, TurnError> {
        self.messages.push(Message::user().with_text(user_text));

        let tools = std::slice::from_ref(&self.tool);
        let (response, _usage) = match self.provider.complete(&self.messages, tools).await {
            Ok(reply) => reply,
            Err(e) => return Err(self.discard(e)),
        };

        let requests: Vec<ToolRequest> = response
            .content
            .iter()
            .filter_map(|content| content.as_tool_request())
            .cloned()
            .collect();

        // No tool call: the model's text is the final answer
        let Some(request) = requests.first() else {
            self.messages.push(response.clone());
            return Ok(vec![response]);
        };

        if requests.len() > 1 {
            // Known constraint: only the first of multiple simultaneous
            // tool calls is honored
            debug!(
                dropped = requests.len() - 1,
                "response carried multiple tool calls; honoring the first"
            );
        }

        // A protocol mismatch aborts the turn before any tool exchange is
        // recorded; the user message already appended stays in history
        let call = match &request.tool_call {
            Ok(call) => call.clone(),
            Err(e) => return Err(TurnError::Protocol(e.to_string())),
        };
        if call.name != QUERY_TOOL {
            return Err(TurnError::Protocol(format!(
                "unknown function '{}'",
                call.name
            )));
        }
        let Some(raw_query) = call.arguments.get("query").and_then(Value::as_str) else {
            return Err(TurnError::Protocol(
                "the 'query' argument is missing".to_string(),
            ));
        };

        let result = query::execute(self.store.as_ref(), raw_query).await;

        let request_message =
            Message::assistant().with_tool_request(request.id.clone(), Ok(call.clone()));
        let result_message = Message::user()
            .with_tool_response(request.id.clone(), Ok(vec![Content::text(result)]));
        self.messages.push(request_message.clone());
        self.messages.push(result_message.clone());

        // Second call resolves the tool result into the final answer, so
        // the tool is withheld this time
        let (final_message, _usage) = match self.provider.complete(&self.messages, &[]).await {
            Ok(reply) => reply,
            Err(e) => return Err(self.discard(e)),
        };
        self.messages.push(final_message.clone());

        Ok(vec![request_message, result_message, final_message])
    }

    /// A backend failure mid-turn leaves history in an unknown state
    /// (possibly a dangling tool exchange), so the whole conversation is
    /// discarded rather than rolled back piecemeal.
    fn discard(&mut self, e: anyhow::Error) -> TurnError {
        warn!(error = %e, "model call failed; discarding conversation history");
        self.reset();
        TurnError::Provider(e)
    }
}
