use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;

use crate::error::CoreError;
use crate::models::conversation::ConversationHistory;

/// Inbound request body.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatRequest {
    pub message: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub conversation_history: ConversationHistory,
}

impl ChatRequest {
    /// Parse the raw event body.
    ///
    /// The body and every history turn must be JSON objects; derived struct
    /// deserializers would otherwise accept arrays matched by position.
    pub fn from_body(body: &str) -> Result<Self, CoreError> {
        if body.trim().is_empty() {
            return Err(CoreError::MissingBody);
        }

        let value: Value = serde_json::from_str(body)?;
        let Value::Object(fields) = &value else {
            return Err(CoreError::NotAnObject("request body"));
        };
        if let Some(Value::Array(turns)) = fields.get("conversationHistory") {
            if !turns.iter().all(Value::is_object) {
                return Err(CoreError::NotAnObject("conversation turn"));
            }
        }

        Ok(serde_json::from_value(value)?)
    }
}

fn null_as_empty<'de, D>(deserializer: D) -> Result<ConversationHistory, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<ConversationHistory>::deserialize(deserializer)?.unwrap_or_default())
}

/// Success body returned to the caller.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub success: bool,
    pub response: String,
    pub conversation_history: ConversationHistory,
}

impl ChatReply {
    pub fn new(response: String, conversation_history: ConversationHistory) -> Self {
        Self {
            success: true,
            response,
            conversation_history,
        }
    }
}
