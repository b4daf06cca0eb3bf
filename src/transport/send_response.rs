use serde::Deserialize;

use crate::domain::{SendResponse, SentMessage};

#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("invalid JSON response: {0}")]
    Json(#[from] serde_json::Error),

    #[error("invalid numeric field {field}: {value}")]
    InvalidNumber { field: &'static str, value: String },
}

#[derive(Debug, Clone, Deserialize)]
struct SendJsonResponse {
    #[serde(rename = "message-count")]
    message_count: TransportCount,
    #[serde(default)]
    messages: Vec<SentJsonMessage>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "kebab-case")]
struct SentJsonMessage {
    status: TransportCount,
    #[serde(default)]
    message_id: Option<String>,
    #[serde(default)]
    to: Option<String>,
    #[serde(default)]
    remaining_balance: Option<String>,
    #[serde(default)]
    message_price: Option<String>,
    #[serde(default)]
    network: Option<String>,
    #[serde(default)]
    error_text: Option<String>,
}

/// Nexmo sends counters as JSON strings (`"1"`) but some gateways emit numbers.
#[derive(Debug, Clone, Deserialize)]
#[serde(untagged)]
enum TransportCount {
    Int(u32),
    String(String),
}

impl TransportCount {
    fn into_u32(self, field: &'static str) -> Result<u32, TransportError> {
        match self {
            Self::Int(value) => Ok(value),
            Self::String(value) => value
                .trim()
                .parse::<u32>()
                .map_err(|_| TransportError::InvalidNumber { field, value }),
        }
    }
}

pub fn decode_send_json_response(json: &str) -> Result<SendResponse, TransportError> {
    let parsed: SendJsonResponse = serde_json::from_str(json)?;
    let messages = parsed
        .messages
        .into_iter()
        .map(|message| {
            Ok(SentMessage {
                status: message.status.into_u32("status")?,
                message_id: message.message_id,
                to: message.to,
                remaining_balance: message.remaining_balance,
                message_price: message.message_price,
                network: message.network,
                error_text: message.error_text,
            })
        })
        .collect::<Result<Vec<_>, TransportError>>()?;

    Ok(SendResponse {
        message_count: parsed.message_count.into_u32("message-count")?,
        messages,
    })
}
