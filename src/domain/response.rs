#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SendResponse {
    pub message_count: u32,
    pub messages: Vec<SentMessage>,
}

impl SendResponse {
    /// `true` when every message part was accepted (`status == 0`).
    pub fn all_accepted(&self) -> bool {
        !self.messages.is_empty() && self.messages.iter().all(SentMessage::is_accepted)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub status: u32,
    pub message_id: Option<String>,
    pub to: Option<String>,
    pub remaining_balance: Option<String>,
    pub message_price: Option<String>,
    pub network: Option<String>,
    pub error_text: Option<String>,
}

impl SentMessage {
    pub fn is_accepted(&self) -> bool {
        self.status == 0
    }
}
