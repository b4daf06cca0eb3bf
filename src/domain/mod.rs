//! Domain layer: strong types with validation and invariants (no I/O).

mod request;
mod response;
mod validation;
mod value;
mod webhook;

pub use request::{MessageIds, PushWap, SEARCH_MESSAGES_MAX_IDS, SendBinary, SendText, TextOptions};
pub use response::{SendResponse, SentMessage};
pub use validation::ValidationError;
pub use value::{
    ApiKey, ApiSecret, CountryCode, MessageEncoding, MessageId, MessageText, Msisdn, Originator,
    ResponseFormat, WapTitle, WapUrl, WapValidity, ensure_utf8,
};
pub use webhook::{
    DeliveryErrorCode, DeliveryReceipt, DeliveryStatus, InboundMessage, WebhookParams,
};
