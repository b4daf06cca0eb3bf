//! Typed Rust client and webhook parser for the Nexmo SMS REST API.
//!
//! The crate is split into a domain layer of strong types (sender normalization,
//! encoding detection, webhook payloads), a transport layer for wire-format details,
//! and a small client layer issuing the HTTP calls.
//!
//! ```rust,no_run
//! use nexmo::{Credentials, MessageText, Msisdn, NexmoClient, SendText, TextOptions};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), nexmo::NexmoError> {
//!     let client = NexmoClient::new(Credentials::new("key", "secret")?);
//!     let request = SendText::new(
//!         Msisdn::new("447525856424")?,
//!         "MyCompany20",
//!         MessageText::new("hello")?,
//!         TextOptions::default(),
//!     )?;
//!     if let Some(body) = client.send_text(&request).await {
//!         let response = nexmo::decode_send_response(&body)?;
//!         println!("accepted: {}", response.all_accepted());
//!     }
//!     Ok(())
//! }
//! ```
#![forbid(unsafe_code)]

pub mod cache;
pub mod client;
pub mod domain;
mod transport;
pub mod webhook;

pub use cache::{CacheKey, NoCache, ResponseCache, TtlCache};
pub use client::{
    Credentials, DEFAULT_TIMEOUT, NexmoClient, NexmoClientBuilder, NexmoError,
    decode_send_response,
};
pub use domain::{
    ApiKey, ApiSecret, CountryCode, DeliveryErrorCode, DeliveryReceipt, DeliveryStatus,
    InboundMessage, MessageEncoding, MessageId, MessageIds, MessageText, Msisdn, Originator,
    PushWap, ResponseFormat, SendBinary, SendResponse, SendText, SentMessage, TextOptions,
    ValidationError, WapTitle, WapUrl, WapValidity, WebhookParams, ensure_utf8,
};
pub use webhook::WebhookHandler;
