//! Webhook handling: validate Nexmo callbacks and notify registered observers.
//!
//! The host HTTP server collects the query and form parameters of a callback request
//! and hands them to [`WebhookHandler`]. Nexmo expects a success response regardless
//! of the outcome, so malformed payloads are logged and dropped instead of failing.
//!
//! ```rust
//! use nexmo::{WebhookHandler, WebhookParams};
//!
//! let mut handler = WebhookHandler::new();
//! handler.on_delivery(|receipt| println!("{} -> {:?}", receipt.message_id(), receipt.status()));
//!
//! let params = WebhookParams::from_encoded(
//!     "msisdn=447700900001&network-code=23410&messageId=0A00&status=DELIVERED",
//!     "",
//! );
//! assert!(handler.handle_delivery(&params).is_some());
//! ```

use std::fmt;

use crate::domain::{DeliveryReceipt, InboundMessage, WebhookParams};

type DeliveryObserver = Box<dyn Fn(&DeliveryReceipt) + Send + Sync>;
type InboundObserver = Box<dyn Fn(&InboundMessage) + Send + Sync>;

#[derive(Default)]
/// Dispatches validated webhook payloads to registered observers.
pub struct WebhookHandler {
    delivery_observers: Vec<DeliveryObserver>,
    inbound_observers: Vec<InboundObserver>,
}

impl WebhookHandler {
    /// Handler without observers.
    pub fn new() -> Self {
        Self::default()
    }

    /// Register a callback invoked for every valid delivery receipt.
    pub fn on_delivery<F>(&mut self, observer: F) -> &mut Self
    where
        F: Fn(&DeliveryReceipt) + Send + Sync + 'static,
    {
        self.delivery_observers.push(Box::new(observer));
        self
    }

    /// Register a callback invoked for every valid inbound message.
    pub fn on_inbound<F>(&mut self, observer: F) -> &mut Self
    where
        F: Fn(&InboundMessage) + Send + Sync + 'static,
    {
        self.inbound_observers.push(Box::new(observer));
        self
    }

    /// Process a delivery callback. Returns the receipt when the payload was valid.
    pub fn handle_delivery(&self, params: &WebhookParams) -> Option<DeliveryReceipt> {
        let Some(receipt) = DeliveryReceipt::parse(params) else {
            tracing::info!(
                "nexmo webhook: invalid delivery call, missing one of {:?}",
                DeliveryReceipt::REQUIRED
            );
            return None;
        };

        tracing::debug!(
            "nexmo webhook: receipt for message {} status={:?}",
            receipt.message_id(),
            receipt.status()
        );
        for observer in &self.delivery_observers {
            observer(&receipt);
        }
        Some(receipt)
    }

    /// Process an inbound message callback. Returns the message when the payload was valid.
    pub fn handle_inbound(&self, params: &WebhookParams) -> Option<InboundMessage> {
        let Some(message) = InboundMessage::parse(params) else {
            tracing::info!(
                "nexmo webhook: invalid inbound call, missing one of {:?}",
                InboundMessage::REQUIRED
            );
            return None;
        };

        tracing::debug!(
            "nexmo webhook: inbound message from={} text_len={}",
            message.from(),
            message.text().len()
        );
        for observer in &self.inbound_observers {
            observer(&message);
        }
        Some(message)
    }
}

impl fmt::Debug for WebhookHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WebhookHandler")
            .field("delivery_observers", &self.delivery_observers.len())
            .field("inbound_observers", &self.inbound_observers.len())
            .finish()
    }
}
