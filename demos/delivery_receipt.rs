use std::io::Read;

use nexmo::{WebhookHandler, WebhookParams};

/// Reads a query string from the first argument and a form body from stdin, as a
/// CGI-style delivery callback would receive them.
fn main() -> Result<(), Box<dyn std::error::Error>> {
    let query = std::env::args().nth(1).unwrap_or_default();
    let mut body = String::new();
    std::io::stdin().read_to_string(&mut body)?;

    let mut handler = WebhookHandler::new();
    handler.on_delivery(|receipt| {
        println!(
            "message {} to {}: {:?} {}",
            receipt.message_id(),
            receipt.to(),
            receipt.status(),
            receipt.error_message()
        );
    });

    if handler
        .handle_delivery(&WebhookParams::from_encoded(&query, &body))
        .is_none()
    {
        eprintln!("not a delivery receipt");
    }
    Ok(())
}
