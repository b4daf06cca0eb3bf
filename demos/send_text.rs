use std::io;

use nexmo::{Credentials, MessageText, Msisdn, NexmoClient, SendText, TextOptions};
use phonenumber::country;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let to = std::env::var("NEXMO_TO").map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            "NEXMO_TO environment variable is required",
        )
    })?;
    let from = std::env::var("NEXMO_FROM").unwrap_or_else(|_| "NexmoDemo".to_owned());
    let message = std::env::var("NEXMO_MESSAGE")
        .unwrap_or_else(|_| "Hello from the nexmo demo.".to_owned());

    // National numbers are read as UK numbers; international ones need a leading `+`.
    let to = Msisdn::parse(Some(country::Id::GB), &to)?;

    let client = NexmoClient::new(Credentials::from_env()?);
    let request = SendText::new(
        to,
        &from,
        MessageText::new(message)?,
        TextOptions::default(),
    )?;

    match client.send_text(&request).await {
        Some(body) => {
            let response = nexmo::decode_send_response(&body)?;
            for message in &response.messages {
                println!(
                    "status: {}, message_id: {:?}, error: {:?}",
                    message.status, message.message_id, message.error_text
                );
            }
        }
        None => println!("request failed"),
    }

    Ok(())
}
