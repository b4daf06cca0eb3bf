use nexmo::{Credentials, NexmoClient, ResponseFormat};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let format = std::env::var("NEXMO_FORMAT")
        .map(|name| ResponseFormat::from_name_lenient(&name))
        .unwrap_or_default();

    let client = NexmoClient::builder(Credentials::from_env()?)
        .format(format)
        .build()?;

    match client.get_balance().await {
        Some(body) => println!("{body}"),
        None => println!("request failed"),
    }

    Ok(())
}
