use std::error::Error;

use tracing::Level;

#[tokio::main]
async fn main() -> Result<(), Box<dyn Error>> {
    // Load environment variables from .env file. A missing file is fine,
    // the process environment alone is enough.
    dotenvy::dotenv().ok();

    llm_relay::telemetry::try_init("info", Level::INFO)?;

    api::start().await?;

    Ok(())
}
