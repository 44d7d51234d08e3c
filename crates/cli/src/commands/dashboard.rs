//! `simchat dashboard`: start the wallet dashboard server.

use simchat_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.dashboard.port = port;
    }

    println!("simchat wallet dashboard");
    println!(
        "   Listening: http://{}:{}",
        config.dashboard.host, config.dashboard.port
    );

    simchat_gateway::start_dashboard(config).await?;

    Ok(())
}
