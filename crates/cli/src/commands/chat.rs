//! `simchat chat`: start the chat server.

use simchat_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.chat.port = port;
    }

    println!("simchat chat server");
    println!("   Listening: http://{}:{}", config.chat.host, config.chat.port);
    println!("   Model:     {} (follow-up: {})", config.completion.model, config.completion.followup_model);

    simchat_gateway::start_chat(config).await?;

    Ok(())
}
