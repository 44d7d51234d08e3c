//! `simchat init`: write a default config file.

use simchat_config::AppConfig;

pub fn run(force: bool) -> Result<(), Box<dyn std::error::Error>> {
    let config_path = AppConfig::config_path();

    if config_path.exists() && !force {
        println!("Config already exists at: {}", config_path.display());
        println!("   Edit it manually, or re-run with --force to overwrite.");
        return Ok(());
    }

    if let Some(dir) = config_path.parent() {
        std::fs::create_dir_all(dir)?;
    }
    std::fs::write(&config_path, AppConfig::default_toml())?;

    println!("Created config at: {}", config_path.display());
    println!("\nNext steps:");
    println!("   1. Set SIM_API_KEY and OPENAI_API_KEY (or add them to the file)");
    println!("   2. Optionally set OPENSEA_API_KEY for NFT images on the dashboard");
    println!("   3. Run: simchat chat   or   simchat dashboard");

    Ok(())
}
