//! `copymill init` — Write a starter config file.

use copymill_config::AppConfig;

pub async fn run() -> Result<(), Box<dyn std::error::Error>> {
    let config_dir = AppConfig::config_dir();
    let config_path = config_dir.join("config.toml");

    if config_path.exists() {
        println!("Config already exists at {}", config_path.display());
        println!("Edit it directly, or delete it and run `copymill init` again.");
        return Ok(());
    }

    std::fs::create_dir_all(&config_dir)?;
    std::fs::write(&config_path, AppConfig::default_toml())?;

    println!("Wrote starter config to {}", config_path.display());
    println!();
    println!("Next steps:");
    println!("  1. Set your API key:");
    println!("       export COPYMILL_API_KEY='sk-...'   (or OPENAI_API_KEY)");
    println!("     or add api_key to the config file.");
    println!("  2. Generate your first copy:");
    println!("       copymill generate --business \"GreenSoap\" \\");
    println!("         --features \"organic, cruelty-free\" \\");
    println!("         --customer \"women 20-30\" --channel instagram");

    Ok(())
}
