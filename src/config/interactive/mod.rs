
use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input};

use super::{ChatConfig, Config};

#[inline]
pub fn run_interactive_config() -> Result<()> {
    eprintln!("{}", style("🔧 Gridwatch Configuration Setup").bold().cyan());
    eprintln!();

    let mut config = load_existing_config()?;

    eprintln!("{}", style("Chat Service").bold().yellow());
    eprintln!("Configure the DeepSeek-compatible chat completion endpoint.");
    eprintln!();

    configure_chat(&mut config.chat)?;

    eprintln!();
    eprintln!("{}", style("Retrieval").bold().yellow());

    config.retrieval.top_k = Input::new()
        .with_prompt("Chunks retrieved per question (top_k)")
        .default(config.retrieval.top_k)
        .interact_text()?;

    eprintln!();
    eprintln!("{}", style("Paths").bold().yellow());

    let docs_dir: String = Input::new()
        .with_prompt("Documents directory")
        .default(config.paths.docs_dir.display().to_string())
        .interact_text()?;
    config.paths.docs_dir = docs_dir.into();

    let index_dir: String = Input::new()
        .with_prompt("Index directory")
        .default(config.paths.index_dir.display().to_string())
        .interact_text()?;
    config.paths.index_dir = index_dir.into();

    eprintln!();
    if config.chat.resolve_api_key().is_none() {
        eprintln!(
            "{}",
            style("⚠ No API key configured; the assistant will show setup instructions until DEEPSEEK_API_KEY is set.")
                .yellow()
        );
        eprintln!();
    }

    if Confirm::new()
        .with_prompt("Save configuration?")
        .default(true)
        .interact()?
    {
        config.save().context("Failed to save configuration")?;
        eprintln!("{}", style("✓ Configuration saved successfully!").green());

        let config_path = Config::config_file_path().context("Failed to get config file path")?;
        eprintln!(
            "Configuration saved to: {}",
            style(config_path.display()).cyan()
        );
    } else {
        eprintln!("Configuration not saved.");
    }

    Ok(())
}

#[inline]
pub fn show_config() -> Result<()> {
    let config = Config::load().context("Failed to load configuration")?;

    eprintln!("{}", style("📋 Current Configuration").bold().cyan());
    eprintln!();

    eprintln!("{}", style("Chat Settings:").bold().yellow());
    eprintln!("  Base URL: {}", style(&config.chat.base_url).cyan());
    eprintln!("  Model: {}", style(&config.chat.model).cyan());
    match config.chat.resolve_api_key() {
        Some(_) => eprintln!("  API Key: {}", style("configured").green()),
        None => eprintln!("  API Key: {}", style("not configured").red()),
    }

    eprintln!();
    eprintln!("{}", style("Retrieval Settings:").bold().yellow());
    eprintln!("  Top K: {}", style(config.retrieval.top_k).cyan());
    eprintln!(
        "  Max Chunk: {} chars",
        style(config.chunking.max_chunk_chars).cyan()
    );
    eprintln!(
        "  Overlap: {} chars",
        style(config.chunking.overlap_chars).cyan()
    );

    eprintln!();
    eprintln!("{}", style("Paths:").bold().yellow());
    eprintln!(
        "  Documents: {}",
        style(config.paths.docs_dir.display()).cyan()
    );
    eprintln!(
        "  Index: {}",
        style(config.paths.index_dir.display()).cyan()
    );

    let config_path = Config::config_file_path().context("Failed to get config file path")?;
    eprintln!();
    eprintln!("Config file: {}", style(config_path.display()).dim());

    Ok(())
}

fn load_existing_config() -> Result<Config> {
    Config::load().map_or_else(
        |_| {
            eprintln!(
                "{}",
                style("No existing configuration found. Using defaults.").yellow()
            );
            Ok(Config::default())
        },
        |config| {
            eprintln!("{}", style("Found existing configuration.").green());
            Ok(config)
        },
    )
}

fn configure_chat(chat: &mut ChatConfig) -> Result<()> {
    chat.base_url = Input::new()
        .with_prompt("Chat API base URL")
        .default(chat.base_url.clone())
        .interact_text()?;

    chat.model = Input::new()
        .with_prompt("Chat model")
        .default(chat.model.clone())
        .interact_text()?;

    let api_key: String = Input::new()
        .with_prompt("API key (blank to rely on DEEPSEEK_API_KEY)")
        .allow_empty(true)
        .default(chat.api_key.clone().unwrap_or_default())
        .interact_text()?;
    chat.api_key = if api_key.trim().is_empty() {
        None
    } else {
        Some(api_key)
    };

    Ok(())
}
