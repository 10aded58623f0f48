use anyhow::Result;
use clap::{CommandFactory, Parser};
use owo_colors::OwoColorize;
use redub::app::run_dub_command;
use redub::cli::{Cli, Commands, ConfigAction, ModelsAction};
use redub::config::Config;
use redub::diagnostics::check_dependencies;
use redub::languages::{format_language, list_languages};
use redub::media::SystemCommandExecutor;
use redub::models::catalog::{get_model, list_models};
use redub::models::download::{download_model, format_model_info, list_installed_models};
use std::path::Path;

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::Dub(args) => {
            let config = load_config(cli.config.as_deref())?;
            run_dub_command(config, &args, cli.quiet, cli.verbose)?;
        }
        Commands::Languages => {
            let config = load_config(cli.config.as_deref())?;
            list_target_languages(&config.translation.target_language);
        }
        Commands::Check => {
            let config = load_config(cli.config.as_deref())?;
            check_dependencies(&SystemCommandExecutor::new(), &config);
        }
        Commands::Models { action } => {
            handle_models_command(action, cli.config.as_deref())?;
        }
        Commands::Config { action } => {
            handle_config_command(action, cli.config.as_deref())?;
        }
        Commands::Completions { shell } => {
            clap_complete::generate(shell, &mut Cli::command(), "redub", &mut std::io::stdout());
        }
    }

    Ok(())
}

/// Load configuration from file with environment overrides.
fn load_config(custom_path: Option<&Path>) -> Result<Config> {
    let config = if let Some(path) = custom_path {
        // An explicit path must exist
        Config::load(path)?
    } else {
        Config::load_or_default(&Config::default_path())?
    };

    Ok(config.with_env_overrides())
}

fn list_target_languages(current: &str) {
    println!("Target languages (current: {}):", current.green());
    for language in list_languages() {
        if language.code == current {
            println!("  {} {}", "●".green(), format_language(language));
        } else {
            println!("    {}", format_language(language));
        }
    }
}

fn handle_models_command(action: ModelsAction, custom_path: Option<&Path>) -> Result<()> {
    match action {
        ModelsAction::List => {
            let config = load_config(custom_path)?;
            println!("Available models (current: {}):", config.stt.model.green());
            for model in list_models() {
                println!("  {}", format_model_info(model));
            }

            let extras: Vec<String> = list_installed_models()
                .into_iter()
                .filter(|name| get_model(name).is_none())
                .collect();
            if !extras.is_empty() {
                println!();
                println!("{}", "Other installed models:".dimmed());
                for name in extras {
                    println!("  {}", name);
                }
            }
        }
        ModelsAction::Install { name } => {
            if get_model(&name).is_none() {
                eprintln!("{}", format!("Unknown model: '{name}'").red());
                eprintln!("Run `redub models list` to see available models.");
                std::process::exit(1);
            }
            let path = download_model(&name, true)?;
            println!("Model '{}' installed successfully", name);
            println!("Location: {}", path.display());
        }
    }
    Ok(())
}

fn handle_config_command(action: ConfigAction, custom_path: Option<&Path>) -> Result<()> {
    match action {
        ConfigAction::Show => {
            let config = load_config(custom_path)?;
            print!("{}", config.to_toml()?);
        }
        ConfigAction::Path => {
            let path = custom_path
                .map(Path::to_path_buf)
                .unwrap_or_else(Config::default_path);
            println!("{}", path.display());
        }
    }
    Ok(())
}
