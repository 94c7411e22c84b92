//! metalview CLI
//!
//! Command-line interface that reports network, VLAN, and hardware
//! configuration for the bare-metal servers on an account.

use std::path::Path;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use metalview_cli::cli::{
    generate_completion, handle_components, handle_config, handle_list, handle_report,
    handle_show, handle_trunks, Cli, Commands, OutputFormat,
};
use metalview_cli::client::MetalClient;
use metalview_cli::config::CliConfig;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Build configuration using priority chain: defaults → file → env → CLI args
    let mut builder = CliConfig::builder();

    // Load config file (unless --no-config is specified)
    builder = builder.with_config_file(!cli.no_config, cli.config.as_deref().map(Path::new))?;

    // Apply environment variable overrides
    builder = builder.with_env_overrides();

    // Apply CLI argument overrides (highest priority)
    if let Some(ref endpoint) = cli.endpoint {
        builder = builder.with_endpoint(endpoint)?;
    }
    if let Some(ref username) = cli.username {
        builder = builder.with_username(username);
    }
    if let Some(ref api_key) = cli.api_key {
        builder = builder.with_api_key(api_key);
    }
    if let Some(ref format) = cli.format {
        let format_str = match format {
            OutputFormat::Table => "table",
            OutputFormat::Json => "json",
        };
        builder = builder.with_output_format(format_str)?;
    }
    if let Some(verbose) = cli.verbose {
        builder = builder.with_verbose(verbose);
    }

    // Build final configuration with validation
    let config = match builder.build() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            if cli.verbose.unwrap_or(false) {
                eprintln!("Error details: {:?}", e);
            }
            std::process::exit(1);
        }
    };

    // Determine final settings from validated config
    let output_format = match config.output_format.as_str() {
        "json" => OutputFormat::Json,
        _ => OutputFormat::Table,
    };
    let verbose = config.verbose;

    if verbose {
        eprintln!("Verbose mode enabled");
        eprintln!("Endpoint: {}", config.endpoint);
        eprintln!("Output format: {:?}", output_format);
    }

    // Execute commands; only the API commands need a client
    let result = match cli.command {
        Commands::Completion { shell } => {
            generate_completion(shell);
            Ok(())
        }
        Commands::Config { command } => handle_config(command, &config, &output_format).await,
        Commands::Report { datacenter } => {
            let client = connect(&config, verbose).await;
            handle_report(&client, datacenter.as_deref(), &output_format).await
        }
        Commands::List => {
            let client = connect(&config, verbose).await;
            handle_list(&client, &output_format).await
        }
        Commands::Show { id } => {
            let client = connect(&config, verbose).await;
            handle_show(&client, id, &output_format).await
        }
        Commands::Components { id } => {
            let client = connect(&config, verbose).await;
            handle_components(&client, id, &output_format).await
        }
        Commands::Trunks { id } => {
            let client = connect(&config, verbose).await;
            handle_trunks(&client, id, &output_format).await
        }
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        if verbose {
            eprintln!("Error details: {:?}", e);
        }
        std::process::exit(1);
    }

    Ok(())
}

/// Connect to the API, or exit with a friendly diagnostic.
async fn connect(config: &CliConfig, verbose: bool) -> MetalClient {
    let (username, api_key) = match config.credentials() {
        Ok(credentials) => credentials,
        Err(e) => {
            eprintln!("Configuration error: {}", e);
            std::process::exit(1);
        }
    };

    if verbose {
        eprintln!("Connecting to the API and fetching account information...");
    }

    match MetalClient::with_config(
        config.endpoint.clone(),
        username,
        api_key,
        config.timeout,
        3,
        Duration::from_millis(500),
    )
    .await
    {
        Ok(client) => {
            if verbose {
                let account = client.account();
                eprintln!(
                    "Account: {} (id {})",
                    account.company_name.as_deref().unwrap_or("unnamed"),
                    account.id
                );
            }
            client
        }
        Err(e) => {
            eprintln!("Error: Cannot reach the bare-metal API at {}", config.endpoint);
            eprintln!("Check the endpoint URL, username, and API key.");
            eprintln!("Connection error: {}", e);
            std::process::exit(1);
        }
    }
}
