//! Command execution handlers

use anyhow::Result;
use metalview_core::types::{Hardware, HardwareComponent, VlanTrunk};

use crate::client::MetalClient;
use crate::config::CliConfig;
use crate::format::{self, format_success};

use super::commands::*;

/// Fetch everything one server's report needs: the detail record, the
/// VLANs trunked to its private uplink, and the installed components.
pub async fn fetch_report(
    client: &MetalClient,
    id: u64,
) -> Result<(Hardware, Vec<VlanTrunk>, Vec<HardwareComponent>)> {
    let hardware = client.get_hardware(id).await?;
    let trunks = fetch_trunks(client, &hardware).await?;
    let components = client.get_hardware_components(id).await?;
    Ok((hardware, trunks, components))
}

/// Trunked VLANs hang off the switch-side uplink of the private data
/// interface. Servers without a routed private interface, or without an
/// uplink record, report no trunks.
async fn fetch_trunks(client: &MetalClient, hardware: &Hardware) -> Result<Vec<VlanTrunk>> {
    let Some((_, private)) = hardware.private_interface() else {
        return Ok(Vec::new());
    };

    let component = client.get_network_component(private.id).await?;
    match component.uplink_component {
        Some(uplink) => client.get_vlan_trunks(uplink.id).await,
        None => Ok(Vec::new()),
    }
}

/// Handle report command
pub async fn handle_report(
    client: &MetalClient,
    datacenter: Option<&str>,
    format: &OutputFormat,
) -> Result<()> {
    let mut servers = client.list_hardware().await?;
    if let Some(datacenter) = datacenter {
        servers.retain(|server| server.datacenter_name.as_deref() == Some(datacenter));
    }

    match format {
        OutputFormat::Json => {
            let mut reports = Vec::new();
            for server in &servers {
                let (hardware, trunks, components) = fetch_report(client, server.id).await?;
                reports.push(format::report_json(&hardware, &trunks, &components));
            }
            println!("{}", serde_json::to_string_pretty(&reports)?);
        }
        OutputFormat::Table => {
            if servers.is_empty() {
                println!("No hardware found.");
                return Ok(());
            }
            for server in &servers {
                let (hardware, trunks, components) = fetch_report(client, server.id).await?;
                println!(
                    "{}",
                    format::render_hardware_report(&hardware, &trunks, &components)?
                );
                println!();
            }
        }
    }

    Ok(())
}

/// Handle list command
pub async fn handle_list(client: &MetalClient, format: &OutputFormat) -> Result<()> {
    let servers = client.list_hardware().await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&servers)?);
        }
        OutputFormat::Table => {
            println!("{}", format::render_hardware_list(&servers)?);
        }
    }

    Ok(())
}

/// Handle show command
pub async fn handle_show(client: &MetalClient, id: u64, format: &OutputFormat) -> Result<()> {
    let (hardware, trunks, components) = fetch_report(client, id).await?;

    match format {
        OutputFormat::Json => {
            println!(
                "{}",
                serde_json::to_string_pretty(&format::report_json(&hardware, &trunks, &components))?
            );
        }
        OutputFormat::Table => {
            println!(
                "{}",
                format::render_hardware_report(&hardware, &trunks, &components)?
            );
        }
    }

    Ok(())
}

/// Handle components command
pub async fn handle_components(client: &MetalClient, id: u64, format: &OutputFormat) -> Result<()> {
    let components = client.get_hardware_components(id).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&components)?);
        }
        OutputFormat::Table => {
            println!("{}", format::render_component_table(&components)?);
        }
    }

    Ok(())
}

/// Handle trunks command
pub async fn handle_trunks(client: &MetalClient, id: u64, format: &OutputFormat) -> Result<()> {
    let hardware = client.get_hardware(id).await?;
    let trunks = fetch_trunks(client, &hardware).await?;

    match format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&trunks)?);
        }
        OutputFormat::Table => {
            println!("{}", format::render_trunk_table(&trunks)?);
        }
    }

    Ok(())
}

/// Handle config commands
pub async fn handle_config(
    command: ConfigCommands,
    current_config: &CliConfig,
    format: &OutputFormat,
) -> Result<()> {
    match command {
        ConfigCommands::Show => {
            let redacted = current_config.redacted();
            match format {
                OutputFormat::Json => {
                    println!("{}", serde_json::to_string_pretty(&redacted)?);
                }
                OutputFormat::Table => {
                    println!("CLI Configuration:");
                    println!("{:<20} Value", "Setting");
                    println!("{}", "-".repeat(40));
                    println!("{:<20} {}", "Endpoint", redacted.endpoint);
                    println!("{:<20} {}", "Username", redacted.username);
                    println!("{:<20} {}", "API Key", redacted.api_key);
                    println!("{:<20} {}", "Output Format", redacted.output_format);
                    println!("{:<20} {}", "Verbose", redacted.verbose);
                    println!("{:<20} {}s", "Timeout", redacted.timeout);
                }
            }
        }
        ConfigCommands::Set { key, value } => {
            let mut config = current_config.clone();
            let value_clone = value.clone();
            match key.as_str() {
                "endpoint" => {
                    if !value.starts_with("http://") && !value.starts_with("https://") {
                        return Err(anyhow::anyhow!(
                            "Endpoint URL must start with http:// or https://"
                        ));
                    }
                    config.endpoint = value;
                }
                "username" => config.username = value,
                "api_key" => config.api_key = value,
                "output_format" => {
                    if ["table", "json"].contains(&value.as_str()) {
                        config.output_format = value;
                    } else {
                        return Err(anyhow::anyhow!(
                            "Invalid output format. Must be 'table' or 'json'"
                        ));
                    }
                }
                "verbose" => {
                    config.verbose = value.to_lowercase() == "true" || value == "1";
                }
                "timeout" => {
                    config.timeout = value
                        .parse()
                        .map_err(|_| anyhow::anyhow!("Invalid timeout value. Must be a number"))?;
                }
                _ => return Err(anyhow::anyhow!("Unknown config key: {}", key)),
            }

            config.save()?;
            // Never echo the API key back to the terminal.
            let shown = if key == "api_key" {
                "********"
            } else {
                value_clone.as_str()
            };
            println!("{}", format_success(&format!("Set {} = {}", key, shown)));
        }
        ConfigCommands::Reset => {
            let default_config = CliConfig::default();
            default_config.save()?;
            println!("{}", format_success("Configuration reset to defaults"));
        }
    }

    Ok(())
}

/// Generate shell completion script
pub fn generate_completion(shell: clap_complete::Shell) {
    use clap::CommandFactory;
    use clap_complete::generate;
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();
    generate(shell, &mut cmd, bin_name, &mut io::stdout());
}
