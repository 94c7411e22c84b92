//! Integration tests for the metalview CLI
//!
//! These tests drive the HTTP client and the report rendering end-to-end
//! against the in-process mock provider server.

use std::time::Duration;

use anyhow::Result;
use metalview_cli::cli::fetch_report;
use metalview_cli::client::MetalClient;
use metalview_cli::format;
use metalview_cli::test_utils::{
    MockServer, FULL_HARDWARE_ID, MINIMAL_HARDWARE_ID, PRIVATE_COMPONENT_ID, UPLINK_COMPONENT_ID,
};

async fn connect(url: &str) -> Result<MetalClient> {
    MetalClient::with_config(
        url.to_string(),
        "acct1234".to_string(),
        "k3y".to_string(),
        10,
        1,
        Duration::from_millis(50),
    )
    .await
}

#[tokio::test]
async fn test_client_initialization_validates_credentials() -> Result<()> {
    let (_, url) = MockServer::new().start().await?;

    let client = connect(&url).await?;
    let account = client.account();
    assert_eq!(account.id, 307608);
    assert_eq!(account.company_name.as_deref(), Some("Example Corp"));

    assert!(client.ping().await?);

    Ok(())
}

#[tokio::test]
async fn test_empty_credentials_rejected_client_side() {
    // No server needed: validation happens before any request is sent.
    let result = MetalClient::with_config(
        "http://localhost:1".to_string(),
        "".to_string(),
        "k3y".to_string(),
        1,
        0,
        Duration::from_millis(10),
    )
    .await;
    assert!(result.is_err());

    let result = MetalClient::with_config(
        "http://localhost:1".to_string(),
        "acct1234".to_string(),
        "   ".to_string(),
        1,
        0,
        Duration::from_millis(10),
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_list_hardware_returns_account_inventory() -> Result<()> {
    let (_, url) = MockServer::new().start().await?;
    let client = connect(&url).await?;

    let servers = client.list_hardware().await?;
    assert_eq!(servers.len(), 2);
    assert_eq!(servers[0].id, FULL_HARDWARE_ID);
    assert_eq!(servers[0].datacenter_name.as_deref(), Some("Dallas 10"));

    let listing = format::render_hardware_list(&servers)?;
    assert!(listing.contains("db01.dal10.example.com"));
    assert!(listing.contains("spare01.ams01.example.com"));

    Ok(())
}

#[tokio::test]
async fn test_trunk_discovery_walks_the_uplink() -> Result<()> {
    let (_, url) = MockServer::new().start().await?;
    let client = connect(&url).await?;

    let component = client.get_network_component(PRIVATE_COMPONENT_ID).await?;
    let uplink = component.uplink_component.expect("uplink should be masked in");
    assert_eq!(uplink.id, UPLINK_COMPONENT_ID);

    let trunks = client.get_vlan_trunks(uplink.id).await?;
    assert_eq!(trunks.len(), 2);
    assert_eq!(trunks[0].network_vlan.name.as_deref(), Some("storage"));
    assert!(trunks[1].network_vlan.name.is_none());

    Ok(())
}

#[tokio::test]
async fn test_full_report_renders_every_section() -> Result<()> {
    let (_, url) = MockServer::new().start().await?;
    let client = connect(&url).await?;

    let (hardware, trunks, components) = fetch_report(&client, FULL_HARDWARE_ID).await?;
    assert_eq!(trunks.len(), 2);
    assert_eq!(components.len(), 2);

    let report = format::render_hardware_report(&hardware, &trunks, &components)?;

    for expected in [
        "Hostname        : db01.dal10.example.com",
        "Datacenter      : Dallas 10",
        "Serial #        : SL10A7X",
        "FRONTEND NETWORK",
        "BACKEND NETWORK",
        "TRUNKED/TAGGED VLANS",
        "MGMT NETWORK",
        "HARDWARE COMPONENTS",
        // Public interface MAC, private interface IP, IPMI MAC.
        "0c:c4:7a:e5:12:0b",
        "10.3.80.40",
        "0c:c4:7a:aa:bb:01",
        // Trunked VLAN name and component inventory.
        "storage",
        "Micron",
        "Hard Drive",
    ] {
        assert!(report.contains(expected), "report missing {:?}", expected);
    }

    Ok(())
}

#[tokio::test]
async fn test_report_degrades_for_server_without_routed_interfaces() -> Result<()> {
    let (_, url) = MockServer::new().start().await?;
    let client = connect(&url).await?;

    let (hardware, trunks, components) = fetch_report(&client, MINIMAL_HARDWARE_ID).await?;
    assert!(trunks.is_empty());
    assert!(components.is_empty());

    let report = format::render_hardware_report(&hardware, &trunks, &components)?;
    assert!(report.contains("spare01.ams01.example.com"));

    // The frontend section renders header and underline only.
    let frontend_start = report.find("FRONTEND NETWORK").unwrap();
    let backend_start = report.find("BACKEND NETWORK").unwrap();
    let frontend_section = &report[frontend_start..backend_start];
    assert_eq!(frontend_section.trim_end().lines().count(), 3);

    Ok(())
}

#[tokio::test]
async fn test_unknown_hardware_surfaces_api_error() -> Result<()> {
    let (_, url) = MockServer::new().start().await?;
    let client = connect(&url).await?;

    let result = client.get_hardware(9999).await;
    let error = result.unwrap_err();
    assert!(error.to_string().contains("9999"), "error: {}", error);

    Ok(())
}
