//! Report assembly for the CLI
//!
//! Builds the column specifications, shapes provider records into table
//! rows, and renders the per-server report sections. Tables are plain text
//! so reports can be piped or diffed; colors are reserved for CLI status
//! messages.

use anyhow::Result;
use colored::*;
use metalview_core::table::{Column, Row, TableFormatter};
use metalview_core::types::{Hardware, HardwareComponent, HardwareSummary, VlanTrunk};
use serde_json::json;

/// Width of the horizontal rules framing each server banner.
const BANNER_RULE_WIDTH: usize = 114;

/// Character used to underline table headers.
const HEADER_UNDERLINE: char = '=';

fn network_columns() -> Vec<Column> {
    vec![
        Column::new("MAC", "mac", 17),
        Column::new("IP Address", "ip_address", 16),
        Column::new("Speed", "speed", 5),
        Column::new("Status", "status", 10),
        Column::new("VLAN", "vlan", 5),
        Column::new("VLAN Name", "vlan_name", 20),
        Column::new("Router", "router", 30),
    ]
}

fn trunk_columns() -> Vec<Column> {
    vec![
        Column::new("VLAN ID", "vlan_id", 8),
        Column::new("Number", "vlan_number", 10),
        Column::new("Name", "vlan_name", 20),
    ]
}

fn component_columns() -> Vec<Column> {
    vec![
        Column::new("Type", "device_type", 15),
        Column::new("Manufacturer", "manufacturer", 15),
        Column::new("Name", "name", 20),
        Column::new("Description", "description", 30),
        Column::new("Modify Date", "modify_date", 25),
        Column::new("Serial Number", "serial_number", 15),
    ]
}

fn hardware_list_columns() -> Vec<Column> {
    vec![
        Column::new("ID", "id", 10),
        Column::new("Hostname", "hostname", 40),
        Column::new("Datacenter", "datacenter", 20),
    ]
}

/// Shape the public data interface into a frontend network row.
///
/// The frontend router is the one at the interface's position; the public
/// VLAN is the account's second VLAN when one exists. Servers without a
/// routed public interface yield no row.
pub fn frontend_network_row(hardware: &Hardware) -> Option<Row> {
    let (index, component) = hardware.public_interface()?;

    let mut row = Row::new();
    row.insert("mac".to_string(), json!(component.mac_address));
    row.insert("ip_address".to_string(), json!(component.primary_ip_address));
    row.insert("speed".to_string(), json!(component.speed));
    row.insert("status".to_string(), json!(component.status));
    if let Some(router) = hardware.frontend_routers.get(index) {
        row.insert(
            "router".to_string(),
            json!(router.fully_qualified_domain_name),
        );
    }
    if let Some(vlan) = hardware.network_vlans.get(1) {
        row.insert("vlan".to_string(), json!(vlan.vlan_number));
        row.insert("vlan_name".to_string(), json!(vlan.name));
    }
    Some(row)
}

/// Shape the private data interface into a backend network row.
pub fn backend_network_row(hardware: &Hardware) -> Option<Row> {
    let (_, component) = hardware.private_interface()?;

    let mut row = Row::new();
    row.insert("mac".to_string(), json!(component.mac_address));
    row.insert("ip_address".to_string(), json!(component.primary_ip_address));
    row.insert("speed".to_string(), json!(component.speed));
    row.insert("status".to_string(), json!(component.status));
    if let Some(router) = hardware.backend_routers.first() {
        row.insert(
            "router".to_string(),
            json!(router.fully_qualified_domain_name),
        );
    }
    if let Some(vlan) = hardware.network_vlans.first() {
        row.insert("vlan".to_string(), json!(vlan.vlan_number));
        row.insert("vlan_name".to_string(), json!(vlan.name));
    }
    Some(row)
}

/// Shape the IPMI interface into a management network row.
///
/// The MAC is the IPMI controller's, and the IP is the hardware's
/// out-of-band management address rather than the interface's own.
pub fn management_network_row(hardware: &Hardware) -> Option<Row> {
    let component = hardware.management_interface()?;

    let mut row = Row::new();
    row.insert("mac".to_string(), json!(component.ipmi_mac_address));
    row.insert(
        "ip_address".to_string(),
        json!(hardware.network_management_ip_address),
    );
    row.insert("speed".to_string(), json!(component.speed));
    row.insert("status".to_string(), json!(component.status));
    if let Some(router) = hardware.backend_routers.first() {
        row.insert(
            "router".to_string(),
            json!(router.fully_qualified_domain_name),
        );
    }
    if let Some(vlan) = hardware.network_vlans.first() {
        row.insert("vlan".to_string(), json!(vlan.vlan_number));
        row.insert("vlan_name".to_string(), json!(vlan.name));
    }
    Some(row)
}

/// One row per trunked VLAN.
pub fn trunk_rows(trunks: &[VlanTrunk]) -> Vec<Row> {
    trunks
        .iter()
        .map(|trunk| {
            let mut row = Row::new();
            row.insert("vlan_id".to_string(), json!(trunk.network_vlan.id));
            row.insert(
                "vlan_number".to_string(),
                json!(trunk.network_vlan.vlan_number),
            );
            row.insert("vlan_name".to_string(), json!(trunk.network_vlan.name));
            row
        })
        .collect()
}

/// One row per installed hardware component.
pub fn component_rows(components: &[HardwareComponent]) -> Vec<Row> {
    components
        .iter()
        .map(|component| {
            let model = &component.hardware_component_model;
            let generic = &model.hardware_generic_component_model;

            let mut row = Row::new();
            row.insert(
                "device_type".to_string(),
                json!(generic.hardware_component_type.type_name),
            );
            row.insert("manufacturer".to_string(), json!(model.manufacturer));
            row.insert("name".to_string(), json!(model.name));
            row.insert("description".to_string(), json!(generic.description));
            row.insert("modify_date".to_string(), json!(component.modify_date));
            row.insert("serial_number".to_string(), json!(component.serial_number));
            row
        })
        .collect()
}

fn hardware_list_rows(servers: &[HardwareSummary]) -> Vec<Row> {
    servers
        .iter()
        .map(|server| {
            let mut row = Row::new();
            row.insert("id".to_string(), json!(server.id));
            row.insert(
                "hostname".to_string(),
                json!(server.fully_qualified_domain_name),
            );
            row.insert("datacenter".to_string(), json!(server.datacenter_name));
            row
        })
        .collect()
}

/// Render one titled report section: blank line, title, table.
pub fn render_section(title: &str, columns: Vec<Column>, rows: &[Row]) -> Result<String> {
    let table = TableFormatter::new(columns)?.with_underline(HEADER_UNDERLINE);
    Ok(format!("\n{}\n{}", title, table.render(rows)))
}

/// Render the banner framing one server's report.
pub fn render_hardware_banner(hardware: &Hardware) -> String {
    let rule = "_".repeat(BANNER_RULE_WIDTH);
    format!(
        "{rule}\n\n\
         Hostname        : {}\n\
         Datacenter      : {}\n\
         Serial #        : {}\n\
         {rule}",
        hardware.fully_qualified_domain_name,
        hardware.datacenter_name.as_deref().unwrap_or(""),
        hardware.manufacturer_serial_number.as_deref().unwrap_or(""),
    )
}

/// Render the full configuration report for one server.
///
/// Sections appear in a fixed order: frontend network, backend network,
/// trunked VLANs, management network, hardware components. A section whose
/// source interface was not located renders its header with no data rows.
pub fn render_hardware_report(
    hardware: &Hardware,
    trunks: &[VlanTrunk],
    components: &[HardwareComponent],
) -> Result<String> {
    let frontend: Vec<Row> = frontend_network_row(hardware).into_iter().collect();
    let backend: Vec<Row> = backend_network_row(hardware).into_iter().collect();
    let management: Vec<Row> = management_network_row(hardware).into_iter().collect();

    let mut report = String::new();
    report.push_str(&render_hardware_banner(hardware));
    report.push('\n');
    report.push_str(&render_section("FRONTEND NETWORK", network_columns(), &frontend)?);
    report.push('\n');
    report.push_str(&render_section("BACKEND NETWORK", network_columns(), &backend)?);
    report.push('\n');
    report.push_str(&render_section(
        "TRUNKED/TAGGED VLANS",
        trunk_columns(),
        &trunk_rows(trunks),
    )?);
    report.push('\n');
    report.push_str(&render_section("MGMT NETWORK", network_columns(), &management)?);
    report.push('\n');
    report.push_str(&render_section(
        "HARDWARE COMPONENTS",
        component_columns(),
        &component_rows(components),
    )?);
    report.push('\n');
    report.push_str(&"_".repeat(BANNER_RULE_WIDTH));
    Ok(report)
}

/// Render the trunked VLAN table on its own (the `trunks` command).
pub fn render_trunk_table(trunks: &[VlanTrunk]) -> Result<String> {
    render_section("TRUNKED/TAGGED VLANS", trunk_columns(), &trunk_rows(trunks))
        .map(|section| section.trim_start().to_string())
}

/// Render the hardware component table on its own (the `components`
/// command).
pub fn render_component_table(components: &[HardwareComponent]) -> Result<String> {
    render_section(
        "HARDWARE COMPONENTS",
        component_columns(),
        &component_rows(components),
    )
    .map(|section| section.trim_start().to_string())
}

/// Render the account hardware listing (the `list` command).
pub fn render_hardware_list(servers: &[HardwareSummary]) -> Result<String> {
    let table = TableFormatter::new(hardware_list_columns())?.with_underline(HEADER_UNDERLINE);
    Ok(table.render(&hardware_list_rows(servers)))
}

/// One server's fetched graph as a JSON document (the `--format json`
/// report output).
pub fn report_json(
    hardware: &Hardware,
    trunks: &[VlanTrunk],
    components: &[HardwareComponent],
) -> serde_json::Value {
    json!({
        "hardware": hardware,
        "trunks": trunks,
        "components": components,
    })
}

/// Format success message
pub fn format_success(message: &str) -> String {
    format!("{} {}", "✓".green().bold(), message)
}
