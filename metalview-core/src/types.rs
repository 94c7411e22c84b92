//! Core types for the bare-metal provider's resource graph
//!
//! Wire names follow the provider's camelCase JSON. Nested collections are
//! only populated when the corresponding object mask is requested, so they
//! all default to empty.

use serde::{Deserialize, Serialize};

/// Component name of the IPMI management interface.
pub const MGMT_INTERFACE_NAME: &str = "mgmt";

/// Component name of the data interfaces (frontend and backend).
pub const DATA_INTERFACE_NAME: &str = "eth";

/// The account owning the hardware, fetched once to validate credentials.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    /// Account id
    pub id: u64,
    /// Company name on the account
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub company_name: Option<String>,
}

/// One entry of the account hardware listing.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareSummary {
    /// Hardware id
    pub id: u64,
    /// Fully qualified domain name of the server
    pub fully_qualified_domain_name: String,
    /// Datacenter name (present when the listing mask requests it)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter_name: Option<String>,
}

/// A dedicated server with the nested records a configuration report needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Hardware {
    /// Hardware id
    pub id: u64,
    /// Fully qualified domain name of the server
    pub fully_qualified_domain_name: String,
    /// Datacenter name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub datacenter_name: Option<String>,
    /// Manufacturer serial number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer_serial_number: Option<String>,
    /// IP address of the out-of-band management interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub network_management_ip_address: Option<String>,
    /// VLANs the server participates in; index 0 is the private VLAN,
    /// index 1 (when present) the public VLAN
    #[serde(default)]
    pub network_vlans: Vec<NetworkVlan>,
    /// Frontend (public) routers, positionally paired with the frontend
    /// network components
    #[serde(default)]
    pub frontend_routers: Vec<Router>,
    /// Backend (private) routers
    #[serde(default)]
    pub backend_routers: Vec<Router>,
    /// Frontend (public) network components
    #[serde(default)]
    pub frontend_network_components: Vec<NetworkComponent>,
    /// Backend (private) network components, including the IPMI interface
    #[serde(default)]
    pub backend_network_components: Vec<NetworkComponent>,
}

impl Hardware {
    /// The IPMI management interface: the first backend component named
    /// `mgmt`.
    pub fn management_interface(&self) -> Option<&NetworkComponent> {
        self.backend_network_components
            .iter()
            .find(|component| component.name == MGMT_INTERFACE_NAME)
    }

    /// The routed private data interface: the first backend `eth` component
    /// carrying a primary IP address, with its position among the backend
    /// components.
    pub fn private_interface(&self) -> Option<(usize, &NetworkComponent)> {
        Self::find_data_interface(&self.backend_network_components)
    }

    /// The routed public data interface: the first frontend `eth` component
    /// carrying a primary IP address, with its position among the frontend
    /// components. The position pairs the interface with its frontend
    /// router.
    pub fn public_interface(&self) -> Option<(usize, &NetworkComponent)> {
        Self::find_data_interface(&self.frontend_network_components)
    }

    fn find_data_interface(
        components: &[NetworkComponent],
    ) -> Option<(usize, &NetworkComponent)> {
        components.iter().enumerate().find(|(_, component)| {
            component.name == DATA_INTERFACE_NAME && component.primary_ip_address.is_some()
        })
    }
}

/// A physical network interface of a server, or its switch-side uplink.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkComponent {
    /// Component id
    pub id: u64,
    /// Interface name (`eth`, `mgmt`, ...)
    pub name: String,
    /// Interface port number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u32>,
    /// Negotiated speed in Mbps
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub speed: Option<u64>,
    /// Administrative status (`ACTIVE`, `DISABLED`, ...)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// MAC address of the interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mac_address: Option<String>,
    /// MAC address of the IPMI controller behind this interface
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ipmi_mac_address: Option<String>,
    /// Primary IP address, present only on routed interfaces
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub primary_ip_address: Option<String>,
    /// Switch-side uplink component (present when the uplink mask is
    /// requested); VLAN trunks hang off the uplink, not the server port
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub uplink_component: Option<Box<NetworkComponent>>,
}

/// A VLAN on the account.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NetworkVlan {
    /// VLAN id (provider-global)
    pub id: u64,
    /// VLAN number on the switch
    pub vlan_number: u32,
    /// Optional display name; unnamed VLANs are common
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

/// A frontend or backend router.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Router {
    /// Router id
    pub id: u64,
    /// Fully qualified domain name of the router
    pub fully_qualified_domain_name: String,
}

/// A VLAN trunked onto an uplink network component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VlanTrunk {
    /// Trunk record id
    pub id: u64,
    /// The trunked VLAN
    pub network_vlan: NetworkVlan,
}

/// One installed hardware component (CPU, DIMM, drive, ...).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareComponent {
    /// The component's model record
    pub hardware_component_model: HardwareComponentModel,
    /// Last modification timestamp, as reported by the provider
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub modify_date: Option<String>,
    /// Serial number, when the provider tracks one for this component
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub serial_number: Option<String>,
}

/// Model information for an installed hardware component.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HardwareComponentModel {
    /// Manufacturer name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub manufacturer: Option<String>,
    /// Model name
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// The generic model this concrete model instantiates
    pub hardware_generic_component_model: GenericComponentModel,
}

/// Generic model record carrying the description and component type.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenericComponentModel {
    /// Human-readable description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// The component type record
    pub hardware_component_type: ComponentType,
}

/// Component type record.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ComponentType {
    /// Type name (`Memory`, `Hard Drive`, ...)
    #[serde(rename = "type")]
    pub type_name: String,
}
