//! Test utilities for CLI testing
//!
//! Provides a mock provider API server and fixture data for integration
//! testing. The mock serves a small account graph: one fully-populated
//! server and one minimal server with no routed interfaces.

use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use axum::{
    extract::{Path, Request, State},
    http::{header, StatusCode},
    middleware::{self, Next},
    response::{Json, Response},
    routing::get,
    Router,
};
use metalview_core::api::ApiResponse;
use metalview_core::types::{
    Account, ComponentType, GenericComponentModel, Hardware, HardwareComponent,
    HardwareComponentModel, HardwareSummary, NetworkComponent, NetworkVlan, Router as NetRouter,
    VlanTrunk,
};
use tokio::net::TcpListener;

/// Id of the fully-populated fixture server.
pub const FULL_HARDWARE_ID: u64 = 1001;

/// Id of the fixture server without routed interfaces.
pub const MINIMAL_HARDWARE_ID: u64 = 1002;

/// Id of the private interface of the full fixture server.
pub const PRIVATE_COMPONENT_ID: u64 = 9003;

/// Id of the switch-side uplink carrying the trunked VLANs.
pub const UPLINK_COMPONENT_ID: u64 = 9100;

/// Mock server state: the account graph served to clients.
#[derive(Debug, Clone)]
pub struct MockProviderState {
    account: Arc<Account>,
    summaries: Arc<Vec<HardwareSummary>>,
    hardware: Arc<HashMap<u64, Hardware>>,
    components: Arc<HashMap<u64, Vec<HardwareComponent>>>,
    network_components: Arc<HashMap<u64, NetworkComponent>>,
    trunks: Arc<HashMap<u64, Vec<VlanTrunk>>>,
}

fn interface(
    id: u64,
    name: &str,
    mac: Option<&str>,
    ipmi_mac: Option<&str>,
    ip: Option<&str>,
    speed: u64,
) -> NetworkComponent {
    NetworkComponent {
        id,
        name: name.to_string(),
        port: None,
        speed: Some(speed),
        status: Some("ACTIVE".to_string()),
        mac_address: mac.map(|s| s.to_string()),
        ipmi_mac_address: ipmi_mac.map(|s| s.to_string()),
        primary_ip_address: ip.map(|s| s.to_string()),
        uplink_component: None,
    }
}

fn full_hardware() -> Hardware {
    Hardware {
        id: FULL_HARDWARE_ID,
        fully_qualified_domain_name: "db01.dal10.example.com".to_string(),
        datacenter_name: Some("Dallas 10".to_string()),
        manufacturer_serial_number: Some("SL10A7X".to_string()),
        network_management_ip_address: Some("10.3.80.12".to_string()),
        network_vlans: vec![
            NetworkVlan {
                id: 2201,
                vlan_number: 1201,
                name: Some("backend-prod".to_string()),
            },
            NetworkVlan {
                id: 2202,
                vlan_number: 901,
                name: None,
            },
        ],
        frontend_routers: vec![NetRouter {
            id: 21,
            fully_qualified_domain_name: "fcr01a.dal10.example.com".to_string(),
        }],
        backend_routers: vec![NetRouter {
            id: 11,
            fully_qualified_domain_name: "bcr01a.dal10.example.com".to_string(),
        }],
        frontend_network_components: vec![interface(
            9010,
            "eth",
            Some("0c:c4:7a:e5:12:0b"),
            None,
            Some("203.0.113.10"),
            1000,
        )],
        backend_network_components: vec![
            interface(9001, "mgmt", None, Some("0c:c4:7a:aa:bb:01"), None, 100),
            interface(9002, "eth", Some("0c:c4:7a:e5:12:09"), None, None, 1000),
            interface(
                PRIVATE_COMPONENT_ID,
                "eth",
                Some("0c:c4:7a:e5:12:0a"),
                None,
                Some("10.3.80.40"),
                1000,
            ),
        ],
    }
}

fn minimal_hardware() -> Hardware {
    Hardware {
        id: MINIMAL_HARDWARE_ID,
        fully_qualified_domain_name: "spare01.ams01.example.com".to_string(),
        datacenter_name: Some("Amsterdam 1".to_string()),
        manufacturer_serial_number: None,
        network_management_ip_address: None,
        network_vlans: Vec::new(),
        frontend_routers: Vec::new(),
        backend_routers: Vec::new(),
        frontend_network_components: Vec::new(),
        backend_network_components: vec![interface(9021, "eth", None, None, None, 1000)],
    }
}

fn full_hardware_components() -> Vec<HardwareComponent> {
    vec![
        HardwareComponent {
            hardware_component_model: HardwareComponentModel {
                manufacturer: Some("Micron".to_string()),
                name: Some("18ASF2G72PZ".to_string()),
                hardware_generic_component_model: GenericComponentModel {
                    description: Some("16GB DDR4 2Rx8 NON-ECC".to_string()),
                    hardware_component_type: ComponentType {
                        type_name: "Memory".to_string(),
                    },
                },
            },
            modify_date: Some("2024-03-11T08:15:22-06:00".to_string()),
            serial_number: Some("12E84A7D".to_string()),
        },
        HardwareComponent {
            hardware_component_model: HardwareComponentModel {
                manufacturer: Some("Seagate".to_string()),
                name: Some("Constellation ES".to_string()),
                hardware_generic_component_model: GenericComponentModel {
                    description: Some("2TB SATA 7200RPM".to_string()),
                    hardware_component_type: ComponentType {
                        type_name: "Hard Drive".to_string(),
                    },
                },
            },
            modify_date: Some("2024-03-11T08:15:22-06:00".to_string()),
            serial_number: None,
        },
    ]
}

impl Default for MockProviderState {
    fn default() -> Self {
        let full = full_hardware();
        let minimal = minimal_hardware();

        let summaries = vec![
            HardwareSummary {
                id: full.id,
                fully_qualified_domain_name: full.fully_qualified_domain_name.clone(),
                datacenter_name: full.datacenter_name.clone(),
            },
            HardwareSummary {
                id: minimal.id,
                fully_qualified_domain_name: minimal.fully_qualified_domain_name.clone(),
                datacenter_name: minimal.datacenter_name.clone(),
            },
        ];

        let mut hardware = HashMap::new();
        hardware.insert(full.id, full);
        hardware.insert(minimal.id, minimal);

        let mut components = HashMap::new();
        components.insert(FULL_HARDWARE_ID, full_hardware_components());
        components.insert(MINIMAL_HARDWARE_ID, Vec::new());

        // The private interface, refetched with the uplink mask, reveals the
        // switch port the trunks live on.
        let mut private = interface(
            PRIVATE_COMPONENT_ID,
            "eth",
            Some("0c:c4:7a:e5:12:0a"),
            None,
            Some("10.3.80.40"),
            1000,
        );
        private.uplink_component = Some(Box::new(interface(
            UPLINK_COMPONENT_ID,
            "eth",
            None,
            None,
            None,
            1000,
        )));

        let mut network_components = HashMap::new();
        network_components.insert(PRIVATE_COMPONENT_ID, private);

        let mut trunks = HashMap::new();
        trunks.insert(
            UPLINK_COMPONENT_ID,
            vec![
                VlanTrunk {
                    id: 501,
                    network_vlan: NetworkVlan {
                        id: 2301,
                        vlan_number: 1100,
                        name: Some("storage".to_string()),
                    },
                },
                VlanTrunk {
                    id: 502,
                    network_vlan: NetworkVlan {
                        id: 2302,
                        vlan_number: 1101,
                        name: None,
                    },
                },
            ],
        );

        Self {
            account: Arc::new(Account {
                id: 307608,
                company_name: Some("Example Corp".to_string()),
            }),
            summaries: Arc::new(summaries),
            hardware: Arc::new(hardware),
            components: Arc::new(components),
            network_components: Arc::new(network_components),
            trunks: Arc::new(trunks),
        }
    }
}

/// Mock provider server implementation
#[derive(Debug)]
pub struct MockServer {
    state: MockProviderState,
    port: u16,
}

impl Default for MockServer {
    fn default() -> Self {
        Self::new()
    }
}

impl MockServer {
    /// Create a new mock server
    pub fn new() -> Self {
        Self {
            state: MockProviderState::default(),
            port: 0, // Will be assigned when server starts
        }
    }

    /// Start the mock server and return the address
    pub async fn start(mut self) -> Result<(Self, String)> {
        let app = self.create_router();

        let listener = TcpListener::bind("127.0.0.1:0").await?;
        let addr = listener.local_addr()?;
        self.port = addr.port();

        let server_url = format!("http://127.0.0.1:{}", self.port);

        tokio::spawn(async move {
            if let Err(e) = axum::serve(listener, app).await {
                eprintln!("Mock server error: {}", e);
            }
        });

        // Give the server a moment to start and verify it's running
        for _ in 0..20 {
            tokio::time::sleep(Duration::from_millis(20)).await;
            if tokio::net::TcpStream::connect(("127.0.0.1", self.port))
                .await
                .is_ok()
            {
                break;
            }
        }

        Ok((self, server_url))
    }

    /// Get the server port
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Get a reference to the server state
    pub fn state(&self) -> &MockProviderState {
        &self.state
    }

    /// Create the mock server router
    fn create_router(&self) -> Router {
        Router::new()
            // Root endpoint
            .route("/", get(root_handler))
            // Account endpoints
            .route("/api/v1/account", get(account_handler))
            .route("/api/v1/account/hardware", get(hardware_list_handler))
            // Hardware endpoints
            .route("/api/v1/hardware/:id", get(hardware_handler))
            .route(
                "/api/v1/hardware/:id/components",
                get(hardware_components_handler),
            )
            // Network component endpoints
            .route(
                "/api/v1/network-component/:id",
                get(network_component_handler),
            )
            .route(
                "/api/v1/network-component/:id/trunks",
                get(vlan_trunks_handler),
            )
            .layer(middleware::from_fn(require_auth))
            .with_state(self.state.clone())
    }
}

/// Reject requests without credentials, so client auth wiring is exercised.
async fn require_auth(request: Request, next: Next) -> Result<Response, StatusCode> {
    if request.headers().get(header::AUTHORIZATION).is_none() {
        return Err(StatusCode::UNAUTHORIZED);
    }
    Ok(next.run(request).await)
}

// Handler functions

async fn root_handler() -> Json<ApiResponse<serde_json::Value>> {
    let data = serde_json::json!({
        "service": "Bare Metal Account API",
        "status": "ok",
    });
    Json(ApiResponse::success(data))
}

async fn account_handler(State(state): State<MockProviderState>) -> Json<ApiResponse<Account>> {
    Json(ApiResponse::success((*state.account).clone()))
}

async fn hardware_list_handler(
    State(state): State<MockProviderState>,
) -> Json<ApiResponse<Vec<HardwareSummary>>> {
    Json(ApiResponse::success((*state.summaries).clone()))
}

async fn hardware_handler(
    Path(id): Path<u64>,
    State(state): State<MockProviderState>,
) -> Json<ApiResponse<Hardware>> {
    match state.hardware.get(&id) {
        Some(hardware) => Json(ApiResponse::success(hardware.clone())),
        None => Json(ApiResponse::error(format!("Hardware not found: {}", id))),
    }
}

async fn hardware_components_handler(
    Path(id): Path<u64>,
    State(state): State<MockProviderState>,
) -> Json<ApiResponse<Vec<HardwareComponent>>> {
    match state.components.get(&id) {
        Some(components) => Json(ApiResponse::success(components.clone())),
        None => Json(ApiResponse::error(format!("Hardware not found: {}", id))),
    }
}

async fn network_component_handler(
    Path(id): Path<u64>,
    State(state): State<MockProviderState>,
) -> Json<ApiResponse<NetworkComponent>> {
    match state.network_components.get(&id) {
        Some(component) => Json(ApiResponse::success(component.clone())),
        None => Json(ApiResponse::error(format!(
            "Network component not found: {}",
            id
        ))),
    }
}

async fn vlan_trunks_handler(
    Path(id): Path<u64>,
    State(state): State<MockProviderState>,
) -> Json<ApiResponse<Vec<VlanTrunk>>> {
    // Components without trunk records report an empty list, not an error.
    let trunks = state.trunks.get(&id).cloned().unwrap_or_default();
    Json(ApiResponse::success(trunks))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_server_startup() {
        let server = MockServer::new();
        let (server, url) = server.start().await.unwrap();

        assert!(server.port() > 0);
        assert!(url.contains(&server.port().to_string()));

        let client = reqwest::Client::new();
        let response = client
            .get(&url)
            .basic_auth("acct1234", Some("k3y"))
            .send()
            .await
            .unwrap();
        assert!(response.status().is_success());
    }

    #[tokio::test]
    async fn test_unauthenticated_requests_rejected() {
        let server = MockServer::new();
        let (_, url) = server.start().await.unwrap();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/api/v1/account", url))
            .send()
            .await
            .unwrap();
        assert_eq!(response.status(), reqwest::StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_account_endpoint() {
        let server = MockServer::new();
        let (_, url) = server.start().await.unwrap();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/api/v1/account", url))
            .basic_auth("acct1234", Some("k3y"))
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let json: ApiResponse<Account> = response.json().await.unwrap();

        match json {
            ApiResponse::Success { data } => {
                assert_eq!(data.id, 307608);
                assert_eq!(data.company_name.as_deref(), Some("Example Corp"));
            }
            _ => panic!("Expected success response"),
        }
    }

    #[tokio::test]
    async fn test_unknown_hardware_returns_error_envelope() {
        let server = MockServer::new();
        let (_, url) = server.start().await.unwrap();

        let client = reqwest::Client::new();
        let response = client
            .get(format!("{}/api/v1/hardware/9999", url))
            .basic_auth("acct1234", Some("k3y"))
            .send()
            .await
            .unwrap();

        assert!(response.status().is_success());
        let json: ApiResponse<Hardware> = response.json().await.unwrap();

        match json {
            ApiResponse::Error { error } => assert!(error.contains("9999")),
            _ => panic!("Expected error response"),
        }
    }
}
