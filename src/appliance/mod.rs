pub mod api;
pub mod client;
pub mod models;
pub mod normalize;

pub use api::ApplianceApi;
pub use client::ApplianceClient;
pub use models::{AdminState, CryptoKind, CryptoObject, FileEntry, FileReference};

use crate::config::AgentSettings;
use reqwest::Client;

/// Domain that owns the public certificate folder
pub const PUBLIC_DOMAIN: &str = "default";
/// Filestore folder holding trust anchors without keys
pub const PUBLIC_FOLDER: &str = "pubcert";

/// Create the HTTP client used for all appliance calls
pub fn create_http_client(settings: &AgentSettings) -> Result<Client, reqwest::Error> {
    Client::builder()
        .timeout(std::time::Duration::from_secs(settings.request_timeout_secs))
        .use_rustls_tls()
        .danger_accept_invalid_certs(settings.accept_invalid_certs)
        .build()
}
