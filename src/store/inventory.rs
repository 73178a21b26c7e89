use crate::appliance::{ApplianceApi, CryptoKind, PUBLIC_DOMAIN, PUBLIC_FOLDER};
use crate::config::AgentSettings;
use crate::store::descriptor::StoreDescriptor;
use crate::store::outcome::ReconciliationError;
use crate::store::payload::{certificate_from_bytes, contains_pem_marker, decode_base64};
use crate::utils::errors::{AgentError, Result};
use crate::utils::output::sha256_fingerprint;
use serde::Serialize;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum ItemStatus {
    #[default]
    Unknown,
}

/// One certificate reported back to the host
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct InventoryItem {
    pub alias: String,
    /// Base64 DER, leaf first
    pub certificates: Vec<String>,
    pub private_key_entry: bool,
    pub item_status: ItemStatus,
    pub use_chain_level: bool,
}

impl InventoryItem {
    fn new(alias: &str, certificate_base64: String, private_key_entry: bool) -> Self {
        Self {
            alias: alias.to_string(),
            certificates: vec![certificate_base64],
            private_key_entry,
            item_status: ItemStatus::Unknown,
            use_chain_level: true,
        }
    }
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct InventoryResult {
    pub errors: ReconciliationError,
    pub items: Vec<InventoryItem>,
}

/// Walks a store and turns what it finds into inventory items
pub struct InventoryCollector<'a, A: ApplianceApi> {
    api: &'a A,
    settings: &'a AgentSettings,
}

impl<'a, A: ApplianceApi> InventoryCollector<'a, A> {
    pub fn new(api: &'a A, settings: &'a AgentSettings) -> Self {
        Self { api, settings }
    }

    /// Collect the inventory of `store`.
    ///
    /// Only the initial listing can fail the whole collection; per-item
    /// problems are recorded in `InventoryResult::errors` and skipped.
    pub async fn collect(&self, store: &StoreDescriptor) -> Result<InventoryResult> {
        if self.settings.is_public_store(&store.source_path) {
            self.collect_public().await
        } else {
            self.collect_private(store).await
        }
    }

    async fn collect_public(&self) -> Result<InventoryResult> {
        let files = self
            .api
            .view_certificate_files(PUBLIC_DOMAIN, PUBLIC_FOLDER)
            .await?;
        tracing::debug!("Public store lists {} files", files.len());

        let capacity = self.settings.max_inventory_capacity;
        let mut result = InventoryResult::default();

        for file in &files {
            if self.settings.is_blacklisted(&file.name) {
                tracing::debug!("Skipping blacklisted file {}", file.name);
                continue;
            }
            if result.items.len() >= capacity {
                tracing::info!("Inventory capacity of {capacity} reached, stopping");
                break;
            }

            match self.fetch_public(&file.name).await {
                Ok(Some(item)) => result.items.push(item),
                Ok(None) => tracing::trace!("{} is not a PEM certificate, skipping", file.name),
                Err(e) => {
                    tracing::warn!("Error on {}: {e}", file.name);
                    result.errors.record(e.to_string());
                }
            }
        }

        Ok(result)
    }

    async fn fetch_public(&self, filename: &str) -> Result<Option<InventoryItem>> {
        let content = self.api.view_public_certificate_detail(filename).await?;
        let data = decode_base64(&content)?;
        if !contains_pem_marker(&data) {
            return Ok(None);
        }

        let certificate = certificate_from_bytes(data)?;
        let encoded = certificate.to_base64();
        tracing::debug!("{filename}: {}", sha256_fingerprint(&encoded));
        Ok(Some(InventoryItem::new(filename, encoded, false)))
    }

    async fn collect_private(&self, store: &StoreDescriptor) -> Result<InventoryResult> {
        let objects = self
            .api
            .view_crypto_objects(&store.domain, CryptoKind::Certificate)
            .await?;
        tracing::debug!(
            "Domain '{}' has {} crypto certificates",
            store.domain,
            objects.len()
        );

        let mut result = InventoryResult::default();
        for object in objects.iter().filter(|object| !object.name.is_empty()) {
            match self.fetch_private(&store.domain, &object.name).await {
                Ok(item) => result.items.push(item),
                Err(e) => {
                    tracing::warn!("Certificate not retrievable: Error on {}: {e}", object.name);
                    result.errors.record(e.to_string());
                }
            }
        }

        Ok(result)
    }

    async fn fetch_private(&self, domain: &str, name: &str) -> Result<InventoryItem> {
        let details = self.api.view_certificate_details(domain, name).await?;
        let encoded = details.encoded().ok_or_else(|| {
            AgentError::MalformedResponse(format!("no encoded certificate for '{name}'"))
        })?;

        let certificate = certificate_from_bytes(decode_base64(&encoded)?)?;
        tracing::debug!("{name}: {}", sha256_fingerprint(&certificate.to_base64()));
        Ok(InventoryItem::new(name, encoded, true))
    }
}
