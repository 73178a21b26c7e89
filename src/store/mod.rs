pub mod crypto_objects;
pub mod descriptor;
pub mod inventory;
pub mod names;
pub mod outcome;
pub mod payload;
pub mod reconciler;

#[cfg(test)]
pub(crate) mod fake;

pub use descriptor::{NamingPrefixes, StoreDescriptor};
pub use inventory::{InventoryCollector, InventoryItem, InventoryResult, ItemStatus};
pub use outcome::ReconciliationError;
pub use payload::{CertificateEntry, CertificatePayload, SourceFormat};
pub use reconciler::StoreReconciler;
