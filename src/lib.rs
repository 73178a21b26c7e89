pub mod appliance;
pub mod cli;
pub mod config;
pub mod job;
pub mod store;
pub mod utils;

pub use appliance::{ApplianceApi, ApplianceClient};
pub use config::AgentSettings;
pub use job::{run_inventory, run_management, JobCompletion, JobConfig, JobStatus};
pub use store::{InventoryCollector, StoreReconciler};
pub use utils::errors;
