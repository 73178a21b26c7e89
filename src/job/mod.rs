pub mod config;
pub mod dispatcher;

pub use config::JobConfig;
pub use dispatcher::{
    run_inventory, run_management, InventorySink, JobCompletion, JobStatus, Operation,
};
