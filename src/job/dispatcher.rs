use crate::appliance::ApplianceApi;
use crate::config::AgentSettings;
use crate::job::config::JobConfig;
use crate::store::{InventoryCollector, InventoryItem, ReconciliationError, StoreReconciler};
use serde::Serialize;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum JobStatus {
    Success,
    Warning,
    Error,
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobStatus::Success => "Success",
            JobStatus::Warning => "Warning",
            JobStatus::Error => "Error",
        };
        f.write_str(label)
    }
}

/// Final status reported to the host for one job
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct JobCompletion {
    pub status: JobStatus,
    pub message: String,
}

impl JobCompletion {
    fn new(status: JobStatus, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn is_error(&self) -> bool {
        self.status == JobStatus::Error
    }
}

/// Receives the collected inventory; returns false when the host rejected it
pub trait InventorySink {
    fn submit(&mut self, items: &[InventoryItem]) -> bool;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Add,
    Remove,
}

impl Operation {
    pub fn parse(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "add" => Some(Operation::Add),
            "remove" => Some(Operation::Remove),
            _ => None,
        }
    }
}

/// Inventory job: collect the store and hand the items to `sink`
pub async fn run_inventory<A, S>(
    api: &A,
    settings: &AgentSettings,
    config: &JobConfig,
    sink: &mut S,
) -> JobCompletion
where
    A: ApplianceApi,
    S: InventorySink,
{
    let store = config.store_descriptor();
    tracing::info!(
        "Inventory of domain '{}' store '{}'",
        store.domain,
        store.certificate_store
    );

    let result = match InventoryCollector::new(api, settings).collect(&store).await {
        Ok(result) => result,
        Err(e) => {
            tracing::error!("Inventory listing failed: {e}");
            return JobCompletion::new(JobStatus::Error, e.to_string());
        }
    };

    if !sink.submit(&result.items) {
        tracing::error!("There were issues submitting the inventory");
        return JobCompletion::new(JobStatus::Error, "Error submitting the inventory");
    }

    if result.errors.has_error {
        tracing::warn!("Inventory had issues retrieving some certificates");
        return JobCompletion::new(
            JobStatus::Warning,
            result.errors.message.unwrap_or_default(),
        );
    }

    tracing::info!("Inventoried {} certificates", result.items.len());
    JobCompletion::new(JobStatus::Success, "Inventory Complete")
}

/// Management job: add or remove one certificate
pub async fn run_management<A: ApplianceApi>(
    api: &A,
    settings: &AgentSettings,
    config: &JobConfig,
) -> JobCompletion {
    let Some(operation) = Operation::parse(&config.job.operation_type) else {
        return JobCompletion::new(
            JobStatus::Error,
            format!("Unsupported operation {}", config.job.operation_type),
        );
    };

    let store = config.store_descriptor();
    let prefixes = match config.naming_prefixes() {
        Ok(prefixes) => prefixes,
        Err(e) => return JobCompletion::new(JobStatus::Error, e.to_string()),
    };
    let reconciler = StoreReconciler::new(api, settings);

    let outcome: ReconciliationError = match operation {
        Operation::Add => match config.certificate_entry() {
            Ok(entry) => reconciler.add(&entry, &store, &prefixes).await,
            Err(e) => return JobCompletion::new(JobStatus::Error, e.to_string()),
        },
        Operation::Remove => {
            let alias = config.job.alias.as_deref().map(str::trim).unwrap_or_default();
            if alias.is_empty() {
                return JobCompletion::new(JobStatus::Error, "Remove job carries no alias");
            }
            reconciler.remove(alias, &store, &prefixes).await
        }
    };

    if outcome.has_error {
        if let Some(message) = &outcome.message {
            tracing::warn!("{operation:?} finished with errors: {message}");
        }
        JobCompletion::new(
            JobStatus::Warning,
            "Management has issues creating certificate objects",
        )
    } else {
        JobCompletion::new(JobStatus::Success, "Job complete")
    }
}
