use serde::Serialize;

/// Soft failure signal returned by reconciliation and inventory operations
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ReconciliationError {
    pub has_error: bool,
    pub message: Option<String>,
}

impl ReconciliationError {
    pub fn ok() -> Self {
        Self::default()
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            has_error: true,
            message: Some(message.into()),
        }
    }

    /// Flag an error, keeping earlier messages
    pub fn record(&mut self, message: impl Into<String>) {
        let message = message.into();
        self.has_error = true;
        self.message = Some(match self.message.take() {
            Some(previous) if !previous.is_empty() => format!("{previous}; {message}"),
            _ => message,
        });
    }
}
