use thiserror::Error;

#[derive(Error, Debug)]
pub enum AgentError {
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Appliance API error ({status}) on {call}: {body}")]
    Api {
        call: String,
        status: u16,
        body: String,
    },

    #[error("Malformed appliance response: {0}")]
    MalformedResponse(String),

    #[error("Certificate parsing error: {0}")]
    CertParsing(String),

    #[error("PKCS#12 error: {0}")]
    Pkcs12(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("Base64 decode error: {0}")]
    Base64(#[from] base64::DecodeError),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Job failed: {0}")]
    JobFailed(String),
}

pub type Result<T> = std::result::Result<T, AgentError>;
