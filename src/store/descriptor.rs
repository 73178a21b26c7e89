use crate::utils::errors::Result;
use serde::Deserialize;
use serde_json::Value;

/// Domain used when a store path names no domain
pub const DEFAULT_DOMAIN: &str = "default";

/// Where a certificate store lives on the appliance
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoreDescriptor {
    /// The compound path this descriptor was parsed from
    pub source_path: String,
    pub domain: String,
    pub certificate_store: String,
}

impl StoreDescriptor {
    /// Split `domain\store` or `domain/store` at the first separator.
    ///
    /// A backslash takes precedence over a slash. Without a separator the
    /// whole path is the store and the domain is `default`.
    pub fn parse(store_path: &str) -> Self {
        let separator = if store_path.contains('\\') {
            Some('\\')
        } else if store_path.contains('/') {
            Some('/')
        } else {
            None
        };

        let (domain, certificate_store) = match separator.and_then(|sep| store_path.split_once(sep))
        {
            Some((domain, store)) => (domain.trim().to_string(), store.trim().to_string()),
            None => (DEFAULT_DOMAIN.to_string(), store_path.to_string()),
        };

        Self {
            source_path: store_path.to_string(),
            domain,
            certificate_store,
        }
    }
}

/// Prefixes used to synthesise on-appliance names from an alias
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct NamingPrefixes {
    pub crypto_cert_object_prefix: String,
    pub crypto_key_object_prefix: String,
    pub cert_file_prefix: String,
    pub key_file_prefix: String,
}

#[derive(Debug, Default, Deserialize)]
struct RawPrefixes {
    #[serde(rename = "CryptoCertObjectPrefix", default)]
    crypto_cert_object_prefix: Option<String>,
    #[serde(rename = "CryptoKeyObjectPrefix", default)]
    crypto_key_object_prefix: Option<String>,
    #[serde(rename = "CertFilePrefix", default)]
    cert_file_prefix: Option<String>,
    #[serde(rename = "KeyFilePrefix", default)]
    key_file_prefix: Option<String>,
}

impl NamingPrefixes {
    pub fn new(
        crypto_cert_object_prefix: &str,
        crypto_key_object_prefix: &str,
        cert_file_prefix: &str,
        key_file_prefix: &str,
    ) -> Self {
        Self {
            crypto_cert_object_prefix: normalize(crypto_cert_object_prefix),
            crypto_key_object_prefix: normalize(crypto_key_object_prefix),
            cert_file_prefix: normalize(cert_file_prefix),
            key_file_prefix: normalize(key_file_prefix),
        }
    }

    /// Read prefixes from the store properties object; absent or null properties default to empty
    pub fn from_properties(properties: &Value) -> Result<Self> {
        if properties.is_null() {
            return Ok(Self::default());
        }

        let raw: RawPrefixes = serde_json::from_value(properties.clone())?;
        Ok(Self::new(
            raw.crypto_cert_object_prefix.as_deref().unwrap_or_default(),
            raw.crypto_key_object_prefix.as_deref().unwrap_or_default(),
            raw.cert_file_prefix.as_deref().unwrap_or_default(),
            raw.key_file_prefix.as_deref().unwrap_or_default(),
        ))
    }
}

fn normalize(prefix: &str) -> String {
    prefix.trim().to_lowercase()
}
