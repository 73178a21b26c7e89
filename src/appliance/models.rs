use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// The two kinds of crypto configuration object that reference filestore entries
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CryptoKind {
    Certificate,
    Key,
}

impl CryptoKind {
    /// Config class name, used both in resource paths and as the JSON member name
    pub fn class_name(&self) -> &'static str {
        match self {
            CryptoKind::Certificate => "CryptoCertificate",
            CryptoKind::Key => "CryptoKey",
        }
    }
}

impl fmt::Display for CryptoKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.class_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AdminState {
    Enabled,
    Disabled,
}

/// A CryptoCertificate or CryptoKey configuration object
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CryptoObject {
    #[serde(default)]
    pub name: String,
    #[serde(rename = "mAdminState", default, skip_serializing_if = "Option::is_none")]
    pub admin_state: Option<AdminState>,
    #[serde(rename = "Filename", default, skip_serializing_if = "Option::is_none")]
    pub file_reference: Option<String>,
    #[serde(rename = "PasswordAlias", default, skip_serializing_if = "Option::is_none")]
    pub password_alias: Option<String>,
    #[serde(rename = "IgnoreExpiration", default, skip_serializing_if = "Option::is_none")]
    pub ignore_expiration: Option<String>,
}

impl CryptoObject {
    /// An enabled object pointing at `file`
    pub fn referencing(name: &str, file: &FileReference) -> Self {
        Self {
            name: name.to_string(),
            admin_state: Some(AdminState::Enabled),
            file_reference: Some(file.to_string()),
            password_alias: Some("off".to_string()),
            ignore_expiration: Some("off".to_string()),
        }
    }

    /// A disable request: admin state only, every mutable field cleared
    pub fn disabled(name: &str) -> Self {
        Self {
            name: name.to_string(),
            admin_state: Some(AdminState::Disabled),
            ..Self::default()
        }
    }
}

/// `{store}:///{filename}`, the form a crypto object uses to point into a filestore folder
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileReference {
    store: String,
    filename: String,
}

impl FileReference {
    pub fn new(store: &str, filename: &str) -> Self {
        Self {
            store: store.trim().to_string(),
            filename: filename.to_string(),
        }
    }

    /// Bare filename of a stored reference; references into other stores are returned as-is
    pub fn bare_filename<'a>(store: &str, reference: &'a str) -> &'a str {
        let prefix = format!("{}:///", store.trim());
        reference.strip_prefix(&prefix).unwrap_or(reference)
    }
}

impl fmt::Display for FileReference {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:///{}", self.store, self.filename)
    }
}

/// One entry of a filestore folder listing
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FileEntry {
    pub name: String,
    #[serde(default)]
    pub modified: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FilestoreResponse {
    #[serde(default)]
    pub filestore: Option<Filestore>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct Filestore {
    #[serde(default)]
    pub location: Option<FilestoreLocation>,
}

#[derive(Debug, Default, Deserialize)]
pub(crate) struct FilestoreLocation {
    #[serde(default)]
    pub file: Vec<FileEntry>,
}

impl FilestoreResponse {
    pub fn into_files(self) -> Vec<FileEntry> {
        self.filestore
            .and_then(|store| store.location)
            .map(|location| location.file)
            .unwrap_or_default()
    }
}

/// Body of a single filestore file view
#[derive(Debug, Deserialize)]
pub(crate) struct FileContentResponse {
    pub file: String,
}

/// Response to the `ViewCertificateDetails` action
#[derive(Debug, Default, Deserialize)]
pub struct CertificateDetailsResponse {
    #[serde(rename = "CryptoCertificate", default)]
    pub crypto_certificate: Option<CertificateDetailsEnvelope>,
}

#[derive(Debug, Default, Deserialize)]
pub struct CertificateDetailsEnvelope {
    #[serde(rename = "CertificateDetails", default)]
    pub details: CertificateDetails,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct CertificateDetails {
    #[serde(rename = "SerialNumber", default)]
    pub serial_number: Option<DetailValue>,
    #[serde(rename = "Subject", default)]
    pub subject: Option<DetailValue>,
    #[serde(rename = "Issuer", default)]
    pub issuer: Option<DetailValue>,
    #[serde(rename = "NotBefore", default)]
    pub not_before: Option<DetailValue>,
    #[serde(rename = "NotAfter", default)]
    pub not_after: Option<DetailValue>,
    #[serde(rename = "Base64", default)]
    pub encoded_certificate: Option<DetailValue>,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct DetailValue {
    #[serde(default)]
    pub value: Value,
}

impl DetailValue {
    pub fn text(&self) -> Option<String> {
        match &self.value {
            Value::String(s) => Some(s.clone()),
            Value::Null => None,
            other => Some(other.to_string()),
        }
    }
}

impl CertificateDetails {
    /// The base64 DER carried in the `Base64` detail
    pub fn encoded(&self) -> Option<String> {
        self.encoded_certificate
            .as_ref()
            .and_then(DetailValue::text)
            .filter(|text| !text.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_file_reference_round_trip() {
        let reference = FileReference::new(" cert ", "myalias.cer");
        assert_eq!(reference.to_string(), "cert:///myalias.cer");
        assert_eq!(
            FileReference::bare_filename("cert", "cert:///myalias.cer"),
            "myalias.cer"
        );
        assert_eq!(
            FileReference::bare_filename("cert", "sharedcert:///other.cer"),
            "sharedcert:///other.cer"
        );
    }

    #[test]
    fn test_disable_request_clears_mutable_fields() {
        let body = serde_json::to_value(CryptoObject::disabled("c1")).unwrap();
        assert_eq!(body, json!({"name": "c1", "mAdminState": "disabled"}));
    }

    #[test]
    fn test_referencing_request_shape() {
        let reference = FileReference::new("cert", "c1.cer");
        let body = serde_json::to_value(CryptoObject::referencing("c1", &reference)).unwrap();
        assert_eq!(
            body,
            json!({
                "name": "c1",
                "mAdminState": "enabled",
                "Filename": "cert:///c1.cer",
                "PasswordAlias": "off",
                "IgnoreExpiration": "off"
            })
        );
    }

    #[test]
    fn test_crypto_object_tolerates_links_and_missing_fields() {
        let object: CryptoObject = serde_json::from_value(json!({
            "name": "k1",
            "_links": {"self": {"href": "/mgmt/config/dom/CryptoKey/k1"}},
            "mAdminState": "enabled"
        }))
        .unwrap();
        assert_eq!(object.name, "k1");
        assert_eq!(object.admin_state, Some(AdminState::Enabled));
        assert!(object.file_reference.is_none());
    }

    #[test]
    fn test_certificate_details_encoded_value() {
        let response: CertificateDetailsResponse = serde_json::from_value(json!({
            "CryptoCertificate": {
                "CertificateObject": "c1",
                "CertificateDetails": {
                    "SerialNumber": {"value": 12345},
                    "Base64": {"value": "MIIB"}
                }
            }
        }))
        .unwrap();
        let details = response.crypto_certificate.unwrap().details;
        assert_eq!(details.encoded().as_deref(), Some("MIIB"));
        assert_eq!(
            details.serial_number.and_then(|v| v.text()).as_deref(),
            Some("12345")
        );
    }

    #[test]
    fn test_filestore_listing_without_files_is_empty() {
        let response: FilestoreResponse =
            serde_json::from_value(json!({"filestore": {"location": {"name": "pubcert:"}}}))
                .unwrap();
        assert!(response.into_files().is_empty());
    }
}
