use crate::appliance::models::{CertificateDetails, CryptoKind, CryptoObject, FileEntry};
use crate::utils::errors::Result;

/// Typed management-API operations against one appliance.
///
/// Every call is a single request/response exchange. Implementations do not
/// retry and do not swallow errors; not-found is only expressed as `None`
/// where the signature allows it.
#[allow(async_fn_in_trait)]
pub trait ApplianceApi {
    /// List the files of a filestore folder
    async fn view_certificate_files(&self, domain: &str, folder: &str) -> Result<Vec<FileEntry>>;

    /// Base64 content of a file in the public certificate folder
    async fn view_public_certificate_detail(&self, filename: &str) -> Result<String>;

    /// Write (create or overwrite) a filestore file; `content` is base64 text
    async fn add_or_replace_certificate_file(
        &self,
        domain: &str,
        folder: &str,
        filename: &str,
        content: &str,
    ) -> Result<()>;

    async fn delete_certificate_file(&self, domain: &str, filename: &str) -> Result<()>;

    /// All crypto objects of one kind in a domain
    async fn view_crypto_objects(&self, domain: &str, kind: CryptoKind)
        -> Result<Vec<CryptoObject>>;

    async fn view_crypto_certificate(&self, domain: &str, name: &str)
        -> Result<Option<CryptoObject>>;

    /// Parsed details, including the encoded certificate, of a crypto certificate object
    async fn view_certificate_details(&self, domain: &str, name: &str)
        -> Result<CertificateDetails>;

    async fn add_crypto_object(
        &self,
        domain: &str,
        kind: CryptoKind,
        object: &CryptoObject,
    ) -> Result<()>;

    async fn update_crypto_object(
        &self,
        domain: &str,
        kind: CryptoKind,
        object: &CryptoObject,
    ) -> Result<()>;

    async fn delete_crypto_object(&self, domain: &str, kind: CryptoKind, name: &str)
        -> Result<()>;

    /// Persist the running configuration of a domain
    async fn save_config(&self, domain: &str) -> Result<()>;
}
