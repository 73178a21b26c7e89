use crate::utils::errors::{AgentError, Result};
use crate::utils::pem::{PemCertificate, PemPrivateKey};
use base64::{engine::general_purpose, Engine as _};
use p12_keystore::{KeyStore, KeyStoreEntry};
use x509_parser::pem::parse_x509_pem;
use x509_parser::prelude::*;

/// Certificate content as handed over by the host for an Add job
#[derive(Clone, Default)]
pub struct CertificateEntry {
    pub alias: Option<String>,
    /// Base64 of either a PKCS#12 container or a certificate
    pub contents: String,
    pub pfx_password: Option<String>,
}

impl CertificateEntry {
    /// The PFX password, if one was supplied and is non-empty
    pub fn password(&self) -> Option<&str> {
        self.pfx_password.as_deref().filter(|p| !p.is_empty())
    }

    /// The supplied alias, or a fresh UUID when none was given
    pub fn alias_or_generated(&self) -> String {
        match self.alias.as_deref().map(str::trim) {
            Some(alias) if !alias.is_empty() => alias.to_string(),
            _ => uuid::Uuid::new_v4().to_string(),
        }
    }
}

impl std::fmt::Debug for CertificateEntry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertificateEntry")
            .field("alias", &self.alias)
            .field("contents_len", &self.contents.len())
            .field("has_password", &self.password().is_some())
            .finish()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceFormat {
    Pem,
    Pfx,
}

/// A decoded certificate, with its private key when it came from a PFX
#[derive(Debug, Clone)]
pub struct CertificatePayload {
    pub alias: String,
    pub certificate: PemCertificate,
    pub private_key: Option<PemPrivateKey>,
    pub source_format: SourceFormat,
}

impl CertificatePayload {
    /// Decode an entry: PKCS#12 when a password is present, a bare certificate otherwise
    pub fn decode(entry: &CertificateEntry) -> Result<Self> {
        let alias = entry.alias_or_generated();
        match entry.password() {
            Some(password) => {
                let (certificate, private_key) = decode_pfx(&entry.contents, password)?;
                Ok(Self {
                    alias,
                    certificate,
                    private_key: Some(private_key),
                    source_format: SourceFormat::Pfx,
                })
            }
            None => Ok(Self {
                alias,
                certificate: decode_bare_certificate(&entry.contents)?,
                private_key: None,
                source_format: SourceFormat::Pem,
            }),
        }
    }
}

/// Extract the certificate and PKCS#8 key of the single key entry of a base64 PKCS#12 blob
pub fn decode_pfx(contents: &str, password: &str) -> Result<(PemCertificate, PemPrivateKey)> {
    let data = decode_base64(contents)?;
    let keystore = KeyStore::from_pkcs12(&data, password)
        .map_err(|e| AgentError::Pkcs12(format!("Failed to open PKCS#12 container: {e}")))?;

    let key_entries: Vec<_> = keystore
        .entries()
        .filter_map(|(alias, entry)| match entry {
            KeyStoreEntry::PrivateKeyChain(chain) => Some((alias, chain)),
            _ => None,
        })
        .collect();

    let (alias, chain) = match key_entries.as_slice() {
        [single] => *single,
        [] => {
            return Err(AgentError::Pkcs12(
                "PKCS#12 container holds no private key entry".to_string(),
            ))
        }
        _ => {
            return Err(AgentError::Pkcs12(format!(
                "PKCS#12 container holds {} private key entries, expected one",
                key_entries.len()
            )))
        }
    };

    let leaf = chain.chain().first().ok_or_else(|| {
        AgentError::Pkcs12(format!("Key entry '{alias}' has no certificate"))
    })?;
    tracing::debug!("Extracted key entry '{alias}' from PKCS#12 container");

    Ok((
        PemCertificate::from_der(leaf.as_der().to_vec()),
        PemPrivateKey::from_der(chain.key().to_vec()),
    ))
}

/// Decode a base64 certificate: either base64 DER or base64 of PEM text
pub fn decode_bare_certificate(contents: &str) -> Result<PemCertificate> {
    certificate_from_bytes(decode_base64(contents)?)
}

/// Parse PEM text or DER bytes into a validated certificate
pub(crate) fn certificate_from_bytes(data: Vec<u8>) -> Result<PemCertificate> {
    let der = if contains_pem_marker(&data) {
        let (_, pem) = parse_x509_pem(&data)
            .map_err(|e| AgentError::CertParsing(format!("Failed to parse PEM certificate: {e}")))?;
        pem.contents
    } else {
        data
    };

    X509Certificate::from_der(&der)
        .map_err(|e| AgentError::CertParsing(format!("DER parsing error: {e}")))?;
    Ok(PemCertificate::from_der(der))
}

pub(crate) fn contains_pem_marker(data: &[u8]) -> bool {
    String::from_utf8_lossy(data).contains("BEGIN CERTIFICATE")
}

/// Base64 decode, ignoring line breaks and other whitespace
pub(crate) fn decode_base64(contents: &str) -> Result<Vec<u8>> {
    let compact: String = contents.chars().filter(|c| !c.is_whitespace()).collect();
    Ok(general_purpose::STANDARD.decode(compact)?)
}

#[cfg(test)]
pub(crate) mod fixtures {
    use base64::{engine::general_purpose, Engine as _};
    use p12_keystore::{Certificate, KeyStore, KeyStoreEntry, PrivateKeyChain};

    pub struct TestIdentity {
        pub cert_der: Vec<u8>,
        pub cert_pem: String,
        pub key_der: Vec<u8>,
        pub key_pem: String,
    }

    pub fn identity(name: &str) -> TestIdentity {
        let certified = rcgen::generate_simple_self_signed(vec![name.to_string()]).unwrap();
        TestIdentity {
            cert_der: certified.cert.der().to_vec(),
            cert_pem: certified.cert.pem(),
            key_der: certified.key_pair.serialize_der(),
            key_pem: certified.key_pair.serialize_pem(),
        }
    }

    /// Base64 PKCS#12 holding one key entry for `identity`
    pub fn pfx_base64(identity: &TestIdentity, password: &str) -> String {
        let certificate = Certificate::from_der(&identity.cert_der).unwrap();
        let chain = PrivateKeyChain::new(&identity.key_der, [1u8, 2, 3, 4], vec![certificate]);

        let mut keystore = KeyStore::new();
        keystore.add_entry("entry", KeyStoreEntry::PrivateKeyChain(chain));
        let data = keystore.writer(password).write().unwrap();
        general_purpose::STANDARD.encode(data)
    }
}
