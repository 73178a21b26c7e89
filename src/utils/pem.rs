use base64::{engine::general_purpose, Engine as _};

const PEM_LINE_WIDTH: usize = 64;

/// A DER certificate with its OpenSSL-style PEM rendering
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PemCertificate {
    der: Vec<u8>,
}

/// A PKCS#8 DER private key. Never logged or printed.
#[derive(Clone, PartialEq, Eq)]
pub struct PemPrivateKey {
    der: Vec<u8>,
}

impl PemCertificate {
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self { der: der.into() }
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    /// Single-line base64 of the DER, as reported in inventory
    pub fn to_base64(&self) -> String {
        general_purpose::STANDARD.encode(&self.der)
    }

    /// Armored PEM: header, 64-column base64 body, footer, trailing newline
    pub fn pem_data(&self) -> String {
        armor("CERTIFICATE", &self.der)
    }

    /// The PEM body without armor, as uploaded to the filestore
    pub fn body(&self) -> String {
        wrap_base64(&self.to_base64())
    }
}

impl PemPrivateKey {
    pub fn from_der(der: impl Into<Vec<u8>>) -> Self {
        Self { der: der.into() }
    }

    pub fn der(&self) -> &[u8] {
        &self.der
    }

    pub fn pem_data(&self) -> String {
        armor("PRIVATE KEY", &self.der)
    }

    pub fn body(&self) -> String {
        wrap_base64(&general_purpose::STANDARD.encode(&self.der))
    }
}

impl std::fmt::Debug for PemPrivateKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PemPrivateKey")
            .field("der", &format_args!("<{} bytes redacted>", self.der.len()))
            .finish()
    }
}

/// Break a base64 string into 64-column lines joined by `\n`, no trailing newline
pub fn wrap_base64(encoded: &str) -> String {
    encoded
        .as_bytes()
        .chunks(PEM_LINE_WIDTH)
        .map(|chunk| String::from_utf8_lossy(chunk).into_owned())
        .collect::<Vec<_>>()
        .join("\n")
}

fn armor(label: &str, der: &[u8]) -> String {
    let body = wrap_base64(&general_purpose::STANDARD.encode(der));
    format!("-----BEGIN {label}-----\n{body}\n-----END {label}-----\n")
}
