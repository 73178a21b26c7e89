use crate::store::descriptor::NamingPrefixes;

/// Remove `prefix` from the front of `alias` once, if present
pub fn derive_base_alias<'a>(alias: &'a str, prefix: &str) -> &'a str {
    alias.strip_prefix(prefix).unwrap_or(alias)
}

/// Replace the first occurrence of `find` in `source`; an empty `find` prepends `replace`
pub fn replace_first(source: &str, find: &str, replace: &str) -> String {
    match source.find(find) {
        Some(pos) => format!("{}{}{}", &source[..pos], replace, &source[pos + find.len()..]),
        None => source.to_string(),
    }
}

/// File name of a certificate in the public store; dots become underscores
pub fn public_cert_file_name(alias: &str) -> String {
    format!("{}.pem", alias.replace('.', "_"))
}

/// The four on-appliance names derived for a keyed certificate
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ObjectNames {
    pub cert_file: String,
    pub key_file: String,
    pub crypto_cert_object: String,
    pub crypto_key_object: String,
}

impl ObjectNames {
    /// Derive names from an alias. The alias is lower-cased and stripped of the
    /// crypto-certificate prefix. Dots are kept in every private-store name.
    pub fn derive(alias: &str, prefixes: &NamingPrefixes) -> Self {
        let alias = alias.to_lowercase();
        let base_alias = derive_base_alias(&alias, &prefixes.crypto_cert_object_prefix);

        Self {
            cert_file: format!("{}{base_alias}.cer", prefixes.cert_file_prefix),
            key_file: format!("{}{base_alias}.pem", prefixes.key_file_prefix),
            crypto_cert_object: format!("{}{base_alias}", prefixes.crypto_cert_object_prefix),
            crypto_key_object: format!("{}{base_alias}", prefixes.crypto_key_object_prefix),
        }
    }
}

/// Name of the crypto key object paired with a crypto certificate object
pub fn paired_key_object_name(cert_object_name: &str, prefixes: &NamingPrefixes) -> String {
    replace_first(
        cert_object_name,
        &prefixes.crypto_cert_object_prefix,
        &prefixes.crypto_key_object_prefix,
    )
}
