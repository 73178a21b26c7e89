use crate::appliance::{ApplianceApi, CryptoKind, FileReference};
use crate::config::AgentSettings;
use crate::store::crypto_objects::{CryptoObjectRemover, CryptoObjectReplacer};
use crate::store::descriptor::{NamingPrefixes, StoreDescriptor};
use crate::store::names::{paired_key_object_name, public_cert_file_name, ObjectNames};
use crate::store::outcome::ReconciliationError;
use crate::store::payload::{CertificateEntry, CertificatePayload};
use crate::utils::errors::{AgentError, Result};

/// Converges one appliance certificate store towards a requested state
pub struct StoreReconciler<'a, A: ApplianceApi> {
    api: &'a A,
    settings: &'a AgentSettings,
}

impl<'a, A: ApplianceApi> StoreReconciler<'a, A> {
    pub fn new(api: &'a A, settings: &'a AgentSettings) -> Self {
        Self { api, settings }
    }

    pub fn is_public_store(&self, store: &StoreDescriptor) -> bool {
        self.settings.is_public_store(&store.source_path)
    }

    /// Add or replace a certificate. Never fails: errors come back as a flagged result.
    pub async fn add(
        &self,
        entry: &CertificateEntry,
        store: &StoreDescriptor,
        prefixes: &NamingPrefixes,
    ) -> ReconciliationError {
        tracing::info!(
            "Adding certificate to domain '{}' store '{}'",
            store.domain,
            store.certificate_store
        );

        let result = if self.is_public_store(store) {
            self.add_public(entry, store).await
        } else {
            self.add_private(entry, store, prefixes).await
        };
        self.commit("add", store, result).await
    }

    /// Remove the crypto certificate named `alias` and its paired key
    pub async fn remove(
        &self,
        alias: &str,
        store: &StoreDescriptor,
        prefixes: &NamingPrefixes,
    ) -> ReconciliationError {
        if self.is_public_store(store) {
            tracing::warn!(
                "Refusing to remove '{alias}' from public store {}",
                store.source_path
            );
            return ReconciliationError::failed(format!(
                "Certificates cannot be removed from the public store '{}'",
                store.source_path
            ));
        }

        tracing::info!("Removing '{alias}' from domain '{}'", store.domain);
        let result = self.remove_private(alias, store, prefixes).await;
        self.commit("remove", store, result).await
    }

    async fn add_public(&self, entry: &CertificateEntry, store: &StoreDescriptor) -> Result<()> {
        let payload = CertificatePayload::decode(entry)?;
        let filename = public_cert_file_name(&payload.alias);
        tracing::debug!(
            "Writing public certificate '{}' as {filename} ({:?})",
            payload.alias,
            payload.source_format
        );
        self.api
            .add_or_replace_certificate_file(
                &store.domain,
                &store.certificate_store,
                &filename,
                &payload.certificate.body(),
            )
            .await
    }

    async fn add_private(
        &self,
        entry: &CertificateEntry,
        store: &StoreDescriptor,
        prefixes: &NamingPrefixes,
    ) -> Result<()> {
        if entry.password().is_none() {
            tracing::warn!(
                "No PFX password supplied, nothing added to private store {}",
                store.source_path
            );
            return Ok(());
        }

        let payload = CertificatePayload::decode(entry)?;
        let private_key = payload.private_key.ok_or_else(|| {
            AgentError::Pkcs12(format!("no private key found for '{}'", payload.alias))
        })?;
        let certificate = payload.certificate;
        let alias = payload.alias.to_lowercase();
        let names = ObjectNames::derive(&alias, prefixes);
        let objects = CryptoObjectReplacer::new(self.api, &store.domain);

        self.replace_file(store, &names.cert_file, &certificate.body())
            .await?;
        let cert_file = FileReference::new(&store.certificate_store, &names.cert_file);
        let action = objects
            .replace(CryptoKind::Certificate, &names.crypto_cert_object, &cert_file)
            .await?;
        tracing::debug!("{} {action:?}", names.crypto_cert_object);

        self.replace_file(store, &names.key_file, &private_key.body())
            .await?;
        let key_file = FileReference::new(&store.certificate_store, &names.key_file);
        let action = objects
            .replace(CryptoKind::Key, &names.crypto_key_object, &key_file)
            .await?;
        tracing::debug!("{} {action:?}", names.crypto_key_object);

        tracing::info!("Certificate '{alias}' installed as {}", names.crypto_cert_object);
        Ok(())
    }

    /// Delete `filename` if the store already holds it, then write the new content
    async fn replace_file(
        &self,
        store: &StoreDescriptor,
        filename: &str,
        content: &str,
    ) -> Result<()> {
        let files = self
            .api
            .view_certificate_files(&store.domain, &store.certificate_store)
            .await?;

        if files.iter().any(|file| file.name == filename) {
            tracing::debug!("Replacing existing file {filename}");
            self.api
                .delete_certificate_file(&store.domain, filename)
                .await?;
        }

        self.api
            .add_or_replace_certificate_file(
                &store.domain,
                &store.certificate_store,
                filename,
                content,
            )
            .await
    }

    async fn remove_private(
        &self,
        alias: &str,
        store: &StoreDescriptor,
        prefixes: &NamingPrefixes,
    ) -> Result<()> {
        let objects = CryptoObjectRemover::new(self.api, &store.domain);

        if let Some(certificate) = self.api.view_crypto_certificate(&store.domain, alias).await? {
            objects
                .delete(CryptoKind::Certificate, &certificate.name)
                .await?;
            if let Some(reference) = certificate.file_reference.as_deref() {
                let filename = FileReference::bare_filename(&store.certificate_store, reference);
                self.api
                    .delete_certificate_file(&store.domain, filename)
                    .await?;
            }
        } else {
            tracing::debug!("No crypto certificate named '{alias}'");
        }

        let key_name = paired_key_object_name(alias, prefixes);
        let keys = self
            .api
            .view_crypto_objects(&store.domain, CryptoKind::Key)
            .await?;

        match keys.into_iter().find(|key| key.name == key_name) {
            Some(key) => {
                objects.delete(CryptoKind::Key, &key.name).await?;
                if let Some(reference) = key.file_reference.as_deref() {
                    let filename =
                        FileReference::bare_filename(&store.certificate_store, reference);
                    self.api
                        .delete_certificate_file(&store.domain, filename)
                        .await?;
                }
            }
            None => tracing::debug!("No crypto key named '{key_name}'"),
        }

        Ok(())
    }

    /// Best-effort save-config, then fold the step result into a soft error
    async fn commit(
        &self,
        operation: &str,
        store: &StoreDescriptor,
        result: Result<()>,
    ) -> ReconciliationError {
        let saved = self.api.save_config(&store.domain).await;
        if let Err(e) = &saved {
            tracing::error!("Failed to save configuration of domain '{}': {e}", store.domain);
        }

        match result {
            Ok(()) => ReconciliationError::ok(),
            Err(e) => {
                tracing::warn!("Certificate {operation} failed in domain '{}': {e}", store.domain);
                ReconciliationError::failed(e.to_string())
            }
        }
    }
}
