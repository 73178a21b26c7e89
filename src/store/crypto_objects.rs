//! Capability handles over crypto configuration objects.
//!
//! The appliance refuses to delete a crypto object that is still referenced,
//! so the replace path only ever sees a [`CryptoObjectReplacer`], which can
//! create, disable and re-point objects but has no delete. Deletion lives on
//! the separate [`CryptoObjectRemover`], handed out only to explicit removal.

use crate::appliance::{ApplianceApi, CryptoKind, CryptoObject, FileReference};
use crate::utils::errors::Result;

/// What `CryptoObjectReplacer::replace` ended up doing
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReplaceAction {
    Created,
    Repointed,
}

pub struct CryptoObjectReplacer<'a, A: ApplianceApi> {
    api: &'a A,
    domain: &'a str,
}

impl<'a, A: ApplianceApi> CryptoObjectReplacer<'a, A> {
    pub fn new(api: &'a A, domain: &'a str) -> Self {
        Self { api, domain }
    }

    /// True when exactly one object of `kind` carries `name`
    pub async fn exists(&self, kind: CryptoKind, name: &str) -> Result<bool> {
        let objects = self.api.view_crypto_objects(self.domain, kind).await?;
        let matches = objects.iter().filter(|object| object.name == name).count();
        Ok(matches == 1)
    }

    pub async fn disable(&self, kind: CryptoKind, name: &str) -> Result<()> {
        tracing::debug!("Disabling {kind} '{name}'");
        self.api
            .update_crypto_object(self.domain, kind, &CryptoObject::disabled(name))
            .await
    }

    pub async fn repoint(&self, kind: CryptoKind, name: &str, file: &FileReference) -> Result<()> {
        tracing::debug!("Pointing {kind} '{name}' at {file}");
        self.api
            .update_crypto_object(self.domain, kind, &CryptoObject::referencing(name, file))
            .await
    }

    pub async fn create(&self, kind: CryptoKind, name: &str, file: &FileReference) -> Result<()> {
        tracing::debug!("Creating {kind} '{name}' for {file}");
        self.api
            .add_crypto_object(self.domain, kind, &CryptoObject::referencing(name, file))
            .await
    }

    /// Disable and re-point an existing object, or create it when absent
    pub async fn replace(
        &self,
        kind: CryptoKind,
        name: &str,
        file: &FileReference,
    ) -> Result<ReplaceAction> {
        if self.exists(kind, name).await? {
            self.disable(kind, name).await?;
            self.repoint(kind, name, file).await?;
            Ok(ReplaceAction::Repointed)
        } else {
            self.create(kind, name, file).await?;
            Ok(ReplaceAction::Created)
        }
    }
}

pub struct CryptoObjectRemover<'a, A: ApplianceApi> {
    api: &'a A,
    domain: &'a str,
}

impl<'a, A: ApplianceApi> CryptoObjectRemover<'a, A> {
    pub fn new(api: &'a A, domain: &'a str) -> Self {
        Self { api, domain }
    }

    pub async fn delete(&self, kind: CryptoKind, name: &str) -> Result<()> {
        tracing::debug!("Deleting {kind} '{name}'");
        self.api.delete_crypto_object(self.domain, kind, name).await
    }
}
