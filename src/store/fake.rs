//! In-memory appliance recording every call, for reconciler and collector tests

use crate::appliance::models::CertificateDetails;
use crate::appliance::{ApplianceApi, CryptoKind, CryptoObject, FileEntry};
use crate::utils::errors::{AgentError, Result};
use std::collections::BTreeMap;
use std::sync::Mutex;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Call {
    ListFiles(String),
    ViewPublicFile(String),
    PutFile(String),
    DeleteFile(String),
    ListObjects(CryptoKind),
    ViewCertificate(String),
    ViewDetails(String),
    AddObject(CryptoKind, CryptoObject),
    UpdateObject(CryptoKind, CryptoObject),
    DeleteObject(CryptoKind, String),
    SaveConfig(String),
}

impl Call {
    pub fn is_mutation(&self) -> bool {
        matches!(
            self,
            Call::PutFile(_)
                | Call::DeleteFile(_)
                | Call::AddObject(..)
                | Call::UpdateObject(..)
                | Call::DeleteObject(..)
                | Call::SaveConfig(_)
        )
    }
}

#[derive(Default)]
struct State {
    /// folder -> file name -> base64 content
    files: BTreeMap<String, BTreeMap<String, String>>,
    /// class name -> object name -> object
    objects: BTreeMap<&'static str, BTreeMap<String, CryptoObject>>,
    details: BTreeMap<String, CertificateDetails>,
}

#[derive(Default)]
pub struct FakeAppliance {
    calls: Mutex<Vec<Call>>,
    state: Mutex<State>,
    failing: Mutex<Vec<&'static str>>,
}

impl FakeAppliance {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(self, folder: &str, name: &str, content: &str) -> Self {
        self.lock_state()
            .files
            .entry(folder.to_string())
            .or_default()
            .insert(name.to_string(), content.to_string());
        self
    }

    pub fn with_object(self, kind: CryptoKind, object: CryptoObject) -> Self {
        self.lock_state()
            .objects
            .entry(kind.class_name())
            .or_default()
            .insert(object.name.clone(), object);
        self
    }

    pub fn with_details(self, name: &str, details: CertificateDetails) -> Self {
        self.lock_state().details.insert(name.to_string(), details);
        self
    }

    /// Make every call of the given operation name fail, e.g. `"PutFile"`
    pub fn failing_on(self, operation: &'static str) -> Self {
        self.failing
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(operation);
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    pub fn clear_calls(&self) {
        self.calls.lock().unwrap_or_else(|e| e.into_inner()).clear();
    }

    pub fn file_names(&self, folder: &str) -> Vec<String> {
        self.lock_state()
            .files
            .get(folder)
            .map(|files| files.keys().cloned().collect())
            .unwrap_or_default()
    }

    pub fn file_content(&self, folder: &str, name: &str) -> Option<String> {
        self.lock_state()
            .files
            .get(folder)
            .and_then(|files| files.get(name).cloned())
    }

    pub fn object(&self, kind: CryptoKind, name: &str) -> Option<CryptoObject> {
        self.lock_state()
            .objects
            .get(kind.class_name())
            .and_then(|objects| objects.get(name).cloned())
    }

    pub fn object_count(&self, kind: CryptoKind) -> usize {
        self.lock_state()
            .objects
            .get(kind.class_name())
            .map(BTreeMap::len)
            .unwrap_or_default()
    }

    fn lock_state(&self) -> std::sync::MutexGuard<'_, State> {
        self.state.lock().unwrap_or_else(|e| e.into_inner())
    }

    fn record(&self, operation: &'static str, call: Call) -> Result<()> {
        self.calls
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(call);
        let failing = self.failing.lock().unwrap_or_else(|e| e.into_inner());
        if failing.contains(&operation) {
            return Err(AgentError::Api {
                call: operation.to_string(),
                status: 500,
                body: "injected failure".to_string(),
            });
        }
        Ok(())
    }
}

impl ApplianceApi for FakeAppliance {
    async fn view_certificate_files(&self, _domain: &str, folder: &str) -> Result<Vec<FileEntry>> {
        self.record("ListFiles", Call::ListFiles(folder.to_string()))?;
        Ok(self
            .file_names(folder)
            .into_iter()
            .map(|name| FileEntry {
                name,
                modified: None,
            })
            .collect())
    }

    async fn view_public_certificate_detail(&self, filename: &str) -> Result<String> {
        self.record("ViewPublicFile", Call::ViewPublicFile(filename.to_string()))?;
        self.file_content("pubcert", filename)
            .ok_or_else(|| AgentError::Api {
                call: "ViewPublicCertificateDetail".to_string(),
                status: 404,
                body: format!("{filename} not found"),
            })
    }

    async fn add_or_replace_certificate_file(
        &self,
        _domain: &str,
        folder: &str,
        filename: &str,
        content: &str,
    ) -> Result<()> {
        self.record("PutFile", Call::PutFile(filename.to_string()))?;
        self.lock_state()
            .files
            .entry(folder.to_string())
            .or_default()
            .insert(filename.to_string(), content.to_string());
        Ok(())
    }

    async fn delete_certificate_file(&self, _domain: &str, filename: &str) -> Result<()> {
        self.record("DeleteFile", Call::DeleteFile(filename.to_string()))?;
        for files in self.lock_state().files.values_mut() {
            files.remove(filename);
        }
        Ok(())
    }

    async fn view_crypto_objects(
        &self,
        _domain: &str,
        kind: CryptoKind,
    ) -> Result<Vec<CryptoObject>> {
        self.record("ListObjects", Call::ListObjects(kind))?;
        Ok(self
            .lock_state()
            .objects
            .get(kind.class_name())
            .map(|objects| objects.values().cloned().collect())
            .unwrap_or_default())
    }

    async fn view_crypto_certificate(
        &self,
        _domain: &str,
        name: &str,
    ) -> Result<Option<CryptoObject>> {
        self.record("ViewCertificate", Call::ViewCertificate(name.to_string()))?;
        Ok(self.object(CryptoKind::Certificate, name))
    }

    async fn view_certificate_details(
        &self,
        _domain: &str,
        name: &str,
    ) -> Result<CertificateDetails> {
        self.record("ViewDetails", Call::ViewDetails(name.to_string()))?;
        self.lock_state()
            .details
            .get(name)
            .cloned()
            .ok_or_else(|| AgentError::MalformedResponse(format!("no details for '{name}'")))
    }

    async fn add_crypto_object(
        &self,
        _domain: &str,
        kind: CryptoKind,
        object: &CryptoObject,
    ) -> Result<()> {
        self.record("AddObject", Call::AddObject(kind, object.clone()))?;
        self.lock_state()
            .objects
            .entry(kind.class_name())
            .or_default()
            .insert(object.name.clone(), object.clone());
        Ok(())
    }

    async fn update_crypto_object(
        &self,
        _domain: &str,
        kind: CryptoKind,
        object: &CryptoObject,
    ) -> Result<()> {
        self.record("UpdateObject", Call::UpdateObject(kind, object.clone()))?;
        self.lock_state()
            .objects
            .entry(kind.class_name())
            .or_default()
            .insert(object.name.clone(), object.clone());
        Ok(())
    }

    async fn delete_crypto_object(
        &self,
        _domain: &str,
        kind: CryptoKind,
        name: &str,
    ) -> Result<()> {
        self.record("DeleteObject", Call::DeleteObject(kind, name.to_string()))?;
        if let Some(objects) = self.lock_state().objects.get_mut(kind.class_name()) {
            objects.remove(name);
        }
        Ok(())
    }

    async fn save_config(&self, domain: &str) -> Result<()> {
        self.record("SaveConfig", Call::SaveConfig(domain.to_string()))
    }
}
