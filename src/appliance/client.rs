use crate::appliance::api::ApplianceApi;
use crate::appliance::models::{
    CertificateDetails, CertificateDetailsResponse, CryptoKind, CryptoObject, FileContentResponse,
    FileEntry, FilestoreResponse,
};
use crate::appliance::normalize::{has_member, is_empty_listing, wrap_single_item};
use crate::appliance::{PUBLIC_DOMAIN, PUBLIC_FOLDER};
use crate::config::AgentSettings;
use crate::utils::errors::{AgentError, Result};
use reqwest::{Client, Method, StatusCode};
use serde_json::{json, Value};

/// Folder used by filestore deletes
const DELETE_FOLDER: &str = "cert";

/// HTTP client for the appliance REST management interface (`/mgmt/...`)
pub struct ApplianceClient {
    client: Client,
    base_url: String,
    username: String,
    password: String,
}

impl ApplianceClient {
    pub fn new(
        base_url: impl Into<String>,
        username: impl Into<String>,
        password: impl Into<String>,
        settings: &AgentSettings,
    ) -> Result<Self> {
        let client = super::create_http_client(settings)?;
        Ok(Self {
            client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            username: username.into(),
            password: password.into(),
        })
    }

    /// Issue one request and return status and raw body
    async fn send(
        &self,
        call: &str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<(StatusCode, String)> {
        let url = format!("{}{}", self.base_url, path);
        tracing::trace!("BEGIN {call}: {method} {url}");

        let mut request = self
            .client
            .request(method, &url)
            .basic_auth(&self.username, Some(&self.password))
            .header("Content-Type", "application/json");
        if let Some(body) = body {
            request = request.json(body);
        }

        let response = request.send().await?;
        let status = response.status();
        let text = response.text().await?;
        tracing::trace!("END {call}: {status} {text}");

        Ok((status, text))
    }

    /// Like `send`, but any non-success status becomes an error
    async fn request(
        &self,
        call: &str,
        method: Method,
        path: &str,
        body: Option<&Value>,
    ) -> Result<String> {
        let (status, text) = self.send(call, method, path, body).await?;
        if status.is_success() {
            Ok(text)
        } else {
            Err(AgentError::Api {
                call: call.to_string(),
                status: status.as_u16(),
                body: text,
            })
        }
    }
}

fn config_path(domain: &str, kind: CryptoKind) -> String {
    format!("/mgmt/config/{}/{}", domain.trim(), kind.class_name())
}

fn action_path(domain: &str) -> String {
    format!("/mgmt/actionqueue/{}", domain.trim())
}

impl ApplianceApi for ApplianceClient {
    async fn view_certificate_files(&self, domain: &str, folder: &str) -> Result<Vec<FileEntry>> {
        let path = format!("/mgmt/filestore/{}/{}", domain.trim(), folder.trim());
        let body = self
            .request("ViewCertificateFiles", Method::GET, &path, None)
            .await?;

        let body = wrap_single_item(&body, "file")?;
        let response: FilestoreResponse = serde_json::from_str(&body)?;
        Ok(response.into_files())
    }

    async fn view_public_certificate_detail(&self, filename: &str) -> Result<String> {
        let path = format!(
            "/mgmt/filestore/{PUBLIC_DOMAIN}/{PUBLIC_FOLDER}/{}",
            filename.trim()
        );
        let body = self
            .request("ViewPublicCertificateDetail", Method::GET, &path, None)
            .await?;

        let response: FileContentResponse = serde_json::from_str(&body)?;
        Ok(response.file)
    }

    async fn add_or_replace_certificate_file(
        &self,
        domain: &str,
        folder: &str,
        filename: &str,
        content: &str,
    ) -> Result<()> {
        let filename = filename.trim();
        let path = format!(
            "/mgmt/filestore/{}/{}/{}",
            domain.trim(),
            folder.trim(),
            filename
        );
        let payload = json!({
            "file": {
                "name": filename,
                "content": content,
            }
        });

        self.request("AddCertificateFile", Method::PUT, &path, Some(&payload))
            .await?;
        Ok(())
    }

    async fn delete_certificate_file(&self, domain: &str, filename: &str) -> Result<()> {
        let path = format!(
            "/mgmt/filestore/{}/{DELETE_FOLDER}/{}",
            domain.trim(),
            filename.trim()
        );
        self.request("DeleteCertificateFile", Method::DELETE, &path, None)
            .await?;
        Ok(())
    }

    async fn view_crypto_objects(
        &self,
        domain: &str,
        kind: CryptoKind,
    ) -> Result<Vec<CryptoObject>> {
        let call = format!("View{kind}s");
        let body = self
            .request(&call, Method::GET, &config_path(domain, kind), None)
            .await?;

        if is_empty_listing(&body) || has_member(&body, "error") {
            return Ok(Vec::new());
        }

        let body = wrap_single_item(&body, kind.class_name())?;
        let mut response: Value = serde_json::from_str(&body)?;
        match response.get_mut(kind.class_name()).map(Value::take) {
            Some(Value::Null) | None => Ok(Vec::new()),
            Some(items) => Ok(serde_json::from_value(items)?),
        }
    }

    async fn view_crypto_certificate(
        &self,
        domain: &str,
        name: &str,
    ) -> Result<Option<CryptoObject>> {
        let kind = CryptoKind::Certificate;
        let path = format!("{}/{}", config_path(domain, kind), name.trim());
        let (status, body) = self
            .send("ViewCryptoCertificate", Method::GET, &path, None)
            .await?;

        if status == StatusCode::NOT_FOUND {
            return Ok(None);
        }
        if !status.is_success() {
            return Err(AgentError::Api {
                call: "ViewCryptoCertificate".to_string(),
                status: status.as_u16(),
                body,
            });
        }
        if has_member(&body, "error") {
            return Ok(None);
        }

        let mut response: Value = serde_json::from_str(&body)?;
        let object = match response.get_mut(kind.class_name()).map(Value::take) {
            Some(Value::Object(map)) => serde_json::from_value::<CryptoObject>(Value::Object(map))?,
            Some(Value::Array(mut items)) if items.len() == 1 => {
                serde_json::from_value::<CryptoObject>(items.remove(0))?
            }
            _ => return Ok(None),
        };

        Ok(Some(object).filter(|object| !object.name.is_empty()))
    }

    async fn view_certificate_details(
        &self,
        domain: &str,
        name: &str,
    ) -> Result<CertificateDetails> {
        let payload = json!({
            "ViewCertificateDetails": {
                "CertificateObject": name,
            }
        });
        let body = self
            .request(
                "ViewCertificateDetails",
                Method::POST,
                &action_path(domain),
                Some(&payload),
            )
            .await?;

        let response: CertificateDetailsResponse = serde_json::from_str(&body)?;
        response
            .crypto_certificate
            .map(|envelope| envelope.details)
            .ok_or_else(|| {
                AgentError::MalformedResponse(format!(
                    "no certificate details returned for '{name}'"
                ))
            })
    }

    async fn add_crypto_object(
        &self,
        domain: &str,
        kind: CryptoKind,
        object: &CryptoObject,
    ) -> Result<()> {
        let payload = json!({ kind.class_name(): object });
        self.request(
            &format!("Add{kind}"),
            Method::POST,
            &config_path(domain, kind),
            Some(&payload),
        )
        .await?;
        Ok(())
    }

    async fn update_crypto_object(
        &self,
        domain: &str,
        kind: CryptoKind,
        object: &CryptoObject,
    ) -> Result<()> {
        let path = format!("{}/{}", config_path(domain, kind), object.name.trim());
        let payload = json!({ kind.class_name(): object });
        self.request(&format!("Update{kind}"), Method::PUT, &path, Some(&payload))
            .await?;
        Ok(())
    }

    async fn delete_crypto_object(&self, domain: &str, kind: CryptoKind, name: &str) -> Result<()> {
        let path = format!("{}/{}", config_path(domain, kind), name.trim());
        self.request(&format!("Delete{kind}"), Method::DELETE, &path, None)
            .await?;
        Ok(())
    }

    async fn save_config(&self, domain: &str) -> Result<()> {
        let payload = json!({ "SaveConfig": "" });
        self.request("SaveConfig", Method::POST, &action_path(domain), Some(&payload))
            .await?;
        Ok(())
    }
}
