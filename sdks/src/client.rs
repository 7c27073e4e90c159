// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

use reqwest::Client;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;

use collab_core::presentation::dto::{
    DeleteRequest, ErrorResponse, KeyRequest, ReadbackRequest, RegisterRequest,
    UpdateDnsRecordRequest, UpdatePatternRequest,
};

use crate::types::*;

/// Client for the Collab admin API.
///
/// Every call except [`create_domain`](Self::create_domain) and
/// [`health`](Self::health) is scoped to the domain owning the access key.
#[derive(Clone)]
pub struct CollabClient {
    base_url: String,
    client: Client,
    access_key: Option<String>,
}

impl CollabClient {
    /// Create a new client for the server at `base_url`.
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into().trim_end_matches('/').to_string(),
            client: Client::new(),
            access_key: None,
        }
    }

    /// Set the access key sent with every tenant-scoped call.
    pub fn with_access_key(mut self, access_key: impl Into<String>) -> Self {
        self.access_key = Some(access_key.into());
        self
    }

    pub fn access_key(&self) -> Option<&str> {
        self.access_key.as_deref()
    }

    async fn post<B, T>(&self, route: &str, body: &B) -> Result<T>
    where
        B: Serialize + ?Sized,
        T: DeserializeOwned,
    {
        let url = format!("{}/api/{}", self.base_url, route);
        let response = self.client.post(&url).json(body).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = match response.json::<ErrorResponse>().await {
                Ok(body) => body.error,
                Err(_) => status.canonical_reason().unwrap_or("request failed").to_string(),
            };
            return Err(CollabError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    fn key_request(&self) -> KeyRequest {
        KeyRequest {
            access_key: self.access_key.clone(),
        }
    }

    fn readback_request(&self, after: Option<i64>, pattern_id: Option<&str>) -> ReadbackRequest {
        ReadbackRequest {
            access_key: self.access_key.clone(),
            after: after.map(Value::from),
            pattern_id: pattern_id.map(Value::from),
        }
    }

    fn delete_request(&self, id: &ResourceId) -> DeleteRequest {
        DeleteRequest {
            access_key: self.access_key.clone(),
            id: Some(id.as_str().to_string()),
        }
    }

    /// Liveness probe; `Ok` if the server answered `200`.
    pub async fn health(&self) -> Result<()> {
        let response = self
            .client
            .get(format!("{}/health", self.base_url))
            .send()
            .await?;
        response.error_for_status()?;
        Ok(())
    }

    /// Register a domain. `host` is the requested label; the server
    /// generates one when it is `None`.
    pub async fn create_domain(&self, host: Option<&str>) -> Result<RegistrationResponse> {
        let request = RegisterRequest {
            host: host.map(str::to_string),
        };
        self.post("createDomain", &request).await
    }

    pub async fn get_domain(&self) -> Result<DomainSummary> {
        self.post("getDomain", &self.key_request()).await
    }

    /// Captured HTTP requests after `after` (Unix seconds, exclusive),
    /// optionally only those answered by `pattern_id`.
    pub async fn http_requests(
        &self,
        after: Option<i64>,
        pattern_id: Option<&str>,
    ) -> Result<Vec<HttpInteraction>> {
        self.post("getRequests", &self.readback_request(after, pattern_id))
            .await
    }

    pub async fn dns_requests(&self, after: Option<i64>) -> Result<Vec<DnsInteraction>> {
        self.post("getDNSRequests", &self.readback_request(after, None))
            .await
    }

    pub async fn smtp_requests(&self, after: Option<i64>) -> Result<Vec<SmtpInteraction>> {
        self.post("getSMTPRequests", &self.readback_request(after, None))
            .await
    }

    pub async fn patterns(&self) -> Result<Vec<Pattern>> {
        self.post("getPatterns", &self.key_request()).await
    }

    pub async fn create_pattern(&self) -> Result<Pattern> {
        self.post("createPattern", &self.key_request()).await
    }

    /// Replace the fields of pattern `id`. Fields left `None` are cleared.
    pub async fn update_pattern(&self, id: &ResourceId, fields: &PatternFields) -> Result<UpdateResponse> {
        let request = UpdatePatternRequest {
            access_key: self.access_key.clone(),
            response: Some(with_id(id, serde_json::to_value(fields)?)),
        };
        self.post("updatePattern", &request).await
    }

    /// Returns false if no such pattern exists for this domain.
    pub async fn delete_pattern(&self, id: &ResourceId) -> Result<bool> {
        let response: DeleteResponse = self.post("deletePattern", &self.delete_request(id)).await?;
        Ok(response.success)
    }

    pub async fn dns_records(&self) -> Result<Vec<DnsRecord>> {
        self.post("getDnsRecords", &self.key_request()).await
    }

    pub async fn create_dns_record(&self) -> Result<DnsRecord> {
        self.post("createDnsRecord", &self.key_request()).await
    }

    /// Replace the whole shape of record `id`, including its variant.
    pub async fn update_dns_record(&self, id: &ResourceId, shape: &DnsRecordShape) -> Result<UpdateResponse> {
        let request = UpdateDnsRecordRequest {
            access_key: self.access_key.clone(),
            record: Some(with_id(id, serde_json::to_value(shape)?)),
        };
        self.post("updateDnsRecord", &request).await
    }

    pub async fn delete_dns_record(&self, id: &ResourceId) -> Result<bool> {
        let response: DeleteResponse = self.post("deleteDnsRecord", &self.delete_request(id)).await?;
        Ok(response.success)
    }
}

fn with_id(id: &ResourceId, mut fields: Value) -> Value {
    if let Value::Object(map) = &mut fields {
        map.insert("id".to_string(), Value::String(id.as_str().to_string()));
    }
    fields
}
