// src/backend/http_backend.rs

use std::time::{Duration, Instant};

use async_trait::async_trait;
use serde::de::DeserializeOwned;
use serde_json::Value;
use uuid::Uuid;

use crate::{
    backend::SalesBackend,
    common::error::AppError,
    models::sales::{ClientEntry, SaleRecord, SalesFilter},
};

#[derive(Clone)]
pub struct HttpSalesBackend {
    client: reqwest::Client,
    base_url: String,
    timeout: Duration,
}

impl HttpSalesBackend {
    pub fn new(base_url: &str, timeout: Duration) -> anyhow::Result<Self> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .pool_max_idle_per_host(4)
            .pool_idle_timeout(Some(Duration::from_secs(90)))
            .build()
            .map_err(|err| anyhow::anyhow!("Falha ao criar o cliente HTTP do backend: {err}"))?;

        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            timeout,
        })
    }

    fn map_reqwest_error(&self, err: reqwest::Error) -> AppError {
        if err.is_timeout() {
            AppError::BackendTimeout(self.timeout.as_secs())
        } else {
            AppError::BackendError(err)
        }
    }

    async fn get_rows(
        &self,
        path: &str,
        query: &[(&str, &str)],
        token: Option<&str>,
    ) -> Result<Vec<Value>, AppError> {
        let correlation_id = Uuid::new_v4();
        let url = format!("{}/{}", self.base_url, path);
        let start = Instant::now();

        let mut request = self.client.get(&url).query(query);
        if let Some(token) = token {
            request = request.bearer_auth(token);
        }

        let response = request
            .send()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;

        let status = response.status();
        if !status.is_success() {
            tracing::warn!(%correlation_id, %url, status = status.as_u16(), "backend recusou a listagem");
            return Err(AppError::BackendStatus { status });
        }

        let body: Value = response
            .json()
            .await
            .map_err(|err| self.map_reqwest_error(err))?;
        let rows = extract_rows(body);

        tracing::debug!(
            %correlation_id,
            %url,
            rows = rows.len(),
            latency_ms = start.elapsed().as_millis() as u64,
            "listagem recebida"
        );
        Ok(rows)
    }
}

// Aceita `[...]` ou um envelope `{ "data": [...] }` / `{ "ventas": [...] }`
fn extract_rows(body: Value) -> Vec<Value> {
    match body {
        Value::Array(rows) => rows,
        Value::Object(mut map) => ["data", "ventas", "clientes", "results"]
            .iter()
            .find_map(|key| match map.remove(*key) {
                Some(Value::Array(rows)) => Some(rows),
                _ => None,
            })
            .unwrap_or_default(),
        _ => Vec::new(),
    }
}

// Um item que nem é objeto é descartado sozinho, sem derrubar a lista
fn decode_rows<T: DeserializeOwned>(rows: Vec<Value>, what: &str) -> Vec<T> {
    let total = rows.len();
    let decoded: Vec<T> = rows
        .into_iter()
        .filter_map(|row| serde_json::from_value(row).ok())
        .collect();

    if decoded.len() < total {
        tracing::warn!(
            skipped = total - decoded.len(),
            total,
            "{what}: registros malformados ignorados"
        );
    }
    decoded
}

#[async_trait]
impl SalesBackend for HttpSalesBackend {
    async fn list_sales(
        &self,
        filter: &SalesFilter,
        token: Option<&str>,
    ) -> Result<Vec<SaleRecord>, AppError> {
        let mut query: Vec<(&str, &str)> = Vec::new();
        if let Some(client_id) = filter.client_id.as_deref() {
            query.push(("cliente_id", client_id));
        }

        let rows = self.get_rows("ventas", &query, token).await?;
        Ok(decode_rows(rows, "ventas"))
    }

    async fn list_clients(&self, token: Option<&str>) -> Result<Vec<ClientEntry>, AppError> {
        let rows = self.get_rows("clientes", &[], token).await?;
        Ok(decode_rows(rows, "clientes"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn rows_come_from_array_or_envelope() {
        assert_eq!(extract_rows(json!([1, 2])).len(), 2);
        assert_eq!(extract_rows(json!({"data": [1]})).len(), 1);
        assert_eq!(extract_rows(json!({"ventas": [1, 2, 3]})).len(), 3);
        assert!(extract_rows(json!({"other": [1]})).is_empty());
        assert!(extract_rows(json!("nope")).is_empty());
    }

    #[test]
    fn non_object_rows_are_dropped_individually() {
        let rows = vec![json!({"id": 1, "fecha": "2024-07-01"}), json!(42), json!(null)];
        let records: Vec<SaleRecord> = decode_rows(rows, "ventas");
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].id, Some(1));
    }
}
