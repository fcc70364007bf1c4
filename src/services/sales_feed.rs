// src/services/sales_feed.rs

//! Busca das vendas no backend com "a última requisição vence".
//!
//! Cada tela (escopo) tem no máximo uma busca em andamento. Uma busca nova
//! no mesmo escopo aborta a anterior e recebe um número de sequência; uma
//! resposta que chega depois de ter sido substituída é descartada, mesmo
//! que as respostas cheguem fora de ordem.

use std::{
    collections::HashMap,
    sync::{Arc, Mutex, MutexGuard},
    time::Duration,
};

use chrono::{DateTime, Utc};
use tokio::task::AbortHandle;

use crate::{
    backend::SalesBackend,
    common::error::AppError,
    models::sales::{ClientId, SaleRecord, SalesFilter},
};

/// Quem está pedindo: o escopo da "última requisição vence" e o token
/// repassado ao backend.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ViewScope {
    pub key: Option<String>,
    pub token: Option<String>,
}

impl ViewScope {
    /// Só o header `x-view-id` abre um escopo; o token nunca vira chave.
    pub fn new(view_id: Option<String>, token: Option<String>) -> Self {
        let key = view_id
            .map(|id| id.trim().to_string())
            .filter(|id| !id.is_empty())
            .map(|id| format!("view:{id}"));
        Self { key, token }
    }

    /// Estreita o escopo para um componente da tela (rota, série).
    /// Sem escopo, continua sem escopo.
    pub fn within(mut self, part: &str) -> Self {
        self.key = self.key.map(|key| format!("{key}|{part}"));
        self
    }
}

#[derive(Debug, Clone)]
pub struct SalesSnapshot {
    pub seq: u64,
    pub filter: SalesFilter,
    pub records: Vec<SaleRecord>,
    pub clients: HashMap<ClientId, String>,
    pub fetched_at: DateTime<Utc>,
}

struct InFlight {
    seq: u64,
    abort: AbortHandle,
}

struct FeedInner {
    backend: Arc<dyn SalesBackend>,
    timeout: Duration,
    service_token: Option<String>,
    next_seq: Mutex<u64>,
    in_flight: Mutex<HashMap<String, InFlight>>,
}

#[derive(Clone)]
pub struct SalesFeed {
    inner: Arc<FeedInner>,
}

type FetchResult = Result<(Vec<SaleRecord>, HashMap<ClientId, String>), AppError>;

async fn fetch(
    backend: Arc<dyn SalesBackend>,
    filter: SalesFilter,
    token: Option<String>,
    with_clients: bool,
) -> FetchResult {
    let token = token.as_deref();

    if !with_clients {
        let records = backend.list_sales(&filter, token).await?;
        return Ok((records, HashMap::new()));
    }

    let (records, clients) = tokio::join!(backend.list_sales(&filter, token), backend.list_clients(token));
    let records = records?;

    // O diretório só dá nome aos clientes; sem ele o ranking continua
    let directory = match clients {
        Ok(clients) => clients
            .into_iter()
            .filter_map(|c| c.name.map(|name| (c.id, name)))
            .collect(),
        Err(e) => {
            tracing::warn!("Diretório de clientes indisponível: {}", e);
            HashMap::new()
        }
    };

    Ok((records, directory))
}

impl FeedInner {
    fn lock_in_flight(&self) -> MutexGuard<'_, HashMap<String, InFlight>> {
        // Um pânico segurando o lock não invalida o mapa
        self.in_flight
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    fn next_seq(&self) -> u64 {
        let mut seq = self
            .next_seq
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *seq += 1;
        *seq
    }

    /// Tira a entrada do escopo se ela ainda for desta busca.
    /// Retorna se a busca ainda era a mais recente.
    fn release(&self, key: &str, seq: u64) -> bool {
        let mut in_flight = self.lock_in_flight();
        match in_flight.get(key) {
            Some(current) if current.seq == seq => {
                in_flight.remove(key);
                true
            }
            _ => false,
        }
    }
}

// Dono da busca em andamento enquanto o `load` espera. Se o future do
// handler for descartado (cliente desconectou), aborta a task e limpa o
// registro do escopo.
struct FetchGuard {
    inner: Arc<FeedInner>,
    key: Option<String>,
    seq: u64,
    abort: AbortHandle,
    done: bool,
}

impl FetchGuard {
    fn finish(mut self) -> bool {
        self.done = true;
        match self.key.as_deref() {
            Some(key) => self.inner.release(key, self.seq),
            None => true,
        }
    }
}

impl Drop for FetchGuard {
    fn drop(&mut self) {
        if self.done {
            return;
        }
        self.abort.abort();
        if let Some(key) = self.key.as_deref() {
            if self.inner.release(key, self.seq) {
                tracing::debug!(scope = %key, seq = self.seq, "busca abandonada pelo cliente");
            }
        }
    }
}

impl SalesFeed {
    pub fn new(
        backend: Arc<dyn SalesBackend>,
        timeout: Duration,
        service_token: Option<String>,
    ) -> Self {
        Self {
            inner: Arc::new(FeedInner {
                backend,
                timeout,
                service_token,
                next_seq: Mutex::new(0),
                in_flight: Mutex::new(HashMap::new()),
            }),
        }
    }

    /// Quantos escopos têm busca registrada agora.
    pub fn in_flight_scopes(&self) -> usize {
        self.inner.lock_in_flight().len()
    }

    /// Busca as vendas (e, se pedido, o diretório de clientes) para o escopo.
    pub async fn load(
        &self,
        scope: &ViewScope,
        filter: SalesFilter,
        with_clients: bool,
    ) -> Result<SalesSnapshot, AppError> {
        let timeout = self.inner.timeout;
        let backend = Arc::clone(&self.inner.backend);
        let token = scope.token.clone().or_else(|| self.inner.service_token.clone());
        let task_filter = filter.clone();

        let task = async move {
            tokio::time::timeout(timeout, fetch(backend, task_filter, token, with_clients)).await
        };

        // Sequência, spawn e registro sob o mesmo lock: quem registra por
        // último é sempre quem tem a maior sequência do escopo.
        let (guard, handle) = {
            let mut in_flight = self.inner.lock_in_flight();
            let seq = self.inner.next_seq();
            let handle = tokio::spawn(task);

            if let Some(key) = scope.key.as_ref() {
                let entry = InFlight {
                    seq,
                    abort: handle.abort_handle(),
                };
                if let Some(previous) = in_flight.insert(key.clone(), entry) {
                    tracing::debug!(scope = %key, superseded = previous.seq, by = seq, "abortando busca substituída");
                    previous.abort.abort();
                }
            }

            let guard = FetchGuard {
                inner: Arc::clone(&self.inner),
                key: scope.key.clone(),
                seq,
                abort: handle.abort_handle(),
                done: false,
            };
            (guard, handle)
        };

        let outcome = handle.await;
        let seq = guard.seq;
        let still_latest = guard.finish();

        let (records, clients) = match outcome {
            Err(join_err) if join_err.is_cancelled() => return Err(AppError::Superseded),
            Err(join_err) => {
                return Err(AppError::InternalServerError(anyhow::anyhow!(
                    "Busca de vendas falhou: {join_err}"
                )));
            }
            Ok(Err(_elapsed)) => {
                if !still_latest {
                    return Err(AppError::Superseded);
                }
                return Err(AppError::BackendTimeout(timeout.as_secs()));
            }
            Ok(Ok(result)) => {
                // Resposta atrasada de uma busca já substituída: descarta
                if !still_latest {
                    tracing::debug!(seq, "resposta obsoleta descartada");
                    return Err(AppError::Superseded);
                }
                result?
            }
        };

        tracing::info!(
            seq,
            records = records.len(),
            client = filter.client_id.as_deref().unwrap_or("*"),
            "vendas carregadas"
        );

        Ok(SalesSnapshot {
            seq,
            filter,
            records,
            clients,
            fetched_at: Utc::now(),
        })
    }
}
