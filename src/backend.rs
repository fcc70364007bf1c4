// src/backend.rs

// A API REST de vendas é externa: aqui só fica o contrato de leitura.

use async_trait::async_trait;

use crate::{
    common::error::AppError,
    models::sales::{ClientEntry, SaleRecord, SalesFilter},
};

pub mod http_backend;
pub use http_backend::HttpSalesBackend;

#[async_trait]
pub trait SalesBackend: Send + Sync {
    async fn list_sales(
        &self,
        filter: &SalesFilter,
        token: Option<&str>,
    ) -> Result<Vec<SaleRecord>, AppError>;

    async fn list_clients(&self, token: Option<&str>) -> Result<Vec<ClientEntry>, AppError>;
}
