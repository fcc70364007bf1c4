use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    // Falha de rede/transporte ao falar com a API de vendas
    #[error("Falha ao consultar o backend de vendas: {0}")]
    BackendError(#[from] reqwest::Error),

    #[error("Backend de vendas respondeu {status}")]
    BackendStatus { status: StatusCode },

    #[error("Backend de vendas não respondeu em {0} segundos")]
    BackendTimeout(u64),

    // Uma busca mais nova, para a mesma tela, tomou o lugar desta
    #[error("Requisição substituída por uma mais recente")]
    Superseded,

    #[error("Erro ao gerar a imagem do gráfico: {0}")]
    ChartEncoding(#[from] image::ImageError),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            AppError::BackendError(_) | AppError::BackendStatus { .. } => StatusCode::BAD_GATEWAY,
            AppError::BackendTimeout(_) => StatusCode::GATEWAY_TIMEOUT,
            AppError::Superseded => StatusCode::CONFLICT,
            AppError::ChartEncoding(_) | AppError::InternalServerError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();

        let error_message = match self {
            // Retorna todos os detalhes da validação.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .map(|e| {
                            e.message
                                .as_ref()
                                .map(|m| m.to_string())
                                .unwrap_or_else(|| e.code.to_string())
                        })
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais parâmetros são inválidos.",
                    "details": details,
                }));
                return (status, body).into_response();
            }

            // Falhas do backend não derrubam nada: a tela mostra a mensagem e segue
            ref e @ (AppError::BackendError(_)
            | AppError::BackendStatus { .. }
            | AppError::BackendTimeout(_)) => {
                tracing::warn!("Falha no backend de vendas: {}", e);
                e.to_string()
            }

            AppError::Superseded => AppError::Superseded.to_string(),

            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                "Ocorreu um erro inesperado.".to_string()
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
