// src/middleware/auth.rs

// A autenticação é da API de vendas: aqui só repassamos o Bearer que o
// front recebeu no login e identificamos a tela que está pedindo.

use axum::{
    extract::{FromRequestParts, OriginalUri},
    http::request::Parts,
};
use axum_extra::{
    headers::{authorization::Bearer, Authorization},
    TypedHeader,
};

use crate::services::sales_feed::ViewScope;

// O nome do nosso cabeçalho HTTP customizado
pub const VIEW_ID_HEADER: &str = "x-view-id";

impl<S> FromRequestParts<S> for ViewScope
where
    S: Send + Sync,
{
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        // Authorization ausente ou malformado = sem token, o config decide
        let token = TypedHeader::<Authorization<Bearer>>::from_request_parts(parts, state)
            .await
            .ok()
            .map(|TypedHeader(auth)| auth.token().to_string());

        let view_id = parts
            .headers
            .get(VIEW_ID_HEADER)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string);

        // Dentro de um `nest` o uri perde o prefixo; o original identifica a rota
        let route = parts
            .extensions
            .get::<OriginalUri>()
            .map(|OriginalUri(uri)| uri.path().to_string())
            .unwrap_or_else(|| parts.uri.path().to_string());

        Ok(ViewScope::new(view_id, token).within(&route))
    }
}
