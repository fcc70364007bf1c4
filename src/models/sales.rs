// src/models/sales.rs

use chrono::{DateTime, FixedOffset, NaiveDate, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

// Identificador opaco do cliente. O backend às vezes manda número, às vezes string.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ClientId(pub String);

impl ClientId {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for ClientId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

// --- VENTA (O Dado vindo do backend) ---

// Nomes aceitos para cada campo, em ordem de prioridade. Mais de um nome
// na mesma linha não é erro: vale o primeiro com valor utilizável.
const TIMESTAMP_KEYS: &[&str] = &["timestamp", "fecha", "fechaVenta", "fecha_venta", "createdAt"];
const ADVISOR_KEYS: &[&str] = &["advisorName", "asesor", "advisor"];
const CLIENT_ID_KEYS: &[&str] = &["clientId", "clienteId", "cliente_id"];
const CLIENT_NAME_KEYS: &[&str] = &["name", "nombre"];

/// Uma venda fechada, como o endpoint de listagem devolve.
///
/// Todos os campos consumidos pela agregação são opcionais: um campo com tipo
/// errado vira `None` e o registro só fica de fora das agregações que precisam
/// dele.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", from = "Map<String, Value>")]
pub struct SaleRecord {
    pub id: Option<i64>,

    pub timestamp: Option<String>,

    // Texto livre, sem normalização: "Ana" e "ana" são asesores diferentes
    pub advisor_name: Option<String>,

    pub client_id: Option<ClientId>,

    // Campos que a agregação não usa, preservados como vieram
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl From<Map<String, Value>> for SaleRecord {
    fn from(mut row: Map<String, Value>) -> Self {
        let id = lenient::take_first(&mut row, &["id"], lenient::integer);
        let timestamp = lenient::take_first(&mut row, TIMESTAMP_KEYS, lenient::string);
        let advisor_name = lenient::take_first(&mut row, ADVISOR_KEYS, lenient::string);
        let client_id = lenient::take_first(&mut row, CLIENT_ID_KEYS, lenient::client_id);

        Self {
            id,
            timestamp,
            advisor_name,
            client_id,
            extra: row,
        }
    }
}

impl SaleRecord {
    /// Interpreta o `timestamp` e o converte para o fuso do dashboard.
    pub fn occurred_at(&self, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
        self.timestamp
            .as_deref()
            .and_then(|raw| parse_timestamp(raw, offset))
    }

    /// Nome do asesor, se houver algo além de espaços.
    pub fn advisor(&self) -> Option<&str> {
        self.advisor_name
            .as_deref()
            .filter(|name| !name.trim().is_empty())
    }
}

/// Aceita RFC 3339, data-hora sem fuso (interpretada no fuso do dashboard)
/// e data pura (meia-noite UTC).
pub fn parse_timestamp(raw: &str, offset: FixedOffset) -> Option<DateTime<FixedOffset>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&offset));
    }

    for format in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, format) {
            return offset.from_local_datetime(&naive).single();
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc().with_timezone(&offset))
}

// --- FILTRO DA LISTAGEM ---

/// Filtro repassado ao endpoint de listagem (`?cliente_id=`).
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct SalesFilter {
    pub client_id: Option<String>,
}

impl SalesFilter {
    pub fn for_client(client_id: Option<&str>) -> Self {
        Self {
            client_id: client_id
                .map(str::trim)
                .filter(|id| !id.is_empty())
                .map(str::to_string),
        }
    }
}

// --- DIRETÓRIO DE CLIENTES ---

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", try_from = "Map<String, Value>")]
pub struct ClientEntry {
    pub id: ClientId,
    pub name: Option<String>,
}

impl TryFrom<Map<String, Value>> for ClientEntry {
    type Error = String;

    fn try_from(mut row: Map<String, Value>) -> Result<Self, Self::Error> {
        let id = lenient::take_first(&mut row, &["id"], lenient::client_id)
            .ok_or_else(|| "id de cliente ausente ou inválido".to_string())?;
        let name = lenient::take_first(&mut row, CLIENT_NAME_KEYS, lenient::string);
        Ok(Self { id, name })
    }
}

// Conversões tolerantes: tipo errado vira None em vez de erro
mod lenient {
    use super::*;

    /// Remove todos os nomes do campo da linha e devolve o primeiro valor,
    /// na ordem de `keys`, que `convert` aceita.
    pub fn take_first<T>(
        row: &mut Map<String, Value>,
        keys: &[&str],
        convert: fn(Value) -> Option<T>,
    ) -> Option<T> {
        keys.iter()
            .filter_map(|key| row.remove(*key))
            .collect::<Vec<_>>()
            .into_iter()
            .find_map(convert)
    }

    pub fn string(value: Value) -> Option<String> {
        match value {
            Value::String(s) => Some(s),
            _ => None,
        }
    }

    pub fn integer(value: Value) -> Option<i64> {
        match value {
            Value::Number(n) => n.as_i64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    pub fn client_id(value: Value) -> Option<ClientId> {
        match value {
            Value::String(s) if !s.trim().is_empty() => Some(ClientId(s)),
            Value::Number(n) => Some(ClientId(n.to_string())),
            _ => None,
        }
    }
}
