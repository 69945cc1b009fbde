use std::fmt::{Display, Formatter, Result as FmtResult};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use super::image::UploadedEvidenceRef;
use crate::constants::RECORD_ID_PLACEHOLDERS;
use crate::error::{EvidenceError, EvidenceResult};

/// Business event an evidence photo proves.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum EvidenceKind {
    /// Fuel receipt ("nota fiscal") of a refueling
    Refueling,
    /// Invoice or receipt of a maintenance order ("ordem de serviço")
    MaintenanceOrder,
    /// Odometer reading at the start of a trip
    TripStart,
    /// Odometer reading at the end of a trip
    TripEnd,
}

impl EvidenceKind {
    /// Backend field that receives the photo URL.
    pub fn photo_field(self) -> &'static str {
        match self {
            EvidenceKind::Refueling => "fotoNotaFiscalUrl",
            EvidenceKind::MaintenanceOrder => "fotoComprovanteUrl",
            EvidenceKind::TripStart => "fotoInicioUrl",
            EvidenceKind::TripEnd => "fotoFimUrl",
        }
    }

    /// Category tag used to namespace storage keys.
    pub fn storage_category(self) -> &'static str {
        match self {
            EvidenceKind::Refueling => "abastecimentos",
            EvidenceKind::MaintenanceOrder => "manutencoes",
            EvidenceKind::TripStart | EvidenceKind::TripEnd => "geral",
        }
    }

    /// Infer the kind from an endpoint path and method, for callers that only
    /// know where the record goes.
    ///
    /// `abastecimentos` wins over `ordens-servico`; any other path is a trip,
    /// started by a create and finished by an update.
    pub fn infer(path: &str, method: SubmitMethod) -> Self {
        if path.contains("abastecimentos") {
            EvidenceKind::Refueling
        } else if path.contains("ordens-servico") {
            EvidenceKind::MaintenanceOrder
        } else if method == SubmitMethod::Create {
            EvidenceKind::TripStart
        } else {
            EvidenceKind::TripEnd
        }
    }
}

impl FromStr for EvidenceKind {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().replace('_', "-").as_str() {
            "refueling" | "abastecimento" => Ok(EvidenceKind::Refueling),
            "maintenance-order" | "ordem-servico" => Ok(EvidenceKind::MaintenanceOrder),
            "trip-start" => Ok(EvidenceKind::TripStart),
            "trip-end" => Ok(EvidenceKind::TripEnd),
            _ => Err(anyhow::anyhow!("Invalid evidence kind: {}", s)),
        }
    }
}

impl Display for EvidenceKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> FmtResult {
        match self {
            EvidenceKind::Refueling => write!(f, "refueling"),
            EvidenceKind::MaintenanceOrder => write!(f, "maintenance-order"),
            EvidenceKind::TripStart => write!(f, "trip-start"),
            EvidenceKind::TripEnd => write!(f, "trip-end"),
        }
    }
}

/// Whether a submission creates a record or updates an existing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmitMethod {
    #[default]
    Create,
    Update,
}

impl SubmitMethod {
    pub fn as_http_method(self) -> &'static str {
        match self {
            SubmitMethod::Create => "POST",
            SubmitMethod::Update => "PUT",
        }
    }
}

impl FromStr for SubmitMethod {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "create" | "post" => Ok(SubmitMethod::Create),
            "update" | "put" => Ok(SubmitMethod::Update),
            _ => Err(anyhow::anyhow!("Invalid submit method: {}", s)),
        }
    }
}

/// Where a record is submitted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTarget {
    pub method: SubmitMethod,
    /// Endpoint path, e.g. `/abastecimentos` or `/jornadas/{id}/finalizar`
    pub path: String,
    /// Substituted into a `{id}` or `:id` path segment
    pub record_id: Option<String>,
}

impl SubmitTarget {
    pub fn create(path: impl Into<String>) -> Self {
        Self {
            method: SubmitMethod::Create,
            path: path.into(),
            record_id: None,
        }
    }

    pub fn update(path: impl Into<String>, record_id: Option<String>) -> Self {
        Self {
            method: SubmitMethod::Update,
            path: path.into(),
            record_id,
        }
    }

    /// Resolve the final path.
    ///
    /// Placeholder segments are replaced in a single pass; a path without a
    /// placeholder already embeds its id and is returned verbatim.
    pub fn resolve_path(&self) -> EvidenceResult<String> {
        let has_placeholder = self
            .path
            .split('/')
            .any(|segment| RECORD_ID_PLACEHOLDERS.contains(&segment));
        if !has_placeholder {
            return Ok(self.path.clone());
        }

        let id = self
            .record_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
            .ok_or_else(|| {
                EvidenceError::InvalidInput(format!(
                    "Endpoint {} requires a record id",
                    self.path
                ))
            })?;
        if id.contains('/') {
            return Err(EvidenceError::InvalidInput(format!(
                "Invalid record id: {}",
                id
            )));
        }

        Ok(self
            .path
            .split('/')
            .map(|segment| {
                if RECORD_ID_PLACEHOLDERS.contains(&segment) {
                    id
                } else {
                    segment
                }
            })
            .collect::<Vec<_>>()
            .join("/"))
    }
}

/// Refueling record ("abastecimento").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RefuelingRecord {
    pub veiculo_id: i64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub fornecedor_id: Option<i64>,
    pub litros: f64,
    pub valor_total: f64,
    pub km_atual: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_hora: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto_nota_fiscal_url: Option<String>,
    /// Fields not modelled here, sent back to the backend unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Maintenance order ("ordem de serviço").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaintenanceOrderRecord {
    pub veiculo_id: i64,
    pub fornecedor_id: i64,
    pub descricao: String,
    pub valor_total: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub km_atual: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto_comprovante_url: Option<String>,
    /// Fields not modelled here, sent back to the backend unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Start of a trip ("jornada").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripStartRecord {
    pub veiculo_id: i64,
    pub operador_id: i64,
    pub km_inicio: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto_inicio_url: Option<String>,
    /// Fields not modelled here, sent back to the backend unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// End of a trip. The trip id travels in the endpoint, not in the body.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TripEndRecord {
    pub km_fim: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub observacoes: Option<String>,
    /// Trip registered after the fact by an administrator
    #[serde(rename = "jornadaFantasma", default)]
    pub ghost_journey: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub foto_fim_url: Option<String>,
    /// Fields not modelled here, sent back to the backend unchanged
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

/// Record submitted together with an evidence photo.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum EvidencePayload {
    Refueling(RefuelingRecord),
    MaintenanceOrder(MaintenanceOrderRecord),
    TripStart(TripStartRecord),
    TripEnd(TripEndRecord),
}

impl EvidencePayload {
    /// Parse a JSON record into the variant of the given kind.
    pub fn from_json(kind: EvidenceKind, value: Value) -> EvidenceResult<Self> {
        let parsed = match kind {
            EvidenceKind::Refueling => serde_json::from_value(value).map(Self::Refueling),
            EvidenceKind::MaintenanceOrder => {
                serde_json::from_value(value).map(Self::MaintenanceOrder)
            }
            EvidenceKind::TripStart => serde_json::from_value(value).map(Self::TripStart),
            EvidenceKind::TripEnd => serde_json::from_value(value).map(Self::TripEnd),
        };
        parsed.map_err(|e| EvidenceError::InvalidInput(format!("Invalid {} record: {}", kind, e)))
    }

    pub fn kind(&self) -> EvidenceKind {
        match self {
            EvidencePayload::Refueling(_) => EvidenceKind::Refueling,
            EvidencePayload::MaintenanceOrder(_) => EvidenceKind::MaintenanceOrder,
            EvidencePayload::TripStart(_) => EvidenceKind::TripStart,
            EvidencePayload::TripEnd(_) => EvidenceKind::TripEnd,
        }
    }

    fn photo_slot(&mut self) -> &mut Option<String> {
        match self {
            EvidencePayload::Refueling(r) => &mut r.foto_nota_fiscal_url,
            EvidencePayload::MaintenanceOrder(r) => &mut r.foto_comprovante_url,
            EvidencePayload::TripStart(r) => &mut r.foto_inicio_url,
            EvidencePayload::TripEnd(r) => &mut r.foto_fim_url,
        }
    }

    pub fn photo_url(&self) -> Option<&str> {
        match self {
            EvidencePayload::Refueling(r) => r.foto_nota_fiscal_url.as_deref(),
            EvidencePayload::MaintenanceOrder(r) => r.foto_comprovante_url.as_deref(),
            EvidencePayload::TripStart(r) => r.foto_inicio_url.as_deref(),
            EvidencePayload::TripEnd(r) => r.foto_fim_url.as_deref(),
        }
    }

    /// Overwrite the photo field with the uploaded URL.
    pub fn attach_photo(&mut self, evidence: &UploadedEvidenceRef) {
        *self.photo_slot() = Some(evidence.public_url().to_string());
    }

    /// Request body for the backend.
    pub fn to_body(&self) -> EvidenceResult<Value> {
        serde_json::to_value(self)
            .map_err(|e| EvidenceError::InvalidInput(format!("JSON encoding error: {}", e)))
    }
}
