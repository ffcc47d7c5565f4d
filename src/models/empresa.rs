// src/models/empresa.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// O estabelecimento (tenant). Resolvido por slug em toda rota pública
// e de painel; imutável após a criação, exceto os campos de marca.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Empresa {
    pub id: Uuid,
    pub nome_fantasia: String,
    pub slug: String,
    pub logo_url: Option<String>,
    pub telefone: Option<String>,
    pub admin_id: Uuid,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Apenas os campos de marca podem ser alterados depois do registro.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEmpresaPayload {
    #[validate(length(min = 1, message = "O nome fantasia não pode ser vazio."))]
    pub nome_fantasia: Option<String>,
    pub logo_url: Option<String>,
    pub telefone: Option<String>,
}
