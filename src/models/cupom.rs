// src/models/cupom.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum TipoCupom {
    Percentual,
    Fixo,
}

// Cupom de desconto por estabelecimento. O código (`nome`) é guardado
// sempre em maiúsculas; a comparação na aplicação é case-insensitive.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cupom {
    pub id: Uuid,
    pub empresa_id: Uuid,
    pub nome: String,
    pub tipo: TipoCupom,
    pub valor: Decimal,
    pub validade: NaiveDate,
    pub descricao: Option<String>,
    pub ativo: bool,
    pub created_at: DateTime<Utc>,
}

// Snapshot desnormalizado gravado no pedido: o pedido não depende do
// registro vivo do cupom.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CupomSnapshot {
    pub codigo: String,
    pub tipo: TipoCupom,
    pub valor: Decimal,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCupomPayload {
    #[validate(length(min = 1, message = "O código é obrigatório."))]
    pub nome: String,
    pub tipo: TipoCupom,
    pub valor: Decimal,
    pub validade: NaiveDate,
    pub descricao: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCupomPayload {
    pub valor: Option<Decimal>,
    pub validade: Option<NaiveDate>,
    pub descricao: Option<String>,
    pub ativo: Option<bool>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ApplyCupomPayload {
    #[validate(length(min = 1, message = "Informe o código do cupom."))]
    pub codigo: String,
}
