// src/models/catalogo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// --- Categorias ---
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: Uuid,
    pub empresa_id: Uuid,
    pub nome: String,
    pub ordem: i32,
    pub created_at: DateTime<Utc>,
}

// --- Itens do cardápio ---
// Quando `preco_a_partir` está ligado, o preço base não entra na soma do
// carrinho; o valor do item vem só das variações escolhidas.
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: Uuid,
    pub empresa_id: Uuid,
    pub category_id: Option<Uuid>,
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: Decimal,
    pub preco_a_partir: bool,
    pub disponivel: bool,
    pub imagem_path: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Grupos de variação ---
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct VariationGroup {
    pub id: Uuid,
    pub empresa_id: Uuid,
    pub nome: String,
    pub min_escolhas: i32,
    pub max_escolhas: i32,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Variation {
    pub id: Uuid,
    pub empresa_id: Uuid,
    pub nome: String,
    pub preco_adicional: Decimal,
}

// --- Visões compostas para o storefront ---

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct GrupoComVariacoes {
    #[serde(flatten)]
    pub grupo: VariationGroup,
    pub variacoes: Vec<Variation>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MenuItemDetalhado {
    #[serde(flatten)]
    pub item: MenuItem,
    // URL pública derivada do caminho no bucket `menu_images`
    pub imagem_url: Option<String>,
    pub grupos: Vec<GrupoComVariacoes>,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CardapioResponse {
    pub categorias: Vec<Category>,
    pub itens: Vec<MenuItemDetalhado>,
}

// --- Payloads do painel ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateCategoryPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[serde(default)]
    pub ordem: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateCategoryPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,
    pub ordem: Option<i32>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateMenuItemPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    pub descricao: Option<String>,
    pub preco: Decimal,
    #[serde(default)]
    pub preco_a_partir: bool,
    #[serde(default = "default_true")]
    pub disponivel: bool,
    pub category_id: Option<Uuid>,
    pub imagem_path: Option<String>,
    // Grupos de variação associados ao item, na ordem de exibição
    #[serde(default)]
    pub grupos: Vec<Uuid>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateMenuItemPayload {
    #[validate(length(min = 1, message = "O nome não pode ser vazio."))]
    pub nome: Option<String>,
    pub descricao: Option<String>,
    pub preco: Option<Decimal>,
    pub preco_a_partir: Option<bool>,
    pub disponivel: Option<bool>,
    pub category_id: Option<Uuid>,
    pub imagem_path: Option<String>,
    pub grupos: Option<Vec<Uuid>>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariationGroupPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[serde(default)]
    pub min_escolhas: i32,
    #[serde(default = "default_max_escolhas")]
    pub max_escolhas: i32,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateVariationPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[serde(default)]
    pub preco_adicional: Decimal,
    // Grupo ao qual a variação é anexada no momento da criação
    pub group_id: Uuid,
}

fn default_true() -> bool {
    true
}

fn default_max_escolhas() -> i32 {
    1
}
