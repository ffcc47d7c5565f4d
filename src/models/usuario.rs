// src/models/usuario.rs

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

// Papel da identidade. Rotas privilegiadas exigem um papel não-nulo;
// admin e entregador são sempre vinculados a uma empresa.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Entregador,
    Cliente,
}

// Representa um usuário vindo do banco de dados
#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Usuario {
    pub id: Uuid,
    pub nome: String,
    pub email: String,

    #[serde(skip_serializing)] // IMPORTANTE para segurança
    pub password_hash: String,

    pub role: Role,
    pub empresa_id: Option<Uuid>,
    pub telefone: Option<String>,

    // Campos específicos de entregador
    pub placa: Option<String>,
    pub cpf: Option<String>,
    pub status_entregador: bool,

    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// Estrutura de dados ("claims") dentro do JWT
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    pub sub: Uuid,          // Subject (ID do usuário)
    pub role: Role,
    pub empresa_id: Option<Uuid>,
    pub exp: usize,         // Expiration time
    pub iat: usize,         // Issued At
}

// Dados para registro de um novo cliente
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterClientePayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    pub telefone: Option<String>,
}

// Registro de administrador: cria o usuário E a empresa, mediante token
// de uso único distribuído fora da plataforma.
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct RegisterAdminPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    pub telefone: Option<String>,

    #[validate(length(min = 1, message = "O token de administrador é obrigatório."))]
    pub admin_token: String,

    #[validate(length(min = 1, message = "O nome fantasia é obrigatório."))]
    pub nome_fantasia: String,
    #[validate(length(min = 2, message = "O slug deve ter no mínimo 2 caracteres."))]
    pub slug: String,
    pub logo_url: Option<String>,
}

// Dados para login
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct LoginPayload {
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
}

// Resposta de autenticação com o token
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AuthResponse {
    pub token: String,
    // Slug repassado do query-param do login, para o cliente voltar
    // ao contexto do estabelecimento correto.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub slug: Option<String>,
}

// Cadastro de entregador pelo painel do admin
#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateEntregadorPayload {
    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub nome: String,
    #[validate(email(message = "O e-mail fornecido é inválido."))]
    pub email: String,
    #[validate(length(min = 6, message = "A senha deve ter no mínimo 6 caracteres."))]
    pub senha: String,
    pub telefone: Option<String>,
    pub placa: Option<String>,
    pub cpf: Option<String>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateEntregadorPayload {
    pub status_entregador: Option<bool>,
    pub telefone: Option<String>,
    pub placa: Option<String>,
}
