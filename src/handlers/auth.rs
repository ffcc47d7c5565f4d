// src/handlers/auth.rs

use axum::{
    extract::{Query, State},
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::auth::UsuarioAutenticado,
    models::usuario::{
        AuthResponse, LoginPayload, RegisterAdminPayload, RegisterClientePayload, Usuario,
    },
};

// Handler de registro de cliente
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterClientePayload,
    responses((status = 200, body = AuthResponse))
)]
pub async fn register(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterClientePayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .register_cliente(
            &payload.nome,
            &payload.email,
            &payload.senha,
            payload.telefone.as_deref(),
        )
        .await?;

    Ok(Json(AuthResponse { token, slug: None }))
}

// Registro de administrador + empresa, liberado por token de uso único
#[utoipa::path(
    post,
    path = "/api/auth/register-admin",
    request_body = RegisterAdminPayload,
    responses((status = 200, body = AuthResponse), (status = 403, description = "Token inválido"))
)]
pub async fn register_admin(
    State(app_state): State<AppState>,
    Json(payload): Json<RegisterAdminPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state.auth_service.register_admin(&payload).await?;
    Ok(Json(AuthResponse {
        token,
        slug: Some(payload.slug),
    }))
}

#[derive(Debug, Deserialize, IntoParams)]
pub struct LoginQuery {
    // Slug do estabelecimento de onde o usuário veio; é devolvido na
    // resposta para o cliente voltar ao contexto certo depois do login.
    pub slug: Option<String>,
}

// Handler de login
#[utoipa::path(
    post,
    path = "/api/auth/login",
    params(LoginQuery),
    request_body = LoginPayload,
    responses((status = 200, body = AuthResponse), (status = 401, description = "Credenciais inválidas"))
)]
pub async fn login(
    State(app_state): State<AppState>,
    Query(query): Query<LoginQuery>,
    Json(payload): Json<LoginPayload>,
) -> Result<Json<AuthResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let token = app_state
        .auth_service
        .login(&payload.email, &payload.senha)
        .await?;

    Ok(Json(AuthResponse {
        token,
        slug: query.slug,
    }))
}

// Handler da rota protegida /me
#[utoipa::path(
    get,
    path = "/api/auth/me",
    security(("bearer" = [])),
    responses((status = 200, body = Usuario))
)]
pub async fn get_me(UsuarioAutenticado(usuario): UsuarioAutenticado) -> Json<Usuario> {
    Json(usuario)
}
