// src/handlers/entregadores.rs

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use serde::Deserialize;
use utoipa::IntoParams;
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::empresa::AdminDaEmpresa,
    models::usuario::{CreateEntregadorPayload, UpdateEntregadorPayload, Usuario},
};

#[derive(Debug, Deserialize, IntoParams)]
pub struct EntregadoresQuery {
    // true = somente os elegíveis para receber entregas (fluxo de
    // seleção do pronto -> em entrega)
    pub ativos: Option<bool>,
}

#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/admin/entregadores",
    security(("bearer" = [])),
    params(EntregadoresQuery),
    responses((status = 200, body = [Usuario]))
)]
pub async fn list_entregadores(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Query(query): Query<EntregadoresQuery>,
) -> Result<Json<Vec<Usuario>>, AppError> {
    let entregadores = if query.ativos.unwrap_or(false) {
        app_state
            .order_service
            .entregadores_disponiveis(guard.empresa.id)
            .await?
    } else {
        app_state
            .auth_service
            .listar_entregadores(guard.empresa.id)
            .await?
    };
    Ok(Json(entregadores))
}

#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/admin/entregadores",
    security(("bearer" = [])),
    request_body = CreateEntregadorPayload,
    responses((status = 201, body = Usuario), (status = 409, description = "E-mail já em uso"))
)]
pub async fn create_entregador(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Json(payload): Json<CreateEntregadorPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entregador = app_state
        .auth_service
        .register_entregador(guard.empresa.id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(entregador)))
}

// Liga/desliga o flag de disponibilidade e atualiza dados de contato.
#[utoipa::path(
    patch,
    path = "/api/empresas/{slug}/admin/entregadores/{id}",
    security(("bearer" = [])),
    request_body = UpdateEntregadorPayload,
    responses((status = 200, body = Usuario))
)]
pub async fn update_entregador(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateEntregadorPayload>,
) -> Result<Json<Usuario>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let entregador = app_state
        .auth_service
        .atualizar_entregador(
            guard.empresa.id,
            id,
            payload.status_entregador,
            payload.telefone.as_deref(),
            payload.placa.as_deref(),
        )
        .await?;
    Ok(Json(entregador))
}
