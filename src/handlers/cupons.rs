// src/handlers/cupons.rs

use axum::{
    extract::{Path, State},
    http::StatusCode,
    response::IntoResponse,
    Json,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::empresa::AdminDaEmpresa,
    models::cupom::{CreateCupomPayload, Cupom, UpdateCupomPayload},
};

#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/admin/cupons",
    security(("bearer" = [])),
    responses((status = 200, body = [Cupom]))
)]
pub async fn list_cupons(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
) -> Result<Json<Vec<Cupom>>, AppError> {
    let cupons = app_state.cupom_service.listar(guard.empresa.id).await?;
    Ok(Json(cupons))
}

// O código é normalizado para maiúsculas na gravação.
#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/admin/cupons",
    security(("bearer" = [])),
    request_body = CreateCupomPayload,
    responses((status = 201, body = Cupom), (status = 409, description = "Código já existe"))
)]
pub async fn create_cupom(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Json(payload): Json<CreateCupomPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cupom = app_state
        .cupom_service
        .criar(
            guard.empresa.id,
            &payload.nome,
            payload.tipo,
            payload.valor,
            payload.validade,
            payload.descricao.as_deref(),
        )
        .await?;
    Ok((StatusCode::CREATED, Json(cupom)))
}

#[utoipa::path(
    patch,
    path = "/api/empresas/{slug}/admin/cupons/{id}",
    security(("bearer" = [])),
    request_body = UpdateCupomPayload,
    responses((status = 200, body = Cupom))
)]
pub async fn update_cupom(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateCupomPayload>,
) -> Result<Json<Cupom>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cupom = app_state
        .cupom_service
        .atualizar(
            guard.empresa.id,
            id,
            payload.valor,
            payload.validade,
            payload.descricao.as_deref(),
            payload.ativo,
        )
        .await?;
    Ok(Json(cupom))
}

#[utoipa::path(
    delete,
    path = "/api/empresas/{slug}/admin/cupons/{id}",
    security(("bearer" = [])),
    responses((status = 204))
)]
pub async fn delete_cupom(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state
        .cupom_service
        .deletar(guard.empresa.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
