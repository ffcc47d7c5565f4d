// src/handlers/empresa.rs

use axum::{extract::State, Json};
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::empresa::{AdminDaEmpresa, EmpresaContext},
    models::empresa::{Empresa, UpdateEmpresaPayload},
};

// Resolve o slug para o storefront: é a primeira chamada de qualquer
// visita. 404 aqui significa "restaurante não existe".
#[utoipa::path(
    get,
    path = "/api/empresas/{slug}",
    responses((status = 200, body = Empresa), (status = 404, description = "Slug desconhecido"))
)]
pub async fn get_empresa(EmpresaContext(empresa): EmpresaContext) -> Json<Empresa> {
    Json(empresa)
}

// Atualização de marca pelo painel (nome fantasia, logo, telefone)
#[utoipa::path(
    patch,
    path = "/api/empresas/{slug}/admin",
    security(("bearer" = [])),
    request_body = UpdateEmpresaPayload,
    responses((status = 200, body = Empresa))
)]
pub async fn update_empresa(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Json(payload): Json<UpdateEmpresaPayload>,
) -> Result<Json<Empresa>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let empresa = app_state
        .empresa_repo
        .update_branding(
            guard.empresa.id,
            payload.nome_fantasia.as_deref(),
            payload.logo_url.as_deref(),
            payload.telefone.as_deref(),
        )
        .await?;

    Ok(Json(empresa))
}
