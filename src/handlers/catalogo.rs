// src/handlers/catalogo.rs

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
    middleware::empresa::{AdminDaEmpresa, EmpresaContext},
    models::catalogo::{
        CardapioResponse, Category, CreateCategoryPayload, CreateMenuItemPayload,
        CreateVariationGroupPayload, CreateVariationPayload, GrupoComVariacoes, MenuItem,
        UpdateCategoryPayload, UpdateMenuItemPayload, Variation, VariationGroup,
    },
};

// --- Storefront (público) ---

// O cardápio completo: categorias ordenadas e itens com seus grupos de
// variação, pronto para renderizar.
#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/cardapio",
    responses((status = 200, body = CardapioResponse))
)]
pub async fn get_cardapio(
    State(app_state): State<AppState>,
    EmpresaContext(empresa): EmpresaContext,
) -> Result<Json<CardapioResponse>, AppError> {
    let cardapio = app_state
        .catalogo_service
        .montar_cardapio(empresa.id)
        .await?;
    Ok(Json(cardapio))
}

// --- Painel: categorias ---

#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/admin/categorias",
    security(("bearer" = [])),
    responses((status = 200, body = [Category]))
)]
pub async fn list_categorias(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
) -> Result<Json<Vec<Category>>, AppError> {
    let categorias = app_state
        .catalogo_service
        .listar_categorias(guard.empresa.id)
        .await?;
    Ok(Json(categorias))
}

#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/admin/categorias",
    security(("bearer" = [])),
    request_body = CreateCategoryPayload,
    responses((status = 201, body = Category))
)]
pub async fn create_categoria(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Json(payload): Json<CreateCategoryPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let categoria = app_state
        .catalogo_service
        .criar_categoria(guard.empresa.id, &payload.nome, payload.ordem)
        .await?;
    Ok((StatusCode::CREATED, Json(categoria)))
}

#[utoipa::path(
    patch,
    path = "/api/empresas/{slug}/admin/categorias/{id}",
    security(("bearer" = [])),
    request_body = UpdateCategoryPayload,
    responses((status = 200, body = Category))
)]
pub async fn update_categoria(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateCategoryPayload>,
) -> Result<Json<Category>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let categoria = app_state
        .catalogo_service
        .atualizar_categoria(guard.empresa.id, id, payload.nome.as_deref(), payload.ordem)
        .await?;
    Ok(Json(categoria))
}

#[utoipa::path(
    delete,
    path = "/api/empresas/{slug}/admin/categorias/{id}",
    security(("bearer" = [])),
    responses((status = 204))
)]
pub async fn delete_categoria(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state
        .catalogo_service
        .deletar_categoria(guard.empresa.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Painel: itens do cardápio ---

#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/admin/itens",
    security(("bearer" = [])),
    responses((status = 200, body = [MenuItem]))
)]
pub async fn list_itens(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
) -> Result<Json<Vec<MenuItem>>, AppError> {
    let itens = app_state
        .catalogo_service
        .listar_itens(guard.empresa.id)
        .await?;
    Ok(Json(itens))
}

#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/admin/itens",
    security(("bearer" = [])),
    request_body = CreateMenuItemPayload,
    responses((status = 201, body = MenuItem))
)]
pub async fn create_item(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Json(payload): Json<CreateMenuItemPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state
        .catalogo_service
        .criar_item(guard.empresa.id, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(item)))
}

#[utoipa::path(
    patch,
    path = "/api/empresas/{slug}/admin/itens/{id}",
    security(("bearer" = [])),
    request_body = UpdateMenuItemPayload,
    responses((status = 200, body = MenuItem))
)]
pub async fn update_item(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateMenuItemPayload>,
) -> Result<Json<MenuItem>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let item = app_state
        .catalogo_service
        .atualizar_item(guard.empresa.id, id, &payload)
        .await?;
    Ok(Json(item))
}

#[utoipa::path(
    delete,
    path = "/api/empresas/{slug}/admin/itens/{id}",
    security(("bearer" = [])),
    responses((status = 204))
)]
pub async fn delete_item(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state
        .catalogo_service
        .deletar_item(guard.empresa.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

// --- Painel: grupos de variação e variações ---

#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/admin/grupos",
    security(("bearer" = [])),
    responses((status = 200, body = [GrupoComVariacoes]))
)]
pub async fn list_grupos(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
) -> Result<Json<Vec<GrupoComVariacoes>>, AppError> {
    let grupos = app_state
        .catalogo_service
        .listar_grupos(guard.empresa.id)
        .await?;
    Ok(Json(grupos))
}

#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/admin/grupos",
    security(("bearer" = [])),
    request_body = CreateVariationGroupPayload,
    responses((status = 201, body = VariationGroup))
)]
pub async fn create_grupo(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Json(payload): Json<CreateVariationGroupPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let grupo = app_state
        .catalogo_service
        .criar_grupo(
            guard.empresa.id,
            &payload.nome,
            payload.min_escolhas,
            payload.max_escolhas,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(grupo)))
}

#[utoipa::path(
    delete,
    path = "/api/empresas/{slug}/admin/grupos/{id}",
    security(("bearer" = [])),
    responses((status = 204))
)]
pub async fn delete_grupo(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state
        .catalogo_service
        .deletar_grupo(guard.empresa.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/admin/variacoes",
    security(("bearer" = [])),
    request_body = CreateVariationPayload,
    responses((status = 201, body = Variation))
)]
pub async fn create_variacao(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Json(payload): Json<CreateVariationPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let variacao = app_state
        .catalogo_service
        .criar_variacao(
            guard.empresa.id,
            payload.group_id,
            &payload.nome,
            payload.preco_adicional,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(variacao)))
}

#[utoipa::path(
    delete,
    path = "/api/empresas/{slug}/admin/variacoes/{id}",
    security(("bearer" = [])),
    responses((status = 204))
)]
pub async fn delete_variacao(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
) -> Result<StatusCode, AppError> {
    app_state
        .catalogo_service
        .deletar_variacao(guard.empresa.id, id)
        .await?;
    Ok(StatusCode::NO_CONTENT)
}
