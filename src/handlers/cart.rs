// src/handlers/cart.rs

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
    middleware::empresa::EmpresaContext,
    models::{
        cart::{AddItemPayload, CartResponse},
        cupom::ApplyCupomPayload,
    },
};

#[derive(serde::Serialize, utoipa::ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct NewCartResponse {
    pub session_id: Uuid,
}

// Abre uma sessão de carrinho. O id retornado identifica o carrinho em
// todas as chamadas seguintes.
#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/cart",
    responses((status = 201, body = NewCartResponse))
)]
pub async fn create_cart(State(app_state): State<AppState>) -> impl IntoResponse {
    let session_id = app_state.cart_service.create_session();
    (StatusCode::CREATED, Json(NewCartResponse { session_id }))
}

#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/cart/{session_id}",
    responses((status = 200, body = CartResponse), (status = 404, description = "Sessão desconhecida"))
)]
pub async fn get_cart(
    State(app_state): State<AppState>,
    Path((_slug, session_id)): Path<(String, Uuid)>,
) -> Result<Json<CartResponse>, AppError> {
    Ok(Json(app_state.cart_service.get(session_id)?))
}

// Adiciona um item com as variações escolhidas. Seleções idênticas caem
// na mesma linha; o cupom aplicado (se houver) é descartado.
#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/cart/{session_id}/items",
    request_body = AddItemPayload,
    responses((status = 200, body = CartResponse))
)]
pub async fn add_item(
    State(app_state): State<AppState>,
    EmpresaContext(empresa): EmpresaContext,
    Path((_slug, session_id)): Path<(String, Uuid)>,
    Json(payload): Json<AddItemPayload>,
) -> Result<Json<CartResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let cart = app_state
        .cart_service
        .add_item(session_id, empresa.id, payload.menu_item_id, &payload.variacoes)
        .await?;
    Ok(Json(cart))
}

#[utoipa::path(
    delete,
    path = "/api/empresas/{slug}/cart/{session_id}/items/{key}",
    responses((status = 200, body = CartResponse))
)]
pub async fn remove_item(
    State(app_state): State<AppState>,
    Path((_slug, session_id, key)): Path<(String, Uuid, String)>,
) -> Result<Json<CartResponse>, AppError> {
    Ok(Json(app_state.cart_service.remove_item(session_id, &key)?))
}

#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/cart/{session_id}/items/{key}/increase",
    responses((status = 200, body = CartResponse))
)]
pub async fn increase_quantity(
    State(app_state): State<AppState>,
    Path((_slug, session_id, key)): Path<(String, Uuid, String)>,
) -> Result<Json<CartResponse>, AppError> {
    Ok(Json(
        app_state.cart_service.increase_quantity(session_id, &key)?,
    ))
}

// Diminuir uma linha que está em 1 remove a linha.
#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/cart/{session_id}/items/{key}/decrease",
    responses((status = 200, body = CartResponse))
)]
pub async fn decrease_quantity(
    State(app_state): State<AppState>,
    Path((_slug, session_id, key)): Path<(String, Uuid, String)>,
) -> Result<Json<CartResponse>, AppError> {
    Ok(Json(
        app_state.cart_service.decrease_quantity(session_id, &key)?,
    ))
}

#[utoipa::path(
    delete,
    path = "/api/empresas/{slug}/cart/{session_id}",
    responses((status = 200, body = CartResponse))
)]
pub async fn clear_cart(
    State(app_state): State<AppState>,
    Path((_slug, session_id)): Path<(String, Uuid)>,
) -> Result<Json<CartResponse>, AppError> {
    Ok(Json(app_state.cart_service.clear(session_id)?))
}

// Valida o código para a empresa do carrinho e grava o desconto
// calculado sobre o subtotal atual.
#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/cart/{session_id}/cupom",
    request_body = ApplyCupomPayload,
    responses(
        (status = 200, body = CartResponse),
        (status = 404, description = "Cupom não encontrado"),
        (status = 400, description = "Cupom expirado ou carrinho vazio")
    )
)]
pub async fn aplicar_cupom(
    State(app_state): State<AppState>,
    Path((_slug, session_id)): Path<(String, Uuid)>,
    Json(payload): Json<ApplyCupomPayload>,
) -> Result<Json<CartResponse>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    // A empresa vem do próprio carrinho: cupom só se aplica a carrinho
    // com pelo menos um item.
    let cart = app_state.cart_service.snapshot(session_id)?;
    let empresa_id = match (cart.empresa_id, cart.itens.is_empty()) {
        (Some(id), false) => id,
        _ => return Err(AppError::EmptyCart),
    };

    let (snapshot, desconto) = app_state
        .cupom_service
        .validar_e_calcular(empresa_id, &payload.codigo, cart.cart_total())
        .await?;

    Ok(Json(app_state.cart_service.aplicar_cupom(
        session_id, snapshot, desconto,
    )?))
}

#[utoipa::path(
    delete,
    path = "/api/empresas/{slug}/cart/{session_id}/cupom",
    responses((status = 200, body = CartResponse))
)]
pub async fn remover_cupom(
    State(app_state): State<AppState>,
    Path((_slug, session_id)): Path<(String, Uuid)>,
) -> Result<Json<CartResponse>, AppError> {
    Ok(Json(app_state.cart_service.remover_cupom(session_id)?))
}
