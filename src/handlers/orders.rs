// src/handlers/orders.rs

use std::convert::Infallible;

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{
        sse::{Event, KeepAlive, Sse},
        IntoResponse,
    },
    Json,
};
use futures::Stream;
use tokio_stream::{wrappers::BroadcastStream, StreamExt};
use uuid::Uuid;
use validator::Validate;

use crate::{
    common::error::AppError,
    config::AppState,
    middleware::empresa::{AdminDaEmpresa, EmpresaContext, EntregadorDaEmpresa},
    models::order::{
        CheckoutPayload, Order, OrderChange, OrderPhoneQuery, OrderRangeQuery, OrderStatus,
        UpdateOrderPayload,
    },
    services::OrderFeed,
};

// --- Storefront ---

// Converte o carrinho da sessão em pedido. O total é recomputado no
// servidor; o status nasce "pending" e o pagamento "a_receber".
#[utoipa::path(
    post,
    path = "/api/empresas/{slug}/checkout",
    request_body = CheckoutPayload,
    responses((status = 201, body = Order), (status = 400, description = "Carrinho vazio"))
)]
pub async fn checkout(
    State(app_state): State<AppState>,
    EmpresaContext(empresa): EmpresaContext,
    Json(payload): Json<CheckoutPayload>,
) -> Result<impl IntoResponse, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state.order_service.checkout(&empresa, &payload).await?;
    Ok((StatusCode::CREATED, Json(order)))
}

#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/orders/{id}",
    responses((status = 200, body = Order), (status = 404, description = "Pedido não encontrado"))
)]
pub async fn get_order(
    State(app_state): State<AppState>,
    EmpresaContext(empresa): EmpresaContext,
    Path((_slug, id)): Path<(String, Uuid)>,
) -> Result<Json<Order>, AppError> {
    let order = app_state.order_service.por_id(empresa.id, id).await?;
    Ok(Json(order))
}

// Acompanhamento sem login: os pedidos do telefone informado.
#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/orders",
    params(OrderPhoneQuery),
    responses((status = 200, body = [Order]))
)]
pub async fn orders_by_phone(
    State(app_state): State<AppState>,
    EmpresaContext(empresa): EmpresaContext,
    Query(query): Query<OrderPhoneQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = app_state
        .order_service
        .por_telefone(empresa.id, &query.telefone)
        .await?;
    Ok(Json(orders))
}

// --- Painel do admin ---

#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/admin/orders",
    security(("bearer" = [])),
    params(OrderRangeQuery),
    responses((status = 200, body = [Order]))
)]
pub async fn admin_list_orders(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Query(query): Query<OrderRangeQuery>,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = app_state
        .order_service
        .por_intervalo(guard.empresa.id, &query)
        .await?;
    Ok(Json(orders))
}

// Atualização parcial: transição de status, pagamento, entregador,
// motivo de cancelamento. ready -> delivering sem entregador devolve
// 422 com o código que dispara a seleção no painel.
#[utoipa::path(
    patch,
    path = "/api/empresas/{slug}/admin/orders/{id}",
    security(("bearer" = [])),
    request_body = UpdateOrderPayload,
    responses(
        (status = 200, body = Order),
        (status = 404, description = "Pedido não encontrado"),
        (status = 409, description = "Transição inválida"),
        (status = 422, description = "Entregador obrigatório")
    )
)]
pub async fn admin_update_order(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
    Json(payload): Json<UpdateOrderPayload>,
) -> Result<Json<Order>, AppError> {
    payload.validate().map_err(AppError::ValidationError)?;

    let order = app_state
        .order_service
        .atualizar(guard.empresa.id, id, &payload)
        .await?;
    Ok(Json(order))
}

// Feed em tempo real do painel: toda mudança de pedido da empresa.
// Derrubar a conexão desfaz a assinatura.
#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/admin/orders/feed",
    security(("bearer" = [])),
    responses((status = 200, description = "Stream SSE de mudanças de pedido"))
)]
pub async fn admin_orders_feed(
    State(app_state): State<AppState>,
    guard: AdminDaEmpresa,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    sse_de_mudancas(app_state.order_service.feed(), guard.empresa.id, None)
}

// --- Visão do entregador ---

#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/entregador/orders",
    security(("bearer" = [])),
    responses((status = 200, body = [Order]))
)]
pub async fn entregador_orders(
    State(app_state): State<AppState>,
    guard: EntregadorDaEmpresa,
) -> Result<Json<Vec<Order>>, AppError> {
    let orders = app_state.order_service.em_entrega(guard.empresa.id).await?;
    Ok(Json(orders))
}

// Feed do entregador: apenas pedidos em entrega.
#[utoipa::path(
    get,
    path = "/api/empresas/{slug}/entregador/orders/feed",
    security(("bearer" = [])),
    responses((status = 200, description = "Stream SSE de pedidos em entrega"))
)]
pub async fn entregador_orders_feed(
    State(app_state): State<AppState>,
    guard: EntregadorDaEmpresa,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    sse_de_mudancas(
        app_state.order_service.feed(),
        guard.empresa.id,
        Some(OrderStatus::Delivering),
    )
}

// O entregador conclui a própria entrega: dinheiro fecha como
// "received" (e entra no acerto de caixa), o resto como "delivered".
#[utoipa::path(
    patch,
    path = "/api/empresas/{slug}/entregador/orders/{id}",
    security(("bearer" = [])),
    responses((status = 200, body = Order), (status = 403, description = "Pedido de outro entregador"))
)]
pub async fn entregador_concluir(
    State(app_state): State<AppState>,
    guard: EntregadorDaEmpresa,
    Path((_slug, id)): Path<(String, Uuid)>,
) -> Result<Json<Order>, AppError> {
    let order = app_state
        .order_service
        .concluir_entrega(guard.empresa.id, id, &guard.usuario)
        .await?;
    Ok(Json(order))
}

// Assina o feed da empresa e serializa cada mudança como evento SSE.
// Mudanças que o assinante lento perdeu (lag do broadcast) são puladas.
fn sse_de_mudancas(
    feed: &std::sync::Arc<OrderFeed>,
    empresa_id: Uuid,
    apenas_status: Option<OrderStatus>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>> + use<>> {
    let rx = feed.subscribe(empresa_id);
    let stream = BroadcastStream::new(rx)
        .filter_map(|msg| msg.ok())
        .filter(move |change: &OrderChange| match apenas_status {
            Some(status) => change.order.status == status,
            None => true,
        })
        .filter_map(|change| Event::default().event("order").json_data(&change).ok())
        .map(Ok::<_, Infallible>);

    Sse::new(stream).keep_alive(KeepAlive::default())
}
