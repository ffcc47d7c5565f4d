// src/docs.rs

use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::handlers;
use crate::models;

#[derive(OpenApi)]
#[openapi(
    paths(
        // --- Auth ---
        handlers::auth::register,
        handlers::auth::register_admin,
        handlers::auth::login,
        handlers::auth::get_me,

        // --- Storefront ---
        handlers::empresa::get_empresa,
        handlers::catalogo::get_cardapio,
        handlers::cart::create_cart,
        handlers::cart::get_cart,
        handlers::cart::add_item,
        handlers::cart::remove_item,
        handlers::cart::increase_quantity,
        handlers::cart::decrease_quantity,
        handlers::cart::clear_cart,
        handlers::cart::aplicar_cupom,
        handlers::cart::remover_cupom,
        handlers::orders::checkout,
        handlers::orders::get_order,
        handlers::orders::orders_by_phone,

        // --- Painel ---
        handlers::empresa::update_empresa,
        handlers::orders::admin_list_orders,
        handlers::orders::admin_update_order,
        handlers::orders::admin_orders_feed,
        handlers::catalogo::list_categorias,
        handlers::catalogo::create_categoria,
        handlers::catalogo::update_categoria,
        handlers::catalogo::delete_categoria,
        handlers::catalogo::list_itens,
        handlers::catalogo::create_item,
        handlers::catalogo::update_item,
        handlers::catalogo::delete_item,
        handlers::catalogo::list_grupos,
        handlers::catalogo::create_grupo,
        handlers::catalogo::delete_grupo,
        handlers::catalogo::create_variacao,
        handlers::catalogo::delete_variacao,
        handlers::cupons::list_cupons,
        handlers::cupons::create_cupom,
        handlers::cupons::update_cupom,
        handlers::cupons::delete_cupom,
        handlers::entregadores::list_entregadores,
        handlers::entregadores::create_entregador,
        handlers::entregadores::update_entregador,

        // --- Entregador ---
        handlers::orders::entregador_orders,
        handlers::orders::entregador_orders_feed,
        handlers::orders::entregador_concluir,
    ),
    components(schemas(
        models::usuario::Usuario,
        models::usuario::Role,
        models::usuario::RegisterClientePayload,
        models::usuario::RegisterAdminPayload,
        models::usuario::LoginPayload,
        models::usuario::AuthResponse,
        models::usuario::CreateEntregadorPayload,
        models::usuario::UpdateEntregadorPayload,
        models::empresa::Empresa,
        models::empresa::UpdateEmpresaPayload,
        models::catalogo::Category,
        models::catalogo::MenuItem,
        models::catalogo::VariationGroup,
        models::catalogo::Variation,
        models::catalogo::GrupoComVariacoes,
        models::catalogo::MenuItemDetalhado,
        models::catalogo::CardapioResponse,
        models::catalogo::CreateCategoryPayload,
        models::catalogo::UpdateCategoryPayload,
        models::catalogo::CreateMenuItemPayload,
        models::catalogo::UpdateMenuItemPayload,
        models::catalogo::CreateVariationGroupPayload,
        models::catalogo::CreateVariationPayload,
        models::cupom::Cupom,
        models::cupom::TipoCupom,
        models::cupom::CupomSnapshot,
        models::cupom::CreateCupomPayload,
        models::cupom::UpdateCupomPayload,
        models::cupom::ApplyCupomPayload,
        models::cart::CartItem,
        models::cart::CartGroup,
        models::cart::CartVariation,
        models::cart::CartResponse,
        models::cart::AddItemPayload,
        models::cart::SelecaoGrupo,
        models::cart::SelecaoVariacao,
        models::order::Order,
        models::order::OrderStatus,
        models::order::PaymentStatus,
        models::order::Settlement,
        models::order::FormaPagamento,
        models::order::OrderItemSnapshot,
        models::order::CheckoutPayload,
        models::order::UpdateOrderPayload,
        models::order::OrderChange,
        models::order::ChangeKind,
        handlers::cart::NewCartResponse,
    )),
    modifiers(&SecurityAddon),
    tags(
        (name = "pedeja", description = "Plataforma multi-tenant de pedidos para restaurantes")
    )
)]
pub struct ApiDoc;

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer",
                SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
            );
        }
    }
}
