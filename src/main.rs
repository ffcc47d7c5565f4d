// src/main.rs

use axum::{
    middleware as axum_middleware,
    routing::{delete, get, patch, post},
    Router,
};
use tokio::net::TcpListener;
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

// Declaração dos nossos módulos
mod common;
mod config;
mod db;
mod docs;
mod handlers;
mod middleware;
mod models;
mod services;

use crate::config::AppState;
use crate::middleware::auth::auth_guard;

#[tokio::main]
async fn main() {
    // Inicializa o logger
    tracing_subscriber::fmt().with_target(false).compact().init();

    // .expect() é bom aqui: se a configuração falhar, a aplicação não deve iniciar.
    let app_state = AppState::new()
        .await
        .expect("Falha ao inicializar o estado da aplicação.");

    // Roda as migrações do SQLx na inicialização
    sqlx::migrate!()
        .run(&app_state.db_pool)
        .await
        .expect("Falha ao rodar as migrações do banco de dados.");

    tracing::info!("✅ Migrações do banco de dados executadas com sucesso!");

    // Rotas de autenticação: registro e login públicos, /me protegida
    let auth_routes = Router::new()
        .route("/register", post(handlers::auth::register))
        .route("/register-admin", post(handlers::auth::register_admin))
        .route("/login", post(handlers::auth::login))
        .merge(
            Router::new()
                .route("/me", get(handlers::auth::get_me))
                .layer(axum_middleware::from_fn_with_state(
                    app_state.clone(),
                    auth_guard,
                )),
        );

    // Painel do admin: tudo atrás do auth_guard; o extrator AdminDaEmpresa
    // confere papel e posse da empresa em cada handler.
    let admin_routes = Router::new()
        .route("/", patch(handlers::empresa::update_empresa))
        .route(
            "/orders",
            get(handlers::orders::admin_list_orders),
        )
        .route("/orders/feed", get(handlers::orders::admin_orders_feed))
        .route("/orders/{id}", patch(handlers::orders::admin_update_order))
        .route(
            "/categorias",
            post(handlers::catalogo::create_categoria).get(handlers::catalogo::list_categorias),
        )
        .route(
            "/categorias/{id}",
            patch(handlers::catalogo::update_categoria).delete(handlers::catalogo::delete_categoria),
        )
        .route(
            "/itens",
            post(handlers::catalogo::create_item).get(handlers::catalogo::list_itens),
        )
        .route(
            "/itens/{id}",
            patch(handlers::catalogo::update_item).delete(handlers::catalogo::delete_item),
        )
        .route(
            "/grupos",
            post(handlers::catalogo::create_grupo).get(handlers::catalogo::list_grupos),
        )
        .route("/grupos/{id}", delete(handlers::catalogo::delete_grupo))
        .route("/variacoes", post(handlers::catalogo::create_variacao))
        .route("/variacoes/{id}", delete(handlers::catalogo::delete_variacao))
        .route(
            "/cupons",
            post(handlers::cupons::create_cupom).get(handlers::cupons::list_cupons),
        )
        .route(
            "/cupons/{id}",
            patch(handlers::cupons::update_cupom).delete(handlers::cupons::delete_cupom),
        )
        .route(
            "/entregadores",
            post(handlers::entregadores::create_entregador)
                .get(handlers::entregadores::list_entregadores),
        )
        .route(
            "/entregadores/{id}",
            patch(handlers::entregadores::update_entregador),
        )
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Visão do entregador
    let entregador_routes = Router::new()
        .route("/orders", get(handlers::orders::entregador_orders))
        .route("/orders/feed", get(handlers::orders::entregador_orders_feed))
        .route("/orders/{id}", patch(handlers::orders::entregador_concluir))
        .layer(axum_middleware::from_fn_with_state(
            app_state.clone(),
            auth_guard,
        ));

    // Storefront público + carrinho + checkout, escopados pelo slug
    let empresa_routes = Router::new()
        .route("/", get(handlers::empresa::get_empresa))
        .route("/cardapio", get(handlers::catalogo::get_cardapio))
        .route("/cart", post(handlers::cart::create_cart))
        .route(
            "/cart/{session_id}",
            get(handlers::cart::get_cart).delete(handlers::cart::clear_cart),
        )
        .route("/cart/{session_id}/items", post(handlers::cart::add_item))
        .route(
            "/cart/{session_id}/items/{key}",
            delete(handlers::cart::remove_item),
        )
        .route(
            "/cart/{session_id}/items/{key}/increase",
            post(handlers::cart::increase_quantity),
        )
        .route(
            "/cart/{session_id}/items/{key}/decrease",
            post(handlers::cart::decrease_quantity),
        )
        .route(
            "/cart/{session_id}/cupom",
            post(handlers::cart::aplicar_cupom).delete(handlers::cart::remover_cupom),
        )
        .route("/checkout", post(handlers::orders::checkout))
        .route("/orders", get(handlers::orders::orders_by_phone))
        .route("/orders/{id}", get(handlers::orders::get_order))
        .nest("/admin", admin_routes)
        .nest("/entregador", entregador_routes);

    // Combina tudo no router principal
    let app = Router::new()
        .route("/api/health", get(|| async { "OK" }))
        .nest("/api/auth", auth_routes)
        .nest("/api/empresas/{slug}", empresa_routes)
        .merge(SwaggerUi::new("/api/docs").url("/api/docs/openapi.json", docs::ApiDoc::openapi()))
        .with_state(app_state);

    // Inicia o servidor
    let addr = "0.0.0.0:3000";
    let listener = TcpListener::bind(addr)
        .await
        .expect("Falha ao iniciar o listener TCP");
    tracing::info!("🚀 Servidor escutando em {}", listener.local_addr().unwrap());
    axum::serve(listener, app).await.expect("Erro no servidor Axum");
}
