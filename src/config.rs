// src/config.rs

use std::sync::Arc;
use std::{env, time::Duration};

use sqlx::{postgres::PgPoolOptions, PgPool};

use crate::{
    db::{CatalogoRepository, CupomRepository, EmpresaRepository, OrderRepository, UsuarioRepository},
    services::{AuthService, CartService, CatalogoService, CupomService, OrderFeed, OrderService},
};

// Mensagens retidas por canal do feed antes de derrubar assinantes lentos
const FEED_CAPACITY: usize = 128;

// O estado compartilhado que será acessível em toda a aplicação
#[derive(Clone)]
pub struct AppState {
    pub db_pool: PgPool,
    pub jwt_secret: String,
    pub auth_service: AuthService,
    pub catalogo_service: CatalogoService,
    pub cart_service: CartService,
    pub cupom_service: CupomService,
    pub order_service: OrderService,
    pub empresa_repo: EmpresaRepository,
}

impl AppState {
    // Carrega as configurações do ambiente e monta o grafo de
    // dependências. Variável ausente derruba a inicialização.
    pub async fn new() -> anyhow::Result<Self> {
        dotenvy::dotenv().ok();

        let database_url = env::var("DATABASE_URL").expect("DATABASE_URL deve ser definida");
        let jwt_secret = env::var("JWT_SECRET").expect("JWT_SECRET deve ser definido");
        let storage_public_url =
            env::var("STORAGE_PUBLIC_URL").expect("STORAGE_PUBLIC_URL deve ser definida");

        let db_pool = PgPoolOptions::new()
            .max_connections(5)
            .acquire_timeout(Duration::from_secs(3))
            .connect(&database_url)
            .await?;

        tracing::info!("✅ Conexão com o banco de dados estabelecida com sucesso!");

        // --- Monta o grafo de dependências ---
        let usuario_repo = UsuarioRepository::new(db_pool.clone());
        let empresa_repo = EmpresaRepository::new(db_pool.clone());
        let catalogo_repo = CatalogoRepository::new(db_pool.clone());
        let cupom_repo = CupomRepository::new(db_pool.clone());
        let order_repo = OrderRepository::new(db_pool.clone());

        let order_feed = Arc::new(OrderFeed::new(FEED_CAPACITY));

        let auth_service = AuthService::new(
            usuario_repo.clone(),
            empresa_repo.clone(),
            jwt_secret.clone(),
            db_pool.clone(),
        );
        let catalogo_service = CatalogoService::new(catalogo_repo.clone(), storage_public_url);
        let cart_service = CartService::new(catalogo_repo);
        let cupom_service = CupomService::new(cupom_repo);
        let order_service = OrderService::new(
            order_repo,
            usuario_repo,
            cart_service.clone(),
            order_feed,
        );

        Ok(Self {
            db_pool,
            jwt_secret,
            auth_service,
            catalogo_service,
            cart_service,
            cupom_service,
            order_service,
            empresa_repo,
        })
    }
}
