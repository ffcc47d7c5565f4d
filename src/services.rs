pub mod auth;
pub use auth::AuthService;
pub mod cart_service;
pub use cart_service::CartService;
pub mod catalogo_service;
pub use catalogo_service::CatalogoService;
pub mod cupom_service;
pub use cupom_service::CupomService;
pub mod order_feed;
pub use order_feed::OrderFeed;
pub mod order_service;
pub use order_service::OrderService;
