pub mod catalogo_repo;
pub use catalogo_repo::CatalogoRepository;
pub mod cupom_repo;
pub use cupom_repo::CupomRepository;
pub mod empresa_repo;
pub use empresa_repo::EmpresaRepository;
pub mod order_repo;
pub use order_repo::OrderRepository;
pub mod usuario_repo;
pub use usuario_repo::UsuarioRepository;
