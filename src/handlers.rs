pub mod auth;
pub mod cart;
pub mod catalogo;
pub mod cupons;
pub mod empresa;
pub mod entregadores;
pub mod orders;
