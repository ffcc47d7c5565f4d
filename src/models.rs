pub mod cart;
pub mod catalogo;
pub mod cupom;
pub mod empresa;
pub mod order;
pub mod usuario;
