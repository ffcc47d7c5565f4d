use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
// A taxonomia cobre validação, recursos ausentes, autenticação/autorização
// e falhas de backend; tudo o que não tem tratamento específico vira 500.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Erro de validação")]
    ValidationError(#[from] validator::ValidationErrors),

    #[error("Estabelecimento não encontrado")]
    CompanyNotFound,

    #[error("Cupom não encontrado")]
    CouponNotFound,

    #[error("Cupom expirado")]
    CouponExpired,

    #[error("Pedido não encontrado")]
    OrderNotFound,

    #[error("Item do cardápio não encontrado")]
    MenuItemNotFound,

    #[error("Variação não encontrada")]
    VariationNotFound,

    #[error("Categoria não encontrada")]
    CategoryNotFound,

    #[error("Carrinho não encontrado")]
    CartNotFound,

    #[error("Carrinho vazio")]
    EmptyCart,

    #[error("Usuário não encontrado")]
    UserNotFound,

    #[error("E-mail já existe")]
    EmailAlreadyExists,

    #[error("Slug já existe")]
    SlugAlreadyExists,

    #[error("Credenciais inválidas")]
    InvalidCredentials,

    #[error("Token inválido")]
    InvalidToken,

    #[error("Token de administrador inválido ou já utilizado")]
    InvalidAdminToken,

    #[error("Acesso não autorizado")]
    Forbidden,

    #[error("Transição de status inválida: {0} -> {1}")]
    InvalidTransition(String, String),

    #[error("Status de pedido inválido")]
    InvalidStatus,

    #[error("Violação de unicidade: {0}")]
    UniqueConstraintViolation(String),

    // pronto -> saiu para entrega exige um entregador selecionado
    #[error("Entregador obrigatório para iniciar a entrega")]
    DelivererRequired,

    // Variante para erros de banco de dados
    #[error("Erro de banco de dados")]
    DatabaseError(#[from] sqlx::Error),

    // Variante genérica para qualquer outro erro inesperado
    #[error("Erro interno do servidor")]
    InternalServerError(#[from] anyhow::Error),

    #[error("Erro de Bcrypt: {0}")]
    BcryptError(#[from] bcrypt::BcryptError),

    #[error("Erro de JWT: {0}")]
    JwtError(#[from] jsonwebtoken::errors::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, error_message) = match self {
            // Retorna todos os detalhes da validação, campo a campo.
            AppError::ValidationError(errors) => {
                let mut details = std::collections::HashMap::new();
                for (field, field_errors) in errors.field_errors() {
                    let messages: Vec<String> = field_errors
                        .iter()
                        .filter_map(|e| e.message.as_ref().map(|m| m.to_string()))
                        .collect();
                    details.insert(field.to_string(), messages);
                }
                let body = Json(json!({
                    "error": "Um ou mais campos são inválidos.",
                    "details": details,
                }));
                return (StatusCode::BAD_REQUEST, body).into_response();
            }

            AppError::CompanyNotFound => (StatusCode::NOT_FOUND, "Estabelecimento não encontrado."),
            AppError::CouponNotFound => (StatusCode::NOT_FOUND, "Cupom inválido para este estabelecimento."),
            AppError::CouponExpired => (StatusCode::BAD_REQUEST, "Este cupom está expirado."),
            AppError::OrderNotFound => (StatusCode::NOT_FOUND, "Pedido não encontrado."),
            AppError::MenuItemNotFound => (StatusCode::NOT_FOUND, "Item do cardápio não encontrado."),
            AppError::VariationNotFound => (StatusCode::NOT_FOUND, "Variação não encontrada."),
            AppError::CategoryNotFound => (StatusCode::NOT_FOUND, "Categoria não encontrada."),
            AppError::CartNotFound => (StatusCode::NOT_FOUND, "Sessão de carrinho não encontrada."),
            AppError::EmptyCart => (StatusCode::BAD_REQUEST, "O carrinho está vazio."),
            AppError::UserNotFound => (StatusCode::NOT_FOUND, "Usuário não encontrado."),
            AppError::EmailAlreadyExists => (StatusCode::CONFLICT, "Este e-mail já está em uso."),
            AppError::SlugAlreadyExists => (StatusCode::CONFLICT, "Este endereço (slug) já está em uso."),
            AppError::InvalidCredentials => (StatusCode::UNAUTHORIZED, "E-mail ou senha inválidos."),
            AppError::InvalidToken => (StatusCode::UNAUTHORIZED, "Token de autenticação inválido ou ausente."),
            AppError::InvalidAdminToken => (StatusCode::FORBIDDEN, "Token de administrador inválido ou já utilizado."),
            AppError::Forbidden => (StatusCode::FORBIDDEN, "Você não tem permissão para acessar este recurso."),
            AppError::InvalidStatus => (StatusCode::BAD_REQUEST, "Status de pedido inválido."),
            AppError::UniqueConstraintViolation(_) => (StatusCode::CONFLICT, "Registro duplicado."),

            AppError::InvalidTransition(ref de, ref para) => {
                let body = Json(json!({
                    "error": "Transição de status inválida.",
                    "de": de,
                    "para": para,
                }));
                return (StatusCode::CONFLICT, body).into_response();
            }

            AppError::DelivererRequired => {
                // O cliente deve abrir o fluxo de seleção de entregador e
                // reenviar a atualização com o entregador escolhido.
                let body = Json(json!({
                    "error": "Selecione um entregador para iniciar a entrega.",
                    "code": "ENTREGADOR_OBRIGATORIO",
                }));
                return (StatusCode::UNPROCESSABLE_ENTITY, body).into_response();
            }

            // Todos os outros erros (DatabaseError, InternalServerError) viram 500.
            // O `tracing` loga a mensagem detalhada que `thiserror` nos deu.
            ref e => {
                tracing::error!("Erro Interno do Servidor: {}", e);
                (StatusCode::INTERNAL_SERVER_ERROR, "Ocorreu um erro inesperado.")
            }
        };

        let body = Json(json!({ "error": error_message }));
        (status, body).into_response()
    }
}
