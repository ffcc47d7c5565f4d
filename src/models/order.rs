// src/models/order.rs

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;
use validator::Validate;

use crate::models::cart::CartGroup;
use crate::models::cupom::CupomSnapshot;

// Ciclo de vida do pedido:
// pending -> {confirmed|accepted} -> preparing -> ready -> delivering
//         -> {delivered|received}
// com o desvio "cancelled" alcançável de qualquer estado não-terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Accepted,
    Preparing,
    Ready,
    Delivering,
    Delivered,
    Received,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(self) -> bool {
        matches!(self, Self::Delivered | Self::Received | Self::Cancelled)
    }

    // Valida a aresta do grafo de status. Cancelamento é sempre legal a
    // partir de estados não-terminais; nenhuma aresta sai de um terminal.
    pub fn pode_transicionar_para(self, novo: OrderStatus) -> bool {
        use OrderStatus::*;
        if self == novo {
            return false;
        }
        if novo == Cancelled {
            return !self.is_terminal();
        }
        matches!(
            (self, novo),
            (Pending, Confirmed)
                | (Pending, Accepted)
                | (Confirmed, Preparing)
                | (Accepted, Preparing)
                | (Preparing, Ready)
                | (Ready, Delivering)
                | (Delivering, Delivered)
                | (Delivering, Received)
        )
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Accepted => "accepted",
            Self::Preparing => "preparing",
            Self::Ready => "ready",
            Self::Delivering => "delivering",
            Self::Delivered => "delivered",
            Self::Received => "received",
            Self::Cancelled => "cancelled",
        }
    }
}

impl FromStr for OrderStatus {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "accepted" => Ok(Self::Accepted),
            "preparing" => Ok(Self::Preparing),
            "ready" => Ok(Self::Ready),
            "delivering" => Ok(Self::Delivering),
            "delivered" => Ok(Self::Delivered),
            "received" => Ok(Self::Received),
            "cancelled" => Ok(Self::Cancelled),
            _ => Err(()),
        }
    }
}

// a_receber = "a cobrar na entrega"; recebido = valor já em mãos.
// Independente do status de entrega do pedido.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum PaymentStatus {
    AReceber,
    Recebido,
}

// Acerto de caixa do entregador (dinheiro recebido na rua)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "VARCHAR", rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum Settlement {
    ToDeduct,
    Paid,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, sqlx::Type, ToSchema)]
#[sqlx(type_name = "VARCHAR", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum FormaPagamento {
    Dinheiro,
    Cartao,
    Pix,
}

impl FormaPagamento {
    // Pagamento em dinheiro liquida na entrega ("received");
    // os demais terminam como "delivered".
    pub fn status_terminal_de_entrega(self) -> OrderStatus {
        match self {
            Self::Dinheiro => OrderStatus::Received,
            _ => OrderStatus::Delivered,
        }
    }
}

// Uma linha do pedido: snapshot congelado no checkout, independente dos
// registros vivos de item/variação.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemSnapshot {
    pub menu_item_id: Uuid,
    pub nome: String,
    pub preco: Decimal,
    pub preco_a_partir: bool,
    pub quantidade: u32,
    pub grupos: Vec<CartGroup>,
}

#[derive(Debug, Clone, Serialize, sqlx::FromRow, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: Uuid,
    pub empresa_id: Uuid,
    pub cliente_nome: String,
    pub cliente_telefone: String,
    pub cliente_endereco: String,
    pub forma_pagamento: FormaPagamento,
    #[schema(value_type = Vec<OrderItemSnapshot>)]
    pub items: sqlx::types::Json<Vec<OrderItemSnapshot>>,
    pub status: OrderStatus,
    pub payment_status: PaymentStatus,
    pub subtotal: Decimal,
    pub desconto: Decimal,
    pub total: Decimal,
    #[schema(value_type = Option<CupomSnapshot>)]
    pub cupom: Option<sqlx::types::Json<CupomSnapshot>>,
    pub entregador_id: Option<Uuid>,
    pub motivo_cancelamento: Option<String>,
    pub settlement: Option<Settlement>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

// --- Payloads ---

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutPayload {
    // Sessão de carrinho da qual o pedido é criado
    pub session_id: Uuid,

    #[validate(length(min = 1, message = "O nome é obrigatório."))]
    pub cliente_nome: String,
    #[validate(length(min = 8, message = "O telefone é obrigatório."))]
    pub cliente_telefone: String,
    #[validate(length(min = 1, message = "O endereço é obrigatório."))]
    pub cliente_endereco: String,

    pub forma_pagamento: FormaPagamento,

    // Total calculado pelo cliente: apenas consultivo. O valor gravado é
    // sempre o recomputado no servidor; divergências viram log de warn.
    pub total_informado: Option<Decimal>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOrderPayload {
    pub status: Option<OrderStatus>,
    pub payment_status: Option<PaymentStatus>,
    pub entregador_id: Option<Uuid>,
    pub motivo_cancelamento: Option<String>,
    pub settlement: Option<Settlement>,
}

// Filtros das listagens do painel: ambos os limites são inclusivos do dia
// inteiro; status ausente ou "all" devolve todos.
#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct OrderRangeQuery {
    pub inicio: NaiveDate,
    pub fim: NaiveDate,
    pub status: Option<String>,
}

#[derive(Debug, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
pub struct OrderPhoneQuery {
    pub telefone: String,
}

// --- Feed em tempo real ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum ChangeKind {
    Added,
    Modified,
}

// Mudança tipada entregue aos assinantes do feed. `is_new` marca um
// pedido pendente com menos de 10s de idade no momento da emissão. É uma
// heurística de notificação, não um sinal exatamente-uma-vez.
#[derive(Debug, Clone, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct OrderChange {
    pub kind: ChangeKind,
    pub is_new: bool,
    pub order: Order,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fluxo_feliz_de_entrega() {
        use OrderStatus::*;
        assert!(Pending.pode_transicionar_para(Confirmed));
        assert!(Pending.pode_transicionar_para(Accepted));
        assert!(Confirmed.pode_transicionar_para(Preparing));
        assert!(Accepted.pode_transicionar_para(Preparing));
        assert!(Preparing.pode_transicionar_para(Ready));
        assert!(Ready.pode_transicionar_para(Delivering));
        assert!(Delivering.pode_transicionar_para(Delivered));
        assert!(Delivering.pode_transicionar_para(Received));
    }

    #[test]
    fn cancelamento_legal_de_todo_nao_terminal() {
        use OrderStatus::*;
        for status in [Pending, Confirmed, Accepted, Preparing, Ready, Delivering] {
            assert!(
                status.pode_transicionar_para(Cancelled),
                "cancelamento deveria ser legal a partir de {status:?}"
            );
        }
    }

    #[test]
    fn terminais_nao_transicionam() {
        use OrderStatus::*;
        for terminal in [Delivered, Received, Cancelled] {
            assert!(terminal.is_terminal());
            for destino in [
                Pending, Confirmed, Accepted, Preparing, Ready, Delivering, Delivered, Received,
                Cancelled,
            ] {
                assert!(
                    !terminal.pode_transicionar_para(destino),
                    "{terminal:?} -> {destino:?} deveria ser rejeitado"
                );
            }
        }
    }

    #[test]
    fn nao_pula_etapas() {
        use OrderStatus::*;
        assert!(!Pending.pode_transicionar_para(Ready));
        assert!(!Pending.pode_transicionar_para(Delivering));
        assert!(!Preparing.pode_transicionar_para(Delivering));
        assert!(!Ready.pode_transicionar_para(Delivered));
    }

    #[test]
    fn dinheiro_liquida_como_received() {
        assert_eq!(
            FormaPagamento::Dinheiro.status_terminal_de_entrega(),
            OrderStatus::Received
        );
        assert_eq!(
            FormaPagamento::Cartao.status_terminal_de_entrega(),
            OrderStatus::Delivered
        );
        assert_eq!(
            FormaPagamento::Pix.status_terminal_de_entrega(),
            OrderStatus::Delivered
        );
    }

    #[test]
    fn parse_de_status_da_query() {
        assert_eq!("pending".parse::<OrderStatus>(), Ok(OrderStatus::Pending));
        assert_eq!("delivering".parse::<OrderStatus>(), Ok(OrderStatus::Delivering));
        assert!("all".parse::<OrderStatus>().is_err());
        assert!("banana".parse::<OrderStatus>().is_err());
    }
}
