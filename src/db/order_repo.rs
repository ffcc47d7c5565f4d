// src/db/order_repo.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::{
        cupom::CupomSnapshot,
        order::{FormaPagamento, Order, OrderItemSnapshot, OrderStatus, PaymentStatus, Settlement},
    },
};

const ORDER_COLS: &str = "id, empresa_id, cliente_nome, cliente_telefone, cliente_endereco, forma_pagamento, items, status, payment_status, subtotal, desconto, total, cupom, entregador_id, motivo_cancelamento, settlement, created_at, updated_at";

// Dados necessários para inserir um pedido; o snapshot de itens e de cupom
// já vem pronto do serviço de checkout.
pub struct NewOrder<'a> {
    pub empresa_id: Uuid,
    pub cliente_nome: &'a str,
    pub cliente_telefone: &'a str,
    pub cliente_endereco: &'a str,
    pub forma_pagamento: FormaPagamento,
    pub items: &'a [OrderItemSnapshot],
    pub subtotal: Decimal,
    pub desconto: Decimal,
    pub total: Decimal,
    pub cupom: Option<&'a CupomSnapshot>,
}

#[derive(Clone)]
pub struct OrderRepository {
    pool: PgPool,
}

impl OrderRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn insert(&self, novo: NewOrder<'_>) -> Result<Order, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            INSERT INTO orders
                (empresa_id, cliente_nome, cliente_telefone, cliente_endereco,
                 forma_pagamento, items, subtotal, desconto, total, cupom)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            RETURNING {ORDER_COLS}
            "#
        ))
        .bind(novo.empresa_id)
        .bind(novo.cliente_nome)
        .bind(novo.cliente_telefone)
        .bind(novo.cliente_endereco)
        .bind(novo.forma_pagamento)
        .bind(sqlx::types::Json(novo.items))
        .bind(novo.subtotal)
        .bind(novo.desconto)
        .bind(novo.total)
        .bind(novo.cupom.map(sqlx::types::Json))
        .fetch_one(&self.pool)
        .await?;
        Ok(order)
    }

    pub async fn find_by_id(
        &self,
        empresa_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            "SELECT {ORDER_COLS} FROM orders WHERE id = $2 AND empresa_id = $1"
        ))
        .bind(empresa_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }

    // Acompanhamento do cliente: pedidos do telefone, mais recentes primeiro.
    pub async fn find_by_phone(
        &self,
        empresa_id: Uuid,
        telefone: &str,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLS} FROM orders
            WHERE empresa_id = $1 AND cliente_telefone = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(empresa_id)
        .bind(telefone)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    // Intervalo fechado [inicio, fim] já expandido para os limites do dia
    // pelo serviço; status None devolve todos.
    pub async fn find_by_date_range(
        &self,
        empresa_id: Uuid,
        inicio: DateTime<Utc>,
        fim: DateTime<Utc>,
        status: Option<OrderStatus>,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLS} FROM orders
            WHERE empresa_id = $1
              AND created_at >= $2
              AND created_at <= $3
              AND ($4::VARCHAR IS NULL OR status = $4)
            ORDER BY created_at DESC
            "#
        ))
        .bind(empresa_id)
        .bind(inicio)
        .bind(fim)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    pub async fn find_by_status(
        &self,
        empresa_id: Uuid,
        status: OrderStatus,
    ) -> Result<Vec<Order>, AppError> {
        let orders = sqlx::query_as::<_, Order>(&format!(
            r#"
            SELECT {ORDER_COLS} FROM orders
            WHERE empresa_id = $1 AND status = $2
            ORDER BY created_at DESC
            "#
        ))
        .bind(empresa_id)
        .bind(status)
        .fetch_all(&self.pool)
        .await?;
        Ok(orders)
    }

    // Atualização parcial; campos ausentes ficam como estão. `updated_at`
    // é sempre carimbado.
    #[allow(clippy::too_many_arguments)]
    pub async fn update(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        status: Option<OrderStatus>,
        payment_status: Option<PaymentStatus>,
        entregador_id: Option<Uuid>,
        motivo_cancelamento: Option<&str>,
        settlement: Option<Settlement>,
    ) -> Result<Option<Order>, AppError> {
        let order = sqlx::query_as::<_, Order>(&format!(
            r#"
            UPDATE orders SET
                status = COALESCE($3, status),
                payment_status = COALESCE($4, payment_status),
                entregador_id = COALESCE($5, entregador_id),
                motivo_cancelamento = COALESCE($6, motivo_cancelamento),
                settlement = COALESCE($7, settlement),
                updated_at = now()
            WHERE id = $2 AND empresa_id = $1
            RETURNING {ORDER_COLS}
            "#
        ))
        .bind(empresa_id)
        .bind(id)
        .bind(status)
        .bind(payment_status)
        .bind(entregador_id)
        .bind(motivo_cancelamento)
        .bind(settlement)
        .fetch_optional(&self.pool)
        .await?;
        Ok(order)
    }
}
