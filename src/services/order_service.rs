// src/services/order_service.rs

use std::sync::Arc;

use chrono::{DateTime, NaiveDate, NaiveTime, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{order_repo::NewOrder, OrderRepository, UsuarioRepository},
    models::{
        empresa::Empresa,
        order::{
            ChangeKind, CheckoutPayload, Order, OrderItemSnapshot, OrderRangeQuery, OrderStatus,
            PaymentStatus, Settlement, UpdateOrderPayload,
        },
        usuario::{Role, Usuario},
    },
    services::{CartService, OrderFeed},
};

#[derive(Clone)]
pub struct OrderService {
    order_repo: OrderRepository,
    usuario_repo: UsuarioRepository,
    cart_service: CartService,
    feed: Arc<OrderFeed>,
}

impl OrderService {
    pub fn new(
        order_repo: OrderRepository,
        usuario_repo: UsuarioRepository,
        cart_service: CartService,
        feed: Arc<OrderFeed>,
    ) -> Self {
        Self {
            order_repo,
            usuario_repo,
            cart_service,
            feed,
        }
    }

    // Persiste o carrinho da sessão como pedido. O subtotal é recomputado
    // aqui, linha a linha; o total enviado pelo cliente é só consultivo e
    // nunca é gravado.
    pub async fn checkout(
        &self,
        empresa: &Empresa,
        payload: &CheckoutPayload,
    ) -> Result<Order, AppError> {
        let cart = self.cart_service.snapshot(payload.session_id)?;
        if cart.itens.is_empty() || cart.empresa_id != Some(empresa.id) {
            return Err(AppError::EmptyCart);
        }

        let subtotal: Decimal = cart.itens.iter().map(|l| l.line_total()).sum();
        let desconto = cart.desconto.min(subtotal);
        let total = (subtotal - desconto).max(Decimal::ZERO);

        if let Some(informado) = payload.total_informado {
            if informado != total {
                tracing::warn!(
                    "Total informado pelo cliente ({}) difere do recomputado ({}); usando o do servidor.",
                    informado,
                    total
                );
            }
        }

        let items: Vec<OrderItemSnapshot> = cart
            .itens
            .iter()
            .map(|l| OrderItemSnapshot {
                menu_item_id: l.menu_item_id,
                nome: l.nome.clone(),
                preco: l.preco,
                preco_a_partir: l.preco_a_partir,
                quantidade: l.quantidade,
                grupos: l.grupos.clone(),
            })
            .collect();

        let order = self
            .order_repo
            .insert(NewOrder {
                empresa_id: empresa.id,
                cliente_nome: &payload.cliente_nome,
                cliente_telefone: &payload.cliente_telefone,
                cliente_endereco: &payload.cliente_endereco,
                forma_pagamento: payload.forma_pagamento,
                items: &items,
                subtotal,
                desconto,
                total,
                cupom: cart.cupom.as_ref(),
            })
            .await?;

        self.cart_service.descartar(payload.session_id);
        self.feed.publicar(ChangeKind::Added, order.clone());

        tracing::info!("🧾 Pedido {} criado para {}", order.id, empresa.slug);
        Ok(order)
    }

    // Atualização parcial do painel: transição de status, acerto de
    // pagamento, atribuição de entregador, motivo de cancelamento.
    pub async fn atualizar(
        &self,
        empresa_id: Uuid,
        order_id: Uuid,
        payload: &UpdateOrderPayload,
    ) -> Result<Order, AppError> {
        let atual = self
            .order_repo
            .find_by_id(empresa_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if let Some(novo) = payload.status {
            if !atual.status.pode_transicionar_para(novo) {
                return Err(AppError::InvalidTransition(
                    atual.status.as_str().to_string(),
                    novo.as_str().to_string(),
                ));
            }
            // ready -> delivering só com entregador na MESMA atualização;
            // sem ele o painel abre a seleção e reenvia.
            if novo == OrderStatus::Delivering
                && payload.entregador_id.is_none()
                && atual.entregador_id.is_none()
            {
                return Err(AppError::DelivererRequired);
            }
        }

        if let Some(entregador_id) = payload.entregador_id {
            self.validar_entregador(empresa_id, entregador_id).await?;
        }

        let order = self
            .order_repo
            .update(
                empresa_id,
                order_id,
                payload.status,
                payload.payment_status,
                payload.entregador_id,
                payload.motivo_cancelamento.as_deref(),
                payload.settlement,
            )
            .await?
            .ok_or(AppError::OrderNotFound)?;

        self.feed.publicar(ChangeKind::Modified, order.clone());
        Ok(order)
    }

    // O entregador conclui a entrega. O terminal depende da forma de
    // pagamento: dinheiro liquida como "received" e entra no acerto de
    // caixa do entregador; o resto fecha como "delivered".
    pub async fn concluir_entrega(
        &self,
        empresa_id: Uuid,
        order_id: Uuid,
        entregador: &Usuario,
    ) -> Result<Order, AppError> {
        let atual = self
            .order_repo
            .find_by_id(empresa_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)?;

        if atual.entregador_id != Some(entregador.id) {
            return Err(AppError::Forbidden);
        }

        let terminal = atual.forma_pagamento.status_terminal_de_entrega();
        if !atual.status.pode_transicionar_para(terminal) {
            return Err(AppError::InvalidTransition(
                atual.status.as_str().to_string(),
                terminal.as_str().to_string(),
            ));
        }

        let (payment_status, settlement) = if terminal == OrderStatus::Received {
            (Some(PaymentStatus::Recebido), Some(Settlement::ToDeduct))
        } else {
            (None, None)
        };

        let order = self
            .order_repo
            .update(
                empresa_id,
                order_id,
                Some(terminal),
                payment_status,
                None,
                None,
                settlement,
            )
            .await?
            .ok_or(AppError::OrderNotFound)?;

        self.feed.publicar(ChangeKind::Modified, order.clone());
        Ok(order)
    }

    // --- Consultas ---

    pub async fn por_id(&self, empresa_id: Uuid, order_id: Uuid) -> Result<Order, AppError> {
        self.order_repo
            .find_by_id(empresa_id, order_id)
            .await?
            .ok_or(AppError::OrderNotFound)
    }

    pub async fn por_telefone(
        &self,
        empresa_id: Uuid,
        telefone: &str,
    ) -> Result<Vec<Order>, AppError> {
        self.order_repo.find_by_phone(empresa_id, telefone).await
    }

    pub async fn por_intervalo(
        &self,
        empresa_id: Uuid,
        query: &OrderRangeQuery,
    ) -> Result<Vec<Order>, AppError> {
        let status = parse_status_filter(query.status.as_deref())?;
        let (inicio, fim) = limites_do_dia(query.inicio, query.fim);
        self.order_repo
            .find_by_date_range(empresa_id, inicio, fim, status)
            .await
    }

    // Visão do entregador: tudo que está na rua.
    pub async fn em_entrega(&self, empresa_id: Uuid) -> Result<Vec<Order>, AppError> {
        self.order_repo
            .find_by_status(empresa_id, OrderStatus::Delivering)
            .await
    }

    // Entregadores elegíveis para a seleção do fluxo pronto -> em entrega.
    // Lista vazia significa que a transição não pode ser completada.
    pub async fn entregadores_disponiveis(
        &self,
        empresa_id: Uuid,
    ) -> Result<Vec<Usuario>, AppError> {
        self.usuario_repo.list_entregadores(empresa_id, true).await
    }

    pub fn feed(&self) -> &Arc<OrderFeed> {
        &self.feed
    }

    async fn validar_entregador(
        &self,
        empresa_id: Uuid,
        entregador_id: Uuid,
    ) -> Result<(), AppError> {
        let usuario = self
            .usuario_repo
            .find_by_id(entregador_id)
            .await?
            .ok_or(AppError::UserNotFound)?;
        let pertence = usuario.empresa_id == Some(empresa_id);
        if usuario.role != Role::Entregador || !pertence || !usuario.status_entregador {
            return Err(AppError::UserNotFound);
        }
        Ok(())
    }
}

// Ambos os limites são inclusivos do dia inteiro: 00:00:00.000 do início
// até 23:59:59.999 do fim.
pub fn limites_do_dia(inicio: NaiveDate, fim: NaiveDate) -> (DateTime<Utc>, DateTime<Utc>) {
    let comeco = inicio.and_time(NaiveTime::MIN).and_utc();
    let fim = fim
        .and_hms_milli_opt(23, 59, 59, 999)
        .expect("hora constante válida")
        .and_utc();
    (comeco, fim)
}

// Ausente ou "all" devolve todos os status.
pub fn parse_status_filter(status: Option<&str>) -> Result<Option<OrderStatus>, AppError> {
    match status {
        None => Ok(None),
        Some("all") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(|_| AppError::InvalidStatus),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn limites_cobrem_o_dia_inteiro() {
        let dia = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
        let (inicio, fim) = limites_do_dia(dia, dia);
        assert_eq!(inicio.time(), NaiveTime::MIN);
        assert_eq!(fim.hour(), 23);
        assert_eq!(fim.minute(), 59);
        assert_eq!(fim.second(), 59);
        assert!(inicio < fim);
        assert_eq!(inicio.date_naive(), fim.date_naive());
    }

    #[test]
    fn filtro_de_status_aceita_all_e_ausente() {
        assert_eq!(parse_status_filter(None).unwrap(), None);
        assert_eq!(parse_status_filter(Some("all")).unwrap(), None);
        assert_eq!(
            parse_status_filter(Some("pending")).unwrap(),
            Some(OrderStatus::Pending)
        );
        assert!(parse_status_filter(Some("qualquer")).is_err());
    }
}
