// src/services/order_feed.rs

use std::collections::HashMap;
use std::sync::RwLock;

use chrono::Utc;
use tokio::sync::broadcast;
use uuid::Uuid;

use crate::models::order::{ChangeKind, Order, OrderChange, OrderStatus};

// Janela da heurística de "pedido novo": um added pendente com menos de
// dez segundos de idade dispara a notificação sonora do painel. É uma
// heurística de observação, não um sinal exatamente-uma-vez.
const JANELA_PEDIDO_NOVO_SECS: i64 = 10;

// Hub em processo de mudanças de pedido. Cada estabelecimento tem seu
// canal broadcast; assinar devolve um receiver tipado e cancelar a
// assinatura é simplesmente derrubar o receiver. Assinantes lentos que
// estourarem o buffer perdem mensagens antigas (comportamento do
// broadcast), nunca travam o emissor.
pub struct OrderFeed {
    canais: RwLock<HashMap<Uuid, broadcast::Sender<OrderChange>>>,
    capacidade: usize,
}

impl OrderFeed {
    pub fn new(capacidade: usize) -> Self {
        Self {
            canais: RwLock::new(HashMap::new()),
            capacidade,
        }
    }

    pub fn subscribe(&self, empresa_id: Uuid) -> broadcast::Receiver<OrderChange> {
        let mut canais = self.canais.write().expect("lock do feed envenenado");
        canais
            .entry(empresa_id)
            .or_insert_with(|| broadcast::channel(self.capacidade).0)
            .subscribe()
    }

    pub fn publicar(&self, kind: ChangeKind, order: Order) {
        let change = OrderChange {
            kind,
            is_new: eh_pedido_novo(kind, &order),
            order,
        };

        let canais = self.canais.read().expect("lock do feed envenenado");
        if let Some(sender) = canais.get(&change.order.empresa_id) {
            // Err aqui significa apenas "nenhum assinante no momento".
            let _ = sender.send(change);
        }
    }
}

fn eh_pedido_novo(kind: ChangeKind, order: &Order) -> bool {
    kind == ChangeKind::Added
        && order.status == OrderStatus::Pending
        && (Utc::now() - order.created_at).num_seconds() < JANELA_PEDIDO_NOVO_SECS
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::order::{FormaPagamento, PaymentStatus};
    use chrono::Duration;
    use rust_decimal::Decimal;

    fn pedido(status: OrderStatus, idade_secs: i64) -> Order {
        let criado = Utc::now() - Duration::seconds(idade_secs);
        Order {
            id: Uuid::new_v4(),
            empresa_id: Uuid::new_v4(),
            cliente_nome: "Ana".into(),
            cliente_telefone: "11999990000".into(),
            cliente_endereco: "Rua A, 1".into(),
            forma_pagamento: FormaPagamento::Pix,
            items: sqlx::types::Json(vec![]),
            status,
            payment_status: PaymentStatus::AReceber,
            subtotal: Decimal::ZERO,
            desconto: Decimal::ZERO,
            total: Decimal::ZERO,
            cupom: None,
            entregador_id: None,
            motivo_cancelamento: None,
            settlement: None,
            created_at: criado,
            updated_at: criado,
        }
    }

    #[test]
    fn added_pendente_recente_eh_novo() {
        assert!(eh_pedido_novo(ChangeKind::Added, &pedido(OrderStatus::Pending, 2)));
    }

    #[test]
    fn pedido_antigo_nao_notifica() {
        // Pedidos históricos devolvidos pelo snapshot inicial não contam.
        assert!(!eh_pedido_novo(ChangeKind::Added, &pedido(OrderStatus::Pending, 60)));
    }

    #[test]
    fn modificacao_nunca_notifica() {
        assert!(!eh_pedido_novo(ChangeKind::Modified, &pedido(OrderStatus::Pending, 2)));
    }

    #[test]
    fn added_nao_pendente_nao_notifica() {
        assert!(!eh_pedido_novo(ChangeKind::Added, &pedido(OrderStatus::Confirmed, 2)));
    }

    #[tokio::test]
    async fn assinatura_recebe_mudancas_do_proprio_estabelecimento() {
        let feed = OrderFeed::new(16);
        let order = pedido(OrderStatus::Pending, 0);
        let empresa_id = order.empresa_id;

        let mut rx = feed.subscribe(empresa_id);
        feed.publicar(ChangeKind::Added, order.clone());

        let change = rx.recv().await.unwrap();
        assert_eq!(change.kind, ChangeKind::Added);
        assert!(change.is_new);
        assert_eq!(change.order.id, order.id);

        // Outro estabelecimento não enxerga nada.
        let mut rx_outro = feed.subscribe(Uuid::new_v4());
        feed.publicar(ChangeKind::Added, pedido(OrderStatus::Pending, 0));
        assert!(rx_outro.try_recv().is_err());
    }
}
