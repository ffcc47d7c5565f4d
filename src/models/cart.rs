// src/models/cart.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::models::cupom::CupomSnapshot;

// --- Seleções enviadas pelo cliente (apenas ids e quantidades) ---

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelecaoVariacao {
    pub variation_id: Uuid,
    #[serde(default = "default_quantidade")]
    pub quantidade: u32,
}

#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct SelecaoGrupo {
    pub group_id: Uuid,
    pub variacoes: Vec<SelecaoVariacao>,
}

#[derive(Debug, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct AddItemPayload {
    pub menu_item_id: Uuid,
    #[serde(default)]
    pub variacoes: Vec<SelecaoGrupo>,
}

// --- Linhas do carrinho (auto-contidas: nome e preço congelados na adição) ---

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartVariation {
    pub variation_id: Uuid,
    pub nome: String,
    pub preco_adicional: Decimal,
    pub quantidade: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartGroup {
    pub group_id: Uuid,
    pub nome: String,
    pub variacoes: Vec<CartVariation>,
}

#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartItem {
    // Chave de identidade derivada do item + seleção canonicalizada.
    // Duas adições com a mesma seleção caem na mesma linha.
    pub key: String,
    pub menu_item_id: Uuid,
    pub nome: String,
    pub preco: Decimal,
    pub preco_a_partir: bool,
    pub quantidade: u32,
    pub grupos: Vec<CartGroup>,
}

impl CartItem {
    // Soma de adicional x quantidade sobre todas as variações escolhidas,
    // computada uma vez por unidade do item.
    pub fn variations_total(&self) -> Decimal {
        self.grupos
            .iter()
            .flat_map(|g| g.variacoes.iter())
            .map(|v| v.preco_adicional * Decimal::from(v.quantidade))
            .sum()
    }

    // "A partir de" zera a contribuição do preço base.
    pub fn line_total(&self) -> Decimal {
        let base = if self.preco_a_partir {
            Decimal::ZERO
        } else {
            self.preco
        };
        (base + self.variations_total()) * Decimal::from(self.quantidade)
    }
}

// O carrinho da sessão, residente em memória. O cupom aplicado é
// descartado em qualquer mutação de itens (a base de preço mudou).
#[derive(Debug, Clone, Default, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Cart {
    pub empresa_id: Option<Uuid>,
    pub itens: Vec<CartItem>,
    pub cupom: Option<CupomSnapshot>,
    pub desconto: Decimal,
}

impl Cart {
    pub fn cart_total(&self) -> Decimal {
        self.itens.iter().map(|i| i.line_total()).sum()
    }

    pub fn item_count(&self) -> u32 {
        self.itens.iter().map(|i| i.quantidade).sum()
    }

    // Nunca negativo, mesmo com desconto maior que o subtotal.
    pub fn final_total(&self) -> Decimal {
        (self.cart_total() - self.desconto).max(Decimal::ZERO)
    }

    pub fn limpar_cupom(&mut self) {
        self.cupom = None;
        self.desconto = Decimal::ZERO;
    }

    // Linha com a mesma chave (mesmo item + mesma seleção) é fundida por
    // incremento de quantidade; seleção diferente vira linha nova.
    pub fn adicionar(&mut self, nova: CartItem) {
        if let Some(linha) = self.itens.iter_mut().find(|l| l.key == nova.key) {
            linha.quantidade += nova.quantidade;
        } else {
            self.itens.push(nova);
        }
        self.limpar_cupom();
    }

    pub fn remover(&mut self, key: &str) {
        self.itens.retain(|l| l.key != key);
        self.limpar_cupom();
    }

    pub fn aumentar(&mut self, key: &str) {
        if let Some(linha) = self.itens.iter_mut().find(|l| l.key == key) {
            linha.quantidade += 1;
        }
        self.limpar_cupom();
    }

    // Diminuir uma linha que já está em 1 remove a linha.
    pub fn diminuir(&mut self, key: &str) {
        if let Some(linha) = self.itens.iter_mut().find(|l| l.key == key) {
            if linha.quantidade > 1 {
                linha.quantidade -= 1;
            } else {
                self.itens.retain(|l| l.key != key);
            }
        }
        self.limpar_cupom();
    }

    pub fn esvaziar(&mut self) {
        self.itens.clear();
        self.empresa_id = None;
        self.limpar_cupom();
    }
}

// Resposta com os valores derivados já computados
#[derive(Debug, Serialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CartResponse {
    pub session_id: Uuid,
    pub empresa_id: Option<Uuid>,
    pub itens: Vec<CartItem>,
    pub item_count: u32,
    pub cart_total: Decimal,
    pub cupom: Option<CupomSnapshot>,
    pub desconto: Decimal,
    pub final_total: Decimal,
}

impl CartResponse {
    pub fn from_cart(session_id: Uuid, cart: &Cart) -> Self {
        Self {
            session_id,
            empresa_id: cart.empresa_id,
            itens: cart.itens.clone(),
            item_count: cart.item_count(),
            cart_total: cart.cart_total(),
            cupom: cart.cupom.clone(),
            desconto: cart.desconto,
            final_total: cart.final_total(),
        }
    }
}

fn default_quantidade() -> u32 {
    1
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    fn item_simples(preco: Decimal, quantidade: u32) -> CartItem {
        CartItem {
            key: "k".into(),
            menu_item_id: Uuid::new_v4(),
            nome: "X-Burger".into(),
            preco,
            preco_a_partir: false,
            quantidade,
            grupos: vec![],
        }
    }

    #[test]
    fn line_total_sem_variacoes() {
        let item = item_simples(dec("20.00"), 2);
        assert_eq!(item.line_total(), dec("40.00"));
    }

    #[test]
    fn line_total_com_variacoes() {
        let mut item = item_simples(dec("10.00"), 3);
        item.grupos = vec![CartGroup {
            group_id: Uuid::new_v4(),
            nome: "Adicionais".into(),
            variacoes: vec![
                CartVariation {
                    variation_id: Uuid::new_v4(),
                    nome: "Bacon".into(),
                    preco_adicional: dec("2.50"),
                    quantidade: 2,
                },
                CartVariation {
                    variation_id: Uuid::new_v4(),
                    nome: "Queijo".into(),
                    preco_adicional: dec("1.00"),
                    quantidade: 1,
                },
            ],
        }];
        // variações: 2.50*2 + 1.00 = 6.00 por unidade; (10 + 6) * 3 = 48
        assert_eq!(item.variations_total(), dec("6.00"));
        assert_eq!(item.line_total(), dec("48.00"));
    }

    #[test]
    fn preco_a_partir_zera_a_base() {
        let mut item = item_simples(dec("30.00"), 2);
        item.preco_a_partir = true;
        item.grupos = vec![CartGroup {
            group_id: Uuid::new_v4(),
            nome: "Tamanho".into(),
            variacoes: vec![CartVariation {
                variation_id: Uuid::new_v4(),
                nome: "Grande".into(),
                preco_adicional: dec("35.00"),
                quantidade: 1,
            }],
        }];
        assert_eq!(item.line_total(), dec("70.00"));
    }

    #[test]
    fn final_total_nunca_negativo() {
        let mut cart = Cart {
            itens: vec![item_simples(dec("10.00"), 1)],
            ..Default::default()
        };
        cart.desconto = dec("50.00");
        assert_eq!(cart.final_total(), Decimal::ZERO);
    }

    #[test]
    fn totais_agregados() {
        let cart = Cart {
            itens: vec![item_simples(dec("20.00"), 2), item_simples(dec("5.00"), 3)],
            ..Default::default()
        };
        assert_eq!(cart.item_count(), 5);
        assert_eq!(cart.cart_total(), dec("55.00"));
        assert_eq!(cart.final_total(), dec("55.00"));
    }

    #[test]
    fn adicionar_duas_vezes_funde_em_uma_linha() {
        let mut cart = Cart::default();
        let mut item = item_simples(dec("20.00"), 1);
        item.key = "mesmo".into();

        cart.adicionar(item.clone());
        cart.adicionar(item);

        assert_eq!(cart.itens.len(), 1);
        assert_eq!(cart.itens[0].quantidade, 2);
    }

    #[test]
    fn selecoes_diferentes_produzem_linhas_distintas() {
        let mut cart = Cart::default();
        let mut a = item_simples(dec("20.00"), 1);
        a.key = "a".into();
        let mut b = item_simples(dec("20.00"), 1);
        b.key = "b".into();

        cart.adicionar(a);
        cart.adicionar(b);

        assert_eq!(cart.itens.len(), 2);
    }

    #[test]
    fn diminuir_em_um_remove_a_linha() {
        let mut cart = Cart::default();
        let mut item = item_simples(dec("10.00"), 1);
        item.key = "k".into();
        cart.adicionar(item);

        cart.diminuir("k");
        assert!(cart.itens.is_empty());
    }

    #[test]
    fn qualquer_mutacao_descarta_o_cupom() {
        use crate::models::cupom::TipoCupom;

        let cupom = CupomSnapshot {
            codigo: "PROMO10".into(),
            tipo: TipoCupom::Fixo,
            valor: dec("10.00"),
        };

        let com_cupom = || {
            let mut cart = Cart::default();
            let mut item = item_simples(dec("20.00"), 2);
            item.key = "k".into();
            cart.adicionar(item);
            cart.cupom = Some(cupom.clone());
            cart.desconto = dec("10.00");
            cart
        };

        let mut cart = com_cupom();
        let mut outro = item_simples(dec("5.00"), 1);
        outro.key = "outro".into();
        cart.adicionar(outro);
        assert!(cart.cupom.is_none());
        assert_eq!(cart.desconto, Decimal::ZERO);

        let mut cart = com_cupom();
        cart.remover("k");
        assert!(cart.cupom.is_none());
        assert_eq!(cart.desconto, Decimal::ZERO);

        let mut cart = com_cupom();
        cart.aumentar("k");
        assert!(cart.cupom.is_none());

        let mut cart = com_cupom();
        cart.diminuir("k");
        assert!(cart.cupom.is_none());

        let mut cart = com_cupom();
        cart.esvaziar();
        assert!(cart.cupom.is_none());
        assert!(cart.itens.is_empty());
    }

    #[test]
    fn cenario_do_cupom_sobre_quarenta_reais() {
        // carrinho: item de 20.00 x2; cupom fixo de 5.00 -> total 35.00;
        // cupom de 50% -> desconto 20.00, total 20.00
        let mut cart = Cart {
            itens: vec![item_simples(dec("20.00"), 2)],
            ..Default::default()
        };
        assert_eq!(cart.cart_total(), dec("40.00"));

        cart.desconto = dec("5.00");
        assert_eq!(cart.final_total(), dec("35.00"));

        cart.desconto = dec("20.00");
        assert_eq!(cart.final_total(), dec("20.00"));
    }
}
