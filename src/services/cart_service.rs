// src/services/cart_service.rs

use std::collections::HashMap;
use std::sync::{Arc, RwLock};

use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CatalogoRepository,
    models::{
        cart::{Cart, CartGroup, CartItem, CartResponse, CartVariation, SelecaoGrupo},
        cupom::CupomSnapshot,
    },
};

// Os carrinhos vivem em memória, um por sessão de navegação, e morrem com
// o processo. Nenhum handler segura o lock através de um await: toda
// busca no catálogo acontece antes da seção crítica.
#[derive(Clone)]
pub struct CartService {
    carts: Arc<RwLock<HashMap<Uuid, Cart>>>,
    catalogo_repo: CatalogoRepository,
}

impl CartService {
    pub fn new(catalogo_repo: CatalogoRepository) -> Self {
        Self {
            carts: Arc::new(RwLock::new(HashMap::new())),
            catalogo_repo,
        }
    }

    pub fn create_session(&self) -> Uuid {
        let session_id = Uuid::new_v4();
        self.carts
            .write()
            .expect("lock de carrinhos envenenado")
            .insert(session_id, Cart::default());
        session_id
    }

    pub fn get(&self, session_id: Uuid) -> Result<CartResponse, AppError> {
        let carts = self.carts.read().expect("lock de carrinhos envenenado");
        let cart = carts.get(&session_id).ok_or(AppError::CartNotFound)?;
        Ok(CartResponse::from_cart(session_id, cart))
    }

    // Adiciona um item: enriquece as variações escolhidas com nome e preço
    // atuais do catálogo (a linha fica auto-contida), calcula a chave de
    // identidade e funde com uma linha existente quando a seleção é igual.
    pub async fn add_item(
        &self,
        session_id: Uuid,
        empresa_id: Uuid,
        menu_item_id: Uuid,
        selecoes: &[SelecaoGrupo],
    ) -> Result<CartResponse, AppError> {
        let item = self
            .catalogo_repo
            .find_menu_item(empresa_id, menu_item_id)
            .await?
            .ok_or(AppError::MenuItemNotFound)?;
        if !item.disponivel {
            return Err(AppError::MenuItemNotFound);
        }

        let grupos = self.enriquecer_selecoes(empresa_id, selecoes).await?;
        let key = merge_key(menu_item_id, &grupos);

        let mut carts = self.carts.write().expect("lock de carrinhos envenenado");
        let cart = carts.get_mut(&session_id).ok_or(AppError::CartNotFound)?;

        // Trocar de estabelecimento começa um carrinho novo.
        if cart.empresa_id != Some(empresa_id) {
            *cart = Cart::default();
            cart.empresa_id = Some(empresa_id);
        }

        cart.adicionar(CartItem {
            key,
            menu_item_id,
            nome: item.nome,
            preco: item.preco,
            preco_a_partir: item.preco_a_partir,
            quantidade: 1,
            grupos,
        });

        Ok(CartResponse::from_cart(session_id, cart))
    }

    pub fn remove_item(&self, session_id: Uuid, key: &str) -> Result<CartResponse, AppError> {
        self.mutate(session_id, |cart| cart.remover(key))
    }

    pub fn increase_quantity(
        &self,
        session_id: Uuid,
        key: &str,
    ) -> Result<CartResponse, AppError> {
        self.mutate(session_id, |cart| cart.aumentar(key))
    }

    pub fn decrease_quantity(
        &self,
        session_id: Uuid,
        key: &str,
    ) -> Result<CartResponse, AppError> {
        self.mutate(session_id, |cart| cart.diminuir(key))
    }

    pub fn clear(&self, session_id: Uuid) -> Result<CartResponse, AppError> {
        self.mutate(session_id, |cart| cart.esvaziar())
    }

    // Aplicação e remoção de cupom não passam por `mutate`: são as únicas
    // operações que NÃO descartam o desconto.
    pub fn aplicar_cupom(
        &self,
        session_id: Uuid,
        cupom: CupomSnapshot,
        desconto: Decimal,
    ) -> Result<CartResponse, AppError> {
        let mut carts = self.carts.write().expect("lock de carrinhos envenenado");
        let cart = carts.get_mut(&session_id).ok_or(AppError::CartNotFound)?;
        cart.cupom = Some(cupom);
        cart.desconto = desconto;
        Ok(CartResponse::from_cart(session_id, cart))
    }

    pub fn remover_cupom(&self, session_id: Uuid) -> Result<CartResponse, AppError> {
        let mut carts = self.carts.write().expect("lock de carrinhos envenenado");
        let cart = carts.get_mut(&session_id).ok_or(AppError::CartNotFound)?;
        cart.limpar_cupom();
        Ok(CartResponse::from_cart(session_id, cart))
    }

    // Leitura do carrinho inteiro para o checkout.
    pub fn snapshot(&self, session_id: Uuid) -> Result<Cart, AppError> {
        let carts = self.carts.read().expect("lock de carrinhos envenenado");
        carts.get(&session_id).cloned().ok_or(AppError::CartNotFound)
    }

    // Esvazia a sessão depois de um checkout bem-sucedido.
    pub fn descartar(&self, session_id: Uuid) {
        self.carts
            .write()
            .expect("lock de carrinhos envenenado")
            .remove(&session_id);
    }

    fn mutate(
        &self,
        session_id: Uuid,
        f: impl FnOnce(&mut Cart),
    ) -> Result<CartResponse, AppError> {
        let mut carts = self.carts.write().expect("lock de carrinhos envenenado");
        let cart = carts.get_mut(&session_id).ok_or(AppError::CartNotFound)?;
        f(cart);
        Ok(CartResponse::from_cart(session_id, cart))
    }

    async fn enriquecer_selecoes(
        &self,
        empresa_id: Uuid,
        selecoes: &[SelecaoGrupo],
    ) -> Result<Vec<CartGroup>, AppError> {
        let mut grupos = Vec::with_capacity(selecoes.len());
        for selecao in selecoes {
            let grupo = self
                .catalogo_repo
                .find_group(empresa_id, selecao.group_id)
                .await?
                .ok_or(AppError::VariationNotFound)?;

            let mut variacoes = Vec::with_capacity(selecao.variacoes.len());
            for v in &selecao.variacoes {
                if v.quantidade == 0 {
                    continue;
                }
                let variacao = self
                    .catalogo_repo
                    .find_variation(empresa_id, v.variation_id)
                    .await?
                    .ok_or(AppError::VariationNotFound)?;
                variacoes.push(CartVariation {
                    variation_id: variacao.id,
                    nome: variacao.nome,
                    preco_adicional: variacao.preco_adicional,
                    quantidade: v.quantidade,
                });
            }
            if !variacoes.is_empty() {
                grupos.push(CartGroup {
                    group_id: grupo.id,
                    nome: grupo.nome,
                    variacoes,
                });
            }
        }
        Ok(grupos)
    }
}

// Chave de identidade da linha: item + codificação canônica (ordenada)
// das variações escolhidas. A ordem de seleção não importa; quantidades
// diferentes produzem linhas diferentes.
pub fn merge_key(menu_item_id: Uuid, grupos: &[CartGroup]) -> String {
    let mut pares: Vec<(Uuid, u32)> = grupos
        .iter()
        .flat_map(|g| g.variacoes.iter())
        .map(|v| (v.variation_id, v.quantidade))
        .collect();
    pares.sort();

    let mut key = menu_item_id.to_string();
    for (id, quantidade) in pares {
        key.push('|');
        key.push_str(&id.to_string());
        key.push('x');
        key.push_str(&quantidade.to_string());
    }
    key
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grupo(variacoes: Vec<(Uuid, u32)>) -> CartGroup {
        CartGroup {
            group_id: Uuid::new_v4(),
            nome: "Adicionais".into(),
            variacoes: variacoes
                .into_iter()
                .map(|(id, quantidade)| CartVariation {
                    variation_id: id,
                    nome: "v".into(),
                    preco_adicional: Decimal::ONE,
                    quantidade,
                })
                .collect(),
        }
    }

    #[test]
    fn merge_key_ignora_ordem_da_selecao() {
        let item = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let k1 = merge_key(item, &[grupo(vec![(a, 1), (b, 2)])]);
        let k2 = merge_key(item, &[grupo(vec![(b, 2), (a, 1)])]);
        assert_eq!(k1, k2);
    }

    #[test]
    fn merge_key_distingue_quantidades() {
        let item = Uuid::new_v4();
        let a = Uuid::new_v4();
        let k1 = merge_key(item, &[grupo(vec![(a, 1)])]);
        let k2 = merge_key(item, &[grupo(vec![(a, 2)])]);
        assert_ne!(k1, k2);
    }

    #[test]
    fn merge_key_distingue_itens() {
        let a = Uuid::new_v4();
        let k1 = merge_key(Uuid::new_v4(), &[grupo(vec![(a, 1)])]);
        let k2 = merge_key(Uuid::new_v4(), &[grupo(vec![(a, 1)])]);
        assert_ne!(k1, k2);
    }

    #[test]
    fn merge_key_atravessa_grupos() {
        // A mesma seleção repartida em grupos diferentes produz a mesma
        // chave: a identidade é o multiconjunto de variações.
        let item = Uuid::new_v4();
        let (a, b) = (Uuid::new_v4(), Uuid::new_v4());
        let k1 = merge_key(item, &[grupo(vec![(a, 1), (b, 1)])]);
        let k2 = merge_key(item, &[grupo(vec![(a, 1)]), grupo(vec![(b, 1)])]);
        assert_eq!(k1, k2);
    }
}
