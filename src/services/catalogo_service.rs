// src/services/catalogo_service.rs

use std::collections::HashMap;

use uuid::Uuid;

use crate::{
    common::{error::AppError, storage},
    db::CatalogoRepository,
    models::catalogo::{
        CardapioResponse, Category, CreateMenuItemPayload, GrupoComVariacoes, MenuItem,
        MenuItemDetalhado, UpdateMenuItemPayload, Variation, VariationGroup,
    },
};

#[derive(Clone)]
pub struct CatalogoService {
    catalogo_repo: CatalogoRepository,
    storage_public_url: String,
}

impl CatalogoService {
    pub fn new(catalogo_repo: CatalogoRepository, storage_public_url: String) -> Self {
        Self {
            catalogo_repo,
            storage_public_url,
        }
    }

    // Monta o cardápio completo do storefront em três consultas planas
    // (itens, item->grupo, grupo->variação) e compõe em memória.
    pub async fn montar_cardapio(&self, empresa_id: Uuid) -> Result<CardapioResponse, AppError> {
        let categorias = self.catalogo_repo.list_categories(empresa_id).await?;
        let itens = self.catalogo_repo.list_menu_items(empresa_id).await?;
        let item_groups = self.catalogo_repo.item_groups(empresa_id).await?;
        let group_variations = self.catalogo_repo.group_variations(empresa_id).await?;

        let mut variacoes_por_grupo: HashMap<Uuid, Vec<Variation>> = HashMap::new();
        for row in group_variations {
            variacoes_por_grupo
                .entry(row.group_id)
                .or_default()
                .push(row.variacao);
        }

        let mut grupos_por_item: HashMap<Uuid, Vec<GrupoComVariacoes>> = HashMap::new();
        for row in item_groups {
            let variacoes = variacoes_por_grupo
                .get(&row.grupo.id)
                .cloned()
                .unwrap_or_default();
            grupos_por_item
                .entry(row.menu_item_id)
                .or_default()
                .push(GrupoComVariacoes {
                    grupo: row.grupo,
                    variacoes,
                });
        }

        let itens = itens
            .into_iter()
            .map(|item| {
                let imagem_url =
                    storage::menu_image_url(&self.storage_public_url, item.imagem_path.as_deref());
                let grupos = grupos_por_item.remove(&item.id).unwrap_or_default();
                MenuItemDetalhado {
                    item,
                    imagem_url,
                    grupos,
                }
            })
            .collect();

        Ok(CardapioResponse { categorias, itens })
    }

    // --- Categorias ---

    pub async fn listar_categorias(&self, empresa_id: Uuid) -> Result<Vec<Category>, AppError> {
        self.catalogo_repo.list_categories(empresa_id).await
    }

    pub async fn criar_categoria(
        &self,
        empresa_id: Uuid,
        nome: &str,
        ordem: i32,
    ) -> Result<Category, AppError> {
        self.catalogo_repo.create_category(empresa_id, nome, ordem).await
    }

    pub async fn atualizar_categoria(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        nome: Option<&str>,
        ordem: Option<i32>,
    ) -> Result<Category, AppError> {
        self.catalogo_repo
            .update_category(empresa_id, id, nome, ordem)
            .await
    }

    pub async fn deletar_categoria(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.catalogo_repo.delete_category(empresa_id, id).await
    }

    // --- Itens ---

    pub async fn listar_itens(&self, empresa_id: Uuid) -> Result<Vec<MenuItem>, AppError> {
        self.catalogo_repo.list_menu_items(empresa_id).await
    }

    // Criação do item e associação de grupos em uma única transação.
    pub async fn criar_item(
        &self,
        empresa_id: Uuid,
        payload: &CreateMenuItemPayload,
    ) -> Result<MenuItem, AppError> {
        for group_id in &payload.grupos {
            self.catalogo_repo
                .find_group(empresa_id, *group_id)
                .await?
                .ok_or(AppError::VariationNotFound)?;
        }

        let mut tx = self.catalogo_repo.pool().begin().await?;

        let item = self
            .catalogo_repo
            .create_menu_item(
                &mut *tx,
                empresa_id,
                payload.category_id,
                &payload.nome,
                payload.descricao.as_deref(),
                payload.preco,
                payload.preco_a_partir,
                payload.disponivel,
                payload.imagem_path.as_deref(),
            )
            .await?;

        if !payload.grupos.is_empty() {
            self.catalogo_repo
                .set_item_groups(&mut *tx, item.id, &payload.grupos)
                .await?;
        }

        tx.commit().await?;
        Ok(item)
    }

    pub async fn atualizar_item(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        payload: &UpdateMenuItemPayload,
    ) -> Result<MenuItem, AppError> {
        let mut tx = self.catalogo_repo.pool().begin().await?;

        let item = self
            .catalogo_repo
            .update_menu_item(
                &mut *tx,
                empresa_id,
                id,
                payload.nome.as_deref(),
                payload.descricao.as_deref(),
                payload.preco,
                payload.preco_a_partir,
                payload.disponivel,
                payload.category_id,
                payload.imagem_path.as_deref(),
            )
            .await?;

        if let Some(grupos) = &payload.grupos {
            self.catalogo_repo
                .set_item_groups(&mut *tx, item.id, grupos)
                .await?;
        }

        tx.commit().await?;
        Ok(item)
    }

    pub async fn deletar_item(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.catalogo_repo.delete_menu_item(empresa_id, id).await
    }

    // --- Grupos e variações ---

    pub async fn listar_grupos(
        &self,
        empresa_id: Uuid,
    ) -> Result<Vec<GrupoComVariacoes>, AppError> {
        let grupos = self.catalogo_repo.list_groups(empresa_id).await?;
        let group_variations = self.catalogo_repo.group_variations(empresa_id).await?;

        let mut variacoes_por_grupo: HashMap<Uuid, Vec<Variation>> = HashMap::new();
        for row in group_variations {
            variacoes_por_grupo
                .entry(row.group_id)
                .or_default()
                .push(row.variacao);
        }

        Ok(grupos
            .into_iter()
            .map(|grupo| {
                let variacoes = variacoes_por_grupo.remove(&grupo.id).unwrap_or_default();
                GrupoComVariacoes { grupo, variacoes }
            })
            .collect())
    }

    pub async fn criar_grupo(
        &self,
        empresa_id: Uuid,
        nome: &str,
        min_escolhas: i32,
        max_escolhas: i32,
    ) -> Result<VariationGroup, AppError> {
        self.catalogo_repo
            .create_group(empresa_id, nome, min_escolhas, max_escolhas)
            .await
    }

    pub async fn deletar_grupo(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.catalogo_repo.delete_group(empresa_id, id).await
    }

    pub async fn criar_variacao(
        &self,
        empresa_id: Uuid,
        group_id: Uuid,
        nome: &str,
        preco_adicional: rust_decimal::Decimal,
    ) -> Result<Variation, AppError> {
        self.catalogo_repo
            .find_group(empresa_id, group_id)
            .await?
            .ok_or(AppError::VariationNotFound)?;
        self.catalogo_repo
            .create_variation(empresa_id, group_id, nome, preco_adicional)
            .await
    }

    pub async fn deletar_variacao(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.catalogo_repo.delete_variation(empresa_id, id).await
    }
}
