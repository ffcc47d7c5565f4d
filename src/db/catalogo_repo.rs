// src/db/catalogo_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::catalogo::{Category, MenuItem, Variation, VariationGroup},
};

const MENU_ITEM_COLS: &str = "id, empresa_id, category_id, nome, descricao, preco, preco_a_partir, disponivel, imagem_path, created_at, updated_at";

// Linha intermediária das junções item -> grupo
#[derive(sqlx::FromRow)]
pub struct ItemGroupRow {
    pub menu_item_id: Uuid,
    #[sqlx(flatten)]
    pub grupo: VariationGroup,
}

// Linha intermediária das junções grupo -> variação
#[derive(sqlx::FromRow)]
pub struct GroupVariationRow {
    pub group_id: Uuid,
    #[sqlx(flatten)]
    pub variacao: Variation,
}

// O repositório do catálogo: categorias, itens, grupos e variações.
#[derive(Clone)]
pub struct CatalogoRepository {
    pool: PgPool,
}

impl CatalogoRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    // --- Categorias ---

    pub async fn list_categories(&self, empresa_id: Uuid) -> Result<Vec<Category>, AppError> {
        let categorias = sqlx::query_as::<_, Category>(
            r#"
            SELECT id, empresa_id, nome, ordem, created_at
            FROM categories
            WHERE empresa_id = $1
            ORDER BY ordem, nome
            "#,
        )
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(categorias)
    }

    pub async fn create_category(
        &self,
        empresa_id: Uuid,
        nome: &str,
        ordem: i32,
    ) -> Result<Category, AppError> {
        let categoria = sqlx::query_as::<_, Category>(
            r#"
            INSERT INTO categories (empresa_id, nome, ordem)
            VALUES ($1, $2, $3)
            RETURNING id, empresa_id, nome, ordem, created_at
            "#,
        )
        .bind(empresa_id)
        .bind(nome)
        .bind(ordem)
        .fetch_one(&self.pool)
        .await?;
        Ok(categoria)
    }

    pub async fn update_category(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        nome: Option<&str>,
        ordem: Option<i32>,
    ) -> Result<Category, AppError> {
        let categoria = sqlx::query_as::<_, Category>(
            r#"
            UPDATE categories SET
                nome = COALESCE($3, nome),
                ordem = COALESCE($4, ordem)
            WHERE id = $2 AND empresa_id = $1
            RETURNING id, empresa_id, nome, ordem, created_at
            "#,
        )
        .bind(empresa_id)
        .bind(id)
        .bind(nome)
        .bind(ordem)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CategoryNotFound)?;
        Ok(categoria)
    }

    pub async fn delete_category(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM categories WHERE id = $2 AND empresa_id = $1")
            .bind(empresa_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::CategoryNotFound);
        }
        Ok(())
    }

    // --- Itens do cardápio ---

    pub async fn list_menu_items(&self, empresa_id: Uuid) -> Result<Vec<MenuItem>, AppError> {
        let itens = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_ITEM_COLS} FROM menu_items WHERE empresa_id = $1 ORDER BY nome"
        ))
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(itens)
    }

    pub async fn find_menu_item(
        &self,
        empresa_id: Uuid,
        id: Uuid,
    ) -> Result<Option<MenuItem>, AppError> {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            "SELECT {MENU_ITEM_COLS} FROM menu_items WHERE id = $2 AND empresa_id = $1"
        ))
        .bind(empresa_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(item)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn create_menu_item<'e, E>(
        &self,
        executor: E,
        empresa_id: Uuid,
        category_id: Option<Uuid>,
        nome: &str,
        descricao: Option<&str>,
        preco: rust_decimal::Decimal,
        preco_a_partir: bool,
        disponivel: bool,
        imagem_path: Option<&str>,
    ) -> Result<MenuItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            INSERT INTO menu_items
                (empresa_id, category_id, nome, descricao, preco, preco_a_partir, disponivel, imagem_path)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {MENU_ITEM_COLS}
            "#
        ))
        .bind(empresa_id)
        .bind(category_id)
        .bind(nome)
        .bind(descricao)
        .bind(preco)
        .bind(preco_a_partir)
        .bind(disponivel)
        .bind(imagem_path)
        .fetch_one(executor)
        .await?;
        Ok(item)
    }

    #[allow(clippy::too_many_arguments)]
    pub async fn update_menu_item<'e, E>(
        &self,
        executor: E,
        empresa_id: Uuid,
        id: Uuid,
        nome: Option<&str>,
        descricao: Option<&str>,
        preco: Option<rust_decimal::Decimal>,
        preco_a_partir: Option<bool>,
        disponivel: Option<bool>,
        category_id: Option<Uuid>,
        imagem_path: Option<&str>,
    ) -> Result<MenuItem, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let item = sqlx::query_as::<_, MenuItem>(&format!(
            r#"
            UPDATE menu_items SET
                nome = COALESCE($3, nome),
                descricao = COALESCE($4, descricao),
                preco = COALESCE($5, preco),
                preco_a_partir = COALESCE($6, preco_a_partir),
                disponivel = COALESCE($7, disponivel),
                category_id = COALESCE($8, category_id),
                imagem_path = COALESCE($9, imagem_path),
                updated_at = now()
            WHERE id = $2 AND empresa_id = $1
            RETURNING {MENU_ITEM_COLS}
            "#
        ))
        .bind(empresa_id)
        .bind(id)
        .bind(nome)
        .bind(descricao)
        .bind(preco)
        .bind(preco_a_partir)
        .bind(disponivel)
        .bind(category_id)
        .bind(imagem_path)
        .fetch_optional(executor)
        .await?
        .ok_or(AppError::MenuItemNotFound)?;
        Ok(item)
    }

    pub async fn delete_menu_item(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM menu_items WHERE id = $2 AND empresa_id = $1")
            .bind(empresa_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::MenuItemNotFound);
        }
        Ok(())
    }

    // Substitui a associação de grupos do item, preservando a ordem enviada.
    // Recebe a conexão da transação porque executa múltiplos comandos.
    pub async fn set_item_groups(
        &self,
        conn: &mut sqlx::PgConnection,
        menu_item_id: Uuid,
        grupos: &[Uuid],
    ) -> Result<(), AppError> {
        sqlx::query("DELETE FROM menu_item_groups WHERE menu_item_id = $1")
            .bind(menu_item_id)
            .execute(&mut *conn)
            .await?;

        for (posicao, group_id) in grupos.iter().enumerate() {
            sqlx::query(
                "INSERT INTO menu_item_groups (menu_item_id, group_id, posicao) VALUES ($1, $2, $3)",
            )
            .bind(menu_item_id)
            .bind(group_id)
            .bind(posicao as i32)
            .execute(&mut *conn)
            .await?;
        }
        Ok(())
    }

    // --- Grupos de variação e variações ---

    pub async fn list_groups(&self, empresa_id: Uuid) -> Result<Vec<VariationGroup>, AppError> {
        let grupos = sqlx::query_as::<_, VariationGroup>(
            r#"
            SELECT id, empresa_id, nome, min_escolhas, max_escolhas
            FROM variation_groups
            WHERE empresa_id = $1
            ORDER BY nome
            "#,
        )
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(grupos)
    }

    pub async fn find_group(
        &self,
        empresa_id: Uuid,
        id: Uuid,
    ) -> Result<Option<VariationGroup>, AppError> {
        let grupo = sqlx::query_as::<_, VariationGroup>(
            r#"
            SELECT id, empresa_id, nome, min_escolhas, max_escolhas
            FROM variation_groups
            WHERE id = $2 AND empresa_id = $1
            "#,
        )
        .bind(empresa_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(grupo)
    }

    pub async fn create_group(
        &self,
        empresa_id: Uuid,
        nome: &str,
        min_escolhas: i32,
        max_escolhas: i32,
    ) -> Result<VariationGroup, AppError> {
        let grupo = sqlx::query_as::<_, VariationGroup>(
            r#"
            INSERT INTO variation_groups (empresa_id, nome, min_escolhas, max_escolhas)
            VALUES ($1, $2, $3, $4)
            RETURNING id, empresa_id, nome, min_escolhas, max_escolhas
            "#,
        )
        .bind(empresa_id)
        .bind(nome)
        .bind(min_escolhas)
        .bind(max_escolhas)
        .fetch_one(&self.pool)
        .await?;
        Ok(grupo)
    }

    pub async fn delete_group(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM variation_groups WHERE id = $2 AND empresa_id = $1")
            .bind(empresa_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::VariationNotFound);
        }
        Ok(())
    }

    pub async fn find_variation(
        &self,
        empresa_id: Uuid,
        id: Uuid,
    ) -> Result<Option<Variation>, AppError> {
        let variacao = sqlx::query_as::<_, Variation>(
            r#"
            SELECT id, empresa_id, nome, preco_adicional
            FROM variations
            WHERE id = $2 AND empresa_id = $1
            "#,
        )
        .bind(empresa_id)
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(variacao)
    }

    // Cria a variação e a anexa ao grupo no fim da ordenação, na mesma
    // transação.
    pub async fn create_variation(
        &self,
        empresa_id: Uuid,
        group_id: Uuid,
        nome: &str,
        preco_adicional: rust_decimal::Decimal,
    ) -> Result<Variation, AppError> {
        let mut tx = self.pool.begin().await?;

        let variacao = sqlx::query_as::<_, Variation>(
            r#"
            INSERT INTO variations (empresa_id, nome, preco_adicional)
            VALUES ($1, $2, $3)
            RETURNING id, empresa_id, nome, preco_adicional
            "#,
        )
        .bind(empresa_id)
        .bind(nome)
        .bind(preco_adicional)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query(
            r#"
            INSERT INTO group_variations (group_id, variation_id, posicao)
            VALUES ($1, $2, COALESCE(
                (SELECT MAX(posicao) + 1 FROM group_variations WHERE group_id = $1), 0))
            "#,
        )
        .bind(group_id)
        .bind(variacao.id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;
        Ok(variacao)
    }

    pub async fn delete_variation(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM variations WHERE id = $2 AND empresa_id = $1")
            .bind(empresa_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::VariationNotFound);
        }
        Ok(())
    }

    // --- Junções para compor o cardápio ---

    pub async fn item_groups(&self, empresa_id: Uuid) -> Result<Vec<ItemGroupRow>, AppError> {
        let rows = sqlx::query_as::<_, ItemGroupRow>(
            r#"
            SELECT mig.menu_item_id, vg.id, vg.empresa_id, vg.nome, vg.min_escolhas, vg.max_escolhas
            FROM menu_item_groups mig
            JOIN variation_groups vg ON vg.id = mig.group_id
            JOIN menu_items mi ON mi.id = mig.menu_item_id
            WHERE mi.empresa_id = $1
            ORDER BY mig.menu_item_id, mig.posicao
            "#,
        )
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }

    pub async fn group_variations(
        &self,
        empresa_id: Uuid,
    ) -> Result<Vec<GroupVariationRow>, AppError> {
        let rows = sqlx::query_as::<_, GroupVariationRow>(
            r#"
            SELECT gv.group_id, v.id, v.empresa_id, v.nome, v.preco_adicional
            FROM group_variations gv
            JOIN variations v ON v.id = gv.variation_id
            WHERE v.empresa_id = $1
            ORDER BY gv.group_id, gv.posicao
            "#,
        )
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(rows)
    }
}
