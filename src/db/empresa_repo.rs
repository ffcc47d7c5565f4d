// src/db/empresa_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{common::error::AppError, models::empresa::Empresa};

// O repositório de estabelecimentos. A resolução por slug é a porta de
// entrada de toda rota de storefront e de painel.
#[derive(Clone)]
pub struct EmpresaRepository {
    pool: PgPool,
}

impl EmpresaRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_slug(&self, slug: &str) -> Result<Option<Empresa>, AppError> {
        let maybe_empresa = sqlx::query_as::<_, Empresa>(
            r#"
            SELECT id, nome_fantasia, slug, logo_url, telefone, admin_id, created_at, updated_at
            FROM empresas
            WHERE slug = $1
            "#,
        )
        .bind(slug)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_empresa)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Empresa>, AppError> {
        let maybe_empresa = sqlx::query_as::<_, Empresa>(
            r#"
            SELECT id, nome_fantasia, slug, logo_url, telefone, admin_id, created_at, updated_at
            FROM empresas
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_empresa)
    }

    // Aceita um executor para participar da transação de registro
    // (usuário + empresa + queima do token em um único commit).
    pub async fn create<'e, E>(
        &self,
        executor: E,
        nome_fantasia: &str,
        slug: &str,
        logo_url: Option<&str>,
        telefone: Option<&str>,
        admin_id: Uuid,
    ) -> Result<Empresa, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Empresa>(
            r#"
            INSERT INTO empresas (nome_fantasia, slug, logo_url, telefone, admin_id)
            VALUES ($1, $2, $3, $4, $5)
            RETURNING id, nome_fantasia, slug, logo_url, telefone, admin_id, created_at, updated_at
            "#,
        )
        .bind(nome_fantasia)
        .bind(slug)
        .bind(logo_url)
        .bind(telefone)
        .bind(admin_id)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::SlugAlreadyExists;
                }
            }
            e.into()
        })
    }

    // Apenas campos de marca; o restante do registro é imutável.
    pub async fn update_branding(
        &self,
        id: Uuid,
        nome_fantasia: Option<&str>,
        logo_url: Option<&str>,
        telefone: Option<&str>,
    ) -> Result<Empresa, AppError> {
        let empresa = sqlx::query_as::<_, Empresa>(
            r#"
            UPDATE empresas SET
                nome_fantasia = COALESCE($2, nome_fantasia),
                logo_url = COALESCE($3, logo_url),
                telefone = COALESCE($4, telefone),
                updated_at = now()
            WHERE id = $1
            RETURNING id, nome_fantasia, slug, logo_url, telefone, admin_id, created_at, updated_at
            "#,
        )
        .bind(id)
        .bind(nome_fantasia)
        .bind(logo_url)
        .bind(telefone)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CompanyNotFound)?;
        Ok(empresa)
    }
}
