// src/db/cupom_repo.rs

use chrono::NaiveDate;
use rust_decimal::Decimal;
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::cupom::{Cupom, TipoCupom},
};

const CUPOM_COLS: &str = "id, empresa_id, nome, tipo, valor, validade, descricao, ativo, created_at";

#[derive(Clone)]
pub struct CupomRepository {
    pool: PgPool,
}

impl CupomRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    // Só enxerga cupons ativos: um cupom desativado se comporta como
    // inexistente para o storefront.
    pub async fn find_active_by_code(
        &self,
        empresa_id: Uuid,
        codigo: &str,
    ) -> Result<Option<Cupom>, AppError> {
        let cupom = sqlx::query_as::<_, Cupom>(&format!(
            r#"
            SELECT {CUPOM_COLS} FROM cupons
            WHERE empresa_id = $1 AND nome = upper($2) AND ativo = TRUE
            "#
        ))
        .bind(empresa_id)
        .bind(codigo)
        .fetch_optional(&self.pool)
        .await?;
        Ok(cupom)
    }

    pub async fn list(&self, empresa_id: Uuid) -> Result<Vec<Cupom>, AppError> {
        let cupons = sqlx::query_as::<_, Cupom>(&format!(
            "SELECT {CUPOM_COLS} FROM cupons WHERE empresa_id = $1 ORDER BY created_at DESC"
        ))
        .bind(empresa_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(cupons)
    }

    pub async fn create(
        &self,
        empresa_id: Uuid,
        nome: &str,
        tipo: TipoCupom,
        valor: Decimal,
        validade: NaiveDate,
        descricao: Option<&str>,
    ) -> Result<Cupom, AppError> {
        sqlx::query_as::<_, Cupom>(&format!(
            r#"
            INSERT INTO cupons (empresa_id, nome, tipo, valor, validade, descricao)
            VALUES ($1, upper($2), $3, $4, $5, $6)
            RETURNING {CUPOM_COLS}
            "#
        ))
        .bind(empresa_id)
        .bind(nome)
        .bind(tipo)
        .bind(valor)
        .bind(validade)
        .bind(descricao)
        .fetch_one(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::UniqueConstraintViolation("cupom".to_string());
                }
            }
            e.into()
        })
    }

    pub async fn update(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        valor: Option<Decimal>,
        validade: Option<NaiveDate>,
        descricao: Option<&str>,
        ativo: Option<bool>,
    ) -> Result<Cupom, AppError> {
        let cupom = sqlx::query_as::<_, Cupom>(&format!(
            r#"
            UPDATE cupons SET
                valor = COALESCE($3, valor),
                validade = COALESCE($4, validade),
                descricao = COALESCE($5, descricao),
                ativo = COALESCE($6, ativo)
            WHERE id = $2 AND empresa_id = $1
            RETURNING {CUPOM_COLS}
            "#
        ))
        .bind(empresa_id)
        .bind(id)
        .bind(valor)
        .bind(validade)
        .bind(descricao)
        .bind(ativo)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::CouponNotFound)?;
        Ok(cupom)
    }

    pub async fn delete(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        let result = sqlx::query("DELETE FROM cupons WHERE id = $2 AND empresa_id = $1")
            .bind(empresa_id)
            .bind(id)
            .execute(&self.pool)
            .await?;
        if result.rows_affected() == 0 {
            return Err(AppError::CouponNotFound);
        }
        Ok(())
    }
}
