// src/db/usuario_repo.rs

use sqlx::{Executor, PgPool, Postgres};
use uuid::Uuid;

use crate::{
    common::error::AppError,
    models::usuario::{Role, Usuario},
};

const USUARIO_COLS: &str = "id, nome, email, password_hash, role, empresa_id, telefone, placa, cpf, status_entregador, created_at, updated_at";

// O repositório de identidades: clientes, administradores e entregadores.
#[derive(Clone)]
pub struct UsuarioRepository {
    pool: PgPool,
}

impl UsuarioRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub async fn find_by_email(&self, email: &str) -> Result<Option<Usuario>, AppError> {
        let maybe_usuario = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {USUARIO_COLS} FROM usuarios WHERE email = $1"
        ))
        .bind(email)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_usuario)
    }

    pub async fn find_by_id(&self, id: Uuid) -> Result<Option<Usuario>, AppError> {
        let maybe_usuario = sqlx::query_as::<_, Usuario>(&format!(
            "SELECT {USUARIO_COLS} FROM usuarios WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(maybe_usuario)
    }

    // Cria um usuário; aceita executor para participar de transações.
    #[allow(clippy::too_many_arguments)]
    pub async fn create<'e, E>(
        &self,
        executor: E,
        nome: &str,
        email: &str,
        password_hash: &str,
        role: Role,
        empresa_id: Option<Uuid>,
        telefone: Option<&str>,
        placa: Option<&str>,
        cpf: Option<&str>,
    ) -> Result<Usuario, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query_as::<_, Usuario>(&format!(
            r#"
            INSERT INTO usuarios (nome, email, password_hash, role, empresa_id, telefone, placa, cpf)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            RETURNING {USUARIO_COLS}
            "#
        ))
        .bind(nome)
        .bind(email)
        .bind(password_hash)
        .bind(role)
        .bind(empresa_id)
        .bind(telefone)
        .bind(placa)
        .bind(cpf)
        .fetch_one(executor)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_unique_violation() {
                    return AppError::EmailAlreadyExists;
                }
            }
            e.into()
        })
    }

    // Vincula o admin recém-criado à sua empresa, dentro da transação
    // de registro.
    pub async fn set_empresa<'e, E>(
        &self,
        executor: E,
        usuario_id: Uuid,
        empresa_id: Uuid,
    ) -> Result<(), AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        sqlx::query("UPDATE usuarios SET empresa_id = $2, updated_at = now() WHERE id = $1")
            .bind(usuario_id)
            .bind(empresa_id)
            .execute(executor)
            .await?;
        Ok(())
    }

    // Entregadores do estabelecimento; `apenas_ativos` filtra pelo flag
    // de disponibilidade usado na seleção de entrega.
    pub async fn list_entregadores(
        &self,
        empresa_id: Uuid,
        apenas_ativos: bool,
    ) -> Result<Vec<Usuario>, AppError> {
        let entregadores = sqlx::query_as::<_, Usuario>(&format!(
            r#"
            SELECT {USUARIO_COLS} FROM usuarios
            WHERE empresa_id = $1
              AND role = 'entregador'
              AND ($2 = FALSE OR status_entregador = TRUE)
            ORDER BY nome
            "#
        ))
        .bind(empresa_id)
        .bind(apenas_ativos)
        .fetch_all(&self.pool)
        .await?;
        Ok(entregadores)
    }

    pub async fn update_entregador(
        &self,
        empresa_id: Uuid,
        usuario_id: Uuid,
        status_entregador: Option<bool>,
        telefone: Option<&str>,
        placa: Option<&str>,
    ) -> Result<Usuario, AppError> {
        let usuario = sqlx::query_as::<_, Usuario>(&format!(
            r#"
            UPDATE usuarios SET
                status_entregador = COALESCE($3, status_entregador),
                telefone = COALESCE($4, telefone),
                placa = COALESCE($5, placa),
                updated_at = now()
            WHERE id = $2 AND empresa_id = $1 AND role = 'entregador'
            RETURNING {USUARIO_COLS}
            "#
        ))
        .bind(empresa_id)
        .bind(usuario_id)
        .bind(status_entregador)
        .bind(telefone)
        .bind(placa)
        .fetch_optional(&self.pool)
        .await?
        .ok_or(AppError::UserNotFound)?;
        Ok(usuario)
    }

    // --- Tokens de registro de administrador ---

    // Retorna true quando o token existe e ainda não foi usado.
    pub async fn admin_token_disponivel(&self, token: &str) -> Result<bool, AppError> {
        let row: Option<(bool,)> =
            sqlx::query_as("SELECT used FROM admin_tokens WHERE token = $1")
                .bind(token)
                .fetch_optional(&self.pool)
                .await?;
        Ok(matches!(row, Some((false,))))
    }

    // Queima o token dentro da transação de registro. O UPDATE condicional
    // garante que dois registros concorrentes não usem o mesmo token.
    pub async fn marcar_token_usado<'e, E>(
        &self,
        executor: E,
        token: &str,
    ) -> Result<bool, AppError>
    where
        E: Executor<'e, Database = Postgres>,
    {
        let result = sqlx::query(
            "UPDATE admin_tokens SET used = TRUE WHERE token = $1 AND used = FALSE",
        )
        .bind(token)
        .execute(executor)
        .await?;
        Ok(result.rows_affected() == 1)
    }
}
