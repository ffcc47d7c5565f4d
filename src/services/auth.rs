// src/services/auth.rs

use bcrypt::{hash, verify};
use chrono::Utc;
use jsonwebtoken::{decode, encode, DecodingKey, EncodingKey, Header, Validation};
use sqlx::PgPool;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::{EmpresaRepository, UsuarioRepository},
    models::usuario::{Claims, CreateEntregadorPayload, RegisterAdminPayload, Role, Usuario},
};

#[derive(Clone)]
pub struct AuthService {
    usuario_repo: UsuarioRepository,
    empresa_repo: EmpresaRepository,
    jwt_secret: String,
    pool: PgPool,
}

impl AuthService {
    pub fn new(
        usuario_repo: UsuarioRepository,
        empresa_repo: EmpresaRepository,
        jwt_secret: String,
        pool: PgPool,
    ) -> Self {
        Self {
            usuario_repo,
            empresa_repo,
            jwt_secret,
            pool,
        }
    }

    pub async fn register_cliente(
        &self,
        nome: &str,
        email: &str,
        senha: &str,
        telefone: Option<&str>,
    ) -> Result<String, AppError> {
        let hashed = hash_senha(senha).await?;
        let usuario = self
            .usuario_repo
            .create(
                &self.pool,
                nome,
                email,
                &hashed,
                Role::Cliente,
                None,
                telefone,
                None,
                None,
            )
            .await?;
        self.create_token(&usuario)
    }

    // Registro de administrador: valida o token de uso único, cria o
    // usuário, cria a empresa apontando para ele, vincula o usuário à
    // empresa e queima o token, tudo em UMA transação. Ou entra tudo,
    // ou não entra nada.
    pub async fn register_admin(&self, payload: &RegisterAdminPayload) -> Result<String, AppError> {
        if !self
            .usuario_repo
            .admin_token_disponivel(&payload.admin_token)
            .await?
        {
            return Err(AppError::InvalidAdminToken);
        }

        let hashed = hash_senha(&payload.senha).await?;

        let mut tx = self.pool.begin().await?;

        let usuario = self
            .usuario_repo
            .create(
                &mut *tx,
                &payload.nome,
                &payload.email,
                &hashed,
                Role::Admin,
                None,
                payload.telefone.as_deref(),
                None,
                None,
            )
            .await?;

        let empresa = self
            .empresa_repo
            .create(
                &mut *tx,
                &payload.nome_fantasia,
                &payload.slug,
                payload.logo_url.as_deref(),
                payload.telefone.as_deref(),
                usuario.id,
            )
            .await?;

        self.usuario_repo
            .set_empresa(&mut *tx, usuario.id, empresa.id)
            .await?;

        // O UPDATE condicional derruba registros concorrentes com o
        // mesmo token: o segundo não afeta linha nenhuma e aborta.
        if !self
            .usuario_repo
            .marcar_token_usado(&mut *tx, &payload.admin_token)
            .await?
        {
            return Err(AppError::InvalidAdminToken);
        }

        tx.commit().await?;

        tracing::info!("🏪 Empresa '{}' registrada (slug {})", empresa.nome_fantasia, empresa.slug);

        // O token JWT carrega o vínculo com a empresa recém-criada.
        let usuario = Usuario {
            empresa_id: Some(empresa.id),
            ..usuario
        };
        self.create_token(&usuario)
    }

    // Cadastro de entregador pelo painel: a empresa vem do admin logado.
    pub async fn register_entregador(
        &self,
        empresa_id: Uuid,
        payload: &CreateEntregadorPayload,
    ) -> Result<Usuario, AppError> {
        let hashed = hash_senha(&payload.senha).await?;
        self.usuario_repo
            .create(
                &self.pool,
                &payload.nome,
                &payload.email,
                &hashed,
                Role::Entregador,
                Some(empresa_id),
                payload.telefone.as_deref(),
                payload.placa.as_deref(),
                payload.cpf.as_deref(),
            )
            .await
    }

    pub async fn listar_entregadores(&self, empresa_id: Uuid) -> Result<Vec<Usuario>, AppError> {
        self.usuario_repo.list_entregadores(empresa_id, false).await
    }

    pub async fn atualizar_entregador(
        &self,
        empresa_id: Uuid,
        usuario_id: Uuid,
        status_entregador: Option<bool>,
        telefone: Option<&str>,
        placa: Option<&str>,
    ) -> Result<Usuario, AppError> {
        self.usuario_repo
            .update_entregador(empresa_id, usuario_id, status_entregador, telefone, placa)
            .await
    }

    pub async fn login(&self, email: &str, senha: &str) -> Result<String, AppError> {
        let usuario = self
            .usuario_repo
            .find_by_email(email)
            .await?
            .ok_or(AppError::InvalidCredentials)?;

        let senha = senha.to_owned();
        let password_hash = usuario.password_hash.clone();

        // Executa a verificação em um thread separado
        let senha_valida = tokio::task::spawn_blocking(move || verify(&senha, &password_hash))
            .await
            .map_err(|e| anyhow::anyhow!("Falha na task de verificação de senha: {}", e))??;

        if !senha_valida {
            return Err(AppError::InvalidCredentials);
        }

        self.create_token(&usuario)
    }

    pub async fn validate_token(&self, token: &str) -> Result<Usuario, AppError> {
        let validation = Validation::default();
        let token_data = decode::<Claims>(
            token,
            &DecodingKey::from_secret(self.jwt_secret.as_ref()),
            &validation,
        )
        .map_err(|_| AppError::InvalidToken)?;

        self.usuario_repo
            .find_by_id(token_data.claims.sub)
            .await?
            .ok_or(AppError::UserNotFound)
    }

    fn create_token(&self, usuario: &Usuario) -> Result<String, AppError> {
        let now = Utc::now();
        let expires_at = now + chrono::Duration::days(7);

        let claims = Claims {
            sub: usuario.id,
            role: usuario.role,
            empresa_id: usuario.empresa_id,
            exp: expires_at.timestamp() as usize,
            iat: now.timestamp() as usize,
        };

        Ok(encode(
            &Header::default(),
            &claims,
            &EncodingKey::from_secret(self.jwt_secret.as_ref()),
        )?)
    }
}

// Hashing fora do executor async, como toda operação cara de CPU.
async fn hash_senha(senha: &str) -> Result<String, AppError> {
    let senha = senha.to_owned();
    let hashed = tokio::task::spawn_blocking(move || hash(&senha, bcrypt::DEFAULT_COST))
        .await
        .map_err(|e| anyhow::anyhow!("Falha na task de hashing: {}", e))??;
    Ok(hashed)
}
