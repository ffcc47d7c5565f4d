// src/middleware/empresa.rs

use std::collections::HashMap;

use axum::{
    extract::{FromRequestParts, Path},
    http::request::Parts,
};

use crate::{
    common::error::AppError,
    config::AppState,
    models::{empresa::Empresa, usuario::{Role, Usuario}},
};

// O extrator de tenant: resolve o segmento {slug} da rota para o registro
// da empresa. Toda leitura e escrita de catálogo, cupom e pedido dali em
// diante é escopada pelo id resolvido. O resultado fica nos extensions
// para que outros extratores da mesma requisição não repitam a consulta.
#[derive(Debug, Clone)]
pub struct EmpresaContext(pub Empresa);

impl FromRequestParts<AppState> for EmpresaContext {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<EmpresaContext>() {
            return Ok(ctx.clone());
        }

        let Path(params): Path<HashMap<String, String>> =
            Path::from_request_parts(parts, state)
                .await
                .map_err(|_| AppError::CompanyNotFound)?;
        let slug = params.get("slug").ok_or(AppError::CompanyNotFound)?;

        let empresa = state
            .empresa_repo
            .find_by_slug(slug)
            .await?
            .ok_or(AppError::CompanyNotFound)?;

        let ctx = EmpresaContext(empresa);
        parts.extensions.insert(ctx.clone());
        Ok(ctx)
    }
}

// Guardião das rotas de painel: exige papel de admin E que o usuário seja
// o admin registrado da empresa resolvida pelo slug.
pub struct AdminDaEmpresa {
    pub usuario: Usuario,
    pub empresa: Empresa,
}

impl FromRequestParts<AppState> for AdminDaEmpresa {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let usuario = parts
            .extensions
            .get::<Usuario>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;
        let EmpresaContext(empresa) = EmpresaContext::from_request_parts(parts, state).await?;

        if usuario.role != Role::Admin || empresa.admin_id != usuario.id {
            return Err(AppError::Forbidden);
        }

        Ok(AdminDaEmpresa { usuario, empresa })
    }
}

// Guardião da visão do entregador: papel de entregador vinculado à
// empresa da rota.
pub struct EntregadorDaEmpresa {
    pub usuario: Usuario,
    pub empresa: Empresa,
}

impl FromRequestParts<AppState> for EntregadorDaEmpresa {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let usuario = parts
            .extensions
            .get::<Usuario>()
            .cloned()
            .ok_or(AppError::InvalidToken)?;
        let EmpresaContext(empresa) = EmpresaContext::from_request_parts(parts, state).await?;

        if usuario.role != Role::Entregador || usuario.empresa_id != Some(empresa.id) {
            return Err(AppError::Forbidden);
        }

        Ok(EntregadorDaEmpresa { usuario, empresa })
    }
}
