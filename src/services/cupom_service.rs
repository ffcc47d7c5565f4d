// src/services/cupom_service.rs

use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::{
    common::error::AppError,
    db::CupomRepository,
    models::cupom::{Cupom, CupomSnapshot, TipoCupom},
};

#[derive(Clone)]
pub struct CupomService {
    cupom_repo: CupomRepository,
}

impl CupomService {
    pub fn new(cupom_repo: CupomRepository) -> Self {
        Self { cupom_repo }
    }

    // Valida o código para o estabelecimento e calcula o desconto sobre o
    // subtotal atual do carrinho. O snapshot retornado é o que vai para o
    // carrinho (e depois para o pedido), desacoplado do registro vivo.
    pub async fn validar_e_calcular(
        &self,
        empresa_id: Uuid,
        codigo: &str,
        subtotal: Decimal,
    ) -> Result<(CupomSnapshot, Decimal), AppError> {
        let cupom = self
            .cupom_repo
            .find_active_by_code(empresa_id, codigo.trim())
            .await?
            .ok_or(AppError::CouponNotFound)?;

        if expirado(cupom.validade, Utc::now().date_naive()) {
            return Err(AppError::CouponExpired);
        }

        let desconto = calcular_desconto(cupom.tipo, cupom.valor, subtotal);
        let snapshot = CupomSnapshot {
            codigo: cupom.nome.clone(),
            tipo: cupom.tipo,
            valor: cupom.valor,
        };
        Ok((snapshot, desconto))
    }

    // --- CRUD do painel ---

    pub async fn listar(&self, empresa_id: Uuid) -> Result<Vec<Cupom>, AppError> {
        self.cupom_repo.list(empresa_id).await
    }

    pub async fn criar(
        &self,
        empresa_id: Uuid,
        nome: &str,
        tipo: TipoCupom,
        valor: Decimal,
        validade: NaiveDate,
        descricao: Option<&str>,
    ) -> Result<Cupom, AppError> {
        self.cupom_repo
            .create(empresa_id, nome, tipo, valor, validade, descricao)
            .await
    }

    pub async fn atualizar(
        &self,
        empresa_id: Uuid,
        id: Uuid,
        valor: Option<Decimal>,
        validade: Option<NaiveDate>,
        descricao: Option<&str>,
        ativo: Option<bool>,
    ) -> Result<Cupom, AppError> {
        self.cupom_repo
            .update(empresa_id, id, valor, validade, descricao, ativo)
            .await
    }

    pub async fn deletar(&self, empresa_id: Uuid, id: Uuid) -> Result<(), AppError> {
        self.cupom_repo.delete(empresa_id, id).await
    }
}

// Validade comparada na granularidade do dia, inclusiva até o fim do dia:
// um cupom que vence hoje ainda vale hoje.
pub fn expirado(validade: NaiveDate, hoje: NaiveDate) -> bool {
    hoje > validade
}

// Percentual: subtotal * valor/100. Fixo: valor. Em ambos os casos o
// desconto nunca excede o subtotal.
pub fn calcular_desconto(tipo: TipoCupom, valor: Decimal, subtotal: Decimal) -> Decimal {
    let bruto = match tipo {
        TipoCupom::Percentual => subtotal * valor / Decimal::from(100),
        TipoCupom::Fixo => valor,
    };
    bruto.min(subtotal)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dec(s: &str) -> Decimal {
        Decimal::from_str_exact(s).unwrap()
    }

    #[test]
    fn percentual_sobre_o_subtotal() {
        // 50% de 40.00 = 20.00
        assert_eq!(
            calcular_desconto(TipoCupom::Percentual, dec("50"), dec("40.00")),
            dec("20.00")
        );
        // 10% de 55.50 = 5.55
        assert_eq!(
            calcular_desconto(TipoCupom::Percentual, dec("10"), dec("55.50")),
            dec("5.550")
        );
    }

    #[test]
    fn fixo_e_clamp_no_subtotal() {
        assert_eq!(
            calcular_desconto(TipoCupom::Fixo, dec("5.00"), dec("40.00")),
            dec("5.00")
        );
        // desconto maior que o subtotal é limitado a ele
        assert_eq!(
            calcular_desconto(TipoCupom::Fixo, dec("100.00"), dec("40.00")),
            dec("40.00")
        );
    }

    #[test]
    fn percentual_acima_de_cem_tambem_clampa() {
        assert_eq!(
            calcular_desconto(TipoCupom::Percentual, dec("150"), dec("40.00")),
            dec("40.00")
        );
    }

    #[test]
    fn validade_inclusiva_no_proprio_dia() {
        let dia = NaiveDate::from_ymd_opt(2024, 6, 15).unwrap();
        assert!(!expirado(dia, dia));
        assert!(!expirado(dia, dia.pred_opt().unwrap()));
        assert!(expirado(dia, dia.succ_opt().unwrap()));
    }
}
