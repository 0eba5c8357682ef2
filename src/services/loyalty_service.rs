// src/services/loyalty_service.rs

use chrono::{DateTime, TimeDelta, Utc};

use crate::{
    common::{
        dates::{days_until, optional_instant, required_instant},
        error::AppError,
    },
    models::{loyalty::LoyaltyAlert, sale::SaleRecord},
};

// "Mês" de fidelização: aproximação de 30 dias, mantida de propósito.
const DAYS_PER_MONTH: i64 = 30;

#[derive(Clone)]
pub struct LoyaltyService {
    alert_months: i64,
    banner_days: i64,
}

impl LoyaltyService {
    pub fn new(alert_months: u32, banner_days: u32) -> Self {
        Self {
            alert_months: i64::from(alert_months),
            banner_days: i64::from(banner_days),
        }
    }

    /// Varre as vendas e devolve os alertas na ordem da varredura.
    ///
    /// Uma venda entra se estiver ativa há `alert_months` meses de 30 dias
    /// e não tiver sido renovada (refid posterior do mesmo cliente).
    pub fn detect_alerts(
        &self,
        sales: &[SaleRecord],
        now: DateTime<Utc>,
    ) -> Result<Vec<LoyaltyAlert>, AppError> {
        // Datas de criação lidas uma vez só; a checagem de renovação é O(n²)
        let created: Vec<DateTime<Utc>> = sales
            .iter()
            .map(|s| required_instant(s.id, "created_at", s.created_at.as_deref()))
            .collect::<Result<_, _>>()?;

        let mut alerts = Vec::new();

        for (idx, sale) in sales.iter().enumerate() {
            if !self.is_due_for_renewal(sale, now)? {
                continue;
            }
            if was_renewed(sales, &created, idx) {
                tracing::debug!(sale_id = %sale.id, "Venda já renovada por refid, sem alerta");
                continue;
            }
            alerts.push(build_alert(sale, now)?);
        }

        tracing::debug!(total = alerts.len(), "Alertas de fidelização detectados");
        Ok(alerts)
    }

    /// Predicado da lista: ativa, com data de ativação, e há tempo suficiente.
    pub fn is_due_for_renewal(&self, sale: &SaleRecord, now: DateTime<Utc>) -> Result<bool, AppError> {
        if !sale.is_active() {
            return Ok(false);
        }
        let Some(active_date) = optional_instant(sale.id, "active_date", sale.active_date.as_deref())? else {
            return Ok(false);
        };

        Ok(now - active_date >= TimeDelta::days(self.alert_months * DAYS_PER_MONTH))
    }

    /// Predicado do banner na página da venda: faltam `banner_days` dias ou menos.
    ///
    /// Independente de `is_due_for_renewal`; sem data de fim não há banner.
    pub fn shows_loyalty_banner(&self, sale: &SaleRecord, now: DateTime<Utc>) -> Result<bool, AppError> {
        if !sale.is_active() {
            return Ok(false);
        }
        Ok(days_until_end(sale, now)?.is_some_and(|days| days <= self.banner_days))
    }
}

/// Dias até o fim da fidelização (arredonda para cima, mínimo 0).
pub fn days_until_end(sale: &SaleRecord, now: DateTime<Utc>) -> Result<Option<i64>, AppError> {
    let end = optional_instant(sale.id, "loyalty_end_date", sale.loyalty_end_date.as_deref())?;
    Ok(end.map(|end| days_until(end, now)))
}

/// Recorte de exibição (o dashboard mostra só os primeiros).
pub fn take(alerts: &[LoyaltyAlert], n: usize) -> &[LoyaltyAlert] {
    &alerts[..alerts.len().min(n)]
}

fn was_renewed(sales: &[SaleRecord], created: &[DateTime<Utc>], idx: usize) -> bool {
    let candidate = &sales[idx];

    sales.iter().zip(created).any(|(other, other_created)| {
        other.id != candidate.id
            && other.is_refid()
            && other.same_client_as(candidate)
            && *other_created > created[idx]
    })
}

fn build_alert(sale: &SaleRecord, now: DateTime<Utc>) -> Result<LoyaltyAlert, AppError> {
    let loyalty_end_date = optional_instant(sale.id, "loyalty_end_date", sale.loyalty_end_date.as_deref())?;

    Ok(LoyaltyAlert {
        sale_id: sale.id,
        client_name: sale.client_name.clone(),
        partner_name: sale.partner_name.clone(),
        category: sale.category,
        days_until_end: loyalty_end_date.map(|end| days_until(end, now)),
        loyalty_end_date,
    })
}
