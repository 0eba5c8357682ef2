// src/services/metrics_service.rs

use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use rust_decimal::Decimal;

use crate::{
    common::{
        dates::{self, local_year_month, month_label, required_instant},
        error::AppError,
    },
    models::{
        dashboard::{
            CategoryBreakdown, MetricsSnapshot, MonthlyBucket, PeriodComparison, StatusBreakdown,
            YearOverYearPoint,
        },
        sale::{SaleCategory, SaleRecord, SaleStatus},
    },
};

#[derive(Clone)]
pub struct MetricsService {
    monthly_window: usize,
    // Fuso em que "mês" e "ano" são lidos (o do utilizador, não o do servidor)
    timezone: Tz,
}

impl MetricsService {
    pub fn new(monthly_window: usize, timezone: Tz) -> Self {
        Self { monthly_window, timezone }
    }

    /// Monta o snapshot completo do dashboard.
    ///
    /// `now` é lido uma única vez pelo chamador; todas as comparações de
    /// período usam esse mesmo valor. Uma `created_at` ausente ou ilegível
    /// aborta o cálculo inteiro.
    pub fn snapshot(
        &self,
        sales: &[SaleRecord],
        now: DateTime<Utc>,
    ) -> Result<MetricsSnapshot, AppError> {
        let tz = self.timezone;
        let dated = with_created_at(sales)?;
        let (year, month) = local_year_month(now, tz);

        let this_month: Vec<&SaleRecord> = dated
            .iter()
            .filter(|(_, created)| dates::same_month(*created, now, tz))
            .map(|(sale, _)| *sale)
            .collect();

        let same_month_last_year: Vec<&SaleRecord> = dated
            .iter()
            .filter(|(_, created)| local_year_month(*created, tz) == (year - 1, month))
            .map(|(sale, _)| *sale)
            .collect();

        let created_year = |created: &DateTime<Utc>| local_year_month(*created, tz).0;
        let this_year = dated.iter().filter(|(_, c)| created_year(c) == year).count();
        let last_year = dated.iter().filter(|(_, c)| created_year(c) == year - 1).count();

        let revenue_this_month = sum_contract_value(this_month.iter().copied());
        let revenue_same_month_last_year = sum_contract_value(same_month_last_year.iter().copied());

        let snapshot = MetricsSnapshot {
            total_sales: sales.len() as u64,
            active_sales: count_status(sales, SaleStatus::Ativo),
            pending_sales: count_status(sales, SaleStatus::Pendente),
            sales_this_month: this_month.len() as u64,

            total_value: sum_contract_value(sales),
            revenue_this_month,

            total_commission: sum_commission(sales),
            comissoes_previstas: sum_commission(sales.iter().filter(|s| s.status == SaleStatus::Pendente)),
            comissoes_ativas: sum_commission(sales.iter().filter(|s| s.is_active())),
            total_mensalidades: total_mensalidades(sales),

            by_category: breakdown_by_category(sales),
            by_status: breakdown_by_status(sales),

            monthly: bucket_dated(&dated, Some(self.monthly_window), tz),
            year_over_year: year_over_year_dated(&dated, year, tz),

            month_vs_last_year: compare(
                Decimal::from(this_month.len() as u64),
                Decimal::from(same_month_last_year.len() as u64),
            ),
            year_vs_last_year: compare(
                Decimal::from(this_year as u64),
                Decimal::from(last_year as u64),
            ),
            revenue_vs_last_year: compare(revenue_this_month, revenue_same_month_last_year),
        };

        tracing::debug!(
            total = snapshot.total_sales,
            this_month = snapshot.sales_this_month,
            buckets = snapshot.monthly.len(),
            "Snapshot de métricas calculado"
        );

        Ok(snapshot)
    }
}

// --- Agregações puras ---

/// Variação percentual. Com `previous == 0` não dividimos:
/// 100 se houve algo agora, 0 caso contrário.
///
/// Se o resultado não cabe num `Decimal` (valor enorme sobre uma base
/// minúscula), satura em `Decimal::MAX`/`Decimal::MIN` conforme o sinal.
pub fn percentage_change(current: Decimal, previous: Decimal) -> Decimal {
    if previous.is_zero() {
        return if current > Decimal::ZERO {
            Decimal::ONE_HUNDRED
        } else {
            Decimal::ZERO
        };
    }

    let change = current
        .checked_sub(previous)
        .and_then(|delta| delta.checked_div(previous))
        .and_then(|ratio| ratio.checked_mul(Decimal::ONE_HUNDRED));

    change.unwrap_or_else(|| {
        let rising = (current > previous) == (previous > Decimal::ZERO);
        tracing::warn!(%current, %previous, "Variação percentual fora do intervalo do Decimal");
        if rising { Decimal::MAX } else { Decimal::MIN }
    })
}

fn compare(current: Decimal, previous: Decimal) -> PeriodComparison {
    PeriodComparison {
        current,
        previous,
        change: percentage_change(current, previous),
    }
}

/// Agrupa por (ano, mês) de `created_at` no fuso `tz`, em ordem cronológica.
///
/// Só emite meses que têm pelo menos uma venda. Com `window`, corta para os
/// N meses mais recentes depois de ordenar.
pub fn monthly_buckets(
    sales: &[SaleRecord],
    window: Option<usize>,
    tz: Tz,
) -> Result<Vec<MonthlyBucket>, AppError> {
    let dated = with_created_at(sales)?;
    Ok(bucket_dated(&dated, window, tz))
}

/// Série de 12 pontos: contagem por mês no ano `year` e no ano anterior.
pub fn year_over_year(
    sales: &[SaleRecord],
    year: i32,
    tz: Tz,
) -> Result<Vec<YearOverYearPoint>, AppError> {
    let dated = with_created_at(sales)?;
    Ok(year_over_year_dated(&dated, year, tz))
}

pub fn breakdown_by_category<'a, I>(sales: I) -> CategoryBreakdown
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut breakdown = CategoryBreakdown::default();
    for sale in sales {
        breakdown.add(sale.category);
    }
    breakdown
}

pub fn breakdown_by_status<'a, I>(sales: I) -> StatusBreakdown
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    let mut breakdown = StatusBreakdown::default();
    for sale in sales {
        breakdown.add(sale.status);
    }
    breakdown
}

pub fn sum_commission<'a, I>(sales: I) -> Decimal
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    sales.into_iter().map(SaleRecord::commission_or_zero).sum()
}

pub fn sum_contract_value<'a, I>(sales: I) -> Decimal
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    sales.into_iter().map(SaleRecord::contract_value_or_zero).sum()
}

/// Mensalidades telecom: valor de contrato só de telecom com estado ativo.
pub fn total_mensalidades<'a, I>(sales: I) -> Decimal
where
    I: IntoIterator<Item = &'a SaleRecord>,
{
    sum_contract_value(
        sales
            .into_iter()
            .filter(|s| s.category == SaleCategory::Telecomunicacoes && s.is_active()),
    )
}

fn count_status(sales: &[SaleRecord], status: SaleStatus) -> u64 {
    sales.iter().filter(|s| s.status == status).count() as u64
}

// --- Helpers internos ---

fn with_created_at(sales: &[SaleRecord]) -> Result<Vec<(&SaleRecord, DateTime<Utc>)>, AppError> {
    sales
        .iter()
        .map(|sale| {
            required_instant(sale.id, "created_at", sale.created_at.as_deref())
                .map(|created| (sale, created))
        })
        .collect()
}

fn bucket_dated(
    dated: &[(&SaleRecord, DateTime<Utc>)],
    window: Option<usize>,
    tz: Tz,
) -> Vec<MonthlyBucket> {
    // BTreeMap já ordena (ano, mês) cronologicamente
    let mut buckets: BTreeMap<(i32, u32), MonthlyBucket> = BTreeMap::new();

    for (sale, created) in dated {
        let key = local_year_month(*created, tz);
        let bucket = buckets.entry(key).or_insert_with(|| MonthlyBucket {
            year: key.0,
            month: key.1,
            label: month_label(key.0, key.1),
            vendas: 0,
            valor: Decimal::ZERO,
            comissao: Decimal::ZERO,
        });
        bucket.vendas += 1;
        bucket.valor += sale.contract_value_or_zero();
        bucket.comissao += sale.commission_or_zero();
    }

    let mut ordered: Vec<MonthlyBucket> = buckets.into_values().collect();

    if let Some(n) = window {
        let skip = ordered.len().saturating_sub(n);
        ordered.drain(..skip);
    }
    ordered
}

fn year_over_year_dated(
    dated: &[(&SaleRecord, DateTime<Utc>)],
    year: i32,
    tz: Tz,
) -> Vec<YearOverYearPoint> {
    let mut current = [0u64; 12];
    let mut previous = [0u64; 12];

    for (_, created) in dated {
        let (created_year, created_month) = local_year_month(*created, tz);
        let idx = created_month as usize - 1;
        if created_year == year {
            current[idx] += 1;
        } else if created_year == year - 1 {
            previous[idx] += 1;
        }
    }

    (0..12)
        .map(|idx| YearOverYearPoint {
            month: idx as u32 + 1,
            label: dates::month_abbr(idx as u32 + 1).to_owned(),
            ano_corrente: current[idx],
            ano_anterior: previous[idx],
        })
        .collect()
}
