// src/common/dates.rs

use chrono::{DateTime, Datelike, NaiveDate, NaiveDateTime, TimeDelta, Utc};
use chrono_tz::Tz;
use uuid::Uuid;

use crate::common::error::AppError;

const NAIVE_FORMATS: [&str; 2] = ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f"];

/// Converte o texto vindo do banco num instante UTC.
///
/// Aceita RFC 3339, timestamps sem fuso (lidos como UTC) e datas simples
/// (`YYYY-MM-DD`, meia-noite UTC).
pub fn parse_instant(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }

    for fmt in NAIVE_FORMATS {
        if let Ok(naive) = NaiveDateTime::parse_from_str(raw, fmt) {
            return Some(naive.and_utc());
        }
    }

    NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .ok()
        .and_then(|d| d.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

/// Campo obrigatório: ausente ou ilegível vira `DataIntegrity`.
pub fn required_instant(
    sale_id: Uuid,
    field: &'static str,
    raw: Option<&str>,
) -> Result<DateTime<Utc>, AppError> {
    match raw {
        Some(text) => parse_instant(text).ok_or_else(|| {
            tracing::warn!(%sale_id, field, value = text, "Data ilegível na venda");
            AppError::data_integrity(sale_id, field, Some(text))
        }),
        None => {
            tracing::warn!(%sale_id, field, "Data obrigatória ausente na venda");
            Err(AppError::data_integrity(sale_id, field, None))
        }
    }
}

/// Campo opcional: ausente é `None`, mas presente e ilegível continua sendo erro.
pub fn optional_instant(
    sale_id: Uuid,
    field: &'static str,
    raw: Option<&str>,
) -> Result<Option<DateTime<Utc>>, AppError> {
    match raw {
        Some(text) if !text.trim().is_empty() => required_instant(sale_id, field, Some(text)).map(Some),
        _ => Ok(None),
    }
}

/// (ano, mês) do instante no fuso de exibição.
pub fn local_year_month(instant: DateTime<Utc>, tz: Tz) -> (i32, u32) {
    let local = instant.with_timezone(&tz);
    (local.year(), local.month())
}

/// Mesmo ano e mesmo mês de calendário no fuso `tz` (não é janela de 30 dias).
pub fn same_month(a: DateTime<Utc>, b: DateTime<Utc>, tz: Tz) -> bool {
    local_year_month(a, tz) == local_year_month(b, tz)
}

/// Dias até `end`, arredondando para cima e nunca negativo.
pub fn days_until(end: DateTime<Utc>, now: DateTime<Utc>) -> i64 {
    let day_ms = TimeDelta::days(1).num_milliseconds();
    let diff_ms = (end - now).num_milliseconds();

    if diff_ms <= 0 {
        return 0;
    }
    (diff_ms + day_ms - 1) / day_ms
}

const MONTH_ABBR_PT: [&str; 12] = [
    "jan.", "fev.", "mar.", "abr.", "mai.", "jun.",
    "jul.", "ago.", "set.", "out.", "nov.", "dez.",
];

/// Rótulo curto em pt-PT, ex: "mar. 2024".
pub fn month_label(year: i32, month: u32) -> String {
    format!("{} {}", month_abbr(month), year)
}

pub fn month_abbr(month: u32) -> &'static str {
    MONTH_ABBR_PT
        .get(month.saturating_sub(1) as usize)
        .copied()
        .unwrap_or("?")
}
