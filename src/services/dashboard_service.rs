// src/services/dashboard_service.rs

use chrono::{DateTime, Utc};

use crate::{
    common::error::AppError,
    models::{dashboard::DashboardView, sale::SaleRecord},
    services::{
        loyalty_service::{self, LoyaltyService},
        metrics_service::MetricsService,
    },
};

#[derive(Clone)]
pub struct DashboardService {
    metrics: MetricsService,
    loyalty: LoyaltyService,
    alert_preview_limit: usize,
}

impl DashboardService {
    pub fn new(metrics: MetricsService, loyalty: LoyaltyService, alert_preview_limit: usize) -> Self {
        Self { metrics, loyalty, alert_preview_limit }
    }

    // Cards, gráficos e os primeiros alertas, todos com o mesmo `now`
    pub fn build(&self, sales: &[SaleRecord], now: DateTime<Utc>) -> Result<DashboardView, AppError> {
        let metrics = self.metrics.snapshot(sales, now)?;
        let alerts = self.loyalty.detect_alerts(sales, now)?;

        Ok(DashboardView {
            metrics,
            alert_count: alerts.len(),
            alerts: loyalty_service::take(&alerts, self.alert_preview_limit).to_vec(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sale::{SaleCategory, SaleStatus};
    use chrono::{TimeDelta, TimeZone};
    use uuid::Uuid;

    #[test]
    fn preview_is_capped_but_count_is_complete() {
        let now = Utc.with_ymd_and_hms(2025, 1, 15, 9, 0, 0).unwrap();
        let sales: Vec<SaleRecord> = (0..8)
            .map(|i| {
                let mut sale = SaleRecord::new(
                    Uuid::new_v4(),
                    &format!("Cliente {i}"),
                    SaleCategory::Telecomunicacoes,
                    SaleStatus::Ativo,
                    "2023-06-01T10:00:00Z",
                );
                sale.active_date = Some((now - TimeDelta::days(365)).to_rfc3339());
                sale
            })
            .collect();

        let service = DashboardService::new(MetricsService::new(6, chrono_tz::Tz::Europe__Lisbon), LoyaltyService::new(11, 210), 5);
        let view = service.build(&sales, now).unwrap();

        assert_eq!(view.alert_count, 8);
        assert_eq!(view.alerts.len(), 5);
        assert_eq!(view.metrics.total_sales, 8);
        assert_eq!(view.metrics.by_category.telecomunicacoes, 8);
    }
}
