// src/services/report_service.rs

use validator::Validate;

use crate::{
    common::{dates::required_instant, error::AppError},
    models::{
        report::{ReportFilter, SalesReport},
        sale::SaleRecord,
    },
    services::metrics_service::{
        breakdown_by_category, breakdown_by_status, sum_commission, sum_contract_value,
    },
};

#[derive(Clone, Default)]
pub struct ReportService;

impl ReportService {
    pub fn new() -> Self {
        Self
    }

    /// Relatório filtrado: todos os critérios presentes têm de bater.
    pub fn generate(
        &self,
        sales: &[SaleRecord],
        filter: &ReportFilter,
    ) -> Result<SalesReport, AppError> {
        filter.validate().map_err(AppError::InvalidFilter)?;

        let mut selected = Vec::new();
        for sale in sales {
            if self.matches(sale, filter)? {
                selected.push(sale.clone());
            }
        }

        tracing::debug!(
            total = sales.len(),
            selected = selected.len(),
            "Relatório de vendas gerado"
        );

        Ok(SalesReport {
            total_sales: selected.len() as u64,
            total_value: sum_contract_value(&selected),
            total_commission: sum_commission(&selected),
            by_category: breakdown_by_category(&selected),
            by_status: breakdown_by_status(&selected),
            sales: selected,
        })
    }

    /// Busca livre da lista de vendas (nome, e-mail, telefone).
    pub fn search<'a>(&self, sales: &'a [SaleRecord], term: &str) -> Vec<&'a SaleRecord> {
        if term.is_empty() {
            return sales.iter().collect();
        }
        let needle = term.to_lowercase();

        sales
            .iter()
            .filter(|sale| {
                sale.client_name.to_lowercase().contains(&needle)
                    || sale
                        .client_email
                        .as_deref()
                        .is_some_and(|email| email.to_lowercase().contains(&needle))
                    // Telefone sem lowercase: dígitos e '+' apenas
                    || sale
                        .client_phone
                        .as_deref()
                        .is_some_and(|phone| phone.contains(term))
            })
            .collect()
    }

    fn matches(&self, sale: &SaleRecord, filter: &ReportFilter) -> Result<bool, AppError> {
        if filter.category.is_some_and(|c| c != sale.category) {
            return Ok(false);
        }
        if filter.status.is_some_and(|s| s != sale.status) {
            return Ok(false);
        }
        if filter.seller_id.is_some() && filter.seller_id != sale.seller_id {
            return Ok(false);
        }
        if filter.partner_id.is_some() && filter.partner_id != sale.partner_id {
            return Ok(false);
        }

        if filter.has_date_range() {
            let created = required_instant(sale.id, "created_at", sale.created_at.as_deref())?;
            if filter.start_date.is_some_and(|start| created < start) {
                return Ok(false);
            }
            if filter.end_date.is_some_and(|end| created > end) {
                return Ok(false);
            }
        }

        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::sale::{SaleCategory, SaleStatus};
    use chrono::{TimeZone, Utc};
    use rust_decimal::Decimal;
    use uuid::Uuid;

    fn sale(category: SaleCategory, status: SaleStatus, created_at: &str, value: i64) -> SaleRecord {
        let mut sale = SaleRecord::new(Uuid::new_v4(), "Cliente", category, status, created_at);
        sale.contract_value = Some(Decimal::from(value));
        sale.commission = Some(Decimal::from(value / 10));
        sale
    }

    fn fixture() -> Vec<SaleRecord> {
        vec![
            sale(SaleCategory::Energia, SaleStatus::Ativo, "2024-01-10", 100),
            sale(SaleCategory::Telecomunicacoes, SaleStatus::Ativo, "2024-02-10", 200),
            sale(SaleCategory::Telecomunicacoes, SaleStatus::Pendente, "2024-03-10", 300),
            sale(SaleCategory::PaineisSolares, SaleStatus::Perdido, "2024-04-10", 400),
        ]
    }

    #[test]
    fn empty_filter_keeps_everything() {
        let report = ReportService::new().generate(&fixture(), &ReportFilter::default()).unwrap();

        assert_eq!(report.total_sales, 4);
        assert_eq!(report.total_value, Decimal::from(1000));
        assert_eq!(report.total_commission, Decimal::from(100));
        assert_eq!(report.by_category.telecomunicacoes, 2);
        assert_eq!(report.by_status.ativo, 2);
    }

    #[test]
    fn filters_combine() {
        let filter = ReportFilter {
            category: Some(SaleCategory::Telecomunicacoes),
            start_date: Some(Utc.with_ymd_and_hms(2024, 3, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };

        let report = ReportService::new().generate(&fixture(), &filter).unwrap();

        assert_eq!(report.total_sales, 1);
        assert_eq!(report.sales[0].status, SaleStatus::Pendente);
    }

    #[test]
    fn date_bounds_are_inclusive() {
        let filter = ReportFilter {
            start_date: Some(Utc.with_ymd_and_hms(2024, 2, 10, 0, 0, 0).unwrap()),
            end_date: Some(Utc.with_ymd_and_hms(2024, 3, 10, 0, 0, 0).unwrap()),
            ..Default::default()
        };

        let report = ReportService::new().generate(&fixture(), &filter).unwrap();
        assert_eq!(report.total_sales, 2);
    }

    #[test]
    fn inverted_range_is_rejected() {
        let filter = ReportFilter {
            start_date: Some(Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap()),
            end_date: Some(Utc.with_ymd_and_hms(2024, 1, 1, 0, 0, 0).unwrap()),
            ..Default::default()
        };

        assert!(matches!(
            ReportService::new().generate(&fixture(), &filter),
            Err(AppError::InvalidFilter(_))
        ));
    }

    #[test]
    fn seller_and_partner_filters() {
        let seller = Uuid::new_v4();
        let partner = Uuid::new_v4();
        let mut sales = fixture();
        sales[0].seller_id = Some(seller);
        sales[0].partner_id = Some(partner);
        sales[1].seller_id = Some(seller);

        let by_seller = ReportFilter { seller_id: Some(seller), ..Default::default() };
        let by_both = ReportFilter { seller_id: Some(seller), partner_id: Some(partner), ..Default::default() };

        let svc = ReportService::new();
        assert_eq!(svc.generate(&sales, &by_seller).unwrap().total_sales, 2);
        assert_eq!(svc.generate(&sales, &by_both).unwrap().total_sales, 1);
    }

    #[test]
    fn search_matches_name_email_and_phone() {
        let mut sales = fixture();
        sales[0].client_name = "Rita Fernandes".into();
        sales[1].client_email = Some("Geral@Empresa.pt".into());
        sales[2].client_phone = Some("+351912345678".into());

        let svc = ReportService::new();
        assert_eq!(svc.search(&sales, "rita").len(), 1);
        assert_eq!(svc.search(&sales, "empresa.pt").len(), 1);
        assert_eq!(svc.search(&sales, "91234").len(), 1);
        assert_eq!(svc.search(&sales, "").len(), 4);
        assert!(svc.search(&sales, "ninguém").is_empty());
    }
}
