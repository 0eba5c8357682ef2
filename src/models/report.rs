// src/models/report.rs

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::models::dashboard::{CategoryBreakdown, StatusBreakdown};
use crate::models::sale::{SaleCategory, SaleRecord, SaleStatus};

// Filtros da página de relatórios. Tudo opcional; o que vier tem de bater.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
#[validate(schema(function = "validate_date_range"))]
pub struct ReportFilter {
    pub start_date: Option<DateTime<Utc>>,
    pub end_date: Option<DateTime<Utc>>,
    pub category: Option<SaleCategory>,
    pub status: Option<SaleStatus>,
    pub seller_id: Option<Uuid>,
    pub partner_id: Option<Uuid>,
}

impl ReportFilter {
    pub fn has_date_range(&self) -> bool {
        self.start_date.is_some() || self.end_date.is_some()
    }
}

fn validate_date_range(filter: &ReportFilter) -> Result<(), ValidationError> {
    if let (Some(start), Some(end)) = (filter.start_date, filter.end_date) {
        if start > end {
            let mut err = ValidationError::new("date_range");
            err.message = Some("A data de início é posterior à data de fim.".into());
            return Err(err);
        }
    }
    Ok(())
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SalesReport {
    pub sales: Vec<SaleRecord>,
    pub total_sales: u64,
    pub total_value: Decimal,
    pub total_commission: Decimal,
    pub by_category: CategoryBreakdown,
    pub by_status: StatusBreakdown,
}
