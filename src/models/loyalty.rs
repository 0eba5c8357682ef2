// src/models/loyalty.rs

use chrono::{DateTime, Utc};
use serde::Serialize;
use uuid::Uuid;

use crate::models::sale::SaleCategory;

// Alerta de fim de fidelização. Não é persistido, só exibido.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoyaltyAlert {
    pub sale_id: Uuid,
    pub client_name: String,
    pub partner_name: Option<String>,
    pub category: SaleCategory,

    // Ambos ausentes quando a venda não tem data de fim de fidelização
    pub days_until_end: Option<i64>,
    pub loyalty_end_date: Option<DateTime<Utc>>,
}
