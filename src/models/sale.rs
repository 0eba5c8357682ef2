// src/models/sale.rs

use rust_decimal::Decimal;
use serde::{Deserialize, Deserializer, Serialize};
use uuid::Uuid;

use crate::common::error::AppError;

// --- ENUMS (códigos crus, os rótulos ficam no front-end) ---

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleCategory {
    Energia,
    Telecomunicacoes,
    PaineisSolares,
}

impl SaleCategory {
    pub const ALL: [SaleCategory; 3] = [
        SaleCategory::Energia,
        SaleCategory::Telecomunicacoes,
        SaleCategory::PaineisSolares,
    ];
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleType {
    NovaInstalacao,
    Refid, // Renovação de um contrato anterior
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SaleStatus {
    EmNegociacao,
    Pendente,
    Ativo,
    Perdido,
    Anulado,
}

impl SaleStatus {
    pub const ALL: [SaleStatus; 5] = [
        SaleStatus::EmNegociacao,
        SaleStatus::Pendente,
        SaleStatus::Ativo,
        SaleStatus::Perdido,
        SaleStatus::Anulado,
    ];
}

// --- VENDA (como vem do banco) ---

// As datas chegam como texto e só são interpretadas no cálculo,
// para que uma data podre vire erro de integridade em vez de sumir no parse.
// Entra em snake_case (colunas do banco), sai em camelCase como o resto da API.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all(serialize = "camelCase"))]
pub struct SaleRecord {
    pub id: Uuid,

    #[serde(default, deserialize_with = "null_as_empty")]
    pub client_name: String,
    #[serde(default, deserialize_with = "null_as_empty")]
    pub client_address: String,
    pub client_email: Option<String>,
    pub client_phone: Option<String>,
    pub client_nif: Option<String>,

    pub category: SaleCategory,
    pub sale_type: Option<SaleType>,
    pub status: SaleStatus,

    // Valores (nulo soma como zero)
    pub contract_value: Option<Decimal>,
    pub commission: Option<Decimal>,

    // Vínculos
    pub seller_id: Option<Uuid>,
    pub seller_name: Option<String>,
    pub partner_id: Option<Uuid>,
    pub partner_name: Option<String>,

    // Fidelização
    pub loyalty_months: Option<u32>,
    pub active_date: Option<String>,
    pub loyalty_end_date: Option<String>,

    pub created_at: Option<String>,
}

// O banco devolve `null` em morada não preenchida
fn null_as_empty<'de, D>(deserializer: D) -> Result<String, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(Option::<String>::deserialize(deserializer)?.unwrap_or_default())
}

/// Lê um array JSON de vendas tal como o banco o exporta.
pub fn parse_sales(json: &str) -> Result<Vec<SaleRecord>, AppError> {
    Ok(serde_json::from_str(json)?)
}

impl SaleRecord {
    /// Venda mínima, útil para montar dados de teste e fixtures.
    pub fn new(
        id: Uuid,
        client_name: &str,
        category: SaleCategory,
        status: SaleStatus,
        created_at: &str,
    ) -> Self {
        Self {
            id,
            client_name: client_name.to_owned(),
            client_address: String::new(),
            client_email: None,
            client_phone: None,
            client_nif: None,
            category,
            sale_type: None,
            status,
            contract_value: None,
            commission: None,
            seller_id: None,
            seller_name: None,
            partner_id: None,
            partner_name: None,
            loyalty_months: None,
            active_date: None,
            loyalty_end_date: None,
            created_at: Some(created_at.to_owned()),
        }
    }

    pub fn contract_value_or_zero(&self) -> Decimal {
        self.contract_value.unwrap_or(Decimal::ZERO)
    }

    pub fn commission_or_zero(&self) -> Decimal {
        self.commission.unwrap_or(Decimal::ZERO)
    }

    pub fn is_active(&self) -> bool {
        self.status == SaleStatus::Ativo
    }

    pub fn is_refid(&self) -> bool {
        self.sale_type == Some(SaleType::Refid)
    }

    /// Mesmo cliente para efeitos de renovação: nome E morada iguais.
    pub fn same_client_as(&self, other: &SaleRecord) -> bool {
        self.client_name == other.client_name && self.client_address == other.client_address
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn deserializes_store_row_with_nulls() {
        let json = r#"{
            "id": "6f1c1b9e-5d0e-4a57-9a8c-0d0b3e4c2a11",
            "client_name": "Maria Silva",
            "client_address": "Rua Direita 10, Leiria",
            "category": "telecomunicacoes",
            "sale_type": null,
            "status": "em_negociacao",
            "contract_value": 39.5,
            "commission": null,
            "active_date": null,
            "loyalty_end_date": null,
            "created_at": "2024-03-15T10:00:00+00:00"
        }"#;

        let sale: SaleRecord = serde_json::from_str(json).unwrap();

        assert_eq!(sale.category, SaleCategory::Telecomunicacoes);
        assert_eq!(sale.status, SaleStatus::EmNegociacao);
        assert_eq!(sale.sale_type, None);
        assert_eq!(sale.commission_or_zero(), Decimal::ZERO);
        assert_eq!(sale.contract_value_or_zero(), "39.5".parse::<Decimal>().unwrap());
        assert!(sale.partner_name.is_none());
    }

    #[test]
    fn null_address_becomes_empty() {
        let json = r#"{
            "id": "6f1c1b9e-5d0e-4a57-9a8c-0d0b3e4c2a12",
            "client_name": "Rui",
            "client_address": null,
            "category": "energia",
            "status": "ativo",
            "created_at": "2024-03-15"
        }"#;

        let sale: SaleRecord = serde_json::from_str(json).unwrap();
        assert_eq!(sale.client_address, "");
        assert_eq!(sale.sale_type, None);
    }

    #[test]
    fn parse_sales_reads_an_array_of_rows() {
        let json = r#"[{
            "id": "6f1c1b9e-5d0e-4a57-9a8c-0d0b3e4c2a13",
            "client_name": "Inês",
            "category": "energia",
            "status": "pendente",
            "created_at": "2024-03-15"
        }]"#;

        let sales = parse_sales(json).unwrap();
        assert_eq!(sales.len(), 1);
        assert_eq!(sales[0].status, SaleStatus::Pendente);
    }

    #[test]
    fn parse_sales_reports_bad_input_as_invalid_json() {
        for bad in ["", "{\"id\": 1}", "[{\"category\": \"agua\"}]"] {
            let err = parse_sales(bad).unwrap_err();
            assert!(matches!(err, AppError::Json(_)), "entrada: {bad}");
            assert_eq!(err.code(), "INVALID_JSON");
        }
    }

    #[test]
    fn reads_snake_case_and_writes_camel_case() {
        let json = r#"{
            "id": "6f1c1b9e-5d0e-4a57-9a8c-0d0b3e4c2a14",
            "client_name": "Tiago",
            "client_address": "Rua Nova 3",
            "category": "paineis_solares",
            "sale_type": "nova_instalacao",
            "status": "ativo",
            "contract_value": 12,
            "loyalty_end_date": "2026-01-01",
            "created_at": "2024-03-15"
        }"#;
        let sale: SaleRecord = serde_json::from_str(json).unwrap();

        let out = serde_json::to_value(&sale).unwrap();

        assert_eq!(out["clientName"], "Tiago");
        assert_eq!(out["clientAddress"], "Rua Nova 3");
        assert_eq!(out["saleType"], "nova_instalacao");
        assert_eq!(out["category"], "paineis_solares");
        assert_eq!(out["loyaltyEndDate"], "2026-01-01");
        assert_eq!(out["createdAt"], "2024-03-15");
        assert!(out.get("client_name").is_none());
    }

    #[test]
    fn parses_refid_and_enum_codes() {
        let sale_type: SaleType = serde_json::from_str("\"refid\"").unwrap();
        let category: SaleCategory = serde_json::from_str("\"paineis_solares\"").unwrap();
        let status: SaleStatus = serde_json::from_str("\"anulado\"").unwrap();

        assert_eq!(sale_type, SaleType::Refid);
        assert_eq!(category, SaleCategory::PaineisSolares);
        assert_eq!(status, SaleStatus::Anulado);
    }

    #[test]
    fn same_client_needs_name_and_address() {
        let mut a = SaleRecord::new(Uuid::new_v4(), "Ana", SaleCategory::Energia, SaleStatus::Ativo, "2024-01-01");
        a.client_address = "Rua A".into();
        let mut b = a.clone();
        b.id = Uuid::new_v4();

        assert!(a.same_client_as(&b));

        b.client_address = "Rua B".into();
        assert!(!a.same_client_as(&b));
    }
}
