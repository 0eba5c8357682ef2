// src/models/dashboard.rs

use rust_decimal::Decimal;
use serde::Serialize;

use crate::models::loyalty::LoyaltyAlert;
use crate::models::sale::{SaleCategory, SaleStatus};

// 1. Barras do gráfico "Vendas Mensais"
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MonthlyBucket {
    pub year: i32,
    pub month: u32,
    pub label: String, // ex: "mar. 2024"
    pub vendas: u64,
    pub valor: Decimal,
    pub comissao: Decimal,
}

// 2. Comparativo ano a ano (sempre 12 pontos)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct YearOverYearPoint {
    pub month: u32,
    pub label: String,
    pub ano_corrente: u64,
    pub ano_anterior: u64,
}

// 3. Período atual vs mesmo período do ano anterior
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PeriodComparison {
    pub current: Decimal,
    pub previous: Decimal,
    pub change: Decimal, // em %
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CategoryBreakdown {
    pub energia: u64,
    pub telecomunicacoes: u64,
    pub paineis_solares: u64,
}

impl CategoryBreakdown {
    pub fn add(&mut self, category: SaleCategory) {
        *self.slot(category) += 1;
    }

    pub fn get(&self, category: SaleCategory) -> u64 {
        match category {
            SaleCategory::Energia => self.energia,
            SaleCategory::Telecomunicacoes => self.telecomunicacoes,
            SaleCategory::PaineisSolares => self.paineis_solares,
        }
    }

    pub fn total(&self) -> u64 {
        SaleCategory::ALL.iter().map(|c| self.get(*c)).sum()
    }

    fn slot(&mut self, category: SaleCategory) -> &mut u64 {
        match category {
            SaleCategory::Energia => &mut self.energia,
            SaleCategory::Telecomunicacoes => &mut self.telecomunicacoes,
            SaleCategory::PaineisSolares => &mut self.paineis_solares,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct StatusBreakdown {
    pub em_negociacao: u64,
    pub pendente: u64,
    pub ativo: u64,
    pub perdido: u64,
    pub anulado: u64,
}

impl StatusBreakdown {
    pub fn add(&mut self, status: SaleStatus) {
        *self.slot(status) += 1;
    }

    pub fn get(&self, status: SaleStatus) -> u64 {
        match status {
            SaleStatus::EmNegociacao => self.em_negociacao,
            SaleStatus::Pendente => self.pendente,
            SaleStatus::Ativo => self.ativo,
            SaleStatus::Perdido => self.perdido,
            SaleStatus::Anulado => self.anulado,
        }
    }

    pub fn total(&self) -> u64 {
        SaleStatus::ALL.iter().map(|s| self.get(*s)).sum()
    }

    fn slot(&mut self, status: SaleStatus) -> &mut u64 {
        match status {
            SaleStatus::EmNegociacao => &mut self.em_negociacao,
            SaleStatus::Pendente => &mut self.pendente,
            SaleStatus::Ativo => &mut self.ativo,
            SaleStatus::Perdido => &mut self.perdido,
            SaleStatus::Anulado => &mut self.anulado,
        }
    }
}

// 4. O snapshot completo (os cards + gráficos do topo)
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricsSnapshot {
    pub total_sales: u64,
    pub active_sales: u64,
    pub pending_sales: u64,
    pub sales_this_month: u64,

    pub total_value: Decimal,
    pub revenue_this_month: Decimal,

    pub total_commission: Decimal,
    pub comissoes_previstas: Decimal, // Pendentes
    pub comissoes_ativas: Decimal,
    pub total_mensalidades: Decimal, // Só telecom ativo

    pub by_category: CategoryBreakdown,
    pub by_status: StatusBreakdown,

    pub monthly: Vec<MonthlyBucket>,
    pub year_over_year: Vec<YearOverYearPoint>,

    pub month_vs_last_year: PeriodComparison,
    pub year_vs_last_year: PeriodComparison,
    pub revenue_vs_last_year: PeriodComparison,
}

// 5. O que a página inicial recebe de uma vez
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DashboardView {
    pub metrics: MetricsSnapshot,
    pub alert_count: usize,
    pub alerts: Vec<LoyaltyAlert>,
}
