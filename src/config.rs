// src/config.rs

use std::{env, str::FromStr};

use chrono_tz::Tz;
use validator::{Validate, ValidationError};

use crate::{
    common::error::AppError,
    services::{
        dashboard_service::DashboardService, loyalty_service::LoyaltyService,
        metrics_service::MetricsService, password_service::PasswordService,
        report_service::ReportService,
    },
};

// Limiares do dashboard e da política de senhas
#[derive(Debug, Clone, PartialEq, Eq, Validate)]
pub struct AppConfig {
    #[validate(range(min = 1, max = 120))]
    pub monthly_window: usize,

    #[validate(range(min = 1, max = 120))]
    pub loyalty_alert_months: u32,

    #[validate(range(max = 3650))]
    pub loyalty_banner_days: u32,

    #[validate(range(min = 1, max = 100))]
    pub alert_preview_limit: usize,

    #[validate(range(min = 8, max = 128))]
    pub password_length: usize,

    // Nome IANA, ex: "Europe/Lisbon". Define o que é "este mês" no dashboard.
    #[validate(custom(function = "validate_timezone"))]
    pub timezone: String,
}

fn validate_timezone(value: &str) -> Result<(), ValidationError> {
    value
        .parse::<Tz>()
        .map(|_| ())
        .map_err(|_| ValidationError::new("timezone"))
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            monthly_window: 6,
            loyalty_alert_months: 11,
            loyalty_banner_days: 210,
            alert_preview_limit: 5,
            password_length: 12,
            timezone: "Europe/Lisbon".to_owned(),
        }
    }
}

impl AppConfig {
    /// Lê do ambiente (e do `.env`, se existir). Variável ausente usa o padrão.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();

        let defaults = Self::default();
        let config = Self {
            monthly_window: env_or("CRM_MONTHLY_WINDOW", defaults.monthly_window)?,
            loyalty_alert_months: env_or("CRM_LOYALTY_ALERT_MONTHS", defaults.loyalty_alert_months)?,
            loyalty_banner_days: env_or("CRM_LOYALTY_BANNER_DAYS", defaults.loyalty_banner_days)?,
            alert_preview_limit: env_or("CRM_ALERT_PREVIEW_LIMIT", defaults.alert_preview_limit)?,
            password_length: env_or("CRM_PASSWORD_LENGTH", defaults.password_length)?,
            timezone: env_or("CRM_TIMEZONE", defaults.timezone)?,
        };

        config.validate()?;
        Ok(config)
    }

    pub fn tz(&self) -> Result<Tz, AppError> {
        self.timezone
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("CRM_TIMEZONE={}", self.timezone)))
    }
}

fn env_or<T: FromStr>(key: &str, default: T) -> Result<T, AppError> {
    match env::var(key) {
        Ok(raw) => raw
            .trim()
            .parse()
            .map_err(|_| AppError::InvalidConfig(format!("{key}={raw}"))),
        Err(_) => Ok(default),
    }
}

// O estado compartilhado, com o gráfico de dependências já montado
#[derive(Clone)]
pub struct AppState {
    pub config: AppConfig,
    pub dashboard_service: DashboardService,
    pub loyalty_service: LoyaltyService,
    pub report_service: ReportService,
    pub password_service: PasswordService,
}

impl AppState {
    pub fn new(config: AppConfig) -> Result<Self, AppError> {
        config.validate()?;
        let timezone = config.tz()?;

        let loyalty_service = LoyaltyService::new(config.loyalty_alert_months, config.loyalty_banner_days);
        let dashboard_service = DashboardService::new(
            MetricsService::new(config.monthly_window, timezone),
            loyalty_service.clone(),
            config.alert_preview_limit,
        );

        tracing::info!(?config, "Serviços inicializados");

        Ok(Self {
            password_service: PasswordService::new(config.password_length),
            report_service: ReportService::new(),
            loyalty_service,
            dashboard_service,
            config,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AppConfig::default();
        assert!(config.validate().is_ok());
        assert!(AppState::new(config).is_ok());
    }

    #[test]
    fn out_of_range_values_are_rejected() {
        let config = AppConfig { password_length: 4, ..AppConfig::default() };
        assert!(matches!(AppState::new(config), Err(AppError::ConfigValidation(_))));

        let config = AppConfig { monthly_window: 0, ..AppConfig::default() };
        assert!(config.validate().is_err());
    }

    #[test]
    fn timezone_must_be_an_iana_name() {
        assert_eq!(AppConfig::default().tz().unwrap(), Tz::Europe__Lisbon);

        let config = AppConfig { timezone: "America/Sao_Paulo".into(), ..AppConfig::default() };
        assert!(AppState::new(config).is_ok());

        let config = AppConfig { timezone: "Lisboa/Centro".into(), ..AppConfig::default() };
        assert!(matches!(AppState::new(config), Err(AppError::ConfigValidation(_))));

        let config = AppConfig { timezone: "UTC+1".into(), ..AppConfig::default() };
        assert!(config.validate().is_err());
        assert!(matches!(config.tz(), Err(AppError::InvalidConfig(_))));
    }

    #[test]
    fn unset_variable_falls_back_to_default() {
        let value: u32 = env_or("CRM_VARIAVEL_QUE_NAO_EXISTE", 42).unwrap();
        assert_eq!(value, 42);
    }
}
