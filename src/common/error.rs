// src/common/error.rs

use thiserror::Error;
use uuid::Uuid;

use crate::services::password_service::PasswordViolation;

// Nosso tipo de erro, com `thiserror` para melhor ergonomia.
#[derive(Debug, Error)]
pub enum AppError {
    // Uma data obrigatória está ausente ou ilegível.
    // Nunca devolvemos métricas parciais: o cálculo inteiro falha.
    #[error("Dados inconsistentes na venda {sale_id}: campo '{field}' inválido ({value:?})")]
    DataIntegrity {
        sale_id: Uuid,
        field: &'static str,
        value: Option<String>,
    },

    #[error("Tamanho de senha inválido: {requested} (mínimo {minimum})")]
    InvalidPasswordLength { requested: usize, minimum: usize },

    #[error("Senha fraca: {0}")]
    WeakPassword(PasswordViolation),

    #[error("Filtro de relatório inválido")]
    InvalidFilter(#[source] validator::ValidationErrors),

    #[error("Configuração inválida: {0}")]
    InvalidConfig(String),

    #[error("Erro de validação da configuração")]
    ConfigValidation(#[from] validator::ValidationErrors),

    #[error("JSON inválido: {0}")]
    Json(#[from] serde_json::Error),
}

impl AppError {
    pub fn data_integrity(sale_id: Uuid, field: &'static str, value: Option<&str>) -> Self {
        AppError::DataIntegrity {
            sale_id,
            field,
            value: value.map(str::to_owned),
        }
    }

    /// Código estável para o front-end traduzir (o texto fica do lado de lá).
    pub fn code(&self) -> &'static str {
        match self {
            AppError::DataIntegrity { .. } => "DATA_INTEGRITY",
            AppError::InvalidPasswordLength { .. } => "INVALID_PASSWORD_LENGTH",
            AppError::WeakPassword(_) => "WEAK_PASSWORD",
            AppError::InvalidFilter(_) => "INVALID_FILTER",
            AppError::InvalidConfig(_) | AppError::ConfigValidation(_) => "INVALID_CONFIG",
            AppError::Json(_) => "INVALID_JSON",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn data_integrity_message_names_sale_and_field() {
        let id = Uuid::nil();
        let err = AppError::data_integrity(id, "created_at", Some("ontem"));

        let msg = err.to_string();
        assert!(msg.contains("created_at"));
        assert!(msg.contains("ontem"));
        assert_eq!(err.code(), "DATA_INTEGRITY");
    }

    #[test]
    fn weak_password_wraps_the_violation() {
        let err = AppError::WeakPassword(PasswordViolation::TooShort);
        assert!(err.to_string().contains("8"));
        assert_eq!(err.code(), "WEAK_PASSWORD");
    }

    #[test]
    fn serde_errors_become_invalid_json() {
        let source = serde_json::from_str::<Vec<u32>>("[1, 2,").unwrap_err();
        let err = AppError::from(source);

        assert!(matches!(err, AppError::Json(_)));
        assert_eq!(err.code(), "INVALID_JSON");
        assert!(err.to_string().starts_with("JSON inválido"));
    }
}
