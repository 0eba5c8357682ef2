// src/services/password_service.rs

use rand::Rng;
use rand::seq::SliceRandom;
use thiserror::Error;

use crate::common::error::AppError;

const UPPERCASE: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";
const LOWERCASE: &[u8] = b"abcdefghijklmnopqrstuvwxyz";
const DIGITS: &[u8] = b"0123456789";
const SPECIAL: &[u8] = b"!@#$%&*";

const REQUIRED_CLASSES: [&[u8]; 4] = [UPPERCASE, LOWERCASE, DIGITS, SPECIAL];

pub const MIN_PASSWORD_LENGTH: usize = 8;

// Regra violada. É um valor de retorno, não uma falha do sistema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum PasswordViolation {
    #[error("A senha deve ter pelo menos 8 caracteres")]
    TooShort,
    #[error("A senha deve conter pelo menos 1 letra maiúscula")]
    MissingUppercase,
    #[error("A senha deve conter pelo menos 1 letra minúscula")]
    MissingLowercase,
    #[error("A senha deve conter pelo menos 1 número")]
    MissingDigit,
    #[error("A senha deve conter pelo menos 1 caractere especial (!@#$%&*)")]
    MissingSpecial,
}

#[derive(Clone)]
pub struct PasswordService {
    default_length: usize,
}

impl PasswordService {
    pub fn new(default_length: usize) -> Self {
        Self { default_length }
    }

    pub fn generate_default(&self) -> Result<String, AppError> {
        generate(self.default_length)
    }
}

/// Gera uma senha com pelo menos um caractere de cada classe, embaralhada.
pub fn generate(length: usize) -> Result<String, AppError> {
    if length < REQUIRED_CLASSES.len() {
        return Err(AppError::InvalidPasswordLength {
            requested: length,
            minimum: REQUIRED_CLASSES.len(),
        });
    }

    let mut rng = rand::rng();
    let all: Vec<u8> = REQUIRED_CLASSES.concat();

    let mut chars: Vec<u8> = REQUIRED_CLASSES
        .iter()
        .map(|class| class[rng.random_range(0..class.len())])
        .collect();

    while chars.len() < length {
        chars.push(all[rng.random_range(0..all.len())]);
    }

    chars.shuffle(&mut rng);

    // Só ASCII, então a conversão não falha
    Ok(chars.into_iter().map(char::from).collect())
}

/// Primeira regra violada, sempre na mesma ordem:
/// tamanho, maiúscula, minúscula, número, especial.
pub fn validate(password: &str) -> Option<PasswordViolation> {
    if password.chars().count() < MIN_PASSWORD_LENGTH {
        return Some(PasswordViolation::TooShort);
    }
    if !password.chars().any(|c| c.is_ascii_uppercase()) {
        return Some(PasswordViolation::MissingUppercase);
    }
    if !password.chars().any(|c| c.is_ascii_lowercase()) {
        return Some(PasswordViolation::MissingLowercase);
    }
    if !password.chars().any(|c| c.is_ascii_digit()) {
        return Some(PasswordViolation::MissingDigit);
    }
    if !password.bytes().any(|b| SPECIAL.contains(&b)) {
        return Some(PasswordViolation::MissingSpecial);
    }
    None
}

/// Versão com `?` para os fluxos de conta.
pub fn check(password: &str) -> Result<(), AppError> {
    match validate(password) {
        Some(violation) => Err(AppError::WeakPassword(violation)),
        None => Ok(()),
    }
}
