// src/models.rs

pub mod sale;
pub mod dashboard;
pub mod loyalty;
pub mod report;
