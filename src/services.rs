// src/services.rs

pub mod metrics_service;
pub mod loyalty_service;
pub mod password_service;
pub mod report_service;
pub mod dashboard_service;

pub use dashboard_service::DashboardService;
pub use loyalty_service::LoyaltyService;
pub use metrics_service::MetricsService;
pub use password_service::PasswordService;
pub use report_service::ReportService;
