//src/main.rs

use std::io::{self, Read};

use anyhow::Context;
use chrono::Utc;
use tracing_subscriber::EnvFilter;

use crm_vendas::{models::sale, AppConfig, AppState};

// Lê um array JSON de vendas no stdin e imprime o dashboard em JSON.
fn main() -> anyhow::Result<()> {
    // Logs vão para o stderr, o stdout fica só com o JSON
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(io::stderr)
        .with_target(false)
        .compact()
        .init();

    let config = AppConfig::from_env().context("Falha ao carregar a configuração")?;
    let app_state = AppState::new(config).context("Falha ao inicializar o estado da aplicação")?;

    let mut input = String::new();
    io::stdin()
        .read_to_string(&mut input)
        .context("Falha ao ler as vendas do stdin")?;

    let sales = sale::parse_sales(&input).context("O stdin deve conter um array JSON de vendas")?;
    tracing::info!("📥 {} vendas carregadas", sales.len());

    // Um único "agora" para o cálculo inteiro
    let now = Utc::now();
    let view = app_state.dashboard_service.build(&sales, now)?;

    tracing::info!(
        "✅ Dashboard calculado: {} alertas de fidelização",
        view.alert_count
    );

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}
