// ==========================================
// 演示数据库: 备份并重建，登记当月全部产品并填充日产量与观察记录
// 用法: seed_demo_db [db_path]
// ==========================================

use anyhow::{anyhow, Result};
use chrono::{Datelike, Duration, Local};
use std::fs;
use std::path::Path;

use imac_congelados::app::{get_default_db_path, AppState};
use imac_congelados::domain::{DailyProduction, MonthKey, ObservationInput, ProductionSpeedInput};
use imac_congelados::{i18n, logging};

const OBSERVATION_TYPES: [&str; 4] = ["Máquina", "Matéria-prima", "Mão de obra", "Qualidade"];

#[tokio::main]
async fn main() -> Result<()> {
    logging::init();
    i18n::set_locale(i18n::DEFAULT_LOCALE);

    let db_path = std::env::args().nth(1).unwrap_or_else(get_default_db_path);
    backup_and_reset_db(&db_path)?;

    let state = AppState::new(db_path.clone()).map_err(|e| anyhow!(e))?;
    let today = Local::now().date_naive();
    let month = MonthKey::from_date(today);
    let sectors: Vec<String> = state.catalog.codes().to_vec();

    // 1. 批量登记当月
    let bulk = state
        .production_api
        .bulk_register(&month.label(), &sectors)
        .await
        .map_err(|e| anyhow!(e.to_string()))?;
    eprintln!("{}", bulk.message);

    // 2. 填充截至今天的日产量（确定性数据）
    for (n, record) in bulk.data.iter().enumerate() {
        let mut days = vec![DailyProduction::default(); record.daily_production.len()];
        for (i, day) in days.iter_mut().enumerate().take(today.day() as usize) {
            let programado = 100.0 + (n as f64) * 10.0;
            let realizado = programado * (0.8 + ((i + n) % 5) as f64 * 0.06);
            *day = DailyProduction::new(programado, realizado.round());
        }
        let input = ProductionSpeedInput {
            mes_ano: record.mes_ano.clone(),
            sector: record.sector.clone(),
            produto: record.produto.clone(),
            meta_mes: 100.0 * days.len() as f64,
            daily_production: days,
        };
        state
            .production_api
            .update_record(&record.id, input)
            .map_err(|e| anyhow!(e.to_string()))?;
    }

    // 3. 观察记录：每隔一条产品记一次事件
    for (n, record) in bulk.data.iter().enumerate().step_by(2) {
        let date = today - Duration::days((n % today.day() as usize) as i64);
        let input = ObservationInput {
            date: date.format("%Y-%m-%d").to_string(),
            sector: record.sector.clone(),
            product: record.produto.clone(),
            observation_type: OBSERVATION_TYPES[n % OBSERVATION_TYPES.len()].to_string(),
            description: format!("Ocorrência de demonstração #{}", n + 1),
            had_impact: n % 4 == 0,
        };
        state
            .observation_api
            .create_observation(input)
            .map_err(|e| anyhow!(e.to_string()))?;
    }

    let records = state.production_api.list_records().map_err(|e| anyhow!(e.to_string()))?;
    let observations = state
        .observation_api
        .list_observations()
        .map_err(|e| anyhow!(e.to_string()))?;
    eprintln!(
        "Seeded {}: {} production_speed rows, {} observations",
        db_path,
        records.data.len(),
        observations.data.len()
    );
    Ok(())
}

fn backup_and_reset_db(db_path: &str) -> Result<()> {
    let path = Path::new(db_path);
    if !path.exists() {
        return Ok(());
    }

    let ts = Local::now().format("%Y%m%d_%H%M%S").to_string();
    let backup_path = format!("{}.bak.{}", db_path, ts);
    fs::copy(path, &backup_path)?;
    fs::remove_file(path)?;

    eprintln!("Backed up {} -> {}", db_path, backup_path);
    Ok(())
}
