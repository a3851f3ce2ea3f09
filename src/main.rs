// ==========================================
// IMAC Congelados 生产管理系统 - 命令行入口
// ==========================================
// 用法: imac-congelados [start YYYY-MM-DD] [end YYYY-MM-DD] [sector]
// 输出: 生产速度页面视图 (JSON)
// ==========================================

use anyhow::{anyhow, Context, Result};
use chrono::NaiveDate;

use imac_congelados::app::{get_default_db_path, AppState};
use imac_congelados::engine::RecordFilter;
use imac_congelados::{i18n, logging};

fn main() -> Result<()> {
    // 初始化日志系统
    logging::init();
    i18n::set_locale(i18n::DEFAULT_LOCALE);

    tracing::info!("==================================================");
    tracing::info!("{}", imac_congelados::APP_NAME);
    tracing::info!("系统版本: {}", imac_congelados::VERSION);
    tracing::info!("==================================================");

    let args: Vec<String> = std::env::args().skip(1).collect();
    let filter = parse_filter(&args)?;

    let db_path = get_default_db_path();
    tracing::info!("使用数据库: {}", db_path);
    let state = AppState::new(db_path).map_err(|e| anyhow!(e))?;

    let view = state
        .dashboard_api
        .production_speed_view(&filter)
        .map_err(|e| anyhow!(serde_json::to_string(&e.to_response()).unwrap_or_else(|_| e.to_string())))?;

    println!("{}", serde_json::to_string_pretty(&view)?);
    Ok(())
}

/// 位置参数: start / end / sector；"-" 表示不限
fn parse_filter(args: &[String]) -> Result<RecordFilter> {
    let date_arg = |i: usize| -> Result<Option<NaiveDate>> {
        match args.get(i).map(|s| s.trim()) {
            None | Some("-") | Some("") => Ok(None),
            Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                .map(Some)
                .with_context(|| format!("日期格式错误（应为YYYY-MM-DD）: {}", raw)),
        }
    };

    let mut filter = RecordFilter::default().with_range(date_arg(0)?, date_arg(1)?);
    if let Some(sector) = args.get(2) {
        filter = filter.with_sector(sector);
    }
    Ok(filter)
}
