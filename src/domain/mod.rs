// ==========================================
// IMAC Congelados 生产管理系统 - 领域层
// ==========================================
// 职责: 实体、派生实体与领域类型
// ==========================================

pub mod analytics;
pub mod month;
pub mod observation;
pub mod production;
pub mod sector;

// 重导出核心类型
pub use analytics::{
    round2, BatchFailure, BatchOutcome, BulkFailure, BulkRegistrationResult, CategoryImpact,
    KpiSummary, MonthlyImpactEntry, ProductPerformance, SectorWorstPerformers,
};
pub use month::{iso_month_to_label, parse_iso_date, MonthKey};
pub use observation::{product_day_key, ObservationInput, ProductionObservationRecord};
pub use production::{
    velocity_pct, DailyProduction, ProductionSpeedInput, ProductionSpeedRecord, ProductionTotals,
    MAX_DAYS_PER_MONTH,
};
pub use sector::{Sector, SectorCatalog, SectorFilter};
