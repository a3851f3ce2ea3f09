// ==========================================
// IMAC Congelados 生产管理系统 - 部门 (Sector) 映射
// ==========================================
// 职责: 后端枚举编码 <-> 前端展示名称 双向映射
// 策略: 未映射值原样透传 (passthrough)，只告警不报错
// ==========================================

use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fmt;
use std::sync::Mutex;

// ==========================================
// Sector - 内置部门
// ==========================================
// 编码: ASCII、去重音、大写下划线 (与数据库一致)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Sector {
    Panificacao, // 面包
    Confeitaria, // 糕点
    Salgados,    // 咸点
    PaoDeQueijo, // 奶酪面包
    Massas,      // 面食
    Embalagem,   // 包装
}

impl Sector {
    /// 内置部门（展示顺序）
    pub const ALL: [Sector; 6] = [
        Sector::Panificacao,
        Sector::Confeitaria,
        Sector::Salgados,
        Sector::PaoDeQueijo,
        Sector::Massas,
        Sector::Embalagem,
    ];

    /// 数据库编码
    pub fn code(&self) -> &'static str {
        match self {
            Sector::Panificacao => "PANIFICACAO",
            Sector::Confeitaria => "CONFEITARIA",
            Sector::Salgados => "SALGADOS",
            Sector::PaoDeQueijo => "PAO_DE_QUEIJO",
            Sector::Massas => "MASSAS",
            Sector::Embalagem => "EMBALAGEM",
        }
    }

    /// 展示名称
    pub fn label(&self) -> &'static str {
        match self {
            Sector::Panificacao => "Panificação",
            Sector::Confeitaria => "Confeitaria",
            Sector::Salgados => "Salgados",
            Sector::PaoDeQueijo => "Pão de Queijo",
            Sector::Massas => "Massas",
            Sector::Embalagem => "Embalagem",
        }
    }

    pub fn from_code(code: &str) -> Option<Sector> {
        Sector::ALL.iter().copied().find(|s| s.code() == code)
    }
}

impl fmt::Display for Sector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

// ==========================================
// SectorCatalog - 双向映射表
// ==========================================

/// 部门编码/名称双向映射
///
/// 查找失败时返回输入本身，并对每个未知值告警一次。
/// 新增部门但忘记配置映射时，系统继续运行，日志中可见告警。
#[derive(Debug)]
pub struct SectorCatalog {
    code_to_label: HashMap<String, String>,
    label_to_code: HashMap<String, String>,
    order: Vec<String>,
    warned: Mutex<HashSet<String>>,
}

impl SectorCatalog {
    /// 空映射表
    pub fn empty() -> Self {
        Self {
            code_to_label: HashMap::new(),
            label_to_code: HashMap::new(),
            order: Vec::new(),
            warned: Mutex::new(HashSet::new()),
        }
    }

    /// 内置部门映射表
    pub fn builtin() -> Self {
        Sector::ALL
            .iter()
            .fold(Self::empty(), |catalog, s| catalog.with_entry(s.code(), s.label()))
    }

    /// 追加一条映射（同编码重复追加时覆盖名称）
    pub fn with_entry(mut self, code: &str, label: &str) -> Self {
        if let Some(old_label) = self
            .code_to_label
            .insert(code.to_string(), label.to_string())
        {
            self.label_to_code.remove(&old_label);
        } else {
            self.order.push(code.to_string());
        }
        self.label_to_code
            .insert(label.to_string(), code.to_string());
        self
    }

    /// 编码 -> 展示名称（未映射时原样返回）
    pub fn label_for(&self, code: &str) -> String {
        match self.code_to_label.get(code) {
            Some(label) => label.clone(),
            None => {
                self.warn_unmapped("code", code);
                code.to_string()
            }
        }
    }

    /// 展示名称 -> 编码（未映射时原样返回）
    pub fn code_for(&self, label: &str) -> String {
        match self.label_to_code.get(label) {
            Some(code) => code.clone(),
            None => {
                // 传入的可能本身就是编码
                if !self.code_to_label.contains_key(label) {
                    self.warn_unmapped("label", label);
                }
                label.to_string()
            }
        }
    }

    pub fn is_known(&self, code: &str) -> bool {
        self.code_to_label.contains_key(code)
    }

    /// 按登记顺序返回全部编码
    pub fn codes(&self) -> &[String] {
        &self.order
    }

    /// 目录顺序下的排序位置；未知编码排在最后
    pub fn position(&self, code: &str) -> usize {
        self.order
            .iter()
            .position(|c| c == code)
            .unwrap_or(self.order.len())
    }

    fn warn_unmapped(&self, kind: &str, value: &str) {
        if value.is_empty() {
            return;
        }
        let first_time = match self.warned.lock() {
            Ok(mut warned) => warned.insert(value.to_string()),
            Err(_) => true,
        };
        if first_time {
            tracing::warn!(kind = kind, value = value, "部门映射缺失，按原值透传");
        }
    }
}

impl Default for SectorCatalog {
    fn default() -> Self {
        Self::builtin()
    }
}

// ==========================================
// SectorFilter - 部门筛选
// ==========================================

/// "Todos"/"All"/空串 表示不过滤
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SectorFilter {
    #[default]
    All,
    Only(String),
}

impl SectorFilter {
    pub fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        if trimmed.is_empty()
            || trimmed.eq_ignore_ascii_case("todos")
            || trimmed.eq_ignore_ascii_case("all")
        {
            SectorFilter::All
        } else {
            SectorFilter::Only(trimmed.to_string())
        }
    }

    pub fn matches(&self, sector: &str) -> bool {
        match self {
            SectorFilter::All => true,
            SectorFilter::Only(code) => code == sector,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_roundtrip_labels() {
        let catalog = SectorCatalog::builtin();
        assert_eq!(catalog.label_for("PAO_DE_QUEIJO"), "Pão de Queijo");
        assert_eq!(catalog.code_for("Panificação"), "PANIFICACAO");
        assert_eq!(catalog.codes().len(), 6);
    }

    #[test]
    fn test_unmapped_passthrough() {
        let catalog = SectorCatalog::builtin();
        assert_eq!(catalog.label_for("CONGELADOS_NOVOS"), "CONGELADOS_NOVOS");
        assert_eq!(catalog.code_for("Setor Novo"), "Setor Novo");
        // 第二次查找同样透传
        assert_eq!(catalog.label_for("CONGELADOS_NOVOS"), "CONGELADOS_NOVOS");
        assert!(!catalog.is_known("CONGELADOS_NOVOS"));
    }

    #[test]
    fn test_with_entry_overrides_label() {
        let catalog = SectorCatalog::builtin().with_entry("MASSAS", "Massas Frescas");
        assert_eq!(catalog.label_for("MASSAS"), "Massas Frescas");
        assert_eq!(catalog.code_for("Massas Frescas"), "MASSAS");
        assert_eq!(catalog.code_for("Massas"), "Massas");
        assert_eq!(catalog.codes().len(), 6);
    }

    #[test]
    fn test_sector_filter_sentinels() {
        assert_eq!(SectorFilter::parse("Todos"), SectorFilter::All);
        assert_eq!(SectorFilter::parse("all"), SectorFilter::All);
        assert_eq!(SectorFilter::parse("  "), SectorFilter::All);
        assert_eq!(
            SectorFilter::parse("SALGADOS"),
            SectorFilter::Only("SALGADOS".to_string())
        );
        assert!(SectorFilter::All.matches("QUALQUER"));
        assert!(!SectorFilter::parse("SALGADOS").matches("MASSAS"));
    }

    #[test]
    fn test_sector_from_code() {
        assert_eq!(Sector::from_code("EMBALAGEM"), Some(Sector::Embalagem));
        assert_eq!(Sector::from_code("Embalagem"), None);
        assert_eq!(Sector::PaoDeQueijo.to_string(), "PAO_DE_QUEIJO");
    }
}
