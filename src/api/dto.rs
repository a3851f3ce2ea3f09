// ==========================================
// IMAC Congelados 生产管理系统 - API 响应结构
// ==========================================

use serde::{Deserialize, Serialize};

use crate::domain::{BatchOutcome, BulkRegistrationResult, ProductionSpeedRecord};

/// 集合响应：写操作后返回重新读取的全量集合
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CollectionResponse<T> {
    /// 本次写操作影响的记录ID（列表查询为 None）
    pub affected_id: Option<String>,
    pub data: Vec<T>,
}

impl<T> CollectionResponse<T> {
    pub fn new(data: Vec<T>) -> Self {
        Self {
            affected_id: None,
            data,
        }
    }

    pub fn with_affected(affected_id: &str, data: Vec<T>) -> Self {
        Self {
            affected_id: Some(affected_id.to_string()),
            data,
        }
    }
}

/// 分页响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    pub data: Vec<T>,
    pub total: usize,
    pub page: usize,
    pub page_size: usize,
}

/// 批量删除响应（按月 / 按日）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BatchDeleteResponse<T> {
    pub outcome: BatchOutcome,
    pub message: String,
    pub data: Vec<T>,
}

/// 批量登记响应
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkRegisterResponse {
    pub result: BulkRegistrationResult,
    pub message: String,
    pub data: Vec<ProductionSpeedRecord>,
}

/// 分页参数（page 从 1 开始）
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: usize,
    pub page_size: usize,
}

impl PageRequest {
    pub const DEFAULT_PAGE_SIZE: usize = 50;
    pub const MAX_PAGE_SIZE: usize = 500;

    /// 规范化: page 至少为 1，page_size 落在 [1, MAX_PAGE_SIZE]
    pub fn new(page: usize, page_size: usize) -> Self {
        let page_size = if page_size == 0 {
            Self::DEFAULT_PAGE_SIZE
        } else {
            page_size.min(Self::MAX_PAGE_SIZE)
        };
        Self {
            page: page.max(1),
            page_size,
        }
    }

    pub fn offset(&self) -> usize {
        (self.page - 1) * self.page_size
    }
}
