use serde::Serialize;

use super::entities::Drift;

/// 一致性检查结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsistencyReport {
    pub consistent: bool,
    pub drifts: Vec<Drift>,
}

/// 修复结果
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RepairResponse {
    /// 被重建反向索引的父文档数量
    pub repaired: usize,
    pub remaining: Vec<Drift>,
}

/// 健康检查
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HealthResponse {
    pub status: String,
    pub system_name: String,
    pub store_backend: String,
    pub uptime_seconds: i64,
}
