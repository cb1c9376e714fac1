// ==========================================
// 餐饮成本核算引擎 - ERP 价格历史 CSV 导入
// ==========================================
// 职责: 解析 ERP 导出的价格历史 CSV → 价格观测记录
// 列: articulo_erp_id, fecha, precio_calculado
// 口径: 单行解析失败不中止整批, 逐行记录错误供操作员排查
// ==========================================

use crate::domain::article::PriceObservation;
use anyhow::Context;
use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{info, warn};

// ==========================================
// 行级结构
// ==========================================

// CSV 原始行 (字段名与 ERP 导出列头一致)
#[derive(Debug, Deserialize)]
struct PriceHistoryRow {
    articulo_erp_id: String,
    fecha: String,
    precio_calculado: String,
}

/// 行级导入错误
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RowError {
    pub line: usize, // 1 起算, 含表头
    pub message: String,
}

/// 价格历史导入结果
#[derive(Debug, Clone)]
pub struct PriceHistoryImportResult {
    pub observations: Vec<PriceObservation>,
    pub row_errors: Vec<RowError>,
}

// ==========================================
// 导入入口
// ==========================================

/// 从 CSV 文件导入价格观测
pub fn import_price_history_csv(path: &Path) -> anyhow::Result<PriceHistoryImportResult> {
    let mut reader = csv::Reader::from_path(path)
        .with_context(|| format!("打开价格历史 CSV 失败: {}", path.display()))?;
    let result = import_from_reader(&mut reader)?;
    info!(
        path = %path.display(),
        imported = result.observations.len(),
        errors = result.row_errors.len(),
        "价格历史导入完成"
    );
    Ok(result)
}

/// 从任意 reader 导入 (测试与内存数据用)
pub fn import_price_history<R: std::io::Read>(
    input: R,
) -> anyhow::Result<PriceHistoryImportResult> {
    let mut reader = csv::Reader::from_reader(input);
    import_from_reader(&mut reader)
}

fn import_from_reader<R: std::io::Read>(
    reader: &mut csv::Reader<R>,
) -> anyhow::Result<PriceHistoryImportResult> {
    let mut observations = Vec::new();
    let mut row_errors = Vec::new();

    for (idx, record) in reader.deserialize::<PriceHistoryRow>().enumerate() {
        let line = idx + 2; // 表头占第 1 行
        let row = match record {
            Ok(r) => r,
            Err(err) => {
                warn!(line, %err, "价格历史行解析失败");
                row_errors.push(RowError {
                    line,
                    message: err.to_string(),
                });
                continue;
            }
        };

        match parse_row(&row) {
            Ok(obs) => observations.push(obs),
            Err(message) => {
                warn!(line, %message, "价格历史行字段无效");
                row_errors.push(RowError { line, message });
            }
        }
    }

    Ok(PriceHistoryImportResult {
        observations,
        row_errors,
    })
}

fn parse_row(row: &PriceHistoryRow) -> Result<PriceObservation, String> {
    if row.articulo_erp_id.trim().is_empty() {
        return Err("articulo_erp_id 为空".to_string());
    }

    let effective_at = parse_fecha(&row.fecha)?;

    let unit_price: f64 = row
        .precio_calculado
        .trim()
        .parse()
        .map_err(|_| format!("precio_calculado 不是数字: {}", row.precio_calculado))?;
    if unit_price < 0.0 {
        return Err(format!("precio_calculado 为负: {}", unit_price));
    }

    Ok(PriceObservation {
        article_id: row.articulo_erp_id.trim().to_string(),
        effective_at,
        unit_price,
    })
}

// fecha 兼容两种导出格式: RFC3339 时间戳 / 纯日期 (按 UTC 零点)
fn parse_fecha(raw: &str) -> Result<DateTime<Utc>, String> {
    let trimmed = raw.trim();
    if let Ok(ts) = DateTime::parse_from_rfc3339(trimmed) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(date) = NaiveDate::parse_from_str(trimmed, "%Y-%m-%d") {
        if let Some(midnight) = date.and_hms_opt(0, 0, 0) {
            return Ok(DateTime::from_naive_utc_and_offset(midnight, Utc));
        }
    }
    Err(format!("fecha 格式无效: {}", raw))
}
