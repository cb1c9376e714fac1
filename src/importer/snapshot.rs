// ==========================================
// 餐饮成本核算引擎 - 快照包导入
// ==========================================
// 职责: 解析上游应用导出的 JSON 快照包
//       (物料/原料/半成品/配方/生产记录/价格观测 全量)
// 口径: 快照包内各集合的顺序即报表稳定顺序
// ==========================================

use crate::domain::article::{PriceObservation, RawArticle};
use crate::domain::elaboration::Elaboration;
use crate::domain::ingredient::Ingredient;
use crate::domain::production::ProductionRun;
use crate::domain::recipe::Recipe;
use anyhow::Context;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::info;

// ==========================================
// SnapshotBundle - 分析会话输入快照包
// ==========================================
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct SnapshotBundle {
    #[serde(default)]
    pub articles: Vec<RawArticle>,
    #[serde(default)]
    pub price_observations: Vec<PriceObservation>,
    #[serde(default)]
    pub ingredients: Vec<Ingredient>,
    #[serde(default)]
    pub elaborations: Vec<Elaboration>,
    #[serde(default)]
    pub recipes: Vec<Recipe>,
    #[serde(default)]
    pub production_runs: Vec<ProductionRun>,
}

impl SnapshotBundle {
    /// 从 JSON 字符串解析快照包
    pub fn from_json_str(json: &str) -> anyhow::Result<Self> {
        serde_json::from_str(json).context("快照包 JSON 解析失败")
    }

    /// 从 JSON 文件读取快照包
    pub fn from_json_file(path: &Path) -> anyhow::Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("读取快照包文件失败: {}", path.display()))?;
        let bundle = Self::from_json_str(&raw)?;
        info!(
            path = %path.display(),
            articles = bundle.articles.len(),
            ingredients = bundle.ingredients.len(),
            elaborations = bundle.elaborations.len(),
            recipes = bundle.recipes.len(),
            production_runs = bundle.production_runs.len(),
            observations = bundle.price_observations.len(),
            "快照包读取完成"
        );
        Ok(bundle)
    }
}
