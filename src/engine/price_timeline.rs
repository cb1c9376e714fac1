// ==========================================
// 餐饮成本核算引擎 - 价格时间线
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 4.1 Price Timeline
// ==========================================
// 职责: 按物料维护有序价格观测, 解析 "T 时点价格"
// 输入: ERP 物料主数据 + 价格观测
// 输出: price_at(article_id, T) 纯查询
// ==========================================
// 口径: 取 effective_at <= T 的最新观测;
//       T 早于首个观测时回退到最早观测 (最老已知价格作为地板, 不回退为 0);
//       完全无观测时回退到物料缓存现价;
//       现价也缺失则报 UnknownPrice
// 红线: 纯查询, 不得修改状态
// ==========================================

use crate::domain::article::{PriceObservation, RawArticle};
use crate::engine::error::{EngineError, EngineResult, GraphValidationError};
use chrono::{DateTime, Utc};
use std::collections::HashMap;
use tracing::debug;

// ==========================================
// PriceTimeline - 价格时间线
// ==========================================
// 装载时按物料预排序一次, 查询走二分
#[derive(Debug, Clone)]
pub struct PriceTimeline {
    // 每个物料的观测, 按 effective_at 升序
    observations: HashMap<String, Vec<PriceObservation>>,
    // 物料缓存现价 (无历史时的最终回退)
    current_prices: HashMap<String, f64>,
}

impl PriceTimeline {
    /// 装载价格时间线
    ///
    /// # 参数
    /// - `articles`: ERP 物料主数据 (提供缓存现价)
    /// - `observations`: 价格观测 (任意顺序, 装载时排序)
    ///
    /// # 错误
    /// - `DuplicateObservation`: 同一物料存在重复时间戳的观测
    pub fn load(
        articles: &[RawArticle],
        observations: Vec<PriceObservation>,
    ) -> Result<Self, GraphValidationError> {
        let mut by_article: HashMap<String, Vec<PriceObservation>> = HashMap::new();
        for obs in observations {
            by_article.entry(obs.article_id.clone()).or_default().push(obs);
        }

        for (article_id, series) in by_article.iter_mut() {
            series.sort_by_key(|o| o.effective_at);
            // 时间戳全序校验: 排序后相邻重复即违规
            for pair in series.windows(2) {
                if pair[0].effective_at == pair[1].effective_at {
                    return Err(GraphValidationError::DuplicateObservation {
                        article_id: article_id.clone(),
                        effective_at: pair[0].effective_at,
                    });
                }
            }
        }

        let current_prices = articles
            .iter()
            .filter_map(|a| a.current_price.map(|p| (a.article_id.clone(), p)))
            .collect();

        Ok(Self {
            observations: by_article,
            current_prices,
        })
    }

    /// 解析物料在 T 时点的单价
    ///
    /// # 返回
    /// - `Ok(price)`: 按回退口径解析出的单价
    /// - `Err(UnknownPrice)`: 无观测且无缓存现价
    pub fn price_at(&self, article_id: &str, as_of: DateTime<Utc>) -> EngineResult<f64> {
        if let Some(series) = self.observations.get(article_id) {
            if !series.is_empty() {
                // 二分: 第一个 effective_at > as_of 的位置
                let idx = series.partition_point(|o| o.effective_at <= as_of);
                if idx > 0 {
                    return Ok(series[idx - 1].unit_price);
                }
                // T 早于首个观测: 最老已知价格作为地板
                debug!(
                    article_id = %article_id,
                    %as_of,
                    "查询时点早于首个观测, 回退到最早已知价格"
                );
                return Ok(series[0].unit_price);
            }
        }

        match self.current_prices.get(article_id) {
            Some(price) => {
                debug!(article_id = %article_id, "无价格历史, 回退到缓存现价");
                Ok(*price)
            }
            None => Err(EngineError::UnknownPrice {
                article_id: article_id.to_string(),
            }),
        }
    }

    /// 物料的观测条数 (0 = 无历史)
    pub fn observation_count(&self, article_id: &str) -> usize {
        self.observations
            .get(article_id)
            .map(|s| s.len())
            .unwrap_or(0)
    }
}
