// ==========================================
// 餐饮成本核算引擎 - 组成图核心
// ==========================================
// 依据: Coste_Engine_Specs_v0.2.md - 4.2 BOM Graph
// 红线: 装载成功后图不可变, 遍历可安全并发
// 红线: 环检测是新增硬性前置 (历史实现无保护递归,
//       环数据会导致无限递归)
// ==========================================

use crate::domain::elaboration::{Component, Elaboration};
use crate::domain::ingredient::Ingredient;
use crate::domain::recipe::Recipe;
use crate::domain::types::{ComponentKind, NodeKind};
use crate::domain::article::RawArticle;
use crate::engine::error::GraphValidationError;
use std::collections::{HashMap, HashSet};
use tracing::{debug, info, warn};

use super::report::{GraphStats, GraphWarning};

// DFS 三色标记
#[derive(Clone, Copy, PartialEq)]
enum VisitState {
    InProgress, // 当前路径上
    Done,       // 已确认无环
}

// ==========================================
// BomGraph - 只读组成图
// ==========================================
// 节点按 ID 索引, 同时保留快照插入顺序
// (报表项顺序口径: 稳定的输入顺序, 无隐式二级排序)
#[derive(Debug, Clone)]
pub struct BomGraph {
    articles: HashMap<String, RawArticle>,
    ingredients: HashMap<String, Ingredient>,
    elaborations: HashMap<String, Elaboration>,
    recipes: HashMap<String, Recipe>,

    ingredient_order: Vec<String>,
    elaboration_order: Vec<String>,
    recipe_order: Vec<String>,

    // 产出批量非正的半成品 (成本按 0 解析)
    invalid_yield: HashSet<String>,
    warnings: Vec<GraphWarning>,
}

impl BomGraph {
    /// 装载并校验组成图
    ///
    /// # 校验顺序
    /// 1. 节点 ID 去重
    /// 2. 原料 ERP 绑定存在性
    /// 3. 组成项/配方行引用存在性
    /// 4. 产出批量 > 0 (违规降级为警告, 节点标记无效)
    /// 5. 半成品组成图环检测 (DFS)
    ///
    /// # 错误
    /// 结构性错误 (重复/缺引用/环) 致命, 整个分析会话终止
    pub fn load(
        articles: Vec<RawArticle>,
        ingredients: Vec<Ingredient>,
        elaborations: Vec<Elaboration>,
        recipes: Vec<Recipe>,
    ) -> Result<Self, GraphValidationError> {
        let mut graph = Self {
            articles: HashMap::new(),
            ingredients: HashMap::new(),
            elaborations: HashMap::new(),
            recipes: HashMap::new(),
            ingredient_order: Vec::new(),
            elaboration_order: Vec::new(),
            recipe_order: Vec::new(),
            invalid_yield: HashSet::new(),
            warnings: Vec::new(),
        };

        // 1. 节点索引 + 去重
        for article in articles {
            let id = article.article_id.clone();
            if graph.articles.insert(id.clone(), article).is_some() {
                return Err(GraphValidationError::DuplicateArticle { article_id: id });
            }
        }
        for ingredient in ingredients {
            let id = ingredient.ingredient_id.clone();
            if graph.ingredients.insert(id.clone(), ingredient).is_some() {
                return Err(GraphValidationError::DuplicateNode {
                    kind: NodeKind::Ingredient,
                    id,
                });
            }
            graph.ingredient_order.push(id);
        }
        for elaboration in elaborations {
            let id = elaboration.elaboration_id.clone();
            if graph.elaborations.insert(id.clone(), elaboration).is_some() {
                return Err(GraphValidationError::DuplicateNode {
                    kind: NodeKind::Elaboration,
                    id,
                });
            }
            graph.elaboration_order.push(id);
        }
        for recipe in recipes {
            let id = recipe.recipe_id.clone();
            if graph.recipes.insert(id.clone(), recipe).is_some() {
                return Err(GraphValidationError::DuplicateNode {
                    kind: NodeKind::Recipe,
                    id,
                });
            }
            graph.recipe_order.push(id);
        }

        // 2. 原料 ERP 绑定存在性
        for ingredient in graph.ingredients.values() {
            if let Some(link) = ingredient.article_link_id.as_deref() {
                if !link.trim().is_empty() && !graph.articles.contains_key(link) {
                    return Err(GraphValidationError::MissingArticleLink {
                        ingredient_id: ingredient.ingredient_id.clone(),
                        article_id: link.to_string(),
                    });
                }
            }
        }

        // 3. 引用存在性
        for elaboration in graph.elaborations.values() {
            for component in &elaboration.components {
                if !graph.component_target_exists(component) {
                    return Err(GraphValidationError::MissingReference {
                        owner_id: elaboration.elaboration_id.clone(),
                        component_id: component.component_id.clone(),
                        kind: component.kind.as_node_kind(),
                    });
                }
            }
        }
        for recipe in graph.recipes.values() {
            for line in &recipe.lines {
                if !graph.elaborations.contains_key(&line.elaboration_id) {
                    return Err(GraphValidationError::MissingReference {
                        owner_id: recipe.recipe_id.clone(),
                        component_id: line.elaboration_id.clone(),
                        kind: NodeKind::Elaboration,
                    });
                }
            }
        }

        // 4. 产出批量校验 (降级为警告)
        for id in &graph.elaboration_order {
            let elaboration = &graph.elaborations[id];
            if elaboration.yield_quantity <= 0.0 {
                warn!(
                    elaboration_id = %id,
                    name = %elaboration.name,
                    yield_quantity = elaboration.yield_quantity,
                    "半成品产出批量非正, 成本按 0 解析"
                );
                graph.invalid_yield.insert(id.clone());
                graph.warnings.push(GraphWarning::InvalidYield {
                    elaboration_id: id.clone(),
                    name: elaboration.name.clone(),
                    yield_quantity: elaboration.yield_quantity,
                });
            }
        }

        // 5. 环检测: 从每个半成品出发 DFS
        let mut state: HashMap<String, VisitState> = HashMap::new();
        for id in &graph.elaboration_order {
            if !state.contains_key(id) {
                let mut path = Vec::new();
                graph.detect_cycle(id, &mut state, &mut path)?;
            }
        }

        let stats = graph.stats();
        info!(
            articles = stats.article_count,
            ingredients = stats.ingredient_count,
            elaborations = stats.elaboration_count,
            recipes = stats.recipe_count,
            warnings = stats.warning_count,
            "组成图装载完成"
        );

        Ok(graph)
    }

    fn component_target_exists(&self, component: &Component) -> bool {
        match component.kind {
            ComponentKind::Ingredient => self.ingredients.contains_key(&component.component_id),
            ComponentKind::Elaboration => self.elaborations.contains_key(&component.component_id),
        }
    }

    // 三色 DFS: 当前路径上重见节点即为环
    fn detect_cycle(
        &self,
        id: &str,
        state: &mut HashMap<String, VisitState>,
        path: &mut Vec<String>,
    ) -> Result<(), GraphValidationError> {
        match state.get(id) {
            Some(VisitState::Done) => return Ok(()),
            Some(VisitState::InProgress) => {
                // 闭环: 截取从首次进入该节点起的路径段
                let start = path.iter().position(|p| p == id).unwrap_or(0);
                let mut cycle: Vec<String> = path[start..].to_vec();
                cycle.push(id.to_string());
                debug!(cycle = ?cycle, "检测到组成环");
                return Err(GraphValidationError::CyclicComposition { path: cycle });
            }
            None => {}
        }

        state.insert(id.to_string(), VisitState::InProgress);
        path.push(id.to_string());

        if let Some(elaboration) = self.elaborations.get(id) {
            for component in &elaboration.components {
                if component.kind == ComponentKind::Elaboration {
                    self.detect_cycle(&component.component_id, state, path)?;
                }
            }
        }

        path.pop();
        state.insert(id.to_string(), VisitState::Done);
        Ok(())
    }

    // ==========================================
    // 只读访问接口
    // ==========================================

    pub fn article(&self, id: &str) -> Option<&RawArticle> {
        self.articles.get(id)
    }

    pub fn ingredient(&self, id: &str) -> Option<&Ingredient> {
        self.ingredients.get(id)
    }

    pub fn elaboration(&self, id: &str) -> Option<&Elaboration> {
        self.elaborations.get(id)
    }

    pub fn recipe(&self, id: &str) -> Option<&Recipe> {
        self.recipes.get(id)
    }

    /// 指定类型节点是否存在
    pub fn contains(&self, kind: NodeKind, id: &str) -> bool {
        match kind {
            NodeKind::Ingredient => self.ingredients.contains_key(id),
            NodeKind::Elaboration => self.elaborations.contains_key(id),
            NodeKind::Recipe => self.recipes.contains_key(id),
        }
    }

    /// 节点显示名称
    pub fn node_name(&self, kind: NodeKind, id: &str) -> Option<&str> {
        match kind {
            NodeKind::Ingredient => self.ingredients.get(id).map(|n| n.name.as_str()),
            NodeKind::Elaboration => self.elaborations.get(id).map(|n| n.name.as_str()),
            NodeKind::Recipe => self.recipes.get(id).map(|n| n.name.as_str()),
        }
    }

    /// 半成品是否因产出批量非正被标记为无效
    pub fn has_invalid_yield(&self, elaboration_id: &str) -> bool {
        self.invalid_yield.contains(elaboration_id)
    }

    /// 装载期警告 (调用方可见)
    pub fn warnings(&self) -> &[GraphWarning] {
        &self.warnings
    }

    /// 按快照插入顺序迭代原料
    pub fn ingredients_in_order(&self) -> impl Iterator<Item = &Ingredient> {
        self.ingredient_order
            .iter()
            .filter_map(|id| self.ingredients.get(id))
    }

    /// 按快照插入顺序迭代半成品
    pub fn elaborations_in_order(&self) -> impl Iterator<Item = &Elaboration> {
        self.elaboration_order
            .iter()
            .filter_map(|id| self.elaborations.get(id))
    }

    /// 按快照插入顺序迭代配方
    pub fn recipes_in_order(&self) -> impl Iterator<Item = &Recipe> {
        self.recipe_order
            .iter()
            .filter_map(|id| self.recipes.get(id))
    }

    /// 指定类型的节点 ID, 按快照插入顺序
    pub fn ids_of_kind(&self, kind: NodeKind) -> &[String] {
        match kind {
            NodeKind::Ingredient => &self.ingredient_order,
            NodeKind::Elaboration => &self.elaboration_order,
            NodeKind::Recipe => &self.recipe_order,
        }
    }

    /// 装载统计
    pub fn stats(&self) -> GraphStats {
        GraphStats {
            article_count: self.articles.len(),
            ingredient_count: self.ingredients.len(),
            elaboration_count: self.elaborations.len(),
            recipe_count: self.recipes.len(),
            warning_count: self.warnings.len(),
        }
    }
}
