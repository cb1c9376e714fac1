// ==========================================
// 测试数据构建器 - 用于集成测试
// ==========================================

use chrono::{DateTime, TimeZone, Utc};
use escandallo_engine::domain::article::{PriceObservation, RawArticle};
use escandallo_engine::domain::elaboration::{Component, Elaboration};
use escandallo_engine::domain::ingredient::Ingredient;
use escandallo_engine::domain::production::{ComponentUsage, ProductionRun};
use escandallo_engine::domain::recipe::{Recipe, RecipeLine};
use escandallo_engine::domain::types::ComponentKind;

// ==========================================
// 时间辅助
// ==========================================

/// 指定日期的 UTC 零点
pub fn day(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0).unwrap()
}

// ==========================================
// RawArticle 构建器
// ==========================================

pub struct ArticleBuilder {
    article_id: String,
    name: String,
    unit: Option<String>,
    current_price: Option<f64>,
    supplier_name: Option<String>,
    supplier_reference: Option<String>,
    default_waste_fraction: Option<f64>,
}

impl ArticleBuilder {
    pub fn new(article_id: &str) -> Self {
        Self {
            article_id: article_id.to_string(),
            name: format!("Articulo {}", article_id),
            unit: Some("kg".to_string()),
            current_price: None,
            supplier_name: None,
            supplier_reference: None,
            default_waste_fraction: None,
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn current_price(mut self, price: f64) -> Self {
        self.current_price = Some(price);
        self
    }

    pub fn supplier(mut self, name: &str, reference: &str) -> Self {
        self.supplier_name = Some(name.to_string());
        self.supplier_reference = Some(reference.to_string());
        self
    }

    pub fn default_waste(mut self, fraction: f64) -> Self {
        self.default_waste_fraction = Some(fraction);
        self
    }

    pub fn build(self) -> RawArticle {
        RawArticle {
            article_id: self.article_id,
            name: self.name,
            unit: self.unit,
            current_price: self.current_price,
            supplier_name: self.supplier_name,
            supplier_reference: self.supplier_reference,
            default_waste_fraction: self.default_waste_fraction,
        }
    }
}

/// 价格观测记录
pub fn observation(article_id: &str, at: DateTime<Utc>, unit_price: f64) -> PriceObservation {
    PriceObservation {
        article_id: article_id.to_string(),
        effective_at: at,
        unit_price,
    }
}

/// 已绑定 ERP 物料的原料
pub fn linked_ingredient(ingredient_id: &str, name: &str, article_id: &str) -> Ingredient {
    Ingredient {
        ingredient_id: ingredient_id.to_string(),
        name: name.to_string(),
        article_link_id: Some(article_id.to_string()),
    }
}

/// 未绑定的原料 (成本按 0 解析)
pub fn unlinked_ingredient(ingredient_id: &str, name: &str) -> Ingredient {
    Ingredient {
        ingredient_id: ingredient_id.to_string(),
        name: name.to_string(),
        article_link_id: None,
    }
}

// ==========================================
// Elaboration 构建器
// ==========================================

pub struct ElaborationBuilder {
    elaboration_id: String,
    name: String,
    yield_quantity: f64,
    production_unit: Option<String>,
    components: Vec<Component>,
}

impl ElaborationBuilder {
    pub fn new(elaboration_id: &str) -> Self {
        Self {
            elaboration_id: elaboration_id.to_string(),
            name: format!("Elaboracion {}", elaboration_id),
            yield_quantity: 1.0,
            production_unit: Some("kg".to_string()),
            components: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn yield_quantity(mut self, quantity: f64) -> Self {
        self.yield_quantity = quantity;
        self
    }

    pub fn ingredient(mut self, ingredient_id: &str, quantity: f64, waste: f64) -> Self {
        self.components.push(Component {
            kind: ComponentKind::Ingredient,
            component_id: ingredient_id.to_string(),
            quantity,
            waste_fraction: waste,
        });
        self
    }

    pub fn elaboration(mut self, elaboration_id: &str, quantity: f64, waste: f64) -> Self {
        self.components.push(Component {
            kind: ComponentKind::Elaboration,
            component_id: elaboration_id.to_string(),
            quantity,
            waste_fraction: waste,
        });
        self
    }

    pub fn build(self) -> Elaboration {
        Elaboration {
            elaboration_id: self.elaboration_id,
            name: self.name,
            yield_quantity: self.yield_quantity,
            production_unit: self.production_unit,
            components: self.components,
        }
    }
}

// ==========================================
// Recipe 构建器
// ==========================================

pub struct RecipeBuilder {
    recipe_id: String,
    name: String,
    category: Option<String>,
    lines: Vec<RecipeLine>,
}

impl RecipeBuilder {
    pub fn new(recipe_id: &str) -> Self {
        Self {
            recipe_id: recipe_id.to_string(),
            name: format!("Receta {}", recipe_id),
            category: None,
            lines: Vec::new(),
        }
    }

    pub fn name(mut self, name: &str) -> Self {
        self.name = name.to_string();
        self
    }

    pub fn category(mut self, category: &str) -> Self {
        self.category = Some(category.to_string());
        self
    }

    pub fn line(mut self, elaboration_id: &str, quantity: f64) -> Self {
        self.lines.push(RecipeLine {
            elaboration_id: elaboration_id.to_string(),
            quantity,
        });
        self
    }

    pub fn build(self) -> Recipe {
        Recipe {
            recipe_id: self.recipe_id,
            name: self.name,
            category: self.category,
            lines: self.lines,
        }
    }
}

// ==========================================
// ProductionRun 构建器
// ==========================================

pub struct ProductionRunBuilder {
    elaboration_id: String,
    produced_at: DateTime<Utc>,
    planned_batch_quantity: f64,
    produced_quantity: Option<f64>,
    component_usages: Vec<ComponentUsage>,
}

impl ProductionRunBuilder {
    pub fn new(elaboration_id: &str, produced_at: DateTime<Utc>) -> Self {
        Self {
            elaboration_id: elaboration_id.to_string(),
            produced_at,
            planned_batch_quantity: 1.0,
            produced_quantity: None,
            component_usages: Vec::new(),
        }
    }

    pub fn planned_batch(mut self, quantity: f64) -> Self {
        self.planned_batch_quantity = quantity;
        self
    }

    pub fn produced(mut self, quantity: f64) -> Self {
        self.produced_quantity = Some(quantity);
        self
    }

    pub fn usage(mut self, component_id: &str, planned: f64, used: f64, waste: f64) -> Self {
        self.component_usages.push(ComponentUsage {
            component_id: component_id.to_string(),
            component_name: format!("Componente {}", component_id),
            planned_quantity: planned,
            used_quantity: used,
            waste_fraction: waste,
        });
        self
    }

    pub fn build(self) -> ProductionRun {
        ProductionRun {
            elaboration_id: self.elaboration_id,
            produced_at: self.produced_at,
            planned_batch_quantity: self.planned_batch_quantity,
            produced_quantity: self.produced_quantity,
            component_usages: self.component_usages,
        }
    }
}
