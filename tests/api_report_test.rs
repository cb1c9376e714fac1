// ==========================================
// 分析 API 测试
// ==========================================
// 职责: 验证 AnalysisApi 会话装载, 查询接口与错误映射
// ==========================================

mod helpers;

use escandallo_engine::api::{AnalysisApi, ApiError};
use escandallo_engine::config::AdvisorConfig;
use escandallo_engine::domain::types::NodeKind;
use escandallo_engine::engine::GraphWarning;
use escandallo_engine::importer::snapshot::SnapshotBundle;
use helpers::test_data_builder::*;

fn build_api() -> AnalysisApi {
    let articles = vec![
        ArticleBuilder::new("A-HARINA")
            .name("Harina de trigo")
            .build(),
        ArticleBuilder::new("A-SIN-PRECIO")
            .name("Articulo sin precio")
            .build(),
    ];
    let observations = vec![
        observation("A-HARINA", day(2025, 1, 1), 0.80),
        observation("A-HARINA", day(2025, 3, 1), 1.00),
    ];
    let ingredients = vec![
        linked_ingredient("I-HARINA", "Harina", "A-HARINA"),
        linked_ingredient("I-SIN", "Sin precio", "A-SIN-PRECIO"),
    ];
    let elaborations = vec![
        ElaborationBuilder::new("E-MASA")
            .name("Masa de pizza")
            .yield_quantity(10.0)
            .ingredient("I-HARINA", 8.0, 0.05)
            .build(),
        // 产出批量无效: 装载警告, 成本按 0
        ElaborationBuilder::new("E-ROTA")
            .name("Batch roto")
            .yield_quantity(0.0)
            .ingredient("I-HARINA", 1.0, 0.0)
            .build(),
    ];
    let recipes = vec![RecipeBuilder::new("R-PIZZA")
        .name("Pizza margarita")
        .line("E-MASA", 2.0)
        .build()];
    let runs = vec![ProductionRunBuilder::new("E-MASA", day(2025, 2, 1))
        .planned_batch(10.0)
        .produced(10.0)
        .usage("I-HARINA", 8.0, 8.4, 0.05)
        .build()];

    AnalysisApi::load(
        articles,
        observations,
        ingredients,
        elaborations,
        recipes,
        runs,
        AdvisorConfig::default(),
    )
    .unwrap()
}

fn assert_close(actual: f64, expected: f64) {
    assert!(
        (actual - expected).abs() < 1e-9,
        "expected {}, got {}",
        expected,
        actual
    );
}

// ==========================================
// 会话装载
// ==========================================

#[test]
fn test_load_reports_stats_and_warnings() {
    let api = build_api();

    let stats = api.graph_stats();
    assert_eq!(stats.article_count, 2);
    assert_eq!(stats.elaboration_count, 2);
    assert_eq!(stats.recipe_count, 1);
    assert_eq!(stats.warning_count, 1);

    assert!(matches!(
        api.graph_warnings()[0],
        GraphWarning::InvalidYield { .. }
    ));
}

#[test]
fn test_from_bundle_roundtrip() {
    let json = r#"{
        "articles": [
            {
                "article_id": "A1",
                "name": "Aceite de oliva",
                "unit": "L",
                "current_price": 4.5,
                "supplier_name": null,
                "supplier_reference": null,
                "default_waste_fraction": null
            }
        ],
        "ingredients": [
            { "ingredient_id": "I1", "name": "Aceite", "article_link_id": "A1" }
        ]
    }"#;

    let bundle = SnapshotBundle::from_json_str(json).unwrap();
    let api = AnalysisApi::from_bundle(bundle).unwrap();

    // 无观测, 回退现价缓存
    let (cost, diags) = api
        .unit_cost(NodeKind::Ingredient, "I1", day(2025, 6, 1))
        .unwrap();
    assert_close(cost, 4.5);
    assert!(diags.is_empty());
}

#[test]
fn test_load_rejects_structural_errors() {
    let elaborations = vec![ElaborationBuilder::new("E-A")
        .elaboration("E-A", 1.0, 0.0)
        .build()];

    let result = AnalysisApi::load(
        vec![],
        vec![],
        vec![],
        elaborations,
        vec![],
        vec![],
        AdvisorConfig::default(),
    );
    assert!(matches!(result, Err(ApiError::GraphValidation(_))));
}

// ==========================================
// 查询接口
// ==========================================

#[test]
fn test_unit_cost_and_breakdown() {
    let api = build_api();

    let (cost, diags) = api
        .unit_cost(NodeKind::Elaboration, "E-MASA", day(2025, 3, 15))
        .unwrap();
    assert_close(cost, 0.84); // 8 * 1.00 * 1.05 / 10
    assert!(diags.is_empty());

    let breakdown = api.cost_breakdown("E-MASA", day(2025, 3, 15)).unwrap();
    assert_eq!(breakdown.lines.len(), 1);
    assert_close(breakdown.total_cost, 8.4);
    assert_close(breakdown.unit_cost, 0.84);
}

#[test]
fn test_variation_report_and_summary() {
    let api = build_api();

    let report = api
        .variation_report(NodeKind::Elaboration, day(2025, 1, 15), day(2025, 3, 15))
        .unwrap();
    // E-ROTA 两端都是 0: 仍在报表中, percent 零保护
    assert_eq!(report.items.len(), 2);

    let masa = report
        .items
        .iter()
        .find(|i| i.node_id == "E-MASA")
        .unwrap();
    assert_close(masa.percent, 25.0);

    let rota = report
        .items
        .iter()
        .find(|i| i.node_id == "E-ROTA")
        .unwrap();
    assert_close(rota.percent, 0.0);

    let summary = api.variation_summary(&report);
    assert_eq!(summary.item_count, 2);
    assert_eq!(summary.increase_count, 1);

    let snapshots = api.trend_snapshots(&report);
    assert!(!snapshots.is_empty());
}

#[test]
fn test_component_breakdown_over_window() {
    let api = build_api();

    let report = api
        .component_breakdown("E-MASA", day(2025, 1, 15), day(2025, 3, 15))
        .unwrap();
    assert_eq!(report.components.len(), 1);
    assert_close(report.unit_cost_from, 0.672);
    assert_close(report.unit_cost_to, 0.84);
    assert_close(report.components[0].percent, 25.0);
}

#[test]
fn test_yield_suggestions_and_stats() {
    let api = build_api();

    let suggestions = api.yield_suggestions("E-MASA").unwrap();
    assert_eq!(suggestions.len(), 1);
    assert_close(suggestions[0].average_usage_factor, 1.05);

    let stats = api.production_stats("E-MASA").unwrap();
    assert_eq!(stats.run_count, 1);
}

// ==========================================
// 错误映射
// ==========================================

#[test]
fn test_empty_id_maps_to_invalid_input() {
    let api = build_api();
    let result = api.unit_cost(NodeKind::Elaboration, "  ", day(2025, 1, 15));
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));
}

#[test]
fn test_reversed_window_maps_to_invalid_input() {
    let api = build_api();
    let result = api.variation_report(NodeKind::Elaboration, day(2025, 3, 15), day(2025, 1, 15));
    assert!(matches!(result, Err(ApiError::InvalidInput(_))));

    // 单日窗口合法
    let same_day = api.variation_report(NodeKind::Elaboration, day(2025, 1, 15), day(2025, 1, 15));
    assert!(same_day.is_ok());
}

#[test]
fn test_unknown_node_maps_to_not_found() {
    let api = build_api();
    let result = api.unit_cost(NodeKind::Recipe, "R-NO-EXISTE", day(2025, 1, 15));
    assert!(matches!(result, Err(ApiError::NotFound(_))));

    let result = api.yield_suggestions("E-NO-EXISTE");
    assert!(matches!(result, Err(ApiError::NotFound(_))));
}

#[test]
fn test_unknown_price_maps_to_missing_price_data() {
    let api = build_api();
    let result = api.unit_cost(NodeKind::Ingredient, "I-SIN", day(2025, 1, 15));
    assert!(matches!(
        result,
        Err(ApiError::MissingPriceData { ref article_id }) if article_id == "A-SIN-PRECIO"
    ));
}
