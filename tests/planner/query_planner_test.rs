// tests/planner/query_planner_test.rs
#[path = "../common/mod.rs"]
mod common;

use canteiro_bi::config::EngineSettings;
use canteiro_bi::engine::ConfigError;
use canteiro_bi::model::{FilterSet, ReportDefinition, SelectedField};
use canteiro_bi::planner::QueryPlanner;
use canteiro_bi::storage::Predicate;

fn report(fields: &[(&str, &str)], filters: FilterSet) -> ReportDefinition {
    let catalog = common::catalog();
    let mut report = ReportDefinition::new("Teste").with_filters(filters);
    for (table, key) in fields {
        report.toggle_field(&catalog, table, key);
    }
    report
}

#[test]
fn test_only_tables_with_selected_fields_are_planned() {
    let catalog = common::catalog();
    let settings = EngineSettings::default();
    let planner = QueryPlanner::new(&catalog, &settings);

    let report = report(
        &[("funcionarios", "nome"), ("despesas", "valor"), ("funcionarios", "ativo")],
        FilterSet::between("2024-01-01", "2024-01-31"),
    );
    let plans = planner.plan(&report).unwrap();

    let tables: Vec<_> = plans.iter().map(|p| p.table.as_str()).collect();
    assert_eq!(tables, ["funcionarios", "despesas"]);
}

#[test]
fn test_empty_field_list_is_skipped() {
    let catalog = common::catalog();
    let settings = EngineSettings::default();
    let planner = QueryPlanner::new(&catalog, &settings);

    let plan = planner.plan_table("despesas", &[], &FilterSet::between("2024-01-01", "2024-01-31"));
    assert!(plan.is_none());
}

#[test]
fn test_projection_has_row_id_first_and_no_duplicates() {
    let catalog = common::catalog();
    let settings = EngineSettings::default();
    let planner = QueryPlanner::new(&catalog, &settings);

    let valor = SelectedField::from_descriptor(catalog.field("despesas", "valor").unwrap());
    let again = valor.clone();
    let id = SelectedField {
        field: "id".to_string(),
        ..valor.clone()
    };
    let plan = planner
        .plan_table("despesas", &[&valor, &again, &id], &FilterSet::default())
        .unwrap();

    assert_eq!(plan.columns, ["id", "valor"]);
}

#[test]
fn test_date_range_uses_table_date_column() {
    let catalog = common::catalog();
    let settings = EngineSettings::default();
    let planner = QueryPlanner::new(&catalog, &settings);

    let report = report(
        &[("despesas", "valor"), ("funcionarios", "nome")],
        FilterSet::between("2024-01-01", "2024-01-31"),
    );
    let plans = planner.plan(&report).unwrap();

    assert_eq!(
        plans[0].predicates,
        [
            Predicate::gte("data_despesa", "2024-01-01"),
            Predicate::lte("data_despesa", "2024-01-31"),
        ]
    );
    assert_eq!(
        plans[1].predicates,
        [
            Predicate::gte("created_at", "2024-01-01"),
            Predicate::lte("created_at", "2024-01-31"),
        ]
    );
}

#[test]
fn test_default_date_column_comes_from_settings() {
    let catalog = common::catalog();
    let settings = EngineSettings {
        default_date_column: "criado_em".to_string(),
        ..EngineSettings::default()
    };
    let planner = QueryPlanner::new(&catalog, &settings);

    let report = report(
        &[("funcionarios", "nome")],
        FilterSet::between("2024-01-01", "2024-01-31"),
    );
    let plans = planner.plan(&report).unwrap();

    assert_eq!(plans[0].predicate_on("criado_em").count(), 2);
}

#[test]
fn test_half_open_date_range_adds_no_date_predicates() {
    let catalog = common::catalog();
    let settings = EngineSettings::default();
    let planner = QueryPlanner::new(&catalog, &settings);

    let mut filters = FilterSet::default();
    filters.date_start = Some("2024-01-01".to_string());
    let report = report(&[("despesas", "valor")], filters);

    let plans = planner.plan(&report).unwrap();
    assert!(plans[0].predicates.is_empty());
}

#[test]
fn test_entity_filters_only_reach_supporting_tables() {
    let catalog = common::catalog();
    let settings = EngineSettings::default();
    let planner = QueryPlanner::new(&catalog, &settings);

    let filters = FilterSet::between("2024-01-01", "2024-01-31")
        .with_entity("cliente_id", "3")
        .with_entity("projeto_id", "all");
    let report = report(&[("despesas", "valor"), ("funcionarios", "nome")], filters);
    let plans = planner.plan(&report).unwrap();

    let despesas = &plans[0];
    assert_eq!(
        despesas.predicate_on("cliente_id").collect::<Vec<_>>(),
        [&Predicate::eq("cliente_id", "3")]
    );
    assert_eq!(despesas.predicate_on("projeto_id").count(), 0);

    let funcionarios = &plans[1];
    assert_eq!(funcionarios.predicate_on("cliente_id").count(), 0);
    assert_eq!(funcionarios.predicates.len(), 2);
}

#[test]
fn test_plan_display() {
    let catalog = common::catalog();
    let settings = EngineSettings::default();
    let planner = QueryPlanner::new(&catalog, &settings);

    let report = report(
        &[("despesas", "valor"), ("despesas", "categoria")],
        FilterSet::between("2024-01-01", "2024-01-31").with_entity("projeto_id", "10"),
    );
    let plans = planner.plan(&report).unwrap();

    assert_eq!(
        plans[0].to_string(),
        "despesas [id, valor, categoria] where data_despesa >= 2024-01-01 \
         and data_despesa <= 2024-01-31 and projeto_id = 10"
    );
}

#[test]
fn test_unknown_table_fails_planning() {
    let catalog = common::catalog();
    let settings = EngineSettings::default();
    let planner = QueryPlanner::new(&catalog, &settings);

    let mut report = report(&[("despesas", "valor")], FilterSet::default());
    report.fields[0].table = "orcamentos".to_string();

    assert_eq!(
        planner.plan(&report),
        Err(ConfigError::UnknownTable("orcamentos".to_string()))
    );
}

#[test]
fn test_unpadded_dates_are_normalized_in_predicates() {
    let catalog = common::catalog();
    let settings = EngineSettings::default();
    let planner = QueryPlanner::new(&catalog, &settings);

    let report = report(&[("despesas", "valor")], FilterSet::between("2024-1-1", "2024-1-31"));
    assert!(report.validate(&catalog).is_ok());

    let plans = planner.plan(&report).unwrap();
    assert_eq!(
        plans[0].predicates,
        [
            Predicate::gte("data_despesa", "2024-01-01"),
            Predicate::lte("data_despesa", "2024-01-31"),
        ]
    );
}
