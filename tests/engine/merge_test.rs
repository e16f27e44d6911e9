// tests/engine/merge_test.rs
#[path = "../common/mod.rs"]
mod common;

use std::time::Duration;

use canteiro_bi::config::EngineSettings;
use canteiro_bi::engine::{fetch_and_merge, EngineError, MergeStrategy};
use canteiro_bi::model::{FilterSet, ReportDefinition};
use canteiro_bi::planner::{QueryPlanner, TablePlan};
use canteiro_bi::storage::{CellValue, StorageError};

fn plans(fields: &[(&str, &str)], filters: FilterSet) -> Vec<TablePlan> {
    let catalog = common::catalog();
    let settings = EngineSettings::default();
    let mut report = ReportDefinition::new("Teste").with_filters(filters);
    for (table, key) in fields {
        report.toggle_field(&catalog, table, key);
    }
    QueryPlanner::new(&catalog, &settings).plan(&report).unwrap()
}

fn january() -> FilterSet {
    FilterSet::between("2024-01-01", "2024-01-31")
}

#[tokio::test]
async fn test_union_concatenates_in_plan_order() {
    let storage = common::storage();
    let plans = plans(
        &[("despesas", "valor"), ("funcionarios", "nome")],
        january().with_entity("cliente_id", "1"),
    );

    let merged = fetch_and_merge(&plans, &storage, 1000, MergeStrategy::Union)
        .await
        .unwrap();

    let origins: Vec<_> = merged.rows.iter().map(|r| r.origin_table.as_str()).collect();
    assert_eq!(origins, ["despesas", "funcionarios", "funcionarios"]);
    assert_eq!(merged.rows[0].row.id(), &CellValue::from(1));
    assert_eq!(merged.rows[1].row.id(), &CellValue::from("f1"));
    assert_eq!(merged.rows[2].row.id(), &CellValue::from("f2"));
}

#[tokio::test]
async fn test_slow_first_table_keeps_order() {
    let storage = common::storage().with_latency("despesas", Duration::from_millis(50));
    let plans = plans(
        &[("despesas", "valor"), ("funcionarios", "nome")],
        january().with_entity("cliente_id", "1"),
    );

    let merged = fetch_and_merge(&plans, &storage, 1000, MergeStrategy::Union)
        .await
        .unwrap();

    let origins: Vec<_> = merged.rows.iter().map(|r| r.origin_table.as_str()).collect();
    assert_eq!(origins, ["despesas", "funcionarios", "funcionarios"]);
}

#[tokio::test]
async fn test_union_cardinality_is_sum_of_tables() {
    let storage = common::storage();
    let plans = plans(
        &[("despesas", "valor"), ("funcionarios", "nome"), ("receitas", "valor")],
        january(),
    );

    let merged = fetch_and_merge(&plans, &storage, 1000, MergeStrategy::Union)
        .await
        .unwrap();

    let counts: Vec<_> = merged.counts.iter().map(|c| (c.table.as_str(), c.rows)).collect();
    assert_eq!(counts, [("despesas", 2), ("funcionarios", 2), ("receitas", 2)]);
    assert_eq!(merged.rows.len(), 6);
    assert_eq!(storage.call_count(), 3);
}

#[tokio::test]
async fn test_single_table_fetches_once() {
    let storage = common::storage();
    let plans = plans(&[("despesas", "valor"), ("despesas", "categoria")], january());

    let merged = fetch_and_merge(&plans, &storage, 1000, MergeStrategy::Union)
        .await
        .unwrap();

    assert_eq!(merged.rows.len(), 2);
    assert_eq!(storage.call_count(), 1);

    let request = &storage.requests()[0];
    assert_eq!(request.columns, ["id", "valor", "categoria"]);
    assert_eq!(request.limit, 1000);
}

#[tokio::test]
async fn test_no_plans_merges_nothing() {
    let storage = common::storage();
    let merged = fetch_and_merge(&[], &storage, 1000, MergeStrategy::Union)
        .await
        .unwrap();

    assert!(merged.rows.is_empty());
    assert_eq!(storage.call_count(), 0);
}

#[tokio::test]
async fn test_row_limit_truncates_each_table() {
    let storage = common::storage();
    let plans = plans(&[("despesas", "valor"), ("funcionarios", "nome")], FilterSet::default());

    let merged = fetch_and_merge(&plans, &storage, 2, MergeStrategy::Union)
        .await
        .unwrap();

    assert_eq!(merged.rows.len(), 4);
    assert!(merged.counts.iter().all(|c| c.at_limit));
}

#[tokio::test]
async fn test_one_failed_table_fails_the_merge() {
    let storage = common::storage().failing_table("funcionarios");
    let plans = plans(&[("despesas", "valor"), ("funcionarios", "nome")], january());

    let err = fetch_and_merge(&plans, &storage, 1000, MergeStrategy::Union)
        .await
        .unwrap_err();

    assert_eq!(err.failed_table(), Some("funcionarios"));
    assert!(matches!(
        err,
        EngineError::Fetch {
            source: StorageError::Unavailable(_),
            ..
        }
    ));
    assert!(err.is_retriable());
    // Every fetch settles before the merge reports the failure.
    assert_eq!(storage.call_count(), 2);
}

#[tokio::test]
async fn test_first_failure_in_plan_order_is_reported() {
    let storage = common::storage()
        .failing_table("despesas")
        .failing_table("receitas");
    let plans = plans(&[("receitas", "valor"), ("despesas", "valor")], january());

    let err = fetch_and_merge(&plans, &storage, 1000, MergeStrategy::Union)
        .await
        .unwrap_err();

    assert_eq!(err.failed_table(), Some("receitas"));
}
