// tests/engine/report_engine_test.rs
#[path = "../common/mod.rs"]
mod common;

use std::sync::Arc;
use std::time::Duration;

use canteiro_bi::config::EngineSettings;
use canteiro_bi::engine::{execute, ConfigError, EngineError, EngineState, ReportEngine};
use canteiro_bi::model::DatePreset;
use canteiro_bi::storage::CellValue;
use chrono::NaiveDate;

#[tokio::test]
async fn test_currency_total_ignores_text_columns() {
    let mut engine = common::january_engine();
    engine.toggle_field("despesas", "valor");
    engine.toggle_field("despesas", "categoria");

    let output = engine.run(&common::storage()).await.unwrap();

    assert_eq!(output.rows.len(), 2);
    assert_eq!(output.aggregates.len(), 1);
    assert_eq!(output.total("valor"), Some(150.0));
    assert_eq!(output.total("categoria"), None);
}

#[tokio::test]
async fn test_mixed_tables_union_with_skipped_entity_filter() {
    let mut engine = common::january_engine();
    engine.toggle_field("despesas", "valor");
    engine.toggle_field("funcionarios", "nome");
    engine.set_entity_filter("cliente_id", "1");

    let storage = common::storage();
    let output = engine.run(&storage).await.unwrap();

    let origins: Vec<_> = output.rows.iter().map(|r| r.origin_table.as_str()).collect();
    assert_eq!(origins, ["despesas", "funcionarios", "funcionarios"]);
    assert_eq!(output.rows_from("funcionarios").count(), 2);
    assert_eq!(storage.call_count(), 2);

    // Rows only carry their own table's fields.
    assert_eq!(output.rows[0].get("nome"), None);
    assert_eq!(output.rows[1].get("valor"), None);
    assert_eq!(output.rows[1].get("nome"), Some(&CellValue::from("Ana")));
}

#[tokio::test]
async fn test_slow_table_does_not_reorder_output() {
    let mut engine = common::january_engine();
    engine.toggle_field("despesas", "valor");
    engine.toggle_field("funcionarios", "nome");
    engine.set_entity_filter("cliente_id", "1");

    let storage = common::storage().with_latency("despesas", Duration::from_millis(30));
    let output = engine.run(&storage).await.unwrap();

    let ids: Vec<_> = output.rows.iter().map(|r| r.id.to_string()).collect();
    assert_eq!(ids, ["1", "f1", "f2"]);
}

#[tokio::test]
async fn test_missing_end_date_issues_no_queries() {
    let mut engine = common::engine();
    engine.toggle_field("despesas", "valor");
    let mut filters = engine.report().filters.clone();
    filters.date_start = Some("2024-01-01".to_string());
    engine.set_filters(filters);

    let storage = common::storage();
    let err = engine.run(&storage).await.unwrap_err();

    assert!(matches!(err, EngineError::Config(ConfigError::MissingDateEnd)));
    assert!(err.is_config());
    assert_eq!(storage.call_count(), 0);
    assert_eq!(engine.state(), EngineState::Configuring);
}

#[tokio::test]
async fn test_no_fields_issues_no_queries() {
    let mut engine = common::january_engine();
    let storage = common::storage();

    let err = engine.run(&storage).await.unwrap_err();

    assert!(matches!(err, EngineError::Config(ConfigError::NoFieldsSelected)));
    assert_eq!(storage.call_count(), 0);
    assert_eq!(engine.state(), EngineState::Idle);
}

#[tokio::test]
async fn test_inverted_range_is_rejected() {
    let mut engine = common::engine();
    engine.toggle_field("despesas", "valor");
    engine.set_date_range("2024-02-01", "2024-01-01");

    let err = engine.run(&common::storage()).await.unwrap_err();
    assert!(matches!(
        err,
        EngineError::Config(ConfigError::InvalidDateRange { .. })
    ));
}

#[tokio::test]
async fn test_fetch_failure_fails_whole_run() {
    let mut engine = common::january_engine();
    engine.toggle_field("despesas", "valor");
    engine.toggle_field("funcionarios", "nome");

    let storage = common::storage().failing_table("despesas");
    let err = engine.run(&storage).await.unwrap_err();

    assert_eq!(err.failed_table(), Some("despesas"));
    assert_eq!(engine.state(), EngineState::Configuring);

    // The engine recovers once storage does.
    let output = engine.run(&common::storage()).await.unwrap();
    assert_eq!(output.rows.len(), 4);
}

#[tokio::test]
async fn test_dirty_values_count_as_zero() {
    let mut engine = common::january_engine();
    engine.toggle_field("receitas", "valor");
    engine.toggle_field("receitas", "parcela");

    let output = engine.run(&common::storage()).await.unwrap();

    assert_eq!(output.rows.len(), 2);
    assert_eq!(output.total("valor"), Some(1200.5));
    assert_eq!(output.total("parcela"), Some(3.0));
}

#[tokio::test]
async fn test_shared_key_shares_column_and_total() {
    let mut engine = common::january_engine();
    engine.toggle_field("despesas", "valor");
    engine.toggle_field("receitas", "valor");

    let output = engine.run(&common::storage()).await.unwrap();

    assert_eq!(output.columns.len(), 2);
    assert_eq!(output.total("valor"), Some(100.0 + 50.0 + 1200.5));
}

#[tokio::test]
async fn test_output_describes_columns_and_filters() {
    let mut engine = common::january_engine();
    engine.toggle_field("despesas", "data_despesa");
    engine.toggle_field("despesas", "pago");
    engine.toggle_field("despesas", "quantidade");
    engine.set_alias("despesas", "quantidade", "Qtd");

    let output = engine.run(&common::storage()).await.unwrap();

    let titles: Vec<_> = output.columns.iter().map(|c| c.title.as_str()).collect();
    assert_eq!(titles, ["Data", "Pago", "Qtd"]);
    let aggregated: Vec<_> = output.columns.iter().map(|c| c.aggregated).collect();
    assert_eq!(aggregated, [false, false, true]);
    assert_eq!(output.total("quantidade"), Some(3.0));
    assert_eq!(output.filters.date_range(), Some(("2024-01-01", "2024-01-31")));
    assert!(!output.truncated());
}

#[tokio::test]
async fn test_row_limit_from_settings() {
    let settings = EngineSettings {
        row_limit: 1,
        ..EngineSettings::default()
    };
    let mut engine = ReportEngine::new(Arc::new(common::catalog()), settings);
    engine.toggle_field("despesas", "valor");
    engine.set_date_range("2024-01-01", "2024-01-31");

    let output = engine.run(&common::storage()).await.unwrap();

    assert_eq!(output.rows.len(), 1);
    assert!(output.truncated());
}

#[tokio::test]
async fn test_preset_sets_date_range() {
    let mut engine = common::engine();
    engine.toggle_field("despesas", "valor");
    engine.apply_preset(
        DatePreset::ThisMonth,
        NaiveDate::from_ymd_opt(2024, 2, 14).unwrap(),
    );

    let output = engine.run(&common::storage()).await.unwrap();

    assert_eq!(output.filters.date_range(), Some(("2024-02-01", "2024-02-29")));
    assert_eq!(output.total("valor"), Some(999.0));
}

#[tokio::test]
async fn test_superseded_run_result_is_discarded() {
    let mut engine = common::january_engine();
    engine.toggle_field("despesas", "valor");
    let storage = common::storage();

    let first = engine.begin_run().unwrap();
    engine.set_entity_filter("cliente_id", "2");
    let second = engine.begin_run().unwrap();

    let fresh = execute(&second, &storage).await;
    let output = engine.finish_run(second.run, fresh).unwrap();
    assert_eq!(output.total("valor"), Some(50.0));

    let stale = execute(&first, &storage).await;
    assert!(stale.is_ok());
    let err = engine.finish_run(first.run, stale).unwrap_err();
    assert!(matches!(err, EngineError::Superseded { run } if run == first.run));
    assert_eq!(engine.state(), EngineState::Configuring);
}

#[tokio::test]
async fn test_run_ids_increase() {
    let mut engine = common::january_engine();
    engine.toggle_field("despesas", "valor");
    let storage = common::storage();

    let first = engine.run(&storage).await.unwrap();
    let second = engine.run(&storage).await.unwrap();

    assert!(second.run > first.run);
    assert_eq!(second.run.to_string(), "#2");
}

#[tokio::test]
async fn test_unpadded_date_range_matches_stored_dates() {
    let mut engine = common::engine();
    engine.toggle_field("despesas", "valor");
    engine.set_date_range("2024-1-1", "2024-1-31");

    let output = engine.run(&common::storage()).await.unwrap();

    assert_eq!(output.rows.len(), 2);
    assert_eq!(output.total("valor"), Some(150.0));
}

#[tokio::test]
async fn test_empty_result_totals_are_positive_zero() {
    let mut engine = common::engine();
    engine.toggle_field("despesas", "valor");
    engine.set_date_range("2030-01-01", "2030-01-31");

    let output = engine.run(&common::storage()).await.unwrap();

    assert!(output.rows.is_empty());
    assert_eq!(output.total("valor"), Some(0.0));
    assert!(output.total("valor").unwrap().is_sign_positive());
    assert!(serde_json::to_string(&output.aggregates)
        .unwrap()
        .contains(r#""valor":0.0"#));
}
