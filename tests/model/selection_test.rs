// tests/model/selection_test.rs
#[path = "../common/mod.rs"]
mod common;

use canteiro_bi::model::{FilterSet, ReportDefinition, Toggle};

#[test]
fn test_toggle_twice_restores_selection() {
    let catalog = common::catalog();
    let mut report = ReportDefinition::new("Despesas");
    report.toggle_field(&catalog, "despesas", "valor");
    let before = report.fields.clone();

    assert_eq!(report.toggle_field(&catalog, "despesas", "categoria"), Toggle::Added);
    assert_eq!(report.toggle_field(&catalog, "despesas", "categoria"), Toggle::Removed);

    assert_eq!(report.fields, before);
}

#[test]
fn test_selection_keeps_insertion_order() {
    let catalog = common::catalog();
    let mut report = ReportDefinition::new("Mix");
    report.toggle_field(&catalog, "funcionarios", "nome");
    report.toggle_field(&catalog, "despesas", "valor");
    report.toggle_field(&catalog, "funcionarios", "salario");

    let keys: Vec<_> = report
        .fields
        .iter()
        .map(|f| format!("{}.{}", f.table, f.field))
        .collect();
    assert_eq!(keys, ["funcionarios.nome", "despesas.valor", "funcionarios.salario"]);
    assert_eq!(report.tables(), ["funcionarios", "despesas"]);
}

#[test]
fn test_same_key_in_two_tables_is_two_selections() {
    let catalog = common::catalog();
    let mut report = ReportDefinition::new("Fluxo");
    report.toggle_field(&catalog, "despesas", "valor");
    report.toggle_field(&catalog, "receitas", "valor");

    assert_eq!(report.fields.len(), 2);
    assert!(report.is_selected("despesas", "valor"));
    assert!(report.is_selected("receitas", "valor"));

    report.toggle_field(&catalog, "receitas", "valor");
    assert!(report.is_selected("despesas", "valor"));
    assert!(!report.is_selected("receitas", "valor"));
}

#[test]
fn test_toggle_unknown_field_is_ignored() {
    let catalog = common::catalog();
    let mut report = ReportDefinition::new("Despesas");

    assert_eq!(
        report.toggle_field(&catalog, "despesas", "nao_existe"),
        Toggle::NotInCatalog
    );
    assert_eq!(
        report.toggle_field(&catalog, "orcamentos", "valor"),
        Toggle::NotInCatalog
    );
    assert!(report.fields.is_empty());
}

#[test]
fn test_selection_captures_label_and_type() {
    let catalog = common::catalog();
    let mut report = ReportDefinition::new("Folha");
    report.toggle_field(&catalog, "funcionarios", "salario");

    let field = &report.fields[0];
    assert_eq!(field.alias, "Salário");
    assert_eq!(field.value_type.as_str(), "currency");
}

#[test]
fn test_alias_and_reset() {
    let catalog = common::catalog();
    let mut report = ReportDefinition::new("Despesas");
    report.toggle_field(&catalog, "despesas", "valor");

    assert!(report.set_alias(&catalog, "despesas", "valor", "Custo"));
    assert_eq!(report.fields[0].alias, "Custo");

    assert!(report.set_alias(&catalog, "despesas", "valor", "  "));
    assert_eq!(report.fields[0].alias, "Valor");

    assert!(!report.set_alias(&catalog, "despesas", "categoria", "Tipo"));
}

#[test]
fn test_move_field_clamps_index() {
    let catalog = common::catalog();
    let mut report = ReportDefinition::new("Despesas");
    report.toggle_field(&catalog, "despesas", "valor");
    report.toggle_field(&catalog, "despesas", "categoria");
    report.toggle_field(&catalog, "despesas", "pago");

    assert!(report.move_field("despesas", "valor", 99));
    assert!(report.move_field("despesas", "pago", 0));

    let keys: Vec<_> = report.fields.iter().map(|f| f.field.as_str()).collect();
    assert_eq!(keys, ["pago", "categoria", "valor"]);
    assert!(!report.move_field("despesas", "quantidade", 0));
}

#[test]
fn test_clear_fields_keeps_filters() {
    let catalog = common::catalog();
    let mut report = ReportDefinition::new("Despesas")
        .with_filters(FilterSet::between("2024-01-01", "2024-01-31"));
    report.toggle_field(&catalog, "despesas", "valor");
    report.clear_fields();

    assert!(report.fields.is_empty());
    assert_eq!(report.filters.date_range(), Some(("2024-01-01", "2024-01-31")));
}

#[test]
fn test_validate_reports_first_problem() {
    let catalog = common::catalog();
    let mut report = ReportDefinition::new("Despesas");
    assert_eq!(
        report.validate(&catalog),
        Err(canteiro_bi::engine::ConfigError::NoFieldsSelected)
    );

    report.toggle_field(&catalog, "despesas", "valor");
    report.filters.date_start = Some("2024-01-01".to_string());
    assert_eq!(
        report.validate(&catalog),
        Err(canteiro_bi::engine::ConfigError::MissingDateEnd)
    );

    report.filters.date_end = Some("2023-12-31".to_string());
    assert!(matches!(
        report.validate(&catalog),
        Err(canteiro_bi::engine::ConfigError::InvalidDateRange { .. })
    ));
}
