mod common;

use common::{abc_store, name_length, strings, value};
use evalreport::content::RunQuery;
use evalreport::error::{ReportError, ReportResult};
use evalreport::logging;
use evalreport::report::{
    assemble_report, create_report, ColumnKey, DType, ReportAssembler, ScoreOutput, Value,
};
use evalreport::store::CatalogStore;
use rstest::rstest;

#[test]
fn test_scores_land_in_method_columns() {
    let store = abc_store();
    let table = assemble_report(
        &strings(&["M1", "M2"]),
        &strings(&["score"]),
        &[DType::Int],
        name_length,
        &store,
    )
    .unwrap();

    assert_eq!(table.index(), &strings(&["A", "B", "C"])[..]);
    assert_eq!(table.get("A", "score", "M1"), Some(&value(1)));
    assert_eq!(table.get("A", "score", "M2"), Some(&Value::Null));
    assert_eq!(table.get("B", "score", "M1"), Some(&value(1)));
    assert_eq!(table.get("B", "score", "M2"), Some(&value(1)));
    assert_eq!(table.get("C", "score", "M1"), Some(&Value::Null));
    assert_eq!(table.get("C", "score", "M2"), Some(&value(1)));
}

#[test]
fn test_unused_datasets_are_pruned() {
    let store = abc_store().with_dataset("D", "d.csv");
    let table = assemble_report(
        &strings(&["M1"]),
        &strings(&["score"]),
        &[DType::Int],
        name_length,
        &store,
    )
    .unwrap();

    assert_eq!(table.index(), &strings(&["A", "B"])[..]);
    assert!(table.row("C").is_none());
    assert!(table.row("D").is_none());
}

#[rstest]
#[case(&["ghost"], "ghost")]
#[case(&["M1", "ghost"], "ghost")]
#[case(&["nope", "M2", "ghost", "nope"], "nope, ghost")]
fn test_unknown_methods_are_rejected(#[case] methods: &[&str], #[case] expected: &str) {
    let store = abc_store();
    let mut calls = 0;
    let err = assemble_report(
        &strings(methods),
        &strings(&["score"]),
        &[DType::Int],
        |q: &RunQuery<'_>| {
            calls += 1;
            name_length(q)
        },
        &store,
    )
    .unwrap_err();

    match err {
        ReportError::MethodNotFound(names) => assert_eq!(names, expected),
        other => panic!("Expected MethodNotFound, got {:?}", other),
    }
    assert_eq!(calls, 0, "No scoring should happen before validation");
}

#[test]
fn test_no_methods_gives_empty_table() {
    let store = abc_store();
    let table = assemble_report(&[], &strings(&["score"]), &[DType::Int], name_length, &store)
        .unwrap();

    assert_eq!(table.n_cols(), 0);
    assert_eq!(table.n_rows(), 0);
    assert!(table.is_empty());
}

#[test]
fn test_dataset_missing_from_store_is_fatal() {
    let store = abc_store().with_method("M3", &["A", "Z"]);
    let err = assemble_report(
        &strings(&["M3"]),
        &strings(&["score"]),
        &[DType::Int],
        name_length,
        &store,
    )
    .unwrap_err();

    assert!(matches!(
        err,
        ReportError::DatasetHandleMissing { ref method, ref dataset } if method == "M3" && dataset == "Z"
    ));
}

#[test]
fn test_scoring_failure_aborts_assembly() {
    let store = abc_store();
    let err = assemble_report(
        &strings(&["M1", "M2"]),
        &strings(&["score"]),
        &[DType::Int],
        |q: &RunQuery<'_>| {
            if q.method_name() == "M2" && q.dataset_name() == "C" {
                Err(ReportError::Scoring("diverged".into()))
            } else {
                name_length(q)
            }
        },
        &store,
    )
    .unwrap_err();

    assert_eq!(err.to_string(), "Scoring Error: diverged");
}

#[test]
fn test_assembly_is_idempotent() {
    let store = abc_store();
    let methods = strings(&["M2", "M1"]);
    let fields = strings(&["score"]);

    let first = assemble_report(&methods, &fields, &[DType::Int], name_length, &store).unwrap();
    let second = assemble_report(&methods, &fields, &[DType::Int], name_length, &store).unwrap();
    assert_eq!(first, second);
}

#[test]
fn test_scalar_and_single_tuple_agree() {
    let store = abc_store();
    let methods = strings(&["M1", "M2"]);
    let fields = strings(&["score"]);

    let scalar = assemble_report(&methods, &fields, &[DType::Float], name_length, &store).unwrap();
    let tuple = assemble_report(
        &methods,
        &fields,
        &[DType::Float],
        |q: &RunQuery<'_>| Ok(ScoreOutput::tuple([q.dataset_name().len()])),
        &store,
    )
    .unwrap();

    assert_eq!(scalar, tuple);
}

#[test]
fn test_tuple_arity_must_match_fields() {
    let store = abc_store();
    let err = assemble_report(
        &strings(&["M1"]),
        &strings(&["score", "time"]),
        &[DType::Float, DType::Float],
        |_: &RunQuery<'_>| Ok(ScoreOutput::tuple([1.0, 2.0, 3.0])),
        &store,
    )
    .unwrap_err();

    assert!(matches!(err, ReportError::ScoreArity { expected: 2, got: 3 }));
}

#[test]
fn test_columns_are_field_major() {
    let store = abc_store();
    let table = assemble_report(
        &strings(&["M1", "M2"]),
        &strings(&["score", "time"]),
        &[DType::Int, DType::Float],
        |q: &RunQuery<'_>| {
            Ok(ScoreOutput::tuple([
                Value::from(q.dataset_name().len()),
                Value::from(0.5),
            ]))
        },
        &store,
    )
    .unwrap();

    assert_eq!(
        table.columns(),
        &[
            ColumnKey::new("score", "M1"),
            ColumnKey::new("score", "M2"),
            ColumnKey::new("time", "M1"),
            ColumnKey::new("time", "M2"),
        ]
    );
    assert_eq!(table.get("B", "time", "M2"), Some(&Value::Float(0.5)));
}

#[test]
fn test_lenient_coercion_keeps_unconvertible_values() {
    let store = abc_store();
    let table = assemble_report(
        &strings(&["M1", "M2"]),
        &strings(&["score"]),
        &[DType::Float],
        |q: &RunQuery<'_>| {
            Ok(match (q.method_name(), q.dataset_name()) {
                ("M1", "A") => ScoreOutput::scalar("0.25"),
                ("M2", "C") => ScoreOutput::scalar("n/a"),
                _ => ScoreOutput::scalar(2),
            })
        },
        &store,
    )
    .unwrap();

    assert_eq!(table.get("A", "score", "M1"), Some(&Value::Float(0.25)));
    assert_eq!(table.get("B", "score", "M2"), Some(&Value::Float(2.0)));
    assert_eq!(table.get("C", "score", "M2"), Some(&Value::Text("n/a".into())));
}

#[test]
fn test_duplicate_methods_collapse() {
    let store = abc_store();
    let table = assemble_report(
        &strings(&["M1", "M1"]),
        &strings(&["score"]),
        &[DType::Int],
        name_length,
        &store,
    )
    .unwrap();

    assert_eq!(table.methods(), vec!["M1"]);
    assert_eq!(table.n_cols(), 1);
}

#[test]
fn test_progress_style_does_not_change_result() {
    let store = abc_store();
    let methods = strings(&["M1", "M2"]);
    let fields = strings(&["score"]);

    let quiet = assemble_report(&methods, &fields, &[DType::Int], name_length, &store).unwrap();
    let drawn = ReportAssembler::new(&store)
        .with_progress(logging::progress_style())
        .assemble(&methods, &fields, &[DType::Int], name_length)
        .unwrap();
    assert_eq!(quiet, drawn);
}

#[rstest]
#[case(&["score", "score"], "score")]
#[case(&["score", "time", "score", "time", "score"], "score, time")]
fn test_duplicate_fields_are_rejected(#[case] fields: &[&str], #[case] expected: &str) {
    let store = abc_store();
    let mut calls = 0;
    let err = assemble_report(
        &strings(&["M1"]),
        &strings(fields),
        &vec![DType::Int; fields.len()],
        |_: &RunQuery<'_>| {
            calls += 1;
            Ok(ScoreOutput::tuple((1..=fields.len() as i64).collect::<Vec<_>>()))
        },
        &store,
    )
    .unwrap_err();

    match err {
        ReportError::DuplicateField(names) => assert_eq!(names, expected),
        other => panic!("Expected DuplicateField, got {:?}", other),
    }
    assert_eq!(calls, 0);
}

#[test]
fn test_create_report_returns_error_text() {
    let store = abc_store();
    let message = create_report(
        &strings(&["ghost"]),
        &strings(&["score"]),
        &[DType::Int],
        name_length,
        "Report",
        &store,
    );
    assert_eq!(message, "Methods not found: ghost");
}

#[test]
fn test_store_gateway_accepts_references() {
    let store = abc_store();
    let by_ref: &CatalogStore = &store;
    let table: ReportResult<_> = assemble_report(
        &strings(&["M2"]),
        &strings(&["score"]),
        &[DType::Int],
        name_length,
        &by_ref,
    );
    assert_eq!(table.unwrap().n_rows(), 2);
}
