//! The rain/sprinkler/grass network, with fixtures built in memory

use std::collections::HashSet;
use sumout::{Assignment, Factor, FactorSource, SumoutError, TabularData, Variable};

fn table(columns: &[&str], records: &[&[&str]]) -> TabularData {
    TabularData::new(
        columns.iter().map(|c| c.to_string()).collect(),
        records.iter().map(|r| r.iter().map(|v| v.to_string()).collect()).collect()
    )
}

/// P(Rain)
fn factor_a() -> Factor {
    Factor::construct(table(&["Rain", "Value"], &[&["True", "0.2"], &["False", "0.8"]])).unwrap()
}

/// P(Sprinkler | Rain)
fn factor_b() -> Factor {
    Factor::construct(table(
        &["Rain", "Sprinkler", "Value"],
        &[
            &["True", "True", "0.01"],
            &["True", "False", "0.99"],
            &["False", "True", "0.4"],
            &["False", "False", "0.6"]
        ]
    )).unwrap()
}

/// P(Grass Wet | Sprinkler, Rain)
fn factor_c() -> Factor {
    Factor::construct(table(
        &["Rain", "Sprinkler", "Grass Wet", "Value"],
        &[
            &["True", "True", "True", "0.99"],
            &["True", "True", "False", "0.01"],
            &["True", "False", "True", "0.8"],
            &["True", "False", "False", "0.2"],
            &["False", "True", "True", "0.9"],
            &["False", "True", "False", "0.1"],
            &["False", "False", "True", "0.0"],
            &["False", "False", "False", "1.0"]
        ]
    )).unwrap()
}

fn names(f: &Factor) -> HashSet<&str> {
    f.scope().iter().map(|v| v.name()).collect()
}

fn set<'a>(names: &[&'a str]) -> HashSet<&'a str> {
    names.iter().cloned().collect()
}

fn weight(f: &Factor, pairs: &[(&str, &str)]) -> f64 {
    let assn: Assignment = pairs.iter().cloned().collect();
    f.value(&assn).unwrap().expect("missing row")
}

#[test]
fn summation_c() {
    let sum = factor_c().marginalize(&Variable::new("Sprinkler")).unwrap();
    assert_eq!(names(&sum), set(&["Rain", "Grass Wet"]));
    assert_eq!(sum.len(), 4);

    assert!((weight(&sum, &[("Rain", "True"), ("Grass Wet", "True")]) - 1.79).abs() < 1e-12);
    assert!((weight(&sum, &[("Rain", "True"), ("Grass Wet", "False")]) - 0.21).abs() < 1e-12);
    assert!((weight(&sum, &[("Rain", "False"), ("Grass Wet", "True")]) - 0.9).abs() < 1e-12);
    assert!((weight(&sum, &[("Rain", "False"), ("Grass Wet", "False")]) - 1.1).abs() < 1e-12);
}

#[test]
fn multiplication_a_b() {
    let product = factor_a().product(&factor_b()).unwrap();
    assert_eq!(names(&product), set(&["Rain", "Sprinkler"]));
    assert_eq!(product.len(), 4);

    assert_eq!(weight(&product, &[("Rain", "True"), ("Sprinkler", "True")]), 0.2 * 0.01);
    assert_eq!(weight(&product, &[("Rain", "True"), ("Sprinkler", "False")]), 0.2 * 0.99);
    assert_eq!(weight(&product, &[("Rain", "False"), ("Sprinkler", "True")]), 0.8 * 0.4);
    assert_eq!(weight(&product, &[("Rain", "False"), ("Sprinkler", "False")]), 0.8 * 0.6);
}

#[test]
fn probability_grass_wet() {
    // P(Grass Wet) = sum over Rain, Sprinkler of P(R) P(S | R) P(G | S, R)
    let joint = factor_a().product(&factor_b()).unwrap().product(&factor_c()).unwrap();
    assert!((joint.total() - 1.0).abs() < 1e-12);

    let wet = joint.marginalize(&Variable::new("Rain")).unwrap()
                   .marginalize(&Variable::new("Sprinkler")).unwrap();
    assert_eq!(names(&wet), set(&["Grass Wet"]));

    let expected = 0.2 * 0.01 * 0.99 + 0.2 * 0.99 * 0.8 + 0.8 * 0.4 * 0.9;
    assert!((weight(&wet, &[("Grass Wet", "True")]) - expected).abs() < 1e-12);
}

#[test]
fn summation_not_a_variable() {
    match factor_c().marginalize(&Variable::new("NotAVariable")) {
        Err(SumoutError::VariableNotInScope { variable, .. }) => assert_eq!(variable, "NotAVariable"),
        other => panic!("unexpected result {:?}", other)
    }
}

#[test]
fn init_empty_table() {
    match Factor::construct(TabularData::new(vec![], vec![])) {
        Err(SumoutError::InvalidInput(_)) => (),
        other => panic!("unexpected result {:?}", other)
    }
}

#[test]
fn init_explicit() {
    let source = FactorSource::Explicit {
        scope: vec![Variable::binary("Rain")],
        rows: vec![(vec!["True".to_string()], 0.2), (vec!["False".to_string()], 0.8)]
    };
    let f = Factor::construct(source).unwrap();
    assert!(f.is_complete());
    assert_eq!(names(&f), set(&["Rain"]));
}

#[test]
fn head_preview() {
    let preview = factor_c().head(2).to_string();
    assert_eq!(preview.lines().count(), 3);
    assert!(preview.starts_with("Rain"));
}
