use gradebookd::{
    average_for_category, final_grade, format_grade, Assignment, Catalog, Category, Ledger, Topic,
};

fn topic(n: f64, p: f64, e: f64, o: f64) -> Topic {
    Topic {
        id: "1".to_string(),
        name: "Topic".to_string(),
        notebook_weight: n,
        practice_weight: p,
        exam_weight: e,
        other_weight: o,
        ..Topic::default()
    }
}

fn mixed_assignments() -> Vec<Assignment> {
    vec![
        Assignment::new("n1", "Notes 1", Category::Notebook),
        Assignment::new("p1", "Lab 1", Category::Practices),
        Assignment::new("n2", "Notes 2", Category::Notebook),
        Assignment::new("e1", "Exam 1", Category::Exam),
        Assignment::new("n3", "Notes 3", Category::Notebook),
        Assignment::new("p2", "Lab 2", Category::Practices),
        Assignment::new("o1", "Poster", Category::Others),
        Assignment::new("e2", "Exam 2", Category::Exam),
    ]
}

fn mixed_ledger() -> Ledger {
    let mut ledger = Ledger::new();
    ledger.record("s1", "n1", 0.1);
    ledger.record("s1", "n2", 0.2);
    ledger.record("s1", "n3", 0.3);
    ledger.record("s1", "p1", "7.77");
    ledger.record("s1", "p2", 3.3333);
    ledger.record("s1", "e1", 1e16);
    ledger.record("s1", "e2", 1.0);
    ledger.record("s1", "o1", 9.99);
    ledger
}

#[test]
fn documented_example_weights_to_60() {
    let catalog = Catalog::from_assignments(vec![
        Assignment::new("n1", "Notes", Category::Notebook),
        Assignment::new("p1", "Lab", Category::Practices),
        Assignment::new("e1", "Exam", Category::Exam),
    ]);
    let mut ledger = Ledger::new();
    ledger.record("s1", "n1", 80.0);
    ledger.record("s1", "p1", 60.0);
    ledger.record("s1", "e1", 100.0);

    let result = final_grade("s1", &topic(25.0, 25.0, 25.0, 25.0), &catalog, &ledger);
    assert_eq!(result.final_grade, 60.0);
    assert_eq!(format_grade(result.final_grade), "60");
}

#[test]
fn empty_categories_average_to_exactly_zero() {
    let catalog = Catalog::from_assignments(mixed_assignments());
    let ledger = Ledger::new();
    for category in Category::ALL {
        let avg = average_for_category("s1", category, &catalog, &ledger);
        assert_eq!(avg.to_bits(), 0.0_f64.to_bits(), "{}", category);
    }
}

#[test]
fn no_grades_means_zero_final_for_any_weights() {
    let catalog = Catalog::from_assignments(mixed_assignments());
    let ledger = Ledger::new();
    for t in [
        topic(25.0, 25.0, 25.0, 25.0),
        topic(100.0, 0.0, 0.0, 0.0),
        topic(10.0, 20.0, 30.0, 40.0),
        topic(0.0, 0.0, 0.0, 0.0),
    ] {
        assert_eq!(final_grade("s1", &t, &catalog, &ledger).final_grade, 0.0);
    }
}

#[test]
fn final_grade_ignores_assignment_order() {
    let ledger = mixed_ledger();
    let t = topic(10.0, 20.0, 30.0, 40.0);
    let base = mixed_assignments();
    let expected = final_grade("s1", &t, &Catalog::from_assignments(base.clone()), &ledger);

    let mut orders: Vec<Vec<Assignment>> = Vec::new();
    for shift in 0..base.len() {
        let mut rotated = base.clone();
        rotated.rotate_left(shift);
        orders.push(rotated.clone());
        rotated.reverse();
        orders.push(rotated);
    }

    for order in orders {
        let got = final_grade("s1", &t, &Catalog::from_assignments(order), &ledger);
        assert_eq!(got.final_grade.to_bits(), expected.final_grade.to_bits());
        for category in Category::ALL {
            assert_eq!(
                got.per_category[category].average.to_bits(),
                expected.per_category[category].average.to_bits()
            );
        }
    }
}

#[test]
fn repeated_calls_are_bit_identical() {
    let catalog = Catalog::from_assignments(mixed_assignments());
    let ledger = mixed_ledger();
    let t = topic(12.5, 37.5, 30.0, 20.0);

    let first = final_grade("s1", &t, &catalog, &ledger);
    let second = final_grade("s1", &t, &catalog, &ledger);
    assert_eq!(first, second);
    assert_eq!(first.final_grade.to_bits(), second.final_grade.to_bits());
}

#[test]
fn recorded_grade_is_counted_exactly_once() {
    let catalog = Catalog::from_assignments(vec![
        Assignment::new("e1", "Exam 1", Category::Exam),
        Assignment::new("e2", "Exam 2", Category::Exam),
    ]);
    let mut ledger = Ledger::new();

    ledger.record("s1", "e1", 90.0);
    assert_eq!(average_for_category("s1", Category::Exam, &catalog, &ledger), 90.0);

    ledger.record("s1", "e1", 60.0);
    assert_eq!(average_for_category("s1", Category::Exam, &catalog, &ledger), 60.0);

    ledger.record("s1", "e2", 80.0);
    assert_eq!(average_for_category("s1", Category::Exam, &catalog, &ledger), 70.0);

    ledger.clear("s1", "e1");
    assert_eq!(average_for_category("s1", Category::Exam, &catalog, &ledger), 80.0);
}

#[test]
fn missing_weight_fields_count_as_zero() {
    let t: Topic = serde_json::from_value(serde_json::json!({
        "id": 3,
        "name": "Partial",
        "examWeight": 100
    }))
    .expect("parse topic");
    let catalog = Catalog::from_assignments(mixed_assignments());
    let mut ledger = Ledger::new();
    ledger.record("s1", "n1", 100.0);
    ledger.record("s1", "e1", 50.0);

    let result = final_grade("s1", &t, &catalog, &ledger);
    assert_eq!(result.per_category[Category::Notebook].weighted_value, 0.0);
    assert_eq!(result.final_grade, 50.0);
}

#[test]
fn unbalanced_weights_are_not_rechecked() {
    let catalog = Catalog::from_assignments(vec![Assignment::new("e1", "Exam", Category::Exam)]);
    let mut ledger = Ledger::new();
    ledger.record("s1", "e1", 80.0);

    // Weights sum to 150; the result is simply scaled, not rejected.
    let result = final_grade("s1", &topic(0.0, 0.0, 150.0, 0.0), &catalog, &ledger);
    assert_eq!(result.final_grade, 120.0);
}

#[test]
fn fractional_finals_render_with_two_decimals() {
    let catalog = Catalog::from_assignments(vec![
        Assignment::new("n1", "Notes 1", Category::Notebook),
        Assignment::new("n2", "Notes 2", Category::Notebook),
        Assignment::new("n3", "Notes 3", Category::Notebook),
    ]);
    let mut ledger = Ledger::new();
    ledger.record("s1", "n1", 7.0);
    ledger.record("s1", "n2", 8.0);
    ledger.record("s1", "n3", 8.0);

    let result = final_grade("s1", &topic(100.0, 0.0, 0.0, 0.0), &catalog, &ledger);
    assert_eq!(format_grade(result.final_grade), "7.67");
}

#[test]
fn ids_shared_across_categories_count_in_each() {
    let catalog = Catalog::from_assignments(vec![
        Assignment::new("1", "Cuaderno", Category::Notebook),
        Assignment::new("1", "Examen", Category::Exam),
    ]);
    let mut ledger = Ledger::new();
    ledger.record("7", "1", 80.0);

    assert_eq!(catalog.dropped(), 0);
    assert_eq!(average_for_category("7", Category::Exam, &catalog, &ledger), 80.0);
    let result = final_grade("7", &topic(50.0, 0.0, 50.0, 0.0), &catalog, &ledger);
    assert_eq!(result.final_grade, 80.0);
}
