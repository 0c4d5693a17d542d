//! Integration tests for the validation checks.

use std::collections::BTreeMap;

use ticdat_model::{
    DataInput, DataSet, Key, PredicateArgs, RowId, RowInput, RowPredicate, Schema, SchemaBuilder,
    TableInput, TicDat, TicDatError, TypeConstraint, Value,
};
use ticdat_validate::{
    PredicateFailures, find_data_row_failures, find_data_type_failures, find_duplicates,
    find_foreign_key_failures, validate, validate_input,
};

fn min_max_predicate() -> RowPredicate {
    RowPredicate::with_message(|row, args| {
        let min = row.number("Min Nutrition").unwrap_or_default();
        let max = row.number("Max Nutrition").unwrap_or_default();
        let adjuster = args.get("adjuster").and_then(Value::as_f64).unwrap_or(1.0);
        if max >= min * adjuster {
            Ok(())
        } else {
            Err(format!(
                "Max Nutrition {max} is smaller than Min Nutrition {min} times {adjuster}"
            ))
        }
    })
    .with_args(|context| {
        PredicateArgs::from([(
            "adjuster".to_string(),
            context
                .parameters
                .get("Adjuster")
                .cloned()
                .unwrap_or(Value::from(1.0)),
        )])
    })
}

fn diet_schema() -> Schema {
    let mut builder = SchemaBuilder::new();
    builder
        .add_table("categories", ["Name"], ["Min Nutrition", "Max Nutrition"])
        .expect("categories");
    builder.add_table("foods", ["Name"], ["Cost"]).expect("foods");
    builder
        .add_table("nutrition_quantities", ["Food", "Category"], ["Quantity"])
        .expect("nutrition_quantities");
    builder
        .add_table("parameters", ["Name"], ["Value"])
        .expect("parameters");
    builder
        .set_default_value("categories", "Max Nutrition", f64::INFINITY)
        .expect("default");
    let non_negative = TypeConstraint::builder().build().expect("type");
    builder
        .set_data_type("foods", "Cost", non_negative.clone())
        .expect("cost type");
    builder
        .set_data_type("nutrition_quantities", "Quantity", non_negative)
        .expect("quantity type");
    builder
        .add_foreign_key("nutrition_quantities", "foods", [("Food", "Name")])
        .expect("fk foods");
    builder
        .add_foreign_key("nutrition_quantities", "categories", [("Category", "Name")])
        .expect("fk categories");
    builder
        .add_data_row_predicate("categories", "Min Max Check", min_max_predicate())
        .expect("predicate");
    builder
        .add_parameter(
            "Adjuster",
            1.0,
            Some(TypeConstraint::builder().build().expect("type")),
        )
        .expect("parameter");
    builder.build().expect("schema")
}

fn diet_data(schema: &Schema) -> TicDat {
    let mut dat = schema.tic_dat();
    let foods = dat.table_mut("foods").expect("foods");
    foods.insert("pizza", 2.5).expect("pizza");
    foods.insert("salad", 1.0).expect("salad");
    let categories = dat.table_mut("categories").expect("categories");
    categories
        .insert("protein", RowInput::from([("Min Nutrition", 91.0), ("Max Nutrition", 100.0)]))
        .expect("protein");
    categories
        .insert("fat", RowInput::from([("Min Nutrition", 0.0)]))
        .expect("fat");
    let quantities = dat
        .table_mut("nutrition_quantities")
        .expect("nutrition_quantities");
    quantities.insert(("pizza", "protein"), 15.0).expect("row");
    quantities.insert(("salad", "fat"), 0.5).expect("row");
    dat
}

#[test]
fn clean_diet_passes_every_check() {
    let schema = diet_schema();
    let dat = diet_data(&schema).freeze();
    let report = validate(&schema, &dat).expect("validate");
    assert!(report.is_clean(), "{}", report.render_text());
}

#[test]
fn dangling_food_reported_against_the_row() {
    let schema = diet_schema();
    let mut dat = diet_data(&schema);
    dat.table_mut("nutrition_quantities")
        .expect("table")
        .insert(("pop", "protein"), 1.0)
        .expect("row");

    let failures = find_foreign_key_failures(&schema, &dat).expect("check");
    let rows = failures.get("nutrition_quantities").expect("failing table");
    assert_eq!(rows.len(), 1);
    let fks = rows
        .get(&RowId::Key(Key::from(("pop", "protein"))))
        .expect("failing row");
    assert_eq!(fks.len(), 1);
    let fk = fks.iter().next().expect("foreign key");
    assert_eq!(fk.foreign_table, "foods");
}

#[test]
fn compound_foreign_key_on_netflow() {
    let mut builder = SchemaBuilder::new();
    builder.add_table("nodes", ["Name"], Vec::<String>::new()).expect("nodes");
    builder
        .add_table("arcs", ["Source", "Destination"], ["Capacity"])
        .expect("arcs");
    builder
        .add_table("cost", ["Commodity", "Source", "Destination"], ["Cost"])
        .expect("cost");
    builder
        .add_foreign_key("arcs", "nodes", [("Source", "Name")])
        .expect("fk");
    builder
        .add_foreign_key("cost", "arcs", [("Source", "Source"), ("Destination", "Destination")])
        .expect("fk");
    let schema = builder.build().expect("schema");

    let mut dat = schema.tic_dat();
    let nodes = dat.table_mut("nodes").expect("nodes");
    nodes.insert("Detroit", RowInput::empty()).expect("node");
    nodes.insert("Boston", RowInput::empty()).expect("node");
    let arcs = dat.table_mut("arcs").expect("arcs");
    arcs.insert(("Detroit", "Boston"), 100.0).expect("arc");
    arcs.insert(("Denver", "Boston"), 120.0).expect("arc");
    let cost = dat.table_mut("cost").expect("cost");
    cost.insert(("Pencils", "Detroit", "Boston"), 10.0).expect("cost");
    cost.insert(("Pencils", "Boston", "Detroit"), 10.0).expect("cost");

    let failures = find_foreign_key_failures(&schema, &dat).expect("check");
    assert_eq!(
        failures["arcs"].keys().collect::<Vec<_>>(),
        vec![&RowId::Key(Key::from(("Denver", "Boston")))]
    );
    assert_eq!(
        failures["cost"].keys().collect::<Vec<_>>(),
        vec![&RowId::Key(Key::from(("Pencils", "Boston", "Detroit")))]
    );
}

#[test]
fn partial_foreign_key_matches_any_parent() {
    let mut builder = SchemaBuilder::new();
    builder
        .add_table("arcs", ["Source", "Destination"], Vec::<String>::new())
        .expect("arcs");
    builder
        .add_table("supply", Vec::<String>::new(), ["Node", "Quantity"])
        .expect("supply");
    builder
        .add_foreign_key("supply", "arcs", [("Node", "Source")])
        .expect("fk");
    let schema = builder.build().expect("schema");

    let mut dat = schema.tic_dat();
    dat.table_mut("arcs")
        .expect("arcs")
        .insert(("Detroit", "Boston"), RowInput::empty())
        .expect("arc");
    let supply = dat.table_mut("supply").expect("supply");
    supply
        .push(vec![Value::text("Detroit"), Value::from(5.0)])
        .expect("row");
    supply
        .push(vec![Value::text("Boston"), Value::from(5.0)])
        .expect("row");

    let failures = find_foreign_key_failures(&schema, &dat).expect("check");
    assert_eq!(
        failures["supply"].keys().collect::<Vec<_>>(),
        vec![&RowId::Index(1)]
    );
}

#[test]
fn data_type_failures_collect_values_and_rows() {
    let schema = diet_schema();
    let mut dat = diet_data(&schema);
    let foods = dat.table_mut("foods").expect("foods");
    foods.insert("pizza", -2.0).expect("row");
    foods.insert("bread", "cheap").expect("row");

    let failures = find_data_type_failures(&schema, &dat).expect("check");
    let cost = &failures["foods"]["Cost"];
    assert_eq!(cost.rows.len(), 2);
    assert!(cost.rows.contains(&RowId::Key(Key::from("pizza"))));
    assert!(cost.bad_values.contains(&Value::text("cheap")));
    assert!(!failures.contains_key("nutrition_quantities"));
}

#[test]
fn min_max_predicate_names_both_bounds() {
    let schema = diet_schema();
    let mut dat = diet_data(&schema);
    dat.table_mut("categories")
        .expect("categories")
        .insert(
            "calories",
            RowInput::from([("Min Nutrition", 10.0), ("Max Nutrition", 5.0)]),
        )
        .expect("row");

    let failures = find_data_row_failures(&schema, &dat).expect("check");
    let failing = &failures["categories"]["Min Max Check"];
    assert_eq!(failing.len(), 1);
    let message = failing
        .message(&RowId::Key(Key::from("calories")))
        .expect("message");
    assert!(message.contains("10"), "{message}");
    assert!(message.contains('5'), "{message}");
}

#[test]
fn predicate_arguments_come_from_parameters() {
    let schema = diet_schema();
    let mut dat = diet_data(&schema);
    dat.table_mut("parameters")
        .expect("parameters")
        .insert("Adjuster", 2.0)
        .expect("row");

    let failures = find_data_row_failures(&schema, &dat).expect("check");
    // protein: 100 < 91 * 2
    assert!(failures["categories"]["Min Max Check"].contains(&RowId::Key(Key::from("protein"))));
}

#[test]
fn parameter_predicate_flags_unknown_and_invalid() {
    let schema = diet_schema();
    let mut dat = diet_data(&schema);
    let parameters = dat.table_mut("parameters").expect("parameters");
    parameters.insert("Adjuster", -1.0).expect("row");
    parameters.insert("Speed", 3.0).expect("row");

    let failures = find_data_row_failures(&schema, &dat).expect("check");
    let PredicateFailures::Messages(messages) = &failures["parameters"]["Valid Parameter"] else {
        panic!("parameter predicate reports messages");
    };
    assert_eq!(messages.len(), 2);
    assert!(messages[&RowId::Key(Key::from("Speed"))].contains("not a declared parameter"));
}

#[test]
fn boolean_predicate_collects_rows() {
    let mut builder = SchemaBuilder::new();
    builder.add_table("foods", ["Name"], ["Cost"]).expect("foods");
    builder
        .add_data_row_predicate(
            "foods",
            "Affordable",
            RowPredicate::boolean(|row, _| row.number("Cost").is_some_and(|cost| cost < 10.0)),
        )
        .expect("predicate");
    let schema = builder.build().expect("schema");
    let mut dat = schema.tic_dat();
    let foods = dat.table_mut("foods").expect("foods");
    foods.insert("caviar", 100.0).expect("row");
    foods.insert("rice", 1.0).expect("row");

    let failures = find_data_row_failures(&schema, &dat).expect("check");
    assert_eq!(
        failures["foods"]["Affordable"],
        PredicateFailures::Rows([RowId::Key(Key::from("caviar"))].into())
    );
}

#[test]
fn duplicates_counted_on_raw_rows() {
    let mut builder = SchemaBuilder::new();
    builder
        .add_table("names", ["Name"], Vec::<String>::new())
        .expect("names");
    let schema = builder.build().expect("schema");

    let mut input = DataInput::new();
    for name in ["a", "a", "b"] {
        input
            .push_row("names", RowInput::from([("Name", name)]))
            .expect("row");
    }
    let duplicates = find_duplicates(&schema, &input).expect("check");
    assert_eq!(
        duplicates["names"],
        BTreeMap::from([(Key::from("a"), 2)])
    );
}

#[test]
fn duplicates_in_keyed_input() {
    let schema = diet_schema();
    let mut input = DataInput::new();
    input.insert(
        "foods",
        TableInput::Keyed(vec![
            (Key::from("pizza"), RowInput::from(1.0)),
            (Key::from("pizza"), RowInput::from(2.0)),
            (Key::from("pizza"), RowInput::from(3.0)),
        ]),
    );
    let (data, report) = validate_input(&schema, &input).expect("validate");
    assert_eq!(report.duplicates["foods"][&Key::from("pizza")], 3);
    assert_eq!(report.counts().duplicates, 1);
    assert_eq!(data.table("foods").expect("foods").len(), 1);
}

#[test]
fn foreign_schema_is_a_usage_error() {
    let schema = diet_schema();
    let mut other = SchemaBuilder::new();
    other.add_table("foods", ["Name"], ["Cost"]).expect("foods");
    let other = other.build().expect("schema");
    assert!(matches!(
        validate(&schema, &other.tic_dat()),
        Err(TicDatError::SchemaMismatch(_))
    ));
}
