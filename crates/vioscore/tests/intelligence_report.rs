use vioscore::intelligence::{
    build_report, IntelligenceSchema, ReportBuilder, ReportNode, SchemaRow, Table, TableSnapshot,
    HEALTH_DAMPENING, NOT_APPLICABLE, PRIMARY_TABLE, SCHEMA_TABLE,
};

fn schema_row(
    attribute: &str,
    category: Option<&str>,
    dimension: &str,
    group: &str,
    table_name: &str,
    dutch_name: Option<&str>,
) -> SchemaRow {
    SchemaRow {
        attribute: attribute.to_string(),
        current_category: category.map(str::to_string),
        dimension: dimension.to_string(),
        vioscore: group.to_string(),
        table_name: table_name.to_string(),
        dutch_name: dutch_name.map(str::to_string),
    }
}

fn primary_table() -> Table {
    Table::from_csv(
        PRIMARY_TABLE,
        "region_code,region_name,smoker,volunteer_work,caregiver\n\
         NL00,Nederland,0,0.5,0.3\n\
         GM0363,Amsterdam,0.25,0.4,0.2\n"
            .as_bytes(),
    )
    .expect("primary table parses")
}

fn weather_table() -> Table {
    Table::from_csv(
        "weather_data",
        "region_code,zonuren\nNL00,1662.5\n".as_bytes(),
    )
    .expect("weather table parses")
}

fn single_group_fixture() -> (TableSnapshot, IntelligenceSchema) {
    let schema = IntelligenceSchema::new(vec![
        schema_row("smoker", Some("smoker"), "Health", "VioScore", PRIMARY_TABLE, None),
        schema_row("smoker", Some("smoker"), "Health", "Other", PRIMARY_TABLE, None),
    ]);
    let snapshot = TableSnapshot::from_tables([primary_table()]);
    (snapshot, schema)
}

#[test]
fn scored_group_carries_scores_and_sibling_group_does_not() {
    let (snapshot, schema) = single_group_fixture();
    let report = build_report(&snapshot, &schema, "NL00").expect("report builds");

    assert_eq!(report.labels, ["Country".to_string(), "Region".to_string()]);
    assert_eq!(report.name.as_deref(), Some("Nederland"));
    assert_eq!(report.vioscore, NOT_APPLICABLE);

    let vioscore_group = &report.children[0];
    assert_eq!(vioscore_group.labels[0], "VioScore");
    let health = &vioscore_group.children[0];
    assert_eq!(health.labels, ["Health".to_string(), "Dimension".to_string()]);
    // Only smoker scores: mean(1000) * dampening.
    let expected = format!("{:.2}", 1000.0 * HEALTH_DAMPENING);
    assert_eq!(health.vioscore, expected);

    let smoker = &health.children[0];
    assert_eq!(smoker.labels, ["Smoker".to_string(), "Category".to_string()]);
    assert_eq!(smoker.vioscore, "1000.00");
    let attribute = &smoker.children[0];
    assert_eq!(
        attribute.labels,
        ["Smoker".to_string(), "Attribute".to_string()]
    );
    assert_eq!(attribute.vioscore, "0.00");

    let other_group = &report.children[1];
    assert_eq!(other_group.labels[0], "Other");
    let other_health = &other_group.children[0];
    assert_eq!(other_health.vioscore, NOT_APPLICABLE);
    assert_eq!(other_health.children[0].vioscore, NOT_APPLICABLE);
}

#[test]
fn unknown_region_fails_without_partial_children() {
    let (snapshot, schema) = single_group_fixture();
    let err = build_report(&snapshot, &schema, "BU9999").expect_err("region absent");
    assert!(err.is_not_found());
}

#[test]
fn tree_is_five_levels_deep_with_strictly_increasing_indices() {
    let schema = IntelligenceSchema::new(vec![
        schema_row("smoker", Some("smoker"), "Health", "VioScore", PRIMARY_TABLE, None),
        schema_row("volunteer_work", Some("caregiving"), "Health", "VioScore", PRIMARY_TABLE, None),
        schema_row("caregiver", Some("caregiving"), "Health", "VioScore", PRIMARY_TABLE, None),
    ]);
    let snapshot = TableSnapshot::from_tables([primary_table()]);
    let report = build_report(&snapshot, &schema, "GM0363").expect("report builds");

    assert_eq!(report.index, "1");
    let group = &report.children[0];
    assert_eq!(group.index, "1.1");
    let dimension = &group.children[0];
    assert_eq!(dimension.index, "1.1.1");

    let categories = &dimension.children;
    assert_eq!(categories.len(), 2);
    assert_eq!(categories[0].index, "1.1.1.1");
    assert_eq!(categories[1].index, "1.1.1.2");

    let attributes = &categories[1].children;
    assert_eq!(attributes.len(), 2);
    assert_eq!(attributes[0].index, "1.1.1.2.1");
    assert_eq!(attributes[1].index, "1.1.1.2.2");
    assert!(attributes[0].children.is_empty(), "attributes are leaves");
}

#[test]
fn null_category_consumes_an_index_slot_but_creates_no_node() {
    let schema = IntelligenceSchema::new(vec![
        schema_row("zonuren", None, "Environment", "VioScore", "weather_data", Some("zonuren")),
        schema_row("smoker", Some("smoker"), "Environment", "VioScore", PRIMARY_TABLE, None),
    ]);
    let snapshot = TableSnapshot::from_tables([primary_table(), weather_table()]);
    let report = build_report(&snapshot, &schema, "NL00").expect("report builds");

    let dimension = &report.children[0].children[0];
    assert_eq!(dimension.children.len(), 1, "null category emits no node");
    // The null slot was position 1, so the real category numbers as 2.
    assert_eq!(dimension.children[0].index, "1.1.1.2");
}

#[test]
fn attributes_resolve_via_dutch_alias_outside_the_primary_table() {
    let schema = IntelligenceSchema::new(vec![
        schema_row("sun_hours", Some("climate"), "Environment", "VioScore", "weather_data", Some("zonuren")),
        schema_row("rain_days", Some("climate"), "Environment", "VioScore", "weather_data", None),
    ]);
    let snapshot = TableSnapshot::from_tables([primary_table(), weather_table()]);
    let report = build_report(&snapshot, &schema, "NL00").expect("report builds");

    let climate = &report.children[0].children[0].children[0];
    assert_eq!(climate.labels[0], "Climate");
    assert_eq!(climate.vioscore, NOT_APPLICABLE, "no formula for climate");

    let sun = &climate.children[0];
    assert_eq!(sun.labels[0], "SunHours");
    assert_eq!(sun.vioscore, "1662.50");

    // No alias and not in the primary table: the node degrades, the report
    // survives.
    let rain = &climate.children[1];
    assert_eq!(rain.vioscore, NOT_APPLICABLE);
}

#[test]
fn building_twice_yields_identical_output() {
    let (snapshot, schema) = single_group_fixture();
    let builder = ReportBuilder::new(&snapshot, &schema);
    let first = builder.build("NL00").expect("first build");
    let second = builder.build("NL00").expect("second build");
    assert_eq!(first, second);

    let first_json = serde_json::to_string(&first).expect("serializes");
    let second_json = serde_json::to_string(&second).expect("serializes");
    assert_eq!(first_json, second_json);
}

#[test]
fn schema_round_trips_through_the_data_model_table() {
    let schema_table = Table::from_csv(
        SCHEMA_TABLE,
        "attribute,current_category,dimension,vioscore,table_name,dutch_names\n\
         smoker,smoker,Health,VioScore,health_vioscore_table,\n\
         zonuren,,Environment,VioScore,weather_data,zonuren\n"
            .as_bytes(),
    )
    .expect("schema table parses");
    let schema = IntelligenceSchema::from_table(&schema_table).expect("schema builds");

    assert_eq!(schema.rows().len(), 2);
    assert_eq!(schema.health_categories(), vec!["smoker"]);
    assert_eq!(schema.rows()[1].current_category, None);
    assert_eq!(schema.rows()[1].dutch_name.as_deref(), Some("zonuren"));

    let snapshot = TableSnapshot::from_tables([primary_table(), weather_table()]);
    let report = build_report(&snapshot, &schema, "NL00").expect("report builds");
    let health = &report.children[0].children[0];
    assert_eq!(health.labels[0], "Health");
    assert_eq!(
        health.vioscore,
        format!("{:.2}", 1000.0 * HEALTH_DAMPENING)
    );
}

#[test]
fn region_kind_label_follows_requested_code() {
    let schema = IntelligenceSchema::new(vec![schema_row(
        "smoker",
        Some("smoker"),
        "Health",
        "VioScore",
        PRIMARY_TABLE,
        None,
    )]);
    let snapshot = TableSnapshot::from_tables([primary_table()]);
    let report = build_report(&snapshot, &schema, "GM0363").expect("report builds");
    assert_eq!(report.labels[0], "Municipality");
    assert_eq!(report.name.as_deref(), Some("Amsterdam"));
}

fn depth(node: &ReportNode) -> usize {
    1 + node.children.iter().map(depth).max().unwrap_or(0)
}

#[test]
fn non_null_categories_always_produce_five_levels() {
    let (snapshot, schema) = single_group_fixture();
    let report = build_report(&snapshot, &schema, "NL00").expect("report builds");
    assert_eq!(depth(&report), 5);
}
