// ==========================================
// 抽取层集成测试
// ==========================================
// 测试目标: 快照解析 → 按位置表抽取 → 日期解码
// ==========================================

mod test_helpers;

use chrono::NaiveDate;
use procurement_tracker::domain::record::{Cell, RawRow, TabularSnapshot};
use procurement_tracker::domain::schema::{lift_fields, FieldSchema};
use procurement_tracker::extractor::{
    DateDecoder, DecodedDate, ExtractError, FieldExtractor, JsonSnapshotParser, SnapshotParser,
    UniversalSnapshotParser,
};
use std::io::Write;
use test_helpers::{write_csv, LiftRowBuilder};

// ==========================================
// 位置级访问器
// ==========================================

#[test]
fn test_accessors_never_fail() {
    let row = RawRow::from_texts(1, &["  L-001  ", "", "0", "abc", "12.5kg"]);

    assert_eq!(FieldExtractor::string_at(&row, 0), "L-001");
    assert_eq!(FieldExtractor::string_at(&row, 1), "");
    assert_eq!(FieldExtractor::string_at(&row, 99), "");

    assert!(!FieldExtractor::has_value_at(&row, 1));
    assert!(FieldExtractor::has_value_at(&row, 2));
    assert!(!FieldExtractor::has_value_at(&row, 99));

    assert_eq!(FieldExtractor::number_at(&row, 2), 0.0);
    assert_eq!(FieldExtractor::number_at(&row, 3), 0.0);
    assert_eq!(FieldExtractor::number_at(&row, 4), 12.5);
}

#[test]
fn test_raw_value_preferred_over_formatted() {
    let row = RawRow::new(
        0,
        vec![
            Cell::with_formatted(Some("1200.5".to_string()), Some("1,200.50".to_string())),
            Cell::with_formatted(None, Some("15/01/2024".to_string())),
        ],
    );

    assert_eq!(FieldExtractor::number_at(&row, 0), 1200.5);
    assert_eq!(
        FieldExtractor::date_at(&row, 1).timestamp(),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(0, 0, 0)
    );
}

// ==========================================
// 日期解码
// ==========================================

#[test]
fn test_date_shapes() {
    let expected = NaiveDate::from_ymd_opt(2024, 1, 15)
        .unwrap()
        .and_hms_opt(10, 30, 0)
        .unwrap();

    assert_eq!(DateDecoder::decode("Date(2024,0,15,10,30,0)").timestamp(), Some(expected));
    assert_eq!(DateDecoder::decode("45306.4375").timestamp(), Some(expected));
    assert_eq!(DateDecoder::decode("2024-01-15 10:30:00").timestamp(), Some(expected));
    assert_eq!(
        DateDecoder::decode("Date(2024,0,15)").timestamp(),
        NaiveDate::from_ymd_opt(2024, 1, 15).unwrap().and_hms_opt(0, 0, 0)
    );
}

#[test]
fn test_undecodable_date_keeps_original() {
    assert_eq!(
        DateDecoder::decode("next week"),
        DecodedDate::Unparsed("next week".to_string())
    );
    // 数值过小不视为序列日数
    assert!(DateDecoder::decode("42").timestamp().is_none());
    assert_eq!(DateDecoder::decode("Date(2024,13,40)").to_string(), "Date(2024,13,40)");
}

// ==========================================
// 记录组装
// ==========================================

#[test]
fn test_lift_records_keep_present_fields_only() {
    let record = LiftRowBuilder::new("L-001")
        .order_key(" RL-7 ")
        .material("Ore")
        .price("0")
        .record();

    assert_eq!(record.id, "L-001");
    assert_eq!(record.order_key, "RL-7");
    assert!(record.has_value(lift_fields::PRICE));
    assert!(!record.has_value(lift_fields::LIFTED_QTY));
    assert_eq!(record.positive_number(lift_fields::PRICE), None);
}

#[test]
fn test_id_less_rows_discarded() {
    let snapshot = TabularSnapshot::new(vec![
        LiftRowBuilder::new("L-001").build(1),
        LiftRowBuilder::new("   ").order_key("RL-1").build(2),
        LiftRowBuilder::new("L-003").build(3),
    ]);

    let records = FieldExtractor::default().extract_lift_records(&snapshot);
    let ids: Vec<&str> = records.iter().map(|r| r.id.as_str()).collect();
    assert_eq!(ids, vec!["L-001", "L-003"]);
    assert_eq!(records[1].row_index, 3);
}

#[test]
fn test_custom_lift_schema() {
    let schema = FieldSchema::new([
        (lift_fields::LIFT_ID, 2),
        (lift_fields::ORDER_KEY, 0),
        (lift_fields::MATERIAL_NAME, 1),
        (lift_fields::PRICE, 3),
    ]);
    let extractor = FieldExtractor::new(
        schema,
        FieldSchema::default_orders(),
        FieldSchema::default_materials(),
    )
    .unwrap();

    let snapshot = TabularSnapshot::new(vec![RawRow::from_texts(0, &["RL-9", "Ore", "L-9", "88"])]);
    let records = extractor.extract_lift_records(&snapshot);

    assert_eq!(records[0].id, "L-9");
    assert_eq!(records[0].number(lift_fields::PRICE), 88.0);
}

#[test]
fn test_schema_missing_required_fields() {
    let result = FieldExtractor::new(
        FieldSchema::default_lift(),
        FieldSchema::new([("order_key", 0)]),
        FieldSchema::default_materials(),
    );

    match result {
        Err(ExtractError::SchemaMissingFields { table, fields }) => {
            assert_eq!(table, "orders");
            assert_eq!(fields, vec!["rate".to_string()]);
        }
        _ => panic!("expected SchemaMissingFields"),
    }
}

// ==========================================
// 快照解析
// ==========================================

#[test]
fn test_json_table_extraction() {
    let text = r#"google.visualization.Query.setResponse({"table":{"rows":[
        {"c":[{"v":"Bauxite"},{"v":45.5,"f":"45.50"},{"v":30},null]},
        {"c":[{"v":"Clay"},{"v":"12"},{"v":"8"},{"v":"1.5"}]}
    ]}});"#;

    let snapshot = JsonSnapshotParser.parse_str(text).unwrap();
    let materials = FieldExtractor::default().extract_materials(&snapshot);

    assert_eq!(materials.len(), 2);
    assert_eq!(materials[0].alumina, 45.5);
    assert_eq!(materials[0].ap, 0.0);
    assert_eq!(materials[1].ap, 1.5);
}

#[test]
fn test_non_tabular_json_is_hard_error() {
    assert!(matches!(
        JsonSnapshotParser.parse_str(r#"{"error": "quota"}"#),
        Err(ExtractError::NotTabular(_))
    ));
    assert!(matches!(
        JsonSnapshotParser.parse_str("<html>login</html>"),
        Err(ExtractError::NotTabular(_))
    ));
    assert!(matches!(
        JsonSnapshotParser.parse_str("[[1, 2], 3]"),
        Err(ExtractError::NotTabular(_))
    ));
}

#[test]
fn test_universal_parser_dispatch() {
    let csv = write_csv(&[vec!["a".into(), "b".into()], vec!["1".into(), "2".into()]]).unwrap();
    assert_eq!(UniversalSnapshotParser.parse_snapshot(csv.path()).unwrap().len(), 2);

    let mut json = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
    write!(json, r#"[["L-1", "RL-1"], ["L-2", "RL-2"]]"#).unwrap();
    json.flush().unwrap();
    let snapshot = UniversalSnapshotParser.parse_snapshot(json.path()).unwrap();
    assert_eq!(snapshot.rows[1].cells[1].text(), Some("RL-2"));
}
