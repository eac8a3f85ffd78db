// ==========================================
// 采购全流程跟踪系统 - 字段抽取器
// ==========================================
// 职责: 位置行 → 类型化访问 / 按位置表组装记录
// 红线: 单元格脏数据一律降级（"" / 0.0 / 原文）,不报错
// 红线: id 为空的行在此处丢弃,不进入阶段推断与对账
// ==========================================

use crate::domain::record::{MaterialSpec, OrderRecord, ProcurementRecord, RawRow, TabularSnapshot};
use crate::domain::schema::{lift_fields, material_fields, order_fields, FieldSchema};
use crate::extractor::date_decoder::{DateDecoder, DecodedDate};
use crate::extractor::error::{ExtractError, ExtractResult};
use crate::extractor::numeric::parse_float;
use std::collections::BTreeMap;
use tracing::debug;

/// 各表必填字段
const LIFT_REQUIRED: &[&str] = &[
    lift_fields::LIFT_ID,
    lift_fields::ORDER_KEY,
    lift_fields::MATERIAL_NAME,
];
const ORDER_REQUIRED: &[&str] = &[order_fields::ORDER_KEY, order_fields::RATE];
const MATERIAL_REQUIRED: &[&str] = &[
    material_fields::MATERIAL_NAME,
    material_fields::ALUMINA,
    material_fields::IRON,
    material_fields::AP,
];

// ==========================================
// FieldExtractor
// ==========================================
#[derive(Debug, Clone)]
pub struct FieldExtractor {
    lift_schema: FieldSchema,
    order_schema: FieldSchema,
    material_schema: FieldSchema,
    // 提货表 (字段名, 位置) 按位置升序,构造时排好,逐行复用
    lift_columns: Vec<(String, usize)>,
}

impl Default for FieldExtractor {
    fn default() -> Self {
        Self::assemble(
            FieldSchema::default_lift(),
            FieldSchema::default_orders(),
            FieldSchema::default_materials(),
        )
    }
}

impl FieldExtractor {
    /// 创建抽取器并校验三张位置表的必填字段
    pub fn new(
        lift_schema: FieldSchema,
        order_schema: FieldSchema,
        material_schema: FieldSchema,
    ) -> ExtractResult<Self> {
        Self::check_schema("lift", &lift_schema, LIFT_REQUIRED)?;
        Self::check_schema("orders", &order_schema, ORDER_REQUIRED)?;
        Self::check_schema("materials", &material_schema, MATERIAL_REQUIRED)?;

        Ok(Self::assemble(lift_schema, order_schema, material_schema))
    }

    fn assemble(
        lift_schema: FieldSchema,
        order_schema: FieldSchema,
        material_schema: FieldSchema,
    ) -> Self {
        let lift_columns = lift_schema
            .iter()
            .map(|(name, pos)| (name.to_string(), pos))
            .collect();
        Self {
            lift_schema,
            order_schema,
            material_schema,
            lift_columns,
        }
    }

    fn check_schema(table: &str, schema: &FieldSchema, required: &[&str]) -> ExtractResult<()> {
        let missing = schema.missing_fields(required);
        if missing.is_empty() {
            Ok(())
        } else {
            Err(ExtractError::SchemaMissingFields {
                table: table.to_string(),
                fields: missing.into_iter().map(String::from).collect(),
            })
        }
    }

    pub fn lift_schema(&self) -> &FieldSchema {
        &self.lift_schema
    }

    // ==========================================
    // 位置级访问器
    // ==========================================

    /// 取位置上的文本（已 trim），缺省返回 ""
    pub fn string_at(row: &RawRow, position: usize) -> String {
        row.cell(position)
            .and_then(|c| c.text())
            .map(str::to_string)
            .unwrap_or_default()
    }

    /// 位置上是否有值（空串为缺省，字面量 "0" 为有值）
    pub fn has_value_at(row: &RawRow, position: usize) -> bool {
        row.cell(position).and_then(|c| c.text()).is_some()
    }

    /// 取位置上的数值，无法解析返回 0.0
    pub fn number_at(row: &RawRow, position: usize) -> f64 {
        parse_float(&Self::string_at(row, position)).unwrap_or(0.0)
    }

    /// 取位置上的日期，无法解析时返回原文
    pub fn date_at(row: &RawRow, position: usize) -> DecodedDate {
        DateDecoder::decode(&Self::string_at(row, position))
    }

    // ===== 按字段名访问（位置表中没有的字段视为缺省）=====

    fn string_of(row: &RawRow, schema: &FieldSchema, field: &str) -> String {
        schema
            .position(field)
            .map(|pos| Self::string_at(row, pos))
            .unwrap_or_default()
    }

    fn number_of(row: &RawRow, schema: &FieldSchema, field: &str) -> f64 {
        schema
            .position(field)
            .map(|pos| Self::number_at(row, pos))
            .unwrap_or(0.0)
    }

    // ==========================================
    // 记录组装
    // ==========================================

    /// 组装提货/账务记录
    pub fn extract_lift_records(&self, snapshot: &TabularSnapshot) -> Vec<ProcurementRecord> {
        let mut records = Vec::with_capacity(snapshot.len());

        for row in &snapshot.rows {
            let id = Self::string_of(row, &self.lift_schema, lift_fields::LIFT_ID);
            if id.is_empty() {
                debug!(row_index = row.row_index, "丢弃无提货单号的行");
                continue;
            }

            let fields: BTreeMap<String, String> = self
                .lift_columns
                .iter()
                .filter(|(_, pos)| Self::has_value_at(row, *pos))
                .map(|(name, pos)| (name.clone(), Self::string_at(row, *pos)))
                .collect();

            records.push(ProcurementRecord {
                id,
                order_key: Self::string_of(row, &self.lift_schema, lift_fields::ORDER_KEY),
                material_name: Self::string_of(row, &self.lift_schema, lift_fields::MATERIAL_NAME),
                row_index: row.row_index,
                fields,
            });
        }

        records
    }

    /// 组装订单参考数据
    pub fn extract_orders(&self, snapshot: &TabularSnapshot) -> Vec<OrderRecord> {
        let schema = &self.order_schema;
        snapshot
            .rows
            .iter()
            .filter_map(|row| {
                let order_key = Self::string_of(row, schema, order_fields::ORDER_KEY);
                if order_key.is_empty() {
                    debug!(row_index = row.row_index, "丢弃无订单号的行");
                    return None;
                }
                Some(OrderRecord {
                    order_key,
                    rate: Self::number_of(row, schema, order_fields::RATE),
                    expected_alumina: Self::number_of(row, schema, order_fields::EXPECTED_ALUMINA),
                    expected_iron: Self::number_of(row, schema, order_fields::EXPECTED_IRON),
                    row_index: row.row_index,
                })
            })
            .collect()
    }

    /// 组装物料规格参考数据
    pub fn extract_materials(&self, snapshot: &TabularSnapshot) -> Vec<MaterialSpec> {
        let schema = &self.material_schema;
        snapshot
            .rows
            .iter()
            .filter_map(|row| {
                let material_name = Self::string_of(row, schema, material_fields::MATERIAL_NAME);
                if material_name.is_empty() {
                    debug!(row_index = row.row_index, "丢弃无物料名称的行");
                    return None;
                }
                Some(MaterialSpec {
                    material_name,
                    alumina: Self::number_of(row, schema, material_fields::ALUMINA),
                    iron: Self::number_of(row, schema, material_fields::IRON),
                    ap: Self::number_of(row, schema, material_fields::AP),
                    row_index: row.row_index,
                })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::record::Cell;

    fn lift_row(row_index: usize, values: &[(&str, &str)]) -> RawRow {
        let schema = FieldSchema::default_lift();
        let mut texts = vec![""; 23];
        for (field, value) in values {
            texts[schema.position(field).unwrap()] = *value;
        }
        RawRow::from_texts(row_index, &texts)
    }

    #[test]
    fn test_string_at_trims_and_is_empty_safe() {
        let row = RawRow::from_texts(0, &["  L-001 ", ""]);
        assert_eq!(FieldExtractor::string_at(&row, 0), "L-001");
        assert_eq!(FieldExtractor::string_at(&row, 1), "");
        assert_eq!(FieldExtractor::string_at(&row, 99), "");
    }

    #[test]
    fn test_has_value_distinguishes_zero_from_absent() {
        let row = RawRow::from_texts(0, &["0", "", "  "]);
        assert!(FieldExtractor::has_value_at(&row, 0));
        assert!(!FieldExtractor::has_value_at(&row, 1));
        assert!(!FieldExtractor::has_value_at(&row, 2));
        assert!(!FieldExtractor::has_value_at(&row, 3));
    }

    #[test]
    fn test_number_at_defaults_to_zero() {
        let row = RawRow::from_texts(0, &["12.5", "n/a", ""]);
        assert_eq!(FieldExtractor::number_at(&row, 0), 12.5);
        assert_eq!(FieldExtractor::number_at(&row, 1), 0.0);
        assert_eq!(FieldExtractor::number_at(&row, 2), 0.0);
    }

    #[test]
    fn test_formatted_value_used_when_raw_missing() {
        let row = RawRow::new(
            0,
            vec![Cell::with_formatted(None, Some("15/01/2024".to_string()))],
        );
        assert!(FieldExtractor::has_value_at(&row, 0));
        assert!(FieldExtractor::date_at(&row, 0).timestamp().is_some());
    }

    #[test]
    fn test_extract_lift_records_discards_missing_id() {
        let snapshot = TabularSnapshot::new(vec![
            lift_row(1, &[(lift_fields::LIFT_ID, "L-1"), (lift_fields::ORDER_KEY, "RL-007")]),
            lift_row(2, &[(lift_fields::ORDER_KEY, "RL-008")]),
            lift_row(
                3,
                &[
                    (lift_fields::LIFT_ID, "L-3"),
                    (lift_fields::MATERIAL_NAME, " Bauxite "),
                    (lift_fields::PRICE, "0"),
                ],
            ),
        ]);

        let records = FieldExtractor::default().extract_lift_records(&snapshot);
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].id, "L-1");
        assert_eq!(records[0].order_key, "RL-007");
        assert_eq!(records[1].row_index, 3);
        assert_eq!(records[1].material_name, "Bauxite");
        assert!(records[1].has_value(lift_fields::PRICE));
        assert!(!records[1].has_value(lift_fields::LIFTED_QTY));
    }

    #[test]
    fn test_lift_columns_sorted_once_at_construction() {
        let schema = FieldSchema::new([
            (lift_fields::LIFT_ID, 2),
            (lift_fields::ORDER_KEY, 0),
            (lift_fields::MATERIAL_NAME, 1),
            (lift_fields::PRICE, 5),
        ]);
        let extractor = FieldExtractor::new(
            schema,
            FieldSchema::default_orders(),
            FieldSchema::default_materials(),
        )
        .unwrap();

        let positions: Vec<usize> = extractor.lift_columns.iter().map(|(_, p)| *p).collect();
        assert_eq!(positions, vec![0, 1, 2, 5]);

        let snapshot = TabularSnapshot::new(vec![
            RawRow::from_texts(0, &["RL-1", "Ore", "L-1", "", "", "90"]),
            RawRow::from_texts(1, &["RL-2", "", "L-2"]),
        ]);
        let records = extractor.extract_lift_records(&snapshot);
        assert_eq!(records[0].fields.len(), 4);
        assert_eq!(records[0].value(lift_fields::PRICE), Some("90"));
        assert_eq!(records[1].fields.len(), 2);
        assert!(!records[1].has_value(lift_fields::MATERIAL_NAME));
    }

    #[test]
    fn test_extract_references() {
        let orders = TabularSnapshot::new(vec![
            RawRow::from_texts(0, &["RL-007", "Vendor", "Bauxite", "100.5", "58", "1.5"]),
            RawRow::from_texts(1, &["", "Vendor", "Bauxite", "99"]),
        ]);
        let materials = TabularSnapshot::new(vec![RawRow::from_texts(0, &["Bauxite", "58", "1.5", "x"])]);

        let extractor = FieldExtractor::default();
        let orders = extractor.extract_orders(&orders);
        assert_eq!(orders.len(), 1);
        assert_eq!(orders[0].rate, 100.5);
        assert_eq!(orders[0].expected_iron, 1.5);

        let materials = extractor.extract_materials(&materials);
        assert_eq!(materials[0].alumina, 58.0);
        assert_eq!(materials[0].ap, 0.0);
    }

    #[test]
    fn test_new_rejects_incomplete_schema() {
        let result = FieldExtractor::new(
            FieldSchema::new([(lift_fields::LIFT_ID, 0)]),
            FieldSchema::default_orders(),
            FieldSchema::default_materials(),
        );
        match result {
            Err(ExtractError::SchemaMissingFields { table, fields }) => {
                assert_eq!(table, "lift");
                assert!(fields.contains(&lift_fields::ORDER_KEY.to_string()));
            }
            other => panic!("unexpected: {:?}", other),
        }
    }
}
