// ==========================================
// 测试辅助函数
// ==========================================
// 职责: 提供测试所需的配置库初始化、快照行构造等功能
// ==========================================

#![allow(dead_code)]

use procurement_tracker::db::init_config_schema;
use procurement_tracker::domain::record::{ProcurementRecord, RawRow, TabularSnapshot};
use procurement_tracker::domain::schema::{lift_fields, FieldSchema};
use procurement_tracker::domain::stage::StageTable;
use procurement_tracker::extractor::FieldExtractor;
use rusqlite::{params, Connection};
use std::error::Error;
use std::io::Write;
use tempfile::NamedTempFile;

/// 默认提货表列数
pub const LIFT_WIDTH: usize = 23;

/// 创建临时测试数据库并初始化配置表
///
/// # 返回
/// - NamedTempFile: 临时数据库文件（需要保持存活）
/// - String: 数据库文件路径
pub fn create_test_db() -> Result<(NamedTempFile, String), Box<dyn Error>> {
    let temp_file = NamedTempFile::new()?;
    let db_path = temp_file.path().to_str().unwrap().to_string();

    let conn = Connection::open(&db_path)?;
    init_config_schema(&conn)?;

    Ok((temp_file, db_path))
}

/// 打开测试数据库连接
pub fn open_test_connection(db_path: &str) -> Result<Connection, Box<dyn Error>> {
    Ok(Connection::open(db_path)?)
}

/// 直接写入一条 global 配置
pub fn insert_config(conn: &Connection, key: &str, value: &str) -> Result<(), Box<dyn Error>> {
    conn.execute(
        "INSERT OR REPLACE INTO config_kv (scope_id, key, value) VALUES ('global', ?1, ?2)",
        params![key, value],
    )?;
    Ok(())
}

// ==========================================
// 提货行构造器（默认位置表）
// ==========================================
pub struct LiftRowBuilder {
    schema: FieldSchema,
    cells: Vec<String>,
}

impl LiftRowBuilder {
    pub fn new(lift_id: &str) -> Self {
        Self {
            schema: FieldSchema::default_lift(),
            cells: vec![String::new(); LIFT_WIDTH],
        }
        .set(lift_fields::LIFT_ID, lift_id)
    }

    pub fn set(mut self, field: &str, value: &str) -> Self {
        let pos = self
            .schema
            .position(field)
            .unwrap_or_else(|| panic!("unknown lift field: {}", field));
        self.cells[pos] = value.to_string();
        self
    }

    pub fn order_key(self, key: &str) -> Self {
        self.set(lift_fields::ORDER_KEY, key)
    }

    pub fn material(self, name: &str) -> Self {
        self.set(lift_fields::MATERIAL_NAME, name)
    }

    pub fn price(self, price: &str) -> Self {
        self.set(lift_fields::PRICE, price)
    }

    pub fn quantities(self, lifted: &str, actual: &str) -> Self {
        self.set(lift_fields::LIFTED_QTY, lifted)
            .set(lift_fields::ACTUAL_QTY, actual)
    }

    pub fn composition(self, alumina: &str, iron: &str, ap: &str) -> Self {
        self.set(lift_fields::ALUMINA, alumina)
            .set(lift_fields::IRON, iron)
            .set(lift_fields::AP, ap)
    }

    /// 为默认阶段表的前 n 个阶段写入触发字段
    pub fn triggered(mut self, n: usize) -> Self {
        let table = StageTable::default_lift();
        for spec in table.iter().take(n) {
            self = self.set(&spec.trigger_field, "2024-01-10");
        }
        self
    }

    /// 为默认阶段表的前 n 个阶段写入完成字段
    pub fn completed(mut self, n: usize) -> Self {
        let table = StageTable::default_lift();
        for spec in table.iter().take(n) {
            self = self.set(&spec.completion_field, "2024-01-11");
        }
        self
    }

    pub fn texts(&self) -> Vec<String> {
        self.cells.clone()
    }

    pub fn build(&self, row_index: usize) -> RawRow {
        RawRow::from_texts(row_index, &self.cells)
    }

    /// 经默认抽取器得到记录
    pub fn record(&self) -> ProcurementRecord {
        let snapshot = TabularSnapshot::new(vec![self.build(1)]);
        FieldExtractor::default()
            .extract_lift_records(&snapshot)
            .into_iter()
            .next()
            .expect("lift row should produce a record")
    }
}

/// 表头行
pub fn header_row(width: usize) -> RawRow {
    let names: Vec<String> = (0..width).map(|i| format!("col_{}", i)).collect();
    RawRow::from_texts(0, &names)
}

/// 订单行（默认位置表: 订单号, 供应商, 物料, 单价, 氧化铝, 铁）
pub fn order_row(row_index: usize, order_key: &str, rate: &str) -> RawRow {
    RawRow::from_texts(row_index, &[order_key, "Vendor", "", rate, "", ""])
}

/// 物料规格行（默认位置表: 名称, 氧化铝, 铁, AP）
pub fn material_row(row_index: usize, name: &str, alumina: &str, iron: &str, ap: &str) -> RawRow {
    RawRow::from_texts(row_index, &[name, alumina, iron, ap])
}

/// 带表头的快照
pub fn snapshot_with_header(width: usize, rows: Vec<RawRow>) -> TabularSnapshot {
    let mut all = vec![header_row(width)];
    all.extend(rows);
    TabularSnapshot::new(all)
}

/// 写出临时 CSV 文件
pub fn write_csv(lines: &[Vec<String>]) -> Result<NamedTempFile, Box<dyn Error>> {
    let mut file = tempfile::Builder::new().suffix(".csv").tempfile()?;
    for line in lines {
        let escaped: Vec<String> = line
            .iter()
            .map(|cell| {
                if cell.contains(',') || cell.contains('"') {
                    format!("\"{}\"", cell.replace('"', "\"\""))
                } else {
                    cell.clone()
                }
            })
            .collect();
        writeln!(file, "{}", escaped.join(","))?;
    }
    file.flush()?;
    Ok(file)
}
