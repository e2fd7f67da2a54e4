//! MySQL value decoding into a tagged cell type.
//!
//! Columns are classified into logical categories by type name, then decoded
//! through a cascade of `try_get` calls into [`CellValue`]. Each variant has
//! exactly one stringification rule, used by the formatter.

use serde_json::Value as JsonValue;
use sqlx::mysql::{MySqlRow, MySqlTypeInfo, MySqlValueRef};
use sqlx::{Column, Decode, Row, Type, TypeInfo};

/// One column value from a result row.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Null,
    Bool(bool),
    Int(i64),
    UInt(u64),
    Float(f64),
    Text(String),
    /// DECIMAL, date/time, JSON, binary - anything carried as an opaque string.
    Other(String),
}

impl CellValue {
    pub fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    /// Natural text form of the value. `Null` renders empty; callers that
    /// want a different null token substitute it themselves.
    pub fn render(&self) -> String {
        match self {
            Self::Null => String::new(),
            Self::Bool(b) => b.to_string(),
            Self::Int(v) => v.to_string(),
            Self::UInt(v) => v.to_string(),
            Self::Float(v) => v.to_string(),
            Self::Text(s) => s.clone(),
            Self::Other(s) => s.clone(),
        }
    }
}

/// Logical category for MySQL column types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeCategory {
    Integer,
    Float,
    Decimal,
    Boolean,
    Binary,
    Json,
    DateTime,
    Unknown,
}

/// Classify a MySQL type name into a logical category.
pub fn categorize_type(type_name: &str) -> TypeCategory {
    let lower = type_name.to_lowercase();

    // Decimal/Numeric - check first as it overlaps with "numeric" elsewhere
    if lower.contains("decimal") || lower.contains("numeric") {
        return TypeCategory::Decimal;
    }

    if lower.contains("int") || lower.contains("serial") || lower.contains("tiny") {
        return TypeCategory::Integer;
    }

    if lower == "bool" || lower == "boolean" {
        return TypeCategory::Boolean;
    }

    if lower.contains("float") || lower.contains("double") || lower == "real" {
        return TypeCategory::Float;
    }

    if lower == "json" {
        return TypeCategory::Json;
    }

    if lower.contains("blob") || lower.contains("binary") {
        return TypeCategory::Binary;
    }

    if lower.contains("datetime")
        || lower.contains("timestamp")
        || lower == "date"
        || lower == "time"
    {
        return TypeCategory::DateTime;
    }

    // varchar, text, char, enum, set, year, etc.
    TypeCategory::Unknown
}

/// Wrapper type for raw DECIMAL/NUMERIC values as strings.
/// This preserves the exact database representation.
#[derive(Debug)]
pub struct RawDecimal(pub String);

impl Type<sqlx::MySql> for RawDecimal {
    fn type_info() -> MySqlTypeInfo {
        <String as Type<sqlx::MySql>>::type_info()
    }

    fn compatible(ty: &MySqlTypeInfo) -> bool {
        let name = ty.name().to_lowercase();
        name.contains("decimal") || name.contains("numeric")
    }
}

impl<'r> Decode<'r, sqlx::MySql> for RawDecimal {
    fn decode(value: MySqlValueRef<'r>) -> Result<Self, sqlx::error::BoxDynError> {
        let s = <&str as Decode<sqlx::MySql>>::decode(value)?;
        Ok(RawDecimal(s.to_string()))
    }
}

/// Column names of a row in declaration order.
pub fn column_names(row: &MySqlRow) -> Vec<String> {
    row.columns().iter().map(|c| c.name().to_string()).collect()
}

/// Decode every column of a row into cell values.
pub fn decode_row(row: &MySqlRow) -> Vec<CellValue> {
    row.columns()
        .iter()
        .enumerate()
        .map(|(idx, col)| {
            let category = categorize_type(col.type_info().name());
            decode_column(row, idx, category)
        })
        .collect()
}

fn decode_column(row: &MySqlRow, idx: usize, category: TypeCategory) -> CellValue {
    match category {
        TypeCategory::Decimal => decode_decimal(row, idx),
        TypeCategory::Integer => decode_integer(row, idx),
        TypeCategory::Boolean => decode_boolean(row, idx),
        TypeCategory::Float => decode_float(row, idx),
        TypeCategory::Binary => decode_binary(row, idx),
        TypeCategory::Json => decode_json(row, idx),
        TypeCategory::DateTime => decode_datetime(row, idx),
        TypeCategory::Unknown => decode_text(row, idx),
    }
}

fn decode_decimal(row: &MySqlRow, idx: usize) -> CellValue {
    match row.try_get::<Option<RawDecimal>, _>(idx) {
        Ok(Some(v)) => CellValue::Other(v.0),
        Ok(None) => CellValue::Null,
        Err(e) => {
            tracing::error!("Failed to decode DECIMAL: {:?}", e);
            CellValue::Null
        }
    }
}

fn decode_integer(row: &MySqlRow, idx: usize) -> CellValue {
    // Check NULL first
    if let Ok(None) = row.try_get::<Option<i64>, _>(idx) {
        return CellValue::Null;
    }
    // Try signed types
    if let Ok(Some(v)) = row.try_get::<Option<i8>, _>(idx) {
        return CellValue::Int(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i16>, _>(idx) {
        return CellValue::Int(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i32>, _>(idx) {
        return CellValue::Int(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
        return CellValue::Int(v);
    }
    // Try unsigned types
    if let Ok(Some(v)) = row.try_get::<Option<u8>, _>(idx) {
        return CellValue::UInt(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<u16>, _>(idx) {
        return CellValue::UInt(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<u32>, _>(idx) {
        return CellValue::UInt(v.into());
    }
    if let Ok(Some(v)) = row.try_get::<Option<u64>, _>(idx) {
        return CellValue::UInt(v);
    }
    CellValue::Null
}

fn decode_boolean(row: &MySqlRow, idx: usize) -> CellValue {
    row.try_get::<Option<bool>, _>(idx)
        .ok()
        .flatten()
        .map(CellValue::Bool)
        .unwrap_or(CellValue::Null)
}

fn decode_float(row: &MySqlRow, idx: usize) -> CellValue {
    if let Ok(Some(v)) = row.try_get::<Option<f64>, _>(idx) {
        return CellValue::Float(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<f32>, _>(idx) {
        return CellValue::Float(v.into());
    }
    CellValue::Null
}

/// Binary columns decode as UTF-8 text when possible, base64 otherwise.
fn decode_binary(row: &MySqlRow, idx: usize) -> CellValue {
    use base64::{Engine as _, engine::general_purpose::STANDARD};

    match row.try_get::<Option<Vec<u8>>, _>(idx).ok().flatten() {
        Some(bytes) => match String::from_utf8(bytes) {
            Ok(s) => CellValue::Text(s),
            Err(e) => CellValue::Other(STANDARD.encode(e.as_bytes())),
        },
        None => CellValue::Null,
    }
}

fn decode_json(row: &MySqlRow, idx: usize) -> CellValue {
    row.try_get::<Option<JsonValue>, _>(idx)
        .ok()
        .flatten()
        .map(|v| CellValue::Other(v.to_string()))
        .unwrap_or(CellValue::Null)
}

fn decode_datetime(row: &MySqlRow, idx: usize) -> CellValue {
    if let Ok(Some(v)) = row.try_get::<Option<chrono::NaiveDateTime>, _>(idx) {
        return CellValue::Other(v.to_string());
    }
    if let Ok(Some(v)) = row.try_get::<Option<chrono::DateTime<chrono::Utc>>, _>(idx) {
        return CellValue::Other(v.naive_utc().to_string());
    }
    if let Ok(Some(v)) = row.try_get::<Option<chrono::NaiveDate>, _>(idx) {
        return CellValue::Other(v.to_string());
    }
    if let Ok(Some(v)) = row.try_get::<Option<chrono::NaiveTime>, _>(idx) {
        return CellValue::Other(v.to_string());
    }
    // TIME can exceed 24h; fall back to the textual form
    decode_text(row, idx)
}

fn decode_text(row: &MySqlRow, idx: usize) -> CellValue {
    if let Ok(Some(v)) = row.try_get::<Option<String>, _>(idx) {
        return CellValue::Text(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<i64>, _>(idx) {
        return CellValue::Int(v);
    }
    if let Ok(Some(v)) = row.try_get::<Option<u64>, _>(idx) {
        return CellValue::UInt(v);
    }
    CellValue::Null
}
