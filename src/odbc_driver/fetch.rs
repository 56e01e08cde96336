use std::char::{DecodeUtf16Error, decode_utf16};

use log::debug;
use odbc_api::{
    Bit, Cursor, CursorRow, DataType as OdbcDataType, Nullable,
    sys::{Date, Time, Timestamp},
};

use crate::{
    Dataset, Value,
    date_time::{odbc_to_date, odbc_to_time, odbc_to_timestamp},
};

use super::OdbcError;

/// How the field of a column is requested from the driver and turned into a [`Value`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FetchStrategy {
    Boolean,
    Integer,
    Double,
    Decimal,
    Text,
    Binary,
    Date,
    Time,
    Timestamp,
}

impl FetchStrategy {
    /// Choose the strategy from the relational type reported for the column.
    pub fn for_sql_type(sql_type: OdbcDataType) -> Self {
        match sql_type {
            OdbcDataType::Bit => FetchStrategy::Boolean,
            OdbcDataType::TinyInt
            | OdbcDataType::SmallInt
            | OdbcDataType::Integer
            | OdbcDataType::BigInt => FetchStrategy::Integer,
            OdbcDataType::Real | OdbcDataType::Float { .. } | OdbcDataType::Double => {
                FetchStrategy::Double
            }
            OdbcDataType::Numeric { .. } | OdbcDataType::Decimal { .. } => FetchStrategy::Decimal,
            OdbcDataType::Date => FetchStrategy::Date,
            OdbcDataType::Time { .. } => FetchStrategy::Time,
            OdbcDataType::Timestamp { .. } => FetchStrategy::Timestamp,
            OdbcDataType::Binary { .. }
            | OdbcDataType::Varbinary { .. }
            | OdbcDataType::LongVarbinary { .. } => FetchStrategy::Binary,
            // Character types, and anything the driver could not describe in standard terms.
            _ => FetchStrategy::Text,
        }
    }

    /// Fetch the field at `col` (one based) of the current row. `buf` is reused between calls to
    /// avoid allocations for variadic fields.
    pub fn fetch(
        self,
        row: &mut CursorRow<'_>,
        col: u16,
        buf: &mut FieldBuffer,
    ) -> Result<Value, OdbcError> {
        let value = match self {
            FetchStrategy::Boolean => {
                let mut target = Nullable::<Bit>::null();
                row.get_data(col, &mut target)?;
                target.into_opt().map(|bit| Value::Boolean(bit.as_bool()))
            }
            FetchStrategy::Integer => {
                let mut target = Nullable::<i64>::null();
                row.get_data(col, &mut target)?;
                target.into_opt().map(Value::Integer)
            }
            FetchStrategy::Double => {
                let mut target = Nullable::<f64>::null();
                row.get_data(col, &mut target)?;
                target.into_opt().map(Value::Double)
            }
            FetchStrategy::Decimal => fetch_text(row, col, buf)?.map(Value::Decimal),
            FetchStrategy::Text => fetch_text(row, col, buf)?.map(Value::Text),
            FetchStrategy::Binary => {
                buf.narrow.clear();
                if row.get_binary(col, &mut buf.narrow)? {
                    Some(Value::Binary(buf.narrow.clone()))
                } else {
                    None
                }
            }
            FetchStrategy::Date => {
                let mut target = Nullable::<Date>::null();
                row.get_data(col, &mut target)?;
                match target.into_opt() {
                    Some(date) => Some(Value::Date(
                        odbc_to_date(&date).ok_or(OdbcError::InvalidDateTime { col })?,
                    )),
                    None => None,
                }
            }
            FetchStrategy::Time => {
                let mut target = Nullable::<Time>::null();
                row.get_data(col, &mut target)?;
                match target.into_opt() {
                    Some(time) => Some(Value::Time(
                        odbc_to_time(&time).ok_or(OdbcError::InvalidDateTime { col })?,
                    )),
                    None => None,
                }
            }
            FetchStrategy::Timestamp => {
                let mut target = Nullable::<Timestamp>::null();
                row.get_data(col, &mut target)?;
                match target.into_opt() {
                    Some(timestamp) => Some(Value::Timestamp(
                        odbc_to_timestamp(&timestamp).ok_or(OdbcError::InvalidDateTime { col })?,
                    )),
                    None => None,
                }
            }
        };
        Ok(value.unwrap_or(Value::Null))
    }
}

/// Reusable buffers for variadic fields. Text is transferred either as narrow or as wide
/// characters, binary fields always use the narrow buffer.
#[derive(Debug, Default)]
pub struct FieldBuffer {
    narrow: Vec<u8>,
    wide: Vec<u16>,
}

/// Whether text is requested from the driver as UTF-16.
///
/// The narrow encoding depends on the system locale, which is usually not UTF-8 on windows
/// systems. Wide text is therefore fetched on windows unless the `narrow` feature is set, and
/// everywhere if the `wide` feature is set.
fn use_wide_text() -> bool {
    cfg!(any(
        feature = "wide",
        all(target_os = "windows", not(feature = "narrow"))
    ))
}

/// `None` if the field is `NULL`.
fn fetch_text(
    row: &mut CursorRow<'_>,
    col: u16,
    buf: &mut FieldBuffer,
) -> Result<Option<String>, OdbcError> {
    if use_wide_text() {
        buf.wide.clear();
        if !row.get_wide_text(col, &mut buf.wide)? {
            return Ok(None);
        }
        let text = utf16_to_string(&buf.wide)
            .map_err(|source| OdbcError::InvalidUtf16 { col, source })?;
        Ok(Some(text))
    } else {
        buf.narrow.clear();
        if !row.get_text(col, &mut buf.narrow)? {
            return Ok(None);
        }
        let text = String::from_utf8(buf.narrow.clone())
            .map_err(|source| OdbcError::InvalidUtf8 { col, source })?;
        Ok(Some(text))
    }
}

fn utf16_to_string(utf16: &[u16]) -> Result<String, DecodeUtf16Error> {
    decode_utf16(utf16.iter().copied()).collect()
}

/// Fetches the entire result set of `cursor`, row by row.
pub fn fetch_all(mut cursor: impl Cursor) -> Result<Dataset, OdbcError> {
    let num_cols: u16 = cursor.num_result_cols()?.try_into().unwrap_or_default();
    let mut columns = Vec::with_capacity(num_cols.into());
    let mut strategies = Vec::with_capacity(num_cols.into());
    for col in 1..=num_cols {
        let name = cursor.col_name(col)?;
        let sql_type = cursor.col_data_type(col)?;
        let strategy = FetchStrategy::for_sql_type(sql_type);
        debug!(
            "ODBC driver reported for column {col}. Relational type: {sql_type:?}; Name: '{name}'; \
            Fetched as: {strategy:?}"
        );
        columns.push(name);
        strategies.push(strategy);
    }

    let mut rows = Vec::new();
    let mut buf = FieldBuffer::default();
    while let Some(mut row) = cursor.next_row()? {
        let mut fields = Vec::with_capacity(strategies.len());
        for (col, strategy) in (1..).zip(&strategies) {
            fields.push(strategy.fetch(&mut row, col, &mut buf)?);
        }
        rows.push(fields);
    }
    Ok(Dataset::new(columns, rows))
}
