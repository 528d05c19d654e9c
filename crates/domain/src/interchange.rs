//! Delimited text interchange used for bulk import and export.
//!
//! The format is comma-delimited and header-first. A field is wrapped in
//! double quotes, with inner quotes doubled, exactly when its text contains a
//! comma, a double quote or a line break. Decoding accepts LF, CRLF and CR
//! record separators and keeps line breaks that sit inside quotes.

use std::borrow::Cow;

use chrono::{DateTime, SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

/// Scalar value carried by an outgoing row cell.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case", tag = "type", content = "value")]
pub enum CellValue {
    /// Absent value, encoded as an empty field.
    Null,
    /// Free text.
    Text(String),
    /// Numeric value.
    ///
    /// Integral values below 1e15 in magnitude print without a fraction
    /// (`42`, not `42.0`). Anything else prints in the shortest decimal form
    /// that reads back to the same `f64`, with every digit spelled out and no
    /// exponent, so `1e21` exports as `1000000000000000000000`.
    Number(f64),
    /// Boolean value.
    Boolean(bool),
    /// UTC timestamp, encoded as ISO-8601.
    Date(DateTime<Utc>),
}

impl CellValue {
    /// Returns the textual form written into a field, or `None` for nulls.
    #[must_use]
    pub fn to_field_text(&self) -> Option<Cow<'_, str>> {
        match self {
            Self::Null => None,
            Self::Text(value) => Some(Cow::Borrowed(value.as_str())),
            Self::Number(value) => Some(Cow::Owned(format_number(*value))),
            Self::Boolean(value) => Some(Cow::Borrowed(if *value { "true" } else { "false" })),
            Self::Date(value) => Some(Cow::Owned(
                value.to_rfc3339_opts(SecondsFormat::Millis, true),
            )),
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        Self::Text(value.to_owned())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        Self::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        Self::Number(value)
    }
}

impl From<i64> for CellValue {
    fn from(value: i64) -> Self {
        Self::Number(value as f64)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        Self::Boolean(value)
    }
}

impl From<DateTime<Utc>> for CellValue {
    fn from(value: DateTime<Utc>) -> Self {
        Self::Date(value)
    }
}

impl<T> From<Option<T>> for CellValue
where
    T: Into<CellValue>,
{
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Self::Null)
    }
}

fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_owned();
    }
    if value.is_infinite() {
        return if value.is_sign_positive() {
            "Infinity".to_owned()
        } else {
            "-Infinity".to_owned()
        };
    }
    if value.fract() == 0.0 && value.abs() < 1e15 {
        return format!("{}", value as i64);
    }

    value.to_string()
}

/// Ordered mapping from column name to value.
///
/// Column order is insertion order. Inserting an existing column replaces its
/// value in place.
#[derive(Debug, Clone, PartialEq)]
pub struct Row<V = CellValue> {
    cells: Vec<(String, V)>,
}

impl<V> Row<V> {
    /// Creates an empty row.
    #[must_use]
    pub fn new() -> Self {
        Self { cells: Vec::new() }
    }

    /// Builder-style insert.
    #[must_use]
    pub fn with(mut self, column: impl Into<String>, value: impl Into<V>) -> Self {
        self.insert(column, value);
        self
    }

    /// Sets a column value and returns the previous one.
    pub fn insert(&mut self, column: impl Into<String>, value: impl Into<V>) -> Option<V> {
        let column = column.into();
        let value = value.into();

        match self.cells.iter_mut().find(|(name, _)| *name == column) {
            Some((_, existing)) => Some(std::mem::replace(existing, value)),
            None => {
                self.cells.push((column, value));
                None
            }
        }
    }

    /// Returns the value stored for a column.
    #[must_use]
    pub fn get(&self, column: &str) -> Option<&V> {
        self.cells
            .iter()
            .find(|(name, _)| name == column)
            .map(|(_, value)| value)
    }

    /// Returns column names in order.
    pub fn columns(&self) -> impl Iterator<Item = &str> {
        self.cells.iter().map(|(name, _)| name.as_str())
    }

    /// Returns `(column, value)` pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &V)> {
        self.cells.iter().map(|(name, value)| (name.as_str(), value))
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cells.len()
    }

    /// Returns whether the row has no columns.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}

impl<V> Default for Row<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K, V> FromIterator<(K, V)> for Row<V>
where
    K: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut row = Self::new();
        for (column, value) in iter {
            row.insert(column, value);
        }

        row
    }
}

impl From<Row<String>> for Row<CellValue> {
    fn from(value: Row<String>) -> Self {
        value
            .cells
            .into_iter()
            .map(|(column, text)| (column, CellValue::Text(text)))
            .collect()
    }
}

/// Encodes rows as delimited text.
///
/// Columns come from `columns` when supplied, otherwise from the first row's
/// key order. Missing cells and nulls become empty fields. No rows encode to
/// an empty string without a header.
#[must_use]
pub fn encode_rows(rows: &[Row<CellValue>], columns: Option<&[&str]>) -> String {
    let Some(first_row) = rows.first() else {
        return String::new();
    };

    let columns: Vec<&str> = match columns {
        Some(columns) => columns.to_vec(),
        None => first_row.columns().collect(),
    };

    let mut lines = Vec::with_capacity(rows.len() + 1);
    lines.push(join_fields(columns.iter().map(|column| quote_field(column))));

    for row in rows {
        lines.push(join_fields(columns.iter().map(|column| {
            row.get(column)
                .and_then(CellValue::to_field_text)
                .map(|text| Cow::Owned(quote_field(&text).into_owned()))
                .unwrap_or(Cow::Borrowed(""))
        })));
    }

    lines.join("\n")
}

/// Decodes delimited text into rows keyed by the header line.
///
/// Never fails: input without at least one data record yields nothing. A data
/// record whose field count differs from the header, or whose quoted field is
/// never closed, is dropped and the records around it are kept.
#[must_use]
pub fn decode_rows(text: &str) -> Vec<Row<String>> {
    let mut records = split_records(text.trim()).into_iter();
    let Some(header) = records.next().and_then(tokenize_record) else {
        return Vec::new();
    };

    records
        .filter_map(|record| {
            let fields = tokenize_record(record)?;
            (fields.len() == header.len())
                .then(|| header.iter().cloned().zip(fields).collect::<Row<String>>())
        })
        .collect()
}

fn join_fields<'a>(fields: impl Iterator<Item = Cow<'a, str>>) -> String {
    fields.collect::<Vec<_>>().join(",")
}

fn quote_field(text: &str) -> Cow<'_, str> {
    if text.contains([',', '"', '\n', '\r']) {
        Cow::Owned(format!("\"{}\"", text.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(text)
    }
}

fn split_records(text: &str) -> Vec<&str> {
    let mut records = Vec::new();
    let mut rest = text;

    while let Some((end, next)) = next_record_end(rest) {
        records.push(&rest[..end]);
        rest = &rest[next..];
    }
    records.push(rest);

    records
}

/// Locates the line break closing the first record of `text`, returning the
/// record end and the start of the following record.
///
/// A `"` opens a quoted section only at the start of a field; anywhere else in
/// an unquoted field it is a literal character. Line breaks inside a quoted
/// section belong to the field. When the text ends inside an open quote, the
/// record is cut at the first line break after that quote opened.
fn next_record_end(text: &str) -> Option<(usize, usize)> {
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut open_quote_break = None;
    let mut characters = text.char_indices().peekable();

    while let Some((index, character)) = characters.next() {
        match character {
            '"' if in_quotes => {
                if characters.peek().is_some_and(|(_, next)| *next == '"') {
                    characters.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
                open_quote_break = None;
            }
            '\n' | '\r' if in_quotes => {
                open_quote_break.get_or_insert((index, line_break_end(text, index)));
            }
            '\n' | '\r' => return Some((index, line_break_end(text, index))),
            ',' if !in_quotes => at_field_start = true,
            ' ' | '\t' if at_field_start => {}
            _ => at_field_start = false,
        }
    }

    if in_quotes {
        open_quote_break
    } else {
        None
    }
}

fn line_break_end(text: &str, index: usize) -> usize {
    if text[index..].starts_with("\r\n") {
        index + 2
    } else {
        index + 1
    }
}

/// Splits one record into trimmed fields, or `None` when a quoted field is
/// left open.
fn tokenize_record(record: &str) -> Option<Vec<String>> {
    let mut fields = Vec::new();
    let mut current = String::new();
    let mut in_quotes = false;
    let mut at_field_start = true;
    let mut characters = record.chars().peekable();

    while let Some(character) = characters.next() {
        match character {
            '"' if in_quotes => {
                if characters.peek() == Some(&'"') {
                    current.push('"');
                    characters.next();
                } else {
                    in_quotes = false;
                }
            }
            '"' if at_field_start => {
                in_quotes = true;
                at_field_start = false;
            }
            ',' if !in_quotes => {
                fields.push(take_field(&mut current));
                at_field_start = true;
            }
            ' ' | '\t' if at_field_start => current.push(character),
            _ => {
                current.push(character);
                at_field_start = false;
            }
        }
    }

    if in_quotes {
        return None;
    }
    fields.push(take_field(&mut current));

    Some(fields)
}

fn take_field(current: &mut String) -> String {
    let field = current.trim().to_owned();
    current.clear();
    field
}
