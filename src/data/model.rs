use std::fmt;

use chrono::{NaiveDate, NaiveDateTime};

// ---------------------------------------------------------------------------
// CellValue – a single cell of the loaded table
// ---------------------------------------------------------------------------

/// Tokens that conventional CSV readers treat as "missing" rather than text.
const MISSING_MARKERS: &[&str] = &[
    "", "NA", "N/A", "n/a", "NaN", "nan", "-NaN", "-nan", "null", "NULL", "None", "#N/A",
    "<NA>",
];

/// A dynamically-typed cell mirroring the dtypes a dataframe reader infers.
#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Integer(i64),
    Float(f64),
    Bool(bool),
    /// ISO-8601 date or date-time, kept as the original text.
    Date(String),
    Text(String),
    Null,
}

impl CellValue {
    /// Infer the type of a raw CSV field.
    pub fn parse(raw: &str) -> Self {
        let s = raw.trim();
        if MISSING_MARKERS.contains(&s) {
            return CellValue::Null;
        }
        if let Ok(i) = s.parse::<i64>() {
            return CellValue::Integer(i);
        }
        if let Ok(f) = s.parse::<f64>() {
            // Infinities and overflowing literals stay numeric; NaN is missing.
            return if f.is_nan() {
                CellValue::Null
            } else {
                CellValue::Float(f)
            };
        }
        if s.eq_ignore_ascii_case("true") || s.eq_ignore_ascii_case("false") {
            return CellValue::Bool(s.eq_ignore_ascii_case("true"));
        }
        if looks_like_date(s) {
            return CellValue::Date(s.to_string());
        }
        CellValue::Text(raw.to_string())
    }

    /// Numeric view of the cell, `None` for non-numeric or missing cells.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            CellValue::Float(v) => Some(*v),
            CellValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, CellValue::Null)
    }
}

fn looks_like_date(s: &str) -> bool {
    NaiveDate::parse_from_str(s, "%Y-%m-%d").is_ok()
        || NaiveDate::parse_from_str(s, "%Y/%m/%d").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S").is_ok()
        || NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S").is_ok()
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Integer(i) => write!(f, "{i}"),
            CellValue::Float(v) => write!(f, "{v}"),
            CellValue::Bool(b) => write!(f, "{b}"),
            CellValue::Date(d) | CellValue::Text(d) => write!(f, "{d}"),
            CellValue::Null => write!(f, "<NA>"),
        }
    }
}

// ---------------------------------------------------------------------------
// Column – one named column with its inferred kind
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnKind {
    Numeric,
    Boolean,
    Date,
    Text,
}

impl ColumnKind {
    /// A column takes the kind shared by all its non-missing cells. A column
    /// with no values at all is numeric (every cell is a missing float).
    pub fn infer(cells: &[CellValue]) -> Self {
        let mut present = cells.iter().filter(|c| !c.is_null()).peekable();
        if present.peek().is_none() {
            return ColumnKind::Numeric;
        }
        let present: Vec<&CellValue> = present.collect();
        if present
            .iter()
            .all(|c| matches!(c, CellValue::Integer(_) | CellValue::Float(_)))
        {
            ColumnKind::Numeric
        } else if present.iter().all(|c| matches!(c, CellValue::Bool(_))) {
            ColumnKind::Boolean
        } else if present.iter().all(|c| matches!(c, CellValue::Date(_))) {
            ColumnKind::Date
        } else {
            ColumnKind::Text
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            ColumnKind::Numeric => "numeric",
            ColumnKind::Boolean => "bool",
            ColumnKind::Date => "date",
            ColumnKind::Text => "text",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Column {
    pub name: String,
    pub kind: ColumnKind,
    pub cells: Vec<CellValue>,
}

impl Column {
    pub fn new(name: impl Into<String>, cells: Vec<CellValue>) -> Self {
        let kind = ColumnKind::infer(&cells);
        Column {
            name: name.into(),
            kind,
            cells,
        }
    }

    pub fn is_numeric(&self) -> bool {
        self.kind == ColumnKind::Numeric
    }
}

// ---------------------------------------------------------------------------
// Dataset – the complete loaded table
// ---------------------------------------------------------------------------

/// The parsed table: ordered columns of equal length.
#[derive(Debug, Clone)]
pub struct Dataset {
    pub columns: Vec<Column>,
    row_count: usize,
}

impl Dataset {
    /// Build a column-major dataset from parsed rows. Rows shorter than the
    /// header are padded with missing cells.
    pub fn from_rows(headers: Vec<String>, rows: Vec<Vec<CellValue>>) -> Self {
        let row_count = rows.len();
        let mut columns: Vec<Vec<CellValue>> = headers
            .iter()
            .map(|_| Vec::with_capacity(row_count))
            .collect();

        for row in rows {
            let mut row = row.into_iter();
            for col in columns.iter_mut() {
                col.push(row.next().unwrap_or(CellValue::Null));
            }
        }

        let columns = headers
            .into_iter()
            .zip(columns)
            .map(|(name, cells)| Column::new(name, cells))
            .collect();

        Dataset { columns, row_count }
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.row_count
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.row_count == 0
    }

    pub fn column_names(&self) -> impl Iterator<Item = &str> {
        self.columns.iter().map(|c| c.name.as_str())
    }

    pub fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|c| c.name == name)
    }

    pub fn numeric_column_count(&self) -> usize {
        self.columns.iter().filter(|c| c.is_numeric()).count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cells_by_type() {
        assert_eq!(CellValue::parse("42"), CellValue::Integer(42));
        assert_eq!(CellValue::parse(" 2.5 "), CellValue::Float(2.5));
        assert_eq!(CellValue::parse("1e3"), CellValue::Float(1000.0));
        assert_eq!(CellValue::parse("TRUE"), CellValue::Bool(true));
        assert_eq!(
            CellValue::parse("2024-03-01"),
            CellValue::Date("2024-03-01".into())
        );
        assert_eq!(CellValue::parse("abc"), CellValue::Text("abc".into()));
    }

    #[test]
    fn missing_markers_are_null() {
        for raw in ["", "  ", "NA", "NaN", "null", "#N/A", "<NA>"] {
            assert_eq!(CellValue::parse(raw), CellValue::Null, "{raw:?}");
        }
    }

    #[test]
    fn infinite_spellings_stay_numeric() {
        assert_eq!(CellValue::parse("inf"), CellValue::Float(f64::INFINITY));
        assert_eq!(CellValue::parse("-inf"), CellValue::Float(f64::NEG_INFINITY));
        assert_eq!(CellValue::parse("1e400"), CellValue::Float(f64::INFINITY));

        let cells: Vec<CellValue> = ["1.5", "inf", "2"]
            .into_iter()
            .map(CellValue::parse)
            .collect();
        assert_eq!(ColumnKind::infer(&cells), ColumnKind::Numeric);
    }

    #[test]
    fn column_kind_ignores_missing_cells() {
        let cells = vec![
            CellValue::Integer(1),
            CellValue::Null,
            CellValue::Float(2.5),
        ];
        assert_eq!(ColumnKind::infer(&cells), ColumnKind::Numeric);

        let mixed = vec![CellValue::Integer(1), CellValue::Text("x".into())];
        assert_eq!(ColumnKind::infer(&mixed), ColumnKind::Text);

        assert_eq!(
            ColumnKind::infer(&[CellValue::Null, CellValue::Null]),
            ColumnKind::Numeric
        );
    }

    #[test]
    fn from_rows_pads_short_rows() {
        let ds = Dataset::from_rows(
            vec!["a".into(), "b".into()],
            vec![
                vec![CellValue::Integer(1), CellValue::Integer(2)],
                vec![CellValue::Integer(3)],
            ],
        );
        assert_eq!(ds.len(), 2);
        assert_eq!(ds.column("b").unwrap().cells[1], CellValue::Null);
        assert_eq!(ds.numeric_column_count(), 2);
        assert_eq!(ds.column_names().collect::<Vec<_>>(), vec!["a", "b"]);
    }
}
