use std::fmt;

use super::error::TableError;

// ---------------------------------------------------------------------------
// Value – a single cell
// ---------------------------------------------------------------------------

/// One scalar cell of a table.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Int(i64),
    Float(f64),
    Bool(bool),
    Str(String),
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Int(i) => write!(f, "{i}"),
            Value::Float(v) => write!(f, "{v}"),
            Value::Bool(b) => write!(f, "{b}"),
            Value::Str(s) => write!(f, "{s}"),
        }
    }
}

impl Value {
    /// Interpret the value as an `f64` for numeric comparison.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Int(i) => Some(*i as f64),
            Value::Float(v) => Some(*v),
            _ => None,
        }
    }
}

// ---------------------------------------------------------------------------
// ColumnType / ColumnData – typed columnar storage
// ---------------------------------------------------------------------------

/// The scalar type shared by every cell of one column, fixed at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnType {
    Int,
    Float,
    Bool,
    Str,
}

impl ColumnType {
    /// Whether values of this type can be compared to a numeric threshold.
    pub fn is_numeric(self) -> bool {
        matches!(self, ColumnType::Int | ColumnType::Float)
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ColumnType::Int => "int",
            ColumnType::Float => "float",
            ColumnType::Bool => "bool",
            ColumnType::Str => "str",
        };
        write!(f, "{name}")
    }
}

/// The cells of one column, stored as a single typed vector.
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int(Vec<i64>),
    Float(Vec<f64>),
    Bool(Vec<bool>),
    Str(Vec<String>),
}

impl ColumnData {
    pub fn len(&self) -> usize {
        match self {
            ColumnData::Int(v) => v.len(),
            ColumnData::Float(v) => v.len(),
            ColumnData::Bool(v) => v.len(),
            ColumnData::Str(v) => v.len(),
        }
    }

    pub fn dtype(&self) -> ColumnType {
        match self {
            ColumnData::Int(_) => ColumnType::Int,
            ColumnData::Float(_) => ColumnType::Float,
            ColumnData::Bool(_) => ColumnType::Bool,
            ColumnData::Str(_) => ColumnType::Str,
        }
    }

    /// Cell at `row` as a [`Value`]. Panics if `row` is out of bounds,
    /// like indexing a `Vec`.
    pub fn get(&self, row: usize) -> Value {
        match self {
            ColumnData::Int(v) => Value::Int(v[row]),
            ColumnData::Float(v) => Value::Float(v[row]),
            ColumnData::Bool(v) => Value::Bool(v[row]),
            ColumnData::Str(v) => Value::Str(v[row].clone()),
        }
    }

    /// New storage containing the cells at `indices`, in that order.
    fn take(&self, indices: &[usize]) -> ColumnData {
        match self {
            ColumnData::Int(v) => ColumnData::Int(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Float(v) => ColumnData::Float(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Bool(v) => ColumnData::Bool(indices.iter().map(|&i| v[i]).collect()),
            ColumnData::Str(v) => {
                ColumnData::Str(indices.iter().map(|&i| v[i].clone()).collect())
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Column – one named column
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    pub name: String,
    pub data: ColumnData,
}

impl Column {
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.len() == 0
    }

    pub fn dtype(&self) -> ColumnType {
        self.data.dtype()
    }

    pub fn get(&self, row: usize) -> Value {
        self.data.get(row)
    }

    /// Cell at `row` as `f64`, `None` for non-numeric columns.
    pub fn value_as_f64(&self, row: usize) -> Option<f64> {
        match &self.data {
            ColumnData::Int(v) => Some(v[row] as f64),
            ColumnData::Float(v) => Some(v[row]),
            _ => None,
        }
    }
}

/// Render the column name followed by one value per line.
impl fmt::Display for Column {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "{}", self.name)?;
        for row in 0..self.len() {
            writeln!(f, "{}", self.get(row))?;
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Table – the complete loaded table
// ---------------------------------------------------------------------------

/// An ordered set of equally-long named columns.
///
/// Invariants (established by the loader, preserved by every derivation):
/// column names are unique and all columns have the same length. A table is
/// never mutated in place; filtering and truncation derive new tables.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Assemble a table from columns. The caller guarantees the invariants.
    pub fn new(columns: Vec<Column>) -> Self {
        Table { columns }
    }

    pub fn n_rows(&self) -> usize {
        self.columns.first().map_or(0, Column::len)
    }

    pub fn n_cols(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.n_rows() == 0
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Column names in table order.
    pub fn column_names(&self) -> Vec<&str> {
        self.columns.iter().map(|c| c.name.as_str()).collect()
    }

    /// Look up a column by name.
    pub fn column(&self, name: &str) -> Result<&Column, TableError> {
        self.columns
            .iter()
            .find(|c| c.name == name)
            .ok_or_else(|| TableError::ColumnNotFound(name.to_string()))
    }

    /// One row as owned values, in column order.
    pub fn row(&self, row: usize) -> Vec<Value> {
        self.columns.iter().map(|c| c.get(row)).collect()
    }

    /// Derive a new table containing the rows at `indices`, in that order.
    pub fn take_rows(&self, indices: &[usize]) -> Table {
        let columns = self
            .columns
            .iter()
            .map(|c| Column {
                name: c.name.clone(),
                data: c.data.take(indices),
            })
            .collect();
        Table { columns }
    }

    /// Derive a new table containing only the first `n` rows.
    pub fn head(&self, n: usize) -> Table {
        let keep: Vec<usize> = (0..self.n_rows().min(n)).collect();
        self.take_rows(&keep)
    }
}

// ---------------------------------------------------------------------------
// Text rendering
// ---------------------------------------------------------------------------

/// Aligned text rendering: header row, then one line per data row.
/// Numeric columns are right-aligned, textual columns left-aligned.
impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.columns.is_empty() {
            return writeln!(f, "<empty table>");
        }

        // Render every cell up front so widths can be measured.
        let cells: Vec<Vec<String>> = self
            .columns
            .iter()
            .map(|c| (0..c.len()).map(|row| c.get(row).to_string()).collect())
            .collect();
        let widths: Vec<usize> = self
            .columns
            .iter()
            .zip(&cells)
            .map(|(c, col_cells)| {
                col_cells
                    .iter()
                    .map(String::len)
                    .fold(c.name.len(), usize::max)
            })
            .collect();

        let mut line = String::new();
        for (i, (c, &w)) in self.columns.iter().zip(&widths).enumerate() {
            if i > 0 {
                line.push_str("  ");
            }
            if c.dtype().is_numeric() {
                line.push_str(&format!("{:>w$}", c.name));
            } else {
                line.push_str(&format!("{:<w$}", c.name));
            }
        }
        writeln!(f, "{}", line.trim_end())?;

        for row in 0..self.n_rows() {
            line.clear();
            for (i, (c, &w)) in self.columns.iter().zip(&widths).enumerate() {
                if i > 0 {
                    line.push_str("  ");
                }
                let cell = &cells[i][row];
                if c.dtype().is_numeric() {
                    line.push_str(&format!("{cell:>w$}"));
                } else {
                    line.push_str(&format!("{cell:<w$}"));
                }
            }
            writeln!(f, "{}", line.trim_end())?;
        }
        Ok(())
    }
}
