use std::fmt;
use std::str::FromStr;

use super::error::TableError;
use super::model::{ColumnData, Table};

// ---------------------------------------------------------------------------
// Comparison operators
// ---------------------------------------------------------------------------

/// Numeric comparison applied between a cell value and a threshold.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompareOp {
    Gt,
    Ge,
    Lt,
    Le,
    Eq,
    Ne,
}

impl CompareOp {
    pub fn symbol(self) -> &'static str {
        match self {
            CompareOp::Gt => ">",
            CompareOp::Ge => ">=",
            CompareOp::Lt => "<",
            CompareOp::Le => "<=",
            CompareOp::Eq => "==",
            CompareOp::Ne => "!=",
        }
    }

    pub fn eval(self, lhs: f64, rhs: f64) -> bool {
        match self {
            CompareOp::Gt => lhs > rhs,
            CompareOp::Ge => lhs >= rhs,
            CompareOp::Lt => lhs < rhs,
            CompareOp::Le => lhs <= rhs,
            CompareOp::Eq => lhs == rhs,
            CompareOp::Ne => lhs != rhs,
        }
    }
}

impl fmt::Display for CompareOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.symbol())
    }
}

// ---------------------------------------------------------------------------
// Filter predicate
// ---------------------------------------------------------------------------

/// Keep rows where `column` compares against `threshold` under `op`.
///
/// The column must exist in the table and hold numeric values; both are
/// checked at evaluation time, not construction time.
#[derive(Debug, Clone, PartialEq)]
pub struct FilterPredicate {
    pub column: String,
    pub op: CompareOp,
    pub threshold: f64,
}

impl FilterPredicate {
    /// The canonical strict-`>` threshold filter.
    pub fn greater_than(column: impl Into<String>, threshold: f64) -> Self {
        FilterPredicate {
            column: column.into(),
            op: CompareOp::Gt,
            threshold,
        }
    }
}

impl fmt::Display for FilterPredicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.column, self.op, self.threshold)
    }
}

/// Parse the command-line filter syntax, e.g. `"Classified_insects>10000"`.
/// Two-character operators are matched before their one-character prefixes.
impl FromStr for FilterPredicate {
    type Err = TableError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        const OPS: [(&str, CompareOp); 6] = [
            (">=", CompareOp::Ge),
            ("<=", CompareOp::Le),
            ("==", CompareOp::Eq),
            ("!=", CompareOp::Ne),
            (">", CompareOp::Gt),
            ("<", CompareOp::Lt),
        ];

        for (symbol, op) in OPS {
            if let Some(pos) = s.find(symbol) {
                let column = s[..pos].trim();
                let threshold = s[pos + symbol.len()..].trim();
                if column.is_empty() {
                    return Err(TableError::InvalidPredicate(s.to_string()));
                }
                let threshold = threshold
                    .parse::<f64>()
                    .map_err(|_| TableError::InvalidPredicate(s.to_string()))?;
                return Ok(FilterPredicate {
                    column: column.to_string(),
                    op,
                    threshold,
                });
            }
        }
        Err(TableError::InvalidPredicate(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// Row selection
// ---------------------------------------------------------------------------

/// Return indices of rows that pass the predicate, in table order.
pub fn matching_indices(table: &Table, pred: &FilterPredicate) -> Result<Vec<usize>, TableError> {
    let column = table.column(&pred.column)?;
    let passes = |v: f64| pred.op.eval(v, pred.threshold);

    let indices = match &column.data {
        ColumnData::Int(v) => v
            .iter()
            .enumerate()
            .filter(|(_, &x)| passes(x as f64))
            .map(|(i, _)| i)
            .collect(),
        ColumnData::Float(v) => v
            .iter()
            .enumerate()
            .filter(|(_, &x)| passes(x))
            .map(|(i, _)| i)
            .collect(),
        other => {
            return Err(TableError::TypeMismatch {
                column: pred.column.clone(),
                dtype: other.dtype(),
            })
        }
    };
    Ok(indices)
}

/// Derive a new table containing exactly the rows passing the predicate.
/// The source table is left untouched.
pub fn filter(table: &Table, pred: &FilterPredicate) -> Result<Table, TableError> {
    let indices = matching_indices(table, pred)?;
    Ok(table.take_rows(&indices))
}
