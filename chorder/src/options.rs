use crate::error::Error;
use std::fmt;
use std::str::FromStr;

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct OrderOptions {
    pub column_matching: ColumnMatching,
}

/// How column references from different statements are compared.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ColumnMatching {
    /// Columns match on name alone, whatever table they belong to.
    #[default]
    Name,
    /// Columns match on name, and on table when both sides know it.
    /// Unqualified columns of multi-table selects still match any table.
    Qualified,
}

impl fmt::Display for ColumnMatching {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ColumnMatching::Name => f.write_str("name"),
            ColumnMatching::Qualified => f.write_str("qualified"),
        }
    }
}

impl FromStr for ColumnMatching {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self, Error> {
        match value {
            "name" => Ok(ColumnMatching::Name),
            "qualified" => Ok(ColumnMatching::Qualified),
            other => Err(Error::Input(format!(
                "unknown column matching '{}', expected 'name' or 'qualified'",
                other
            ))),
        }
    }
}
