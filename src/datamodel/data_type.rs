use serde::{Deserialize, Serialize};
use std::{fmt, str::FromStr};

/// Semantic type of a cell or a column.
///
/// Declaration order matters: it is the tie-break order when two types have
/// the same count in a column sample.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub enum DataType {
    #[default]
    Unknown,
    Text,
    Number,
    Currency,
    Percentage,
    Date,
    Boolean,
    /// Formula error marker such as `#N/A`. Never a dominant type.
    Error,
}

impl DataType {
    pub const ALL: [DataType; 8] = [
        DataType::Unknown,
        DataType::Text,
        DataType::Number,
        DataType::Currency,
        DataType::Percentage,
        DataType::Date,
        DataType::Boolean,
        DataType::Error,
    ];

    /// Whether the type may win the dominant-type vote of a column.
    pub fn is_dominant_candidate(self) -> bool {
        match self {
            DataType::Unknown | DataType::Error => false,
            DataType::Text
            | DataType::Number
            | DataType::Currency
            | DataType::Percentage
            | DataType::Date
            | DataType::Boolean => true,
        }
    }

    pub fn is_numeric(self) -> bool {
        matches!(
            self,
            DataType::Number | DataType::Currency | DataType::Percentage
        )
    }
}

impl fmt::Display for DataType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            DataType::Unknown => "Unknown",
            DataType::Text => "Text",
            DataType::Number => "Number",
            DataType::Currency => "Currency",
            DataType::Percentage => "Percentage",
            DataType::Date => "Date",
            DataType::Boolean => "Boolean",
            DataType::Error => "Error",
        };
        write!(f, "{}", s)
    }
}

impl FromStr for DataType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "unknown" => Ok(DataType::Unknown),
            "text" | "string" => Ok(DataType::Text),
            "number" | "numeric" => Ok(DataType::Number),
            "currency" => Ok(DataType::Currency),
            "percentage" | "percent" => Ok(DataType::Percentage),
            "date" | "datetime" => Ok(DataType::Date),
            "boolean" | "bool" => Ok(DataType::Boolean),
            "error" => Ok(DataType::Error),
            _ => Err(format!("Unknown data type: {}", s)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_declaration_order() {
        assert!(DataType::Text < DataType::Number);
        assert!(DataType::Number < DataType::Currency);
        assert!(DataType::Boolean < DataType::Error);
        let mut sorted = DataType::ALL;
        sorted.sort();
        assert_eq!(sorted, DataType::ALL);
    }

    #[test]
    fn test_dominant_candidates() {
        assert!(!DataType::Unknown.is_dominant_candidate());
        assert!(!DataType::Error.is_dominant_candidate());
        assert!(DataType::Text.is_dominant_candidate());
        assert!(DataType::Percentage.is_dominant_candidate());
    }

    #[test]
    fn test_display_from_str() {
        for data_type in DataType::ALL {
            assert_eq!(
                DataType::from_str(&data_type.to_string()).unwrap(),
                data_type
            );
        }
        assert!(DataType::from_str("blob").is_err());
    }
}
