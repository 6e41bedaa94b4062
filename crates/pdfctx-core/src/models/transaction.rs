//! Transaction records produced by domain parsers.

use serde::Serialize;

/// One bank statement line.
///
/// Serializes with `Date, Description, Amount, Source` field names, the
/// column layout of the transactions CSV.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "PascalCase")]
pub struct Transaction {
    /// Date exactly as printed on the statement.
    pub date: String,

    /// Full row text the transaction was read from.
    pub description: String,

    /// Signed amount.
    pub amount: f64,

    /// Document the row came from (file stem).
    pub source: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_serialized_field_names() {
        let tx = Transaction {
            date: "15/01/2024".to_string(),
            description: "15/01/2024 Loyer -650,00".to_string(),
            amount: -650.0,
            source: "releve".to_string(),
        };

        let json = serde_json::to_value(&tx).unwrap();
        let mut keys: Vec<&str> = json.as_object().unwrap().keys().map(String::as_str).collect();
        keys.sort();
        assert_eq!(keys, vec!["Amount", "Date", "Description", "Source"]);
        assert_eq!(json["Amount"], serde_json::json!(-650.0));
    }
}
