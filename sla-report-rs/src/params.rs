//! Report parameters and SLA threshold validation

use serde::Deserialize;
use serde_json::Value;

/// Default reviewer display name; deployments override this with the
/// actual reviewer account
fn default_reviewer() -> String {
    "SLA Reviewer".to_string()
}

/// Inputs of one report run, as supplied by the caller.
///
/// The threshold fields arrive as loosely-typed JSON (numbers or numeric
/// strings); they are parsed and validated by [`SlaThresholds::from_params`]
/// during the driver's configure phase.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportParameters {
    /// Bearer token for the ticketing system
    pub api_token: String,

    /// Days after which a request turns RED
    pub offset_red_days: Value,

    /// Days after which a request turns YELLOW
    pub offset_yellow_days: Value,

    /// Optional connection-type filter
    #[serde(default)]
    pub trans_type: Option<FilterSelection>,

    /// Optional product filter
    #[serde(default)]
    pub product: Option<FilterSelection>,

    /// Display name of the designated reviewer whose notes are grouped
    #[serde(default = "default_reviewer")]
    pub reviewer: String,
}

/// An "all or allow-list" filter selector
#[derive(Debug, Clone, Deserialize)]
pub struct FilterSelection {
    /// When true, no filtering is applied
    pub all: bool,

    /// Allowed values, consulted only when `all` is false
    #[serde(default)]
    pub choices: Vec<String>,
}

impl FilterSelection {
    /// The allow-list to apply, if any
    pub fn allow_list(&self) -> Option<&[String]> {
        if self.all {
            None
        } else {
            Some(&self.choices)
        }
    }
}

/// Validated SLA thresholds, `red > yellow` guaranteed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SlaThresholds {
    pub red: i64,
    pub yellow: i64,
}

impl SlaThresholds {
    /// Parse and validate the thresholds out of the report parameters.
    ///
    /// The error messages are surfaced verbatim to the caller.
    pub fn from_params(params: &ReportParameters) -> Result<Self, String> {
        let red = parse_days(&params.offset_red_days);
        let yellow = parse_days(&params.offset_yellow_days);

        let (Some(red), Some(yellow)) = (red, yellow) else {
            return Err("Yellow and Red zone must be defined as amount of days".to_string());
        };

        if red <= yellow {
            return Err("Red zone must be for more days than yellow one".to_string());
        }

        Ok(Self { red, yellow })
    }
}

fn parse_days(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n.as_i64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn params(red: Value, yellow: Value) -> ReportParameters {
        ReportParameters {
            api_token: "token".to_string(),
            offset_red_days: red,
            offset_yellow_days: yellow,
            trans_type: None,
            product: None,
            reviewer: default_reviewer(),
        }
    }

    #[test]
    fn test_thresholds_from_numbers_and_strings() {
        let thresholds = SlaThresholds::from_params(&params(json!(10), json!(5))).unwrap();
        assert_eq!(thresholds, SlaThresholds { red: 10, yellow: 5 });

        let thresholds = SlaThresholds::from_params(&params(json!("10"), json!("5"))).unwrap();
        assert_eq!(thresholds, SlaThresholds { red: 10, yellow: 5 });
    }

    #[test]
    fn test_unparsable_thresholds_rejected() {
        let error = SlaThresholds::from_params(&params(json!("ten"), json!(5))).unwrap_err();
        assert_eq!(error, "Yellow and Red zone must be defined as amount of days");

        let error = SlaThresholds::from_params(&params(json!(null), json!(5))).unwrap_err();
        assert_eq!(error, "Yellow and Red zone must be defined as amount of days");
    }

    #[test]
    fn test_red_must_exceed_yellow() {
        let error = SlaThresholds::from_params(&params(json!(5), json!(5))).unwrap_err();
        assert_eq!(error, "Red zone must be for more days than yellow one");

        let error = SlaThresholds::from_params(&params(json!(3), json!(5))).unwrap_err();
        assert_eq!(error, "Red zone must be for more days than yellow one");
    }

    #[test]
    fn test_parameters_deserialization() {
        let params: ReportParameters = serde_json::from_value(json!({
            "api_token": "secret",
            "offset_red_days": 10,
            "offset_yellow_days": "5",
            "trans_type": {"all": false, "choices": ["test"]},
            "product": {"all": true}
        }))
        .unwrap();

        assert_eq!(params.api_token, "secret");
        assert_eq!(
            params.trans_type.as_ref().unwrap().allow_list(),
            Some(&["test".to_string()][..])
        );
        assert_eq!(params.product.as_ref().unwrap().allow_list(), None);
        assert_eq!(params.reviewer, "SLA Reviewer");
    }
}
