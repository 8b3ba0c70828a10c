use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

/// Links a token-address key to the amount keys it governs.
///
/// An object field named `token_key` sets the precision for any of
/// `amount_keys` in the same object, or in descendants that do not carry
/// `token_key` themselves.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ConversionRule {
    pub token_key: String,

    #[serde(default)]
    pub amount_keys: Vec<String>,
}

impl ConversionRule {
    pub fn new<I, S>(token_key: impl Into<String>, amount_keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            token_key: token_key.into(),
            amount_keys: amount_keys.into_iter().map(Into::into).collect(),
        }
    }

    /// Drop repeated amount keys, keeping the first occurrence.
    pub fn dedup_amount_keys(&mut self) {
        let mut seen = Vec::with_capacity(self.amount_keys.len());
        self.amount_keys.retain(|key| {
            if seen.contains(key) {
                false
            } else {
                seen.push(key.clone());
                true
            }
        });
    }
}

/// Parses the command-line form `tokenIn=amountIn,execAmountIn`.
impl FromStr for ConversionRule {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (token_key, amounts) = s
            .split_once('=')
            .ok_or_else(|| ConfigError::InvalidRule(s.to_string()))?;
        let token_key = token_key.trim();
        if token_key.is_empty() {
            return Err(ConfigError::InvalidRule(s.to_string()));
        }

        let amount_keys = amounts
            .split(',')
            .map(str::trim)
            .filter(|key| !key.is_empty());
        let mut rule = ConversionRule::new(token_key, amount_keys);
        rule.dedup_amount_keys();
        Ok(rule)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rule_wire_format() {
        let rule: ConversionRule =
            serde_json::from_str(r#"{"tokenKey": "tokenIn", "amountKeys": ["amountIn"]}"#)
                .unwrap();
        assert_eq!(rule, ConversionRule::new("tokenIn", ["amountIn"]));

        let json = serde_json::to_value(&rule).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"tokenKey": "tokenIn", "amountKeys": ["amountIn"]})
        );
    }

    #[test]
    fn test_missing_amount_keys() {
        let rule: ConversionRule = serde_json::from_str(r#"{"tokenKey": "fromToken"}"#).unwrap();
        assert!(rule.amount_keys.is_empty());
    }

    #[test]
    fn test_parse_cli_rule() {
        let rule: ConversionRule = "tokenIn = amountIn, execAmountIn,amountIn".parse().unwrap();
        assert_eq!(rule.token_key, "tokenIn");
        assert_eq!(rule.amount_keys, ["amountIn", "execAmountIn"]);

        assert!("tokenIn".parse::<ConversionRule>().is_err());
        assert!("=amountIn".parse::<ConversionRule>().is_err());
    }
}
