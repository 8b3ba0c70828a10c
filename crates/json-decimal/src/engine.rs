use std::borrow::Cow;
use std::collections::HashMap;

use serde_json::{Map, Value};
use tracing::{debug, warn};

use crate::amount::{render_amount, RenderedAmount};
use crate::error::AmountError;
use crate::token::TokenSource;
use crate::types::path::JsonPath;
use crate::types::rule::ConversionRule;

/// Token keys that always resolve from their own object when present there,
/// so paired sell/buy amounts stay locked to their order.
const PINNED_TOKEN_KEYS: [&str; 2] = ["sellToken", "buyToken"];

/// Token metadata resolved for one token-address field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedToken {
    /// Lowercased address as found in the document.
    pub address: String,
    pub decimals: u8,
    pub symbol: String,
}

impl ResolvedToken {
    fn resolve(address: &str, tokens: &dyn TokenSource) -> Self {
        let address = address.to_lowercase();
        let info = tokens.token_info(&address);
        Self {
            address,
            decimals: info.decimals,
            symbol: info.symbol,
        }
    }
}

/// Token fields defined directly on one object, by token key.
type Scope = HashMap<String, ResolvedToken>;

/// Where token-address fields live in a document.
///
/// Built once per conversion and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TokenScopeIndex {
    scopes: HashMap<JsonPath, Scope>,
}

impl TokenScopeIndex {
    /// The token recorded for `token_key` directly on the object at `object_path`.
    pub fn get(&self, object_path: &JsonPath, token_key: &str) -> Option<&ResolvedToken> {
        self.scopes.get(object_path)?.get(token_key)
    }

    /// Number of token fields recorded.
    pub fn len(&self) -> usize {
        self.scopes.values().map(HashMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.scopes.is_empty()
    }

    fn scope(&self, object_path: &JsonPath) -> Option<&Scope> {
        self.scopes.get(object_path)
    }
}

/// Summary of a conversion run.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConversionReport {
    /// Amount fields rewritten.
    pub converted: usize,

    /// Fields left unchanged or rendered approximately.
    pub warnings: Vec<String>,
}

/// Converted document together with its report.
#[derive(Debug, Clone)]
pub struct ConvertedDocument {
    pub value: Value,
    pub report: ConversionReport,
}

/// Rewrite amount fields of `document` into decimal strings.
///
/// Returns a deep copy; the input is not modified. Scalars are returned
/// unchanged.
pub fn convert(document: &Value, rules: &[ConversionRule], tokens: &dyn TokenSource) -> Value {
    convert_with_report(document, rules, tokens).value
}

/// Same as [`convert`], also reporting what was rewritten.
pub fn convert_with_report(
    document: &Value,
    rules: &[ConversionRule],
    tokens: &dyn TokenSource,
) -> ConvertedDocument {
    let mut value = document.clone();
    if !(value.is_object() || value.is_array()) {
        return ConvertedDocument {
            value,
            report: ConversionReport::default(),
        };
    }

    let index = collect_token_scopes(document, rules, tokens);
    let report = apply_conversions(&mut value, rules, &index, tokens);
    debug!(
        token_fields = index.len(),
        converted = report.converted,
        warnings = report.warnings.len(),
        "document converted"
    );

    ConvertedDocument { value, report }
}

/// First pass: record every object field named by a rule's `token_key`
/// that holds a string.
pub fn collect_token_scopes(
    document: &Value,
    rules: &[ConversionRule],
    tokens: &dyn TokenSource,
) -> TokenScopeIndex {
    let mut index = TokenScopeIndex::default();
    let mut path = JsonPath::root();
    collect_value(document, rules, tokens, &mut path, &mut index);
    index
}

fn collect_value(
    value: &Value,
    rules: &[ConversionRule],
    tokens: &dyn TokenSource,
    path: &mut JsonPath,
    index: &mut TokenScopeIndex,
) {
    match value {
        Value::Object(map) => {
            let mut scope = Scope::new();
            for rule in rules {
                if let Some(Value::String(address)) = map.get(&rule.token_key) {
                    scope.insert(
                        rule.token_key.clone(),
                        ResolvedToken::resolve(address, tokens),
                    );
                }
            }
            if !scope.is_empty() {
                index.scopes.insert(path.clone(), scope);
            }

            for (key, child) in map {
                path.push_key(key);
                collect_value(child, rules, tokens, path, index);
                path.pop();
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter().enumerate() {
                path.push_index(i);
                collect_value(item, rules, tokens, path, index);
                path.pop();
            }
        }
        _ => {}
    }
}

/// Context shared by the second pass.
struct ConvertContext<'a> {
    rules: &'a [ConversionRule],
    index: &'a TokenScopeIndex,
    tokens: &'a dyn TokenSource,
    report: ConversionReport,
}

/// Second pass: rewrite amount fields in place using a prebuilt index.
///
/// Each object resolves a rule's token from its own fields first, then from
/// the nearest enclosing object that defines the rule's `token_key`.
pub fn apply_conversions(
    document: &mut Value,
    rules: &[ConversionRule],
    index: &TokenScopeIndex,
    tokens: &dyn TokenSource,
) -> ConversionReport {
    let mut ctx = ConvertContext {
        rules,
        index,
        tokens,
        report: ConversionReport::default(),
    };
    let mut path = JsonPath::root();
    let mut scopes = Vec::new();
    convert_value(&mut ctx, document, &mut path, &mut scopes);
    ctx.report
}

fn convert_value<'a>(
    ctx: &mut ConvertContext<'a>,
    value: &mut Value,
    path: &mut JsonPath,
    scopes: &mut Vec<&'a Scope>,
) {
    match value {
        Value::Object(map) => {
            let index = ctx.index;
            let own = index.scope(path);
            if let Some(scope) = own {
                scopes.push(scope);
            }

            convert_fields(ctx, map, path, scopes);

            for (key, child) in map.iter_mut() {
                path.push_key(key);
                convert_value(ctx, child, path, scopes);
                path.pop();
            }

            if own.is_some() {
                scopes.pop();
            }
        }
        Value::Array(items) => {
            for (i, item) in items.iter_mut().enumerate() {
                path.push_index(i);
                convert_value(ctx, item, path, scopes);
                path.pop();
            }
        }
        _ => {}
    }
}

/// Rewrite the amount fields of one object.
///
/// Every applicable rule renders from the original value; when rules
/// overlap on a field the last one wins.
fn convert_fields(
    ctx: &mut ConvertContext<'_>,
    map: &mut Map<String, Value>,
    path: &JsonPath,
    scopes: &[&Scope],
) {
    let mut pending: Vec<(String, Result<RenderedAmount, AmountError>)> = Vec::new();

    for rule in ctx.rules {
        let Some(token) = resolve_token(ctx.tokens, map, rule, scopes) else {
            continue;
        };

        for amount_key in &rule.amount_keys {
            let Some(Value::String(raw)) = map.get(amount_key) else {
                continue;
            };

            let outcome = render_amount(raw, token.decimals).map(|rendered| RenderedAmount {
                text: with_symbol(rendered.text, &token.symbol),
                exact: rendered.exact,
            });

            match pending.iter_mut().find(|(key, _)| key == amount_key) {
                Some(slot) => slot.1 = outcome,
                None => pending.push((amount_key.clone(), outcome)),
            }
        }
    }

    for (key, outcome) in pending {
        let field = path.child(&key);
        match outcome {
            Ok(rendered) => {
                if !rendered.exact {
                    ctx.report
                        .warnings
                        .push(format!("{field}: scientific notation rendered approximately"));
                }
                debug!(path = %field, value = %rendered.text, "amount converted");
                if let Some(slot) = map.get_mut(&key) {
                    *slot = Value::String(rendered.text);
                    ctx.report.converted += 1;
                }
            }
            Err(e) => {
                warn!(path = %field, error = %e, "amount left unconverted");
                ctx.report.warnings.push(format!("{field}: {e}"));
            }
        }
    }
}

/// Find the token governing `rule` at the current object.
fn resolve_token<'s>(
    tokens: &dyn TokenSource,
    map: &Map<String, Value>,
    rule: &ConversionRule,
    scopes: &[&'s Scope],
) -> Option<Cow<'s, ResolvedToken>> {
    if PINNED_TOKEN_KEYS.contains(&rule.token_key.as_str()) {
        if let Some(Value::String(address)) = map.get(&rule.token_key) {
            return Some(Cow::Owned(ResolvedToken::resolve(address, tokens)));
        }
    }

    scopes
        .iter()
        .rev()
        .find_map(|scope| scope.get(&rule.token_key))
        .map(Cow::Borrowed)
}

fn with_symbol(amount: String, symbol: &str) -> String {
    if symbol.is_empty() {
        amount
    } else {
        format!("{amount} {symbol}")
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::token::{TokenInfo, TokenTable};

    const USDT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";
    const USDC: &str = "0xa0b86991c6218b36c1d19d4a2e9eb0ce3606eb48";
    const WBTC: &str = "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599";
    const UNKNOWN: &str = "0x1111111111111111111111111111111111111111";

    fn tokens() -> TokenTable {
        TokenTable::from_entries([
            (USDT, TokenInfo::new(6, "USDT")),
            (USDC, TokenInfo::new(6, "USDC")),
            (WBTC, TokenInfo::new(8, "WBTC")),
        ])
    }

    fn swap_rules() -> Vec<ConversionRule> {
        vec![
            ConversionRule::new("tokenIn", ["amountIn"]),
            ConversionRule::new("tokenOut", ["amountOut"]),
            ConversionRule::new("sellToken", ["sellAmount"]),
            ConversionRule::new("buyToken", ["buyAmount"]),
        ]
    }

    #[test]
    fn test_converts_with_symbol() {
        let doc = json!({ "tokenIn": USDT, "amountIn": "1000000000" });
        let out = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(out, json!({ "tokenIn": USDT, "amountIn": "1000 USDT" }));
    }

    #[test]
    fn test_mixed_case_address() {
        let doc = json!({
            "tokenOut": "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599",
            "amountOut": "5000000"
        });
        let out = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(out["amountOut"], "0.05 WBTC");
        assert_eq!(out["tokenOut"], "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599");
    }

    #[test]
    fn test_nested_scope_fallback() {
        let doc = json!({
            "tokenIn": UNKNOWN,
            "nested": { "amountIn": "1500000000000000000" }
        });
        let out = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(out["nested"]["amountIn"], "1.5");
    }

    #[test]
    fn test_inner_scope_shadows_outer() {
        let doc = json!({
            "tokenIn": USDT,
            "amountIn": "1000000000",
            "nested": {
                "tokenIn": WBTC,
                "amountIn": "500000000",
                "deeper": { "amountIn": "100000000" }
            }
        });
        let out = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(out["amountIn"], "1000 USDT");
        assert_eq!(out["nested"]["amountIn"], "5 WBTC");
        assert_eq!(out["nested"]["deeper"]["amountIn"], "1 WBTC");
    }

    #[test]
    fn test_sell_and_buy_locked_to_own_object() {
        let doc = json!({
            "tokenIn": USDC,
            "tokenOut": USDT,
            "sellToken": USDC,
            "order": {
                "sellToken": WBTC,
                "sellAmount": "250000000",
                "buyToken": USDT,
                "buyAmount": "2000000",
                "amountIn": "3000000"
            }
        });
        let out = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(out["order"]["sellAmount"], "2.5 WBTC");
        assert_eq!(out["order"]["buyAmount"], "2 USDT");
        assert_eq!(out["order"]["amountIn"], "3 USDC");
    }

    #[test]
    fn test_unregistered_address_defaults_to_18() {
        let doc = json!({ "sellToken": UNKNOWN, "sellAmount": "685011378174792784" });
        let out = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(out["sellAmount"], "0.685011378174792784");
    }

    #[test]
    fn test_array_elements_do_not_share_scope() {
        let doc = json!([
            { "tokenIn": USDT, "amountIn": "1000000" },
            { "amountIn": "1000000" }
        ]);
        let out = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(out[0]["amountIn"], "1 USDT");
        assert_eq!(out[1]["amountIn"], "1000000");
    }

    #[test]
    fn test_array_inherits_enclosing_object() {
        let doc = json!({
            "tokenIn": USDT,
            "fills": [ { "amountIn": "1000000" }, [ { "amountIn": "2000000" } ] ]
        });
        let out = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(out["fills"][0]["amountIn"], "1 USDT");
        assert_eq!(out["fills"][1][0]["amountIn"], "2 USDT");
    }

    #[test]
    fn test_dotted_key_does_not_leak_scope() {
        let doc = json!({
            "a": { "tokenIn": USDT },
            "a.b": { "amountIn": "1000000" }
        });
        let out = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(out["a.b"]["amountIn"], "1000000");
    }

    #[test]
    fn test_non_string_values_untouched() {
        let doc = json!({
            "tokenIn": USDT,
            "amountIn": 1000000,
            "nested": { "amountIn": null, "tokenOut": 5, "amountOut": "1000000" }
        });
        let out = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(out["amountIn"], 1000000);
        assert_eq!(out["nested"]["amountIn"], Value::Null);
        // Non-string token field is not a scope.
        assert_eq!(out["nested"]["amountOut"], "1000000");
    }

    #[test]
    fn test_unparseable_amount_reported() {
        let doc = json!({ "tokenIn": USDT, "amountIn": "lots", "x": [{ "amountIn": "1e-2" }] });
        let result = convert_with_report(&doc, &swap_rules(), &tokens());
        assert_eq!(result.value["amountIn"], "lots");
        assert_eq!(result.value["x"][0]["amountIn"], "1.00000000 USDT");
        assert_eq!(result.report.converted, 1);
        assert_eq!(result.report.warnings.len(), 2);
        assert!(result.report.warnings[0].starts_with("amountIn:"));
        assert!(result.report.warnings[1].starts_with("x[0].amountIn:"));
    }

    #[test]
    fn test_overlapping_rules_last_wins() {
        let rules = vec![
            ConversionRule::new("tokenIn", ["amount"]),
            ConversionRule::new("tokenOut", ["amount"]),
        ];
        let doc = json!({ "tokenIn": USDT, "tokenOut": WBTC, "amount": "100000000" });
        let result = convert_with_report(&doc, &rules, &tokens());
        assert_eq!(result.value["amount"], "1 WBTC");
        assert_eq!(result.report.converted, 1);

        // A rule without a resolvable token does not override.
        let doc = json!({ "tokenIn": USDT, "amount": "100000000" });
        let out = convert(&doc, &rules, &tokens());
        assert_eq!(out["amount"], "100 USDT");
    }

    #[test]
    fn test_no_double_conversion_without_symbol() {
        let rules = vec![
            ConversionRule::new("tokenIn", ["amount"]),
            ConversionRule::new("tokenOut", ["amount"]),
        ];
        let doc = json!({ "tokenIn": UNKNOWN, "tokenOut": UNKNOWN, "amount": "2000000000000000000000" });
        let out = convert(&doc, &rules, &tokens());
        assert_eq!(out["amount"], "2000");
    }

    #[test]
    fn test_scalars_pass_through() {
        for doc in [json!("1000000"), json!(42), json!(null), json!(true)] {
            assert_eq!(convert(&doc, &swap_rules(), &tokens()), doc);
        }
    }

    #[test]
    fn test_input_not_modified_and_repeatable() {
        let doc = json!({ "tokenIn": USDT, "amountIn": "1000000" });
        let first = convert(&doc, &swap_rules(), &tokens());
        let second = convert(&doc, &swap_rules(), &tokens());
        assert_eq!(doc["amountIn"], "1000000");
        assert_eq!(first, second);
    }

    #[test]
    fn test_structure_and_key_order_preserved() {
        let doc: Value = serde_json::from_str(
            r#"{"zeta":1,"tokenIn":"0xdac17f958d2ee523a2206206994597c13d831ec7","amountIn":"1","alpha":[3,2,1],"mid":{}}"#,
        )
        .unwrap();
        let out = convert(&doc, &swap_rules(), &tokens());

        let keys: Vec<&String> = out.as_object().unwrap().keys().collect();
        assert_eq!(keys, ["zeta", "tokenIn", "amountIn", "alpha", "mid"]);
        assert_eq!(out["alpha"], json!([3, 2, 1]));
        assert_eq!(out["mid"], json!({}));
        assert_eq!(out["amountIn"], "0.000001 USDT");
    }

    #[test]
    fn test_collect_token_scopes() {
        let doc = json!({
            "tokenIn": USDT,
            "orders": [ { "sellToken": "0x2260FAC5E5542a773Aa44fBCfeDf7C193bc2C599", "buyToken": 7 } ]
        });
        let index = collect_token_scopes(&doc, &swap_rules(), &tokens());
        assert_eq!(index.len(), 2);

        let root = index.get(&JsonPath::root(), "tokenIn").unwrap();
        assert_eq!(root.decimals, 6);
        assert_eq!(root.symbol, "USDT");

        let mut order = JsonPath::root();
        order.push_key("orders");
        order.push_index(0);
        let sell = index.get(&order, "sellToken").unwrap();
        assert_eq!(sell.address, WBTC);
        assert_eq!(sell.decimals, 8);
        assert!(index.get(&order, "buyToken").is_none());
    }

    #[test]
    fn test_apply_conversions_uses_given_index() {
        let doc = json!({ "tokenIn": USDT, "amountIn": "1000000" });
        let mut value = doc.clone();
        let report = apply_conversions(&mut value, &swap_rules(), &TokenScopeIndex::default(), &tokens());
        assert_eq!(report.converted, 0);
        assert_eq!(value, doc);
    }
}
