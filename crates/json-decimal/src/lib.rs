pub mod amount;
pub mod config;
pub mod defaults;
pub mod engine;
pub mod error;
pub mod token;
pub mod types;

use serde_json::Value;

use error::Error;

// Re-exports for convenience
pub use amount::{render_amount, wei_to_decimal, RenderedAmount};
pub use config::AppConfig;
pub use engine::{ConversionReport, ConvertedDocument, TokenScopeIndex};
pub use token::{TokenInfo, TokenRegistry, TokenSource, TokenTable};
pub use types::rule::ConversionRule;

/// Convert amount fields of `document` against the registry's current table.
///
/// The table is pinned for the whole call, so a concurrent
/// [`TokenRegistry::replace_all`] never shows up halfway through a document.
pub fn convert(document: &Value, rules: &[ConversionRule], registry: &TokenRegistry) -> Value {
    convert_with_report(document, rules, registry).value
}

/// Same as [`convert`], also reporting what was rewritten.
pub fn convert_with_report(
    document: &Value,
    rules: &[ConversionRule],
    registry: &TokenRegistry,
) -> ConvertedDocument {
    let tokens = registry.current();
    engine::convert_with_report(document, rules, tokens.as_ref())
}

/// Parse a JSON document, rejecting malformed text as a whole.
pub fn parse_document(text: &str) -> Result<Value, Error> {
    Ok(serde_json::from_str(text)?)
}

/// High-level convenience: parse JSON text, convert it, and serialize the result.
pub fn convert_str(
    text: &str,
    rules: &[ConversionRule],
    registry: &TokenRegistry,
    pretty: bool,
) -> Result<String, Error> {
    let document = parse_document(text)?;
    let converted = convert(&document, rules, registry);
    let output = if pretty {
        serde_json::to_string_pretty(&converted)?
    } else {
        serde_json::to_string(&converted)?
    };
    Ok(output)
}
