use num_bigint::BigUint;
use tracing::warn;

use crate::error::AmountError;

/// Largest negative exponent rendered on the scientific path.
const MAX_NEGATIVE_EXPONENT: u32 = 400;

/// Extra fractional digits kept when rendering a zero or negative exponent.
const SCIENTIFIC_EXTRA_DIGITS: u32 = 6;

/// A rendered amount.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedAmount {
    pub text: String,

    /// `false` when the value was approximated through floating point.
    pub exact: bool,
}

impl RenderedAmount {
    fn exact(text: String) -> Self {
        Self { text, exact: true }
    }

    fn approximate(text: String) -> Self {
        Self { text, exact: false }
    }
}

/// Convert `amount` to a decimal string, returning the input unchanged if
/// it cannot be parsed.
pub fn wei_to_decimal(amount: &str, decimals: u8) -> String {
    match render_amount(amount, decimals) {
        Ok(rendered) => rendered.text,
        Err(e) => {
            warn!(amount, error = %e, "amount left unconverted");
            amount.to_string()
        }
    }
}

/// Convert `amount` to a decimal string, reporting parse failures and
/// whether the result is exact.
///
/// Blank input renders as `"0"`. Surrounding ASCII whitespace is ignored.
pub fn render_amount(amount: &str, decimals: u8) -> Result<RenderedAmount, AmountError> {
    let amount = amount.trim();
    if amount.is_empty() {
        return Ok(RenderedAmount::exact("0".to_string()));
    }

    if let Some((mantissa, exponent)) = amount.split_once(['e', 'E']) {
        return render_scientific(amount, mantissa, exponent).map(RenderedAmount::approximate);
    }

    if !amount.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AmountError::InvalidDigits(amount.to_string()));
    }
    let value = BigUint::parse_bytes(amount.as_bytes(), 10)
        .ok_or_else(|| AmountError::InvalidDigits(amount.to_string()))?;

    Ok(RenderedAmount::exact(format_with_decimals(&value, decimals)))
}

/// Format a BigUint with decimal places, trimming trailing fractional zeros.
pub fn format_with_decimals(amount: &BigUint, decimals: u8) -> String {
    let divisor = BigUint::from(10u32).pow(u32::from(decimals));
    let integer_part = amount / &divisor;
    let remainder = amount % &divisor;

    let fraction = format!(
        "{:0>width$}",
        remainder.to_string(),
        width = usize::from(decimals)
    );
    let fraction = fraction.trim_end_matches('0');

    if fraction.is_empty() {
        integer_part.to_string()
    } else {
        format!("{integer_part}.{fraction}")
    }
}

/// Render a scientific-notation amount through `f64`.
///
/// A positive exponent renders `mantissa * 10^exponent`. Otherwise the
/// mantissa itself is rendered, unscaled, with `|exponent| + 6` fractional
/// digits. Token decimals are not applied on this path.
fn render_scientific(raw: &str, mantissa: &str, exponent: &str) -> Result<String, AmountError> {
    let invalid = || AmountError::InvalidScientific(raw.to_string());

    let base: f64 = mantissa.trim().parse().map_err(|_| invalid())?;
    let exponent: i32 = exponent.trim().parse().map_err(|_| invalid())?;
    if !base.is_finite() {
        return Err(invalid());
    }

    warn!(amount = raw, "scientific notation amount rendered approximately");

    if exponent > 0 {
        let value = base * 10f64.powi(exponent);
        if !value.is_finite() {
            return Err(invalid());
        }
        Ok(value.to_string())
    } else {
        let magnitude = exponent.unsigned_abs();
        if magnitude > MAX_NEGATIVE_EXPONENT {
            return Err(invalid());
        }
        let precision = (magnitude + SCIENTIFIC_EXTRA_DIGITS) as usize;
        Ok(format!("{base:.precision$}"))
    }
}
