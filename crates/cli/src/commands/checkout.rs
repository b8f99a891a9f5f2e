//! Checkout permalink command.

use shopfront_core::{PermalinkLine, checkout_permalink};

use super::{CliError, emit};

/// Print the checkout permalink for `VARIANT:QTY` lines.
pub fn checkout_url(store_url: &str, lines: &[String]) -> Result<(), CliError> {
    let lines = lines
        .iter()
        .map(String::as_str)
        .map(parse_line)
        .collect::<Result<Vec<_>, _>>()?;

    emit(&checkout_permalink(store_url, &lines))
}

/// Parse `VARIANT:QTY`. The split is on the last `:` since GIDs contain one.
fn parse_line(line: &str) -> Result<PermalinkLine, CliError> {
    let (variant, quantity) = line
        .rsplit_once(':')
        .ok_or_else(|| CliError::InvalidInput(format!("expected VARIANT:QTY, got {line}")))?;

    let quantity = quantity
        .parse::<u32>()
        .ok()
        .filter(|q| *q > 0)
        .ok_or_else(|| CliError::InvalidInput(format!("invalid quantity in {line}")))?;

    if variant.is_empty() {
        return Err(CliError::InvalidInput(format!("missing variant in {line}")));
    }

    Ok(PermalinkLine::new(variant, quantity))
}
