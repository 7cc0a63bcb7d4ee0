//! Engine configuration and the page-level signals that feed it

mod reveal_config;
mod site_config;

pub use reveal_config::{ClassNames, PageSignals, RevealConfig};
pub use site_config::SiteConfig;

/// Parse a CSS value the way `parseInt` does: optional sign, leading
/// digits, anything after is ignored. `"72px"` gives `Some(72.0)`.
pub fn parse_css_int(value: &str) -> Option<f64> {
    let trimmed = value.trim();
    let (sign, digits) = match trimmed.strip_prefix('-') {
        Some(rest) => (-1.0, rest),
        None => (1.0, trimmed.strip_prefix('+').unwrap_or(trimmed)),
    };
    let end = digits
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(digits.len());
    if end == 0 {
        return None;
    }
    digits[..end].parse::<f64>().ok().map(|v| sign * v)
}
