use crate::config::parse_css_int;

/// Custom property on the document element holding the header height
pub const HEADER_HEIGHT_PROPERTY: &str = "--header-h";

/// Header height rounded up to whole pixels
pub fn header_height(measured: f64) -> f64 {
    measured.ceil()
}

/// CSS text for a pixel length
pub fn px(value: f64) -> String {
    format!("{}px", value)
}

/// Header height from the stored `--header-h` value; 0 counts as unset
pub fn stored_header_height(value: &str) -> Option<f64> {
    parse_css_int(value).filter(|h| *h != 0.0)
}

/// Scroll position that puts an anchor target just below the fixed header
pub fn anchor_scroll_top(target_top: f64, scroll_y: f64, header_height: f64) -> f64 {
    (target_top + scroll_y - header_height.ceil()).round().max(0.0)
}

/// Hash fragment of an in-page link, `None` for anything else. A bare `#`
/// is kept: it scrolls back to the top.
pub fn in_page_hash(href: &str) -> Option<&str> {
    href.starts_with('#').then_some(href)
}
