use serde::Deserialize;

use super::parse_css_int;

/// Fallback stagger step when the page does not provide one
pub const DEFAULT_STAGGER_STEP_MS: f64 = 50.0;

/// DOM naming conventions the engine reads and writes
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct ClassNames {
    /// Eligible-for-animation marker
    pub marker: String,
    /// Revealed state
    pub revealed: String,
    pub heading: String,
    pub card: String,
    pub stagger: String,
    /// Inner content wrapper of a section
    pub container: String,
    /// Per-element custom property carrying the stagger delay
    pub delay_property: String,
}

impl Default for ClassNames {
    fn default() -> Self {
        Self {
            marker: "animate-on-scroll".to_string(),
            revealed: "in-view".to_string(),
            heading: "heading".to_string(),
            card: "card".to_string(),
            stagger: "stagger-group".to_string(),
            container: "container".to_string(),
            delay_property: "--sr-delay".to_string(),
        }
    }
}

/// Immutable reveal engine configuration
///
/// Values are passed through as given; a negative threshold or step is the
/// page author's business.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct RevealConfig {
    /// Intersection root margin, negative bottom inset delays the trigger
    pub root_margin: String,
    /// Minimum visible fraction that counts as entering
    pub threshold: f64,
    /// Delay between consecutive stagger children, in milliseconds
    pub stagger_step_ms: f64,
    /// Skip animation entirely and reveal everything at once
    pub reduced_motion: bool,
    /// Pick up content inserted after page-ready without an explicit
    /// registration call
    pub watch_insertions: bool,
    /// Log engine activity to the console
    pub debug: bool,
    pub classes: ClassNames,
}

impl Default for RevealConfig {
    fn default() -> Self {
        Self {
            root_margin: "0px 0px -15% 0px".to_string(),
            threshold: 0.08,
            stagger_step_ms: DEFAULT_STAGGER_STEP_MS,
            reduced_motion: false,
            watch_insertions: true,
            debug: false,
            classes: ClassNames::default(),
        }
    }
}

impl RevealConfig {
    /// Parse overrides from YAML (or JSON, which YAML accepts). Missing
    /// fields keep their defaults.
    pub fn from_yaml(yaml: &str) -> Result<Self, String> {
        if yaml.trim().is_empty() {
            return Ok(Self::default());
        }
        serde_yaml::from_str(yaml).map_err(|e| format!("Config parse error: {}", e))
    }

    pub fn with_stagger_step(mut self, step_ms: f64) -> Self {
        self.stagger_step_ms = step_ms;
        self
    }

    pub fn with_reduced_motion(mut self, reduced: bool) -> Self {
        self.reduced_motion = reduced;
        self
    }

    /// Delay for the child at `index` of a stagger group
    pub fn stagger_delay(&self, index: usize) -> f64 {
        index as f64 * self.stagger_step_ms
    }
}

/// Page-level signals, read once at startup and injected into the config
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct PageSignals {
    /// Stagger step from the page stylesheet, if it declares one
    pub stagger_step_ms: Option<f64>,
    /// Platform reduced-motion preference
    pub prefers_reduced_motion: bool,
}

impl PageSignals {
    /// Build from the raw custom property text and media-query result
    pub fn from_raw(stagger_step: &str, prefers_reduced_motion: bool) -> Self {
        Self {
            // A zero step falls back to the default, same as `parseInt(..) || 50`
            stagger_step_ms: parse_css_int(stagger_step).filter(|v| *v != 0.0),
            prefers_reduced_motion,
        }
    }

    /// Fold the signals into `config`. A platform reduced-motion preference
    /// can only switch animation off, never back on.
    pub fn apply_to(&self, mut config: RevealConfig) -> RevealConfig {
        if let Some(step) = self.stagger_step_ms {
            config.stagger_step_ms = step;
        }
        config.reduced_motion |= self.prefers_reduced_motion;
        config
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = RevealConfig::default();
        assert_eq!(config.root_margin, "0px 0px -15% 0px");
        assert_eq!(config.threshold, 0.08);
        assert_eq!(config.stagger_step_ms, 50.0);
        assert!(!config.reduced_motion);
        assert!(config.watch_insertions);
        assert_eq!(config.classes.marker, "animate-on-scroll");
        assert_eq!(config.classes.revealed, "in-view");
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let config = RevealConfig::from_yaml(
            r#"
stagger_step_ms: 72
root_margin: "0px 0px -30% 0px"
classes:
  stagger: stagger
"#,
        )
        .unwrap();
        assert_eq!(config.stagger_step_ms, 72.0);
        assert_eq!(config.root_margin, "0px 0px -30% 0px");
        assert_eq!(config.threshold, 0.08);
        assert_eq!(config.classes.stagger, "stagger");
        assert_eq!(config.classes.card, "card");
    }

    #[test]
    fn test_json_is_accepted() {
        let config = RevealConfig::from_yaml(r#"{"threshold": 0.2, "debug": true}"#).unwrap();
        assert_eq!(config.threshold, 0.2);
        assert!(config.debug);
    }

    #[test]
    fn test_out_of_range_passes_through() {
        let config = RevealConfig::from_yaml("threshold: -1.5").unwrap();
        assert_eq!(config.threshold, -1.5);
    }

    #[test]
    fn test_empty_and_invalid_input() {
        assert_eq!(RevealConfig::from_yaml("  ").unwrap(), RevealConfig::default());
        let err = RevealConfig::from_yaml("threshold: [1, 2").unwrap_err();
        assert!(err.contains("Config parse error"));
    }

    #[test]
    fn test_stagger_delay() {
        let config = RevealConfig::default().with_stagger_step(40.0);
        assert_eq!(config.stagger_delay(0), 0.0);
        assert_eq!(config.stagger_delay(3), 120.0);
    }

    #[test]
    fn test_page_signals_override() {
        let signals = PageSignals::from_raw(" 72ms", true);
        let config = signals.apply_to(RevealConfig::default());
        assert_eq!(config.stagger_step_ms, 72.0);
        assert!(config.reduced_motion);
    }

    #[test]
    fn test_page_signals_zero_or_missing_step() {
        assert_eq!(PageSignals::from_raw("0", false).stagger_step_ms, None);
        assert_eq!(PageSignals::from_raw("", false).stagger_step_ms, None);

        let config = PageSignals::from_raw("", false)
            .apply_to(RevealConfig::default().with_reduced_motion(true));
        assert_eq!(config.stagger_step_ms, 50.0);
        assert!(config.reduced_motion);
    }
}
