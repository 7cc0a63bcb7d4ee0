//! Hero background parallax

/// Hero height used when the hero element is missing or has no height
pub const FALLBACK_HERO_HEIGHT: f64 = 1000.0;

const SPEED: f64 = 0.5;
const BASE_SCALE: f64 = 1.02;
const SCALE_RANGE: f64 = 0.05;
const BASE_OPACITY: f64 = 0.4;
const OPACITY_RANGE: f64 = 0.15;
const MIN_OPACITY: f64 = 0.15;

/// Style values for one parallax frame
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ParallaxFrame {
    pub translate_y: f64,
    pub scale: f64,
    pub opacity: f64,
}

impl ParallaxFrame {
    /// Frame for a scroll offset, or `None` once the hero has scrolled past
    /// and the background should be left where it is
    pub fn at(scrolled: f64, hero_height: f64) -> Option<Self> {
        let height = if hero_height > 0.0 {
            hero_height
        } else {
            FALLBACK_HERO_HEIGHT
        };
        if scrolled >= height {
            return None;
        }
        let progress = scrolled / height;
        Some(Self {
            translate_y: scrolled * SPEED,
            scale: BASE_SCALE + progress * SCALE_RANGE,
            opacity: (BASE_OPACITY - progress * OPACITY_RANGE).max(MIN_OPACITY),
        })
    }

    /// CSS `transform` value
    pub fn transform(&self) -> String {
        format!("translateY({}px) scale({})", self.translate_y, self.scale)
    }
}
