/// localStorage key holding the theme preference
pub const THEME_STORAGE_KEY: &str = "site-theme";
/// Class on the document element that switches the stylesheet to dark
pub const DARK_CLASS: &str = "dark";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Theme {
    #[default]
    Light,
    Dark,
}

impl Theme {
    /// Anything other than an explicit `dark` is light
    pub fn from_stored(value: Option<&str>) -> Self {
        match value {
            Some("dark") => Theme::Dark,
            _ => Theme::Light,
        }
    }

    pub fn from_dark_flag(is_dark: bool) -> Self {
        if is_dark {
            Theme::Dark
        } else {
            Theme::Light
        }
    }

    pub fn toggled(self) -> Self {
        match self {
            Theme::Light => Theme::Dark,
            Theme::Dark => Theme::Light,
        }
    }

    pub fn is_dark(self) -> bool {
        self == Theme::Dark
    }

    pub fn storage_value(self) -> &'static str {
        match self {
            Theme::Light => "light",
            Theme::Dark => "dark",
        }
    }

    /// `aria-pressed` value for the toggle button
    pub fn aria_pressed(self) -> &'static str {
        if self.is_dark() {
            "true"
        } else {
            "false"
        }
    }

    /// `aria-label` describing what the toggle will do next
    pub fn aria_label(self) -> &'static str {
        match self {
            Theme::Dark => "Přepnout na světlý motiv",
            Theme::Light => "Přepnout na tmavý motiv",
        }
    }
}
