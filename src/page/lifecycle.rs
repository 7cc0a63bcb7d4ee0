/// `document.readyState`, parsed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReadyState {
    Loading,
    Interactive,
    Complete,
}

impl ReadyState {
    /// Unknown values count as still loading
    pub fn parse(value: &str) -> Self {
        match value {
            "interactive" => ReadyState::Interactive,
            "complete" => ReadyState::Complete,
            _ => ReadyState::Loading,
        }
    }

    /// The DOM is parsed and `DOMContentLoaded` has already fired
    pub fn is_parsed(self) -> bool {
        self != ReadyState::Loading
    }

    /// `load` has already fired; listening for it now would never run
    pub fn is_loaded(self) -> bool {
        self == ReadyState::Complete
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        assert_eq!(ReadyState::parse("loading"), ReadyState::Loading);
        assert_eq!(ReadyState::parse("interactive"), ReadyState::Interactive);
        assert_eq!(ReadyState::parse("complete"), ReadyState::Complete);
        assert_eq!(ReadyState::parse(""), ReadyState::Loading);
    }

    #[test]
    fn test_late_boot_runs_load_work_at_once() {
        let late = ReadyState::parse("complete");
        assert!(late.is_parsed());
        assert!(late.is_loaded());

        let early = ReadyState::parse("interactive");
        assert!(early.is_parsed());
        assert!(!early.is_loaded());

        assert!(!ReadyState::Loading.is_parsed());
    }
}
