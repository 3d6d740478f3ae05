use serde::{Deserialize, Serialize};

/// Which equivalence rules apply beyond the ones that always hold.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Import order and object property order are significant.
    #[default]
    Strict,
    /// Import order and object property order are not significant.
    Relaxed,
}

/// Settings for one adjudication.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ComparisonOptions {
    /// Compare token sequences, ignoring every whitespace difference.
    pub ignore_whitespace: bool,
    /// Drop single-line and block comments before comparing.
    pub ignore_comments: bool,
    pub mode: Mode,
    /// Cap, in characters, on each side of a reported excerpt.
    pub max_diff_size: usize,
}

impl Default for ComparisonOptions {
    fn default() -> Self {
        Self {
            ignore_whitespace: false,
            ignore_comments: false,
            mode: Mode::Strict,
            max_diff_size: 2000,
        }
    }
}

impl ComparisonOptions {
    /// Relaxed mode with both normalizations enabled.
    pub fn lenient() -> Self {
        Self {
            ignore_whitespace: true,
            ignore_comments: true,
            mode: Mode::Relaxed,
            ..Default::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_settings_fill_defaults() {
        let options: ComparisonOptions = toml::from_str("mode = \"relaxed\"\n").unwrap();
        assert_eq!(options.mode, Mode::Relaxed);
        assert!(!options.ignore_whitespace);
        assert_eq!(options.max_diff_size, 2000);
    }

    #[test]
    fn full_settings_parse() {
        let options: ComparisonOptions = toml::from_str(
            "ignore_whitespace = true\nignore_comments = true\nmode = \"strict\"\nmax_diff_size = 80\n",
        )
        .unwrap();
        assert!(options.ignore_whitespace);
        assert!(options.ignore_comments);
        assert_eq!(options.mode, Mode::Strict);
        assert_eq!(options.max_diff_size, 80);
    }
}
