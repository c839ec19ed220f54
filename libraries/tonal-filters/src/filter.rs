//! Filter directive builder
//!
//! Renders one engine filter in FFmpeg syntax: `name=arg:arg:key=value`.

use std::fmt;

/// A single filter directive
#[derive(Debug, Clone, PartialEq)]
pub struct Filter {
    name: &'static str,
    args: Vec<String>,
}

impl Filter {
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            args: Vec::new(),
        }
    }

    /// Append a `key=value` option
    pub fn option(mut self, key: &str, value: impl fmt::Display) -> Self {
        self.args.push(format!("{}={}", key, value));
        self
    }

    /// Append a positional argument
    pub fn value(mut self, value: impl fmt::Display) -> Self {
        self.args.push(value.to_string());
        self
    }

    pub fn name(&self) -> &'static str {
        self.name
    }
}

impl fmt::Display for Filter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.args.is_empty() {
            write!(f, "{}", self.name)
        } else {
            write!(f, "{}={}", self.name, self.args.join(":"))
        }
    }
}

impl From<Filter> for String {
    fn from(filter: Filter) -> Self {
        filter.to_string()
    }
}

/// Join several filters into one comma-separated chain expression
pub fn chain(filters: impl IntoIterator<Item = Filter>) -> String {
    filters
        .into_iter()
        .map(|f| f.to_string())
        .collect::<Vec<_>>()
        .join(",")
}

/// Round a derived coefficient to at most `places` decimals
///
/// Renders as `0.3` rather than `0.30000000000000004`.
pub fn round_to(value: f64, places: i32) -> f64 {
    let scale = 10f64.powi(places);
    let rounded = (value * scale).round() / scale;
    // Normalise -0.0 so it renders as "0"
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
