//! Convenience builder for HTTP query parameters.
//!
//! Lightweight helper for assembling URL query pairs from optional filter
//! values, reducing boilerplate in endpoint methods.

use std::fmt::Display;

/// Builder for assembling query parameter pairs.
#[derive(Debug, Default, Clone)]
pub struct QueryParams {
    pairs: Vec<(&'static str, String)>,
}

impl QueryParams {
    /// Create a new, empty builder.
    #[must_use]
    pub fn new() -> Self {
        Self { pairs: Vec::new() }
    }

    /// Append a required key/value pair.
    pub fn push<T>(&mut self, key: &'static str, value: T)
    where
        T: Display,
    {
        self.pairs.push((key, value.to_string()));
    }

    /// Append a key/value pair when the value is present.
    pub fn push_opt<T>(&mut self, key: &'static str, value: Option<T>)
    where
        T: Display,
    {
        if let Some(value) = value {
            self.pairs.push((key, value.to_string()));
        }
    }

    /// Return the collected key/value pairs.
    #[must_use]
    pub fn into_pairs(self) -> Vec<(&'static str, String)> {
        self.pairs
    }

    /// Returns true if no parameters have been added.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::QueryParams;

    #[test]
    fn push_opt_skips_none() {
        let mut params = QueryParams::new();
        params.push_opt("deviceSN", Option::<String>::None);
        assert!(params.is_empty());
    }

    #[test]
    fn push_collects_pairs_in_order() {
        let mut params = QueryParams::new();
        params.push("deviceType", "FortiGate");
        params.push_opt("useCache", Some(true));
        assert_eq!(
            params.into_pairs(),
            vec![
                ("deviceType", "FortiGate".to_string()),
                ("useCache", "true".to_string())
            ]
        );
    }
}
