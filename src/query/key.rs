use std::fmt;

/// Hierarchical cache key, e.g. `["plans"]` or `["plans", "pro"]`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey(Vec<String>);

impl QueryKey {
    pub fn new<I, S>(parts: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(parts.into_iter().map(Into::into).collect())
    }

    pub fn parts(&self) -> &[String] {
        &self.0
    }

    /// Prefix match used by invalidation and removal; the empty key matches
    /// everything.
    pub fn starts_with(&self, prefix: &QueryKey) -> bool {
        self.0.len() >= prefix.0.len() && self.0.iter().zip(&prefix.0).all(|(a, b)| a == b)
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let quoted: Vec<String> = self.0.iter().map(|p| format!("{:?}", p)).collect();
        write!(f, "[{}]", quoted.join(", "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prefix_matching() {
        let plans = QueryKey::new(["plans"]);
        let pro = QueryKey::new(["plans", "pro"]);
        assert!(pro.starts_with(&plans));
        assert!(plans.starts_with(&plans));
        assert!(!plans.starts_with(&pro));
        assert!(pro.starts_with(&QueryKey::new(Vec::<String>::new())));
        assert!(!QueryKey::new(["users"]).starts_with(&plans));
    }

    #[test]
    fn test_display() {
        assert_eq!(QueryKey::new(["plans", "pro"]).to_string(), r#"["plans", "pro"]"#);
    }
}
