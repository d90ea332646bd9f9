//! Query descriptor derived from the search box and the filter dropdowns.

use super::{JobFunction, Role};

/// Canonical description of the list query.
///
/// Two descriptors are equal iff text, function and role are all equal;
/// that equality decides whether a new fetch is needed.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct QueryDescriptor {
    pub text: String,
    pub function: Option<JobFunction>,
    pub role: Option<Role>,
}

impl QueryDescriptor {
    /// Build the canonical descriptor: search text is trimmed, so inputs that
    /// differ only in surrounding whitespace describe the same query.
    pub fn build(text: &str, function: Option<JobFunction>, role: Option<Role>) -> Self {
        Self {
            text: text.trim().to_string(),
            function,
            role,
        }
    }

    pub fn has_text(&self) -> bool {
        !self.text.is_empty()
    }

    pub fn has_filters(&self) -> bool {
        self.function.is_some() || self.role.is_some()
    }

    /// Query-string pairs for `LIST`; absent parts are omitted.
    pub fn to_query_pairs(&self) -> Vec<(&'static str, String)> {
        let mut pairs = Vec::new();
        if self.has_text() {
            pairs.push(("q", self.text.clone()));
        }
        if let Some(function) = self.function {
            pairs.push(("function", function.as_str().to_string()));
        }
        if let Some(role) = self.role {
            pairs.push(("role", role.as_str().to_string()));
        }
        pairs
    }
}

/// Raw inputs the descriptor is built from.
#[derive(Debug, Clone, Default)]
pub struct QueryInputs {
    pub text: String,
    pub function: Option<JobFunction>,
    pub role: Option<Role>,
}

impl QueryInputs {
    pub fn descriptor(&self) -> QueryDescriptor {
        QueryDescriptor::build(&self.text, self.function, self.role)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_trims_text() {
        let a = QueryDescriptor::build("  jack ", None, None);
        let b = QueryDescriptor::build("jack", None, None);
        assert_eq!(a, b);
        assert_eq!(a.text, "jack");
    }

    #[test]
    fn test_equality_covers_all_fields() {
        let base = QueryDescriptor::build("jack", Some(JobFunction::Engineering), None);
        assert_ne!(base, QueryDescriptor::build("jack", None, None));
        assert_ne!(
            base,
            QueryDescriptor::build("jack", Some(JobFunction::Engineering), Some(Role::Admin))
        );
        assert_eq!(
            base,
            QueryDescriptor::build("jack", Some(JobFunction::Engineering), None)
        );
    }

    #[test]
    fn test_query_pairs_omit_absent_parts() {
        assert!(QueryDescriptor::default().to_query_pairs().is_empty());
        assert!(QueryDescriptor::build("   ", None, None)
            .to_query_pairs()
            .is_empty());

        let pairs =
            QueryDescriptor::build("dao", Some(JobFunction::MarketingSales), Some(Role::Admin))
                .to_query_pairs();
        assert_eq!(
            pairs,
            vec![
                ("q", "dao".to_string()),
                ("function", "MARKETING_SALES".to_string()),
                ("role", "ADMIN".to_string()),
            ]
        );
    }

    #[test]
    fn test_text_and_filter_flags() {
        let q = QueryDescriptor::build("", Some(JobFunction::It), None);
        assert!(!q.has_text());
        assert!(q.has_filters());
    }
}
