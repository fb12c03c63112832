use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::TypesError;
use crate::option::InterventionOption;

/// The decision a single `decide` call is made about.
///
/// Holds a non-empty, ordered option set with unique ids, plus the ids of
/// prior decisions this one descends from.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDecisionContext")]
pub struct DecisionContext {
    id: String,
    options: Vec<InterventionOption>,
    lineage_refs: Vec<String>,
}

#[derive(Deserialize)]
struct RawDecisionContext {
    id: String,
    options: Vec<InterventionOption>,
    #[serde(default)]
    lineage_refs: Vec<String>,
}

impl TryFrom<RawDecisionContext> for DecisionContext {
    type Error = TypesError;

    fn try_from(raw: RawDecisionContext) -> Result<Self, Self::Error> {
        Self::new(raw.id, raw.options, raw.lineage_refs)
    }
}

impl DecisionContext {
    pub fn new(
        id: impl Into<String>,
        options: Vec<InterventionOption>,
        lineage_refs: Vec<String>,
    ) -> Result<Self, TypesError> {
        if options.is_empty() {
            return Err(TypesError::EmptyOptionSet);
        }

        let mut seen = HashSet::with_capacity(options.len());
        for option in &options {
            if !seen.insert(option.id()) {
                return Err(TypesError::DuplicateOptionId(option.id().to_string()));
            }
        }

        Ok(Self {
            id: id.into(),
            options,
            lineage_refs,
        })
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    /// Options in caller-supplied order.
    pub fn options(&self) -> &[InterventionOption] {
        &self.options
    }

    pub fn lineage_refs(&self) -> &[String] {
        &self.lineage_refs
    }

    pub fn option(&self, id: &str) -> Option<&InterventionOption> {
        self.options.iter().find(|o| o.id() == id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn option(id: &str) -> InterventionOption {
        InterventionOption::builder(id)
            .economy_ecology(-0.1, 10.0)
            .reversibility(0.5)
            .build()
            .unwrap()
    }

    #[test]
    fn rejects_empty_option_set() {
        let err = DecisionContext::new("ctx", vec![], vec![]).unwrap_err();
        assert_eq!(err, TypesError::EmptyOptionSet);
    }

    #[test]
    fn rejects_duplicate_ids() {
        let err = DecisionContext::new("ctx", vec![option("A"), option("A")], vec![]).unwrap_err();
        assert_eq!(err, TypesError::DuplicateOptionId("A".into()));
    }

    #[test]
    fn preserves_order_and_lineage() {
        let ctx = DecisionContext::new(
            "eco-transition-001",
            vec![option("B"), option("A")],
            vec!["eco-transition-000".into()],
        )
        .unwrap();
        let ids: Vec<_> = ctx.options().iter().map(|o| o.id()).collect();
        assert_eq!(ids, ["B", "A"]);
        assert_eq!(ctx.lineage_refs(), ["eco-transition-000".to_string()]);
        assert!(ctx.option("A").is_some());
        assert!(ctx.option("Z").is_none());
    }

    #[test]
    fn deserialization_rejects_empty_options() {
        let result = serde_json::from_str::<DecisionContext>(r#"{"id":"x","options":[]}"#);
        assert!(result.is_err());
    }
}
