//! # Reference Builder
//!
//! Creates cross-node reference records. Referencing CC-licensed content is
//! an enforcement point with two requirements:
//!
//! 1. The caller's context must itself carry non-empty `sourceLink` and
//!    `creator`, even though the store already has them. A caller that did
//!    not know attribution was needed is refused rather than silently
//!    patched up.
//! 2. The reference embeds a bundle copied from the **source node's own
//!    fields**, never from the caller's context.
//!
//! A CC source that lacks its own attribution cannot yield a bundle, so it
//! is refused with `AttributionMissing` even when the context is complete.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::error::{AttributionField, EnforcementError, MissingFields};
use crate::identity::NodeId;
use crate::policy::{self, AttributionBundle};
use crate::store::NodeStore;
use crate::temporal::{Clock, Timestamp};

/// A reference from caller-supplied context to a stored node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Reference {
    /// The referenced node.
    #[serde(rename = "sourceNode")]
    pub source_node_id: NodeId,
    /// Caller-supplied context, kept verbatim.
    pub context: Map<String, Value>,
    /// Creation time from the builder's clock.
    pub created: Timestamp,
    /// Present exactly when the source is CC-licensed.
    #[serde(rename = "_attribution", default, skip_serializing_if = "Option::is_none")]
    pub attribution: Option<AttributionBundle>,
}

/// Builds [`Reference`]s against a store, stamping them with `clock`.
#[derive(Debug)]
pub struct ReferenceBuilder<'a, C> {
    store: &'a NodeStore,
    clock: C,
}

impl<'a, C: Clock> ReferenceBuilder<'a, C> {
    pub fn new(store: &'a NodeStore, clock: C) -> Self {
        Self { store, clock }
    }

    /// Create a reference to `source_id` with the caller's `context`.
    ///
    /// # Errors
    ///
    /// - `NotFound` if `source_id` is not in the store.
    /// - `ReferenceContextIncomplete` if the source is CC-licensed and the
    ///   context lacks a non-empty `sourceLink` or `creator`; the missing
    ///   ones are listed in that order.
    /// - `AttributionMissing` if the source is CC-licensed but its own
    ///   fields cannot form a bundle.
    pub fn create_reference(
        &self,
        source_id: &str,
        context: Map<String, Value>,
    ) -> Result<Reference, EnforcementError> {
        let source = self
            .store
            .get(source_id)
            .ok_or_else(|| EnforcementError::NotFound {
                id: source_id.to_string(),
            })?;

        let attribution = if policy::requires_attribution(source) {
            let missing: Vec<AttributionField> = AttributionField::ORDERED
                .into_iter()
                .filter(|field| !context_supplies(&context, *field))
                .collect();
            if !missing.is_empty() {
                return Err(EnforcementError::ReferenceContextIncomplete {
                    source_id: source_id.to_string(),
                    missing: MissingFields::new(missing),
                });
            }

            let bundle = policy::extract_bundle(source).ok_or_else(|| {
                EnforcementError::AttributionMissing {
                    id: source_id.to_string(),
                    missing: policy::validate(source).missing,
                }
            })?;
            Some(bundle)
        } else {
            None
        };

        tracing::debug!(
            source_node = %source.id,
            attributed = attribution.is_some(),
            "reference created"
        );

        Ok(Reference {
            source_node_id: source.id.clone(),
            context,
            created: self.clock.now(),
            attribution,
        })
    }
}

/// Whether the context carries a non-empty string for `field`.
fn context_supplies(context: &Map<String, Value>, field: AttributionField) -> bool {
    matches!(context.get(field.as_str()), Some(Value::String(s)) if !s.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::node::Node;
    use crate::temporal::FixedClock;
    use serde_json::json;

    fn store() -> NodeStore {
        let mut cc = Node::new("pages:evidence-001");
        cc.license_name = Some("CC BY 4.0".to_string());
        cc.source_link = Some("https://lab.example.com/dataset-001".to_string());
        cc.creator = Some("Jane Smith".to_string());

        let mut arr = Node::new("pages:evidence-002");
        arr.license_name = Some("All Rights Reserved".to_string());
        arr.creator = Some("John Doe".to_string());

        let mut broken = Node::new("pages:evidence-004");
        broken.license_name = Some("CC BY 4.0".to_string());
        broken.source_link = Some("https://lab.example.com/x".to_string());

        NodeStore::from_nodes(vec![cc, arr, broken])
    }

    fn clock() -> FixedClock {
        FixedClock(Timestamp::parse("2025-11-08T00:00:00Z").unwrap())
    }

    fn ctx(value: Value) -> Map<String, Value> {
        match value {
            Value::Object(map) => map,
            _ => unreachable!(),
        }
    }

    #[test]
    fn test_cc_reference_without_context_names_both_fields() {
        let store = store();
        let builder = ReferenceBuilder::new(&store, clock());
        let err = builder
            .create_reference("pages:evidence-001", ctx(json!({"citation": "Smith 2024"})))
            .unwrap_err();
        assert_eq!(
            err.to_string(),
            "Cannot reference CC-licensed node without: sourceLink, creator"
        );
    }

    #[test]
    fn test_cc_reference_with_empty_creator_names_creator() {
        let store = store();
        let builder = ReferenceBuilder::new(&store, clock());
        let err = builder
            .create_reference(
                "pages:evidence-001",
                ctx(json!({"sourceLink": "https://lab.example.com/dataset-001", "creator": ""})),
            )
            .unwrap_err();
        match err {
            EnforcementError::ReferenceContextIncomplete { missing, .. } => {
                assert_eq!(missing.names(), vec!["creator"]);
            }
            other => panic!("expected ReferenceContextIncomplete, got: {other}"),
        }
    }

    #[test]
    fn test_cc_reference_bundle_comes_from_source_node() {
        let store = store();
        let builder = ReferenceBuilder::new(&store, clock());
        let reference = builder
            .create_reference(
                "pages:evidence-001",
                ctx(json!({
                    "citation": "Smith 2024",
                    "sourceLink": "https://mirror.example.org/copy",
                    "creator": "J. Smith"
                })),
            )
            .unwrap();
        let bundle = reference.attribution.as_ref().unwrap();
        assert_eq!(bundle.source_link(), "https://lab.example.com/dataset-001");
        assert_eq!(bundle.creator(), "Jane Smith");
        assert_eq!(reference.context["creator"], "J. Smith");
        assert_eq!(reference.created.to_iso8601(), "2025-11-08T00:00:00Z");
    }

    #[test]
    fn test_non_cc_reference_has_no_bundle() {
        let store = store();
        let builder = ReferenceBuilder::new(&store, clock());
        let reference = builder
            .create_reference("pages:evidence-002", Map::new())
            .unwrap();
        assert!(reference.attribution.is_none());
        let value = serde_json::to_value(&reference).unwrap();
        assert!(value.get("_attribution").is_none());
        assert_eq!(value["sourceNode"], "pages:evidence-002");
    }

    #[test]
    fn test_unknown_source_not_found() {
        let store = store();
        let builder = ReferenceBuilder::new(&store, clock());
        let err = builder.create_reference("pages:nope", Map::new()).unwrap_err();
        assert!(matches!(err, EnforcementError::NotFound { .. }));
    }

    #[test]
    fn test_incomplete_cc_source_refused_even_with_context() {
        let store = store();
        let builder = ReferenceBuilder::new(&store, clock());
        let err = builder
            .create_reference(
                "pages:evidence-004",
                ctx(json!({"sourceLink": "https://lab.example.com/x", "creator": "Someone"})),
            )
            .unwrap_err();
        match err {
            EnforcementError::AttributionMissing { id, missing } => {
                assert_eq!(id, "pages:evidence-004");
                assert_eq!(missing.names(), vec!["creator"]);
            }
            other => panic!("expected AttributionMissing, got: {other}"),
        }
    }

    #[test]
    fn test_non_string_context_value_does_not_count() {
        let store = store();
        let builder = ReferenceBuilder::new(&store, clock());
        let err = builder
            .create_reference(
                "pages:evidence-001",
                ctx(json!({"sourceLink": "https://lab.example.com/dataset-001", "creator": null})),
            )
            .unwrap_err();
        assert!(matches!(err, EnforcementError::ReferenceContextIncomplete { .. }));
    }

    #[test]
    fn test_reference_serde_round_trip() {
        let store = store();
        let builder = ReferenceBuilder::new(&store, clock());
        let reference = builder
            .create_reference(
                "pages:evidence-001",
                ctx(json!({"sourceLink": "L", "creator": "C"})),
            )
            .unwrap();
        let json = serde_json::to_string(&reference).unwrap();
        let back: Reference = serde_json::from_str(&json).unwrap();
        assert_eq!(back, reference);
    }
}
