//! # Attribution Policy: Single Source of Truth
//!
//! The one place that decides whether a node needs attribution and whether
//! it currently has everything that attribution requires. Every enforcement
//! point (retrieval, query, dependency resolution, reference creation) calls
//! into this module; none of them repeat the license check.
//!
//! ## Rule
//!
//! A node is CC-licensed iff its `licenseName` starts with the literal,
//! case-sensitive prefix `"CC"`. This is a string-prefix test, not a
//! license-taxonomy lookup: `"CC BY 4.0"` and `"CC0 1.0"` match,
//! `"cc-by"` and `"Creative Commons"` do not, and any other name that
//! happens to begin with `CC` does. Changing it changes which content is
//! served, so it stays exactly as is.
//!
//! A CC-licensed node has a complete attribution iff `sourceLink` and
//! `creator` are both present and non-empty. Empty strings count as missing.
//!
//! The JSON Schema companion (`schemas/mesa-node.schema.json`) states the
//! same rule declaratively; `mesa-schema` checks that the two agree.

use serde::{Deserialize, Serialize};

use crate::error::{AttributionField, EnforcementError, MissingFields};
use crate::node::Node;

/// License-name prefix that marks Creative-Commons-family content.
pub const CC_PREFIX: &str = "CC";

/// The attribution triple that must accompany CC-licensed content.
///
/// All three fields are non-empty; there are no partial bundles. The only
/// constructors are [`AttributionBundle::new`] and [`extract_bundle`].
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize)]
#[serde(try_from = "RawBundle")]
pub struct AttributionBundle {
    license_name: String,
    source_link: String,
    creator: String,
}

impl AttributionBundle {
    /// Build a bundle, or `None` if any field is empty.
    pub fn new(
        license_name: impl Into<String>,
        source_link: impl Into<String>,
        creator: impl Into<String>,
    ) -> Option<Self> {
        let (license_name, source_link, creator) =
            (license_name.into(), source_link.into(), creator.into());
        if license_name.is_empty() || source_link.is_empty() || creator.is_empty() {
            return None;
        }
        Some(Self {
            license_name,
            source_link,
            creator,
        })
    }

    pub fn license_name(&self) -> &str {
        &self.license_name
    }

    pub fn source_link(&self) -> &str {
        &self.source_link
    }

    pub fn creator(&self) -> &str {
        &self.creator
    }
}

// Serialized form carries an explicit marker so downstream consumers can
// tell a mandatory attribution block from incidental metadata.
impl Serialize for AttributionBundle {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        use serde::ser::SerializeStruct;
        let mut s = serializer.serialize_struct("AttributionBundle", 4)?;
        s.serialize_field("licenseName", &self.license_name)?;
        s.serialize_field("sourceLink", &self.source_link)?;
        s.serialize_field("creator", &self.creator)?;
        s.serialize_field("_attributionRequired", &true)?;
        s.end()
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawBundle {
    license_name: String,
    source_link: String,
    creator: String,
}

impl TryFrom<RawBundle> for AttributionBundle {
    type Error = String;

    fn try_from(raw: RawBundle) -> Result<Self, Self::Error> {
        AttributionBundle::new(raw.license_name, raw.source_link, raw.creator)
            .ok_or_else(|| "attribution bundle fields must be non-empty".to_string())
    }
}

/// Outcome of the retrieval pre-flight check.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ValidationReport {
    /// True iff nothing is missing.
    pub ok: bool,
    /// Missing fields in fixed order: `sourceLink`, then `creator`.
    pub missing: MissingFields,
}

impl ValidationReport {
    /// Convert into a refusal for `id` when not ok.
    pub fn into_result(self, id: &str) -> Result<(), EnforcementError> {
        if self.ok {
            Ok(())
        } else {
            Err(EnforcementError::AttributionMissing {
                id: id.to_string(),
                missing: self.missing,
            })
        }
    }
}

/// Whether `license_name` marks CC-licensed content.
pub fn is_cc_license(license_name: Option<&str>) -> bool {
    license_name.is_some_and(|name| name.starts_with(CC_PREFIX))
}

/// Whether `node` must carry attribution wherever it is exposed.
pub fn requires_attribution(node: &Node) -> bool {
    is_cc_license(node.license_name.as_deref())
}

/// The node's attribution bundle, if it requires one and has all fields.
pub fn extract_bundle(node: &Node) -> Option<AttributionBundle> {
    if !requires_attribution(node) {
        return None;
    }
    AttributionBundle::new(
        node.license_name.as_deref()?,
        node.source_link.as_deref()?,
        node.creator.as_deref()?,
    )
}

/// Diagnose which attribution fields a node lacks.
///
/// Mirrors [`extract_bundle`]'s failure condition: for a CC-licensed node,
/// `extract_bundle` is `Some` exactly when the report is ok.
pub fn validate(node: &Node) -> ValidationReport {
    if !requires_attribution(node) {
        return ValidationReport {
            ok: true,
            missing: MissingFields::default(),
        };
    }

    let missing: Vec<AttributionField> = AttributionField::ORDERED
        .into_iter()
        .filter(|field| {
            let value = match field {
                AttributionField::SourceLink => node.source_link.as_deref(),
                AttributionField::Creator => node.creator.as_deref(),
            };
            value.map_or(true, str::is_empty)
        })
        .collect();

    ValidationReport {
        ok: missing.is_empty(),
        missing: MissingFields::new(missing),
    }
}
