//! # API Envelope
//!
//! Thin caller surface over the accessor and reference builder. Every
//! endpoint returns an [`ApiResponse`]: `success` plus either `data` or a
//! human-readable `error`. Enforcement refusals become `success: false`
//! responses; nothing here panics or bypasses the accessor.

use serde::Serialize;
use serde_json::{Map, Value};

use crate::accessor::{AttributedNode, EnforcedAccessor, NodeWithDependencies};
use crate::reference::Reference;
use crate::temporal::{Clock, SystemClock};

/// `{success, data}` or `{success, error}`.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl<T> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data: Some(data),
            error: None,
        }
    }

    pub fn err(error: impl Into<String>) -> Self {
        Self {
            success: false,
            data: None,
            error: Some(error.into()),
        }
    }
}

/// Discourse-graph endpoints with attribution enforced on every response.
#[derive(Debug)]
pub struct DiscourseGraphApi<C = SystemClock> {
    accessor: EnforcedAccessor,
    clock: C,
}

impl DiscourseGraphApi<SystemClock> {
    pub fn new(accessor: EnforcedAccessor) -> Self {
        Self::with_clock(accessor, SystemClock)
    }
}

impl<C: Clock + Copy> DiscourseGraphApi<C> {
    pub fn with_clock(accessor: EnforcedAccessor, clock: C) -> Self {
        Self { accessor, clock }
    }

    pub fn accessor(&self) -> &EnforcedAccessor {
        &self.accessor
    }

    /// A single node. Runs the retrieval pre-flight first so the error
    /// names the missing fields.
    pub fn get_node(&self, id: &str) -> ApiResponse<AttributedNode> {
        if let Err(e) = self.accessor.validate_for_retrieval(id) {
            return ApiResponse::err(e.to_string());
        }
        match self.accessor.get_node(id) {
            Some(node) => ApiResponse::ok(node),
            None => ApiResponse::err("Node not available (missing required attribution)"),
        }
    }

    /// Evidence with the node it is derived from.
    pub fn get_evidence_panel(&self, evidence_id: &str) -> ApiResponse<NodeWithDependencies> {
        match self.accessor.get_node_with_dependencies(evidence_id) {
            Some(panel) => ApiResponse::ok(panel),
            None => ApiResponse::err("Evidence not found or incomplete attribution"),
        }
    }

    /// Query by exact field values.
    pub fn query(&self, filters: &Map<String, Value>) -> ApiResponse<Vec<AttributedNode>> {
        ApiResponse::ok(self.accessor.query_nodes(filters))
    }

    pub fn create_reference(
        &self,
        source_id: &str,
        context: Map<String, Value>,
    ) -> ApiResponse<Reference> {
        match self
            .accessor
            .references(self.clock)
            .create_reference(source_id, context)
        {
            Ok(reference) => ApiResponse::ok(reference),
            Err(e) => ApiResponse::err(e.to_string()),
        }
    }
}
