//! Query depth guard
//!
//! Rejects documents whose selection sets nest deeper than the configured
//! maximum before any resolver runs. The operation's root fields sit at
//! depth 0 and every field inside another field's selection set is one
//! deeper. Fragment spreads and inline fragments are expanded in place and
//! add no depth of their own.
//!
//! Violations are collected while the query is parsed and returned from the
//! validation stage, so a rejected request carries only errors and `data`
//! stays null.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_graphql::extensions::{
    Extension, ExtensionContext, ExtensionFactory, NextParseQuery, NextValidation,
};
use async_graphql::parser::types::{
    ExecutableDocument, FragmentDefinition, Selection, SelectionSet,
};
use async_graphql::parser::{Pos, Positioned};
use async_graphql::{
    ErrorExtensions, Name, ServerError, ServerResult, ValidationResult, Variables,
};
use tracing::{debug, warn};

use crate::error::ApiError;

/// Default maximum nesting depth
pub const DEFAULT_MAX_DEPTH: usize = 5;

/// Schema extension enforcing a maximum query depth
#[derive(Debug, Clone, Copy)]
pub struct DepthLimit {
    max_depth: usize,
}

impl DepthLimit {
    pub fn new(max_depth: usize) -> Self {
        Self { max_depth }
    }
}

impl Default for DepthLimit {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_DEPTH)
    }
}

impl ExtensionFactory for DepthLimit {
    fn create(&self) -> Arc<dyn Extension> {
        Arc::new(DepthLimitExtension {
            max_depth: self.max_depth,
            violations: Mutex::new(Vec::new()),
        })
    }
}

/// Per-request half of [`DepthLimit`]
struct DepthLimitExtension {
    max_depth: usize,
    violations: Mutex<Vec<ServerError>>,
}

#[async_trait::async_trait]
impl Extension for DepthLimitExtension {
    async fn parse_query(
        &self,
        ctx: &ExtensionContext<'_>,
        query: &str,
        variables: &Variables,
        next: NextParseQuery<'_>,
    ) -> ServerResult<ExecutableDocument> {
        let document = next.run(ctx, query, variables).await?;
        let violations = check_depth(&document, self.max_depth);
        if !violations.is_empty() {
            warn!(
                max_depth = self.max_depth,
                violations = violations.len(),
                "rejecting query over the depth limit"
            );
        }
        *self.violations.lock().unwrap_or_else(|e| e.into_inner()) = violations;
        Ok(document)
    }

    async fn validation(
        &self,
        ctx: &ExtensionContext<'_>,
        next: NextValidation<'_>,
    ) -> Result<ValidationResult, Vec<ServerError>> {
        let violations =
            std::mem::take(&mut *self.violations.lock().unwrap_or_else(|e| e.into_inner()));
        if !violations.is_empty() {
            return Err(violations);
        }
        next.run(ctx).await
    }
}

/// Check every operation of a parsed document against `max_depth`
///
/// Returns one error per root field whose subtree goes too deep, positioned
/// at the first field found past the limit. An empty list means the
/// document is acceptable.
pub fn check_depth(document: &ExecutableDocument, max_depth: usize) -> Vec<ServerError> {
    let mut violations = Vec::new();

    for (name, operation) in document.operations.iter() {
        let label = name.map(|n| n.as_str()).unwrap_or("anonymous");
        let walker = DepthWalker {
            fragments: &document.fragments,
            max_depth,
        };

        let mut roots = Vec::new();
        walker.collect_fields(&operation.node.selection_set.node, &mut Vec::new(), &mut roots);

        for (root, trail) in roots {
            if let Some(pos) = walker.first_too_deep(&root.node.selection_set.node, 1, &trail) {
                debug!(operation = label, field = %root.node.name.node, "depth violation");
                violations.push(depth_error(label, max_depth, pos));
            }
        }
    }

    violations
}

fn depth_error(operation: &str, max_depth: usize, pos: Pos) -> ServerError {
    ApiError::QueryTooDeep {
        operation: operation.to_string(),
        max_depth,
    }
    .extend()
    .into_server_error(pos)
}

type Field = async_graphql::parser::types::Field;

/// A field reached through fragment expansion, with the fragments that were
/// open when it was reached
type Reached<'a> = (&'a Positioned<Field>, Vec<&'a str>);

struct DepthWalker<'a> {
    fragments: &'a HashMap<Name, Positioned<FragmentDefinition>>,
    max_depth: usize,
}

impl<'a> DepthWalker<'a> {
    /// Flatten a selection set into its fields, expanding fragments
    ///
    /// `trail` holds the fragments already being expanded on the path from
    /// the root; spreading one of them again is a cycle and is skipped.
    fn collect_fields(
        &self,
        selection_set: &'a SelectionSet,
        trail: &mut Vec<&'a str>,
        out: &mut Vec<Reached<'a>>,
    ) {
        for selection in &selection_set.items {
            match &selection.node {
                Selection::Field(field) => {
                    if !field.node.name.node.starts_with("__") {
                        out.push((field, trail.clone()));
                    }
                }
                Selection::InlineFragment(fragment) => {
                    self.collect_fields(&fragment.node.selection_set.node, trail, out);
                }
                Selection::FragmentSpread(spread) => {
                    let name = spread.node.fragment_name.node.as_str();
                    if trail.contains(&name) {
                        continue;
                    }
                    if let Some(fragment) = self.fragments.get(&spread.node.fragment_name.node) {
                        trail.push(name);
                        self.collect_fields(&fragment.node.selection_set.node, trail, out);
                        trail.pop();
                    }
                }
            }
        }
    }

    /// Depth-first search for the first field deeper than the limit
    fn first_too_deep(
        &self,
        selection_set: &'a SelectionSet,
        depth: usize,
        trail: &[&'a str],
    ) -> Option<Pos> {
        let mut fields = Vec::new();
        self.collect_fields(selection_set, &mut trail.to_vec(), &mut fields);

        for (field, trail) in fields {
            if depth > self.max_depth {
                return Some(field.pos);
            }
            if let Some(pos) =
                self.first_too_deep(&field.node.selection_set.node, depth + 1, &trail)
            {
                return Some(pos);
            }
        }
        None
    }
}
