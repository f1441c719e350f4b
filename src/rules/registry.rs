//! Kind-indexed rule lookup.

use std::collections::HashMap;
use std::sync::Arc;

use once_cell::sync::OnceCell;

use crate::syntax::SyntaxKind;

use super::types::RuleId;
use super::{
    AddIdentifierToLocalDeclaration, AddParameterToDocumentationComment, DuplicateArgumentOrParameter,
    RemoveBraces, RemoveComment, RemoveRedundantAsOperator, RemoveRedundantCast, RemoveRegion, Rule,
    SimplifyBooleanComparison, SimplifyIfToReturn, SimplifyLambdaParameterList, SimplifyLinqChain,
    SplitVariableDeclaration, UseExpressionBody, UseSpacesInsteadOfTab, UseStringComparison, UseStringLength,
};

/// Rules grouped by the node kinds they subscribe to.
///
/// Within a kind, rules keep their registration order.
#[derive(Default)]
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    by_kind: HashMap<SyntaxKind, Vec<Arc<dyn Rule>>>,
}

impl RuleRegistry {
    /// An empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// A registry holding every built-in rule.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        registry.register(UseExpressionBody);
        registry.register(RemoveRedundantCast);
        registry.register(RemoveRedundantAsOperator);
        registry.register(UseStringLength);
        registry.register(SimplifyBooleanComparison);
        registry.register(UseStringComparison);
        registry.register(SimplifyLinqChain);
        registry.register(SplitVariableDeclaration);
        registry.register(AddIdentifierToLocalDeclaration);
        registry.register(SimplifyIfToReturn);
        registry.register(SimplifyLambdaParameterList);
        registry.register(RemoveBraces);
        registry.register(RemoveComment);
        registry.register(RemoveRegion);
        registry.register(UseSpacesInsteadOfTab);
        registry.register(DuplicateArgumentOrParameter);
        registry.register(AddParameterToDocumentationComment);
        registry
    }

    pub fn register(&mut self, rule: impl Rule + 'static) {
        let rule: Arc<dyn Rule> = Arc::new(rule);
        for kind in rule.kinds() {
            self.by_kind.entry(*kind).or_default().push(Arc::clone(&rule));
        }
        self.rules.push(rule);
    }

    /// Rules subscribed to `kind`.
    pub fn rules_for(&self, kind: SyntaxKind) -> &[Arc<dyn Rule>] {
        self.by_kind.get(&kind).map(Vec::as_slice).unwrap_or_default()
    }

    pub fn get(&self, id: RuleId) -> Option<&Arc<dyn Rule>> {
        self.rules.iter().find(|r| r.id() == id)
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Shared registry of the built-in rules, built on first use.
static DEFAULT_REGISTRY: OnceCell<RuleRegistry> = OnceCell::new();

pub fn default_registry() -> &'static RuleRegistry {
    DEFAULT_REGISTRY.get_or_init(RuleRegistry::with_defaults)
}
