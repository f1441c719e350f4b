//! Collecting, selecting and committing candidate actions.

use std::collections::HashSet;
use std::path::PathBuf;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

use rayon::prelude::*;

use crate::config::{GeneratedCode, Settings};
use crate::error::DispatchError;
use crate::rewrite::Rewriter;
use crate::rules::{
    default_registry, Classification, Highlight, Proposal, Rule, RuleContext, RuleId, RuleRegistry,
    Severity,
};
use crate::semantic::SymbolFacts;
use crate::syntax::{SyntaxNode, SyntaxTree, TextSpan};

use super::action::{Anchor, CandidateAction, Diagnostic, EquivalenceKey};

/// Per-call inputs to [`Engine::collect_with`].
#[derive(Debug, Clone, Default)]
pub struct CollectOptions {
    /// Regions no action may touch.
    pub protected: Vec<TextSpan>,
    /// Checked before every rule; once set, collection stops.
    pub cancel: Option<Arc<AtomicBool>>,
    /// Path of the source file, used for generated-code detection.
    pub path: Option<PathBuf>,
}

/// Runs rules against a snapshot and applies the actions they offer.
pub struct Engine<'r> {
    registry: &'r RuleRegistry,
    settings: Settings,
    /// `None` when generated code is not skipped.
    generated: Option<GeneratedCode>,
}

impl Engine<'static> {
    /// Engine over the built-in rule catalog.
    pub fn new(settings: Settings) -> Self {
        Self::with_registry(default_registry(), settings)
    }
}

impl<'r> Engine<'r> {
    pub fn with_registry(registry: &'r RuleRegistry, settings: Settings) -> Self {
        let generated = if settings.skip_generated_code {
            settings
                .generated_code()
                .map_err(|e| tracing::warn!(error = %e, "ignoring generated code patterns"))
                .ok()
        } else {
            None
        };
        Self {
            registry,
            settings,
            generated,
        }
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Candidate actions for `span`, innermost construct first.
    pub fn collect(
        &self,
        tree: &SyntaxTree,
        facts: &dyn SymbolFacts,
        span: TextSpan,
    ) -> Result<Vec<CandidateAction>, DispatchError> {
        self.collect_with(tree, facts, span, &CollectOptions::default())
    }

    pub fn collect_with(
        &self,
        tree: &SyntaxTree,
        facts: &dyn SymbolFacts,
        span: TextSpan,
        options: &CollectOptions,
    ) -> Result<Vec<CandidateAction>, DispatchError> {
        if self.is_generated(tree, options) {
            tracing::debug!(path = ?options.path, "skipping generated code");
            return Ok(Vec::new());
        }

        let mut ctx = RuleContext::new(facts, span).with_protected(&options.protected);
        if let Some(cancel) = &options.cancel {
            ctx = ctx.with_cancel(cancel);
        }

        let mut matched_rules = HashSet::new();
        let mut seen_keys = HashSet::new();
        let mut actions = Vec::new();
        let mut proposals = Vec::new();
        let mut duplicates = 0usize;

        for node in tree.covering_node(span).ancestors_and_self() {
            for rule in self.registry.rules_for(node.kind()) {
                // Nearest enclosing match wins.
                if matched_rules.contains(&rule.id()) || !self.settings.is_enabled(rule.id()) {
                    continue;
                }
                if ctx.is_cancelled() {
                    tracing::debug!(collected = actions.len(), "collection cancelled");
                    return Err(DispatchError::Cancelled);
                }

                rule.detect(node, &ctx, &mut proposals);
                for proposal in proposals.drain(..) {
                    if !proposal.span.intersects(span) {
                        continue;
                    }
                    matched_rules.insert(rule.id());
                    let action = self.candidate(rule.as_ref(), node, proposal);
                    if seen_keys.insert(action.key) {
                        actions.push(action);
                    } else {
                        duplicates += 1;
                    }
                }
            }
        }

        tracing::debug!(
            count = actions.len(),
            duplicates,
            "collected candidate actions"
        );
        Ok(actions)
    }

    /// Find the action a caller picked by rule and equivalence key.
    pub fn select<'a>(
        actions: &'a [CandidateAction],
        rule: RuleId,
        key: &EquivalenceKey,
    ) -> Result<&'a CandidateAction, DispatchError> {
        actions
            .iter()
            .find(|a| a.rule == rule && a.key == *key)
            .ok_or(DispatchError::NotFound(rule))
    }

    /// Apply `action` to `tree`, which must be the snapshot it was collected from.
    pub fn commit(&self, tree: &SyntaxTree, action: &CandidateAction) -> Result<SyntaxTree, DispatchError> {
        let Some(node) = action.anchor.resolve(tree) else {
            tracing::warn!(rule = %action.rule, span = %action.span, "rejecting stale action");
            return Err(DispatchError::StaleAction {
                rule: action.rule,
                span: action.span,
            });
        };

        let edit = (action.producer)(node)?;
        let rewritten = Rewriter::apply(tree, &edit)?;
        tracing::debug!(
            rule = %action.rule,
            changes = edit.changes().len(),
            "committed action"
        );
        Ok(rewritten)
    }

    /// Every visible finding in the snapshot, sorted by span then rule.
    pub fn analyze(&self, tree: &SyntaxTree, facts: &dyn SymbolFacts) -> Vec<Diagnostic> {
        if self.is_generated(tree, &CollectOptions::default()) {
            return Vec::new();
        }

        let query = TextSpan::new(0, tree.len());
        let nodes: Vec<SyntaxNode<'_>> = tree.nodes().collect();

        let mut diagnostics: Vec<Diagnostic> = nodes
            .par_iter()
            .flat_map_iter(|&node| {
                let ctx = RuleContext::new(facts, query);
                let mut found = Vec::new();
                for rule in self.registry.rules_for(node.kind()) {
                    if !self.settings.is_enabled(rule.id()) {
                        continue;
                    }
                    let severity = self.settings.severity_for(rule.as_ref());
                    if severity == Severity::Hidden {
                        continue;
                    }
                    let mut proposals = Vec::new();
                    rule.detect(node, &ctx, &mut proposals);
                    found.extend(
                        proposals
                            .into_iter()
                            .map(|p| self.candidate(rule.as_ref(), node, p).to_diagnostic()),
                    );
                }
                found
            })
            .collect();

        diagnostics.sort_by(|a, b| {
            (a.span.start, a.span.end, a.rule, &a.title).cmp(&(b.span.start, b.span.end, b.rule, &b.title))
        });
        diagnostics.dedup();

        tracing::debug!(
            count = diagnostics.len(),
            nodes = nodes.len(),
            "analyzed snapshot"
        );
        diagnostics
    }

    fn candidate(&self, rule: &dyn Rule, node: SyntaxNode<'_>, proposal: Proposal) -> CandidateAction {
        let mut highlights = vec![Highlight {
            span: proposal.span,
            classification: Classification::Primary,
        }];
        if self.settings.include_fade_spans {
            highlights.extend(proposal.fades);
        }

        CandidateAction {
            rule: rule.id(),
            title: proposal.title,
            span: proposal.span,
            severity: self.settings.severity_for(rule),
            highlights,
            key: EquivalenceKey {
                rule: rule.id(),
                span: proposal.span,
                discriminator: proposal.discriminator,
            },
            anchor: Anchor::new(node),
            producer: proposal.producer,
        }
    }

    fn is_generated(&self, tree: &SyntaxTree, options: &CollectOptions) -> bool {
        let Some(generated) = &self.generated else {
            return false;
        };
        let header: String = tree
            .root()
            .first_token()
            .map(|t| t.green().leading().iter().map(|t| t.text.as_str()).collect())
            .unwrap_or_default();
        generated.is_match(options.path.as_deref(), &header)
    }
}
