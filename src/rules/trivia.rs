//! Refactorings on comments, regions and indentation.
//!
//! These rules run on the compilation unit and look at the trivia the query
//! span touches instead of at a node.

use std::collections::BTreeSet;

use crate::error::RewriteError;
use crate::rewrite::Edit;
use crate::syntax::{SyntaxKind, SyntaxNode, TextSpan, Trivia, TriviaKind, TriviaRef};

use super::context::RuleContext;
use super::types::{Proposal, RuleId, Severity};
use super::Rule;

const TAB_WIDTH: usize = 4;

/// Trivia matching `keep` that the query touches, outside protected spans.
fn touched<'a>(root: SyntaxNode<'a>, ctx: &RuleContext<'_>, keep: impl Fn(&Trivia) -> bool) -> Vec<TriviaRef<'a>> {
    root.trivia()
        .into_iter()
        .filter(|t| keep(t.trivia) && t.span.intersects(ctx.query) && !ctx.is_protected(t.span))
        .collect()
}

fn hits(list: &[TriviaRef<'_>], targets: &[TextSpan]) -> BTreeSet<usize> {
    list.iter()
        .filter(|t| targets.contains(&t.span))
        .map(|t| t.index)
        .collect()
}

/// Rewrite the trivia lists holding `targets`, with one token change per
/// affected token. `rewrite` gets the list, the target indices in it and
/// whether it is a leading list.
fn edit_trivia<F>(root: SyntaxNode<'_>, targets: &[TextSpan], rewrite: F) -> Result<Edit, RewriteError>
where
    F: Fn(&[Trivia], &BTreeSet<usize>, bool) -> Vec<Trivia>,
{
    let mut edit = Edit::new();
    let mut found = 0;

    for token in root.tokens() {
        let leading = hits(&token.leading_trivia(), targets);
        let trailing = hits(&token.trailing_trivia(), targets);
        if leading.is_empty() && trailing.is_empty() {
            continue;
        }
        found += leading.len() + trailing.len();

        let green = token.green();
        let mut replacement = green.as_ref().clone();
        if !leading.is_empty() {
            replacement = replacement.with_leading(rewrite(green.leading(), &leading, true));
        }
        if !trailing.is_empty() {
            replacement = replacement.with_trailing(rewrite(green.trailing(), &trailing, false));
        }
        edit = edit.and(Edit::replace_token(token, replacement));
    }

    if found != targets.len() {
        return Err(RewriteError::UnexpectedShape {
            kind: root.kind(),
            reason: "trivia is no longer present",
        });
    }
    Ok(edit)
}

/// Drop the fragments at `indices` together with the whitespace before
/// them. A fragment alone on its line takes its line break along.
fn remove_fragments(list: &[Trivia], indices: &BTreeSet<usize>, leading: bool) -> Vec<Trivia> {
    let mut removed = vec![false; list.len()];
    for &i in indices {
        removed[i] = true;
        let mut start = i;
        while start > 0 && list[start - 1].kind == TriviaKind::Whitespace {
            start -= 1;
            removed[start] = true;
        }
        let at_line_start = leading && (start == 0 || list[start - 1].kind == TriviaKind::EndOfLine);
        match list.get(i + 1).map(|t| t.kind) {
            Some(TriviaKind::EndOfLine) if at_line_start => removed[i + 1] = true,
            Some(TriviaKind::Whitespace) if start == i => removed[i + 1] = true,
            _ => {}
        }
    }
    list.iter()
        .zip(removed)
        .filter(|(_, gone)| !gone)
        .map(|(t, _)| t.clone())
        .collect()
}

fn expand_tabs(list: &[Trivia], indices: &BTreeSet<usize>, _leading: bool) -> Vec<Trivia> {
    let spaces = " ".repeat(TAB_WIDTH);
    list.iter()
        .enumerate()
        .map(|(i, t)| {
            if indices.contains(&i) {
                Trivia::new(t.kind, t.text.replace('\t', &spaces))
            } else {
                t.clone()
            }
        })
        .collect()
}

pub struct RemoveComment;

impl Rule for RemoveComment {
    fn id(&self) -> RuleId {
        RuleId::RemoveComment
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::CompilationUnit]
    }

    fn default_severity(&self) -> Severity {
        Severity::Hidden
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        if !node.contains_comments() {
            return;
        }
        for comment in touched(node, ctx, |t| t.kind.is_comment()) {
            let span = comment.span;
            out.push(Proposal::new("Remove comment", span, move |root| {
                edit_trivia(root, &[span], remove_fragments)
            }));
        }
    }
}

/// Matched `#region` / `#endregion` spans, in order of the closing directive.
fn region_pairs(root: SyntaxNode<'_>) -> Vec<(TextSpan, TextSpan)> {
    let mut open = Vec::new();
    let mut pairs = Vec::new();
    for t in root.trivia() {
        match t.trivia.kind {
            TriviaKind::RegionDirective => open.push(t.span),
            TriviaKind::EndRegionDirective => {
                if let Some(start) = open.pop() {
                    pairs.push((start, t.span));
                }
            }
            _ => {}
        }
    }
    pairs
}

pub struct RemoveRegion;

impl Rule for RemoveRegion {
    fn id(&self) -> RuleId {
        RuleId::RemoveRegion
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::CompilationUnit]
    }

    fn default_severity(&self) -> Severity {
        Severity::Hidden
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        if !node.contains_directives() {
            return;
        }
        for (start, end) in region_pairs(node) {
            let Some(hit) = [start, end].into_iter().find(|s| s.intersects(ctx.query)) else {
                continue;
            };
            if ctx.is_protected(start) || ctx.is_protected(end) {
                continue;
            }
            out.push(Proposal::new("Remove region", hit, move |root| {
                edit_trivia(root, &[start, end], remove_fragments)
            }));
        }
    }
}

pub struct UseSpacesInsteadOfTab;

impl Rule for UseSpacesInsteadOfTab {
    fn id(&self) -> RuleId {
        RuleId::UseSpacesInsteadOfTab
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::CompilationUnit]
    }

    fn default_severity(&self) -> Severity {
        Severity::Warning
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        let tabs = touched(node, ctx, |t| t.kind == TriviaKind::Whitespace && t.text.contains('\t'));
        for whitespace in tabs {
            let span = whitespace.span;
            out.push(Proposal::new("Use spaces instead of tab", span, move |root| {
                edit_trivia(root, &[span], expand_tabs)
            }));
        }
    }
}
