//! Documentation comments on members.

use std::collections::HashSet;

use once_cell::sync::Lazy;
use regex::Regex;

use crate::error::RewriteError;
use crate::rewrite::trivia::{end_of_line, indentation};
use crate::rewrite::Edit;
use crate::syntax::ast::Parameter;
use crate::syntax::{SyntaxKind, SyntaxNode, SyntaxToken, TextSpan, Trivia, TriviaKind};

use super::context::RuleContext;
use super::types::{Proposal, RuleId};
use super::Rule;

static PARAM_ELEMENT: Lazy<Regex> = Lazy::new(|| Regex::new(r#"<param\s+name\s*=\s*"([^"]*)""#).unwrap());

/// A member whose doc comment documents some parameters but not all gets
/// empty `<param>` elements for the rest, next to their neighbours.
pub struct AddParameterToDocumentationComment;

/// The doc comment and parameters of a member.
struct Documented<'a> {
    first: SyntaxToken<'a>,
    /// Span from the first doc line to the end of the parameter list.
    span: TextSpan,
    /// Parameter names in declaration order, with whether they are documented.
    parameters: Vec<(&'a str, bool)>,
}

fn documented_names(line: &str) -> impl Iterator<Item = &str> {
    PARAM_ELEMENT
        .captures_iter(line)
        .filter_map(|c| c.get(1))
        .map(|m| m.as_str())
}

fn inspect(node: SyntaxNode<'_>) -> Option<Documented<'_>> {
    let first = node.first_token()?;
    let docs: Vec<_> = first
        .leading_trivia()
        .into_iter()
        .filter(|t| t.trivia.kind == TriviaKind::DocumentationComment)
        .collect();
    let start = docs.first()?.span.start;
    // Multi-line doc trivia and external or inherited docs are left alone.
    let opaque = docs.iter().any(|t| {
        let text = &t.trivia.text;
        text.contains('\n') || text.contains("<inheritdoc") || text.contains("<include")
    });
    if opaque {
        return None;
    }
    let names: HashSet<&str> = docs.iter().flat_map(|t| documented_names(&t.trivia.text)).collect();
    if names.is_empty() {
        return None;
    }

    let list = node.children().find(|c| c.kind() == SyntaxKind::ParameterList)?;
    let parameters = list
        .list_nodes(1)
        .into_iter()
        .map(|p| {
            let name = Parameter::cast(p)?.identifier()?.text();
            Some((name, names.contains(name)))
        })
        .collect::<Option<Vec<_>>>()?;
    Some(Documented {
        first,
        span: TextSpan::new(start, list.span().end),
        parameters,
    })
}

impl Rule for AddParameterToDocumentationComment {
    fn id(&self) -> RuleId {
        RuleId::AddParameterToDocumentationComment
    }

    fn kinds(&self) -> &'static [SyntaxKind] {
        &[SyntaxKind::MethodDeclaration, SyntaxKind::ConstructorDeclaration]
    }

    fn detect(&self, node: SyntaxNode<'_>, ctx: &RuleContext<'_>, out: &mut Vec<Proposal>) {
        if ctx.rejects(node) {
            return;
        }
        let Some(documented) = inspect(node) else {
            return;
        };
        if documented.parameters.iter().all(|(_, done)| *done) {
            return;
        }

        out.push(Proposal::new(
            "Add parameter to documentation comment",
            documented.span,
            add_parameters,
        ));
    }
}

fn param_line(trivia: &[Trivia], name: &str) -> Option<usize> {
    trivia.iter().position(|t| {
        t.kind == TriviaKind::DocumentationComment && documented_names(&t.text).any(|n| n == name)
    })
}

fn add_parameters(node: SyntaxNode<'_>) -> Result<Edit, RewriteError> {
    let Documented { first, parameters, .. } = inspect(node).ok_or(RewriteError::UnexpectedShape {
        kind: node.kind(),
        reason: "no partial parameter documentation",
    })?;
    let mut trivia = first.green().leading().to_vec();
    let eol = end_of_line(&trivia);
    let mut done: Vec<bool> = parameters.iter().map(|(_, d)| *d).collect();

    for i in 0..parameters.len() {
        if done[i] {
            continue;
        }
        let element = Trivia::new(
            TriviaKind::DocumentationComment,
            format!("/// <param name=\"{}\"></param>", parameters[i].0),
        );
        let before = (0..i).rev().filter(|&j| done[j]).find_map(|j| param_line(&trivia, parameters[j].0));
        let after = || (i + 1..parameters.len()).filter(|&j| done[j]).find_map(|j| param_line(&trivia, parameters[j].0));
        let insertion = match before {
            Some(k) => {
                let mut lines = vec![eol.clone()];
                lines.extend(indentation(&trivia[..k]));
                lines.push(element);
                (k + 1, lines)
            }
            None => {
                let Some(k) = after() else {
                    continue;
                };
                let mut lines = vec![element, eol.clone()];
                lines.extend(indentation(&trivia[..k]));
                (k, lines)
            }
        };
        let (at, lines) = insertion;
        trivia.splice(at..at, lines);
        done[i] = true;
    }

    Ok(Edit::replace_token(first, (**first.green()).clone().with_leading(trivia)))
}
