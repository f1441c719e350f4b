//! Core types shared by all rules.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use crate::error::RewriteError;
use crate::rewrite::Edit;
use crate::syntax::{SyntaxNode, SyntaxToken, TextSpan};

/// How prominently a finding is shown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
    Info,
    /// Offered as a refactoring only, never shown as a diagnostic.
    Hidden,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
            Severity::Warning => write!(f, "warning"),
            Severity::Info => write!(f, "info"),
            Severity::Hidden => write!(f, "hidden"),
        }
    }
}

impl std::str::FromStr for Severity {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "error" => Ok(Severity::Error),
            "warning" => Ok(Severity::Warning),
            "info" => Ok(Severity::Info),
            "hidden" => Ok(Severity::Hidden),
            _ => Err(format!("unknown severity: {}", s)),
        }
    }
}

/// Stable rule identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RuleId {
    UseExpressionBody,
    RemoveRedundantCast,
    RemoveRedundantAsOperator,
    UseStringLength,
    SimplifyBooleanComparison,
    UseStringComparison,
    SimplifyLinqChain,
    SplitVariableDeclaration,
    AddIdentifierToLocalDeclaration,
    SimplifyIfToReturn,
    SimplifyLambdaParameterList,
    RemoveBraces,
    RemoveComment,
    RemoveRegion,
    UseSpacesInsteadOfTab,
    DuplicateArgumentOrParameter,
    AddParameterToDocumentationComment,
}

impl RuleId {
    pub const ALL: &'static [RuleId] = &[
        RuleId::UseExpressionBody,
        RuleId::RemoveRedundantCast,
        RuleId::RemoveRedundantAsOperator,
        RuleId::UseStringLength,
        RuleId::SimplifyBooleanComparison,
        RuleId::UseStringComparison,
        RuleId::SimplifyLinqChain,
        RuleId::SplitVariableDeclaration,
        RuleId::AddIdentifierToLocalDeclaration,
        RuleId::SimplifyIfToReturn,
        RuleId::SimplifyLambdaParameterList,
        RuleId::RemoveBraces,
        RuleId::RemoveComment,
        RuleId::RemoveRegion,
        RuleId::UseSpacesInsteadOfTab,
        RuleId::DuplicateArgumentOrParameter,
        RuleId::AddParameterToDocumentationComment,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            RuleId::UseExpressionBody => "use_expression_body",
            RuleId::RemoveRedundantCast => "remove_redundant_cast",
            RuleId::RemoveRedundantAsOperator => "remove_redundant_as_operator",
            RuleId::UseStringLength => "use_string_length",
            RuleId::SimplifyBooleanComparison => "simplify_boolean_comparison",
            RuleId::UseStringComparison => "use_string_comparison",
            RuleId::SimplifyLinqChain => "simplify_linq_chain",
            RuleId::SplitVariableDeclaration => "split_variable_declaration",
            RuleId::AddIdentifierToLocalDeclaration => "add_identifier_to_local_declaration",
            RuleId::SimplifyIfToReturn => "simplify_if_to_return",
            RuleId::SimplifyLambdaParameterList => "simplify_lambda_parameter_list",
            RuleId::RemoveBraces => "remove_braces",
            RuleId::RemoveComment => "remove_comment",
            RuleId::RemoveRegion => "remove_region",
            RuleId::UseSpacesInsteadOfTab => "use_spaces_instead_of_tab",
            RuleId::DuplicateArgumentOrParameter => "duplicate_argument_or_parameter",
            RuleId::AddParameterToDocumentationComment => "add_parameter_to_documentation_comment",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        RuleId::ALL.iter().copied().find(|r| r.as_str() == s)
    }
}

impl fmt::Display for RuleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Visual role of a highlighted span.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Classification {
    /// The reported location.
    Primary,
    /// Text the rewrite will remove (keywords, braces).
    FadeOut,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Highlight {
    pub span: TextSpan,
    pub classification: Classification,
}

impl Highlight {
    pub fn fade(span: TextSpan) -> Self {
        Self {
            span,
            classification: Classification::FadeOut,
        }
    }
}

/// Builds the edit for a proposal from the node the rule ran on.
pub type Producer = Arc<dyn for<'t> Fn(SyntaxNode<'t>) -> Result<Edit, RewriteError> + Send + Sync>;

/// What a rule emits: a not-yet-applied rewrite.
#[derive(Clone)]
pub struct Proposal {
    pub title: String,
    /// Reported location (may be narrower than the node).
    pub span: TextSpan,
    pub fades: Vec<Highlight>,
    /// Refines deduplication when one rule offers several fixes at a span.
    pub discriminator: Option<&'static str>,
    pub producer: Producer,
}

impl Proposal {
    pub fn new<F>(title: impl Into<String>, span: TextSpan, producer: F) -> Self
    where
        F: for<'t> Fn(SyntaxNode<'t>) -> Result<Edit, RewriteError> + Send + Sync + 'static,
    {
        Self {
            title: title.into(),
            span,
            fades: Vec::new(),
            discriminator: None,
            producer: Arc::new(producer),
        }
    }

    pub fn fade(mut self, span: TextSpan) -> Self {
        self.fades.push(Highlight::fade(span));
        self
    }

    pub fn fade_token(self, token: Option<SyntaxToken<'_>>) -> Self {
        match token {
            Some(t) => self.fade(t.span()),
            None => self,
        }
    }

    pub fn discriminator(mut self, discriminator: &'static str) -> Self {
        self.discriminator = Some(discriminator);
        self
    }
}

impl fmt::Debug for Proposal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Proposal")
            .field("title", &self.title)
            .field("span", &self.span)
            .field("fades", &self.fades)
            .field("discriminator", &self.discriminator)
            .finish_non_exhaustive()
    }
}
