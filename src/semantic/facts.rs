//! The questions rules may ask about a snapshot.

use crate::syntax::SyntaxNode;

use super::symbols::{Symbol, TypeSymbol};

/// Type of an expression before and after implicit conversion.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeInfo {
    pub ty: TypeSymbol,
    /// Type after the conversion the context applies (same as `ty` if none).
    pub converted: TypeSymbol,
}

impl TypeInfo {
    pub fn new(ty: TypeSymbol) -> Self {
        Self {
            converted: ty.clone(),
            ty,
        }
    }

    pub fn converted_to(mut self, converted: TypeSymbol) -> Self {
        self.converted = converted;
        self
    }
}

/// Read-only view of resolved symbols and types for one tree snapshot.
///
/// Every query may answer `None` (or `false`) when the resolver does not
/// know; rules treat that as "does not apply". A handle is only valid for
/// the snapshot it was built from.
pub trait SymbolFacts: Send + Sync {
    /// Type of an expression or type syntax.
    fn type_of(&self, node: SyntaxNode<'_>) -> Option<TypeInfo>;

    /// Symbol an expression or name binds to.
    fn symbol_of(&self, node: SyntaxNode<'_>) -> Option<Symbol>;

    /// Whether `ty` derives from `base` (or implements it, when
    /// `include_interfaces` is set). A type is not its own subtype.
    fn is_subtype_or_implements(&self, ty: &TypeSymbol, base: &TypeSymbol, include_interfaces: bool) -> bool;

    /// Member of `ty` that implements the interface member `member`.
    fn find_implementation_for_interface_member(&self, ty: &TypeSymbol, member: &Symbol) -> Option<Symbol>;

    /// Member that `name` resolves to when accessed on an expression of type `ty`.
    fn lookup_member(&self, ty: &TypeSymbol, name: &str) -> Option<Symbol>;

    fn well_known_type(&self, name: &str) -> Option<TypeSymbol>;

    fn is_extension_method(&self, method: &Symbol) -> bool {
        method.is_extension_method
    }

    fn symbols_equal(&self, a: &Symbol, b: &Symbol) -> bool {
        a == b
    }

    fn equals_or_inherits_from(&self, ty: &TypeSymbol, base: &TypeSymbol, include_interfaces: bool) -> bool {
        ty == base || self.is_subtype_or_implements(ty, base, include_interfaces)
    }
}
