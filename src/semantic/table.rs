//! In-memory facts keyed by node text.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::syntax::SyntaxNode;

use super::facts::{SymbolFacts, TypeInfo};
use super::symbols::{Symbol, TypeSymbol};

/// Precomputed facts for a snapshot.
///
/// Callers that resolve types ahead of time (or tests) record answers by the
/// source text of the node they belong to: `with_type("s", ...)` answers
/// `type_of` for every node whose text is `s`.
#[derive(Debug, Clone, Default)]
pub struct FactTable {
    types: HashMap<String, TypeInfo>,
    symbols: HashMap<String, Symbol>,
    /// Direct supertypes of a type, by type name.
    supertypes: HashMap<String, Vec<TypeSymbol>>,
    /// (type name, interface member name) -> implementing member.
    implementations: HashMap<(String, String), Symbol>,
    /// (type name, member name) -> declared member.
    members: HashMap<(String, String), Symbol>,
    well_known: HashMap<String, TypeSymbol>,
}

impl FactTable {
    /// Table preloaded with the predefined types.
    pub fn new() -> Self {
        let mut table = Self::default();
        for (name, ty) in [
            ("System.String", TypeSymbol::string()),
            ("System.Boolean", TypeSymbol::boolean()),
            ("System.Int32", TypeSymbol::int32()),
            ("System.Object", TypeSymbol::object()),
        ] {
            table.well_known.insert(name.to_string(), ty);
        }
        table
    }

    pub fn with_type(mut self, text: &str, ty: TypeSymbol) -> Self {
        self.types.insert(text.to_string(), TypeInfo::new(ty));
        self
    }

    pub fn with_type_info(mut self, text: &str, info: TypeInfo) -> Self {
        self.types.insert(text.to_string(), info);
        self
    }

    pub fn with_symbol(mut self, text: &str, symbol: Symbol) -> Self {
        self.symbols.insert(text.to_string(), symbol);
        self
    }

    /// Record that `ty` directly derives from or implements `base`.
    pub fn with_supertype(mut self, ty: &TypeSymbol, base: TypeSymbol) -> Self {
        self.supertypes.entry(ty.name.clone()).or_default().push(base);
        self
    }

    pub fn with_member(mut self, ty: &TypeSymbol, member: Symbol) -> Self {
        self.members
            .insert((ty.name.clone(), member.name.clone()), member);
        self
    }

    /// Record that `implementation` (declared on `ty`) implements `interface_member`.
    pub fn with_implementation(mut self, ty: &TypeSymbol, interface_member: &Symbol, implementation: Symbol) -> Self {
        self.implementations
            .insert((ty.name.clone(), interface_member.name.clone()), implementation);
        self
    }

    /// Supertypes of `ty` in breadth-first order, nearest first.
    fn supertypes_of(&self, ty: &TypeSymbol, include_interfaces: bool) -> Vec<TypeSymbol> {
        let mut seen = HashSet::new();
        let mut queue = VecDeque::from([ty.name.clone()]);
        let mut out = Vec::new();

        while let Some(name) = queue.pop_front() {
            for base in self.supertypes.get(&name).into_iter().flatten() {
                if base.is_interface() && !include_interfaces {
                    continue;
                }
                if seen.insert(base.name.clone()) {
                    queue.push_back(base.name.clone());
                    out.push(base.clone());
                }
            }
        }
        out
    }
}

impl SymbolFacts for FactTable {
    fn type_of(&self, node: SyntaxNode<'_>) -> Option<TypeInfo> {
        self.types.get(&node.text()).cloned()
    }

    fn symbol_of(&self, node: SyntaxNode<'_>) -> Option<Symbol> {
        self.symbols.get(&node.text()).cloned()
    }

    fn is_subtype_or_implements(&self, ty: &TypeSymbol, base: &TypeSymbol, include_interfaces: bool) -> bool {
        self.supertypes_of(ty, include_interfaces)
            .iter()
            .any(|t| t.name == base.name)
    }

    fn find_implementation_for_interface_member(&self, ty: &TypeSymbol, member: &Symbol) -> Option<Symbol> {
        std::iter::once(ty.clone())
            .chain(self.supertypes_of(ty, false))
            .find_map(|t| {
                self.implementations
                    .get(&(t.name.clone(), member.name.clone()))
                    .cloned()
            })
    }

    fn lookup_member(&self, ty: &TypeSymbol, name: &str) -> Option<Symbol> {
        std::iter::once(ty.clone())
            .chain(self.supertypes_of(ty, ty.is_interface()))
            .find_map(|t| self.members.get(&(t.name.clone(), name.to_string())).cloned())
    }

    fn well_known_type(&self, name: &str) -> Option<TypeSymbol> {
        self.well_known.get(name).cloned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::syntax::{factory as f, SyntaxTree};

    #[test]
    fn test_lookup_by_text() {
        let table = FactTable::new().with_type("s", TypeSymbol::string());
        let tree = SyntaxTree::new(f::identifier_name("s"));
        let info = table.type_of(tree.root()).unwrap();
        assert!(info.ty.is_string());
        assert!(info.converted.is_string());
        assert!(table.symbol_of(tree.root()).is_none());
    }

    #[test]
    fn test_transitive_supertypes() {
        let derived = TypeSymbol::class("Derived");
        let base = TypeSymbol::class("Base");
        let iface = TypeSymbol::interface("IThing");
        let table = FactTable::new()
            .with_supertype(&derived, base.clone())
            .with_supertype(&base, iface.clone());

        assert!(table.is_subtype_or_implements(&derived, &base, false));
        assert!(table.is_subtype_or_implements(&derived, &iface, true));
        assert!(!table.is_subtype_or_implements(&derived, &iface, false));
        assert!(!table.is_subtype_or_implements(&base, &derived, true));
        assert!(table.equals_or_inherits_from(&base, &base, false));
    }

    #[test]
    fn test_member_lookup_walks_base_classes() {
        let derived = TypeSymbol::class("Derived");
        let base = TypeSymbol::class("Base");
        let name = Symbol::property("Name", base.clone());
        let table = FactTable::new()
            .with_supertype(&derived, base.clone())
            .with_member(&base, name.clone());

        assert_eq!(table.lookup_member(&derived, "Name"), Some(name));
        assert_eq!(table.lookup_member(&derived, "Other"), None);
        assert_eq!(
            table.well_known_type("System.String"),
            Some(TypeSymbol::string())
        );
    }
}
