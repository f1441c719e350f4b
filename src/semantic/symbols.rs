//! Symbol and type descriptions returned by a resolver.

use serde::{Deserialize, Serialize};

/// Generic definition of `IEnumerable<T>`.
pub const IENUMERABLE_OF_T: &str = "System.Collections.Generic.IEnumerable<T>";
/// Generic definition of `Func<T, TResult>`.
pub const FUNC_OF_T_RESULT: &str = "System.Func<T, TResult>";
/// Static class holding the LINQ-to-objects extension methods.
pub const LINQ_ENUMERABLE: &str = "System.Linq.Enumerable";
/// Extension class for `ImmutableArray<T>`, whose `Where` behaves like LINQ's.
pub const IMMUTABLE_ARRAY_EXTENSIONS: &str = "System.Linq.ImmutableArrayExtensions";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TypeKind {
    Class,
    Struct,
    Interface,
    Enum,
    Delegate,
    TypeParameter,
    /// The resolver could not bind the type.
    Error,
}

/// Built-in types the rules care about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SpecialType {
    #[default]
    None,
    Boolean,
    String,
    Int32,
    Object,
}

/// A resolved type.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TypeSymbol {
    /// Display name, e.g. `string` or `System.Collections.Generic.List<int>`.
    pub name: String,
    pub kind: TypeKind,
    pub special: SpecialType,
    /// `bool?` and friends.
    pub nullable: bool,
    pub type_arguments: Vec<TypeSymbol>,
    /// Name of the generic definition this type was constructed from.
    pub original_definition: Option<String>,
}

impl TypeSymbol {
    pub fn new(name: impl Into<String>, kind: TypeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            special: SpecialType::None,
            nullable: false,
            type_arguments: Vec::new(),
            original_definition: None,
        }
    }

    pub fn class(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Class)
    }

    pub fn structure(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Struct)
    }

    pub fn interface(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Interface)
    }

    pub fn error(name: impl Into<String>) -> Self {
        Self::new(name, TypeKind::Error)
    }

    pub fn string() -> Self {
        Self {
            special: SpecialType::String,
            ..Self::class("string")
        }
    }

    pub fn boolean() -> Self {
        Self {
            special: SpecialType::Boolean,
            ..Self::structure("bool")
        }
    }

    pub fn int32() -> Self {
        Self {
            special: SpecialType::Int32,
            ..Self::structure("int")
        }
    }

    pub fn object() -> Self {
        Self {
            special: SpecialType::Object,
            ..Self::class("object")
        }
    }

    /// `definition` constructed with `arguments`, e.g. `IEnumerable<int>`.
    pub fn constructed(
        name: impl Into<String>,
        kind: TypeKind,
        definition: &str,
        arguments: Vec<TypeSymbol>,
    ) -> Self {
        Self {
            type_arguments: arguments,
            original_definition: Some(definition.to_string()),
            ..Self::new(name, kind)
        }
    }

    /// `IEnumerable<element>`
    pub fn enumerable_of(element: TypeSymbol) -> Self {
        let name = format!("System.Collections.Generic.IEnumerable<{}>", element.name);
        Self::constructed(name, TypeKind::Interface, IENUMERABLE_OF_T, vec![element])
    }

    /// `Func<argument, result>`
    pub fn func(argument: TypeSymbol, result: TypeSymbol) -> Self {
        let name = format!("System.Func<{}, {}>", argument.name, result.name);
        Self::constructed(name, TypeKind::Delegate, FUNC_OF_T_RESULT, vec![argument, result])
    }

    pub fn nullable(mut self) -> Self {
        self.nullable = true;
        self
    }

    pub fn is_error(&self) -> bool {
        self.kind == TypeKind::Error
    }

    pub fn is_interface(&self) -> bool {
        self.kind == TypeKind::Interface
    }

    pub fn is_value_type(&self) -> bool {
        matches!(self.kind, TypeKind::Struct | TypeKind::Enum)
    }

    /// Non-nullable `bool`.
    pub fn is_boolean(&self) -> bool {
        self.special == SpecialType::Boolean && !self.nullable
    }

    pub fn is_string(&self) -> bool {
        self.special == SpecialType::String
    }

    pub fn is_constructed_from(&self, definition: &str) -> bool {
        self.original_definition.as_deref() == Some(definition)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SymbolKind {
    Method,
    Property,
    Field,
    Event,
    Local,
    Parameter,
    Type,
    Namespace,
}

/// A resolved declaration.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Symbol {
    pub name: String,
    pub kind: SymbolKind,
    pub containing_type: Option<TypeSymbol>,
    pub is_extension_method: bool,
    /// Parameter types; for an extension method called as `x.M()`, without the receiver.
    pub parameters: Vec<TypeSymbol>,
    pub type_arguments: Vec<TypeSymbol>,
    /// Interface members this symbol implements explicitly (`void IFoo.Bar()`).
    pub explicit_interface_implementations: Vec<Symbol>,
}

impl Symbol {
    pub fn new(name: impl Into<String>, kind: SymbolKind) -> Self {
        Self {
            name: name.into(),
            kind,
            containing_type: None,
            is_extension_method: false,
            parameters: Vec::new(),
            type_arguments: Vec::new(),
            explicit_interface_implementations: Vec::new(),
        }
    }

    pub fn method(name: impl Into<String>, containing_type: TypeSymbol) -> Self {
        Self::new(name, SymbolKind::Method).in_type(containing_type)
    }

    pub fn property(name: impl Into<String>, containing_type: TypeSymbol) -> Self {
        Self::new(name, SymbolKind::Property).in_type(containing_type)
    }

    pub fn field(name: impl Into<String>, containing_type: TypeSymbol) -> Self {
        Self::new(name, SymbolKind::Field).in_type(containing_type)
    }

    /// A LINQ extension method invoked in reduced (`x.M()`) form.
    pub fn linq(name: impl Into<String>, parameters: Vec<TypeSymbol>, type_arguments: Vec<TypeSymbol>) -> Self {
        Self {
            is_extension_method: true,
            parameters,
            type_arguments,
            ..Self::method(name, TypeSymbol::class(LINQ_ENUMERABLE))
        }
    }

    pub fn in_type(mut self, containing_type: TypeSymbol) -> Self {
        self.containing_type = Some(containing_type);
        self
    }

    pub fn implementing(mut self, member: Symbol) -> Self {
        self.explicit_interface_implementations.push(member);
        self
    }

    pub fn containing_type_name(&self) -> Option<&str> {
        self.containing_type.as_ref().map(|t| t.name.as_str())
    }

    /// Extension method declared on `System.Linq.Enumerable`.
    pub fn is_linq_extension(&self, name: &str) -> bool {
        self.kind == SymbolKind::Method
            && self.is_extension_method
            && self.name == name
            && self.containing_type_name() == Some(LINQ_ENUMERABLE)
    }
}
