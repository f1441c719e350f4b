//! Symbol facts consumed by rules.
//!
//! Type resolution happens elsewhere. This module defines the questions the
//! rules ask ([`SymbolFacts`]), the answers' shapes, and [`FactTable`], an
//! in-memory implementation for precomputed facts.

mod facts;
mod symbols;
mod table;

pub use facts::{SymbolFacts, TypeInfo};
pub use symbols::{
    SpecialType, Symbol, SymbolKind, TypeKind, TypeSymbol, FUNC_OF_T_RESULT, IENUMERABLE_OF_T,
    IMMUTABLE_ARRAY_EXTENSIONS, LINQ_ENUMERABLE,
};
pub use table::FactTable;
