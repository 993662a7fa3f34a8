//! Grammar-side data structures for the lkc compiler.
//!
//! This crate holds what the unparser-derivation pass consumes:
//! - [`Span`]s locating combinators in the grammar source
//! - the [`TokenKinds`] registry (lexical categories and their literals)
//! - the [`NodeTypes`] registry (node taxonomy, flags, parse fields)
//! - the [`Grammar`] arena of parser combinators and named rules
//!
//! # Design
//!
//! - **Flat arenas**: combinators, rules, node types, fields and token kinds
//!   are stored in `Vec`s and referenced by `u32` indices.
//! - **Closed combinator set**: [`ParserKind`] is an enum, so every analysis
//!   over combinators is an exhaustive `match`.

mod grammar;
mod id;
mod node;
mod span;
mod stack;
mod token;

pub use grammar::{BoolAlternatives, Grammar, Parser, ParserKind, ParserType, Rule};
pub use id::{FieldId, NodeTypeId, ParserId, RuleId, TokenKindId};
pub use node::{FieldDef, NodeFlags, NodeTypeDef, NodeTypes};
pub use span::Span;
pub use stack::ensure_sufficient_stack;
pub use token::{TokenKindDef, TokenKinds};
