//! Grammar builders shared by the integration tests.

#![allow(dead_code, reason = "each test binary uses a subset of the helpers")]

use lkc_ir::{Grammar, NodeFlags, NodeTypeId, ParserId, RuleId, TokenKindId};

/// Grammar with common punctuation kinds and an `Identifier` pattern kind.
pub fn toy_grammar() -> Grammar {
    let mut g = Grammar::new();
    for (name, literal) in [
        ("LPar", "("),
        ("RPar", ")"),
        ("Comma", ","),
        ("Semicolon", ";"),
        ("Plus", "+"),
        ("Colon", ":"),
    ] {
        g.tokens.literal(name, literal);
    }
    g.tokens.pattern("Identifier");
    g
}

pub fn kind(g: &Grammar, name: &str) -> TokenKindId {
    g.tokens
        .lookup(name)
        .unwrap_or_else(|| panic!("unknown token kind {name}"))
}

/// Token match on a literal kind.
pub fn tok(g: &mut Grammar, name: &str) -> ParserId {
    let kind = kind(g, name);
    g.token(kind)
}

/// Identifier token matching `text`.
pub fn kw(g: &mut Grammar, text: &str) -> ParserId {
    let kind = kind(g, "Identifier");
    g.token_text(kind, text)
}

/// Concrete node type with the given parse fields.
pub fn node(g: &mut Grammar, name: &str, fields: &[&str]) -> NodeTypeId {
    let id = g.nodes.declare(name, None, NodeFlags::empty());
    for field in fields {
        g.nodes.add_field(id, field);
    }
    id
}

/// `name <- Name(Identifier)`: the usual leaf rule.
pub fn name_rule(g: &mut Grammar) -> RuleId {
    let name = g.nodes.declare("Name", None, NodeFlags::TOKEN_NODE);
    let kind = kind(g, "Identifier");
    let ident = g.token(kind);
    let root = g.transform(name, [ident]);
    g.add_rule("name", root)
}
