//! Shared grammar builders for unit tests. Only compiled in test builds.

use lkc_ir::{Grammar, NodeFlags, NodeTypeId, ParserId, TokenKindId};

/// Grammar with common punctuation kinds and an `Identifier` pattern kind.
pub(crate) fn toy_grammar() -> Grammar {
    let mut g = Grammar::new();
    for (name, literal) in [
        ("LPar", "("),
        ("RPar", ")"),
        ("LBrack", "["),
        ("RBrack", "]"),
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

pub(crate) fn kind(g: &Grammar, name: &str) -> TokenKindId {
    g.tokens
        .lookup(name)
        .unwrap_or_else(|| panic!("unknown token kind {name}"))
}

/// Token match on a literal kind.
pub(crate) fn tok(g: &mut Grammar, name: &str) -> ParserId {
    let kind = kind(g, name);
    g.token(kind)
}

/// Identifier token matching `text`, i.e. a keyword.
pub(crate) fn kw(g: &mut Grammar, text: &str) -> ParserId {
    let kind = kind(g, "Identifier");
    g.token_text(kind, text)
}

/// Concrete node type with the given parse fields.
pub(crate) fn node(g: &mut Grammar, name: &str, fields: &[&str]) -> NodeTypeId {
    let id = g.nodes.declare(name, None, NodeFlags::empty());
    for field in fields {
        g.nodes.add_field(id, field);
    }
    id
}

/// Token node type, e.g. identifiers.
pub(crate) fn token_node(g: &mut Grammar, name: &str) -> NodeTypeId {
    g.nodes.declare(name, None, NodeFlags::TOKEN_NODE)
}

/// `Transform(node, [Identifier])` for a token node.
pub(crate) fn token_node_parser(g: &mut Grammar, node: NodeTypeId) -> ParserId {
    let kind = kind(g, "Identifier");
    let t = g.token(kind);
    g.transform(node, [t])
}
