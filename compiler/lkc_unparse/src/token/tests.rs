#![expect(clippy::unwrap_used, reason = "tests build known-good tokens")]

use super::*;
use crate::test_helpers::{kind, kw, tok, toy_grammar};
use pretty_assertions::assert_eq;

#[test]
fn interning_is_keyed_by_identity() {
    let g = toy_grammar();
    let mut table = TokenTable::new();
    let lpar = kind(&g, "LPar");
    let ident = kind(&g, "Identifier");

    let a = table.intern(&g.tokens, lpar, None).unwrap();
    let b = table.intern(&g.tokens, lpar, None).unwrap();
    let c = table.intern(&g.tokens, ident, Some("if")).unwrap();
    let d = table.intern(&g.tokens, ident, Some("else")).unwrap();

    assert_eq!(a, b);
    assert_ne!(c, d);
    assert_eq!(table.len(), 3);
    assert_eq!(table.text(a), "(");
    assert_eq!(table.text(c), "if");
}

#[test]
fn empty_match_text_counts_as_absent() {
    let g = toy_grammar();
    let mut table = TokenTable::new();
    let plus = kind(&g, "Plus");
    let a = table.intern(&g.tokens, plus, Some("")).unwrap();
    let b = table.intern(&g.tokens, plus, None).unwrap();
    assert_eq!(a, b);
}

#[test]
fn pattern_kind_requires_match_text() {
    let g = toy_grammar();
    let mut table = TokenTable::new();
    let ident = kind(&g, "Identifier");
    let err = table.intern(&g.tokens, ident, None).unwrap_err();
    assert!(matches!(err, UnparseProblem::Internal { .. }));
    assert!(table.is_empty());
}

#[test]
fn from_parser_reads_token_parsers() {
    let mut g = toy_grammar();
    let semi = tok(&mut g, "Semicolon");
    let kw_if = kw(&mut g, "if");
    let row = g.row([semi]);
    let mut table = TokenTable::new();

    let a = table.from_parser(&g, semi).unwrap();
    let b = table.from_parser(&g, kw_if).unwrap();
    assert_eq!(table.text(a), ";");
    assert_eq!(table.get(b).match_text.as_deref(), Some("if"));
    assert!(table.from_parser(&g, row).is_err());
}

#[test]
fn equivalence_compares_renderings() {
    let mut g = toy_grammar();
    let comma_kind = g.tokens.literal("OtherComma", ",");
    let mut table = TokenTable::new();
    let comma = table.intern(&g.tokens, kind(&g, "Comma"), None).unwrap();
    let other = table.intern(&g.tokens, comma_kind, None).unwrap();
    let semi = table.intern(&g.tokens, kind(&g, "Semicolon"), None).unwrap();

    assert_ne!(comma, other);
    assert!(table.equivalent(Some(comma), Some(other)));
    assert!(!table.equivalent(Some(comma), Some(semi)));
    assert!(table.equivalent(None, None));
    assert!(!table.equivalent(Some(comma), None));
    assert_eq!(table.text_or_none(None), "<none>");
}

#[test]
fn sorted_orders_by_text() {
    let g = toy_grammar();
    let mut table = TokenTable::new();
    let ident = kind(&g, "Identifier");
    let semi = table.intern(&g.tokens, kind(&g, "Semicolon"), None).unwrap();
    let kw_def = table.intern(&g.tokens, ident, Some("def")).unwrap();
    let lpar = table.intern(&g.tokens, kind(&g, "LPar"), None).unwrap();

    let texts: Vec<_> = table.sorted().into_iter().map(|id| table.text(id)).collect();
    assert_eq!(texts, vec!["(", ";", "def"]);
    assert_eq!(table.sorted(), vec![lpar, semi, kw_def]);
}

#[test]
fn sequence_concat_and_render() {
    let g = toy_grammar();
    let mut table = TokenTable::new();
    let lpar = table.intern(&g.tokens, kind(&g, "LPar"), None).unwrap();
    let rpar = table.intern(&g.tokens, kind(&g, "RPar"), None).unwrap();
    let plus = table.intern(&g.tokens, kind(&g, "Plus"), None).unwrap();

    let left: TokenSequence = [lpar, plus].into_iter().collect();
    let mut right = TokenSequence::new();
    right.push(rpar);

    let both = left.concat(&right);
    assert_eq!(both.len(), 3);
    assert_eq!(both.render(&table), "( + )");
    // Operands are left untouched.
    assert_eq!(left.len(), 2);
    assert_eq!(TokenSequence::new().render(&table), "");
}

#[test]
fn check_equivalence_names_the_role() {
    let g = toy_grammar();
    let mut table = TokenTable::new();
    let lpar = table.intern(&g.tokens, kind(&g, "LPar"), None).unwrap();
    let lbrack = table.intern(&g.tokens, kind(&g, "LBrack"), None).unwrap();

    let a: TokenSequence = [lpar].into_iter().collect();
    let b: TokenSequence = [lbrack].into_iter().collect();
    assert!(a.check_equivalence("prefix tokens for Paren", &a, &table).is_ok());

    let err = a
        .check_equivalence("prefix tokens for Paren", &b, &table)
        .unwrap_err();
    assert_eq!(
        err,
        UnparseProblem::InconsistentTokens {
            role: "prefix tokens for Paren".to_owned(),
            left: "(".to_owned(),
            right: "[".to_owned(),
        }
    );

    let longer = a.concat(&a);
    assert!(!a.equivalent(&longer, &table));
}
