use super::*;
use crate::test_helpers::{kw, node, tok, token_node, token_node_parser, toy_grammar};
use lkc_ir::Grammar;

/// `Paren("(" expr ")")`, with `expr` producing `Name` token nodes.
fn paren(g: &mut Grammar, open: &str, close: &str) -> ParserId {
    let paren = match g.nodes.lookup("Paren") {
        Some(paren) => paren,
        None => node(g, "Paren", &["expr"]),
    };
    let rule = match g.lookup_rule("expr") {
        Some(rule) => rule,
        None => {
            let name = token_node(g, "Name");
            let root = token_node_parser(g, name);
            g.add_rule("expr", root)
        }
    };
    let open = tok(g, open);
    let expr = g.defer(rule);
    let close = tok(g, close);
    g.transform(paren, [open, expr, close])
}

#[test]
fn singleton_and_empty_are_equal() {
    let mut g = toy_grammar();
    let a = paren(&mut g, "LPar", "RPar");
    assert!(structurally_equal(&g, &[a]));
    assert!(structurally_equal(&g, &[]));
}

#[test]
fn same_shape_is_equal() {
    let mut g = toy_grammar();
    let a = paren(&mut g, "LPar", "RPar");
    let b = paren(&mut g, "LPar", "RPar");
    assert!(structurally_equal(&g, &[a, b]));
}

#[test]
fn different_token_kinds_are_not_equal() {
    let mut g = toy_grammar();
    let a = paren(&mut g, "LPar", "RPar");
    let b = paren(&mut g, "LBrack", "RBrack");
    assert!(!structurally_equal(&g, &[a, b]));
}

#[test]
fn same_kind_tokens_compare_equal() {
    let mut g = toy_grammar();
    let unit = node(&mut g, "Unit", &[]);
    let kw_a = kw(&mut g, "begin");
    let kw_b = kw(&mut g, "start");
    let a = g.transform(unit, [kw_a]);
    let b = g.transform(unit, [kw_b]);
    assert!(structurally_equal(&g, &[a, b]));
}

#[test]
fn child_count_mismatch_is_not_equal() {
    let mut g = toy_grammar();
    let unit = node(&mut g, "Unit", &[]);
    let lpar = tok(&mut g, "LPar");
    let rpar = tok(&mut g, "RPar");
    let a = g.transform(unit, [lpar, rpar]);
    let b = g.transform(unit, [lpar]);
    assert!(!structurally_equal(&g, &[a, b]));
}

#[test]
fn no_backtrack_markers_are_ignored() {
    let mut g = toy_grammar();
    let unit = node(&mut g, "Unit", &[]);
    let lpar = tok(&mut g, "LPar");
    let rpar = tok(&mut g, "RPar");
    let nb = g.no_backtrack();
    let a = g.transform(unit, [lpar, nb, rpar]);
    let b = g.transform(unit, [lpar, rpar]);
    assert!(structurally_equal(&g, &[a, b]));
}

#[test]
fn null_occurrences_and_wrappers_are_stripped() {
    let mut g = toy_grammar();
    let a = paren(&mut g, "LPar", "RPar");
    let paren_node = g.nodes.lookup("Paren").unwrap_or_default();
    let null = g.null(paren_node);
    let wrapped = g.dont_skip(a);
    let checked = g.predicate(wrapped, "ok");
    assert!(structurally_equal(&g, &[checked, null, a]));
}

#[test]
fn node_creating_children_match_any_shape() {
    let mut g = toy_grammar();
    let stmt = node(&mut g, "Stmt", &["body"]);
    let unit = node(&mut g, "Unit", &[]);
    let lpar = tok(&mut g, "LPar");
    let unit_parser = g.transform(unit, [lpar]);
    let rule = g.add_rule("unit", unit_parser);
    let via_rule = g.defer(rule);
    let via_or = g.or([unit_parser]);

    let a = g.transform(stmt, [via_rule]);
    let b = g.transform(stmt, [via_or]);
    assert!(structurally_equal(&g, &[a, b]));

    // At the root, a different shape is never equal.
    assert!(!structurally_equal(&g, &[via_rule, via_or]));
}

#[test]
fn token_child_against_node_child_is_not_equal() {
    let mut g = toy_grammar();
    let stmt = node(&mut g, "Stmt", &["body"]);
    let unit = node(&mut g, "Unit", &[]);
    let lpar = tok(&mut g, "LPar");
    let unit_parser = g.transform(unit, [lpar]);
    let semi = tok(&mut g, "Semicolon");
    let a = g.row([unit_parser]);
    let b = g.row([semi]);
    let a = g.transform(stmt, [a]);
    let b = g.transform(stmt, [b]);
    assert!(!structurally_equal(&g, &[a, b]));
}

#[test]
fn extracts_compare_index_and_row() {
    let mut g = toy_grammar();
    let stmt = node(&mut g, "Stmt", &["body"]);
    let unit = node(&mut g, "Unit", &[]);
    let lpar = tok(&mut g, "LPar");
    let unit_parser = g.transform(unit, [lpar]);
    let colon = tok(&mut g, "Colon");
    let pick_a = g.pick([colon, unit_parser], 1);
    let pick_b = g.pick([colon, unit_parser], 1);
    let pick_c = g.pick([unit_parser, colon], 0);

    let a = g.transform(stmt, [pick_a]);
    let b = g.transform(stmt, [pick_b]);
    let c = g.transform(stmt, [pick_c]);
    assert!(structurally_equal(&g, &[a, b]));
    assert!(!structurally_equal(&g, &[a, c]));
}

#[test]
fn canonical_parser_prefers_null_free() {
    let mut g = toy_grammar();
    let decl = node(&mut g, "Decl", &["ty"]);
    let ty = node(&mut g, "Ty", &[]);
    let lpar = tok(&mut g, "LPar");
    let null = g.null(ty);
    let with_null = g.transform(decl, [null]);
    let ty_parser = g.transform(ty, [lpar]);
    let full = g.transform(decl, [ty_parser]);
    let full_again = g.transform(decl, [ty_parser]);

    assert_eq!(
        find_canonical_parser(&g, &[with_null, full, full_again]),
        Some(full)
    );
    assert_eq!(find_canonical_parser(&g, &[with_null]), Some(with_null));
    assert_eq!(find_canonical_parser(&g, &[]), None);
}
