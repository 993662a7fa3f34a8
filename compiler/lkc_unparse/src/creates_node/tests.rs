use super::*;
use crate::test_helpers::{node, tok, toy_grammar};
use lkc_ir::BoolAlternatives;

#[test]
fn node_builders_create_nodes() {
    let mut g = toy_grammar();
    let unit = node(&mut g, "Unit", &[]);
    let units = g.nodes.list_of(unit);
    let lpar = tok(&mut g, "LPar");
    let transform = g.transform(unit, [lpar]);
    let list = g.list(units, transform, None);
    let skip = g.skip(unit);
    let alts = BoolAlternatives::declare(&mut g.nodes, "Flag");
    let flag = g.opt_bool(lpar, alts);

    for parser in [transform, list, skip, flag] {
        assert!(creates_node(&g, parser), "{}", g.describe(parser));
    }
}

#[test]
fn token_runs_do_not_create_nodes() {
    let mut g = toy_grammar();
    let unit = node(&mut g, "Unit", &[]);
    let lpar = tok(&mut g, "LPar");
    let row = g.row([lpar]);
    let null = g.null(unit);
    let nb = g.no_backtrack();
    let opt_token = g.opt(lpar);

    for parser in [lpar, row, null, nb, opt_token] {
        assert!(!creates_node(&g, parser), "{}", g.describe(parser));
    }
}

#[test]
fn alternation_needs_every_branch() {
    let mut g = toy_grammar();
    let unit = node(&mut g, "Unit", &[]);
    let lpar = tok(&mut g, "LPar");
    let transform = g.transform(unit, [lpar]);
    let skip = g.skip(unit);
    let all_nodes = g.or([transform, skip]);
    let mixed = g.or([transform, lpar]);

    assert!(creates_node(&g, all_nodes));
    assert!(!creates_node(&g, mixed));
}

#[test]
fn deferred_reference_follows_rule_type() {
    let mut g = toy_grammar();
    let unit = node(&mut g, "Unit", &[]);
    let lpar = tok(&mut g, "LPar");
    let transform = g.transform(unit, [lpar]);
    let node_rule = g.add_rule("unit", transform);
    let token_rule = g.add_rule("paren", lpar);
    let undefined = g.declare_rule("later");

    let to_node = g.defer(node_rule);
    let to_token = g.defer(token_rule);
    let to_nothing = g.defer(undefined);
    assert!(creates_node(&g, to_node));
    assert!(!creates_node(&g, to_token));
    assert!(!creates_node(&g, to_nothing));
}

#[test]
fn wrappers_are_transparent() {
    let mut g = toy_grammar();
    let unit = node(&mut g, "Unit", &[]);
    let lpar = tok(&mut g, "LPar");
    let transform = g.transform(unit, [lpar]);
    let checked = g.predicate(transform, "is_valid");
    let no_skip = g.dont_skip(checked);
    let opt = g.opt(no_skip);
    let bad = g.predicate(lpar, "is_valid");

    assert!(creates_node(&g, checked));
    assert!(creates_node(&g, no_skip));
    assert!(creates_node(&g, opt));
    assert!(!creates_node(&g, bad));
}

#[test]
fn only_trailing_termination_may_be_dropped() {
    let mut g = toy_grammar();
    let unit = node(&mut g, "Unit", &[]);
    let lpar = tok(&mut g, "LPar");
    let transform = g.transform(unit, [lpar]);
    let term = g.token(TokenKindId::TERMINATION);
    let semi = tok(&mut g, "Semicolon");

    let main = g.pick([transform, term], 0);
    let with_semi = g.pick([transform, semi], 0);
    let three = g.pick([transform, term, term], 0);
    let term_first = g.pick([term, transform], 1);

    assert!(creates_node(&g, main));
    assert!(!creates_node(&g, with_semi));
    assert!(!creates_node(&g, three));
    assert!(!creates_node(&g, term_first));
}
