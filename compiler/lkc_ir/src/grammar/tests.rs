use pretty_assertions::assert_eq;

use super::*;

struct Fixture {
    grammar: Grammar,
    expr: NodeTypeId,
    num: NodeTypeId,
    paren: NodeTypeId,
    lpar: TokenKindId,
    rpar: TokenKindId,
}

fn fixture() -> Fixture {
    let mut grammar = Grammar::new();
    let expr = grammar.nodes.declare("Expr", None, NodeFlags::ABSTRACT);
    let num = grammar.nodes.declare("Num", Some(expr), NodeFlags::TOKEN_NODE);
    let paren = grammar.nodes.declare("Paren", Some(expr), NodeFlags::empty());
    grammar.nodes.add_field(paren, "inner");
    let lpar = grammar.tokens.literal("LPar", "(");
    let rpar = grammar.tokens.literal("RPar", ")");
    Fixture {
        grammar,
        expr,
        num,
        paren,
        lpar,
        rpar,
    }
}

#[test]
fn transform_wraps_a_row() {
    let mut f = fixture();
    let g = &mut f.grammar;
    let l = g.token(f.lpar);
    let r = g.token(f.rpar);
    let inner = g.null(f.expr);
    let paren = g.transform(f.paren, [l, inner, r]);

    let ParserKind::Transform { node, row } = g.kind(paren).clone() else {
        panic!("expected a transform");
    };
    assert_eq!(node, f.paren);
    assert_eq!(g.kind(row), &ParserKind::Row(vec![l, inner, r]));
    assert_eq!(g.children(paren).as_slice(), &[row]);
}

#[test]
fn discards_tokens_and_token_rows() {
    let mut f = fixture();
    let g = &mut f.grammar;
    let l = g.token(f.lpar);
    let r = g.token(f.rpar);
    let cut = g.no_backtrack();
    let tokens = g.row([l, cut, r]);
    let opt_tokens = g.opt(tokens);
    let null = g.null(f.expr);
    let mixed = g.row([l, null]);

    assert!(g.discards(l));
    assert!(g.discards(cut));
    assert!(g.discards(tokens));
    assert!(g.discards(opt_tokens));
    assert!(!g.discards(null));
    assert!(!g.discards(mixed));
}

#[test]
fn type_of_or_is_common_ancestor() {
    let mut f = fixture();
    let g = &mut f.grammar;
    let tok = g.token(f.lpar);
    let num = g.transform(f.num, [tok]);
    let inner = g.null(f.expr);
    let paren = g.transform(f.paren, [inner]);
    let either = g.or([num, paren]);

    assert_eq!(g.type_of(either), ParserType::Node(f.expr));
    assert_eq!(g.type_of(tok), ParserType::Token);
}

#[test]
fn type_of_follows_recursive_rules() {
    let mut f = fixture();
    let g = &mut f.grammar;
    let expr_rule = g.declare_rule("expr");
    let tok = g.token(f.lpar);
    let num = g.transform(f.num, [tok]);
    let l = g.token(f.lpar);
    let r = g.token(f.rpar);
    let recurse = g.defer(expr_rule);
    let paren = g.transform(f.paren, [l, recurse, r]);
    let again = g.defer(expr_rule);
    let root = g.or([num, paren, again]);
    g.define_rule(expr_rule, root);

    let outer = g.defer(expr_rule);
    assert_eq!(g.type_of(outer), ParserType::Node(f.expr));
}

#[test]
fn type_of_pick_is_the_picked_element() {
    let mut f = fixture();
    let g = &mut f.grammar;
    let tok = g.token(f.lpar);
    let num = g.transform(f.num, [tok]);
    let r = g.token(f.rpar);
    let pick = g.pick([num, r], 0);

    assert_eq!(g.type_of(pick), ParserType::Node(f.num));
}

#[test]
fn undefined_rule_resolves_to_nothing() {
    let mut g = Grammar::new();
    let rule = g.declare_rule("later");
    let defer = g.defer(rule);

    assert_eq!(g.resolve(rule), None);
    assert_eq!(g.type_of(defer), ParserType::Nothing);
}

#[test]
fn describe_mentions_kind_and_span() {
    let mut f = fixture();
    let g = &mut f.grammar;
    let inner = g.null(f.expr);
    let paren = g.transform(f.paren, [inner]);
    g.set_span(paren, Span::new(4, 18));
    let ident = g.tokens.pattern("Identifier");
    let kw = g.token_text(ident, "if");

    assert_eq!(g.describe(paren), "Transform(Paren) at 4..18");
    assert_eq!(g.describe(kw), "Token(Identifier \"if\")");
}

#[test]
fn bool_alternatives_declare_enum_nodes() {
    let mut g = Grammar::new();
    let alts = BoolAlternatives::declare(&mut g.nodes, "HasVirtual");

    assert!(g.nodes.is_abstract(alts.base));
    assert_eq!(g.nodes.name(alts.present), "HasVirtual.Present");
    assert_eq!(g.nodes.get(alts.absent).base, Some(alts.base));
    assert_eq!(alts.iter().collect::<Vec<_>>(), vec![alts.present, alts.absent]);
}

#[test]
fn dont_skip_rules_are_flagged() {
    let mut g = Grammar::new();
    let comma = g.tokens.literal("Comma", ",");
    let tok = g.token(comma);
    let rule = g.add_dont_skip_rule("dontskip_0", tok);
    let user = g.add_rule("main", tok);

    assert!(g.rule(rule).dont_skip);
    assert!(!g.rule(user).dont_skip);
    assert_eq!(g.lookup_rule("main"), Some(user));
    assert_eq!(g.rules().count(), 2);
}

const DEEP: usize = 100_000;

#[test]
fn type_of_survives_deeply_nested_rules() {
    let mut f = fixture();
    let g = &mut f.grammar;
    let tok = g.token(f.lpar);
    let mut parser = g.transform(f.num, [tok]);
    for _ in 0..DEEP {
        parser = g.opt(parser);
    }
    let deep = g.add_rule("deep", parser);
    let alias = g.defer(deep);

    assert_eq!(g.type_of(alias), ParserType::Node(f.num));
}

#[test]
fn discards_survives_deeply_nested_options() {
    let mut f = fixture();
    let g = &mut f.grammar;
    let mut parser = g.token(f.rpar);
    for _ in 0..DEEP {
        parser = g.opt(parser);
    }

    assert!(g.discards(parser));
}
