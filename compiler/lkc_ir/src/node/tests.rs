use pretty_assertions::assert_eq;

use super::*;

fn expr_taxonomy() -> (NodeTypes, NodeTypeId, NodeTypeId, NodeTypeId) {
    let mut nodes = NodeTypes::new();
    let expr = nodes.declare("Expr", None, NodeFlags::ABSTRACT);
    let binop = nodes.declare("BinOp", Some(expr), NodeFlags::empty());
    let call = nodes.declare("Call", Some(expr), NodeFlags::empty());
    (nodes, expr, binop, call)
}

#[test]
fn parse_fields_put_inherited_fields_first() {
    let mut nodes = NodeTypes::new();
    let decl = nodes.declare("Decl", None, NodeFlags::ABSTRACT);
    let name = nodes.add_field(decl, "name");
    let var = nodes.declare("VarDecl", Some(decl), NodeFlags::empty());
    let ty = nodes.add_field(var, "type_expr");
    let init = nodes.add_field(var, "init");

    assert_eq!(nodes.parse_fields(var), vec![name, ty, init]);
    assert_eq!(nodes.parse_fields(decl), vec![name]);
    assert_eq!(nodes.qualname(ty), "VarDecl.type_expr");
    assert_eq!(nodes.qualname(name), "Decl.name");
}

#[test]
fn common_ancestor_walks_bases() {
    let (nodes, expr, binop, call) = expr_taxonomy();

    assert_eq!(nodes.common_ancestor(binop, call), Some(expr));
    assert_eq!(nodes.common_ancestor(binop, binop), Some(binop));
    assert_eq!(nodes.common_ancestor(binop, expr), Some(expr));
}

#[test]
fn unrelated_types_have_no_common_ancestor() {
    let mut nodes = NodeTypes::new();
    let a = nodes.declare("A", None, NodeFlags::empty());
    let b = nodes.declare("B", None, NodeFlags::empty());
    assert_eq!(nodes.common_ancestor(a, b), None);
}

#[test]
fn base_list_is_created_once() {
    let (mut nodes, expr, ..) = expr_taxonomy();
    let list = nodes.list_of(expr);

    assert_eq!(nodes.list_of(expr), list);
    assert!(nodes.is_list(list));
    assert!(nodes.is_base_list(list));
    assert_eq!(nodes.name(list), "Expr.list");
    assert_eq!(nodes.get(list).element, Some(expr));
}

#[test]
fn user_list_is_not_base_list() {
    let (mut nodes, expr, ..) = expr_taxonomy();
    let args = nodes.declare_list("ArgList", expr, NodeFlags::empty());

    assert!(nodes.is_list(args));
    assert!(!nodes.is_base_list(args));
}

#[test]
fn flags_queries() {
    let mut nodes = NodeTypes::new();
    let id = nodes.declare("Id", None, NodeFlags::TOKEN_NODE);
    let syn = nodes.declare("Synth", None, NodeFlags::SYNTHETIC);

    assert!(nodes.is_token_node(id));
    assert!(!nodes.is_abstract(id));
    assert!(nodes.is_synthetic(syn));
    assert_eq!(nodes.lookup("Synth"), Some(syn));
    assert_eq!(nodes.ids().count(), 2);
}
