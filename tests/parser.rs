//! Parser, scope, and declaration bookkeeping tests.

mod common;

use common::{lex_clean, parse_input, scopes_of};
use minic::{
    DeclaredType, Expected, GLOBAL_SCOPE, SemanticErrorKind, Span, SyntaxErrorKind, UNNAMED_BLOCK,
    parse,
};

fn expected(out: &minic::ParseOutput) -> Vec<Expected> {
    out.errors
        .iter()
        .filter_map(|e| match e.kind {
            SyntaxErrorKind::Expected { expected, .. } => Some(expected),
            SyntaxErrorKind::InvalidExpression { .. } => None,
        })
        .collect()
}

// -----------------------------------------------------------
// Declarations.
// -----------------------------------------------------------

#[test]
fn parse_simple_declaration() {
    let out = parse_input("int x = 10;");
    assert!(out.is_clean());
    assert_eq!(out.declarations.len(), 1);
    let decl = &out.declarations[0];
    assert_eq!(decl.name, "x");
    assert_eq!(decl.declared_type, DeclaredType::Int);
    assert_eq!(decl.scope, GLOBAL_SCOPE);
    assert_eq!(decl.initial_value.as_deref(), Some("10"));
}

#[test]
fn parse_every_declared_type() {
    let out = parse_input("int a; float b = 1.5; bool c = true; string d = \"a b\";");
    assert!(out.is_clean());
    let types: Vec<_> = out.declarations.iter().map(|d| d.declared_type).collect();
    assert_eq!(
        types,
        [
            DeclaredType::Int,
            DeclaredType::Float,
            DeclaredType::Bool,
            DeclaredType::String,
        ]
    );
    assert_eq!(out.declarations[3].initial_value.as_deref(), Some("\"a b\""));
}

#[test]
fn parse_initial_value_is_not_evaluated() {
    let out = parse_input("int y = x + 1;");
    assert_eq!(out.declarations[0].initial_value.as_deref(), Some("x + 1"));
}

#[test]
fn parse_initial_value_keeps_skipped_token() {
    let out = parse_input("int x = ;");
    assert_eq!(out.declarations.len(), 1);
    assert_eq!(out.declarations[0].initial_value.as_deref(), Some(";"));
    assert_eq!(out.errors.len(), 2);
}

#[test]
fn parse_declaration_missing_identifier() {
    let out = parse_input("int = 5;");
    assert!(out.declarations.is_empty());
    assert_eq!(
        out.errors[0].kind,
        SyntaxErrorKind::Expected {
            expected: Expected::Identifier,
            found: Some("=".to_string()),
        }
    );
    assert_eq!(out.errors.len(), 4);
}

// -----------------------------------------------------------
// Redeclaration and scopes.
// -----------------------------------------------------------

#[test]
fn parse_redeclaration_in_global_scope() {
    let out = parse_input("int x = 1; int x = 2;");
    assert!(out.errors.is_empty());
    assert_eq!(out.declarations.len(), 1);
    assert_eq!(out.declarations[0].initial_value.as_deref(), Some("1"));
    assert_eq!(out.semantic_errors.len(), 1);
    let err = &out.semantic_errors[0];
    assert_eq!(err.kind, SemanticErrorKind::Redeclaration);
    assert_eq!(err.name, "x");
    assert_eq!(err.scope, GLOBAL_SCOPE);
    assert_eq!(err.previous, Some(out.declarations[0].span));
}

#[test]
fn parse_redeclaration_with_different_type() {
    let out = parse_input("int x; float x;");
    assert_eq!(out.declarations.len(), 1);
    assert_eq!(out.declarations[0].declared_type, DeclaredType::Int);
    assert_eq!(out.semantic_errors.len(), 1);
}

#[test]
fn parse_shadowing_is_not_redeclaration() {
    let out = parse_input("int x = 1; if (x >= 0) { int x = 2; }");
    assert!(out.is_clean());
    assert_eq!(scopes_of(&out, "x"), [GLOBAL_SCOPE, "block@1:24"]);
}

#[test]
fn parse_redeclaration_inside_block() {
    let out = parse_input("{ int a; int a; }");
    assert_eq!(out.semantic_errors.len(), 1);
    assert_eq!(out.semantic_errors[0].scope, "block@1:1");
    assert_eq!(out.semantic_errors[0].previous, Some(Span::new(1, 7)));
}

#[test]
fn parse_scope_restored_after_block() {
    let out = parse_input("int a; { int b; } int a;");
    assert_eq!(out.semantic_errors.len(), 1);
    assert_eq!(out.semantic_errors[0].scope, GLOBAL_SCOPE);
}

#[test]
fn parse_nested_blocks() {
    let out = parse_input("{ int a; { int a; } }");
    assert!(out.is_clean());
    assert_eq!(scopes_of(&out, "a"), ["block@1:1", "block@1:10"]);
}

#[test]
fn parse_if_else_blocks_are_distinct() {
    let out = parse_input("if (a) { int b; } else { int b; }");
    assert!(out.is_clean());
    assert_eq!(scopes_of(&out, "b"), ["block@1:8", "block@1:24"]);
}

#[test]
fn parse_else_if_chain() {
    let out = parse_input("if (a) { } else if (b) { int c; }");
    assert!(out.is_clean());
    assert_eq!(scopes_of(&out, "c"), ["block@1:24"]);
}

#[test]
fn parse_block_labels_follow_lines() {
    let out = parse_input("if (a) {\n  int b;\n}\nif (a) {\n  int b;\n}\n");
    assert!(out.is_clean());
    assert_eq!(scopes_of(&out, "b"), ["block@1:8", "block@4:8"]);
}

// -----------------------------------------------------------
// Syntax errors and single-token-skip recovery.
// -----------------------------------------------------------

#[test]
fn parse_missing_closing_brace() {
    let out = parse_input("if (x) { int y = 1;");
    assert_eq!(expected(&out), [Expected::BlockClose]);
    assert_eq!(
        out.errors[0].to_string(),
        "expected '}' to close block at line 1, column 19"
    );
    assert_eq!(out.declarations.len(), 1);
}

#[test]
fn parse_if_without_braces() {
    let out = parse_input("if (a) int b;");
    assert_eq!(expected(&out), [Expected::BlockOpen, Expected::BlockClose]);
    assert_eq!(
        out.errors[0].kind,
        SyntaxErrorKind::Expected {
            expected: Expected::BlockOpen,
            found: Some("int".to_string()),
        }
    );
    assert!(out.declarations.is_empty());
}

#[test]
fn parse_blocks_missing_open_brace_share_label() {
    let out = parse_input("if (a) x int b; } if (a) y int b; }");
    assert_eq!(expected(&out), [Expected::BlockOpen, Expected::BlockOpen]);
    assert_eq!(scopes_of(&out, "b"), [UNNAMED_BLOCK]);
    assert_eq!(out.semantic_errors.len(), 1);
    assert_eq!(
        out.semantic_errors[0].message(),
        "variable 'b' is already declared in scope 'block'"
    );
    assert_eq!(out.semantic_errors[0].previous, Some(Span::new(1, 14)));
}

#[test]
fn parse_missing_condition_parens() {
    let out = parse_input("if a { }");
    // `(` missing: `a` is skipped, the condition parses `{` as an operand
    assert_eq!(out.errors[0].message(), "expected '(' after 'if', got 'a'");
    assert!(out.errors.len() >= 2);
}

#[test]
fn parse_unclosed_group() {
    let out = parse_input("x = (1 + 2;");
    assert_eq!(expected(&out), [Expected::GroupClose, Expected::StatementEnd]);
}

#[test]
fn parse_stray_closing_brace() {
    let out = parse_input("}");
    assert_eq!(
        out.errors[0].kind,
        SyntaxErrorKind::InvalidExpression {
            near: "}".to_string()
        }
    );
    assert_eq!(expected(&out), [Expected::StatementEnd]);
    // exhausted input reports at the last consumed token
    assert_eq!(out.errors[1].span, Span::new(1, 1));
}

#[test]
fn parse_keyword_in_expression() {
    let out = parse_input("x = while;");
    assert_eq!(out.errors.len(), 1);
    assert_eq!(out.errors[0].message(), "invalid expression near 'while'");
}

#[test]
fn parse_literal_expressions() {
    let out = parse_input("true && false; \"s\" + 1; (a);");
    assert!(out.is_clean());
    assert!(out.declarations.is_empty());
}

#[test]
fn parse_is_deterministic() {
    let tokens = lex_clean("int a = (b; { if c } else int a;");
    assert_eq!(parse(&tokens), parse(&tokens));
}

#[test]
fn parse_empty_token_stream() {
    let out = parse(&[]);
    assert!(out.is_clean());
    assert!(out.declarations.is_empty());
}

#[test]
fn parse_deeply_nested_groups() {
    let depth = 500;
    let source = format!("x = {}1{};", "(".repeat(depth), ")".repeat(depth));
    let out = parse_input(&source);
    assert!(out.is_clean());
}
