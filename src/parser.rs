use std::fmt;

use serde::Serialize;

use crate::scope::{ScopeStack, UNNAMED_BLOCK, block_label};
use crate::token::{Span, Token, TokenKind};

/// What the parser was looking for when it hit a mismatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Expected {
    /// Name after the type keyword of a declaration.
    Identifier,
    /// `;` closing a variable declaration.
    DeclarationEnd,
    /// `;` closing an expression statement.
    StatementEnd,
    /// `(` after `if`.
    ConditionOpen,
    /// `)` after an `if` condition.
    ConditionClose,
    /// `)` closing a parenthesized expression.
    GroupClose,
    /// `{` opening a block.
    BlockOpen,
    /// `}` closing a block.
    BlockClose,
}

impl fmt::Display for Expected {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Identifier => write!(f, "identifier after type"),
            Self::DeclarationEnd => write!(f, "';' after variable declaration"),
            Self::StatementEnd => write!(f, "';' after expression"),
            Self::ConditionOpen => write!(f, "'(' after 'if'"),
            Self::ConditionClose => write!(f, "')' after if condition"),
            Self::GroupClose => write!(f, "')' after expression"),
            Self::BlockOpen => write!(f, "'{{' to open block"),
            Self::BlockClose => write!(f, "'}}' to close block"),
        }
    }
}

/// Classifies a syntax error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SyntaxErrorKind {
    /// Mismatch in one of the `consume` helpers; `found` is `None`
    /// once the token stream is exhausted.
    Expected {
        expected: Expected,
        found: Option<String>,
    },
    /// Token that cannot start an expression operand.
    InvalidExpression { near: String },
}

impl fmt::Display for SyntaxErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Expected {
                expected,
                found: None,
            } => write!(f, "expected {expected}"),
            Self::Expected {
                expected,
                found: Some(t),
            } => write!(f, "expected {expected}, got '{t}'"),
            Self::InvalidExpression { near } => {
                write!(f, "invalid expression near '{near}'")
            }
        }
    }
}

/// Error produced during parsing. Never fatal to the parse.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{kind} at line {}, column {}", span.line, span.column)]
pub struct SyntaxError {
    pub kind: SyntaxErrorKind,
    pub span: Span,
}

impl SyntaxError {
    #[must_use]
    pub fn message(&self) -> String {
        self.kind.to_string()
    }
}

/// Type named in a variable declaration.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum DeclaredType {
    Int,
    Float,
    Bool,
    String,
}

impl DeclaredType {
    /// Map a type keyword token to its type.
    #[must_use]
    pub fn from_token(token: &Token) -> Option<Self> {
        if token.kind != TokenKind::Keyword {
            return None;
        }
        match token.lexeme.as_str() {
            "int" => Some(Self::Int),
            "float" => Some(Self::Float),
            "bool" => Some(Self::Bool),
            "string" => Some(Self::String),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::String => "string",
        }
    }
}

impl fmt::Display for DeclaredType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.pad(self.as_str())
    }
}

/// A variable declaration registered in a scope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Declaration {
    pub name: String,
    pub declared_type: DeclaredType,
    pub scope: String,
    /// Lexemes of the initializer joined by single spaces. Never
    /// evaluated.
    pub initial_value: Option<String>,
    /// Position of the declared identifier.
    pub span: Span,
}

/// Classifies a semantic error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SemanticErrorKind {
    /// Same name declared twice in one scope.
    Redeclaration,
}

impl fmt::Display for SemanticErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Redeclaration => write!(f, "redeclaration"),
        }
    }
}

/// Error produced by declaration bookkeeping.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("{} at line {}, column {}", self.message(), span.line, span.column)]
pub struct SemanticError {
    pub kind: SemanticErrorKind,
    pub name: String,
    pub scope: String,
    /// Position of the rejected identifier.
    pub span: Span,
    /// Position of the declaration that stays in the table.
    pub previous: Option<Span>,
}

impl SemanticError {
    #[must_use]
    pub fn message(&self) -> String {
        format!(
            "variable '{}' is already declared in scope '{}'",
            self.name, self.scope
        )
    }
}

/// Everything a parse produces.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ParseOutput {
    pub errors: Vec<SyntaxError>,
    pub declarations: Vec<Declaration>,
    pub semantic_errors: Vec<SemanticError>,
}

impl ParseOutput {
    #[must_use]
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.semantic_errors.is_empty()
    }
}

/// Parse a token stream, collecting syntax errors, declarations,
/// and redeclarations.
///
/// Every mismatch is recorded and skips exactly one token, so the
/// parse always runs to the end of `tokens`.
///
/// ```text
/// Program   := Statement*
/// Statement := VarDecl | IfStmt | Block | ExprStmt
/// VarDecl   := Type identifier ('=' Expr)? ';'
/// IfStmt    := 'if' '(' Expr ')' Block ('else' (Block | Statement))?
/// Block     := '{' Statement* '}'
/// ExprStmt  := Expr ';'
/// Expr      := Primary (operator Primary)*
/// Primary   := identifier | literal | '(' Expr ')'
/// ```
#[must_use]
pub fn parse(tokens: &[Token]) -> ParseOutput {
    let mut parser = Parser::new(tokens);
    parser.program();
    parser.finish()
}

struct Parser<'a> {
    tokens: &'a [Token],
    pos: usize,
    last: Option<&'a Token>,
    scopes: ScopeStack,
    output: ParseOutput,
}

impl<'a> Parser<'a> {
    fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            pos: 0,
            last: None,
            scopes: ScopeStack::new(),
            output: ParseOutput::default(),
        }
    }

    fn finish(self) -> ParseOutput {
        self.output
    }

    const fn is_at_end(&self) -> bool {
        self.pos >= self.tokens.len()
    }

    fn peek(&self) -> Option<&'a Token> {
        self.tokens.get(self.pos)
    }

    /// Past the end this keeps returning the last consumed token
    /// (or the final token) instead of failing.
    fn advance(&mut self) -> Option<&'a Token> {
        match self.tokens.get(self.pos) {
            Some(token) => {
                self.pos += 1;
                self.last = Some(token);
                Some(token)
            }
            None => self.last.or_else(|| self.tokens.last()),
        }
    }

    fn error_span(&self, at: Option<&Token>) -> Span {
        at.or(self.last)
            .or_else(|| self.tokens.last())
            .map_or(Span::new(1, 1), |t| t.span)
    }

    fn record(&mut self, at: Option<&Token>, kind: SyntaxErrorKind) {
        let span = self.error_span(at);
        self.output.errors.push(SyntaxError { kind, span });
    }

    fn consume(
        &mut self,
        expected: Expected,
        matches: impl Fn(&Token) -> bool,
    ) -> Option<&'a Token> {
        let current = self.peek();
        if current.is_some_and(matches) {
            return self.advance();
        }

        self.record(
            current,
            SyntaxErrorKind::Expected {
                expected,
                found: current.map(|t| t.lexeme.clone()),
            },
        );
        // single-token skip, no resynchronization
        if !self.is_at_end() {
            self.advance();
        }
        None
    }

    fn consume_delimiter(&mut self, delimiter: &str, expected: Expected) -> Option<&'a Token> {
        self.consume(expected, |t| t.is_delimiter(delimiter))
    }

    fn program(&mut self) {
        while !self.is_at_end() {
            self.statement();
        }
    }

    fn statement(&mut self) {
        let Some(token) = self.peek() else {
            return;
        };

        if let Some(declared_type) = DeclaredType::from_token(token) {
            self.advance();
            self.var_decl(declared_type);
        } else if token.is_keyword("if") {
            self.advance();
            self.if_stmt();
        } else if token.is_delimiter("{") {
            self.block();
        } else {
            self.expr_stmt();
        }
    }

    fn var_decl(&mut self, declared_type: DeclaredType) {
        let ident = self.consume(Expected::Identifier, |t| t.kind == TokenKind::Identifier);

        let mut initial_value = None;
        if self.peek().is_some_and(|t| t.is(TokenKind::Operator, "=")) {
            self.advance();
            let start = self.pos;
            self.expr();
            let consumed = &self.tokens[start..self.pos];
            if !consumed.is_empty() {
                let lexemes: Vec<&str> = consumed.iter().map(|t| t.lexeme.as_str()).collect();
                initial_value = Some(lexemes.join(" "));
            }
        }

        self.consume_delimiter(";", Expected::DeclarationEnd);

        if let Some(ident) = ident {
            self.declare(ident, declared_type, initial_value);
        }
    }

    /// Register a declaration in the current scope; a second one with
    /// the same name is reported and dropped.
    fn declare(
        &mut self,
        ident: &Token,
        declared_type: DeclaredType,
        initial_value: Option<String>,
    ) {
        let scope = self.scopes.current().to_string();
        let previous = self
            .output
            .declarations
            .iter()
            .find(|d| d.name == ident.lexeme && d.scope == scope)
            .map(|d| d.span);

        if previous.is_some() {
            self.output.semantic_errors.push(SemanticError {
                kind: SemanticErrorKind::Redeclaration,
                name: ident.lexeme.clone(),
                scope,
                span: ident.span,
                previous,
            });
        } else {
            self.output.declarations.push(Declaration {
                name: ident.lexeme.clone(),
                declared_type,
                scope,
                initial_value,
                span: ident.span,
            });
        }
    }

    fn if_stmt(&mut self) {
        self.consume_delimiter("(", Expected::ConditionOpen);
        self.expr();
        self.consume_delimiter(")", Expected::ConditionClose);
        self.block();

        if self.peek().is_some_and(|t| t.is_keyword("else")) {
            self.advance();
            if self.peek().is_some_and(|t| t.is_delimiter("{")) {
                self.block();
            } else {
                self.statement();
            }
        }
    }

    fn block(&mut self) {
        let label = self
            .consume_delimiter("{", Expected::BlockOpen)
            .map_or_else(|| UNNAMED_BLOCK.to_string(), |open| block_label(open.span));
        self.scopes.enter(label);

        while let Some(token) = self.peek() {
            if token.is_delimiter("}") {
                break;
            }
            self.statement();
        }

        self.consume_delimiter("}", Expected::BlockClose);
        self.scopes.exit();
    }

    fn expr_stmt(&mut self) {
        self.expr();
        self.consume_delimiter(";", Expected::StatementEnd);
    }

    /// Flat operator chain, no precedence.
    fn expr(&mut self) {
        self.primary();
        while self.peek().is_some_and(Token::is_operator) {
            self.advance();
            self.primary();
        }
    }

    fn primary(&mut self) {
        let Some(token) = self.peek() else {
            return;
        };

        if token.kind == TokenKind::Identifier || token.is_literal() {
            self.advance();
            return;
        }

        if token.is_delimiter("(") {
            self.advance();
            self.expr();
            self.consume_delimiter(")", Expected::GroupClose);
            return;
        }

        self.record(
            Some(token),
            SyntaxErrorKind::InvalidExpression {
                near: token.lexeme.clone(),
            },
        );
        self.advance();
    }
}
