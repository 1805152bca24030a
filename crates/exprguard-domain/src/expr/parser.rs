use super::ast::{BinaryOp, CompositeKind, Node, Span, UnaryOp};
use super::error::SyntaxError;
use super::lexer::{Token, TokenKind, tokenize, unquote};

/// Recursion guard for hostile input such as ten thousand opening parentheses.
const MAX_DEPTH: usize = 64;

/// Budget for operator changes inside flat chains such as `a + b - c + d`. Each change
/// wraps the tree built so far one level deeper, outside the recursion guard.
const MAX_OPERATOR_CHANGES: usize = 256;

/// A successfully parsed expression: the tree plus the text its spans point into.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ParsedExpression {
    source: String,
    root: Node,
}

impl ParsedExpression {
    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn root(&self) -> &Node {
        &self.root
    }

    /// Exact source text of a node of this tree.
    pub fn text_of(&self, node: &Node) -> &str {
        let span = node.span();
        self.source.get(span.start..span.end).unwrap_or_default()
    }
}

/// Parse one expression. Fails on the first problem; nothing is recovered.
pub fn parse(text: &str) -> Result<ParsedExpression, SyntaxError> {
    let tokens = tokenize(text)?;
    if tokens.is_empty() {
        return Err(SyntaxError::EmptyExpression);
    }

    let mut parser = Parser {
        source: text,
        tokens,
        pos: 0,
        depth: 0,
        operator_changes: 0,
    };
    let root = parser.expression()?;
    if let Some(token) = parser.peek() {
        return Err(SyntaxError::TrailingInput {
            token: parser.text(token.span).to_string(),
            offset: token.span.start,
        });
    }

    Ok(ParsedExpression {
        source: text.to_string(),
        root,
    })
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Level {
    Or,
    And,
    Relational,
    Additive,
    Multiplicative,
    Power,
}

impl Level {
    fn tighter(self) -> Option<Level> {
        match self {
            Level::Or => Some(Level::And),
            Level::And => Some(Level::Relational),
            Level::Relational => Some(Level::Additive),
            Level::Additive => Some(Level::Multiplicative),
            Level::Multiplicative => Some(Level::Power),
            Level::Power => None,
        }
    }
}

fn level_of(op: BinaryOp) -> Level {
    match op {
        BinaryOp::Or => Level::Or,
        BinaryOp::And => Level::And,
        BinaryOp::Eq
        | BinaryOp::Ne
        | BinaryOp::Lt
        | BinaryOp::Le
        | BinaryOp::Gt
        | BinaryOp::Ge
        | BinaryOp::InstanceOf
        | BinaryOp::Matches
        | BinaryOp::Between => Level::Relational,
        BinaryOp::Add | BinaryOp::Sub => Level::Additive,
        BinaryOp::Mul | BinaryOp::Div | BinaryOp::Mod => Level::Multiplicative,
        BinaryOp::Pow => Level::Power,
    }
}

fn word_operator(word: &str) -> Option<BinaryOp> {
    let op = match word.to_ascii_lowercase().as_str() {
        "or" => BinaryOp::Or,
        "and" => BinaryOp::And,
        "eq" => BinaryOp::Eq,
        "ne" => BinaryOp::Ne,
        "lt" => BinaryOp::Lt,
        "le" => BinaryOp::Le,
        "gt" => BinaryOp::Gt,
        "ge" => BinaryOp::Ge,
        "instanceof" => BinaryOp::InstanceOf,
        "matches" => BinaryOp::Matches,
        "between" => BinaryOp::Between,
        "div" => BinaryOp::Div,
        "mod" => BinaryOp::Mod,
        _ => return None,
    };
    Some(op)
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    depth: usize,
    operator_changes: usize,
}

impl<'a> Parser<'a> {
    fn peek(&self) -> Option<Token> {
        self.tokens.get(self.pos).copied()
    }

    fn peek_kind(&self) -> Option<TokenKind> {
        self.peek().map(|t| t.kind)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn text(&self, span: Span) -> &'a str {
        let source: &'a str = self.source;
        source.get(span.start..span.end).unwrap_or_default()
    }

    fn offset(&self) -> usize {
        self.peek().map_or(self.source.len(), |t| t.span.start)
    }

    fn unexpected(&self, token: Option<Token>) -> SyntaxError {
        match token {
            Some(token) => SyntaxError::UnexpectedToken {
                token: self.text(token.span).to_string(),
                offset: token.span.start,
            },
            None => SyntaxError::UnexpectedEof,
        }
    }

    /// Consume `kind` or fail; running out of input reports the opener as unclosed.
    fn expect_close(&mut self, kind: TokenKind, open: char, open_at: usize) -> Result<Span, SyntaxError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token.span)
            }
            Some(token) => Err(self.unexpected(Some(token))),
            None => Err(SyntaxError::Unclosed {
                open,
                offset: open_at,
            }),
        }
    }

    fn expect(&mut self, kind: TokenKind) -> Result<Token, SyntaxError> {
        match self.peek() {
            Some(token) if token.kind == kind => {
                self.pos += 1;
                Ok(token)
            }
            other => Err(self.unexpected(other)),
        }
    }

    fn nested<T>(&mut self, f: impl FnOnce(&mut Self) -> Result<T, SyntaxError>) -> Result<T, SyntaxError> {
        self.depth += 1;
        if self.depth > MAX_DEPTH {
            return Err(SyntaxError::TooDeep {
                offset: self.offset(),
            });
        }
        let out = f(self);
        self.depth -= 1;
        out
    }

    fn expression(&mut self) -> Result<Node, SyntaxError> {
        self.nested(Self::ternary)
    }

    fn ternary(&mut self) -> Result<Node, SyntaxError> {
        let condition = self.binary(Level::Or)?;
        match self.peek_kind() {
            Some(TokenKind::Question) => {
                self.pos += 1;
                let then = self.expression()?;
                self.expect(TokenKind::Colon)?;
                let otherwise = self.expression()?;
                Ok(Node::composite(
                    CompositeKind::Ternary,
                    vec![condition, then, otherwise],
                ))
            }
            Some(TokenKind::Elvis) => {
                self.pos += 1;
                let fallback = self.expression()?;
                Ok(Node::composite(CompositeKind::Elvis, vec![condition, fallback]))
            }
            _ => Ok(condition),
        }
    }

    fn operand(&mut self, level: Option<Level>) -> Result<Node, SyntaxError> {
        match level {
            Some(level) => self.binary(level),
            None => self.unary(),
        }
    }

    /// A run of the same operator becomes one n-ary node, so `a or b or c` stays flat.
    fn binary(&mut self, level: Level) -> Result<Node, SyntaxError> {
        let tighter = level.tighter();
        let first = self.operand(tighter)?;
        let Some(mut op) = self.peek_binary_op(level) else {
            return Ok(first);
        };

        let mut operands = vec![first];
        loop {
            self.pos += 1;
            operands.push(self.operand(tighter)?);
            match self.peek_binary_op(level) {
                None => break,
                Some(next) if next == op => {}
                Some(next) => {
                    self.operator_changes += 1;
                    if self.operator_changes > MAX_OPERATOR_CHANGES {
                        return Err(SyntaxError::TooDeep {
                            offset: self.offset(),
                        });
                    }
                    let done = Node::composite(CompositeKind::Binary(op), std::mem::take(&mut operands));
                    operands.push(done);
                    op = next;
                }
            }
        }
        Ok(Node::composite(CompositeKind::Binary(op), operands))
    }

    fn peek_binary_op(&self, level: Level) -> Option<BinaryOp> {
        let token = self.peek()?;
        let op = match token.kind {
            TokenKind::OrOr => BinaryOp::Or,
            TokenKind::AndAnd => BinaryOp::And,
            TokenKind::EqEq => BinaryOp::Eq,
            TokenKind::NotEq => BinaryOp::Ne,
            TokenKind::Lt => BinaryOp::Lt,
            TokenKind::Le => BinaryOp::Le,
            TokenKind::Gt => BinaryOp::Gt,
            TokenKind::Ge => BinaryOp::Ge,
            TokenKind::Plus => BinaryOp::Add,
            TokenKind::Minus => BinaryOp::Sub,
            TokenKind::Star => BinaryOp::Mul,
            TokenKind::Slash => BinaryOp::Div,
            TokenKind::Percent => BinaryOp::Mod,
            TokenKind::Caret => BinaryOp::Pow,
            TokenKind::Ident => word_operator(self.text(token.span))?,
            _ => return None,
        };
        (level_of(op) == level).then_some(op)
    }

    fn unary(&mut self) -> Result<Node, SyntaxError> {
        let op = match self.peek() {
            Some(token) => match token.kind {
                TokenKind::Bang => Some(UnaryOp::Not),
                TokenKind::Minus => Some(UnaryOp::Neg),
                TokenKind::Plus => Some(UnaryOp::Plus),
                TokenKind::Ident if self.text(token.span).eq_ignore_ascii_case("not") => {
                    Some(UnaryOp::Not)
                }
                _ => None,
            },
            None => None,
        };

        let Some(op) = op else {
            return self.postfix();
        };
        let start = self.offset();
        self.pos += 1;
        let operand = self.nested(Self::unary)?;
        let span = Span::new(start, operand.span().end);
        Ok(Node::Composite {
            kind: CompositeKind::Unary(op),
            children: vec![operand],
            span,
        })
    }

    fn postfix(&mut self) -> Result<Node, SyntaxError> {
        let base = self.primary()?;
        let mut segments = Vec::new();
        loop {
            match self.peek_kind() {
                Some(TokenKind::Dot | TokenKind::SafeNav) => {
                    self.pos += 1;
                    segments.push(self.member()?);
                }
                Some(TokenKind::LBracket) => {
                    let open_at = self.offset();
                    self.pos += 1;
                    let index = self.expression()?;
                    let close = self.expect_close(TokenKind::RBracket, '[', open_at)?;
                    segments.push(Node::Composite {
                        kind: CompositeKind::Index,
                        children: vec![index],
                        span: Span::new(open_at, close.end),
                    });
                }
                _ => break,
            }
        }

        if segments.is_empty() {
            return Ok(base);
        }
        let mut children = Vec::with_capacity(segments.len() + 1);
        children.push(base);
        children.extend(segments);
        Ok(Node::composite(CompositeKind::Chain, children))
    }

    fn member(&mut self) -> Result<Node, SyntaxError> {
        let name = self.expect(TokenKind::Ident)?;
        let text = self.text(name.span).to_string();
        if self.peek_kind() == Some(TokenKind::LParen) {
            let (args, end) = self.arguments()?;
            return Ok(Node::CallReference {
                name: text,
                args,
                span: Span::new(name.span.start, end),
            });
        }
        Ok(Node::Literal {
            text,
            span: name.span,
        })
    }

    fn primary(&mut self) -> Result<Node, SyntaxError> {
        let Some(token) = self.advance() else {
            return Err(SyntaxError::UnexpectedEof);
        };

        match token.kind {
            TokenKind::Number | TokenKind::Str => Ok(Node::Literal {
                text: self.text(token.span).to_string(),
                span: token.span,
            }),
            TokenKind::LParen => {
                let inner = self.expression()?;
                let close = self.expect_close(TokenKind::RParen, '(', token.span.start)?;
                Ok(Node::Composite {
                    kind: CompositeKind::Group,
                    children: vec![inner],
                    span: token.span.to(close),
                })
            }
            TokenKind::LBrace => self.inline_list(token.span.start),
            TokenKind::At => self.symbolic_reference(token.span.start),
            TokenKind::Hash => self.variable(token.span.start),
            TokenKind::Ident => {
                let text = self.text(token.span);
                if self.peek_kind() != Some(TokenKind::LParen) {
                    return Ok(Node::Literal {
                        text: text.to_string(),
                        span: token.span,
                    });
                }
                if text == "T" {
                    return self.type_reference(token.span.start);
                }
                let (args, end) = self.arguments()?;
                Ok(Node::CallReference {
                    name: text.to_string(),
                    args,
                    span: Span::new(token.span.start, end),
                })
            }
            _ => Err(self.unexpected(Some(token))),
        }
    }

    fn symbolic_reference(&mut self, start: usize) -> Result<Node, SyntaxError> {
        // The name must follow the sigil directly: `@ bean` is not a reference.
        let Some(token) = self.peek().filter(|t| t.span.start == start + 1) else {
            return Err(SyntaxError::MissingReferenceName { offset: start });
        };
        let name = match token.kind {
            TokenKind::Ident => self.text(token.span).to_string(),
            TokenKind::Str => unquote(self.text(token.span)),
            _ => return Err(SyntaxError::MissingReferenceName { offset: start }),
        };
        let end = token.span.end;
        self.pos += 1;
        if name.is_empty() {
            return Err(SyntaxError::MissingReferenceName { offset: start });
        }
        Ok(Node::SymbolicReference {
            name,
            span: Span::new(start, end),
        })
    }

    fn variable(&mut self, start: usize) -> Result<Node, SyntaxError> {
        let name = self.expect(TokenKind::Ident)?;
        let variable = Node::Literal {
            text: self.text(Span::new(start, name.span.end)).to_string(),
            span: Span::new(start, name.span.end),
        };
        if self.peek_kind() != Some(TokenKind::LParen) {
            return Ok(variable);
        }

        let (args, end) = self.arguments()?;
        let mut children = Vec::with_capacity(args.len() + 1);
        children.push(variable);
        children.extend(args);
        Ok(Node::Composite {
            kind: CompositeKind::VariableCall,
            children,
            span: Span::new(start, end),
        })
    }

    /// `T(java.lang.Math)`: the whole thing is one opaque leaf.
    fn type_reference(&mut self, start: usize) -> Result<Node, SyntaxError> {
        let open = self.expect(TokenKind::LParen)?;
        self.expect(TokenKind::Ident)?;
        while self.peek_kind() == Some(TokenKind::Dot) {
            self.pos += 1;
            self.expect(TokenKind::Ident)?;
        }
        while self.peek_kind() == Some(TokenKind::LBracket) {
            let open_at = self.offset();
            self.pos += 1;
            self.expect_close(TokenKind::RBracket, '[', open_at)?;
        }
        let close = self.expect_close(TokenKind::RParen, '(', open.span.start)?;
        let span = Span::new(start, close.end);
        Ok(Node::Literal {
            text: self.text(span).to_string(),
            span,
        })
    }

    fn inline_list(&mut self, start: usize) -> Result<Node, SyntaxError> {
        let (items, end) = self.delimited(TokenKind::RBrace, '{', start)?;
        Ok(Node::Composite {
            kind: CompositeKind::InlineList,
            children: items,
            span: Span::new(start, end),
        })
    }

    /// `( arg, arg, ... )`; returns the arguments and the end offset of `)`.
    fn arguments(&mut self) -> Result<(Vec<Node>, usize), SyntaxError> {
        let open = self.expect(TokenKind::LParen)?;
        self.delimited(TokenKind::RParen, '(', open.span.start)
    }

    /// Comma-separated expressions up to and including `close`; the opener is consumed.
    fn delimited(&mut self, close: TokenKind, open: char, open_at: usize) -> Result<(Vec<Node>, usize), SyntaxError> {
        let mut items = Vec::new();
        if let Some(token) = self.peek()
            && token.kind == close
        {
            self.pos += 1;
            return Ok((items, token.span.end));
        }

        loop {
            items.push(self.expression()?);
            match self.peek() {
                Some(token) if token.kind == TokenKind::Comma => self.pos += 1,
                Some(token) if token.kind == close => {
                    self.pos += 1;
                    return Ok((items, token.span.end));
                }
                Some(token) => return Err(self.unexpected(Some(token))),
                None => return Err(SyntaxError::Unclosed { open, offset: open_at }),
            }
        }
    }
}
