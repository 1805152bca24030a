use super::ast::Span;
use super::error::SyntaxError;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum TokenKind {
    Ident,
    Number,
    Str,
    At,
    Hash,
    LParen,
    RParen,
    LBracket,
    RBracket,
    LBrace,
    RBrace,
    Comma,
    Dot,
    SafeNav,
    Colon,
    Question,
    Elvis,
    AndAnd,
    OrOr,
    Bang,
    EqEq,
    NotEq,
    Lt,
    Le,
    Gt,
    Ge,
    Plus,
    Minus,
    Star,
    Slash,
    Percent,
    Caret,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) struct Token {
    pub kind: TokenKind,
    pub span: Span,
}

struct Cursor<'a> {
    src: &'a str,
    pos: usize,
}

impl<'a> Cursor<'a> {
    fn peek(&self) -> Option<char> {
        self.src[self.pos..].chars().next()
    }

    fn peek_second(&self) -> Option<char> {
        self.src[self.pos..].chars().nth(1)
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn eat(&mut self, expected: char) -> bool {
        if self.peek() == Some(expected) {
            self.pos += expected.len_utf8();
            true
        } else {
            false
        }
    }

    fn eat_while(&mut self, pred: impl Fn(char) -> bool) {
        while let Some(c) = self.peek() {
            if !pred(c) {
                break;
            }
            self.pos += c.len_utf8();
        }
    }
}

pub(crate) fn is_ident_start(c: char) -> bool {
    c.is_ascii_alphabetic() || c == '_' || c == '$'
}

pub(crate) fn is_ident_continue(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_' || c == '$'
}

/// Split expression text into tokens. Whitespace is dropped; every token keeps its span.
pub(crate) fn tokenize(src: &str) -> Result<Vec<Token>, SyntaxError> {
    let mut cursor = Cursor { src, pos: 0 };
    let mut tokens = Vec::new();

    while let Some(c) = cursor.peek() {
        let start = cursor.pos;
        if matches!(c, ' ' | '\t' | '\r' | '\n') {
            cursor.bump();
            continue;
        }

        let kind = if is_ident_start(c) {
            cursor.eat_while(is_ident_continue);
            TokenKind::Ident
        } else if c.is_ascii_digit() {
            lex_number(&mut cursor);
            TokenKind::Number
        } else if c == '\'' || c == '"' {
            lex_string(&mut cursor, c)?;
            TokenKind::Str
        } else {
            cursor.bump();
            match c {
                '@' => TokenKind::At,
                '#' => TokenKind::Hash,
                '(' => TokenKind::LParen,
                ')' => TokenKind::RParen,
                '[' => TokenKind::LBracket,
                ']' => TokenKind::RBracket,
                '{' => TokenKind::LBrace,
                '}' => TokenKind::RBrace,
                ',' => TokenKind::Comma,
                '.' => TokenKind::Dot,
                ':' => TokenKind::Colon,
                '+' => TokenKind::Plus,
                '-' => TokenKind::Minus,
                '*' => TokenKind::Star,
                '/' => TokenKind::Slash,
                '%' => TokenKind::Percent,
                '^' => TokenKind::Caret,
                '?' => {
                    if cursor.eat('.') {
                        TokenKind::SafeNav
                    } else if cursor.eat(':') {
                        TokenKind::Elvis
                    } else {
                        TokenKind::Question
                    }
                }
                '&' if cursor.eat('&') => TokenKind::AndAnd,
                '|' if cursor.eat('|') => TokenKind::OrOr,
                '=' if cursor.eat('=') => TokenKind::EqEq,
                '!' => {
                    if cursor.eat('=') {
                        TokenKind::NotEq
                    } else {
                        TokenKind::Bang
                    }
                }
                '<' => {
                    if cursor.eat('=') {
                        TokenKind::Le
                    } else {
                        TokenKind::Lt
                    }
                }
                '>' => {
                    if cursor.eat('=') {
                        TokenKind::Ge
                    } else {
                        TokenKind::Gt
                    }
                }
                other => {
                    return Err(SyntaxError::UnexpectedChar {
                        ch: other,
                        offset: start,
                    });
                }
            }
        };

        tokens.push(Token {
            kind,
            span: Span::new(start, cursor.pos),
        });
    }

    Ok(tokens)
}

fn lex_number(cursor: &mut Cursor<'_>) {
    let first = cursor.bump();
    if first == Some('0') && matches!(cursor.peek(), Some('x' | 'X')) {
        cursor.bump();
        cursor.eat_while(|c| c.is_ascii_hexdigit());
        if !cursor.eat('L') {
            cursor.eat('l');
        }
        return;
    }

    cursor.eat_while(|c| c.is_ascii_digit());

    // `1.5` is a decimal; `1.foo` is a member access on `1`.
    if cursor.peek() == Some('.') && cursor.peek_second().is_some_and(|c| c.is_ascii_digit()) {
        cursor.bump();
        cursor.eat_while(|c| c.is_ascii_digit());
    }

    if matches!(cursor.peek(), Some('e' | 'E')) {
        let exponent_digits = match cursor.peek_second() {
            Some(c) if c.is_ascii_digit() => true,
            Some('+' | '-') => cursor.src[cursor.pos..]
                .chars()
                .nth(2)
                .is_some_and(|c| c.is_ascii_digit()),
            _ => false,
        };
        if exponent_digits {
            cursor.bump();
            if !cursor.eat('+') {
                cursor.eat('-');
            }
            cursor.eat_while(|c| c.is_ascii_digit());
        }
    }

    if matches!(cursor.peek(), Some('L' | 'l' | 'F' | 'f' | 'D' | 'd')) {
        cursor.bump();
    }
}

fn lex_string(cursor: &mut Cursor<'_>, quote: char) -> Result<(), SyntaxError> {
    let start = cursor.pos;
    cursor.bump();
    loop {
        match cursor.bump() {
            None => return Err(SyntaxError::UnterminatedString { offset: start }),
            Some(c) if c == quote => {
                // A doubled quote is an escaped quote, not the end.
                if !cursor.eat(quote) {
                    return Ok(());
                }
            }
            Some(_) => {}
        }
    }
}

/// Content of a string token without its quotes, doubled quotes collapsed.
pub(crate) fn unquote(text: &str) -> String {
    let mut chars = text.chars();
    let Some(quote) = chars.next() else {
        return String::new();
    };
    let inner = chars.as_str();
    let inner = inner.strip_suffix(quote).unwrap_or(inner);
    let doubled: String = [quote, quote].iter().collect();
    inner.replace(&doubled, &quote.to_string())
}
