//! Tokenizer and recursive-descent parser for the query text subset.
//!
//! The accepted surface is:
//!
//! ```text
//! MATCH (v:Label) [ -[e:TYPE]-> (w:Label) ]
//! [ WHERE cond ((AND|OR) cond)* | NOT cond | (cond) ]
//! RETURN item (, item)*
//! ```
//!
//! with comparisons `= != <> > >= < <=`, single- or double-quoted strings,
//! and integer/float literals. Edges may also be written `<-[..]-` and
//! `-[..]-` for incoming and undirected traversal. `ORDER BY`, `SKIP`,
//! `LIMIT`, and `AS` are reserved: they tokenize but are rejected with a
//! targeted error, since those clauses are reached through the builder API.
//! Anything outside the subset fails with a positioned [`GraphError::Parse`]
//! rather than silently succeeding.

use crate::error::{GraphError, Result};
use crate::model::PropertyValue;
use crate::query::ast::{
    CompareOp, Condition, EdgePattern, LogicalOp, MatchPattern, NodePattern, Operand,
    PatternDirection, Query, ReturnItem,
};

#[derive(Clone, Debug, PartialEq)]
enum TokenKind {
    Match,
    Where,
    Return,
    Order,
    By,
    Limit,
    Skip,
    And,
    Or,
    Not,
    As,
    Ident(String),
    Str(String),
    Int(i64),
    Float(f64),
    LParen,
    RParen,
    LBracket,
    RBracket,
    Dash,
    Lt,
    Gt,
    Colon,
    Dot,
    Comma,
    Eq,
    Neq,
    Gte,
    Lte,
}

impl TokenKind {
    fn describe(&self) -> String {
        match self {
            TokenKind::Ident(name) => format!("identifier '{name}'"),
            TokenKind::Str(_) => "string literal".into(),
            TokenKind::Int(v) => format!("integer {v}"),
            TokenKind::Float(v) => format!("float {v}"),
            TokenKind::LParen => "'('".into(),
            TokenKind::RParen => "')'".into(),
            TokenKind::LBracket => "'['".into(),
            TokenKind::RBracket => "']'".into(),
            TokenKind::Dash => "'-'".into(),
            TokenKind::Lt => "'<'".into(),
            TokenKind::Gt => "'>'".into(),
            TokenKind::Colon => "':'".into(),
            TokenKind::Dot => "'.'".into(),
            TokenKind::Comma => "','".into(),
            TokenKind::Eq => "'='".into(),
            TokenKind::Neq => "'!='".into(),
            TokenKind::Gte => "'>='".into(),
            TokenKind::Lte => "'<='".into(),
            other => format!("keyword {other:?}"),
        }
    }
}

#[derive(Clone, Debug)]
struct Token {
    kind: TokenKind,
    pos: usize,
}

fn parse_error(position: usize, message: impl Into<String>) -> GraphError {
    GraphError::Parse {
        position,
        message: message.into(),
    }
}

fn keyword(word: &str) -> Option<TokenKind> {
    match word.to_ascii_uppercase().as_str() {
        "MATCH" => Some(TokenKind::Match),
        "WHERE" => Some(TokenKind::Where),
        "RETURN" => Some(TokenKind::Return),
        "ORDER" => Some(TokenKind::Order),
        "BY" => Some(TokenKind::By),
        "LIMIT" => Some(TokenKind::Limit),
        "SKIP" => Some(TokenKind::Skip),
        "AND" => Some(TokenKind::And),
        "OR" => Some(TokenKind::Or),
        "NOT" => Some(TokenKind::Not),
        "AS" => Some(TokenKind::As),
        _ => None,
    }
}

fn tokenize(input: &str) -> Result<Vec<Token>> {
    let chars: Vec<char> = input.chars().collect();
    let mut tokens = Vec::new();
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        let pos = i;
        match c {
            _ if c.is_whitespace() => {
                i += 1;
            }
            '(' => {
                tokens.push(Token { kind: TokenKind::LParen, pos });
                i += 1;
            }
            ')' => {
                tokens.push(Token { kind: TokenKind::RParen, pos });
                i += 1;
            }
            '[' => {
                tokens.push(Token { kind: TokenKind::LBracket, pos });
                i += 1;
            }
            ']' => {
                tokens.push(Token { kind: TokenKind::RBracket, pos });
                i += 1;
            }
            '-' => {
                tokens.push(Token { kind: TokenKind::Dash, pos });
                i += 1;
            }
            ':' => {
                tokens.push(Token { kind: TokenKind::Colon, pos });
                i += 1;
            }
            '.' => {
                tokens.push(Token { kind: TokenKind::Dot, pos });
                i += 1;
            }
            ',' => {
                tokens.push(Token { kind: TokenKind::Comma, pos });
                i += 1;
            }
            '=' => {
                tokens.push(Token { kind: TokenKind::Eq, pos });
                i += 1;
            }
            '!' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token { kind: TokenKind::Neq, pos });
                    i += 2;
                } else {
                    return Err(parse_error(pos, "unexpected character '!'"));
                }
            }
            '<' => match chars.get(i + 1) {
                Some('=') => {
                    tokens.push(Token { kind: TokenKind::Lte, pos });
                    i += 2;
                }
                Some('>') => {
                    tokens.push(Token { kind: TokenKind::Neq, pos });
                    i += 2;
                }
                _ => {
                    tokens.push(Token { kind: TokenKind::Lt, pos });
                    i += 1;
                }
            },
            '>' => {
                if chars.get(i + 1) == Some(&'=') {
                    tokens.push(Token { kind: TokenKind::Gte, pos });
                    i += 2;
                } else {
                    tokens.push(Token { kind: TokenKind::Gt, pos });
                    i += 1;
                }
            }
            '\'' | '"' => {
                let quote = c;
                let mut value = String::new();
                i += 1;
                loop {
                    match chars.get(i) {
                        Some(&ch) if ch == quote => {
                            i += 1;
                            break;
                        }
                        Some(&ch) => {
                            value.push(ch);
                            i += 1;
                        }
                        None => return Err(parse_error(pos, "unterminated string literal")),
                    }
                }
                tokens.push(Token { kind: TokenKind::Str(value), pos });
            }
            _ if c.is_ascii_digit() => {
                let start = i;
                while i < chars.len() && chars[i].is_ascii_digit() {
                    i += 1;
                }
                let mut is_float = false;
                if chars.get(i) == Some(&'.')
                    && chars.get(i + 1).is_some_and(|ch| ch.is_ascii_digit())
                {
                    is_float = true;
                    i += 1;
                    while i < chars.len() && chars[i].is_ascii_digit() {
                        i += 1;
                    }
                }
                let text: String = chars[start..i].iter().collect();
                let kind = if is_float {
                    TokenKind::Float(
                        text.parse()
                            .map_err(|_| parse_error(pos, "invalid float literal"))?,
                    )
                } else {
                    TokenKind::Int(
                        text.parse()
                            .map_err(|_| parse_error(pos, "integer literal out of range"))?,
                    )
                };
                tokens.push(Token { kind, pos });
            }
            _ if c.is_alphanumeric() || c == '_' => {
                let start = i;
                while i < chars.len() && (chars[i].is_alphanumeric() || chars[i] == '_') {
                    i += 1;
                }
                let word: String = chars[start..i].iter().collect();
                let kind = keyword(&word).unwrap_or(TokenKind::Ident(word));
                tokens.push(Token { kind, pos });
            }
            _ => return Err(parse_error(pos, format!("unexpected character '{c}'"))),
        }
    }
    Ok(tokens)
}

/// Parses query text into an AST.
pub fn parse(input: &str) -> Result<Query> {
    let tokens = tokenize(input)?;
    let mut parser = Parser {
        tokens,
        pos: 0,
        input_len: input.len(),
    };
    parser.parse_query()
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    input_len: usize,
}

impl Parser {
    fn peek(&self) -> Option<&TokenKind> {
        self.tokens.get(self.pos).map(|t| &t.kind)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .map(|t| t.pos)
            .unwrap_or(self.input_len)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn eat(&mut self, kind: &TokenKind) -> bool {
        if self.peek() == Some(kind) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn expect(&mut self, kind: TokenKind, what: &str) -> Result<()> {
        if self.eat(&kind) {
            Ok(())
        } else {
            let found = self
                .peek()
                .map(|k| k.describe())
                .unwrap_or_else(|| "end of input".into());
            Err(parse_error(
                self.position(),
                format!("expected {what}, found {found}"),
            ))
        }
    }

    fn expect_ident(&mut self, what: &str) -> Result<String> {
        let position = self.position();
        match self.advance().map(|t| t.kind) {
            Some(TokenKind::Ident(name)) => Ok(name),
            Some(other) => Err(parse_error(
                position,
                format!("expected {what}, found {}", other.describe()),
            )),
            None => Err(parse_error(
                position,
                format!("expected {what}, found end of input"),
            )),
        }
    }

    fn parse_query(&mut self) -> Result<Query> {
        self.expect(TokenKind::Match, "MATCH")?;
        let pattern = self.parse_pattern()?;

        let mut conditions = Vec::new();
        if self.eat(&TokenKind::Where) {
            conditions.push(self.parse_or_expr()?);
        }

        self.expect(TokenKind::Return, "RETURN")?;
        let mut return_items = vec![self.parse_return_item()?];
        while self.eat(&TokenKind::Comma) {
            return_items.push(self.parse_return_item()?);
        }

        match self.peek() {
            None => {}
            Some(TokenKind::Order) => {
                return Err(parse_error(
                    self.position(),
                    "ORDER BY is not supported in query text; use the builder",
                ))
            }
            Some(TokenKind::Skip) => {
                return Err(parse_error(
                    self.position(),
                    "SKIP is not supported in query text; use the builder",
                ))
            }
            Some(TokenKind::Limit) => {
                return Err(parse_error(
                    self.position(),
                    "LIMIT is not supported in query text; use the builder",
                ))
            }
            Some(TokenKind::As) => {
                return Err(parse_error(
                    self.position(),
                    "AS aliases are not supported in query text",
                ))
            }
            Some(other) => {
                return Err(parse_error(
                    self.position(),
                    format!("unexpected {} after RETURN items", other.describe()),
                ))
            }
        }

        Ok(Query {
            patterns: vec![pattern],
            conditions,
            return_items,
            ..Query::default()
        })
    }

    fn parse_pattern(&mut self) -> Result<MatchPattern> {
        let first = self.parse_node_pattern()?;
        if matches!(self.peek(), Some(TokenKind::Dash) | Some(TokenKind::Lt)) {
            let edge = self.parse_edge_pattern()?;
            let second = self.parse_node_pattern()?;
            Ok(MatchPattern::path(first, edge, second))
        } else {
            Ok(MatchPattern::node(first))
        }
    }

    fn parse_node_pattern(&mut self) -> Result<NodePattern> {
        self.expect(TokenKind::LParen, "'('")?;
        let mut pattern = NodePattern::default();
        if let Some(TokenKind::Ident(_)) = self.peek() {
            pattern.variable = Some(self.expect_ident("variable")?);
        }
        if self.eat(&TokenKind::Colon) {
            pattern.labels.push(self.expect_ident("label name")?);
        }
        self.expect(TokenKind::RParen, "')'")?;
        Ok(pattern)
    }

    fn parse_edge_pattern(&mut self) -> Result<EdgePattern> {
        // `<-[..]-` fixes the direction up front; `-[..]` waits for the tail.
        let incoming = self.eat(&TokenKind::Lt);
        self.expect(TokenKind::Dash, "'-'")?;
        self.expect(TokenKind::LBracket, "'['")?;

        let mut pattern = EdgePattern::default();
        if let Some(TokenKind::Ident(_)) = self.peek() {
            pattern.variable = Some(self.expect_ident("edge variable")?);
        }
        if self.eat(&TokenKind::Colon) {
            pattern.relationship_type = Some(self.expect_ident("relationship type")?);
        }
        self.expect(TokenKind::RBracket, "']'")?;
        self.expect(TokenKind::Dash, "'-'")?;

        pattern.direction = if incoming {
            if self.eat(&TokenKind::Gt) {
                return Err(parse_error(
                    self.position(),
                    "edge cannot point both ways",
                ));
            }
            PatternDirection::Incoming
        } else if self.eat(&TokenKind::Gt) {
            PatternDirection::Outgoing
        } else {
            PatternDirection::Undirected
        };
        Ok(pattern)
    }

    fn parse_or_expr(&mut self) -> Result<Condition> {
        let first = self.parse_and_expr()?;
        if self.peek() != Some(&TokenKind::Or) {
            return Ok(first);
        }
        let mut children = vec![first];
        while self.eat(&TokenKind::Or) {
            children.push(self.parse_and_expr()?);
        }
        Ok(Condition::Logical {
            op: LogicalOp::Or,
            children,
        })
    }

    fn parse_and_expr(&mut self) -> Result<Condition> {
        let first = self.parse_unary_expr()?;
        if self.peek() != Some(&TokenKind::And) {
            return Ok(first);
        }
        let mut children = vec![first];
        while self.eat(&TokenKind::And) {
            children.push(self.parse_unary_expr()?);
        }
        Ok(Condition::Logical {
            op: LogicalOp::And,
            children,
        })
    }

    fn parse_unary_expr(&mut self) -> Result<Condition> {
        if self.eat(&TokenKind::Not) {
            let child = self.parse_unary_expr()?;
            return Ok(Condition::Logical {
                op: LogicalOp::Not,
                children: vec![child],
            });
        }
        if self.eat(&TokenKind::LParen) {
            let inner = self.parse_or_expr()?;
            self.expect(TokenKind::RParen, "')'")?;
            return Ok(inner);
        }
        self.parse_comparison()
    }

    fn parse_comparison(&mut self) -> Result<Condition> {
        let variable = self.expect_ident("variable reference")?;
        let property = if self.eat(&TokenKind::Dot) {
            Some(self.expect_ident("property name")?)
        } else {
            None
        };
        let left = Operand::Reference { variable, property };

        let op_pos = self.position();
        let op = match self.advance().map(|t| t.kind) {
            Some(TokenKind::Eq) => CompareOp::Eq,
            Some(TokenKind::Neq) => CompareOp::Neq,
            Some(TokenKind::Gt) => CompareOp::Gt,
            Some(TokenKind::Gte) => CompareOp::Gte,
            Some(TokenKind::Lt) => CompareOp::Lt,
            Some(TokenKind::Lte) => CompareOp::Lte,
            Some(other) => {
                return Err(parse_error(
                    op_pos,
                    format!("expected comparison operator, found {}", other.describe()),
                ))
            }
            None => {
                return Err(parse_error(
                    op_pos,
                    "expected comparison operator, found end of input",
                ))
            }
        };

        let right = Operand::Literal(self.parse_literal()?);
        Ok(Condition::Comparison { left, op, right })
    }

    fn parse_literal(&mut self) -> Result<PropertyValue> {
        let position = self.position();
        let negative = self.eat(&TokenKind::Dash);
        match self.advance().map(|t| t.kind) {
            Some(TokenKind::Int(v)) => Ok(PropertyValue::Int(if negative { -v } else { v })),
            Some(TokenKind::Float(v)) => Ok(PropertyValue::Float(if negative { -v } else { v })),
            Some(TokenKind::Str(s)) if !negative => Ok(PropertyValue::String(s)),
            Some(other) => Err(parse_error(
                position,
                format!("expected literal, found {}", other.describe()),
            )),
            None => Err(parse_error(position, "expected literal, found end of input")),
        }
    }

    fn parse_return_item(&mut self) -> Result<ReturnItem> {
        let variable = self.expect_ident("return variable")?;
        if self.eat(&TokenKind::Dot) {
            let key = self.expect_ident("property name")?;
            Ok(ReturnItem::Property { variable, key })
        } else {
            Ok(ReturnItem::Variable(variable))
        }
    }
}
