//! Simple query string parsing.
//!
//! Turns the boolean query syntax accepted by
//! `search_simple_query_string` into a small AST:
//!
//! - `word` matches a term, `word*` matches a prefix
//! - `"two words"` matches a phrase
//! - `a + b` requires both, `a | b` requires either
//! - `-word` excludes matches
//! - `( ... )` groups, `\` escapes the next character
//!
//! Terms written next to each other are combined with the default
//! operator. `|` binds loosest, then juxtaposition, then `+`.

use crate::core::error::{FurqanError, Result};

/// How adjacent terms without an explicit operator combine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operator {
    And,
    Or,
}

#[derive(Debug, Clone, PartialEq)]
pub enum QueryNode {
    Term(String),
    Phrase(String),
    Prefix(String),
    Not(Box<QueryNode>),
    And(Vec<QueryNode>),
    Or(Vec<QueryNode>),
}

impl QueryNode {
    /// Conjunction, flattening nested conjunctions
    pub fn and(nodes: Vec<QueryNode>) -> QueryNode {
        Self::combine(nodes, Operator::And)
    }

    /// Disjunction, flattening nested disjunctions
    pub fn or(nodes: Vec<QueryNode>) -> QueryNode {
        Self::combine(nodes, Operator::Or)
    }

    fn combine(nodes: Vec<QueryNode>, op: Operator) -> QueryNode {
        let mut flat = Vec::with_capacity(nodes.len());
        for node in nodes {
            match (op, node) {
                (Operator::And, QueryNode::And(inner)) | (Operator::Or, QueryNode::Or(inner)) => {
                    flat.extend(inner)
                }
                (_, other) => flat.push(other),
            }
        }
        if flat.len() == 1 {
            return flat.remove(0);
        }
        match op {
            Operator::And => QueryNode::And(flat),
            Operator::Or => QueryNode::Or(flat),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Word { text: String, prefix: bool },
    Phrase(String),
    Plus,
    Pipe,
    Minus,
    Open,
    Close,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Token::Word { text, .. } => format!("'{text}'"),
            Token::Phrase(text) => format!("\"{text}\""),
            Token::Plus => "'+'".to_string(),
            Token::Pipe => "'|'".to_string(),
            Token::Minus => "'-'".to_string(),
            Token::Open => "'('".to_string(),
            Token::Close => "')'".to_string(),
        }
    }
}

fn is_boundary(c: char) -> bool {
    c.is_whitespace() || matches!(c, '"' | '(' | ')' | '|' | '+')
}

fn lex(input: &str) -> Result<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = input.chars().peekable();

    while let Some(&c) = chars.peek() {
        match c {
            c if c.is_whitespace() => {
                chars.next();
            }
            '(' => {
                chars.next();
                tokens.push(Token::Open);
            }
            ')' => {
                chars.next();
                tokens.push(Token::Close);
            }
            '|' => {
                chars.next();
                tokens.push(Token::Pipe);
            }
            '+' => {
                chars.next();
                tokens.push(Token::Plus);
            }
            '-' => {
                chars.next();
                tokens.push(Token::Minus);
            }
            '"' => {
                chars.next();
                let mut phrase = String::new();
                let mut closed = false;
                while let Some(c) = chars.next() {
                    match c {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                phrase.push(escaped);
                            }
                        }
                        '"' => {
                            closed = true;
                            break;
                        }
                        other => phrase.push(other),
                    }
                }
                if !closed {
                    return Err(FurqanError::InvalidQuery(
                        "Unterminated quoted phrase".to_string(),
                    ));
                }
                tokens.push(Token::Phrase(phrase));
            }
            _ => {
                let mut text = String::new();
                let mut prefix = false;
                while let Some(&c) = chars.peek() {
                    if is_boundary(c) {
                        break;
                    }
                    chars.next();
                    match c {
                        '\\' => {
                            if let Some(escaped) = chars.next() {
                                text.push(escaped);
                            }
                        }
                        '*' if chars.peek().map_or(true, |n| is_boundary(*n)) => prefix = true,
                        other => text.push(other),
                    }
                }
                if text.is_empty() {
                    return Err(FurqanError::InvalidQuery(
                        "Prefix operator '*' needs at least one character".to_string(),
                    ));
                }
                tokens.push(Token::Word { text, prefix });
            }
        }
    }

    Ok(tokens)
}

struct Parser {
    tokens: Vec<Token>,
    pos: usize,
    default_operator: Operator,
}

impl Parser {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == Some(token) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn starts_operand(&self) -> bool {
        matches!(
            self.peek(),
            Some(Token::Word { .. } | Token::Phrase(_) | Token::Minus | Token::Open)
        )
    }

    fn parse_or(&mut self) -> Result<QueryNode> {
        let mut branches = vec![self.parse_juxtaposed()?];
        while self.eat(&Token::Pipe) {
            if !self.starts_operand() {
                return Err(self.dangling("|"));
            }
            branches.push(self.parse_juxtaposed()?);
        }
        Ok(QueryNode::or(branches))
    }

    fn parse_juxtaposed(&mut self) -> Result<QueryNode> {
        let mut groups = vec![self.parse_and()?];
        while self.starts_operand() {
            groups.push(self.parse_and()?);
        }
        Ok(match self.default_operator {
            Operator::And => QueryNode::and(groups),
            Operator::Or => QueryNode::or(groups),
        })
    }

    fn parse_and(&mut self) -> Result<QueryNode> {
        let mut items = vec![self.parse_unary()?];
        while self.eat(&Token::Plus) {
            if !self.starts_operand() {
                return Err(self.dangling("+"));
            }
            items.push(self.parse_unary()?);
        }
        Ok(QueryNode::and(items))
    }

    fn parse_unary(&mut self) -> Result<QueryNode> {
        if self.eat(&Token::Minus) {
            if !self.starts_operand() {
                return Err(self.dangling("-"));
            }
            return Ok(QueryNode::Not(Box::new(self.parse_unary()?)));
        }
        self.parse_primary()
    }

    fn parse_primary(&mut self) -> Result<QueryNode> {
        let token = self.peek().cloned();
        match token {
            Some(Token::Word { text, prefix }) => {
                self.pos += 1;
                Ok(if prefix {
                    QueryNode::Prefix(text)
                } else {
                    QueryNode::Term(text)
                })
            }
            Some(Token::Phrase(text)) => {
                self.pos += 1;
                Ok(QueryNode::Phrase(text))
            }
            Some(Token::Open) => {
                self.pos += 1;
                if self.eat(&Token::Close) {
                    return Err(FurqanError::InvalidQuery("Empty group '()'".to_string()));
                }
                let inner = self.parse_or()?;
                if !self.eat(&Token::Close) {
                    return Err(FurqanError::InvalidQuery(
                        "Unbalanced parentheses: missing ')'".to_string(),
                    ));
                }
                Ok(inner)
            }
            Some(other) => Err(FurqanError::InvalidQuery(format!(
                "Unexpected {}",
                other.describe()
            ))),
            None => Err(FurqanError::InvalidQuery(
                "Unexpected end of query".to_string(),
            )),
        }
    }

    fn dangling(&self, op: &str) -> FurqanError {
        match self.peek() {
            Some(next) => FurqanError::InvalidQuery(format!(
                "Expected a term after '{op}', found {}",
                next.describe()
            )),
            None => FurqanError::InvalidQuery(format!("Expected a term after '{op}'")),
        }
    }
}

/// Parse a simple query string
///
/// # Errors
///
/// `InvalidQuery` for an empty query, unbalanced parentheses or
/// quotes, operators without an operand and empty groups.
pub fn parse_simple_query(input: &str, default_operator: Operator) -> Result<QueryNode> {
    let tokens = lex(input)?;
    if tokens.is_empty() {
        return Err(FurqanError::InvalidQuery(
            "Query cannot be empty".to_string(),
        ));
    }

    let mut parser = Parser {
        tokens,
        pos: 0,
        default_operator,
    };
    let node = parser.parse_or()?;
    if let Some(extra) = parser.peek() {
        return Err(match extra {
            Token::Close => {
                FurqanError::InvalidQuery("Unbalanced parentheses: unexpected ')'".to_string())
            }
            other => FurqanError::InvalidQuery(format!("Unexpected {}", other.describe())),
        });
    }
    Ok(node)
}
