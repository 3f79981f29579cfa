use crate::core::models::atom::AtomRole;
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

/// The attributes of one atom a selection is evaluated against.
#[derive(Debug, Clone, Copy)]
pub struct AtomContext<'a> {
    pub chain_id: char,
    pub residue_name: &'a str,
    pub residue_number: isize,
    pub atom_name: &'a str,
    pub element: &'a str,
    pub role: AtomRole,
}

#[derive(Debug, Clone, PartialEq)]
pub enum SelectionExpr {
    All,
    None,
    Protein,
    Water,
    Backbone,
    Sidechain,
    Chain(Vec<char>),
    ResidueName(Vec<String>),
    ResidueNumber(Vec<ResidueRange>),
    AtomName(Vec<String>),
    Element(Vec<String>),
    Not(Box<SelectionExpr>),
    And(Box<SelectionExpr>, Box<SelectionExpr>),
    Or(Box<SelectionExpr>, Box<SelectionExpr>),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResidueRange {
    pub start: isize,
    pub end: isize,
}

impl ResidueRange {
    fn contains(&self, number: isize) -> bool {
        self.start <= number && number <= self.end
    }
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SelectionParseError {
    #[error("Selection query is empty")]
    Empty,
    #[error("Unexpected end of selection query after '{0}'")]
    UnexpectedEnd(String),
    #[error("Unexpected token '{0}' in selection query")]
    UnexpectedToken(String),
    #[error("Unknown selection keyword '{0}'")]
    UnknownKeyword(String),
    #[error("Keyword '{0}' requires at least one value")]
    MissingValues(String),
    #[error("Invalid residue number '{0}'")]
    InvalidResidueNumber(String),
    #[error("Invalid chain identifier '{0}' (must be a single character)")]
    InvalidChain(String),
    #[error("Unbalanced parentheses in selection query")]
    UnbalancedParentheses,
}

/// A parsed atom-selection query.
///
/// Grammar (keywords are case-insensitive, values are case-sensitive):
///
/// ```text
/// expr    := and_expr ("or" and_expr)*
/// and_expr:= unary ("and" unary)*
/// unary   := "not" unary | "(" expr ")" | keyword
/// keyword := all | none | protein | water | backbone | sidechain
///          | chain C... | resname R... | resid N... | resid N to M | name A... | element E...
/// ```
#[derive(Debug, Clone, PartialEq)]
pub struct SelectionQuery {
    source: String,
    expr: SelectionExpr,
}

impl SelectionQuery {
    pub fn parse(source: &str) -> Result<Self, SelectionParseError> {
        let tokens = tokenize(source);
        if tokens.is_empty() {
            return Err(SelectionParseError::Empty);
        }
        let mut parser = Parser { tokens, pos: 0 };
        let expr = parser.parse_or()?;
        if let Some(token) = parser.peek() {
            return Err(if token == ")" {
                SelectionParseError::UnbalancedParentheses
            } else {
                SelectionParseError::UnexpectedToken(token.to_string())
            });
        }
        Ok(Self {
            source: source.trim().to_string(),
            expr,
        })
    }

    pub fn all() -> Self {
        Self {
            source: "all".to_string(),
            expr: SelectionExpr::All,
        }
    }

    pub fn source(&self) -> &str {
        &self.source
    }

    pub fn expr(&self) -> &SelectionExpr {
        &self.expr
    }

    pub fn matches(&self, atom: &AtomContext<'_>) -> bool {
        self.expr.matches(atom)
    }
}

impl FromStr for SelectionQuery {
    type Err = SelectionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SelectionQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.source)
    }
}

impl SelectionExpr {
    pub fn matches(&self, atom: &AtomContext<'_>) -> bool {
        match self {
            SelectionExpr::All => true,
            SelectionExpr::None => false,
            SelectionExpr::Protein => atom.role.is_protein(),
            SelectionExpr::Water => atom.role == AtomRole::Water,
            SelectionExpr::Backbone => atom.role == AtomRole::Backbone,
            SelectionExpr::Sidechain => atom.role == AtomRole::Sidechain,
            SelectionExpr::Chain(chains) => chains.contains(&atom.chain_id),
            SelectionExpr::ResidueName(names) => names.iter().any(|n| n == atom.residue_name),
            SelectionExpr::ResidueNumber(ranges) => {
                ranges.iter().any(|r| r.contains(atom.residue_number))
            }
            SelectionExpr::AtomName(names) => names.iter().any(|n| n == atom.atom_name),
            SelectionExpr::Element(elements) => elements
                .iter()
                .any(|e| e.eq_ignore_ascii_case(atom.element)),
            SelectionExpr::Not(inner) => !inner.matches(atom),
            SelectionExpr::And(lhs, rhs) => lhs.matches(atom) && rhs.matches(atom),
            SelectionExpr::Or(lhs, rhs) => lhs.matches(atom) || rhs.matches(atom),
        }
    }
}

fn tokenize(source: &str) -> Vec<String> {
    source
        .replace('(', " ( ")
        .replace(')', " ) ")
        .split_whitespace()
        .map(str::to_string)
        .collect()
}

const KEYWORDS: &[&str] = &[
    "and", "or", "not", "all", "none", "protein", "water", "backbone", "sidechain", "chain",
    "resname", "resid", "name", "element", "to",
];

fn is_reserved(token: &str) -> bool {
    token == "(" || token == ")" || KEYWORDS.contains(&token.to_ascii_lowercase().as_str())
}

struct Parser {
    tokens: Vec<String>,
    pos: usize,
}

impl Parser {
    fn peek(&self) -> Option<&str> {
        self.tokens.get(self.pos).map(String::as_str)
    }

    fn peek_keyword(&self) -> Option<String> {
        self.peek().map(str::to_ascii_lowercase)
    }

    fn advance(&mut self) -> Option<String> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn last_token(&self) -> String {
        self.pos
            .checked_sub(1)
            .and_then(|i| self.tokens.get(i))
            .cloned()
            .unwrap_or_default()
    }

    fn parse_or(&mut self) -> Result<SelectionExpr, SelectionParseError> {
        let mut expr = self.parse_and()?;
        while self.peek_keyword().as_deref() == Some("or") {
            self.advance();
            let rhs = self.parse_and()?;
            expr = SelectionExpr::Or(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_and(&mut self) -> Result<SelectionExpr, SelectionParseError> {
        let mut expr = self.parse_unary()?;
        while self.peek_keyword().as_deref() == Some("and") {
            self.advance();
            let rhs = self.parse_unary()?;
            expr = SelectionExpr::And(Box::new(expr), Box::new(rhs));
        }
        Ok(expr)
    }

    fn parse_unary(&mut self) -> Result<SelectionExpr, SelectionParseError> {
        let token = self
            .advance()
            .ok_or_else(|| SelectionParseError::UnexpectedEnd(self.last_token()))?;
        match token.to_ascii_lowercase().as_str() {
            "not" => Ok(SelectionExpr::Not(Box::new(self.parse_unary()?))),
            "(" => {
                let inner = self.parse_or()?;
                match self.advance().as_deref() {
                    Some(")") => Ok(inner),
                    _ => Err(SelectionParseError::UnbalancedParentheses),
                }
            }
            ")" => Err(SelectionParseError::UnbalancedParentheses),
            "all" => Ok(SelectionExpr::All),
            "none" => Ok(SelectionExpr::None),
            "protein" => Ok(SelectionExpr::Protein),
            "water" => Ok(SelectionExpr::Water),
            "backbone" => Ok(SelectionExpr::Backbone),
            "sidechain" => Ok(SelectionExpr::Sidechain),
            "chain" => {
                let values = self.values(&token)?;
                let chains = values
                    .into_iter()
                    .map(|v| {
                        let mut chars = v.chars();
                        match (chars.next(), chars.next()) {
                            (Some(c), None) => Ok(c),
                            _ => Err(SelectionParseError::InvalidChain(v)),
                        }
                    })
                    .collect::<Result<Vec<_>, _>>()?;
                Ok(SelectionExpr::Chain(chains))
            }
            "resname" => Ok(SelectionExpr::ResidueName(self.values(&token)?)),
            "name" => Ok(SelectionExpr::AtomName(self.values(&token)?)),
            "element" => Ok(SelectionExpr::Element(self.values(&token)?)),
            "resid" => self.parse_resid(&token),
            _ => Err(SelectionParseError::UnknownKeyword(token)),
        }
    }

    fn values(&mut self, keyword: &str) -> Result<Vec<String>, SelectionParseError> {
        let mut values = Vec::new();
        while let Some(token) = self.peek() {
            if is_reserved(token) {
                break;
            }
            values.push(token.to_string());
            self.pos += 1;
        }
        if values.is_empty() {
            return Err(SelectionParseError::MissingValues(keyword.to_string()));
        }
        Ok(values)
    }

    fn parse_resid(&mut self, keyword: &str) -> Result<SelectionExpr, SelectionParseError> {
        let mut ranges = Vec::new();
        while let Some(token) = self.peek() {
            if is_reserved(token) {
                break;
            }
            let start = parse_residue_number(token)?;
            self.pos += 1;
            if self.peek_keyword().as_deref() == Some("to") {
                self.advance();
                let end_token = self
                    .advance()
                    .ok_or_else(|| SelectionParseError::UnexpectedEnd("to".to_string()))?;
                let end = parse_residue_number(&end_token)?;
                ranges.push(ResidueRange {
                    start: start.min(end),
                    end: start.max(end),
                });
            } else {
                ranges.push(ResidueRange { start, end: start });
            }
        }
        if ranges.is_empty() {
            return Err(SelectionParseError::MissingValues(keyword.to_string()));
        }
        Ok(SelectionExpr::ResidueNumber(ranges))
    }
}

fn parse_residue_number(token: &str) -> Result<isize, SelectionParseError> {
    token
        .parse()
        .map_err(|_| SelectionParseError::InvalidResidueNumber(token.to_string()))
}
