//! Tokenizer and recursive-descent parser for expressions

use std::iter::Peekable;
use std::str::CharIndices;

use crate::error::{DomainError, DomainResult};

use super::is_valid_identifier;

/// Deepest syntax tree the parser accepts, counting parentheses, unary
/// minus and chained binary operators.
pub const MAX_NESTING_DEPTH: usize = 256;

/// A binary arithmetic operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    /// `+`: numeric addition, or concatenation when either side is text.
    Add,
    /// `-`
    Subtract,
    /// `*`
    Multiply,
    /// `/`
    Divide,
}

impl BinaryOp {
    /// Returns the operator symbol.
    #[must_use]
    pub const fn symbol(self) -> char {
        match self {
            Self::Add => '+',
            Self::Subtract => '-',
            Self::Multiply => '*',
            Self::Divide => '/',
        }
    }
}

/// A node of the expression syntax tree.
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// A numeric literal.
    Number(f64),
    /// A quoted string literal.
    Text(String),
    /// A `${name}` reference to a sibling variable.
    Reference(String),
    /// Unary minus.
    Negate(Box<Node>),
    /// A binary operation.
    Binary {
        /// The operator.
        op: BinaryOp,
        /// Left operand.
        lhs: Box<Node>,
        /// Right operand.
        rhs: Box<Node>,
    },
}

impl Node {
    pub(super) fn collect_references<'a>(&'a self, names: &mut Vec<&'a str>) {
        match self {
            Self::Reference(name) => {
                if !names.contains(&name.as_str()) {
                    names.push(name.as_str());
                }
            }
            Self::Negate(inner) => inner.collect_references(names),
            Self::Binary { lhs, rhs, .. } => {
                lhs.collect_references(names);
                rhs.collect_references(names);
            }
            Self::Number(_) | Self::Text(_) => {}
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Number(f64),
    Text(String),
    Reference(String),
    Operator(BinaryOp),
    OpenParen,
    CloseParen,
}

impl Token {
    fn describe(&self) -> String {
        match self {
            Self::Number(n) => format!("number {n}"),
            Self::Text(s) => format!("string {s:?}"),
            Self::Reference(name) => format!("reference ${{{name}}}"),
            Self::Operator(op) => format!("operator '{}'", op.symbol()),
            Self::OpenParen => "'('".to_string(),
            Self::CloseParen => "')'".to_string(),
        }
    }
}

/// Parses expression text into a syntax tree.
pub(super) fn parse(source: &str) -> DomainResult<Node> {
    let tokens = tokenize(source)?;
    if tokens.is_empty() {
        return Err(DomainError::malformed(source, "empty expression"));
    }

    let mut parser = Parser {
        source,
        tokens,
        pos: 0,
        nesting: 0,
    };
    let root = parser.expr()?;

    if let Some(token) = parser.peek() {
        return Err(DomainError::malformed(
            source,
            format!("unexpected {} after end of expression", token.describe()),
        ));
    }

    Ok(root.node)
}

fn tokenize(source: &str) -> DomainResult<Vec<Token>> {
    let mut tokens = Vec::new();
    let mut chars = source.char_indices().peekable();

    while let Some((i, ch)) = chars.next() {
        let token = match ch {
            c if c.is_whitespace() => continue,
            '+' => Token::Operator(BinaryOp::Add),
            '-' => Token::Operator(BinaryOp::Subtract),
            '*' => Token::Operator(BinaryOp::Multiply),
            '/' => Token::Operator(BinaryOp::Divide),
            '(' => Token::OpenParen,
            ')' => Token::CloseParen,
            '$' => read_reference(source, i, &mut chars)?,
            '\'' | '"' => read_text(source, ch, &mut chars)?,
            c if c.is_ascii_digit() || c == '.' => read_number(source, i, &mut chars)?,
            other => {
                return Err(DomainError::malformed(
                    source,
                    format!("unexpected character {other:?} at offset {i}"),
                ));
            }
        };
        tokens.push(token);
    }

    Ok(tokens)
}

fn read_reference(
    source: &str,
    start: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> DomainResult<Token> {
    if chars.next_if(|(_, c)| *c == '{').is_none() {
        return Err(DomainError::malformed(
            source,
            format!("expected '{{' after '$' at offset {start}"),
        ));
    }

    let mut name = String::new();
    loop {
        match chars.next() {
            Some((_, '}')) => break,
            Some((_, c)) => name.push(c),
            None => {
                return Err(DomainError::malformed(
                    source,
                    format!("unclosed reference starting at offset {start}"),
                ));
            }
        }
    }

    let name = name.trim();
    if !is_valid_identifier(name) {
        return Err(DomainError::malformed(
            source,
            format!("invalid variable name {name:?}"),
        ));
    }

    Ok(Token::Reference(name.to_string()))
}

fn read_text(
    source: &str,
    quote: char,
    chars: &mut Peekable<CharIndices<'_>>,
) -> DomainResult<Token> {
    let mut text = String::new();
    loop {
        match chars.next() {
            Some((_, '\\')) => match chars.next() {
                Some((_, escaped)) => text.push(escaped),
                None => break,
            },
            Some((_, c)) if c == quote => return Ok(Token::Text(text)),
            Some((_, c)) => text.push(c),
            None => break,
        }
    }

    Err(DomainError::malformed(source, "unterminated string literal"))
}

fn read_number(
    source: &str,
    start: usize,
    chars: &mut Peekable<CharIndices<'_>>,
) -> DomainResult<Token> {
    let mut end = start + 1;
    while let Some((i, c)) = chars.next_if(|(_, c)| c.is_ascii_digit() || *c == '.') {
        end = i + c.len_utf8();
    }

    let literal = &source[start..end];
    literal
        .parse::<f64>()
        .map(Token::Number)
        .map_err(|_| DomainError::malformed(source, format!("invalid number {literal:?}")))
}

/// A parsed node with the depth of its tree.
struct Subtree {
    node: Node,
    depth: usize,
}

impl Subtree {
    const fn leaf(node: Node) -> Self {
        Self { node, depth: 1 }
    }
}

struct Parser<'a> {
    source: &'a str,
    tokens: Vec<Token>,
    pos: usize,
    nesting: usize,
}

impl Parser<'_> {
    fn peek(&self) -> Option<&Token> {
        self.tokens.get(self.pos)
    }

    fn advance(&mut self) -> Option<Token> {
        let token = self.tokens.get(self.pos).cloned();
        if token.is_some() {
            self.pos += 1;
        }
        token
    }

    fn next_operator(&mut self, accepted: &[BinaryOp]) -> Option<BinaryOp> {
        match self.peek() {
            Some(Token::Operator(op)) if accepted.contains(op) => {
                let op = *op;
                self.pos += 1;
                Some(op)
            }
            _ => None,
        }
    }

    fn too_deep(&self) -> DomainError {
        DomainError::malformed(
            self.source,
            format!("expression nests deeper than {MAX_NESTING_DEPTH} levels"),
        )
    }

    fn descend(&mut self) -> DomainResult<()> {
        self.nesting += 1;
        if self.nesting > MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        Ok(())
    }

    const fn ascend(&mut self) {
        self.nesting -= 1;
    }

    fn wrap(&self, node: Node, child_depth: usize) -> DomainResult<Subtree> {
        let depth = child_depth + 1;
        if depth > MAX_NESTING_DEPTH {
            return Err(self.too_deep());
        }
        Ok(Subtree { node, depth })
    }

    fn binary(&self, op: BinaryOp, lhs: Subtree, rhs: Subtree) -> DomainResult<Subtree> {
        let child_depth = lhs.depth.max(rhs.depth);
        let node = Node::Binary {
            op,
            lhs: Box::new(lhs.node),
            rhs: Box::new(rhs.node),
        };
        self.wrap(node, child_depth)
    }

    // expr := term (('+' | '-') term)*
    fn expr(&mut self) -> DomainResult<Subtree> {
        let mut lhs = self.term()?;
        while let Some(op) = self.next_operator(&[BinaryOp::Add, BinaryOp::Subtract]) {
            let rhs = self.term()?;
            lhs = self.binary(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    // term := unary (('*' | '/') unary)*
    fn term(&mut self) -> DomainResult<Subtree> {
        let mut lhs = self.unary()?;
        while let Some(op) = self.next_operator(&[BinaryOp::Multiply, BinaryOp::Divide]) {
            let rhs = self.unary()?;
            lhs = self.binary(op, lhs, rhs)?;
        }
        Ok(lhs)
    }

    fn unary(&mut self) -> DomainResult<Subtree> {
        if self.next_operator(&[BinaryOp::Subtract]).is_some() {
            self.descend()?;
            let inner = self.unary()?;
            self.ascend();
            return self.wrap(Node::Negate(Box::new(inner.node)), inner.depth);
        }
        self.primary()
    }

    fn primary(&mut self) -> DomainResult<Subtree> {
        match self.advance() {
            Some(Token::Number(n)) => Ok(Subtree::leaf(Node::Number(n))),
            Some(Token::Text(s)) => Ok(Subtree::leaf(Node::Text(s))),
            Some(Token::Reference(name)) => Ok(Subtree::leaf(Node::Reference(name))),
            Some(Token::OpenParen) => {
                self.descend()?;
                let inner = self.expr()?;
                self.ascend();
                match self.advance() {
                    Some(Token::CloseParen) => Ok(inner),
                    Some(other) => Err(DomainError::malformed(
                        self.source,
                        format!("expected ')' but found {}", other.describe()),
                    )),
                    None => Err(DomainError::malformed(self.source, "missing ')'")),
                }
            }
            Some(other) => Err(DomainError::malformed(
                self.source,
                format!("unexpected {}", other.describe()),
            )),
            None => Err(DomainError::malformed(
                self.source,
                "unexpected end of expression",
            )),
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn reference(name: &str) -> Box<Node> {
        Box::new(Node::Reference(name.to_string()))
    }

    #[test]
    fn test_parse_sum_of_references() {
        let node = parse("${num}+${readme}").unwrap();
        assert_eq!(
            node,
            Node::Binary {
                op: BinaryOp::Add,
                lhs: reference("num"),
                rhs: reference("readme"),
            }
        );
    }

    #[test]
    fn test_multiplication_binds_tighter() {
        let node = parse("${a} + ${b} * ${c}").unwrap();
        assert_eq!(
            node,
            Node::Binary {
                op: BinaryOp::Add,
                lhs: reference("a"),
                rhs: Box::new(Node::Binary {
                    op: BinaryOp::Multiply,
                    lhs: reference("b"),
                    rhs: reference("c"),
                }),
            }
        );
    }

    #[test]
    fn test_reference_name_is_trimmed() {
        assert_eq!(parse("${ total }").unwrap(), Node::Reference("total".to_string()));
    }

    #[test]
    fn test_number_literals() {
        assert_eq!(parse("42").unwrap(), Node::Number(42.0));
        assert_eq!(parse("3.25").unwrap(), Node::Number(3.25));
        assert_eq!(parse(".5").unwrap(), Node::Number(0.5));
    }

    #[test]
    fn test_malformed_inputs() {
        for source in [
            "",
            "   ",
            "${a} +",
            "* ${a}",
            "(${a} + 1",
            "${a} ${b}",
            "${a",
            "${}",
            "${1abc}",
            "$a",
            "'open",
            "1.2.3",
            "${a} % 2",
            ")",
        ] {
            let error = parse(source).unwrap_err();
            assert!(
                matches!(error, DomainError::MalformedExpression { .. }),
                "expected malformed error for {source:?}, got {error:?}"
            );
        }
    }

    #[test]
    fn test_deep_parentheses_are_rejected() {
        let depth = MAX_NESTING_DEPTH * 40;
        let source = format!("{}1{}", "(".repeat(depth), ")".repeat(depth));
        match parse(&source).unwrap_err() {
            DomainError::MalformedExpression { reason, .. } => {
                assert!(reason.contains("nests deeper"), "{reason}");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[test]
    fn test_long_negation_run_is_rejected() {
        let source = format!("{}1", "- ".repeat(MAX_NESTING_DEPTH * 40));
        assert!(matches!(
            parse(&source).unwrap_err(),
            DomainError::MalformedExpression { .. }
        ));
    }

    #[test]
    fn test_long_operator_chain_is_rejected() {
        let source = vec!["1"; MAX_NESTING_DEPTH * 40].join(" + ");
        assert!(matches!(
            parse(&source).unwrap_err(),
            DomainError::MalformedExpression { .. }
        ));
    }

    #[test]
    fn test_nesting_within_limit_parses() {
        let parens = MAX_NESTING_DEPTH / 2;
        let source = format!("{}- - 1{}", "(".repeat(parens), ")".repeat(parens));
        assert_eq!(
            parse(&source).unwrap(),
            Node::Negate(Box::new(Node::Negate(Box::new(Node::Number(1.0)))))
        );
        assert!(parse(&vec!["${a}"; 100].join(" * ")).is_ok());
    }

    #[test]
    fn test_malformed_error_keeps_source() {
        match parse("${a} +").unwrap_err() {
            DomainError::MalformedExpression { expression, reason } => {
                assert_eq!(expression, "${a} +");
                assert_eq!(reason, "unexpected end of expression");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}
