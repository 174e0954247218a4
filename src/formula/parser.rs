use super::{ast::*, error::*, lexer::*};
use crate::common::*;
use crate::config::EngineConfig;
use logos_iter::LogosIter;

type PResult<T = Node> = Result<T, ParseError>;

pub(crate) struct Parser<'a> {
    lexer: Lexer<'a>,
    depth: usize,
    max_depth: usize,
}

impl<'a> Parser<'a> {
    const COMPARISON_OPS: &'static [TokenKind] = &[
        TokenKind::LessThan,
        TokenKind::GreaterThan,
        TokenKind::LessEqual,
        TokenKind::GreaterEqual,
        TokenKind::EqualEqual,
        TokenKind::BangEqual,
    ];

    const ADDITION_OPS: &'static [TokenKind] = &[TokenKind::Plus, TokenKind::Minus];

    const MULTIPLICATION_OPS: &'static [TokenKind] = &[
        TokenKind::Star,
        TokenKind::Slash,
        TokenKind::SlashSlash,
        TokenKind::Percent,
    ];

    const UNARY_PREFIX_OPS: &'static [TokenKind] = &[TokenKind::Plus, TokenKind::Minus];

    pub fn new(s: &'a str, max_depth: usize) -> Self {
        Self {
            lexer: lexer(s),
            depth: 0,
            max_depth,
        }
    }

    pub fn parse(mut self) -> PResult<Expression> {
        let root = self.parse_node()?;
        if let Some(found) = self.advance() {
            return self.error(ParseErrorKind::TrailingInput(found));
        }
        Ok(Expression::new(root))
    }

    fn advance(&mut self) -> Option<TokenKind> {
        self.lexer.next()
    }

    fn matches(&mut self, kind: TokenKind) -> bool {
        self.lexer.peek().map_or(false, |&peeked| peeked == kind)
    }

    fn matches_any(&mut self, options: &[TokenKind]) -> bool {
        self.lexer
            .peek()
            .map_or(false, |peeked| options.contains(peeked))
    }

    fn consume(&mut self, expected: TokenKind) -> PResult<()> {
        if self.matches(expected) {
            self.lexer.next();
            Ok(())
        } else {
            self.unexpected_token(vec1![expected])
        }
    }

    fn error<T>(&mut self, kind: ParseErrorKind) -> PResult<T> {
        Err(ParseError {
            kind,
            span: self.lexer.span(),
            slice: self.lexer.slice().to_string(),
        })
    }

    fn unexpected_token<T>(&mut self, expected: NonEmpty<TokenKind>) -> PResult<T> {
        let found = self.lexer.next();
        if matches!(found, Some(TokenKind::Error)) {
            self.error(ParseErrorKind::UnrecognizedInput { expected })
        } else {
            self.error(ParseErrorKind::UnexpectedToken { found, expected })
        }
    }

    fn parse_node(&mut self) -> PResult {
        self.depth += 1;
        if self.depth > self.max_depth {
            let max = self.max_depth;
            return self.error(ParseErrorKind::TooDeep { max });
        }
        let node = self.parse_conditional();
        self.depth -= 1;
        node
    }

    fn parse_conditional(&mut self) -> PResult {
        let body = self.parse_or()?;
        if !self.matches(TokenKind::If) {
            return Ok(body);
        }
        self.advance();
        let test = self.parse_or()?;
        self.consume(TokenKind::Else)?;
        let orelse = self.parse_node()?;
        Ok(Node::Conditional(Conditional::new(body, test, orelse)))
    }

    fn parse_or(&mut self) -> PResult {
        let mut lhs = self.parse_and()?;

        while self.matches(TokenKind::Or) {
            self.advance();
            let rhs = self.parse_and()?;

            lhs = Node::Logical(Logical::new(lhs, LogicalOperator::Or, rhs));
        }

        Ok(lhs)
    }

    fn parse_and(&mut self) -> PResult {
        let mut lhs = self.parse_not()?;

        while self.matches(TokenKind::And) {
            self.advance();
            let rhs = self.parse_not()?;

            lhs = Node::Logical(Logical::new(lhs, LogicalOperator::And, rhs));
        }

        Ok(lhs)
    }

    fn parse_not(&mut self) -> PResult {
        if self.matches(TokenKind::Not) {
            self.advance();
            let value = self.nested(Self::parse_not)?;

            Ok(Node::Unary(Unary::new(UnaryOperator::Not, value)))
        } else {
            self.parse_comparison()
        }
    }

    fn parse_comparison(&mut self) -> PResult {
        let first = self.parse_addition()?;
        let mut rest = Vec::new();

        while self.matches_any(Self::COMPARISON_OPS) {
            let op = self.advance().and_then(|t| t.as_compare_op());
            let rhs = self.parse_addition()?;
            rest.extend(op.map(|op| (op, rhs)));
        }

        Ok(if rest.is_empty() {
            first
        } else {
            Node::Compare(Compare::new(first, rest))
        })
    }

    fn parse_addition(&mut self) -> PResult {
        let mut lhs = self.parse_multiplication()?;

        while self.matches_any(Self::ADDITION_OPS) {
            let op = self.advance().and_then(|t| t.as_binary_op());
            let rhs = self.parse_multiplication()?;

            if let Some(op) = op {
                lhs = Node::Binary(Binary::new(lhs, op, rhs));
            }
        }

        Ok(lhs)
    }

    fn parse_multiplication(&mut self) -> PResult {
        let mut lhs = self.parse_unary_prefix()?;

        while self.matches_any(Self::MULTIPLICATION_OPS) {
            let op = self.advance().and_then(|t| t.as_binary_op());
            let rhs = self.parse_unary_prefix()?;

            if let Some(op) = op {
                lhs = Node::Binary(Binary::new(lhs, op, rhs));
            }
        }

        Ok(lhs)
    }

    fn parse_unary_prefix(&mut self) -> PResult {
        if self.matches_any(Self::UNARY_PREFIX_OPS) {
            let op = self.advance().and_then(|t| t.as_unary_op());
            let rhs = self.nested(Self::parse_unary_prefix)?;

            Ok(match op {
                Some(op) => Node::Unary(Unary::new(op, rhs)),
                None => rhs,
            })
        } else {
            self.parse_atom()
        }
    }

    fn parse_atom(&mut self) -> PResult {
        match self.lexer.peek() {
            Some(TokenKind::LeftParen) => self.parse_parens(),
            Some(TokenKind::Integer) => self.parse_integer(),
            Some(TokenKind::True) => {
                self.advance();
                Ok(Node::Literal(Literal::Bool(true)))
            }
            Some(TokenKind::False) => {
                self.advance();
                Ok(Node::Literal(Literal::Bool(false)))
            }
            Some(TokenKind::Identifier) => self.parse_identifier(),
            _ => self.unexpected_token(vec1![
                TokenKind::LeftParen,
                TokenKind::Integer,
                TokenKind::Identifier,
            ]),
        }
    }

    fn parse_parens(&mut self) -> PResult {
        self.consume(TokenKind::LeftParen)?;
        let inner = self.parse_node()?;
        self.consume(TokenKind::RightParen)?;
        Ok(inner)
    }

    fn parse_integer(&mut self) -> PResult {
        self.consume(TokenKind::Integer)?;
        match self.lexer.slice().parse::<Int>() {
            Ok(x) => Ok(Node::Literal(Literal::Int(x))),
            Err(_) => self.error(ParseErrorKind::IntegerOutOfRange),
        }
    }

    fn parse_identifier(&mut self) -> PResult {
        self.consume(TokenKind::Identifier)?;
        let name = self.lexer.slice().to_owned();

        if !self.matches(TokenKind::LeftParen) {
            return Ok(Node::Symbol(Symbol::new(name)));
        }
        self.advance();

        let mut args = Vec::new();
        if !self.matches(TokenKind::RightParen) {
            args.push(self.parse_node()?);
            while self.matches(TokenKind::Comma) {
                self.advance();
                if self.matches(TokenKind::RightParen) {
                    break;
                }
                args.push(self.parse_node()?);
            }
        }
        self.consume(TokenKind::RightParen)?;

        Ok(Node::Call(Call::new(name, args)))
    }

    // Prefix operators recurse without passing through `parse_node`, so they
    // count toward the depth limit here.
    fn nested(&mut self, f: fn(&mut Self) -> PResult) -> PResult {
        self.depth += 1;
        if self.depth > self.max_depth {
            let max = self.max_depth;
            return self.error(ParseErrorKind::TooDeep { max });
        }
        let node = f(self);
        self.depth -= 1;
        node
    }
}

pub(crate) fn parse_with(s: &str, config: &EngineConfig) -> PResult<Expression> {
    if s.len() > config.max_formula_len {
        return Err(ParseError {
            kind: ParseErrorKind::TooLong {
                len: s.len(),
                max: config.max_formula_len,
            },
            span: 0..s.len(),
            slice: String::new(),
        });
    }
    Parser::new(s, config.max_depth).parse()
}
