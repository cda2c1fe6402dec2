use crate::ast::{Expr, SPREAD};
use crate::lexer::{tokenize, LexError, SpannedToken, Token};

/// Parser error types.
#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("lex error: {0}")]
    Lex(#[from] LexError),
    #[error("unexpected token: {found} at position {position}, expected: {expected}")]
    UnexpectedToken {
        found: String,
        expected: String,
        position: usize,
    },
    #[error("unexpected end of input")]
    UnexpectedEof,
}

/// Parse a GROQ query string into an AST.
pub fn parse(input: &str) -> Result<Expr, ParseError> {
    let tokens = tokenize(input)?;
    let mut parser = Parser::new(tokens);
    let expr = parser.parse_expr()?;
    parser.expect(&Token::Eof)?;
    tracing::trace!(query = input, "parsed GROQ query");
    Ok(expr)
}

struct Parser {
    tokens: Vec<SpannedToken>,
    pos: usize,
}

impl Parser {
    fn new(tokens: Vec<SpannedToken>) -> Self {
        Self { tokens, pos: 0 }
    }

    fn peek(&self) -> &Token {
        self.peek_at(0)
    }

    fn peek_at(&self, offset: usize) -> &Token {
        self.tokens
            .get(self.pos + offset)
            .map(|t| &t.token)
            .unwrap_or(&Token::Eof)
    }

    fn position(&self) -> usize {
        self.tokens
            .get(self.pos)
            .or_else(|| self.tokens.last())
            .map(|t| t.span.start)
            .unwrap_or(0)
    }

    fn advance(&mut self) -> Token {
        let token = self.peek().clone();
        self.pos += 1;
        token
    }

    fn eat(&mut self, token: &Token) -> bool {
        if self.peek() == token {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn unexpected(&self, expected: &str) -> ParseError {
        match self.peek() {
            Token::Eof if expected != "end of input" => ParseError::UnexpectedEof,
            found => ParseError::UnexpectedToken {
                found: found.to_string(),
                expected: expected.to_string(),
                position: self.position(),
            },
        }
    }

    fn expect(&mut self, expected: &Token) -> Result<(), ParseError> {
        if self.eat(expected) {
            Ok(())
        } else if expected == &Token::Eof {
            Err(self.unexpected("end of input"))
        } else {
            Err(self.unexpected(&expected.to_string()))
        }
    }

    fn parse_expr(&mut self) -> Result<Expr, ParseError> {
        self.parse_or()
    }

    fn parse_or(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_and()?;
        while self.eat(&Token::Or) {
            let right = self.parse_and()?;
            left = Expr::Or(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_and(&mut self) -> Result<Expr, ParseError> {
        let mut left = self.parse_comparison()?;
        while self.eat(&Token::And) {
            let right = self.parse_comparison()?;
            left = Expr::And(Box::new(left), Box::new(right));
        }
        Ok(left)
    }

    fn parse_comparison(&mut self) -> Result<Expr, ParseError> {
        let left = self.parse_unary()?;

        let op: fn(Box<Expr>, Box<Expr>) -> Expr = match self.peek() {
            Token::Eq => Expr::Eq,
            Token::Neq => Expr::Neq,
            Token::In => Expr::In,
            _ => return Ok(left),
        };
        self.advance();
        let right = self.parse_unary()?;
        Ok(op(Box::new(left), Box::new(right)))
    }

    fn parse_unary(&mut self) -> Result<Expr, ParseError> {
        if self.eat(&Token::Not) {
            let inner = self.parse_unary()?;
            return Ok(Expr::Not(Box::new(inner)));
        }
        let primary = self.parse_primary()?;
        self.parse_postfix(primary)
    }

    fn parse_primary(&mut self) -> Result<Expr, ParseError> {
        match self.peek().clone() {
            Token::Star => {
                self.advance();
                Ok(Expr::Everything)
            }
            Token::Ident(name) => {
                self.advance();
                if let Some(param) = name.strip_prefix('$') {
                    return Ok(Expr::Param(param.to_string()));
                }
                if self.eat(&Token::LParen) {
                    let args = self.parse_list(&Token::RParen)?;
                    return Ok(Expr::FuncCall(name, args));
                }
                Ok(Expr::Ident(name))
            }
            Token::String(s) => {
                self.advance();
                Ok(Expr::StringLiteral(s))
            }
            Token::Integer(n) => {
                self.advance();
                Ok(Expr::IntLiteral(n))
            }
            Token::Bool(b) => {
                self.advance();
                Ok(Expr::BoolLiteral(b))
            }
            Token::Null => {
                self.advance();
                Ok(Expr::Null)
            }
            Token::LParen => {
                self.advance();
                let expr = self.parse_expr()?;
                self.expect(&Token::RParen)?;
                Ok(expr)
            }
            Token::LBracket => {
                self.advance();
                let items = self.parse_list(&Token::RBracket)?;
                Ok(Expr::Array(items))
            }
            Token::LBrace => {
                self.advance();
                let fields = self.parse_projection()?;
                Ok(Expr::Object(fields))
            }
            _ => Err(self.unexpected("expression")),
        }
    }

    /// Attribute access, dereferences, `[...]` stages, projections and
    /// `| order(...)` pipes following a primary expression.
    fn parse_postfix(&mut self, base: Expr) -> Result<Expr, ParseError> {
        let mut expr = base;
        let mut stages = Vec::new();

        loop {
            match self.peek() {
                Token::Dot => {
                    self.advance();
                    let field = self.parse_field_name()?;
                    expr = Expr::DotAccess(Box::new(wrap(expr, &mut stages)), field);
                }
                Token::Arrow => {
                    self.advance();
                    let field = self.parse_field_name()?;
                    expr = Expr::Deref(Box::new(wrap(expr, &mut stages)), field);
                }
                Token::LBracket => {
                    self.advance();
                    stages.push(self.parse_bracket()?);
                }
                Token::LBrace => {
                    self.advance();
                    stages.push(Expr::Projection(self.parse_projection()?));
                }
                Token::Pipe => {
                    self.advance();
                    stages.push(self.parse_pipe()?);
                }
                _ => break,
            }
        }

        Ok(wrap(expr, &mut stages))
    }

    fn parse_field_name(&mut self) -> Result<String, ParseError> {
        match self.advance() {
            Token::Ident(field) => Ok(field),
            _ => {
                self.pos -= 1;
                Err(self.unexpected("field name"))
            }
        }
    }

    /// Contents of `[...]` after the opening bracket: an index or a filter.
    fn parse_bracket(&mut self) -> Result<Expr, ParseError> {
        if let Token::Integer(index) = *self.peek() {
            if self.peek_at(1) == &Token::RBracket {
                self.pos += 2;
                return Ok(Expr::Index(index));
            }
        }

        let filter = self.parse_expr()?;
        self.expect(&Token::RBracket)?;
        Ok(Expr::Filter(Box::new(filter)))
    }

    fn parse_pipe(&mut self) -> Result<Expr, ParseError> {
        match self.peek() {
            Token::Ident(name) if name == "order" => {
                self.advance();
                self.expect(&Token::LParen)?;
                let mut keys = Vec::new();
                loop {
                    let key = self.parse_expr()?;
                    let ascending = if self.eat(&Token::Desc) {
                        false
                    } else {
                        self.eat(&Token::Asc);
                        true
                    };
                    keys.push((key, ascending));
                    if !self.eat(&Token::Comma) {
                        break;
                    }
                }
                self.expect(&Token::RParen)?;
                Ok(Expr::Order(keys))
            }
            _ => Err(self.unexpected("order(...)")),
        }
    }

    /// Comma-separated expressions up to and including `close`.
    fn parse_list(&mut self, close: &Token) -> Result<Vec<Expr>, ParseError> {
        let mut items = Vec::new();
        while self.peek() != close {
            items.push(self.parse_expr()?);
            if !self.eat(&Token::Comma) {
                break;
            }
        }
        self.expect(close)?;
        Ok(items)
    }

    /// Fields of `{...}` after the opening brace, including the closing brace.
    fn parse_projection(&mut self) -> Result<Vec<(String, Expr)>, ParseError> {
        let mut fields = Vec::new();

        while self.peek() != &Token::RBrace {
            match self.peek().clone() {
                Token::Ellipsis => {
                    self.advance();
                    fields.push((SPREAD.to_string(), Expr::This));
                }
                Token::String(alias) if self.peek_at(1) == &Token::Colon => {
                    self.pos += 2;
                    let expr = self.parse_expr()?;
                    fields.push((alias, expr));
                }
                Token::Ident(name) if self.peek_at(1) == &Token::Colon => {
                    self.pos += 2;
                    let expr = self.parse_expr()?;
                    fields.push((name, expr));
                }
                Token::Ident(_) => {
                    let expr = self.parse_expr()?;
                    let name = implicit_name(&expr)
                        .ok_or_else(|| self.unexpected("named projection field"))?;
                    fields.push((name, expr));
                }
                _ => return Err(self.unexpected("projection field")),
            }

            if !self.eat(&Token::Comma) {
                break;
            }
        }

        self.expect(&Token::RBrace)?;
        Ok(fields)
    }
}

/// Fold collected stages onto `expr`.
fn wrap(expr: Expr, stages: &mut Vec<Expr>) -> Expr {
    if stages.is_empty() {
        return expr;
    }
    let mut pipeline = Vec::with_capacity(stages.len() + 1);
    pipeline.push(expr);
    pipeline.append(stages);
    Expr::Pipeline(pipeline)
}

/// Field name GROQ derives for an unaliased projection entry:
/// `title` → `title`, `mainImage{...}` → `mainImage`.
fn implicit_name(expr: &Expr) -> Option<String> {
    match expr {
        Expr::Ident(name) => Some(name.clone()),
        Expr::Pipeline(stages) => stages.first().and_then(implicit_name),
        _ => None,
    }
}
