use crate::ast::*;
use crate::error::SyntaxError;
use crate::lexer::{Token, TokenType, GLOBAL};
use crate::position::Position;

/// How many expressions may enclose one another below the root.
pub const MAX_DEPTH: usize = 128;

/// A recursive descent parser over the lexer's token stream, with one token of
/// lookahead.
#[derive(Debug)]
pub struct Parser<'a> {
    tokens: &'a [Token],
    position: usize,
    depth: usize,
}

impl<'a> Parser<'a> {
    pub fn new(tokens: &'a [Token]) -> Self {
        Self {
            tokens,
            position: 0,
            depth: 0,
        }
    }

    // === Main Parsing Methods ===

    ///    Root ::= "#GLOBAL" "=" Array
    pub fn parse_ast(&mut self) -> Result<Ast, SyntaxError> {
        let variable = self.parse_variable()?;
        self.expect_equals()?;
        let body = self.parse_array()?;

        let position = variable.position.clone();
        let root = Expression::new(
            ExpressionKind::Assignment(Assignment {
                variable,
                value: Box::new(body),
            }),
            position,
        );
        let ast = Ast::from_expression(root)?;

        if let Some(token) = self.current_token() {
            return Err(SyntaxError::TrailingToken {
                found: token.ttype.describe(),
                position: token.position.clone(),
            });
        }
        Ok(ast)
    }

    /// Expression ::= Array | Assignment | String | Number | Symbol
    fn parse_expression(&mut self) -> Result<Expression, SyntaxError> {
        if self.depth == MAX_DEPTH {
            return Err(SyntaxError::NestingTooDeep {
                limit: MAX_DEPTH,
                position: self
                    .current_token()
                    .map_or_else(|| self.eof_position(), |token| token.position.clone()),
            });
        }
        self.depth += 1;
        let expression = self.parse_nested_expression();
        self.depth -= 1;
        expression
    }

    fn parse_nested_expression(&mut self) -> Result<Expression, SyntaxError> {
        let token = self
            .current_token()
            .ok_or_else(|| SyntaxError::ExpectedExpressionGotEof {
                position: self.eof_position(),
            })?;

        match &token.ttype {
            TokenType::OpenBrace => self.parse_array(),
            TokenType::Symbol(_) if self.peek_is(&TokenType::Equals) => self.parse_assignment(),
            TokenType::String(s) => {
                self.advance();
                Ok(Expression::string(s.clone(), token.position.clone()))
            }
            TokenType::Number(n) => {
                self.advance();
                Ok(Expression::number(*n, token.position.clone()))
            }
            TokenType::Symbol(name) => {
                self.advance();
                Ok(Expression::variable(name.clone(), token.position.clone()))
            }
            other => Err(SyntaxError::ExpectedExpressionGotToken {
                found: other.describe(),
                position: token.position.clone(),
            }),
        }
    }

    /// Array ::= "{" { Expression } "}"
    fn parse_array(&mut self) -> Result<Expression, SyntaxError> {
        let open = self.current_token().ok_or_else(|| SyntaxError::ExpectedOpenGotEof {
            position: self.eof_position(),
        })?;
        if open.ttype != TokenType::OpenBrace {
            return Err(SyntaxError::ExpectedOpenGotToken {
                found: open.ttype.describe(),
                position: open.position.clone(),
            });
        }
        self.advance();

        let mut values = Vec::new();
        loop {
            let token = self.current_token().ok_or_else(|| {
                let position = self.eof_position();
                if values.is_empty() {
                    SyntaxError::ExpectedExpressionOrCloseGotEof { position }
                } else {
                    SyntaxError::ExpectedCloseGotEof { position }
                }
            })?;
            if token.ttype == TokenType::CloseBrace {
                self.advance();
                break;
            }
            values.push(self.parse_expression()?);
        }

        Ok(Expression::array(values, open.position.clone()))
    }

    /// Assignment ::= Symbol "=" Expression
    fn parse_assignment(&mut self) -> Result<Expression, SyntaxError> {
        let variable = self.parse_variable()?;
        self.expect_equals()?;
        let value = self.parse_expression()?;

        let position = variable.position.clone();
        Ok(Expression::new(
            ExpressionKind::Assignment(Assignment {
                variable,
                value: Box::new(value),
            }),
            position,
        ))
    }

    fn parse_variable(&mut self) -> Result<Variable, SyntaxError> {
        let token = self
            .current_token()
            .ok_or_else(|| SyntaxError::ExpectedVariableGotEof {
                position: self.eof_position(),
            })?;
        match &token.ttype {
            TokenType::Symbol(name) => {
                self.advance();
                Ok(Variable {
                    name: name.clone(),
                    position: token.position.clone(),
                })
            }
            other => Err(SyntaxError::ExpectedVariableGotToken {
                found: other.describe(),
                position: token.position.clone(),
            }),
        }
    }

    fn expect_equals(&mut self) -> Result<(), SyntaxError> {
        let token = self
            .current_token()
            .ok_or_else(|| SyntaxError::ExpectedAssignmentGotEof {
                position: self.eof_position(),
            })?;
        if token.ttype != TokenType::Equals {
            return Err(SyntaxError::ExpectedAssignmentGotToken {
                found: token.ttype.describe(),
                position: token.position.clone(),
            });
        }
        self.advance();
        Ok(())
    }

    // === Tokenizer Helper Methods ===

    fn current_token(&self) -> Option<&'a Token> {
        self.tokens.get(self.position)
    }

    fn advance(&mut self) {
        if self.position < self.tokens.len() {
            self.position += 1;
        }
    }

    fn peek_is(&self, ttype: &TokenType) -> bool {
        self.tokens
            .get(self.position + 1)
            .is_some_and(|token| std::mem::discriminant(&token.ttype) == std::mem::discriminant(ttype))
    }

    /// End-of-input errors point at the last token there was.
    fn eof_position(&self) -> Position {
        self.tokens
            .last()
            .map(|token| token.position.clone())
            .unwrap_or_else(|| Position::new(""))
    }
}

/// Parses a full token stream (prologue included) into an [`Ast`].
pub fn encode(tokens: &[Token]) -> Result<Ast, SyntaxError> {
    Parser::new(tokens).parse_ast()
}

/// Flattens an [`Ast`] back into tokens, `#GLOBAL = {` prologue included.
/// Each token takes the position of the expression it came from.
pub fn decode(ast: &Ast) -> Vec<Token> {
    let mut tokens = vec![
        Token::new(TokenType::Symbol(GLOBAL.to_string()), ast.position.clone()),
        Token::new(TokenType::Equals, ast.position.clone()),
        Token::new(TokenType::OpenBrace, ast.position.clone()),
    ];
    for definition in &ast.definitions {
        decode_expression(definition, &mut tokens);
    }
    tokens.push(Token::new(TokenType::CloseBrace, ast.position.clone()));
    tokens
}

fn decode_expression(expression: &Expression, tokens: &mut Vec<Token>) {
    let position = || expression.position.clone();
    match &expression.kind {
        ExpressionKind::Number(n) => tokens.push(Token::new(TokenType::Number(*n), position())),
        ExpressionKind::String(s) => {
            tokens.push(Token::new(TokenType::String(s.clone()), position()))
        }
        ExpressionKind::Variable(name) => {
            tokens.push(Token::new(TokenType::Symbol(name.clone()), position()))
        }
        ExpressionKind::Array(values) => {
            tokens.push(Token::new(TokenType::OpenBrace, position()));
            for value in values {
                decode_expression(value, tokens);
            }
            tokens.push(Token::new(TokenType::CloseBrace, position()));
        }
        ExpressionKind::Assignment(Assignment { variable, value }) => {
            tokens.push(Token::new(
                TokenType::Symbol(variable.name.clone()),
                variable.position.clone(),
            ));
            tokens.push(Token::new(TokenType::Equals, variable.position.clone()));
            decode_expression(value, tokens);
        }
    }
}
