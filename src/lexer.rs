use crate::error::LexError;
use crate::position::Position;

/// Name of the synthetic assignment that wraps every file.
///
/// It can never come out of symbol scanning because identifiers cannot start
/// with `#`.
pub const GLOBAL: &str = "#GLOBAL";

/// Represents the different kinds of tokens that the lexer can produce.
#[derive(Debug, PartialEq, Clone)]
pub enum TokenType {
    // == Literals ==
    /// Left Brace: `{`
    OpenBrace,
    /// Right Brace: `}`
    CloseBrace,
    /// Equals: `=`
    Equals,
    /// Hash: `#`. Comments are discarded while scanning, so the lexer never
    /// emits this; it only exists for hand-built token streams.
    Comment,

    // == Symbolic ==
    /// A number literal, always held as a float. Examples: `5`, `-0.25`, `.5`.
    Number(f64),
    /// A quoted string with the quotes removed, or a hex identifier such as
    /// `x39CACA` (which keeps its leading `x`).
    String(String),
    /// An identifier. Examples: `state_region`, `_tmp`, `STATE_BRITTANY`.
    Symbol(String),
}

impl TokenType {
    /// Short human name used in diagnostics.
    pub fn describe(&self) -> &'static str {
        match self {
            TokenType::OpenBrace => "'{'",
            TokenType::CloseBrace => "'}'",
            TokenType::Equals => "'='",
            TokenType::Comment => "'#'",
            TokenType::Number(_) => "number",
            TokenType::String(_) => "string",
            TokenType::Symbol(_) => "symbol",
        }
    }
}

/// A token with its type and position
#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub ttype: TokenType,
    pub position: Position,
}

impl Token {
    pub fn new(ttype: TokenType, position: Position) -> Token {
        Token { ttype, position }
    }
}

/// Line based scanner. Each line is walked column by column; a `#` ends the
/// line.
pub struct Lexer<'a> {
    input: &'a str,
    position: Position,
}

impl<'a> Lexer<'a> {
    pub fn new(input: &'a str, start: Position) -> Self {
        Self {
            input,
            position: start,
        }
    }

    pub fn lex(&mut self) -> Result<Vec<Token>, LexError> {
        let mut tokens = vec![
            self.token(TokenType::Symbol(GLOBAL.to_string())),
            self.token(TokenType::Equals),
            self.token(TokenType::OpenBrace),
        ];

        let start = self.position.offset;
        let mut line_start = start;
        for line in self.input.split('\n') {
            self.position.offset = line_start;
            let chars: Vec<char> = line.chars().collect();
            self.lex_line(&chars, &mut tokens)?;
            self.position.next_line();
            line_start += line.len() + 1;
        }

        self.position.offset = start + self.input.len();
        tokens.push(self.token(TokenType::CloseBrace));
        Ok(tokens)
    }

    fn lex_line(&mut self, line: &[char], tokens: &mut Vec<Token>) -> Result<(), LexError> {
        let mut cursor = 0;
        while let Some(&c) = line.get(cursor) {
            let rest = &line[cursor..];
            let (ttype, length) = match c {
                c if is_blank(c) => {
                    self.position.advance(&rest[..1]);
                    cursor += 1;
                    continue;
                }
                '#' => break,
                '{' => (TokenType::OpenBrace, 1),
                '}' => (TokenType::CloseBrace, 1),
                '=' => (TokenType::Equals, 1),
                '"' => self.read_string(rest)?,
                'x' if is_hex_identifier(rest) => {
                    (TokenType::String(rest[..HEX_ID_LEN].iter().collect()), HEX_ID_LEN)
                }
                c if c.is_ascii_digit() || matches!(c, '+' | '-' | '.') => {
                    self.read_number(rest)?
                }
                c if c.is_alphabetic() || c == '_' => self.read_symbol(rest)?,
                character => {
                    return Err(LexError::UnexpectedCharacter {
                        character,
                        position: self.position.clone(),
                    })
                }
            };
            tokens.push(self.token(ttype));
            self.position.advance(&rest[..length]);
            cursor += length;
        }
        Ok(())
    }

    fn token(&self, ttype: TokenType) -> Token {
        Token::new(ttype, self.position.clone())
    }

    fn read_string(&self, rest: &[char]) -> Result<(TokenType, usize), LexError> {
        let close = rest[1..]
            .iter()
            .position(|&c| c == '"')
            .ok_or_else(|| LexError::UnterminatedString {
                position: self.position.clone(),
            })?;
        let value: String = rest[1..=close].iter().collect();
        Ok((TokenType::String(value), close + 2))
    }

    /// Matches `[+-]? \s* \d* (\.\d+)?` with at least one digit, then parses
    /// the candidate exactly as written. A sign followed by whitespace is
    /// accepted by the scan but fails the parse.
    fn read_number(&self, rest: &[char]) -> Result<(TokenType, usize), LexError> {
        let mut end = 0;
        if matches!(rest.first(), Some('+' | '-')) {
            end += 1;
        }
        while rest.get(end).is_some_and(|&c| is_blank(c)) {
            end += 1;
        }
        let integer_digits = count_digits(&rest[end..]);
        end += integer_digits;

        let fraction_digits = match rest.get(end) {
            Some('.') => count_digits(&rest[end + 1..]),
            _ => 0,
        };
        if fraction_digits > 0 {
            end += 1 + fraction_digits;
        }

        let literal: String = rest[..end].iter().collect();
        if integer_digits + fraction_digits == 0 {
            return Err(self.invalid_number(literal, rest));
        }
        match literal.parse::<f64>() {
            Ok(value) => Ok((TokenType::Number(value), end)),
            Err(_) => Err(self.invalid_number(literal, rest)),
        }
    }

    fn invalid_number(&self, literal: String, rest: &[char]) -> LexError {
        let literal = if literal.trim().is_empty() {
            rest.first().map(char::to_string).unwrap_or_default()
        } else {
            literal
        };
        LexError::InvalidNumber {
            literal,
            position: self.position.clone(),
        }
    }

    fn read_symbol(&self, rest: &[char]) -> Result<(TokenType, usize), LexError> {
        match rest.first() {
            Some(c) if c.is_ascii_alphabetic() || *c == '_' => {}
            _ => {
                return Err(LexError::InvalidSymbol {
                    position: self.position.clone(),
                })
            }
        }
        let length = rest
            .iter()
            .take_while(|c| c.is_ascii_alphanumeric() || **c == '_')
            .count();
        Ok((TokenType::Symbol(rest[..length].iter().collect()), length))
    }
}

const HEX_ID_LEN: usize = 7;

/// Whitespace, plus the byte order mark game files are usually saved with.
fn is_blank(c: char) -> bool {
    c.is_whitespace() || c == '\u{feff}'
}

/// `x` followed by exactly six upper-case hex digits (a province handle).
fn is_hex_identifier(rest: &[char]) -> bool {
    rest.len() >= HEX_ID_LEN
        && rest[0] == 'x'
        && rest[1..HEX_ID_LEN]
            .iter()
            .all(|c| c.is_ascii_digit() || ('A'..='F').contains(c))
}

/// Whether `name` scans back as exactly one [`TokenType::Symbol`].
pub fn is_symbol(name: &str) -> bool {
    let chars: Vec<char> = name.chars().collect();
    matches!(chars.first(), Some(c) if c.is_ascii_alphabetic() || *c == '_')
        && chars.iter().all(|c| c.is_ascii_alphanumeric() || *c == '_')
        && !is_hex_identifier(&chars)
}

fn count_digits(chars: &[char]) -> usize {
    chars.iter().take_while(|c| c.is_ascii_digit()).count()
}

/// Scans `text` into tokens, wrapped in the `#GLOBAL = { ... }` prologue and
/// closing brace.
pub fn encode(text: &str, start: Position) -> Result<Vec<Token>, LexError> {
    Lexer::new(text, start).lex()
}

/// Renders tokens back to text, one entry per line, indented two spaces per
/// open block. The first three and the last token are taken to be the
/// `#GLOBAL` wrapper and are not rendered.
///
/// Strings are written between quotes as-is; a string containing `"` or a line
/// break does not survive a second scan.
pub fn decode(tokens: &[Token]) -> String {
    let body = tokens
        .len()
        .checked_sub(1)
        .and_then(|end| tokens.get(3..end))
        .unwrap_or_default();

    let mut text = String::new();
    let mut depth = 0usize;
    let mut after_equals = false;

    for token in body {
        match &token.ttype {
            TokenType::Equals => {
                text.push_str(" = ");
                after_equals = true;
                continue;
            }
            TokenType::Comment => continue,
            TokenType::OpenBrace => {
                if !after_equals {
                    new_line(&mut text, depth);
                }
                text.push('{');
                depth += 1;
            }
            TokenType::CloseBrace => {
                depth = depth.saturating_sub(1);
                new_line(&mut text, depth);
                text.push('}');
            }
            TokenType::Number(n) => {
                if !after_equals {
                    new_line(&mut text, depth);
                }
                text.push_str(&n.to_string());
            }
            TokenType::String(s) => {
                if !after_equals {
                    new_line(&mut text, depth);
                }
                text.push('"');
                text.push_str(s);
                text.push('"');
            }
            TokenType::Symbol(s) => {
                if !after_equals {
                    new_line(&mut text, depth);
                }
                text.push_str(s);
            }
        }
        after_equals = false;
    }

    if !text.is_empty() {
        text.push('\n');
    }
    text
}

fn new_line(text: &mut String, depth: usize) {
    if !text.is_empty() {
        text.push('\n');
    }
    text.push_str(&"  ".repeat(depth));
}
