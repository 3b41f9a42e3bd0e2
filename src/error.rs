use crate::position::Position;
use miette::Diagnostic;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum PdxError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Lex(#[from] LexError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Syntax(#[from] SyntaxError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Interpret(#[from] InterpretError),

    #[error("Could not access '{}'", .path.display())]
    #[diagnostic(
        code(engine::io),
        help("Check that the path exists and is readable (or writable when saving).")
    )]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Could not read config file '{}'", .path.display())]
    #[diagnostic(
        code(config::invalid),
        help("The config file must be a JSON object with `source_root` and `output_root`.")
    )]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("'{}' is not under the source root '{}'", .path.display(), .root.display())]
    #[diagnostic(
        code(engine::outside_source_root),
        help("Models can only be written back when they were loaded from below `source_root`.")
    )]
    OutsideSourceRoot { path: PathBuf, root: PathBuf },
}

impl PdxError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        PdxError::Io {
            path: path.into(),
            source,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum LexError {
    #[error("Unexpected character '{character}' at {position}")]
    #[diagnostic(
        code(lexer::unexpected_character),
        help("Only `{{`, `}}`, `=`, `#` comments, quoted strings, numbers and identifiers are allowed.")
    )]
    UnexpectedCharacter {
        character: char,
        #[label("not allowed here")]
        position: Position,
    },

    #[error("Unfinished string at {position}")]
    #[diagnostic(
        code(lexer::unterminated_string),
        help("Strings must be closed with a `\"` on the same line.")
    )]
    UnterminatedString {
        #[label("string starts here")]
        position: Position,
    },

    #[error("Attempted to read '{literal}' as a number at {position}")]
    #[diagnostic(
        code(lexer::invalid_number),
        help("Numbers are an optional sign followed by digits with an optional fraction, e.g. `-0.5`.")
    )]
    InvalidNumber {
        literal: String,
        #[label("number starts here")]
        position: Position,
    },

    #[error("Attempted to read a non-identifier as an identifier at {position}")]
    #[diagnostic(
        code(lexer::invalid_symbol),
        help("Identifiers are ASCII letters, digits and `_`, and cannot start with a digit. Quote any other text.")
    )]
    InvalidSymbol {

        #[label("not an identifier")]
        position: Position,
    },
}

impl LexError {
    pub fn position(&self) -> &Position {
        match self {
            LexError::UnexpectedCharacter { position, .. }
            | LexError::UnterminatedString { position }
            | LexError::InvalidNumber { position, .. }
            | LexError::InvalidSymbol { position } => position,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum SyntaxError {
    #[error("Expected '{{', got end of file at {position}")]
    #[diagnostic(code(parser::expected_open_got_eof))]
    ExpectedOpenGotEof {

        #[label("file ends here")]
        position: Position,
    },

    #[error("Expected '{{', got {found} at {position}")]
    #[diagnostic(code(parser::expected_open))]
    ExpectedOpenGotToken {
        found: &'static str,
        #[label("expected '{{' here")]
        position: Position,
    },

    #[error("Expected an expression or '}}', got end of file at {position}")]
    #[diagnostic(
        code(parser::expected_expression_or_close_got_eof),
        help("A block was opened with `{{` but the file ended before it was closed.")
    )]
    ExpectedExpressionOrCloseGotEof {

        #[label("file ends here")]
        position: Position,
    },

    #[error("Expected '}}', got end of file at {position}")]
    #[diagnostic(
        code(parser::expected_close_got_eof),
        help("A block was opened with `{{` but the file ended before it was closed.")
    )]
    ExpectedCloseGotEof {

        #[label("file ends here")]
        position: Position,
    },

    #[error("Expected an expression, got end of file at {position}")]
    #[diagnostic(code(parser::expected_expression_got_eof))]
    ExpectedExpressionGotEof {

        #[label("file ends here")]
        position: Position,
    },

    #[error("Expected an expression, got {found} at {position}")]
    #[diagnostic(
        code(parser::expected_expression),
        help("Values are a number, a string, an identifier or a `{{ ... }}` block.")
    )]
    ExpectedExpressionGotToken {
        found: &'static str,
        #[label("expected a value here")]
        position: Position,
    },

    #[error("Expected a variable, got end of file at {position}")]
    #[diagnostic(code(parser::expected_variable_got_eof))]
    ExpectedVariableGotEof {

        #[label("file ends here")]
        position: Position,
    },

    #[error("Expected a variable, got {found} at {position}")]
    #[diagnostic(code(parser::expected_variable))]
    ExpectedVariableGotToken {
        found: &'static str,
        #[label("expected a name here")]
        position: Position,
    },

    #[error("Expected '=', got end of file at {position}")]
    #[diagnostic(code(parser::expected_assignment_got_eof))]
    ExpectedAssignmentGotEof {

        #[label("file ends here")]
        position: Position,
    },

    #[error("Expected '=', got {found} at {position}")]
    #[diagnostic(code(parser::expected_assignment))]
    ExpectedAssignmentGotToken {
        found: &'static str,
        #[label("expected '=' here")]
        position: Position,
    },

    #[error("Expected the '#GLOBAL' root assignment, got {found} at {position}")]
    #[diagnostic(
        code(parser::expected_ast),
        help("Token streams must start with the `#GLOBAL = {{` prologue produced by the lexer.")
    )]
    ExpectedAst {
        found: &'static str,
        #[label("root starts here")]
        position: Position,
    },

    #[error("Unexpected {found} after the end of the file body at {position}")]
    #[diagnostic(
        code(parser::trailing_token),
        help("There is probably one `}}` too many above this point.")
    )]
    TrailingToken {
        found: &'static str,
        #[label("outside the file body")]
        position: Position,
    },

    #[error("Blocks nested deeper than {limit} levels at {position}")]
    #[diagnostic(
        code(parser::nesting_too_deep),
        help("Game files never nest this deep. Check for a run of unclosed `{{`.")
    )]
    NestingTooDeep {
        limit: usize,
        #[label("too deep")]
        position: Position,
    },
}

impl SyntaxError {
    pub fn position(&self) -> &Position {
        match self {
            SyntaxError::ExpectedOpenGotEof { position }
            | SyntaxError::ExpectedOpenGotToken { position, .. }
            | SyntaxError::ExpectedExpressionOrCloseGotEof { position }
            | SyntaxError::ExpectedCloseGotEof { position }
            | SyntaxError::ExpectedExpressionGotEof { position }
            | SyntaxError::ExpectedExpressionGotToken { position, .. }
            | SyntaxError::ExpectedVariableGotEof { position }
            | SyntaxError::ExpectedVariableGotToken { position, .. }
            | SyntaxError::ExpectedAssignmentGotEof { position }
            | SyntaxError::ExpectedAssignmentGotToken { position, .. }
            | SyntaxError::ExpectedAst { position, .. }
            | SyntaxError::TrailingToken { position, .. }
            | SyntaxError::NestingTooDeep { position, .. } => position,
        }
    }
}

#[derive(Error, Debug, Diagnostic, Clone, PartialEq)]
pub enum InterpretError {
    #[error("Expected a definition, got {found} at {position}")]
    #[diagnostic(
        code(interpreter::expected_definition),
        help("Top-level entries must look like `name = {{ ... }}`.")
    )]
    ExpectedDefinition {
        found: &'static str,
        #[label("not a definition")]
        position: Position,
    },

    #[error("Expected an array, got {found} at {position}")]
    #[diagnostic(code(interpreter::expected_array))]
    ExpectedArray {
        found: &'static str,
        #[label("expected a block here")]
        position: Position,
    },

    #[error("Expected an assignment, got {found} at {position}")]
    #[diagnostic(code(interpreter::expected_assignment))]
    ExpectedAssignment {
        found: &'static str,
        #[label("expected `key = value` here")]
        position: Position,
    },

    #[error("Expected field '{field}' in definition at {position}")]
    #[diagnostic(code(interpreter::missing_field))]
    MissingField {
        field: String,
        #[label("in this definition")]
        position: Position,
    },

    #[error("Expected {field} to be {expected}, got {found} in definition at {position}")]
    #[diagnostic(code(interpreter::type_mismatch))]
    TypeMismatch {
        field: String,
        expected: &'static str,
        found: &'static str,
        #[label("in this definition")]
        position: Position,
    },

    #[error("Cannot write {found} as an expression at {position}")]
    #[diagnostic(
        code(interpreter::unsupported_value),
        help("Absent values are only allowed inside arrays and records, where they are dropped. Strings cannot hold `\"` or line breaks, keys must be identifiers and numbers must be finite.")
    )]
    UnsupportedValue {
        found: &'static str,
        #[label("written here")]
        position: Position,
    },
}
