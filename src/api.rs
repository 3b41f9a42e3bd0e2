use crate::ast::Ast;
use crate::error::PdxError;
use crate::interpreter::{self, Interpreter};
use crate::position::Position;
use crate::value::Value;
use crate::{lexer, parser};
use miette::{NamedSource, Report};
use std::path::{Path, PathBuf};

/// Tokenizes and parses `source`.
///
/// This is the primary entry point for reading a file's text. `file_name` is
/// only used for positions, so diagnostics read `file_name:line:column`.
///
/// # Errors
///
/// Returns a [`PdxError::Lex`] or [`PdxError::Syntax`] for malformed input.
pub fn parse(source: &str, file_name: impl Into<PathBuf>) -> Result<Ast, PdxError> {
    let tokens = lexer::encode(source, Position::new(file_name))?;
    Ok(parser::encode(&tokens)?)
}

/// Renders an [`Ast`] back to text.
#[must_use]
pub fn to_text(ast: &Ast) -> String {
    lexer::decode(&parser::decode(ast))
}

/// Parses `source` and reads its top level without a schema: an array with
/// one pair per definition.
pub fn to_value(source: &str, file_name: impl Into<PathBuf>) -> Result<Value, PdxError> {
    let ast = parse(source, file_name)?;
    Ok(Value::Array(
        ast.definitions.iter().map(interpreter::to_value).collect(),
    ))
}

/// Parses `source` and hands it to a domain interpreter.
pub fn interpret<I: Interpreter>(
    source: &str,
    file_name: impl Into<PathBuf>,
    interpreter: &I,
) -> Result<Vec<I::Model>, PdxError> {
    let ast = parse(source, file_name)?;
    Ok(interpreter.encode(ast)?)
}

/// The inverse of [`interpret`]: models to text.
pub fn render<I: Interpreter>(
    models: &[&I::Model],
    file_name: impl Into<PathBuf>,
    interpreter: &I,
) -> Result<String, PdxError> {
    let ast = interpreter.decode(models, Position::new(file_name))?;
    Ok(to_text(&ast))
}

/// Wraps `err` in a [`Report`] that carries the text it was read from, so
/// the labelled position is printed with the offending line underneath.
///
/// `source` and `file_name` must be what was passed to [`parse`] or
/// [`interpret`].
pub fn report(err: PdxError, source: &str, file_name: impl AsRef<Path>) -> Report {
    let name = file_name.as_ref().display().to_string();
    Report::new(err).with_source_code(NamedSource::new(name, source.to_string()))
}
