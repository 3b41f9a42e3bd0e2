use crate::ast::{Assignment, Ast, Expression, ExpressionKind, Variable};
use crate::config::Config;
use crate::error::InterpretError;
use crate::lexer;
use crate::position::Position;
use crate::value::Value;
use std::path::PathBuf;

/// A typed model that can be written back to the file it was read from.
pub trait Model {
    /// Where the model was read from. Only `filepath` is used for write-back.
    fn position(&self) -> &Position;

    /// Whether the model was changed since it was loaded.
    fn is_modified(&self) -> bool;
}

/// Translates between a parsed file and one domain's typed models.
///
/// `encode` must reject top-level entries that are not `name = { ... }` and
/// block entries that are not assignments; [`definitions`] does both.
/// `decode` builds the file body back, one definition per model.
pub trait Interpreter {
    type Model: Model;

    fn encode(&self, ast: Ast) -> Result<Vec<Self::Model>, InterpretError>;

    fn decode(&self, models: &[&Self::Model], position: Position)
        -> Result<Ast, InterpretError>;

    /// The folder this domain's files live in.
    fn source_path(&self, config: &Config) -> PathBuf;
}

/// Interprets an expression without a schema.
///
/// An array becomes `Value::Array` whatever it holds; an array of
/// assignments is therefore an array of pairs, i.e. a record.
pub fn to_value(expression: &Expression) -> Value {
    match &expression.kind {
        ExpressionKind::Number(n) => Value::Number(*n),
        ExpressionKind::String(s) => Value::String(s.clone()),
        ExpressionKind::Variable(name) => Value::String(name.clone()),
        ExpressionKind::Array(values) => Value::Array(values.iter().map(to_value).collect()),
        ExpressionKind::Assignment(Assignment { variable, value }) => {
            Value::pair(variable.name.clone(), to_value(value))
        }
    }
}

/// The inverse of [`to_value`]. Every node gets `position`.
///
/// Absent entries (`Null` elements, or pairs whose value is `Null`) are dropped
/// from arrays. A `Null` anywhere else cannot be written and is an error.
/// So is anything the lexer would not read back: a string holding a quote or
/// a line break, a key that is not an identifier, or a non-finite number.
pub fn from_value(value: &Value, position: &Position) -> Result<Expression, InterpretError> {
    let unsupported = |found: &'static str| InterpretError::UnsupportedValue {
        found,
        position: position.clone(),
    };
    let expression = match value {
        Value::Number(n) if !n.is_finite() => return Err(unsupported("a non-finite number")),
        Value::Number(n) => Expression::number(*n, position.clone()),
        Value::String(s) if s.contains(['"', '\n', '\r']) => {
            return Err(unsupported("a string with a quote or line break"))
        }
        Value::String(s) => Expression::string(s.clone(), position.clone()),
        Value::Array(values) => {
            let values = values
                .iter()
                .filter(|value| !is_absent(value))
                .map(|value| from_value(value, position))
                .collect::<Result<Vec<_>, _>>()?;
            Expression::array(values, position.clone())
        }
        Value::Pair(key, _) if !lexer::is_symbol(key) => {
            return Err(unsupported("a key that is not an identifier"))
        }
        Value::Pair(key, value) => {
            Expression::assignment(key.clone(), from_value(value, position)?, position.clone())
        }
        Value::Null => return Err(unsupported(value.type_name())),
    };
    Ok(expression)
}

fn is_absent(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Pair(_, value) => value.is_null(),
        _ => false,
    }
}

/// The `name = { field = value ... }` blocks of a file.
///
/// Errors on any top-level entry that is not an assignment, any definition
/// whose value is not an array, and any array entry that is not an assignment.
pub fn definitions(ast: &Ast) -> Result<Vec<(&Variable, Vec<&Assignment>)>, InterpretError> {
    ast.definitions
        .iter()
        .map(|definition| {
            let Assignment { variable, value } =
                definition
                    .as_assignment()
                    .ok_or_else(|| InterpretError::ExpectedDefinition {
                        found: definition.kind_name(),
                        position: definition.position.clone(),
                    })?;
            let entries = value.as_array().ok_or_else(|| InterpretError::ExpectedArray {
                found: value.kind_name(),
                position: value.position.clone(),
            })?;
            let fields = entries
                .iter()
                .map(|entry| {
                    entry
                        .as_assignment()
                        .ok_or_else(|| InterpretError::ExpectedAssignment {
                            found: entry.kind_name(),
                            position: entry.position.clone(),
                        })
                })
                .collect::<Result<Vec<_>, _>>()?;
            Ok((variable, fields))
        })
        .collect()
}
