use crate::error::SyntaxError;
use crate::lexer::GLOBAL;
use crate::position::Position;

#[derive(Debug, PartialEq, Clone)]
pub struct Expression {
    pub kind: ExpressionKind,
    pub position: Position,
}

#[derive(Debug, PartialEq, Clone)]
pub enum ExpressionKind {
    Number(f64),
    String(String),
    Variable(String),
    Array(Vec<Expression>),
    Assignment(Assignment),
}

#[derive(Debug, PartialEq, Clone)]
pub struct Variable {
    pub name: String,
    pub position: Position,
}

#[derive(Debug, PartialEq, Clone)]
pub struct Assignment {
    pub variable: Variable,
    pub value: Box<Expression>,
}

/// The root of a parsed file: `#GLOBAL = { <definitions> }`.
///
/// The wrapper is implied by the type, so an `Ast` can only ever hold the
/// top-level array of a file.
#[derive(Debug, PartialEq, Clone)]
pub struct Ast {
    pub definitions: Vec<Expression>,
    pub position: Position,
}

impl Expression {
    pub fn new(kind: ExpressionKind, position: Position) -> Self {
        Expression { kind, position }
    }

    pub fn number(value: f64, position: Position) -> Self {
        Self::new(ExpressionKind::Number(value), position)
    }

    pub fn string(value: impl Into<String>, position: Position) -> Self {
        Self::new(ExpressionKind::String(value.into()), position)
    }

    pub fn variable(name: impl Into<String>, position: Position) -> Self {
        Self::new(ExpressionKind::Variable(name.into()), position)
    }

    pub fn array(values: Vec<Expression>, position: Position) -> Self {
        Self::new(ExpressionKind::Array(values), position)
    }

    pub fn assignment(name: impl Into<String>, value: Expression, position: Position) -> Self {
        let assignment = Assignment {
            variable: Variable {
                name: name.into(),
                position: position.clone(),
            },
            value: Box::new(value),
        };
        Self::new(ExpressionKind::Assignment(assignment), position)
    }

    pub fn kind_name(&self) -> &'static str {
        self.kind.name()
    }

    pub fn as_assignment(&self) -> Option<&Assignment> {
        match &self.kind {
            ExpressionKind::Assignment(assignment) => Some(assignment),
            _ => None,
        }
    }

    pub fn as_array(&self) -> Option<&[Expression]> {
        match &self.kind {
            ExpressionKind::Array(values) => Some(values),
            _ => None,
        }
    }

    /// Equality that ignores every `Position` in both trees.
    pub fn structurally_eq(&self, other: &Expression) -> bool {
        match (&self.kind, &other.kind) {
            (ExpressionKind::Number(a), ExpressionKind::Number(b)) => a == b,
            (ExpressionKind::String(a), ExpressionKind::String(b))
            | (ExpressionKind::Variable(a), ExpressionKind::Variable(b)) => a == b,
            (ExpressionKind::Array(a), ExpressionKind::Array(b)) => all_structurally_eq(a, b),
            (ExpressionKind::Assignment(a), ExpressionKind::Assignment(b)) => {
                a.variable.name == b.variable.name && a.value.structurally_eq(&b.value)
            }
            _ => false,
        }
    }
}

impl ExpressionKind {
    pub fn name(&self) -> &'static str {
        match self {
            ExpressionKind::Number(_) => "number",
            ExpressionKind::String(_) => "string",
            ExpressionKind::Variable(_) => "variable",
            ExpressionKind::Array(_) => "array",
            ExpressionKind::Assignment(_) => "assignment",
        }
    }
}

impl Ast {
    pub fn new(definitions: Vec<Expression>, position: Position) -> Self {
        Ast {
            definitions,
            position,
        }
    }

    /// Checks that `expression` has the `#GLOBAL = { ... }` shape.
    pub fn from_expression(expression: Expression) -> Result<Ast, SyntaxError> {
        let not_an_ast = |expression: &Expression| SyntaxError::ExpectedAst {
            found: expression.kind_name(),
            position: expression.position.clone(),
        };

        let Expression { kind, position } = expression;
        match kind {
            ExpressionKind::Assignment(Assignment { variable, value })
                if variable.name == GLOBAL =>
            {
                match *value {
                    Expression {
                        kind: ExpressionKind::Array(definitions),
                        ..
                    } => Ok(Ast::new(definitions, position)),
                    other => Err(not_an_ast(&other)),
                }
            }
            kind => Err(not_an_ast(&Expression::new(kind, position))),
        }
    }

    /// The equivalent `#GLOBAL = { ... }` assignment.
    pub fn into_expression(self) -> Expression {
        let body = Expression::array(self.definitions, self.position.clone());
        Expression::assignment(GLOBAL, body, self.position)
    }

    pub fn structurally_eq(&self, other: &Ast) -> bool {
        all_structurally_eq(&self.definitions, &other.definitions)
    }
}

fn all_structurally_eq(a: &[Expression], b: &[Expression]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.structurally_eq(y))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pos(line: usize) -> Position {
        Position::at("test.txt", line, 1)
    }

    #[test]
    fn test_structural_equality_ignores_positions() {
        let a = Expression::assignment(
            "bar",
            Expression::array(vec![Expression::number(5.0, pos(1))], pos(1)),
            pos(1),
        );
        let b = Expression::assignment(
            "bar",
            Expression::array(vec![Expression::number(5.0, pos(9))], pos(8)),
            pos(7),
        );
        assert!(a.structurally_eq(&b));
        assert_ne!(a, b);
    }

    #[test]
    fn test_structural_equality_sees_shape() {
        let string = Expression::string("a", pos(1));
        let variable = Expression::variable("a", pos(1));
        assert!(!string.structurally_eq(&variable));

        let short = Expression::array(vec![], pos(1));
        let long = Expression::array(vec![Expression::number(1.0, pos(1))], pos(1));
        assert!(!short.structurally_eq(&long));
    }

    #[test]
    fn test_ast_from_expression_round_trip() {
        let ast = Ast::new(
            vec![Expression::assignment(
                "FOO",
                Expression::array(vec![], pos(1)),
                pos(1),
            )],
            pos(1),
        );
        let back = Ast::from_expression(ast.clone().into_expression()).unwrap();
        assert_eq!(back, ast);
    }

    #[test]
    fn test_ast_rejects_other_roots() {
        let err = Ast::from_expression(Expression::number(1.0, pos(3))).unwrap_err();
        assert_eq!(
            err,
            SyntaxError::ExpectedAst {
                found: "number",
                position: pos(3)
            }
        );

        let wrong_name =
            Expression::assignment("FOO", Expression::array(vec![], pos(1)), pos(1));
        assert!(Ast::from_expression(wrong_name).is_err());

        let scalar_body = Expression::assignment(GLOBAL, Expression::number(1.0, pos(2)), pos(1));
        let err = Ast::from_expression(scalar_body).unwrap_err();
        assert_eq!(err.position(), &pos(2));
    }
}
