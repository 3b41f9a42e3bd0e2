use crate::ast::Ast;
use crate::config::Config;
use crate::error::InterpretError;
use crate::interpreter::{self, Interpreter, Model};
use crate::position::Position;
use crate::value::Value;
use std::path::PathBuf;

/// One top-level `name = { ... }` block, kept as an ordered record.
///
/// Fields keep their file order and may repeat (`resource = { ... }` blocks
/// often do). Every mutating method sets the modified flag; reads never do.
#[derive(Debug, Clone, PartialEq)]
pub struct Definition {
    name: String,
    fields: Vec<(String, Value)>,
    position: Position,
    modified: bool,
}

impl Definition {
    /// A definition created in memory. It has never been saved, so it starts
    /// out modified.
    pub fn new(name: impl Into<String>, position: Position) -> Self {
        Definition {
            name: name.into(),
            fields: Vec::new(),
            position,
            modified: true,
        }
    }

    fn loaded(name: String, fields: Vec<(String, Value)>, position: Position) -> Self {
        Definition {
            name,
            fields,
            position,
            modified: false,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn fields(&self) -> &[(String, Value)] {
        &self.fields
    }

    /// The first value stored under `key`.
    pub fn get(&self, key: &str) -> Option<&Value> {
        self.fields.iter().find(|(k, _)| k == key).map(|(_, v)| v)
    }

    /// Every value stored under `key`, in file order.
    pub fn get_all<'a>(&'a self, key: &'a str) -> impl Iterator<Item = &'a Value> + 'a {
        self.fields
            .iter()
            .filter(move |(k, _)| k == key)
            .map(|(_, v)| v)
    }

    pub fn number(&self, key: &str) -> Result<f64, InterpretError> {
        let value = self.require(key)?;
        value.as_number().ok_or_else(|| self.mismatch(key, "a number", value))
    }

    pub fn string(&self, key: &str) -> Result<&str, InterpretError> {
        let value = self.require(key)?;
        value.as_str().ok_or_else(|| self.mismatch(key, "a string", value))
    }

    pub fn array(&self, key: &str) -> Result<&[Value], InterpretError> {
        let value = self.require(key)?;
        value.as_array().ok_or_else(|| self.mismatch(key, "an array", value))
    }

    fn require(&self, key: &str) -> Result<&Value, InterpretError> {
        self.get(key).ok_or_else(|| InterpretError::MissingField {
            field: format!("{}.{}", self.name, key),
            position: self.position.clone(),
        })
    }

    fn mismatch(&self, key: &str, expected: &'static str, found: &Value) -> InterpretError {
        InterpretError::TypeMismatch {
            field: format!("{}.{}", self.name, key),
            expected,
            found: found.type_name(),
            position: self.position.clone(),
        }
    }

    /// Replaces the first value under `key`, or appends one.
    pub fn set(&mut self, key: &str, value: impl Into<Value>) {
        let value = value.into();
        match self.fields.iter_mut().find(|(k, _)| k == key) {
            Some((_, slot)) => *slot = value,
            None => self.fields.push((key.to_string(), value)),
        }
        self.modified = true;
    }

    /// Appends a value under `key` even if the key is already present.
    pub fn push(&mut self, key: &str, value: impl Into<Value>) {
        self.fields.push((key.to_string(), value.into()));
        self.modified = true;
    }

    /// Removes every value under `key` and returns the first one.
    pub fn remove(&mut self, key: &str) -> Option<Value> {
        let mut removed = None;
        let mut kept = Vec::with_capacity(self.fields.len());
        for (k, v) in self.fields.drain(..) {
            if k == key {
                removed.get_or_insert(v);
            } else {
                kept.push((k, v));
            }
        }
        self.fields = kept;
        if removed.is_some() {
            self.modified = true;
        }
        removed
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Forgets pending changes, e.g. after the definition has been written.
    pub fn mark_clean(&mut self) {
        self.modified = false;
    }

    pub fn to_value(&self) -> Value {
        Value::record(self.fields.iter().map(|(k, v)| (k.as_str(), v.clone())))
    }
}

impl Model for Definition {
    fn position(&self) -> &Position {
        &self.position
    }

    fn is_modified(&self) -> bool {
        self.modified
    }
}

/// Reads any file of `name = { ... }` blocks into [`Definition`]s.
#[derive(Debug, Clone)]
pub struct DefinitionInterpreter {
    folder: PathBuf,
}

impl DefinitionInterpreter {
    /// `folder` is relative to the configured source root, e.g.
    /// `map_data/state_regions`.
    pub fn new(folder: impl Into<PathBuf>) -> Self {
        Self {
            folder: folder.into(),
        }
    }
}

impl Interpreter for DefinitionInterpreter {
    type Model = Definition;

    fn encode(&self, ast: Ast) -> Result<Vec<Definition>, InterpretError> {
        let definitions = interpreter::definitions(&ast)?
            .into_iter()
            .map(|(variable, fields)| {
                let fields = fields
                    .into_iter()
                    .map(|field| {
                        (
                            field.variable.name.clone(),
                            interpreter::to_value(&field.value),
                        )
                    })
                    .collect();
                Definition::loaded(variable.name.clone(), fields, variable.position.clone())
            })
            .collect();
        Ok(definitions)
    }

    fn decode(&self, models: &[&Definition], position: Position) -> Result<Ast, InterpretError> {
        let definitions = models
            .iter()
            .map(|model| {
                interpreter::from_value(
                    &Value::pair(model.name.clone(), model.to_value()),
                    &position,
                )
            })
            .collect::<Result<Vec<_>, InterpretError>>()?;
        Ok(Ast::new(definitions, position))
    }

    fn source_path(&self, config: &Config) -> PathBuf {
        config.source_root.join(&self.folder)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{lexer, parser};

    fn load(source: &str) -> Vec<Definition> {
        let tokens = lexer::encode(source, Position::new("states.txt")).unwrap();
        let ast = parser::encode(&tokens).unwrap();
        DefinitionInterpreter::new("states").encode(ast).unwrap()
    }

    const BRITTANY: &str = r#"
STATE_BRITTANY = {
    id = 12
    subsistence_building = "building_subsistence_farms"
    provinces = { x39CACA x1A2B3C }
    resource = { type = "building_coal_mine" }
    resource = { type = "building_iron_mine" }
}
"#;

    #[test]
    fn test_loaded_definitions_are_clean() {
        let states = load(BRITTANY);
        assert_eq!(states.len(), 1);
        let brittany = &states[0];
        assert_eq!(brittany.name(), "STATE_BRITTANY");
        assert!(!brittany.is_modified());
        assert_eq!(brittany.position(), &Position::at("states.txt", 2, 1));
    }

    #[test]
    fn test_typed_access() {
        let brittany = &load(BRITTANY)[0];
        assert_eq!(brittany.number("id").unwrap(), 12.0);
        assert_eq!(
            brittany.string("subsistence_building").unwrap(),
            "building_subsistence_farms"
        );
        assert_eq!(brittany.array("provinces").unwrap().len(), 2);
        assert_eq!(brittany.get_all("resource").count(), 2);
    }

    #[test]
    fn test_missing_and_mismatched_fields() {
        let brittany = &load(BRITTANY)[0];
        assert_eq!(
            brittany.number("naval_exit_id").unwrap_err(),
            InterpretError::MissingField {
                field: "STATE_BRITTANY.naval_exit_id".to_string(),
                position: Position::at("states.txt", 2, 1),
            }
        );
        let err = brittany.number("provinces").unwrap_err();
        assert!(matches!(
            err,
            InterpretError::TypeMismatch { expected: "a number", found: "array", .. }
        ));
        assert!(err.to_string().contains("states.txt:2:1"));
    }

    #[test]
    fn test_mutation_sets_flag() {
        let mut states = load(BRITTANY);
        let brittany = &mut states[0];

        brittany.set("id", 13.0);
        assert!(brittany.is_modified());
        assert_eq!(brittany.number("id").unwrap(), 13.0);

        brittany.mark_clean();
        assert_eq!(brittany.remove("missing"), None);
        assert!(!brittany.is_modified());

        let first = brittany.remove("resource").unwrap();
        assert!(brittany.is_modified());
        assert!(first.as_record().is_some());
        assert_eq!(brittany.get_all("resource").count(), 0);

        brittany.mark_clean();
        brittany.push("traits", Value::Array(vec!["state_trait_harbor".into()]));
        assert!(brittany.is_modified());
    }

    #[test]
    fn test_new_definition_is_modified() {
        let definition = Definition::new("STATE_NEW", Position::new("new.txt"));
        assert!(definition.is_modified());
        assert!(definition.fields().is_empty());
    }

    #[test]
    fn test_decode_round_trip() {
        let states = load(BRITTANY);
        let refs: Vec<&Definition> = states.iter().collect();
        let ast = DefinitionInterpreter::new("states")
            .decode(&refs, Position::new("out.txt"))
            .unwrap();
        let text = lexer::decode(&parser::decode(&ast));
        let again = load(&text);
        assert_eq!(again[0].fields(), states[0].fields());
    }

    #[test]
    fn test_decode_skips_absent_fields() {
        let mut definition = Definition::new("STATE_X", Position::new("x.txt"));
        definition.set("id", 1.0);
        definition.set("city", None::<&str>);
        let ast = DefinitionInterpreter::new("states")
            .decode(&[&definition], Position::new("x.txt"))
            .unwrap();
        let text = lexer::decode(&parser::decode(&ast));
        assert_eq!(text, "STATE_X = {\n  id = 1\n}\n");
    }

    #[test]
    fn test_unwritable_edits_fail_to_decode() {
        let interpreter = DefinitionInterpreter::new("states");
        let decode = |definition: &Definition| {
            interpreter.decode(&[definition], Position::new("x.txt"))
        };

        let mut quoted = load(BRITTANY).remove(0);
        quoted.set("name", "say \"hi\"");
        assert!(matches!(
            decode(&quoted).unwrap_err(),
            InterpretError::UnsupportedValue { .. }
        ));

        let mut spaced = load(BRITTANY).remove(0);
        spaced.set("two words", 1.0);
        assert!(decode(&spaced).is_err());

        let mut ratio = load(BRITTANY).remove(0);
        ratio.set("ratio", f64::NAN);
        assert!(decode(&ratio).is_err());

        let badly_named = Definition::new("STATE X", Position::new("x.txt"));
        assert!(decode(&badly_named).is_err());
    }

    #[test]
    fn test_source_path() {
        let config = Config::new("/game", "/mod");
        assert_eq!(
            DefinitionInterpreter::new("map_data/state_regions").source_path(&config),
            PathBuf::from("/game/map_data/state_regions")
        );
    }
}
