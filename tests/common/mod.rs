#![allow(dead_code)]

use pdx_core::ast::{Ast, Expression};
use pdx_core::error::InterpretError;
use pdx_core::interpreter::{self, Interpreter, Model};
use pdx_core::{Config, Position, Value};
use std::fs;
use std::path::{Path, PathBuf};

pub const STATE_REGIONS: &str = "map_data/state_regions";

/// A small typed model: `NAME = { id = N provinces = { ... } }`.
#[derive(Debug, Clone, PartialEq)]
pub struct StateRegion {
    name: String,
    id: f64,
    provinces: Vec<String>,
    position: Position,
    modified: bool,
}

impl StateRegion {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn id(&self) -> f64 {
        self.id
    }

    pub fn provinces(&self) -> &[String] {
        &self.provinces
    }

    pub fn set_id(&mut self, id: f64) {
        self.id = id;
        self.modified = true;
    }

    pub fn add_province(&mut self, province: &str) {
        self.provinces.push(province.to_string());
        self.modified = true;
    }
}

impl Model for StateRegion {
    fn position(&self) -> &Position {
        &self.position
    }

    fn is_modified(&self) -> bool {
        self.modified
    }
}

pub struct StateRegionInterpreter;

impl Interpreter for StateRegionInterpreter {
    type Model = StateRegion;

    fn encode(&self, ast: Ast) -> Result<Vec<StateRegion>, InterpretError> {
        interpreter::definitions(&ast)?
            .into_iter()
            .map(|(variable, fields)| {
                let mut id = None;
                let mut provinces = Vec::new();
                for field in fields {
                    match (field.variable.name.as_str(), interpreter::to_value(&field.value)) {
                        ("id", Value::Number(n)) => id = Some(n),
                        ("provinces", Value::Array(values)) => {
                            provinces = values
                                .iter()
                                .filter_map(|v| v.as_str().map(str::to_string))
                                .collect()
                        }
                        _ => {}
                    }
                }
                let id = id.ok_or_else(|| InterpretError::MissingField {
                    field: format!("{}.id", variable.name),
                    position: variable.position.clone(),
                })?;
                Ok(StateRegion {
                    name: variable.name.clone(),
                    id,
                    provinces,
                    position: variable.position.clone(),
                    modified: false,
                })
            })
            .collect()
    }

    fn decode(&self, models: &[&StateRegion], position: Position) -> Result<Ast, InterpretError> {
        let definitions = models
            .iter()
            .map(|region| {
                let body = Value::record([
                    ("id", Value::Number(region.id)),
                    ("provinces", Value::from(region.provinces.clone())),
                ]);
                Ok(Expression::assignment(
                    region.name.clone(),
                    interpreter::from_value(&body, &position)?,
                    position.clone(),
                ))
            })
            .collect::<Result<Vec<_>, InterpretError>>()?;
        Ok(Ast::new(definitions, position))
    }

    fn source_path(&self, config: &Config) -> PathBuf {
        config.source_root.join(STATE_REGIONS)
    }
}

/// Lays out `<root>/game/map_data/state_regions/<name>` for each file and
/// returns a config writing to `<root>/mod`.
pub fn game_dir(root: &Path, files: &[(&str, &str)]) -> Config {
    let config = Config::new(root.join("game"), root.join("mod"));
    let dir = config.source_root.join(STATE_REGIONS);
    fs::create_dir_all(&dir).unwrap();
    for (name, text) in files {
        fs::write(dir.join(name), text).unwrap();
    }
    config
}
