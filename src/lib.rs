pub mod api;
pub mod ast;
pub mod config;
pub mod definition;
pub mod engine;
pub mod error;
pub mod interpreter;
pub mod lexer;
pub mod parser;
pub mod position;
pub mod value;

pub use api::{interpret, parse, render, report, to_text, to_value};
pub use ast::Ast;
pub use config::Config;
pub use definition::{Definition, DefinitionInterpreter};
pub use error::PdxError;
pub use interpreter::{Interpreter, Model};
pub use position::Position;
pub use value::Value;
