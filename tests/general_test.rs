use miette::Report;
use pdx_core::ast::{Ast, Expression};
use pdx_core::lexer::{self, TokenType, GLOBAL};
use pdx_core::{api, parser, Position};
use std::fs;

#[test]
fn test_all_fixture_files() {
    let fixtures_dir = "./tests/fixtures";
    let entries = fs::read_dir(fixtures_dir).expect("Failed to read fixtures directory");

    for entry in entries {
        let entry = entry.expect("Failed to read directory entry");
        let path = entry.path();

        if path.is_file() && path.extension().map_or(false, |ext| ext == "txt") {
            println!("Parsing file: {:?}", path);
            let source =
                fs::read_to_string(&path).expect(&format!("Failed to read file: {:?}", path));

            let ast = match api::parse(&source, &path) {
                Ok(ast) => ast,
                Err(err) => panic!("Failed to parse {:?}. Error: {:#?}", path, Report::new(err)),
            };

            let text = api::to_text(&ast);
            let again = api::parse(&text, &path)
                .unwrap_or_else(|err| panic!("Rendered {:?} does not parse: {:?}", path, Report::new(err)));
            assert!(again.structurally_eq(&ast), "{:?} changed on round trip", path);
        }
    }
}

#[test]
fn test_empty_input_bootstraps_the_wrapper() {
    let types: Vec<TokenType> = lexer::encode("", Position::new("empty.txt"))
        .unwrap()
        .into_iter()
        .map(|t| t.ttype)
        .collect();
    assert_eq!(
        types,
        vec![
            TokenType::Symbol(GLOBAL.to_string()),
            TokenType::Equals,
            TokenType::OpenBrace,
            TokenType::CloseBrace,
        ]
    );
}

#[test]
fn test_literal_round_trip() {
    let source = "FOO = {\n  bar = 5\n}";
    let ast = api::parse(source, "foo.txt").unwrap();

    let p = Position::new("foo.txt");
    let expected = Ast::new(
        vec![Expression::assignment(
            "FOO",
            Expression::array(
                vec![Expression::assignment("bar", Expression::number(5.0, p.clone()), p.clone())],
                p.clone(),
            ),
            p.clone(),
        )],
        p,
    );
    assert!(ast.structurally_eq(&expected));

    let types = |tokens: Vec<lexer::Token>| tokens.into_iter().map(|t| t.ttype).collect::<Vec<_>>();
    let rendered = lexer::decode(&parser::decode(&ast));
    assert_eq!(
        types(lexer::encode(&rendered, Position::new("foo.txt")).unwrap()),
        types(lexer::encode(source, Position::new("foo.txt")).unwrap())
    );
}

#[test]
fn test_hex_identifiers() {
    let body = |source: &str| {
        let tokens = lexer::encode(source, Position::new("hex.txt")).unwrap();
        tokens[3..tokens.len() - 1]
            .iter()
            .map(|t| t.ttype.clone())
            .collect::<Vec<_>>()
    };
    assert_eq!(body("x39CACA"), vec![TokenType::String("x39CACA".to_string())]);
    assert_eq!(body("x39CAC"), vec![TokenType::Symbol("x39CAC".to_string())]);
    assert_eq!(body("xZZCACA"), vec![TokenType::Symbol("xZZCACA".to_string())]);
}

#[test]
fn test_fixture_json_export() {
    let source = fs::read_to_string("./tests/fixtures/countries.txt").unwrap();
    let value = api::to_value(&source, "countries.txt").unwrap();
    let json: serde_json::Value = serde_json::from_str(&value.to_json().unwrap()).unwrap();

    assert_eq!(json[0][0], "FRA");
    assert_eq!(json[0][1][0], serde_json::json!(["color", [20.0, 40.0, 200.0]]));
    assert_eq!(json[1][1][4], serde_json::json!(["capital", "STATE_HOME_COUNTIES"]));
}
