//! End-to-end schema validation: both the schema and the candidate are
//! parsed from ucl text rather than built by hand, exercising the same
//! path an embedding application would use.

use ucl_par::{Parser, ParserFlags};
use ucl_schema::validate;

fn parse(source: &str) -> ucl_value::Value {
    let mut parser = Parser::new(ParserFlags::empty());
    parser.add_string(source).expect("parse should succeed");
    parser.get_object().expect("a root value")
}

#[test]
fn a_conforming_document_validates() {
    let schema = parse(
        r#"{
            "type": "object",
            "properties": {
                "port": { "type": "integer", "minimum": 1, "maximum": 65535 },
                "name": { "type": "string" }
            },
            "required": ["port", "name"]
        }"#,
    );
    let document = parse("port = 6379; name = \"cache\";");
    assert!(validate(&schema, &document).is_ok());
}

#[test]
fn a_missing_required_property_fails_validation() {
    let schema = parse(r#"{"required": ["port"]}"#);
    let document = parse("name = \"cache\";");
    let err = validate(&schema, &document).unwrap_err();
    assert_eq!(err.kind, ucl_util::SchemaErrorKind::MissingProperty);
}

#[test]
fn an_out_of_range_number_fails_validation() {
    let schema = parse(r#"{"properties": {"port": {"maximum": 1024}}}"#);
    let document = parse("port = 70000;");
    assert!(validate(&schema, &document).is_err());
}

#[test]
fn items_schema_validates_every_element_of_an_explicit_array() {
    let schema = parse(r#"{"properties": {"ports": {"items": {"type": "integer"}}}}"#);
    let good = parse("ports = [80, 443];");
    let bad = parse("ports = [80, \"https\"];");
    assert!(validate(&schema, &good).is_ok());
    assert!(validate(&schema, &bad).is_err());
}
