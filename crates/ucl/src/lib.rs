//! The public, single-crate surface of the library.
//!
//! Embedding code depends on `ucl` alone; the `ucl-*` crates underneath are
//! the implementation seams (lexer, value tree, parser, schema, emitters),
//! mirrored here by their re-exports.

pub use ucl_emit::{to_config, to_json, to_json_compact, to_yaml};
pub use ucl_par::{
    macros::{FsIncludeFetcher, IncludeFetcher, MacroArg, NullSignatureVerifier, SignatureVerifier},
    Parser, ParserFlags, MAX_INCLUDE_DEPTH,
};
pub use ucl_schema::validate;
pub use ucl_util::{ParseError, ParserErrorKind, SchemaError, SchemaErrorKind, Span};
pub use ucl_value::{array_ops, iterate, lookup_path, Bytes, ObjectMap, Tag, UserData, Value};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_and_emits_round_trip_through_the_facade() {
        let mut parser = Parser::new(ParserFlags::empty());
        parser.add_string("server { port = 80; name = \"redis\"; }").unwrap();
        let root = parser.get_object().expect("parsed document");
        let json = to_json_compact(&root);
        assert!(json.contains("\"port\":80"));
    }

    #[test]
    fn validates_a_parsed_document_against_a_schema() {
        let mut parser = Parser::new(ParserFlags::empty());
        parser.add_string("port = 80;").unwrap();
        let root = parser.get_object().unwrap();

        let mut schema_parser = Parser::new(ParserFlags::empty());
        schema_parser
            .add_string(r#"{"properties": {"port": {"type": "integer"}}, "required": ["port"]}"#)
            .unwrap();
        let schema = schema_parser.get_object().unwrap();

        assert!(validate(&schema, &root).is_ok());
    }
}
