//! End-to-end parsing scenarios: ordering guarantees, repeated
//! keys, and macro/include behaviour observed through the public
//! `Parser` API plus an emitter, rather than by inspecting internal state.

use std::rc::Rc;
use ucl_emit::to_json_compact;
use ucl_par::macros::IncludeFetcher;
use ucl_par::{Parser, ParserFlags};

struct AlwaysEmptyFetcher;

impl IncludeFetcher for AlwaysEmptyFetcher {
    fn fetch(&self, _location: &str) -> Result<Vec<u8>, String> {
        Ok(Vec::new())
    }
}

fn parse(source: &str) -> ucl_value::Value {
    let mut parser = Parser::new(ParserFlags::empty());
    parser.add_string(source).expect("parse should succeed");
    parser.get_object().expect("a root value")
}

#[test]
fn member_insertion_order_matches_source_order() {
    let root = parse("b = 1; a = 2; c = 3;");
    let json = to_json_compact(&root);
    let b_pos = json.find("\"b\"").unwrap();
    let a_pos = json.find("\"a\"").unwrap();
    let c_pos = json.find("\"c\"").unwrap();
    assert!(b_pos < a_pos && a_pos < c_pos);
}

#[test]
fn implicit_array_sibling_order_matches_source_order() {
    let root = parse("worker = \"one\"; worker = \"two\"; worker = \"three\";");
    let json = to_json_compact(&root);
    assert!(json.contains("\"worker\":[\"one\",\"two\",\"three\"]"));
}

#[test]
fn nested_objects_and_arrays_round_trip_through_json() {
    let root = parse(
        r#"
        server {
            name = "redis";
            ports = [6379, 6380];
        }
        "#,
    );
    let json = to_json_compact(&root);
    assert!(json.contains("\"server\":{"));
    assert!(json.contains("\"ports\":[6379,6380]"));
}

#[test]
fn permissive_missing_separators_between_top_level_members() {
    let root = parse("a = 1\nb = 2\n");
    let json = to_json_compact(&root);
    assert!(json.contains("\"a\":1"));
    assert!(json.contains("\"b\":2"));
}

#[test]
fn unknown_macro_is_a_terminal_error() {
    let mut parser = Parser::new(ParserFlags::empty());
    let err = parser.add_string(".nonsense_macro \"x\";\n").unwrap_err();
    assert_eq!(err.kind, ucl_util::ParserErrorKind::Macro);
    assert!(parser.has_errored());
}

#[test]
fn includes_fail_without_a_linked_verifier() {
    let mut parser = Parser::new(ParserFlags::empty());
    parser.set_include_fetcher(Rc::new(AlwaysEmptyFetcher));
    let err = parser.add_string(".includes \"other.conf\";\n").unwrap_err();
    assert_eq!(err.kind, ucl_util::ParserErrorKind::Ssl);
}

#[test]
fn custom_macro_handler_is_invoked_in_source_order() {
    let mut parser = Parser::new(ParserFlags::empty());
    let seen = std::rc::Rc::new(std::cell::RefCell::new(Vec::new()));
    let seen_clone = seen.clone();
    parser.register_macro("mark", move |_parser, arg| {
        seen_clone.borrow_mut().push(arg.as_bytes().to_vec());
        Ok(())
    });
    parser
        .add_string(".mark \"first\";\n.mark \"second\";\n")
        .unwrap();
    let recorded = seen.borrow();
    assert_eq!(recorded.len(), 2);
    assert_eq!(recorded[0], b"first");
    assert_eq!(recorded[1], b"second");
}
