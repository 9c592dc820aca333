//! The parser: drives [`ucl_lex::Lexer`] through a state machine and
//! assembles the result into a [`ucl_value::Value`] tree.
//!
//! # Parsing theory
//!
//! The grammar is not context-free in the usual sense — whether `{` opens
//! a nested object or `[` opens an array depends on whether a key is
//! currently pending, and a bare `.name` can appear wherever a key can,
//! diverting into the macro subsystem instead of producing a member. A
//! hand-written state machine threading one pending key and a stack of
//! open containers models this directly; there is no benefit to a
//! generated parser here, the "grammar" is six states and the transitions
//! in the table below.
//!
//! # State machine
//!
//! | State | sees | next | does |
//! |---|---|---|---|
//! | `Init` | `[` | `Value` | push array as root |
//! | `Init` | `{` or key-start | `Key` | push object as root |
//! | `Key` | `}` | `AfterValue` | pop (empty object) |
//! | `Key` | `.` | `MacroName` | — |
//! | `Key` | key token | `Value` | record pending key, skip one `=`/`:` |
//! | `Value` | `{` | `Key` | push nested object |
//! | `Value` | `[` | `Value` | push nested array |
//! | `Value` | scalar | `AfterValue` | attach to parent |
//! | `AfterValue` | `,`/`;` | `Key`/`Value` | separator only, no pop |
//! | `AfterValue` | `}`/`]` | `AfterValue` | pop; root set if stack empties |
//! | `AfterValue` | anything else | `Key`/`Value` | reprocessed permissively, no separator required |
//! | `MacroName` | identifier | `Macro` | look up handler |
//! | `Macro` | value | prior state | invoke handler, then resume |
//!
//! # Macro system
//!
//! `.include`/`.includes` are special-cased rather than routed through the
//! generic macro table: they need the [`IncludeFetcher`]/[`SignatureVerifier`]
//! collaborators and the recursive-chunk-stack mechanism custom macros
//! don't. Recursive includes are modeled as literal Rust recursion —
//! [`Parser::drive`] calls itself over a freshly constructed [`Lexer`] for
//! the fetched bytes, sharing every other field through `&mut self` — rather
//! than an explicit linked list of chunks, which would force `Parser` to be
//! generic over a buffer lifetime it can't know ahead of time.

pub mod macros;
pub mod variables;

use bitflags::bitflags;
use macros::{FsIncludeFetcher, IncludeFetcher, MacroArg, SignatureVerifier};
use std::path::Path;
use std::rc::Rc;
use ucl_lex::{Lexer, Token};
use ucl_util::{FxHashMap, ParseError, Span};
use ucl_value::{Bytes, ObjectMap, Tag, Value};

/// How deep `.include`/`.includes` may recurse before parsing fails, a
/// fixed ceiling rather than an unbounded recursion.
pub const MAX_INCLUDE_DEPTH: usize = 16;

bitflags! {
    /// Parser-wide behavior switches.
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    pub struct ParserFlags: u32 {
        /// Fold every object key to lowercase before indexing it.
        const KEY_LOWERCASE = 1 << 0;
        /// Prefer borrowing string values from the input buffer instead of
        /// copying them. Accepted for API completeness; this port always
        /// produces owned `Bytes` regardless (see `DESIGN.md`), since the
        /// parser's input is not guaranteed to outlive the returned tree.
        const ZEROCOPY = 1 << 1;
        /// Treat numbers with a time-unit suffix as plain numbers instead
        /// of promoting them to `Tag::Time`.
        const NO_TIME = 1 << 2;
    }
}

/// The parser's six-state state machine.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum State {
    Init,
    Key,
    Value,
    AfterValue,
    MacroName,
    Macro,
}

/// One open container on the parser's stack.
#[derive(Clone)]
struct Frame {
    container: Value,
    is_array: bool,
}

type MacroHandler = Box<dyn FnMut(&mut Parser, MacroArg) -> Result<(), ParseError>>;

/// Parses one or more chunks of UCL text into a single [`Value`] tree.
///
/// A `Parser` is a single accumulating session: call [`Parser::add_chunk`]
/// (or one of its convenience wrappers) one or more times, then
/// [`Parser::get_object`] for the result. Once any call returns an error the
/// parser is poisoned — errors are terminal — and every subsequent call
/// returns a `State`-kind error.
pub struct Parser {
    state: State,
    stack: Vec<Frame>,
    pending_key: Option<Bytes>,
    active_macro: Option<Vec<u8>>,
    macros: FxHashMap<Vec<u8>, MacroHandler>,
    variables: FxHashMap<Vec<u8>, Bytes>,
    variable_handler: Option<Box<dyn FnMut(&[u8]) -> Option<Bytes>>>,
    pubkeys: Vec<Vec<u8>>,
    flags: ParserFlags,
    root: Option<Value>,
    poisoned: bool,
    include_depth: usize,
    current_priority: u8,
    fetcher: Option<Rc<dyn IncludeFetcher>>,
    verifier: Option<Rc<dyn SignatureVerifier>>,
}

impl Parser {
    pub fn new(flags: ParserFlags) -> Self {
        Self {
            state: State::Init,
            stack: Vec::new(),
            pending_key: None,
            active_macro: None,
            macros: FxHashMap::default(),
            variables: FxHashMap::default(),
            variable_handler: None,
            pubkeys: Vec::new(),
            flags,
            root: None,
            poisoned: false,
            include_depth: 0,
            current_priority: 0,
            fetcher: Some(Rc::new(FsIncludeFetcher)),
            verifier: None,
        }
    }

    /// Registers a custom macro, invoked on `.name <arg>`.
    pub fn register_macro(
        &mut self,
        name: impl Into<Vec<u8>>,
        handler: impl FnMut(&mut Parser, MacroArg) -> Result<(), ParseError> + 'static,
    ) {
        self.macros.insert(name.into(), Box::new(handler));
    }

    /// Registers a fixed `${NAME}` replacement.
    pub fn register_variable(&mut self, name: impl Into<Vec<u8>>, value: impl Into<Bytes>) {
        self.variables.insert(name.into(), value.into());
    }

    /// Installs a fallback handler consulted for any `${NAME}` not found in
    /// the registered table.
    pub fn set_variables_handler(&mut self, handler: impl FnMut(&[u8]) -> Option<Bytes> + 'static) {
        self.variable_handler = Some(Box::new(handler));
    }

    /// Swaps in a non-default include fetcher (e.g. one that also resolves
    /// URLs).
    pub fn set_include_fetcher(&mut self, fetcher: Rc<dyn IncludeFetcher>) {
        self.fetcher = Some(fetcher);
    }

    /// Installs the verifier `.includes` consults. Leaving this unset makes
    /// every `.includes` fail.
    pub fn set_signature_verifier(&mut self, verifier: Rc<dyn SignatureVerifier>) {
        self.verifier = Some(verifier);
    }

    /// Adds one trusted public key for `.includes` signature checks.
    pub fn pubkey_add(&mut self, pem: impl Into<Vec<u8>>) {
        self.pubkeys.push(pem.into());
    }

    /// Registers `FILENAME` and `CURDIR`, used by `.include`'s variable
    /// expansion.
    pub fn set_filevars(&mut self, filename: &str) {
        self.register_variable("FILENAME", filename);
        let curdir = Path::new(filename)
            .parent()
            .map(|p| p.to_string_lossy().into_owned())
            .unwrap_or_else(|| ".".to_string());
        self.register_variable("CURDIR", curdir);
    }

    /// Feeds `bytes` into the document being built, at the given priority
    /// (defaults to 0, clamped to `MAX_PRIORITY`).
    pub fn add_chunk(&mut self, bytes: &[u8], priority: Option<u8>) -> Result<(), ParseError> {
        if self.poisoned {
            return Err(ParseError::state(
                "parser already failed; no further input is accepted",
                Span::DUMMY,
            ));
        }
        self.current_priority = priority.unwrap_or(0).min(ucl_value::MAX_PRIORITY);
        let mut lexer = Lexer::new(bytes);
        let result = self.drive(&mut lexer);
        if result.is_err() {
            self.poisoned = true;
        }
        result
    }

    /// Convenience wrapper over [`Parser::add_chunk`] for `&str` input.
    pub fn add_string(&mut self, text: &str) -> Result<(), ParseError> {
        self.add_chunk(text.as_bytes(), None)
    }

    /// Reads `path` from disk, registers `FILENAME`/`CURDIR`, and parses its
    /// contents.
    pub fn add_file(&mut self, path: &Path) -> Result<(), ParseError> {
        let bytes = std::fs::read(path)
            .map_err(|e| ParseError::io(format!("reading '{}': {e}", path.display()), Span::DUMMY))?;
        self.set_filevars(&path.to_string_lossy());
        self.add_chunk(&bytes, None)
    }

    /// Reads the entirety of `reader` and parses it — the idiomatic
    /// equivalent of passing a raw file descriptor: a `File` or any other
    /// `Read` implementor works, without unsafe fd juggling.
    pub fn add_reader(&mut self, mut reader: impl std::io::Read) -> Result<(), ParseError> {
        let mut bytes = Vec::new();
        reader
            .read_to_end(&mut bytes)
            .map_err(|e| ParseError::io(e.to_string(), Span::DUMMY))?;
        self.add_chunk(&bytes, None)
    }

    /// The parsed document, if anything has been successfully produced yet.
    /// Valid both after an explicit top-level `{...}`/`[...]` has closed and
    /// while the implicit, brace-less top-level object is still open for
    /// more chunks.
    pub fn get_object(&self) -> Option<Value> {
        self.root
            .clone()
            .or_else(|| self.stack.first().map(|f| f.container.clone()))
    }

    /// `true` once any call has failed; no further input will be accepted.
    pub fn has_errored(&self) -> bool {
        self.poisoned
    }

    fn drive(&mut self, lexer: &mut Lexer) -> Result<(), ParseError> {
        let mut pending: Option<Token> = None;
        loop {
            if self.stack.is_empty() && self.root.is_some() {
                let token = match pending.take() {
                    Some(t) => t,
                    None => lexer.next_token()?,
                };
                return match token {
                    Token::Eof => Ok(()),
                    _ => Err(ParseError::syntax(
                        "trailing data after the top-level value",
                        lexer.current_span(),
                    )),
                };
            }

            let token = match pending.take() {
                Some(t) => t,
                None => lexer.next_token()?,
            };

            match self.state {
                State::Init => self.step_init(token, &mut pending),
                State::Key => {
                    if token == Token::Eof {
                        return Ok(());
                    }
                    self.step_key(lexer, token)?
                }
                State::Value => {
                    if token == Token::Eof {
                        return Ok(());
                    }
                    self.step_value(token, lexer)?
                }
                State::AfterValue => {
                    if token == Token::Eof {
                        return Ok(());
                    }
                    self.step_after_value(token, lexer, &mut pending)?
                }
                State::MacroName => {
                    if token == Token::Eof {
                        return Err(ParseError::macro_error(
                            "expected a macro name, found end of input",
                            lexer.current_span(),
                        ));
                    }
                    self.step_macro_name(token, lexer)?
                }
                State::Macro => {
                    if token == Token::Eof {
                        return Err(ParseError::macro_error(
                            "expected a macro argument, found end of input",
                            lexer.current_span(),
                        ));
                    }
                    self.step_macro(token, lexer)?
                }
            }
        }
    }

    fn step_init(&mut self, token: Token, pending: &mut Option<Token>) {
        match token {
            Token::LBracket => {
                let root = Value::array(Vec::new());
                self.stack.push(Frame {
                    container: root,
                    is_array: true,
                });
                self.state = State::Value;
            }
            Token::LBrace => {
                let root = Value::object(ObjectMap::new(self.flags.contains(ParserFlags::KEY_LOWERCASE)));
                self.stack.push(Frame {
                    container: root,
                    is_array: false,
                });
                self.state = State::Key;
            }
            other => {
                // Top-level form without enclosing braces: the
                // document is an implicit object and this token is its
                // first key.
                let root = Value::object(ObjectMap::new(self.flags.contains(ParserFlags::KEY_LOWERCASE)));
                self.stack.push(Frame {
                    container: root,
                    is_array: false,
                });
                self.state = State::Key;
                *pending = Some(other);
            }
        }
    }

    fn step_key(&mut self, lexer: &mut Lexer, token: Token) -> Result<(), ParseError> {
        match token {
            Token::RBrace => self.close_container(&Token::RBrace, lexer),
            Token::Dot => {
                self.state = State::MacroName;
                Ok(())
            }
            other => {
                let key_bytes = self.token_as_key(&other).ok_or_else(|| {
                    ParseError::syntax(
                        format!("expected an object key, found {other:?}"),
                        lexer.current_span(),
                    )
                })?;
                self.consume_optional_separator(lexer);
                self.pending_key = Some(Bytes::owned(key_bytes));
                self.state = State::Value;
                Ok(())
            }
        }
    }

    fn step_value(&mut self, token: Token, lexer: &mut Lexer) -> Result<(), ParseError> {
        match token {
            Token::LBrace => {
                let child = Value::object(ObjectMap::new(self.flags.contains(ParserFlags::KEY_LOWERCASE)));
                child.set_priority(self.current_priority);
                self.attach_child(child.clone(), lexer)?;
                self.stack.push(Frame {
                    container: child,
                    is_array: false,
                });
                self.state = State::Key;
                Ok(())
            }
            Token::LBracket => {
                let child = Value::array(Vec::new());
                child.set_priority(self.current_priority);
                self.attach_child(child.clone(), lexer)?;
                self.stack.push(Frame {
                    container: child,
                    is_array: true,
                });
                // State stays Value: arrays hold elements directly, no keys.
                Ok(())
            }
            Token::RBracket => self.close_container(&Token::RBracket, lexer),
            other => {
                let value = self
                    .token_to_scalar(other)
                    .ok_or_else(|| ParseError::syntax("expected a value", lexer.current_span()))?;
                value.set_priority(self.current_priority);
                self.attach_child(value, lexer)?;
                self.state = State::AfterValue;
                Ok(())
            }
        }
    }

    fn step_after_value(
        &mut self,
        token: Token,
        lexer: &mut Lexer,
        pending: &mut Option<Token>,
    ) -> Result<(), ParseError> {
        match token {
            Token::Comma | Token::Semicolon => {
                self.state = self.state_for_top();
                Ok(())
            }
            Token::RBrace => self.close_container(&Token::RBrace, lexer),
            Token::RBracket => self.close_container(&Token::RBracket, lexer),
            other => {
                // Permissive: no separator is required between members.
                self.state = self.state_for_top();
                *pending = Some(other);
                Ok(())
            }
        }
    }

    fn state_for_top(&self) -> State {
        match self.stack.last() {
            Some(frame) if frame.is_array => State::Value,
            _ => State::Key,
        }
    }

    fn close_container(&mut self, token: &Token, lexer: &mut Lexer) -> Result<(), ParseError> {
        let frame = self.stack.pop().ok_or_else(|| {
            ParseError::internal("closing delimiter with no open container", lexer.current_span())
        })?;
        let expected_array = matches!(token, Token::RBracket);
        if frame.is_array != expected_array {
            return Err(ParseError::syntax(
                "mismatched closing delimiter",
                lexer.current_span(),
            ));
        }
        if self.stack.is_empty() {
            self.root = Some(frame.container);
        }
        self.pending_key = None;
        self.state = State::AfterValue;
        Ok(())
    }

    fn attach_child(&mut self, value: Value, lexer: &mut Lexer) -> Result<(), ParseError> {
        let top = self.stack.last().cloned().ok_or_else(|| {
            ParseError::internal("value produced with no open container", lexer.current_span())
        })?;
        if top.is_array {
            ucl_value::array_ops::append(&top.container, value);
        } else {
            let key = self.pending_key.take().ok_or_else(|| {
                ParseError::internal(
                    "object member produced without a pending key",
                    lexer.current_span(),
                )
            })?;
            value.set_key(key.clone(), false);
            let mut data = top.container.borrow_mut();
            if let Tag::Object(map) = &mut data.tag {
                map.insert_chained(key.as_slice(), value);
            }
        }
        Ok(())
    }

    fn consume_optional_separator(&mut self, lexer: &mut Lexer) {
        let snapshot = lexer.snapshot();
        match lexer.next_token() {
            Ok(Token::Equals) | Ok(Token::Colon) => {}
            _ => lexer.restore(snapshot),
        }
    }

    fn token_as_key(&self, token: &Token) -> Option<Vec<u8>> {
        match token {
            Token::BareString(s) => Some(s.to_vec()),
            Token::QuotedString(cow) => Some(cow.to_vec()),
            Token::Bool(true) => Some(b"true".to_vec()),
            Token::Bool(false) => Some(b"false".to_vec()),
            _ => None,
        }
    }

    fn token_to_scalar(&self, token: Token) -> Option<Value> {
        match token {
            Token::Int(i) => Some(Value::int(i)),
            Token::Float(f) => Some(Value::float(f)),
            Token::Time(t) => {
                if self.flags.contains(ParserFlags::NO_TIME) {
                    Some(Value::float(t))
                } else {
                    Some(Value::time(t))
                }
            }
            Token::Bool(b) => Some(Value::bool(b)),
            Token::QuotedString(cow) => Some(Value::string(Bytes::owned(cow.into_owned()))),
            Token::BareString(s) => Some(Value::string(Bytes::owned(s.to_vec()))),
            Token::Heredoc(cow) => {
                let value = Value::string(Bytes::owned(cow.into_owned()));
                value.set_multiline(true);
                Some(value)
            }
            _ => None,
        }
    }

    fn step_macro_name(&mut self, token: Token, lexer: &mut Lexer) -> Result<(), ParseError> {
        let name = match token {
            Token::BareString(s) => s.to_vec(),
            Token::QuotedString(cow) => cow.to_vec(),
            _ => {
                return Err(ParseError::macro_error(
                    "expected a macro name after '.'",
                    lexer.current_span(),
                ))
            }
        };
        if name != b"include" && name != b"includes" && !self.macros.contains_key(&name) {
            return Err(ParseError::macro_error(
                format!("unknown macro '.{}'", String::from_utf8_lossy(&name)),
                lexer.current_span(),
            ));
        }
        self.active_macro = Some(name);
        self.state = State::Macro;
        Ok(())
    }

    fn step_macro(&mut self, token: Token, lexer: &mut Lexer) -> Result<(), ParseError> {
        let name = self
            .active_macro
            .take()
            .expect("step_macro only runs after step_macro_name sets active_macro");
        let arg = match token {
            Token::QuotedString(cow) => MacroArg::String(cow.into_owned()),
            Token::BareString(s) => MacroArg::Bare(s.to_vec()),
            Token::LBrace => {
                let start = lexer.position();
                let mut depth = 1u32;
                loop {
                    match lexer.next_token()? {
                        Token::LBrace => depth += 1,
                        Token::RBrace => {
                            depth -= 1;
                            if depth == 0 {
                                break;
                            }
                        }
                        Token::Eof => {
                            return Err(ParseError::nested(
                                "unterminated macro body",
                                lexer.current_span(),
                            ))
                        }
                        _ => {}
                    }
                }
                let end = lexer.position() - 1;
                MacroArg::Raw(lexer.source()[start..end].to_vec())
            }
            _ => {
                return Err(ParseError::macro_error(
                    "expected a macro argument",
                    lexer.current_span(),
                ))
            }
        };

        if name == b"include" {
            self.handle_include(arg, false, lexer)?;
        } else if name == b"includes" {
            self.handle_include(arg, true, lexer)?;
        } else if let Some(mut handler) = self.macros.remove(&name) {
            let result = handler(self, arg);
            self.macros.insert(name, handler);
            result?;
        } else {
            return Err(ParseError::macro_error(
                format!("unknown macro '.{}'", String::from_utf8_lossy(&name)),
                lexer.current_span(),
            ));
        }
        self.state = State::Key;
        Ok(())
    }

    fn handle_include(
        &mut self,
        arg: MacroArg,
        signed: bool,
        lexer: &mut Lexer,
    ) -> Result<(), ParseError> {
        if arg.as_bytes().is_empty() {
            return Err(ParseError::macro_error(
                "include requires a path argument",
                lexer.current_span(),
            ));
        }
        if self.include_depth >= MAX_INCLUDE_DEPTH {
            return Err(ParseError::nested(
                "include nesting exceeded the recursion ceiling",
                lexer.current_span(),
            ));
        }

        let expanded = self.expand_variables(arg.as_bytes());
        let path = String::from_utf8_lossy(&expanded).into_owned();

        let fetcher = self
            .fetcher
            .clone()
            .ok_or_else(|| ParseError::io("no include fetcher configured", lexer.current_span()))?;
        let bytes = fetcher
            .fetch(&path)
            .map_err(|e| ParseError::io(format!("include '{path}' failed: {e}"), lexer.current_span()))?;

        if signed {
            let verifier = self.verifier.clone().ok_or_else(|| {
                ParseError::ssl("no signature verifier configured", lexer.current_span())
            })?;
            let sig_path = format!("{path}.sig");
            let signature = fetcher.fetch(&sig_path).map_err(|e| {
                ParseError::ssl(
                    format!("fetching signature for '{path}' failed: {e}"),
                    lexer.current_span(),
                )
            })?;
            if !verifier.verify(&bytes, &signature, &self.pubkeys) {
                return Err(ParseError::ssl(
                    format!("signature verification failed for '{path}'"),
                    lexer.current_span(),
                ));
            }
        }

        self.include_depth += 1;
        let mut nested_lexer = Lexer::new(&bytes);
        let result = self.drive(&mut nested_lexer);
        self.include_depth -= 1;
        result
    }

    fn expand_variables(&mut self, input: &[u8]) -> Vec<u8> {
        let variables = std::mem::take(&mut self.variables);
        let mut handler = self.variable_handler.take();
        let result = variables::expand(input, |name| {
            variables
                .get(name)
                .cloned()
                .or_else(|| handler.as_mut().and_then(|h| h(name)))
        });
        self.variables = variables;
        self.variable_handler = handler;
        result
    }
}
