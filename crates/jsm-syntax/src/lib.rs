//! Reader for jsm declaration files.
//!
//! Declaration sets are written in a small subset of TypeScript declaration
//! syntax: interfaces, type aliases, `declare var|let|const` and
//! `declare function`. This crate turns their text into a [`SourceFile`]
//! AST plus syntax diagnostics. Merging, validation and publication live in
//! `jsm-surface`.
//!
//! # Example
//!
//! ```
//! let file = jsm_syntax::parse_source_file(
//!     "base.d.ts",
//!     "/// <set id=\"base\" version=\"1.0.0\" />\ninterface Array<T> { length: int; }",
//! );
//! assert!(file.diagnostics.is_empty());
//! assert_eq!(file.statements.len(), 1);
//! ```

pub mod ast;
pub mod display;
pub mod parser;
pub mod scanner;

pub use ast::{
    Directive, FunctionNode, InterfaceNode, Keyword, LiteralType, MemberNode, MemberNodeKind,
    ObjectMember, Param, PropertyName, Signature, SourceFile, Statement, TupleElement, TypeAliasNode, TypeNode,
    TypeParam, VariableKind, VariableNode,
};
pub use parser::{ParserState, parse_source_file};
pub use scanner::{ScannerSnapshot, ScannerState, SyntaxKind};

#[cfg(test)]
#[path = "tests/scanner_tests.rs"]
mod scanner_tests;

#[cfg(test)]
#[path = "tests/parser_tests.rs"]
mod parser_tests;

#[cfg(test)]
#[path = "tests/display_tests.rs"]
mod display_tests;
