//! Predicate compiler for query-builder filter trees.
//!
//! This crate turns the nested rule/group expressions authored in a visual
//! query builder into typed record predicates that a paginated scan can apply
//! one record at a time.
//!
//! # Pipeline
//!
//! 1. [`QueryParser`] parses the serialized tree and field catalog.
//! 2. [`compile`] resolves each rule's field against the [`FieldCatalog`],
//!    coerces its value once, and builds a [`Predicate`].
//! 3. The scan calls [`Predicate::matches`] for every candidate record.
//!
//! # Operators
//!
//! `=`, `!=`, `<`, `>`, `<=`, `>=`, `contains`, `beginsWith`, `endsWith`,
//! `doesNotContain`.
//!
//! Records whose field is missing, `null` or `""` never satisfy `contains`,
//! `beginsWith` or `endsWith`, always satisfy `doesNotContain`, and satisfy
//! `=` only when the rule value is itself empty.
//!
//! # Example
//!
//! ```
//! use qq_predicate::{compile, QueryParser};
//! use serde_json::json;
//!
//! let tree = QueryParser::parse(
//!     r#"{"combinator": "or", "rules": [
//!         {"field": "isActive", "operator": "=", "value": "true"},
//!         {"field": "totalScore", "operator": ">=", "value": "9000"}
//!     ]}"#,
//! ).unwrap();
//! let catalog = QueryParser::parse_fields(
//!     r#"[{"name": "isActive", "type": "boolean"}, {"name": "totalScore", "type": "number"}]"#,
//! ).unwrap();
//!
//! let predicate = compile(&tree, &catalog);
//! assert!(predicate.matches(&json!({"isActive": false, "totalScore": 9500})));
//! assert!(!predicate.matches(&json!({"isActive": false, "totalScore": 10})));
//! ```

mod ast;
mod catalog;
mod compiler;
mod error;
mod parser;
mod record;
pub mod value;

pub use ast::{Combinator, Group, Operator, QueryNode, Rule};
pub use catalog::{resolve, FieldCatalog, FieldDescriptor, SemanticType};
pub use compiler::{compile, compile_with, CompileOptions, Predicate};
pub use error::{QueryError, QueryResult};
pub use parser::QueryParser;
pub use record::FieldSource;
