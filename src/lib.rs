//! Tokenizer and parser for Lucene-style search boxes.
//!
//! ```
//! use qsparse::search_query::{NodeType, QueryParser};
//!
//! let query = QueryParser::new().parse("+title:rust -draft");
//! assert_eq!(query.len(), 2);
//! assert_eq!(query.nodes()[0].node_type(), NodeType::Filter);
//! ```

pub mod config;
pub mod search_query;
