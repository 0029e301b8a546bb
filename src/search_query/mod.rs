mod errors;
mod lexer;
mod node;
mod parser;
mod patterns;
mod stream;
mod token;
mod visitor;

use std::fmt;

use serde::Serialize;

use crate::config::Config;

pub use errors::QueryError;
pub use lexer::scan;
pub use node::{BoolOperator, ComparisonOperator, Filter, Node, NodeKind, NodeType, Range};
pub use parser::{parse, Parser};
pub use stream::TokenStream;
pub use token::{Literal, Token, TokenKind};
pub use visitor::{walk, QueryVisitor};

/// Top-level nodes of one parsed query, in source order.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(transparent)]
pub struct ParsedQuery {
    nodes: Vec<Node>,
}

impl ParsedQuery {
    pub fn new(nodes: Vec<Node>) -> Self {
        Self { nodes }
    }

    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    pub fn into_nodes(self) -> Vec<Node> {
        self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Top-level nodes of the given type.
    pub fn nodes_of_type(&self, node_type: NodeType) -> impl Iterator<Item = &Node> {
        self.nodes.iter().filter(move |n| n.node_type() == node_type)
    }

    /// A query made only of prohibited nodes cannot match anything on its own.
    pub fn has_matchable_node(&self) -> bool {
        self.nodes.iter().any(|n| !n.is_prohibited())
    }

    pub fn accept<V: QueryVisitor + ?Sized>(&self, visitor: &mut V) {
        for node in &self.nodes {
            walk(visitor, node);
        }
    }
}

impl fmt::Display for ParsedQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, node) in self.nodes.iter().enumerate() {
            if i > 0 {
                f.write_str(" ")?;
            }
            write!(f, "{node}")?;
        }
        Ok(())
    }
}

impl IntoIterator for ParsedQuery {
    type Item = Node;
    type IntoIter = std::vec::IntoIter<Node>;

    fn into_iter(self) -> Self::IntoIter {
        self.nodes.into_iter()
    }
}

/// Scans and parses query strings with one configuration.
///
/// Holds no per-query state, so one instance can serve any number of queries.
#[derive(Debug, Clone, Default)]
pub struct QueryParser {
    config: Config,
}

impl QueryParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_config(mut config: Config) -> Self {
        config.validate();
        Self { config }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Parses any input. Malformed syntax degrades instead of failing.
    pub fn parse(&self, input: &str) -> ParsedQuery {
        let stream = scan(input);
        ParsedQuery::new(Parser::new(stream, self.config.clone()).parse())
    }

    /// Like [`QueryParser::parse`], but rejects inputs over the configured length.
    pub fn try_parse(&self, input: &str) -> Result<ParsedQuery, QueryError> {
        if input.len() > self.config.max_input_len {
            return Err(QueryError::InputTooLong {
                len: input.len(),
                max: self.config.max_input_len,
            });
        }

        Ok(self.parse(input))
    }
}

#[cfg(test)]
mod tests;
