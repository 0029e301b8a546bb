use super::node::{Filter, Node, NodeKind};

/// Read-only traversal hooks for turning a parsed query into something else (SQL, a search
/// engine DSL, ...). Every hook defaults to doing nothing.
pub trait QueryVisitor {
    /// Word, phrase, number, date, url, hashtag, mention, emoji and emoticon nodes.
    fn visit_leaf(&mut self, _node: &Node) {}

    /// Word, number and date ranges.
    fn visit_range(&mut self, _node: &Node) {}

    fn enter_filter(&mut self, _node: &Node, _filter: &Filter) {}

    fn leave_filter(&mut self, _node: &Node, _filter: &Filter) {}

    fn enter_subquery(&mut self, _node: &Node) {}

    fn leave_subquery(&mut self, _node: &Node) {}
}

/// Walks `node` depth-first, descending into filter values and subquery children.
pub fn walk<V: QueryVisitor + ?Sized>(visitor: &mut V, node: &Node) {
    match node.kind() {
        NodeKind::WordRange(_) | NodeKind::NumberRange(_) | NodeKind::DateRange(_) => {
            visitor.visit_range(node)
        }
        NodeKind::Filter(filter) => {
            visitor.enter_filter(node, filter);
            walk(visitor, filter.value());
            visitor.leave_filter(node, filter);
        }
        NodeKind::Subquery { nodes } => {
            visitor.enter_subquery(node);
            for child in nodes {
                walk(visitor, child);
            }
            visitor.leave_subquery(node);
        }
        _ => visitor.visit_leaf(node),
    }
}
