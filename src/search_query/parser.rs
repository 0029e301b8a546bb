use crate::config::Config;

use super::node::{BoolOperator, ComparisonOperator, Node, NodeKind, Range};
use super::stream::TokenStream;
use super::token::{Token, TokenKind};

/// Builds nodes out of a scanned token stream with default modifier limits.
///
/// Never fails: tokens that do not fit where they appear are skipped.
pub fn parse(stream: TokenStream) -> Vec<Node> {
    Parser::new(stream, Config::default()).parse()
}

/// Leaf type a range bound belongs to. Both bounds of a range must share one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BoundClass {
    Word,
    Number,
    Date,
}

fn bound_class(node: &Node) -> Option<BoundClass> {
    match node.kind() {
        NodeKind::Word { .. } | NodeKind::Phrase { .. } => Some(BoundClass::Word),
        NodeKind::Number { .. } => Some(BoundClass::Number),
        NodeKind::Date { .. } => Some(BoundClass::Date),
        _ => None,
    }
}

fn text_bound(node: Option<&Node>) -> Option<String> {
    node.and_then(Node::text).map(str::to_owned)
}

enum RangeOutcome {
    Range(Node),
    /// Bounds that could not form a range, in source order. Empty when both sides were open.
    Leaves(Vec<Node>),
    /// No matching end bracket; the start bracket was skipped.
    Unterminated,
}

pub struct Parser {
    stream: TokenStream,
    config: Config,
    in_subquery: bool,
}

impl Parser {
    pub fn new(stream: TokenStream, config: Config) -> Self {
        Self {
            stream,
            config,
            in_subquery: false,
        }
    }

    pub fn parse(mut self) -> Vec<Node> {
        self.stream.reset();
        self.stream.move_next();

        let nodes = self.parse_sequence();
        log::trace!("parsed {} top-level nodes", nodes.len());
        nodes
    }

    /// Consumes the lookahead and returns it.
    fn bump(&mut self) -> Option<Token> {
        self.stream.lookahead()?;
        self.stream.move_next();
        self.stream.current().cloned()
    }

    fn next_kind(&self) -> Option<TokenKind> {
        self.stream.lookahead().map(|t| t.kind)
    }

    /// Parses nodes until the end of input, or inside a subquery until its closing token.
    fn parse_sequence(&mut self) -> Vec<Node> {
        let mut nodes = Vec::new();
        let mut pending = BoolOperator::None;

        while let Some(token) = self.bump() {
            let produced = match token.kind {
                TokenKind::Required => {
                    pending = BoolOperator::Required;
                    continue;
                }
                TokenKind::Prohibited => {
                    pending = BoolOperator::Prohibited;
                    continue;
                }
                // adjacency already means AND; OR carries no structure of its own
                TokenKind::And | TokenKind::Or => continue,
                TokenKind::SubqueryEnd => {
                    if self.in_subquery {
                        break;
                    }
                    log::debug!("ignoring unmatched subquery end");
                    continue;
                }
                TokenKind::SubqueryStart => {
                    if self.in_subquery {
                        log::debug!("ignoring nested subquery start");
                        continue;
                    }
                    self.parse_subquery().into_iter().collect()
                }
                TokenKind::FilterStart => {
                    let field = token.as_text().unwrap_or_default().to_owned();
                    self.parse_filter(field, &mut pending)
                }
                TokenKind::RangeInclStart | TokenKind::RangeExclStart => {
                    match self.parse_range(token.kind) {
                        RangeOutcome::Range(node) => vec![node],
                        RangeOutcome::Leaves(leaves) => leaves,
                        RangeOutcome::Unterminated => continue,
                    }
                }
                TokenKind::Boost | TokenKind::Fuzzy => {
                    log::debug!("dropping {} with nothing to modify", token.kind);
                    self.skip_modifier_value();
                    continue;
                }
                _ => match self.leaf(&token) {
                    Some(node) => vec![node],
                    None => {
                        log::trace!("skipping unexpected {token}");
                        continue;
                    }
                },
            };

            // an operator in front of a construct that yielded nothing is spent as well
            self.push_nodes(&mut nodes, produced, pending);
            pending = BoolOperator::None;
        }

        nodes
    }

    /// Appends freshly parsed nodes: the first takes the pending operator, the last takes any
    /// modifiers that follow.
    fn push_nodes(&mut self, out: &mut Vec<Node>, produced: Vec<Node>, bool_operator: BoolOperator) {
        let count = produced.len();
        for (i, node) in produced.into_iter().enumerate() {
            let node = if i == 0 {
                node.with_bool_operator(bool_operator)
            } else {
                node
            };
            let node = if i + 1 == count {
                self.apply_modifiers(node)
            } else {
                node
            };
            out.push(node);
        }
    }

    /// Builds a leaf node from a value token. A word directly followed by a wildcard absorbs it.
    fn leaf(&mut self, token: &Token) -> Option<Node> {
        let node = match token.kind {
            TokenKind::Word => {
                let value = token.as_text()?;
                if self.stream.is_next_token(TokenKind::Wildcard) {
                    self.bump();
                    Node::wildcard_word(value)
                } else {
                    Node::word(value)
                }
            }
            TokenKind::Phrase => Node::phrase(token.as_text()?),
            TokenKind::Number => Node::number(token.as_number()?),
            TokenKind::Date => Node::date(token.as_text()?),
            TokenKind::Url => Node::url(token.as_text()?),
            TokenKind::Hashtag => Node::hashtag(token.as_text()?),
            TokenKind::Mention => Node::mention(token.as_text()?),
            TokenKind::Emoji => Node::emoji(token.as_text()?),
            TokenKind::Emoticon => Node::emoticon(token.as_text()?),
            _ => return None,
        };

        Some(node)
    }

    fn is_leaf_kind(kind: TokenKind) -> bool {
        matches!(
            kind,
            TokenKind::Word
                | TokenKind::Phrase
                | TokenKind::Number
                | TokenKind::Date
                | TokenKind::Url
                | TokenKind::Hashtag
                | TokenKind::Mention
                | TokenKind::Emoji
                | TokenKind::Emoticon
        )
    }

    fn parse_subquery(&mut self) -> Option<Node> {
        self.in_subquery = true;
        let nodes = self.parse_sequence();
        self.in_subquery = false;

        if nodes.is_empty() {
            log::debug!("dropping empty subquery");
            return None;
        }

        Some(Node::subquery(nodes))
    }

    /// Parses the value position of a filter whose start token was just consumed.
    ///
    /// Operators met before the value apply to the filter. Tokens that cannot belong to the
    /// filter are left for the caller, so a missing filter end does not swallow the rest of the
    /// query.
    fn parse_filter(&mut self, field: String, pending: &mut BoolOperator) -> Vec<Node> {
        let mut comparison = None;
        let mut value: Option<Node> = None;

        while let Some(kind) = self.next_kind() {
            match kind {
                TokenKind::FilterEnd => {
                    self.bump();
                    break;
                }
                TokenKind::Required | TokenKind::Prohibited if value.is_none() => {
                    self.bump();
                    *pending = if kind == TokenKind::Required {
                        BoolOperator::Required
                    } else {
                        BoolOperator::Prohibited
                    };
                }
                TokenKind::GreaterThan | TokenKind::LessThan if value.is_none() => {
                    self.bump();
                    let or_equal = self.stream.is_next_token(TokenKind::Equals);
                    if or_equal {
                        self.bump();
                    }
                    comparison = Some(match (kind, or_equal) {
                        (TokenKind::GreaterThan, false) => ComparisonOperator::Gt,
                        (TokenKind::GreaterThan, true) => ComparisonOperator::Gte,
                        (_, false) => ComparisonOperator::Lt,
                        (_, true) => ComparisonOperator::Lte,
                    });
                }
                TokenKind::Equals if value.is_none() => {
                    self.bump();
                }
                TokenKind::SubqueryStart if value.is_none() && !self.in_subquery => {
                    self.bump();
                    value = self.parse_subquery();
                }
                TokenKind::RangeInclStart | TokenKind::RangeExclStart if value.is_none() => {
                    self.bump();
                    match self.parse_range(kind) {
                        RangeOutcome::Range(node) => value = Some(node),
                        RangeOutcome::Leaves(leaves) => {
                            log::debug!("dropping filter {field:?}, its range did not resolve");
                            self.skip_filter_end();
                            return leaves;
                        }
                        RangeOutcome::Unterminated => {}
                    }
                }
                kind if value.is_none() && Self::is_leaf_kind(kind) => {
                    let token = self.bump();
                    value = token.and_then(|token| self.leaf(&token));
                }
                _ => break,
            }
        }

        let Some(value) = value else {
            log::debug!("dropping filter {field:?} without a value");
            return Vec::new();
        };

        if comparison.is_some() && value.is_compound() {
            log::debug!("dropping comparison on compound value of filter {field:?}");
            comparison = None;
        }

        vec![Node::filter(field, comparison, value)]
    }

    fn skip_filter_end(&mut self) {
        if self.stream.is_next_token(TokenKind::FilterEnd) {
            self.bump();
        }
    }

    /// Whether a range end follows before the enclosing filter (or the input) ends.
    fn has_range_end(&mut self) -> bool {
        let mut next = self.next_kind();
        let found = loop {
            match next {
                Some(kind) if kind.is_range_end() => break true,
                None
                | Some(
                    TokenKind::FilterEnd
                    | TokenKind::RangeInclStart
                    | TokenKind::RangeExclStart
                    | TokenKind::SubqueryStart
                    | TokenKind::SubqueryEnd,
                ) => break false,
                Some(_) => next = self.stream.peek().map(|t| t.kind),
            }
        };

        self.stream.reset_peek();
        found
    }

    /// Parses `lower TO upper]` after a range start of the given kind was consumed.
    fn parse_range(&mut self, start: TokenKind) -> RangeOutcome {
        if !self.has_range_end() {
            log::debug!("skipping unterminated range start");
            return RangeOutcome::Unterminated;
        }

        let exclusive = start == TokenKind::RangeExclStart;

        let lower = self.parse_bound();
        while self
            .next_kind()
            .is_some_and(|kind| kind != TokenKind::To && !kind.is_range_end())
        {
            self.bump();
        }
        if self.stream.is_next_token(TokenKind::To) {
            self.bump();
        }

        let upper = self.parse_bound();
        while self.next_kind().is_some_and(|kind| !kind.is_range_end()) {
            self.bump();
        }
        self.bump();

        Self::build_range(lower, upper, exclusive)
    }

    /// Reads one range bound. `None` is an open side: a `*` or nothing at all.
    fn parse_bound(&mut self) -> Option<Node> {
        match self.next_kind()? {
            TokenKind::Wildcard => {
                self.bump();
                None
            }
            kind if Self::is_leaf_kind(kind) => {
                let token = self.bump()?;
                // a wildcard inside a bound is not meaningful, keep the plain leaf
                self.leaf(&token)
            }
            _ => None,
        }
    }

    fn build_range(lower: Option<Node>, upper: Option<Node>, exclusive: bool) -> RangeOutcome {
        let class = match (&lower, &upper) {
            (None, None) => {
                log::debug!("dropping range with both sides open");
                return RangeOutcome::Leaves(Vec::new());
            }
            (Some(bound), None) | (None, Some(bound)) => bound_class(bound),
            (Some(l), Some(u)) => bound_class(l).filter(|class| bound_class(u) == Some(*class)),
        };

        let Some(class) = class else {
            log::debug!("range bounds differ in type, keeping them as plain values");
            return RangeOutcome::Leaves(lower.into_iter().chain(upper).collect());
        };

        let kind = match class {
            BoundClass::Word => Range::new(
                text_bound(lower.as_ref()),
                text_bound(upper.as_ref()),
                exclusive,
            )
            .map(NodeKind::WordRange),
            BoundClass::Number => Range::new(
                lower.as_ref().and_then(Node::as_number),
                upper.as_ref().and_then(Node::as_number),
                exclusive,
            )
            .map(NodeKind::NumberRange),
            BoundClass::Date => Range::new(
                text_bound(lower.as_ref()),
                text_bound(upper.as_ref()),
                exclusive,
            )
            .map(NodeKind::DateRange),
        };

        match kind {
            Some(kind) => RangeOutcome::Range(Node::new(kind)),
            None => RangeOutcome::Leaves(Vec::new()),
        }
    }

    /// Attaches every boost and fuzzy directly following `node`.
    fn apply_modifiers(&mut self, mut node: Node) -> Node {
        loop {
            match self.next_kind() {
                Some(TokenKind::Boost) => {
                    self.bump();
                    let boost =
                        self.modifier_value(self.config.default_boost, self.config.max_boost);
                    node = node.with_boost(boost);
                }
                Some(TokenKind::Fuzzy) => {
                    self.bump();
                    let fuzzy =
                        self.modifier_value(self.config.default_fuzzy, self.config.max_fuzzy);
                    if node.supports_fuzzy() {
                        node = node.with_fuzzy(fuzzy);
                    } else {
                        log::debug!("dropping fuzzy on {}", node.node_type());
                    }
                }
                _ => return node,
            }
        }
    }

    /// Consumes the number after a modifier, if any, clamped to `[0, max]`.
    fn modifier_value(&mut self, default: f64, max: f64) -> f64 {
        let raw = if self.stream.is_next_token(TokenKind::Number) {
            self.bump().and_then(|t| t.as_number())
        } else {
            None
        };

        match raw {
            Some(value) if value.is_finite() => value.max(0.0).min(max),
            _ => default,
        }
    }

    fn skip_modifier_value(&mut self) {
        if self.stream.is_next_token(TokenKind::Number) {
            self.bump();
        }
    }
}
