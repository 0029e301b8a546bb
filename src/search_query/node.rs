use std::fmt;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::patterns::{DATE_TOKEN, NUMBER_TOKEN};

/// Leading `+`/`-` state of a node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BoolOperator {
    #[default]
    None,
    Required,
    Prohibited,
}

impl BoolOperator {
    pub fn is_none(&self) -> bool {
        *self == BoolOperator::None
    }

    fn prefix(self) -> &'static str {
        match self {
            BoolOperator::None => "",
            BoolOperator::Required => "+",
            BoolOperator::Prohibited => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComparisonOperator {
    Eq,
    Gt,
    Gte,
    Lt,
    Lte,
}

impl ComparisonOperator {
    fn symbol(self) -> &'static str {
        match self {
            ComparisonOperator::Eq => "",
            ComparisonOperator::Gt => ">",
            ComparisonOperator::Gte => ">=",
            ComparisonOperator::Lt => "<",
            ComparisonOperator::Lte => "<=",
        }
    }
}

/// Stable tag of every node variant. Translators key off these names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeType {
    Word,
    Phrase,
    Number,
    Date,
    Url,
    Hashtag,
    Mention,
    Emoji,
    Emoticon,
    WordRange,
    NumberRange,
    DateRange,
    Filter,
    Subquery,
}

impl NodeType {
    pub fn as_str(self) -> &'static str {
        match self {
            NodeType::Word => "WORD",
            NodeType::Phrase => "PHRASE",
            NodeType::Number => "NUMBER",
            NodeType::Date => "DATE",
            NodeType::Url => "URL",
            NodeType::Hashtag => "HASHTAG",
            NodeType::Mention => "MENTION",
            NodeType::Emoji => "EMOJI",
            NodeType::Emoticon => "EMOTICON",
            NodeType::WordRange => "WORD_RANGE",
            NodeType::NumberRange => "NUMBER_RANGE",
            NodeType::DateRange => "DATE_RANGE",
            NodeType::Filter => "FILTER",
            NodeType::Subquery => "SUBQUERY",
        }
    }

    pub fn is_compound(self) -> bool {
        matches!(
            self,
            NodeType::WordRange
                | NodeType::NumberRange
                | NodeType::DateRange
                | NodeType::Filter
                | NodeType::Subquery
        )
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Interval between two bounds of the same leaf type. A missing bound is open-ended.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Range<T> {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    lower: Option<T>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    upper: Option<T>,
    #[serde(default)]
    exclusive: bool,
}

impl<T> Range<T> {
    /// Returns `None` when both bounds are missing.
    pub fn new(lower: Option<T>, upper: Option<T>, exclusive: bool) -> Option<Self> {
        if lower.is_none() && upper.is_none() {
            return None;
        }

        Some(Self {
            lower,
            upper,
            exclusive,
        })
    }

    pub fn lower_bound(&self) -> Option<&T> {
        self.lower.as_ref()
    }

    pub fn upper_bound(&self) -> Option<&T> {
        self.upper.as_ref()
    }

    pub fn is_exclusive(&self) -> bool {
        self.exclusive
    }
}

impl<T> Range<T> {
    fn write_with<F>(&self, f: &mut fmt::Formatter<'_>, mut write_bound: F) -> fmt::Result
    where
        F: FnMut(&T, &mut fmt::Formatter<'_>) -> fmt::Result,
    {
        let (open, close) = if self.exclusive { ('{', '}') } else { ('[', ']') };
        write!(f, "{open}")?;
        match &self.lower {
            Some(v) => write_bound(v, f)?,
            None => f.write_str("*")?,
        }
        f.write_str(" TO ")?;
        match &self.upper {
            Some(v) => write_bound(v, f)?,
            None => f.write_str("*")?,
        }
        write!(f, "{close}")
    }
}

impl<T: fmt::Display> fmt::Display for Range<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.write_with(f, |v, f| write!(f, "{v}"))
    }
}

/// Whether a word bound scans back as the same single word when written bare.
fn is_bare_word_bound(value: &str) -> bool {
    let (Some(first), Some(last)) = (value.chars().next(), value.chars().next_back()) else {
        return false;
    };

    first.is_alphanumeric()
        && last.is_alphanumeric()
        && !value.contains("..")
        && !value.contains(|c: char| c.is_whitespace() || "()[]{}<>^~=\\\"*".contains(c))
        && !matches!(value.to_ascii_uppercase().as_str(), "TO" | "AND" | "OR")
        && !NUMBER_TOKEN.is_match(value)
        && !DATE_TOKEN.is_match(value)
}

/// Word bounds that would scan differently are written as phrases, which parse back to word
/// bounds. A value holding a double quote cannot be quoted and is written as is.
fn write_word_bound(value: &str, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    if is_bare_word_bound(value) || value.contains('"') {
        f.write_str(value)
    } else {
        write!(f, "\"{value}\"")
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Filter {
    field: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    comparison: Option<ComparisonOperator>,
    value: Box<Node>,
}

impl Filter {
    pub fn new(field: impl Into<String>, comparison: Option<ComparisonOperator>, value: Node) -> Self {
        Self {
            field: field.into(),
            comparison,
            value: Box::new(value),
        }
    }

    pub fn field(&self) -> &str {
        &self.field
    }

    pub fn comparison(&self) -> Option<ComparisonOperator> {
        self.comparison
    }

    pub fn value(&self) -> &Node {
        &self.value
    }
}

fn is_false(value: &bool) -> bool {
    !*value
}

/// The variant part of a node.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NodeKind {
    Word {
        value: String,
        #[serde(default, skip_serializing_if = "is_false")]
        trailing_wildcard: bool,
    },
    Phrase {
        value: String,
    },
    Number {
        value: f64,
    },
    Date {
        value: String,
    },
    Url {
        value: String,
    },
    Hashtag {
        value: String,
    },
    Mention {
        value: String,
    },
    Emoji {
        value: String,
    },
    Emoticon {
        value: String,
    },
    WordRange(Range<String>),
    NumberRange(Range<f64>),
    DateRange(Range<String>),
    Filter(Filter),
    Subquery {
        nodes: Vec<Node>,
    },
}

impl NodeKind {
    pub fn node_type(&self) -> NodeType {
        match self {
            NodeKind::Word { .. } => NodeType::Word,
            NodeKind::Phrase { .. } => NodeType::Phrase,
            NodeKind::Number { .. } => NodeType::Number,
            NodeKind::Date { .. } => NodeType::Date,
            NodeKind::Url { .. } => NodeType::Url,
            NodeKind::Hashtag { .. } => NodeType::Hashtag,
            NodeKind::Mention { .. } => NodeType::Mention,
            NodeKind::Emoji { .. } => NodeType::Emoji,
            NodeKind::Emoticon { .. } => NodeType::Emoticon,
            NodeKind::WordRange(_) => NodeType::WordRange,
            NodeKind::NumberRange(_) => NodeType::NumberRange,
            NodeKind::DateRange(_) => NodeType::DateRange,
            NodeKind::Filter(_) => NodeType::Filter,
            NodeKind::Subquery { .. } => NodeType::Subquery,
        }
    }
}

/// A node of the query AST: the variant plus the modifiers every node can carry.
///
/// Nodes are built once by the parser and own their children; there are no back references.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Node {
    #[serde(flatten)]
    kind: NodeKind,
    #[serde(default, skip_serializing_if = "BoolOperator::is_none")]
    bool_operator: BoolOperator,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    boost: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    fuzzy: Option<f64>,
}

impl Node {
    pub fn new(kind: NodeKind) -> Self {
        Self {
            kind,
            bool_operator: BoolOperator::None,
            boost: None,
            fuzzy: None,
        }
    }

    pub fn word(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Word {
            value: value.into(),
            trailing_wildcard: false,
        })
    }

    pub fn wildcard_word(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Word {
            value: value.into(),
            trailing_wildcard: true,
        })
    }

    pub fn phrase(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Phrase {
            value: value.into(),
        })
    }

    pub fn number(value: f64) -> Self {
        Self::new(NodeKind::Number { value })
    }

    pub fn date(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Date {
            value: value.into(),
        })
    }

    pub fn url(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Url {
            value: value.into(),
        })
    }

    pub fn hashtag(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Hashtag {
            value: value.into(),
        })
    }

    pub fn mention(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Mention {
            value: value.into(),
        })
    }

    pub fn emoji(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Emoji {
            value: value.into(),
        })
    }

    pub fn emoticon(value: impl Into<String>) -> Self {
        Self::new(NodeKind::Emoticon {
            value: value.into(),
        })
    }

    pub fn filter(field: impl Into<String>, comparison: Option<ComparisonOperator>, value: Node) -> Self {
        Self::new(NodeKind::Filter(Filter::new(field, comparison, value)))
    }

    pub fn subquery(nodes: Vec<Node>) -> Self {
        Self::new(NodeKind::Subquery { nodes })
    }

    pub fn with_bool_operator(mut self, bool_operator: BoolOperator) -> Self {
        self.bool_operator = bool_operator;
        self
    }

    pub fn with_boost(mut self, boost: f64) -> Self {
        self.boost = Some(boost);
        self
    }

    pub fn with_fuzzy(mut self, fuzzy: f64) -> Self {
        self.fuzzy = Some(fuzzy);
        self
    }

    pub fn kind(&self) -> &NodeKind {
        &self.kind
    }

    pub fn node_type(&self) -> NodeType {
        self.kind.node_type()
    }

    pub fn is_compound(&self) -> bool {
        self.node_type().is_compound()
    }

    pub fn bool_operator(&self) -> BoolOperator {
        self.bool_operator
    }

    pub fn boost(&self) -> Option<f64> {
        self.boost
    }

    pub fn fuzzy(&self) -> Option<f64> {
        self.fuzzy
    }

    pub fn is_required(&self) -> bool {
        self.bool_operator == BoolOperator::Required
    }

    pub fn is_prohibited(&self) -> bool {
        self.bool_operator == BoolOperator::Prohibited
    }

    /// Fuzzy only means something for words and phrases, directly or as a filter value.
    pub fn supports_fuzzy(&self) -> bool {
        match &self.kind {
            NodeKind::Word { .. } | NodeKind::Phrase { .. } => true,
            NodeKind::Filter(filter) => filter.value().supports_fuzzy(),
            _ => false,
        }
    }

    /// Text of a leaf node that carries a string.
    pub fn text(&self) -> Option<&str> {
        match &self.kind {
            NodeKind::Word { value, .. }
            | NodeKind::Phrase { value }
            | NodeKind::Date { value }
            | NodeKind::Url { value }
            | NodeKind::Hashtag { value }
            | NodeKind::Mention { value }
            | NodeKind::Emoji { value }
            | NodeKind::Emoticon { value } => Some(value),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.kind {
            NodeKind::Number { value } => Some(value),
            _ => None,
        }
    }

    pub fn as_filter(&self) -> Option<&Filter> {
        match &self.kind {
            NodeKind::Filter(filter) => Some(filter),
            _ => None,
        }
    }

    /// Children of a subquery, empty for every other node.
    pub fn children(&self) -> &[Node] {
        match &self.kind {
            NodeKind::Subquery { nodes } => nodes,
            _ => &[],
        }
    }

    /// Calendar date of a `Date` node. The scanner only checks the digit layout, so an
    /// impossible date such as `2015-13-45` yields `None`.
    pub fn to_naive_date(&self) -> Option<NaiveDate> {
        match &self.kind {
            NodeKind::Date { value } => NaiveDate::parse_from_str(value, "%Y-%m-%d").ok(),
            _ => None,
        }
    }

    pub fn to_url(&self) -> Option<url::Url> {
        match &self.kind {
            NodeKind::Url { value } => url::Url::parse(value).ok(),
            _ => None,
        }
    }
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.bool_operator.prefix())?;

        match &self.kind {
            NodeKind::Word {
                value,
                trailing_wildcard,
            } => {
                f.write_str(value)?;
                if *trailing_wildcard {
                    f.write_str("*")?;
                }
            }
            NodeKind::Phrase { value } => write!(f, "\"{value}\"")?,
            NodeKind::Number { value } => write!(f, "{value}")?,
            NodeKind::Hashtag { value } => write!(f, "#{value}")?,
            NodeKind::Mention { value } => write!(f, "@{value}")?,
            NodeKind::Date { value }
            | NodeKind::Url { value }
            | NodeKind::Emoji { value }
            | NodeKind::Emoticon { value } => f.write_str(value)?,
            NodeKind::WordRange(range) => range.write_with(f, |v, f| write_word_bound(v, f))?,
            NodeKind::DateRange(range) => write!(f, "{range}")?,
            NodeKind::NumberRange(range) => write!(f, "{range}")?,
            NodeKind::Filter(filter) => write!(
                f,
                "{}:{}{}",
                filter.field,
                filter.comparison.map_or("", ComparisonOperator::symbol),
                filter.value
            )?,
            NodeKind::Subquery { nodes } => {
                f.write_str("(")?;
                for (i, node) in nodes.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" ")?;
                    }
                    write!(f, "{node}")?;
                }
                f.write_str(")")?;
            }
        }

        if let Some(boost) = self.boost {
            write!(f, "^{boost}")?;
        }
        if let Some(fuzzy) = self.fuzzy {
            write!(f, "~{fuzzy}")?;
        }

        Ok(())
    }
}
