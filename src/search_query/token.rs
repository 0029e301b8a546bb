use std::collections::HashMap;
use std::fmt;

use once_cell::sync::Lazy;
use serde::{Serialize, Serializer};

/// Kind of a scanned token.
///
/// Discriminants follow three bands so a kind can be classified from its code alone:
/// - `< 100`: operators and punctuation
/// - `100..200`: identifiers (tokens that carry text)
/// - `>= 200`: keywords
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum TokenKind {
    WhiteSpace = 0,
    Number = 1,         // 10, 0.8, .64, 6.022e23
    Required = 2,       // +
    Prohibited = 3,     // -
    GreaterThan = 4,    // >
    LessThan = 5,       // <
    Equals = 6,         // =
    Fuzzy = 7,          // ~
    Boost = 8,          // ^
    RangeInclStart = 9, // [
    RangeInclEnd = 10,  // ]
    RangeExclStart = 11, // {
    RangeExclEnd = 12,  // }
    SubqueryStart = 13, // (
    SubqueryEnd = 14,   // )
    Wildcard = 15,      // *

    Ignored = 100,
    Word = 101,
    FilterStart = 102, // the "field" of "field:value"
    FilterEnd = 103,   // never carries a value
    Phrase = 104,
    Url = 105,
    Date = 106, // YYYY-MM-DD
    Hashtag = 107,
    Mention = 108,
    Emoticon = 109,
    Emoji = 110,

    And = 200, // AND, &&
    Or = 201,  // OR, ||
    To = 202,  // TO, ..
}

static KINDS_BY_CODE: Lazy<HashMap<u16, TokenKind>> = Lazy::new(|| {
    TokenKind::ALL
        .iter()
        .map(|kind| (kind.code(), *kind))
        .collect()
});

impl TokenKind {
    pub const ALL: [TokenKind; 30] = [
        TokenKind::WhiteSpace,
        TokenKind::Number,
        TokenKind::Required,
        TokenKind::Prohibited,
        TokenKind::GreaterThan,
        TokenKind::LessThan,
        TokenKind::Equals,
        TokenKind::Fuzzy,
        TokenKind::Boost,
        TokenKind::RangeInclStart,
        TokenKind::RangeInclEnd,
        TokenKind::RangeExclStart,
        TokenKind::RangeExclEnd,
        TokenKind::SubqueryStart,
        TokenKind::SubqueryEnd,
        TokenKind::Wildcard,
        TokenKind::Ignored,
        TokenKind::Word,
        TokenKind::FilterStart,
        TokenKind::FilterEnd,
        TokenKind::Phrase,
        TokenKind::Url,
        TokenKind::Date,
        TokenKind::Hashtag,
        TokenKind::Mention,
        TokenKind::Emoticon,
        TokenKind::Emoji,
        TokenKind::And,
        TokenKind::Or,
        TokenKind::To,
    ];

    pub fn code(self) -> u16 {
        self as u16
    }

    /// Looks a kind up by its numeric code in the process-wide table.
    pub fn from_code(code: u16) -> Option<TokenKind> {
        KINDS_BY_CODE.get(&code).copied()
    }

    /// Display name for a numeric code, e.g. `T_WORD` for 101.
    pub fn type_name(code: u16) -> Option<&'static str> {
        Self::from_code(code).map(TokenKind::name)
    }

    pub fn name(self) -> &'static str {
        match self {
            TokenKind::WhiteSpace => "T_WHITE_SPACE",
            TokenKind::Number => "T_NUMBER",
            TokenKind::Required => "T_REQUIRED",
            TokenKind::Prohibited => "T_PROHIBITED",
            TokenKind::GreaterThan => "T_GREATER_THAN",
            TokenKind::LessThan => "T_LESS_THAN",
            TokenKind::Equals => "T_EQUALS",
            TokenKind::Fuzzy => "T_FUZZY",
            TokenKind::Boost => "T_BOOST",
            TokenKind::RangeInclStart => "T_RANGE_INCL_START",
            TokenKind::RangeInclEnd => "T_RANGE_INCL_END",
            TokenKind::RangeExclStart => "T_RANGE_EXCL_START",
            TokenKind::RangeExclEnd => "T_RANGE_EXCL_END",
            TokenKind::SubqueryStart => "T_SUBQUERY_START",
            TokenKind::SubqueryEnd => "T_SUBQUERY_END",
            TokenKind::Wildcard => "T_WILDCARD",
            TokenKind::Ignored => "T_IGNORED",
            TokenKind::Word => "T_WORD",
            TokenKind::FilterStart => "T_FILTER_START",
            TokenKind::FilterEnd => "T_FILTER_END",
            TokenKind::Phrase => "T_PHRASE",
            TokenKind::Url => "T_URL",
            TokenKind::Date => "T_DATE",
            TokenKind::Hashtag => "T_HASHTAG",
            TokenKind::Mention => "T_MENTION",
            TokenKind::Emoticon => "T_EMOTICON",
            TokenKind::Emoji => "T_EMOJI",
            TokenKind::And => "T_AND",
            TokenKind::Or => "T_OR",
            TokenKind::To => "T_TO",
        }
    }

    pub fn is_operator(self) -> bool {
        self.code() < 100
    }

    pub fn is_identifier(self) -> bool {
        (100..200).contains(&self.code())
    }

    pub fn is_keyword(self) -> bool {
        self.code() >= 200
    }

    pub fn is_range_start(self) -> bool {
        matches!(self, TokenKind::RangeInclStart | TokenKind::RangeExclStart)
    }

    pub fn is_range_end(self) -> bool {
        matches!(self, TokenKind::RangeInclEnd | TokenKind::RangeExclEnd)
    }
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl Serialize for TokenKind {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(self.name())
    }
}

/// Literal carried by a token: numbers are floats, everything else is trimmed text.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Literal {
    Number(f64),
    Text(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Token {
    #[serde(rename = "type")]
    pub kind: TokenKind,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub value: Option<Literal>,
}

impl Token {
    pub fn new(kind: TokenKind) -> Self {
        Self { kind, value: None }
    }

    pub fn text(kind: TokenKind, value: impl Into<String>) -> Self {
        Self {
            kind,
            value: Some(Literal::Text(value.into())),
        }
    }

    pub fn number(value: f64) -> Self {
        Self {
            kind: TokenKind::Number,
            value: Some(Literal::Number(value)),
        }
    }

    pub fn is(&self, kind: TokenKind) -> bool {
        self.kind == kind
    }

    pub fn as_text(&self) -> Option<&str> {
        match &self.value {
            Some(Literal::Text(s)) => Some(s),
            _ => None,
        }
    }

    pub fn as_number(&self) -> Option<f64> {
        match self.value {
            Some(Literal::Number(n)) => Some(n),
            _ => None,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(Literal::Text(s)) => write!(f, "{}({})", self.kind, s),
            Some(Literal::Number(n)) => write!(f, "{}({})", self.kind, n),
            None => write!(f, "{}", self.kind),
        }
    }
}
