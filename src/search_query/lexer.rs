//! Turns raw query text into a flat token stream.
//!
//! Scanning runs in two passes: the normalized input is cut into chunks by the splitter
//! patterns, then each chunk is classified. Classification depends on what came before
//! (open filter, subquery or range, and the last emitted token), which is how `field:value`,
//! `[1..5]` and `(a b)` are told apart from plain words.

use super::patterns::{
    rtrim_ignored, trim_ignored, DATE_TOKEN, IGNORED_LEAD_TRAIL_CHARS, EMOJI_TOKEN, EMOTICON_TOKEN, FIELD_TOKEN,
    HASHTAG_TOKEN, MENTION_TOKEN, NUMBER_TOKEN, PHRASE_TOKEN, SPLIT_ALTERNATIVES, SPLIT_EMOTICON,
    URL_TOKEN, WHITESPACE_RUN,
};
use super::stream::TokenStream;
use super::token::{Literal, Token, TokenKind};

/// Which kind of range is currently open, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RangeMode {
    Closed,
    Inclusive,
    Exclusive,
}

/// Scans `input` into a token stream. Whitespace and ignored tokens are not part of the result.
///
/// Never fails: anything that cannot be classified degrades to a word or is dropped.
pub fn scan(input: &str) -> TokenStream {
    let padded = format!(" {input}");
    let normalized = WHITESPACE_RUN.replace_all(&padded, " ");
    let mut scanner = Scanner::new();

    for chunk in split_input(&normalized) {
        scanner.extract_tokens(trim_ascii_space(chunk));

        if scanner.last_kind() == TokenKind::WhiteSpace
            && scanner.in_filter
            && scanner.range == RangeMode::Closed
            && !scanner.in_subquery
        {
            scanner.close_filter();
        }
    }

    scanner.finish()
}

/// Cuts normalized input into chunks. Each position is matched against the splitter
/// alternatives in priority order; a character none of them can consume becomes its own chunk,
/// so every character of the input ends up in exactly one chunk.
fn split_input(input: &str) -> Vec<&str> {
    let mut chunks = Vec::new();
    let mut pos = 0;

    while pos < input.len() {
        let len = match match_chunk(input, pos) {
            Some(len) => len,
            None => input[pos..].chars().next().map_or(1, char::len_utf8),
        };
        chunks.push(&input[pos..pos + len]);
        pos += len;
    }

    chunks
}

fn match_chunk(input: &str, pos: usize) -> Option<usize> {
    let rest = &input[pos..];
    let after_space = input[..pos].chars().next_back().map_or(true, char::is_whitespace);

    if after_space {
        if let Some(m) = SPLIT_EMOTICON.find(rest) {
            return Some(m.end());
        }
    }

    SPLIT_ALTERNATIVES
        .iter()
        .find_map(|re| re.find(rest).map(|m| m.end()).filter(|len| *len > 0))
}

fn trim_ascii_space(value: &str) -> &str {
    value.trim_matches(|c| matches!(c, ' ' | '\t' | '\n' | '\r' | '\0' | '\x0B'))
}

/// Parses a numeric chunk. Literals that overflow to infinity are left to the word rules.
fn is_numeric(value: &str) -> Option<f64> {
    if NUMBER_TOKEN.is_match(value) {
        value.parse::<f64>().ok().filter(|n| n.is_finite())
    } else {
        None
    }
}

struct Scanner {
    tokens: Vec<Token>,
    last: Token,
    in_filter: bool,
    // only one level of subquery is supported
    in_subquery: bool,
    range: RangeMode,
}

impl Scanner {
    fn new() -> Self {
        Self {
            tokens: Vec::new(),
            last: Token::new(TokenKind::WhiteSpace),
            in_filter: false,
            in_subquery: false,
            range: RangeMode::Closed,
        }
    }

    fn last_kind(&self) -> TokenKind {
        self.last.kind
    }

    fn finish(mut self) -> TokenStream {
        if self.in_subquery {
            log::debug!("closing unterminated subquery at end of input");
            self.in_subquery = false;
            self.add(Token::new(TokenKind::SubqueryEnd));
        }

        if self.in_filter {
            self.close_filter();
        }

        let tokens: Vec<Token> = self
            .tokens
            .into_iter()
            .filter(|t| !matches!(t.kind, TokenKind::WhiteSpace | TokenKind::Ignored))
            .collect();

        log::trace!("scanned {} tokens", tokens.len());
        TokenStream::new(tokens)
    }

    fn add(&mut self, token: Token) {
        self.last = token.clone();
        self.tokens.push(token);
    }

    /// Adds a valueless token unless the previous token has the same kind.
    fn add_once(&mut self, kind: TokenKind) {
        if self.last.kind != kind {
            self.add(Token::new(kind));
        }
    }

    fn close_filter(&mut self) {
        self.in_filter = false;
        self.add_once(TokenKind::FilterEnd);
    }

    /// Adds a word, gluing it onto a directly preceding word that ends in `:`, so a value that
    /// looks like another field (`field:sub:value`) stays one word.
    fn add_word(&mut self, value: &str) {
        let merged = match &self.last {
            Token {
                kind: TokenKind::Word,
                value: Some(Literal::Text(prev)),
            } if prev.ends_with(':') => Some(format!("{prev}{value}")),
            _ => None,
        };

        match merged {
            Some(word) => {
                self.tokens.pop();
                self.add(Token::text(TokenKind::Word, word));
            }
            None => self.add(Token::text(TokenKind::Word, value)),
        }
    }

    fn extract_tokens(&mut self, value: &str) {
        if value.is_empty() {
            self.add_once(TokenKind::WhiteSpace);
            return;
        }

        if let Some(number) = is_numeric(value) {
            self.add(Token::number(number));
            return;
        }

        if self.extract_symbol_or_keyword(value) {
            return;
        }

        let value = if let Some(rest) = value.strip_prefix('+') {
            self.add_once(TokenKind::Required);
            rest
        } else if let Some(rest) = value.strip_prefix('-') {
            self.add_once(TokenKind::Prohibited);
            rest
        } else {
            value
        };

        if EMOTICON_TOKEN.is_match(value) {
            self.add(Token::text(TokenKind::Emoticon, trim_ignored(value)));
            return;
        }

        if EMOJI_TOKEN.is_match(value) {
            self.add(Token::text(TokenKind::Emoji, trim_ignored(value)));
            return;
        }

        if URL_TOKEN.is_match(value) {
            self.add(Token::text(TokenKind::Url, trim_ignored(value)));
            return;
        }

        if !self.in_filter
            && !self.in_subquery
            && matches!(
                self.last.kind,
                TokenKind::WhiteSpace
                    | TokenKind::Required
                    | TokenKind::Prohibited
                    | TokenKind::FilterEnd
            )
            && FIELD_TOKEN.is_match(value)
        {
            self.in_filter = true;
            self.add(Token::text(
                TokenKind::FilterStart,
                value.trim_end_matches(':'),
            ));
            return;
        }

        if PHRASE_TOKEN.is_match(value) {
            let inner = value.trim_matches('"').trim();
            self.add(Token::text(TokenKind::Phrase, inner));
            return;
        }

        if let Some((lower, upper)) = value.split_once("..") {
            self.extract_tokens(lower);
            self.extract_symbol_or_keyword("TO");
            self.extract_tokens(upper);
            return;
        }

        let stripped = rtrim_ignored(value);

        if HASHTAG_TOKEN.is_match(stripped) {
            self.add(Token::text(TokenKind::Hashtag, trim_ignored(value)));
            return;
        }

        if MENTION_TOKEN.is_match(stripped) {
            self.add(Token::text(TokenKind::Mention, trim_ignored(value)));
            return;
        }

        if DATE_TOKEN.is_match(stripped) {
            self.add(Token::text(TokenKind::Date, trim_ignored(value)));
            return;
        }

        let has_trailing_wildcard = value.ends_with('*');
        let word = value.trim_matches(|c| c == '/' || IGNORED_LEAD_TRAIL_CHARS.contains(&c));
        // "0" is treated as empty, same as a bare punctuation run
        if !word.is_empty() && word != "0" {
            self.add_word(word);
            if has_trailing_wildcard {
                self.add_once(TokenKind::Wildcard);
            }
            return;
        }

        log::trace!("ignoring chunk {value:?}");
        self.add(Token::text(TokenKind::Ignored, value));
    }

    /// Handles chunks of at most three bytes that are operators or keywords. Returns `true` when
    /// the chunk was consumed, which includes symbols dropped because they are out of place.
    fn extract_symbol_or_keyword(&mut self, value: &str) -> bool {
        if value.len() > 3 {
            return false;
        }

        match value.to_ascii_uppercase().as_str() {
            "+" => self.add_once(TokenKind::Required),
            "-" => self.add_once(TokenKind::Prohibited),
            ">" => {
                if self.in_filter {
                    self.add_once(TokenKind::GreaterThan);
                }
            }
            "<" => {
                if self.in_filter {
                    self.add_once(TokenKind::LessThan);
                }
            }
            "=" => {
                if matches!(
                    self.last.kind,
                    TokenKind::GreaterThan | TokenKind::LessThan
                ) {
                    self.add_once(TokenKind::Equals);
                }
            }
            "~" => self.add_modifier(TokenKind::Fuzzy),
            "^" => self.add_modifier(TokenKind::Boost),
            "[" => self.start_range(RangeMode::Inclusive),
            "{" => self.start_range(RangeMode::Exclusive),
            "]" | "}" => self.end_range(),
            "(" => {
                // subqueries can't be nested or live inside a range
                if !self.in_subquery && self.range == RangeMode::Closed {
                    self.in_subquery = true;
                    self.add(Token::new(TokenKind::SubqueryStart));
                } else {
                    log::debug!("ignoring nested subquery start");
                }
            }
            ")" => {
                if self.in_subquery && self.range == RangeMode::Closed {
                    self.in_subquery = false;
                    self.add(Token::new(TokenKind::SubqueryEnd));
                    if self.in_filter {
                        self.close_filter();
                    }
                }
            }
            "*" => self.add_once(TokenKind::Wildcard),
            "||" | "OR" => self.add_once(TokenKind::Or),
            "&&" | "AND" => self.add_once(TokenKind::And),
            ".." | "TO" => {
                if self.range != RangeMode::Closed {
                    self.add_once(TokenKind::To);
                }
            }
            _ if value.len() == 1 => {
                if value.as_bytes()[0].is_ascii_alphabetic() {
                    self.add_word(value);
                } else {
                    self.add(Token::text(TokenKind::Ignored, value));
                }
            }
            _ => return false,
        }

        true
    }

    /// Boost and fuzzy must follow a value: they are dropped after whitespace and inside a
    /// range, and they end a filter that is not wrapped in a subquery.
    fn add_modifier(&mut self, kind: TokenKind) {
        if self.last.kind == TokenKind::WhiteSpace || self.range != RangeMode::Closed {
            return;
        }

        if self.in_filter && !self.in_subquery {
            self.close_filter();
        }

        self.add_once(kind);
    }

    fn start_range(&mut self, mode: RangeMode) {
        if !self.in_filter || self.range != RangeMode::Closed {
            return;
        }

        self.range = mode;
        match mode {
            RangeMode::Inclusive => self.add_once(TokenKind::RangeInclStart),
            RangeMode::Exclusive => self.add_once(TokenKind::RangeExclStart),
            RangeMode::Closed => {}
        }
    }

    fn end_range(&mut self) {
        match self.range {
            RangeMode::Closed => return,
            RangeMode::Inclusive => self.add_once(TokenKind::RangeInclEnd),
            RangeMode::Exclusive => self.add_once(TokenKind::RangeExclEnd),
        }

        self.range = RangeMode::Closed;
        self.close_filter();
    }
}
