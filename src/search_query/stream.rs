use super::token::{Token, TokenKind};

/// Scanned tokens plus a cursor for the parser.
///
/// `current` is the last token moved past, `lookahead` the next one. The peek offset is
/// independent of the cursor, so the parser can look arbitrarily far ahead without
/// committing; every `move_next` resets it.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TokenStream {
    tokens: Vec<Token>,
    position: usize,
    peek: usize,
    current: Option<usize>,
    lookahead: Option<usize>,
}

impl TokenStream {
    pub fn new(tokens: Vec<Token>) -> Self {
        Self {
            tokens,
            ..Default::default()
        }
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    /// Rewinds the cursor to before the first token.
    pub fn reset(&mut self) {
        self.position = 0;
        self.peek = 0;
        self.current = None;
        self.lookahead = None;
    }

    /// Advances by one token. Returns whether there is a lookahead token afterwards.
    pub fn move_next(&mut self) -> bool {
        self.peek = 0;
        self.current = self.lookahead;
        self.lookahead = if self.position < self.tokens.len() {
            self.position += 1;
            Some(self.position - 1)
        } else {
            None
        };

        self.lookahead.is_some()
    }

    pub fn current(&self) -> Option<&Token> {
        self.current.map(|i| &self.tokens[i])
    }

    pub fn lookahead(&self) -> Option<&Token> {
        self.lookahead.map(|i| &self.tokens[i])
    }

    pub fn is_next_token(&self, kind: TokenKind) -> bool {
        self.lookahead().is_some_and(|t| t.kind == kind)
    }

    pub fn is_next_token_any(&self, kinds: &[TokenKind]) -> bool {
        self.lookahead().is_some_and(|t| kinds.contains(&t.kind))
    }

    /// Returns the token after the lookahead (then the one after that, and so on) without
    /// moving the cursor.
    pub fn peek(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position + self.peek)?;
        self.peek += 1;
        Some(token)
    }

    /// Peeks one token and resets the peek offset.
    pub fn glimpse(&mut self) -> Option<&Token> {
        let token = self.tokens.get(self.position + self.peek);
        self.peek = 0;
        token
    }

    pub fn reset_peek(&mut self) {
        self.peek = 0;
    }

    /// Moves forward until the lookahead has the given kind or the input ends.
    pub fn skip_until(&mut self, kind: TokenKind) {
        while self.lookahead().is_some_and(|t| t.kind != kind) {
            self.move_next();
        }
    }
}
