//! Token-classified pseudo-Java source lines.

#![allow(missing_docs)]

/// Highlight category for a source token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    Keyword,
    Type,
    Variable,
    Value,
    Comment,
    Str,
    Method,
    Operator,
    Brace,
    Plain,
}

/// A run of text with one highlight category.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    /// Field value that just changed.
    pub pulse: bool,
}

impl Token {
    #[must_use]
    pub fn new(kind: TokenKind, text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            kind,
            pulse: false,
        }
    }

    #[must_use]
    pub fn pulsing(mut self, pulse: bool) -> Self {
        self.pulse = pulse;
        self
    }
}

/// One line of highlighted source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceLine {
    pub tokens: Vec<Token>,
}

impl SourceLine {
    #[must_use]
    pub fn blank() -> Self {
        Self::default()
    }

    /// Start a line with `depth` levels of two-space indentation.
    #[must_use]
    pub fn indented(depth: usize) -> Self {
        let mut line = Self::default();
        if depth > 0 {
            line.tokens.push(Token::new(TokenKind::Plain, "  ".repeat(depth)));
        }
        line
    }

    #[must_use]
    pub fn push(mut self, kind: TokenKind, text: impl Into<String>) -> Self {
        self.tokens.push(Token::new(kind, text));
        self
    }

    #[must_use]
    pub fn push_token(mut self, token: Token) -> Self {
        self.tokens.push(token);
        self
    }

    #[must_use]
    pub fn plain(self, text: impl Into<String>) -> Self {
        self.push(TokenKind::Plain, text)
    }

    #[must_use]
    pub fn kw(self, text: impl Into<String>) -> Self {
        self.push(TokenKind::Keyword, text)
    }

    #[must_use]
    pub fn ty(self, text: impl Into<String>) -> Self {
        self.push(TokenKind::Type, text)
    }

    #[must_use]
    pub fn var(self, text: impl Into<String>) -> Self {
        self.push(TokenKind::Variable, text)
    }

    #[must_use]
    pub fn method(self, text: impl Into<String>) -> Self {
        self.push(TokenKind::Method, text)
    }

    /// Flattened text of the line.
    #[must_use]
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Number of display columns (all source text is ASCII or single-width).
    #[must_use]
    pub fn width(&self) -> usize {
        self.tokens.iter().map(|t| t.text.chars().count()).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builder_concatenates_tokens() {
        let line = SourceLine::indented(1)
            .kw("public void")
            .plain(" ")
            .method("tick")
            .plain("() {");
        assert_eq!(line.text(), "  public void tick() {");
        assert_eq!(line.width(), 22);
        assert_eq!(line.tokens[1].kind, TokenKind::Keyword);
    }

    #[test]
    fn pulsing_marks_only_that_token() {
        let line = SourceLine::blank()
            .var("second")
            .push_token(Token::new(TokenKind::Value, "7").pulsing(true));
        assert!(!line.tokens[0].pulse);
        assert!(line.tokens[1].pulse);
    }
}
