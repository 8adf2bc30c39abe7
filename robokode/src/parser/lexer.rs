use std::fmt;
use std::iter::Peekable;
use std::str::Chars;

use crate::span::Span;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    Word,
    Number,
    String,
    Label,
    LineBreak,
    Equals,
    Operator,
    LeftParen,
    RightParen,
    Eof,
}

impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let description = match self {
            TokenKind::Word => "a word (variable or instruction)",
            TokenKind::Number => "a number",
            TokenKind::String => "a string",
            TokenKind::Label => "a label",
            TokenKind::LineBreak => "a line break",
            TokenKind::Equals => "'='",
            TokenKind::Operator => "an operator",
            TokenKind::LeftParen => "'('",
            TokenKind::RightParen => "')'",
            TokenKind::Eof => "end of file",
        };
        f.write_str(description)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Token {
    pub text: String,
    pub kind: TokenKind,
    pub span: Span,
}

impl Token {
    pub fn new(text: impl Into<String>, kind: TokenKind, span: Span) -> Self {
        Self {
            text: text.into(),
            kind,
            span,
        }
    }

    pub fn eof() -> Self {
        Self::new("", TokenKind::Eof, Span::default())
    }

    pub fn is_word(&self, name: &str) -> bool {
        self.kind == TokenKind::Word && self.text == name
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ScanMode {
    Default,
    Word,
    Number,
    String,
    Comment,
}

struct Cursor<'a> {
    chars: Peekable<Chars<'a>>,
    line: usize,
    column: usize,
}

impl<'a> Cursor<'a> {
    fn new(source: &'a str) -> Self {
        Self {
            chars: source.chars().peekable(),
            line: 1,
            column: 1,
        }
    }

    fn peek(&mut self) -> Option<char> {
        self.chars.peek().copied()
    }

    fn bump(&mut self) {
        if let Some(ch) = self.chars.next() {
            if ch == '\n' {
                self.line += 1;
                self.column = 1;
            } else {
                self.column += 1;
            }
        }
    }

    fn span(&self) -> Span {
        Span::new(self.line, self.column)
    }
}

fn single_char_kind(ch: char) -> Option<TokenKind> {
    match ch {
        '\n' => Some(TokenKind::LineBreak),
        '=' => Some(TokenKind::Equals),
        '+' | '-' | '*' | '/' | '<' | '>' | '!' => Some(TokenKind::Operator),
        '(' => Some(TokenKind::LeftParen),
        ')' => Some(TokenKind::RightParen),
        _ => None,
    }
}

/// Splits a script into tokens. Never fails: characters it does not know are
/// treated as separators, and an unterminated string or a word cut off by the
/// end of input is dropped.
pub fn tokenize(source: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = Cursor::new(source);
    let mut mode = ScanMode::Default;
    let mut text = String::new();
    let mut start = Span::default();

    while let Some(ch) = cursor.peek() {
        match mode {
            ScanMode::Default => {
                if let Some(kind) = single_char_kind(ch) {
                    tokens.push(Token::new(ch.to_string(), kind, cursor.span()));
                } else if ch.is_alphabetic() {
                    start = cursor.span();
                    text.push(ch);
                    mode = ScanMode::Word;
                } else if ch.is_ascii_digit() {
                    start = cursor.span();
                    text.push(ch);
                    mode = ScanMode::Number;
                } else if ch == '"' {
                    start = cursor.span();
                    mode = ScanMode::String;
                } else if ch == '#' {
                    mode = ScanMode::Comment;
                }
                cursor.bump();
            }
            ScanMode::Word => {
                if ch.is_alphanumeric() {
                    text.push(ch);
                    cursor.bump();
                } else if ch == ':' {
                    tokens.push(Token::new(std::mem::take(&mut text), TokenKind::Label, start));
                    mode = ScanMode::Default;
                    cursor.bump();
                } else {
                    // leave `ch` for the default mode
                    tokens.push(Token::new(std::mem::take(&mut text), TokenKind::Word, start));
                    mode = ScanMode::Default;
                }
            }
            ScanMode::Number => {
                // No sign and no decimal point: write 0 - 5 or 1 / 2 instead.
                if ch.is_ascii_digit() {
                    text.push(ch);
                    cursor.bump();
                } else {
                    tokens.push(Token::new(std::mem::take(&mut text), TokenKind::Number, start));
                    mode = ScanMode::Default;
                }
            }
            ScanMode::String => {
                if ch == '"' {
                    tokens.push(Token::new(std::mem::take(&mut text), TokenKind::String, start));
                    mode = ScanMode::Default;
                } else {
                    text.push(ch);
                }
                cursor.bump();
            }
            ScanMode::Comment => {
                if ch == '\n' {
                    mode = ScanMode::Default;
                } else {
                    cursor.bump();
                }
            }
        }
    }

    tokens.push(Token::new("", TokenKind::Eof, cursor.span()));
    tokens
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source).into_iter().map(|t| t.kind).collect()
    }

    fn texts(source: &str) -> Vec<String> {
        tokenize(source).into_iter().map(|t| t.text).collect()
    }

    #[test]
    fn assignment_with_operator() {
        use TokenKind::*;
        assert_eq!(
            kinds("x = 1 + 22\n"),
            vec![Word, Equals, Number, Operator, Number, LineBreak, Eof]
        );
        assert_eq!(texts("x = 1 + 22\n"), vec!["x", "=", "1", "+", "22", "\n", ""]);
    }

    #[test]
    fn trailing_colon_makes_a_label() {
        let tokens = tokenize("debut:\ngoto debut\n");
        assert_eq!(tokens[0].kind, TokenKind::Label);
        assert_eq!(tokens[0].text, "debut");
        assert_eq!(tokens[2].kind, TokenKind::Word);
        assert_eq!(tokens[3].text, "debut");
    }

    #[test]
    fn dots_and_semicolons_only_separate() {
        assert_eq!(texts("attaquer.tirer(d)"), vec!["attaquer", "tirer", "(", "d", ")", ""]);
        assert_eq!(texts("pour (i=0 ; i<3 ; i=i+1)").len(), 15);
    }

    #[test]
    fn no_negative_or_decimal_literals() {
        use TokenKind::*;
        assert_eq!(kinds("-5\n"), vec![Operator, Number, LineBreak, Eof]);
        // a number cut off by the end of input is dropped
        assert_eq!(kinds("x = 5"), vec![Word, Equals, Eof]);
        assert_eq!(texts("3.14\n"), vec!["3", "14", "\n", ""]);
    }

    #[test]
    fn strings_and_comments() {
        let tokens = tokenize("print \"bonjour robot\" # salut\nx\n");
        assert_eq!(tokens[1].kind, TokenKind::String);
        assert_eq!(tokens[1].text, "bonjour robot");
        assert_eq!(tokens[2].kind, TokenKind::LineBreak);
        assert_eq!(tokens[3].text, "x");
    }

    #[test]
    fn unterminated_string_is_dropped() {
        assert_eq!(kinds("print \"oops"), vec![TokenKind::Word, TokenKind::Eof]);
    }

    #[test]
    fn spans_follow_lines() {
        let tokens = tokenize("a = 1\n  b = 2\n");
        let b = tokens.iter().find(|t| t.text == "b").unwrap();
        assert_eq!(b.span, Span::new(2, 3));
    }
}
