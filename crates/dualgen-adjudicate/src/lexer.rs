//! A small tokenizer for the generated TypeScript subset.
//!
//! Whitespace is dropped. Comments are kept as tokens (with inner whitespace
//! collapsed) so the comparison can decide when to ignore them. String
//! literals are decoded, so two spellings of the same value compare equal
//! once the quote character is disregarded.

use std::fmt;
use std::ops::Range;

/// Multi-character punctuators, longest first.
const PUNCTUATORS: [&str; 20] = [
    "===", "!==", "...", "**=", "=>", "==", "!=", "<=", ">=", "&&", "||", "??", "?.", "++", "--",
    "+=", "-=", "*=", "/=", "**",
];

#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Token {
    Ident(String),
    Number(String),
    /// A string or template literal: its quote character and decoded value.
    Str { quote: char, value: String },
    Punct(String),
    Comment(String),
}

impl Token {
    pub fn is_punct(&self, text: &str) -> bool {
        matches!(self, Self::Punct(p) if p == text)
    }

    pub fn is_ident(&self, text: &str) -> bool {
        matches!(self, Self::Ident(i) if i == text)
    }

    pub fn is_comment(&self) -> bool {
        matches!(self, Self::Comment(_))
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ident(s) | Self::Number(s) | Self::Punct(s) | Self::Comment(s) => f.write_str(s),
            Self::Str { quote, value } => {
                write!(f, "{quote}")?;
                for c in value.chars() {
                    match c {
                        '\\' => f.write_str("\\\\")?,
                        '\n' => f.write_str("\\n")?,
                        '\r' => f.write_str("\\r")?,
                        '\t' => f.write_str("\\t")?,
                        c if c == *quote => write!(f, "\\{c}")?,
                        c => write!(f, "{c}")?,
                    }
                }
                write!(f, "{quote}")
            }
        }
    }
}

/// A token and the byte range it came from.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Lexeme {
    pub token: Token,
    pub span: Range<usize>,
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {message}")]
pub struct LexError {
    pub line: usize,
    pub message: String,
}

/// Split `text` into lexemes.
pub fn tokenize(text: &str) -> Result<Vec<Lexeme>, LexError> {
    let mut lexer = Lexer { text, pos: 0 };
    let mut out = Vec::new();
    while let Some(lexeme) = lexer.next_lexeme()? {
        out.push(lexeme);
    }
    Ok(out)
}

/// Tokens only.
pub fn tokens(lexemes: &[Lexeme]) -> Vec<Token> {
    lexemes.iter().map(|l| l.token.clone()).collect()
}

struct Lexer<'a> {
    text: &'a str,
    pos: usize,
}

impl<'a> Lexer<'a> {
    fn rest(&self) -> &'a str {
        &self.text[self.pos..]
    }

    fn peek(&self) -> Option<char> {
        self.rest().chars().next()
    }

    fn bump(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8();
        Some(c)
    }

    fn take_while(&mut self, keep: impl Fn(char) -> bool) -> &'a str {
        let start = self.pos;
        while self.peek().is_some_and(&keep) {
            self.bump();
        }
        &self.text[start..self.pos]
    }

    fn error(&self, at: usize, message: &str) -> LexError {
        LexError {
            line: self.text[..at].matches('\n').count() + 1,
            message: message.to_string(),
        }
    }

    fn next_lexeme(&mut self) -> Result<Option<Lexeme>, LexError> {
        self.take_while(char::is_whitespace);
        let start = self.pos;
        let Some(c) = self.peek() else {
            return Ok(None);
        };
        let rest = self.rest();

        let token = if rest.starts_with("//") {
            let len = rest.find('\n').unwrap_or(rest.len());
            self.pos += len;
            Token::Comment(collapse(&rest[..len]))
        } else if rest.starts_with("/*") {
            let Some(end) = rest[2..].find("*/") else {
                return Err(self.error(start, "unterminated block comment"));
            };
            let len = end + 4;
            self.pos += len;
            Token::Comment(collapse(&rest[..len]))
        } else if matches!(c, '\'' | '"' | '`') {
            self.string(c)?
        } else if c.is_ascii_digit() || (c == '.' && rest[1..].starts_with(|d: char| d.is_ascii_digit())) {
            Token::Number(
                self.take_while(|ch| ch.is_ascii_alphanumeric() || ch == '.' || ch == '_')
                    .to_string(),
            )
        } else if is_ident_start(c) {
            Token::Ident(self.take_while(is_ident_continue).to_string())
        } else {
            let punct = PUNCTUATORS
                .iter()
                .find(|p| rest.starts_with(**p))
                .map(|p| p.to_string())
                .unwrap_or_else(|| c.to_string());
            self.pos += punct.len();
            Token::Punct(punct)
        };
        Ok(Some(Lexeme {
            token,
            span: start..self.pos,
        }))
    }

    fn string(&mut self, quote: char) -> Result<Token, LexError> {
        let start = self.pos;
        self.bump();
        let mut value = String::new();
        loop {
            match self.bump() {
                None => return Err(self.error(start, "unterminated string literal")),
                Some('\n') if quote != '`' => {
                    return Err(self.error(start, "unterminated string literal"))
                }
                Some(c) if c == quote => break,
                Some('\\') => match self.bump() {
                    None => return Err(self.error(start, "unterminated string literal")),
                    Some('n') => value.push('\n'),
                    Some('r') => value.push('\r'),
                    Some('t') => value.push('\t'),
                    Some('b') => value.push('\u{8}'),
                    Some('f') => value.push('\u{c}'),
                    Some('0') => value.push('\0'),
                    Some('u') => value.push(self.unicode_escape(start)?),
                    // line continuation
                    Some('\n') => {}
                    Some(other) => value.push(other),
                },
                Some(c) => value.push(c),
            }
        }
        Ok(Token::Str { quote, value })
    }

    fn unicode_escape(&mut self, start: usize) -> Result<char, LexError> {
        let digits = if self.peek() == Some('{') {
            self.bump();
            let digits = self.take_while(|c| c != '}');
            if self.bump() != Some('}') {
                return Err(self.error(start, "unterminated unicode escape"));
            }
            digits
        } else {
            let rest = self.rest();
            let len = rest
                .char_indices()
                .nth(4)
                .map(|(idx, _)| idx)
                .unwrap_or(rest.len());
            self.pos += len;
            &rest[..len]
        };
        u32::from_str_radix(digits, 16)
            .ok()
            .and_then(char::from_u32)
            .ok_or_else(|| self.error(start, "invalid unicode escape"))
    }
}

fn is_ident_start(c: char) -> bool {
    c.is_alphabetic() || c == '_' || c == '$'
}

fn is_ident_continue(c: char) -> bool {
    c.is_alphanumeric() || c == '_' || c == '$'
}

fn collapse(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(text: &str) -> Vec<Token> {
        tokens(&tokenize(text).unwrap())
    }

    fn ident(s: &str) -> Token {
        Token::Ident(s.into())
    }

    fn punct(s: &str) -> Token {
        Token::Punct(s.into())
    }

    #[test]
    fn declaration() {
        assert_eq!(
            lex("export const A = 0.3;"),
            vec![
                ident("export"),
                ident("const"),
                ident("A"),
                punct("="),
                Token::Number("0.3".into()),
                punct(";"),
            ]
        );
    }

    #[test]
    fn quote_styles_decode_to_the_same_value() {
        let single = lex(r"'o\'brien'");
        let double = lex(r#""o'brien""#);
        assert_eq!(
            single,
            vec![Token::Str {
                quote: '\'',
                value: "o'brien".into()
            }]
        );
        assert_eq!(
            double,
            vec![Token::Str {
                quote: '"',
                value: "o'brien".into()
            }]
        );
    }

    #[test]
    fn unicode_escapes() {
        assert_eq!(
            lex(r#""é\u{1F600}""#),
            vec![Token::Str {
                quote: '"',
                value: "é😀".into()
            }]
        );
    }

    #[test]
    fn comments_are_collapsed() {
        let tokens = lex("/**\n * a   b\n */\nx // tail  note\n");
        assert_eq!(tokens[0], Token::Comment("/** * a b */".into()));
        assert_eq!(tokens[1], ident("x"));
        assert_eq!(tokens[2], Token::Comment("// tail note".into()));
    }

    #[test]
    fn multi_character_punctuators() {
        assert_eq!(
            lex("a >= b && c => d"),
            vec![
                ident("a"),
                punct(">="),
                ident("b"),
                punct("&&"),
                ident("c"),
                punct("=>"),
                ident("d"),
            ]
        );
    }

    #[test]
    fn spans_cover_source_text() {
        let text = "let x = 'y';";
        for lexeme in tokenize(text).unwrap() {
            let slice = &text[lexeme.span.clone()];
            assert_eq!(slice, lexeme.token.to_string());
        }
    }

    #[test]
    fn unterminated_string_is_an_error() {
        let err = tokenize("const a = 1;\nconst b = 'open;\n").unwrap_err();
        assert_eq!(err.line, 2);
    }

    #[test]
    fn unterminated_comment_is_an_error() {
        assert!(tokenize("/* never closed").is_err());
    }
}
