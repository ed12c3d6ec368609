//! Line tokenizer.
//!
//! Splits a raw input line into tokens, honoring single/double quoting
//! and backslash escapes, with no knowledge of command semantics. The
//! strict form ([`tokenize`]) rejects unterminated quotes; the tolerant
//! form ([`tokenize_partial`]) treats them as "still typing" so the
//! completion engine can lex a half-finished line.

use keel_types::LexError;

/// One token of an input line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    /// Token text with quotes stripped and escapes resolved.
    pub text: String,
    /// True if any part of the token was quoted or escaped. A quoted
    /// `--foo` is always a literal value, never a flag marker.
    pub was_quoted: bool,
    /// Byte offset of the token's first character in the original line.
    pub start: usize,
    /// Byte offset one past the token's last character.
    pub end: usize,
}

impl Token {
    /// True if this token can act as a `--name` flag marker.
    pub fn is_flag(&self) -> bool {
        !self.was_quoted && self.text.starts_with("--") && self.text.len() > 2
    }

    #[cfg(test)]
    pub(crate) fn bare(text: &str) -> Self {
        Token {
            text: text.to_string(),
            was_quoted: false,
            start: 0,
            end: text.len(),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Normal,
    InSingle,
    InDouble,
}

struct Scan {
    tokens: Vec<Token>,
    /// Offset of the opening quote if the line ended inside one.
    open_quote: Option<usize>,
    /// True if the scanner was mid-token when the line ended.
    in_token: bool,
}

/// Shared scanner for both tokenize variants.
fn scan(line: &str) -> Scan {
    let mut tokens = Vec::new();
    let mut current = String::new();
    let mut start = 0usize;
    let mut in_current = false;
    let mut quoted = false;
    let mut state = State::Normal;
    let mut quote_start = 0usize;

    let mut chars = line.char_indices().peekable();
    while let Some((i, ch)) = chars.next() {
        if !in_current && !(state == State::Normal && ch.is_whitespace()) {
            start = i;
            in_current = true;
        }
        match state {
            State::InSingle => {
                // Everything literal until the matching quote.
                if ch == '\'' {
                    state = State::Normal;
                } else {
                    current.push(ch);
                }
            },
            State::InDouble => {
                if ch == '"' {
                    state = State::Normal;
                } else if ch == '\\'
                    && let Some(&(_, next)) = chars.peek()
                {
                    match next {
                        '"' | '\\' => {
                            current.push(next);
                            chars.next();
                        },
                        _ => current.push('\\'),
                    }
                } else {
                    current.push(ch);
                }
            },
            State::Normal => match ch {
                '\'' => {
                    state = State::InSingle;
                    quoted = true;
                    quote_start = i;
                },
                '"' => {
                    state = State::InDouble;
                    quoted = true;
                    quote_start = i;
                },
                '\\' => {
                    // Escape the next char literally, whitespace included.
                    // With nothing left to escape, the backslash itself
                    // stays literal.
                    match chars.next() {
                        Some((_, next)) => {
                            current.push(next);
                            quoted = true;
                        },
                        None => current.push('\\'),
                    }
                },
                c if c.is_whitespace() => {
                    if in_current {
                        tokens.push(Token {
                            text: std::mem::take(&mut current),
                            was_quoted: quoted,
                            start,
                            end: i,
                        });
                        in_current = false;
                        quoted = false;
                    }
                },
                _ => current.push(ch),
            },
        }
    }

    let open_quote = (state != State::Normal).then_some(quote_start);
    let in_token = in_current;
    if in_current {
        tokens.push(Token {
            text: current,
            was_quoted: quoted,
            start,
            end: line.len(),
        });
    }

    Scan {
        tokens,
        open_quote,
        in_token,
    }
}

/// Tokenize a complete line. An unterminated quote is a hard error.
///
/// An empty or all-whitespace line yields an empty token sequence.
pub fn tokenize(line: &str) -> Result<Vec<Token>, LexError> {
    let scan = scan(line);
    if let Some(offset) = scan.open_quote {
        return Err(LexError::UnterminatedQuote { offset });
    }
    Ok(scan.tokens)
}

/// Tokenize a line prefix tolerantly, for completion.
///
/// An open quote closes the final token instead of failing. The returned
/// bool is true when the scanner was still inside a token at end of input,
/// i.e. the cursor continues the last token rather than starting a new one.
pub fn tokenize_partial(line: &str) -> (Vec<Token>, bool) {
    let scan = scan(line);
    (scan.tokens, scan.in_token)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn tokenize_simple() {
        let tokens = tokenize("hello world").unwrap();
        assert_eq!(texts(&tokens), vec!["hello", "world"]);
    }

    #[test]
    fn tokenize_empty_line() {
        assert!(tokenize("").unwrap().is_empty());
        assert!(tokenize("   \t ").unwrap().is_empty());
    }

    #[test]
    fn tokenize_single_quotes() {
        let tokens = tokenize("echo 'hello world'").unwrap();
        assert_eq!(texts(&tokens), vec!["echo", "hello world"]);
        assert!(tokens[1].was_quoted);
    }

    #[test]
    fn tokenize_double_quotes() {
        let tokens = tokenize(r#"echo "hello world""#).unwrap();
        assert_eq!(texts(&tokens), vec!["echo", "hello world"]);
    }

    #[test]
    fn tokenize_backslash_escape() {
        let tokens = tokenize(r"echo hello\ world").unwrap();
        assert_eq!(texts(&tokens), vec!["echo", "hello world"]);
    }

    #[test]
    fn tokenize_mixed_quoting() {
        // foo "a b" 'c d' \"e  ->  [foo, a b, c d, "e]
        let tokens = tokenize(r#"foo "a b" 'c d' \"e"#).unwrap();
        assert_eq!(texts(&tokens), vec!["foo", "a b", "c d", "\"e"]);
    }

    #[test]
    fn tokenize_escape_inside_double_quotes() {
        let tokens = tokenize(r#"say "a \"b\" c" "x\\y" "p\qr""#).unwrap();
        assert_eq!(texts(&tokens), vec!["say", "a \"b\" c", "x\\y", "p\\qr"]);
    }

    #[test]
    fn trailing_backslash_stays_literal() {
        let tokens = tokenize(r"echo a\").unwrap();
        assert_eq!(texts(&tokens), vec!["echo", r"a\"]);

        let tokens = tokenize(r"echo \").unwrap();
        assert_eq!(texts(&tokens), vec!["echo", r"\"]);
        assert!(!tokens[1].was_quoted);
    }

    #[test]
    fn no_escaping_inside_single_quotes() {
        let tokens = tokenize(r"echo 'a\nb'").unwrap();
        assert_eq!(texts(&tokens), vec!["echo", r"a\nb"]);
    }

    #[test]
    fn unquoted_round_trip() {
        let line = "db migrate --steps 3 up";
        let tokens = tokenize(line).unwrap();
        let rejoined = texts(&tokens).join(" ");
        assert_eq!(rejoined, line);
    }

    #[test]
    fn unterminated_single_quote() {
        assert_eq!(
            tokenize("echo 'oops"),
            Err(LexError::UnterminatedQuote { offset: 5 })
        );
    }

    #[test]
    fn unterminated_double_quote_offset() {
        assert_eq!(
            tokenize(r#"a "bc"#),
            Err(LexError::UnterminatedQuote { offset: 2 })
        );
    }

    #[test]
    fn spans_cover_source_bytes() {
        let line = r#"foo "a b" tail"#;
        let tokens = tokenize(line).unwrap();
        assert_eq!((tokens[0].start, tokens[0].end), (0, 3));
        assert_eq!((tokens[1].start, tokens[1].end), (4, 9));
        assert_eq!((tokens[2].start, tokens[2].end), (10, 14));
    }

    #[test]
    fn quoted_flag_is_literal() {
        let tokens = tokenize(r#"run "--force" --force"#).unwrap();
        assert!(!tokens[1].is_flag());
        assert!(tokens[2].is_flag());
    }

    #[test]
    fn partial_open_quote_still_typing() {
        let (tokens, open) = tokenize_partial(r#"pick "to"#);
        assert_eq!(texts(&tokens), vec!["pick", "to"]);
        assert!(open);
    }

    #[test]
    fn partial_trailing_space_starts_new_token() {
        let (tokens, open) = tokenize_partial("db migrate ");
        assert_eq!(texts(&tokens), vec!["db", "migrate"]);
        assert!(!open);
    }

    #[test]
    fn partial_mid_token() {
        let (tokens, open) = tokenize_partial("db mig");
        assert_eq!(texts(&tokens), vec!["db", "mig"]);
        assert!(open);
    }
}
