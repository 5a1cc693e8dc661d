// deckrs/src/scanner/lexer.rs

//! Character-level scanning of a single line: quote tracking, comment
//! stripping and token splitting.

use crate::error::{DeckError, Result};

/// Low-level lexer over the characters of one physical line.
pub struct Lexer<'a> {
    input: &'a str,
    line: usize,
    comment_marker: char,
    separator: Option<char>,
}

impl<'a> Lexer<'a> {
    /// Create a new lexer for one line of input.
    pub fn new(input: &'a str, line: usize) -> Self {
        Self {
            input,
            line,
            comment_marker: '!',
            separator: None,
        }
    }

    /// Set the comment marker (default: '!').
    pub fn with_comment_marker(mut self, marker: char) -> Self {
        self.comment_marker = marker;
        self
    }

    /// Set an extra token separator besides whitespace.
    pub fn with_separator(mut self, separator: Option<char>) -> Self {
        self.separator = separator;
        self
    }

    /// Return the line without its inline comment.
    ///
    /// Fails if a quote opened on this line is never closed.
    pub fn strip_comment(&self) -> Result<&'a str> {
        let mut quote: Option<char> = None;

        for (idx, c) in self.input.char_indices() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if c == '\'' || c == '"' => quote = Some(c),
                None if c == self.comment_marker => return Ok(&self.input[..idx]),
                None => {}
            }
        }

        match quote {
            Some(q) => Err(DeckError::lex(
                self.line,
                format!("unterminated {} quote", q),
            )),
            None => Ok(self.input),
        }
    }

    /// Byte offset of the first `target` outside quotes.
    pub fn find_unquoted(&self, target: char) -> Option<usize> {
        let mut quote: Option<char> = None;

        for (idx, c) in self.input.char_indices() {
            match quote {
                Some(q) if c == q => quote = None,
                Some(_) => {}
                None if c == '\'' || c == '"' => quote = Some(c),
                None if c == target => return Some(idx),
                None => {}
            }
        }

        None
    }

    /// Split into tokens on whitespace (and the separator, if any).
    ///
    /// Quoted substrings stay inside one token together with their quotes;
    /// doubled quotes (`'don''t'`) close and reopen the quote and so stay in
    /// the same token. Empty tokens are dropped.
    pub fn split_tokens(&self) -> Result<Vec<String>> {
        let mut tokens = Vec::new();
        let mut current = String::new();
        let mut quote: Option<char> = None;

        for c in self.input.chars() {
            match quote {
                Some(q) => {
                    current.push(c);
                    if c == q {
                        quote = None;
                    }
                }
                None if c == '\'' || c == '"' => {
                    current.push(c);
                    quote = Some(c);
                }
                None if c.is_whitespace() || Some(c) == self.separator => {
                    if !current.is_empty() {
                        tokens.push(std::mem::take(&mut current));
                    }
                }
                None => current.push(c),
            }
        }

        if let Some(q) = quote {
            return Err(DeckError::lex(
                self.line,
                format!("unterminated {} quote", q),
            ));
        }

        if !current.is_empty() {
            tokens.push(current);
        }

        Ok(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strip_comment() {
        let lexer = Lexer::new("  nat = 4 ! number of atoms", 1);
        assert_eq!(lexer.strip_comment().unwrap(), "  nat = 4 ");

        let lexer = Lexer::new("prefix = 'a!b' ! real comment", 1);
        assert_eq!(lexer.strip_comment().unwrap(), "prefix = 'a!b' ");

        let lexer = Lexer::new("PROJECT cp2k # name", 1).with_comment_marker('#');
        assert_eq!(lexer.strip_comment().unwrap(), "PROJECT cp2k ");
    }

    #[test]
    fn test_unterminated_quote() {
        let lexer = Lexer::new("prefix = 'abc", 7);
        let err = lexer.strip_comment().unwrap_err();
        assert_eq!(err.line(), Some(7));
    }

    #[test]
    fn test_comment_marker_ignores_apostrophe_in_comment() {
        let lexer = Lexer::new("x = 1 ! don't", 1);
        assert_eq!(lexer.strip_comment().unwrap(), "x = 1 ");
    }

    #[test]
    fn test_find_unquoted() {
        let lexer = Lexer::new("title = 'a = b'", 1);
        assert_eq!(lexer.find_unquoted('='), Some(6));

        let lexer = Lexer::new("'a = b' c", 1);
        assert_eq!(lexer.find_unquoted('='), None);
    }

    #[test]
    fn test_split_tokens() {
        let lexer = Lexer::new("H  1.008   H.pbe-rrkjus.UPF", 1);
        assert_eq!(
            lexer.split_tokens().unwrap(),
            vec!["H", "1.008", "H.pbe-rrkjus.UPF"]
        );

        let lexer = Lexer::new("1, 2,3 ,", 1).with_separator(Some(','));
        assert_eq!(lexer.split_tokens().unwrap(), vec!["1", "2", "3"]);
    }

    #[test]
    fn test_split_quoted_tokens() {
        let lexer = Lexer::new(r#"'hello world' "x y" 'don''t'"#, 1);
        assert_eq!(
            lexer.split_tokens().unwrap(),
            vec!["'hello world'", "\"x y\"", "'don''t'"]
        );

        let lexer = Lexer::new("'a, b', c", 1).with_separator(Some(','));
        assert_eq!(lexer.split_tokens().unwrap(), vec!["'a, b'", "c"]);
    }
}
