//! Lexer (tokenizer) for the analyzed language
//!
//! Converts raw source text into a [`Token`] stream consumed by the parser.
//! Tokens are produced one at a time through [`Lexer::next_token`]; the
//! eager [`Lexer::tokenize`] drains the whole input. A fresh `Lexer` over
//! the same text restarts the sequence from the beginning.
//!
//! The lexer never fails: every lexical fault is reported to the
//! [`Diagnostics`] sink and scanning resynchronizes and continues.
//! Recovery points per fault:
//! - unterminated char literal: skip to the closing quote or end of line
//! - unterminated string literal: skip to end of line
//! - unterminated block comment: rest of file is the comment
//! - unrecognized character: skip that character
//! - malformed number: consume the offending characters, emit an
//!   [`TokenKind::Error`] marker token

pub mod token;

pub use token::{Token, TokenKind};

use crate::diagnostics::{DiagnosticKind, Diagnostics, SourceLocation};

/// Fault-tolerant lexer over one translation unit.
pub struct Lexer {
    input: Vec<char>,
    position: usize,
    line: usize,
    column: usize,
}

impl Lexer {
    /// Create a new lexer for the given source string.
    pub fn new(input: &str) -> Self {
        Self {
            input: input.chars().collect(),
            position: 0,
            line: 1,
            column: 1,
        }
    }

    /// Tokenize the entire input. The returned stream always ends with
    /// exactly one `Eof` token.
    pub fn tokenize(mut self, diags: &mut Diagnostics) -> Vec<Token> {
        let mut tokens = Vec::new();
        loop {
            let token = self.next_token(diags);
            let done = token.is_eof();
            tokens.push(token);
            if done {
                break;
            }
        }
        tokens
    }

    /// Produce the next token, reporting any lexical faults encountered
    /// along the way. Returns `Eof` at (and after) the end of input.
    pub fn next_token(&mut self, diags: &mut Diagnostics) -> Token {
        loop {
            self.skip_whitespace_and_comments(diags);

            let loc = self.current_location();
            let ch = match self.advance() {
                Some(ch) => ch,
                None => return Token::new(TokenKind::Eof, "", loc),
            };

            return match ch {
                '"' => self.string_literal(loc, diags),
                '\'' => self.char_literal(loc, diags),
                '0'..='9' => self.number_literal(ch, loc, diags),
                'a'..='z' | 'A'..='Z' | '_' => self.identifier_or_keyword(ch, loc),

                '+' => Token::new(TokenKind::Plus, "+", loc),
                '-' => Token::new(TokenKind::Minus, "-", loc),
                '*' => Token::new(TokenKind::Star, "*", loc),
                '/' => Token::new(TokenKind::Slash, "/", loc),
                '%' => Token::new(TokenKind::Percent, "%", loc),
                '=' => {
                    if self.peek() == Some('=') {
                        self.advance();
                        Token::new(TokenKind::EqEq, "==", loc)
                    } else {
                        Token::new(TokenKind::Eq, "=", loc)
                    }
                }
                '!' => {
                    if self.peek() == Some('=') {
                        self.advance();
                        Token::new(TokenKind::NotEq, "!=", loc)
                    } else {
                        Token::new(TokenKind::Bang, "!", loc)
                    }
                }
                '<' => {
                    if self.peek() == Some('=') {
                        self.advance();
                        Token::new(TokenKind::Le, "<=", loc)
                    } else if self.peek() == Some('<') {
                        self.advance();
                        Token::new(TokenKind::Shl, "<<", loc)
                    } else {
                        Token::new(TokenKind::Lt, "<", loc)
                    }
                }
                '>' => {
                    if self.peek() == Some('=') {
                        self.advance();
                        Token::new(TokenKind::Ge, ">=", loc)
                    } else if self.peek() == Some('>') {
                        self.advance();
                        Token::new(TokenKind::Shr, ">>", loc)
                    } else {
                        Token::new(TokenKind::Gt, ">", loc)
                    }
                }
                '&' => {
                    if self.peek() == Some('&') {
                        self.advance();
                        Token::new(TokenKind::AndAnd, "&&", loc)
                    } else {
                        Token::new(TokenKind::Amp, "&", loc)
                    }
                }
                '|' => {
                    if self.peek() == Some('|') {
                        self.advance();
                        Token::new(TokenKind::OrOr, "||", loc)
                    } else {
                        Token::new(TokenKind::Pipe, "|", loc)
                    }
                }
                '^' => Token::new(TokenKind::Caret, "^", loc),
                '~' => Token::new(TokenKind::Tilde, "~", loc),
                '(' => Token::new(TokenKind::LParen, "(", loc),
                ')' => Token::new(TokenKind::RParen, ")", loc),
                '{' => Token::new(TokenKind::LBrace, "{", loc),
                '}' => Token::new(TokenKind::RBrace, "}", loc),
                '[' => Token::new(TokenKind::LBracket, "[", loc),
                ']' => Token::new(TokenKind::RBracket, "]", loc),
                ';' => Token::new(TokenKind::Semicolon, ";", loc),
                ',' => Token::new(TokenKind::Comma, ",", loc),

                _ => {
                    // Unscannable character: report, skip it, keep scanning.
                    diags.report(DiagnosticKind::UnrecognizedCharacter(ch), loc);
                    continue;
                }
            };
        }
    }

    /// Scan a string literal. The opening quote is already consumed.
    ///
    /// A newline or end of file before the closing quote is an
    /// unterminated-string fault; recovery leaves the newline unconsumed so
    /// the next line lexes cleanly.
    fn string_literal(&mut self, loc: SourceLocation, diags: &mut Diagnostics) -> Token {
        let mut value = String::new();
        let mut lexeme = String::from("\"");

        loop {
            match self.peek() {
                Some('"') => {
                    self.advance();
                    lexeme.push('"');
                    return Token::new(TokenKind::StringLiteral(value), lexeme, loc);
                }
                Some('\n') | None => {
                    diags.report(DiagnosticKind::UnfinishedString, loc);
                    return Token::new(TokenKind::Error, lexeme, loc);
                }
                Some('\\') => {
                    self.advance();
                    lexeme.push('\\');
                    if let Some(escaped) = self.peek() {
                        if escaped != '\n' {
                            self.advance();
                            lexeme.push(escaped);
                            value.push(unescape(escaped));
                        }
                    }
                }
                Some(ch) => {
                    self.advance();
                    lexeme.push(ch);
                    value.push(ch);
                }
            }
        }
    }

    /// Scan a character literal. The opening quote is already consumed.
    ///
    /// Exactly one character is allowed between the quotes: zero is an
    /// empty-char fault, more than one is a multi-char fault, and a missing
    /// closing quote before end of line resynchronizes at the line end.
    fn char_literal(&mut self, loc: SourceLocation, diags: &mut Diagnostics) -> Token {
        let mut lexeme = String::from("'");

        // ''
        if self.peek() == Some('\'') {
            self.advance();
            lexeme.push('\'');
            diags.report(DiagnosticKind::EmptyCharLiteral, loc);
            return Token::new(TokenKind::Error, lexeme, loc);
        }

        let value = match self.peek() {
            Some('\n') | None => {
                diags.report(DiagnosticKind::UnfinishedCharLiteral, loc);
                return Token::new(TokenKind::Error, lexeme, loc);
            }
            Some('\\') => {
                self.advance();
                lexeme.push('\\');
                match self.peek() {
                    Some('\n') | None => {
                        diags.report(DiagnosticKind::UnfinishedCharLiteral, loc);
                        return Token::new(TokenKind::Error, lexeme, loc);
                    }
                    Some(escaped) => {
                        self.advance();
                        lexeme.push(escaped);
                        unescape(escaped)
                    }
                }
            }
            Some(ch) => {
                self.advance();
                lexeme.push(ch);
                ch
            }
        };

        match self.peek() {
            Some('\'') => {
                self.advance();
                lexeme.push('\'');
                Token::new(TokenKind::CharLiteral(value), lexeme, loc)
            }
            Some('\n') | None => {
                diags.report(DiagnosticKind::UnfinishedCharLiteral, loc);
                Token::new(TokenKind::Error, lexeme, loc)
            }
            Some(_) => {
                // More than one character: consume up to the closing quote
                // or end of line, whichever comes first.
                loop {
                    match self.peek() {
                        Some('\'') => {
                            self.advance();
                            lexeme.push('\'');
                            diags.report(DiagnosticKind::MultiCharLiteral, loc);
                            return Token::new(TokenKind::Error, lexeme, loc);
                        }
                        Some('\n') | None => {
                            diags.report(DiagnosticKind::UnfinishedCharLiteral, loc);
                            return Token::new(TokenKind::Error, lexeme, loc);
                        }
                        Some(ch) => {
                            self.advance();
                            lexeme.push(ch);
                        }
                    }
                }
            }
        }
    }

    /// Scan a numeric literal: digits with an optional `.` fraction.
    ///
    /// A second decimal point, identifier characters glued to the number,
    /// and values no numeric form can represent are each reported as
    /// distinct faults, and an `Error` marker token takes the literal's
    /// place in the stream.
    fn number_literal(
        &mut self,
        first_digit: char,
        loc: SourceLocation,
        diags: &mut Diagnostics,
    ) -> Token {
        let mut lexeme = String::new();
        lexeme.push(first_digit);
        let mut decimal_points = 0;

        loop {
            match self.peek() {
                Some(ch) if ch.is_ascii_digit() => {
                    self.advance();
                    lexeme.push(ch);
                }
                // Only a '.' followed by a digit or another '.' belongs to
                // the literal; `arr[0].x` style input does not exist in
                // this language, so any '.' here is part of the number.
                Some('.') => {
                    self.advance();
                    lexeme.push('.');
                    decimal_points += 1;
                }
                _ => break,
            }
        }

        if decimal_points > 1 {
            diags.report(
                DiagnosticKind::TooManyDecimalPoints {
                    lexeme: lexeme.clone(),
                },
                loc,
            );
            return Token::new(TokenKind::Error, lexeme, loc);
        }

        // Identifier characters glued onto the number form a bad suffix.
        if matches!(self.peek(), Some(ch) if ch.is_ascii_alphanumeric() || ch == '_') {
            while let Some(ch) = self.peek() {
                if ch.is_ascii_alphanumeric() || ch == '_' {
                    self.advance();
                    lexeme.push(ch);
                } else {
                    break;
                }
            }
            diags.report(
                DiagnosticKind::InvalidNumericSuffix {
                    lexeme: lexeme.clone(),
                },
                loc,
            );
            return Token::new(TokenKind::Error, lexeme, loc);
        }

        if decimal_points == 1 {
            match lexeme.parse::<f64>() {
                Ok(value) if lexeme.chars().last() != Some('.') => {
                    Token::new(TokenKind::FloatLiteral(value), lexeme, loc)
                }
                _ => {
                    diags.report(
                        DiagnosticKind::IllFormedNumber {
                            lexeme: lexeme.clone(),
                        },
                        loc,
                    );
                    Token::new(TokenKind::Error, lexeme, loc)
                }
            }
        } else {
            match lexeme.parse::<i64>() {
                Ok(value) => Token::new(TokenKind::IntLiteral(value), lexeme, loc),
                Err(_) => {
                    diags.report(
                        DiagnosticKind::IllFormedNumber {
                            lexeme: lexeme.clone(),
                        },
                        loc,
                    );
                    Token::new(TokenKind::Error, lexeme, loc)
                }
            }
        }
    }

    /// Scan an identifier or keyword.
    fn identifier_or_keyword(&mut self, first_char: char, loc: SourceLocation) -> Token {
        let mut ident = String::new();
        ident.push(first_char);

        while let Some(ch) = self.peek() {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                ident.push(ch);
                self.advance();
            } else {
                break;
            }
        }

        let kind = match ident.as_str() {
            "int" => TokenKind::Int,
            "float" => TokenKind::Float,
            "void" => TokenKind::Void,
            "return" => TokenKind::Return,
            _ => TokenKind::Ident,
        };

        Token::new(kind, ident, loc)
    }

    /// Skip whitespace and comments, reporting an unterminated block
    /// comment when end of file arrives before `*/`.
    fn skip_whitespace_and_comments(&mut self, diags: &mut Diagnostics) {
        loop {
            match self.peek() {
                Some(' ') | Some('\t') | Some('\r') | Some('\n') => {
                    self.advance();
                }
                Some('/') => {
                    if self.peek_ahead(1) == Some('/') {
                        self.skip_line_comment();
                    } else if self.peek_ahead(1) == Some('*') {
                        self.skip_block_comment(diags);
                    } else {
                        break;
                    }
                }
                _ => break,
            }
        }
    }

    /// Skip single-line comment (// ...)
    fn skip_line_comment(&mut self) {
        while let Some(ch) = self.peek() {
            self.advance();
            if ch == '\n' {
                break;
            }
        }
    }

    /// Skip multi-line comment (/* ... */). Unterminated comments consume
    /// the rest of the file; the fault is reported at the line where end of
    /// file was reached.
    fn skip_block_comment(&mut self, diags: &mut Diagnostics) {
        self.advance(); // '/'
        self.advance(); // '*'

        while !self.is_at_end() {
            if self.peek() == Some('*') && self.peek_ahead(1) == Some('/') {
                self.advance();
                self.advance();
                return;
            }
            self.advance();
        }

        diags.report(DiagnosticKind::UnfinishedComment, self.current_location());
    }

    /// Peek at current character without consuming
    fn peek(&self) -> Option<char> {
        self.input.get(self.position).copied()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, n: usize) -> Option<char> {
        self.input.get(self.position + n).copied()
    }

    /// Advance to next character, tracking line and column
    fn advance(&mut self) -> Option<char> {
        let ch = self.peek()?;
        self.position += 1;

        if ch == '\n' {
            self.line += 1;
            self.column = 1;
        } else {
            self.column += 1;
        }

        Some(ch)
    }

    fn is_at_end(&self) -> bool {
        self.position >= self.input.len()
    }

    fn current_location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

/// Decode a character escape. Unknown escapes decode to the character
/// itself, matching the permissive original behavior.
fn unescape(escaped: char) -> char {
    match escaped {
        'n' => '\n',
        't' => '\t',
        'r' => '\r',
        '0' => '\0',
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lex(source: &str) -> (Vec<Token>, Diagnostics) {
        let mut diags = Diagnostics::new();
        let tokens = Lexer::new(source).tokenize(&mut diags);
        (tokens, diags)
    }

    #[test]
    fn test_simple_tokens() {
        let (tokens, diags) = lex("int main() { return 0; }");

        assert!(diags.is_empty());
        assert!(matches!(tokens[0].kind, TokenKind::Int));
        assert!(matches!(tokens[1].kind, TokenKind::Ident));
        assert_eq!(tokens[1].lexeme, "main");
        assert!(matches!(tokens[2].kind, TokenKind::LParen));
        assert!(matches!(tokens[3].kind, TokenKind::RParen));
        assert!(matches!(tokens[4].kind, TokenKind::LBrace));
        assert!(matches!(tokens[5].kind, TokenKind::Return));
        assert!(matches!(tokens[6].kind, TokenKind::IntLiteral(0)));
        assert!(matches!(tokens[7].kind, TokenKind::Semicolon));
        assert!(matches!(tokens[8].kind, TokenKind::RBrace));
        assert!(matches!(tokens[9].kind, TokenKind::Eof));
    }

    #[test]
    fn test_operators() {
        let (tokens, diags) = lex("== != <= >= && || << >> = < >");

        assert!(diags.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind.clone()).collect();
        assert_eq!(
            kinds,
            vec![
                TokenKind::EqEq,
                TokenKind::NotEq,
                TokenKind::Le,
                TokenKind::Ge,
                TokenKind::AndAnd,
                TokenKind::OrOr,
                TokenKind::Shl,
                TokenKind::Shr,
                TokenKind::Eq,
                TokenKind::Lt,
                TokenKind::Gt,
                TokenKind::Eof,
            ]
        );
    }

    #[test]
    fn test_float_literal() {
        let (tokens, diags) = lex("3.25 10");

        assert!(diags.is_empty());
        assert!(matches!(tokens[0].kind, TokenKind::FloatLiteral(x) if x == 3.25));
        assert_eq!(tokens[0].lexeme, "3.25");
        assert!(matches!(tokens[1].kind, TokenKind::IntLiteral(10)));
    }

    #[test]
    fn test_too_many_decimal_points() {
        let (tokens, diags) = lex("1.2.3;");

        assert_eq!(diags.error_count(), 1);
        assert!(matches!(
            diags.iter().next().unwrap().kind,
            DiagnosticKind::TooManyDecimalPoints { .. }
        ));
        assert!(matches!(tokens[0].kind, TokenKind::Error));
        assert!(matches!(tokens[1].kind, TokenKind::Semicolon));
    }

    #[test]
    fn test_invalid_suffix() {
        let (tokens, diags) = lex("123abc");

        assert_eq!(diags.error_count(), 1);
        assert!(matches!(
            diags.iter().next().unwrap().kind,
            DiagnosticKind::InvalidNumericSuffix { .. }
        ));
        assert!(matches!(tokens[0].kind, TokenKind::Error));
        assert_eq!(tokens[0].lexeme, "123abc");
    }

    #[test]
    fn test_trailing_decimal_point_is_ill_formed() {
        let (tokens, diags) = lex("12.");

        assert_eq!(diags.error_count(), 1);
        assert!(matches!(
            diags.iter().next().unwrap().kind,
            DiagnosticKind::IllFormedNumber { .. }
        ));
        assert!(matches!(tokens[0].kind, TokenKind::Error));
    }

    #[test]
    fn test_char_literal() {
        let (tokens, diags) = lex(r"'a' '\n'");

        assert!(diags.is_empty());
        assert!(matches!(tokens[0].kind, TokenKind::CharLiteral('a')));
        assert!(matches!(tokens[1].kind, TokenKind::CharLiteral('\n')));
    }

    #[test]
    fn test_empty_char_literal() {
        let (_, diags) = lex("''");

        assert_eq!(diags.error_count(), 1);
        assert!(matches!(
            diags.iter().next().unwrap().kind,
            DiagnosticKind::EmptyCharLiteral
        ));
    }

    #[test]
    fn test_multichar_literal() {
        let (tokens, diags) = lex("'ab';");

        assert_eq!(diags.error_count(), 1);
        assert!(matches!(
            diags.iter().next().unwrap().kind,
            DiagnosticKind::MultiCharLiteral
        ));
        // Scanning resumes after the closing quote.
        assert!(matches!(tokens[1].kind, TokenKind::Semicolon));
    }

    #[test]
    fn test_unfinished_char_resyncs_at_line_end() {
        let (tokens, diags) = lex("'a\nint x;");

        assert_eq!(diags.error_count(), 1);
        assert!(matches!(
            diags.iter().next().unwrap().kind,
            DiagnosticKind::UnfinishedCharLiteral
        ));
        assert!(matches!(tokens[1].kind, TokenKind::Int));
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn test_unfinished_string_resyncs_at_line_end() {
        let (tokens, diags) = lex("\"abc\nint y;");

        assert_eq!(diags.error_count(), 1);
        assert!(matches!(
            diags.iter().next().unwrap().kind,
            DiagnosticKind::UnfinishedString
        ));
        assert!(matches!(tokens[0].kind, TokenKind::Error));
        assert!(matches!(tokens[1].kind, TokenKind::Int));
        assert_eq!(tokens[1].line(), 2);
    }

    #[test]
    fn test_comments() {
        let (tokens, diags) = lex("int x; // comment\nint y; /* block\ncomment */ int z;");

        assert!(diags.is_empty());
        let idents: Vec<_> = tokens
            .iter()
            .filter(|t| matches!(t.kind, TokenKind::Ident))
            .map(|t| t.lexeme.clone())
            .collect();
        assert_eq!(idents, vec!["x", "y", "z"]);
    }

    #[test]
    fn test_unfinished_comment() {
        let (tokens, diags) = lex("int x; /* never closed");

        assert_eq!(diags.error_count(), 1);
        assert!(matches!(
            diags.iter().next().unwrap().kind,
            DiagnosticKind::UnfinishedComment
        ));
        assert!(tokens.last().unwrap().is_eof());
    }

    #[test]
    fn test_unrecognized_character_is_skipped() {
        let (tokens, diags) = lex("int @ x;");

        assert_eq!(diags.error_count(), 1);
        assert!(matches!(
            diags.iter().next().unwrap().kind,
            DiagnosticKind::UnrecognizedCharacter('@')
        ));
        assert!(matches!(tokens[0].kind, TokenKind::Int));
        assert!(matches!(tokens[1].kind, TokenKind::Ident));
    }

    #[test]
    fn test_line_numbers_are_nondecreasing() {
        let (tokens, _) = lex("int a;\nfloat b;\n\nvoid f() {\n}\n");

        let mut last = 0;
        for token in &tokens {
            assert!(token.line() >= last);
            last = token.line();
        }
    }

    #[test]
    fn test_lexeme_round_trip() {
        let source = "int main() { float x; x = 1.5 + 2; return 0; }";
        let (tokens, diags) = lex(source);
        assert!(diags.is_empty());

        let rebuilt: String = tokens
            .iter()
            .filter(|t| !t.is_eof())
            .map(|t| t.lexeme.clone())
            .collect::<Vec<_>>()
            .join(" ");

        let (tokens2, diags2) = lex(&rebuilt);
        assert!(diags2.is_empty());
        let kinds: Vec<_> = tokens.iter().map(|t| &t.kind).collect();
        let kinds2: Vec<_> = tokens2.iter().map(|t| &t.kind).collect();
        assert_eq!(kinds, kinds2);
    }
}
