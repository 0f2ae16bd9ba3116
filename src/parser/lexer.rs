//! Whitespace tokenizer for traceroute hop lines

/// A classified whitespace-separated token
#[derive(Debug, Clone, PartialEq)]
pub enum Token<'a> {
    /// A latency value with any trailing `ms` removed
    Number(f64),
    /// A token wrapped in parentheses, kept verbatim, e.g. `(192.168.1.1)`
    Paren(&'a str),
    /// Anything else: hostnames, `*`, a detached `ms`, `!H` annotations
    Word(&'a str),
}

impl<'a> Token<'a> {
    /// Classify a single token
    pub fn classify(raw: &'a str) -> Self {
        if raw.len() >= 2 && raw.starts_with('(') && raw.ends_with(')') {
            return Token::Paren(raw);
        }
        match parse_latency(raw) {
            Some(value) => Token::Number(value),
            None => Token::Word(raw),
        }
    }
}

/// Parse a latency token such as `15.234` or `15.234ms`
///
/// Only finite values count, so hostnames like `inf` or `nan` stay words.
pub fn parse_latency(raw: &str) -> Option<f64> {
    let trimmed = raw.strip_suffix("ms").unwrap_or(raw);
    if trimmed.is_empty() {
        return None;
    }
    trimmed.parse::<f64>().ok().filter(|v| v.is_finite())
}

/// Split a line into classified tokens
pub fn lex_line(line: &str) -> Vec<Token<'_>> {
    line.split_whitespace().map(Token::classify).collect()
}
