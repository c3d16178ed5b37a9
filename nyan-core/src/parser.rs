//! Turning Nyan source text into a token stream.

use {
    crate::error::ParseError,
    nyan_format::Opcode,
    regex::Regex,
    std::sync::OnceLock,
};

fn comment_pattern() -> &'static Regex
{
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| Regex::new(r#""(\\.|[^"\\])*""#).unwrap())
}

/// Parse source text into a token stream.
///
/// Quoted comments (`"…"`, with `\"` escapes) are stripped before
/// tokenizing. Only newline and space are treated as insignificant
/// whitespace and dropped (spec's stripping step names exactly those
/// two characters); any other whitespace, such as a tab or carriage
/// return, is not in the opcode alphabet and is rejected like any other
/// invalid character.
pub fn parse_source(text: &str) -> Result<Vec<Opcode>, ParseError>
{
    let without_comments = comment_pattern().replace_all(text, "");

    without_comments
        .chars()
        .filter(|c| !matches!(c, '\n' | ' '))
        .map(|c| Opcode::from_char(c).map_err(ParseError::from))
        .collect()
}

#[cfg(test)]
mod tests
{
    use super::*;

    #[test]
    fn strips_whitespace()
    {
        let tokens = parse_source("냥 냥\n냥").unwrap();
        assert_eq!(tokens, vec![Opcode::CellInc; 3]);
    }

    #[test]
    fn strips_quoted_comments()
    {
        let tokens = parse_source(r#"냥"any text here"냥."#).unwrap();
        assert_eq!(tokens, vec![Opcode::CellInc, Opcode::CellInc, Opcode::Output]);
    }

    #[test]
    fn strips_comments_with_escaped_quotes()
    {
        let tokens = parse_source(r#"냥"a \" quote".냥"#).unwrap();
        assert_eq!(tokens, vec![Opcode::CellInc, Opcode::CellInc]);
    }

    #[test]
    fn rejects_invalid_characters()
    {
        assert!(parse_source("x").is_err());
    }

    #[test]
    fn rejects_whitespace_other_than_space_and_newline()
    {
        assert!(parse_source("냥\t냥").is_err());
        assert!(parse_source("냥\r냥").is_err());
    }

    #[test]
    fn empty_source_parses_to_no_tokens()
    {
        assert_eq!(parse_source("").unwrap(), Vec::new());
    }
}
