//! A one-shot translator from a minimal Brainfuck-like language into
//! Nyan source.
//!
//! Reads a file whose alphabet is `< > + - [ ] , . space newline`;
//! characters outside that alphabet are preserved verbatim but wrapped
//! in `"…"` so the Nyan parser treats them as a comment instead of a
//! syntax error.

#![warn(missing_docs)]

use {
    std::path::{Path, PathBuf},
    thiserror::Error,
};

/// Error translating a Brainfuck-like source file.
#[allow(missing_docs)]
#[derive(Debug, Error)]
pub enum TranslateError
{
    #[error("{path}: {source}")]
    Io{path: PathBuf, #[source] source: std::io::Error},

    #[error("{0}: refusing to overwrite an existing file")]
    OutputExists(PathBuf),
}

fn mapped_char(c: char) -> Option<char>
{
    match c {
        '<' => Some('!'),
        '>' => Some('?'),
        '+' => Some('냥'),
        '-' => Some('냐'),
        '[' => Some('~'),
        ']' => Some('-'),
        ',' | '.' | ' ' | '\n' => Some(c),
        _ => None,
    }
}

/// Translate Brainfuck source text into Nyan source text.
///
/// Mirrors the original implementation's character-by-character state
/// machine, including its one quirk: a space encountered while already
/// inside a comment run is appended to the comment rather than closing
/// it, so a foreign-character run that happens to contain spaces stays
/// a single comment instead of being split into several. Any other
/// in-alphabet character (including newline) closes an open comment
/// before being translated.
///
/// A literal `"` is not in the Brainfuck alphabet, so it is treated as
/// a foreign character like any other — but unlike the original, it is
/// escaped to `\"` so the emitted comment still parses as one balanced
/// Nyan comment instead of producing mismatched quotes.
pub fn translate(source: &str) -> String
{
    let mut out = String::new();
    let mut in_comment = false;

    for c in source.chars() {
        match mapped_char(c) {
            Some(' ') if in_comment => {
                out.push(' ');
            }
            Some(mapped) => {
                if in_comment {
                    out.push('"');
                    in_comment = false;
                }
                out.push(mapped);
            }
            None => {
                if !in_comment {
                    out.push('"');
                    in_comment = true;
                }
                if c == '"' {
                    out.push('\\');
                }
                out.push(c);
            }
        }
    }

    if in_comment {
        out.push('"');
    }

    out
}

/// Translate the Brainfuck source file at `src` and write the result to
/// `dest`, refusing to overwrite an existing file.
pub fn translate_file(src: &Path, dest: &Path) -> Result<(), TranslateError>
{
    if dest.exists() {
        return Err(TranslateError::OutputExists(dest.to_owned()));
    }

    let text = std::fs::read_to_string(src)
        .map_err(|source| TranslateError::Io{path: src.to_owned(), source})?;
    let translated = translate(&text);
    std::fs::write(dest, translated)
        .map_err(|source| TranslateError::Io{path: dest.to_owned(), source})?;
    Ok(())
}
