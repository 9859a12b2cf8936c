//! Python list literals as stored in the recipe CSV
//!
//! `tags` and `ingredients` hold lists of quoted strings, `nutrition` a list
//! of numbers, e.g. `['easy', "mom's"]` and `[51.5, 0.0, 13.0]`.

use std::iter::Peekable;
use std::str::Chars;

fn skip_ws(chars: &mut Peekable<Chars<'_>>) {
    while chars.peek().is_some_and(|c| c.is_whitespace()) {
        chars.next();
    }
}

/// Split the inside of `[...]` into raw items, honouring quotes
fn items(input: &str) -> Result<Vec<Item>, String> {
    let trimmed = input.trim();
    let inner = trimmed
        .strip_prefix('[')
        .and_then(|s| s.strip_suffix(']'))
        .ok_or_else(|| format!("expected a bracketed list, got '{}'", truncate(trimmed)))?;

    let mut out = Vec::new();
    let mut chars = inner.chars().peekable();
    loop {
        skip_ws(&mut chars);
        let Some(&c) = chars.peek() else { break };

        let item = if c == '\'' || c == '"' {
            chars.next();
            Item::Quoted(quoted(&mut chars, c)?)
        } else {
            let mut raw = String::new();
            while let Some(&c) = chars.peek() {
                if c == ',' {
                    break;
                }
                raw.push(c);
                chars.next();
            }
            Item::Bare(raw.trim().to_string())
        };
        out.push(item);

        skip_ws(&mut chars);
        match chars.next() {
            None => break,
            Some(',') => continue,
            Some(other) => return Err(format!("unexpected '{}' after list item", other)),
        }
    }
    Ok(out)
}

enum Item {
    Quoted(String),
    Bare(String),
}

fn quoted(chars: &mut Peekable<Chars<'_>>, quote: char) -> Result<String, String> {
    let mut s = String::new();
    while let Some(c) = chars.next() {
        match c {
            '\\' => match chars.next() {
                Some('n') => s.push('\n'),
                Some('t') => s.push('\t'),
                Some(other) => s.push(other),
                None => break,
            },
            c if c == quote => return Ok(s),
            c => s.push(c),
        }
    }
    Err("unterminated string".to_string())
}

fn truncate(s: &str) -> String {
    s.chars().take(40).collect()
}

/// `['a', "b"]` -> `["a", "b"]`; an empty cell is an empty list
pub fn parse_string_list(input: &str) -> Result<Vec<String>, String> {
    if input.trim().is_empty() {
        return Ok(Vec::new());
    }
    items(input)?
        .into_iter()
        .map(|item| match item {
            Item::Quoted(s) => Ok(s),
            Item::Bare(raw) => Err(format!("expected a quoted string, got '{}'", raw)),
        })
        .collect()
}

/// `[1.0, 2]` -> `[1.0, 2.0]`
pub fn parse_number_list(input: &str) -> Result<Vec<f64>, String> {
    items(input)?
        .into_iter()
        .map(|item| match item {
            Item::Bare(raw) => raw.parse::<f64>().map_err(|_| format!("invalid number '{}'", raw)),
            Item::Quoted(s) => Err(format!("expected a number, got '{}'", s)),
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_string_list() {
        assert_eq!(
            parse_string_list("['60-minutes-or-less', 'time-to-make']").unwrap(),
            vec!["60-minutes-or-less", "time-to-make"]
        );
        assert_eq!(parse_string_list("[]").unwrap(), Vec::<String>::new());
        assert_eq!(parse_string_list("").unwrap(), Vec::<String>::new());
    }

    #[test]
    fn test_string_list_quotes_and_escapes() {
        let parsed = parse_string_list(r#"["mom's pie", 'a, b', 'it\'s']"#).unwrap();
        assert_eq!(parsed, vec!["mom's pie", "a, b", "it's"]);
    }

    #[test]
    fn test_string_list_errors() {
        assert!(parse_string_list("'a', 'b'").is_err());
        assert!(parse_string_list("['a', b]").is_err());
        assert!(parse_string_list("['open]").is_err());
    }

    #[test]
    fn test_number_list() {
        let parsed = parse_number_list("[51.5, 0.0, 13.0, 0, 2, 0.0, 4.0]").unwrap();
        assert_eq!(parsed, vec![51.5, 0.0, 13.0, 0.0, 2.0, 0.0, 4.0]);
        assert!(parse_number_list("[1.0, x]").is_err());
        assert!(parse_number_list("['1']").is_err());
    }
}
