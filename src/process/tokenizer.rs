// src/process/tokenizer.rs

use crate::process::utils::{clean_str, strip_bom};

const DELIMITER: char = ',';
const QUOTE: char = '"';

/// Split raw CSV text into records of raw string fields.
///
/// Lines are split on `\n` / `\r\n` and lines that are blank after trimming
/// are dropped. Quoting is tolerant: an unterminated quote simply runs to the
/// end of its line.
pub fn tokenize(text: &str) -> Vec<Vec<String>> {
    logical_lines(text).map(tokenize_line).collect()
}

/// Non-blank logical lines of `text`, BOM removed.
pub fn logical_lines(text: &str) -> impl Iterator<Item = &str> {
    strip_bom(text)
        .split('\n')
        .map(|line| line.strip_suffix('\r').unwrap_or(line))
        .filter(|line| !line.trim().is_empty())
}

/// Tokenize a single line.
///
/// A `"` toggles quoted mode and is not copied into the field; `,` inside
/// quoted mode is literal content. Doubled quotes are not unescaped.
pub fn tokenize_line(line: &str) -> Vec<String> {
    let mut fields = Vec::new();
    let mut cur = String::new();
    let mut in_quote = false;

    for ch in line.chars() {
        match ch {
            QUOTE => in_quote = !in_quote,
            DELIMITER if !in_quote => {
                fields.push(clean_str(&cur));
                cur.clear();
            }
            _ => cur.push(ch),
        }
    }
    fields.push(clean_str(&cur));

    fields
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quoted_comma_stays_in_field() {
        assert_eq!(tokenize_line(r#"A,"B,C",D"#), vec!["A", "B,C", "D"]);
    }

    #[test]
    fn fields_are_trimmed() {
        assert_eq!(tokenize_line(" A , B ,C "), vec!["A", "B", "C"]);
        assert_eq!(tokenize_line(r#"  "  padded  " ,x"#), vec!["padded", "x"]);
    }

    #[test]
    fn trailing_comma_yields_empty_field() {
        assert_eq!(tokenize_line("A,B,"), vec!["A", "B", ""]);
        assert_eq!(tokenize_line(","), vec!["", ""]);
    }

    #[test]
    fn doubled_quotes_are_not_unescaped() {
        // Each quote only toggles the mode; nothing is emitted for them.
        assert_eq!(
            tokenize_line(r#"x,"say ""hi"", ok",y"#),
            vec!["x", "say hi, ok", "y"]
        );
    }

    #[test]
    fn unterminated_quote_runs_to_end_of_line() {
        assert_eq!(tokenize_line(r#"A,"B,C,D"#), vec!["A", "B,C,D"]);
    }

    #[test]
    fn blank_and_whitespace_lines_are_skipped() {
        let text = "H1,H2\n\n  \r\na,b\r\n\t\nc,d\n\n";
        let records = tokenize(text);
        assert_eq!(
            records,
            vec![
                vec!["H1".to_string(), "H2".to_string()],
                vec!["a".to_string(), "b".to_string()],
                vec!["c".to_string(), "d".to_string()],
            ]
        );
    }

    #[test]
    fn crlf_does_not_leak_into_last_field() {
        let records = tokenize("A,B\r\n1,2\r\n");
        assert_eq!(records[1], vec!["1", "2"]);
    }

    #[test]
    fn bom_is_stripped_from_first_header() {
        let records = tokenize("\u{FEFF}BIDANG,MAK\nIPP,A009");
        assert_eq!(records[0][0], "BIDANG");
    }

    #[test]
    fn empty_text_has_no_records() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("\n \r\n\t").is_empty());
    }
}
