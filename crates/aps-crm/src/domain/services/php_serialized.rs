//! PHP-serialized associative arrays
//!
//! WordPress stores structured form sections (`_aps_firma`, `_aps_contract`, ...)
//! as PHP `serialize()` output, e.g. `a:2:{s:8:"denumire";s:7:"APS SRL";s:3:"cui";s:3:"123";}`.
//! String lengths are byte counts, so multi-byte Romanian text must be sliced
//! on bytes rather than chars.

use std::collections::BTreeMap;

/// Flat key/value view of a serialized array. Scalars are kept as strings,
/// nested arrays and nulls are skipped.
pub type PhpArray = BTreeMap<String, String>;

/// Nested arrays deeper than this are treated as damage
const MAX_DEPTH: usize = 16;

/// Parse a serialized array. Malformed or truncated input yields whatever
/// pairs were read before the damage.
pub fn parse_assoc(raw: &str) -> PhpArray {
    let mut parser = Parser {
        input: raw.trim().as_bytes(),
        pos: 0,
    };
    let mut out = PhpArray::new();
    parser.read_top_level(&mut out);
    out
}

enum Value {
    Scalar(String),
    Skipped,
}

struct Parser<'a> {
    input: &'a [u8],
    pos: usize,
}

impl Parser<'_> {
    fn read_top_level(&mut self, out: &mut PhpArray) -> Option<()> {
        self.expect(b"a:")?;
        let count = self.read_number_until(b':')?;
        self.expect(b"{")?;
        for _ in 0..count {
            let key = match self.read_value(1)? {
                Value::Scalar(key) => key,
                Value::Skipped => return None,
            };
            if let Value::Scalar(value) = self.read_value(1)? {
                out.insert(key, value);
            }
        }
        Some(())
    }

    fn read_value(&mut self, depth: usize) -> Option<Value> {
        let tag = *self.input.get(self.pos)?;
        match tag {
            b's' => {
                self.expect(b"s:")?;
                let len = self.read_number_until(b':')?;
                self.expect(b"\"")?;
                let end = self.pos.checked_add(len)?;
                let bytes = self.input.get(self.pos..end)?;
                let text = String::from_utf8_lossy(bytes).into_owned();
                self.pos = end;
                self.expect(b"\";")?;
                Some(Value::Scalar(text))
            }
            b'i' | b'd' => {
                self.pos += 2;
                let text = self.read_until(b';')?;
                Some(Value::Scalar(text))
            }
            b'b' => {
                self.pos += 2;
                let text = self.read_until(b';')?;
                Some(Value::Scalar(if text == "1" { "true" } else { "false" }.into()))
            }
            b'N' => {
                self.expect(b"N;")?;
                Some(Value::Skipped)
            }
            b'a' => {
                if depth >= MAX_DEPTH {
                    return None;
                }
                self.expect(b"a:")?;
                let count = self.read_number_until(b':')?;
                self.expect(b"{")?;
                for _ in 0..count.checked_mul(2)? {
                    self.read_value(depth + 1)?;
                }
                self.expect(b"}")?;
                Some(Value::Skipped)
            }
            _ => None,
        }
    }

    fn expect(&mut self, token: &[u8]) -> Option<()> {
        if self.input.get(self.pos..self.pos + token.len())? == token {
            self.pos += token.len();
            Some(())
        } else {
            None
        }
    }

    fn read_until(&mut self, delimiter: u8) -> Option<String> {
        let rest = self.input.get(self.pos..)?;
        let end = rest.iter().position(|b| *b == delimiter)?;
        let text = String::from_utf8_lossy(&rest[..end]).into_owned();
        self.pos += end + 1;
        Some(text)
    }

    fn read_number_until(&mut self, delimiter: u8) -> Option<usize> {
        self.read_until(delimiter)?.trim().parse().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_string_pairs() {
        let parsed = parse_assoc(r#"a:2:{s:8:"denumire";s:7:"APS SRL";s:3:"cui";s:8:"RO123456";}"#);
        assert_eq!(parsed.get("denumire").map(String::as_str), Some("APS SRL"));
        assert_eq!(parsed.get("cui").map(String::as_str), Some("RO123456"));
    }

    #[test]
    fn test_multibyte_lengths_are_bytes() {
        // "Asociația" is 9 chars but 10 bytes
        let parsed = parse_assoc(r#"a:1:{s:8:"denumire";s:10:"Asociația";}"#);
        assert_eq!(parsed.get("denumire").map(String::as_str), Some("Asociația"));
    }

    #[test]
    fn test_numeric_keys_and_values() {
        let parsed = parse_assoc(r#"a:3:{i:0;s:1:"x";s:4:"suma";i:2500;s:5:"pluta";d:1.5;}"#);
        assert_eq!(parsed.get("0").map(String::as_str), Some("x"));
        assert_eq!(parsed.get("suma").map(String::as_str), Some("2500"));
        assert_eq!(parsed.get("pluta").map(String::as_str), Some("1.5"));
    }

    #[test]
    fn test_nested_and_null_values_are_skipped() {
        let parsed = parse_assoc(
            r#"a:3:{s:1:"a";a:1:{s:1:"b";s:1:"c";}s:1:"n";N;s:3:"tel";s:4:"0722";}"#,
        );
        assert_eq!(parsed.len(), 1);
        assert_eq!(parsed.get("tel").map(String::as_str), Some("0722"));
    }

    #[test]
    fn test_truncated_input_keeps_parsed_pairs() {
        let parsed = parse_assoc(r#"a:2:{s:5:"email";s:11:"ana@aps.org";s:3:"tel";s:10:"07"#);
        assert_eq!(parsed.get("email").map(String::as_str), Some("ana@aps.org"));
        assert!(parsed.get("tel").is_none());
    }

    #[test]
    fn test_garbage_yields_empty() {
        assert!(parse_assoc("").is_empty());
        assert!(parse_assoc("not serialized").is_empty());
        assert!(parse_assoc("a:x:{").is_empty());
    }

    #[test]
    fn test_hostile_nesting_is_rejected() {
        let huge = r#"a:1:{s:1:"k";a:9223372036854775808:{}}"#;
        assert!(parse_assoc(huge).is_empty());

        let deep = format!(
            r#"a:2:{{s:1:"k";{}{}s:3:"tel";s:4:"0722";}}"#,
            r#"a:1:{i:0;"#.repeat(64),
            "}".repeat(64)
        );
        let parsed = parse_assoc(&deep);
        assert!(parsed.get("tel").is_none());

        let shallow = r#"a:2:{s:1:"k";a:1:{i:0;a:1:{i:0;s:1:"x";}}s:3:"tel";s:4:"0722";}"#;
        assert_eq!(parse_assoc(shallow).get("tel").map(String::as_str), Some("0722"));
    }
}
