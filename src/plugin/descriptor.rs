//! Reader for `plugin-descriptor.properties` files.
//!
//! Descriptors use the Java properties syntax: `key=value`, `key: value` or
//! `key value`, `#`/`!` comments, backslash line continuations and
//! backslash escapes.

use std::collections::HashMap;
use std::str::Chars;

use thiserror::Error;

pub const DESCRIPTOR_FILE_NAME: &str = "plugin-descriptor.properties";

const WHITESPACE: [char; 3] = [' ', '\t', '\x0c'];

#[derive(Debug, Error, PartialEq, Eq)]
pub enum DescriptorError {
    #[error("malformed \\uXXXX escape in {0:?}")]
    MalformedUnicodeEscape(String),
}

/// Descriptor bytes as text: UTF-8 when valid, otherwise ISO-8859-1.
pub fn decode(bytes: &[u8]) -> String {
    match std::str::from_utf8(bytes) {
        Ok(text) => text.to_string(),
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

pub fn parse_properties(text: &str) -> Result<HashMap<String, String>, DescriptorError> {
    let mut properties = HashMap::new();
    // Lines end with `\r\n`, `\n` or a lone `\r`.
    let normalized = text.replace("\r\n", "\n");
    let mut lines = normalized.split(['\n', '\r']);

    while let Some(line) = lines.next() {
        let line = line.trim_start_matches(WHITESPACE);
        if line.is_empty() || line.starts_with(['#', '!']) {
            continue;
        }

        let mut logical = line.to_string();
        while continues_on_next_line(&logical) {
            logical.pop();
            let Some(next) = lines.next() else {
                break;
            };
            logical.push_str(next.trim_start_matches(WHITESPACE));
        }

        let (key, value) = split_entry(&logical);
        properties.insert(unescape(key)?, unescape(value)?);
    }

    Ok(properties)
}

/// An odd number of trailing backslashes escapes the line break.
fn continues_on_next_line(line: &str) -> bool {
    line.chars().rev().take_while(|c| *c == '\\').count() % 2 == 1
}

fn split_entry(line: &str) -> (&str, &str) {
    let mut escaped = false;
    let mut key_end = line.len();
    let mut separator = None;

    for (idx, c) in line.char_indices() {
        if escaped {
            escaped = false;
            continue;
        }
        match c {
            '\\' => escaped = true,
            '=' | ':' => {
                key_end = idx;
                separator = Some(c);
                break;
            }
            c if WHITESPACE.contains(&c) => {
                key_end = idx;
                separator = Some(c);
                break;
            }
            _ => {}
        }
    }

    let key = &line[..key_end];
    let Some(separator) = separator else {
        return (key, "");
    };

    let mut rest = &line[key_end + separator.len_utf8()..];
    rest = rest.trim_start_matches(WHITESPACE);
    if WHITESPACE.contains(&separator) {
        if let Some(stripped) = rest.strip_prefix(['=', ':']) {
            rest = stripped.trim_start_matches(WHITESPACE);
        }
    }

    (key, rest)
}

fn unescape(raw: &str) -> Result<String, DescriptorError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars();

    while let Some(c) = chars.next() {
        if c != '\\' {
            out.push(c);
            continue;
        }

        match chars.next() {
            Some('t') => out.push('\t'),
            Some('n') => out.push('\n'),
            Some('r') => out.push('\r'),
            Some('f') => out.push('\x0c'),
            Some('u') => {
                let malformed = || DescriptorError::MalformedUnicodeEscape(raw.to_string());
                let mut units = vec![read_utf16_unit(&mut chars).ok_or_else(malformed)?];

                // A high surrogate pairs with the `\uXXXX` right after it.
                if (0xD800..=0xDBFF).contains(&units[0]) {
                    if let Some(rest) = chars.as_str().strip_prefix("\\u") {
                        chars = rest.chars();
                        units.push(read_utf16_unit(&mut chars).ok_or_else(malformed)?);
                    }
                }

                let decoded: String = char::decode_utf16(units)
                    .collect::<Result<_, _>>()
                    .map_err(|_| malformed())?;
                out.push_str(&decoded);
            }
            Some(other) => out.push(other),
            None => {}
        }
    }

    Ok(out)
}

fn read_utf16_unit(chars: &mut Chars<'_>) -> Option<u16> {
    let hex: String = chars.by_ref().take(4).collect();
    if hex.len() != 4 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return None;
    }
    u16::from_str_radix(&hex, 16).ok()
}
