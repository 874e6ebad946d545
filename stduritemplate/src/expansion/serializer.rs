//! Value serialization for one varspec
//!
//! The "value" rule applies the operator's naming convention (`name=` for `?`/`&`,
//! `name` plus an optional `=value` for `;`). The "element" rule only encodes. Prefix
//! and separator placement between varspecs is the engine's job.

use super::encoder::{encode_into, truncate};
use super::error::ExpansionError;
use crate::tokens::{Operator, VarSpec};
use std::collections::BTreeMap;

/// Write one text under the operator's naming rule
pub fn write_value(out: &mut String, operator: Operator, name: &str, text: &str, max_chars: Option<usize>) {
    match operator {
        Operator::QuestionMark | Operator::Amp => {
            out.push_str(name);
            out.push('=');
            encode_into(out, text, max_chars, false);
        }
        Operator::Semicolon => {
            out.push_str(name);
            if !truncate(text, max_chars).is_empty() {
                out.push('=');
            }
            encode_into(out, text, max_chars, false);
        }
        _ => encode_into(out, text, max_chars, operator.allows_reserved()),
    }
}

/// Write one text with the operator's encoding policy and no name
pub fn write_element(out: &mut String, operator: Operator, text: &str, max_chars: Option<usize>) {
    encode_into(out, text, max_chars, operator.allows_reserved());
}

pub fn write_string(out: &mut String, operator: Operator, varspec: &VarSpec, text: &str) {
    write_value(out, operator, &varspec.name, text, varspec.max_chars);
}

/// Lists truncate each element individually
pub fn write_list(out: &mut String, operator: Operator, varspec: &VarSpec, items: &[String]) {
    for (i, item) in items.iter().enumerate() {
        if i == 0 {
            write_value(out, operator, &varspec.name, item, varspec.max_chars);
        } else if varspec.explode {
            out.push(operator.separator());
            write_value(out, operator, &varspec.name, item, varspec.max_chars);
        } else {
            out.push(',');
            write_element(out, operator, item, varspec.max_chars);
        }
    }
}

/// Maps cannot be trimmed; pairs are written in ascending key order
pub fn write_map(
    out: &mut String,
    operator: Operator,
    varspec: &VarSpec,
    pairs: &BTreeMap<String, String>,
) -> Result<(), ExpansionError> {
    if varspec.max_chars.is_some() {
        return Err(ExpansionError::MapTrimmingUnsupported {
            name: varspec.name.clone(),
            column: varspec.end_column(),
        });
    }

    for (i, (key, value)) in pairs.iter().enumerate() {
        if varspec.explode {
            if i > 0 {
                out.push(operator.separator());
            }
            write_element(out, operator, key, None);
            out.push('=');
            write_element(out, operator, value, None);
        } else {
            if i == 0 {
                write_value(out, operator, &varspec.name, key, None);
            } else {
                out.push(',');
                write_element(out, operator, key, None);
            }
            out.push(',');
            write_element(out, operator, value, None);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::{Position, Span};
    use assert_matches::assert_matches;

    fn varspec(name: &str, explode: bool, max_chars: Option<usize>) -> VarSpec {
        let start = Position::start();
        VarSpec {
            name: name.to_string(),
            explode,
            max_chars,
            span: Span::new(start, start.advance_str(name)),
        }
    }

    fn list(items: &[&str]) -> Vec<String> {
        items.iter().map(|s| s.to_string()).collect()
    }

    fn map(pairs: &[(&str, &str)]) -> BTreeMap<String, String> {
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect()
    }

    #[test]
    fn test_semicolon_omits_equals_for_empty_value() {
        let mut out = String::new();
        write_value(&mut out, Operator::Semicolon, "empty", "", None);
        assert_eq!(out, "empty");

        let mut out = String::new();
        write_value(&mut out, Operator::Semicolon, "x", "abc", Some(0));
        assert_eq!(out, "x");
    }

    #[test]
    fn test_query_keeps_equals_for_empty_value() {
        let mut out = String::new();
        write_value(&mut out, Operator::QuestionMark, "empty", "", None);
        assert_eq!(out, "empty=");
    }

    #[test]
    fn test_list_not_exploded_names_first_only() {
        let mut out = String::new();
        write_list(
            &mut out,
            Operator::QuestionMark,
            &varspec("list", false, None),
            &list(&["red", "green", "blue"]),
        );
        assert_eq!(out, "list=red,green,blue");
    }

    #[test]
    fn test_list_exploded_repeats_name() {
        let mut out = String::new();
        write_list(
            &mut out,
            Operator::Semicolon,
            &varspec("list", true, None),
            &list(&["red", "green", "blue"]),
        );
        assert_eq!(out, "list=red;list=green;list=blue");
    }

    #[test]
    fn test_list_elements_truncated_individually() {
        let mut out = String::new();
        write_list(
            &mut out,
            Operator::NoOp,
            &varspec("list", false, Some(2)),
            &list(&["red", "green"]),
        );
        assert_eq!(out, "re,gr");
    }

    #[test]
    fn test_map_forms() {
        let pairs = map(&[("semi", ";"), ("dot", "."), ("comma", ",")]);

        let mut out = String::new();
        write_map(&mut out, Operator::NoOp, &varspec("keys", false, None), &pairs).unwrap();
        assert_eq!(out, "comma,%2C,dot,.,semi,%3B");

        let mut out = String::new();
        write_map(&mut out, Operator::Plus, &varspec("keys", true, None), &pairs).unwrap();
        assert_eq!(out, "comma=,,dot=.,semi=;");

        let mut out = String::new();
        write_map(&mut out, Operator::QuestionMark, &varspec("keys", false, None), &pairs).unwrap();
        assert_eq!(out, "keys=comma,%2C,dot,.,semi,%3B");

        let mut out = String::new();
        write_map(&mut out, Operator::Amp, &varspec("keys", true, None), &pairs).unwrap();
        assert_eq!(out, "comma=%2C&dot=.&semi=%3B");
    }

    #[test]
    fn test_map_rejects_prefix() {
        let mut out = String::new();
        assert_matches!(
            write_map(&mut out, Operator::NoOp, &varspec("keys", false, Some(1)), &map(&[("a", "b")])),
            Err(ExpansionError::MapTrimmingUnsupported { name, .. }) if name == "keys"
        );
        assert!(out.is_empty());
    }
}
