//! Map (`.map`) run header files
//!
//! A title label and title, then alternating rows of parameter names and
//! their values. Everything from the `LINE: FORMAT:` footer on documents the
//! format and is ignored, as are the `#n` line annotations.

use crate::constants::map::FORMAT_FOOTER;
use crate::error::{Result, VfpError};
use crate::fields::parse_real;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::LazyLock;
use tracing::debug;

static ANNOTATION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"#\d+$").unwrap_or_else(|e| unreachable!("annotation pattern rejected: {e}"))
});

static INTEGER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^-?\d+$").unwrap_or_else(|e| unreachable!("integer pattern rejected: {e}"))
});

static FLOAT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[-+]?(?:\d+\.\d*|\.\d+|\d+(?:\.\d*)?[eEdD][-+]?\d+|\.\d+[eEdD][-+]?\d+)$")
        .unwrap_or_else(|e| unreachable!("float pattern rejected: {e}"))
});

/// A typed map value
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MapValue {
    Integer(i64),
    Float(f64),
    Text(String),
}

impl MapValue {
    /// Integer, then float, then text
    pub fn classify(token: &str) -> Self {
        if INTEGER.is_match(token) {
            if let Ok(value) = token.parse() {
                return MapValue::Integer(value);
            }
        }
        if FLOAT.is_match(token) {
            if let Some(value) = parse_real(token) {
                return MapValue::Float(value);
            }
        }
        MapValue::Text(token.to_string())
    }

    /// Numeric value of an integer or float
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            MapValue::Integer(v) => Some(*v as f64),
            MapValue::Float(v) => Some(*v),
            MapValue::Text(_) => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            MapValue::Integer(v) => Some(*v),
            _ => None,
        }
    }

    pub fn as_str(&self) -> Option<&str> {
        match self {
            MapValue::Text(s) => Some(s),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MapEntry {
    pub key: String,
    pub value: MapValue,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct MapFile {
    pub title_label: Option<String>,
    pub title: Option<String>,

    /// Parameters in file order
    pub entries: Vec<MapEntry>,
}

impl MapFile {
    /// First value for a parameter name
    pub fn get(&self, key: &str) -> Option<&MapValue> {
        self.entries
            .iter()
            .find(|entry| entry.key == key)
            .map(|entry| &entry.value)
    }
}

pub fn parse(text: &str) -> Result<MapFile> {
    // (1-based line number, cleaned line)
    let rows: Vec<(usize, &str)> = text
        .lines()
        .enumerate()
        .map(|(i, line)| (i + 1, line.trim()))
        .take_while(|(_, line)| !line.starts_with(FORMAT_FOOTER))
        .map(|(n, line)| match ANNOTATION.find(line) {
            Some(m) => (n, line[..m.start()].trim_end()),
            None => (n, line),
        })
        .filter(|(_, line)| !line.is_empty())
        .collect();

    let mut rows = rows.into_iter();
    let mut map = MapFile {
        title_label: rows.next().map(|(_, line)| line.to_string()),
        title: rows.next().map(|(_, line)| line.to_string()),
        entries: Vec::new(),
    };

    while let Some((key_line, keys)) = rows.next() {
        let Some((value_line, values)) = rows.next() else {
            return Err(VfpError::format(
                key_line,
                format!("parameter names '{keys}' have no value row"),
            ));
        };

        let keys: Vec<&str> = keys.split_whitespace().collect();
        let values: Vec<&str> = values.split_whitespace().collect();
        if keys.len() != values.len() {
            return Err(VfpError::format(
                value_line,
                format!(
                    "{} parameter names on line {key_line} but {} values",
                    keys.len(),
                    values.len()
                ),
            ));
        }

        map.entries
            .extend(keys.into_iter().zip(values).map(|(key, value)| MapEntry {
                key: key.to_string(),
                value: MapValue::classify(value),
            }));
    }

    debug!("Parsed map file: {} parameters", map.entries.len());
    Ok(map)
}

pub fn read(path: &Path) -> Result<MapFile> {
    let text = std::fs::read_to_string(path)?;
    parse(&text).map_err(|e| e.in_file(path))
}

#[cfg(test)]
mod tests {
    use super::*;

    const MAP: &str = "\
TITLE FOR VFP MAPPING RUN:                     #1
CRM wing-body, M0.85                           #2

  NMAP   IOPT   XMIN     XMAX                  #3
  2      A1     -0.5     1.25E+01              #4
  RE     FRAC                                  #5
  5.0D6  .75                                   #6
LINE: FORMAT:
  #3   NMAP IOPT XMIN XMAX
  #4   I5 A2 F10.4 F10.4
";

    #[test]
    fn test_parse_typed_entries() {
        let map = parse(MAP).unwrap();
        assert_eq!(map.title_label.as_deref(), Some("TITLE FOR VFP MAPPING RUN:"));
        assert_eq!(map.title.as_deref(), Some("CRM wing-body, M0.85"));
        assert_eq!(map.entries.len(), 6);

        assert_eq!(map.get("NMAP"), Some(&MapValue::Integer(2)));
        assert_eq!(map.get("IOPT"), Some(&MapValue::Text("A1".to_string())));
        assert_eq!(map.get("XMIN"), Some(&MapValue::Float(-0.5)));
        assert_eq!(map.get("XMAX").and_then(MapValue::as_f64), Some(12.5));
        assert_eq!(map.get("RE").and_then(MapValue::as_f64), Some(5.0e6));
        assert_eq!(map.get("FRAC"), Some(&MapValue::Float(0.75)));
        assert_eq!(map.entries[0].key, "NMAP");
    }

    #[test]
    fn test_classifier_order() {
        assert_eq!(MapValue::classify("-12"), MapValue::Integer(-12));
        assert_eq!(MapValue::classify("+3."), MapValue::Float(3.0));
        assert_eq!(MapValue::classify("1e3"), MapValue::Float(1000.0));
        assert_eq!(MapValue::classify("1-2"), MapValue::Text("1-2".into()));
        assert_eq!(MapValue::classify("T"), MapValue::Text("T".into()));
        assert_eq!(MapValue::classify("."), MapValue::Text(".".into()));
    }

    #[test]
    fn test_arity_mismatch_is_format_error() {
        let text = "TITLE:\nwing\nA B C\n1 2\n";
        match parse(text) {
            Err(VfpError::Format { line, .. }) => assert_eq!(line, 4),
            other => panic!("expected format error, got {other:?}"),
        }
    }

    #[test]
    fn test_dangling_key_row_is_format_error() {
        let text = "TITLE:\nwing\nA B\n1 2\nC D\n";
        assert!(matches!(parse(text), Err(VfpError::Format { line: 5, .. })));
    }

    #[test]
    fn test_footer_only_file() {
        let map = parse("LINE: FORMAT:\n A B\n").unwrap();
        assert_eq!(map, MapFile::default());
    }

    #[test]
    fn test_values_serialize_untagged() {
        let map = parse("T:\nx\nN F S\n1 2.5 abc\n").unwrap();
        let json = serde_json::to_string(&map.entries).unwrap();
        assert_eq!(
            json,
            r#"[{"key":"N","value":1},{"key":"F","value":2.5},{"key":"S","value":"abc"}]"#
        );
    }
}
