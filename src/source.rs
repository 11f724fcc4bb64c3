//! Purpose: Resolve `@path` file references into raw item lists or mapping values.
//! Exports: `read_items`, `load_mapping`.
//! Role: File-loading collaborator for container, mapping and record inputs.
//! Invariants: A missing file is `FileNotFound`; any other read failure is `Io`.
//! Invariants: Reads are synchronous and whole-file; no retries.
use std::fs;
use std::io;
use std::path::Path;

use bstr::ByteSlice;

use crate::core::error::{Error, ErrorKind};
use crate::core::value::Value;
use crate::json::parse;

fn read_text(path: &Path) -> Result<String, Error> {
    if !path.is_file() {
        return Err(Error::new(ErrorKind::FileNotFound)
            .with_message(format!("file not found: {}", path.display()))
            .with_hint("file references are resolved relative to the working directory"));
    }
    tracing::debug!(path = %path.display(), "reading file reference");
    let bytes = fs::read(path).map_err(|err| read_error(err, path))?;
    Ok(bytes.to_str_lossy().into_owned())
}

fn read_error(err: io::Error, path: &Path) -> Error {
    let kind = if err.kind() == io::ErrorKind::NotFound {
        ErrorKind::FileNotFound
    } else {
        ErrorKind::Io
    };
    Error::new(kind)
        .with_message(format!("failed to read {}", path.display()))
        .with_source(err)
}

/// Newline separated items; a single line holding `sep` is split on it instead.
pub fn read_items(path: impl AsRef<Path>, sep: &str) -> Result<Vec<String>, Error> {
    let text = read_text(path.as_ref())?;
    let lines: Vec<&str> = text.lines().collect();
    let items: Vec<&str> = match lines.as_slice() {
        [single] if !sep.is_empty() && single.contains(sep) => single.split(sep).collect(),
        _ => lines,
    };
    Ok(items.into_iter().map(|item| item.trim().to_string()).collect())
}

/// Mapping content: `.yaml`/`.yml` via serde_yaml, everything else as JSON.
pub fn load_mapping(path: impl AsRef<Path>) -> Result<Value, Error> {
    let path = path.as_ref();
    let text = read_text(path)?;
    let is_yaml = matches!(
        path.extension().and_then(|ext| ext.to_str()),
        Some("yaml" | "yml")
    );
    if is_yaml {
        let value: serde_json::Value = serde_yaml::from_str(&text).map_err(|err| {
            Error::new(ErrorKind::Value)
                .with_message(format!("invalid YAML in {}: {err}", path.display()))
                .with_source(err)
        })?;
        return Ok(Value::from_json(value));
    }
    parse::parse_value(&text).map_err(|err| err.with_hint(format!("while reading {}", path.display())))
}

#[cfg(test)]
mod tests {
    use super::{load_mapping, read_items};
    use crate::core::error::ErrorKind;
    use crate::core::value::Value;
    use std::fs;

    #[test]
    fn single_line_file_is_separator_split() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("values.txt");
        fs::write(&path, "1, 2,3").expect("write");
        assert_eq!(read_items(&path, ",").expect("items"), vec!["1", "2", "3"]);
    }

    #[test]
    fn multi_line_file_is_line_split() {
        let temp = tempfile::tempdir().expect("tempdir");
        let path = temp.path().join("values.txt");
        fs::write(&path, "a,b\nc\n").expect("write");
        assert_eq!(read_items(&path, ",").expect("items"), vec!["a,b", "c"]);
    }

    #[test]
    fn missing_file_is_file_not_found() {
        let temp = tempfile::tempdir().expect("tempdir");
        let err = read_items(temp.path().join("missing.txt"), ",")
            .err()
            .expect("err");
        assert_eq!(err.kind(), ErrorKind::FileNotFound);
    }

    #[test]
    fn yaml_and_json_mappings_load() {
        let temp = tempfile::tempdir().expect("tempdir");
        let yaml = temp.path().join("data.yaml");
        fs::write(&yaml, "a: 1\nb: [x, y]\n").expect("write");
        let json = temp.path().join("data.json");
        fs::write(&json, r#"{"a": 1, "b": ["x", "y"]}"#).expect("write");
        let from_yaml = load_mapping(&yaml).expect("yaml");
        let from_json = load_mapping(&json).expect("json");
        assert_eq!(from_yaml, from_json);
        match from_yaml {
            Value::Map(map) => assert_eq!(map.get_str("a"), Some(&Value::Int(1))),
            other => panic!("expected map, got {other:?}"),
        }
    }
}
