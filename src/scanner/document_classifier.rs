use crate::error::{McFilesError, Result};
use crate::machine_config::{LIST_KIND, MACHINE_CONFIG_KIND};
use serde::Deserialize;
use serde_yaml::Value;
use std::io::Read;

/// Read every YAML document in `reader`.
///
/// `oc get -o yaml` emits one document, but concatenated dumps separated
/// by `---` are accepted as well.
pub fn read_documents<R: Read>(reader: R) -> Result<Vec<Value>> {
    let mut documents = Vec::new();
    for document in serde_yaml::Deserializer::from_reader(reader) {
        documents.push(Value::deserialize(document)?);
    }
    Ok(documents)
}

/// Turn one top-level document into the MachineConfig entries to extract.
///
/// Entries coming out of a `List` are passed through untouched; their own
/// `kind` is checked later by the extractor.
pub fn classify(document: Value) -> Result<Vec<Value>> {
    let mut mapping = match document {
        Value::Mapping(mapping) => mapping,
        other => {
            return Err(McFilesError::NotAMapping {
                detected: describe_value(&other).to_string(),
            })
        }
    };

    let kind = mapping.get("kind").and_then(Value::as_str).map(str::to_owned);

    match kind.as_deref() {
        Some(MACHINE_CONFIG_KIND) => Ok(vec![Value::Mapping(mapping)]),
        Some(LIST_KIND) => match mapping.remove("items") {
            None | Some(Value::Null) => Ok(Vec::new()),
            Some(Value::Sequence(items)) => Ok(items),
            Some(other) => Err(McFilesError::InvalidItems {
                detected: describe_value(&other).to_string(),
            }),
        },
        _ => Ok(Vec::new()),
    }
}

/// Read and classify a whole input stream.
pub fn collect_machine_configs<R: Read>(reader: R) -> Result<Vec<Value>> {
    let documents = read_documents(reader)?;

    if documents.is_empty() {
        return Err(McFilesError::NotAMapping {
            detected: "empty input".to_string(),
        });
    }

    let mut machine_configs = Vec::new();
    for document in documents {
        machine_configs.extend(classify(document)?);
    }
    Ok(machine_configs)
}

pub fn describe_value(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Sequence(_) => "sequence",
        Value::Mapping(_) => "mapping",
        Value::Tagged(_) => "tagged value",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(yaml: &str) -> Value {
        serde_yaml::from_str(yaml).unwrap()
    }

    #[test]
    fn test_single_machine_config() {
        let configs = classify(parse("kind: MachineConfig\nmetadata:\n  name: a\n")).unwrap();
        assert_eq!(configs.len(), 1);
        assert_eq!(configs[0]["metadata"]["name"].as_str(), Some("a"));
    }

    #[test]
    fn test_list_items_pass_through() {
        let yaml = r#"
kind: List
items:
- kind: MachineConfig
  metadata: {name: a}
- kind: ConfigMap
  metadata: {name: b}
- just a string
"#;
        let configs = classify(parse(yaml)).unwrap();
        assert_eq!(configs.len(), 3);
        assert_eq!(configs[1]["kind"].as_str(), Some("ConfigMap"));
        assert!(configs[2].is_string());
    }

    #[test]
    fn test_empty_list() {
        assert!(classify(parse("kind: List\nitems: []\n")).unwrap().is_empty());
        assert!(classify(parse("kind: List\nitems:\n")).unwrap().is_empty());
    }

    #[test]
    fn test_list_without_items() {
        assert!(classify(parse("kind: List\n")).unwrap().is_empty());
    }

    #[test]
    fn test_other_kinds_are_empty() {
        assert!(classify(parse("kind: ConfigMap\ndata: {}\n")).unwrap().is_empty());
        assert!(classify(parse("apiVersion: v1\n")).unwrap().is_empty());
    }

    #[test]
    fn test_non_mapping_is_rejected() {
        let err = classify(parse("- a\n- b\n")).unwrap_err();
        match err {
            McFilesError::NotAMapping { detected } => assert_eq!(detected, "sequence"),
            other => panic!("unexpected error: {other:?}"),
        }

        assert!(matches!(
            classify(parse("plain text")),
            Err(McFilesError::NotAMapping { .. })
        ));
    }

    #[test]
    fn test_items_must_be_a_sequence() {
        assert!(matches!(
            classify(parse("kind: List\nitems: nope\n")),
            Err(McFilesError::InvalidItems { .. })
        ));
    }

    #[test]
    fn test_multi_document_stream() {
        let input = "kind: MachineConfig\nmetadata: {name: a}\n---\nkind: List\nitems:\n- kind: MachineConfig\n  metadata: {name: b}\n";
        let configs = collect_machine_configs(input.as_bytes()).unwrap();
        let names: Vec<_> = configs
            .iter()
            .map(|c| c["metadata"]["name"].as_str().unwrap())
            .collect();
        assert_eq!(names, vec!["a", "b"]);
    }

    #[test]
    fn test_invalid_yaml() {
        assert!(matches!(
            collect_machine_configs("kind: [unclosed".as_bytes()),
            Err(McFilesError::Yaml { .. })
        ));
    }
}
