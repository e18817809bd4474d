//! Rule-file loading and validation.
//!
//! The rules file is plain YAML with a single `rules` list. Problems
//! are fatal before any scanning starts: a half-understood rule set
//! must never produce a partial validation.

use crate::rules::{Rule, Severity};
use serde::Deserialize;
use std::fmt;
use std::fs;
use std::path::Path;

/// Why a rules file was rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    Unreadable { origin: String, reason: String },
    Malformed { origin: String, detail: String },
    EmptyLayers { origin: String },
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::Unreadable { origin, reason } => {
                write!(f, "cannot read rules file {}: {}", origin, reason)
            }
            ConfigError::Malformed { origin, detail } => {
                write!(f, "invalid rules file {}: {}", origin, detail)
            }
            ConfigError::EmptyLayers { origin } => {
                write!(
                    f,
                    "invalid rules file {}: a layers rule needs at least one layer",
                    origin
                )
            }
        }
    }
}

impl std::error::Error for ConfigError {}

#[derive(Debug, Deserialize)]
struct RulesFile {
    rules: Vec<Rule>,
}

/// Rule set used when no rules file is given.
pub fn default_rules() -> Vec<Rule> {
    vec![Rule::NoCycles {
        severity: Severity::Error,
    }]
}

pub fn load_rules(path: &Path) -> Result<Vec<Rule>, ConfigError> {
    let origin = path.display().to_string();
    let content = fs::read_to_string(path).map_err(|e| ConfigError::Unreadable {
        origin: origin.clone(),
        reason: e.to_string(),
    })?;
    parse_rules(&content, &origin)
}

/// Parse and validate a rules document. `origin` names the source in
/// error messages.
pub fn parse_rules(content: &str, origin: &str) -> Result<Vec<Rule>, ConfigError> {
    let file: RulesFile =
        serde_yaml::from_str(content).map_err(|e| ConfigError::Malformed {
            origin: origin.to_string(),
            detail: e.to_string(),
        })?;

    for rule in &file.rules {
        if let Rule::Layers { layers, .. } = rule {
            if layers.is_empty() {
                return Err(ConfigError::EmptyLayers {
                    origin: origin.to_string(),
                });
            }
        }
    }

    Ok(file.rules)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parses_both_rule_kinds() {
        let yaml = r#"
rules:
  - kind: no-cycles
  - kind: layers
    severity: warning
    layers:
      - prefix: app
        allow: [app, components, utils]
      - prefix: utils
        allow: [utils]
"#;
        let rules = parse_rules(yaml, "inline").unwrap();
        assert_eq!(rules.len(), 2);

        match &rules[0] {
            Rule::NoCycles { severity } => assert_eq!(*severity, Severity::Error),
            other => panic!("expected no-cycles, got {:?}", other),
        }
        match &rules[1] {
            Rule::Layers { severity, layers } => {
                assert_eq!(*severity, Severity::Warning);
                assert_eq!(layers.len(), 2);
                assert_eq!(layers[0].prefix, "app");
                assert_eq!(layers[0].allow, vec!["app", "components", "utils"]);
            }
            other => panic!("expected layers, got {:?}", other),
        }
    }

    #[test]
    fn test_allow_defaults_to_empty() {
        let yaml = r#"
rules:
  - kind: layers
    layers:
      - prefix: leaf
"#;
        let rules = parse_rules(yaml, "inline").unwrap();
        match &rules[0] {
            Rule::Layers { layers, .. } => assert!(layers[0].allow.is_empty()),
            other => panic!("expected layers, got {:?}", other),
        }
    }

    #[test]
    fn test_unknown_kind_is_rejected() {
        let yaml = "rules:\n  - kind: frobnicate\n";
        let err = parse_rules(yaml, "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
        assert!(err.to_string().contains("frobnicate"));
    }

    #[test]
    fn test_invalid_severity_is_rejected() {
        let yaml = "rules:\n  - kind: no-cycles\n    severity: fatal\n";
        let err = parse_rules(yaml, "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
        assert!(err.to_string().contains("fatal"));
    }

    #[test]
    fn test_empty_layer_list_is_rejected() {
        let yaml = "rules:\n  - kind: layers\n    layers: []\n";
        let err = parse_rules(yaml, "inline").unwrap_err();
        assert_eq!(
            err,
            ConfigError::EmptyLayers {
                origin: "inline".to_string()
            }
        );
        assert!(err.to_string().contains("at least one layer"));
    }

    #[test]
    fn test_missing_rules_key_is_malformed() {
        let err = parse_rules("layers: []\n", "inline").unwrap_err();
        assert!(matches!(err, ConfigError::Malformed { .. }));
    }

    #[test]
    fn test_empty_rule_list_is_allowed() {
        let rules = parse_rules("rules: []\n", "inline").unwrap();
        assert!(rules.is_empty());
    }

    #[test]
    fn test_missing_file_is_unreadable() {
        let err = load_rules(Path::new("/definitely/not/here.yml")).unwrap_err();
        assert!(matches!(err, ConfigError::Unreadable { .. }));
        assert!(err.to_string().contains("cannot read rules file"));
    }

    #[test]
    fn test_default_rules_check_cycles() {
        let rules = default_rules();
        assert_eq!(rules.len(), 1);
        assert!(matches!(
            rules[0],
            Rule::NoCycles {
                severity: Severity::Error
            }
        ));
    }
}
