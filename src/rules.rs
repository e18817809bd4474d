//! Validation rules over the dependency graph.
//!
//! The rule set is a closed enum so validation behavior stays auditable:
//! adding a rule kind means adding a variant here. Rules never mutate
//! the graph, and violations come back in a stable order (rule groups in
//! declaration order, then source module, then message).

use crate::graph::UnresolvedImport;
use crate::model::{DependencyGraph, ModuleId};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Rule id used for resolution failures reported through `validate`.
pub const UNRESOLVED_RULE_ID: &str = "unresolved-import";

/// Severity of a violation. Only error-severity violations affect the
/// exit code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Warning,
    Error,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Severity::Warning => write!(f, "WARN"),
            Severity::Error => write!(f, "ERROR"),
        }
    }
}

fn default_severity() -> Severity {
    Severity::Error
}

/// One layer in a layering rule: a module-id prefix plus the target
/// prefixes modules under it may import.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Layer {
    pub prefix: String,
    #[serde(default)]
    pub allow: Vec<String>,
}

/// A configured validation rule.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum Rule {
    NoCycles {
        #[serde(default = "default_severity")]
        severity: Severity,
    },
    Layers {
        #[serde(default = "default_severity")]
        severity: Severity,
        layers: Vec<Layer>,
    },
}

impl Rule {
    pub fn id(&self) -> &'static str {
        match self {
            Rule::NoCycles { .. } => "no-cycles",
            Rule::Layers { .. } => "layers",
        }
    }
}

/// A reported rule failure against the graph.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    pub rule: String,
    pub severity: Severity,
    pub module: ModuleId,
    pub message: String,
}

impl Violation {
    fn new(rule: &str, severity: Severity, module: ModuleId, message: String) -> Self {
        Violation {
            rule: rule.to_string(),
            severity,
            module,
            message,
        }
    }
}

pub fn has_errors(violations: &[Violation]) -> bool {
    violations.iter().any(|v| v.severity == Severity::Error)
}

/// Run every rule against the graph. Violations are grouped by rule in
/// declaration order; within a group they are sorted by source module,
/// then message.
pub fn validate(graph: &DependencyGraph, rules: &[Rule]) -> Vec<Violation> {
    let mut violations = Vec::new();
    for rule in rules {
        let mut found = match rule {
            Rule::NoCycles { severity } => check_cycles(graph, *severity),
            Rule::Layers { severity, layers } => check_layers(graph, *severity, layers),
        };
        found.sort_by(|a, b| (&a.module, &a.message).cmp(&(&b.module, &b.message)));
        violations.extend(found);
    }
    violations
}

/// Resolution failures rendered as violations of the implicit
/// `unresolved-import` rule, always error severity. Callers emit these
/// ahead of the configured rules' groups.
pub fn unresolved_violations(unresolved: &[UnresolvedImport]) -> Vec<Violation> {
    let mut violations: Vec<Violation> = unresolved
        .iter()
        .map(|u| {
            Violation::new(
                UNRESOLVED_RULE_ID,
                Severity::Error,
                u.record.module.clone(),
                format!("{} (line {})", u.error, u.record.line),
            )
        })
        .collect();
    violations.sort_by(|a, b| (&a.module, &a.message).cmp(&(&b.module, &b.message)));
    violations
}

// CYCLE DETECTION

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Color {
    Unvisited,
    InProgress,
    Done,
}

/// Depth-first cycle search with three-color marking. Each detected
/// cycle is rotated so its lexicographically smallest module comes
/// first, which both deduplicates rotations and fixes the output order.
fn check_cycles(graph: &DependencyGraph, severity: Severity) -> Vec<Violation> {
    let adjacency = build_adjacency(graph);
    let mut colors: HashMap<&ModuleId, Color> = graph
        .modules()
        .iter()
        .map(|m| (&m.id, Color::Unvisited))
        .collect();
    let mut path: Vec<&ModuleId> = Vec::new();
    let mut cycles: Vec<Vec<ModuleId>> = Vec::new();

    for module in graph.modules() {
        if colors.get(&module.id) == Some(&Color::Unvisited) {
            cycle_dfs(&module.id, &adjacency, &mut colors, &mut path, &mut cycles);
        }
    }

    let mut canonical: Vec<Vec<ModuleId>> = cycles.iter().map(|c| canonical_rotation(c)).collect();
    canonical.sort();
    canonical.dedup();

    canonical
        .into_iter()
        .map(|cycle| {
            let mut names: Vec<&str> = cycle.iter().map(|id| id.as_str()).collect();
            names.push(cycle[0].as_str());
            let start = cycle[0].clone();
            Violation::new(
                "no-cycles",
                severity,
                start,
                format!("circular import: {}", names.join(" -> ")),
            )
        })
        .collect()
}

fn cycle_dfs<'a>(
    node: &'a ModuleId,
    adjacency: &HashMap<&'a ModuleId, Vec<&'a ModuleId>>,
    colors: &mut HashMap<&'a ModuleId, Color>,
    path: &mut Vec<&'a ModuleId>,
    cycles: &mut Vec<Vec<ModuleId>>,
) {
    colors.insert(node, Color::InProgress);
    path.push(node);

    if let Some(targets) = adjacency.get(node) {
        for &target in targets {
            match colors.get(target).copied().unwrap_or(Color::Done) {
                Color::Unvisited => cycle_dfs(target, adjacency, colors, path, cycles),
                Color::InProgress => {
                    // Back edge: the cycle is the path suffix from the target.
                    if let Some(start) = path.iter().position(|id| *id == target) {
                        cycles.push(path[start..].iter().map(|id| (*id).clone()).collect());
                    }
                }
                Color::Done => {}
            }
        }
    }

    colors.insert(node, Color::Done);
    path.pop();
}

/// Adjacency map with sorted, deduplicated target lists so traversal
/// order never depends on edge insertion order.
fn build_adjacency(graph: &DependencyGraph) -> HashMap<&ModuleId, Vec<&ModuleId>> {
    let mut adjacency: HashMap<&ModuleId, Vec<&ModuleId>> = HashMap::new();
    for edge in graph.edges() {
        adjacency.entry(&edge.from).or_default().push(&edge.to);
    }
    for targets in adjacency.values_mut() {
        targets.sort();
        targets.dedup();
    }
    adjacency
}

fn canonical_rotation(cycle: &[ModuleId]) -> Vec<ModuleId> {
    let start = cycle
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| *id)
        .map(|(idx, _)| idx)
        .unwrap_or(0);
    cycle[start..]
        .iter()
        .chain(cycle[..start].iter())
        .cloned()
        .collect()
}

// LAYER CHECKS

/// Flag edges whose source falls under a configured layer prefix and
/// whose target is outside that layer's allow list. The source layer is
/// the longest matching prefix; sources under no layer are
/// unconstrained. Prefixes match whole path segments, so `app` covers
/// `app` and `app/x` but not `apple`.
fn check_layers(graph: &DependencyGraph, severity: Severity, layers: &[Layer]) -> Vec<Violation> {
    let mut violations = Vec::new();

    for edge in graph.edges() {
        let source_layer = layers
            .iter()
            .filter(|l| prefix_matches(&l.prefix, edge.from.as_str()))
            .max_by_key(|l| l.prefix.len());
        let Some(layer) = source_layer else {
            continue;
        };

        let allowed = layer
            .allow
            .iter()
            .any(|prefix| prefix_matches(prefix, edge.to.as_str()));
        if !allowed {
            let allow_list = if layer.allow.is_empty() {
                "nothing".to_string()
            } else {
                layer.allow.join(", ")
            };
            violations.push(Violation::new(
                "layers",
                severity,
                edge.from.clone(),
                format!(
                    "may not import '{}' from layer '{}' (allowed: {}) at line {}",
                    edge.to, layer.prefix, allow_list, edge.record.line
                ),
            ));
        }
    }

    violations
}

fn prefix_matches(prefix: &str, id: &str) -> bool {
    match id.strip_prefix(prefix) {
        Some(rest) => rest.is_empty() || rest.starts_with('/'),
        None => false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{ImportKind, ImportRecord, Module, ResolvedEdge};

    fn make_graph(ids: &[&str], edges: &[(&str, &str)]) -> DependencyGraph {
        let modules = ids
            .iter()
            .map(|id| Module {
                id: ModuleId::new(*id),
                path: format!("{}.js", id),
                exports: Vec::new(),
            })
            .collect();
        let edges = edges
            .iter()
            .enumerate()
            .map(|(idx, (from, to))| ResolvedEdge {
                from: ModuleId::new(*from),
                to: ModuleId::new(*to),
                record: ImportRecord {
                    module: ModuleId::new(*from),
                    raw: format!("./{}", to),
                    line: idx + 1,
                    kind: ImportKind::Internal,
                },
            })
            .collect();
        DependencyGraph::new(modules, edges)
    }

    fn layer(prefix: &str, allow: &[&str]) -> Layer {
        Layer {
            prefix: prefix.to_string(),
            allow: allow.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_triangle_reports_one_cycle_from_smallest() {
        let graph = make_graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("c", "a")]);
        let violations = validate(
            &graph,
            &[Rule::NoCycles {
                severity: Severity::Error,
            }],
        );

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].module.as_str(), "a");
        assert_eq!(violations[0].message, "circular import: a -> b -> c -> a");
    }

    #[test]
    fn test_self_import_is_a_cycle() {
        let graph = make_graph(&["a"], &[("a", "a")]);
        let violations = validate(
            &graph,
            &[Rule::NoCycles {
                severity: Severity::Error,
            }],
        );

        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].message, "circular import: a -> a");
    }

    #[test]
    fn test_two_distinct_cycles() {
        let graph = make_graph(
            &["a", "b", "c"],
            &[("a", "b"), ("b", "a"), ("b", "c"), ("c", "b")],
        );
        let violations = validate(
            &graph,
            &[Rule::NoCycles {
                severity: Severity::Error,
            }],
        );

        let messages: Vec<&str> = violations.iter().map(|v| v.message.as_str()).collect();
        assert_eq!(
            messages,
            vec!["circular import: a -> b -> a", "circular import: b -> c -> b"]
        );
    }

    #[test]
    fn test_acyclic_graph_passes() {
        let graph = make_graph(&["a", "b", "c"], &[("a", "b"), ("b", "c"), ("a", "c")]);
        let violations = validate(
            &graph,
            &[Rule::NoCycles {
                severity: Severity::Error,
            }],
        );
        assert!(violations.is_empty());
    }

    #[test]
    fn test_clean_graph_with_layers_has_no_violations() {
        let graph = make_graph(
            &["app/main", "components/button", "utils/fmt"],
            &[
                ("app/main", "components/button"),
                ("components/button", "utils/fmt"),
            ],
        );
        let rules = [
            Rule::NoCycles {
                severity: Severity::Error,
            },
            Rule::Layers {
                severity: Severity::Error,
                layers: vec![
                    layer("app", &["app", "components", "utils"]),
                    layer("components", &["components", "utils"]),
                    layer("utils", &["utils"]),
                ],
            },
        ];

        assert!(validate(&graph, &rules).is_empty());
    }

    #[test]
    fn test_layer_violation_is_flagged() {
        let graph = make_graph(
            &["utils/fmt", "app/main"],
            &[("utils/fmt", "app/main")],
        );
        let rules = [Rule::Layers {
            severity: Severity::Error,
            layers: vec![layer("utils", &["utils"])],
        }];

        let violations = validate(&graph, &rules);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, "layers");
        assert_eq!(violations[0].module.as_str(), "utils/fmt");
        assert!(violations[0].message.contains("may not import 'app/main'"));
    }

    #[test]
    fn test_intra_layer_import_needs_own_prefix() {
        let graph = make_graph(
            &["app/a", "app/b"],
            &[("app/a", "app/b")],
        );

        let strict = [Rule::Layers {
            severity: Severity::Error,
            layers: vec![layer("app", &[])],
        }];
        assert_eq!(validate(&graph, &strict).len(), 1);

        let self_allowed = [Rule::Layers {
            severity: Severity::Error,
            layers: vec![layer("app", &["app"])],
        }];
        assert!(validate(&graph, &self_allowed).is_empty());
    }

    #[test]
    fn test_longest_prefix_selects_layer() {
        let graph = make_graph(
            &["app/admin/panel", "app/shared"],
            &[("app/admin/panel", "app/shared")],
        );
        let rules = [Rule::Layers {
            severity: Severity::Error,
            layers: vec![layer("app", &["app"]), layer("app/admin", &["utils"])],
        }];

        let violations = validate(&graph, &rules);
        assert_eq!(violations.len(), 1);
        assert!(violations[0].message.contains("layer 'app/admin'"));
    }

    #[test]
    fn test_unmatched_source_is_unconstrained() {
        let graph = make_graph(
            &["scripts/deploy", "app/main"],
            &[("scripts/deploy", "app/main")],
        );
        let rules = [Rule::Layers {
            severity: Severity::Error,
            layers: vec![layer("app", &["app"])],
        }];

        assert!(validate(&graph, &rules).is_empty());
    }

    #[test]
    fn test_prefix_matches_whole_segments() {
        assert!(prefix_matches("app", "app"));
        assert!(prefix_matches("app", "app/main"));
        assert!(!prefix_matches("app", "apple/main"));
        assert!(!prefix_matches("app/admin", "app"));
    }

    #[test]
    fn test_violations_grouped_by_rule_declaration_order() {
        let graph = make_graph(
            &["utils/fmt", "zz/loop"],
            &[("utils/fmt", "zz/loop"), ("zz/loop", "zz/loop")],
        );
        let rules = [
            Rule::Layers {
                severity: Severity::Warning,
                layers: vec![layer("utils", &["utils"])],
            },
            Rule::NoCycles {
                severity: Severity::Error,
            },
        ];

        let violations = validate(&graph, &rules);
        assert_eq!(violations.len(), 2);
        assert_eq!(violations[0].rule, "layers");
        assert_eq!(violations[1].rule, "no-cycles");
    }

    #[test]
    fn test_warning_severity_does_not_error() {
        let graph = make_graph(&["a", "b"], &[("a", "b"), ("b", "a")]);
        let violations = validate(
            &graph,
            &[Rule::NoCycles {
                severity: Severity::Warning,
            }],
        );

        assert_eq!(violations.len(), 1);
        assert!(!has_errors(&violations));
    }

    #[test]
    fn test_unresolved_violations_are_errors() {
        use crate::graph::UnresolvedImport;
        use crate::resolver::ResolutionError;

        let unresolved = vec![UnresolvedImport {
            record: ImportRecord {
                module: ModuleId::new("src/app"),
                raw: "./missing".to_string(),
                line: 4,
                kind: ImportKind::Internal,
            },
            error: ResolutionError::NotFound {
                raw: "./missing".to_string(),
                normalized: "src/missing".to_string(),
            },
        }];

        let violations = unresolved_violations(&unresolved);
        assert_eq!(violations.len(), 1);
        assert_eq!(violations[0].rule, UNRESOLVED_RULE_ID);
        assert_eq!(violations[0].severity, Severity::Error);
        assert!(violations[0].message.contains("line 4"));
        assert!(has_errors(&violations));
    }
}
