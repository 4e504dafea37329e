// modgrab-common/src/graph.rs
use std::collections::HashMap;
use std::fmt;

use serde::{Deserialize, Serialize};

use crate::model::DependencyType;

/// Presentation category of a node, derived once the graph is frozen. Never
/// feeds back into resolution.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeCategory {
    Seed,
    Dependency,
    OptionalOnly,
    Failed,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModNode {
    pub title: String,
    pub slug: Option<String>,
    pub version_id: Option<String>,
    pub resolved: bool,
    pub category: NodeCategory,
    /// Project page URL for the renderer.
    pub href: Option<String>,
}

impl ModNode {
    /// Placeholder for a target that has been discovered but not yet
    /// resolved. Replaced once its level runs.
    pub fn pending(id: &str) -> Self {
        Self {
            title: id.to_string(),
            slug: None,
            version_id: None,
            resolved: false,
            category: NodeCategory::Dependency,
            href: None,
        }
    }

    pub fn resolved(title: &str, slug: &str, version_id: String) -> Self {
        Self {
            title: title.to_string(),
            slug: Some(slug.to_string()),
            version_id: Some(version_id),
            resolved: true,
            category: NodeCategory::Dependency,
            href: Some(format!("https://modrinth.com/mod/{slug}")),
        }
    }

    pub fn failed(title: String) -> Self {
        Self {
            title,
            slug: None,
            version_id: None,
            resolved: false,
            category: NodeCategory::Failed,
            href: None,
        }
    }
}

/// Directed edge from a dependency target to the mod that declared it.
/// Edges are never deduplicated: the same target may be declared by many
/// parents, and by the same parent at both project and version granularity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DependencyEdge {
    pub source: String,
    pub sink: String,
    pub dep_type: DependencyType,
}

/// The finalized dependency graph: an id-keyed node map (each reachable mod
/// present exactly once) plus the typed edge list. Serializable as the
/// hand-off format for an external renderer.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct DependencyGraph {
    pub nodes: HashMap<String, ModNode>,
    pub edges: Vec<DependencyEdge>,
}

impl DependencyGraph {
    pub fn contains(&self, id: &str) -> bool {
        self.nodes.contains_key(id)
    }

    pub fn insert_node(&mut self, id: &str, node: ModNode) {
        self.nodes.insert(id.to_string(), node);
    }

    pub fn add_edge(&mut self, source: &str, sink: &str, dep_type: DependencyType) {
        self.edges.push(DependencyEdge {
            source: source.to_string(),
            sink: sink.to_string(),
            dep_type,
        });
    }

    /// Edges declared against `id`, i.e. the mods that depend on (or conflict
    /// with) it.
    pub fn dependents_of<'a>(&'a self, id: &'a str) -> impl Iterator<Item = &'a DependencyEdge> {
        self.edges.iter().filter(move |e| e.source == id)
    }

    /// Removes a node together with every edge incident to it.
    pub fn remove_node(&mut self, id: &str) {
        self.nodes.remove(id);
        self.edges.retain(|e| e.source != id && e.sink != id);
    }

    pub fn title_of(&self, id: &str) -> String {
        self.nodes
            .get(id)
            .map(|n| n.title.clone())
            .unwrap_or_else(|| id.to_string())
    }
}

/// A declared incompatibility, together with the mods that genuinely need
/// the conflicting target so the operator can see the tension.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Conflict {
    /// Title of the mod declaring the incompatibility.
    pub declarer: String,
    /// Title of the mod declared incompatible.
    pub target: String,
    /// Titles of mods with a required or optional dependency on the target.
    pub required_by: Vec<String>,
}

impl Conflict {
    pub fn headline(&self) -> String {
        format!("{} is incompatible with {}", self.target, self.declarer)
    }
}

impl fmt::Display for Conflict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.required_by.is_empty() {
            write!(f, "{}", self.headline())
        } else {
            write!(
                f,
                "{}, but it is needed by: {}",
                self.headline(),
                self.required_by.join(", ")
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nodes_are_keyed_and_never_duplicated() {
        let mut graph = DependencyGraph::default();
        graph.insert_node("a", ModNode::pending("a"));
        graph.insert_node("a", ModNode::resolved("A", "a-slug", "v1".into()));
        assert_eq!(graph.nodes.len(), 1);
        assert!(graph.nodes["a"].resolved);
    }

    #[test]
    fn edges_are_not_deduplicated() {
        let mut graph = DependencyGraph::default();
        graph.add_edge("c", "a", DependencyType::Required);
        graph.add_edge("c", "a", DependencyType::Optional);
        graph.add_edge("c", "b", DependencyType::Required);
        assert_eq!(graph.edges.len(), 3);
        assert_eq!(graph.dependents_of("c").count(), 3);
    }

    #[test]
    fn remove_node_drops_incident_edges() {
        let mut graph = DependencyGraph::default();
        graph.insert_node("a", ModNode::pending("a"));
        graph.insert_node("b", ModNode::pending("b"));
        graph.add_edge("b", "a", DependencyType::Optional);
        graph.add_edge("a", "b", DependencyType::Required);
        graph.remove_node("b");
        assert!(!graph.contains("b"));
        assert!(graph.edges.is_empty());
        assert!(graph.contains("a"));
    }

    #[test]
    fn conflict_display_lists_requiring_mods() {
        let conflict = Conflict {
            declarer: "Beta".into(),
            target: "Gamma".into(),
            required_by: vec!["Alpha".into()],
        };
        assert_eq!(
            conflict.to_string(),
            "Gamma is incompatible with Beta, but it is needed by: Alpha"
        );
    }
}
