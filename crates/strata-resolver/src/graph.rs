//! Expansion graph: which dependency produced each installable unit.
//!
//! Built by the traced engine run and rendered by `strata tree`. Nodes are
//! keyed by display name, which stays stable across a dynamic dependency's
//! resolution.

use std::collections::{HashMap, HashSet};

use petgraph::graph::{DiGraph, NodeIndex};
use petgraph::visit::EdgeRef;
use petgraph::Direction;

use strata_core::dependency::Dependency;

/// A directed graph from dependencies to the units they flattened into.
#[derive(Default)]
pub struct ExpansionGraph {
    graph: DiGraph<String, ()>,
    index: HashMap<String, NodeIndex>,
    roots: Vec<NodeIndex>,
}

impl ExpansionGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add or retrieve a node by display name.
    fn node(&mut self, name: &str) -> NodeIndex {
        if let Some(&idx) = self.index.get(name) {
            return idx;
        }
        let idx = self.graph.add_node(name.to_string());
        self.index.insert(name.to_string(), idx);
        idx
    }

    /// Register a caller-declared dependency as a tree root.
    pub fn add_root(&mut self, dep: &Dependency) {
        let idx = self.node(&dep.name());
        if !self.roots.contains(&idx) {
            self.roots.push(idx);
        }
    }

    /// Record that `parent` flattened into `children`.
    pub fn record_expansion(&mut self, parent: &Dependency, children: &[Dependency]) {
        let parent_idx = self.node(&parent.name());
        for child in children {
            let child_name = child.name();
            if child_name == parent.name() {
                continue;
            }
            let child_idx = self.node(&child_name);
            if !self
                .graph
                .edges(parent_idx)
                .any(|e| e.target() == child_idx)
            {
                self.graph.add_edge(parent_idx, child_idx, ());
            }
        }
    }

    /// Number of nodes in the graph.
    pub fn len(&self) -> usize {
        self.graph.node_count()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Render the expansion as a box-drawing tree, one section per root.
    pub fn print_tree(&self) -> String {
        let mut output = String::new();
        for &root in &self.roots {
            output.push_str(&format!("{}\n", self.graph[root]));
            let mut visited = HashSet::new();
            visited.insert(root);

            let children = self.children_of(root);
            let count = children.len();
            for (i, child) in children.into_iter().enumerate() {
                self.print_subtree(&mut output, child, "", i == count - 1, &mut visited);
            }
        }
        output
    }

    fn children_of(&self, idx: NodeIndex) -> Vec<NodeIndex> {
        // Edge iteration is newest-first; reverse to get insertion order.
        let mut children: Vec<NodeIndex> = self
            .graph
            .edges_directed(idx, Direction::Outgoing)
            .map(|e| e.target())
            .collect();
        children.reverse();
        children
    }

    fn print_subtree(
        &self,
        output: &mut String,
        idx: NodeIndex,
        prefix: &str,
        is_last: bool,
        visited: &mut HashSet<NodeIndex>,
    ) {
        let connector = if is_last { "└── " } else { "├── " };
        output.push_str(&format!("{prefix}{connector}{}\n", self.graph[idx]));

        if !visited.insert(idx) {
            return;
        }

        let child_prefix = format!("{prefix}{}", if is_last { "    " } else { "│   " });
        let children = self.children_of(idx);
        let count = children.len();
        for (i, child) in children.into_iter().enumerate() {
            self.print_subtree(output, child, &child_prefix, i == count - 1, visited);
        }

        visited.remove(&idx);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use strata_core::dependency::{
        DynamicDependency, PackageNamespaceVersionDependency, SourceKind, StaticDependency,
    };
    use strata_core::version::PackageVersion;

    fn dynamic(url: &str) -> Dependency {
        Dependency::Dynamic(DynamicDependency::new(SourceKind::GitHub, url))
    }

    fn package(namespace: &str, version: &str) -> Dependency {
        Dependency::Static(StaticDependency::PackageNamespaceVersion(
            PackageNamespaceVersionDependency {
                namespace: namespace.to_string(),
                version: PackageVersion::parse(version).unwrap(),
                version_id: None,
                package_name: None,
            },
        ))
    }

    #[test]
    fn records_roots_and_expansions() {
        let mut graph = ExpansionGraph::new();
        let root = dynamic("https://github.com/Org/Root");
        let dep = dynamic("https://github.com/Org/Dep");
        let root_pkg = package("bar", "2.0");
        let dep_pkg = package("foo", "1.0");

        graph.add_root(&root);
        graph.record_expansion(&root, &[dep.clone(), root_pkg.clone()]);
        graph.record_expansion(&dep, &[dep_pkg.clone()]);

        assert_eq!(graph.len(), 4);
        let tree = graph.print_tree();
        assert!(tree.starts_with("Dependency: https://github.com/Org/Root\n"));
        assert!(tree.contains("├── Dependency: https://github.com/Org/Dep\n"));
        assert!(tree.contains("│   └── Install foo 1.0\n"));
        assert!(tree.contains("└── Install bar 2.0\n"));
    }

    #[test]
    fn duplicate_edges_are_not_recorded() {
        let mut graph = ExpansionGraph::new();
        let root = dynamic("https://github.com/Org/Root");
        let pkg = package("bar", "2.0");

        graph.add_root(&root);
        graph.record_expansion(&root, &[pkg.clone()]);
        graph.record_expansion(&root, &[pkg.clone()]);

        assert_eq!(graph.len(), 2);
        let tree = graph.print_tree();
        assert_eq!(tree.matches("Install bar 2.0").count(), 1);
    }

    #[test]
    fn self_expansion_does_not_loop() {
        let mut graph = ExpansionGraph::new();
        let root = dynamic("https://github.com/Org/Cycle");
        graph.add_root(&root);
        graph.record_expansion(&root, &[root.clone()]);

        assert_eq!(graph.len(), 1);
        let tree = graph.print_tree();
        assert_eq!(tree, "Dependency: https://github.com/Org/Cycle\n");
    }
}
