//! Attachment graph between objects.
//!
//! An edge points from the attacher to the object it rides; connected
//! components over live edges form cliques that move and rotate as one
//! rigid group.

use std::collections::{BTreeMap, BTreeSet, HashMap};

#[derive(Debug, Default)]
pub struct AttachmentGraph {
    edges: BTreeMap<String, String>,
    groups: Vec<Vec<String>>,
    member_of: HashMap<String, usize>,
}

impl AttachmentGraph {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_edges(edges: BTreeMap<String, String>) -> Self {
        Self {
            edges,
            groups: Vec::new(),
            member_of: HashMap::new(),
        }
    }

    pub fn edges(&self) -> &BTreeMap<String, String> {
        &self.edges
    }

    /// Attaches `attacher` to `attached_to`. An attacher rides exactly one
    /// object; a second attach replaces the first edge.
    pub fn attach(&mut self, attacher: &str, attached_to: &str) {
        self.edges
            .insert(attacher.to_string(), attached_to.to_string());
    }

    /// Removes the attacher-side edge, returning what it was attached to.
    pub fn remove_attacher(&mut self, attacher: &str) -> Option<String> {
        self.edges.remove(attacher)
    }

    pub fn is_attacher(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    /// Rebuilds cliques from the edges whose endpoints are both live.
    /// Cliques only exist between recomputes; edges are the durable state.
    pub fn recompute(&mut self, is_live: impl Fn(&str) -> bool) {
        self.groups.clear();
        self.member_of.clear();
        let mut adjacency: BTreeMap<&str, Vec<&str>> = BTreeMap::new();
        for (attacher, attached_to) in &self.edges {
            if !is_live(attacher) || !is_live(attached_to) {
                continue;
            }
            adjacency.entry(attacher).or_default().push(attached_to);
            adjacency.entry(attached_to).or_default().push(attacher);
        }
        let mut visited: BTreeSet<&str> = BTreeSet::new();
        let nodes: Vec<&str> = adjacency.keys().copied().collect();
        for start in nodes {
            if visited.contains(start) {
                continue;
            }
            let mut members = Vec::new();
            let mut pending = vec![start];
            while let Some(node) = pending.pop() {
                if !visited.insert(node) {
                    continue;
                }
                members.push(node.to_string());
                if let Some(neighbors) = adjacency.get(node) {
                    pending.extend(neighbors.iter().copied());
                }
            }
            members.sort();
            let group = self.groups.len();
            for member in &members {
                self.member_of.insert(member.clone(), group);
            }
            self.groups.push(members);
        }
    }

    /// Members of the clique containing `id`, including `id` itself.
    /// `None` for objects outside any clique.
    pub fn clique_members(&self, id: &str) -> Option<&[String]> {
        self.member_of
            .get(id)
            .map(|&group| self.groups[group].as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_chained_edges_form_one_clique() {
        let mut graph = AttachmentGraph::new();
        graph.attach("a", "b");
        graph.attach("b", "c");
        graph.attach("x", "y");
        graph.recompute(|_| true);
        assert_eq!(graph.clique_members("a"), Some(["a", "b", "c"].map(String::from).as_slice()));
        assert_eq!(graph.clique_members("c"), graph.clique_members("a"));
        assert_eq!(graph.clique_members("x"), Some(["x", "y"].map(String::from).as_slice()));
        assert_eq!(graph.clique_members("loner"), None);
    }

    #[test]
    fn test_dead_endpoints_break_the_clique() {
        let mut graph = AttachmentGraph::new();
        graph.attach("a", "b");
        graph.attach("b", "c");
        graph.recompute(|id| id != "b");
        assert_eq!(graph.clique_members("a"), None);
        assert_eq!(graph.clique_members("c"), None);
        // The edges survive; only the computed cliques react to liveness.
        assert!(graph.is_attacher("a"));
    }

    #[test]
    fn test_reattach_replaces_the_edge() {
        let mut graph = AttachmentGraph::new();
        graph.attach("a", "b");
        graph.attach("a", "c");
        graph.recompute(|_| true);
        assert_eq!(graph.clique_members("b"), None);
        assert_eq!(graph.clique_members("a"), Some(["a", "c"].map(String::from).as_slice()));
        assert_eq!(graph.remove_attacher("a"), Some("c".to_string()));
        assert!(!graph.is_attacher("a"));
    }
}
