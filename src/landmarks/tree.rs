use std::collections::VecDeque;
use fnv::{FnvHashMap, FnvHashSet};
use crate::common::error::{GraphError, Result};
use crate::common::types::VertexId;
use crate::graph::Graph;

/// Breadth-first shortest-path tree stored as child -> parent pointers.
///
/// The root has no parent entry. Built over the undirected neighbor relation, so edge
/// direction and weight are ignored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ShortestPathTree {
    root: VertexId,
    parents: FnvHashMap<VertexId, VertexId>,
}

impl ShortestPathTree {
    /// BFS from `root` over neighbor lists
    pub fn build(graph: &Graph, root: VertexId) -> Result<Self> {
        if !graph.contains_vertex(root) {
            return Err(GraphError::VertexNotFound(root));
        }

        let mut parents: FnvHashMap<VertexId, VertexId> = FnvHashMap::default();
        let mut queue = VecDeque::from([root]);

        while let Some(node) = queue.pop_front() {
            for &n in graph.neighbors(node) {
                if n == root || parents.contains_key(&n) {
                    continue;
                }
                parents.insert(n, node);
                queue.push_back(n);
            }
        }

        Ok(ShortestPathTree { root, parents })
    }

    /// Wrap an existing parent map. The map must not contain an entry for `root`.
    pub fn from_parents<I>(root: VertexId, parents: I) -> Result<Self>
    where
        I: IntoIterator<Item = (VertexId, VertexId)>,
    {
        let parents: FnvHashMap<VertexId, VertexId> = parents.into_iter().collect();
        if parents.contains_key(&root) {
            return Err(GraphError::invalid_argument(format!(
                "tree root {} must not have a parent",
                root
            )));
        }
        Ok(ShortestPathTree { root, parents })
    }

    pub fn root(&self) -> VertexId {
        self.root
    }

    pub fn parent(&self, v: VertexId) -> Option<VertexId> {
        self.parents.get(&v).copied()
    }

    pub fn contains(&self, v: VertexId) -> bool {
        v == self.root || self.parents.contains_key(&v)
    }

    /// Number of vertices in the tree, root included
    pub fn vertex_count(&self) -> usize {
        self.parents.len() + 1
    }

    /// Walk parent pointers from `from` until a vertex in `targets` is reached.
    ///
    /// The returned sequence starts with `from` and ends with the first target hit.
    pub fn path_to_set(&self, from: VertexId, targets: &FnvHashSet<VertexId>) -> Result<Vec<VertexId>> {
        if !self.contains(from) {
            return Err(GraphError::VertexNotFound(from));
        }

        let mut node = from;
        let mut path = vec![node];
        while !targets.contains(&node) {
            node = match self.parents.get(&node) {
                Some(&parent) => parent,
                None => {
                    return Err(GraphError::invalid_argument(format!(
                        "walk from {} reached root {} without hitting the target set",
                        from, self.root
                    )));
                }
            };
            path.push(node);
            if path.len() > self.vertex_count() {
                return Err(GraphError::invalid_argument(format!(
                    "parent pointers from {} contain a cycle",
                    from
                )));
            }
        }
        Ok(path)
    }

    /// Tree path from `start` to `end` through their least common ancestor.
    ///
    /// `start` climbs to the root, then `end` climbs until it meets that climb; the
    /// meeting vertex is the LCA. The path's length minus one is the hop distance.
    pub fn path_between(&self, start: VertexId, end: VertexId) -> Result<Vec<VertexId>> {
        let to_root = self.path_to_set(start, &FnvHashSet::from_iter([self.root]))?;
        let on_climb: FnvHashSet<VertexId> = to_root.iter().copied().collect();
        let to_lca = self.path_to_set(end, &on_climb)?;

        let lca = to_lca[to_lca.len() - 1];
        let mut path: Vec<VertexId> = to_root.into_iter().take_while(|&v| v != lca).collect();
        path.extend(to_lca.into_iter().rev());
        Ok(path)
    }

    /// Hop distance between `start` and `end` along the tree
    pub fn tree_distance(&self, start: VertexId, end: VertexId) -> Result<u64> {
        Ok(self.path_between(start, end)?.len() as u64 - 1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::GraphKind;

    fn sample_tree() -> ShortestPathTree {
        ShortestPathTree::from_parents(1, [(2, 1), (6, 1), (3, 1), (4, 3), (5, 3)]).unwrap()
    }

    #[test]
    fn test_path_to_set() {
        let tree = sample_tree();
        let targets = FnvHashSet::from_iter([2, 1, 6]);
        assert_eq!(tree.path_to_set(4, &targets).unwrap(), vec![4, 3, 1]);
        assert_eq!(tree.path_to_set(2, &targets).unwrap(), vec![2]);
    }

    #[test]
    fn test_path_between_through_lca() {
        let tree = sample_tree();
        assert_eq!(tree.path_between(4, 2).unwrap(), vec![4, 3, 1, 2]);
        assert_eq!(tree.tree_distance(4, 2).unwrap(), 3);

        assert_eq!(tree.path_between(4, 5).unwrap(), vec![4, 3, 5]);
        assert_eq!(tree.path_between(1, 5).unwrap(), vec![1, 3, 5]);
        assert_eq!(tree.path_between(5, 1).unwrap(), vec![5, 3, 1]);
        assert_eq!(tree.path_between(6, 6).unwrap(), vec![6]);
    }

    #[test]
    fn test_build_from_graph() {
        let graph = Graph::from_edges(
            GraphKind::UNDIRECTED,
            [(1, 2), (1, 3), (1, 6), (3, 4), (3, 5), (4, 5), (2, 6)],
        );
        let tree = ShortestPathTree::build(&graph, 1).unwrap();

        assert_eq!(tree.root(), 1);
        assert_eq!(tree.parent(1), None);
        assert_eq!(tree.parent(4), Some(3));
        assert_eq!(tree.parent(5), Some(3));
        assert_eq!(tree.parent(6), Some(1));
        assert_eq!(tree.vertex_count(), 6);
        assert_eq!(tree, sample_tree());
    }

    #[test]
    fn test_build_ignores_direction() {
        let graph = Graph::from_edges(GraphKind::DIRECTED, [(2, 1), (3, 2)]);
        let tree = ShortestPathTree::build(&graph, 1).unwrap();
        assert_eq!(tree.path_between(3, 1).unwrap(), vec![3, 2, 1]);
    }

    #[test]
    fn test_vertices_outside_tree() {
        let mut graph = Graph::from_edges(GraphKind::UNDIRECTED, [(1, 2)]);
        graph.add_vertex(3);
        let tree = ShortestPathTree::build(&graph, 1).unwrap();

        assert!(!tree.contains(3));
        assert!(matches!(tree.path_between(1, 3), Err(GraphError::VertexNotFound(3))));
        assert!(ShortestPathTree::build(&graph, 42).is_err());
    }

    #[test]
    fn test_malformed_parent_maps() {
        assert!(ShortestPathTree::from_parents(1, [(1, 2)]).is_err());

        let cyclic = ShortestPathTree::from_parents(1, [(2, 3), (3, 2)]).unwrap();
        let targets = FnvHashSet::from_iter([1]);
        assert!(cyclic.path_to_set(2, &targets).is_err());
    }
}
