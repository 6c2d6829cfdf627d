use petgraph::graph::{EdgeIndex, NodeIndex};

use crate::graph::CycleGraph;

/// A maximal biconnected subgraph with at least one independent cycle.
///
/// Vertex and edge ids are in the perception graph's index space, sorted
/// ascending. Blocks have pairwise disjoint edge sets; two blocks can share a
/// vertex only at an articulation point, and bridge edges belong to no block.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CycleBlock {
    pub vertices: Vec<NodeIndex>,
    pub edges: Vec<EdgeIndex>,
}

impl CycleBlock {
    /// Number of independent cycles: `edges − vertices + 1`.
    pub fn cycle_rank(&self) -> usize {
        (self.edges.len() + 1).saturating_sub(self.vertices.len())
    }
}

const UNVISITED: u32 = u32::MAX;

struct Frame {
    vertex: NodeIndex,
    parent_edge: Option<EdgeIndex>,
    incident: std::vec::IntoIter<(EdgeIndex, NodeIndex)>,
}

/// Decompose a graph into its cycle blocks.
///
/// Depth-first biconnected-component decomposition with discovery-time and
/// low-link tracking, run with an explicit frame stack. Components whose
/// cycle rank is zero (bridges) are dropped. Self-loops are ignored.
/// Disconnected inputs yield independent per-component blocks, ordered by
/// vertex visitation.
pub fn cycle_blocks<V, E>(g: &CycleGraph<V, E>) -> Vec<CycleBlock> {
    let n = g.vertex_count();
    let mut disc = vec![UNVISITED; n];
    let mut low = vec![0u32; n];
    let mut timer: u32 = 0;
    let mut edge_stack: Vec<EdgeIndex> = Vec::new();
    let mut blocks = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();

    for root in g.vertices() {
        if disc[root.index()] != UNVISITED {
            continue;
        }
        disc[root.index()] = timer;
        low[root.index()] = timer;
        timer += 1;
        stack.push(Frame {
            vertex: root,
            parent_edge: None,
            incident: incident_list(g, root),
        });

        loop {
            let Some(frame) = stack.last_mut() else { break };
            let v = frame.vertex;
            let parent_edge = frame.parent_edge;
            match frame.incident.next() {
                Some((e, w)) => {
                    if Some(e) == parent_edge || w == v {
                        continue;
                    }
                    if disc[w.index()] == UNVISITED {
                        edge_stack.push(e);
                        disc[w.index()] = timer;
                        low[w.index()] = timer;
                        timer += 1;
                        stack.push(Frame {
                            vertex: w,
                            parent_edge: Some(e),
                            incident: incident_list(g, w),
                        });
                    } else if disc[w.index()] < disc[v.index()] {
                        // back edge, seen from the deeper endpoint only
                        edge_stack.push(e);
                        low[v.index()] = low[v.index()].min(disc[w.index()]);
                    }
                }
                None => {
                    stack.pop();
                    let Some(parent) = stack.last() else { continue };
                    let u = parent.vertex;
                    low[u.index()] = low[u.index()].min(low[v.index()]);
                    if low[v.index()] >= disc[u.index()] {
                        // u separates v's subtree: everything stacked since
                        // the tree edge (u, v) is one biconnected component
                        let Some(tree_edge) = parent_edge else { continue };
                        let mut members = Vec::new();
                        while let Some(e) = edge_stack.pop() {
                            members.push(e);
                            if e == tree_edge {
                                break;
                            }
                        }
                        push_cycle_block(g, members, &mut blocks);
                    }
                }
            }
        }
        debug_assert!(edge_stack.is_empty());
    }

    blocks
}

fn incident_list<V, E>(
    g: &CycleGraph<V, E>,
    v: NodeIndex,
) -> std::vec::IntoIter<(EdgeIndex, NodeIndex)> {
    g.incident(v).collect::<Vec<_>>().into_iter()
}

fn push_cycle_block<V, E>(g: &CycleGraph<V, E>, mut edges: Vec<EdgeIndex>, out: &mut Vec<CycleBlock>) {
    let mut vertices = Vec::with_capacity(edges.len() + 1);
    for &e in &edges {
        let Some((a, b)) = g.endpoints(e) else { continue };
        vertices.push(a);
        vertices.push(b);
    }
    vertices.sort_unstable();
    vertices.dedup();
    // rank zero means a lone bridge edge
    if edges.len() < vertices.len() {
        return;
    }
    edges.sort_unstable();
    out.push(CycleBlock { vertices, edges });
}

#[cfg(test)]
mod tests {
    use super::*;

    fn n(i: usize) -> NodeIndex {
        NodeIndex::new(i)
    }

    fn graph(vertices: u32, edges: &[(u32, u32)]) -> CycleGraph<u32, usize> {
        CycleGraph::from_parts(
            0..vertices,
            edges.iter().enumerate().map(|(i, &(a, b))| (a, b, i)),
        )
        .expect("valid parts")
    }

    fn ring_edges(k: u32) -> Vec<(u32, u32)> {
        (0..k).map(|i| (i, (i + 1) % k)).collect()
    }

    #[test]
    fn chain_has_no_blocks() {
        let g = graph(4, &[(0, 1), (1, 2), (2, 3)]);
        assert!(cycle_blocks(&g).is_empty());
    }

    #[test]
    fn triangle_is_one_block() {
        let g = graph(3, &ring_edges(3));
        let blocks = cycle_blocks(&g);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].vertices.len(), 3);
        assert_eq!(blocks[0].edges.len(), 3);
        assert_eq!(blocks[0].cycle_rank(), 1);
    }

    #[test]
    fn pendant_chain_is_excluded() {
        // triangle with a two-edge tail
        let g = graph(5, &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4)]);
        let blocks = cycle_blocks(&g);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].vertices, vec![n(0), n(1), n(2)]);
        assert_eq!(blocks[0].edges.len(), 3);
    }

    #[test]
    fn bridge_joins_two_blocks() {
        // two triangles connected by a bridge edge 2-3
        let g = graph(
            6,
            &[(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)],
        );
        let blocks = cycle_blocks(&g);
        assert_eq!(blocks.len(), 2);
        let total_edges: usize = blocks.iter().map(|b| b.edges.len()).sum();
        assert_eq!(total_edges, 6, "bridge edge must not appear in any block");
        for b in &blocks {
            assert_eq!(b.cycle_rank(), 1);
        }
    }

    #[test]
    fn spiro_vertex_is_shared() {
        // two triangles sharing vertex 0
        let g = graph(5, &[(0, 1), (1, 2), (2, 0), (0, 3), (3, 4), (4, 0)]);
        let blocks = cycle_blocks(&g);
        assert_eq!(blocks.len(), 2);
        for b in &blocks {
            assert!(b.vertices.contains(&n(0)));
            assert_eq!(b.cycle_rank(), 1);
        }
        // edge sets stay disjoint
        let mut all: Vec<EdgeIndex> = blocks.iter().flat_map(|b| b.edges.clone()).collect();
        all.sort_unstable();
        all.dedup();
        assert_eq!(all.len(), 6);
    }

    #[test]
    fn fused_rings_are_one_block() {
        // two squares sharing edge 0-1
        let g = graph(
            6,
            &[(0, 1), (1, 2), (2, 3), (3, 0), (1, 4), (4, 5), (5, 0)],
        );
        let blocks = cycle_blocks(&g);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].cycle_rank(), 2);
        assert_eq!(blocks[0].vertices.len(), 6);
        assert_eq!(blocks[0].edges.len(), 7);
    }

    #[test]
    fn parallel_edges_form_a_block() {
        let g = graph(2, &[(0, 1), (0, 1)]);
        let blocks = cycle_blocks(&g);
        assert_eq!(blocks.len(), 1);
        assert_eq!(blocks[0].vertices.len(), 2);
        assert_eq!(blocks[0].edges.len(), 2);
        assert_eq!(blocks[0].cycle_rank(), 1);
    }

    #[test]
    fn disconnected_components_yield_independent_blocks() {
        let mut edges = ring_edges(3);
        edges.extend([(3, 4), (4, 5), (5, 3)]);
        let g = graph(6, &edges);
        let blocks = cycle_blocks(&g);
        assert_eq!(blocks.len(), 2);
    }

    #[test]
    fn isolated_vertices_are_fine() {
        let g = graph(3, &[]);
        assert!(cycle_blocks(&g).is_empty());
    }

    #[test]
    fn deterministic_output() {
        let edges = [(0, 1), (1, 2), (2, 0), (2, 3), (3, 4), (4, 5), (5, 3)];
        let a = cycle_blocks(&graph(6, &edges));
        let b = cycle_blocks(&graph(6, &edges));
        assert_eq!(a, b);
    }
}
