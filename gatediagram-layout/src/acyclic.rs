//! Phase 1a: cycle removal.
//!
//! Feedback loops (a register fed back through a gate, a cross-coupled
//! latch) are legal in a netlist but have no valid layering. A depth-first
//! search marks every edge that closes a cycle; ranking then runs over the
//! graph with those edges turned around. Later phases keep working with the
//! original edges, since they only care which ranks an edge joins.

/// Edges `(from, to)` that point back onto the DFS stack.
///
/// Searches start from sources (no incoming edge) in index order, then from
/// any node still unvisited, so acyclic graphs yield no edges at all.
pub fn feedback_edges(succ: &[Vec<usize>], pred: &[Vec<usize>]) -> Vec<(usize, usize)> {
    #[derive(Clone, Copy, PartialEq, Eq)]
    enum Mark {
        New,
        OnStack,
        Done,
    }

    let n = succ.len();
    let mut mark = vec![Mark::New; n];
    let mut back = Vec::new();

    let sources = (0..n).filter(|&i| pred[i].is_empty());
    let starts: Vec<usize> = sources.chain(0..n).collect();

    for start in starts {
        if mark[start] != Mark::New {
            continue;
        }
        mark[start] = Mark::OnStack;
        // (node, index of the next successor to look at)
        let mut stack = vec![(start, 0usize)];
        while let Some(top) = stack.last_mut() {
            let (node, next) = *top;
            match succ[node].get(next) {
                Some(&s) => {
                    top.1 += 1;
                    match mark[s] {
                        Mark::New => {
                            mark[s] = Mark::OnStack;
                            stack.push((s, 0));
                        }
                        Mark::OnStack => back.push((node, s)),
                        Mark::Done => {}
                    }
                }
                None => {
                    mark[node] = Mark::Done;
                    stack.pop();
                }
            }
        }
    }
    back
}

/// Successor/predecessor lists with every edge in `reversed` turned around.
/// An edge that would duplicate an existing one is merged into it.
pub fn reverse_edges(
    succ: &[Vec<usize>],
    reversed: &[(usize, usize)],
) -> (Vec<Vec<usize>>, Vec<Vec<usize>>) {
    let n = succ.len();
    let mut dag_succ: Vec<Vec<usize>> = vec![Vec::new(); n];
    let mut dag_pred: Vec<Vec<usize>> = vec![Vec::new(); n];
    for (u, targets) in succ.iter().enumerate() {
        for &v in targets {
            let (a, b) = if reversed.contains(&(u, v)) { (v, u) } else { (u, v) };
            if !dag_succ[a].contains(&b) {
                dag_succ[a].push(b);
                dag_pred[b].push(a);
            }
        }
    }
    (dag_succ, dag_pred)
}
