//! Reachability, dead-end and path analysis over a workflow's place graph.
//!
//! A transition contributes one edge for every `from` x `to` pair. Nothing here
//! mutates the workflow.

use crate::core::workflow_graph::model::Workflow;
use petgraph::algo::tarjan_scc;
use petgraph::graph::{DiGraph, NodeIndex};
use serde::Serialize;
use std::collections::{HashMap, HashSet, VecDeque};
use tracing::debug;

/// Bound used when the caller has no better idea.
pub const DEFAULT_MAX_DEPTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Reachability {
    /// Places visited from the initial marking, in BFS order.
    pub reachable: Vec<String>,
    pub unreachable: Vec<String>,
    pub dead_ends: Vec<String>,
    /// Set when the BFS reaches an already visited place. Also true for
    /// acyclic diamonds; see `cycles` for the strict answer.
    pub has_cycles: bool,
    /// Strongly connected components that form real cycles, self loops included.
    pub cycles: Vec<Vec<String>>,
}

/// One step of a traced path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PathStep {
    pub place: String,
    pub transition: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub cycle: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub truncated: bool,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl PathStep {
    fn at(place: &str) -> Self {
        Self {
            place: place.to_string(),
            transition: None,
            cycle: false,
            truncated: false,
        }
    }
}

pub type TracedPath = Vec<PathStep>;

pub fn reachability(workflow: &Workflow) -> Reachability {
    let (reachable, has_cycles) = match workflow.initial_marking() {
        Some(initial) => breadth_first(workflow, initial),
        None => (Vec::new(), false),
    };

    let visited: HashSet<&str> = reachable.iter().map(String::as_str).collect();
    let unreachable = workflow
        .places()
        .names()
        .filter(|name| !visited.contains(name))
        .map(str::to_string)
        .collect();

    let result = Reachability {
        reachable,
        unreachable,
        dead_ends: dead_ends(workflow),
        has_cycles,
        cycles: cycles(workflow),
    };
    debug!(
        workflow = workflow.name(),
        reachable = result.reachable.len(),
        unreachable = result.unreachable.len(),
        dead_ends = result.dead_ends.len(),
        has_cycles = result.has_cycles,
        "reachability computed"
    );
    result
}

fn breadth_first(workflow: &Workflow, initial: &str) -> (Vec<String>, bool) {
    let mut visited = vec![initial.to_string()];
    let mut seen: HashSet<String> = HashSet::from([initial.to_string()]);
    let mut queue = VecDeque::from([initial.to_string()]);
    let mut has_cycles = false;

    while let Some(current) = queue.pop_front() {
        for transition in workflow.outgoing(&current) {
            for target in &transition.to {
                if seen.contains(target) {
                    has_cycles = true;
                } else {
                    seen.insert(target.clone());
                    visited.push(target.clone());
                    queue.push_back(target.clone());
                }
            }
        }
    }
    (visited, has_cycles)
}

/// Places that no transition leaves from.
pub fn dead_ends(workflow: &Workflow) -> Vec<String> {
    let sources: HashSet<&str> = workflow
        .transitions()
        .iter()
        .flat_map(|t| t.from.iter().map(String::as_str))
        .collect();
    workflow
        .places()
        .names()
        .filter(|name| !sources.contains(name))
        .map(str::to_string)
        .collect()
}

/// Cycles among known places, each listed in place definition order.
pub fn cycles(workflow: &Workflow) -> Vec<Vec<String>> {
    let mut graph: DiGraph<usize, ()> = DiGraph::new();
    let mut index_of: HashMap<&str, NodeIndex> = HashMap::new();
    let names: Vec<&str> = workflow.places().names().collect();
    for (position, name) in names.iter().enumerate() {
        index_of.insert(*name, graph.add_node(position));
    }
    for transition in workflow.transitions().iter() {
        for from in &transition.from {
            for to in &transition.to {
                if let (Some(&a), Some(&b)) =
                    (index_of.get(from.as_str()), index_of.get(to.as_str()))
                {
                    graph.update_edge(a, b, ());
                }
            }
        }
    }

    let mut out: Vec<Vec<usize>> = tarjan_scc(&graph)
        .into_iter()
        .filter(|component| {
            component.len() > 1 || graph.find_edge(component[0], component[0]).is_some()
        })
        .map(|component| {
            let mut positions: Vec<usize> = component.into_iter().map(|idx| graph[idx]).collect();
            positions.sort_unstable();
            positions
        })
        .collect();
    out.sort();
    out.into_iter()
        .map(|positions| positions.into_iter().map(|p| names[p].to_string()).collect())
        .collect()
}

/// Depth-first enumeration of every path from the initial marking.
///
/// No path is longer than `max_depth` steps. A path ends normally at a place
/// with no outgoing transitions, with `truncated` when the depth bound stops a
/// place that could continue, or with `cycle` when a place already expanded
/// more than twice on the current path comes round again. Cost is exponential
/// in branching factor, so the bound is mandatory.
pub fn trace_paths(workflow: &Workflow, max_depth: usize) -> Vec<TracedPath> {
    let Some(initial) = workflow.initial_marking() else {
        return Vec::new();
    };
    if max_depth == 0 {
        return Vec::new();
    }

    let mut paths = Vec::new();
    let mut tracer = PathTracer {
        workflow,
        max_depth,
        paths: &mut paths,
    };
    tracer.walk(initial, Vec::new(), HashMap::new());
    debug!(
        workflow = workflow.name(),
        max_depth,
        paths = paths.len(),
        "paths traced"
    );
    paths
}

struct PathTracer<'a> {
    workflow: &'a Workflow,
    max_depth: usize,
    paths: &'a mut Vec<TracedPath>,
}

impl PathTracer<'_> {
    fn walk(&mut self, place: &str, path: TracedPath, mut visits: HashMap<String, usize>) {
        let seen = visits.get(place).copied().unwrap_or(0);
        if seen > 2 {
            self.finish(path, PathStep {
                cycle: true,
                ..PathStep::at(place)
            });
            return;
        }

        let workflow = self.workflow;
        let outgoing: Vec<_> = workflow.outgoing(place).collect();
        if outgoing.is_empty() {
            self.finish(path, PathStep::at(place));
            return;
        }
        if path.len() + 1 >= self.max_depth {
            self.finish(path, PathStep {
                truncated: true,
                ..PathStep::at(place)
            });
            return;
        }

        visits.insert(place.to_string(), seen + 1);
        for transition in outgoing {
            for target in &transition.to {
                let mut next = path.clone();
                next.push(PathStep {
                    transition: Some(transition.name.clone()),
                    ..PathStep::at(place)
                });
                self.walk(target, next, visits.clone());
            }
        }
    }

    fn finish(&mut self, mut path: TracedPath, last: PathStep) {
        path.push(last);
        self.paths.push(path);
    }
}
