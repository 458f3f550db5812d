//! Lazy walk over the parent relation
//!
//! ## Algorithm
//!
//! The walk keeps an explicit work list of `(commit, depth, predecessor)`
//! frames instead of recursing, so long linear histories cannot exhaust the
//! stack:
//!
//! - depth-first pops from the back and pushes parents in reverse, so the
//!   first parent's subtree is finished before its siblings
//! - branch-first pops from the front and pushes parents in order, so every
//!   commit at one distance comes out before the next distance
//!
//! A map from commit id to the smallest depth it was expanded at makes sure
//! merge histories yield each commit once, however many paths lead to it.
//! Without a depth limit each commit is also expanded once. With one, a
//! commit reached again over a shorter path is expanded again (but not
//! yielded again), so both orders visit the same commits for the same limit.
//!
//! Parents are resolved when a frame is popped and is going to be expanded.
//! A commit that cannot be resolved therefore fails exactly where it is
//! reached in the walk, and the walk ends there.

use crate::artifacts::objects::commit::Commit;
use crate::artifacts::objects::object_id::ObjectId;
use crate::errors::Result;
use std::collections::{HashMap, VecDeque};
use std::iter::FusedIterator;
use tracing::trace;

/// Callback deciding something about a visited item at a given depth
pub type VisitFilter<'r> = Box<dyn Fn(&Visit<'r>, usize) -> bool + 'r>;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TraversalOrder {
    #[default]
    DepthFirst,
    BranchFirst,
}

/// Item produced by a walk
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Visit<'r> {
    Commit(Commit<'r>),
    /// `(predecessor, commit)`; the start commit has no predecessor
    Edge(Option<Commit<'r>>, Commit<'r>),
}

impl<'r> Visit<'r> {
    pub fn commit(&self) -> &Commit<'r> {
        match self {
            Visit::Commit(commit) | Visit::Edge(_, commit) => commit,
        }
    }

    pub fn predecessor(&self) -> Option<&Commit<'r>> {
        match self {
            Visit::Commit(_) => None,
            Visit::Edge(predecessor, _) => predecessor.as_ref(),
        }
    }

    pub fn into_commit(self) -> Commit<'r> {
        match self {
            Visit::Commit(commit) | Visit::Edge(_, commit) => commit,
        }
    }
}

/// Configuration of a walk starting at one commit
///
/// ```rust,ignore
/// let ancestors = commit
///     .traverse()
///     .order(TraversalOrder::BranchFirst)
///     .depth(3)
///     .predicate(|visit, _| visit.commit().parent_ids().is_ok_and(|p| p.len() > 1));
///
/// for merge in ancestors {
///     println!("{}", merge?.commit());
/// }
/// ```
pub struct RevList<'r> {
    start: Commit<'r>,
    order: TraversalOrder,
    ignore_self: bool,
    depth: Option<usize>,
    prune: Option<VisitFilter<'r>>,
    predicate: Option<VisitFilter<'r>>,
    as_edge: bool,
}

impl<'r> RevList<'r> {
    pub fn new(start: Commit<'r>) -> Self {
        Self {
            start,
            order: TraversalOrder::DepthFirst,
            ignore_self: true,
            depth: None,
            prune: None,
            predicate: None,
            as_edge: false,
        }
    }

    pub fn order(mut self, order: TraversalOrder) -> Self {
        self.order = order;
        self
    }

    pub fn branch_first(self) -> Self {
        self.order(TraversalOrder::BranchFirst)
    }

    /// Whether the start commit is left out of the output (default: true)
    pub fn ignore_self(mut self, ignore_self: bool) -> Self {
        self.ignore_self = ignore_self;
        self
    }

    /// Largest distance from the start commit to visit
    pub fn depth(mut self, depth: usize) -> Self {
        self.depth = Some(depth);
        self
    }

    /// Stop expanding items for which `prune` returns true; they are still yielded
    pub fn prune(mut self, prune: impl Fn(&Visit<'r>, usize) -> bool + 'r) -> Self {
        self.prune = Some(Box::new(prune));
        self
    }

    /// Only yield items for which `predicate` returns true; the rest are still expanded
    pub fn predicate(mut self, predicate: impl Fn(&Visit<'r>, usize) -> bool + 'r) -> Self {
        self.predicate = Some(Box::new(predicate));
        self
    }

    /// Yield `Visit::Edge` items instead of `Visit::Commit`
    pub fn as_edge(mut self, as_edge: bool) -> Self {
        self.as_edge = as_edge;
        self
    }
}

impl<'r> IntoIterator for RevList<'r> {
    type Item = Result<Visit<'r>>;
    type IntoIter = RevListIntoIter<'r>;

    fn into_iter(self) -> Self::IntoIter {
        let mut work_list = VecDeque::new();
        work_list.push_back(Frame {
            commit: self.start,
            depth: 0,
            predecessor: None,
        });

        RevListIntoIter {
            order: self.order,
            ignore_self: self.ignore_self,
            max_depth: self.depth,
            prune: self.prune,
            predicate: self.predicate,
            as_edge: self.as_edge,
            work_list,
            expanded_at: HashMap::new(),
            failed: false,
        }
    }
}

struct Frame<'r> {
    commit: Commit<'r>,
    depth: usize,
    predecessor: Option<Commit<'r>>,
}

pub struct RevListIntoIter<'r> {
    order: TraversalOrder,
    ignore_self: bool,
    max_depth: Option<usize>,
    prune: Option<VisitFilter<'r>>,
    predicate: Option<VisitFilter<'r>>,
    as_edge: bool,
    work_list: VecDeque<Frame<'r>>,
    expanded_at: HashMap<ObjectId, usize>,
    failed: bool,
}

impl<'r> RevListIntoIter<'r> {
    fn pop(&mut self) -> Option<Frame<'r>> {
        match self.order {
            TraversalOrder::DepthFirst => self.work_list.pop_back(),
            TraversalOrder::BranchFirst => self.work_list.pop_front(),
        }
    }

    /// Whether reaching `id` at `depth` has nothing left to contribute
    fn is_settled(&self, id: &ObjectId, depth: usize) -> bool {
        self.expanded_at
            .get(id)
            .is_some_and(|&seen| self.max_depth.is_none() || seen <= depth)
    }

    fn schedule(&mut self, commit: &Commit<'r>, parents: Vec<Commit<'r>>, depth: usize) {
        let frames: Vec<_> = parents
            .into_iter()
            .filter(|parent| !self.is_settled(parent.id(), depth))
            .map(|parent| Frame {
                commit: parent,
                depth,
                predecessor: Some(commit.clone()),
            })
            .collect();

        match self.order {
            // The first parent has to end up on top of the stack
            TraversalOrder::DepthFirst => self.work_list.extend(frames.into_iter().rev()),
            TraversalOrder::BranchFirst => self.work_list.extend(frames),
        }
    }
}

impl<'r> Iterator for RevListIntoIter<'r> {
    type Item = Result<Visit<'r>>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }

        while let Some(Frame {
            commit,
            depth,
            predecessor,
        }) = self.pop()
        {
            if self.is_settled(commit.id(), depth) {
                continue;
            }
            let revisit = self
                .expanded_at
                .insert(commit.id().clone(), depth)
                .is_some();

            let visit = if self.as_edge {
                Visit::Edge(predecessor, commit.clone())
            } else {
                Visit::Commit(commit.clone())
            };

            let pruned = self.prune.as_ref().is_some_and(|prune| prune(&visit, depth));
            let within_depth = self.max_depth.is_none_or(|max_depth| depth < max_depth);

            if !pruned && within_depth {
                match commit.parents() {
                    Ok(parents) => self.schedule(&commit, parents, depth + 1),
                    Err(err) => {
                        self.failed = true;
                        return Some(Err(err));
                    }
                }
            }

            if revisit || (depth == 0 && self.ignore_self) {
                continue;
            }
            if !self
                .predicate
                .as_ref()
                .is_none_or(|predicate| predicate(&visit, depth))
            {
                continue;
            }

            trace!(id = %commit.id(), depth, "visiting commit");
            return Some(Ok(visit));
        }

        None
    }
}

impl FusedIterator for RevListIntoIter<'_> {}
