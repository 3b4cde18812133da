//! Arena-backed chain of animated nodes.
//!
//! The chain owns every node in a fixed-size slot array indexed by node
//! position. Nodes are built lazily as the cursor walks into them and are
//! never removed. Links are plain indices, so there is no ownership between
//! neighbors.
//!
//! Exactly one node, the one under the cursor, animates at a time. When it
//! settles the cursor steps to the neighbor in the current sweep direction;
//! at either end of the chain the sweep reverses and the cursor stays put.

use super::draw::draw_node;
use crate::animation::AnimationState;
use crate::canvas::{Canvas, Paint};

/// Traversal order across the chain.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Default)]
pub enum Sweep {
    #[default]
    Forward,
    Backward,
}

impl Sweep {
    pub fn sign(self) -> i32 {
        match self {
            Sweep::Forward => 1,
            Sweep::Backward => -1,
        }
    }

    pub fn reversed(self) -> Self {
        match self {
            Sweep::Forward => Sweep::Backward,
            Sweep::Backward => Sweep::Forward,
        }
    }
}

/// A node finished its transition.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Settled {
    /// Index of the node that settled (before the cursor moved on)
    pub index: usize,
    /// Scale the node settled on, `0.0` or `1.0`
    pub scale: f32,
}

#[derive(Clone, Debug)]
pub struct Node {
    index: usize,
    pub state: AnimationState,
    prev: Option<usize>,
    next: Option<usize>,
}

impl Node {
    fn new(index: usize) -> Self {
        Self {
            index,
            state: AnimationState::new(),
            prev: None,
            next: None,
        }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    pub fn prev(&self) -> Option<usize> {
        self.prev
    }

    pub fn next(&self) -> Option<usize> {
        self.next
    }

    /// Linked neighbor in the given direction, if it has been built.
    pub fn neighbor(&self, sweep: Sweep) -> Option<usize> {
        match sweep {
            Sweep::Forward => self.next,
            Sweep::Backward => self.prev,
        }
    }

    pub fn draw(&self, canvas: &mut impl Canvas, paint: &Paint) {
        draw_node(canvas, self.index, self.state.scale, paint);
    }
}

#[derive(Clone, Debug)]
pub struct NodeChain {
    slots: Vec<Option<Node>>,
    current: usize,
    sweep: Sweep,
    rate: u32,
}

impl NodeChain {
    /// Create a chain with room for `capacity` nodes (at least one).
    ///
    /// Only node `0` exists up front. `rate` is the per-node segment count
    /// fed to the scale increment.
    pub fn new(capacity: usize, rate: u32) -> Self {
        let mut slots = vec![None; capacity.max(1)];
        slots[0] = Some(Node::new(0));
        Self {
            slots,
            current: 0,
            sweep: Sweep::Forward,
            rate,
        }
    }

    pub fn capacity(&self) -> usize {
        self.slots.len()
    }

    /// Number of nodes built so far.
    pub fn built_count(&self) -> usize {
        self.slots.iter().filter(|slot| slot.is_some()).count()
    }

    pub fn node(&self, index: usize) -> Option<&Node> {
        self.slots.get(index).and_then(Option::as_ref)
    }

    /// All built nodes in index order.
    pub fn nodes(&self) -> impl Iterator<Item = &Node> {
        self.slots.iter().flatten()
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn current(&self) -> &Node {
        self.slot(self.current)
    }

    pub fn sweep(&self) -> Sweep {
        self.sweep
    }

    /// Nodes painted each frame: the cursor node and everything before it.
    pub fn visible(&self) -> impl Iterator<Item = &Node> {
        self.slots[..=self.current].iter().flatten()
    }

    pub fn draw(&self, canvas: &mut impl Canvas, paint: &Paint) {
        for node in self.visible() {
            node.draw(canvas, paint);
        }
    }

    /// Start a transition on the cursor node.
    ///
    /// Returns `false` when that node is already mid-transition.
    pub fn start_updating(&mut self) -> bool {
        let index = self.current;
        let started = self.slot_mut(index).state.start_updating();
        if started {
            log::debug!(
                "node {} starting toward {}",
                index,
                self.slot(index).state.dir
            );
        }
        started
    }

    /// Tick the cursor node.
    ///
    /// When it settles the cursor moves on (reversing the sweep at either
    /// end) and the settled node is reported.
    pub fn update(&mut self) -> Option<Settled> {
        let index = self.current;
        let rate = self.rate;
        let scale = self.slot_mut(index).state.update(rate)?;
        let settled = Settled { index, scale };

        match self.get_next(self.sweep) {
            Some(next) => self.current = next,
            None => {
                self.sweep = self.sweep.reversed();
                log::debug!("chain exhausted at node {}, sweep now {:?}", index, self.sweep);
            }
        }
        log::debug!("node {} settled at {}, cursor on {}", index, scale, self.current);
        Some(settled)
    }

    /// Neighbor of the cursor node in `sweep`, building it when it falls
    /// inside the chain but does not exist yet. `None` past either end.
    fn get_next(&mut self, sweep: Sweep) -> Option<usize> {
        let from = self.current;
        if let Some(linked) = self.slot(from).neighbor(sweep) {
            return Some(linked);
        }
        let target = from.checked_add_signed(sweep.sign() as isize)?;
        if target >= self.slots.len() {
            return None;
        }
        self.add_neighbor(from, target);
        Some(target)
    }

    fn add_neighbor(&mut self, from: usize, to: usize) {
        let (lower, upper) = if from < to { (from, to) } else { (to, from) };
        let node = self.slots[to].get_or_insert_with(|| Node::new(to));
        if to == upper {
            node.prev = Some(lower);
        } else {
            node.next = Some(upper);
        }
        let origin = self.slot_mut(from);
        if from == lower {
            origin.next = Some(upper);
        } else {
            origin.prev = Some(lower);
        }
        log::debug!("built node {} next to node {}", to, from);
    }

    // Invariant: every index the cursor or a link can hold has a built node.
    fn slot(&self, index: usize) -> &Node {
        match &self.slots[index] {
            Some(node) => node,
            None => unreachable!("node {} referenced before it was built", index),
        }
    }

    fn slot_mut(&mut self, index: usize) -> &mut Node {
        match &mut self.slots[index] {
            Some(node) => node,
            None => unreachable!("node {} referenced before it was built", index),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(chain: &mut NodeChain) -> Settled {
        assert!(chain.start_updating());
        for _ in 0..1000 {
            if let Some(settled) = chain.update() {
                return settled;
            }
        }
        panic!("cursor node never settled");
    }

    #[test]
    fn test_new_chain_has_only_root() {
        let chain = NodeChain::new(5, 4);
        assert_eq!(chain.capacity(), 5);
        assert_eq!(chain.built_count(), 1);
        assert_eq!(chain.current_index(), 0);
        assert_eq!(chain.sweep(), Sweep::Forward);
        assert!(chain.node(1).is_none());
        assert_eq!(chain.current().prev(), None);
        assert_eq!(chain.current().next(), None);
    }

    #[test]
    fn test_zero_capacity_still_has_root() {
        let chain = NodeChain::new(0, 4);
        assert_eq!(chain.capacity(), 1);
        assert_eq!(chain.current_index(), 0);
    }

    #[test]
    fn test_start_is_guarded_per_node() {
        let mut chain = NodeChain::new(5, 4);
        assert!(chain.start_updating());
        assert!(!chain.start_updating());
    }

    #[test]
    fn test_update_without_start_does_nothing() {
        let mut chain = NodeChain::new(5, 4);
        for _ in 0..200 {
            assert_eq!(chain.update(), None);
        }
        assert_eq!(chain.current_index(), 0);
        assert_eq!(chain.built_count(), 1);
    }

    #[test]
    fn test_settle_builds_and_links_next_node() {
        let mut chain = NodeChain::new(5, 4);
        let settled = settle(&mut chain);
        assert_eq!(settled, Settled { index: 0, scale: 1.0 });
        assert_eq!(chain.current_index(), 1);
        assert_eq!(chain.built_count(), 2);
        assert_eq!(chain.node(0).and_then(Node::next), Some(1));
        assert_eq!(chain.node(1).and_then(Node::prev), Some(0));
        assert_eq!(chain.sweep(), Sweep::Forward);
    }

    #[test]
    fn test_sweep_bounces_at_both_ends() {
        let mut chain = NodeChain::new(3, 4);
        let mut order = Vec::new();
        for _ in 0..7 {
            let settled = settle(&mut chain);
            order.push((settled.index, settled.scale));
        }
        assert_eq!(
            order,
            vec![
                (0, 1.0),
                (1, 1.0),
                (2, 1.0),
                (2, 0.0),
                (1, 0.0),
                (0, 0.0),
                (0, 1.0),
            ]
        );
        assert_eq!(chain.current_index(), 1);
        assert_eq!(chain.sweep(), Sweep::Forward);
        assert_eq!(chain.built_count(), 3);
    }

    #[test]
    fn test_sweep_reverses_only_at_ends() {
        let mut chain = NodeChain::new(5, 4);
        settle(&mut chain);
        settle(&mut chain);
        assert_eq!(chain.sweep(), Sweep::Forward);
        settle(&mut chain);
        settle(&mut chain);
        assert_eq!(chain.sweep(), Sweep::Forward);
        assert_eq!(chain.current_index(), 4);
        settle(&mut chain);
        assert_eq!(chain.sweep(), Sweep::Backward);
        assert_eq!(chain.current_index(), 4);
    }

    #[test]
    fn test_single_node_chain_toggles_in_place() {
        let mut chain = NodeChain::new(1, 4);
        assert_eq!(settle(&mut chain).scale, 1.0);
        assert_eq!(chain.sweep(), Sweep::Backward);
        assert_eq!(settle(&mut chain).scale, 0.0);
        assert_eq!(chain.sweep(), Sweep::Forward);
        assert_eq!(chain.current_index(), 0);
    }

    #[test]
    fn test_visible_runs_from_root_to_cursor() {
        let mut chain = NodeChain::new(5, 4);
        assert_eq!(chain.visible().map(Node::index).collect::<Vec<_>>(), vec![0]);
        settle(&mut chain);
        settle(&mut chain);
        assert_eq!(
            chain.visible().map(Node::index).collect::<Vec<_>>(),
            vec![0, 1, 2]
        );
    }
}
