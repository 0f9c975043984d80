use std::{collections::BTreeMap, rc::Rc};

use crate::node::AnyNode;

/// A bucket queue keyed by topological level.
///
/// Nodes at the same level share a bucket and are ticked together as one "wave"; waves are
/// drained lowest-level-first, which is what guarantees a node is never ticked before all of its
/// lower-level predecessors have settled for the current transaction.
#[derive(Default)]
pub(crate) struct TopoQueue {
	buckets: BTreeMap<usize, Vec<Rc<dyn AnyNode>>>,
}

impl TopoQueue {
	pub(crate) fn new() -> Self {
		Self::default()
	}

	pub(crate) fn push(&mut self, node: Rc<dyn AnyNode>, level: usize) {
		self.buckets.entry(level).or_default().push(node);
	}

	/// Removes and returns the lowest-level bucket still holding nodes, or `None` once the queue
	/// is empty. Levels discovered mid-drain (from a node whose tick raised a successor's level
	/// past the current bucket) always land in a bucket `>=` the one just popped, since levels
	/// only ever grow.
	pub(crate) fn pop_lowest(&mut self) -> Option<Vec<Rc<dyn AnyNode>>> {
		let &level = self.buckets.keys().next()?;
		self.buckets.remove(&level)
	}

	pub(crate) fn is_empty(&self) -> bool {
		self.buckets.is_empty()
	}
}

#[cfg(test)]
mod tests {
	use std::{
		cell::Cell,
		rc::{Rc, Weak},
	};

	use super::*;
	use crate::graph::Graph;

	struct Dummy {
		id: u64,
		level: Cell<usize>,
	}

	impl AnyNode for Dummy {
		fn id(&self) -> u64 {
			self.id
		}
		fn level(&self) -> usize {
			self.level.get()
		}
		fn set_level(&self, level: usize) {
			self.level.set(level);
		}
		fn new_level(&self) -> usize {
			self.level.get()
		}
		fn bump_new_level(&self, _: usize) {}
		fn queued(&self) -> bool {
			false
		}
		fn set_queued(&self, _: bool) {}
		fn push_successor(&self, _: Weak<dyn AnyNode>) {}
		fn remove_successor(&self, _: u64) {}
		fn successors(&self) -> Vec<Rc<dyn AnyNode>> {
			Vec::new()
		}
		fn same_graph(&self, _: &Rc<Graph>) -> bool {
			true
		}
		fn tick(&self, _: &Rc<dyn AnyNode>) {}
	}

	fn dummy(id: u64, level: usize) -> Rc<dyn AnyNode> {
		Rc::new(Dummy {
			id,
			level: Cell::new(level),
		})
	}

	#[test]
	fn drains_lowest_level_first() {
		let mut q = TopoQueue::new();
		q.push(dummy(1, 2), 2);
		q.push(dummy(2, 0), 0);
		q.push(dummy(3, 1), 1);

		let wave0 = q.pop_lowest().unwrap();
		assert_eq!(wave0.len(), 1);
		assert_eq!(wave0[0].id(), 2);

		let wave1 = q.pop_lowest().unwrap();
		assert_eq!(wave1[0].id(), 3);

		let wave2 = q.pop_lowest().unwrap();
		assert_eq!(wave2[0].id(), 1);

		assert!(q.pop_lowest().is_none());
		assert!(q.is_empty());
	}

	#[test]
	fn shares_a_bucket_per_level() {
		let mut q = TopoQueue::new();
		q.push(dummy(1, 0), 0);
		q.push(dummy(2, 0), 0);
		let wave = q.pop_lowest().unwrap();
		assert_eq!(wave.len(), 2);
	}
}
