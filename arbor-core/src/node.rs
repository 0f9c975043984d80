use std::{
	cell::{Cell, RefCell},
	rc::{Rc, Weak},
};

use indexmap::IndexMap;

/// Monotonically increasing identity assigned to every node in a [`Graph`](crate::graph::Graph).
///
/// Used to break ties when two nodes share a topological level, to let
/// [`FlattenNode`](crate::flatten::FlattenNode) tell whether a freshly read inner signal is the
/// one it already tracks, and to remove a specific successor or observer from a node's lists
/// without needing `PartialEq`/`Hash` on the node's value type.
pub type NodeId = u64;

/// The capability shared by every node that can sit in the propagation graph: identity,
/// topological level, queue membership, and the (non-owning) edges to whatever depends on it.
///
/// This is "Node (base)" from the component table. Rust has no node base class to inherit from,
/// so every concrete node kind (var, computed, flatten, observer) embeds a [`NodeCore`] and
/// forwards this trait's methods to it.
pub trait AnyNode {
	fn id(&self) -> NodeId;
	fn level(&self) -> usize;
	fn set_level(&self, level: usize);
	fn new_level(&self) -> usize;
	/// `new_level = max(new_level, at_least)`.
	fn bump_new_level(&self, at_least: usize);
	fn queued(&self) -> bool;
	fn set_queued(&self, queued: bool);
	/// Registers a non-owning back-pointer from this node to `successor`.
	fn push_successor(&self, successor: Weak<dyn AnyNode>);
	/// Removes the successor with the given id, if still present. No-op otherwise: detaching an
	/// edge that's already gone (e.g. because the successor died first) is not an error.
	fn remove_successor(&self, id: NodeId);
	/// Upgrades and returns the live successors, pruning dead weak references it finds along the
	/// way.
	fn successors(&self) -> Vec<Rc<dyn AnyNode>>;
	/// True iff `graph` is the graph this node belongs to. Used to reject cross-context
	/// composition at construction time rather than let it corrupt a different graph's queue.
	fn same_graph(&self, graph: &Rc<crate::graph::Graph>) -> bool;

	/// Re-evaluates this node. `self_rc` is this same node as already upgraded by the scheduler,
	/// so implementations that need to register further edges (flatten, on a dynamic rewire) can
	/// pass it straight to [`Graph`](crate::graph::Graph) without keeping a self-weak-reference of
	/// their own.
	fn tick(&self, self_rc: &Rc<dyn AnyNode>);
}

/// Fields common to every node kind. Embedded, not inherited.
pub(crate) struct NodeCore {
	id: NodeId,
	graph: Rc<crate::graph::Graph>,
	level: Cell<usize>,
	new_level: Cell<usize>,
	queued: Cell<bool>,
	/// Ordered (insertion order matters: successors are discovered/enqueued in a stable order)
	/// and keyed by id for O(1) removal on detach, the way `sycamore-reactive2` keys its
	/// dependents map by pointer.
	successors: RefCell<IndexMap<NodeId, Weak<dyn AnyNode>>>,
}

impl NodeCore {
	pub(crate) fn new(id: NodeId, graph: Rc<crate::graph::Graph>) -> Self {
		Self {
			id,
			graph,
			level: Cell::new(0),
			new_level: Cell::new(0),
			queued: Cell::new(false),
			successors: RefCell::new(IndexMap::new()),
		}
	}

	pub(crate) fn id(&self) -> NodeId {
		self.id
	}

	pub(crate) fn graph(&self) -> &Rc<crate::graph::Graph> {
		&self.graph
	}

	pub(crate) fn level(&self) -> usize {
		self.level.get()
	}

	pub(crate) fn set_level(&self, level: usize) {
		self.level.set(level);
	}

	pub(crate) fn new_level(&self) -> usize {
		self.new_level.get()
	}

	pub(crate) fn bump_new_level(&self, at_least: usize) {
		if at_least > self.new_level.get() {
			self.new_level.set(at_least);
		}
	}

	pub(crate) fn queued(&self) -> bool {
		self.queued.get()
	}

	pub(crate) fn set_queued(&self, queued: bool) {
		self.queued.set(queued);
	}

	pub(crate) fn push_successor(&self, successor: Weak<dyn AnyNode>) {
		let id = successor.upgrade().expect("newly-downgraded successor is still alive").id();
		self.successors.borrow_mut().insert(id, successor);
	}

	pub(crate) fn remove_successor(&self, id: NodeId) {
		self.successors.borrow_mut().shift_remove(&id);
	}

	pub(crate) fn successors(&self) -> Vec<Rc<dyn AnyNode>> {
		let mut dead = false;
		let upgraded: Vec<_> = self
			.successors
			.borrow()
			.values()
			.map(|weak| weak.upgrade())
			.inspect(|node| dead |= node.is_none())
			.collect();
		if dead {
			self.successors.borrow_mut().retain(|_, weak| weak.strong_count() > 0);
		}
		upgraded.into_iter().flatten().collect()
	}

	pub(crate) fn same_graph(&self, graph: &Rc<crate::graph::Graph>) -> bool {
		Rc::ptr_eq(&self.graph, graph)
	}
}

/// Adds an edge `predecessor -> successor`, bumping the successor's level immediately.
///
/// "Each edge addition sets `successor.level = max(successor.level, predecessor.level + 1)`
/// immediately." Both `level` and `new_level` are bumped here because this helper is only ever
/// called outside of an active propagation wave (at node construction, or synchronously from a
/// flatten's dynamic rewire), so there's no reason to defer the commit through the scheduler's
/// usual invalidate-then-re-enqueue path.
pub(crate) fn add_edge(predecessor: &Rc<dyn AnyNode>, successor: &Rc<dyn AnyNode>) {
	predecessor.push_successor(Rc::downgrade(successor));
	let required = successor.level().max(predecessor.level() + 1);
	successor.set_level(required);
	successor.bump_new_level(required);
}
