use std::{
	cell::RefCell,
	rc::{Rc, Weak},
};

use crate::{
	node::{AnyNode, NodeId},
	observer::DynObserver,
	queue::TopoQueue,
	var::DynVar,
};

struct GraphInner {
	next_id: NodeId,
	txn_level: usize,
	propagating: bool,
	changed_inputs: Vec<Rc<dyn DynVar>>,
	scheduled: TopoQueue,
	detached: Vec<Weak<dyn DynObserver>>,
}

/// The scheduler: owns the topological queue, the set of vars staged this transaction, and
/// the observers queued for deferred self-detachment.
///
/// Not exposed directly outside the crate — [`Context`](crate::context::Context) is the public
/// handle to one of these.
pub struct Graph {
	inner: RefCell<GraphInner>,
}

impl Graph {
	pub(crate) fn new() -> Self {
		Self {
			inner: RefCell::new(GraphInner {
				next_id: 0,
				txn_level: 0,
				propagating: false,
				changed_inputs: Vec::new(),
				scheduled: TopoQueue::new(),
				detached: Vec::new(),
			}),
		}
	}

	pub(crate) fn next_id(&self) -> NodeId {
		let mut inner = self.inner.borrow_mut();
		let id = inner.next_id;
		inner.next_id += 1;
		id
	}

	pub(crate) fn is_propagating(&self) -> bool {
		self.inner.borrow().propagating
	}

	/// Enqueues every not-yet-queued successor of `node` at its current level.
	pub(crate) fn process_children(&self, node: &Rc<dyn AnyNode>) {
		for successor in node.successors() {
			if !successor.queued() {
				successor.set_queued(true);
				let level = successor.level();
				self.inner.borrow_mut().scheduled.push(successor, level);
			}
		}
	}

	/// Sets `successor.new_level = max(successor.new_level, node.level + 1)` for every successor
	/// of `node`.
	fn invalidate_successors(&self, node: &Rc<dyn AnyNode>) {
		let required = node.level() + 1;
		for successor in node.successors() {
			successor.bump_new_level(required);
		}
	}

	/// A flatten node's inner edge switched away from `old_inner`: sever that edge.
	pub(crate) fn on_dynamic_detach(&self, flatten: &Rc<dyn AnyNode>, old_inner: &Rc<dyn AnyNode>) {
		old_inner.remove_successor(flatten.id());
	}

	/// A flatten node's inner edge switched to `new_inner`: point the edge at it, then invalidate
	/// and re-enqueue the flatten node so a later wave re-evaluates it at its (possibly higher)
	/// level against the new inner's current value.
	pub(crate) fn on_dynamic_attach(&self, flatten: &Rc<dyn AnyNode>, new_inner: &Rc<dyn AnyNode>) {
		crate::node::add_edge(new_inner, flatten);
		self.invalidate_successors(flatten);
		flatten.set_queued(true);
		let level = flatten.level();
		self.inner.borrow_mut().scheduled.push(flatten.clone(), level);
	}

	pub(crate) fn queue_detach(&self, observer: Weak<dyn DynObserver>) {
		self.inner.borrow_mut().detached.push(observer);
	}

	/// The single-write fast path and the transaction commit path both funnel through here: stage
	/// the var if a transaction is open, otherwise apply and propagate it immediately.
	pub(crate) fn commit_or_stage(&self, var: Rc<dyn DynVar>) {
		let nested = {
			let mut inner = self.inner.borrow_mut();
			if inner.txn_level > 0 {
				inner.changed_inputs.push(var.clone());
				true
			} else {
				false
			}
		};
		if nested {
			return;
		}

		debug_assert!(
			!self.is_propagating(),
			"reactive state mutated from within its own propagation wave"
		);

		let changed = var.apply();
		if changed {
			let any: Rc<dyn AnyNode> = var;
			self.process_children(&any);
			self.propagate();
		}
		self.detach_queued_observers();
	}

	/// Runs `f` inside a transaction: writes during `f` are staged rather than applied
	/// immediately, then committed as one wave of propagation when the outermost transaction
	/// exits.
	pub fn transaction<R>(&self, f: impl FnOnce() -> R) -> R {
		self.inner.borrow_mut().txn_level += 1;
		let result = f();

		let still_nested = {
			let mut inner = self.inner.borrow_mut();
			inner.txn_level -= 1;
			inner.txn_level > 0
		};
		if still_nested {
			return result;
		}

		let changed_inputs = std::mem::take(&mut self.inner.borrow_mut().changed_inputs);
		let mut propagate_needed = false;
		for var in changed_inputs {
			if var.apply() {
				propagate_needed = true;
				let any: Rc<dyn AnyNode> = var;
				self.process_children(&any);
			}
		}
		if propagate_needed {
			self.propagate();
		}
		self.detach_queued_observers();
		result
	}

	/// Drains the scheduled queue lowest-level-first. A node whose level has been invalidated past
	/// its current bucket is re-enqueued at the new level instead of being ticked; this is what
	/// keeps every node ticked at most once per wave while still respecting topological order
	/// discovered mid-wave.
	fn propagate(&self) {
		self.inner.borrow_mut().propagating = true;
		loop {
			let wave = match self.inner.borrow_mut().scheduled.pop_lowest() {
				Some(wave) => wave,
				None => break,
			};
			for node in wave {
				if node.level() < node.new_level() {
					let new_level = node.new_level();
					node.set_level(new_level);
					self.invalidate_successors(&node);
					self.inner.borrow_mut().scheduled.push(node.clone(), new_level);
					continue;
				}
				node.set_queued(false);
				node.tick(&node);
			}
		}
		self.inner.borrow_mut().propagating = false;
	}

	fn detach_queued_observers(&self) {
		let detached = std::mem::take(&mut self.inner.borrow_mut().detached);
		for observer in detached {
			if let Some(observer) = observer.upgrade() {
				observer.unregister_self();
			}
		}
	}

	pub(crate) fn node_count(&self) -> usize {
		self.inner.borrow().next_id as usize
	}

	/// True once every staged write has been applied and every scheduled node has ticked: no
	/// transaction is open and the scheduler's queue is empty.
	pub(crate) fn is_settled(&self) -> bool {
		let inner = self.inner.borrow();
		inner.txn_level == 0 && inner.scheduled.is_empty()
	}
}
