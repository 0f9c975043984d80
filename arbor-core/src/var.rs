use std::{
	cell::{Cell, Ref, RefCell},
	rc::Rc,
};

use crate::{
	graph::Graph,
	node::{AnyNode, NodeCore, NodeId},
	observable::Observable,
	signal::SignalLike,
};

/// An input node: the only place new values enter the graph.
///
/// A write never mutates `value` directly except through [`apply`](VarNode::apply). `set` stages
/// a replacement value; `modify` either mutates `value` in place right away (if no `set` is
/// already staged for this transaction) or patches the staged value (if one is). This is why a
/// read between a `modify` and the transaction committing can observe the new value early: the
/// mutation already happened, only the *notification* is deferred.
pub struct VarNode<T> {
	core: NodeCore,
	observable: Observable,
	value: RefCell<T>,
	staged_value: RefCell<Option<T>>,
	has_set: Cell<bool>,
	has_modify: Cell<bool>,
}

impl<T: 'static> VarNode<T> {
	pub(crate) fn new_raw(graph: Rc<Graph>, id: NodeId, initial: T) -> Rc<Self> {
		Rc::new(Self {
			core: NodeCore::new(id, graph),
			observable: Observable::new(),
			value: RefCell::new(initial),
			staged_value: RefCell::new(None),
			has_set: Cell::new(false),
			has_modify: Cell::new(false),
		})
	}

	fn stage_set(&self, value: T) {
		*self.staged_value.borrow_mut() = Some(value);
		self.has_set.set(true);
		self.has_modify.set(false);
	}

	fn stage_modify(&self, f: impl FnOnce(&mut T)) {
		if self.has_set.get() {
			let mut staged = self.staged_value.borrow_mut();
			f(staged.as_mut().expect("has_set implies a staged value is present"));
		} else {
			f(&mut self.value.borrow_mut());
			self.has_modify.set(true);
		}
	}
}

impl<T: 'static + PartialEq> VarNode<T> {
	/// Moves any staged value or in-place modification into `value`, returning whether the node's
	/// externally-visible value actually changed. Equality-gated on the `set` path; unconditional
	/// on the `modify` path, since `modify` already mutated the live value and there is no
	/// pre-mutation snapshot left to compare against.
	pub(crate) fn apply(&self) -> bool {
		if self.has_set.get() {
			self.has_set.set(false);
			let staged = self
				.staged_value
				.borrow_mut()
				.take()
				.expect("has_set implies a staged value is present");
			let changed = *self.value.borrow() != staged;
			if changed {
				*self.value.borrow_mut() = staged;
			}
			changed
		} else if self.has_modify.get() {
			self.has_modify.set(false);
			true
		} else {
			false
		}
	}
}

impl<T: 'static + Clone + PartialEq> VarNode<T> {
	/// Stages a replacement value and, depending on whether a transaction is open, either records
	/// it for commit or applies and propagates it immediately (single-write fast path).
	pub fn set(self: &Rc<Self>, value: T) {
		self.stage_set(value);
		self.core.graph().commit_or_stage(self.clone());
	}

	/// Applies `f` to the value in place (or to the staged value, if a `set` is already pending
	/// this transaction) and commits per the same rules as [`set`](VarNode::set).
	pub fn modify(self: &Rc<Self>, f: impl FnOnce(&mut T)) {
		self.stage_modify(f);
		self.core.graph().commit_or_stage(self.clone());
	}
}

impl<T: 'static> AnyNode for VarNode<T> {
	fn id(&self) -> NodeId {
		self.core.id()
	}
	fn level(&self) -> usize {
		self.core.level()
	}
	fn set_level(&self, level: usize) {
		self.core.set_level(level);
	}
	fn new_level(&self) -> usize {
		self.core.new_level()
	}
	fn bump_new_level(&self, at_least: usize) {
		self.core.bump_new_level(at_least);
	}
	fn queued(&self) -> bool {
		self.core.queued()
	}
	fn set_queued(&self, queued: bool) {
		self.core.set_queued(queued);
	}
	fn push_successor(&self, successor: std::rc::Weak<dyn AnyNode>) {
		self.core.push_successor(successor);
	}
	fn remove_successor(&self, id: NodeId) {
		self.core.remove_successor(id);
	}
	fn successors(&self) -> Vec<Rc<dyn AnyNode>> {
		self.core.successors()
	}
	fn same_graph(&self, graph: &Rc<Graph>) -> bool {
		self.core.same_graph(graph)
	}
	fn tick(&self, _self_rc: &Rc<dyn AnyNode>) {
		unreachable!("var nodes are never ticked by the scheduler; only apply'd at commit time")
	}
}

impl<T: 'static> SignalLike<T> for VarNode<T> {
	fn read(&self) -> Ref<'_, T> {
		self.value.borrow()
	}
	fn observable(&self) -> &Observable {
		&self.observable
	}
}

/// The graph-facing half of a var node: applying a staged write without knowing `T`.
pub(crate) trait DynVar: AnyNode {
	fn apply(&self) -> bool;
}

impl<T: 'static + PartialEq> DynVar for VarNode<T> {
	fn apply(&self) -> bool {
		VarNode::apply(self)
	}
}
