use std::{
	cell::{Cell, Ref, RefCell},
	rc::Rc,
};

use crate::{
	graph::Graph,
	node::{AnyNode, NodeCore, NodeId},
	observable::Observable,
	operation::Operation,
	signal::SignalLike,
};

/// A derived node whose value is recomputed from an [`Operation`].
///
/// `op` is `None` exactly when it has been [`steal_op`](ComputedNode::steal_op)'d away for fusion
/// into a larger operation: a computed node in that state is never ticked again (its predecessor
/// edges were already detached when the operation was stolen) and only exists as a still-alive
/// handle someone else happens to be holding.
pub struct ComputedNode<T> {
	core: NodeCore,
	observable: Observable,
	value: RefCell<T>,
	op: RefCell<Option<Box<dyn Operation<T>>>>,
	stolen: Cell<bool>,
	eq: Box<dyn Fn(&T, &T) -> bool>,
}

impl<T: 'static> ComputedNode<T> {
	pub(crate) fn new_raw(
		graph: Rc<Graph>,
		id: NodeId,
		op: Box<dyn Operation<T>>,
		eq: Box<dyn Fn(&T, &T) -> bool>,
	) -> Rc<Self> {
		op.assert_same_context(&graph);
		let initial = op.evaluate();
		let node = Rc::new(Self {
			core: NodeCore::new(id, graph),
			observable: Observable::new(),
			value: RefCell::new(initial),
			op: RefCell::new(Some(op)),
			stolen: Cell::new(false),
			eq,
		});
		let node_any: Rc<dyn AnyNode> = node.clone();
		node.op.borrow().as_ref().expect("just constructed").attach(&node_any);
		node
	}

	/// Detaches this node's operation from its dependencies and hands it back by move, so it can
	/// be fused into a larger operation instead of this node being published on its own.
	///
	/// Panics if this node is shared: stealing the operation out from under a published node (one
	/// some other handle might still read or depend on) would silently stop that handle's value
	/// from ever updating again.
	pub fn steal_op(self: &Rc<Self>) -> Box<dyn Operation<T>> {
		assert_eq!(
			Rc::strong_count(self),
			1,
			"cannot fuse a computed node's operation once it has been shared"
		);
		let op = self
			.op
			.borrow_mut()
			.take()
			.expect("operation already stolen");
		op.detach(self.core.id());
		self.stolen.set(true);
		op
	}
}

impl<T: 'static> AnyNode for ComputedNode<T> {
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

	fn tick(&self, self_rc: &Rc<dyn AnyNode>) {
		assert!(!self.stolen.get(), "ticked a computed node whose operation was stolen");
		let new_value = {
			let op_ref = self.op.borrow();
			op_ref
				.as_ref()
				.expect("a non-stolen computed node always has an operation")
				.evaluate()
		};
		let changed = !(self.eq)(&self.value.borrow(), &new_value);
		if changed {
			*self.value.borrow_mut() = new_value;
			self.core.graph().process_children(self_rc);
		}
	}
}

impl<T: 'static> SignalLike<T> for ComputedNode<T> {
	fn read(&self) -> Ref<'_, T> {
		self.value.borrow()
	}
	fn observable(&self) -> &Observable {
		&self.observable
	}
}

impl<T> Drop for ComputedNode<T> {
	fn drop(&mut self) {
		if !self.stolen.get() {
			if let Some(op) = self.op.borrow_mut().take() {
				op.detach(self.core.id());
			}
		}
	}
}
