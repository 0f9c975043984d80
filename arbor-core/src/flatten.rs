use std::{
	cell::{Ref, RefCell},
	rc::Rc,
};

use crate::{
	graph::Graph,
	node::{add_edge, AnyNode, NodeCore, NodeId},
	observable::Observable,
	signal::{SignalHandle, SignalLike},
};

/// A node that tracks whichever inner signal its outer signal currently points to.
///
/// On every tick it re-reads the outer signal; if the inner signal it names has changed, the
/// edges are re-pointed and this tick publishes no value change of its own (the newly-attached
/// inner, at its own level, is what drives the next tick that actually updates `value`). If the
/// inner signal is unchanged, this behaves like an ordinary computed node mirroring it.
pub struct FlattenNode<T> {
	core: NodeCore,
	observable: Observable,
	outer: Rc<dyn SignalLike<SignalHandle<T>>>,
	inner: RefCell<SignalHandle<T>>,
	value: RefCell<T>,
}

impl<T: 'static + Clone> FlattenNode<T> {
	pub(crate) fn new_raw(
		graph: Rc<Graph>,
		id: NodeId,
		outer: Rc<dyn SignalLike<SignalHandle<T>>>,
	) -> Rc<Self> {
		assert!(
			outer.same_graph(&graph),
			"attempted to flatten a signal that belongs to a different context"
		);
		let inner = outer.get();
		let value = inner.get();
		let node = Rc::new(Self {
			core: NodeCore::new(id, graph),
			observable: Observable::new(),
			outer: outer.clone(),
			inner: RefCell::new(inner.clone()),
			value: RefCell::new(value),
		});

		let node_any: Rc<dyn AnyNode> = node.clone();
		let outer_any: Rc<dyn AnyNode> = outer;
		add_edge(&outer_any, &node_any);
		let inner_any: Rc<dyn AnyNode> = inner.0;
		add_edge(&inner_any, &node_any);
		node
	}
}

impl<T: 'static + Clone + PartialEq> AnyNode for FlattenNode<T> {
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
		let new_inner = self.outer.get();
		let switched = new_inner != *self.inner.borrow();
		if switched {
			let old_inner = std::mem::replace(&mut *self.inner.borrow_mut(), new_inner.clone());
			self.core.graph().on_dynamic_detach(self_rc, &old_inner.0);
			self.core.graph().on_dynamic_attach(self_rc, &new_inner.0);
			return;
		}
		let candidate = new_inner.get();
		if candidate != *self.value.borrow() {
			*self.value.borrow_mut() = candidate;
			self.core.graph().process_children(self_rc);
		}
	}
}

impl<T: 'static + Clone + PartialEq> SignalLike<T> for FlattenNode<T> {
	fn read(&self) -> Ref<'_, T> {
		self.value.borrow()
	}
	fn observable(&self) -> &Observable {
		&self.observable
	}
}

impl<T> Drop for FlattenNode<T> {
	fn drop(&mut self) {
		let id = self.core.id();
		let outer_any: Rc<dyn AnyNode> = self.outer.clone();
		outer_any.remove_successor(id);
		let inner_any: Rc<dyn AnyNode> = self.inner.borrow().0.clone();
		inner_any.remove_successor(id);
	}
}
