use std::{
	cell::{Cell, RefCell},
	rc::{Rc, Weak},
};

use crate::{
	graph::Graph,
	node::{add_edge, AnyNode, NodeCore, NodeId},
	signal::SignalLike,
};

/// What an observer's callback returns, telling the engine whether to keep watching.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObserverAction {
	Next,
	StopAndDetach,
}

/// A leaf consumer that runs a callback whenever its subject's value changes.
///
/// Holds only a weak reference to its subject: the subject owns the observer (via its
/// [`Observable`](crate::observable::Observable) mixin), not the other way around, so an observer
/// never keeps a signal alive past its last other handle.
pub struct ObserverNode<T> {
	core: NodeCore,
	subject: RefCell<Weak<dyn SignalLike<T>>>,
	callback: RefCell<Box<dyn FnMut(&T) -> ObserverAction>>,
	detached: Cell<bool>,
	self_weak: Weak<dyn DynObserver>,
}

impl<T: 'static> ObserverNode<T> {
	pub(crate) fn new_raw(
		graph: Rc<Graph>,
		id: NodeId,
		subject: Rc<dyn SignalLike<T>>,
		callback: Box<dyn FnMut(&T) -> ObserverAction>,
	) -> Rc<Self> {
		assert!(
			subject.same_graph(&graph),
			"attempted to observe a signal that belongs to a different context"
		);
		let node = Rc::new_cyclic(|weak_self: &Weak<ObserverNode<T>>| ObserverNode {
			core: NodeCore::new(id, graph),
			subject: RefCell::new(Rc::downgrade(&subject)),
			callback: RefCell::new(callback),
			detached: Cell::new(false),
			self_weak: weak_self.clone(),
		});

		let subject_any: Rc<dyn AnyNode> = subject.clone();
		let observer_any: Rc<dyn AnyNode> = node.clone();
		add_edge(&subject_any, &observer_any);
		subject.observable().register(node.clone());

		// Run once immediately, outside of any propagation wave, so the callback sees the current
		// value right away instead of waiting for the subject's next change.
		if node.fire() == ObserverAction::StopAndDetach {
			node.unregister_self();
		}
		node
	}

	/// Runs the callback against the subject's current value. Shared by the initial run at
	/// construction and by [`tick`](AnyNode::tick).
	fn fire(&self) -> ObserverAction {
		match self.subject.borrow().upgrade() {
			Some(subject) => {
				let value = subject.read();
				(self.callback.borrow_mut())(&value)
			}
			None => ObserverAction::Next,
		}
	}

	/// Explicitly detaches the observer: unregisters it from its subject (which severs the graph
	/// edge) and stops its callback from ever running again.
	///
	/// Panics on a double-detach — including detaching an observer whose subject has already been
	/// dropped, since the subject's teardown already detached it implicitly.
	pub fn detach(&self) {
		assert!(!self.detached.get(), "observer already detached");
		match self.subject.borrow().upgrade() {
			Some(subject) => subject.observable().unregister(self.core.id()),
			None => self.detached.set(true),
		}
	}
}

impl<T: 'static> AnyNode for ObserverNode<T> {
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
	fn push_successor(&self, successor: Weak<dyn AnyNode>) {
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
		if self.fire() == ObserverAction::StopAndDetach {
			self.core.graph().queue_detach(self.self_weak.clone());
		}
	}
}

/// The graph-facing half of an observer node: type-erased detach operations.
pub(crate) trait DynObserver: AnyNode {
	/// Invoked by the subject's `Observable` list when this observer is removed from it. Severs
	/// the graph edge and drops the weak subject reference. Idempotent.
	fn detach_observer(&self);
	/// Invoked by the graph at the end of a wave for observers whose callback returned
	/// `StopAndDetach`. Removes this observer from its subject's list, which in turn calls
	/// `detach_observer`. Idempotent, unlike the public `detach` — by the time the graph gets
	/// around to this, the observer may already have been detached some other way.
	fn unregister_self(&self);
}

impl<T: 'static> DynObserver for ObserverNode<T> {
	fn detach_observer(&self) {
		if self.detached.replace(true) {
			return;
		}
		if let Some(subject) = self.subject.borrow().upgrade() {
			let subject_any: Rc<dyn AnyNode> = subject;
			subject_any.remove_successor(self.core.id());
		}
		*self.subject.borrow_mut() = Weak::new();
	}

	fn unregister_self(&self) {
		if self.detached.get() {
			return;
		}
		match self.subject.borrow().upgrade() {
			Some(subject) => subject.observable().unregister(self.core.id()),
			None => self.detached.set(true),
		}
	}
}
