use std::rc::Rc;

use crate::{
	computed::ComputedNode,
	flatten::FlattenNode,
	graph::Graph,
	observer::{ObserverAction, ObserverNode},
	operation::Operation,
	signal::{SignalHandle, SignalLike},
	var::VarNode,
};

/// The façade over one reactive graph: owns it, and is the only way to open a transaction
/// or construct a node.
///
/// Every node belongs to exactly one `Context`; composing nodes from different contexts panics
/// (see each constructor below) rather than silently producing a graph with edges the scheduler
/// can't reason about.
pub struct Context {
	graph: Rc<Graph>,
}

impl Context {
	pub fn new() -> Self {
		Self { graph: Rc::new(Graph::new()) }
	}

	pub(crate) fn graph(&self) -> &Rc<Graph> {
		&self.graph
	}

	/// Runs `f`, batching any var writes it makes into one transaction: they're staged rather than
	/// applied immediately, and propagate together as a single wave once `f` returns.
	/// Returns `f`'s result.
	pub fn transaction<R>(&self, f: impl FnOnce() -> R) -> R {
		self.graph.transaction(f)
	}

	/// True once every staged write has been committed and every node that needed recomputing has
	/// ticked — i.e. no transaction is open and the scheduler's queue is empty.
	pub fn is_settled(&self) -> bool {
		self.graph.is_settled()
	}

	/// The number of nodes ever constructed in this context (construction only; never decremented
	/// on drop). Exists for diagnostics and tests, not for capacity planning.
	pub fn node_count(&self) -> usize {
		self.graph.node_count()
	}

	pub fn make_var<T: 'static>(&self, initial: T) -> Rc<VarNode<T>> {
		let id = self.graph.next_id();
		VarNode::new_raw(self.graph.clone(), id, initial)
	}

	pub fn make_computed<T: 'static>(&self, op: Box<dyn Operation<T>>) -> Rc<ComputedNode<T>>
	where
		T: PartialEq,
	{
		self.make_computed_with_eq(op, Box::new(|a: &T, b: &T| a == b))
	}

	pub fn make_computed_with_eq<T: 'static>(
		&self,
		op: Box<dyn Operation<T>>,
		eq: Box<dyn Fn(&T, &T) -> bool>,
	) -> Rc<ComputedNode<T>> {
		let id = self.graph.next_id();
		ComputedNode::new_raw(self.graph.clone(), id, op, eq)
	}

	pub fn make_flatten<T: 'static + Clone>(
		&self,
		outer: Rc<dyn SignalLike<SignalHandle<T>>>,
	) -> Rc<FlattenNode<T>>
	where
		T: PartialEq,
	{
		let id = self.graph.next_id();
		FlattenNode::new_raw(self.graph.clone(), id, outer)
	}

	pub fn make_observer<T: 'static>(
		&self,
		subject: Rc<dyn SignalLike<T>>,
		callback: impl FnMut(&T) -> ObserverAction + 'static,
	) -> Rc<ObserverNode<T>> {
		let id = self.graph.next_id();
		ObserverNode::new_raw(self.graph.clone(), id, subject, Box::new(callback))
	}
}

impl Default for Context {
	fn default() -> Self {
		Self::new()
	}
}

impl Clone for Context {
	fn clone(&self) -> Self {
		Self { graph: self.graph.clone() }
	}
}

impl PartialEq for Context {
	fn eq(&self, other: &Self) -> bool {
		Rc::ptr_eq(&self.graph, &other.graph)
	}
}

impl Eq for Context {}

impl std::fmt::Debug for Context {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_struct("Context")
			.field("node_count", &self.node_count())
			.field("settled", &self.is_settled())
			.finish()
	}
}
