use std::rc::Rc;

use crate::{graph::Graph, node::{AnyNode, NodeId, add_edge}, signal::SignalHandle};

/// The computation behind a computed node.
///
/// A tree of `Operation`s is built bottom-up and handed to a computed node at construction, which
/// may later steal it back out (see [`steal_op`](crate::computed::ComputedNode::steal_op)) to
/// fuse it into a larger operation instead of publishing an intermediate node for it.
///
/// `detach` only needs the successor's id, not a live handle to it, so that a computed node's
/// `Drop` impl (which has no `Rc<dyn AnyNode>` of itself to offer, only `&mut self`) can call it.
pub trait Operation<T> {
	/// Registers `successor` as a dependent of every leaf this operation reads from.
	fn attach(&self, successor: &Rc<dyn AnyNode>);
	/// Reverses [`attach`](Operation::attach) for the successor with this id.
	fn detach(&self, successor_id: NodeId);
	/// Recomputes the value from the current state of every leaf.
	fn evaluate(&self) -> T;
	/// Panics if any leaf this operation reads from belongs to a different graph than `graph`.
	fn assert_same_context(&self, graph: &Rc<Graph>);
}

/// An operation with no dependencies at all: it just hands back a fixed value every time.
/// Lets expression builders fold a constant into an otherwise-signal-driven tree without a
/// special case.
pub struct ConstOp<T>(T);

impl<T> ConstOp<T> {
	pub fn new(value: T) -> Self {
		Self(value)
	}
}

impl<T: Clone> Operation<T> for ConstOp<T> {
	fn attach(&self, _successor: &Rc<dyn AnyNode>) {}
	fn detach(&self, _successor_id: NodeId) {}
	fn evaluate(&self) -> T {
		self.0.clone()
	}
	fn assert_same_context(&self, _graph: &Rc<Graph>) {}
}

/// A trivial operation that just reads one signal. The base case every composite operation
/// bottoms out at.
pub struct LeafOp<T>(SignalHandle<T>);

impl<T> LeafOp<T> {
	pub fn new(signal: SignalHandle<T>) -> Self {
		Self(signal)
	}
}

impl<T: Clone> Operation<T> for LeafOp<T> {
	fn attach(&self, successor: &Rc<dyn AnyNode>) {
		let dependency: Rc<dyn AnyNode> = self.0 .0.clone();
		add_edge(&dependency, successor);
	}

	fn detach(&self, successor_id: NodeId) {
		self.0 .0.remove_successor(successor_id);
	}

	fn evaluate(&self) -> T {
		self.0.get()
	}

	fn assert_same_context(&self, graph: &Rc<Graph>) {
		assert!(
			self.0 .0.same_graph(graph),
			"attempted to compose signals that belong to different contexts"
		);
	}
}

/// A unary operation: one dependency operation, mapped through `f`.
pub struct Op1<D0, T, F> {
	dep0: Box<dyn Operation<D0>>,
	f: F,
	_t: std::marker::PhantomData<fn() -> T>,
}

impl<D0, T, F: Fn(&D0) -> T> Op1<D0, T, F> {
	pub fn new(dep0: Box<dyn Operation<D0>>, f: F) -> Self {
		Self {
			dep0,
			f,
			_t: std::marker::PhantomData,
		}
	}
}

impl<D0, T, F: Fn(&D0) -> T> Operation<T> for Op1<D0, T, F> {
	fn attach(&self, successor: &Rc<dyn AnyNode>) {
		self.dep0.attach(successor);
	}
	fn detach(&self, successor_id: NodeId) {
		self.dep0.detach(successor_id);
	}
	fn evaluate(&self) -> T {
		(self.f)(&self.dep0.evaluate())
	}
	fn assert_same_context(&self, graph: &Rc<Graph>) {
		self.dep0.assert_same_context(graph);
	}
}

/// A binary operation: two dependency operations, combined through `f`. This is the shape behind
/// `a + b`, `a * b`, and every other binary operator in `arbor-ops`.
pub struct Op2<D0, D1, T, F> {
	dep0: Box<dyn Operation<D0>>,
	dep1: Box<dyn Operation<D1>>,
	f: F,
	_t: std::marker::PhantomData<fn() -> T>,
}

impl<D0, D1, T, F: Fn(&D0, &D1) -> T> Op2<D0, D1, T, F> {
	pub fn new(dep0: Box<dyn Operation<D0>>, dep1: Box<dyn Operation<D1>>, f: F) -> Self {
		Self {
			dep0,
			dep1,
			f,
			_t: std::marker::PhantomData,
		}
	}
}

impl<D0, D1, T, F: Fn(&D0, &D1) -> T> Operation<T> for Op2<D0, D1, T, F> {
	fn attach(&self, successor: &Rc<dyn AnyNode>) {
		self.dep0.attach(successor);
		self.dep1.attach(successor);
	}
	fn detach(&self, successor_id: NodeId) {
		self.dep0.detach(successor_id);
		self.dep1.detach(successor_id);
	}
	fn evaluate(&self) -> T {
		let d0 = self.dep0.evaluate();
		let d1 = self.dep1.evaluate();
		(self.f)(&d0, &d1)
	}
	fn assert_same_context(&self, graph: &Rc<Graph>) {
		self.dep0.assert_same_context(graph);
		self.dep1.assert_same_context(graph);
	}
}

/// A ternary operation, for the rare combinator that genuinely needs three independent inputs
/// fused into one node rather than built out of nested [`Op2`]s.
pub struct Op3<D0, D1, D2, T, F> {
	dep0: Box<dyn Operation<D0>>,
	dep1: Box<dyn Operation<D1>>,
	dep2: Box<dyn Operation<D2>>,
	f: F,
	_t: std::marker::PhantomData<fn() -> T>,
}

impl<D0, D1, D2, T, F: Fn(&D0, &D1, &D2) -> T> Op3<D0, D1, D2, T, F> {
	pub fn new(dep0: Box<dyn Operation<D0>>, dep1: Box<dyn Operation<D1>>, dep2: Box<dyn Operation<D2>>, f: F) -> Self {
		Self {
			dep0,
			dep1,
			dep2,
			f,
			_t: std::marker::PhantomData,
		}
	}
}

impl<D0, D1, D2, T, F: Fn(&D0, &D1, &D2) -> T> Operation<T> for Op3<D0, D1, D2, T, F> {
	fn attach(&self, successor: &Rc<dyn AnyNode>) {
		self.dep0.attach(successor);
		self.dep1.attach(successor);
		self.dep2.attach(successor);
	}
	fn detach(&self, successor_id: NodeId) {
		self.dep0.detach(successor_id);
		self.dep1.detach(successor_id);
		self.dep2.detach(successor_id);
	}
	fn evaluate(&self) -> T {
		let d0 = self.dep0.evaluate();
		let d1 = self.dep1.evaluate();
		let d2 = self.dep2.evaluate();
		(self.f)(&d0, &d1, &d2)
	}
	fn assert_same_context(&self, graph: &Rc<Graph>) {
		self.dep0.assert_same_context(graph);
		self.dep1.assert_same_context(graph);
		self.dep2.assert_same_context(graph);
	}
}
