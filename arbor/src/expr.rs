//! The fusion builder behind operator sugar (`arbor-ops`) and anyone else composing expressions
//! by hand.
//!
//! C++ can tell a named value (`b`) apart from a short-lived temporary (`a + b`) by overloading on
//! rvalue vs. lvalue references, and uses that to let a chained expression steal a temporary's
//! internals instead of publishing a throwaway node for it. Rust has no such overload distinction,
//! so this module exposes the same idea as two explicit, differently-typed steps instead: an
//! [`Expr`] is a pure operation tree with no node behind it yet (safe to nest arbitrarily deep,
//! since nesting never allocates), and a [`Computed`] is a freshly published node that is still
//! exclusively owned. Moving a `Computed` into [`Computed::fuse`] is the "steal" step, and Rust's
//! ownership rules — not a runtime race — are what guarantee nobody else is looking at the node
//! being stolen from.

use std::rc::Rc;

use arbor_core::{ComputedNode, ConstOp, LeafOp, Op1, Op2, Op3, Operation, SignalHandle};

use crate::{Context, Signal};

/// An expression tree that has not been published as a node. Combinators consume expressions by
/// value and nest their operations into one larger tree, so a chain like `a + b * c` never
/// allocates an intermediate node for `b * c` — only [`publish`](Expr::publish) (or
/// [`into_computed`](Expr::into_computed)) ever creates one.
pub struct Expr<T>(Box<dyn Operation<T>>);

impl<T: 'static> Expr<T> {
	/// Wraps a fixed value with no dependencies.
	pub fn constant(value: T) -> Self
	where
		T: Clone,
	{
		Expr(Box::new(ConstOp::new(value)))
	}

	/// Reads one signal.
	pub fn leaf(signal: &Signal<T>) -> Self {
		Expr(Box::new(LeafOp::new(signal.clone())))
	}

	pub fn map<U: 'static>(self, f: impl Fn(&T) -> U + 'static) -> Expr<U> {
		Expr(Box::new(Op1::new(self.0, f)))
	}

	pub fn combine<D1: 'static, U: 'static>(self, other: Expr<D1>, f: impl Fn(&T, &D1) -> U + 'static) -> Expr<U> {
		Expr(Box::new(Op2::new(self.0, other.0, f)))
	}

	pub fn combine3<D1: 'static, D2: 'static, U: 'static>(
		self,
		other1: Expr<D1>,
		other2: Expr<D2>,
		f: impl Fn(&T, &D1, &D2) -> U + 'static,
	) -> Expr<U> {
		Expr(Box::new(Op3::new(self.0, other1.0, other2.0, f)))
	}

	/// Materializes this expression as a computed node, returned still exclusively owned so it
	/// can either be published or [fused](Computed::fuse) into a larger expression.
	pub fn into_computed(self, ctx: &Context) -> Computed<T>
	where
		T: PartialEq,
	{
		Computed(ctx.make_computed(self.0))
	}

	/// Like [`into_computed`](Expr::into_computed), with a custom equality gate in place of the
	/// default `PartialEq`-based one.
	pub fn into_computed_with_eq(self, ctx: &Context, eq: impl Fn(&T, &T) -> bool + 'static) -> Computed<T> {
		Computed(ctx.make_computed_with_eq(self.0, Box::new(eq)))
	}

	/// Publishes this expression as a signal — "binding to a name", the common case when the
	/// result will be read directly or held onto.
	pub fn publish(self, ctx: &Context) -> Signal<T>
	where
		T: PartialEq,
	{
		self.into_computed(ctx).into_signal()
	}
}

/// A freshly published computed node that hasn't been shared yet.
pub struct Computed<T>(Rc<ComputedNode<T>>);

impl<T: 'static> Computed<T> {
	/// Keeps this node published: wraps it as an ordinary, type-erased [`Signal`].
	pub fn into_signal(self) -> Signal<T> {
		SignalHandle::new(self.0)
	}

	/// Steals this node's operation back out to fold into a larger [`Expr`] instead of leaving it
	/// published on its own. Moving `self` here is what makes this sound: a `Computed` that's
	/// been handed to anyone else (stored, cloned, wrapped into a `Signal`) can no longer be
	/// named to call this.
	pub fn fuse(self) -> Expr<T> {
		Expr(self.0.steal_op())
	}
}
