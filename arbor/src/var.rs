use std::{cell::Ref, rc::Rc};

use arbor_core::{SignalHandle, SignalLike, VarNode};

use crate::Signal;

/// A handle to an input node: the only place new values enter a [`Context`](crate::Context).
///
/// Cloning a `Var` clones the handle, not the node — both clones read and write the same
/// underlying value.
pub struct Var<T>(Rc<VarNode<T>>);

impl<T: 'static> Var<T> {
	pub(crate) fn new(node: Rc<VarNode<T>>) -> Self {
		Self(node)
	}

	pub fn read(&self) -> Ref<'_, T> {
		self.0.read()
	}
}

impl<T: 'static + Clone> Var<T> {
	pub fn get(&self) -> T {
		self.0.get()
	}
}

impl<T: 'static + Clone + PartialEq> Var<T> {
	/// Replaces the value, notifying dependents only if it's not equal to the current one.
	pub fn set(&self, value: T) {
		self.0.set(value);
	}

	/// Mutates the value in place. Unlike [`set`](Var::set), this always notifies dependents — the
	/// engine has no pre-mutation snapshot left to compare against once `f` has run.
	pub fn modify(&self, f: impl FnOnce(&mut T)) {
		self.0.modify(f);
	}

	/// A read-only handle onto this var, usable anywhere a [`Signal`] is expected.
	pub fn as_signal(&self) -> Signal<T> {
		SignalHandle::new(self.0.clone())
	}
}

impl<T> Clone for Var<T> {
	fn clone(&self) -> Self {
		Var(self.0.clone())
	}
}

impl<T> std::fmt::Debug for Var<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Var").field(&arbor_core::AnyNode::id(&*self.0)).finish()
	}
}
