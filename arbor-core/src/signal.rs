use std::{cell::Ref, rc::Rc};

use crate::{node::AnyNode, observable::Observable};

/// A node that carries a readable current value: the "Signal node" component. Implemented by
/// var, computed and flatten nodes, and the thing [`Operation`](crate::operation::Operation)
/// leaves and flatten's outer/inner edges are expressed in terms of.
pub trait SignalLike<T>: AnyNode {
	/// Borrows the current value without cloning it.
	fn read(&self) -> Ref<'_, T>;

	/// Returns a clone of the current value.
	fn get(&self) -> T
	where
		T: Clone,
	{
		self.read().clone()
	}

	/// The node's [`Observable`] mixin, used to register and unregister observers.
	fn observable(&self) -> &Observable;
}

/// A lightweight, identity-comparable handle to a signal node.
///
/// Signal equality compares node identity, not the value underneath —
/// two independently-constructed signals that happen to hold equal values right now are still
/// different signals. This type carries that contract once, at the engine level, rather than
/// leaving every signal-of-signal composition (flatten's outer, most directly) to reimplement it.
/// The public `Signal<T>` handle in the `arbor` crate is a thin wrapper around this.
pub struct SignalHandle<T>(pub Rc<dyn SignalLike<T>>);

impl<T> SignalHandle<T> {
	pub fn new(node: Rc<dyn SignalLike<T>>) -> Self {
		Self(node)
	}

	pub fn get(&self) -> T
	where
		T: Clone,
	{
		self.0.get()
	}

	pub fn read(&self) -> Ref<'_, T> {
		self.0.read()
	}
}

impl<T> Clone for SignalHandle<T> {
	fn clone(&self) -> Self {
		SignalHandle(self.0.clone())
	}
}

impl<T> PartialEq for SignalHandle<T> {
	fn eq(&self, other: &Self) -> bool {
		self.0.id() == other.0.id()
	}
}

impl<T> Eq for SignalHandle<T> {}

impl<T> std::fmt::Debug for SignalHandle<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("SignalHandle").field(&self.0.id()).finish()
	}
}
