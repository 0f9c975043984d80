use std::rc::Rc;

use arbor_core::ObserverNode;

/// A handle to a running observer.
///
/// The subject owns the underlying node, not this handle — dropping every `Observer` handle to
/// an observer does not detach it. Call [`detach`](Observer::detach) explicitly, or return
/// [`ObserverAction::StopAndDetach`](crate::ObserverAction::StopAndDetach) from the callback.
pub struct Observer<T>(Rc<ObserverNode<T>>);

impl<T: 'static> Observer<T> {
	pub(crate) fn new(node: Rc<ObserverNode<T>>) -> Self {
		Self(node)
	}

	/// Stops the callback from running again and severs its edge to the subject.
	///
	/// Panics on a double-detach, including detaching after the subject has already been dropped.
	pub fn detach(&self) {
		self.0.detach();
	}
}

impl<T> Clone for Observer<T> {
	fn clone(&self) -> Self {
		Observer(self.0.clone())
	}
}

impl<T> std::fmt::Debug for Observer<T> {
	fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
		f.debug_tuple("Observer").field(&arbor_core::AnyNode::id(&*self.0)).finish()
	}
}
