use std::{cell::RefCell, rc::Rc};

use crate::{
	node::{AnyNode, NodeId},
	observer::DynObserver,
};

/// The "Observable" mixin: every node kind that can be watched (var, computed,
/// flatten) embeds one of these alongside its [`NodeCore`](crate::node::NodeCore).
///
/// Observers are held strongly here — the subject owns them — which is why an observer stays
/// alive as long as its subject does, even if the caller drops every other handle to it.
pub(crate) struct Observable {
	observers: RefCell<Vec<Rc<dyn DynObserver>>>,
}

impl Observable {
	pub(crate) fn new() -> Self {
		Self {
			observers: RefCell::new(Vec::new()),
		}
	}

	pub(crate) fn register(&self, observer: Rc<dyn DynObserver>) {
		self.observers.borrow_mut().push(observer);
	}

	/// Linear-scans for the observer with the given id, removes it, and runs its teardown. No-op
	/// if it's not present (already removed, or never was).
	pub(crate) fn unregister(&self, id: NodeId) {
		let removed = {
			let mut observers = self.observers.borrow_mut();
			observers
				.iter()
				.position(|o| o.id() == id)
				.map(|pos| observers.remove(pos))
		};
		if let Some(observer) = removed {
			observer.detach_observer();
		}
	}
}

impl Drop for Observable {
	fn drop(&mut self) {
		for observer in self.observers.borrow().iter() {
			observer.detach_observer();
		}
	}
}
