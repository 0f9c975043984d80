//! Ergonomic single-threaded reactive signals, built on the [`arbor-core`](arbor_core) engine.
//!
//! A [`Context`] owns one reactive graph. [`Var`] is the only place values enter it; [`Signal`]
//! is a read handle onto a var, a computed expression (see [`expr`]), or a
//! [`flatten`]ed signal-of-signals; [`Observer`] runs a callback on every change to a signal for
//! as long as it stays attached.

pub mod expr;
mod observer;
mod var;

pub use arbor_core::{Context, ObserverAction, SignalHandle as Signal};
pub use observer::Observer;
pub use var::Var;

/// Creates a new input node in `ctx` holding `initial`.
pub fn make_var<T: 'static + Clone + PartialEq>(ctx: &Context, initial: T) -> Var<T> {
	Var::new(ctx.make_var(initial))
}

/// Follows `outer` to whichever signal it currently names, re-tracking it whenever `outer`
/// changes.
pub fn flatten<T: 'static + Clone + PartialEq>(ctx: &Context, outer: &Signal<Signal<T>>) -> Signal<T> {
	Signal::new(ctx.make_flatten(outer.0.clone()))
}

/// Registers `callback` to run once now and again every time `subject`'s value changes, until it
/// returns [`ObserverAction::StopAndDetach`] or the returned [`Observer`] is explicitly detached.
pub fn observe<T: 'static>(
	ctx: &Context,
	subject: &Signal<T>,
	callback: impl FnMut(&T) -> ObserverAction + 'static,
) -> Observer<T> {
	Observer::new(ctx.make_observer(subject.0.clone(), callback))
}
