//! `flatten` follows an outer signal-of-signals to whichever inner signal it currently names, and
//! re-tracks that inner signal whenever the outer one changes. The switch itself re-evaluates
//! against the newly named inner's *current* value immediately (§4.F, S4): if that value differs
//! from what the flattened signal held before the switch, the switch tick adopts it and pulses
//! like any other change; only a switch that happens to land on an equal value is silent.

use std::{cell::Cell, rc::Rc};

use arbor::{flatten, make_var, observe, Context, ObserverAction};

#[test]
fn flatten_tracks_the_currently_named_inner_signal() {
	let ctx = Context::new();
	let x = make_var(&ctx, 1);
	let y = make_var(&ctx, 2);

	let outer = make_var(&ctx, x.as_signal());
	let flattened = flatten(&ctx, &outer.as_signal());
	assert_eq!(*flattened.read(), 1);

	x.set(10);
	assert_eq!(*flattened.read(), 10, "still following x");

	outer.set(y.as_signal());
	assert_eq!(
		*flattened.read(),
		2,
		"the switch tick adopts y's current value immediately, since it differs from x's"
	);

	y.set(20);
	assert_eq!(*flattened.read(), 20, "now following y");

	x.set(999);
	assert_eq!(*flattened.read(), 20, "no longer following x");
}

#[test]
fn switching_to_an_inner_with_the_same_value_does_not_notify_observers() {
	let ctx = Context::new();
	let x = make_var(&ctx, 1);
	let y = make_var(&ctx, 1);

	let outer = make_var(&ctx, x.as_signal());
	let flattened = flatten(&ctx, &outer.as_signal());

	let notifications = Rc::new(Cell::new(0));
	let notifications_in_callback = notifications.clone();
	let _observer = observe(&ctx, &flattened, move |_value: &i32| {
		notifications_in_callback.set(notifications_in_callback.get() + 1);
		ObserverAction::Next
	});
	notifications.set(0);

	// y starts out equal to x's current value, so switching to it is not a value change even
	// though the switch itself still re-evaluates against y immediately.
	outer.set(y.as_signal());
	assert_eq!(notifications.get(), 0, "the switch landed on an equal value, so it doesn't pulse");

	y.set(20);
	assert_eq!(notifications.get(), 1);
	assert_eq!(*flattened.read(), 20);
}
