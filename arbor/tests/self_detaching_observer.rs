//! An observer whose callback returns `ObserverAction::StopAndDetach` stops receiving further
//! notifications. Detachment is deferred until the end of the wave that triggered it, so it never
//! perturbs the propagation in progress.

use std::{cell::Cell, rc::Rc};

use arbor::{make_var, observe, Context, ObserverAction};

#[test]
fn stop_and_detach_ends_further_notifications() {
	let ctx = Context::new();
	let a = make_var(&ctx, 1);

	let calls = Rc::new(Cell::new(0));
	let calls_in_callback = calls.clone();
	let _observer = observe(&ctx, &a.as_signal(), move |_value: &i32| {
		let count = calls_in_callback.get() + 1;
		calls_in_callback.set(count);
		if count >= 2 {
			ObserverAction::StopAndDetach
		} else {
			ObserverAction::Next
		}
	});
	assert_eq!(calls.get(), 1, "the immediate run at registration counts as the first call");

	a.set(2);
	assert_eq!(calls.get(), 2, "second call asks to detach");

	a.set(3);
	assert_eq!(calls.get(), 2, "no further calls once detached");

	a.set(4);
	assert_eq!(calls.get(), 2);
	assert!(ctx.is_settled());
}

#[test]
fn detachment_is_deferred_to_the_end_of_the_wave() {
	let ctx = Context::new();
	let a = make_var(&ctx, 1);
	let b = make_var(&ctx, 1);

	// Two observers on independent signals, one of which detaches itself on its first in-wave
	// call (not the construction-time call, which must return `Next` or it would detach before
	// the transaction below ever runs). Batching both writes into a single transaction forces both
	// observers to fire within the same wave, exercising the deferred-unregister path instead of
	// the single-write fast path.
	let a_calls = Rc::new(Cell::new(0));
	let a_calls_in_callback = a_calls.clone();
	let a_past_construction = Rc::new(Cell::new(false));
	let a_past_construction_in_callback = a_past_construction.clone();
	let _observer_a = observe(&ctx, &a.as_signal(), move |_value: &i32| {
		a_calls_in_callback.set(a_calls_in_callback.get() + 1);
		if a_past_construction_in_callback.get() {
			ObserverAction::StopAndDetach
		} else {
			a_past_construction_in_callback.set(true);
			ObserverAction::Next
		}
	});

	let b_calls = Rc::new(Cell::new(0));
	let b_calls_in_callback = b_calls.clone();
	let _observer_b = observe(&ctx, &b.as_signal(), move |_value: &i32| {
		b_calls_in_callback.set(b_calls_in_callback.get() + 1);
		ObserverAction::Next
	});
	a_calls.set(0);
	b_calls.set(0);

	ctx.transaction(|| {
		a.set(2);
		b.set(2);
	});

	assert_eq!(a_calls.get(), 1);
	assert_eq!(b_calls.get(), 1);
	assert!(ctx.is_settled());

	b.set(3);
	assert_eq!(b_calls.get(), 2, "b's observer is unaffected by a's detaching");
}
