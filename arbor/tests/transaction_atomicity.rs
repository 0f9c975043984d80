//! Writes inside a transaction are batched: dependents see only the final state, and observers
//! fire once for the whole batch rather than once per write.

use std::{cell::Cell, rc::Rc};

use arbor::{expr::Expr, make_var, observe, Context, ObserverAction};

#[test]
fn batched_writes_propagate_as_one_wave() {
	let ctx = Context::new();
	let a = make_var(&ctx, 1);
	let b = make_var(&ctx, 2);
	let sum = Expr::leaf(&a.as_signal())
		.combine(Expr::leaf(&b.as_signal()), |x: &i32, y: &i32| x + y)
		.publish(&ctx);

	let seen = Rc::new(Cell::new(Vec::<i32>::new()));
	let seen_in_callback = seen.clone();
	let _observer = observe(&ctx, &sum, move |value: &i32| {
		let mut values = seen_in_callback.take();
		values.push(*value);
		seen_in_callback.set(values);
		ObserverAction::Next
	});
	seen.set(Vec::new()); // drop the initial registration run from the recorded history

	ctx.transaction(|| {
		a.set(10);
		b.set(20);
	});

	assert_eq!(*sum.read(), 30);
	assert_eq!(seen.take(), vec![30], "the observer should only see the settled sum, once");
}

#[test]
fn nested_transactions_only_commit_on_the_outermost_exit() {
	let ctx = Context::new();
	let a = make_var(&ctx, 1);
	let signal = a.as_signal();

	ctx.transaction(|| {
		ctx.transaction(|| {
			a.set(2);
		});
		// Still inside the outer transaction: `set` only stages a replacement value, so it isn't
		// visible until the outermost transaction commits and applies it.
		assert_eq!(*signal.read(), 1);
	});

	assert_eq!(*signal.read(), 2);
	assert!(ctx.is_settled());
}
