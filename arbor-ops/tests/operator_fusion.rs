//! Operator overloads build on [`Expr`], so ordinary Rust operator precedence reproduces the
//! grouping a hand-built expression tree would have: `2 + 2 * 2` and `(2 + 2) * 2` are different
//! trees with different results, and neither publishes a node until the whole thing is finally
//! turned into a signal.

use arbor::{expr::Expr, make_var, Context};
use arbor_ops::{product, sum};

#[test]
fn precedence_matches_the_grouping_it_implies() {
	let ctx = Context::new();

	let multiplication_first = Expr::constant(2) + Expr::constant(2) * Expr::constant(2);
	let addition_first = (Expr::constant(2) + Expr::constant(2)) * Expr::constant(2);

	assert_eq!(*multiplication_first.publish(&ctx).read(), 2 + 2 * 2);
	assert_eq!(*addition_first.publish(&ctx).read(), (2 + 2) * 2);
}

#[test]
fn a_chained_expression_reacts_to_its_leaves() {
	let ctx = Context::new();
	let a = make_var(&ctx, 2);
	let b = make_var(&ctx, 3);
	let c = make_var(&ctx, 4);

	// a + b * c, built purely from operator overloads.
	let expr = Expr::leaf(&a.as_signal()) + Expr::leaf(&b.as_signal()) * Expr::leaf(&c.as_signal());
	let signal = expr.publish(&ctx);
	assert_eq!(*signal.read(), 2 + 3 * 4);

	c.set(10);
	assert_eq!(*signal.read(), 2 + 3 * 10);
}

#[test]
fn sum_and_product_fold_with_the_right_identity() {
	let ctx = Context::new();

	let empty_sum: Expr<i32> = sum(Vec::new());
	assert_eq!(*empty_sum.publish(&ctx).read(), 0);

	let empty_product: Expr<i32> = product(Vec::new());
	assert_eq!(*empty_product.publish(&ctx).read(), 1);

	let addends = vec![Expr::constant(1), Expr::constant(2), Expr::constant(3), Expr::constant(4)];
	assert_eq!(*sum(addends).publish(&ctx).read(), 10);

	let factors = vec![Expr::constant(1), Expr::constant(2), Expr::constant(3), Expr::constant(4)];
	assert_eq!(*product(factors).publish(&ctx).read(), 24);
}

#[test]
fn fusing_a_computed_back_into_an_expression_avoids_a_standalone_node() {
	let ctx = Context::new();
	let a = make_var(&ctx, 2);
	let b = make_var(&ctx, 5);

	// Publish `a + 1` on its own, then fuse it back into a larger expression instead of reading
	// it as a separately-tracked signal.
	let a_plus_one = (Expr::leaf(&a.as_signal()) + Expr::constant(1)).into_computed(&ctx);
	let fused = a_plus_one.fuse() * Expr::leaf(&b.as_signal());
	let signal = fused.publish(&ctx);

	assert_eq!(*signal.read(), (2 + 1) * 5);

	a.set(9);
	assert_eq!(*signal.read(), (9 + 1) * 5);
}
