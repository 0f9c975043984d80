//! Arithmetic operator sugar for [`arbor::expr::Expr`].
//!
//! `a + b * c` parses with Rust's own operator precedence, so `b * c` builds (and stays) as an
//! unpublished [`Expr`] node until the whole sum is combined — exactly the same tree you'd get
//! building it by hand with [`Expr::combine`], just without writing it out.

use std::ops::{Add, Div, Mul, Neg, Sub};

use arbor::expr::Expr;
use num_traits::{One, Zero};

impl<T> Add for Expr<T>
where
	T: Add<Output = T> + Clone + 'static,
{
	type Output = Expr<T>;
	fn add(self, rhs: Expr<T>) -> Expr<T> {
		self.combine(rhs, |a: &T, b: &T| a.clone() + b.clone())
	}
}

impl<T> Sub for Expr<T>
where
	T: Sub<Output = T> + Clone + 'static,
{
	type Output = Expr<T>;
	fn sub(self, rhs: Expr<T>) -> Expr<T> {
		self.combine(rhs, |a: &T, b: &T| a.clone() - b.clone())
	}
}

impl<T> Mul for Expr<T>
where
	T: Mul<Output = T> + Clone + 'static,
{
	type Output = Expr<T>;
	fn mul(self, rhs: Expr<T>) -> Expr<T> {
		self.combine(rhs, |a: &T, b: &T| a.clone() * b.clone())
	}
}

impl<T> Div for Expr<T>
where
	T: Div<Output = T> + Clone + 'static,
{
	type Output = Expr<T>;
	fn div(self, rhs: Expr<T>) -> Expr<T> {
		self.combine(rhs, |a: &T, b: &T| a.clone() / b.clone())
	}
}

impl<T> Neg for Expr<T>
where
	T: Neg<Output = T> + Clone + 'static,
{
	type Output = Expr<T>;
	fn neg(self) -> Expr<T> {
		self.map(|a: &T| -a.clone())
	}
}

/// Folds a list of expressions into one sum, `0` if the list is empty.
pub fn sum<T>(exprs: impl IntoIterator<Item = Expr<T>>) -> Expr<T>
where
	T: Add<Output = T> + Zero + Clone + 'static,
{
	exprs
		.into_iter()
		.fold(Expr::constant(T::zero()), |acc, next| acc + next)
}

/// Folds a list of expressions into one product, `1` if the list is empty.
pub fn product<T>(exprs: impl IntoIterator<Item = Expr<T>>) -> Expr<T>
where
	T: Mul<Output = T> + One + Clone + 'static,
{
	exprs
		.into_iter()
		.fold(Expr::constant(T::one()), |acc, next| acc * next)
}
