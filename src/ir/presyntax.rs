use crate::{
	common::{FreeBinding, Name},
	utility::bx,
};

/// Surface syntax as handed over by a parser. Before resolution variables are `RawRef`s; afterwards every one of
/// them is a `Ref` to the binding that introduced it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Expr {
	// Universes.
	Type,

	// Booleans.
	BoolTy,
	Bool(bool),

	// Dependent functions.
	Pi(Param, Box<Self>),
	Lam(FreeBinding, Box<Self>),
	App(Box<Self>, Box<Self>),

	// Variables.
	RawRef(Name),
	Ref(FreeBinding),

	// Let-expressions.
	Let(LetBind, Box<Self>),

	// Dependent pairs; reserved.
	Sigma(Vec<Param>, Box<Self>),
	Tup(Vec<Self>),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Param {
	pub binding: FreeBinding,
	pub ty: Box<Expr>,
}

impl Param {
	pub fn new(binding: FreeBinding, ty: Expr) -> Self { Self { binding, ty: bx!(ty) } }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LetBind {
	pub binding: FreeBinding,
	pub ty: Box<Expr>,
	pub defined_as: Box<Expr>,
}

impl LetBind {
	pub fn new(binding: FreeBinding, ty: Expr, defined_as: Expr) -> Self {
		Self { binding, ty: bx!(ty), defined_as: bx!(defined_as) }
	}
}

impl Expr {
	pub fn pi(param: Param, last: Self) -> Self { Self::Pi(param, bx!(last)) }

	pub fn lam(binding: FreeBinding, body: Self) -> Self { Self::Lam(binding, bx!(body)) }

	pub fn app(function: Self, argument: Self) -> Self { Self::App(bx!(function), bx!(argument)) }

	pub fn let_in(bind: LetBind, body: Self) -> Self { Self::Let(bind, bx!(body)) }

	/// Folds `(a : A) (b : B) ... -> last` into nested `Pi`s, the first parameter outermost.
	pub fn pi_telescope<I>(params: I, last: Self) -> Self
	where
		I: IntoIterator<Item = Param>,
		I::IntoIter: DoubleEndedIterator,
	{
		params.into_iter().rev().fold(last, |body, param| Self::pi(param, body))
	}

	/// Applies `function` to each argument in turn, left to right.
	pub fn apply_all(function: Self, arguments: impl IntoIterator<Item = Self>) -> Self {
		arguments.into_iter().fold(function, Self::app)
	}
}
