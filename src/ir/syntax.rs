use crate::{
	common::{FreeBinding, Index, Name},
	frontend::usage::usage,
	utility::bx,
};

/// A core term in locally nameless form: variables under a binder are de Bruijn indices, variables introduced
/// by opening a binder are `FreeRef`s.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Term {
	// Variables.
	BoundRef(Index),
	FreeRef(FreeBinding),

	// Dependent functions.
	Lam(Box<Self>),
	Pi(Param, Box<Self>),
	App(Box<Self>, Box<Self>),

	// Booleans.
	Bool(bool),
	BoolTy,

	// Universes; `Type : Type`.
	Type,

	// Let-expressions.
	Let(Param, Box<Self>, Box<Self>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Param {
	pub name: Name,
	pub ty: Box<Term>,
}

impl Param {
	pub fn new(name: Name, ty: Term) -> Self { Self { name, ty: bx!(ty) } }

	fn map(&self, f: &mut impl FnMut(usize, &Term) -> Term) -> Self { Self { name: self.name, ty: bx!(f(0, &self.ty)) } }
}

impl Term {
	pub fn lam(body: Self) -> Self { Self::Lam(bx!(body)) }

	pub fn pi(param: Param, body: Self) -> Self { Self::Pi(param, bx!(body)) }

	pub fn app(function: Self, argument: Self) -> Self { Self::App(bx!(function), bx!(argument)) }

	pub fn apply_all(function: Self, arguments: impl IntoIterator<Item = Self>) -> Self {
		arguments.into_iter().fold(function, Self::app)
	}

	/// Whether the term is already in weak-head normal form without looking any further.
	pub fn is_stable(&self) -> bool {
		matches!(self, Self::Type | Self::BoolTy | Self::Bool(_) | Self::Pi(..) | Self::Lam(_))
	}

	/// Whether the term is a type former.
	pub fn is_formation(&self) -> bool { matches!(self, Self::Pi(..) | Self::BoolTy | Self::Type) }

	/// Rebuilds this node with `f` applied to each immediate subterm. `f` also receives the number of binders
	/// between this node and the subterm.
	pub fn map(&self, mut f: impl FnMut(usize, &Self) -> Self) -> Self {
		match self {
			Self::BoundRef(_) | Self::FreeRef(_) | Self::Bool(_) | Self::BoolTy | Self::Type => self.clone(),
			Self::Lam(body) => Self::Lam(bx!(f(1, body))),
			Self::Pi(param, body) => {
				let param = param.map(&mut f);
				Self::Pi(param, bx!(f(1, body)))
			}
			Self::App(function, argument) => {
				let function = f(0, function);
				Self::App(bx!(function), bx!(f(0, argument)))
			}
			Self::Let(param, defined_as, body) => {
				let param = param.map(&mut f);
				let defined_as = f(0, defined_as);
				Self::Let(param, bx!(defined_as), bx!(f(1, body)))
			}
		}
	}

	/// Visits each immediate subterm in order.
	pub fn for_each(&self, mut f: impl FnMut(&Self)) {
		match self {
			Self::BoundRef(_) | Self::FreeRef(_) | Self::Bool(_) | Self::BoolTy | Self::Type => (),
			Self::Lam(body) => f(body),
			Self::Pi(param, body) => {
				f(&param.ty);
				f(body);
			}
			Self::App(function, argument) => {
				f(function);
				f(argument);
			}
			Self::Let(param, defined_as, body) => {
				f(&param.ty);
				f(defined_as);
				f(body);
			}
		}
	}

	/// Substitutes `term` for the variable bound by the binder this term is the body of.
	pub fn instantiate(&self, term: &Self) -> Self { self.replace(0, term) }

	/// Instantiates the body of a binder with a free variable.
	pub fn open(&self, binding: FreeBinding) -> Self { self.instantiate(&Self::FreeRef(binding)) }

	/// Abstracts every occurrence of `binding`, turning this term into the body of a binder.
	pub fn close(&self, binding: FreeBinding) -> Self { self.bind_at(binding, 0) }

	fn replace(&self, index: usize, term: &Self) -> Self {
		match self {
			Self::BoundRef(Index(i)) if *i == index => term.clone(),
			_ => self.map(|depth, t| t.replace(index + depth, term)),
		}
	}

	fn bind_at(&self, binding: FreeBinding, index: usize) -> Self {
		match self {
			Self::FreeRef(b) if *b == binding => Self::BoundRef(Index(index)),
			_ => self.map(|depth, t| t.bind_at(binding, index + depth)),
		}
	}

	/// Builds `let binding : ty := defined_as in body`, or just `body` if `binding` does not occur in it.
	pub fn make_let(binding: FreeBinding, ty: Self, defined_as: Self, body: Self) -> Self {
		if usage(binding, &body) > 0 {
			Self::Let(Param::new(binding.name, ty), bx!(defined_as), bx!(body.close(binding)))
		} else {
			tracing::debug!(binding = binding.id(), "eliminated dead let binding");
			body
		}
	}
}
