use crate::{
	common::FreeBinding,
	frontend::{
		context::{Definition, LocalContext, LocalDefinitions, ScopeError},
		conversion::Conversion,
		normalize::{peel_lets, rewrap_lets, whnf},
		resolve::{resolve, ResolveError, Scope},
		usage::census,
	},
	ir::{
		presyntax::{Expr, LetBind},
		syntax::{Param, Term},
	},
};

/// Resolves and elaborates `expr` against the type denoted by `ty`, both in the empty context.
pub fn elaborate(expr: &Expr, ty: &Expr) -> Result<Annotated, ElaborationError> {
	let expr = resolve(expr, &Scope::Empty)?;
	let ty = resolve(ty, &Scope::Empty)?;

	let mut tycker = ExprTycker::new();
	let ty = tycker.ty(&ty)?;
	let term = tycker.inherit(&expr, &ty)?;
	debug_assert!(census(&term).is_empty(), "free variable escaped elaboration: {term:?}");
	debug_assert!(census(&ty).is_empty(), "free variable escaped elaboration: {ty:?}");
	Ok(Annotated { term, ty })
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ElaborationError {
	#[error(transparent)]
	Scope(#[from] ScopeError),
	#[error(transparent)]
	Resolve(#[from] ResolveError),
	#[error("applied a term whose type is not a function type")]
	NotAFunction { function: Expr, ty: Term },
	#[error("expression does not have the expected type")]
	CheckingMismatch { expr: Expr, expected: Term },
	#[error("could not unify two terms")]
	UnificationFailure { lhs: Term, rhs: Term, ty: Option<Term> },
	#[error(transparent)]
	Internal(#[from] InternalError),
}

impl ElaborationError {
	/// Whether this error comes from a gap in the calculus rather than from the input.
	pub fn is_internal(&self) -> bool { matches!(self, Self::Internal(_)) }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InternalError {
	#[error("internal error: no rule to compare these terms")]
	NoComparisonRule { lhs: Term, rhs: Term },
	#[error("internal error: no rule to elaborate this expression")]
	NoElaborationRule(Expr),
	#[error("internal error: a lambda is never a type")]
	NotAType(Term),
}

/// An elaborated term together with its type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Annotated {
	pub term: Term,
	pub ty: Term,
}

#[derive(Debug, Clone, Copy)]
enum Mode<'t> {
	Type,
	Synthesize,
	Inherit(&'t Term),
}

/// A bidirectional elaborator from resolved expressions to core terms.
#[derive(Debug, Default)]
pub struct ExprTycker<'a> {
	pub context: LocalContext<'a>,
	pub definitions: LocalDefinitions<'a>,
}

impl<'a> ExprTycker<'a> {
	pub fn new() -> Self { Self::default() }

	fn subscoped<R>(&self, f: impl FnOnce(&mut ExprTycker) -> R) -> R {
		f(&mut ExprTycker { context: self.context.derive(), definitions: self.definitions.derive() })
	}

	pub fn whnf(&mut self, term: &Term) -> Term { whnf(term, &mut self.definitions) }

	/// Checks `lhs` and `rhs` for definitional equality, failing if they differ.
	pub fn unify_report(&self, lhs: &Term, rhs: &Term, ty: Option<&Term>) -> Result<(), ElaborationError> {
		let mut conversion = Conversion::new(self.context.derive(), self.definitions.derive());
		if conversion.check(lhs, rhs, ty)? {
			Ok(())
		} else {
			Err(ElaborationError::UnificationFailure { lhs: lhs.clone(), rhs: rhs.clone(), ty: ty.cloned() })
		}
	}

	/// Elaborates an expression that denotes a type.
	pub fn ty(&mut self, expr: &Expr) -> Result<Term, ElaborationError> {
		tracing::trace!(?expr, "ty");
		Ok(match expr {
			Expr::Type => Term::Type,
			Expr::BoolTy => Term::BoolTy,
			Expr::Pi(param, last) => {
				let domain = self.ty(&param.ty)?;
				let codomain = self.subscoped(|scope| {
					scope.context.set(param.binding, domain.clone())?;
					scope.ty(last)
				})?;
				Term::pi(Param::new(param.binding.name, domain), codomain.close(param.binding))
			}
			Expr::Let(bind, body) => self.elaborate_let(bind, body, Mode::Type)?.term,
			Expr::Sigma(..) => return Err(InternalError::NoElaborationRule(expr.clone()).into()),
			_ => self.inherit(expr, &Term::Type)?,
		})
	}

	/// Infers the type of an expression.
	pub fn synthesize(&mut self, expr: &Expr) -> Result<Annotated, ElaborationError> {
		tracing::trace!(?expr, "synthesize");
		Ok(match expr {
			Expr::Type => Annotated { term: Term::Type, ty: Term::Type },
			Expr::BoolTy => Annotated { term: Term::BoolTy, ty: Term::Type },
			Expr::Bool(b) => Annotated { term: Term::Bool(*b), ty: Term::BoolTy },
			Expr::Pi(..) => Annotated { term: self.ty(expr)?, ty: Term::Type },

			Expr::Ref(binding) => Annotated { term: Term::FreeRef(*binding), ty: self.type_of(*binding)? },

			Expr::App(function, argument) => {
				let Annotated { term: function_term, ty } = self.synthesize(function)?;
				self.subscoped(|scope| match peel_lets(&ty, &mut scope.definitions) {
					(peeled, Term::Pi(param, codomain)) => {
						let argument = scope.inherit(argument, &param.ty)?;
						let ty = rewrap_lets(&peeled, codomain.instantiate(&argument));
						Ok(Annotated { term: Term::app(function_term, rewrap_lets(&peeled, argument)), ty })
					}
					(peeled, ty) => Err(ElaborationError::NotAFunction {
						function: (**function).clone(),
						ty: rewrap_lets(&peeled, ty),
					}),
				})?
			}

			Expr::Let(bind, body) => self.elaborate_let(bind, body, Mode::Synthesize)?,

			Expr::Lam(..) | Expr::Sigma(..) | Expr::Tup(_) | Expr::RawRef(_) =>
				return Err(InternalError::NoElaborationRule(expr.clone()).into()),
		})
	}

	/// Checks an expression against a type.
	pub fn inherit(&mut self, expr: &Expr, ty: &Term) -> Result<Term, ElaborationError> {
		tracing::trace!(?expr, ?ty, "inherit");
		match expr {
			// The expected type may only be a function type under some definitions.
			Expr::Lam(binding, body) => self.subscoped(|scope| match peel_lets(ty, &mut scope.definitions) {
				(peeled, Term::Pi(param, codomain)) => {
					let body = scope.subscoped(|scope| {
						scope.context.set(*binding, *param.ty)?;
						scope.inherit(body, &codomain.open(*binding))
					})?;
					Ok(rewrap_lets(&peeled, Term::lam(body.close(*binding))))
				}
				_ => Err(ElaborationError::CheckingMismatch { expr: expr.clone(), expected: ty.clone() }),
			}),
			Expr::Let(bind, body) => Ok(self.elaborate_let(bind, body, Mode::Inherit(ty))?.term),
			_ => {
				let Annotated { term, ty: synthesized } = self.synthesize(expr)?;
				self.unify_report(&synthesized, ty, Some(&Term::Type))?;
				Ok(term)
			}
		}
	}

	fn elaborate_let(&mut self, bind: &LetBind, body: &Expr, mode: Mode) -> Result<Annotated, ElaborationError> {
		let ty = self.ty(&bind.ty)?;
		let value = self.inherit(&bind.defined_as, &ty)?;
		let body = self.subscoped(|scope| {
			scope.definitions.set(bind.binding, Definition::new(value.clone(), ty.clone()))?;
			Ok::<_, ElaborationError>(match mode {
				Mode::Type => Annotated { term: scope.ty(body)?, ty: Term::Type },
				Mode::Synthesize => scope.synthesize(body)?,
				Mode::Inherit(expected) => Annotated { term: scope.inherit(body, expected)?, ty: expected.clone() },
			})
		})?;
		Ok(Annotated {
			term: Term::make_let(bind.binding, ty.clone(), value.clone(), body.term),
			ty: Term::make_let(bind.binding, ty, value, body.ty),
		})
	}

	fn type_of(&self, binding: FreeBinding) -> Result<Term, ElaborationError> {
		match self.definitions.get(binding) {
			Ok(definition) => Ok(definition.ty.clone()),
			Err(_) => Ok(self.context.get(binding)?.clone()),
		}
	}

	/// Elaborates a definition into the definitions of this elaborator, so later expressions may refer to it.
	pub fn define(&mut self, binding: FreeBinding, ty: &Expr, defined_as: &Expr) -> Result<(), ElaborationError> {
		let ty = self.ty(ty)?;
		let value = self.inherit(defined_as, &ty)?;
		tracing::debug!(binding = binding.id(), "defined");
		Ok(self.definitions.set(binding, Definition::new(value, ty))?)
	}

	/// Wraps `term` in the definitions it depends on, closing it over them.
	pub fn close(&self, term: Term) -> Term { self.definitions.wrap(term) }
}
