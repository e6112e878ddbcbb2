use crate::{
	common::FreeBinding,
	frontend::{
		context::{LocalContext, LocalDefinitions},
		elaborate::{ElaborationError, InternalError},
		normalize::{peel_lets, rewrap_lets, whnf},
	},
	ir::syntax::{Param, Term},
};

/// Decides definitional equality under a typing context and a set of local definitions.
pub struct Conversion<'a> {
	pub context: LocalContext<'a>,
	pub definitions: LocalDefinitions<'a>,
}

impl<'a> Conversion<'a> {
	pub fn new(context: LocalContext<'a>, definitions: LocalDefinitions<'a>) -> Self { Self { context, definitions } }

	fn subscoped<R>(&self, f: impl FnOnce(&mut Conversion) -> R) -> R {
		f(&mut Conversion { context: self.context.derive(), definitions: self.definitions.derive() })
	}

	fn whnf(&mut self, term: &Term) -> Term { whnf(term, &mut self.definitions) }

	/// Decides whether `lhs` and `rhs` are equal, at `ty` if it is given.
	///
	/// A mismatch is `Ok(false)`. An error means a term shape with no comparison rule or a variable out of scope.
	pub fn check(&mut self, lhs: &Term, rhs: &Term, ty: Option<&Term>) -> Result<bool, ElaborationError> {
		if let Some(inferred) = self.check_approximate(lhs, rhs)? {
			tracing::debug!(?lhs, "conversion fast path succeeded");
			return match ty {
				Some(ty) => self.check(&inferred, ty, None),
				None => Ok(true),
			};
		}

		let lhs = self.whnf(lhs);
		let rhs = self.whnf(rhs);
		let ty = ty.map(|ty| self.whnf(ty));
		tracing::trace!(?lhs, ?rhs, ?ty, "check");

		if [Some(&lhs), Some(&rhs), ty.as_ref()].into_iter().flatten().any(|t| matches!(t, Term::Let(..))) {
			self.subscoped(|scope| {
				let (_, lhs) = peel_lets(&lhs, &mut scope.definitions);
				let (_, rhs) = peel_lets(&rhs, &mut scope.definitions);
				let ty = ty.map(|ty| peel_lets(&ty, &mut scope.definitions).1);
				scope.check_normal(&lhs, &rhs, ty.as_ref())
			})
		} else {
			self.check_normal(&lhs, &rhs, ty.as_ref())
		}
	}

	fn check_normal(&mut self, lhs: &Term, rhs: &Term, ty: Option<&Term>) -> Result<bool, ElaborationError> {
		match ty {
			Some(ty) => self.check_typed(lhs, rhs, ty),
			None => Ok(self.check_untyped(lhs, rhs)?.is_some()),
		}
	}

	fn check_typed(&mut self, lhs: &Term, rhs: &Term, ty: &Term) -> Result<bool, ElaborationError> {
		match ty {
			Term::Pi(param, codomain) => match (lhs, rhs) {
				(Term::Lam(lbody), Term::Lam(rbody)) => {
					let binding = FreeBinding::fresh(param.name);
					self.subscoped(|scope| {
						scope.context.bind_fresh(binding, (*param.ty).clone());
						scope.check(&lbody.open(binding), &rbody.open(binding), Some(&codomain.open(binding)))
					})
				}
				(Term::Lam(body), other) | (other, Term::Lam(body)) => self.check_lam(body, other, param, codomain),
				_ => Ok(self.check_untyped(lhs, rhs)?.is_some()),
			},

			Term::Lam(_) => Err(InternalError::NotAType(ty.clone()).into()),

			Term::Type if lhs.is_formation() => Ok(self.check_type(lhs, rhs)?.is_some()),
			// A type variable or a stuck application.
			Term::Type => Ok(self.check_untyped(lhs, rhs)?.is_some()),

			_ => match self.check_untyped(lhs, rhs)? {
				Some(inferred) => self.check(ty, &inferred, None),
				None => Ok(false),
			},
		}
	}

	// Eta: `λ. body` equals `other` when `body` equals `other x` for a fresh `x`.
	fn check_lam(&mut self, body: &Term, other: &Term, param: &Param, codomain: &Term) -> Result<bool, ElaborationError> {
		let binding = FreeBinding::fresh(param.name);
		self.subscoped(|scope| {
			scope.context.bind_fresh(binding, (*param.ty).clone());
			let expanded = Term::app(other.clone(), Term::FreeRef(binding));
			scope.check(&body.open(binding), &expanded, Some(&codomain.open(binding)))
		})
	}

	/// Compares two terms in weak-head normal form, returning the type they share.
	fn check_untyped(&mut self, lhs: &Term, rhs: &Term) -> Result<Option<Term>, ElaborationError> {
		Ok(match (lhs, rhs) {
			(Term::Pi(..) | Term::BoolTy | Term::Type, _) => self.check_type(lhs, rhs)?,

			(Term::App(lf, la), Term::App(rf, ra)) => self.check_app(lf, la, rf, ra)?,
			(Term::App(..), _) => None,

			(Term::FreeRef(l), Term::FreeRef(r)) if l == r => Some(self.type_of(*l)?),
			(Term::FreeRef(_), _) => None,

			(Term::Bool(l), Term::Bool(r)) if l == r => Some(Term::BoolTy),
			(Term::Bool(_), _) => None,

			(Term::BoundRef(_) | Term::Lam(_) | Term::Let(..), _) =>
				return Err(InternalError::NoComparisonRule { lhs: lhs.clone(), rhs: rhs.clone() }.into()),
		})
	}

	fn check_type(&mut self, lhs: &Term, rhs: &Term) -> Result<Option<Term>, ElaborationError> {
		Ok(match (lhs, rhs) {
			(Term::Pi(lparam, lcodomain), Term::Pi(rparam, rcodomain)) => {
				if !self.check(&lparam.ty, &rparam.ty, Some(&Term::Type))? {
					return Ok(None);
				}
				let binding = FreeBinding::fresh(lparam.name);
				let codomains = self.subscoped(|scope| {
					scope.context.bind_fresh(binding, (*lparam.ty).clone());
					scope.check(&lcodomain.open(binding), &rcodomain.open(binding), Some(&Term::Type))
				})?;
				codomains.then_some(Term::Type)
			}
			(Term::BoolTy, Term::BoolTy) | (Term::Type, Term::Type) => Some(Term::Type),
			_ => None,
		})
	}

	/// Compares two applications head first, returning the codomain of the head instantiated at the argument.
	fn check_app(&mut self, lf: &Term, la: &Term, rf: &Term, ra: &Term) -> Result<Option<Term>, ElaborationError> {
		let Some(head) = self.check_untyped(lf, rf)? else { return Ok(None) };
		// The head's type may only be a function type under some definitions.
		self.subscoped(|scope| match peel_lets(&head, &mut scope.definitions) {
			(peeled, Term::Pi(param, codomain)) => Ok(scope
				.check(la, ra, Some(&*param.ty))?
				.then(|| rewrap_lets(&peeled, codomain.instantiate(la)))),
			_ => Ok(None),
		})
	}

	// Compares two neutral spines without normalizing them first.
	fn check_approximate(&mut self, lhs: &Term, rhs: &Term) -> Result<Option<Term>, ElaborationError> {
		match (lhs, rhs) {
			(Term::App(lf, la), Term::App(rf, ra))
				if matches!(spine_head(lf), Term::FreeRef(_)) && matches!(spine_head(rf), Term::FreeRef(_)) =>
				self.check_app(lf, la, rf, ra),
			_ => Ok(None),
		}
	}

	fn type_of(&mut self, binding: FreeBinding) -> Result<Term, ElaborationError> {
		let ty = match self.definitions.get(binding) {
			Ok(definition) => definition.ty.clone(),
			Err(_) => self.context.get(binding)?.clone(),
		};
		Ok(self.whnf(&ty))
	}
}

fn spine_head(mut term: &Term) -> &Term {
	while let Term::App(function, _) = term {
		term = &**function;
	}
	term
}
