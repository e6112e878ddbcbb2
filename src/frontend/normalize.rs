use crate::{
	common::FreeBinding,
	frontend::context::{Definition, LocalDefinitions},
	ir::syntax::Term,
};

/// Reduces a term to weak-head normal form, unfolding the definitions in scope.
///
/// Immediate subterms are normalized before the head is examined, so an application comes back with both its
/// function and its argument normalized. Formers and lambdas are returned untouched.
pub fn whnf(term: &Term, definitions: &mut LocalDefinitions) -> Term {
	match term {
		Term::Lam(_) | Term::Pi(..) | Term::Bool(_) | Term::BoolTy | Term::Type => term.clone(),

		Term::BoundRef(_) => term.clone(),

		Term::FreeRef(binding) => {
			let Ok(definition) = definitions.get(*binding) else { return term.clone() };
			let value = definition.value.clone();
			let value = whnf(&value, definitions);
			let memoized = definitions.override_value(*binding, value.clone());
			debug_assert!(memoized.is_ok(), "definition vanished while its value was normalized");
			value
		}

		Term::App(function, argument) => {
			tracing::trace!(?term, "whnf application");
			let function = whnf(function, definitions);
			let argument = whnf(argument, definitions);
			match function {
				Term::Lam(body) => whnf(&body.instantiate(&argument), definitions),
				function => Term::app(function, argument),
			}
		}

		Term::Let(param, defined_as, body) => {
			tracing::trace!(?term, "whnf let");
			let ty = whnf(&param.ty, definitions);
			let defined_as = whnf(defined_as, definitions);
			let binding = FreeBinding::fresh(param.name);
			let mut scope = definitions.derive();
			scope.bind_fresh(binding, Definition::new(defined_as.clone(), ty.clone()));
			let body = whnf(&body.open(binding), &mut scope);
			let defined_as = scope.get(binding).map_or(defined_as, |definition| definition.value.clone());
			Term::make_let(binding, ty, defined_as, body)
		}
	}
}

/// The leading lets moved out of a term by [`peel_lets`], outermost first.
pub type Peeled = Vec<(FreeBinding, Definition)>;

/// Normalizes `term` and moves each leading let into `definitions`, so the head of what is left can be
/// examined. The definitions must be discarded with the scope they were bound in; [`rewrap_lets`] restores them
/// around anything that escapes it.
pub fn peel_lets(term: &Term, definitions: &mut LocalDefinitions) -> (Peeled, Term) {
	let mut peeled = Vec::new();
	let mut term = whnf(term, definitions);
	while let Term::Let(param, defined_as, body) = term {
		let binding = FreeBinding::fresh(param.name);
		let definition = Definition::new(*defined_as, *param.ty);
		definitions.bind_fresh(binding, definition.clone());
		peeled.push((binding, definition));
		term = whnf(&body.open(binding), definitions);
	}
	(peeled, term)
}

/// Closes `term` over peeled definitions, dropping the ones it does not use.
pub fn rewrap_lets(peeled: &[(FreeBinding, Definition)], term: Term) -> Term {
	peeled.iter().rev().fold(term, |body, (binding, definition)| {
		Term::make_let(*binding, definition.ty.clone(), definition.value.clone(), body)
	})
}
