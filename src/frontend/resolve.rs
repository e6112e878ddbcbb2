use crate::{
	common::{FreeBinding, Name},
	ir::presyntax::{Expr, LetBind, Param},
	utility::bx,
};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ResolveError {
	#[error("unresolved symbol")]
	UnresolvedSymbol(Name),
}

/// The variables visible to the resolver, innermost last.
#[derive(Debug, Clone, Copy)]
pub enum Scope<'s> {
	Empty,
	Bind(&'s Scope<'s>, FreeBinding),
}

impl<'s> Scope<'s> {
	pub fn bind(&'s self, binding: FreeBinding) -> Self { Self::Bind(self, binding) }

	pub fn get(&self, name: Name) -> Option<FreeBinding> {
		let mut scope = self;
		while let Self::Bind(parent, binding) = scope {
			if binding.name == name {
				return Some(*binding);
			}
			scope = parent;
		}
		None
	}
}

/// Rewrites every `RawRef` into a `Ref` to the nearest enclosing binder of that name.
pub fn resolve(expr: &Expr, scope: &Scope) -> Result<Expr, ResolveError> {
	Ok(match expr {
		Expr::Type | Expr::BoolTy | Expr::Bool(_) | Expr::Ref(_) => expr.clone(),

		Expr::RawRef(name) => Expr::Ref(scope.get(*name).ok_or(ResolveError::UnresolvedSymbol(*name))?),

		Expr::Pi(param, last) => Expr::Pi(resolve_param(param, scope)?, bx!(resolve(last, &scope.bind(param.binding))?)),
		Expr::Lam(binding, body) => Expr::Lam(*binding, bx!(resolve(body, &scope.bind(*binding))?)),
		Expr::App(function, argument) => Expr::app(resolve(function, scope)?, resolve(argument, scope)?),

		Expr::Let(bind, body) => Expr::Let(
			LetBind {
				binding: bind.binding,
				ty: bx!(resolve(&bind.ty, scope)?),
				defined_as: bx!(resolve(&bind.defined_as, scope)?),
			},
			bx!(resolve(body, &scope.bind(bind.binding))?),
		),

		Expr::Sigma(params, last) => return resolve_sigma(params, last, scope, Vec::new()),
		Expr::Tup(elements) =>
			Expr::Tup(elements.iter().map(|element| resolve(element, scope)).collect::<Result<_, _>>()?),
	})
}

fn resolve_param(param: &Param, scope: &Scope) -> Result<Param, ResolveError> {
	Ok(Param { binding: param.binding, ty: bx!(resolve(&param.ty, scope)?) })
}

// Each parameter sees the ones before it.
fn resolve_sigma(params: &[Param], last: &Expr, scope: &Scope, mut done: Vec<Param>) -> Result<Expr, ResolveError> {
	match params.split_first() {
		Some((param, rest)) => {
			done.push(resolve_param(param, scope)?);
			resolve_sigma(rest, last, &scope.bind(param.binding), done)
		}
		None => Ok(Expr::Sigma(done, bx!(resolve(last, scope)?))),
	}
}
