use std::fmt::Write as _;

use lasso::Resolver;

use crate::{
	common::{Index, Name},
	frontend::{
		context::ScopeError,
		elaborate::{ElaborationError, InternalError},
		resolve::ResolveError,
	},
	ir::{
		matching::{MatchingError, Signature},
		presyntax::Expr,
		syntax::Term,
	},
};

pub fn display_error(error: &ElaborationError, interner: &impl Resolver) -> String {
	match error {
		ElaborationError::Scope(ScopeError::NotInScope(binding)) =>
			format!("elaboration error: `{}` is not in scope", interner.resolve(&binding.name)),
		ElaborationError::Scope(ScopeError::DuplicateBinding(binding)) =>
			format!("elaboration error: `{}` is bound twice", interner.resolve(&binding.name)),
		ElaborationError::Resolve(ResolveError::UnresolvedSymbol(name)) =>
			format!("resolution error: unresolved symbol `{}`", interner.resolve(name)),
		ElaborationError::NotAFunction { function, ty } => format!(
			"elaboration error: cannot apply `{}`\nits type is: {}",
			print_expr(function, interner),
			print_term(ty, interner)
		),
		ElaborationError::CheckingMismatch { expr, expected } => format!(
			"elaboration error: type mismatch\nexpression: {}\nexpected: {}",
			print_expr(expr, interner),
			print_term(expected, interner)
		),
		ElaborationError::UnificationFailure { lhs, rhs, ty } => {
			let mut message = format!(
				"elaboration error: could not unify\nleft: {}\nright: {}",
				print_term(lhs, interner),
				print_term(rhs, interner)
			);
			if let Some(ty) = ty {
				let _ = write!(message, "\nat type: {}", print_term(ty, interner));
			}
			message
		}
		ElaborationError::Internal(InternalError::NoComparisonRule { lhs, rhs }) => format!(
			"internal error: no rule to compare\nleft: {}\nright: {}",
			print_term(lhs, interner),
			print_term(rhs, interner)
		),
		ElaborationError::Internal(InternalError::NoElaborationRule(expr)) =>
			format!("internal error: no rule to elaborate `{}`", print_expr(expr, interner)),
		ElaborationError::Internal(InternalError::NotAType(term)) =>
			format!("internal error: `{}` is used as a type", print_term(term, interner)),
	}
}

pub fn display_matching_error(error: &MatchingError, signature: &Signature) -> String {
	match error {
		MatchingError::PatternArity { constructor, expected, found } => format!(
			"matching error: `{}` takes {expected} patterns, but {found} were given",
			signature.con(*constructor).name
		),
		MatchingError::ForeignConstructor { constructor, expected } => {
			let constructor = signature.con(*constructor);
			format!(
				"matching error: `{}` is a constructor of `{}`, but a pattern of `{}` was expected",
				constructor.name,
				signature.data_name(constructor.data),
				signature.data_name(*expected)
			)
		}
		MatchingError::IndestructibleConstructor { data, name } =>
			format!("matching error: `{}` has no constructors, so `{name}` cannot be added", signature.data_name(*data)),
		_ => format!("matching error: {error}"),
	}
}

/// Prints a core term. Variables bound by lambdas have no names, so they print as their index.
pub fn print_term(term: &Term, interner: &impl Resolver) -> String {
	let mut string = String::new();
	write_term(&mut string, term, &mut Vec::new(), interner);
	string
}

fn write_term(out: &mut String, term: &Term, names: &mut Vec<Option<Name>>, interner: &impl Resolver) {
	match term {
		Term::BoundRef(Index(i)) => match names.len().checked_sub(i + 1).and_then(|level| names[level]) {
			Some(name) => out.push_str(interner.resolve(&name)),
			None => {
				let _ = write!(out, "^{i}");
			}
		},
		Term::FreeRef(binding) => out.push_str(interner.resolve(&binding.name)),
		Term::Lam(body) => {
			out.push_str("(λ. ");
			write_bound(out, body, names, None, interner);
			out.push(')');
		}
		Term::Pi(param, body) => {
			let _ = write!(out, "(({} : ", interner.resolve(&param.name));
			write_term(out, &param.ty, names, interner);
			out.push_str(") -> ");
			write_bound(out, body, names, Some(param.name), interner);
			out.push(')');
		}
		Term::App(function, argument) => {
			out.push('(');
			write_term(out, function, names, interner);
			out.push(' ');
			write_term(out, argument, names, interner);
			out.push(')');
		}
		Term::Bool(b) => {
			let _ = write!(out, "{b}");
		}
		Term::BoolTy => out.push_str("Bool"),
		Term::Type => out.push_str("Type"),
		Term::Let(param, defined_as, body) => {
			let _ = write!(out, "(let {} : ", interner.resolve(&param.name));
			write_term(out, &param.ty, names, interner);
			out.push_str(" := ");
			write_term(out, defined_as, names, interner);
			out.push_str(" in ");
			write_bound(out, body, names, Some(param.name), interner);
			out.push(')');
		}
	}
}

fn write_bound(
	out: &mut String,
	body: &Term,
	names: &mut Vec<Option<Name>>,
	name: Option<Name>,
	interner: &impl Resolver,
) {
	names.push(name);
	write_term(out, body, names, interner);
	names.pop();
}

pub fn print_expr(expr: &Expr, interner: &impl Resolver) -> String {
	match expr {
		Expr::Type => "Type".to_owned(),
		Expr::BoolTy => "Bool".to_owned(),
		Expr::Bool(b) => b.to_string(),
		Expr::Pi(param, last) => format!(
			"(({} : {}) -> {})",
			interner.resolve(&param.binding.name),
			print_expr(&param.ty, interner),
			print_expr(last, interner)
		),
		Expr::Lam(binding, body) => format!("(λ{}. {})", interner.resolve(&binding.name), print_expr(body, interner)),
		Expr::App(function, argument) =>
			format!("({} {})", print_expr(function, interner), print_expr(argument, interner)),
		Expr::RawRef(name) => interner.resolve(name).to_owned(),
		Expr::Ref(binding) => interner.resolve(&binding.name).to_owned(),
		Expr::Let(bind, body) => format!(
			"(let {} : {} := {} in {})",
			interner.resolve(&bind.binding.name),
			print_expr(&bind.ty, interner),
			print_expr(&bind.defined_as, interner),
			print_expr(body, interner)
		),
		Expr::Sigma(params, last) => {
			let mut string = "(Σ".to_owned();
			for param in params {
				let _ = write!(string, " ({} : {})", interner.resolve(&param.binding.name), print_expr(&param.ty, interner));
			}
			let _ = write!(string, ". {})", print_expr(last, interner));
			string
		}
		Expr::Tup(elements) =>
			format!("({})", elements.iter().map(|element| print_expr(element, interner)).collect::<Vec<_>>().join(", ")),
	}
}
