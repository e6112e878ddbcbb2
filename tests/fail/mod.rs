use lamcore::{
	common::Index,
	frontend::{
		context::ScopeError,
		elaborate::{elaborate, ElaborationError, ExprTycker, InternalError},
		resolve::ResolveError,
	},
	ir::{presyntax::Expr, syntax::Term},
};

use crate::common::{app, arrow, conversion, fresh, lam, let_in, name, raw, report};

fn fail(expr: &Expr, ty: &Expr) -> ElaborationError {
	match elaborate(expr, ty) {
		Ok(annotated) => panic!("elaboration unexpectedly succeeded: {annotated:?}"),
		Err(error) => error,
	}
}

#[test]
fn unresolved_symbols() {
	let error = fail(&raw("x"), &Expr::BoolTy);
	assert_eq!(error, ElaborationError::Resolve(ResolveError::UnresolvedSymbol(name("x"))));
	assert_eq!(report(&error), "resolution error: unresolved symbol `x`");

	// A let binding is not visible outside its body.
	let escaped = app(let_in("f", arrow(Expr::BoolTy, Expr::BoolTy), lam("a", raw("a")), raw("f")), [raw("f")]);
	assert_eq!(fail(&escaped, &Expr::BoolTy), ElaborationError::Resolve(ResolveError::UnresolvedSymbol(name("f"))));

	// Neither is a lambda parameter.
	let escaped = app(lam("y", raw("y")), [raw("y")]);
	assert!(matches!(fail(&escaped, &Expr::BoolTy), ElaborationError::Resolve(_)));
}

#[test]
fn variables_out_of_scope() {
	let v = fresh("v");
	let error = ExprTycker::new().synthesize(&Expr::Ref(v)).unwrap_err();
	assert_eq!(error, ElaborationError::Scope(ScopeError::NotInScope(v)));
	assert_eq!(report(&error), "elaboration error: `v` is not in scope");
	assert!(!error.is_internal());
}

#[test]
fn definitions_cannot_be_shadowed() {
	let v = fresh("v");
	let mut tycker = ExprTycker::new();
	tycker.define(v, &Expr::BoolTy, &Expr::Bool(true)).unwrap();
	let error = tycker.define(v, &Expr::BoolTy, &Expr::Bool(false)).unwrap_err();
	assert_eq!(error, ElaborationError::Scope(ScopeError::DuplicateBinding(v)));
	assert_eq!(report(&error), "elaboration error: `v` is bound twice");
}

#[test]
fn applying_a_non_function() {
	let error = fail(&app(Expr::Bool(true), [Expr::Bool(false)]), &Expr::BoolTy);
	assert_eq!(error, ElaborationError::NotAFunction { function: Expr::Bool(true), ty: Term::BoolTy });
	assert_eq!(report(&error), "elaboration error: cannot apply `true`\nits type is: Bool");
}

#[test]
fn lambda_against_a_non_function_type() {
	let error = fail(&lam("x", raw("x")), &Expr::BoolTy);
	assert!(matches!(&error, ElaborationError::CheckingMismatch { expected: Term::BoolTy, .. }));
	assert_eq!(report(&error), "elaboration error: type mismatch\nexpression: (λx. x)\nexpected: Bool");
}

#[test]
fn mismatched_types_fail_to_unify() {
	let error = fail(&Expr::Bool(true), &Expr::Type);
	assert_eq!(
		error,
		ElaborationError::UnificationFailure { lhs: Term::BoolTy, rhs: Term::Type, ty: Some(Term::Type) }
	);
	assert_eq!(report(&error), "elaboration error: could not unify\nleft: Bool\nright: Type\nat type: Type");

	// let f : Bool -> Bool := λa. a in f Type
	let bad_argument = let_in(
		"f",
		arrow(Expr::BoolTy, Expr::BoolTy),
		lam("a", raw("a")),
		app(raw("f"), [Expr::Type]),
	);
	assert_eq!(
		fail(&bad_argument, &Expr::BoolTy),
		ElaborationError::UnificationFailure { lhs: Term::Type, rhs: Term::BoolTy, ty: Some(Term::Type) }
	);
}

#[test]
fn unsupported_expressions_are_internal_errors() {
	// Lambdas are only checked, never synthesized.
	let error = fail(&app(lam("x", raw("x")), [Expr::Bool(true)]), &Expr::BoolTy);
	assert!(error.is_internal());
	assert!(matches!(&error, ElaborationError::Internal(InternalError::NoElaborationRule(Expr::Lam(..)))));
	assert_eq!(report(&error), "internal error: no rule to elaborate `(λx. x)`");

	let error = fail(&Expr::Tup(vec![Expr::Bool(true), Expr::Bool(false)]), &Expr::BoolTy);
	assert_eq!(report(&error), "internal error: no rule to elaborate `(true, false)`");

	let error = fail(&Expr::Bool(true), &Expr::Sigma(vec![], Box::new(Expr::BoolTy)));
	assert!(matches!(error, ElaborationError::Internal(InternalError::NoElaborationRule(Expr::Sigma(..)))));
}

#[test]
fn lambdas_have_no_untyped_comparison() {
	let id = Term::lam(Term::BoundRef(Index(0)));
	let error = conversion([]).check(&id, &id, None).unwrap_err();
	assert_eq!(error, ElaborationError::Internal(InternalError::NoComparisonRule { lhs: id.clone(), rhs: id }));
	assert_eq!(report(&error), "internal error: no rule to compare\nleft: (λ. ^0)\nright: (λ. ^0)");
}

#[test]
fn lambdas_are_not_types() {
	let id = Term::lam(Term::BoundRef(Index(0)));
	let error = conversion([]).check(&Term::Bool(true), &Term::Bool(true), Some(&id)).unwrap_err();
	assert_eq!(error, ElaborationError::Internal(InternalError::NotAType(id)));
	assert_eq!(report(&error), "internal error: `(λ. ^0)` is used as a type");
}
