use std::str::FromStr;

use bpaf::{construct, long, short, Parser};
use lamcore::{
	backend::case_tree::{build, coverage},
	common::FreeBinding,
	frontend::{
		context::{LocalContext, LocalDefinitions},
		conversion::Conversion,
		elaborate::{elaborate, Annotated, ElaborationError},
		normalize::whnf,
	},
	ir::{
		matching::{Matching, MatchingError, Parameter, Pattern, Signature},
		presyntax::{Expr, LetBind, Param},
		syntax::Term,
	},
	report::{display_error, display_matching_error, print_term},
};
use lasso::Rodeo;
use tracing_subscriber::EnvFilter;

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Scenario {
	CaseTree,
	Calculus,
	Let,
}

impl Scenario {
	const ALL: [Self; 3] = [Self::CaseTree, Self::Calculus, Self::Let];
}

impl FromStr for Scenario {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"case-tree" => Ok(Self::CaseTree),
			"calculus" => Ok(Self::Calculus),
			"let" => Ok(Self::Let),
			_ => Err(format!("unknown scenario `{s}`; expected one of: case-tree, calculus, let")),
		}
	}
}

struct Options {
	scenarios: Vec<Scenario>,
	verbosity: usize,
}

fn options() -> Options {
	let scenarios = long("scenario")
		.help("Run only this scenario: case-tree, calculus or let (repeatable)")
		.argument::<Scenario>("NAME")
		.many();
	let verbosity = short('v')
		.long("verbose")
		.help("Log more; repeat for more detail (RUST_LOG takes precedence)")
		.req_flag(())
		.many()
		.map(|flags| flags.len());
	construct!(Options { scenarios, verbosity }).to_options().run()
}

fn main() {
	let options = options();

	let level = match options.verbosity {
		0 => "warn",
		1 => "info",
		2 => "debug",
		_ => "trace",
	};
	let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
	tracing_subscriber::fmt().with_env_filter(filter).with_writer(std::io::stderr).init();

	let scenarios = if options.scenarios.is_empty() { Scenario::ALL.to_vec() } else { options.scenarios };
	for scenario in scenarios {
		match scenario {
			Scenario::CaseTree => case_tree(),
			Scenario::Calculus => calculus(),
			Scenario::Let => let_conversion(),
		}
		println!();
	}
}

fn case_tree() {
	// def plus (n m : Nat) : Nat
	// | zro, b => b
	// | suc a, b => suc (plus a b)
	fn plus(signature: &mut Signature) -> Result<Matching, MatchingError> {
		let nat = signature.destructible("Nat");
		let zro = signature.constructor(nat, "zro", [])?;
		let suc = signature.constructor(nat, "suc", [nat])?;
		Matching::from_rows(signature, vec![Parameter::new("n", nat), Parameter::new("m", nat)], [
			vec![Pattern::con(signature, zro, vec![])?, "b".into()],
			vec![Pattern::con(signature, suc, vec!["a".into()])?, "b".into()],
		])
	}

	println!("Case tree:");
	let mut signature = Signature::new();
	let matching = match plus(&mut signature) {
		Ok(x) => x,
		Err(e) => {
			eprintln!("{}", display_matching_error(&e, &signature));
			std::process::exit(1)
		}
	};
	let tree = build(&signature, 0, &matching);
	println!("{}", tree.display(&signature));
	let coverage = coverage(&tree, &matching);
	println!("Uncovered paths: {}, shadowed clauses: {:?}", coverage.uncovered.len(), coverage.shadowed);
}

fn calculus() {
	let mut interner = Rodeo::new();
	let mut fresh = |name: &str| FreeBinding::fresh(interner.get_or_intern(name));

	// λA. λa. λb. b : (A : Type) -> (a : A) -> (b : A) -> A
	let (a_ty, a, b) = (fresh("A"), fresh("a"), fresh("b"));
	let (a_ty_lam, a_lam, b_lam) = (fresh("A"), fresh("a"), fresh("b"));
	let ty = Expr::pi_telescope(
		[Param::new(a_ty, Expr::Type), Param::new(a, Expr::Ref(a_ty)), Param::new(b, Expr::Ref(a_ty))],
		Expr::Ref(a_ty),
	);
	let expr = Expr::lam(a_ty_lam, Expr::lam(a_lam, Expr::lam(b_lam, Expr::Ref(b_lam))));

	println!("Calculus:");
	let Annotated { term, ty } = report_or_exit(elaborate(&expr, &ty), &interner);
	println!("Elaborated term: {}", print_term(&term, &interner));
	println!("Type: {}", print_term(&ty, &interner));

	let applied = Term::apply_all(term, [Term::BoolTy, Term::Bool(true), Term::Bool(false)]);
	println!("Applied to (Bool, true, false): {}", print_term(&whnf(&applied, &mut LocalDefinitions::new()), &interner));
}

fn let_conversion() {
	let mut interner = Rodeo::new();
	let mut fresh = |name: &str| FreeBinding::fresh(interner.get_or_intern(name));

	// let f : (a : Bool) -> Bool := λa. a in f true
	let (f, a, a_lam, b) = (fresh("f"), fresh("a"), fresh("a"), fresh("b"));
	let lhs = Expr::let_in(
		LetBind::new(f, Expr::pi(Param::new(a, Expr::BoolTy), Expr::BoolTy), Expr::lam(a_lam, Expr::Ref(a_lam))),
		Expr::app(Expr::Ref(f), Expr::Bool(true)),
	);
	// let b : Bool := false in true
	let rhs = Expr::let_in(LetBind::new(b, Expr::BoolTy, Expr::Bool(false)), Expr::Bool(true));

	println!("Let and conversion:");
	let lhs = report_or_exit(elaborate(&lhs, &Expr::BoolTy), &interner).term;
	let rhs = report_or_exit(elaborate(&rhs, &Expr::BoolTy), &interner).term;
	println!("Left: {}", print_term(&lhs, &interner));
	println!("Right: {}", print_term(&rhs, &interner));

	let mut conversion = Conversion::new(LocalContext::new(), LocalDefinitions::new());
	let equal = report_or_exit(conversion.check(&lhs, &rhs, Some(&Term::BoolTy)), &interner);
	println!("Definitionally equal at Bool: {equal}");
}

fn report_or_exit<T>(result: Result<T, ElaborationError>, interner: &Rodeo) -> T {
	match result {
		Ok(x) => x,
		Err(e) => {
			eprintln!("{}", display_error(&e, interner));
			std::process::exit(1)
		}
	}
}
