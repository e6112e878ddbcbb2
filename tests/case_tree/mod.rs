use lamcore::{
	backend::case_tree::{build, coverage, Body, Mct},
	ir::matching::{Clause, DataType, Matching, MatchingError, Parameter, Pattern, Signature},
	report::display_matching_error,
};

use crate::common::{nat, Nat};

fn nat_pair(signature: &Signature, nat: &Nat, rows: Vec<Vec<Pattern>>) -> Matching {
	Matching::from_rows(signature, vec![Parameter::new("n", nat.data), Parameter::new("m", nat.data)], rows).unwrap()
}

#[test]
fn plus_splits_only_the_first_column() {
	// | zro, b => b
	// | suc a, b => suc (plus a b)
	let mut signature = Signature::new();
	let nat = nat(&mut signature);
	let zro = Pattern::con(&signature, nat.zro, vec![]).unwrap();
	let suc_a = Pattern::con(&signature, nat.suc, vec!["a".into()]).unwrap();
	let matching = nat_pair(&signature, &nat, vec![vec![zro, "b".into()], vec![suc_a, "b".into()]]);

	let tree = build(&signature, 0, &matching);
	assert_eq!(
		tree,
		Body::Case(Mct {
			on: 0,
			name: "n".to_owned(),
			clauses: vec![(nat.zro, Body::Just(vec![0])), (nat.suc, Body::Just(vec![1]))],
		})
	);
	insta::assert_snapshot!(tree.display(&signature).to_string(), @r"
	case n(0) {
	| zro => 0
	| suc => 1
	}
	");
	assert!(coverage(&tree, &matching).is_clean());
}

#[test]
fn nested_constructors_split_their_fields() {
	// | zro, zro
	// | zro, suc zro
	// | zro, suc (suc b)
	// | suc a, zro
	// | suc a, suc b
	let mut signature = Signature::new();
	let nat = nat(&mut signature);
	let con = |con, inner| Pattern::con(&signature, con, inner).unwrap();
	let rows = vec![
		vec![con(nat.zro, vec![]), con(nat.zro, vec![])],
		vec![con(nat.zro, vec![]), con(nat.suc, vec![con(nat.zro, vec![])])],
		vec![con(nat.zro, vec![]), con(nat.suc, vec![con(nat.suc, vec!["b".into()])])],
		vec![con(nat.suc, vec!["a".into()]), con(nat.zro, vec![])],
		vec![con(nat.suc, vec!["a".into()]), con(nat.suc, vec!["b".into()])],
	];
	let matching = nat_pair(&signature, &nat, rows);

	let tree = build(&signature, 0, &matching);
	insta::assert_snapshot!(tree.display(&signature).to_string(), @r"
	case n(0) {
	| zro => case m(1) {
	  | zro => 0
	  | suc => case suc_0(2) {
	    | zro => 1
	    | suc => 2
	    }
	  }
	| suc => case m(2) {
	  | zro => 3
	  | suc => 4
	  }
	}
	");
	assert!(coverage(&tree, &matching).is_clean());
}

#[test]
fn catch_all_rows_are_duplicated_into_every_branch() {
	// | zro, zro
	// | a, suc b
	// | suc a, suc b
	let mut signature = Signature::new();
	let nat = nat(&mut signature);
	let con = |con, inner| Pattern::con(&signature, con, inner).unwrap();
	let rows = vec![
		vec![con(nat.zro, vec![]), con(nat.zro, vec![])],
		vec!["a".into(), con(nat.suc, vec!["b".into()])],
		vec![con(nat.suc, vec!["a".into()]), con(nat.suc, vec!["b".into()])],
	];
	let matching = nat_pair(&signature, &nat, rows);

	let tree = build(&signature, 0, &matching);
	insta::assert_snapshot!(tree.display(&signature).to_string(), @r"
	case n(0) {
	| zro => case m(1) {
	  | zro => 0
	  | suc => 1
	  }
	| suc => case m(2) {
	  | zro => ∅
	  | suc => 1, 2
	  }
	}
	");

	let Body::Case(root) = &tree else { panic!("expected a split, found {tree:?}") };
	let Body::Case(succ) = &root.clauses[1].1 else { panic!("expected a split under suc") };
	assert_eq!(succ.clauses[1].1, Body::Just(vec![1, 2]));
	assert_eq!(succ.clauses[1].1.firing(), Some(1));
	assert_eq!(succ.clauses[0].1.firing(), None);

	let coverage = coverage(&tree, &matching);
	assert_eq!(coverage.uncovered, vec![vec![nat.suc, nat.zro]]);
	assert_eq!(coverage.shadowed, vec![2]);
}

#[test]
fn indestructible_columns_are_skipped() {
	let mut signature = Signature::new();
	let int = signature.indestructible("Int");
	let nat = nat(&mut signature);
	let zro = Pattern::con(&signature, nat.zro, vec![]).unwrap();
	let suc = Pattern::con(&signature, nat.suc, vec!["c".into()]).unwrap();
	let matching = Matching::from_rows(
		&signature,
		vec![Parameter::new("x", int), Parameter::new("n", nat.data)],
		[vec!["a".into(), zro], vec!["b".into(), suc]],
	)
	.unwrap();

	insta::assert_snapshot!(build(&signature, 0, &matching).display(&signature).to_string(), @r"
	case n(1) {
	| zro => 0
	| suc => 1
	}
	");
}

#[test]
fn all_binds_terminate_in_a_single_leaf() {
	let mut signature = Signature::new();
	let nat = nat(&mut signature);
	let matching = nat_pair(&signature, &nat, vec![vec!["a".into(), "b".into()], vec!["c".into(), "d".into()]]);
	assert_eq!(build(&signature, 0, &matching), Body::Just(vec![0, 1]));
}

#[test]
fn clause_ids_are_kept_as_given() {
	let mut signature = Signature::new();
	let nat = nat(&mut signature);
	let zro = Pattern::con(&signature, nat.zro, vec![]).unwrap();
	let clauses = vec![Clause { id: 7, patterns: vec![zro] }, Clause { id: 9, patterns: vec!["n".into()] }];
	let matching = Matching::new(&signature, vec![Parameter::new("n", nat.data)], clauses).unwrap();
	assert_eq!(
		build(&signature, 0, &matching),
		Body::Case(Mct {
			on: 0,
			name: "n".to_owned(),
			clauses: vec![(nat.zro, Body::Just(vec![7, 9])), (nat.suc, Body::Just(vec![9]))],
		})
	);
}

#[test]
fn starting_column_offsets_every_node() {
	let mut signature = Signature::new();
	let nat = nat(&mut signature);
	let zro = Pattern::con(&signature, nat.zro, vec![]).unwrap();
	let matching = Matching::from_rows(&signature, vec![Parameter::new("k", nat.data)], [vec![zro]]).unwrap();
	insta::assert_snapshot!(build(&signature, 3, &matching).display(&signature).to_string(), @r"
	case k(3) {
	| zro => 0
	| suc => ∅
	}
	");
}

#[test]
fn matching_rejects_malformed_input() {
	let mut signature = Signature::new();
	let nat = nat(&mut signature);
	let boolean = signature.destructible("Bool");
	let tt = signature.constructor(boolean, "tt", []).unwrap();

	assert_eq!(Matching::from_rows(&signature, vec![], [vec![]]), Err(MatchingError::EmptyTelescope));

	let telescope = vec![Parameter::new("n", nat.data), Parameter::new("m", nat.data)];
	assert_eq!(
		Matching::from_rows(&signature, telescope.clone(), [vec!["a".into(), "b".into()], vec!["c".into()]]),
		Err(MatchingError::ClauseArity { clause: 1, expected: 2, found: 1 })
	);

	assert_eq!(
		Pattern::con(&signature, nat.suc, vec![]),
		Err(MatchingError::PatternArity { constructor: nat.suc, expected: 1, found: 0 })
	);

	let pattern = Pattern::con(&signature, tt, vec![]).unwrap();
	let error = Matching::from_rows(&signature, telescope.clone(), [vec![pattern, "b".into()]]).unwrap_err();
	assert_eq!(error, MatchingError::ForeignConstructor { constructor: tt, expected: nat.data });
	assert_eq!(
		display_matching_error(&error, &signature),
		"matching error: `tt` is a constructor of `Bool`, but a pattern of `Nat` was expected"
	);

	// Arity is checked again for patterns built by hand.
	let bad = Pattern::Con(nat.suc, vec![]);
	assert_eq!(
		Matching::from_rows(&signature, telescope, [vec![bad, "b".into()]]),
		Err(MatchingError::PatternArity { constructor: nat.suc, expected: 1, found: 0 })
	);
}

#[test]
fn indestructible_types_have_no_constructors() {
	let mut signature = Signature::new();
	let int = signature.indestructible("Int");
	let error = signature.constructor(int, "zero", []).unwrap_err();
	assert_eq!(
		display_matching_error(&error, &signature),
		"matching error: `Int` has no constructors, so `zero` cannot be added"
	);
}

#[test]
fn ids_from_another_signature_are_rejected() {
	let mut wider = Signature::new();
	nat(&mut wider);
	let boolean = wider.destructible("Bool");
	let tt = wider.constructor(boolean, "tt", []).unwrap();

	let mut narrower = Signature::new();
	let nat = nat(&mut narrower);

	assert_eq!(Pattern::con(&narrower, tt, vec![]), Err(MatchingError::UnknownConstructor(tt)));
	assert_eq!(
		Matching::from_rows(&narrower, vec![Parameter::new("b", boolean)], [vec!["x".into()]]),
		Err(MatchingError::UnknownData(boolean))
	);
	let error = Matching::from_rows(&narrower, vec![Parameter::new("n", nat.data)], [vec![Pattern::Con(tt, vec![])]])
		.unwrap_err();
	assert_eq!(error, MatchingError::UnknownConstructor(tt));
	assert_eq!(display_matching_error(&error, &narrower), "matching error: constructor #2 is not declared in this signature");

	assert_eq!(narrower.constructor(boolean, "ff", []), Err(MatchingError::UnknownData(boolean)));
	assert_eq!(narrower.constructor(nat.data, "pair", [nat.data, boolean]), Err(MatchingError::UnknownData(boolean)));
	// Nothing is added by a rejected declaration.
	assert_eq!(Pattern::con(&narrower, nat.suc, vec!["a".into()]), Ok(Pattern::Con(nat.suc, vec!["a".into()])));
	assert_eq!(narrower.data(nat.data), &DataType::Destructible(vec![nat.zro, nat.suc]));
}
