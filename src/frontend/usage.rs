use indexmap::IndexMap;

use crate::{common::FreeBinding, ir::syntax::Term};

/// Counts the occurrences of `binding` in `term`.
pub fn usage(binding: FreeBinding, term: &Term) -> usize {
	match term {
		Term::FreeRef(b) => usize::from(*b == binding),
		_ => {
			let mut count = 0;
			term.for_each(|t| count += usage(binding, t));
			count
		}
	}
}

/// Counts the occurrences of every free variable in `term`, in order of first appearance.
pub fn census(term: &Term) -> IndexMap<FreeBinding, usize> {
	fn go(accumulator: &mut IndexMap<FreeBinding, usize>, term: &Term) {
		match term {
			Term::FreeRef(b) => *accumulator.entry(*b).or_insert(0) += 1,
			_ => term.for_each(|t| go(accumulator, t)),
		}
	}

	let mut accumulator = IndexMap::new();
	go(&mut accumulator, term);
	accumulator
}
