use std::fmt;

use indexmap::IndexSet;

use crate::ir::matching::{Clause, ConId, DataType, Matching, Parameter, Pattern, Signature};

/// A decision tree node: dispatches on the constructor of the parameter at column `on`.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Mct {
	pub on: usize,
	pub name: String,
	/// One branch per constructor, in declaration order.
	pub clauses: Vec<(ConId, Body)>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Body {
	/// The clauses still matching at this point, in declaration order.
	Just(Vec<usize>),
	Case(Mct),
}

impl Body {
	/// The clause that fires at this leaf, which is the earliest one still matching.
	pub fn firing(&self) -> Option<usize> {
		match self {
			Self::Just(ids) => ids.iter().min().copied(),
			Self::Case(_) => None,
		}
	}

	pub fn display<'a>(&'a self, signature: &'a Signature) -> impl fmt::Display + 'a {
		BodyDisplay { body: self, signature, indent: 0 }
	}
}

/// Compiles a clause matrix into a decision tree, starting at column `on`.
///
/// `matching` must have been validated against `signature`.
pub fn build(signature: &Signature, on: usize, matching: &Matching) -> Body {
	compile(signature, on, matching.telescope(), matching.clauses().to_vec())
}

fn compile(signature: &Signature, on: usize, telescope: &[Parameter], clauses: Vec<Clause>) -> Body {
	let Some((parameter, rest)) = telescope.split_first() else {
		return Body::Just(clauses.iter().map(|clause| clause.id).collect());
	};

	let constructors = match signature.data(parameter.ty) {
		DataType::Destructible(constructors)
			if !clauses.iter().all(|clause| matches!(clause.patterns.first(), Some(Pattern::Bind(_)))) =>
			constructors,
		// Nothing to split on.
		_ => {
			let clauses = clauses
				.into_iter()
				.map(|clause| Clause { id: clause.id, patterns: clause.patterns.into_iter().skip(1).collect() })
				.collect();
			return compile(signature, on + 1, rest, clauses);
		}
	};

	tracing::debug!(on, name = %parameter.name, clauses = clauses.len(), "split");
	let branches = constructors
		.iter()
		.map(|&con| {
			let constructor = signature.con(con);
			let fields: Vec<_> = constructor
				.telescope
				.iter()
				.enumerate()
				.map(|(i, &ty)| Parameter::new(format!("{}_{i}", constructor.name), ty))
				.collect();
			let telescope: Vec<_> = fields.iter().chain(rest).cloned().collect();

			let clauses = clauses
				.iter()
				.filter_map(|clause| {
					let (first, others) = clause.patterns.split_first()?;
					let inner = match first {
						Pattern::Bind(name) => (0..fields.len()).map(|i| Pattern::Bind(format!("{name}_{i}"))).collect(),
						Pattern::Con(other, inner) if *other == con => inner.clone(),
						Pattern::Con(..) => return None,
					};
					Some(Clause { id: clause.id, patterns: inner.into_iter().chain(others.iter().cloned()).collect() })
				})
				.collect();

			(con, compile(signature, on + 1, &telescope, clauses))
		})
		.collect();

	Body::Case(Mct { on, name: parameter.name.clone(), clauses: branches })
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Coverage {
	/// Constructor paths that lead to a leaf no clause matches.
	pub uncovered: Vec<Vec<ConId>>,
	/// Clauses that never fire, in declaration order.
	pub shadowed: Vec<usize>,
}

impl Coverage {
	pub fn is_clean(&self) -> bool { self.uncovered.is_empty() && self.shadowed.is_empty() }
}

/// Finds the paths through `body` that no clause covers and the clauses of `matching` that never fire.
pub fn coverage(body: &Body, matching: &Matching) -> Coverage {
	fn walk(body: &Body, path: &mut Vec<ConId>, fired: &mut IndexSet<usize>, uncovered: &mut Vec<Vec<ConId>>) {
		match body {
			Body::Just(_) => match body.firing() {
				Some(id) => {
					fired.insert(id);
				}
				None => uncovered.push(path.clone()),
			},
			Body::Case(mct) =>
				for (con, body) in &mct.clauses {
					path.push(*con);
					walk(body, path, fired, uncovered);
					path.pop();
				},
		}
	}

	let mut fired = IndexSet::new();
	let mut uncovered = Vec::new();
	walk(body, &mut Vec::new(), &mut fired, &mut uncovered);

	let shadowed: Vec<_> =
		matching.clauses().iter().map(|clause| clause.id).filter(|id| !fired.contains(id)).collect();

	for path in &uncovered {
		tracing::warn!(?path, "no clause covers this path");
	}
	for id in &shadowed {
		tracing::warn!(clause = id, "clause never fires");
	}
	Coverage { uncovered, shadowed }
}

struct BodyDisplay<'a> {
	body: &'a Body,
	signature: &'a Signature,
	indent: usize,
}

impl fmt::Display for BodyDisplay<'_> {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self.body {
			Body::Just(ids) if ids.is_empty() => write!(f, "∅"),
			Body::Just(ids) => {
				let mut ids = ids.iter();
				if let Some(first) = ids.next() {
					write!(f, "{first}")?;
				}
				ids.try_for_each(|id| write!(f, ", {id}"))
			}
			Body::Case(mct) => {
				writeln!(f, "case {}({}) {{", mct.name, mct.on)?;
				for (con, body) in &mct.clauses {
					let nested = BodyDisplay { body, signature: self.signature, indent: self.indent + 2 };
					writeln!(f, "{:indent$}| {} => {nested}", "", self.signature.con(*con).name, indent = self.indent)?;
				}
				write!(f, "{:indent$}}}", "", indent = self.indent)
			}
		}
	}
}
