use indexmap::IndexMap;

use crate::{common::FreeBinding, ir::syntax::Term};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ScopeError {
	#[error("binding #{} is not in scope", .0.id())]
	NotInScope(FreeBinding),
	#[error("binding #{} is already in scope", .0.id())]
	DuplicateBinding(FreeBinding),
}

/// A scope chain. A derived scope borrows its parent immutably, so nothing done to a child is visible from
/// the parent, and the child is released when it goes out of scope.
#[derive(Debug)]
pub struct Scoped<'p, V> {
	parent: Option<&'p Scoped<'p, V>>,
	entries: IndexMap<FreeBinding, V>,
}

/// The type of each variable in scope.
pub type LocalContext<'p> = Scoped<'p, Term>;

/// The value and type of each let-bound variable in scope, in the order they were bound.
pub type LocalDefinitions<'p> = Scoped<'p, Definition>;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Definition {
	pub value: Term,
	pub ty: Term,
}

impl Definition {
	pub fn new(value: Term, ty: Term) -> Self { Self { value, ty } }
}

impl<V> Default for Scoped<'_, V> {
	fn default() -> Self { Self { parent: None, entries: IndexMap::new() } }
}

impl<'p, V> Scoped<'p, V> {
	pub fn new() -> Self { Self::default() }

	pub fn derive(&self) -> Scoped<'_, V> { Scoped { parent: Some(self), entries: IndexMap::new() } }

	pub fn contains(&self, key: FreeBinding) -> bool { self.lookup(key).is_some() }

	pub fn get(&self, key: FreeBinding) -> Result<&V, ScopeError> {
		self.lookup(key).ok_or(ScopeError::NotInScope(key))
	}

	pub fn set(&mut self, key: FreeBinding, value: V) -> Result<(), ScopeError> {
		if self.contains(key) {
			return Err(ScopeError::DuplicateBinding(key));
		}
		self.entries.insert(key, value);
		Ok(())
	}

	/// Binds a key that was minted by the caller and so cannot already be in scope.
	pub(crate) fn bind_fresh(&mut self, key: FreeBinding, value: V) {
		debug_assert!(!self.contains(key), "freshly minted binding already in scope");
		self.entries.insert(key, value);
	}

	fn lookup(&self, key: FreeBinding) -> Option<&V> {
		self.entries.get(&key).or_else(|| self.parent.and_then(|parent| parent.lookup(key)))
	}

	/// Every binding in the chain, outermost scope first and each scope in insertion order. A binding that was
	/// overridden in an inner scope keeps its original position but reports the innermost value.
	pub fn bindings(&self) -> Vec<(FreeBinding, &V)> {
		let mut frames = Vec::new();
		let mut frame = Some(self);
		while let Some(current) = frame {
			frames.push(current);
			frame = current.parent;
		}

		let mut seen = IndexMap::new();
		for frame in frames.into_iter().rev() {
			for key in frame.entries.keys() {
				if !seen.contains_key(key) {
					if let Some(value) = self.lookup(*key) {
						seen.insert(*key, value);
					}
				}
			}
		}
		seen.into_iter().collect()
	}
}

impl LocalDefinitions<'_> {
	/// Replaces the value of a definition while keeping its type, returning the old value. A definition owned by
	/// an ancestor is shadowed in this scope instead.
	pub fn override_value(&mut self, key: FreeBinding, value: Term) -> Result<Term, ScopeError> {
		if let Some(definition) = self.entries.get_mut(&key) {
			return Ok(std::mem::replace(&mut definition.value, value));
		}
		let old = self.get(key)?.clone();
		self.entries.insert(key, Definition::new(value, old.ty));
		Ok(old.value)
	}

	/// Wraps `term` in the chain of definitions it depends on, dropping the rest.
	pub fn wrap(&self, term: Term) -> Term {
		self.bindings().into_iter().rev().fold(term, |body, (binding, definition)| {
			Term::make_let(binding, definition.ty.clone(), definition.value.clone(), body)
		})
	}
}
