use std::{
	hash::{Hash, Hasher},
	sync::atomic::{AtomicUsize, Ordering},
};

use lasso::Spur;

// de Bruijn index: zero is the newest bound parameter.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Index(pub usize);

pub type Name = Spur;

static NEXT_BINDING: AtomicUsize = AtomicUsize::new(0);

/// A free variable, compared by the identity it was minted with rather than by its display name.
#[derive(Clone, Copy, Debug)]
pub struct FreeBinding {
	id: usize,
	pub name: Name,
}

impl FreeBinding {
	/// Mints a binding distinct from every binding minted before it.
	pub fn fresh(name: Name) -> Self { Self { id: NEXT_BINDING.fetch_add(1, Ordering::Relaxed), name } }

	pub fn id(self) -> usize { self.id }
}

impl PartialEq for FreeBinding {
	fn eq(&self, other: &Self) -> bool { self.id == other.id }
}

impl Eq for FreeBinding {}

impl Hash for FreeBinding {
	fn hash<H: Hasher>(&self, state: &mut H) { self.id.hash(state) }
}
