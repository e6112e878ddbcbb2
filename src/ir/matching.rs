/// A data type in a [`Signature`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct DataId(usize);

/// A constructor in a [`Signature`]. Two constructors are the same exactly when their ids are.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ConId(usize);

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum DataType {
	/// An opaque type with nothing to split on.
	Indestructible,
	/// A type with constructors, in declaration order.
	Destructible(Vec<ConId>),
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Constructor {
	pub name: String,
	pub data: DataId,
	/// The types of the fields.
	pub telescope: Vec<DataId>,
}

/// The data types and constructors a matching may refer to.
#[derive(Clone, Debug, Default)]
pub struct Signature {
	data: Vec<(String, DataType)>,
	constructors: Vec<Constructor>,
}

impl Signature {
	pub fn new() -> Self { Self::default() }

	pub fn indestructible(&mut self, name: impl Into<String>) -> DataId {
		self.data.push((name.into(), DataType::Indestructible));
		DataId(self.data.len() - 1)
	}

	/// Declares a type whose constructors are added afterwards, so they may refer to the type itself.
	pub fn destructible(&mut self, name: impl Into<String>) -> DataId {
		self.data.push((name.into(), DataType::Destructible(Vec::new())));
		DataId(self.data.len() - 1)
	}

	pub fn constructor(
		&mut self,
		data: DataId,
		name: impl Into<String>,
		telescope: impl IntoIterator<Item = DataId>,
	) -> Result<ConId, MatchingError> {
		let name = name.into();
		let telescope: Vec<_> = telescope.into_iter().collect();
		self.check_data(data)?;
		telescope.iter().try_for_each(|field| self.check_data(*field))?;

		let id = ConId(self.constructors.len());
		match &mut self.data[data.0].1 {
			DataType::Indestructible => return Err(MatchingError::IndestructibleConstructor { data, name }),
			DataType::Destructible(constructors) => constructors.push(id),
		}
		self.constructors.push(Constructor { name, data, telescope });
		Ok(id)
	}

	/// # Panics
	/// If `id` was not declared in this signature.
	pub fn data(&self, id: DataId) -> &DataType { &self.data[id.0].1 }

	/// # Panics
	/// If `id` was not declared in this signature.
	pub fn data_name(&self, id: DataId) -> &str { &self.data[id.0].0 }

	/// # Panics
	/// If `id` was not declared in this signature.
	pub fn con(&self, id: ConId) -> &Constructor { &self.constructors[id.0] }

	fn check_data(&self, id: DataId) -> Result<(), MatchingError> {
		if id.0 < self.data.len() { Ok(()) } else { Err(MatchingError::UnknownData(id)) }
	}

	fn get_con(&self, id: ConId) -> Result<&Constructor, MatchingError> {
		self.constructors.get(id.0).ok_or(MatchingError::UnknownConstructor(id))
	}
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Pattern {
	Bind(String),
	Con(ConId, Vec<Pattern>),
}

impl Pattern {
	pub fn bind(name: impl Into<String>) -> Self { Self::Bind(name.into()) }

	/// A constructor pattern, with one sub-pattern per field of the constructor.
	pub fn con(signature: &Signature, con: ConId, inner: Vec<Pattern>) -> Result<Self, MatchingError> {
		let expected = signature.get_con(con)?.telescope.len();
		if inner.len() != expected {
			return Err(MatchingError::PatternArity { constructor: con, expected, found: inner.len() });
		}
		Ok(Self::Con(con, inner))
	}

	fn check(&self, signature: &Signature, ty: DataId) -> Result<(), MatchingError> {
		let Self::Con(con, inner) = self else { return Ok(()) };
		let constructor = signature.get_con(*con)?;
		if constructor.data != ty {
			return Err(MatchingError::ForeignConstructor { constructor: *con, expected: ty });
		}
		if inner.len() != constructor.telescope.len() {
			return Err(MatchingError::PatternArity {
				constructor: *con,
				expected: constructor.telescope.len(),
				found: inner.len(),
			});
		}
		inner.iter().zip(&constructor.telescope).try_for_each(|(pattern, ty)| pattern.check(signature, *ty))
	}
}

impl From<&str> for Pattern {
	fn from(name: &str) -> Self { Self::bind(name) }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Parameter {
	pub name: String,
	pub ty: DataId,
}

impl Parameter {
	pub fn new(name: impl Into<String>, ty: DataId) -> Self { Self { name: name.into(), ty } }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Clause {
	/// The position of the clause in its original declaration.
	pub id: usize,
	pub patterns: Vec<Pattern>,
}

/// A clause matrix: one row of patterns per clause, one column per parameter.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Matching {
	telescope: Vec<Parameter>,
	clauses: Vec<Clause>,
}

impl Matching {
	pub fn new(signature: &Signature, telescope: Vec<Parameter>, clauses: Vec<Clause>) -> Result<Self, MatchingError> {
		if telescope.is_empty() {
			return Err(MatchingError::EmptyTelescope);
		}
		telescope.iter().try_for_each(|parameter| signature.check_data(parameter.ty))?;
		for clause in &clauses {
			if clause.patterns.len() != telescope.len() {
				return Err(MatchingError::ClauseArity {
					clause: clause.id,
					expected: telescope.len(),
					found: clause.patterns.len(),
				});
			}
			for (pattern, parameter) in clause.patterns.iter().zip(&telescope) {
				pattern.check(signature, parameter.ty)?;
			}
		}
		Ok(Self { telescope, clauses })
	}

	/// Numbers the rows in order.
	pub fn from_rows(
		signature: &Signature,
		telescope: Vec<Parameter>,
		rows: impl IntoIterator<Item = Vec<Pattern>>,
	) -> Result<Self, MatchingError> {
		let clauses = rows.into_iter().enumerate().map(|(id, patterns)| Clause { id, patterns }).collect();
		Self::new(signature, telescope, clauses)
	}

	pub fn telescope(&self) -> &[Parameter] { &self.telescope }

	pub fn clauses(&self) -> &[Clause] { &self.clauses }
}

#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum MatchingError {
	#[error("a matching needs at least one parameter")]
	EmptyTelescope,
	#[error("clause {clause} has {found} patterns, but there are {expected} parameters")]
	ClauseArity { clause: usize, expected: usize, found: usize },
	#[error("constructor pattern has {found} sub-patterns, but the constructor has {expected} fields")]
	PatternArity { constructor: ConId, expected: usize, found: usize },
	#[error("constructor pattern does not belong to the type of its column")]
	ForeignConstructor { constructor: ConId, expected: DataId },
	#[error("cannot add constructor `{name}` to an indestructible type")]
	IndestructibleConstructor { data: DataId, name: String },
	#[error("data type #{} is not declared in this signature", .0.0)]
	UnknownData(DataId),
	#[error("constructor #{} is not declared in this signature", .0.0)]
	UnknownConstructor(ConId),
}
