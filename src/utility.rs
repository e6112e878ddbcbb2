macro_rules! bx {
	($x:expr) => {
		::std::boxed::Box::new($x)
	};
}

pub(crate) use bx;
