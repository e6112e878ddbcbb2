pub mod matching;
pub mod presyntax;
pub mod syntax;
