mod utility;

pub mod backend;
pub mod common;
pub mod frontend;
pub mod ir;
pub mod report;
