pub mod context;
pub mod conversion;
pub mod elaborate;
pub mod normalize;
pub mod resolve;
pub mod usage;
