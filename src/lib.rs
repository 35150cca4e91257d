pub mod common;
pub mod errors;
pub mod extract;
pub mod operations;
pub mod params;
pub mod popup;
pub mod project;
pub mod value;
pub mod writer;
pub mod writers;
