// Domain models and display formatting shared by the toolkit library and binary.

pub mod models;
pub mod utils;
