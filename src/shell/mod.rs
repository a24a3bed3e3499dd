pub mod safety;
pub mod viewer;
