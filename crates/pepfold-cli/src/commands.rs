pub mod build;
pub mod fold;
