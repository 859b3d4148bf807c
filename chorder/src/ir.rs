pub mod batch;
pub mod tree;
