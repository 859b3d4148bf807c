pub mod graph;
pub mod sort;
