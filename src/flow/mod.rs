pub mod render;
pub mod tree;
pub mod types;
pub mod visit;
