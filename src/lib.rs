pub mod flow;
pub mod parser;
