pub mod margin;
pub mod solver;
