pub mod core;
pub mod matrix;
pub mod student;
pub mod teacher;
