pub mod index;
pub mod scanner;
