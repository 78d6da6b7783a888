pub mod file;
pub mod stdin;
pub mod tables;
