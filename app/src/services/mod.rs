//! Application services: label generation, fonts, printing.

pub mod font;
pub mod label;
pub mod printer;
