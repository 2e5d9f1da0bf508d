//! The record source boundary: raw rows in, typed table records out.

pub mod row;
pub mod source;
pub mod tables;

pub use row::*;
pub use source::*;
pub use tables::*;
