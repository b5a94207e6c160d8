//! Binary reading helpers.

pub mod cur;
#[macro_use]
pub mod fields;
pub mod quantize;
pub mod view;
