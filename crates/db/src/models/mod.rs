//! Row structs and write DTOs.

pub mod country;
