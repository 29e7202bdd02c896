//! Row structs and insert DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the table row
//! and, where the importer writes the table, a create DTO.

pub mod company;
pub mod phone;
