//! Data models for parsed statements.

pub mod statement;
