//! SeaORM entities for the whale tracking tables

pub mod balance;
pub mod whale;
