//! Domain types and operations, independent of any concrete transport or engine.

pub mod communication;
pub mod hex;
pub mod site;
pub mod text;
