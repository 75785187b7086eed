//! Domain types for the departure board.
//!
//! This module contains the validated shapes every downstream consumer
//! works with. Types enforce their invariants at construction time, so
//! code that receives them can trust their validity.

mod connection;
mod error;
mod journey;
mod leg;
mod product;
mod station;

pub use connection::{Connection, CorrelationKey};
pub use error::DomainError;
pub use journey::Journey;
pub use leg::{Leg, Line};
pub use product::{ProductSet, TransportProduct, UnknownProduct};
pub use station::{InvalidStationId, StationId};
