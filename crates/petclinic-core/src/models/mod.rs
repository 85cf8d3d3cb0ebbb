//! Domain models for the petclinic system.

mod owner;
mod pet;
mod vet;
mod visit;

pub use owner::*;
pub use pet::*;
pub use vet::*;
pub use visit::*;
