//! Domain models and the supplier-hierarchy rules of the trade network.

pub mod contact;
pub mod employee;
pub mod error;
pub mod hierarchy;
pub mod node;
pub mod product;

pub use contact::{Contact, ContactInput, ContactPatch};
pub use employee::Employee;
pub use error::ServiceError;
pub use node::{NetworkNode, NodeLevel};
pub use product::Product;
