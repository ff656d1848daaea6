//! Relation registry and resolver.
//!
//! Facts are declared pairwise and looked up through an order-independent
//! [`RelationKey`]. A pair either joins directly ([`DirectRelation`]) or only
//! through one junction model ([`RelationFact::Transitive`]).

mod fact;
mod key;
mod registry;
mod resolver;

pub use fact::{DirectRelation, RelationEnd, RelationFact};
pub use key::{KEY_SEPARATOR, RelationKey};
pub use registry::RelationRegistry;
pub use resolver::RelationResolver;
