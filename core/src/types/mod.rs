//! Wire-format DTOs for the Ulule API.
//!
//! # Design
//! Every field the API may omit or send as `null` is an `Option`, so a missing
//! value is never confused with zero. Entity ids are the only required
//! fields. These types are defined independently from the mock-server's
//! schema; integration tests catch drift between the two.

mod meta;
mod order;
mod project;
mod user;

pub use meta::{Metadata, Page};
pub use order::{Address, ListOrderResponse, Order, OrderItem, OrderStatus};
pub use project::{ListProjectResponse, ListRewardResponse, Project, ProjectFilter, Reward};
pub use user::{ListSupporterResponse, Supporter, User};

use serde::{Deserialize, Deserializer};

/// Treat an explicit `null` like a missing field.
pub(crate) fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}
