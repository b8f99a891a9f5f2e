//! Cart: remote gateway, action façade, and the locally stored cart ID.

pub mod actions;
pub mod gateway;
pub mod identity;

pub use actions::CartActions;
pub use gateway::CartGateway;
pub use identity::{CartIdSlot, CartIdStore, CartIdentity, CookieSlot, InMemorySlot, SessionSlot};
