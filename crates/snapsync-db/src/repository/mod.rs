//! Repository layer: query functions organized by table.

pub mod events;
pub mod images;
pub mod users;
