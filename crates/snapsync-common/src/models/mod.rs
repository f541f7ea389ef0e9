//! Domain models shared between the repositories and the API.
//!
//! Row types derive `sqlx::FromRow`; request types derive `Validate` and keep every
//! field optional so that absent fields surface as a 400 rather than a JSON rejection.

pub mod ack;
pub mod event;
pub mod image;
pub mod logs;
pub mod stats;
pub mod user;

pub use ack::*;
pub use event::*;
pub use image::*;
pub use logs::*;
pub use stats::*;
pub use user::*;
