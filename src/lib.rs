pub mod config;
pub mod constants;
pub mod kind;
pub mod location;
pub mod manager;
pub mod placement;
pub mod planners;
pub mod priority;
pub mod queries;
pub mod repair;
pub mod room;
pub mod sim;
pub mod terrain;

pub use config::*;
pub use kind::*;
pub use location::*;
pub use manager::*;
pub use room::*;
