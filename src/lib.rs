pub mod config;
pub mod db;
pub mod error;
pub mod poll;
pub mod server;

pub use error::VoeError;
pub use poll::{Editor, Vote, VoteFilter, VoteId};
