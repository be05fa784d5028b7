pub mod guards;
pub mod pages;
pub mod router;
pub mod routes;

pub use router::{VoeState, voe_router};
