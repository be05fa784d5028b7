pub mod client_addr;
pub mod rate_limit;

pub use client_addr::ClientAddr;
pub use rate_limit::ClientLimiter;
