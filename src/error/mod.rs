mod voe;

pub use voe::VoeError;
