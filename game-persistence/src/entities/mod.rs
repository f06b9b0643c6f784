pub mod preferences;
pub mod prelude;
