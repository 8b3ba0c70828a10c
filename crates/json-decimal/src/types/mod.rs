pub mod path;
pub mod rule;
