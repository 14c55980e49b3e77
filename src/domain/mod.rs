pub mod difficulty;
pub mod entity;
pub mod keeper;
pub mod shot;
