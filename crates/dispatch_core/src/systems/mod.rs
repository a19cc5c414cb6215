pub mod assignment;
pub mod movement;
