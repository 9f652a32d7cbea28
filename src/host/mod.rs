pub mod clock;
pub mod stage;
