pub mod driver;
pub mod ease;
pub mod spring;
pub mod timing;
pub mod transition;
pub mod value;
