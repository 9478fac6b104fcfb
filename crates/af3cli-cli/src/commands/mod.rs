pub mod build;
pub mod inspect;
pub mod screen;
