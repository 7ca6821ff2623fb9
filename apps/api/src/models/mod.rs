pub mod catalog;
pub mod interaction;
