pub mod catalog;
pub mod chat;
pub mod gate;
pub mod practice;
pub mod setup;
pub mod timefmt;
pub mod transcript;
