pub mod batch;
pub mod contact;
pub mod item;
pub mod user;
