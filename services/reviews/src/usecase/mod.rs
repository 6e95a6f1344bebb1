pub mod comment;
pub mod lookup;
pub mod review;
pub mod title;
pub mod user;
