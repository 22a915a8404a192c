pub mod member;
pub mod role;
pub mod stats;
pub mod visit;
