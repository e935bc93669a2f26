pub mod clock;
pub mod contest;
pub mod jwt;
pub mod window;
