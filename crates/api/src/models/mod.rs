pub mod controller;
pub mod name;
pub mod template;

pub use controller::*;
pub use name::*;
pub use template::*;
