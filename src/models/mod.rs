pub mod repository;
pub mod content;
pub mod aggregate;
pub mod classification;

pub use repository::*;
pub use content::*;
pub use aggregate::*;
pub use classification::*;
