pub mod post;
pub mod series;

pub use post::*;
pub use series::*;
