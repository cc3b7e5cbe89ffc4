pub mod components;
pub mod crossref;
pub mod filter;
pub mod normalize;
pub mod order;
pub mod renderer;
pub mod renders;
pub mod sections;
pub mod traits;

pub use components::*;
pub use crossref::*;
pub use filter::*;
pub use normalize::*;
pub use order::*;
pub use renderer::*;
pub use sections::*;
pub use traits::*;
