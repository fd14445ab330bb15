pub mod content;
pub mod image;
pub mod video;

pub use content::*;
pub use image::*;
pub use video::*;
