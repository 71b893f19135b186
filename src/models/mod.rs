pub mod album;
pub mod album_model;
pub mod gallery_store;
pub mod notify;
pub mod picture;
pub mod picture_model;

pub use album::*;
pub use album_model::*;
pub use gallery_store::*;
pub use notify::*;
pub use picture::*;
pub use picture_model::*;
