mod error;
mod traits;

pub mod filesystem;

pub use error::MediaError;
pub use traits::{BoxReader, MediaKind, MediaStore, StoredMedia, media_file_name};
