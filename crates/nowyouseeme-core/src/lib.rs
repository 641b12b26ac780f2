//! Client-side orchestration for the visualization gallery.
//!
//! This crate owns the upload pipeline (validate, encode, submit), the gallery
//! pipeline (fetch, order, state machine) and the card model both front ends
//! render from.

pub mod error;
pub mod gallery;
pub mod notify;
pub mod render;
pub mod upload;

pub use error::UploadError;
pub use gallery::{Gallery, GalleryState, RefreshTicket, load, sort_newest_first};
pub use notify::{ChangeNotifier, RefreshFlag};
pub use render::{Card, CardSection, SHORT_ID_LEN, SectionBody, TimelineEntry};
pub use upload::{UploadForm, UploadJob, submit};
