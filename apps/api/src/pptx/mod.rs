// OOXML presentation package: writes a Deck as a .pptx zip and reads slide
// text back for verification.

mod parts;
#[allow(dead_code)]
pub mod reader;
mod slide;
pub mod writer;

pub use reader::read_package;
pub use writer::write_package;

pub const PPTX_MIME: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation";

/// Filename offered to clients downloading a generated deck.
pub const DOWNLOAD_FILENAME: &str = "resume_presentation.pptx";
