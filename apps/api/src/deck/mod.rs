// Deck Renderer: maps generated content onto slides, then hands the deck to
// the pptx writer. Color schemes and the template catalog live alongside it.

use thiserror::Error;

pub mod builder;
pub mod color;
pub mod handlers;
pub mod model;
pub mod template;

pub use builder::{render_deck, DeckBuilder};
pub use model::Deck;

#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid content: {0}")]
    InvalidContent(String),

    #[error("XML formatting error: {0}")]
    Xml(#[from] std::fmt::Error),

    #[error("Package error: {0}")]
    Package(#[from] zip::result::ZipError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Malformed package: {0}")]
    Malformed(String),
}
