//! The tern rendering engine core.
//!
//! This crate turns a pre-parsed element tree plus CSS into a
//! rasterized page, through a host-provided drawing backend:
//!
//! 1. **Style** — the master stylesheet, author sheets and inline
//!    `style` attributes cascade into a per-element store; computed
//!    values (fonts, lengths, keywords, backgrounds) resolve top-down.
//! 2. **Layout** — normal block/inline flow with line boxes, floats,
//!    positioned elements and CSS tables, driven by
//!    [`Document::render`] for a containing width.
//! 3. **Paint** — [`Document::draw`] issues background/border/text
//!    primitives to the [`DocumentContainer`] in stacking order.
//! 4. **Interaction** — hit-testing plus `:hover`/`:active` refresh
//!    with minimal repaint rectangles.
//!
//! The engine is single-threaded and never performs I/O: fonts,
//! images, stylesheet fetches and drawing all go through the backend
//! trait; failing callbacks degrade to placeholder geometry.

pub mod backend;
pub mod document;
pub mod geometry;
pub mod master_css;

mod draw;
mod element;
mod hittest;
mod layout;
mod styles;

pub use backend::{
    BackgroundPaint, BorderPaint, BorderRadii, Borders, DocumentContainer, DrawHandle, FontHandle,
    FontMetrics, ListMarker, FONT_DECORATION_LINETHROUGH, FONT_DECORATION_OVERLINE,
    FONT_DECORATION_UNDERLINE,
};
pub use document::{ContainerRef, Document, DocumentOptions};
pub use geometry::{Margins, Position, Size};
pub use master_css::MASTER_CSS;
