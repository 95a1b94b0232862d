//! Headless configuration of the tern renderer.
//!
//! Wires the engine to an in-memory raster surface:
//!
//! - [`HeadlessContainer`] implements the engine's backend with
//!   fontdue text rasterization, tiny-skia fills and the `image` crate
//!   for decoding; stylesheet imports and images fetch through
//!   `tern-common::net` (http/file/data URLs).
//! - [`html`] is the host-side tag-soup DOM producer for raw HTML
//!   input.
//! - [`render_html`] runs the whole pipeline: parse → style → layout →
//!   paint → PNG-encodable pixmap.

pub mod container;
pub mod html;

use std::cell::RefCell;
use std::rc::Rc;

use url::Url;

use tern_engine::{Document, DocumentOptions};

pub use container::HeadlessContainer;

/// Options for a headless render.
#[derive(Debug, Clone)]
pub struct RenderOptions {
    /// Viewport (and surface) width in px.
    pub width: u32,
    /// Surface height; 0 sizes the surface to the document height.
    pub height: u32,
    /// Base URL for relative stylesheet/image references.
    pub base_url: Option<Url>,
}

impl Default for RenderOptions {
    fn default() -> Self {
        Self {
            width: 1280,
            height: 0,
            base_url: None,
        }
    }
}

/// The outcome of a headless render.
pub struct RenderResult {
    /// The container holding the rasterized surface.
    pub container: Rc<RefCell<HeadlessContainer>>,
    /// The laid-out document (for inspection or interaction).
    pub document: Document,
}

impl RenderResult {
    /// PNG-encode the surface.
    pub fn encode_png(&self) -> anyhow::Result<Vec<u8>> {
        self.container.borrow().encode_png()
    }
}

/// Render an HTML string to a raster surface.
pub fn render_html(input: &str, options: &RenderOptions) -> anyhow::Result<RenderResult> {
    let initial_height = if options.height > 0 { options.height } else { 720 };
    let container = Rc::new(RefCell::new(HeadlessContainer::new(
        options.width,
        initial_height,
    )?));
    container
        .borrow_mut()
        .set_base_url(options.base_url.clone());

    let (tree, root) = html::parse_html(input);

    let engine_container: tern_engine::ContainerRef = container.clone();
    let mut document = Document::from_tree(
        engine_container,
        tree,
        root,
        DocumentOptions {
            master_css: None,
            base_url: options.base_url.clone(),
        },
    );

    document.render(options.width as i32);

    // Auto-height surfaces grow to the document, then layout runs once
    // more so viewport-relative units see the final size.
    if options.height == 0 {
        let doc_height = document.height().max(1) as u32;
        container
            .borrow_mut()
            .resize_surface(options.width, doc_height);
        document.render(options.width as i32);
    }

    document.draw(0, 0, 0, None);

    Ok(RenderResult {
        container,
        document,
    })
}
