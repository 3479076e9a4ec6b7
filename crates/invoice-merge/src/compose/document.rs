//! Output document accumulation and finalization

use crate::layout::PageLayout;
use crate::render::PageCanvas;
use lopdf::{Dictionary, Document, Object, ObjectId};

/// Accumulates output pages. Consumed by `finish`, so a finalized
/// document can never receive another page.
pub(crate) struct DocumentBuilder {
    output: Document,
    pages_tree_id: ObjectId,
    page_refs: Vec<Object>,
    layouts: Vec<PageLayout>,
    page_width: f32,
    page_height: f32,
}

impl DocumentBuilder {
    pub(crate) fn new(page_width: f32, page_height: f32) -> Self {
        let mut output = Document::with_version("1.7");
        let pages_tree_id = output.new_object_id();

        Self {
            output,
            pages_tree_id,
            page_refs: Vec::new(),
            layouts: Vec::new(),
            page_width,
            page_height,
        }
    }

    /// Blank canvas with this document's page size
    pub(crate) fn new_canvas(&self) -> PageCanvas {
        PageCanvas::new(self.page_width, self.page_height)
    }

    /// Mutable access for embedding resources while drawing
    pub(crate) fn document_mut(&mut self) -> &mut Document {
        &mut self.output
    }

    /// Close a page and append it.
    pub(crate) fn push_page(&mut self, canvas: PageCanvas, layout: PageLayout) {
        let page_id = canvas.finish(&mut self.output, self.pages_tree_id);
        self.page_refs.push(Object::Reference(page_id));
        self.layouts.push(layout);
    }

    /// Write the page tree and catalog.
    pub(crate) fn finish(mut self) -> OutputDocument {
        let count = self.page_refs.len() as i64;
        let pages_dict = Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Pages".to_vec())),
            ("Kids", Object::Array(self.page_refs)),
            ("Count", Object::Integer(count)),
        ]);
        self.output
            .objects
            .insert(self.pages_tree_id, Object::Dictionary(pages_dict));

        let catalog_id = self.output.add_object(Dictionary::from_iter(vec![
            ("Type", Object::Name(b"Catalog".to_vec())),
            ("Pages", Object::Reference(self.pages_tree_id)),
        ]));
        self.output.trailer.set("Root", catalog_id);

        OutputDocument {
            document: self.output,
            layouts: self.layouts,
            page_size: (self.page_width, self.page_height),
        }
    }
}

/// A finished multi-page PDF and the layout that produced it
#[derive(Debug, Clone)]
pub struct OutputDocument {
    document: Document,
    layouts: Vec<PageLayout>,
    page_size: (f32, f32),
}

impl OutputDocument {
    pub fn page_count(&self) -> usize {
        self.layouts.len()
    }

    /// Resolved placements, one entry per page
    pub fn pages(&self) -> &[PageLayout] {
        &self.layouts
    }

    /// Number of images drawn across all pages
    pub fn placed_count(&self) -> usize {
        self.layouts.iter().map(|page| page.placements.len()).sum()
    }

    /// Page (width, height) in points
    pub fn page_size(&self) -> (f32, f32) {
        self.page_size
    }

    pub fn document(&self) -> &Document {
        &self.document
    }

    pub fn into_document(self) -> Document {
        self.document
    }
}
