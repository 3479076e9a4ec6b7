//! Output page rendering
//!
//! A `PageCanvas` collects the drawing commands and image resources of one
//! output page; `finish` turns it into a page object in the output document.

use crate::layout::Rect;
use crate::rasterize::RasterImage;
use crate::types::Result;
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

use super::create_image_xobject;

/// One output page under construction
pub struct PageCanvas {
    width_pt: f32,
    height_pt: f32,
    content_ops: Vec<String>,
    xobjects: Dictionary,
}

impl PageCanvas {
    pub fn new(width_pt: f32, height_pt: f32) -> Self {
        Self {
            width_pt,
            height_pt,
            content_ops: Vec::new(),
            xobjects: Dictionary::new(),
        }
    }

    /// Embed `image` and draw it into `rect`.
    pub fn draw_image(
        &mut self,
        output: &mut Document,
        image: &RasterImage,
        rect: &Rect,
        compress: bool,
    ) -> Result<()> {
        let xobject_name = format!("Im{}", self.xobjects.len());
        let xobject_id = create_image_xobject(output, image.pixels(), compress)?;

        self.xobjects
            .set(xobject_name.as_bytes(), Object::Reference(xobject_id));
        self.content_ops
            .push(generate_image_command(&xobject_name, rect));

        Ok(())
    }

    /// Write the page dictionary and its content stream.
    pub fn finish(self, output: &mut Document, parent_pages_id: ObjectId) -> ObjectId {
        let mut page_dict = Dictionary::new();
        page_dict.set("Type", Object::Name(b"Page".to_vec()));
        page_dict.set("Parent", Object::Reference(parent_pages_id));
        page_dict.set(
            "MediaBox",
            Object::Array(vec![
                Object::Integer(0),
                Object::Integer(0),
                Object::Real(self.width_pt),
                Object::Real(self.height_pt),
            ]),
        );

        let mut resources = Dictionary::new();
        resources.set("XObject", Object::Dictionary(self.xobjects));

        let content = self.content_ops.join("");
        let content_id = output.add_object(Stream::new(Dictionary::new(), content.into_bytes()));

        page_dict.set("Contents", Object::Reference(content_id));
        page_dict.set("Resources", Object::Dictionary(resources));

        output.add_object(page_dict)
    }
}

/// Image space is the unit square, so the matrix scales it to the drawn size.
fn generate_image_command(xobject_name: &str, rect: &Rect) -> String {
    format!(
        "q {} 0 0 {} {} {} cm /{} Do Q\n",
        rect.width, rect.height, rect.x, rect.y, xobject_name
    )
}
