//! Paginating PDF assembler.
//!
//! A rasterized document is scaled to the A4 page width. When it is taller than one
//! page, further pages are added showing the same image shifted up by the cumulative
//! page height, so each page shows the next slice.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use lopdf::{dictionary, Dictionary, Document, Object, ObjectId, Stream};

use super::raster::RasterImage;
use super::ExportError;

/// A4 width in points.
pub const PAGE_WIDTH_PT: f64 = 595.28;
/// A4 height in points.
pub const PAGE_HEIGHT_PT: f64 = 841.89;

const SLICE_EPSILON: f64 = 0.01;

/// Number of pages an image of this size occupies at page width.
pub fn pages_for(width: u32, height: u32) -> usize {
    let scaled_height = scaled_height(width, height);
    let mut pages = 1;
    let mut remaining = scaled_height - PAGE_HEIGHT_PT;
    while remaining > SLICE_EPSILON {
        pages += 1;
        remaining -= PAGE_HEIGHT_PT;
    }
    pages
}

fn scaled_height(width: u32, height: u32) -> f64 {
    f64::from(height) * PAGE_WIDTH_PT / f64::from(width)
}

/// Builds one PDF out of any number of rasterized documents.
pub struct PdfAssembler {
    doc: Document,
    pages_id: ObjectId,
    kids: Vec<Object>,
}

impl Default for PdfAssembler {
    fn default() -> Self {
        Self::new()
    }
}

impl PdfAssembler {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.5");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            kids: Vec::new(),
        }
    }

    pub fn page_count(&self) -> usize {
        self.kids.len()
    }

    /// Append an image across as many pages as it needs. Returns the pages added.
    pub fn add_image(&mut self, image: &RasterImage) -> Result<usize, ExportError> {
        let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
        encoder
            .write_all(image.rgb())
            .map_err(|e| ExportError::PdfWrite(e.to_string()))?;
        let compressed = encoder.finish().map_err(|e| ExportError::PdfWrite(e.to_string()))?;

        let image_dict = dictionary! {
            "Type" => "XObject",
            "Subtype" => "Image",
            "Width" => i64::from(image.width()),
            "Height" => i64::from(image.height()),
            "ColorSpace" => "DeviceRGB",
            "BitsPerComponent" => 8_i64,
            "Filter" => "FlateDecode",
        };
        let image_id = self.doc.add_object(Stream::new(image_dict, compressed));

        let height = scaled_height(image.width(), image.height());
        let pages = pages_for(image.width(), image.height());

        for page in 0..pages {
            // Image top sits at the page top, moved up one page height per page.
            let y = PAGE_HEIGHT_PT - height + PAGE_HEIGHT_PT * page as f64;
            let content = format!(
                "q\n{:.2} 0 0 {:.2} 0 {:.2} cm\n/Im0 Do\nQ\n",
                PAGE_WIDTH_PT, height, y
            );
            let content_id = self
                .doc
                .add_object(Stream::new(Dictionary::new(), content.into_bytes()));

            let page_id = self.doc.add_object(dictionary! {
                "Type" => "Page",
                "Parent" => self.pages_id,
                "MediaBox" => vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(PAGE_WIDTH_PT as f32),
                    Object::Real(PAGE_HEIGHT_PT as f32),
                ],
                "Contents" => content_id,
                "Resources" => dictionary! {
                    "XObject" => dictionary! { "Im0" => image_id },
                },
            });
            self.kids.push(Object::Reference(page_id));
        }

        Ok(pages)
    }

    /// Write the document. At least one image must have been added.
    pub fn finish(mut self) -> Result<Vec<u8>, ExportError> {
        if self.kids.is_empty() {
            return Err(ExportError::NoDocuments);
        }

        let count = self.kids.len() as i64;
        self.doc.objects.insert(
            self.pages_id,
            Object::Dictionary(dictionary! {
                "Type" => "Pages",
                "Kids" => self.kids,
                "Count" => count,
            }),
        );
        let catalog_id = self.doc.add_object(dictionary! {
            "Type" => "Catalog",
            "Pages" => self.pages_id,
        });
        self.doc.trailer.set("Root", catalog_id);

        let mut buffer = Vec::new();
        self.doc
            .save_to(&mut buffer)
            .map_err(|e| ExportError::PdfWrite(e.to_string()))?;
        Ok(buffer)
    }
}

/// Single-image PDF.
pub fn image_to_pdf(image: &RasterImage) -> Result<Vec<u8>, ExportError> {
    let mut assembler = PdfAssembler::new();
    assembler.add_image(image)?;
    assembler.finish()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn white(width: u32, height: u32) -> RasterImage {
        RasterImage::from_rgb(width, height, vec![255; (width * height * 3) as usize]).unwrap()
    }

    #[test]
    fn test_page_count_follows_image_height() {
        assert_eq!(pages_for(794, 1122), 1);
        assert_eq!(pages_for(794, 1124), 2);
        assert_eq!(pages_for(794, 2245), 2);
        assert_eq!(pages_for(794, 2246), 3);
        assert_eq!(pages_for(794, 3000), 3);
        assert_eq!(pages_for(794, 10), 1);
    }

    #[test]
    fn test_tall_image_is_paginated() {
        let bytes = image_to_pdf(&white(40, 130)).unwrap();
        let doc = Document::load_mem(&bytes).unwrap();
        assert_eq!(doc.get_pages().len(), pages_for(40, 130));
        assert_eq!(doc.get_pages().len(), 3);
    }

    #[test]
    fn test_documents_are_appended_in_order() {
        let mut assembler = PdfAssembler::new();
        assert_eq!(assembler.add_image(&white(10, 10)).unwrap(), 1);
        assert_eq!(assembler.add_image(&white(10, 30)).unwrap(), 3);
        assert_eq!(assembler.page_count(), 4);

        let bytes = assembler.finish().unwrap();
        assert!(bytes.starts_with(b"%PDF-1.5"));
        assert_eq!(Document::load_mem(&bytes).unwrap().get_pages().len(), 4);
    }

    #[test]
    fn test_empty_assembler_is_an_error() {
        assert!(matches!(PdfAssembler::new().finish(), Err(ExportError::NoDocuments)));
    }
}
