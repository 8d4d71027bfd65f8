//! Document writer
//!
//! Export only needs four things from a PDF library: add a page, embed a
//! raster, draw it at a rectangle, and serialize. [`DocumentWriter`] is that
//! contract; [`LopdfWriter`] implements it on top of `lopdf`.

use crate::layout::Rect;
use crate::render::{PlaneColor, read_jpeg_info, split_planes};
use crate::types::{PhotoPdfError, RasterFormat, Result};
use lopdf::{Dictionary, Document, Object, ObjectId, Stream};

/// A page created by a [`DocumentWriter`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageHandle(pub usize);

/// An embedded raster and its pixel dimensions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ImageHandle {
    pub index: usize,
    pub width: u32,
    pub height: u32,
}

/// The document-generation collaborator used by export
pub trait DocumentWriter {
    /// Append a page of the given size in points
    fn add_page(&mut self, width: f32, height: f32) -> Result<PageHandle>;

    /// Embed encoded raster data, returning its pixel dimensions
    fn embed_raster(&mut self, bytes: &[u8], format: RasterFormat) -> Result<ImageHandle>;

    /// Draw an embedded raster into `rect` on `page`
    fn draw_image(&mut self, page: PageHandle, image: ImageHandle, rect: Rect) -> Result<()>;

    /// Finish the document and return its bytes
    fn serialize(self) -> Result<Vec<u8>>;
}

struct PendingPage {
    width: f32,
    height: f32,
    content: String,
    xobjects: Dictionary,
}

/// [`DocumentWriter`] producing a PDF with `lopdf`
pub struct LopdfWriter {
    doc: Document,
    pages_id: ObjectId,
    pages: Vec<PendingPage>,
    images: Vec<ObjectId>,
    title: Option<String>,
}

impl Default for LopdfWriter {
    fn default() -> Self {
        Self::new()
    }
}

impl LopdfWriter {
    pub fn new() -> Self {
        let mut doc = Document::with_version("1.7");
        let pages_id = doc.new_object_id();
        Self {
            doc,
            pages_id,
            pages: Vec::new(),
            images: Vec::new(),
            title: None,
        }
    }

    /// Set the document title stored in the Info dictionary
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    fn embed_jpeg(&mut self, bytes: &[u8]) -> Result<(ObjectId, u32, u32)> {
        let info = read_jpeg_info(bytes)
            .ok_or_else(|| PhotoPdfError::Build("JPEG data has no frame header".to_string()))?;

        let mut dict = image_dictionary(info.width, info.height);
        dict.set("BitsPerComponent", Object::Integer(info.bits_per_component as i64));
        dict.set("Filter", Object::Name(b"DCTDecode".to_vec()));
        match info.components {
            1 => dict.set("ColorSpace", Object::Name(b"DeviceGray".to_vec())),
            3 => dict.set("ColorSpace", Object::Name(b"DeviceRGB".to_vec())),
            4 => {
                dict.set("ColorSpace", Object::Name(b"DeviceCMYK".to_vec()));
                // Adobe writes CMYK JPEGs inverted
                dict.set(
                    "Decode",
                    Object::Array(
                        [1, 0, 1, 0, 1, 0, 1, 0]
                            .into_iter()
                            .map(Object::Integer)
                            .collect(),
                    ),
                );
            }
            n => {
                return Err(PhotoPdfError::Build(format!(
                    "JPEG with {} color components is not supported",
                    n
                )));
            }
        }

        // Already compressed, keep the DCT data untouched
        let stream = Stream::new(dict, bytes.to_vec()).with_compression(false);
        Ok((self.doc.add_object(stream), info.width, info.height))
    }

    fn embed_png(&mut self, bytes: &[u8]) -> Result<(ObjectId, u32, u32)> {
        let pixels = image::load_from_memory_with_format(bytes, image::ImageFormat::Png)
            .map_err(|e| PhotoPdfError::Build(format!("PNG data could not be read: {}", e)))?;
        let planes = split_planes(&pixels);

        let mut dict = image_dictionary(planes.width, planes.height);
        dict.set("BitsPerComponent", Object::Integer(8));
        dict.set("ColorSpace", color_space(planes.color));

        if let Some(alpha) = planes.alpha {
            let mut smask = image_dictionary(planes.width, planes.height);
            smask.set("BitsPerComponent", Object::Integer(8));
            smask.set("ColorSpace", color_space(PlaneColor::Gray));
            let smask_id = self.doc.add_object(Stream::new(smask, alpha));
            dict.set("SMask", Object::Reference(smask_id));
        }

        let id = self.doc.add_object(Stream::new(dict, planes.samples));
        Ok((id, planes.width, planes.height))
    }
}

impl DocumentWriter for LopdfWriter {
    fn add_page(&mut self, width: f32, height: f32) -> Result<PageHandle> {
        if width <= 0.0 || height <= 0.0 {
            return Err(PhotoPdfError::Build(format!(
                "Invalid page size {}x{}",
                width, height
            )));
        }
        self.pages.push(PendingPage {
            width,
            height,
            content: String::new(),
            xobjects: Dictionary::new(),
        });
        Ok(PageHandle(self.pages.len() - 1))
    }

    fn embed_raster(&mut self, bytes: &[u8], format: RasterFormat) -> Result<ImageHandle> {
        let (object_id, width, height) = match format {
            RasterFormat::Jpeg => self.embed_jpeg(bytes)?,
            RasterFormat::Png => self.embed_png(bytes)?,
        };
        self.images.push(object_id);
        Ok(ImageHandle {
            index: self.images.len() - 1,
            width,
            height,
        })
    }

    fn draw_image(&mut self, page: PageHandle, image: ImageHandle, rect: Rect) -> Result<()> {
        let object_id = *self
            .images
            .get(image.index)
            .ok_or_else(|| PhotoPdfError::Build(format!("Unknown image {}", image.index)))?;
        let pending = self
            .pages
            .get_mut(page.0)
            .ok_or_else(|| PhotoPdfError::Build(format!("Unknown page {}", page.0)))?;

        let name = format!("Im{}", image.index);
        pending
            .xobjects
            .set(name.as_bytes(), Object::Reference(object_id));
        pending.content.push_str(&format!(
            "q {} 0 0 {} {} {} cm /{} Do Q\n",
            rect.width, rect.height, rect.x, rect.y, name
        ));
        Ok(())
    }

    fn serialize(self) -> Result<Vec<u8>> {
        let LopdfWriter {
            mut doc,
            pages_id,
            pages,
            title,
            ..
        } = self;

        let mut kids = Vec::with_capacity(pages.len());
        for page in pages {
            let content_id = doc.add_object(Stream::new(Dictionary::new(), page.content.into_bytes()));

            let mut resources = Dictionary::new();
            resources.set("XObject", Object::Dictionary(page.xobjects));

            let mut page_dict = Dictionary::new();
            page_dict.set("Type", Object::Name(b"Page".to_vec()));
            page_dict.set("Parent", Object::Reference(pages_id));
            page_dict.set(
                "MediaBox",
                Object::Array(vec![
                    Object::Integer(0),
                    Object::Integer(0),
                    Object::Real(page.width),
                    Object::Real(page.height),
                ]),
            );
            page_dict.set("Resources", Object::Dictionary(resources));
            page_dict.set("Contents", Object::Reference(content_id));
            kids.push(Object::Reference(doc.add_object(page_dict)));
        }

        let mut pages_dict = Dictionary::new();
        pages_dict.set("Type", Object::Name(b"Pages".to_vec()));
        pages_dict.set("Count", Object::Integer(kids.len() as i64));
        pages_dict.set("Kids", Object::Array(kids));
        doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

        let mut catalog = Dictionary::new();
        catalog.set("Type", Object::Name(b"Catalog".to_vec()));
        catalog.set("Pages", Object::Reference(pages_id));
        let catalog_id = doc.add_object(catalog);
        doc.trailer.set("Root", catalog_id);

        let mut info = Dictionary::new();
        info.set("Producer", Object::string_literal("photo-pdf"));
        if let Some(title) = title {
            info.set("Title", Object::string_literal(title));
        }
        let info_id = doc.add_object(info);
        doc.trailer.set("Info", info_id);

        doc.compress();

        let mut writer = Vec::new();
        doc.save_to(&mut writer)?;
        Ok(writer)
    }
}

fn image_dictionary(width: u32, height: u32) -> Dictionary {
    let mut dict = Dictionary::new();
    dict.set("Type", Object::Name(b"XObject".to_vec()));
    dict.set("Subtype", Object::Name(b"Image".to_vec()));
    dict.set("Width", Object::Integer(width as i64));
    dict.set("Height", Object::Integer(height as i64));
    dict
}

fn color_space(color: PlaneColor) -> Object {
    match color {
        PlaneColor::Gray => Object::Name(b"DeviceGray".to_vec()),
        PlaneColor::Rgb => Object::Name(b"DeviceRGB".to_vec()),
    }
}
