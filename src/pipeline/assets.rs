//! Visual asset extraction: embedded images and full-page renders.
//!
//! Every asset is an independent unit of work. A failure to decode or write
//! one image, or to rasterise one page, becomes an [`AssetError`] warning
//! and the loop moves on; the reference is simply absent from the output.
//!
//! Within a page, embedded-image references always precede the page-render
//! reference.

use crate::config::ConversionConfig;
use crate::error::{AssetError, Pdf2MdError};
use crate::model::ImageReference;
use crate::pipeline::source::PageSource;
use image::{DynamicImage, ImageFormat};
use std::path::{Component, Path, PathBuf};
use tracing::{debug, warn};

/// Image references and warnings produced for one page.
#[derive(Debug, Default)]
pub struct PageAssets {
    pub references: Vec<ImageReference>,
    pub warnings: Vec<AssetError>,
}

/// Writes one document's assets into its `<stem>_assets/` directory.
#[derive(Debug, Clone)]
pub struct AssetWriter {
    assets_dir: PathBuf,
    stem: String,
    markdown_dir: PathBuf,
}

impl AssetWriter {
    pub fn new(
        assets_dir: impl Into<PathBuf>,
        stem: impl Into<String>,
        markdown_dir: impl Into<PathBuf>,
    ) -> Self {
        Self {
            assets_dir: assets_dir.into(),
            stem: stem.into(),
            markdown_dir: markdown_dir.into(),
        }
    }

    pub fn assets_dir(&self) -> &Path {
        &self.assets_dir
    }

    /// Create the assets directory if it does not exist yet.
    pub fn ensure_dir(&self) -> Result<(), Pdf2MdError> {
        std::fs::create_dir_all(&self.assets_dir).map_err(|e| Pdf2MdError::AssetDirFailed {
            path: self.assets_dir.clone(),
            source: e,
        })
    }

    /// Run both extraction passes for one page.
    pub fn extract_page_assets<P: PageSource + ?Sized>(
        &self,
        page: &P,
        page_number: usize,
        config: &ConversionConfig,
    ) -> PageAssets {
        let mut assets = PageAssets::default();

        if config.extract_images {
            for index in 1..=page.image_count() {
                match self.write_embedded(page, page_number, index) {
                    Ok(reference) => assets.references.push(reference),
                    Err(e) => {
                        warn!("{}", e);
                        assets.warnings.push(e);
                    }
                }
            }
        }

        if config.render_pages {
            match self.write_render(page, page_number, config.render_zoom) {
                Ok(reference) => assets.references.push(reference),
                Err(e) => {
                    warn!("{}", e);
                    assets.warnings.push(e);
                }
            }
        }

        assets
    }

    fn write_embedded<P: PageSource + ?Sized>(
        &self,
        page: &P,
        page_number: usize,
        index: usize,
    ) -> Result<ImageReference, AssetError> {
        let failed = |detail: String| AssetError::ImageExtractionFailed {
            page: page_number,
            image: index,
            detail,
        };

        let image = page.extract_image(index - 1).map_err(failed)?;
        let file_name = format!(
            "{}_page{}_img{}.{}",
            self.stem, page_number, index, image.extension
        );
        let path = self.assets_dir.join(&file_name);
        std::fs::write(&path, &image.bytes).map_err(|e| failed(e.to_string()))?;
        debug!("Wrote {} ({} bytes)", path.display(), image.bytes.len());

        Ok(ImageReference::embedded(
            page_number,
            index,
            self.relative_path(&file_name),
        ))
    }

    fn write_render<P: PageSource + ?Sized>(
        &self,
        page: &P,
        page_number: usize,
        zoom: f32,
    ) -> Result<ImageReference, AssetError> {
        let failed = |detail: String| AssetError::RenderFailed {
            page: page_number,
            detail,
        };

        let rendered = page.render(zoom).map_err(failed)?;
        // Page renders carry no alpha channel.
        let opaque = DynamicImage::ImageRgb8(rendered.to_rgb8());

        let file_name = format!("{}_page{}_render.png", self.stem, page_number);
        let path = self.assets_dir.join(&file_name);
        opaque
            .save_with_format(&path, ImageFormat::Png)
            .map_err(|e| failed(e.to_string()))?;
        debug!(
            "Rendered page {} → {}x{} px",
            page_number,
            opaque.width(),
            opaque.height()
        );

        Ok(ImageReference::page_render(
            page_number,
            self.relative_path(&file_name),
        ))
    }

    /// POSIX path of an asset relative to the Markdown file's directory.
    fn relative_path(&self, file_name: &str) -> String {
        let dir = self
            .assets_dir
            .strip_prefix(&self.markdown_dir)
            .unwrap_or(&self.assets_dir);
        dir.components()
            .filter_map(|c| match c {
                Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
                _ => None,
            })
            .chain(std::iter::once(file_name.to_string()))
            .collect::<Vec<_>>()
            .join("/")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::ImageKind;
    use crate::pipeline::source::{EmbeddedImage, PageLayout};
    use image::{Rgba, RgbaImage};

    struct FakePage {
        images: Vec<Result<EmbeddedImage, String>>,
        render_ok: bool,
    }

    impl PageSource for FakePage {
        fn layout(&self) -> Result<PageLayout, Pdf2MdError> {
            Ok(PageLayout::default())
        }

        fn image_count(&self) -> usize {
            self.images.len()
        }

        fn extract_image(&self, index: usize) -> Result<EmbeddedImage, String> {
            self.images[index].clone()
        }

        fn render(&self, zoom: f32) -> Result<DynamicImage, String> {
            if !self.render_ok {
                return Err("bitmap allocation failed".into());
            }
            let side = (10.0 * zoom) as u32;
            Ok(DynamicImage::ImageRgba8(RgbaImage::from_pixel(
                side,
                side,
                Rgba([255, 255, 255, 128]),
            )))
        }
    }

    fn jpeg_like() -> EmbeddedImage {
        EmbeddedImage {
            bytes: vec![0xFF, 0xD8, 0xFF, 0xE0],
            extension: "jpg".into(),
        }
    }

    fn writer(dir: &Path) -> AssetWriter {
        AssetWriter::new(dir.join("report_assets"), "report", dir)
    }

    #[test]
    fn embedded_images_precede_render() {
        let tmp = tempfile::tempdir().unwrap();
        let w = writer(tmp.path());
        w.ensure_dir().unwrap();

        let page = FakePage {
            images: vec![Ok(jpeg_like()), Ok(jpeg_like())],
            render_ok: true,
        };
        let assets = w.extract_page_assets(&page, 3, &ConversionConfig::default());

        assert!(assets.warnings.is_empty());
        let kinds: Vec<ImageKind> = assets.references.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![ImageKind::Embedded(1), ImageKind::Embedded(2), ImageKind::PageRender]
        );
        assert_eq!(
            assets.references[0].markdown(),
            "![Figure 3.1](report_assets/report_page3_img1.jpg)"
        );
        assert_eq!(
            assets.references[2].markdown(),
            "![Page 3 rendering](report_assets/report_page3_render.png)"
        );
        assert!(tmp.path().join("report_assets/report_page3_img2.jpg").exists());
    }

    #[test]
    fn render_is_saved_without_alpha_at_zoom() {
        let tmp = tempfile::tempdir().unwrap();
        let w = writer(tmp.path());
        w.ensure_dir().unwrap();

        let page = FakePage {
            images: vec![],
            render_ok: true,
        };
        w.extract_page_assets(&page, 1, &ConversionConfig::default());

        let saved = image::open(tmp.path().join("report_assets/report_page1_render.png")).unwrap();
        assert_eq!(saved.width(), 20);
        assert!(!saved.color().has_alpha());
    }

    #[test]
    fn failed_image_is_skipped_with_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let w = writer(tmp.path());
        w.ensure_dir().unwrap();

        let page = FakePage {
            images: vec![Ok(jpeg_like()), Err("unsupported filter".into()), Ok(jpeg_like())],
            render_ok: true,
        };
        let assets = w.extract_page_assets(&page, 2, &ConversionConfig::default());

        assert_eq!(
            assets.warnings,
            vec![AssetError::ImageExtractionFailed {
                page: 2,
                image: 2,
                detail: "unsupported filter".into()
            }]
        );
        let kinds: Vec<ImageKind> = assets.references.iter().map(|r| r.kind).collect();
        assert_eq!(
            kinds,
            vec![ImageKind::Embedded(1), ImageKind::Embedded(3), ImageKind::PageRender]
        );
    }

    #[test]
    fn failed_render_is_skipped_with_warning() {
        let tmp = tempfile::tempdir().unwrap();
        let w = writer(tmp.path());
        w.ensure_dir().unwrap();

        let page = FakePage {
            images: vec![Ok(jpeg_like())],
            render_ok: false,
        };
        let assets = w.extract_page_assets(&page, 5, &ConversionConfig::default());

        assert_eq!(assets.references.len(), 1);
        assert!(matches!(
            assets.warnings.as_slice(),
            [AssetError::RenderFailed { page: 5, .. }]
        ));
    }

    #[test]
    fn passes_can_be_disabled() {
        let tmp = tempfile::tempdir().unwrap();
        let w = writer(tmp.path());
        w.ensure_dir().unwrap();

        let page = FakePage {
            images: vec![Ok(jpeg_like())],
            render_ok: true,
        };
        let config = ConversionConfig::builder()
            .extract_images(false)
            .render_pages(false)
            .build()
            .unwrap();
        let assets = w.extract_page_assets(&page, 1, &config);
        assert!(assets.references.is_empty());
        assert!(assets.warnings.is_empty());
    }

    #[test]
    fn ensure_dir_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let w = writer(tmp.path());
        w.ensure_dir().unwrap();
        w.ensure_dir().unwrap();
        assert!(w.assets_dir().is_dir());
    }
}
