use crate::document::model::ImageRef;

const CDN_BASE: &str = "https://cdn.sanity.io/images";

/// Builds image CDN URLs from asset references of the form
/// `image-{assetId}-{width}x{height}-{format}`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ImageUrlBuilder {
    project_id: Option<String>,
    dataset: String,
}

/// Parsed asset reference.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetId<'a> {
    pub id: &'a str,
    pub width: u32,
    pub height: u32,
    pub format: &'a str,
}

impl<'a> AssetId<'a> {
    pub fn parse(reference: &'a str) -> Option<Self> {
        let rest = reference.strip_prefix("image-")?;
        let (rest, format) = rest.rsplit_once('-')?;
        let (id, dims) = rest.rsplit_once('-')?;
        let (width, height) = dims.split_once('x')?;
        if id.is_empty() || format.is_empty() {
            return None;
        }
        Some(Self {
            id,
            width: width.parse().ok()?,
            height: height.parse().ok()?,
            format,
        })
    }
}

impl ImageUrlBuilder {
    pub fn new(project_id: Option<&str>, dataset: &str) -> Self {
        Self {
            project_id: project_id
                .map(str::trim)
                .filter(|p| !p.is_empty())
                .map(str::to_string),
            dataset: dataset.to_string(),
        }
    }

    /// CDN URL for `image`, optionally resized to `width` pixels. Crop hints
    /// become a `rect` parameter. `None` when the asset cannot be resolved.
    pub fn url_for(&self, image: &ImageRef, width: Option<u32>) -> Option<String> {
        let asset = image.asset.as_ref()?;
        let parsed = asset.reference.as_deref().and_then(AssetId::parse);

        let base = match (&asset.url, &parsed, &self.project_id) {
            (Some(url), _, _) => url.clone(),
            (None, Some(id), Some(project)) => format!(
                "{CDN_BASE}/{project}/{}/{}-{}x{}.{}",
                self.dataset, id.id, id.width, id.height, id.format
            ),
            _ => return None,
        };

        let mut params = Vec::new();
        if let (Some(crop), Some(id)) = (image.crop, &parsed) {
            let w = f64::from(id.width);
            let h = f64::from(id.height);
            let has_crop = [crop.top, crop.bottom, crop.left, crop.right]
                .iter()
                .any(|edge| *edge > 0.0);
            if has_crop {
                let left = (crop.left * w).round();
                let top = (crop.top * h).round();
                let rect_w = ((1.0 - crop.left - crop.right) * w).round();
                let rect_h = ((1.0 - crop.top - crop.bottom) * h).round();
                params.push(format!("rect={left},{top},{rect_w},{rect_h}"));
            }
        }
        if let Some(width) = width {
            params.push(format!("w={width}"));
        }
        params.push("auto=format".to_string());

        let separator = if base.contains('?') { '&' } else { '?' };
        Some(format!("{base}{separator}{}", params.join("&")))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::model::{AssetRef, Crop};

    fn image(reference: &str) -> ImageRef {
        ImageRef {
            asset: Some(AssetRef {
                reference: Some(reference.to_string()),
                url: None,
            }),
            ..ImageRef::default()
        }
    }

    #[test]
    fn parses_asset_reference() {
        assert_eq!(
            AssetId::parse("image-Tb9Ew8CXIwaY6R1kjMvI0uRR-2000x3000-jpg"),
            Some(AssetId {
                id: "Tb9Ew8CXIwaY6R1kjMvI0uRR",
                width: 2000,
                height: 3000,
                format: "jpg",
            })
        );
        assert_eq!(AssetId::parse("file-abc-pdf"), None);
        assert_eq!(AssetId::parse("image-abc-wide-png"), None);
    }

    #[test]
    fn builds_cdn_url() {
        let builder = ImageUrlBuilder::new(Some("proj1"), "production");
        assert_eq!(
            builder.url_for(&image("image-abc-800x600-png"), None).as_deref(),
            Some("https://cdn.sanity.io/images/proj1/production/abc-800x600.png?auto=format")
        );
    }

    #[test]
    fn applies_crop_rect_and_width() {
        let builder = ImageUrlBuilder::new(Some("proj1"), "production");
        let mut img = image("image-abc-1000x500-jpg");
        img.crop = Some(Crop {
            top: 0.1,
            bottom: 0.1,
            left: 0.2,
            right: 0.0,
        });
        assert_eq!(
            builder.url_for(&img, Some(640)).as_deref(),
            Some("https://cdn.sanity.io/images/proj1/production/abc-1000x500.jpg?rect=200,50,800,400&w=640&auto=format")
        );
    }

    #[test]
    fn needs_project_unless_url_was_dereferenced() {
        let builder = ImageUrlBuilder::new(None, "production");
        assert_eq!(builder.url_for(&image("image-abc-800x600-png"), None), None);

        let mut img = image("image-abc-800x600-png");
        img.asset = Some(AssetRef {
            reference: None,
            url: Some("https://cdn.example.com/a.png".into()),
        });
        assert_eq!(
            builder.url_for(&img, Some(300)).as_deref(),
            Some("https://cdn.example.com/a.png?w=300&auto=format")
        );
    }
}
