use std::fmt;
use std::sync::Arc;

/// Opaque, unique photo identifier.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PhotoId(Arc<str>);

impl PhotoId {
    pub fn new(id: impl Into<Arc<str>>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PhotoId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for PhotoId {
    fn from(value: &str) -> Self {
        Self::new(value)
    }
}

impl From<String> for PhotoId {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

/// Locators for the full-resolution and reduced-resolution renditions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendition {
    pub full: String,
    pub reduced: String,
}

impl Rendition {
    pub fn new(full: impl Into<String>, reduced: impl Into<String>) -> Self {
        Self {
            full: full.into(),
            reduced: reduced.into(),
        }
    }

    /// Both renditions served from the same locator.
    pub fn single(locator: impl Into<String>) -> Self {
        let locator = locator.into();
        Self {
            full: locator.clone(),
            reduced: locator,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Attribution {
    pub author_id: String,
    pub author_name: String,
}

impl Attribution {
    pub fn new(author_id: impl Into<String>, author_name: impl Into<String>) -> Self {
        Self {
            author_id: author_id.into(),
            author_name: author_name.into(),
        }
    }
}

/// Free-form caption fields; all optional.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Caption {
    pub title: Option<String>,
    /// Technical settings, e.g. "f/2.8 1/250s ISO 200".
    pub settings: Option<String>,
    pub location: Option<String>,
}

impl Caption {
    pub fn is_empty(&self) -> bool {
        self.title.is_none() && self.settings.is_none() && self.location.is_none()
    }
}

/// Photos uploaded together under one parent.
#[derive(Debug, Clone, PartialEq)]
pub struct SeriesGroup {
    pub parent_id: PhotoId,
    /// Ordered members; the parent is normally the first entry.
    pub members: Vec<PhotoItem>,
}

impl SeriesGroup {
    pub fn len(&self) -> usize {
        self.members.len()
    }

    pub fn is_empty(&self) -> bool {
        self.members.is_empty()
    }
}

/// A single photo record as supplied by the feed.
///
/// Items are immutable for layout purposes; only their pixel dimensions
/// may be filled in once the reduced rendition has been inspected.
#[derive(Debug, Clone, PartialEq)]
pub struct PhotoItem {
    pub id: PhotoId,
    pub rendition: Rendition,
    pub width: Option<u32>,
    pub height: Option<u32>,
    pub attribution: Attribution,
    pub series: Option<SeriesGroup>,
    pub caption: Caption,
}

impl PhotoItem {
    pub fn new(id: impl Into<PhotoId>, rendition: Rendition, attribution: Attribution) -> Self {
        Self {
            id: id.into(),
            rendition,
            width: None,
            height: None,
            attribution,
            series: None,
            caption: Caption::default(),
        }
    }

    pub fn with_dimensions(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn with_caption(mut self, caption: Caption) -> Self {
        self.caption = caption;
        self
    }

    pub fn with_series(mut self, members: Vec<PhotoItem>) -> Self {
        self.series = Some(SeriesGroup {
            parent_id: self.id.clone(),
            members,
        });
        self
    }

    /// Intrinsic pixel size, if both dimensions are known and non-zero.
    pub fn dimensions(&self) -> Option<(u32, u32)> {
        match (self.width, self.height) {
            (Some(w), Some(h)) if w > 0 && h > 0 => Some((w, h)),
            _ => None,
        }
    }

    /// Height of this item when drawn at `column_width`.
    pub fn height_at(&self, column_width: f32) -> Option<f32> {
        self.dimensions()
            .map(|(w, h)| column_width * h as f32 / w as f32)
    }

    pub fn author_id(&self) -> &str {
        &self.attribution.author_id
    }

    pub fn is_series_parent(&self) -> bool {
        self.series
            .as_ref()
            .is_some_and(|s| s.parent_id == self.id && !s.is_empty())
    }
}
