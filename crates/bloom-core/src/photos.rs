//! Photo references bound to display objects. Ids and URLs are opaque and
//! passed through to the renderer untouched.

use crate::constants::{MAX_UPLOADS, PLACEHOLDER_COUNT};
use std::hash::Hasher;

#[derive(Clone, Debug, PartialEq, Eq, Hash)]
pub struct PhotoRef {
    pub id: String,
    pub url: String,
}

impl PhotoRef {
    pub fn new(id: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            url: url.into(),
        }
    }

    pub fn placeholder(i: usize) -> Self {
        Self::new(
            format!("placeholder-{i}"),
            format!("https://picsum.photos/seed/{}/300/300", i + 15),
        )
    }
}

/// Stable pastel tint derived from a photo id, used where no texture is shown.
pub fn photo_tint(id: &str) -> [f32; 3] {
    let mut hasher = fnv::FnvHasher::default();
    hasher.write(id.as_bytes());
    let h = hasher.finish();
    let channel = |shift: u32| 0.6 + 0.4 * (((h >> shift) & 0xff) as f32 / 255.0);
    [channel(0), channel(8), channel(16)]
}

/// User photos, falling back to placeholders while the list is empty.
#[derive(Clone, Debug, Default)]
pub struct PhotoLibrary {
    photos: Vec<PhotoRef>,
    uploads_seen: u64,
}

impl PhotoLibrary {
    pub fn new(photos: Vec<PhotoRef>) -> Self {
        Self {
            photos,
            uploads_seen: 0,
        }
    }

    pub fn user_photos(&self) -> &[PhotoRef] {
        &self.photos
    }

    pub fn set_photos(&mut self, photos: Vec<PhotoRef>) {
        self.photos = photos;
    }

    /// Replace the library with freshly uploaded files, keeping at most
    /// [`MAX_UPLOADS`]. Returns how many were accepted.
    pub fn replace_with_uploads<I, S>(&mut self, urls: I) -> usize
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut next = Vec::with_capacity(MAX_UPLOADS);
        for url in urls.into_iter().take(MAX_UPLOADS) {
            let id = format!("upload-{}", self.uploads_seen);
            self.uploads_seen += 1;
            next.push(PhotoRef::new(id, url));
        }
        log::info!("[photos] {} uploads accepted", next.len());
        self.photos = next;
        self.photos.len()
    }

    /// Photos actually shown: the user's, or placeholders when there are none.
    pub fn active(&self) -> Vec<PhotoRef> {
        if self.photos.is_empty() {
            (0..PLACEHOLDER_COUNT).map(PhotoRef::placeholder).collect()
        } else {
            self.photos.clone()
        }
    }
}

/// Photo for slot `index`, wrapping when there are fewer photos than slots.
pub fn assign_cyclic(photos: &[PhotoRef], index: usize) -> PhotoRef {
    if photos.is_empty() {
        PhotoRef::placeholder(index)
    } else {
        photos[index % photos.len()].clone()
    }
}
