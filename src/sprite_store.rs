use std::collections::HashMap;

use anyhow::Error;
use euclid::{default::Size2D, size2};
use image::RgbaImage;

use crate::assets;

/// Handle to a sprite loaded by a renderer. Carries no position, so a single
/// sprite is drawn wherever it is needed.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub struct Sprite {
    id: usize,
    size: Size2D<u32>,
}

impl Sprite {
    pub fn new(id: usize, size: Size2D<u32>) -> Self {
        Self { id, size }
    }

    pub fn size(&self) -> Size2D<u32> {
        self.size
    }
}

/// Backend specific sprite data, cached by resource reference.
pub struct SpriteStore<T> {
    by_ref: HashMap<String, Sprite>,
    entries: Vec<T>,
}

impl<T> SpriteStore<T> {
    pub fn new() -> Self {
        Self {
            by_ref: HashMap::new(),
            entries: Vec::new(),
        }
    }

    /// Returns the cached sprite for `sprite_ref`, or decodes the image and
    /// hands it to `upload` to produce the backend's data for it.
    pub fn get_or_load<F>(&mut self, sprite_ref: &str, upload: F) -> Result<Sprite, Error>
    where
        F: FnOnce(RgbaImage) -> Result<T, Error>,
    {
        if let Some(sprite) = self.by_ref.get(sprite_ref) {
            return Ok(*sprite);
        }

        let image = assets::load_image(sprite_ref)?;
        let size = size2(image.width(), image.height());
        let entry = upload(image)?;

        let sprite = Sprite::new(self.entries.len(), size);
        self.entries.push(entry);
        self.by_ref.insert(sprite_ref.to_string(), sprite);
        log::debug!("Loaded sprite {} ({}x{})", sprite_ref, size.width, size.height);
        Ok(sprite)
    }

    pub fn get(&self, sprite: &Sprite) -> &T {
        &self.entries[sprite.id]
    }
}

impl<T> Default for SpriteStore<T> {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use anyhow::format_err;

    use super::*;

    #[test]
    fn same_ref_is_loaded_once() {
        let mut store = SpriteStore::new();
        let mut uploads = 0;

        let first = store
            .get_or_load("sprites/alien.png", |image| {
                uploads += 1;
                Ok(image.dimensions())
            })
            .unwrap();
        let second = store
            .get_or_load("sprites/alien.png", |image| {
                uploads += 1;
                Ok(image.dimensions())
            })
            .unwrap();

        assert_eq!(first, second);
        assert_eq!(uploads, 1);
        assert_eq!(store.entries.len(), 1);
        assert_eq!(*store.get(&first), (33, 24));
        assert_eq!(first.size(), size2(33, 24));
    }

    #[test]
    fn distinct_refs_get_distinct_sprites() {
        let mut store = SpriteStore::new();
        let ship = store.get_or_load("sprites/ship.png", |_| Ok("ship")).unwrap();
        let shot = store.get_or_load("sprites/shot.png", |_| Ok("shot")).unwrap();

        assert_ne!(ship.id, shot.id);
        assert_eq!(*store.get(&ship), "ship");
        assert_eq!(*store.get(&shot), "shot");
    }

    #[test]
    fn missing_ref_is_an_error() {
        let mut store: SpriteStore<()> = SpriteStore::new();
        let err = store.get_or_load("sprites/nope.png", |_| Ok(())).unwrap_err();
        assert_eq!(err.to_string(), "Can't find ref: sprites/nope.png");
        assert_eq!(store.entries.len(), 0);
    }

    #[test]
    fn failed_upload_is_not_cached() {
        let mut store = SpriteStore::new();
        assert!(store
            .get_or_load("sprites/ship.png", |_| Err(format_err!("no texture space")))
            .is_err());
        let sprite = store.get_or_load("sprites/ship.png", |_| Ok(7)).unwrap();
        assert_eq!(*store.get(&sprite), 7);
    }
}
