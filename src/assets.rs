use image::RgbaImage;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ResourceError {
    #[error("Can't find ref: {0}")]
    NotFound(String),
    #[error("Failed to load: {0}")]
    Decode(String, #[source] image::ImageError),
}

const SPRITES: &[(&str, &[u8])] = &[
    (
        "sprites/ship.png",
        include_bytes!("../assets/sprites/ship.png"),
    ),
    (
        "sprites/alien.png",
        include_bytes!("../assets/sprites/alien.png"),
    ),
    (
        "sprites/shot.png",
        include_bytes!("../assets/sprites/shot.png"),
    ),
    (
        "sprites/pressanykey.png",
        include_bytes!("../assets/sprites/pressanykey.png"),
    ),
    (
        "sprites/gotyou.png",
        include_bytes!("../assets/sprites/gotyou.png"),
    ),
    (
        "sprites/youwin.png",
        include_bytes!("../assets/sprites/youwin.png"),
    ),
];

pub fn find(sprite_ref: &str) -> Result<&'static [u8], ResourceError> {
    SPRITES
        .iter()
        .find(|(name, _)| *name == sprite_ref)
        .map(|(_, bytes)| *bytes)
        .ok_or_else(|| ResourceError::NotFound(sprite_ref.to_string()))
}

pub fn load_image(sprite_ref: &str) -> Result<RgbaImage, ResourceError> {
    let bytes = find(sprite_ref)?;
    let image = image::load_from_memory(bytes)
        .map_err(|e| ResourceError::Decode(sprite_ref.to_string(), e))?;
    Ok(image.to_rgba8())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn every_embedded_sprite_decodes() {
        for (name, _) in SPRITES {
            let image = load_image(name).unwrap();
            assert!(image.width() > 0 && image.height() > 0, "{} is empty", name);
        }
    }

    #[test]
    fn sprite_dimensions() {
        let alien = load_image("sprites/alien.png").unwrap();
        assert_eq!(alien.dimensions(), (33, 24));
        let ship = load_image("sprites/ship.png").unwrap();
        assert_eq!(ship.dimensions(), (33, 21));
    }

    #[test]
    fn unknown_ref_is_not_found() {
        match load_image("sprites/mothership.png") {
            Err(ResourceError::NotFound(name)) => assert_eq!(name, "sprites/mothership.png"),
            other => panic!("expected NotFound, got {:?}", other.map(|i| i.dimensions())),
        }
    }
}
