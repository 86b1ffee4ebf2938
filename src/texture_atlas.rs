use anyhow::{format_err, Error};

/// `[min_x, min_y, max_x, max_y]` in texels.
pub type TextureRect = [u32; 4];

// empty texels kept around every texture so filtering never bleeds
const PADDING: u32 = 1;

pub struct TextureAtlas {
    size: (u32, u32),
    texture_rects: Vec<TextureRect>,
}

impl TextureAtlas {
    pub fn new(size: (u32, u32)) -> TextureAtlas {
        TextureAtlas {
            size,
            texture_rects: Vec::new(),
        }
    }

    pub fn add_texture(&mut self, size: (u32, u32)) -> Result<TextureRect, Error> {
        let (width, height) = size;
        let mut y = PADDING;
        while y + height + PADDING <= self.size.1 {
            let mut next_y = self.size.1;
            let mut x = PADDING;
            while x + width + PADDING <= self.size.0 {
                let candidate = [x, y, x + width, y + height];
                match self.first_overlap(candidate) {
                    None => {
                        self.texture_rects.push(candidate);
                        return Ok(candidate);
                    }
                    // on the x axis, skip past the overlapping texture
                    // on the y axis, remember the lowest bottom edge in the row
                    Some(rect) => {
                        next_y = next_y.min(rect[3] + PADDING);
                        x = rect[2] + PADDING;
                    }
                }
            }
            y = next_y;
        }

        Err(format_err!(
            "Texture atlas overflow: no room for {}x{}",
            width,
            height
        ))
    }

    fn first_overlap(&self, rect: TextureRect) -> Option<TextureRect> {
        let padded = [
            rect[0] - PADDING,
            rect[1] - PADDING,
            rect[2] + PADDING,
            rect[3] + PADDING,
        ];
        self.texture_rects
            .iter()
            .find(|t| padded[0] < t[2] && t[0] < padded[2] && padded[1] < t[3] && t[1] < padded[3])
            .copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn overlaps(a: TextureRect, b: TextureRect) -> bool {
        a[0] < b[2] && b[0] < a[2] && a[1] < b[3] && b[1] < a[3]
    }

    #[test]
    fn textures_keep_their_size() {
        let mut atlas = TextureAtlas::new((64, 64));
        let rect = atlas.add_texture((10, 20)).unwrap();
        assert_eq!(rect, [1, 1, 11, 21]);
    }

    #[test]
    fn packed_textures_never_overlap() {
        let mut atlas = TextureAtlas::new((128, 128));
        let sizes = [(33, 24), (33, 21), (2, 12), (40, 10), (20, 30), (33, 24)];
        let rects: Vec<_> = sizes
            .iter()
            .map(|&size| atlas.add_texture(size).unwrap())
            .collect();

        for (i, a) in rects.iter().enumerate() {
            assert_eq!(a[2] - a[0], sizes[i].0);
            assert_eq!(a[3] - a[1], sizes[i].1);
            assert!(a[2] < 128 && a[3] < 128);
            for b in &rects[i + 1..] {
                assert!(!overlaps(*a, *b), "{:?} overlaps {:?}", a, b);
            }
        }
    }

    #[test]
    fn full_row_wraps_to_next_row() {
        let mut atlas = TextureAtlas::new((32, 64));
        let first = atlas.add_texture((14, 10)).unwrap();
        let second = atlas.add_texture((14, 10)).unwrap();
        let third = atlas.add_texture((14, 10)).unwrap();

        assert_eq!(first, [1, 1, 15, 11]);
        assert_eq!(second, [16, 1, 30, 11]);
        assert_eq!(third, [1, 12, 15, 22]);
    }

    #[test]
    fn overflow_is_an_error() {
        let mut atlas = TextureAtlas::new((16, 16));
        assert!(atlas.add_texture((20, 4)).is_err());
        atlas.add_texture((14, 14)).unwrap();
        assert!(atlas.add_texture((2, 2)).is_err());
    }
}
