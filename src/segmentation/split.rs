use super::types::Sections;
use image::{imageops, RgbImage};

/// Slice `image` into the photo above `row` and the caption from `row` down
///
/// Falls back to [`Sections::Unsplit`] when there is no row, or when either
/// side would be empty.
pub fn split_sections(image: &RgbImage, row: Option<u32>) -> Sections {
    let (width, height) = image.dimensions();
    match row {
        Some(row) if row > 0 && row < height => Sections::Split {
            photo: imageops::crop_imm(image, 0, 0, width, row).to_image(),
            caption: imageops::crop_imm(image, 0, row, width, height - row).to_image(),
        },
        _ => Sections::Unsplit(image.clone()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn striped(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| Rgb([x as u8, y as u8, 0]))
    }

    #[test]
    fn split_partitions_rows() {
        let image = striped(10, 50);
        let Sections::Split { photo, caption } = split_sections(&image, Some(20)) else {
            panic!("expected a split");
        };
        assert_eq!(photo.dimensions(), (10, 20));
        assert_eq!(caption.dimensions(), (10, 30));
        assert_eq!(*photo.get_pixel(3, 19), Rgb([3, 19, 0]));
        assert_eq!(*caption.get_pixel(3, 0), Rgb([3, 20, 0]));
    }

    #[test]
    fn missing_row_returns_whole_image() {
        let image = striped(10, 50);
        assert_eq!(split_sections(&image, None), Sections::Unsplit(image.clone()));
    }

    #[test]
    fn empty_photo_or_caption_is_not_a_split() {
        let image = striped(10, 50);
        assert!(!split_sections(&image, Some(0)).is_split());
        assert!(!split_sections(&image, Some(50)).is_split());
        assert!(split_sections(&image, Some(49)).is_split());
    }
}
