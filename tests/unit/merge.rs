use std::{io::Cursor, sync::Arc};

use super::*;
use crate::{
    assets::input::{ImageDescriptor, ImageSource},
    foundation::core::Canvas,
    layout::margin::Margin,
};

fn solid(w: u32, h: u32, px: [u8; 4]) -> RgbaImage {
    RgbaImage::from_pixel(w, h, image::Rgba(px))
}

fn png(img: RgbaImage) -> Vec<u8> {
    let mut buf = Vec::new();
    image::DynamicImage::ImageRgba8(img)
        .write_to(&mut Cursor::new(&mut buf), image::ImageFormat::Png)
        .unwrap();
    buf
}

#[test]
fn fewer_than_two_images_is_rejected() {
    for images in [vec![], vec![ImageInput::from(solid(1, 1, [0; 4]))]] {
        let err = merge(&images, &MergeOptions::default()).unwrap_err();
        assert!(matches!(err, MergeError::Validation(_)));
        assert!(err.to_string().contains("more than one image"));
    }
}

#[test]
fn merges_decoded_and_encoded_inputs() {
    let images = vec![
        ImageInput::from(solid(2, 3, [255, 0, 0, 255])),
        ImageInput::from(png(solid(4, 1, [0, 255, 0, 255]))),
        ImageInput::from(ImageDescriptor::new(ImageSource::from(png(solid(
            1,
            1,
            [0, 0, 255, 255],
        ))))
        .offset(2, 1)),
    ];
    let out = merge(
        &images,
        &MergeOptions {
            color: FillColor::from_u32(0x000000ff),
            ..MergeOptions::default()
        },
    )
    .unwrap();

    // widths 2 + 4 + (1 + 2); heights max(3, 1, 1 + 1)
    assert_eq!(out.dimensions(), (9, 3));
    assert_eq!(out.get_pixel(1, 2).0, [255, 0, 0, 255]);
    assert_eq!(out.get_pixel(5, 0).0, [0, 255, 0, 255]);
    assert_eq!(out.get_pixel(5, 1).0, [0, 0, 0, 255]);
    assert_eq!(out.get_pixel(8, 1).0, [0, 0, 255, 255]);
    assert_eq!(out.get_pixel(8, 0).0, [0, 0, 0, 255]);
}

#[test]
fn bad_margin_fails_before_loading() {
    let images = vec![
        ImageInput::from("does/not/exist.png"),
        ImageInput::from("does/not/exist.png"),
    ];
    let err = merge(
        &images,
        &MergeOptions {
            margin: Some(MarginSpec::from("ten")),
            ..MergeOptions::default()
        },
    )
    .unwrap_err();
    assert!(matches!(err, MergeError::Parse(_)));
}

#[test]
fn missing_file_surfaces_io_error() {
    let images = vec![
        ImageInput::from(solid(1, 1, [0; 4])),
        ImageInput::from("does/not/exist.png"),
    ];
    let err = merge(&images, &MergeOptions::default()).unwrap_err();
    assert!(matches!(err, MergeError::Io(_)), "{err}");
}

#[test]
fn plan_layout_is_pure() {
    let images: Vec<NormalizedImage> = (0..3)
        .map(|_| NormalizedImage {
            bitmap: Arc::new(RgbaImage::new(10, 4)),
            offset_x: 0,
            offset_y: 0,
        })
        .collect();
    let layout = plan_layout(
        &images,
        &MergeOptions {
            direction: Direction::Vertical,
            margin: Some(MarginSpec::from(Margin::new(1, 2, 3, 4))),
            ..MergeOptions::default()
        },
    )
    .unwrap();
    assert_eq!(
        layout.canvas,
        Canvas {
            width: 16,
            height: 16
        }
    );
    assert_eq!(layout.placements[2].y, 9.0);
}

#[test]
fn options_deserialize_with_defaults() {
    let opts: MergeOptions = serde_json::from_str(
        r##"{"direction": true, "align": "center", "offset": 3, "margin": "1 2", "color": "#ffffff"}"##,
    )
    .unwrap();
    assert_eq!(opts.direction, Direction::Vertical);
    assert_eq!(opts.align, Align::Center);
    assert_eq!(opts.offset, 3);
    assert_eq!(opts.color, FillColor::rgba(255, 255, 255, 255));
    assert_eq!(
        opts.layout_params().unwrap().margin,
        Margin::new(1, 2, 1, 2)
    );
    assert_eq!(opts.load, LoadSettings::default());

    let empty: MergeOptions = serde_json::from_str("{}").unwrap();
    assert_eq!(empty, MergeOptions::default());
}
