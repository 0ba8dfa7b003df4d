use std::sync::atomic::{AtomicUsize, Ordering};

use super::*;

/// Produces a `w x 1` image where `w` is the first byte of the source bytes.
struct SizeFromBytes {
    calls: AtomicUsize,
}

impl SizeFromBytes {
    fn new() -> Self {
        Self {
            calls: AtomicUsize::new(0),
        }
    }
}

impl ImageLoader for SizeFromBytes {
    fn load(&self, src: &ImageSource) -> MergeResult<RgbaImage> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match src {
            ImageSource::Bytes(b) if b.first() == Some(&0) => {
                Err(MergeError::Other(anyhow::anyhow!("zero width source")))
            }
            ImageSource::Bytes(b) => Ok(RgbaImage::new(u32::from(b[0]), 1)),
            ImageSource::Path(p) => Err(MergeError::Io(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                p.display().to_string(),
            ))),
        }
    }
}

fn src(w: u8) -> ImageSource {
    ImageSource::from(vec![w])
}

#[test]
fn decoded_inputs_are_shared_not_copied() {
    let bitmap = Arc::new(RgbaImage::new(4, 4));
    let inputs = vec![
        ImageInput::from(Arc::clone(&bitmap)),
        ImageInput::from(Arc::clone(&bitmap)),
    ];
    let loader = SizeFromBytes::new();
    let out = normalize_inputs(&inputs, &loader, &LoadSettings::default()).unwrap();
    assert!(Arc::ptr_eq(&out[0].bitmap, &bitmap));
    assert_eq!((out[1].offset_x, out[1].offset_y), (0, 0));
    assert_eq!(loader.calls.load(Ordering::SeqCst), 0);
}

#[test]
fn descriptors_keep_offsets_and_sources_get_zero() {
    let inputs = vec![
        ImageInput::from(ImageDescriptor::new(src(3)).offset(5, 7)),
        ImageInput::from(src(2)),
    ];
    let out = normalize_inputs(&inputs, &SizeFromBytes::new(), &LoadSettings::default()).unwrap();
    assert_eq!(out[0].extent(), ImageExtent::new(3, 1).with_offsets(5, 7));
    assert_eq!(out[1].extent(), ImageExtent::new(2, 1));
}

#[test]
fn parallel_gather_preserves_input_order() {
    let inputs: Vec<ImageInput> = (1..=64u8).map(|w| ImageInput::from(src(w))).collect();
    let loader = SizeFromBytes::new();
    let out = normalize_inputs(&inputs, &loader, &LoadSettings::default()).unwrap();
    let widths: Vec<u32> = out.iter().map(|n| n.bitmap.width()).collect();
    assert_eq!(widths, (1..=64u32).collect::<Vec<_>>());
    assert_eq!(loader.calls.load(Ordering::SeqCst), 64);
}

#[test]
fn sequential_and_dedicated_pool_modes_agree() {
    let inputs: Vec<ImageInput> = (1..=8u8).map(|w| ImageInput::from(src(w))).collect();
    let seq = normalize_inputs(
        &inputs,
        &SizeFromBytes::new(),
        &LoadSettings {
            parallel: false,
            threads: None,
        },
    )
    .unwrap();
    let pooled = normalize_inputs(
        &inputs,
        &SizeFromBytes::new(),
        &LoadSettings {
            parallel: true,
            threads: Some(2),
        },
    )
    .unwrap();
    let a: Vec<_> = seq.iter().map(NormalizedImage::extent).collect();
    let b: Vec<_> = pooled.iter().map(NormalizedImage::extent).collect();
    assert_eq!(a, b);
}

#[test]
fn loader_failure_fails_the_whole_gather_unchanged() {
    let inputs = vec![
        ImageInput::from(src(1)),
        ImageInput::from(src(0)),
        ImageInput::from(src(2)),
    ];
    let err = normalize_inputs(&inputs, &SizeFromBytes::new(), &LoadSettings::default())
        .unwrap_err();
    assert!(err.to_string().contains("zero width source"));

    let err = normalize_inputs(
        &[ImageInput::from("missing.png"), ImageInput::from(src(1))],
        &SizeFromBytes::new(),
        &LoadSettings::default(),
    )
    .unwrap_err();
    assert!(matches!(err, MergeError::Io(_)));
}

#[test]
fn zero_threads_is_rejected() {
    let inputs = vec![ImageInput::from(src(1)), ImageInput::from(src(1))];
    let err = normalize_inputs(
        &inputs,
        &SizeFromBytes::new(),
        &LoadSettings {
            parallel: true,
            threads: Some(0),
        },
    )
    .unwrap_err();
    assert!(matches!(err, MergeError::Validation(_)));
}

#[test]
fn conversions_pick_the_expected_variant() {
    assert!(matches!(
        ImageInput::from(RgbaImage::new(1, 1)),
        ImageInput::Decoded(_)
    ));
    assert!(matches!(
        ImageInput::from(DynamicImage::new_rgb8(1, 1)),
        ImageInput::Decoded(_)
    ));
    assert!(matches!(
        ImageInput::from(Path::new("a.png")),
        ImageInput::Source(ImageSource::Path(_))
    ));
    assert!(matches!(
        ImageInput::from(vec![1u8, 2, 3]),
        ImageInput::Source(ImageSource::Bytes(_))
    ));
}
