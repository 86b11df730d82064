use gradient_grain::{
    AspectRatio, CanvasDims, ColorStop, Compositor, ExportFormat, ExportRequest, LayerParams,
    NoiseLevel, PaletteTheme, Point, Resolution, StopList, export_image, randomize_palette,
};
use image::GenericImageView as _;
use rand::{SeedableRng, rngs::StdRng};

#[test]
fn export_4k_matches_requested_size() {
    let stops = StopList::pastel_default();
    let out = export_image(
        &Compositor::default(),
        stops.as_slice(),
        NoiseLevel::Step(0),
        ExportRequest::new(3840, 2160, ExportFormat::Png),
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();

    assert_eq!((out.width, out.height), (3840, 2160));
    assert_eq!(out.filename, "gradient_3840x2160.png");
    let img = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!(img.dimensions(), (3840, 2160));
}

#[test]
fn exported_pixels_are_opaque_without_grain() {
    let stops = StopList::pastel_default();
    let out = export_image(
        &Compositor::default(),
        stops.as_slice(),
        NoiseLevel::Step(0),
        ExportRequest::new(40, 30, ExportFormat::Png),
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();
    let img = image::load_from_memory(&out.bytes).unwrap().to_rgba8();
    assert!(img.pixels().all(|p| p.0[3] == 255));
}

#[test]
fn phone_presets_are_portrait() {
    assert_eq!(Resolution::Hd.output_size(AspectRatio::Phone), (1280, 2773));
    assert_eq!(Resolution::Uhd4k.output_size(AspectRatio::Widescreen), (3840, 2160));
}

#[test]
fn jpeg_export_decodes() {
    let stops = StopList::pastel_default();
    let out = export_image(
        &Compositor::default(),
        stops.as_slice(),
        NoiseLevel::Step(4),
        ExportRequest::new(48, 24, ExportFormat::Jpeg),
        &mut StdRng::seed_from_u64(7),
    )
    .unwrap();
    let img = image::load_from_memory(&out.bytes).unwrap();
    assert_eq!(img.dimensions(), (48, 24));
}

/// Render then export succeeds for any valid list: every theme, lengths
/// 2..8, edge positions and sizes, unparseable colors and fractional canvases.
#[test]
fn render_then_export_never_fails_for_valid_lists() {
    let compositor = Compositor::default();
    let mut rng = StdRng::seed_from_u64(0x5eed);
    let canvases = [(37.5, 21.25), (1.9, 3.7), (64.0, 64.0)];
    let edges = [
        (Point::new(0.0, 0.0), 0.1),
        (Point::new(1.0, 1.0), 2.0),
        (Point::new(0.0, 1.0), 0.1),
        (Point::new(1.0, 0.0), 2.0),
    ];

    for theme in PaletteTheme::ALL {
        for len in 2..=8 {
            let seed_list = StopList::new(
                (0..len)
                    .map(|_| ColorStop::new("#000000", Point::new(0.5, 0.5), 1.0))
                    .collect(),
            )
            .unwrap();
            let mut stops = randomize_palette(&seed_list, theme, &mut rng);
            let (position, size) = edges[len % edges.len()];
            stops.set_position(len - 1, position).unwrap();
            stops.set_size(len - 1, size).unwrap();
            if len % 3 == 0 {
                stops.set_color(1, "not-a-color").unwrap();
            }

            for (w, h) in canvases {
                let dims = CanvasDims::new(w, h).unwrap();
                let level = NoiseLevel::Step((len % 5) as u8);
                let mut params = LayerParams::clean(dims, level);
                params.show_handles = len % 2 == 0;
                params.hovered = Some(0);
                let layers = compositor
                    .render(stops.as_slice(), params, &mut rng)
                    .unwrap_or_else(|e| panic!("{theme:?} len {len} {w}x{h}: {e}"));
                assert!(!layers.gradient.data.is_empty());

                let (pw, ph) = dims.pixel_size().unwrap();
                for format in [ExportFormat::Png, ExportFormat::Jpeg] {
                    let out = export_image(
                        &compositor,
                        stops.as_slice(),
                        level,
                        ExportRequest::new(pw, ph, format),
                        &mut rng,
                    )
                    .unwrap_or_else(|e| panic!("{theme:?} len {len} {w}x{h} {format:?}: {e}"));
                    assert!(!out.bytes.is_empty());
                    assert_eq!((out.width, out.height), (pw, ph));
                }
            }
        }
    }
}
