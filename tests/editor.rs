use std::time::Duration;

use gradient_grain::{
    AspectRatio, Editor, EditorSettings, ExportFormat, FrameRGBA, GrainResult, NoiseLevel,
    NoopScheduler, PaletteTheme, Point, Surface,
};

#[derive(Default)]
struct Capture {
    last: Option<FrameRGBA>,
}

impl Surface for Capture {
    fn present(&mut self, frame: &FrameRGBA) -> GrainResult<()> {
        self.last = Some(frame.clone());
        Ok(())
    }
}

fn editor() -> Editor {
    Editor::new(EditorSettings::default(), Box::new(NoopScheduler))
        .unwrap()
        .with_seed(11)
}

#[test]
fn drag_then_redraw_moves_the_glow() {
    let mut e = editor();
    let (mut g, mut n) = (Capture::default(), Capture::default());
    e.redraw(&mut g, &mut n).unwrap();

    // Stop 2 sits at (0.5, 0.8) on the 300x650 phone canvas.
    assert_eq!(e.pointer_down(150.0, 520.0), Some(2));
    e.pointer_move(30.0, 65.0);
    e.pointer_up();
    assert_eq!(e.stops().get(2).unwrap().position, Point::new(0.1, 0.1));
    assert!(e.redraw(&mut g, &mut n).unwrap());

    let frame = g.last.unwrap();
    assert!(frame.premultiplied);
    assert_eq!((frame.width, frame.height), (300, 650));
    let noise = n.last.unwrap();
    assert!(!noise.premultiplied);
}

#[test]
fn hover_draws_handle_and_glow() {
    let mut e = editor();
    e.set_show_handles(true);
    e.pointer_move(240.0, 330.0);
    assert_eq!(e.hovered(), Some(1));

    let hovered = e.render_current().unwrap();
    // Inside the 10px disc of stop 1 (#BAFFC9).
    assert_eq!(hovered.gradient.pixel(240, 316).unwrap(), [0xBA, 0xFF, 0xC9, 255]);

    let plain = e
        .render(e.dims(), NoiseLevel::Step(0), true, None)
        .unwrap();
    assert_ne!(hovered.gradient, plain.gradient);
}

#[test]
fn randomize_runs_to_completion() {
    let mut e = editor();
    let before = e.stops().clone();
    assert!(e.randomize_palette(PaletteTheme::Vibrant, Duration::ZERO).unwrap());

    let mut t = 0;
    while e.tick(Duration::from_millis(t)) {
        t += 16;
    }
    assert!(!e.is_transitioning());
    assert_eq!(e.stops().len(), before.len());
    assert_ne!(e.stops(), &before);
    assert_eq!(e.stops().get(0).unwrap().position, Point::new(0.5, 0.5));
}

#[test]
fn aspect_change_resizes_preview_and_export_follows() {
    let mut e = editor();
    assert!(e.set_aspect_ratio(AspectRatio::Widescreen, Duration::ZERO).unwrap());
    while e.tick(Duration::from_millis(400)) {}
    assert_eq!(e.dims(), AspectRatio::Widescreen.preview_dims());

    let out = e.export_image(64, 36, ExportFormat::Png).unwrap();
    assert_eq!((out.width, out.height), (64, 36));
}

#[test]
fn remove_never_drops_below_two() {
    let mut e = editor();
    e.add_pastel_stop().unwrap();
    assert_eq!(e.stops().len(), 4);
    e.remove_stop(3).unwrap();
    e.remove_stop(0).unwrap();
    assert!(e.remove_stop(0).is_err());
    assert_eq!(e.stops().len(), 2);
}

#[test]
fn design_round_trips_through_json() {
    let mut e = editor();
    e.set_noise(NoiseLevel::Step(2)).unwrap();
    let json = e.design().to_json_string().unwrap();
    let back = gradient_grain::Design::from_json_str(&json).unwrap();
    assert_eq!(back, e.design());
}
