use super::*;

#[test]
fn oversized_surfaces_are_rejected() {
    assert!(CpuPainter::new(70_000, 10).is_err());
    assert!(CpuPainter::new(10, 70_000).is_err());
    assert!(CpuPainter::new(0, 10).is_err());
}

#[test]
fn filled_circle_covers_its_center_only() {
    let mut painter = CpuPainter::new(32, 32).unwrap();
    painter.clear();
    painter.fill_circle(Point::new(16.0, 16.0), 6.0, Rgba8::rgb(255, 0, 0));
    let frame = painter.finish();

    assert_eq!(frame.data.len(), 32 * 32 * 4);
    let center = frame.pixel(16, 16).unwrap();
    assert_eq!(center[3], 255);
    assert!(center[0] > 200);
    assert_eq!(frame.pixel(1, 1).unwrap()[3], 0);
}

#[test]
fn background_fills_on_clear() {
    let mut painter = CpuPainter::new(8, 8)
        .unwrap()
        .with_background(Rgba8::rgb(0, 0, 255));
    painter.clear();
    let frame = painter.finish();
    assert_eq!(frame.pixel(7, 7).unwrap(), [0, 0, 255, 255]);
}

#[test]
fn clear_discards_previous_drawing() {
    let mut painter = CpuPainter::new(16, 16).unwrap();
    painter.clear();
    painter.fill_circle(Point::new(8.0, 8.0), 4.0, Rgba8::rgb(0, 255, 0));
    painter.clear();
    let frame = painter.finish();
    assert!(frame.data.iter().all(|&b| b == 0));
}

#[test]
fn horizontal_line_is_rasterized() {
    let mut painter = CpuPainter::new(20, 20).unwrap();
    painter.clear();
    painter.stroke_line(
        Point::new(2.0, 10.0),
        Point::new(18.0, 10.0),
        4.0,
        Rgba8::rgb(255, 255, 255),
    );
    let frame = painter.finish();
    assert!(frame.pixel(10, 10).unwrap()[3] > 200);
    assert_eq!(frame.pixel(10, 2).unwrap()[3], 0);
}

#[test]
fn straight_alpha_conversion_restores_color() {
    let frame = FrameRGBA {
        width: 1,
        height: 1,
        data: vec![64, 0, 0, 128],
        premultiplied: true,
    }
    .into_straight();
    assert!(!frame.premultiplied);
    assert_eq!(frame.data, vec![128, 0, 0, 128]);
}

#[test]
fn degenerate_lines_are_ignored() {
    assert!(line_quad(Point::new(1.0, 1.0), Point::new(1.0, 1.0), 2.0).is_none());
}

#[test]
fn surface_fill_blends_over_background() {
    let mut painter = CpuPainter::new(4, 4)
        .unwrap()
        .with_background(Rgba8::rgb(255, 255, 255));
    painter.clear();
    painter.fill_surface(Rgba8 {
        r: 0,
        g: 0,
        b: 0,
        a: 128,
    });
    let frame = painter.finish().into_straight();
    let px = frame.pixel(2, 2).unwrap();
    assert_eq!(px[3], 255);
    assert!(px[0] > 100 && px[0] < 155, "half wash, got {px:?}");

    let mut clear = CpuPainter::new(4, 4).unwrap();
    clear.clear();
    clear.fill_surface(Rgba8 {
        r: 9,
        g: 9,
        b: 9,
        a: 0,
    });
    assert!(clear.finish().data.iter().all(|&b| b == 0));
}
