use super::*;

#[test]
fn writer_updates_pointer_and_viewport() {
    let (cell, writer) = InputCell::new();
    assert_eq!(cell.snapshot(), InputSnapshot::default());

    assert!(writer.push(InteractionEvent::PointerMoved { x: 10.0, y: 20.0 }));
    assert!(writer.push(InteractionEvent::Resized {
        width: 640.0,
        height: 480.0
    }));
    let snap = cell.snapshot();
    assert_eq!(snap.pointer, Some(Point::new(10.0, 20.0)));
    assert_eq!(snap.viewport, Some(Viewport::new(640.0, 480.0)));
    assert_eq!(snap.resize_count, 1);

    writer.push(InteractionEvent::PointerLeft);
    assert_eq!(cell.snapshot().pointer, None);
}

#[test]
fn non_finite_pointer_clears_position() {
    let (cell, writer) = InputCell::new();
    writer.push(InteractionEvent::PointerMoved { x: 1.0, y: 1.0 });
    writer.push(InteractionEvent::PointerMoved {
        x: f64::NAN,
        y: 1.0,
    });
    assert_eq!(cell.snapshot().pointer, None);
}

#[test]
fn detached_cell_drops_writes() {
    let (cell, writer) = InputCell::new();
    writer.push(InteractionEvent::PointerMoved { x: 1.0, y: 2.0 });
    cell.detach();
    assert!(!writer.is_attached());
    assert!(!writer.push(InteractionEvent::PointerMoved { x: 9.0, y: 9.0 }));
    assert_eq!(cell.snapshot().pointer, Some(Point::new(1.0, 2.0)));
}

#[test]
fn writer_can_publish_from_another_thread() {
    let (cell, writer) = InputCell::new();
    std::thread::spawn(move || {
        writer.push(InteractionEvent::Resized {
            width: 100.0,
            height: 50.0,
        });
    })
    .join()
    .unwrap();
    assert_eq!(cell.snapshot().viewport, Some(Viewport::new(100.0, 50.0)));
}

#[test]
fn events_deserialize_from_tagged_json() {
    let ev: InteractionEvent =
        serde_json::from_str(r#"{ "event": "pointer_moved", "x": 3.0, "y": 4.0 }"#).unwrap();
    assert_eq!(ev, InteractionEvent::PointerMoved { x: 3.0, y: 4.0 });
}
