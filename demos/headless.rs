use mapview::{constants::TILE_SIZE, prelude::*};
use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc,
};

const FRAME: Duration = Duration::from_millis(16);

fn print_state(label: &str, state: &ViewportState) {
    println!(
        "   {label}: scale {:.3}, scroll ({:.1}, {:.1}), rotation {:.1}°, centroid ({:.3}, {:.3})",
        state.scale(),
        state.scroll_x(),
        state.scroll_y(),
        state.rotation(),
        state.centroid_x(),
        state.centroid_y()
    );
}

fn settle(state: &mut ViewportState) -> usize {
    let mut frames = 0;
    while state.advance(FRAME) {
        frames += 1;
    }
    frames
}

/// Example of driving a viewport without any UI
fn main() -> mapview::Result<()> {
    mapview::init_logging();

    println!("🗺️ Mapview Headless Example");
    println!("===========================");

    let notifications = Arc::new(AtomicUsize::new(0));
    let counter = notifications.clone();

    // 16k x 8k image
    let mut state = ViewportBuilder::new(16_384, 8_192)
        .with_max_scale(40.0)
        .with_scale(0.0)
        .with_centroid(0.5, 0.5)
        .with_listener(move |_: &TransformSnapshot| {
            counter.fetch_add(1, Ordering::Relaxed);
        })
        .build()?;
    let resolver = VisibleTilesResolver::for_image(16_384, 8_192, TILE_SIZE)?;

    state.handle(GestureEvent::Resize {
        size: Size::new(1024, 768),
    });
    println!("✅ Viewport created, {} levels", resolver.level_count());
    print_state("Initial", &state);

    println!("\n🔍 Pinch zoom around the center:");
    for _ in 0..5 {
        state.handle(GestureEvent::Pinch {
            scale_ratio: 1.5,
            centroid: Offset::new(512.0, 384.0),
        });
    }
    print_state("After pinch", &state);

    println!("\n🚀 Drag and fling:");
    state.handle(GestureEvent::Drag {
        delta: Offset::new(-200.0, -50.0),
    });
    state.handle(GestureEvent::Fling {
        velocity: Offset::new(-1500.0, 0.0),
    });
    println!("   Flinging: {}", state.is_flinging());
    let frames = settle(&mut state);
    print_state(&format!("Fling settled after {frames} frames"), &state);

    println!("\n👆 Double taps:");
    for _ in 0..3 {
        state.handle(GestureEvent::DoubleTap {
            position: Offset::new(300.0, 200.0),
        });
        settle(&mut state);
        print_state("Double tap", &state);
    }

    println!("\n🔄 Rotation:");
    state.handle(GestureEvent::Rotate {
        rotation_delta: 30.0,
    });
    state.smooth_rotate_to(90.0, Some(AnimationSpec::Spring(SpringSpec::high())));
    settle(&mut state);
    print_state("Rotated", &state);

    println!("\n🎯 Smooth scroll to the top-left quarter:");
    state.smooth_scroll_to(0.25, 0.25, 1.0, None);
    settle(&mut state);
    print_state("Arrived", &state);

    if let Some(tiles) = resolver.resolve(&state.snapshot()) {
        println!(
            "\n🧩 Visible tiles at level {}: cols {}..={}, rows {}..={} ({} tiles)",
            tiles.level,
            tiles.col_left,
            tiles.col_right,
            tiles.row_top,
            tiles.row_bottom,
            tiles.count()
        );
    }

    state.detach();
    println!(
        "\n✅ Done, {} state notifications",
        notifications.load(Ordering::Relaxed)
    );
    Ok(())
}
