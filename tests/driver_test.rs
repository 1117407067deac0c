use mapview::{constants::TILE_SIZE, prelude::*};

fn init_logging() {
    let _ = env_logger::builder().is_test(true).try_init();
}

/// End-to-end flows through the shared viewport and the tokio frame driver
fn shared_viewport() -> SharedViewport {
    init_logging();
    let state = ViewportBuilder::new(8192, 8192)
        .with_max_scale(4.0)
        .with_layout_size(Size::new(1024, 768))
        .with_centroid(0.5, 0.5)
        .build()
        .unwrap();
    SharedViewport::new(state)
}

#[tokio::test(start_paused = true)]
async fn test_fling_decays_on_driver() {
    let shared = shared_viewport();
    let driver = FrameDriver::spawn(shared.clone(), FrameTimingConfig::default());
    let start = shared.snapshot();

    shared.handle(GestureEvent::Fling {
        velocity: Offset::new(-3000.0, 0.0),
    });
    tokio::time::sleep(Duration::from_secs(3)).await;

    let end = shared.snapshot();
    assert!(end.scroll_x > start.scroll_x);
    assert_eq!(end.scroll_y, start.scroll_y);
    assert!(!shared.is_animating());
    driver.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_tap_halts_fling_on_driver() {
    let shared = shared_viewport();
    let driver = FrameDriver::spawn(shared.clone(), FrameTimingConfig::default());

    shared.handle(GestureEvent::Fling {
        velocity: Offset::new(0.0, 4000.0),
    });
    tokio::time::sleep(Duration::from_millis(100)).await;
    assert!(shared.with(|state| state.is_flinging()));

    shared.handle(GestureEvent::Tap);
    let halted = shared.snapshot();
    tokio::time::sleep(Duration::from_millis(500)).await;

    assert_eq!(shared.snapshot(), halted);
    assert!(!shared.with(|state| state.is_flinging()));
    driver.cancel();
}

#[tokio::test(start_paused = true)]
async fn test_smooth_scroll_then_fetch_visible_tiles() {
    let shared = shared_viewport();
    let driver = FrameDriver::spawn(shared.clone(), FrameTimingConfig::default());

    shared.with(|state| {
        state.smooth_scroll_to(
            0.25,
            0.75,
            1.0,
            Some(AnimationSpec::tween(
                Duration::from_millis(300),
                EasingFunction::EaseInOutCubic,
            )),
        )
    });
    tokio::time::sleep(Duration::from_millis(500)).await;

    let snapshot = shared.snapshot();
    assert!((snapshot.centroid_x - 0.25).abs() < 1e-9);
    assert!((snapshot.centroid_y - 0.75).abs() < 1e-9);

    let resolver = VisibleTilesResolver::for_image(8192, 8192, TILE_SIZE).unwrap();
    let visible = resolver.resolve(&snapshot).unwrap();
    assert_eq!(visible.level, resolver.level_count() - 1);

    // every other column is missing from this source
    let provider = FnTileProvider::new(|coord: TileCoord| {
        (coord.col % 2 == 0).then(|| coord.to_string().into_bytes())
    });
    let coords = visible.coords();
    let tiles = fetch_tiles(&provider, &coords).await;
    assert!(!tiles.is_empty());
    assert!(tiles.len() < coords.len());
    assert!(tiles.iter().all(|(coord, _)| visible.contains(coord)));

    shared.detach();
    driver.join().await;
}
