use pagekeeper::{BoundsCache, Command, Effect, Navigator, PageTree, ResidencyPlan, Settings, Size};

fn navigator() -> Navigator {
    let mut settings = Settings::default();
    settings.app.bounds_cache_capacity = 64;
    if let Some(book) = settings.book.as_mut() {
        book.zoom = 3.0;
    }
    let mut nav = Navigator::new(settings);
    let _ = nav.apply(Command::SetViewSize(Size::new(200.0, 100.0)));
    let _ = nav.apply(Command::SetDocument(Some(vec![Size::new(100.0, 100.0); 20])));
    nav
}

#[test]
fn relayout_at_same_zoom_refreshes_cached_bounds() {
    let mut nav = navigator();
    let trees: Vec<_> = (0..10).map(|page| PageTree::new(page, 2)).collect();

    let mut cache = BoundsCache::new(64);
    let mut stale = BoundsCache::new(64);
    let warm = nav.snapshot();
    let _ = ResidencyPlan::sweep_cached(&warm, &trees, &mut cache);
    let _ = ResidencyPlan::sweep_cached(&warm, &trees, &mut stale);

    // pages go from 600 to 900 units tall at zoom 3
    let effects = nav.apply(Command::SetViewSize(Size::new(300.0, 100.0)));
    assert!(effects.contains(&Effect::InvalidateBounds));
    assert!(cache.apply_effects(&effects));

    let effects = nav.apply(Command::ScrollBy { dx: 0.0, dy: 1500.0 });
    assert!(!cache.apply_effects(&effects));

    let state = nav.snapshot();
    let plain = ResidencyPlan::sweep(&state, &trees);
    let cached = ResidencyPlan::sweep_cached(&state, &trees, &mut cache);

    assert_eq!(cached, plain);
    assert!(!plain.keep.is_empty());
    assert!(plain.keep.iter().all(|id| id.page_index == 1));

    // without the invalidation the old layout would still be served
    let outdated = ResidencyPlan::sweep_cached(&state, &trees, &mut stale);
    assert_ne!(outdated, plain);
}
