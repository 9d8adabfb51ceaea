use pagekeeper::{PageRange, PageWindow};

fn window(page_count: usize, budget: usize, current: usize) -> PageWindow {
    PageWindow::compute(Some(page_count), None, budget, |_| current)
}

#[test]
fn cached_range_is_bounded_and_contains_current() {
    for page_count in [1, 2, 3, 7, 100] {
        for budget in 1..12 {
            for current in 0..page_count {
                let w = window(page_count, budget, current);
                let cached = w.cached().expect("document loaded");
                assert!(cached.last <= page_count - 1, "{w} over {page_count} pages");
                assert!(cached.first <= current && current <= cached.last, "{w}");
                assert!(w.is_page_cached(current));
                assert_eq!(w.current(), Some(current));
            }
        }
    }
}

#[test]
fn larger_budget_never_shrinks_cached_range() {
    for current in [0, 1, 10, 49, 98, 99] {
        let mut previous = window(100, 1, current).cached().unwrap();
        for budget in 2..30 {
            let next = window(100, budget, current).cached().unwrap();
            assert!(next.first <= previous.first, "budget {budget} at {current}");
            assert!(next.last >= previous.last, "budget {budget} at {current}");
            previous = next;
        }
    }
}

#[test]
fn scenario_middle_of_document() {
    let w = window(100, 4, 10);
    assert_eq!(w.first_cached(), Some(8));
    assert_eq!(w.last_cached(), Some(12));
}

#[test]
fn scenario_start_of_document() {
    let w = window(100, 4, 0);
    assert_eq!(w.first_cached(), Some(0));
    assert_eq!(w.last_cached(), Some(2));
}

#[test]
fn scenario_no_document() {
    let w = PageWindow::compute(None, Some(PageRange::new(3, 5)), 4, |_| 0);
    assert_eq!(w.current(), Some(3));
    assert_eq!(w.first_cached(), Some(3));
    assert_eq!(w.last_cached(), Some(5));
    assert!(w.is_page_visible(4));
    assert!(!w.is_page_cached(6));
}

#[test]
fn end_of_document_never_reports_page_past_the_end() {
    let w = window(10, 8, 9);
    assert_eq!(w.cached(), Some(PageRange::new(5, 9)));
    assert!(!w.is_page_cached(10));
}
