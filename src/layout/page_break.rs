//! # Page Break Decisions
//!
//! Deciding what happens when a node meets the bottom of a page: place it,
//! push it to the next page, or split it between the two.

/// What to do with a node at the current cursor position.
#[derive(Debug, Clone, PartialEq)]
pub enum BreakDecision {
    /// Place the entire node on the current page.
    Place,
    /// Move the entire node to the next page.
    MoveToNextPage,
    /// Place the first `items_on_current_page` items here, the rest after a break.
    Split { items_on_current_page: usize },
}

/// Where the cursor stands on the current page.
#[derive(Debug, Clone, Copy)]
pub struct PageSpace {
    /// Height left below the cursor.
    pub remaining: f64,
    /// Height of an empty page's content area.
    pub capacity: f64,
    /// Whether nothing has been placed on this page yet.
    pub at_page_top: bool,
}

/// Decide how to place a node made of items with the given heights.
///
/// An unbreakable node moves to the next page only when that actually helps:
/// when it would fit on an empty page and this page isn't already empty.
/// Otherwise it is placed and allowed to overflow.
pub fn decide_break(
    space: PageSpace,
    item_heights: &[f64],
    breakable: bool,
    min_orphan_lines: usize,
    min_widow_lines: usize,
) -> BreakDecision {
    let total: f64 = item_heights.iter().sum();

    if total <= space.remaining {
        return BreakDecision::Place;
    }

    if !breakable {
        if !space.at_page_top && total <= space.capacity {
            return BreakDecision::MoveToNextPage;
        }
        return BreakDecision::Place;
    }

    let mut running = 0.0;
    let mut fit_count = 0;
    for &h in item_heights {
        if running + h > space.remaining {
            break;
        }
        running += h;
        fit_count += 1;
    }

    if fit_count == 0 {
        return if space.at_page_top {
            BreakDecision::Split {
                items_on_current_page: 1,
            }
        } else {
            BreakDecision::MoveToNextPage
        };
    }

    let total_items = item_heights.len();

    // Too few items would stay behind on this page.
    if fit_count < min_orphan_lines && !space.at_page_top {
        return BreakDecision::MoveToNextPage;
    }

    // Too few items would be carried to the next page.
    let carried = total_items - fit_count;
    if carried < min_widow_lines {
        let adjusted = fit_count.saturating_sub(min_widow_lines - carried);
        if adjusted == 0 {
            return if space.at_page_top {
                BreakDecision::Split {
                    items_on_current_page: fit_count,
                }
            } else {
                BreakDecision::MoveToNextPage
            };
        }
        return BreakDecision::Split {
            items_on_current_page: adjusted,
        };
    }

    BreakDecision::Split {
        items_on_current_page: fit_count,
    }
}
