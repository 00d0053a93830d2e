use std::fmt;

/// Pages shown on each side of the current one.
pub const WINDOW_RADIUS: u32 = 2;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageMarker {
    Page(u32),
    Ellipsis,
}

impl fmt::Display for PageMarker {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PageMarker::Page(n) => write!(f, "{}", n),
            PageMarker::Ellipsis => f.write_str("..."),
        }
    }
}

/// Page markers for a pager: first and last page, a window of
/// [`WINDOW_RADIUS`] around `current`, and an ellipsis wherever the window
/// does not reach an edge.
///
/// `last_page` of 0 is treated as 1 and `current` is clamped into range.
pub fn pagination_range(current: u32, last_page: u32) -> Vec<PageMarker> {
    let last = last_page.max(1);
    let current = current.clamp(1, last);
    let window_start = current.saturating_sub(WINDOW_RADIUS).max(2);
    let window_end = current.saturating_add(WINDOW_RADIUS).min(last - 1);

    let mut range = vec![PageMarker::Page(1)];
    if current > WINDOW_RADIUS + 2 {
        range.push(PageMarker::Ellipsis);
    }
    range.extend((window_start..=window_end).map(PageMarker::Page));
    if current.saturating_add(WINDOW_RADIUS) < last - 1 {
        range.push(PageMarker::Ellipsis);
    }
    if last > 1 {
        range.push(PageMarker::Page(last));
    }
    range
}
