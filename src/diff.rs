//! Dirty-region diffing between the front buffer and the copy last sent to the panel.

use itertools::iproduct;

/// Bounding rectangle of changed bytes, in buffer-byte coordinates: columns `min_x..=max_x` of
/// pages `min_page..=max_page`.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct DirtyRegion {
    pub min_x: u16,
    pub max_x: u16,
    pub min_page: u16,
    pub max_page: u16,
}

impl DirtyRegion {
    /// A region covering a whole buffer.
    pub fn full(width: u16, pages: u16) -> Self {
        DirtyRegion {
            min_x: 0,
            max_x: width.saturating_sub(1),
            min_page: 0,
            max_page: pages.saturating_sub(1),
        }
    }

    /// Number of columns covered.
    pub fn columns(&self) -> u16 {
        self.max_x - self.min_x + 1
    }

    /// Number of pages covered.
    pub fn page_count(&self) -> u16 {
        self.max_page - self.min_page + 1
    }

    fn include(this: &mut Option<Self>, x: u16, page: u16) {
        match this {
            None => {
                *this = Some(DirtyRegion {
                    min_x: x,
                    max_x: x,
                    min_page: page,
                    max_page: page,
                })
            }
            Some(r) => {
                r.min_x = r.min_x.min(x);
                r.max_x = r.max_x.max(x);
                r.min_page = r.min_page.min(page);
                r.max_page = r.max_page.max(page);
            }
        }
    }
}

/// Walk both buffers page by page, column by column, recording the bounds of every byte where
/// `front` and `back` differ and copying `front` into `back` along the way. Returns `None` when
/// nothing changed. On return `back == front` in either case.
///
/// Both slices must hold at least `width * pages` bytes.
pub fn compute_dirty_region(
    front: &[u8],
    back: &mut [u8],
    width: u16,
    pages: u16,
) -> Option<DirtyRegion> {
    let mut region = None;
    for (page, x) in iproduct!(0..pages, 0..width) {
        let pos = x as usize + page as usize * width as usize;
        if front[pos] != back[pos] {
            DirtyRegion::include(&mut region, x, page);
            back[pos] = front[pos];
        }
    }
    region
}
