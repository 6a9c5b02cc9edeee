/// Reusable animated-position arrays.
///
/// Sized once per point count. Growing past the current capacity replaces
/// the arrays outright; shrinking keeps them and narrows the active length.
#[derive(Debug, Default)]
pub struct PositionScratch {
    xs: Vec<f64>,
    ys: Vec<f64>,
    len: usize,
}

impl PositionScratch {
    pub fn with_len(len: usize) -> Self {
        Self {
            xs: vec![0.0; len],
            ys: vec![0.0; len],
            len,
        }
    }

    /// Set the active length, reallocating only when `len` exceeds capacity.
    /// Returns `true` when new arrays were allocated.
    pub fn ensure_len(&mut self, len: usize) -> bool {
        let grew = len > self.xs.len();
        if grew {
            self.xs = vec![0.0; len];
            self.ys = vec![0.0; len];
        }
        self.len = len;
        grew
    }

    pub fn len(&self) -> usize {
        self.len
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn capacity(&self) -> usize {
        self.xs.len()
    }

    #[inline]
    pub fn set(&mut self, i: usize, x: f64, y: f64) {
        self.xs[i] = x;
        self.ys[i] = y;
    }

    pub fn xs(&self) -> &[f64] {
        &self.xs[..self.len]
    }

    pub fn ys(&self) -> &[f64] {
        &self.ys[..self.len]
    }
}
