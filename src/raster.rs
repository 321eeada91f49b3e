/// Integer-only rasterizers for the two primitives the game draws with.
///
/// Both produce lazy iterators of `Pixel`s and keep no state outside the
/// iterator itself, so they can be used from anywhere.

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Pixel {
    pub x: i32,
    pub y: i32,
}

impl Pixel {
    pub fn new(x: i32, y: i32) -> Self {
        Pixel { x, y }
    }
}

// ── Line ─────────────────────────────────────────────────────────────────────

/// Midpoint (Bresenham) line walk.
///
/// Steep lines are walked along y by swapping axes, and the endpoints are
/// ordered so the major axis always increases. Rasterizing a segment in
/// either direction therefore visits the same pixels.
#[derive(Clone, Debug)]
pub struct Line {
    steep: bool,
    x: i32,
    x_end: i32,
    y: i32,
    y_step: i32,
    dx: i32,
    dy: i32,
    error: i32,
    done: bool,
}

/// Rasterize the segment `(x0, y0)–(x1, y1)`, both endpoints inclusive.
pub fn line(x0: i32, y0: i32, x1: i32, y1: i32) -> Line {
    let (mut x0, mut y0, mut x1, mut y1) = (x0, y0, x1, y1);
    let steep = (y1 - y0).abs() > (x1 - x0).abs();
    if steep {
        std::mem::swap(&mut x0, &mut y0);
        std::mem::swap(&mut x1, &mut y1);
    }
    if x0 > x1 {
        std::mem::swap(&mut x0, &mut x1);
        std::mem::swap(&mut y0, &mut y1);
    }

    let dx = x1 - x0;
    Line {
        steep,
        x: x0,
        x_end: x1,
        y: y0,
        y_step: if y0 < y1 { 1 } else { -1 },
        dx,
        dy: (y1 - y0).abs(),
        error: dx / 2,
        done: false,
    }
}

impl Iterator for Line {
    type Item = Pixel;

    fn next(&mut self) -> Option<Pixel> {
        if self.done {
            return None;
        }
        let px = if self.steep {
            Pixel::new(self.y, self.x)
        } else {
            Pixel::new(self.x, self.y)
        };

        if self.x == self.x_end {
            self.done = true;
        } else {
            self.x += 1;
            self.error -= self.dy;
            if self.error < 0 {
                self.y += self.y_step;
                self.error += self.dx;
            }
        }
        Some(px)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = if self.done { 0 } else { (self.x_end - self.x) as usize + 1 };
        (n, Some(n))
    }
}

impl ExactSizeIterator for Line {}

// ── Circle ───────────────────────────────────────────────────────────────────

/// Midpoint circle walk over the first octant, mirrored eight ways.
///
/// Each step emits its eight reflections in a fixed order before the
/// decision variable advances; points on the axes and diagonals therefore
/// appear more than once.
#[derive(Clone, Debug)]
pub struct Circle {
    cx: i32,
    cy: i32,
    x: i32,
    y: i32,
    decision: i32,
    /// Index into the current step's eight reflections.
    octant: u8,
    single: bool,
}

/// Rasterize the outline of the circle of `radius` around `(cx, cy)`.
/// A zero radius yields the centre pixel once.
pub fn circle(cx: i32, cy: i32, radius: u32) -> Circle {
    let r = i32::try_from(radius).unwrap_or(i32::MAX);
    Circle {
        cx,
        cy,
        x: r,
        y: 0,
        decision: 1 - r,
        octant: 0,
        single: radius == 0,
    }
}

impl Iterator for Circle {
    type Item = Pixel;

    fn next(&mut self) -> Option<Pixel> {
        if self.single {
            self.single = false;
            // Mark the walk as finished.
            self.y = self.x + 1;
            return Some(Pixel::new(self.cx, self.cy));
        }
        if self.x < self.y {
            return None;
        }

        let (x, y) = (self.x, self.y);
        let (dx, dy) = match self.octant {
            0 => (x, y),
            1 => (-x, y),
            2 => (x, -y),
            3 => (-x, -y),
            4 => (y, x),
            5 => (-y, x),
            6 => (y, -x),
            _ => (-y, -x),
        };
        let px = Pixel::new(self.cx + dx, self.cy + dy);

        self.octant += 1;
        if self.octant == 8 {
            self.octant = 0;
            self.y += 1;
            if self.decision < 0 {
                self.decision += 2 * self.y + 1;
            } else {
                self.x -= 1;
                self.decision += 2 * (self.y - self.x) + 1;
            }
        }
        Some(px)
    }
}
