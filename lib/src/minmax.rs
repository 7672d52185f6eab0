use crate::point::DataPoint;

/// Min-max column decimation.
///
/// Reduces a slice of points sorted by x so that, drawn into `columns` pixel
/// columns, the line looks the same as the original. Points are bucketed by
/// the pixel column their x falls into. For each column the first and last
/// points are kept as they are, and the points holding the column's minimum
/// and maximum y are kept with their x moved to the average x of the column.
/// At most four points survive per column.
///
/// The last column is only ever opened, never closed: its interior extrema
/// and its own last point are emitted only if another column follows. When
/// the final point has a strictly greater x than every other point it sits
/// in a column of its own, so the line's end point is always kept.
///
/// Returns an empty vector for empty input and the original data unchanged
/// when `columns == 0`.
pub fn min_max<P: DataPoint>(data: &[P], columns: usize) -> Vec<P> {
    let (Some(first), Some(last)) = (data.first(), data.last()) else {
        return Vec::new();
    };
    if columns == 0 {
        return data.to_vec();
    }

    let scale = ColumnScale::new(first.x(), last.x(), columns);
    let mut decimated = Vec::new();
    let mut current: Option<ColumnState> = None;

    for (i, point) in data.iter().enumerate() {
        let column = scale.column(point.x());
        match current.as_mut() {
            Some(state) if state.column == column => state.fold(i, point),
            _ => {
                if let Some(state) = current.take() {
                    state.close(data, i - 1, &mut decimated);
                }
                decimated.push(point.clone());
                current = Some(ColumnState::open(column, i, point.y()));
            }
        }
    }

    decimated
}

/// Linear mapping from data x to an integer pixel column.
#[derive(Debug, Clone, Copy)]
struct ColumnScale {
    min: f64,
    span: f64,
    columns: f64,
}

impl ColumnScale {
    fn new(min: f64, max: f64, columns: usize) -> Self {
        ColumnScale {
            min,
            span: max - min,
            columns: columns as f64,
        }
    }

    /// Column index of `x`. Every x maps to column 0 when the span is zero.
    fn column(&self, x: f64) -> i64 {
        if !(self.span > 0.0) || !self.span.is_finite() {
            return 0;
        }
        ((x - self.min) / self.span * self.columns).floor() as i64
    }
}

/// Accumulators for the column currently being scanned.
#[derive(Debug, Clone, Copy)]
struct ColumnState {
    column: i64,
    start: usize,
    min_index: usize,
    min_y: f64,
    max_index: usize,
    max_y: f64,
    // Average original x of the points after the column start.
    avg_x: f64,
    count: usize,
}

impl ColumnState {
    fn open(column: i64, start: usize, y: f64) -> Self {
        ColumnState {
            column,
            start,
            min_index: start,
            min_y: y,
            max_index: start,
            max_y: y,
            avg_x: 0.0,
            count: 0,
        }
    }

    fn fold<P: DataPoint>(&mut self, i: usize, point: &P) {
        let y = point.y();
        // Strict comparisons: the first point reaching an extreme keeps it.
        if y < self.min_y {
            self.min_y = y;
            self.min_index = i;
        } else if y > self.max_y {
            self.max_y = y;
            self.max_index = i;
        }
        self.avg_x = (self.count as f64 * self.avg_x + point.x()) / (self.count + 1) as f64;
        self.count += 1;
    }

    /// Emit the interior extrema and the last point of a finished column.
    /// The column start was already emitted when the column was opened.
    fn close<P: DataPoint>(&self, data: &[P], last: usize, out: &mut Vec<P>) {
        let lo = self.min_index.min(self.max_index);
        let hi = self.min_index.max(self.max_index);

        if lo != self.start && lo != last {
            out.push(data[lo].with_x(self.avg_x));
        }
        if hi != lo && hi != self.start && hi != last {
            out.push(data[hi].with_x(self.avg_x));
        }
        if last != self.start {
            out.push(data[last].clone());
        }
    }
}
