use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Anything with an x and a y that decimation can select and clone.
///
/// Decimation never mutates its input. It either clones a point as is or
/// clones it with x replaced through [`DataPoint::with_x`], so any extra
/// payload a point carries must survive `with_x` untouched.
pub trait DataPoint: Clone {
    fn x(&self) -> f64;
    fn y(&self) -> f64;
    fn with_x(&self, x: f64) -> Self;
}

/// A data point with arbitrary auxiliary fields.
///
/// On the wire the auxiliary fields sit next to `x` and `y`:
/// `{"x": 1.5, "y": 20.0, "series": "cpu"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Point {
            x,
            y,
            extra: Map::new(),
        }
    }

    /// Attach an auxiliary field, replacing any previous value under `key`.
    pub fn with_field(mut self, key: impl Into<String>, value: impl Into<Value>) -> Self {
        self.extra.insert(key.into(), value.into());
        self
    }

    /// The `series` field as a string, if present.
    pub fn series(&self) -> Option<&str> {
        self.extra.get("series").and_then(Value::as_str)
    }
}

impl DataPoint for Point {
    fn x(&self) -> f64 {
        self.x
    }

    fn y(&self) -> f64 {
        self.y
    }

    fn with_x(&self, x: f64) -> Self {
        Point {
            x,
            ..self.clone()
        }
    }
}

impl DataPoint for (f64, f64) {
    fn x(&self) -> f64 {
        self.0
    }

    fn y(&self) -> f64 {
        self.1
    }

    fn with_x(&self, x: f64) -> Self {
        (x, self.1)
    }
}

impl From<(f64, f64)> for Point {
    fn from((x, y): (f64, f64)) -> Self {
        Point::new(x, y)
    }
}

/// Sort points by ascending x, keeping the relative order of equal x values.
pub fn sort_by_x<P: DataPoint>(points: &mut [P]) {
    points.sort_by(|a, b| a.x().total_cmp(&b.x()));
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn with_x_keeps_extra_fields() {
        let p = Point::new(1.0, 2.0)
            .with_field("series", "cpu")
            .with_field("host", 7);
        let moved = p.with_x(1.25);
        assert_eq!(moved.x, 1.25);
        assert_eq!(moved.y, 2.0);
        assert_eq!(moved.extra, p.extra);
        assert_eq!(p.x, 1.0);
    }

    #[test]
    fn extra_fields_are_flattened() {
        let p: Point = serde_json::from_str(r#"{"x":3,"y":-1.5,"series":"mem","id":4}"#).unwrap();
        assert_eq!(p.x, 3.0);
        assert_eq!(p.y, -1.5);
        assert_eq!(p.series(), Some("mem"));
        assert_eq!(p.extra.get("id"), Some(&Value::from(4)));

        let json = serde_json::to_value(&p).unwrap();
        assert_eq!(json["series"], "mem");
        assert_eq!(json["x"], 3.0);
    }

    #[test]
    fn tuple_points() {
        let p = (4.0, 9.0);
        assert_eq!(p.x(), 4.0);
        assert_eq!(p.y(), 9.0);
        assert_eq!(p.with_x(2.5), (2.5, 9.0));
    }

    #[test]
    fn sort_is_stable() {
        let mut points = vec![
            Point::new(2.0, 0.0),
            Point::new(1.0, 1.0),
            Point::new(1.0, 2.0),
            Point::new(0.0, 3.0),
        ];
        sort_by_x(&mut points);
        let ys: Vec<f64> = points.iter().map(|p| p.y).collect();
        assert_eq!(ys, vec![3.0, 1.0, 2.0, 0.0]);
    }
}
