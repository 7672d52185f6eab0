use std::fmt;
use std::str::FromStr;

use crate::error::Error;
use crate::minmax::min_max;
use crate::point::DataPoint;

/// A decimation strategy, selected by name.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Algorithm {
    /// Keep the first, last, lowest and highest point of every pixel column.
    MinMax,
}

impl Algorithm {
    pub fn name(&self) -> &'static str {
        match self {
            Algorithm::MinMax => "min-max",
        }
    }

    /// Decimate `data` for a surface `columns` pixels wide.
    pub fn decimate<P: DataPoint>(&self, data: &[P], columns: usize) -> Vec<P> {
        match self {
            Algorithm::MinMax => min_max(data, columns),
        }
    }
}

impl FromStr for Algorithm {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "min-max" => Ok(Algorithm::MinMax),
            other => Err(Error::UnsupportedAlgorithm(other.to_string())),
        }
    }
}

impl fmt::Display for Algorithm {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_min_max() {
        assert_eq!("min-max".parse::<Algorithm>().unwrap(), Algorithm::MinMax);
        assert_eq!(Algorithm::MinMax.to_string(), "min-max");
    }

    #[test]
    fn unknown_name_is_config_error() {
        for name in ["lttb", "MIN-MAX", "", "min_max"] {
            match name.parse::<Algorithm>() {
                Err(Error::UnsupportedAlgorithm(n)) => assert_eq!(n, name),
                other => panic!("expected unsupported algorithm, got {:?}", other),
            }
        }
        let err = "lttb".parse::<Algorithm>().unwrap_err();
        assert_eq!(err.to_string(), "unsupported decimation algorithm 'lttb'");
    }

    #[test]
    fn decimate_dispatches() {
        let data: Vec<(f64, f64)> = vec![(0.0, 0.0), (1.0, 4.0), (2.0, -4.0), (3.0, 0.0), (8.0, 1.0)];
        assert_eq!(Algorithm::MinMax.decimate(&data, 1), min_max(&data, 1));
    }
}
