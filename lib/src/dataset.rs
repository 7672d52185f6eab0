use serde::{Deserialize, Serialize};

/// Which axis a series is indexed by.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IndexAxis {
    #[default]
    X,
    Y,
}

/// How a series is rendered.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SeriesKind {
    #[default]
    Line,
    Scatter,
    Bar,
}

/// The kind of scale the x axis uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ScaleKind {
    #[default]
    Linear,
    Time,
    Logarithmic,
    Category,
}

impl ScaleKind {
    /// Whether positions between data points interpolate linearly.
    pub fn is_continuous(&self) -> bool {
        matches!(self, ScaleKind::Linear | ScaleKind::Time)
    }
}

/// A cache-backed view over a dataset's points.
///
/// Reads return the decimated cache when one is stored and the original
/// points otherwise. Writes only ever replace the original points.
#[derive(Debug, Clone, PartialEq)]
pub struct DecimatedView<P> {
    original: Vec<P>,
    decimated: Option<Vec<P>>,
}

impl<P> DecimatedView<P> {
    pub fn new(original: Vec<P>) -> Self {
        DecimatedView {
            original,
            decimated: None,
        }
    }

    pub fn read(&self) -> &[P] {
        self.decimated.as_deref().unwrap_or(&self.original)
    }

    pub fn write(&mut self, points: Vec<P>) {
        self.original = points;
    }

    pub fn original(&self) -> &[P] {
        &self.original
    }

    pub fn decimated(&self) -> Option<&[P]> {
        self.decimated.as_deref()
    }

    /// Replace the decimated cache wholesale.
    pub fn store(&mut self, decimated: Vec<P>) {
        self.decimated = Some(decimated);
    }

    pub fn invalidate(&mut self) {
        self.decimated = None;
    }

    pub fn into_original(self) -> Vec<P> {
        self.original
    }
}

/// A series of points as the host chart holds it.
///
/// Points live in `data` until an intercept is installed. From then on they
/// live in the intercept's [`DecimatedView`] and `data` stays empty.
#[derive(Debug, Clone, PartialEq)]
pub struct Dataset<P> {
    pub label: String,
    pub kind: SeriesKind,
    /// Overrides the chart's index axis when set.
    pub index_axis: Option<IndexAxis>,
    pub x_scale: ScaleKind,
    data: Vec<P>,
    intercept: Option<DecimatedView<P>>,
}

impl<P> Dataset<P> {
    /// A line dataset on a linear x scale.
    pub fn new(label: impl Into<String>, data: Vec<P>) -> Self {
        Dataset {
            label: label.into(),
            kind: SeriesKind::Line,
            index_axis: None,
            x_scale: ScaleKind::Linear,
            data,
            intercept: None,
        }
    }

    pub fn with_kind(mut self, kind: SeriesKind) -> Self {
        self.kind = kind;
        self
    }

    pub fn with_index_axis(mut self, axis: IndexAxis) -> Self {
        self.index_axis = Some(axis);
        self
    }

    pub fn with_x_scale(mut self, scale: ScaleKind) -> Self {
        self.x_scale = scale;
        self
    }

    /// The points a renderer should draw.
    pub fn data(&self) -> &[P] {
        match &self.intercept {
            Some(view) => view.read(),
            None => &self.data,
        }
    }

    /// Replace the dataset's points. When intercepted, only the original
    /// points change; the decimated cache is left for the next cycle.
    pub fn set_data(&mut self, points: Vec<P>) {
        match &mut self.intercept {
            Some(view) => view.write(points),
            None => self.data = points,
        }
    }

    /// The full resolution points, whether intercepted or not.
    pub fn source_data(&self) -> &[P] {
        match &self.intercept {
            Some(view) => view.original(),
            None => &self.data,
        }
    }

    pub fn is_intercepted(&self) -> bool {
        self.intercept.is_some()
    }

    pub fn view(&self) -> Option<&DecimatedView<P>> {
        self.intercept.as_ref()
    }

    pub fn view_mut(&mut self) -> Option<&mut DecimatedView<P>> {
        self.intercept.as_mut()
    }

    /// Route reads through a [`DecimatedView`] and return it.
    ///
    /// Installing on a dataset that is already intercepted returns the
    /// existing view with its original points and cache untouched.
    pub fn install_intercept(&mut self) -> &mut DecimatedView<P> {
        let data = &mut self.data;
        self.intercept
            .get_or_insert_with(|| DecimatedView::new(std::mem::take(data)))
    }

    /// Restore plain storage holding the original points, dropping the
    /// decimated cache. Returns false if no intercept was installed.
    pub fn remove_intercept(&mut self) -> bool {
        match self.intercept.take() {
            Some(view) => {
                self.data = view.into_original();
                true
            }
            None => false,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn view_reads_cache_over_original() {
        let mut view = DecimatedView::new(vec![1, 2, 3, 4]);
        assert_eq!(view.read(), &[1, 2, 3, 4]);

        view.store(vec![1, 4]);
        assert_eq!(view.read(), &[1, 4]);

        view.write(vec![5, 6, 7]);
        assert_eq!(view.read(), &[1, 4]);
        assert_eq!(view.original(), &[5, 6, 7]);

        view.invalidate();
        assert_eq!(view.read(), &[5, 6, 7]);
    }

    #[test]
    fn plain_dataset_reads_and_writes_directly() {
        let mut ds = Dataset::new("a", vec![1, 2, 3]);
        assert!(!ds.is_intercepted());
        ds.set_data(vec![9]);
        assert_eq!(ds.data(), &[9]);
        assert_eq!(ds.source_data(), &[9]);
        assert!(ds.view().is_none());
    }

    #[test]
    fn install_is_idempotent() {
        let mut ds = Dataset::new("a", vec![1, 2, 3, 4, 5]);
        ds.install_intercept().store(vec![1, 5]);

        let view = ds.install_intercept();
        assert_eq!(view.original(), &[1, 2, 3, 4, 5]);
        assert_eq!(view.decimated(), Some(&[1, 5][..]));
        assert_eq!(ds.data(), &[1, 5]);
    }

    #[test]
    fn install_wraps_current_points_each_time() {
        let mut ds = Dataset::new("a", vec![1, 2, 3]);
        let view = ds.install_intercept();
        assert_eq!(view.original(), &[1, 2, 3]);
        assert_eq!(view.decimated(), None);
        assert_eq!(ds.source_data(), &[1, 2, 3]);

        assert!(ds.remove_intercept());
        ds.set_data(vec![4, 5]);
        ds.install_intercept().store(vec![4]);
        assert_eq!(ds.view().map(DecimatedView::original), Some(&[4, 5][..]));
        assert_eq!(ds.data(), &[4]);

        assert!(ds.remove_intercept());
        assert_eq!(ds, Dataset::new("a", vec![4, 5]));
    }

    #[test]
    fn remove_without_install_is_noop() {
        let mut ds = Dataset::new("a", vec![1, 2]);
        assert!(!ds.remove_intercept());
        assert_eq!(ds.data(), &[1, 2]);
    }

    #[test]
    fn intercept_round_trip() {
        let mut ds = Dataset::new("a", Vec::new());
        ds.install_intercept();
        ds.set_data(vec![10, 20, 30, 40]);
        assert_eq!(ds.data(), &[10, 20, 30, 40]);

        ds.install_intercept().store(vec![10, 40]);
        ds.set_data(vec![11, 21, 31, 41]);
        // Writes go to the original, reads keep serving the cache.
        assert_eq!(ds.data(), &[10, 40]);
        assert_eq!(ds.source_data(), &[11, 21, 31, 41]);

        assert!(ds.remove_intercept());
        assert!(!ds.is_intercepted());
        assert_eq!(ds.data(), &[11, 21, 31, 41]);
    }

    #[test]
    fn continuous_scales() {
        assert!(ScaleKind::Linear.is_continuous());
        assert!(ScaleKind::Time.is_continuous());
        assert!(!ScaleKind::Category.is_continuous());
        assert!(!ScaleKind::Logarithmic.is_continuous());
    }
}
