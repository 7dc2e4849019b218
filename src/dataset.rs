//! Dataset abstraction feeding the network's input layer and loss
//! computation. Layers never see these objects, only the raw vectors they
//! hand out.
//!
//! [`DataSetView`] is an index-based view over an existing dataset; the
//! [`split`], [`split_ratio`] and [`merge`] helpers partition and recombine
//! views without copying any sample data.

use ndarray::{Array2, ArrayView1};
use rand::seq::SliceRandom;
use rand::Rng;

use crate::error::{FfnError, Result};

/// Supplier of training instances and their targets.
pub trait DataSet {
    /// Number of samples.
    fn samples(&self) -> usize;

    /// Width of each input vector.
    fn inputs(&self) -> usize;

    /// Width of each target vector.
    fn outputs(&self) -> usize;

    /// The i-th input vector.
    fn instance(&self, i: usize) -> ArrayView1<'_, f32>;

    /// The i-th target vector.
    fn target(&self, i: usize) -> ArrayView1<'_, f32>;
}

/// An in-memory dataset backed by two row-per-sample matrices.
pub struct MemoryDataSet {
    instances: Array2<f32>,
    targets: Array2<f32>,
}

impl MemoryDataSet {
    pub fn new(instances: Array2<f32>, targets: Array2<f32>) -> Result<Self> {
        if instances.nrows() != targets.nrows() {
            return Err(FfnError::shape_mismatch(instances.nrows(), targets.nrows()));
        }
        Ok(MemoryDataSet { instances, targets })
    }
}

impl DataSet for MemoryDataSet {
    fn samples(&self) -> usize {
        self.instances.nrows()
    }

    fn inputs(&self) -> usize {
        self.instances.ncols()
    }

    fn outputs(&self) -> usize {
        self.targets.ncols()
    }

    fn instance(&self, i: usize) -> ArrayView1<'_, f32> {
        self.instances.row(i)
    }

    fn target(&self, i: usize) -> ArrayView1<'_, f32> {
        self.targets.row(i)
    }
}

/// An index-based view on another dataset. Operates purely on an index
/// container pointing into the referenced dataset; no sample data is copied
/// or reallocated.
pub struct DataSetView<'a> {
    dataset: &'a dyn DataSet,
    indices: Vec<usize>,
}

impl<'a> DataSetView<'a> {
    /// A view covering every sample of `dataset`, in order.
    pub fn full(dataset: &'a dyn DataSet) -> Self {
        DataSetView {
            indices: (0..dataset.samples()).collect(),
            dataset,
        }
    }

    /// A view over the given sample indices of `dataset`.
    pub fn from_indices<I>(dataset: &'a dyn DataSet, indices: I) -> Self
    where
        I: IntoIterator<Item = usize>,
    {
        DataSetView {
            dataset,
            indices: indices.into_iter().collect(),
        }
    }

    /// Shuffle the order of instances within this view.
    pub fn shuffle<R: Rng>(&mut self, rng: &mut R) -> &mut Self {
        self.indices.shuffle(rng);
        self
    }
}

impl DataSet for DataSetView<'_> {
    fn samples(&self) -> usize {
        self.indices.len()
    }

    fn inputs(&self) -> usize {
        self.dataset.inputs()
    }

    fn outputs(&self) -> usize {
        self.dataset.outputs()
    }

    fn instance(&self, i: usize) -> ArrayView1<'_, f32> {
        self.dataset.instance(self.indices[i])
    }

    fn target(&self, i: usize) -> ArrayView1<'_, f32> {
        self.dataset.target(self.indices[i])
    }
}

/// Split a dataset into `groups` views of near-equal size. With `shuffling`
/// set, the split runs over a shuffled index order instead of the dataset's
/// own.
pub fn split<'a, R: Rng>(
    dataset: &'a dyn DataSet,
    groups: usize,
    shuffling: bool,
    rng: &mut R,
) -> Result<Vec<DataSetView<'a>>> {
    if groups == 0 {
        return Err(FfnError::invalid_configuration(
            "groups",
            "group count must be positive",
        ));
    }

    let mut indices: Vec<usize> = (0..dataset.samples()).collect();
    if shuffling {
        indices.shuffle(rng);
    }

    let base = indices.len() / groups;
    let extra = indices.len() % groups;
    let mut views = Vec::with_capacity(groups);
    let mut offset = 0;
    for group in 0..groups {
        let size = base + (group < extra) as usize;
        views.push(DataSetView::from_indices(
            dataset,
            indices[offset..offset + size].iter().copied(),
        ));
        offset += size;
    }
    Ok(views)
}

/// Split a dataset into two views where the first holds `ratio` of the
/// samples and the second the rest.
pub fn split_ratio<'a, R: Rng>(
    dataset: &'a dyn DataSet,
    ratio: f64,
    shuffling: bool,
    rng: &mut R,
) -> Result<(DataSetView<'a>, DataSetView<'a>)> {
    if !(0.0..=1.0).contains(&ratio) {
        return Err(FfnError::invalid_configuration(
            "ratio",
            "ratio must lie in [0, 1]",
        ));
    }

    let mut indices: Vec<usize> = (0..dataset.samples()).collect();
    if shuffling {
        indices.shuffle(rng);
    }

    let cut = (ratio * indices.len() as f64).round() as usize;
    let (front, back) = indices.split_at(cut);
    Ok((
        DataSetView::from_indices(dataset, front.iter().copied()),
        DataSetView::from_indices(dataset, back.iter().copied()),
    ))
}

/// Merge all indices from `groups` into `merging`. The views must all be
/// views on the same underlying dataset; only vector widths are checked.
pub fn merge<'a>(merging: &mut DataSetView<'a>, groups: Vec<DataSetView<'a>>) -> Result<()> {
    for group in groups {
        if group.inputs() != merging.inputs() || group.outputs() != merging.outputs() {
            return Err(FfnError::shape_mismatch(merging.inputs(), group.inputs()));
        }
        merging.indices.extend(group.indices);
    }
    Ok(())
}
