use crate::{Enforcer, InvariantError, OpGuards, Operation, OperationError, Shape, StorageView, Strides};

/// # View
///
/// Reinterprets a view under a new shape with the same element count.
///
/// Only views whose row-major traversal walks storage with one uniform step
/// can be reshaped: condensed views, views flipped along every non-trivial
/// axis, and views with a uniform stride. The new strides are the row-major
/// strides of the new shape scaled by that step, so logical order is kept.
#[derive(Debug, derive_new::new, Clone)]
pub struct View {
    shape: Shape,
}

/// The single address delta between consecutive row-major elements of `view`,
/// if there is one.
pub fn traversal_step(view: &StorageView) -> Option<isize> {
    if view.numel() == 0 {
        return Some(0);
    }
    let axes = view
        .shape()
        .iter()
        .zip(view.strides().iter())
        .filter(|(&dim, _)| dim > 1)
        .map(|(&dim, &stride)| (dim, stride))
        .collect::<Vec<_>>();

    let uniform = axes
        .windows(2)
        .all(|pair| pair[0].1 == pair[1].1 * pair[1].0 as isize);
    if !uniform {
        return None;
    }
    Some(axes.last().map(|&(_, stride)| stride).unwrap_or(1))
}

impl OpGuards for View {
    fn check_shapes(&self, src: &StorageView) -> Result<(), InvariantError> {
        let (expected, actual) = (src.numel(), Enforcer::check_numel(&self.shape)?);
        if expected != actual {
            return Err(InvariantError::ElementCount { expected, actual });
        }
        Ok(())
    }
}

impl Operation for View {
    fn compute_view(&self, src: &StorageView) -> Result<StorageView, OperationError> {
        let step = traversal_step(src).ok_or_else(|| InvariantError::NotReshapeable {
            shape: src.shape().clone(),
            strides: src.strides().clone(),
        })?;
        let strides = if step == 0 {
            Strides::zeros(self.shape.rank())
        } else {
            Strides::from(&self.shape).scaled(step)
        };
        Ok(StorageView::new(self.shape.clone(), strides, src.offset()))
    }
}
