use std::sync::Arc;

use super::{Expression, ExpressionHandle};

/// Element `index` of `count` elements evenly spread from `start` to `end`.
pub fn sequential_line(
    start: &ExpressionHandle,
    end: &ExpressionHandle,
    index: &ExpressionHandle,
    count: &ExpressionHandle,
) -> ExpressionHandle {
    Arc::new(Expression::SequentialLine {
        start: Arc::clone(start),
        end: Arc::clone(end),
        index: Arc::clone(index),
        count: Arc::clone(count),
    })
}

/// Element `index` of `count` elements evenly spread on a circle, starting at `up`.
pub fn sequential_circle(
    center: &ExpressionHandle,
    radius: &ExpressionHandle,
    normal: &ExpressionHandle,
    up: &ExpressionHandle,
    index: &ExpressionHandle,
    count: &ExpressionHandle,
) -> ExpressionHandle {
    Arc::new(Expression::SequentialCircle {
        center: Arc::clone(center),
        radius: Arc::clone(radius),
        normal: Arc::clone(normal),
        up: Arc::clone(up),
        index: Arc::clone(index),
        count: Arc::clone(count),
    })
}

/// Element `index` of a lattice spanned by the three axes from `origin`.
#[allow(clippy::too_many_arguments)]
pub fn sequential_3d(
    origin: &ExpressionHandle,
    axis_x: &ExpressionHandle,
    axis_y: &ExpressionHandle,
    axis_z: &ExpressionHandle,
    index: &ExpressionHandle,
    count_x: &ExpressionHandle,
    count_y: &ExpressionHandle,
    count_z: &ExpressionHandle,
) -> ExpressionHandle {
    Arc::new(Expression::Sequential3D {
        origin: Arc::clone(origin),
        axis_x: Arc::clone(axis_x),
        axis_y: Arc::clone(axis_y),
        axis_z: Arc::clone(axis_z),
        index: Arc::clone(index),
        count_x: Arc::clone(count_x),
        count_y: Arc::clone(count_y),
        count_z: Arc::clone(count_z),
    })
}
