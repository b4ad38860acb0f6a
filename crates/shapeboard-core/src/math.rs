//! Geometry helpers shared by the store and render sinks.

use crate::shapes::{BoundingBox, Padding};

/// Snap a coordinate to the nearest multiple of `grid`.
pub fn snap_to_grid(value: f64, grid: f64) -> f64 {
    let grid_offset = value % grid;
    let rounded = (grid_offset / grid).round() * grid;
    value - grid_offset + rounded
}

/// Expand a bounding box by its draw-time padding.
///
/// `None` returns the box unchanged. Hit-testing never applies padding;
/// this exists for render sinks.
pub fn padded_bounds(bounding_box: BoundingBox, padding: Option<&Padding>) -> BoundingBox {
    let Some(padding) = padding else {
        return bounding_box;
    };

    let BoundingBox {
        x,
        y,
        width,
        height,
    } = bounding_box;

    match *padding {
        Padding::All(all) => BoundingBox::new(x - all, y - all, width + all * 2.0, height + all * 2.0),
        Padding::Axes {
            horizontal,
            vertical,
        } => BoundingBox::new(
            x - horizontal,
            y - vertical,
            width + horizontal * 2.0,
            height + vertical * 2.0,
        ),
        Padding::Sides {
            top,
            right,
            bottom,
            left,
        } => BoundingBox::new(x - left, y - top, width + left + right, height + top + bottom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_snap_to_grid() {
        assert!((snap_to_grid(23.0, 10.0) - 20.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(26.0, 10.0) - 30.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(25.0, 10.0) - 30.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(40.0, 10.0) - 40.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_snap_to_grid_negative() {
        assert!((snap_to_grid(-7.0, 10.0) - -10.0).abs() < f64::EPSILON);
        assert!((snap_to_grid(-2.0, 10.0) - 0.0).abs() < f64::EPSILON);
    }

    #[test]
    fn test_padded_bounds_none() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        assert_eq!(padded_bounds(bbox, None), bbox);
    }

    #[test]
    fn test_padded_bounds_all() {
        let bbox = BoundingBox::new(10.0, 20.0, 100.0, 50.0);
        let padded = padded_bounds(bbox, Some(&Padding::All(2.0)));
        assert_eq!(padded, BoundingBox::new(8.0, 18.0, 104.0, 54.0));
    }

    #[test]
    fn test_padded_bounds_axes() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let padded = padded_bounds(
            bbox,
            Some(&Padding::Axes {
                horizontal: 3.0,
                vertical: 1.0,
            }),
        );
        assert_eq!(padded, BoundingBox::new(-3.0, -1.0, 16.0, 12.0));
    }

    #[test]
    fn test_padded_bounds_sides() {
        let bbox = BoundingBox::new(0.0, 0.0, 10.0, 10.0);
        let padded = padded_bounds(
            bbox,
            Some(&Padding::Sides {
                top: 1.0,
                right: 2.0,
                bottom: 3.0,
                left: 4.0,
            }),
        );
        assert_eq!(padded, BoundingBox::new(-4.0, -1.0, 16.0, 14.0));
    }
}
