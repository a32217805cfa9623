// src/curve_extraction.rs
//
// Reduction of the 2-D edge map to fit inputs: one representative point per
// sampled scan-row (the row's mean edge column), and the base point of the
// robot estimated from the edge pixels nearest the lower image boundary.

use crate::edge_detection::EdgeMap;

/// Collapse the edge map to at most one point per sampled row. Rows are
/// visited at `row_stride`; a row with no edge pixels is skipped, not
/// zero-filled. Output order follows increasing row index.
pub fn reduce_edge_rows(edges: &EdgeMap, row_stride: usize) -> Vec<(f32, f32)> {
    let stride = row_stride.max(1);
    let mut curve = Vec::new();

    for row in (0..edges.height).step_by(stride) {
        let mut sum_col = 0.0f64;
        let mut count = 0u32;
        for col in 0..edges.width {
            if edges.is_set(col, row) {
                sum_col += col as f64;
                count += 1;
            }
        }
        if count > 0 {
            curve.push(((sum_col / count as f64) as f32, row as f32));
        }
    }

    curve
}

/// Estimate the base point from the full edge-point set: the centroid of the
/// 10 points with greatest row index (nearest the fixed mount at the lower
/// image boundary). With fewer than 10 points all of them are used; with
/// none there is no base.
///
/// The sort is stable, so ties in row value keep their original scan order
/// and the result is reproducible on identical input.
pub fn locate_base(edge_points: &[(usize, usize)]) -> Option<(f32, f32)> {
    if edge_points.is_empty() {
        return None;
    }

    let mut sorted: Vec<(usize, usize)> = edge_points.to_vec();
    sorted.sort_by_key(|&(_, row)| row);

    let take = sorted.len().min(10);
    let lowest = &sorted[sorted.len() - take..];

    let mut sum_x = 0.0f64;
    let mut sum_y = 0.0f64;
    for &(x, y) in lowest {
        sum_x += x as f64;
        sum_y += y as f64;
    }
    let n = lowest.len() as f64;
    Some(((sum_x / n) as f32, (sum_y / n) as f32))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::edge_detection::EdgeMap;

    fn map_with(points: &[(usize, usize)], width: usize, height: usize) -> EdgeMap {
        let mut map = EdgeMap::new(width, height);
        for &(x, y) in points {
            map.data[y * width + x] = 255;
        }
        map
    }

    #[test]
    fn test_reduce_takes_mean_column_per_row() {
        let map = map_with(&[(10, 0), (20, 0), (5, 2)], 32, 8);
        let curve = reduce_edge_rows(&map, 2);
        assert_eq!(curve, vec![(15.0, 0.0), (5.0, 2.0)]);
    }

    #[test]
    fn test_reduce_skips_odd_rows_at_stride_two() {
        // Row 1 is not sampled at stride 2, so its pixel never appears.
        let map = map_with(&[(7, 1)], 16, 4);
        let curve = reduce_edge_rows(&map, 2);
        assert!(curve.is_empty());
    }

    #[test]
    fn test_reduce_preserves_row_order() {
        let map = map_with(&[(3, 6), (1, 0), (2, 4)], 8, 8);
        let curve = reduce_edge_rows(&map, 2);
        let rows: Vec<f32> = curve.iter().map(|p| p.1).collect();
        assert_eq!(rows, vec![0.0, 4.0, 6.0]);
    }

    #[test]
    fn test_base_with_fewer_than_ten_points() {
        let points = vec![(0, 0), (4, 2), (8, 4)];
        let base = locate_base(&points).unwrap();
        assert_eq!(base, (4.0, 2.0));
    }

    #[test]
    fn test_base_takes_ten_lowest_points() {
        // 12 points; the two at rows 0 and 1 must be dropped.
        let mut points: Vec<(usize, usize)> = (0..12).map(|i| (i, i)).collect();
        let base = locate_base(&points).unwrap();
        let expected_x: f32 = (2..12).sum::<usize>() as f32 / 10.0;
        assert_eq!(base, (expected_x, expected_x));

        // Reordering rows 0/1 to the end must not change the result.
        points.rotate_left(2);
        assert_eq!(locate_base(&points).unwrap(), (expected_x, expected_x));
    }

    #[test]
    fn test_base_empty_input() {
        assert!(locate_base(&[]).is_none());
    }
}
