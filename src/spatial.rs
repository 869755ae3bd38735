//! Spatial indexing for fast tile-to-node lookups
//!
//! This module is only available with the `spatial-index` feature.

#[cfg(feature = "spatial-index")]
use kiddo::immutable::float::kdtree::ImmutableKdTree;
#[cfg(feature = "spatial-index")]
use kiddo::SquaredEuclidean;
#[cfg(feature = "spatial-index")]
use glam::DVec2;
#[cfg(feature = "spatial-index")]
use crate::node::NodeId;

/// Wrapper around KD-tree for nearest-node queries
///
/// Territory assignment asks "which node is closest?" once per tile, so the
/// O(log n) lookup keeps large grids with many nodes cheap.
#[cfg(feature = "spatial-index")]
#[derive(Clone)]
pub struct SpatialIndex {
    tree: ImmutableKdTree<f64, usize, 2, 32>,
}

#[cfg(feature = "spatial-index")]
impl SpatialIndex {
    /// Build spatial index from node positions
    ///
    /// # Example
    ///
    /// ```
    /// use rust_graph_dungeon::*;
    /// use glam::DVec2;
    ///
    /// # #[cfg(feature = "spatial-index")]
    /// # {
    /// let positions = vec![
    ///     DVec2::new(4.0, 4.0),
    ///     DVec2::new(20.0, 4.0),
    ///     DVec2::new(12.0, 18.0),
    /// ];
    ///
    /// let index = SpatialIndex::new(&positions);
    /// assert_eq!(index.find_nearest(DVec2::new(18.0, 6.0)), 1);
    /// # }
    /// ```
    pub fn new(positions: &[DVec2]) -> Self {
        let points: Vec<[f64; 2]> = positions.iter().map(|p| [p.x, p.y]).collect();

        Self {
            tree: ImmutableKdTree::new_from_slice(&points),
        }
    }

    /// Id of the node nearest to `position`
    pub fn find_nearest(&self, position: DVec2) -> NodeId {
        let query = [position.x, position.y];
        let result = self.tree.nearest_one::<SquaredEuclidean>(&query);
        result.item as NodeId
    }
}

#[cfg(test)]
#[cfg(feature = "spatial-index")]
mod tests {
    use super::*;

    #[test]
    fn test_spatial_index_basic() {
        let positions = vec![
            DVec2::new(2.0, 2.0),
            DVec2::new(30.0, 2.0),
            DVec2::new(2.0, 30.0),
            DVec2::new(30.0, 30.0),
        ];

        let index = SpatialIndex::new(&positions);

        assert_eq!(index.find_nearest(DVec2::new(5.0, 4.0)), 0);
        assert_eq!(index.find_nearest(DVec2::new(27.0, 1.0)), 1);
        assert_eq!(index.find_nearest(DVec2::new(3.0, 25.0)), 2);
        assert_eq!(index.find_nearest(DVec2::new(20.0, 22.0)), 3);
    }

    #[test]
    fn test_spatial_index_exact_match() {
        let positions = vec![DVec2::new(10.0, 0.0), DVec2::new(0.0, 10.0)];

        let index = SpatialIndex::new(&positions);

        assert_eq!(index.find_nearest(positions[0]), 0);
        assert_eq!(index.find_nearest(positions[1]), 1);
    }
}
