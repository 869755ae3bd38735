//! Dungeon main structure and pipeline driver

use tracing::debug;

use crate::config::DungeonConfig;
use crate::error::{DungeonError, Result};
use crate::generation::{build_graph, filter_connectivity, place_nodes, GraphStages, Stage};
use crate::grid::{Grid, TileId};
use crate::node::{Line, Node, NodeId};
use crate::populate::populate_regions;
use crate::raster::rasterize_lines;
use crate::rng::SeededRng;
use crate::walls::{detect_walls, trace_walls, Curve};

/// A generated (or partially generated) dungeon
///
/// The dungeon owns the output of every pipeline stage. Stages run in
/// [`Stage::ALL`] order and each one rebuilds only its own output from its own
/// seed and the output of earlier stages, so any suffix of the pipeline can be
/// re-run without disturbing what came before.
///
/// # Examples
///
/// ```
/// use rust_graph_dungeon::*;
///
/// let config = DungeonConfigBuilder::new()
///     .seed(42)
///     .node_count(6)
///     .unwrap()
///     .size(48, 36)
///     .unwrap()
///     .build()
///     .unwrap();
///
/// let dungeon = Dungeon::generate(config).unwrap();
/// println!("{} pathways, {} wall curves", dungeon.lines().len(), dungeon.walls().len());
///
/// // Same seed, same dungeon
/// let again = Dungeon::generate(dungeon.config().clone()).unwrap();
/// assert_eq!(dungeon.grid(), again.grid());
/// ```
#[derive(Debug, Clone)]
pub struct Dungeon {
    /// Configuration the dungeon is generated from
    config: DungeonConfig,

    /// One seed per stage, derived from the configured seed
    stage_seeds: [u64; Stage::COUNT],

    nodes: Vec<Node>,
    graph: GraphStages,

    /// Final pathways after the connectivity filter
    lines: Vec<Line>,

    grid: Grid,
    walls: Vec<Curve>,

    /// First stage that has not run yet; `None` once complete
    next_stage: Option<Stage>,
}

impl Dungeon {
    /// Create an empty dungeon ready to run from the first stage
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the configuration does not validate.
    pub fn new(config: DungeonConfig) -> Result<Self> {
        config.validate()?;
        let grid = Grid::new(config.width, config.height);

        Ok(Self {
            stage_seeds: derive_stage_seeds(&config),
            config,
            nodes: Vec::new(),
            graph: GraphStages::default(),
            lines: Vec::new(),
            grid,
            walls: Vec::new(),
            next_stage: Some(Stage::PlaceNodes),
        })
    }

    /// Create and fully generate a dungeon
    ///
    /// # Example
    ///
    /// ```
    /// use rust_graph_dungeon::*;
    ///
    /// let dungeon = Dungeon::generate(DungeonConfig::default()).unwrap();
    /// assert!(dungeon.is_complete());
    /// assert!(dungeon.grid().floor_count() > 0);
    /// ```
    pub fn generate(config: DungeonConfig) -> Result<Self> {
        let mut dungeon = Self::new(config)?;
        dungeon.generate_remaining();
        Ok(dungeon)
    }

    /// Run the next pending stage and return it
    ///
    /// Returns `None` when every stage has already run.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_graph_dungeon::*;
    ///
    /// let mut dungeon = Dungeon::new(DungeonConfig::default()).unwrap();
    /// assert_eq!(dungeon.advance(), Some(Stage::PlaceNodes));
    /// assert_eq!(dungeon.advance(), Some(Stage::BuildGraph));
    /// assert!(dungeon.lines().is_empty());
    /// assert_eq!(dungeon.next_stage(), Some(Stage::FilterConnectivity));
    /// ```
    pub fn advance(&mut self) -> Option<Stage> {
        let stage = self.next_stage?;
        self.clear_after(stage);
        self.run_stage(stage);
        self.next_stage = stage.next();
        Some(stage)
    }

    /// Run every pending stage
    pub fn generate_remaining(&mut self) {
        while self.advance().is_some() {}
    }

    /// Recompute `stage` and everything after it
    ///
    /// Output of earlier stages is reused as is.
    ///
    /// # Errors
    ///
    /// Returns `StageNotReady` if a stage before `stage` has not run yet.
    pub fn regenerate_from(&mut self, stage: Stage) -> Result<()> {
        if let Some(pending) = self.next_stage {
            if pending < stage {
                return Err(DungeonError::StageNotReady {
                    requested: stage,
                    pending,
                });
            }
        }
        self.next_stage = Some(stage);
        self.generate_remaining();
        Ok(())
    }

    /// Change the connectivity and rewind to the connectivity filter
    ///
    /// Nothing is regenerated until [`advance`](Self::advance),
    /// [`generate_remaining`](Self::generate_remaining) or
    /// [`regenerate_from`](Self::regenerate_from) is called.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if `connectivity` is outside `0..=100`; the
    /// dungeon is left unchanged.
    ///
    /// # Example
    ///
    /// ```
    /// use rust_graph_dungeon::*;
    ///
    /// let mut dungeon = Dungeon::generate(DungeonConfig::default()).unwrap();
    /// let nodes = dungeon.nodes().to_vec();
    ///
    /// dungeon.set_connectivity(100.0).unwrap();
    /// dungeon.generate_remaining();
    ///
    /// assert_eq!(dungeon.nodes(), &nodes[..]);
    /// assert_eq!(dungeon.lines(), &dungeon.graph().gabriel[..]);
    /// ```
    pub fn set_connectivity(&mut self, connectivity: f64) -> Result<()> {
        let mut config = self.config.clone();
        config.connectivity = connectivity;
        self.reconfigure(config)
    }

    /// Replace the configuration and rewind to the earliest stage it affects
    ///
    /// Seed, size, node count, region mix and room extents rewind to node
    /// placement; cave tuning rewinds to population; connectivity rewinds to
    /// the connectivity filter. An identical configuration changes nothing.
    ///
    /// # Errors
    ///
    /// Returns `InvalidConfig` if the new configuration does not validate; the
    /// dungeon is left unchanged.
    pub fn reconfigure(&mut self, config: DungeonConfig) -> Result<()> {
        config.validate()?;

        let Some(stage) = earliest_affected(&self.config, &config) else {
            return Ok(());
        };
        if stage == Stage::PlaceNodes {
            self.stage_seeds = derive_stage_seeds(&config);
        }
        self.config = config;
        self.rewind(stage);
        debug!(stage = stage.name(), "reconfigured");
        Ok(())
    }

    fn rewind(&mut self, stage: Stage) {
        self.next_stage = Some(match self.next_stage {
            Some(pending) => pending.min(stage),
            None => stage,
        });
    }

    /// Drop every output that `stage` feeds, so nothing refers to nodes or
    /// lines from a previous run
    fn clear_after(&mut self, stage: Stage) {
        if stage < Stage::BuildGraph {
            self.graph = GraphStages::default();
        }
        if stage < Stage::FilterConnectivity {
            self.lines.clear();
        }
        if stage < Stage::Rasterize {
            self.reset_grid();
        }
        if stage < Stage::TraceWalls {
            self.walls.clear();
        }
    }

    fn reset_grid(&mut self) {
        if self.grid.width() == self.config.width && self.grid.height() == self.config.height {
            self.grid.reset();
        } else {
            self.grid = Grid::new(self.config.width, self.config.height);
        }
    }

    fn stage_rng(&self, stage: Stage) -> SeededRng {
        SeededRng::from_u64(self.stage_seeds[stage.index()])
    }

    fn run_stage(&mut self, stage: Stage) {
        match stage {
            Stage::PlaceNodes => {
                let mut rng = self.stage_rng(stage);
                self.nodes = place_nodes(&self.config, &mut rng);
                debug!(nodes = self.nodes.len(), "placed nodes");
            }
            Stage::BuildGraph => {
                self.graph = build_graph(&self.nodes);
                debug!(
                    delaunay = self.graph.delaunay.len(),
                    gabriel = self.graph.gabriel.len(),
                    relative_neighbourhood = self.graph.relative_neighbourhood.len(),
                    spanning_tree = self.graph.spanning_tree.len(),
                    "built graph"
                );
            }
            Stage::FilterConnectivity => {
                let mut rng = self.stage_rng(stage);
                self.lines = filter_connectivity(&self.graph, self.config.connectivity, &mut rng);
                debug!(
                    connectivity = self.config.connectivity,
                    lines = self.lines.len(),
                    "filtered pathways"
                );
            }
            Stage::Rasterize => {
                self.reset_grid();
                let marks = rasterize_lines(&mut self.grid, &self.nodes, &self.lines);
                debug!(marks, floor = self.grid.floor_count(), "rasterized pathways");
            }
            Stage::Populate => {
                let mut rng = self.stage_rng(stage);
                let floor = populate_regions(&mut self.grid, &self.nodes, &self.config, &mut rng);
                debug!(floor, "populated regions");
            }
            Stage::DetectWalls => {
                let walls = detect_walls(&mut self.grid, &self.nodes);
                debug!(walls, "detected walls");
            }
            Stage::TraceWalls => {
                self.walls = trace_walls(&mut self.grid);
                let loops = self.walls.iter().filter(|c| c.is_loop).count();
                debug!(curves = self.walls.len(), loops, "traced walls");
            }
        }
    }

    /// Get the configuration this dungeon is generated from
    #[inline]
    pub fn config(&self) -> &DungeonConfig {
        &self.config
    }

    /// First stage that has not run yet, or `None` if generation is complete
    #[inline]
    pub fn next_stage(&self) -> Option<Stage> {
        self.next_stage
    }

    /// Whether every stage has run
    #[inline]
    pub fn is_complete(&self) -> bool {
        self.next_stage.is_none()
    }

    /// Placed nodes, indexed by id
    #[inline]
    pub fn nodes(&self) -> &[Node] {
        &self.nodes
    }

    /// Get a node by id
    ///
    /// Returns `None` if the id is out of bounds or nodes are not placed yet.
    #[inline]
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id)
    }

    /// Every graph stage's edge set
    #[inline]
    pub fn graph(&self) -> &GraphStages {
        &self.graph
    }

    /// Pathways kept by the connectivity filter
    #[inline]
    pub fn lines(&self) -> &[Line] {
        &self.lines
    }

    /// The tile grid
    #[inline]
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Traced wall curves
    #[inline]
    pub fn walls(&self) -> &[Curve] {
        &self.walls
    }

    /// Floor tiles belonging to `node`'s region
    ///
    /// # Example
    ///
    /// ```
    /// use rust_graph_dungeon::*;
    ///
    /// let dungeon = Dungeon::generate(DungeonConfig::default()).unwrap();
    /// let total: usize = (0..dungeon.nodes().len())
    ///     .map(|id| dungeon.region_tiles(id).count())
    ///     .sum();
    /// assert_eq!(total, dungeon.grid().floor_count());
    /// ```
    pub fn region_tiles(&self, node: NodeId) -> impl Iterator<Item = TileId> + '_ {
        self.grid
            .tiles()
            .iter()
            .enumerate()
            .filter(move |(_, t)| t.is_floor && t.region == Some(node))
            .map(|(id, _)| id)
    }
}

fn derive_stage_seeds(config: &DungeonConfig) -> [u64; Stage::COUNT] {
    let mut rng = SeededRng::new(&config.seed);
    Stage::ALL.map(|_| rng.derive_seed())
}

fn earliest_affected(old: &DungeonConfig, new: &DungeonConfig) -> Option<Stage> {
    if old.seed != new.seed
        || old.node_count != new.node_count
        || old.width != new.width
        || old.height != new.height
        || old.artificial_ratio != new.artificial_ratio
        || old.hybrid_ratio != new.hybrid_ratio
        || old.room_extent_min != new.room_extent_min
        || old.room_extent_max != new.room_extent_max
    {
        Some(Stage::PlaceNodes)
    } else if old.connectivity != new.connectivity {
        Some(Stage::FilterConnectivity)
    } else if old.cave_iterations != new.cave_iterations
        || old.cave_fill_probability != new.cave_fill_probability
    {
        Some(Stage::Populate)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::DungeonConfigBuilder;

    fn config(seed: u64) -> DungeonConfig {
        DungeonConfigBuilder::new()
            .seed(seed)
            .node_count(10)
            .unwrap()
            .size(60, 40)
            .unwrap()
            .connectivity(30.0)
            .unwrap()
            .build()
            .unwrap()
    }

    #[test]
    fn test_two_node_scenario() {
        let config = DungeonConfigBuilder::new()
            .seed(42)
            .node_count(2)
            .unwrap()
            .size(20, 27)
            .unwrap()
            .build()
            .unwrap();
        let dungeon = Dungeon::generate(config).unwrap();

        assert_eq!(dungeon.nodes().len(), 2);
        assert_eq!(dungeon.graph().delaunay, vec![Line::new(0, 1)]);
        assert_eq!(dungeon.graph().spanning_tree, dungeon.graph().delaunay);
        assert_eq!(dungeon.lines(), &[Line::new(0, 1)]);
    }

    #[test]
    fn test_stepwise_matches_one_shot() {
        let one_shot = Dungeon::generate(config(7)).unwrap();

        let mut stepwise = Dungeon::new(config(7)).unwrap();
        let mut ran = Vec::new();
        while let Some(stage) = stepwise.advance() {
            ran.push(stage);
        }

        assert_eq!(ran, Stage::ALL.to_vec());
        assert_eq!(stepwise.nodes(), one_shot.nodes());
        assert_eq!(stepwise.graph(), one_shot.graph());
        assert_eq!(stepwise.lines(), one_shot.lines());
        assert_eq!(stepwise.grid(), one_shot.grid());
        assert_eq!(stepwise.walls(), one_shot.walls());
    }

    #[test]
    fn test_pending_stages_keep_empty_output() {
        let mut dungeon = Dungeon::new(config(3)).unwrap();
        dungeon.advance();
        dungeon.advance();
        dungeon.advance();
        assert!(!dungeon.lines().is_empty());
        assert_eq!(dungeon.grid().floor_count(), 0);
        assert!(dungeon.walls().is_empty());
        assert_eq!(dungeon.next_stage(), Some(Stage::Rasterize));
    }

    #[test]
    fn test_fewer_nodes_leave_no_dangling_references() {
        let mut dungeon = Dungeon::generate(config(5)).unwrap();
        assert!(!dungeon.walls().is_empty());

        let mut fewer = config(5);
        fewer.node_count = 3;
        dungeon.reconfigure(fewer.clone()).unwrap();
        assert_eq!(dungeon.advance(), Some(Stage::PlaceNodes));

        let n = dungeon.nodes().len();
        assert_eq!(n, 3);
        let graph = dungeon.graph();
        for line in graph
            .delaunay
            .iter()
            .chain(&graph.spanning_tree)
            .chain(dungeon.lines())
        {
            assert!(line.from < n && line.to < n, "{:?} outlives its nodes", line);
        }
        assert!(dungeon.grid().tiles().iter().all(|t| t.region.map_or(true, |r| r < n)));
        assert!(dungeon.walls().is_empty());

        dungeon.generate_remaining();
        let fresh = Dungeon::generate(fewer).unwrap();
        assert_eq!(dungeon.graph(), fresh.graph());
        assert_eq!(dungeon.grid(), fresh.grid());
        assert_eq!(dungeon.walls(), fresh.walls());
    }

    #[test]
    fn test_regenerate_before_ready_fails() {
        let mut dungeon = Dungeon::new(config(3)).unwrap();
        dungeon.advance();
        let err = dungeon.regenerate_from(Stage::Populate).unwrap_err();
        assert_eq!(
            err,
            DungeonError::StageNotReady {
                requested: Stage::Populate,
                pending: Stage::BuildGraph,
            }
        );
        assert_eq!(dungeon.next_stage(), Some(Stage::BuildGraph));
    }

    #[test]
    fn test_regenerate_is_reproducible() {
        let mut dungeon = Dungeon::generate(config(11)).unwrap();
        let grid = dungeon.grid().clone();
        let walls = dungeon.walls().to_vec();

        for stage in Stage::ALL {
            dungeon.regenerate_from(stage).unwrap();
            assert_eq!(dungeon.grid(), &grid, "grid changed after rerun from {:?}", stage);
            assert_eq!(dungeon.walls(), &walls[..]);
        }
    }

    #[test]
    fn test_connectivity_change_keeps_upstream() {
        let mut dungeon = Dungeon::generate(config(5)).unwrap();
        let nodes = dungeon.nodes().to_vec();
        let graph = dungeon.graph().clone();
        let before = dungeon.lines().len();

        dungeon.set_connectivity(80.0).unwrap();
        assert_eq!(dungeon.next_stage(), Some(Stage::FilterConnectivity));
        dungeon.generate_remaining();

        assert_eq!(dungeon.nodes(), &nodes[..]);
        assert_eq!(dungeon.graph(), &graph);
        assert!(dungeon.lines().len() >= before);

        let fresh = Dungeon::generate(dungeon.config().clone()).unwrap();
        assert_eq!(fresh.grid(), dungeon.grid());
    }

    #[test]
    fn test_invalid_connectivity_leaves_dungeon_untouched() {
        let mut dungeon = Dungeon::generate(config(5)).unwrap();
        assert!(dungeon.set_connectivity(150.0).is_err());
        assert!(dungeon.set_connectivity(f64::NAN).is_err());
        assert_eq!(dungeon.config().connectivity, 30.0);
        assert!(dungeon.is_complete());
    }

    #[test]
    fn test_reconfigure_rewinds_to_earliest_stage() {
        let mut dungeon = Dungeon::generate(config(5)).unwrap();

        dungeon.reconfigure(config(5)).unwrap();
        assert!(dungeon.is_complete());

        let mut caves = config(5);
        caves.cave_iterations = 3;
        dungeon.reconfigure(caves).unwrap();
        assert_eq!(dungeon.next_stage(), Some(Stage::Populate));

        dungeon.reconfigure(config(6)).unwrap();
        assert_eq!(dungeon.next_stage(), Some(Stage::PlaceNodes));
        dungeon.generate_remaining();
        assert_eq!(dungeon.nodes(), Dungeon::generate(config(6)).unwrap().nodes());
    }

    #[test]
    fn test_resize_rebuilds_grid() {
        let mut dungeon = Dungeon::generate(config(5)).unwrap();
        let resized = DungeonConfigBuilder::new()
            .seed(5)
            .node_count(10)
            .unwrap()
            .size(30, 25)
            .unwrap()
            .connectivity(30.0)
            .unwrap()
            .build()
            .unwrap();
        dungeon.reconfigure(resized).unwrap();
        dungeon.generate_remaining();
        assert_eq!(dungeon.grid().width(), 30);
        assert_eq!(dungeon.grid().height(), 25);
    }

    #[test]
    fn test_region_tiles_partition_floor() {
        let dungeon = Dungeon::generate(config(9)).unwrap();
        let mut seen = vec![false; dungeon.grid().tiles().len()];
        for node in dungeon.nodes() {
            for id in dungeon.region_tiles(node.id) {
                assert!(!seen[id]);
                seen[id] = true;
            }
        }
        assert_eq!(seen.iter().filter(|&&s| s).count(), dungeon.grid().floor_count());
        assert_eq!(dungeon.region_tiles(999).count(), 0);
    }
}
