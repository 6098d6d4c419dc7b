use super::*;

/// Uniform random layout that keeps a [`SafeArea`] around the start cell free of mines.
#[derive(Clone, Debug, PartialEq)]
pub struct RandomBoardGenerator {
    seed: u64,
    safe_area: SafeArea,
}

impl RandomBoardGenerator {
    pub fn new(seed: u64, safe_area: SafeArea) -> Self {
        Self { seed, safe_area }
    }

    pub fn generate_grid(&self, request: GenerateRequest) -> Result<SeedGrid> {
        use rand::prelude::*;
        use SafeArea::*;

        let GenerateRequest { config, start } = request;
        let config = config.validate()?;
        let start = config.validate_coords(start)?;
        let (width, height) = config.size;

        let in_area = |area: SafeArea, pos: Coord2| match area {
            StartCell => pos == start,
            Neighborhood => pos.0.abs_diff(start.0) <= 1 && pos.1.abs_diff(start.1) <= 1,
        };
        let candidates_for = |area: SafeArea| -> Vec<Coord2> {
            (0..height)
                .flat_map(|y| (0..width).map(move |x| (x, y)))
                .filter(|&pos| !in_area(area, pos))
                .collect()
        };

        let mines = usize::from(config.mines);
        let mut candidates = candidates_for(self.safe_area);
        if self.safe_area == Neighborhood && candidates.len() < mines {
            log::warn!("Cannot keep start neighborhood free of mines, fallback to start cell");
            candidates = candidates_for(StartCell);
        }

        let mut rng = SmallRng::seed_from_u64(self.seed);
        let (chosen, _) = candidates.partial_shuffle(&mut rng, mines);

        let mut grid = alloc::vec![alloc::vec![CellSeed::default(); usize::from(width)]; usize::from(height)];
        for &(x, y) in chosen.iter() {
            grid[usize::from(y)][usize::from(x)].is_mine = true;
        }
        log::debug!(
            "Generated {}x{} board with {} mines, start {:?}",
            width,
            height,
            chosen.len(),
            start
        );
        Ok(grid)
    }
}

impl BoardGenerator for RandomBoardGenerator {
    type Error = BoardError;

    fn generate(
        &self,
        request: GenerateRequest,
    ) -> impl Future<Output = core::result::Result<SeedGrid, Self::Error>> + Send {
        core::future::ready(self.generate_grid(request))
    }
}
