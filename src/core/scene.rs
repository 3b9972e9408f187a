use std::fmt::{self, Display, Formatter};

use log::{debug, info, trace};
use rand::rngs::StdRng;
use rand::SeedableRng;

use crate::core::light::DirectionalLight;
use crate::core::model::ModelLibrary;
use crate::core::toaster::{FlyingToaster, Viewport};

/// Upper bound on how many toasters a scene will hold.
pub const MAX_TOASTERS: usize = 12;
pub const DEFAULT_TOASTERS: usize = 8;

/// Everything that survives from one frame to the next.
#[derive(Clone)]
pub struct Scene {
    pub toasters: Vec<FlyingToaster>,
    pub models: ModelLibrary,
    pub light: DirectionalLight,
    viewport: Viewport,
    rng: StdRng,
}

impl Scene {
    /// Builds the shared models and spawns `count` toasters scattered over the viewport.
    pub fn initialize(count: usize, width: usize, height: usize) -> Self {
        Self::build(count, width, height, StdRng::from_entropy())
    }

    /// Same as `initialize` but reproducible.
    pub fn with_seed(count: usize, width: usize, height: usize, seed: u64) -> Self {
        Self::build(count, width, height, StdRng::seed_from_u64(seed))
    }

    fn build(count: usize, width: usize, height: usize, mut rng: StdRng) -> Self {
        let count = count.min(MAX_TOASTERS);
        let models = ModelLibrary::new();
        let viewport = Viewport::new(width, height);

        let toasters = (0..count)
            .map(|_| FlyingToaster::spawn(&models, viewport, &mut rng))
            .collect();

        let scene = Self {
            toasters,
            models,
            light: DirectionalLight::default(),
            viewport,
            rng,
        };
        info!("{scene} initialized");
        scene
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    /// New bounds for spawning and culling. Toasters keep their positions.
    pub fn resize(&mut self, width: usize, height: usize) {
        self.viewport = Viewport::new(width, height);
        info!("Scene resized to {width}x{height}");
    }

    /// Advance every toaster by one frame, in storage order.
    pub fn update(&mut self) {
        let viewport = self.viewport;
        for (i, toaster) in self.toasters.iter_mut().enumerate() {
            if toaster.update(viewport, &mut self.rng) {
                debug!(
                    "Toaster {i} respawned at ({:.1}, {:.1}, {:.1})",
                    toaster.x, toaster.y, toaster.z
                );
            }
        }
        trace!("Updated {} toasters", self.toasters.len());
    }

    /// Snapshot ordered farthest first, for painter's-algorithm drawing.
    ///
    /// The clones share model templates with the live toasters, so this is cheap.
    pub fn depth_sorted(&self) -> Vec<FlyingToaster> {
        let mut sorted = self.toasters.clone();
        sorted.sort_by(|a, b| b.z.total_cmp(&a.z));
        sorted
    }
}

impl Display for Scene {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Scene: {} toasters, {}x{}",
            self.toasters.len(),
            self.viewport.width,
            self.viewport.height
        )
    }
}

impl Default for Scene {
    fn default() -> Self {
        Self::initialize(DEFAULT_TOASTERS, 800, 600)
    }
}
