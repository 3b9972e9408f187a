use glam::Vec3;
use std::sync::Arc;

pub const WING_SEGMENTS: usize = 5;
pub const WING_LENGTH: f32 = 1.8;
/// Half-width of a feather at the wing root; tapers to half of this at the tip.
pub const FEATHER_WIDTH: f32 = 0.4;

/// A line between two vertex indices of the owning model.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Edge(pub usize, pub usize);

/// Which side of the body a wing hangs off.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WingSide {
    Left,
    Right,
}

impl WingSide {
    /// -1 for the left wing, +1 for the right. Mirrors x and the flap direction.
    pub fn sign(self) -> f32 {
        match self {
            WingSide::Left => -1.0,
            WingSide::Right => 1.0,
        }
    }

    /// x of the hinge where the wing meets the body.
    pub fn pivot_x(self) -> f32 {
        self.sign()
    }
}

/// Wireframe template: vertices addressed by index, edges between them.
#[derive(Debug, Clone, PartialEq)]
pub struct Model {
    pub vertices: Vec<Vec3>,
    pub edges: Vec<Edge>,
}

impl Model {
    pub fn new(vertices: Vec<Vec3>, edges: Vec<Edge>) -> Self {
        debug_assert!(edges
            .iter()
            .all(|e| e.0 != e.1 && e.0 < vertices.len() && e.1 < vertices.len()));
        Self { vertices, edges }
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.len()
    }

    // Body is a 2 x 1.2 x 1 box centered on the origin. The first four
    // vertices are the front face, which is where the glow goes.
    pub fn create_body() -> Self {
        #[rustfmt::skip]
        let vertices = vec![
            // Front face
            Vec3::new(-1.0, -0.6, 0.5),
            Vec3::new( 1.0, -0.6, 0.5),
            Vec3::new( 1.0,  0.6, 0.5),
            Vec3::new(-1.0,  0.6, 0.5),
            // Back face
            Vec3::new(-1.0, -0.6, -0.5),
            Vec3::new( 1.0, -0.6, -0.5),
            Vec3::new( 1.0,  0.6, -0.5),
            Vec3::new(-1.0,  0.6, -0.5),
            // Bread slot 1
            Vec3::new(-0.7, 0.6,  0.3),
            Vec3::new(-0.3, 0.6,  0.3),
            Vec3::new(-0.3, 0.6, -0.3),
            Vec3::new(-0.7, 0.6, -0.3),
            // Bread slot 2
            Vec3::new(0.3, 0.6,  0.3),
            Vec3::new(0.7, 0.6,  0.3),
            Vec3::new(0.7, 0.6, -0.3),
            Vec3::new(0.3, 0.6, -0.3),
            // Lever, just proud of the front face
            Vec3::new(0.9, 0.2, 0.51),
            Vec3::new(1.1, 0.2, 0.51),
            Vec3::new(1.1, 0.5, 0.51),
            Vec3::new(0.9, 0.5, 0.51),
        ];

        let mut edges = Vec::with_capacity(24);
        edges.extend(quad_loop(0));
        edges.extend(quad_loop(4));
        // front-to-back connectors
        for i in 0..4 {
            edges.push(Edge(i, i + 4));
        }
        // slots and lever
        for base in [8, 12, 16] {
            edges.extend(quad_loop(base));
        }

        Model::new(vertices, edges)
    }

    /// Feathered wing, `WING_SEGMENTS + 1` ribs of four vertices each.
    ///
    /// Both sides share one topology; only the sign of x differs.
    pub fn create_wing(side: WingSide) -> Self {
        let mirror = side.sign();
        let base_x = mirror * 1.0;

        let mut vertices = Vec::with_capacity((WING_SEGMENTS + 1) * 4);
        for i in 0..=WING_SEGMENTS {
            let t = i as f32 / WING_SEGMENTS as f32;
            let x = base_x + mirror * t * WING_LENGTH;
            let width = FEATHER_WIDTH * (1.0 - t * 0.5);

            vertices.push(Vec3::new(x, 0.3, width));
            vertices.push(Vec3::new(x, 0.3, -width));
            vertices.push(Vec3::new(x, 0.1, width * 0.7));
            vertices.push(Vec3::new(x, 0.1, -width * 0.7));
        }

        let mut edges = Vec::with_capacity(WING_SEGMENTS * 10 + 4);
        for i in 0..WING_SEGMENTS {
            let b = i * 4;
            edges.extend(rib(b));
            // to the next rib
            for k in 0..4 {
                edges.push(Edge(b + k, b + k + 4));
            }
            // cross bracing
            edges.push(Edge(b, b + 5));
            edges.push(Edge(b + 1, b + 4));
        }
        edges.extend(rib(WING_SEGMENTS * 4));

        Model::new(vertices, edges)
    }
}

/// 0-1-2-3-0
fn quad_loop(base: usize) -> [Edge; 4] {
    [
        Edge(base, base + 1),
        Edge(base + 1, base + 2),
        Edge(base + 2, base + 3),
        Edge(base + 3, base),
    ]
}

/// Top pair, bottom pair, and the two top-to-bottom sides of one wing rib.
fn rib(base: usize) -> [Edge; 4] {
    [
        Edge(base, base + 1),
        Edge(base + 2, base + 3),
        Edge(base, base + 2),
        Edge(base + 1, base + 3),
    ]
}

/// The three geometry templates every toaster draws with, built once.
#[derive(Debug, Clone)]
pub struct ModelLibrary {
    pub body: Arc<Model>,
    pub left_wing: Arc<Model>,
    pub right_wing: Arc<Model>,
}

impl ModelLibrary {
    pub fn new() -> Self {
        Self {
            body: Arc::new(Model::create_body()),
            left_wing: Arc::new(Model::create_wing(WingSide::Left)),
            right_wing: Arc::new(Model::create_wing(WingSide::Right)),
        }
    }

    pub fn wing(&self, side: WingSide) -> &Arc<Model> {
        match side {
            WingSide::Left => &self.left_wing,
            WingSide::Right => &self.right_wing,
        }
    }
}

impl Default for ModelLibrary {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn assert_edges_valid(model: &Model) {
        for e in &model.edges {
            assert_ne!(e.0, e.1);
            assert!(e.0 < model.vertex_count() && e.1 < model.vertex_count());
        }
    }

    #[test]
    fn body_has_slots_and_lever() {
        let body = Model::create_body();
        assert_eq!(body.vertex_count(), 20);
        assert_eq!(body.edge_count(), 24);
        assert_edges_valid(&body);

        // slots sit on the top face
        assert!(body.vertices[8..16].iter().all(|v| v.y == 0.6));
        // lever sticks out in front of the front face
        assert!(body.vertices[16..20].iter().all(|v| v.z > 0.5));
        // front face is the first four vertices
        assert!(body.vertices[..4].iter().all(|v| v.z == 0.5));
    }

    #[test]
    fn wing_counts() {
        let wing = Model::create_wing(WingSide::Right);
        assert_eq!(wing.vertex_count(), (WING_SEGMENTS + 1) * 4);
        assert_eq!(wing.edge_count(), WING_SEGMENTS * 10 + 4);
        assert_edges_valid(&wing);
    }

    #[test]
    fn wings_are_mirror_images() {
        let left = Model::create_wing(WingSide::Left);
        let right = Model::create_wing(WingSide::Right);

        assert_eq!(left.edges, right.edges);
        for (l, r) in left.vertices.iter().zip(&right.vertices) {
            assert_eq!(l.x, -r.x);
            assert_eq!(l.y, r.y);
            assert_eq!(l.z, r.z);
        }
    }

    #[test]
    fn wing_spans_root_to_tip_and_tapers() {
        let wing = Model::create_wing(WingSide::Right);
        let root = wing.vertices[0];
        let tip = wing.vertices[WING_SEGMENTS * 4];

        assert!((root.x - 1.0).abs() < 1e-6);
        assert!((tip.x - (1.0 + WING_LENGTH)).abs() < 1e-5);
        assert!((root.z - FEATHER_WIDTH).abs() < 1e-6);
        assert!((tip.z - FEATHER_WIDTH * 0.5).abs() < 1e-6);
        // lower feather edge is narrower
        assert!((wing.vertices[2].z - FEATHER_WIDTH * 0.7).abs() < 1e-6);
    }

    #[test]
    fn library_shares_templates() {
        let lib = ModelLibrary::new();
        let copy = lib.clone();
        assert!(Arc::ptr_eq(&lib.body, &copy.body));
        assert!(Arc::ptr_eq(lib.wing(WingSide::Left), &copy.left_wing));
    }
}
