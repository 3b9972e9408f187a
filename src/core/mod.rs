pub mod color;
pub mod light;
pub mod math;
pub mod model;
pub mod scene;
pub mod toaster;

pub use color::Color;
pub use light::DirectionalLight;
pub use model::{Edge, Model, ModelLibrary, WingSide};
pub use scene::{Scene, DEFAULT_TOASTERS, MAX_TOASTERS};
pub use toaster::{FlyingToaster, Spawn, Viewport};
