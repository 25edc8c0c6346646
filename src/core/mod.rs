pub mod color;
pub mod coord;
pub mod intersection;
pub mod loader;
pub mod material;
pub mod mis;
pub mod population;
pub mod ray;
pub mod rng;
pub mod scene;
