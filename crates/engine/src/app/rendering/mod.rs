mod camera;

pub use camera::{ChaseCamera, Viewport};
