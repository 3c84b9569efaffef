mod input;
mod loop_runner;
mod metrics;
mod rendering;
mod scene;

pub use input::InputAction;
pub use loop_runner::{
    run_app, AppError, InputSource, LoopConfig, LoopStopReason, LoopSummary, MAX_FRAMES_ENV_VAR,
};
pub use metrics::LoopMetricsSnapshot;
pub use rendering::{ChaseCamera, Viewport};
pub use scene::{
    EntityId, EntityIdAllocator, InputSnapshot, Scene, SceneCommand, SceneView, Vec3,
};
