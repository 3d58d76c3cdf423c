pub mod emotion_analyzer;
pub mod image_generator;
pub mod orchestrator;

pub use orchestrator::FlowerOrchestrator;
