//! Controller layer: user intents, error modeling, and routing them into the screen.

pub mod events;
pub mod orchestration;
