//! Direct-manipulation transform engine for the bag customizer.
//!
//! This crate is compiled to WebAssembly and runs in the browser. It owns the
//! placed text and image, turns pointer and control input into transforms
//! (drag, resize, rotate, snap), keeps the selection frame in step with the
//! selected object, and flattens the scene to a PNG. The host layer wires DOM
//! events to the engine and carries out the returned [`engine::Action`]s.
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | Top-level engine and testable [`engine::EngineCore`] |
//! | [`object`] | Text and image objects and the scene that holds them |
//! | [`geometry`] | Points, boxes, rotation math, and coordinate conversion |
//! | [`bus`] | Selection bus: single-selection announcements and layout notices |
//! | [`input`] | Input event types and the gesture state machine |
//! | [`drag`] | Move gesture |
//! | [`resize`] | Handle resize gesture (pivot ratio for text, signed delta for images) |
//! | [`rotate`] | Knob rotate gesture |
//! | [`snap`] | Edge and midline snapping with guides |
//! | [`hit`] | Hit-testing frames and object bodies |
//! | [`overlay`] | Selection frames, per-kind affordances, frame scheduling |
//! | [`controls`] | Two-way mapping between style controls and object state |
//! | [`variant`] | Bag color, strap, and view backgrounds |
//! | [`assets`] | Object URL ownership for uploaded images |
//! | [`render`] | Stage drawing and the browser [`export::Surface`] |
//! | [`export`] | Scene flattening, PNG export plan, parameter summary |
//! | [`config`] | Engine configuration |
//! | [`error`] | Error taxonomy |
//! | [`consts`] | Shared numeric constants (scale limits, snap thresholds, etc.) |

pub mod assets;
pub mod bus;
pub mod config;
pub mod consts;
pub mod controls;
pub mod drag;
pub mod engine;
pub mod error;
pub mod export;
pub mod geometry;
pub mod hit;
pub mod input;
pub mod object;
pub mod overlay;
pub mod render;
pub mod resize;
pub mod rotate;
pub mod snap;
pub mod variant;
