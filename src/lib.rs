#![warn(clippy::all, rust_2018_idioms)]

pub mod app;
pub mod command;
pub mod components;
pub mod config;
pub mod element;
pub mod error;
pub mod export;
pub mod input;
pub mod panels;
pub mod raster;
pub mod rasterize;
pub mod renderer;
pub mod session;
pub mod surface;
pub mod tools;
pub mod transform;

pub use app::EditorApp;
pub use command::{Command, History};
pub use config::EditorConfig;
pub use element::{Annotation, Element};
pub use error::{EditorError, EditorResult};
pub use input::{ExportRequest, InputEvent, InputHandler, KeyAction};
pub use raster::{RasterId, RasterStore};
pub use renderer::Renderer;
pub use session::EditorSession;
pub use surface::{Snapshot, Surface};
pub use tools::ToolMode;
