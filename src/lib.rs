#![warn(clippy::all, clippy::pedantic)]
#![allow(
    clippy::missing_errors_doc,
    clippy::missing_panics_doc,
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::cast_precision_loss
)]

pub mod app;
pub mod config;
pub mod content;
pub mod control;
pub mod engage;
pub mod error;
pub mod observability;
pub mod persona;
pub mod social;
pub mod storage;
pub mod utils;

pub use config::Config;
pub use engage::{ActionKind, ActionRecord, EngineSettings, ReplyEngine};
pub use error::KolError;
pub use persona::{Persona, PersonaCatalog};
pub use social::{Post, SocialGateway};
