#![warn(clippy::pedantic)]
// Noisy doc/signature lints — would require annotating hundreds of pub functions
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::must_use_candidate)]
// Style preference — keeping format!("{}", x) over format!("{x}") for readability with complex exprs
#![allow(clippy::uninlined_format_args)]
// Intentional casts in LLM/API integration code (token counts, similarity scores)
#![allow(clippy::cast_possible_truncation)]
#![allow(clippy::cast_precision_loss)]
#![allow(clippy::module_name_repetitions)]

pub mod classifier;
pub mod cli;
pub mod config;
pub mod confirmation;
pub mod conversation;
pub(crate) mod errors;
pub mod extractor;
pub mod gateway;
pub mod image;
pub mod kb;
pub mod models;
pub mod notify;
pub mod plan;
pub mod prompts;
pub mod providers;
pub(crate) mod utils;

pub use errors::AaryaError;

pub const VERSION: &str = env!("CARGO_PKG_VERSION");
