#![warn(clippy::pedantic)]
#![allow(clippy::missing_errors_doc)]

mod balance;
mod effort;
mod formula;
mod norms;
mod progression;
mod record;
mod set;
mod settings;
mod vo2max;
mod volume;

pub use balance::*;
pub use effort::*;
pub use formula::*;
pub use norms::*;
pub use progression::*;
pub use record::*;
pub use set::*;
pub use settings::*;
pub use vo2max::*;
pub use volume::*;
