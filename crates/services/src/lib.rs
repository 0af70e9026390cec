#![forbid(unsafe_code)]

pub mod app_services;
pub mod bank_loader;
pub mod error;
pub mod profile_store;
pub mod quiz;

pub use wellness_core::Clock;

pub use app_services::{AppServices, resolve_question_bank};
pub use error::{AppServicesError, BankLoadError, ProfileError, QuizError};
pub use profile_store::{ProfileOrigin, ProfileStore};
pub use quiz::{QuizCompletion, QuizLoopService, QuizProgress, QuizSession};
