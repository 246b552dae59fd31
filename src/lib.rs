pub mod args;
pub mod db;
pub mod error;
pub mod model;
pub mod notifier;
pub mod onboarding;
pub mod settings;
pub mod storage;
pub mod validation;

pub use error::AppError;
pub use model::{CreateRound, Hole, Round, RoundId};
pub use notifier::{RoundDeletionHub, Subscription};
pub use validation::{
    SafeValidation, ValidationError, ValidationIssue, safe_validate_create_round,
    safe_validate_hole, safe_validate_round, validate_create_round, validate_hole,
    validate_round,
};
