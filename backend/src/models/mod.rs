//! Domain types: bodies, positions, charts, aspects, transits and timing.

pub mod aspect;
pub mod body;
pub mod panchang;
pub mod position;
pub mod time;
pub mod timing;
pub mod transit;

pub use aspect::*;
pub use body::*;
pub use panchang::*;
pub use position::*;
pub use timing::*;
pub use transit::*;

/// Validation failures raised while constructing domain values.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ModelError {
    #[error("longitude {value} of {body} is outside [0, 360)")]
    InvalidLongitude { body: BodyId, value: f64 },

    #[error("ascendant {0} is outside [0, 360)")]
    InvalidAscendant(f64),

    #[error("birth chart has no bodies")]
    EmptyChart,

    #[error("birth chart lists {0} more than once")]
    DuplicateBody(BodyId),

    #[error("unknown body '{0}'")]
    UnknownBody(String),

    #[error("unknown purpose '{0}'")]
    UnknownPurpose(String),

    #[error("influence strength {value} for {body} is outside [-1, 1]")]
    InvalidStrength { body: BodyId, value: f64 },
}
