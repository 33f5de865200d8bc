//! Fundamental domain value types used throughout the engine.
//!
//! Every type here is a newtype with a validated constructor: amounts,
//! decimal precisions, symbol codes, asset quantities, account
//! identifiers, basis-point rates and timestamps. Arithmetic on these
//! types is checked — overflow surfaces as an error, never as a wrap.

mod account;
mod amount;
mod asset;
mod basis_points;
mod precision;
mod rounding;
mod symbol;
mod timestamp;

pub use account::AccountId;
pub use amount::Amount;
pub use asset::Asset;
pub use basis_points::BasisPoints;
pub use precision::Precision;
pub use rounding::Rounding;
pub use symbol::SymbolCode;
pub use timestamp::Timestamp;
