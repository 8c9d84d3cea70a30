//! 基本型モジュール
//!
//! # 型の依存関係
//!
//! ```text
//! Color, Square, DropKind
//!   ↓
//! Move
//!   ↓
//! OrientedMove (Orientation)
//! ```

mod color;
mod drop_kind;
mod moves;
mod orientation;
mod square;

pub use color::Color;
pub use drop_kind::DropKind;
pub use moves::{Move, MoveSource};
pub use orientation::{Orientation, OrientedMove};
pub use square::Square;
