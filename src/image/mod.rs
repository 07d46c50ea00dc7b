//! Borrowed image views consumed by the detector, plus file I/O for the
//! command-line tool.
pub mod io;
pub mod rgba;
pub mod traits;
pub mod u8;

pub use self::rgba::{ImageRgba, RgbaImageBuf};
pub use self::traits::{ImageView, Rows};
pub use self::u8::ImageU8;
