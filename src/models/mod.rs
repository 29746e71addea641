/// Packed bit storage
pub mod matrix;
/// Pixel coordinates
pub mod point;
/// Located codes and decoded data
pub mod qr_code;

pub use matrix::BitMatrix;
pub use point::Point;
pub use qr_code::{Code, Data, DataType, ECLevel, MaskPattern};
