//! Decoder for the EasyEDA shape language.
//!
//! EasyEDA describes symbols and footprints as arrays of `~`-delimited
//! records (`R~0~0~10~10~...`, `PAD~RECT~...`). This crate turns those
//! records into [`ShapeRecord`] values in a caller-chosen unit:
//!
//! ```text
//! line --tokenize--> TokenizedLine --opcode table--> ShapeRecord
//! ```
//!
//! Every coordinate has the per-drawing [`DrawingOrigin`] subtracted and is
//! then multiplied by a [`Scale`]. Lengths are only scaled.

pub mod decoder;
pub mod envelope;
pub mod error;
pub mod shape;
pub mod tokenizer;
pub mod units;

pub use decoder::decode;
pub use envelope::{DataHead, ShapeDocument};
pub use error::{DecodeError, RecordError};
pub use shape::{BBox, PadShape, PinRotation, ShapeRecord};
pub use tokenizer::{TokenizedLine, tokenize};
pub use units::{DrawingOrigin, Scale};
