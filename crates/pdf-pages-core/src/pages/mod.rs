//! Page-sequence engine.
//!
//! Pure functions over ordered page handles: validation, extraction,
//! removal, block moves, insertion and merging. Nothing in here knows about
//! PDF structure; see [`crate::pdf`] for reading and writing documents.

mod ops;
mod range;

pub use ops::{Insertion, extract, insert, insert_blocks, is_no_op, merge, move_block, remove};
pub use range::{Anchor, MoveAlternatives, PageRange, Side, validate};
