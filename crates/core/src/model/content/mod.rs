pub mod blocks;

pub use blocks::{BULLET, ContentBlock, parse_content};
