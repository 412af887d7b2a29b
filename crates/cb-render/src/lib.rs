pub mod codec;
pub mod composite;
pub mod glyphs;
pub mod hit;

pub use codec::{ExportFormat, decode_bitmap, encode_raster, to_data_url};
pub use composite::{Compositor, erase_region};
pub use glyphs::{BlockGlyphs, Coverage, FontGlyphs, GlyphSource, NoGlyphs};
pub use hit::{Hit, hit_test};
