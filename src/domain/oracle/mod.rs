//! Oracle domain - feed key/value codecs and price reads

mod feed_table;
mod key_codec;
mod price_port;
mod registry;
mod value_codec;

pub use feed_table::{FeedPrecision, FeedTable, MAX_DECIMALS};
pub use key_codec::{FeedKey, KeyCodec, KEY_WIDTH};
pub use price_port::PricePort;
pub use registry::OracleRegistry;
pub use value_codec::{PriceValue, ValueCodec};
