//! Roku content feeds.
//!
//! Three shapes live here: the single-channel feed built from the whole
//! catalog ([`generate_feed`]), the per-channel exports published for the
//! network of channels ([`generate_channel_feed`]), and a structural
//! validator for feeds that arrive from outside ([`validate_feed`]).

mod channels;
mod feed;
mod validate;

pub use channels::{
    CHANNEL_LANGUAGE, ChannelCategory, ChannelFeed, ChannelKind, ChannelVideo, ContentRating,
    FeedUrl, feed_key, feed_urls, generate_all_feeds, generate_channel_feed, genre_for_category,
};
pub use feed::{
    FeedSettings, RokuContent, RokuFeed, RokuFeedItem, RokuSeries, RokuVideo,
    SHORT_DESCRIPTION_LIMIT, generate_feed, truncate_description,
};
pub use validate::{FeedValidation, validate_feed};
