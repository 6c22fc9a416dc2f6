pub mod broadcast_change_feed;
pub mod change_feed;
pub mod feed_subscription;
